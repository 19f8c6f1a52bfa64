//! Mapping between the header spellings found in rosters and the canonical
//! participant shape, and from the canonical shape to the export columns.

use log::{debug, warn};
use std::collections::HashSet;

pub use crate::config::*;

/// The header spellings that are recognized, after trimming.
const HEADER_ALIASES: [(&str, CanonicalField); 16] = [
    ("Número", CanonicalField::Number),
    ("Numero", CanonicalField::Number),
    ("Apellido", CanonicalField::LastName),
    ("Nombre", CanonicalField::FirstName),
    ("Nombres", CanonicalField::FirstName),
    ("Número de Documento", CanonicalField::DocumentId),
    ("Documento", CanonicalField::DocumentId),
    ("DNI", CanonicalField::DocumentId),
    ("Número de Teléfono", CanonicalField::Phone),
    ("Teléfono", CanonicalField::Phone),
    ("Telefono", CanonicalField::Phone),
    ("Celular", CanonicalField::Phone),
    ("Correo Electrónico", CanonicalField::Email),
    ("Email", CanonicalField::Email),
    ("E-mail", CanonicalField::Email),
    ("Correo", CanonicalField::Email),
];

/// The export headers, in column order.
pub const EXPORT_HEADERS: [&str; 6] = [
    "Número",
    "Apellido",
    "Nombres",
    "Número de Documento",
    "Teléfono",
    "Correo Electrónico",
];

/// Finds the canonical field for a header label. Surrounding whitespace is ignored.
pub fn canonical_field_for(header: &str) -> Option<CanonicalField> {
    let h = header.trim();
    HEADER_ALIASES
        .iter()
        .find_map(|(alias, field)| if *alias == h { Some(*field) } else { None })
}

/// Converts raw rows to canonical participants, in the same order.
///
/// Unknown columns are dropped. Fields that no column provides are left empty.
/// If several columns map to the same field, the leftmost one is used.
pub fn normalize(raw_rows: &[RawRow]) -> Vec<Participant> {
    let mut dropped: HashSet<String> = HashSet::new();
    let mut res: Vec<Participant> = Vec::with_capacity(raw_rows.len());
    for (idx, row) in raw_rows.iter().enumerate() {
        let mut p = Participant::default();
        let mut filled: HashSet<CanonicalField> = HashSet::new();
        for (header, value) in row.cells.iter() {
            match canonical_field_for(header) {
                Some(field) if filled.insert(field) => {
                    *p.field_mut(field) = value.to_text();
                }
                Some(field) => {
                    debug!(
                        "normalize: row {}: ignoring column {:?}, {} already filled",
                        idx,
                        header,
                        field.name()
                    );
                }
                None => {
                    if dropped.insert(header.clone()) {
                        warn!("normalize: dropping unknown column {:?}", header);
                    }
                }
            }
        }
        res.push(p);
    }
    res
}

/// Selects and renames the canonical fields for export.
pub fn denormalize(participants: &[Participant]) -> Result<Vec<ExportRow>, DrawErrors> {
    let records: Vec<CanonicalRecord> = participants.iter().map(|p| p.to_record()).collect();
    denormalize_records(&records)
}

/// Same as [denormalize] for records that have not been normalized.
///
/// All the canonical keys must be present in every record. Other keys are ignored.
pub fn denormalize_records(records: &[CanonicalRecord]) -> Result<Vec<ExportRow>, DrawErrors> {
    let mut res: Vec<ExportRow> = Vec::with_capacity(records.len());
    for (idx, record) in records.iter().enumerate() {
        let mut row: ExportRow = Vec::with_capacity(CanonicalField::ALL.len());
        for field in CanonicalField::ALL.iter() {
            let value = record
                .get(field.name())
                .ok_or(DrawErrors::SchemaError {
                    row: idx,
                    field: field.name(),
                })?;
            row.push((field.export_header(), value.clone()));
        }
        res.push(row);
    }
    Ok(res)
}
