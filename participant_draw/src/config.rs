// ********* Input data structures ***********

use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::Display;

/// The content of a single spreadsheet cell, as handed over by a reader.
#[derive(PartialEq, Debug, Clone)]
pub enum CellValue {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    /// A blank cell, or a cell that the reader could not interpret.
    Empty,
}

impl CellValue {
    /// The textual form used in canonical participants.
    ///
    /// Missing values (blank cells, NaN) become the empty string. Integral
    /// floats are printed without a fractional part, since spreadsheets
    /// routinely store document numbers as floats.
    pub fn to_text(&self) -> String {
        match self {
            CellValue::Text(s) => s.clone(),
            CellValue::Int(i) => i.to_string(),
            CellValue::Float(f) if !f.is_finite() => "".to_string(),
            CellValue::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => {
                format!("{}", *f as i64)
            }
            CellValue::Float(f) => f.to_string(),
            CellValue::Bool(b) => b.to_string(),
            CellValue::Empty => "".to_string(),
        }
    }
}

/// One data row of a roster, keyed by the literal header labels of the source.
///
/// The cells keep the column order of the source. The order carries no meaning
/// except for resolving two columns that map to the same canonical field.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct RawRow {
    pub cells: Vec<(String, CellValue)>,
}

impl RawRow {
    pub fn new() -> RawRow {
        RawRow { cells: Vec::new() }
    }

    pub fn with_cell(mut self, header: &str, value: CellValue) -> RawRow {
        self.cells.push((header.to_string(), value));
        self
    }

    pub fn get(&self, header: &str) -> Option<&CellValue> {
        self.cells
            .iter()
            .find_map(|(h, v)| if h == header { Some(v) } else { None })
    }
}

/// The six canonical participant attributes, in display order.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub enum CanonicalField {
    Number,
    LastName,
    FirstName,
    DocumentId,
    Phone,
    Email,
}

impl CanonicalField {
    pub const ALL: [CanonicalField; 6] = [
        CanonicalField::Number,
        CanonicalField::LastName,
        CanonicalField::FirstName,
        CanonicalField::DocumentId,
        CanonicalField::Phone,
        CanonicalField::Email,
    ];

    /// The key used for this field in canonical records.
    pub fn name(&self) -> &'static str {
        match self {
            CanonicalField::Number => "number",
            CanonicalField::LastName => "last_name",
            CanonicalField::FirstName => "first_name",
            CanonicalField::DocumentId => "document_id",
            CanonicalField::Phone => "phone",
            CanonicalField::Email => "email",
        }
    }

    /// The column header used when exporting this field.
    pub fn export_header(&self) -> &'static str {
        match self {
            CanonicalField::Number => "Número",
            CanonicalField::LastName => "Apellido",
            CanonicalField::FirstName => "Nombres",
            CanonicalField::DocumentId => "Número de Documento",
            CanonicalField::Phone => "Teléfono",
            CanonicalField::Email => "Correo Electrónico",
        }
    }
}

/// A participant in the canonical shape. All the fields are always present.
#[derive(Eq, PartialEq, Debug, Clone, Default, Hash)]
pub struct Participant {
    pub number: String,
    pub last_name: String,
    pub first_name: String,
    pub document_id: String,
    pub phone: String,
    pub email: String,
}

impl Participant {
    pub fn field(&self, field: CanonicalField) -> &str {
        match field {
            CanonicalField::Number => &self.number,
            CanonicalField::LastName => &self.last_name,
            CanonicalField::FirstName => &self.first_name,
            CanonicalField::DocumentId => &self.document_id,
            CanonicalField::Phone => &self.phone,
            CanonicalField::Email => &self.email,
        }
    }

    pub fn field_mut(&mut self, field: CanonicalField) -> &mut String {
        match field {
            CanonicalField::Number => &mut self.number,
            CanonicalField::LastName => &mut self.last_name,
            CanonicalField::FirstName => &mut self.first_name,
            CanonicalField::DocumentId => &mut self.document_id,
            CanonicalField::Phone => &mut self.phone,
            CanonicalField::Email => &mut self.email,
        }
    }

    /// The loose record form, keyed by canonical field names.
    pub fn to_record(&self) -> CanonicalRecord {
        CanonicalField::ALL
            .iter()
            .map(|f| (f.name().to_string(), self.field(*f).to_string()))
            .collect()
    }
}

/// Participant data that did not go through normalization, for example
/// results that were read back from a file. Keys are canonical field names.
pub type CanonicalRecord = BTreeMap<String, String>;

/// A row ready for export: (display header, value) in the export column order.
pub type ExportRow = Vec<(&'static str, String)>;

// ******** Output data structures *********

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct DrawResult {
    /// The pre-registered participants.
    pub selected: Vec<Participant>,
    /// The waitlist, in draw order.
    pub alternates: Vec<Participant>,
    pub want_selected: usize,
    pub want_alternates: usize,
}

/// Errors that prevent a draw or an export from completing.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum DrawErrors {
    /// A count supplied by the user is not a non-negative integer.
    InvalidCount { label: String, value: String },
    InsufficientParticipants { available: usize, requested: usize },
    /// A record handed to the exporter lacks one of the canonical fields.
    SchemaError { row: usize, field: &'static str },
}

impl Error for DrawErrors {}

impl Display for DrawErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DrawErrors::InvalidCount { label, value } => write!(
                f,
                "Invalid number for {}: {:?} (expected a non-negative integer)",
                label, value
            ),
            DrawErrors::InsufficientParticipants {
                available,
                requested,
            } => write!(
                f,
                "Not enough participants for the draw: {} requested, {} available",
                requested, available
            ),
            DrawErrors::SchemaError { row, field } => {
                write!(f, "Row {} is missing the field {}", row, field)
            }
        }
    }
}

// ********* Configuration **********

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct DrawRules {
    /// Number of pre-registered participants to draw.
    pub want_selected: usize,
    /// Number of participants to put on the waitlist.
    pub want_alternates: usize,
    /// If set, the draw is reproducible.
    pub seed: Option<u64>,
}

impl DrawRules {
    pub const DEFAULT_RULES: DrawRules = DrawRules {
        want_selected: 60,
        want_alternates: 20,
        seed: None,
    };
}
