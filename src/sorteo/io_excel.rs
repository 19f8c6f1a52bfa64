use calamine::{open_workbook_auto, DataType, Reader};

use crate::sorteo::*;

pub fn read_excel_roster(path: &str, source: &InputSource) -> SorteoResult<Vec<RawRow>> {
    let mut workbook = open_workbook_auto(path).context(OpeningExcelSnafu { path })?;
    let wrange = match &source.worksheet_name {
        Some(name) => workbook
            .worksheet_range(name)
            .context(MissingWorksheetSnafu { path, name })?
            .context(OpeningExcelSnafu { path })?,
        None => workbook
            .worksheet_range_at(0)
            .context(EmptyExcelSnafu { path })?
            .context(OpeningExcelSnafu { path })?,
    };

    let mut iter = wrange.rows();
    let header: Vec<String> = iter
        .next()
        .context(EmptyExcelSnafu { path })?
        .iter()
        .map(|c| cell_value(c).to_text())
        .collect();
    debug!("read_excel_roster: header: {:?}", header);

    let mut res: Vec<RawRow> = Vec::new();
    for (idx, row) in iter.enumerate() {
        let cells: Vec<(String, CellValue)> = header
            .iter()
            .zip(row.iter())
            .map(|(h, c)| (h.clone(), cell_value(c)))
            .collect();
        if cells.iter().all(|(_, v)| *v == CellValue::Empty) {
            debug!("read_excel_roster: skipping blank row {}", idx + 2);
            continue;
        }
        res.push(RawRow { cells });
    }
    Ok(res)
}

fn cell_value(cell: &DataType) -> CellValue {
    match cell {
        DataType::String(s) if s.is_empty() => CellValue::Empty,
        DataType::String(s) => CellValue::Text(s.clone()),
        DataType::Int(i) => CellValue::Int(*i),
        DataType::Float(f) => CellValue::Float(*f),
        DataType::Bool(b) => CellValue::Bool(*b),
        DataType::Empty => CellValue::Empty,
        DataType::Error(e) => {
            warn!("read_excel_roster: treating cell error {:?} as blank", e);
            CellValue::Empty
        }
        // Dates are kept in the spreadsheet notation.
        other => CellValue::Text(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_conversions() {
        assert_eq!(
            cell_value(&DataType::String("Ana".to_string())),
            CellValue::Text("Ana".to_string())
        );
        assert_eq!(cell_value(&DataType::Float(30111222.0)).to_text(), "30111222");
        assert_eq!(cell_value(&DataType::Int(4)).to_text(), "4");
        assert_eq!(cell_value(&DataType::Empty), CellValue::Empty);
    }

    fn person(last_name: &str) -> Participant {
        Participant {
            number: "1".to_string(),
            last_name: last_name.to_string(),
            ..Participant::default()
        }
    }

    fn last_names(rows: &[RawRow]) -> Vec<String> {
        normalize(rows).into_iter().map(|p| p.last_name).collect()
    }

    #[test]
    fn workbook_rosters() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inscriptos.xlsx");
        let sheets = vec![
            (
                "Lista".to_string(),
                denormalize(&[person("Sosa"), Participant::default(), person("Paz")]).unwrap(),
            ),
            ("Otra".to_string(), denormalize(&[person("Ríos")]).unwrap()),
        ];
        fs::write(&path, write_xlsx::write_sheets(&sheets).unwrap()).unwrap();
        let file_path = path.to_str().unwrap().to_string();

        // First worksheet, header row first, blank row skipped
        let rows = read_table(&InputSource {
            file_path: file_path.clone(),
            provider: None,
            worksheet_name: None,
        })
        .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("Apellido"), Some(&CellValue::Text("Sosa".to_string())));
        assert_eq!(last_names(&rows), vec!["Sosa", "Paz"]);

        let rows = read_table(&InputSource {
            file_path: file_path.clone(),
            provider: Some("excel".to_string()),
            worksheet_name: Some("Otra".to_string()),
        })
        .unwrap();
        assert_eq!(last_names(&rows), vec!["Ríos"]);

        let res = read_table(&InputSource {
            file_path,
            provider: None,
            worksheet_name: Some("Nope".to_string()),
        });
        assert!(matches!(
            res,
            Err(SorteoError::MissingWorksheet { name, .. }) if name == "Nope"
        ));
    }

    #[test]
    fn missing_file() {
        let source = InputSource {
            file_path: "/nonexistent/inscriptos.xlsx".to_string(),
            provider: None,
            worksheet_name: None,
        };
        let res = read_excel_roster(&source.file_path, &source);
        assert!(matches!(res, Err(SorteoError::OpeningExcel { .. })));
    }
}
