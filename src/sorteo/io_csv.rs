// Primitives for reading CSV files.

use crate::sorteo::*;

pub fn read_csv_roster(path: &str) -> SorteoResult<Vec<RawRow>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .context(CsvOpenSnafu { path })?;
    let header: Vec<String> = rdr
        .headers()
        .context(CsvOpenSnafu { path })?
        .iter()
        .map(|h| h.to_string())
        .collect();
    debug!("read_csv_roster: header: {:?}", header);

    let mut res: Vec<RawRow> = Vec::new();
    for (idx, line_r) in rdr.records().enumerate() {
        // The header is the first line.
        let lineno = idx + 2;
        let line = line_r.context(CsvLineParseSnafu { path, lineno })?;
        let cells: Vec<(String, CellValue)> = header
            .iter()
            .zip(line.iter())
            .map(|(h, s)| {
                let v = if s.is_empty() {
                    CellValue::Empty
                } else {
                    CellValue::Text(s.to_string())
                };
                (h.clone(), v)
            })
            .collect();
        if cells.iter().all(|(_, v)| *v == CellValue::Empty) {
            debug!("read_csv_roster: skipping blank line {}", lineno);
            continue;
        }
        res.push(RawRow { cells });
    }
    Ok(res)
}
