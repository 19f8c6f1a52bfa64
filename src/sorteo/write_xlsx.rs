// A minimal Office Open XML workbook: one worksheet per group, all the cells
// as shared strings.

use std::collections::HashMap;
use std::io::{Cursor, Write};

use quick_xml::escape::escape;
use zip::write::FileOptions;
use zip::ZipWriter;

use crate::sorteo::*;

const XML_HEADER: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;
const NS_MAIN: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const NS_REL: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NS_PKG_REL: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

/// Deduplicated strings of the workbook, in order of first use.
#[derive(Default)]
struct SharedStrings {
    index: HashMap<String, usize>,
    values: Vec<String>,
    uses: usize,
}

impl SharedStrings {
    fn get_or_insert(&mut self, s: &str) -> usize {
        self.uses += 1;
        if let Some(idx) = self.index.get(s) {
            return *idx;
        }
        let idx = self.values.len();
        self.values.push(s.to_string());
        self.index.insert(s.to_string(), idx);
        idx
    }

    fn to_xml(&self) -> String {
        let mut xml = format!(
            r#"{}<sst xmlns="{}" count="{}" uniqueCount="{}">"#,
            XML_HEADER,
            NS_MAIN,
            self.uses,
            self.values.len()
        );
        for v in self.values.iter() {
            xml.push_str(&format!(
                r#"<si><t xml:space="preserve">{}</t></si>"#,
                cell_text(v)
            ));
        }
        xml.push_str("</sst>");
        xml
    }
}

/// Escapes a cell value. Characters that XML 1.0 does not allow are written
/// in the `_xHHHH_` notation of SpreadsheetML.
fn cell_text(s: &str) -> String {
    let mut res = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\t' | '\n' | '\r' => res.push(c),
            c if (c as u32) < 0x20 || c == '\u{FFFE}' || c == '\u{FFFF}' => {
                res.push_str(&format!("_x{:04X}_", c as u32))
            }
            c => res.push(c),
        }
    }
    escape(res.as_str()).into_owned()
}

/// Column name in the A1 notation, starting from 0.
fn column_name(idx: usize) -> String {
    let mut n = idx + 1;
    let mut name: Vec<char> = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        name.push((b'A' + rem as u8) as char);
        n = (n - 1) / 26;
    }
    name.iter().rev().collect()
}

fn sheet_xml(rows: &[ExportRow], strings: &mut SharedStrings) -> String {
    let mut xml = format!(r#"{}<worksheet xmlns="{}"><sheetData>"#, XML_HEADER, NS_MAIN);
    let header: Vec<&str> = schema::EXPORT_HEADERS.to_vec();
    let lines = std::iter::once(header).chain(
        rows.iter()
            .map(|row| row.iter().map(|(_, v)| v.as_str()).collect::<Vec<&str>>()),
    );
    for (row_idx, values) in lines.enumerate() {
        let r = row_idx + 1;
        xml.push_str(&format!(r#"<row r="{}">"#, r));
        for (col_idx, v) in values.iter().enumerate() {
            if v.is_empty() {
                continue;
            }
            let s_idx = strings.get_or_insert(v);
            xml.push_str(&format!(
                r#"<c r="{}{}" t="s"><v>{}</v></c>"#,
                column_name(col_idx),
                r,
                s_idx
            ));
        }
        xml.push_str("</row>");
    }
    xml.push_str("</sheetData></worksheet>");
    xml
}

fn add_file(
    zip: &mut ZipWriter<Cursor<Vec<u8>>>,
    name: &str,
    contents: &str,
    options: FileOptions,
) -> SorteoResult<()> {
    zip.start_file(name, options).context(ZipSnafu {})?;
    zip.write_all(contents.as_bytes())
        .context(WritingOutputSnafu { path: name })?;
    Ok(())
}

/// Builds a workbook with one worksheet per (name, rows) entry. Every sheet starts
/// with the export headers, even when it has no rows.
pub fn write_sheets(sheets: &[(String, Vec<ExportRow>)]) -> SorteoResult<Vec<u8>> {
    let mut strings = SharedStrings::default();
    let sheet_xmls: Vec<String> = sheets
        .iter()
        .map(|(_, rows)| sheet_xml(rows, &mut strings))
        .collect();

    let mut content_types = format!(
        r#"{}<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/sharedStrings.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sharedStrings+xml"/>"#,
        XML_HEADER
    );
    let mut workbook = format!(
        r#"{}<workbook xmlns="{}" xmlns:r="{}"><sheets>"#,
        XML_HEADER, NS_MAIN, NS_REL
    );
    let mut workbook_rels = format!(r#"{}<Relationships xmlns="{}">"#, XML_HEADER, NS_PKG_REL);
    for (idx, (name, _)) in sheets.iter().enumerate() {
        let n = idx + 1;
        content_types.push_str(&format!(
            r#"<Override PartName="/xl/worksheets/sheet{}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#,
            n
        ));
        workbook.push_str(&format!(
            r#"<sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
            escape(name.as_str()),
            n,
            n
        ));
        workbook_rels.push_str(&format!(
            r#"<Relationship Id="rId{}" Type="{}/worksheet" Target="worksheets/sheet{}.xml"/>"#,
            n, NS_REL, n
        ));
    }
    content_types.push_str("</Types>");
    workbook.push_str("</sheets></workbook>");
    workbook_rels.push_str(&format!(
        r#"<Relationship Id="rId{}" Type="{}/sharedStrings" Target="sharedStrings.xml"/></Relationships>"#,
        sheets.len() + 1,
        NS_REL
    ));
    let root_rels = format!(
        r#"{}<Relationships xmlns="{}"><Relationship Id="rId1" Type="{}/officeDocument" Target="xl/workbook.xml"/></Relationships>"#,
        XML_HEADER, NS_PKG_REL, NS_REL
    );

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(zip::CompressionMethod::Deflated);
    add_file(&mut zip, "[Content_Types].xml", &content_types, options)?;
    add_file(&mut zip, "_rels/.rels", &root_rels, options)?;
    add_file(&mut zip, "xl/workbook.xml", &workbook, options)?;
    add_file(&mut zip, "xl/_rels/workbook.xml.rels", &workbook_rels, options)?;
    for (idx, xml) in sheet_xmls.iter().enumerate() {
        add_file(
            &mut zip,
            &format!("xl/worksheets/sheet{}.xml", idx + 1),
            xml,
            options,
        )?;
    }
    add_file(&mut zip, "xl/sharedStrings.xml", &strings.to_xml(), options)?;
    let cursor = zip.finish().context(ZipSnafu {})?;
    debug!("write_sheets: {} sheets written", sheets.len());
    Ok(cursor.into_inner())
}
