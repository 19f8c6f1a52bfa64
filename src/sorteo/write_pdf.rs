use encoding_rs::WINDOWS_1252;
use pdf_writer::{Content, Finish, Name, Pdf, Rect, Ref, Str};

use crate::sorteo::*;

// A4, in points.
const PAGE_WIDTH: f32 = 595.0;
const PAGE_HEIGHT: f32 = 842.0;
const MARGIN: f32 = 42.5;

const TITLE_SIZE: f32 = 12.0;
const TEXT_SIZE: f32 = 9.0;

const REGULAR: Name<'static> = Name(b"F1");
const BOLD: Name<'static> = Name(b"F2");

/// A line of text, placed on the page during pagination.
#[derive(PartialEq, Debug, Clone)]
struct ReportLine {
    text: String,
    bold: bool,
    size: f32,
    centered: bool,
    /// Extra vertical space before the line.
    gap: f32,
}

// Helvetica is proportional. Half of the font size is close to the average width
// of the characters found in names and emails.
fn estimated_width(text: &str, size: f32, bold: bool) -> f32 {
    let factor = if bold { 0.55 } else { 0.5 };
    text.chars().count() as f32 * size * factor
}

/// Splits a line on spaces so that it fits in the given number of characters.
/// Words longer than the limit are cut.
fn wrap(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    for word in text.split(' ') {
        let mut word: String = word.to_string();
        while word.chars().count() > max_chars {
            let head: String = word.chars().take(max_chars).collect();
            word = word.chars().skip(max_chars).collect();
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            lines.push(head);
        }
        let needed = current.chars().count() + word.chars().count() + 1;
        if !current.is_empty() && needed > max_chars {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(&word);
    }
    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

fn text_lines(text: &str, bold: bool, gap: f32) -> Vec<ReportLine> {
    let char_width = TEXT_SIZE * if bold { 0.55 } else { 0.5 };
    let max_chars = ((PAGE_WIDTH - 2.0 * MARGIN) / char_width) as usize;
    text.split('\n')
        .flat_map(|l| wrap(l.trim_end_matches('\r'), max_chars))
        .enumerate()
        .map(|(idx, t)| ReportLine {
            text: t,
            bold,
            size: TEXT_SIZE,
            centered: false,
            gap: if idx == 0 { gap } else { 0.0 },
        })
        .collect()
}

fn report_lines(sections: &[(String, Vec<ExportRow>)]) -> Vec<ReportLine> {
    let mut lines: Vec<ReportLine> = Vec::new();
    for (idx, (title, rows)) in sections.iter().enumerate() {
        lines.push(ReportLine {
            text: title.clone(),
            bold: true,
            size: TITLE_SIZE,
            centered: true,
            gap: if idx == 0 { 0.0 } else { 6.0 },
        });
        lines.extend(text_lines(
            &io_common::format_line(&schema::EXPORT_HEADERS),
            true,
            4.0,
        ));
        for row in rows.iter() {
            let values: Vec<&str> = row.iter().map(|(_, v)| v.as_str()).collect();
            lines.extend(text_lines(&io_common::format_line(&values), false, 0.0));
        }
    }
    lines
}

fn paginate(lines: &[ReportLine]) -> Vec<Vec<(f32, ReportLine)>> {
    let mut pages: Vec<Vec<(f32, ReportLine)>> = vec![Vec::new()];
    let mut y = PAGE_HEIGHT - MARGIN;
    for line in lines.iter() {
        let line_height = line.size * 1.4;
        let on_fresh_page = pages.last().map(|p| p.is_empty()).unwrap_or(true);
        // No gap at the top of a page.
        let gap = if on_fresh_page { 0.0 } else { line.gap };
        if !on_fresh_page && y - gap - line_height < MARGIN {
            pages.push(Vec::new());
            y = PAGE_HEIGHT - MARGIN - line_height;
        } else {
            y -= gap + line_height;
        }
        if let Some(page) = pages.last_mut() {
            page.push((y, line.clone()));
        }
    }
    pages
}

fn page_content(lines: &[(f32, ReportLine)]) -> Vec<u8> {
    let mut content = Content::new();
    for (y, line) in lines.iter() {
        let x = if line.centered {
            ((PAGE_WIDTH - estimated_width(&line.text, line.size, line.bold)) / 2.0).max(MARGIN)
        } else {
            MARGIN
        };
        // Characters outside of WinAnsi are replaced by numeric references.
        let (encoded, _, _) = WINDOWS_1252.encode(&line.text);
        content.begin_text();
        content.set_font(if line.bold { BOLD } else { REGULAR }, line.size);
        content.next_line(x, *y);
        content.show(Str(&encoded));
        content.end_text();
    }
    content.finish()
}

/// Renders the sections (title, rows) as a PDF document.
pub fn write_report(sections: &[(String, Vec<ExportRow>)]) -> SorteoResult<Vec<u8>> {
    let pages = paginate(&report_lines(sections));

    let mut writer = Pdf::new();
    let catalog_id = Ref::new(1);
    let page_tree_id = Ref::new(2);
    let regular_id = Ref::new(3);
    let bold_id = Ref::new(4);
    let page_ids: Vec<(Ref, Ref)> = (0..pages.len())
        .map(|idx| (Ref::new(5 + 2 * idx as i32), Ref::new(6 + 2 * idx as i32)))
        .collect();

    writer.catalog(catalog_id).pages(page_tree_id);
    writer
        .pages(page_tree_id)
        .kids(page_ids.iter().map(|(page_id, _)| *page_id))
        .count(page_ids.len() as i32);

    for ((page_id, content_id), lines) in page_ids.iter().zip(pages.iter()) {
        let mut page = writer.page(*page_id);
        page.media_box(Rect::new(0.0, 0.0, PAGE_WIDTH, PAGE_HEIGHT));
        page.parent(page_tree_id);
        page.contents(*content_id);
        page.resources()
            .fonts()
            .pair(REGULAR, regular_id)
            .pair(BOLD, bold_id);
        page.finish();
        writer.stream(*content_id, &page_content(lines));
    }

    writer
        .type1_font(regular_id)
        .base_font(Name(b"Helvetica"))
        .encoding_predefined(Name(b"WinAnsiEncoding"));
    writer
        .type1_font(bold_id)
        .base_font(Name(b"Helvetica-Bold"))
        .encoding_predefined(Name(b"WinAnsiEncoding"));

    debug!(
        "write_report: {} sections on {} pages",
        sections.len(),
        pages.len()
    );
    Ok(writer.finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(n: usize) -> Vec<ExportRow> {
        let ps: Vec<Participant> = (1..=n)
            .map(|i| Participant {
                number: i.to_string(),
                last_name: "Muñoz".to_string(),
                email: format!("p{}@mail.org", i),
                ..Participant::default()
            })
            .collect();
        denormalize(&ps).unwrap()
    }

    #[test]
    fn wrapping() {
        assert_eq!(wrap("uno dos tres", 7), vec!["uno dos", "tres"]);
        assert_eq!(wrap("", 7), vec![""]);
        assert_eq!(wrap("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn line_breaks_in_cells() {
        let lines = text_lines("1 | Calle 12\r\nPiso 3 | x", false, 4.0);
        let texts: Vec<&str> = lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["1 | Calle 12", "Piso 3 | x"]);
        assert_eq!(lines[0].gap, 4.0);
        assert_eq!(lines[1].gap, 0.0);
    }

    #[test]
    fn two_sections() {
        let sections = vec![
            (SELECTED_TITLE.to_string(), rows(3)),
            (ALTERNATES_TITLE.to_string(), rows(1)),
        ];
        let lines = report_lines(&sections);
        // title, header and rows for each section
        assert_eq!(lines.len(), 2 + 3 + 2 + 1);
        assert_eq!(lines[0].text, SELECTED_TITLE);
        assert!(lines[1].bold);
        assert!(lines[1].text.starts_with("Número | Apellido | Nombres"));
        assert_eq!(lines[5].text, ALTERNATES_TITLE);

        let bytes = write_report(&sections).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
        let as_text = String::from_utf8_lossy(&bytes);
        assert!(as_text.contains("WinAnsiEncoding"));
    }

    #[test]
    fn long_groups_span_several_pages() {
        let sections = vec![
            (SELECTED_TITLE.to_string(), rows(120)),
            (ALTERNATES_TITLE.to_string(), rows(40)),
        ];
        let pages = paginate(&report_lines(&sections));
        assert!(pages.len() > 1);
        for page in pages.iter() {
            assert!(!page.is_empty());
            for (y, _) in page.iter() {
                assert!(*y >= MARGIN);
            }
        }
    }
}
