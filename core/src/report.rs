//! Paginated PDF export of normalized records.
//!
//! Each record starts on a new page and is printed as one `NAME: value` line
//! per descriptor field, in display order. A record whose lines do not fit
//! the printable height continues on the next page. Text is set in the
//! built-in Helvetica with WinAnsi encoding: Latin-1 plus the typographic
//! punctuation of the 0x80-0x9F block. Anything else is replaced with `?`.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

use crate::error::ReportError;
use crate::normalize::NormalizedRecord;

/// Page geometry in PDF points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportLayout {
    pub page_width: i64,
    pub page_height: i64,
    pub margin_left: i64,
    pub margin_top: i64,
    pub margin_bottom: i64,
    pub line_height: i64,
    pub font_size: i64,
}

impl Default for ReportLayout {
    /// A4 with 10mm side/top margins, a 15mm bottom margin and 10mm lines.
    fn default() -> Self {
        Self {
            page_width: 595,
            page_height: 842,
            margin_left: 28,
            margin_top: 28,
            margin_bottom: 43,
            line_height: 28,
            font_size: 12,
        }
    }
}

/// The lines printed for one record.
pub fn report_lines(record: &NormalizedRecord) -> Vec<String> {
    record
        .columns()
        .map(|(spec, text)| format!("{}: {}", spec.name, single_line(text)))
        .collect()
}

/// Render `records` with the default layout.
pub fn export_pdf(records: &[NormalizedRecord]) -> Result<Vec<u8>, ReportError> {
    ReportLayout::default().render(records)
}

impl ReportLayout {
    pub fn lines_per_page(&self) -> usize {
        let usable = self.page_height - self.margin_top - self.margin_bottom;
        (usable / self.line_height).max(1) as usize
    }

    /// Split records into pages of text lines; every record starts a page.
    pub fn paginate(&self, records: &[NormalizedRecord]) -> Vec<Vec<String>> {
        let per_page = self.lines_per_page();
        records
            .iter()
            .flat_map(|record| {
                report_lines(record)
                    .chunks(per_page)
                    .map(<[String]>::to_vec)
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    pub fn render(&self, records: &[NormalizedRecord]) -> Result<Vec<u8>, ReportError> {
        if records.is_empty() {
            return Err(ReportError::Empty);
        }

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => font_id,
            },
        });

        let mut kids = Vec::new();
        for lines in self.paginate(records) {
            let encoded = self
                .page_content(&lines)
                .encode()
                .map_err(|e| ReportError::Pdf(e.to_string()))?;
            let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(Object::Reference(page_id));
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "Resources" => resources_id,
                "MediaBox" => vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(self.page_width),
                    Object::Integer(self.page_height),
                ],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes)
            .map_err(|e| ReportError::Pdf(e.to_string()))?;
        Ok(bytes)
    }

    fn page_content(&self, lines: &[String]) -> Content {
        let first_baseline = self.page_height - self.margin_top - self.font_size;
        let mut operations = vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), Object::Integer(self.font_size)]),
            Operation::new(
                "Td",
                vec![Object::Integer(self.margin_left), Object::Integer(first_baseline)],
            ),
        ];
        for (i, line) in lines.iter().enumerate() {
            if i > 0 {
                operations.push(Operation::new(
                    "Td",
                    vec![Object::Integer(0), Object::Integer(-self.line_height)],
                ));
            }
            operations.push(Operation::new("Tj", vec![Object::string_literal(win_ansi(line))]));
        }
        operations.push(Operation::new("ET", vec![]));
        Content { operations }
    }
}

fn single_line(text: &str) -> String {
    text.chars()
        .map(|c| if c == '\n' || c == '\r' || c == '\t' { ' ' } else { c })
        .collect()
}

/// Characters WinAnsiEncoding places at 0x80-0x9F, indexed from 0x80.
/// `None` marks the five unassigned codes.
#[rustfmt::skip]
const WIN_ANSI_HIGH: [Option<char>; 32] = [
    Some('€'), None, Some('‚'), Some('ƒ'), Some('„'), Some('…'), Some('†'), Some('‡'),
    Some('ˆ'), Some('‰'), Some('Š'), Some('‹'), Some('Œ'), None, Some('Ž'), None,
    None, Some('‘'), Some('’'), Some('“'), Some('”'), Some('•'), Some('–'), Some('—'),
    Some('˜'), Some('™'), Some('š'), Some('›'), Some('œ'), None, Some('ž'), Some('Ÿ'),
];

fn win_ansi(text: &str) -> Vec<u8> {
    text.chars().map(win_ansi_byte).collect()
}

fn win_ansi_byte(c: char) -> u8 {
    match u32::from(c) {
        code @ (0x20..=0x7E | 0xA0..=0xFF) => code as u8,
        0x00..=0x1F => b' ',
        _ => WIN_ANSI_HIGH
            .iter()
            .position(|&mapped| mapped == Some(c))
            .map_or(b'?', |i| 0x80 + i as u8),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::fields::FIELDS;
    use crate::normalize::normalize;
    use crate::types::Record;

    fn record(value: serde_json::Value) -> NormalizedRecord {
        normalize(&serde_json::from_value::<Record>(value).unwrap())
    }

    fn page_texts(pdf: &[u8]) -> Vec<Vec<String>> {
        let doc = Document::load_mem(pdf).unwrap();
        doc.get_pages()
            .values()
            .map(|&page_id| {
                let content = Content::decode(&doc.get_page_content(page_id).unwrap()).unwrap();
                content
                    .operations
                    .iter()
                    .filter(|op| op.operator == "Tj")
                    .map(|op| match &op.operands[0] {
                        Object::String(bytes, _) => bytes.iter().map(|&b| b as char).collect(),
                        other => panic!("unexpected operand {other:?}"),
                    })
                    .collect()
            })
            .collect()
    }

    #[test]
    fn lines_follow_field_order() {
        let lines = report_lines(&record(json!({
            "NOME": "Ana Silva",
            "EQUIPE": ["Dr. A", "Dr. B"],
            "PACIENTE_RECEBEU_HEMOTRANSFUSAO_EM_SALA": "Sim",
        })));
        assert_eq!(lines.len(), FIELDS.len());
        assert_eq!(lines[0], "DATE: ");
        assert_eq!(lines[3], "NAME: Ana Silva");
        assert_eq!(lines[16], "TEAM: Dr. A, Dr. B");
        assert_eq!(lines[17], "RECEIVED_TRANSFUSION: Yes");
    }

    #[test]
    fn multiline_values_are_flattened() {
        let lines = report_lines(&record(json!({"CIRURGIAS_REALIZADAS": "CABG\nValve"})));
        assert_eq!(lines[15], "SURGERIES_PERFORMED: CABG Valve");
    }

    #[test]
    fn two_records_make_two_pages() {
        let records = vec![
            record(json!({"_id": "1", "NOME": "Ana Silva", "HOSPITAL": "Santa Casa"})),
            record(json!({"_id": "2", "NOME": "Pedro", "IDADE_EM_ANOS": 61})),
        ];
        let pdf = export_pdf(&records).unwrap();
        assert!(pdf.starts_with(b"%PDF-1.5"));

        let pages = page_texts(&pdf);
        assert_eq!(pages.len(), 2);
        for (page, record) in pages.iter().zip(&records) {
            assert_eq!(page, &report_lines(record));
            let names: Vec<&str> = page
                .iter()
                .map(|line| line.split(": ").next().unwrap())
                .collect();
            let expected: Vec<&str> = FIELDS.iter().map(|f| f.name).collect();
            assert_eq!(names, expected);
        }
        assert_eq!(pages[1][8], "AGE_YEARS: 61");
    }

    #[test]
    fn non_latin1_characters_are_replaced() {
        let pdf = export_pdf(&[record(json!({"NOME": "João 李"}))]).unwrap();
        assert_eq!(page_texts(&pdf)[0][3], "NAME: João ?");
    }

    #[test]
    fn typographic_punctuation_uses_win_ansi_codes() {
        assert_eq!(win_ansi("a – b"), b"a \x96 b");
        assert_eq!(win_ansi("’“”€™"), b"\x92\x93\x94\x80\x99");
        assert_eq!(win_ansi("ção"), b"\xE7\xE3o");
        assert_eq!(win_ansi("x\u{0085}y\u{009D}"), b"x?y?");
        assert_eq!(win_ansi("\u{7F}\u{1}"), b"? ");
    }

    #[test]
    fn overflowing_records_continue_on_next_page() {
        let layout = ReportLayout {
            line_height: 100,
            ..ReportLayout::default()
        };
        let per_page = layout.lines_per_page();
        assert_eq!(per_page, 7);
        let pages = layout.paginate(&[record(json!({})), record(json!({}))]);
        // 20 lines -> 7 + 7 + 6 per record
        assert_eq!(pages.len(), 6);
        assert_eq!(pages[2].len(), 6);
        assert!(pages[3][0].starts_with("DATE: "));

        let pdf = layout.render(&[record(json!({}))]).unwrap();
        assert_eq!(Document::load_mem(&pdf).unwrap().get_pages().len(), 3);
    }

    #[test]
    fn default_layout_fits_a_record_on_one_page() {
        assert!(ReportLayout::default().lines_per_page() >= FIELDS.len());
    }

    #[test]
    fn empty_export_is_an_error() {
        assert!(matches!(export_pdf(&[]), Err(ReportError::Empty)));
    }
}
