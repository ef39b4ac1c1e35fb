//! Plain-text table of normalized records in descriptor order.

use surgical_core::{NormalizedRecord, FIELDS};

/// Longest cell printed before truncation.
pub const MAX_CELL_WIDTH: usize = 24;

pub fn render_table(records: &[NormalizedRecord]) -> String {
    if records.is_empty() {
        return "(no records)".to_string();
    }

    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|record| record.columns().map(|(_, text)| cell(text)).collect())
        .collect();

    let widths: Vec<usize> = FIELDS
        .iter()
        .enumerate()
        .map(|(i, spec)| {
            rows.iter()
                .map(|row| row[i].chars().count())
                .chain(std::iter::once(spec.name.len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let header: Vec<String> = FIELDS.iter().map(|spec| spec.name.to_string()).collect();
    let mut lines = vec![format_row(&header, &widths)];
    lines.push(
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("-+-"),
    );
    lines.extend(rows.iter().map(|row| format_row(row, &widths)));
    lines.join("\n")
}

fn cell(text: &str) -> String {
    let flat: String = text
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();
    if flat.chars().count() <= MAX_CELL_WIDTH {
        return flat;
    }
    let mut cut: String = flat.chars().take(MAX_CELL_WIDTH - 3).collect();
    cut.push_str("...");
    cut
}

fn format_row(cells: &[String], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(c, w)| format!("{c:<w$}", w = *w))
        .collect::<Vec<_>>()
        .join(" | ")
        .trim_end()
        .to_string()
}

#[cfg(test)]
mod tests {
    use surgical_core::{normalize, Record};

    use super::*;

    #[test]
    fn empty_table() {
        assert_eq!(render_table(&[]), "(no records)");
    }

    #[test]
    fn header_and_rows_follow_field_order() {
        let record = normalize(
            &Record::new()
                .with("NOME", "Ana Silva")
                .with("HOSPITAL", "Santa Casa")
                .with("PACIENTE_RECEBEU_HEMOTRANSFUSAO_EM_SALA", "Sim"),
        );
        let table = render_table(&[record]);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("DATE | HOSPITAL"));
        assert!(lines[0].ends_with("BYPASS_DATA"));
        assert!(lines[2].contains("Ana Silva"));
        assert!(lines[2].contains("| Yes"));
        let hospital = lines[0].find("HOSPITAL").unwrap();
        assert_eq!(lines[2].find("Santa Casa"), Some(hospital));
    }

    #[test]
    fn long_cells_are_truncated() {
        assert_eq!(cell("short"), "short");
        let long = "x".repeat(40);
        let truncated = cell(&long);
        assert_eq!(truncated.chars().count(), MAX_CELL_WIDTH);
        assert!(truncated.ends_with("..."));
        assert_eq!(cell("a\nb"), "a b");
    }
}
