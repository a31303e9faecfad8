//! Plain-text layout of a plan, used for printing.
//!
//! One block per chain, one group of field lines per row. Cell text is
//! flattened to a single line; notes are listed separately below the table.

use crate::core::promo::{ChainConfig, ChainPromotionRow, Month, Plan, PromoEntry};

const FIELDS: [&str; 4] = ["PKG", "COST", "SRP", "STATUS"];

fn flatten(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(" / ")
}

fn field_text(entry: &PromoEntry, field: &str) -> String {
    match field {
        "PKG" => flatten(&entry.pkg),
        "COST" => flatten(&entry.cost),
        "SRP" => flatten(&entry.srp),
        _ => entry.status.marker().map(String::from).unwrap_or_default(),
    }
}

/// Render `months` of `plan` for the configured chains, in configuration order.
pub fn render_report(chains: &[ChainConfig], plan: &Plan, months: &[Month]) -> String {
    let header: Vec<String> = ["ENTITY", "FIELD"]
        .into_iter()
        .map(String::from)
        .chain(months.iter().map(|m| m.short().to_string()))
        .collect();

    // (chain name, rows) in display order
    let blocks: Vec<(&str, &[ChainPromotionRow])> = chains
        .iter()
        .map(|c| (c.name.as_str(), plan.rows(&c.id)))
        .collect();

    let mut body: Vec<Vec<Vec<String>>> = Vec::with_capacity(blocks.len());
    for (name, rows) in &blocks {
        let mut lines = Vec::new();
        for (index, row) in rows.iter().enumerate() {
            for (f, field) in FIELDS.iter().enumerate() {
                let entity = if index == 0 && f == 0 { name.to_string() } else { String::new() };
                let mut line = vec![entity, field.to_string()];
                line.extend(months.iter().map(|m| field_text(row.entry(*m), field)));
                lines.push(line);
            }
        }
        body.push(lines);
    }

    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for line in body.iter().flatten() {
        for (w, cell) in widths.iter_mut().zip(line) {
            *w = (*w).max(cell.chars().count());
        }
    }
    let rule = "-".repeat(widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1));

    let mut out = String::new();
    out.push_str(&format_line(&header, &widths));
    out.push('\n');
    for lines in &body {
        out.push_str(&rule);
        out.push('\n');
        for line in lines {
            out.push_str(&format_line(line, &widths));
            out.push('\n');
        }
    }

    let notes = notes_section(&blocks, months);
    if !notes.is_empty() {
        out.push('\n');
        out.push_str("NOTES\n");
        for note in notes {
            out.push_str(&note);
            out.push('\n');
        }
    }
    out
}

fn format_line(cells: &[String], widths: &[usize]) -> String {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, &w)| format!("{cell:<w$}"))
        .collect();
    padded.join("  ").trim_end().to_string()
}

fn notes_section(blocks: &[(&str, &[ChainPromotionRow])], months: &[Month]) -> Vec<String> {
    let mut notes = Vec::new();
    for (name, rows) in blocks {
        for (index, row) in rows.iter().enumerate() {
            for month in months {
                let text = flatten(&row.entry(*month).notes);
                if !text.is_empty() {
                    notes.push(format!("{name} #{} {}: {text}", index + 1, month.short()));
                }
            }
        }
    }
    notes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::collaborators::SequentialIds;
    use crate::core::promo::{CellEdit, PromotionStatus, ViewRange};

    fn sample() -> (Vec<ChainConfig>, Plan) {
        let chains = vec![ChainConfig::new("motomart", "MOTOMART"), ChainConfig::new("hucks", "HUCK'S")];
        let ids = SequentialIds::new("row");
        let mut plan = Plan::fresh(&chains, &ids);
        let row = plan.rows("motomart")[0].id.clone();
        plan.update_cell("motomart", &row, Month::January, CellEdit::Pkg("Cola 2L".into()));
        plan.update_cell("motomart", &row, Month::January, CellEdit::Status(PromotionStatus::Approved));
        plan.update_cell("motomart", &row, Month::March, CellEdit::Notes("endcap\n\nBOGO".into()));
        (chains, plan)
    }

    #[test]
    fn test_header_lists_months() {
        let (chains, plan) = sample();
        let report = render_report(&chains, &plan, ViewRange::FullYear.months());
        let header = report.lines().next().unwrap();
        assert!(header.starts_with("ENTITY"));
        for month in Month::ALL {
            assert!(header.contains(month.short()));
        }
    }

    #[test]
    fn test_cells_and_markers() {
        let (chains, plan) = sample();
        let report = render_report(&chains, &plan, ViewRange::FirstHalf.months());
        let pkg_line = report.lines().find(|l| l.starts_with("MOTOMART")).unwrap();
        assert!(pkg_line.contains("PKG"));
        assert!(pkg_line.contains("Cola 2L"));
        let status_line = report.lines().find(|l| l.trim_start().starts_with("STATUS")).unwrap();
        assert!(status_line.ends_with('A'));
        assert!(report.lines().any(|l| l.starts_with("HUCK'S")));
    }

    #[test]
    fn test_notes_are_flattened() {
        let (chains, plan) = sample();
        let report = render_report(&chains, &plan, ViewRange::FullYear.months());
        assert!(report.contains("NOTES\nMOTOMART #1 MAR: endcap / BOGO\n"));
    }

    #[test]
    fn test_notes_outside_range_are_omitted() {
        let (chains, plan) = sample();
        let report = render_report(&chains, &plan, ViewRange::SecondHalf.months());
        assert!(!report.contains("NOTES"));
        assert!(!report.contains("Cola 2L"));
    }
}
