//! Plain-text statistics table for terminals.

use deparc_core::DependencyStats;
use std::fmt::Write as _;
use unicode_width::UnicodeWidthStr;

const HEADERS: [&str; 6] = ["Word", "POS", "Relation", "Head", "Distance", "Out-Degree"];

fn pad(cell: &str, width: usize) -> String {
    let fill = width.saturating_sub(UnicodeWidthStr::width(cell));
    format!("{cell}{}", " ".repeat(fill))
}

/// Columns are aligned by display width, so CJK words line up with ASCII ones. The last line
/// carries the TDD / n / MDD summary.
pub fn stats_text_table(stats: &DependencyStats) -> String {
    let rows: Vec<[String; 6]> = stats
        .rows
        .iter()
        .map(|r| {
            [
                r.word.clone(),
                r.pos.clone(),
                r.rel.clone(),
                r.head_word.clone(),
                r.distance_label(),
                r.out_degree.to_string(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(|h| h.width());
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(UnicodeWidthStr::width(cell.as_str()));
        }
    }

    let line = |cells: &[&str]| -> String {
        let joined = cells
            .iter()
            .zip(&widths)
            .map(|(c, w)| pad(c, *w))
            .collect::<Vec<_>>()
            .join("  ");
        joined.trim_end().to_string()
    };

    let mut out = String::new();
    let _ = writeln!(&mut out, "{}", line(&HEADERS[..]));
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let _ = writeln!(&mut out, "{}", rule.join("  "));
    for row in &rows {
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        let _ = writeln!(&mut out, "{}", line(&cells));
    }
    let _ = writeln!(
        &mut out,
        "\nTDD {}  n {}  MDD {}",
        stats.tdd,
        stats.n,
        stats.mdd_label()
    );
    out
}
