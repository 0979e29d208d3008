//! # Inspect
//!
//! Offline check of a data directory, using the same loader as the server.
//!
//! - Day count and records per day
//! - Every file the loader left out, with the reason
//! - Optionally, one day's leaderboard as a text table
//!
//! Useful before dropping new files in and hitting `/admin/reload`.
use std::path::Path;

use leaderboard::{
    loader::{LoadReport, load_with_report},
    models::Row,
};

pub fn run(data_dir: &Path, day: Option<u32>) {
    let report = load_with_report(data_dir);

    println!("{}", summary(data_dir, &report));

    if let Some(day) = day {
        match report.index.leaderboard(day) {
            Some(rows) => println!("\n{}", format_leaderboard(day, &rows)),
            None => println!("\nNo data for day {day}."),
        }
    }
}

pub fn summary(data_dir: &Path, report: &LoadReport) -> String {
    let mut lines = vec![format!(
        "Loaded Days: {} from {}",
        report.index.len(),
        data_dir.display()
    )];

    for &day in report.index.day_list() {
        let records = report.index.day(day).map_or(0, |records| records.len());
        lines.push(format!("  Day {day}: {records} records"));
    }

    if !report.skipped.is_empty() {
        lines.push(format!("Skipped Files: {}", report.skipped.len()));

        for skipped in &report.skipped {
            lines.push(format!("  {}: {}", skipped.name, skipped.reason));
        }
    }

    lines.join("\n")
}

pub fn format_leaderboard(day: u32, rows: &[Row]) -> String {
    let cells: Vec<[String; 4]> = rows
        .iter()
        .map(|row| {
            [
                row.rank.map_or_else(|| "-".to_string(), |rank| rank.to_string()),
                row.username.clone(),
                row.power
                    .as_ref()
                    .map_or_else(|| "-".to_string(), |power| power.to_string()),
                row.extra.clone(),
            ]
        })
        .collect();

    let header = ["Rank", "Username", "Power", "Extra"].map(String::from);
    let mut widths = header.clone().map(|h| h.chars().count());
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let format_line = |cells: &[String; 4]| {
        cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut lines = vec![format!("Day {day}"), format_line(&header)];
    lines.extend(cells.iter().map(format_line));

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use std::fs;

    use serde_json::Number;

    use super::*;

    fn row(username: &str, rank: Option<i64>, power: Option<u64>) -> Row {
        Row {
            username: username.to_string(),
            rank,
            power: power.map(Number::from),
            extra: String::new(),
        }
    }

    #[test]
    fn test_format_leaderboard() {
        let rows = vec![row("Alice", Some(1), Some(100)), row("Bartholomew", None, None)];

        let table = format_leaderboard(3, &rows);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines[0], "Day 3");
        assert_eq!(lines[1], "Rank  Username     Power  Extra");
        assert_eq!(lines[2], "1     Alice        100");
        assert_eq!(lines[3], "-     Bartholomew  -");
    }

    #[test]
    fn test_summary_lists_skipped_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("day1.json"), r#"{"A": {"rank": 1}, "B": {}}"#).unwrap();
        fs::write(dir.path().join("day2.json"), "oops").unwrap();
        fs::write(dir.path().join("notes.json"), "{}").unwrap();

        let report = load_with_report(dir.path());
        let text = summary(dir.path(), &report);

        assert!(text.contains("Loaded Days: 1"));
        assert!(text.contains("  Day 1: 2 records"));
        assert!(text.contains("Skipped Files: 2"));
        assert!(text.contains("  day2.json: malformed JSON"));
        assert!(text.contains("  notes.json: no day number in file name"));
    }
}
