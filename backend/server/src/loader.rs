//! # Loader
//!
//! Builds an [`Index`] from a directory of day files.
//!
//! ## Files
//!
//! - Any `*.json` (case-insensitive) except `index.json`
//! - Day number is the first run of digits in the file name: `day1.json`, `day_1.json`, `day-1.json`, `1.json`
//! - Body is a JSON object of username → record
//!
//! ## Failures
//!
//! Loading never fails as a whole. A file that cannot be read or parsed is logged and skipped,
//! a file without a day number is skipped quietly. A missing directory is created and yields an
//! empty index.
//!
//! Files are processed in file name order. When two files resolve to the same day the later one
//! replaces the earlier one.
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use tracing::{debug, error, info, warn};

use crate::{
    error::LoadError,
    index::{DayIndex, Index},
    models::Record,
    utils::{day_from_filename, is_day_file, normalize},
};

#[derive(Debug)]
pub struct SkippedFile {
    pub name: String,
    pub reason: LoadError,
}

#[derive(Debug, Default)]
pub struct LoadReport {
    pub index: Index,
    pub skipped: Vec<SkippedFile>,
}

pub fn load(data_dir: &Path) -> Index {
    load_with_report(data_dir).index
}

pub fn load_with_report(data_dir: &Path) -> LoadReport {
    let mut report = LoadReport::default();

    if !data_dir.exists() {
        info!("Data directory {} not found, creating it", data_dir.display());

        if let Err(e) = fs::create_dir_all(data_dir) {
            error!("Failed to create {}: {e}", data_dir.display());
        }
        return report;
    }

    let mut days: BTreeMap<u32, DayIndex> = BTreeMap::new();

    for (name, path) in day_files(data_dir) {
        match load_day_file(&name, &path) {
            Ok((day, records)) => {
                if days.insert(day, records).is_some() {
                    warn!("{name} replaces previously loaded data for day {day}");
                }
            }
            Err(LoadError::NoDayNumber) => {
                debug!("No day number in {name}, skipping");
                report.skipped.push(SkippedFile {
                    name,
                    reason: LoadError::NoDayNumber,
                });
            }
            Err(e) => {
                warn!("Failed to read {name}: {e}");
                report.skipped.push(SkippedFile { name, reason: e });
            }
        }
    }

    report.index = Index::from_days(days);
    info!(
        "Loaded {} days from {} ({} files skipped)",
        report.index.len(),
        data_dir.display(),
        report.skipped.len()
    );

    report
}

/// Candidate day files, sorted by name.
fn day_files(data_dir: &Path) -> Vec<(String, PathBuf)> {
    let entries = match fs::read_dir(data_dir) {
        Ok(entries) => entries,
        Err(e) => {
            error!("Failed to list {}: {e}", data_dir.display());
            return Vec::new();
        }
    };

    let mut files: Vec<(String, PathBuf)> = entries
        .filter_map(|entry| {
            let entry = entry
                .map_err(|e| warn!("Failed to read entry in {}: {e}", data_dir.display()))
                .ok()?;
            let name = entry.file_name().into_string().ok()?;

            is_day_file(&name).then(|| (name, entry.path()))
        })
        .collect();
    files.sort();

    files
}

fn load_day_file(name: &str, path: &Path) -> Result<(u32, DayIndex), LoadError> {
    let day = day_from_filename(name).ok_or(LoadError::NoDayNumber)?;

    let contents = fs::read_to_string(path)?;
    let records: BTreeMap<String, Record> = serde_json::from_str(&contents)?;

    Ok((day, normalize(records)))
}

#[cfg(test)]
mod tests {
    use serde_json::Number;
    use tempfile::TempDir;

    use super::*;

    fn write(dir: &TempDir, name: &str, contents: &str) {
        fs::write(dir.path().join(name), contents).unwrap();
    }

    #[test]
    fn test_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        write(&dir, "day1.json", r#"{"Alice": {"rank": 1, "power": 100}}"#);

        let index = load(dir.path());
        let alice = &index.day(1).unwrap()["alice"];

        assert_eq!(index.day_list(), &[1]);
        assert_eq!(alice.username, None);
        assert_eq!(alice.display, "Alice");
        assert_eq!(alice.rank, Some(1));
        assert_eq!(alice.power, Some(Number::from(100u64)));
    }

    #[test]
    fn test_filename_variants() {
        let dir = tempfile::tempdir().unwrap();
        write(&dir, "day_12.json", "{}");
        write(&dir, "day-3.JSON", "{}");
        write(&dir, "7.json", "{}");

        assert_eq!(load(dir.path()).day_list(), &[3, 7, 12]);
    }

    #[test]
    fn test_excluded_files() {
        let dir = tempfile::tempdir().unwrap();
        write(&dir, "index.json", r#"{"Alice": {"rank": 1}}"#);
        write(&dir, "latest.json", r#"{"Alice": {"rank": 1}}"#);
        write(&dir, "day2.txt", r#"{"Alice": {"rank": 1}}"#);
        write(&dir, "day4.json", r#"{"Bob": {"rank": 1}}"#);

        let report = load_with_report(dir.path());

        assert_eq!(report.index.day_list(), &[4]);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].name, "latest.json");
        assert!(matches!(report.skipped[0].reason, LoadError::NoDayNumber));
    }

    #[test]
    fn test_malformed_file_skipped() {
        let dir = tempfile::tempdir().unwrap();
        write(&dir, "day1.json", "{not json");
        write(&dir, "day2.json", r#"["a", "list"]"#);
        write(&dir, "day3.json", r#"{"Carol": {"rank": 5, "power": 1}}"#);

        let report = load_with_report(dir.path());

        assert_eq!(report.index.day_list(), &[3]);
        assert_eq!(report.skipped.len(), 2);
        assert!(
            report
                .skipped
                .iter()
                .all(|s| matches!(s.reason, LoadError::Parse(_)))
        );
    }

    #[test]
    fn test_mistyped_fields_keep_the_file() {
        let dir = tempfile::tempdir().unwrap();
        write(&dir, "day1.json", r#"{"Alice": {"rank": 1}, "Bob": {"rank": 2.0}}"#);
        write(&dir, "day2.json", r#"{"Alice": {"rank": 1}, "Bob": {"rank": 2, "extra": 7}}"#);

        let report = load_with_report(dir.path());

        assert_eq!(report.index.day_list(), &[1, 2]);
        assert!(report.skipped.is_empty());

        let bob = &report.index.day(1).unwrap()["bob"];
        assert_eq!(bob.rank, None);
        assert_eq!(bob.fields["rank"], 2.0);

        let bob = &report.index.day(2).unwrap()["bob"];
        assert_eq!(bob.rank, Some(2));
        assert_eq!(bob.extra, None);
        assert_eq!(bob.fields["extra"], 7);
    }

    #[test]
    fn test_duplicate_day_last_name_wins() {
        let dir = tempfile::tempdir().unwrap();
        write(&dir, "day1.json", r#"{"Alice": {"rank": 1}}"#);
        write(&dir, "day_1.json", r#"{"Bob": {"rank": 1}}"#);

        let index = load(dir.path());
        let day = index.day(1).unwrap();

        assert!(day.contains_key("bob"));
        assert!(!day.contains_key("alice"));
    }

    #[test]
    fn test_missing_directory_created() {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = dir.path().join("nested").join("data");

        let index = load(&data_dir);

        assert!(index.is_empty());
        assert!(data_dir.is_dir());
    }

    #[test]
    fn test_mixed_case_keys_normalized() {
        let dir = tempfile::tempdir().unwrap();
        write(
            &dir,
            "day9.json",
            r#"{"ALICE": {"rank": 2, "power": 10.5, "extra": "mvp", "guild": "North"}}"#,
        );

        let index = load(dir.path());
        let alice = &index.day(9).unwrap()["alice"];

        assert_eq!(alice.display, "ALICE");
        assert_eq!(alice.extra.as_deref(), Some("mvp"));
        assert_eq!(alice.fields["guild"], "North");
    }
}
