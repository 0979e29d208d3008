use std::{collections::BTreeMap, sync::LazyLock};

use regex::Regex;
use tracing::warn;

use crate::{index::DayIndex, models::Record};

pub const RESERVED_FILE: &str = "index.json";

static DAY_DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+").expect("day pattern is valid"));

/// Data files end in `.json` in any case, except the reserved `index.json`.
pub fn is_day_file(name: &str) -> bool {
    name != RESERVED_FILE && name.to_ascii_lowercase().ends_with(".json")
}

/// Day number from the first run of digits in a file name.
///
/// Returns `None` when there is no digit run or it does not fit in a `u32`.
pub fn day_from_filename(name: &str) -> Option<u32> {
    DAY_DIGITS.find(name)?.as_str().parse().ok()
}

/// Rekey a parsed day file by lowercase username. The original spelling of
/// each key is kept as the record's display name, the record itself is left
/// as it was in the file.
pub fn normalize(records: BTreeMap<String, Record>) -> DayIndex {
    let mut day = DayIndex::new();

    for (name, mut record) in records {
        let key = name.to_lowercase();
        record.display = name.clone();

        if let Some(previous) = day.insert(key, record) {
            warn!("{name} replaces {} with the same lowercase username", previous.display);
        }
    }

    day
}

/// Trimmed, lowercased lookup key, or `None` for a blank query.
pub fn normalize_username(input: &str) -> Option<String> {
    let trimmed = input.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_lowercase())
}
