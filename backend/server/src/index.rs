//! # Index
//!
//! Immutable, in-memory view of every loaded day.
//!
//! - Day number → day index, day index is lowercase username → record
//! - Both levels are ordered maps, so the day list and row tie-breaks are deterministic
//! - Built once per load, then shared read-only behind an `Arc`
use std::collections::BTreeMap;

use crate::{
    error::AppError,
    models::{Record, Row},
    utils::normalize_username,
};

pub type DayIndex = BTreeMap<String, Record>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Index {
    days: BTreeMap<u32, DayIndex>,
    day_list: Vec<u32>,
}

impl Index {
    pub fn from_days(days: BTreeMap<u32, DayIndex>) -> Self {
        let day_list = days.keys().copied().collect();

        Self { days, day_list }
    }

    /// Known day numbers, ascending.
    pub fn day_list(&self) -> &[u32] {
        &self.day_list
    }

    pub fn day(&self, day: u32) -> Option<&DayIndex> {
        self.days.get(&day)
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Every day the user appears on, oldest first.
    pub fn search(&self, username: &str) -> Result<Vec<Record>, AppError> {
        let key = normalize_username(username).ok_or(AppError::MissingQuery)?;

        Ok(self
            .days
            .iter()
            .filter_map(|(&day, records)| Some(records.get(&key)?.for_day(day)))
            .collect())
    }

    /// Rows for one day ordered by rank, unranked entries last.
    pub fn leaderboard(&self, day: u32) -> Option<Vec<Row>> {
        let records = self.days.get(&day)?;

        let mut rows: Vec<Row> = records
            .iter()
            .map(|(key, record)| Row::from_record(key, record))
            .collect();
        rows.sort_by_key(|row| (row.rank.is_none(), row.rank));

        Some(rows)
    }
}
