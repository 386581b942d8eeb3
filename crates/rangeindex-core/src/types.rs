//! Core type definitions for date ranges and partition dates

use chrono::NaiveDate;

/// Textual format of a partition directory name (ISO calendar date)
pub const PARTITION_DATE_FORMAT: &str = "%Y-%m-%d";

/// Inclusive range of dates over which an identifier was observed.
///
/// Always satisfies `from <= to`. Values are replaced rather than mutated:
/// widening a range produces a new `DateRange`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DateRange {
    id: String,
    from: NaiveDate,
    to: NaiveDate,
}

impl DateRange {
    /// Create a range, swapping the bounds if they are given out of order
    pub fn new(id: impl Into<String>, from: NaiveDate, to: NaiveDate) -> Self {
        let (from, to) = if from <= to { (from, to) } else { (to, from) };
        Self {
            id: id.into(),
            from,
            to,
        }
    }

    /// Range covering a single date
    pub fn single(id: impl Into<String>, date: NaiveDate) -> Self {
        Self::new(id, date, date)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn from(&self) -> NaiveDate {
        self.from
    }

    pub fn to(&self) -> NaiveDate {
        self.to
    }

    /// Whether `date` falls inside the range (both ends inclusive)
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }

    /// Return a range widened to include `date`
    pub fn extended(&self, date: NaiveDate) -> Self {
        Self {
            id: self.id.clone(),
            from: self.from.min(date),
            to: self.to.max(date),
        }
    }

    /// Number of calendar days covered, counting both ends
    pub fn days(&self) -> i64 {
        (self.to - self.from).num_days() + 1
    }
}

/// Parse a partition name into its date.
///
/// Only zero-padded `YYYY-MM-DD` names are accepted; anything else
/// (including names with suffixes such as `2023-01-01.bak`) yields `None`.
pub fn parse_partition_date(name: &str) -> Option<NaiveDate> {
    if name.len() != 10 {
        return None;
    }

    let date = NaiveDate::parse_from_str(name, PARTITION_DATE_FORMAT).ok()?;
    if format_partition_date(date) != name {
        return None;
    }

    Some(date)
}

/// Format a date as a partition name
pub fn format_partition_date(date: NaiveDate) -> String {
    date.format(PARTITION_DATE_FORMAT).to_string()
}
