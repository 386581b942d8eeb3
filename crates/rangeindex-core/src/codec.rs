//! Binary encoding of a date range as stored in the index
//!
//! Layout (big-endian): `from` year `i32`, month `u8`, day `u8`, then the
//! same three fields for `to`.

use chrono::{Datelike, NaiveDate};

use crate::types::DateRange;

/// Size in bytes of an encoded range
pub const ENCODED_RANGE_LEN: usize = 12;

/// Encode the bounds of a range
pub fn encode_range(from: NaiveDate, to: NaiveDate) -> [u8; ENCODED_RANGE_LEN] {
    let mut buf = [0u8; ENCODED_RANGE_LEN];
    write_date(&mut buf[0..6], from);
    write_date(&mut buf[6..12], to);
    buf
}

/// Decode a stored range for `id`.
///
/// Returns `None` when the value is too short or holds an invalid date.
/// Trailing bytes beyond [`ENCODED_RANGE_LEN`] are ignored.
pub fn decode_range(id: &str, bytes: &[u8]) -> Option<DateRange> {
    if bytes.len() < ENCODED_RANGE_LEN {
        return None;
    }

    let from = read_date(&bytes[0..6])?;
    let to = read_date(&bytes[6..12])?;
    Some(DateRange::new(id, from, to))
}

fn write_date(buf: &mut [u8], date: NaiveDate) {
    buf[0..4].copy_from_slice(&date.year().to_be_bytes());
    buf[4] = date.month() as u8;
    buf[5] = date.day() as u8;
}

fn read_date(buf: &[u8]) -> Option<NaiveDate> {
    let year = i32::from_be_bytes([buf[0], buf[1], buf[2], buf[3]]);
    NaiveDate::from_ymd_opt(year, u32::from(buf[4]), u32::from(buf[5]))
}
