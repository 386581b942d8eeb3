//! Date range lookups

use rangeindex_core::{decode_range, DateRange};
use rusqlite::OptionalExtension;

use crate::connection::{DbError, RangeIndexDb};

impl RangeIndexDb {
    /// Range of a single identifier, `None` if it is not indexed or its row
    /// cannot be decoded
    pub fn get(&self, id: &str) -> Result<Option<DateRange>, DbError> {
        let bytes: Option<Vec<u8>> = self
            .conn
            .query_row(
                "SELECT range FROM date_ranges WHERE id = ?1",
                [id],
                |row| row.get(0),
            )
            .optional()?;

        Ok(bytes.and_then(|b| decode_range(id, &b)))
    }

    /// Call `handler` for each of `ids` that has a valid range
    pub fn for_each<I, S, F>(&self, ids: I, mut handler: F) -> Result<(), DbError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        F: FnMut(DateRange),
    {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT range FROM date_ranges WHERE id = ?1")?;

        for id in ids {
            let id = id.as_ref();
            let bytes: Option<Vec<u8>> = stmt.query_row([id], |row| row.get(0)).optional()?;
            if let Some(range) = bytes.and_then(|b| decode_range(id, &b)) {
                handler(range);
            }
        }

        Ok(())
    }

    /// Call `handler` for every valid range in the index, ordered by identifier
    pub fn for_all<F>(&self, mut handler: F) -> Result<(), DbError>
    where
        F: FnMut(DateRange),
    {
        let mut stmt = self
            .conn
            .prepare("SELECT id, range FROM date_ranges ORDER BY id")?;
        let mut rows = stmt.query([])?;

        while let Some(row) = rows.next()? {
            let id: String = row.get(0)?;
            let bytes: Vec<u8> = row.get(1)?;
            match decode_range(&id, &bytes) {
                Some(range) => handler(range),
                None => tracing::warn!(id, "skipping undecodable date range"),
            }
        }

        Ok(())
    }

    /// Every valid range in the index
    pub fn all(&self) -> Result<Vec<DateRange>, DbError> {
        let mut ranges = Vec::new();
        self.for_all(|range| ranges.push(range))?;
        Ok(ranges)
    }
}

#[cfg(test)]
mod tests {
    use crate::connection::tests::{date, write_index};
    use crate::connection::{RangeIndexDb, DB_VERSION};
    use rangeindex_core::DateRange;
    use rusqlite::Connection;

    fn open_sample(dir: &std::path::Path) -> RangeIndexDb {
        let path = dir.join("index.sqlite");
        write_index(
            &path,
            DB_VERSION,
            &[
                ("allDays", date(1), date(3)),
                ("singleDay", date(2), date(2)),
            ],
        );
        // A row that does not decode
        Connection::open(&path)
            .unwrap()
            .execute(
                "INSERT INTO date_ranges (id, range) VALUES ('broken', x'0102')",
                [],
            )
            .unwrap();
        RangeIndexDb::open(&path).unwrap()
    }

    #[test]
    fn test_get() {
        let tmp = tempfile::tempdir().unwrap();
        let db = open_sample(tmp.path());

        assert_eq!(
            db.get("allDays").unwrap(),
            Some(DateRange::new("allDays", date(1), date(3)))
        );
        assert_eq!(db.get("missing").unwrap(), None);
        assert_eq!(db.get("broken").unwrap(), None);
    }

    #[test]
    fn test_for_each_skips_unknown() {
        let tmp = tempfile::tempdir().unwrap();
        let db = open_sample(tmp.path());

        let mut found = Vec::new();
        db.for_each(["singleDay", "missing", "broken", "allDays"], |r| {
            found.push(r.id().to_string())
        })
        .unwrap();
        assert_eq!(found, vec!["singleDay", "allDays"]);
    }

    #[test]
    fn test_for_all() {
        let tmp = tempfile::tempdir().unwrap();
        let db = open_sample(tmp.path());

        assert_eq!(
            db.all().unwrap(),
            vec![
                DateRange::new("allDays", date(1), date(3)),
                DateRange::new("singleDay", date(2), date(2)),
            ]
        );
    }
}
