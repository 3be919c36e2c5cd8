//! Directory payload decoder
//!
//! Turns the raw comma separated directory file into [`BranchRecord`]s.
//! Columns are positional:
//!
//! ```text
//! bsb, institution code, branch name, address, city, state, postcode[, ...]
//! ```
//!
//! The published file carries trailing columns (payment flags) which are
//! ignored. Decoding is all-or-nothing: one bad row fails the whole payload.

use csv::{ReaderBuilder, Trim};
use thiserror::Error;

use super::branch::BranchRecord;
use super::providers::ProviderTable;

/// Minimum number of columns in a directory row
pub const BRANCH_COLUMNS: usize = 7;

/// Structural errors in a directory or providers payload
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Row {row}: expected at least {expected} columns, found {found}")]
    ColumnCount {
        row: usize,
        expected: usize,
        found: usize,
    },
}

/// Decode a directory payload, resolving institution names through `providers`.
///
/// Rows keep their file order. Every row must have the same number of
/// columns, and at least [`BRANCH_COLUMNS`].
pub fn decode(raw: &[u8], providers: &ProviderTable) -> Result<Vec<BranchRecord>, DecodeError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(false)
        .trim(Trim::All)
        .from_reader(raw);

    let mut records = Vec::new();
    for (index, row) in reader.records().enumerate() {
        let row = row?;
        if row.len() < BRANCH_COLUMNS {
            return Err(DecodeError::ColumnCount {
                row: index + 1,
                expected: BRANCH_COLUMNS,
                found: row.len(),
            });
        }

        let institution_code = row[1].to_string();
        records.push(BranchRecord {
            bsb: row[0].to_string(),
            institution_name: providers.resolve(&institution_code).to_string(),
            institution_code,
            name: row[2].to_string(),
            address: row[3].to_string(),
            city: row[4].to_string(),
            state: row[5].to_string(),
            postcode: row[6].to_string(),
        });
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::providers::UNKNOWN_INSTITUTION;

    fn providers() -> ProviderTable {
        [("062".to_string(), "Commonwealth Bank".to_string())]
            .into_iter()
            .collect()
    }

    #[test]
    fn test_decode_resolves_institution_name() {
        let raw = b"062-000,062,Branch A,1 Main St,Sydney,NSW,2000\n";
        let records = decode(raw, &providers()).unwrap();

        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.bsb, "062-000");
        assert_eq!(record.institution_code, "062");
        assert_eq!(record.institution_name, "Commonwealth Bank");
        assert_eq!(record.name, "Branch A");
        assert_eq!(record.address, "1 Main St");
        assert_eq!(record.city, "Sydney");
        assert_eq!(record.state, "NSW");
        assert_eq!(record.postcode, "2000");
    }

    #[test]
    fn test_decode_unknown_institution_defaults() {
        let raw = b"733-000,WBC,Branch B,2 High St,Perth,WA,6000\n";
        let records = decode(raw, &providers()).unwrap();
        assert_eq!(records[0].institution_name, UNKNOWN_INSTITUTION);
    }

    #[test]
    fn test_decode_keeps_row_count_and_order() {
        let raw = b"062-000,062,A,1 St,Sydney,NSW,2000\n\
                    062-001,062,B,2 St,Sydney,NSW,2000\n\
                    733-000,WBC,C,3 St,Perth,WA,6000\n";
        let records = decode(raw, &providers()).unwrap();
        let keys: Vec<&str> = records.iter().map(|r| r.bsb.as_str()).collect();
        assert_eq!(keys, vec!["062-000", "062-001", "733-000"]);
    }

    #[test]
    fn test_decode_ignores_trailing_columns_and_quotes() {
        let raw = b"062-000,062,\"Branch, Level 2\",1 Main St,Sydney,NSW,2000,PEH\n";
        let records = decode(raw, &providers()).unwrap();
        assert_eq!(records[0].name, "Branch, Level 2");
        assert_eq!(records[0].postcode, "2000");
    }

    #[test]
    fn test_decode_short_rows_fail() {
        let raw = b"062-000,062,Branch A,1 Main St,Sydney,NSW\n";
        let err = decode(raw, &providers()).unwrap_err();
        assert!(matches!(err, DecodeError::ColumnCount { row: 1, expected: 7, found: 6 }));
    }

    #[test]
    fn test_decode_ragged_rows_fail_whole_payload() {
        let raw = b"062-000,062,A,1 St,Sydney,NSW,2000\n\
                    062-001,062,B,2 St,Sydney,NSW,2000,extra\n";
        assert!(matches!(decode(raw, &providers()), Err(DecodeError::Csv(_))));
    }

    #[test]
    fn test_decode_empty_payload() {
        assert!(decode(b"", &providers()).unwrap().is_empty());
    }
}
