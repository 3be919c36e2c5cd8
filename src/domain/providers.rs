//! Institution code to name table
//!
//! Loaded once at startup from a two column side file (`code,name`) and
//! shared read-only with the decoder for the rest of the process lifetime.

use std::collections::HashMap;

use csv::{ReaderBuilder, Trim};

use super::decoder::DecodeError;

/// Name used when an institution code is absent from the table
pub const UNKNOWN_INSTITUTION: &str = "Unknown Bank";

/// Read-only mapping from institution code to institution name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderTable {
    names: HashMap<String, String>,
}

impl ProviderTable {
    /// Parse the providers payload.
    ///
    /// Every row needs at least a code and a name; a repeated code keeps the
    /// name from its last row.
    pub fn load(raw: &[u8]) -> Result<Self, DecodeError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(raw);

        let mut names = HashMap::new();
        for (index, row) in reader.records().enumerate() {
            let row = row?;
            if row.len() < 2 {
                return Err(DecodeError::ColumnCount {
                    row: index + 1,
                    expected: 2,
                    found: row.len(),
                });
            }
            names.insert(row[0].to_string(), row[1].to_string());
        }

        Ok(Self { names })
    }

    /// Name for `code`, if the table knows it
    pub fn get(&self, code: &str) -> Option<&str> {
        self.names.get(code).map(String::as_str)
    }

    /// Name for `code`, falling back to [`UNKNOWN_INSTITUTION`]
    pub fn resolve(&self, code: &str) -> &str {
        self.get(code).unwrap_or(UNKNOWN_INSTITUTION)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl FromIterator<(String, String)> for ProviderTable {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().collect(),
        }
    }
}
