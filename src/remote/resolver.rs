//! Selection of the latest directory file from a listing

use super::traits::RemoteFile;

/// Name filter for directory files: the name must contain `infix` and end
/// with `extension`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePattern {
    pub infix: String,
    pub extension: String,
}

impl FilePattern {
    pub fn new(infix: &str, extension: &str) -> Self {
        Self {
            infix: infix.to_string(),
            extension: extension.to_string(),
        }
    }

    pub fn matches(&self, name: &str) -> bool {
        name.contains(&self.infix) && name.ends_with(&self.extension)
    }
}

impl std::fmt::Display for FilePattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "*{}*{}", self.infix, self.extension)
    }
}

/// Pick the most recently modified file matching `pattern`.
///
/// Candidates are stable-sorted by modification time, newest first, and the
/// first one wins; among files sharing the newest timestamp that is the one
/// listed earliest.
pub fn resolve_latest<'a>(files: &'a [RemoteFile], pattern: &FilePattern) -> Option<&'a RemoteFile> {
    let mut candidates: Vec<&RemoteFile> = files
        .iter()
        .filter(|f| pattern.matches(&f.name))
        .collect();

    candidates.sort_by(|a, b| b.modified_at.cmp(&a.modified_at));
    candidates.into_iter().next()
}
