//! Branch record model

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A single branch from the published BSB directory.
///
/// Records are built in bulk by [`crate::domain::decode`] and replaced
/// wholesale by the next published snapshot; they are never edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BranchRecord {
    /// Bank-State-Branch code, `NNN-NNN`
    #[schema(example = "062-000")]
    pub bsb: String,
    /// Institution mnemonic from the directory file
    #[schema(example = "CBA")]
    pub institution_code: String,
    /// Institution name resolved through the provider table
    #[schema(example = "Commonwealth Bank")]
    pub institution_name: String,
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub postcode: String,
}
