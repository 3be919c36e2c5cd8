//! Domain types and the directory file codecs

mod branch;
mod decoder;
mod providers;

pub use branch::BranchRecord;
pub use decoder::{decode, DecodeError};
pub use providers::ProviderTable;
