//! Remote directory source
//!
//! The published directory lives on a file server. This module defines the
//! capability the sync pipeline needs from it (connect, list, fetch,
//! disconnect), the FTP implementation, and the pure selection of the latest
//! directory file from a listing.
//!
//! ```text
//!   RemoteSource ──connect──▶ RemoteSession ──list──▶ [RemoteFile]
//!                                   │                      │
//!                                 fetch              resolve_latest
//! ```

pub mod traits;
pub mod ftp;
pub mod resolver;

#[cfg(test)]
pub mod mock;

pub use traits::{RemoteError, RemoteSession, RemoteSource};
pub use ftp::FtpSource;
pub use resolver::{resolve_latest, FilePattern};
