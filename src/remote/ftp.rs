//! FTP implementation of [`RemoteSource`]
//!
//! `suppaftp`'s `FtpStream` is blocking, so every command runs on the
//! blocking thread pool and the session is shared with those tasks behind a
//! mutex. Only the sync task ever waits on it.

use std::net::ToSocketAddrs;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use suppaftp::list::File as ListEntry;
use suppaftp::types::FileType;
use suppaftp::FtpStream;
use tracing::{debug, info, warn};

use crate::config::FtpSettings;

use super::traits::{RemoteError, RemoteFile, RemoteResult, RemoteSession, RemoteSource};

/// Anonymous-by-default FTP source
pub struct FtpSource {
    host: String,
    port: u16,
    user: String,
    password: String,
    connect_timeout: Duration,
}

impl FtpSource {
    pub fn new(settings: &FtpSettings) -> Self {
        Self {
            host: settings.host.clone(),
            port: settings.port,
            user: settings.user.clone(),
            password: settings.password.clone(),
            connect_timeout: Duration::from_secs(settings.connect_timeout_secs),
        }
    }
}

/// Run a blocking FTP command on the blocking pool
async fn run_blocking<T, F>(op: F) -> Result<T, String>
where
    F: FnOnce() -> Result<T, String> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(op)
        .await
        .map_err(|e| format!("Task join error: {}", e))?
}

#[async_trait]
impl RemoteSource for FtpSource {
    fn describe(&self) -> String {
        format!("ftp://{}:{}", self.host, self.port)
    }

    async fn connect(&self) -> RemoteResult<Box<dyn RemoteSession>> {
        let host = self.host.clone();
        let port = self.port;
        let user = self.user.clone();
        let password = self.password.clone();
        let timeout = self.connect_timeout;

        info!(host = %host, port, "Attempting connection to FTP server");

        let stream = run_blocking(move || {
            let addr = (host.as_str(), port)
                .to_socket_addrs()
                .map_err(|e| format!("{}: {}", host, e))?
                .next()
                .ok_or_else(|| format!("{} did not resolve to an address", host))?;

            let mut ftp = FtpStream::connect_timeout(addr, timeout).map_err(|e| e.to_string())?;
            ftp.login(user.as_str(), password.as_str())
                .map_err(|e| format!("login as {} rejected: {}", user, e))?;
            ftp.transfer_type(FileType::Binary).map_err(|e| e.to_string())?;
            Ok(ftp)
        })
        .await
        .map_err(RemoteError::Connect)?;

        info!("FTP connection ready");

        Ok(Box::new(FtpSession {
            stream: Arc::new(Mutex::new(stream)),
        }))
    }
}

/// Logged-in FTP control connection
struct FtpSession {
    stream: Arc<Mutex<FtpStream>>,
}

#[async_trait]
impl RemoteSession for FtpSession {
    async fn list(&mut self) -> RemoteResult<Vec<RemoteFile>> {
        let stream = self.stream.clone();
        let lines = run_blocking(move || {
            let mut ftp = stream.lock();
            ftp.list(None).map_err(|e| e.to_string())
        })
        .await
        .map_err(RemoteError::List)?;

        debug!(entries = lines.len(), "Received FTP listing");
        Ok(parse_listing(&lines))
    }

    async fn fetch(&mut self, name: &str) -> RemoteResult<Bytes> {
        let stream = self.stream.clone();
        let file_name = name.to_string();
        let buffer = run_blocking(move || {
            let mut ftp = stream.lock();
            ftp.retr_as_buffer(&file_name).map_err(|e| e.to_string())
        })
        .await
        .map_err(|message| RemoteError::Fetch {
            name: name.to_string(),
            message,
        })?;

        Ok(Bytes::from(buffer.into_inner()))
    }

    async fn disconnect(self: Box<Self>) {
        let stream = self.stream;
        let result = run_blocking(move || {
            let mut ftp = stream.lock();
            ftp.quit().map_err(|e| e.to_string())
        })
        .await;

        if let Err(e) = result {
            warn!(error = %e, "FTP QUIT failed");
        }
    }
}

/// Parse `LIST` output into descriptors, keeping regular files only
fn parse_listing(lines: &[String]) -> Vec<RemoteFile> {
    lines
        .iter()
        .filter_map(|line| match ListEntry::from_str(line) {
            Ok(entry) if entry.is_file() => Some(RemoteFile::new(
                entry.name(),
                DateTime::<Utc>::from(entry.modified()),
            )),
            Ok(_) => None,
            Err(e) => {
                debug!(line = %line, error = ?e, "Skipping unparseable listing line");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn test_parse_listing_keeps_files() {
        let lines = vec![
            "-rw-r--r--    1 ftp      ftp        2415831 Jun 01  2024 BSBDirectoryJun24-341.csv".to_string(),
            "drwxr-xr-x    2 ftp      ftp           4096 Jan 10  2023 archive".to_string(),
            "not a listing line".to_string(),
        ];

        let files = parse_listing(&lines);
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].name, "BSBDirectoryJun24-341.csv");
        assert_eq!(files[0].modified_at.year(), 2024);
    }

    #[test]
    fn test_describe() {
        let source = FtpSource::new(&crate::config::Settings::default().ftp);
        assert_eq!(source.describe(), "ftp://bsb.hostedftp.com:21");
    }
}
