//! In-memory remote source for tests

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use super::traits::{RemoteError, RemoteFile, RemoteResult, RemoteSession, RemoteSource};

#[derive(Default)]
struct MockState {
    files: Mutex<Vec<RemoteFile>>,
    contents: Mutex<HashMap<String, Bytes>>,
    fail_connect: AtomicBool,
    fail_list: AtomicBool,
    fail_fetch: AtomicBool,
    connects: AtomicUsize,
    fetches: AtomicUsize,
    disconnects: AtomicUsize,
}

/// Remote source backed by a map of file name to contents
#[derive(Clone, Default)]
pub struct MockSource {
    state: Arc<MockState>,
}

impl MockSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish (or replace) a file on the fake server
    pub fn put(&self, name: &str, modified_at: DateTime<Utc>, contents: &[u8]) {
        let mut files = self.state.files.lock();
        files.retain(|f| f.name != name);
        files.push(RemoteFile::new(name, modified_at));
        self.state
            .contents
            .lock()
            .insert(name.to_string(), Bytes::copy_from_slice(contents));
    }

    pub fn fail_connect(&self, fail: bool) {
        self.state.fail_connect.store(fail, Ordering::SeqCst);
    }

    pub fn fail_list(&self, fail: bool) {
        self.state.fail_list.store(fail, Ordering::SeqCst);
    }

    pub fn fail_fetch(&self, fail: bool) {
        self.state.fail_fetch.store(fail, Ordering::SeqCst);
    }

    pub fn connects(&self) -> usize {
        self.state.connects.load(Ordering::SeqCst)
    }

    pub fn fetches(&self) -> usize {
        self.state.fetches.load(Ordering::SeqCst)
    }

    pub fn disconnects(&self) -> usize {
        self.state.disconnects.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RemoteSource for MockSource {
    fn describe(&self) -> String {
        "mock://directory".to_string()
    }

    async fn connect(&self) -> RemoteResult<Box<dyn RemoteSession>> {
        self.state.connects.fetch_add(1, Ordering::SeqCst);
        if self.state.fail_connect.load(Ordering::SeqCst) {
            return Err(RemoteError::Connect("connection refused".to_string()));
        }
        Ok(Box::new(MockSession {
            state: self.state.clone(),
        }))
    }
}

struct MockSession {
    state: Arc<MockState>,
}

#[async_trait]
impl RemoteSession for MockSession {
    async fn list(&mut self) -> RemoteResult<Vec<RemoteFile>> {
        if self.state.fail_list.load(Ordering::SeqCst) {
            return Err(RemoteError::List("425 can't open data connection".to_string()));
        }
        Ok(self.state.files.lock().clone())
    }

    async fn fetch(&mut self, name: &str) -> RemoteResult<Bytes> {
        self.state.fetches.fetch_add(1, Ordering::SeqCst);
        if self.state.fail_fetch.load(Ordering::SeqCst) {
            return Err(RemoteError::Fetch {
                name: name.to_string(),
                message: "transfer aborted".to_string(),
            });
        }
        self.state
            .contents
            .lock()
            .get(name)
            .cloned()
            .ok_or_else(|| RemoteError::Fetch {
                name: name.to_string(),
                message: "550 no such file".to_string(),
            })
    }

    async fn disconnect(self: Box<Self>) {
        self.state.disconnects.fetch_add(1, Ordering::SeqCst);
    }
}
