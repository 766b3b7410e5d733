//! Shared fixtures for unit tests.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::io::{self, Cursor, Read, Write};
use std::rc::Rc;
use std::sync::Mutex;

use log::{Level, Log, Metadata, Record};

use crate::error::Result;
use crate::key::StorageKey;
use crate::storage::{IsolatedStorage, StorageScope};

// ============================================================================
// CapturingLogger
// ============================================================================

/// Logger that keeps every record it receives.
#[derive(Debug, Default)]
pub struct CapturingLogger {
    records: Mutex<Vec<(Level, String)>>,
}

impl CapturingLogger {
    pub fn records(&self) -> Vec<(Level, String)> {
        self.records.lock().unwrap().clone()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.records()
            .into_iter()
            .filter(|(level, _)| *level == Level::Warn)
            .map(|(_, message)| message)
            .collect()
    }
}

impl Log for CapturingLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        self.records
            .lock()
            .unwrap()
            .push((record.level(), record.args().to_string()));
    }

    fn flush(&self) {}
}

// ============================================================================
// InstrumentedStorage
// ============================================================================

/// In-memory storage that tracks how many scopes and streams are alive and
/// can be told to fail writes after a number of bytes.
#[derive(Debug, Default)]
pub struct InstrumentedStorage {
    records: Rc<RefCell<HashMap<String, Vec<u8>>>>,
    live_scopes: Cell<usize>,
    live_streams: Cell<usize>,
    fail_writes_after: Cell<Option<usize>>,
}

impl InstrumentedStorage {
    pub fn live_scopes(&self) -> usize {
        self.live_scopes.get()
    }

    pub fn live_streams(&self) -> usize {
        self.live_streams.get()
    }

    /// Make every stream created from now on fail once it has accepted
    /// `bytes` bytes.
    pub fn fail_writes_after(&self, bytes: usize) {
        self.fail_writes_after.set(Some(bytes));
    }

    pub fn put_raw(&self, key: &str, body: &[u8]) {
        self.records
            .borrow_mut()
            .insert(key.to_string(), body.to_vec());
    }

    pub fn get_raw(&self, key: &str) -> Option<Vec<u8>> {
        self.records.borrow().get(key).cloned()
    }
}

impl IsolatedStorage for InstrumentedStorage {
    fn open_scope(&self) -> Result<Box<dyn StorageScope + '_>> {
        self.live_scopes.set(self.live_scopes.get() + 1);
        Ok(Box::new(InstrumentedScope { storage: self }))
    }
}

struct InstrumentedScope<'a> {
    storage: &'a InstrumentedStorage,
}

impl Drop for InstrumentedScope<'_> {
    fn drop(&mut self) {
        // A stream outliving its scope would be a release-order bug.
        assert_eq!(self.storage.live_streams(), 0, "stream outlived its scope");
        let live = &self.storage.live_scopes;
        live.set(live.get() - 1);
    }
}

impl StorageScope for InstrumentedScope<'_> {
    fn contains(&self, key: &StorageKey) -> Result<bool> {
        Ok(self.storage.records.borrow().contains_key(key.as_str()))
    }

    fn open_read(&self, key: &StorageKey) -> Result<Option<Box<dyn Read + '_>>> {
        let Some(body) = self.storage.get_raw(key.as_str()) else {
            return Ok(None);
        };
        Ok(Some(Box::new(TrackedStream::new(
            Cursor::new(body),
            &self.storage.live_streams,
        ))))
    }

    fn create(&self, key: &StorageKey) -> Result<Box<dyn Write + '_>> {
        let sink = RecordWriter {
            key: key.as_str().to_string(),
            records: Rc::clone(&self.storage.records),
            remaining: self.storage.fail_writes_after.get(),
        };
        sink.commit(Vec::new());
        Ok(Box::new(TrackedStream::new(sink, &self.storage.live_streams)))
    }

    fn remove(&self, key: &StorageKey) -> Result<bool> {
        Ok(self
            .storage
            .records
            .borrow_mut()
            .remove(key.as_str())
            .is_some())
    }
}

/// Appends straight into the shared record map, mirroring a truncated file
/// being written in place.
struct RecordWriter {
    key: String,
    records: Rc<RefCell<HashMap<String, Vec<u8>>>>,
    remaining: Option<usize>,
}

impl RecordWriter {
    fn commit(&self, body: Vec<u8>) {
        self.records.borrow_mut().insert(self.key.clone(), body);
    }
}

impl Write for RecordWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let accepted = match self.remaining {
            Some(0) => return Err(io::Error::other("simulated write failure")),
            Some(remaining) => remaining.min(buf.len()),
            None => buf.len(),
        };
        if let Some(remaining) = self.remaining.as_mut() {
            *remaining -= accepted;
        }
        self.records
            .borrow_mut()
            .entry(self.key.clone())
            .or_default()
            .extend_from_slice(&buf[..accepted]);
        Ok(accepted)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Stream wrapper that keeps the live stream counter honest.
struct TrackedStream<'a, S> {
    inner: S,
    live: &'a Cell<usize>,
}

impl<'a, S> TrackedStream<'a, S> {
    fn new(inner: S, live: &'a Cell<usize>) -> Self {
        live.set(live.get() + 1);
        Self { inner, live }
    }
}

impl<S> Drop for TrackedStream<'_, S> {
    fn drop(&mut self) {
        self.live.set(self.live.get() - 1);
    }
}

impl<S: Read> Read for TrackedStream<'_, S> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl<S: Write> Write for TrackedStream<'_, S> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
