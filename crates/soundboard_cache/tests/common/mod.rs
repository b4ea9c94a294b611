//! In-memory service doubles for sound cache tests.
//!
//! Both doubles count their calls, can be told to fail, and append to a shared
//! [`CallLog`] so tests can assert the order of remote calls.

#![allow(dead_code)]

use async_trait::async_trait;
use soundboard_cache::{SoundCache, SoundCacheConfig};
use soundboard_core::{AudioContentType, BlobKey, SoundEntry, SoundName};
use soundboard_database::{MetadataResult, MetadataService};
use soundboard_error::{BlobError, BlobOperation, MetadataError, MetadataOperation};
use soundboard_storage::{BlobResult, BlobStore};
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

/// Ordered record of remote calls across both doubles.
#[derive(Debug, Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
    fn push(&self, call: String) {
        self.0.lock().unwrap().push(call);
    }

    /// Every call so far.
    pub fn calls(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    /// Forget recorded calls.
    pub fn clear(&self) {
        self.0.lock().unwrap().clear();
    }
}

/// Metadata service holding rows in memory.
#[derive(Debug, Default)]
pub struct MockMetadataService {
    rows: Mutex<Vec<SoundEntry>>,
    log: CallLog,
    list_calls: AtomicUsize,
    insert_calls: AtomicUsize,
    delete_calls: AtomicUsize,
    fail_list: AtomicBool,
    fail_insert: AtomicBool,
    fail_delete: AtomicBool,
}

impl MockMetadataService {
    /// Empty service writing to `log`.
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            ..Self::default()
        }
    }

    /// Insert a row directly, bypassing the counters.
    pub fn seed(&self, name: &str, key: &str) {
        self.rows.lock().unwrap().push(entry(name, key));
    }

    /// Rows currently stored.
    pub fn rows(&self) -> Vec<SoundEntry> {
        self.rows.lock().unwrap().clone()
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn insert_calls(&self) -> usize {
        self.insert_calls.load(Ordering::SeqCst)
    }

    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }

    /// Make `list_sounds` fail as unreachable.
    pub fn fail_list(&self, fail: bool) {
        self.fail_list.store(fail, Ordering::SeqCst);
    }

    /// Make `insert_sound` fail as a rejected query.
    pub fn fail_insert(&self, fail: bool) {
        self.fail_insert.store(fail, Ordering::SeqCst);
    }

    /// Make `delete_sound` fail as unreachable.
    pub fn fail_delete(&self, fail: bool) {
        self.fail_delete.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl MetadataService for MockMetadataService {
    async fn list_sounds(&self) -> MetadataResult<Vec<SoundEntry>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.log.push("metadata.list".to_string());
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(MetadataError::unreachable(
                MetadataOperation::List,
                "connection refused",
            ));
        }
        Ok(self.rows())
    }

    async fn insert_sound(&self, entry: &SoundEntry) -> MetadataResult<()> {
        self.insert_calls.fetch_add(1, Ordering::SeqCst);
        self.log.push(format!("metadata.insert {}", entry.name()));
        if self.fail_insert.load(Ordering::SeqCst) {
            return Err(MetadataError::query_failed(
                MetadataOperation::Insert,
                "injected insert failure",
            ));
        }
        self.rows.lock().unwrap().push(entry.clone());
        Ok(())
    }

    async fn delete_sound(&self, name: &SoundName) -> MetadataResult<()> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        self.log.push(format!("metadata.delete {name}"));
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(MetadataError::unreachable(
                MetadataOperation::Delete,
                "connection reset",
            ));
        }
        self.rows.lock().unwrap().retain(|entry| entry.name() != name);
        Ok(())
    }
}

/// Blob store holding objects in memory.
#[derive(Debug, Default)]
pub struct MockBlobStore {
    objects: Mutex<HashMap<BlobKey, (Vec<u8>, AudioContentType)>>,
    log: CallLog,
    put_calls: AtomicUsize,
    get_calls: AtomicUsize,
    delete_calls: AtomicUsize,
    fail_put: AtomicBool,
    fail_get: AtomicBool,
    fail_delete: AtomicBool,
    panic_get: AtomicBool,
    get_delay: Mutex<Option<Duration>>,
}

impl MockBlobStore {
    /// Empty store writing to `log`.
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            ..Self::default()
        }
    }

    /// Store an object directly, bypassing the counters.
    pub fn seed(&self, key: &str, data: &[u8]) {
        self.objects.lock().unwrap().insert(
            BlobKey::new(key).unwrap(),
            (data.to_vec(), AudioContentType::Mpeg),
        );
    }

    /// Whether an object is stored under `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.objects
            .lock()
            .unwrap()
            .contains_key(&BlobKey::new(key).unwrap())
    }

    /// Content type recorded for `key`.
    pub fn content_type(&self, key: &str) -> Option<AudioContentType> {
        self.objects
            .lock()
            .unwrap()
            .get(&BlobKey::new(key).unwrap())
            .map(|(_, content_type)| *content_type)
    }

    pub fn put_calls(&self) -> usize {
        self.put_calls.load(Ordering::SeqCst)
    }

    pub fn get_calls(&self) -> usize {
        self.get_calls.load(Ordering::SeqCst)
    }

    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }

    pub fn fail_put(&self, fail: bool) {
        self.fail_put.store(fail, Ordering::SeqCst);
    }

    /// Make downloads write a partial file and then fail.
    pub fn fail_get(&self, fail: bool) {
        self.fail_get.store(fail, Ordering::SeqCst);
    }

    pub fn fail_delete(&self, fail: bool) {
        self.fail_delete.store(fail, Ordering::SeqCst);
    }

    /// Make downloads panic, as a misbehaving backend would.
    pub fn panic_get(&self, panic: bool) {
        self.panic_get.store(panic, Ordering::SeqCst);
    }

    /// Slow every download down by `delay`.
    pub fn delay_gets(&self, delay: Duration) {
        *self.get_delay.lock().unwrap() = Some(delay);
    }
}

#[async_trait]
impl BlobStore for MockBlobStore {
    async fn put(
        &self,
        key: &BlobKey,
        data: Vec<u8>,
        content_type: AudioContentType,
    ) -> BlobResult<()> {
        self.put_calls.fetch_add(1, Ordering::SeqCst);
        self.log.push(format!("blob.put {key}"));
        if self.fail_put.load(Ordering::SeqCst) {
            return Err(BlobError::unreachable(BlobOperation::Upload, "timed out"));
        }
        self.objects
            .lock()
            .unwrap()
            .insert(key.clone(), (data, content_type));
        Ok(())
    }

    async fn get_to_file(&self, key: &BlobKey, destination: &Path) -> BlobResult<()> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        self.log.push(format!("blob.get {key}"));

        let delay = *self.get_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.panic_get.load(Ordering::SeqCst) {
            panic!("blob backend panicked");
        }

        if self.fail_get.load(Ordering::SeqCst) {
            tokio::fs::write(destination, b"partial").await.unwrap();
            return Err(BlobError::failed(
                BlobOperation::Fetch,
                key.as_str(),
                "connection reset mid-transfer",
            ));
        }

        let data = self
            .objects
            .lock()
            .unwrap()
            .get(key)
            .map(|(data, _)| data.clone());
        match data {
            Some(data) => {
                tokio::fs::write(destination, data).await.unwrap();
                Ok(())
            }
            None => Err(BlobError::failed(
                BlobOperation::Fetch,
                key.as_str(),
                "blob not found",
            )),
        }
    }

    async fn delete(&self, key: &BlobKey) -> BlobResult<()> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        self.log.push(format!("blob.delete {key}"));
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(BlobError::failed(
                BlobOperation::Delete,
                key.as_str(),
                "access denied",
            ));
        }
        self.objects.lock().unwrap().remove(key);
        Ok(())
    }
}

/// A cache wired to fresh doubles in a temporary directory.
pub struct Harness {
    pub dir: TempDir,
    pub log: CallLog,
    pub metadata: Arc<MockMetadataService>,
    pub blobs: Arc<MockBlobStore>,
    pub cache: SoundCache,
}

impl Harness {
    /// Harness with the default five-minute freshness window.
    pub fn new() -> Self {
        Self::with_freshness(300)
    }

    pub fn with_freshness(freshness_secs: u64) -> Self {
        let dir = TempDir::new().unwrap();
        let log = CallLog::default();
        let metadata = Arc::new(MockMetadataService::new(log.clone()));
        let blobs = Arc::new(MockBlobStore::new(log.clone()));
        let config = SoundCacheConfig::builder()
            .dir(dir.path().join("cache"))
            .freshness_secs(freshness_secs)
            .build()
            .unwrap();
        let cache = SoundCache::new(config, metadata.clone(), blobs.clone()).unwrap();
        Self {
            dir,
            log,
            metadata,
            blobs,
            cache,
        }
    }

    /// Files in the shadow directory, including partial downloads.
    pub fn shadow_files(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self.dir.path().join("cache").join("sounds"))
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        names.sort();
        names
    }
}

pub fn entry(name: &str, key: &str) -> SoundEntry {
    SoundEntry::new(SoundName::new(name).unwrap(), BlobKey::new(key).unwrap())
}

pub fn key(key: &str) -> BlobKey {
    BlobKey::new(key).unwrap()
}
