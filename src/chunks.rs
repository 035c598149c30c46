use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::OnceCell;

use crate::{
    error::ChunkError,
    models::ViewChunk,
    views::{self, View},
};

// 1. ChunkStore Contract
/// ChunkStore
///
/// Abstract source of split view bundles. The filesystem store serves the built
/// chunks in production; the mock store keeps chunks in memory and records every
/// fetch so tests can tell eager from deferred loading.
#[async_trait]
pub trait ChunkStore: Send + Sync {
    /// Fetches the chunk called `chunk` (e.g. `"about"`).
    async fn fetch_chunk(&self, chunk: &str) -> Result<ViewChunk, ChunkError>;
}

/// ChunkState
///
/// The shared handle stored in the application state.
pub type ChunkState = Arc<dyn ChunkStore>;

/// validate_chunk_name
///
/// Chunk names become file names, so only `[A-Za-z0-9_-]` is accepted. Anything
/// else (including `..` and `/`) is rejected before the store is touched.
pub fn validate_chunk_name(chunk: &str) -> Result<(), ChunkError> {
    let valid = !chunk.is_empty()
        && chunk
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(ChunkError::InvalidName(chunk.to_string()))
    }
}

/// parse_chunk
///
/// Splits raw chunk contents into `(title, markup)`. A first line of the form
/// `<!-- title: Weekly Results -->` declares the title and is stripped.
pub fn parse_chunk(chunk: &str, contents: &str) -> (String, String) {
    let (first, rest) = contents.split_once('\n').unwrap_or((contents, ""));
    let declared = first
        .trim()
        .strip_prefix("<!--")
        .and_then(|s| s.strip_suffix("-->"))
        .and_then(|s| s.trim().strip_prefix("title:"))
        .map(|s| s.trim().to_string());

    match declared {
        Some(title) if !title.is_empty() => (title, rest.to_string()),
        _ => (views::default_title(chunk), contents.to_string()),
    }
}

// 2. The Real Implementation (built chunk directory)
/// FsChunkStore
///
/// Serves chunks from `<root>/<chunk>.html`.
#[derive(Clone, Debug)]
pub struct FsChunkStore {
    root: PathBuf,
}

impl FsChunkStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &std::path::Path {
        &self.root
    }
}

#[async_trait]
impl ChunkStore for FsChunkStore {
    async fn fetch_chunk(&self, chunk: &str) -> Result<ViewChunk, ChunkError> {
        validate_chunk_name(chunk)?;
        let path = self.root.join(format!("{chunk}.html"));

        let contents = tokio::fs::read_to_string(&path).await.map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                ChunkError::NotFound(chunk.to_string())
            } else {
                ChunkError::Io {
                    chunk: chunk.to_string(),
                    message: e.to_string(),
                }
            }
        })?;

        tracing::debug!(chunk, path = %path.display(), bytes = contents.len(), "chunk read from disk");

        let (title, markup) = parse_chunk(chunk, &contents);
        Ok(ViewChunk {
            chunk: chunk.to_string(),
            title,
            markup,
            fetched_at: Utc::now(),
        })
    }
}

// 3. The Mock Implementation (For Tests)
/// MockChunkStore
///
/// In-memory store preloaded with the five split views. Clones share the fetch
/// counters and the failure switch.
#[derive(Clone)]
pub struct MockChunkStore {
    chunks: Arc<HashMap<String, String>>,
    fetches: Arc<Mutex<HashMap<String, usize>>>,
    failing: Arc<AtomicBool>,
}

impl MockChunkStore {
    pub fn new() -> Self {
        let chunks = views::LAZY_CHUNKS
            .iter()
            .map(|chunk| {
                (
                    chunk.to_string(),
                    format!("<section class=\"{chunk}\">{}</section>\n", views::default_title(chunk)),
                )
            })
            .collect();
        Self {
            chunks: Arc::new(chunks),
            fetches: Arc::new(Mutex::new(HashMap::new())),
            failing: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn new_failing() -> Self {
        let store = Self::new();
        store.set_failing(true);
        store
    }

    /// When true, every fetch returns `ChunkError::Unavailable`.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of fetches issued for `chunk`, failed ones included.
    pub fn fetch_count(&self, chunk: &str) -> usize {
        self.fetches
            .lock()
            .map(|f| f.get(chunk).copied().unwrap_or(0))
            .unwrap_or(0)
    }

    pub fn total_fetches(&self) -> usize {
        self.fetches.lock().map(|f| f.values().sum()).unwrap_or(0)
    }
}

impl Default for MockChunkStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChunkStore for MockChunkStore {
    async fn fetch_chunk(&self, chunk: &str) -> Result<ViewChunk, ChunkError> {
        if let Ok(mut fetches) = self.fetches.lock() {
            *fetches.entry(chunk.to_string()).or_insert(0) += 1;
        }

        if self.failing.load(Ordering::SeqCst) {
            return Err(ChunkError::Unavailable(
                "Mock Chunk Error: Simulation requested".to_string(),
            ));
        }

        validate_chunk_name(chunk)?;
        let markup = self
            .chunks
            .get(chunk)
            .ok_or_else(|| ChunkError::NotFound(chunk.to_string()))?;

        Ok(ViewChunk {
            chunk: chunk.to_string(),
            title: views::default_title(chunk),
            markup: markup.clone(),
            fetched_at: Utc::now(),
        })
    }
}

// 4. Deferred Component
/// LazyComponent
///
/// A deferred loader for a split view. The first successful `load` fetches the
/// chunk and caches the view; concurrent first loads share that single fetch.
/// Failures are not cached.
#[derive(Clone, Debug)]
pub struct LazyComponent {
    chunk: String,
    cell: Arc<OnceCell<View>>,
}

impl LazyComponent {
    pub fn new(chunk: impl Into<String>) -> Self {
        Self {
            chunk: chunk.into(),
            cell: Arc::new(OnceCell::new()),
        }
    }

    pub fn chunk(&self) -> &str {
        &self.chunk
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.initialized()
    }

    /// Returns the view and whether this call performed the fetch.
    pub async fn load(&self, store: &dyn ChunkStore) -> Result<(View, bool), ChunkError> {
        let mut fetched = false;
        let flag = &mut fetched;
        let chunk = self.chunk.as_str();

        let view = self
            .cell
            .get_or_try_init(move || async move {
                *flag = true;
                tracing::info!(chunk, "fetching deferred view chunk");
                store.fetch_chunk(chunk).await.map(ViewChunk::into_view)
            })
            .await?
            .clone();

        Ok((view, fetched))
    }
}
