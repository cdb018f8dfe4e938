//! Task document store.
//!
//! The [`TaskStore`] owns every persisted task. It assigns identifiers and
//! creation timestamps, serializes access behind a single [`RwLock`], and
//! optionally mirrors the collection to a snapshot file so tasks survive
//! restarts. Mutations are visible to the caller as soon as the call
//! returns; for file-backed stores that includes the snapshot write.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use taskboard_proto::schema::{NewTask, TaskChanges};
use taskboard_proto::task::{Task, TaskId, truncate_to_millis};
use tokio::sync::RwLock;

/// Snapshot format version written at the head of the file.
const SNAPSHOT_VERSION: u32 = 1;

/// Errors raised by the store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No task with the given id.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// The connection string names a backend this build does not have.
    #[error("unsupported store url {0:?} (expected memory:// or file://<path>)")]
    UnsupportedUrl(String),

    /// The snapshot file exists but could not be read.
    #[error("failed to open store {path}: {source}")]
    Open {
        /// Snapshot path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The snapshot file could not be decoded.
    #[error("store {path} is corrupt: {source}")]
    Corrupt {
        /// Snapshot path.
        path: PathBuf,
        /// Decode error.
        source: postcard::Error,
    },

    /// The snapshot was written by an incompatible version.
    #[error("store {path} has snapshot version {found}, expected {SNAPSHOT_VERSION}")]
    UnsupportedVersion {
        /// Snapshot path.
        path: PathBuf,
        /// Version found in the file.
        found: u32,
    },

    /// Writing the snapshot failed; the mutation was rolled back.
    #[error("failed to persist store {path}: {source}")]
    Persist {
        /// Snapshot path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The collection could not be encoded.
    #[error("failed to encode store snapshot: {0}")]
    Encode(#[from] postcard::Error),
}

/// Where the store keeps its documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    /// Volatile, lost on shutdown.
    Memory,
    /// Snapshot file rewritten after every mutation.
    File(PathBuf),
}

impl StoreLocation {
    /// Parses a store connection string.
    ///
    /// Accepts `memory://`, `file://<path>`, or a bare filesystem path.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::UnsupportedUrl`] for any other scheme or an
    /// empty path.
    pub fn parse(url: &str) -> Result<Self, StoreError> {
        let url = url.trim();
        if url == "memory" || url == "memory://" {
            return Ok(Self::Memory);
        }
        let path = match url.split_once("://") {
            Some(("file", path)) => path,
            Some(_) => return Err(StoreError::UnsupportedUrl(url.to_string())),
            None => url,
        };
        if path.is_empty() {
            return Err(StoreError::UnsupportedUrl(url.to_string()));
        }
        Ok(Self::File(PathBuf::from(path)))
    }
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
struct Snapshot {
    version: u32,
    tasks: Vec<Task>,
}

/// The collection plus the creation clock.
#[derive(Debug, Clone, Default)]
struct Documents {
    /// Insertion order; `created_at` is strictly increasing along it.
    tasks: Vec<Task>,
    last_created_at: Option<DateTime<Utc>>,
}

impl Documents {
    fn from_tasks(mut tasks: Vec<Task>) -> Self {
        tasks.sort_by_key(|t| t.created_at);
        let last_created_at = tasks.last().map(|t| t.created_at);
        Self {
            tasks,
            last_created_at,
        }
    }

    /// Hands out a creation instant later than every previous one.
    fn next_created_at(&mut self) -> DateTime<Utc> {
        let now = truncate_to_millis(Utc::now());
        let at = match self.last_created_at {
            Some(last) if now <= last => last + Duration::milliseconds(1),
            _ => now,
        };
        self.last_created_at = Some(at);
        at
    }

    fn insert(&mut self, new: NewTask) -> Task {
        let task = Task {
            id: TaskId::new(),
            title: new.title,
            description: new.description,
            status: new.status,
            priority: new.priority,
            due_date: new.due_date,
            created_at: self.next_created_at(),
        };
        self.tasks.push(task.clone());
        task
    }

    fn position(&self, id: &TaskId) -> Result<usize, StoreError> {
        self.tasks
            .iter()
            .position(|t| &t.id == id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }
}

/// Persisted task collection.
pub struct TaskStore {
    docs: RwLock<Documents>,
    snapshot: Option<PathBuf>,
}

impl TaskStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            docs: RwLock::new(Documents::default()),
            snapshot: None,
        }
    }

    /// Opens the store named by a connection string.
    ///
    /// # Errors
    ///
    /// See [`StoreLocation::parse`] and [`TaskStore::open_location`].
    pub async fn open(url: &str) -> Result<Self, StoreError> {
        Self::open_location(StoreLocation::parse(url)?).await
    }

    /// Opens a store at `location`, loading an existing snapshot if present.
    ///
    /// A missing snapshot file is an empty store; it is created on the first
    /// mutation.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Open`] if the snapshot exists but cannot be read,
    /// [`StoreError::Corrupt`] if it cannot be decoded, or
    /// [`StoreError::UnsupportedVersion`] if it has a different format version.
    pub async fn open_location(location: StoreLocation) -> Result<Self, StoreError> {
        let path = match location {
            StoreLocation::Memory => return Ok(Self::in_memory()),
            StoreLocation::File(path) => path,
        };

        let docs = match tokio::fs::read(&path).await {
            Ok(bytes) => {
                let snapshot: Snapshot =
                    postcard::from_bytes(&bytes).map_err(|source| StoreError::Corrupt {
                        path: path.clone(),
                        source,
                    })?;
                if snapshot.version != SNAPSHOT_VERSION {
                    return Err(StoreError::UnsupportedVersion {
                        path,
                        found: snapshot.version,
                    });
                }
                Documents::from_tasks(snapshot.tasks)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Documents::default(),
            Err(source) => return Err(StoreError::Open { path, source }),
        };

        tracing::info!(path = %path.display(), tasks = docs.tasks.len(), "task store opened");

        Ok(Self {
            docs: RwLock::new(docs),
            snapshot: Some(path),
        })
    }

    /// Returns the snapshot path, if this store is file-backed.
    #[must_use]
    pub fn snapshot_path(&self) -> Option<&Path> {
        self.snapshot.as_deref()
    }

    /// All tasks, newest `created_at` first.
    pub async fn list(&self) -> Vec<Task> {
        let docs = self.docs.read().await;
        docs.tasks.iter().rev().cloned().collect()
    }

    /// A single task by id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no task has this id.
    pub async fn get(&self, id: &TaskId) -> Result<Task, StoreError> {
        let docs = self.docs.read().await;
        let index = docs.position(id)?;
        Ok(docs.tasks[index].clone())
    }

    /// Number of stored tasks.
    pub async fn count(&self) -> usize {
        self.docs.read().await.tasks.len()
    }

    /// Inserts a validated task, assigning its id and creation time.
    ///
    /// # Errors
    ///
    /// Returns a persistence error for file-backed stores.
    pub async fn insert(&self, new: NewTask) -> Result<Task, StoreError> {
        self.mutate(|docs| Ok(docs.insert(new))).await
    }

    /// Inserts `batch` only if the store is empty, under a single lock hold.
    ///
    /// Returns `None` without side effects when the store already has tasks.
    ///
    /// # Errors
    ///
    /// Returns a persistence error for file-backed stores.
    pub async fn insert_if_empty(
        &self,
        batch: Vec<NewTask>,
    ) -> Result<Option<Vec<Task>>, StoreError> {
        self.mutate(|docs| {
            if !docs.tasks.is_empty() {
                return Ok(None);
            }
            Ok(Some(batch.into_iter().map(|new| docs.insert(new)).collect()))
        })
        .await
    }

    /// Merges `changes` into the task with this id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no task has this id, or a
    /// persistence error for file-backed stores.
    pub async fn update(&self, id: &TaskId, changes: &TaskChanges) -> Result<Task, StoreError> {
        self.mutate(|docs| {
            let index = docs.position(id)?;
            let task = &mut docs.tasks[index];
            changes.apply(task);
            Ok(task.clone())
        })
        .await
    }

    /// Removes the task with this id and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no task has this id, or a
    /// persistence error for file-backed stores.
    pub async fn delete(&self, id: &TaskId) -> Result<Task, StoreError> {
        self.mutate(|docs| {
            let index = docs.position(id)?;
            Ok(docs.tasks.remove(index))
        })
        .await
    }

    /// Flushes the snapshot (file-backed stores) and releases the store.
    ///
    /// # Errors
    ///
    /// Returns a persistence error if the final snapshot write fails.
    pub async fn close(self) -> Result<(), StoreError> {
        let docs = self.docs.into_inner();
        if let Some(path) = &self.snapshot {
            write_snapshot(path, &docs.tasks).await?;
            tracing::info!(path = %path.display(), tasks = docs.tasks.len(), "task store closed");
        }
        Ok(())
    }

    /// Applies `f` under the write lock. For file-backed stores the change
    /// is applied to a copy and only committed once the snapshot is written.
    async fn mutate<R>(
        &self,
        f: impl FnOnce(&mut Documents) -> Result<R, StoreError>,
    ) -> Result<R, StoreError> {
        let mut docs = self.docs.write().await;
        let Some(path) = &self.snapshot else {
            return f(&mut *docs);
        };

        let mut next = docs.clone();
        let out = f(&mut next)?;
        write_snapshot(path, &next.tasks).await?;
        *docs = next;
        drop(docs);
        Ok(out)
    }
}

impl Default for TaskStore {
    fn default() -> Self {
        Self::in_memory()
    }
}

/// Writes the snapshot to a sibling temp file, then renames it into place.
async fn write_snapshot(path: &Path, tasks: &[Task]) -> Result<(), StoreError> {
    let snapshot = Snapshot {
        version: SNAPSHOT_VERSION,
        tasks: tasks.to_vec(),
    };
    let bytes = postcard::to_allocvec(&snapshot)?;
    let tmp = path.with_extension("tmp");
    let persist_err = |source| StoreError::Persist {
        path: path.to_path_buf(),
        source,
    };

    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(dir).await.map_err(persist_err)?;
    }
    tokio::fs::write(&tmp, &bytes).await.map_err(persist_err)?;
    tokio::fs::rename(&tmp, path).await.map_err(persist_err)?;
    tracing::debug!(path = %path.display(), tasks = tasks.len(), "snapshot written");
    Ok(())
}
