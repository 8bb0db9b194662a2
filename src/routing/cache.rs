//! Route table persistence.
//!
//! # Responsibilities
//! - Read the persisted table on startup (fast path, no discovery)
//! - Rebuild through discovery when in debug mode or when no snapshot exists
//! - Write the rebuilt table back atomically
//!
//! # Design Decisions
//! - One well-known file, no version field; schema changes mean deleting it
//! - Unreadable snapshot → rebuild; failed write → reported, table still used
//! - Writes go through a temp file + rename so readers never see partial JSON
//! - In-process writers are serialized; across processes the last rename wins

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use tempfile::NamedTempFile;
use thiserror::Error;

use super::discovery::discover;
use super::slug::SlugIndex;
use super::table::RouteTable;
use crate::config::RoutingConfig;
use crate::controller::ControllerRegistry;
use crate::observability::metrics;

static WRITE_LOCK: Mutex<()> = Mutex::new(());

/// Errors reading or writing the route snapshot.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("route cache I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("route cache at {path} is malformed: {source}")]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// The persisted route snapshot.
#[derive(Debug, Clone)]
pub struct RouteCache {
    path: PathBuf,
}

impl RouteCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    fn io_error(&self, source: io::Error) -> PersistenceError {
        PersistenceError::Io {
            path: self.path.clone(),
            source,
        }
    }

    /// Read the snapshot.
    pub fn load(&self) -> Result<RouteTable, PersistenceError> {
        let file = File::open(&self.path).map_err(|e| self.io_error(e))?;
        serde_json::from_reader(BufReader::new(file)).map_err(|source| PersistenceError::Format {
            path: self.path.clone(),
            source,
        })
    }

    /// Atomically replace the snapshot with `table`.
    pub fn store(&self, table: &RouteTable) -> Result<(), PersistenceError> {
        let _guard = WRITE_LOCK.lock().unwrap_or_else(PoisonError::into_inner);

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).map_err(|e| self.io_error(e))?;

        let mut file = NamedTempFile::new_in(dir).map_err(|e| self.io_error(e))?;
        {
            let mut writer = BufWriter::new(file.as_file_mut());
            serde_json::to_writer(&mut writer, table).map_err(|source| PersistenceError::Format {
                path: self.path.clone(),
                source,
            })?;
            writer.flush().map_err(|e| self.io_error(e))?;
        }
        file.persist(&self.path).map_err(|e| self.io_error(e.error))?;

        tracing::info!(path = %self.path.display(), routes = table.len(), "Route cache written");
        Ok(())
    }
}

/// Where a loaded table came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableSource {
    Cache,
    Discovery,
}

impl TableSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            TableSource::Cache => "cache",
            TableSource::Discovery => "discovery",
        }
    }
}

/// Result of loading the route table.
#[derive(Debug)]
pub struct LoadedRoutes {
    pub table: RouteTable,
    pub slugs: SlugIndex,
    pub source: TableSource,
    /// Outcome of writing the snapshot; always `Ok` when read from cache.
    pub persisted: Result<(), PersistenceError>,
}

/// Load the route table, rebuilding it when needed.
pub fn load_routes(config: &RoutingConfig, registry: &ControllerRegistry) -> LoadedRoutes {
    let cache = RouteCache::new(&config.cache_path);

    if !config.debug && cache.exists() {
        match cache.load() {
            Ok(mut table) => {
                let slugs = SlugIndex::build(&mut table);
                tracing::info!(path = %cache.path().display(), routes = table.len(), "Route table loaded from cache");
                metrics::record_table_build(TableSource::Cache.as_str(), table.len());
                return LoadedRoutes {
                    table,
                    slugs,
                    source: TableSource::Cache,
                    persisted: Ok(()),
                };
            }
            Err(e) => {
                tracing::warn!(error = %e, "Route cache unreadable, rebuilding");
            }
        }
    }

    let mut table = discover(registry, config.home_action.as_deref());
    let slugs = SlugIndex::build(&mut table);
    let persisted = cache.store(&table);
    if let Err(e) = &persisted {
        tracing::error!(error = %e, "Failed to persist route table; serving from memory");
    }
    metrics::record_table_build(TableSource::Discovery.as_str(), table.len());

    LoadedRoutes {
        table,
        slugs,
        source: TableSource::Discovery,
        persisted,
    }
}
