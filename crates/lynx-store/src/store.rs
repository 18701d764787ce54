//! Keyed snapshot stores.
//!
//! [`SnapshotStore`] is the narrow interface the runner uses: load a
//! padded slice by key, save one under a key. [`DirStore`] keeps one
//! `<key>.txt` table per field in a directory; [`MemoryStore`] keeps
//! encoded tables in memory for tests and embedding.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use lynx_core::{FieldId, SnapshotAccess};
use lynx_space::{GridIndexing, PaddedGrid};
use tracing::{debug, info, warn};

use crate::codec::TableCodec;
use crate::error::StoreError;

fn check_key(key: &str) -> Result<(), StoreError> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidKey {
            key: key.to_string(),
        })
    }
}

/// Load and save padded slices by key.
pub trait SnapshotStore {
    /// Load the slice stored under `key`, checking it covers `indexing`.
    fn load(&self, key: &str, indexing: GridIndexing) -> Result<PaddedGrid, StoreError>;

    /// Store `grid` under `key`, replacing any previous table.
    fn save(&mut self, key: &str, grid: &PaddedGrid) -> Result<(), StoreError> {
        self.save_all(&[(key, grid)])
    }

    /// Store every `(key, grid)` pair as one unit.
    ///
    /// On failure no table has been replaced: earlier tables stay as they
    /// were before the call.
    fn save_all(&mut self, tables: &[(&str, &PaddedGrid)]) -> Result<(), StoreError>;

    /// Load every `(field, key)` pair.
    ///
    /// All tables are parsed and validated before anything is returned,
    /// so a failure on any key yields no slices at all.
    fn load_all(
        &self,
        keys: &[(FieldId, &str)],
        indexing: GridIndexing,
    ) -> Result<Vec<(FieldId, PaddedGrid)>, StoreError> {
        keys.iter()
            .map(|&(field, key)| Ok((field, self.load(key, indexing)?)))
            .collect()
    }

    /// Save the listed fields of `snapshot` through [`save_all`](Self::save_all).
    ///
    /// Fields absent from the snapshot are skipped. Every present field is
    /// checked against `indexing` before anything is written.
    fn save_snapshot(
        &mut self,
        snapshot: &dyn SnapshotAccess,
        keys: &[(FieldId, &str)],
        indexing: GridIndexing,
    ) -> Result<(), StoreError> {
        let mut grids = Vec::with_capacity(keys.len());
        for &(field, key) in keys {
            let Some(data) = snapshot.read_field(field) else {
                continue;
            };
            let grid = PaddedGrid::from_vec(indexing, data.to_vec()).map_err(|source| {
                StoreError::Slice {
                    key: key.to_string(),
                    source,
                }
            })?;
            grids.push((key, grid));
        }
        let tables: Vec<(&str, &PaddedGrid)> = grids.iter().map(|(k, g)| (*k, g)).collect();
        self.save_all(&tables)
    }
}

// ── DirStore ───────────────────────────────────────────────────────

/// One delimited text table per key under a directory.
#[derive(Clone, Debug)]
pub struct DirStore {
    dir: PathBuf,
    codec: TableCodec,
}

impl DirStore {
    /// A store rooted at `dir`. The directory is created on first save.
    pub fn new(dir: impl Into<PathBuf>, codec: TableCodec) -> Self {
        Self {
            dir: dir.into(),
            codec,
        }
    }

    /// Root directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the table for `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.txt"))
    }
}

impl SnapshotStore for DirStore {
    fn load(&self, key: &str, indexing: GridIndexing) -> Result<PaddedGrid, StoreError> {
        check_key(key)?;
        let path = self.path_for(key);
        let file = match File::open(&path) {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StoreError::Missing {
                    key: key.to_string(),
                })
            }
            Err(source) => return Err(StoreError::Io { path, source }),
        };
        let grid = self
            .codec
            .decode(BufReader::new(file), key, indexing)
            .map_err(|e| match e {
                StoreError::Io { source, .. } => StoreError::Io {
                    path: path.clone(),
                    source,
                },
                other => other,
            })?;
        info!(key, path = %path.display(), "loaded warm-start table");
        Ok(grid)
    }

    fn save_all(&mut self, tables: &[(&str, &PaddedGrid)]) -> Result<(), StoreError> {
        for &(key, _) in tables {
            check_key(key)?;
        }
        fs::create_dir_all(&self.dir).map_err(io_err(&self.dir))?;

        let mut staged = Vec::with_capacity(tables.len());
        for &(key, grid) in tables {
            match self.stage(key, grid) {
                Ok(table) => staged.push(table),
                Err(e) => {
                    discard(&staged);
                    return Err(e);
                }
            }
        }

        let mut installed = Vec::with_capacity(staged.len());
        for (i, table) in staged.iter().enumerate() {
            match table.install() {
                Ok(backup) => installed.push((table, backup)),
                Err(e) => {
                    roll_back(&installed);
                    discard(&staged[i..]);
                    return Err(e);
                }
            }
        }
        for (table, backup) in installed {
            if let Some(backup) = backup {
                if let Err(e) = fs::remove_file(&backup) {
                    warn!(path = %backup.display(), error = %e, "stale backup left behind");
                }
            }
            info!(key = table.key, path = %table.path.display(), "saved warm-start table");
        }
        Ok(())
    }
}

fn io_err(path: &Path) -> impl FnOnce(io::Error) -> StoreError {
    let path = path.to_path_buf();
    move |source| StoreError::Io { path, source }
}

/// A table written to its temp file, not yet renamed into place.
#[derive(Debug)]
struct StagedTable<'k> {
    key: &'k str,
    tmp: PathBuf,
    backup: PathBuf,
    path: PathBuf,
}

impl DirStore {
    fn stage<'k>(&self, key: &'k str, grid: &PaddedGrid) -> Result<StagedTable<'k>, StoreError> {
        let path = self.path_for(key);
        if path.is_dir() {
            return Err(StoreError::Io {
                source: io::Error::other("destination is a directory"),
                path,
            });
        }
        let tmp = self.dir.join(format!(".{key}.txt.tmp"));
        let file = File::create(&tmp).map_err(io_err(&tmp))?;
        let mut out = BufWriter::new(file);
        let written = self
            .codec
            .encode(&mut out, grid)
            .and_then(|()| out.flush());
        drop(out);
        if let Err(source) = written {
            let _ = fs::remove_file(&tmp);
            return Err(StoreError::Io { path: tmp, source });
        }
        debug!(key, path = %tmp.display(), "staged table");
        Ok(StagedTable {
            key,
            tmp,
            backup: self.dir.join(format!(".{key}.txt.bak")),
            path,
        })
    }
}

impl StagedTable<'_> {
    /// Rename the temp file over the table, moving any existing table to
    /// the backup path first. Returns the backup path if one was made.
    fn install(&self) -> Result<Option<PathBuf>, StoreError> {
        let backup = if self.path.is_file() {
            fs::rename(&self.path, &self.backup).map_err(io_err(&self.path))?;
            Some(self.backup.clone())
        } else {
            None
        };
        if let Err(source) = fs::rename(&self.tmp, &self.path) {
            if let Some(backup) = &backup {
                restore(backup, &self.path);
            }
            return Err(StoreError::Io {
                path: self.path.clone(),
                source,
            });
        }
        Ok(backup)
    }
}

fn restore(backup: &Path, path: &Path) {
    if let Err(e) = fs::rename(backup, path) {
        warn!(path = %path.display(), error = %e, "could not restore previous table");
    }
}

fn roll_back(installed: &[(&StagedTable<'_>, Option<PathBuf>)]) {
    for (table, backup) in installed.iter().rev() {
        match backup {
            Some(backup) => restore(backup, &table.path),
            None => {
                if let Err(e) = fs::remove_file(&table.path) {
                    warn!(path = %table.path.display(), error = %e, "could not remove new table");
                }
            }
        }
    }
}

fn discard(staged: &[StagedTable<'_>]) {
    for table in staged {
        let _ = fs::remove_file(&table.tmp);
    }
}

// ── MemoryStore ────────────────────────────────────────────────────

/// Encoded tables held in memory.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    codec: TableCodec,
    tables: IndexMap<String, String>,
}

impl MemoryStore {
    /// An empty store using `codec`.
    pub fn new(codec: TableCodec) -> Self {
        Self {
            codec,
            tables: IndexMap::new(),
        }
    }

    /// Insert raw table text under `key`.
    pub fn insert_text(&mut self, key: impl Into<String>, text: impl Into<String>) {
        self.tables.insert(key.into(), text.into());
    }

    /// Raw table text under `key`.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.tables.get(key).map(String::as_str)
    }

    /// Number of stored tables.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Whether no table is stored.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self, key: &str, indexing: GridIndexing) -> Result<PaddedGrid, StoreError> {
        let text = self.tables.get(key).ok_or_else(|| StoreError::Missing {
            key: key.to_string(),
        })?;
        self.codec.decode(text.as_bytes(), key, indexing)
    }

    fn save_all(&mut self, tables: &[(&str, &PaddedGrid)]) -> Result<(), StoreError> {
        for &(key, _) in tables {
            check_key(key)?;
        }
        for &(key, grid) in tables {
            let text = self.codec.encode_to_string(grid);
            debug!(key, bytes = text.len(), "stored table in memory");
            self.tables.insert(key.to_string(), text);
        }
        Ok(())
    }
}
