//! Process-lifetime rule table with whole-table reload.
//!
//! Evaluations take a [`RuleStore::snapshot`] and keep it for the duration of
//! one check. A reload replaces the table under a short write lock, so a
//! check sees either the old table or the new one, never a mix.
//!
//! [`RuleStore::watch`] adds a [`notify`] file watcher that reloads the table
//! when the config file changes.

use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock, Weak};

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{debug, info, warn};

use crate::config::{self, ConfigError};
use crate::policy::RuleTable;

/// Shared, atomically replaceable rule table.
pub struct RuleStore {
    current: RwLock<Arc<RuleTable>>,
    /// Config file backing this store, if any.
    path: Option<PathBuf>,
    /// File watcher handle (kept alive to maintain notifications).
    _watcher: Option<RecommendedWatcher>,
}

impl std::fmt::Debug for RuleStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleStore")
            .field("path", &self.path)
            .field("rule_count", &self.snapshot().len())
            .field("watching", &self._watcher.is_some())
            .finish()
    }
}

impl RuleStore {
    /// A store holding `table`, not backed by any file.
    pub fn in_memory(table: RuleTable) -> Self {
        Self {
            current: RwLock::new(Arc::new(table)),
            path: None,
            _watcher: None,
        }
    }

    /// Load the config at `path` (falling back to defaults) without watching it.
    ///
    /// # Errors
    ///
    /// Returns an error only if the fallback config cannot be written.
    pub fn open(path: &Path) -> Result<Self, ConfigError> {
        let config = config::load_or_init(path)?;
        let table = config.rule_table();
        info!(path = %path.display(), rules = table.len(), "rule table loaded");
        Ok(Self {
            current: RwLock::new(Arc::new(table)),
            path: Some(path.to_path_buf()),
            _watcher: None,
        })
    }

    /// Like [`RuleStore::open`], then reload automatically whenever the file
    /// changes on disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be initialised or the watcher
    /// cannot be started.
    pub fn watch(path: &Path) -> anyhow::Result<Arc<Self>> {
        let config = config::load_or_init(path)?;
        let table = config.rule_table();
        let (tx, rx) = std::sync::mpsc::channel();

        let mut watcher =
            notify::recommended_watcher(move |event: notify::Result<notify::Event>| {
                if let Ok(evt) = event {
                    if evt.kind.is_access() {
                        return;
                    }
                    for changed in evt.paths {
                        if let Err(e) = tx.send(changed) {
                            warn!(error = %e, "failed to send watcher event");
                        }
                    }
                }
            })?;

        // Watch the directory: editors often replace the file instead of
        // writing it in place.
        let dir = watch_dir(path);
        watcher.watch(&dir, RecursiveMode::NonRecursive)?;

        let store = Arc::new(Self {
            current: RwLock::new(Arc::new(table)),
            path: Some(path.to_path_buf()),
            _watcher: Some(watcher),
        });

        // The thread holds a `Weak`: dropping the last `Arc` drops the watcher
        // and its sender, which ends `recv` and the thread.
        let store_for_thread: Weak<Self> = Arc::downgrade(&store);
        let file_name = path.file_name().map(ToOwned::to_owned);
        std::thread::spawn(move || {
            while let Ok(changed) = rx.recv() {
                if changed.file_name().map(ToOwned::to_owned) != file_name {
                    continue;
                }
                if !changed.exists() {
                    debug!(path = %changed.display(), "config removed, keeping current rules");
                    continue;
                }
                let Some(store) = store_for_thread.upgrade() else {
                    break;
                };
                if let Err(e) = store.reload() {
                    warn!(error = %e, "config reload failed, keeping current rules");
                }
            }
        });

        info!(
            path = %path.display(),
            rules = store.snapshot().len(),
            "rule table loaded, watching for changes"
        );
        Ok(store)
    }

    /// The table in force right now.
    pub fn snapshot(&self) -> Arc<RuleTable> {
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Swap in a new table.
    pub fn replace(&self, table: RuleTable) {
        let table = Arc::new(table);
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *guard = table;
    }

    /// Re-read the backing config file and swap in its table.
    ///
    /// A store without a backing file keeps its table and reports success.
    ///
    /// # Errors
    ///
    /// Returns the [`ConfigError`] if the file is unreadable or invalid; the
    /// current table stays in force. A file that needed migration is written
    /// back in its migrated form.
    pub fn reload(&self) -> Result<(), ConfigError> {
        let Some(path) = self.path.as_deref() else {
            return Ok(());
        };
        let (config, migration) = config::load_config_with_migration(path)?;
        if migration.is_some() {
            config::save_config(path, &config)?;
        }
        let table = config.rule_table();
        let rules = table.len();
        self.replace(table);
        info!(path = %path.display(), rules, "rule table reloaded");
        Ok(())
    }

    /// Config file backing this store.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

fn watch_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
