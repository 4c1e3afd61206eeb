//! Durable key-value storage
//!
//! Every read and write of persisted client state goes through
//! [`DurableStorage`]. Natively the data lives in a JSON file, in the browser it
//! lives in `localStorage`, and tests use [`MemoryStorage`].

use std::{
    collections::BTreeMap,
    fmt::Debug,
    sync::{Mutex, PoisonError},
};

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStorage;
#[cfg(target_arch = "wasm32")]
pub use web::LocalStorage;

/// Page scoped key-value storage that survives restarts
///
/// Writes are independent of each other, there are no transactions
pub trait DurableStorage: Debug + Send + Sync {
    fn get_item(&self, key: &str) -> anyhow::Result<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> anyhow::Result<()>;
    fn remove_item(&self, key: &str) -> anyhow::Result<()>;
}

/// Keeps everything in memory, nothing survives the process
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: Mutex<BTreeMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with the given entries already present
    pub fn with_items<I, K, V>(items: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            items: Mutex::new(
                items
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(key)
    }
}

impl DurableStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(self
            .items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> anyhow::Result<()> {
        self.items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> anyhow::Result<()> {
        self.items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod file {
    use super::*;
    use anyhow::Context as _;
    use std::path::{Path, PathBuf};
    use tracing::{info, warn};

    /// Stores all entries as a single JSON object in one file
    ///
    /// The whole file is rewritten on every change
    #[derive(Debug)]
    pub struct FileStorage {
        path: PathBuf,
        items: Mutex<BTreeMap<String, String>>,
    }

    impl FileStorage {
        /// Loads the existing entries if the file exists. A file that cannot be
        /// parsed is treated as empty and will be overwritten on the next write.
        #[tracing::instrument]
        pub fn open<P: AsRef<Path> + Debug>(path: P) -> anyhow::Result<Self> {
            let path = path.as_ref().to_path_buf();
            let items = match std::fs::read_to_string(&path) {
                Ok(contents) => match serde_json::from_str(&contents) {
                    Ok(items) => items,
                    Err(err) => {
                        warn!(?err, ?path, "storage file is not valid, starting empty");
                        BTreeMap::new()
                    }
                },
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                    info!(?path, "no storage file found, starting empty");
                    BTreeMap::new()
                }
                Err(err) => {
                    return Err(err)
                        .with_context(|| format!("failed to read storage file: {path:?}"))
                }
            };
            Ok(Self {
                path,
                items: Mutex::new(items),
            })
        }

        pub fn path(&self) -> &Path {
            &self.path
        }

        fn persist(&self, items: &BTreeMap<String, String>) -> anyhow::Result<()> {
            if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create folder: {parent:?}"))?;
            }
            let contents =
                serde_json::to_string_pretty(items).context("failed to serialize storage")?;
            let tmp_path = self.path.with_extension("tmp");
            std::fs::write(&tmp_path, contents)
                .with_context(|| format!("failed to write storage file: {tmp_path:?}"))?;
            std::fs::rename(&tmp_path, &self.path)
                .with_context(|| format!("failed to replace storage file: {:?}", self.path))
        }
    }

    impl DurableStorage for FileStorage {
        fn get_item(&self, key: &str) -> anyhow::Result<Option<String>> {
            Ok(self
                .items
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .get(key)
                .cloned())
        }

        fn set_item(&self, key: &str, value: &str) -> anyhow::Result<()> {
            let mut items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
            items.insert(key.to_string(), value.to_string());
            self.persist(&items)
        }

        fn remove_item(&self, key: &str) -> anyhow::Result<()> {
            let mut items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
            if items.remove(key).is_some() {
                self.persist(&items)?;
            }
            Ok(())
        }
    }
}

#[cfg(target_arch = "wasm32")]
mod web {
    use super::*;
    use anyhow::{anyhow, Context as _};

    /// The browser's `localStorage` for the current origin
    ///
    /// Looked up on every call so the type stays `Send`
    #[derive(Debug, Default, Clone, Copy)]
    pub struct LocalStorage;

    impl LocalStorage {
        fn storage() -> anyhow::Result<web_sys::Storage> {
            web_sys::window()
                .context("no window found")?
                .local_storage()
                .map_err(|e| anyhow!("failed to access local storage: {e:?}"))?
                .context("local storage not available")
        }
    }

    impl DurableStorage for LocalStorage {
        fn get_item(&self, key: &str) -> anyhow::Result<Option<String>> {
            Self::storage()?
                .get_item(key)
                .map_err(|e| anyhow!("failed to read {key:?}: {e:?}"))
        }

        fn set_item(&self, key: &str, value: &str) -> anyhow::Result<()> {
            Self::storage()?
                .set_item(key, value)
                .map_err(|e| anyhow!("failed to write {key:?}: {e:?}"))
        }

        fn remove_item(&self, key: &str) -> anyhow::Result<()> {
            Self::storage()?
                .remove_item(key)
                .map_err(|e| anyhow!("failed to remove {key:?}: {e:?}"))
        }
    }
}
