//! # Store
//!
//! Owns the published [`Index`] and swaps it on reload.
//!
//! - Readers clone the current `Arc<Index>` and query it without holding any lock
//! - Reload scans the directory into a fresh index first, then takes the write lock only to swap
//!   the pointer
//! - A query therefore sees the whole old index or the whole new one
//! - Reloads are serialized so the last one to start is the last one published. Readers never
//!   take the reload lock
use std::{path::PathBuf, sync::Arc};

use parking_lot::{Mutex, RwLock};
use tracing::info;

use crate::{index::Index, loader};

pub struct Store {
    data_dir: PathBuf,
    snapshot: RwLock<Arc<Index>>,
    reload_lock: Mutex<()>,
}

impl Store {
    /// Load `data_dir` and publish the result.
    pub fn open(data_dir: PathBuf) -> Self {
        let index = loader::load(&data_dir);

        Self::with_index(data_dir, index)
    }

    fn with_index(data_dir: PathBuf, index: Index) -> Self {
        Self {
            data_dir,
            snapshot: RwLock::new(Arc::new(index)),
            reload_lock: Mutex::new(()),
        }
    }

    pub fn snapshot(&self) -> Arc<Index> {
        self.snapshot.read().clone()
    }

    pub fn reload(&self) -> Vec<u32> {
        let _reloading = self.reload_lock.lock();

        let index = Arc::new(loader::load(&self.data_dir));
        let days = index.day_list().to_vec();

        *self.snapshot.write() = index;
        info!("Reloaded {} days", days.len());

        days
    }
}
