use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use core_sim::AssetCatalog;

#[derive(Clone, Copy, Debug, Eq, PartialEq, thiserror::Error)]
pub enum StartRunError {
    #[error("run id counter overflowed")]
    RunIdOverflow,
}

#[derive(Clone, Debug)]
pub struct AppState {
    next_run_id: Arc<AtomicU64>,
    catalog: Arc<AssetCatalog>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_catalog(AssetCatalog::standard())
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_catalog(catalog: AssetCatalog) -> Self {
        Self {
            next_run_id: Arc::new(AtomicU64::new(0)),
            catalog: Arc::new(catalog),
        }
    }

    pub fn start_run(&self) -> Result<u64, StartRunError> {
        let previous = self
            .next_run_id
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |current| {
                current.checked_add(1)
            })
            .map_err(|_| StartRunError::RunIdOverflow)?;

        Ok(previous + 1)
    }

    pub fn catalog(&self) -> &AssetCatalog {
        &self.catalog
    }

    #[cfg(test)]
    pub(crate) fn with_next_run_id_for_test(next_run_id: u64) -> Self {
        let state = Self::new();
        state.next_run_id.store(next_run_id, Ordering::Relaxed);
        state
    }
}
