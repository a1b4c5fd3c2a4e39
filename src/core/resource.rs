//! Lazily-initialized, process-shared heavy resources.

use std::sync::{Arc, Mutex, OnceLock};

use crate::core::RiskError;

type Loader<T> = Box<dyn Fn() -> Result<T, RiskError> + Send + Sync>;

/// A value built on first use and then shared for the life of the holder.
///
/// Initialization is double-checked: the fast path is a lock-free read of the
/// `OnceLock`; the slow path takes a mutex and re-checks before running the
/// loader, so concurrent first use runs the loader exactly once. A failed load
/// is not cached and the next caller tries again.
pub struct SharedResource<T> {
    name: &'static str,
    cell: OnceLock<Arc<T>>,
    init: Mutex<()>,
    loader: Loader<T>,
}

impl<T> SharedResource<T> {
    /// Creates an empty holder; `loader` runs on the first [`get`](Self::get).
    pub fn new<F>(name: &'static str, loader: F) -> Self
    where
        F: Fn() -> Result<T, RiskError> + Send + Sync + 'static,
    {
        Self {
            name,
            cell: OnceLock::new(),
            init: Mutex::new(()),
            loader: Box::new(loader),
        }
    }

    /// Returns the shared value, loading it first if needed.
    ///
    /// # Errors
    ///
    /// Propagates the loader's error.
    pub fn get(&self) -> Result<Arc<T>, RiskError> {
        if let Some(v) = self.cell.get() {
            return Ok(v.clone());
        }

        // A poisoned lock only means another loader panicked; the cell is still consistent.
        let _guard = self
            .init
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if let Some(v) = self.cell.get() {
            return Ok(v.clone());
        }

        tracing::info!(resource = self.name, "loading shared resource (first use)");
        let value = Arc::new((self.loader)()?);
        let _ = self.cell.set(value.clone());
        tracing::info!(resource = self.name, "shared resource ready");
        Ok(value)
    }

    /// Whether the value has already been built.
    pub fn is_loaded(&self) -> bool {
        self.cell.get().is_some()
    }
}

impl<T> std::fmt::Debug for SharedResource<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedResource")
            .field("name", &self.name)
            .field("loaded", &self.is_loaded())
            .finish_non_exhaustive()
    }
}
