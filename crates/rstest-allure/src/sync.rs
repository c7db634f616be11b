//! Poison-tolerant locking shared by the report model and context.

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Lock `mutex`, recovering the data when a previous holder panicked.
///
/// Step bodies are allowed to panic; the bookkeeping that follows must still
/// be able to reach the shared state.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
