use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::GameError;

/// Cooperative cancellation for long classifications.
///
/// Clones share the flag; a UI thread keeps one clone and calls [`CancelToken::cancel`], the
/// worker polls [`CancelToken::check`] between candidate evaluations.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn check(&self) -> Result<(), GameError> {
        if self.is_cancelled() {
            Err(GameError::Cancelled)
        } else {
            Ok(())
        }
    }
}
