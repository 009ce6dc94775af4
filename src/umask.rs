//! File-creation mask handling.
//!
//! The umask is process-wide. Every mutating filesystem call made by the
//! materializer holds a [`MaskGuard`], which takes one global lock, clears the
//! mask and puts the previous value back when dropped.

use std::sync::{Mutex, MutexGuard, PoisonError};

static MASK_LOCK: Mutex<()> = Mutex::new(());

/// Something that owns a file-creation mask.
pub trait CreationMask {
    /// Installs `mask` and returns the one it replaced.
    fn swap(&self, mask: u32) -> u32;
}

/// The real process umask.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessUmask;

impl CreationMask for ProcessUmask {
    fn swap(&self, mask: u32) -> u32 {
        // SAFETY: umask(2) cannot fail and touches no memory we own.
        unsafe { libc::umask(mask as libc::mode_t) as u32 }
    }
}

/// Keeps the mask cleared while alive.
pub struct MaskGuard<'m> {
    mask: &'m dyn CreationMask,
    previous: u32,
    _lock: MutexGuard<'static, ()>,
}

impl<'m> MaskGuard<'m> {
    pub fn clear(mask: &'m dyn CreationMask) -> Self {
        let lock = MASK_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
        let previous = mask.swap(0);
        Self { mask, previous, _lock: lock }
    }
}

impl Drop for MaskGuard<'_> {
    fn drop(&mut self) {
        self.mask.swap(self.previous);
    }
}
