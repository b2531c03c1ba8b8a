use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

struct Slot<T> {
    value: T,
    mounted: bool,
}

/// State owned by a mounted controller.
///
/// Scheduled work never holds the state directly: it gets a [`MountHandle`]
/// and may only touch the value while the owner is alive. Dropping the
/// `Mounted` marks the slot unmounted under the same lock the handle uses.
pub struct Mounted<T> {
    slot: Arc<Mutex<Slot<T>>>,
}

impl<T> Mounted<T> {
    pub fn new(value: T) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Slot { value, mounted: true })),
        }
    }

    pub fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.lock().value)
    }

    pub fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        f(&mut self.lock().value)
    }

    /// Weak handle for deferred work
    pub fn handle(&self) -> MountHandle<T> {
        MountHandle {
            slot: Arc::downgrade(&self.slot),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Slot<T>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: Clone> Mounted<T> {
    pub fn get(&self) -> T {
        self.lock().value.clone()
    }
}

impl<T> Drop for Mounted<T> {
    fn drop(&mut self) {
        self.lock().mounted = false;
    }
}

pub struct MountHandle<T> {
    slot: Weak<Mutex<Slot<T>>>,
}

impl<T> Clone for MountHandle<T> {
    fn clone(&self) -> Self {
        Self {
            slot: self.slot.clone(),
        }
    }
}

impl<T> MountHandle<T> {
    /// Run `f` against the owner's state, or return `None` once it has been torn down
    pub fn update_if_mounted<R>(&self, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        let slot = self.slot.upgrade()?;
        let mut guard = slot.lock().unwrap_or_else(PoisonError::into_inner);
        if !guard.mounted {
            return None;
        }
        Some(f(&mut guard.value))
    }

    pub fn is_mounted(&self) -> bool {
        let Some(slot) = self.slot.upgrade() else {
            return false;
        };
        let mounted = slot.lock().unwrap_or_else(PoisonError::into_inner).mounted;
        mounted
    }
}
