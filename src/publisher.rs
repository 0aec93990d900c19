//! Shared, observable values.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use flume::{Receiver, Sender};

/// Fan-out to any number of receivers. Dropped receivers are forgotten on the next publish.
pub struct Listeners<T>(Arc<Mutex<Vec<Sender<T>>>>);

impl<T> Clone for Listeners<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T> Default for Listeners<T> {
    fn default() -> Self {
        Self(Arc::default())
    }
}

impl<T: Clone> Listeners<T> {
    pub fn add(&self) -> Receiver<T> {
        let (sender, receiver) = flume::unbounded();
        lock(&self.0).push(sender);
        receiver
    }

    pub fn publish(&self, value: &T) {
        lock(&self.0).retain(|sender| sender.send(value.clone()).is_ok());
    }
}

/// A value behind a mutex that tells its subscribers about every mutation
pub struct RefPublisher<T> {
    value: Arc<Mutex<T>>,
    listeners: Listeners<T>,
}

impl<T> Clone for RefPublisher<T> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            listeners: self.listeners.clone(),
        }
    }
}

impl<T: Clone> RefPublisher<T> {
    pub fn new(value: T) -> Self {
        Self {
            value: Arc::new(Mutex::new(value)),
            listeners: Listeners::default(),
        }
    }

    pub fn with<R>(&self, action: impl FnOnce(&T) -> R) -> R {
        action(&lock(&self.value))
    }

    /// Subscribers see the new value before the lock is released, so they
    /// observe mutations in the order they were applied.
    pub fn with_mutation<R>(&self, action: impl FnOnce(&mut T) -> R) -> R {
        let mut value = lock(&self.value);
        let output = action(&mut value);
        self.listeners.publish(&value);
        output
    }

    pub fn subscribe(&self) -> Receiver<T> {
        self.listeners.add()
    }
}

// A panic while holding the lock can't leave a half-written value behind:
// mutations replace the value as a whole.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
