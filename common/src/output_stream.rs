use std::sync::Arc;

use parking_lot::Mutex;

/// Cloneable append-only buffer. Every clone writes into the same storage.
#[derive(Debug)]
pub struct OutputStream<T>(Arc<Mutex<Vec<T>>>);

impl<T> OutputStream<T> {
    pub fn new() -> Self {
        OutputStream(Arc::new(Mutex::new(Vec::new())))
    }

    pub fn write<V: Into<T>>(&self, value: V) {
        self.0.lock().push(value.into());
    }

    pub fn len(&self) -> usize {
        self.0.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.lock().is_empty()
    }

    pub fn take(&self) -> Vec<T> {
        std::mem::take(&mut self.0.lock())
    }
}

impl<T: Clone> OutputStream<T> {
    pub fn last(&self) -> Option<T> {
        self.0.lock().last().cloned()
    }
}

impl<T> Default for OutputStream<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for OutputStream<T> {
    fn clone(&self) -> Self {
        OutputStream(Arc::clone(&self.0))
    }
}
