use std::sync::{Arc, Mutex, MutexGuard};

/// A thread-safe pool of reusable objects.
///
/// # Type Parameters
///
/// * `T` - The type of objects stored in the pool.
pub struct Pool<T>(Arc<Mutex<Vec<T>>>);

impl<T> Default for Pool<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Pool<T> {
    #[inline]
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T> std::fmt::Debug for Pool<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Pool").field(&self.len()).finish()
    }
}

impl<T> Pool<T> {
    /// Creates a new, empty `Pool`.
    #[inline]
    pub fn new() -> Self {
        Self(Arc::new(Mutex::new(Vec::new())))
    }

    // A poisoned pool only ever holds whole scratch objects, so the data is still usable.
    #[inline]
    fn lock(&self) -> MutexGuard<'_, Vec<T>> {
        self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Gets an object from the pool, if available.
    #[inline]
    pub fn get(&self) -> Option<T> {
        self.lock().pop()
    }

    /// Gets an object from the pool, or creates one with `init`.
    #[inline]
    pub fn get_or_else<F: FnOnce() -> T>(&self, init: F) -> T {
        self.get().unwrap_or_else(init)
    }

    /// Stores an object in the pool.
    #[inline]
    pub fn store(&self, value: T) {
        self.lock().push(value);
    }

    /// Returns the number of idle objects in the pool.
    #[inline]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns `true` if the pool holds no idle object.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clears all objects from the pool.
    #[inline]
    pub fn clear(&self) {
        self.lock().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_reuse() {
        let pool: Pool<Vec<u64>> = Pool::new();
        let shared = pool.clone();
        let v = pool.get_or_else(|| vec![0; 8]);
        assert!(pool.is_empty());
        shared.store(v);
        assert_eq!(pool.len(), 1);
        assert_eq!(pool.get().map(|v| v.len()), Some(8));
        pool.clear();
        assert!(shared.get().is_none());
    }
}
