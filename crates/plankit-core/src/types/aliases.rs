//! Type aliases for commonly used shared-ownership types.
//!
//! The plan component keeps its home in a [`Shared`] cell (single-threaded
//! UI side) while caches and the paint scheduler sit behind [`ThreadSafe`]
//! locks so event bus handlers, which must be `Send + Sync`, can update them
//! synchronously from the publishing thread.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use plankit_core::types::*;
//!
//! let home: Shared<Home> = shared(Home::new());
//! let cache: ThreadSafe<DerivedGeometryCache> = thread_safe(DerivedGeometryCache::default());
//! ```

use parking_lot::{Mutex, RwLock};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::Arc;

// =============================================================================
// SINGLE-THREADED SHARED TYPES (Rc<RefCell<T>>)
// =============================================================================

/// A reference-counted, interior-mutable wrapper for single-threaded sharing.
pub type Shared<T> = Rc<RefCell<T>>;

// =============================================================================
// THREAD-SAFE SHARED TYPES (Arc<Mutex<T>> / Arc<RwLock<T>>)
// =============================================================================

/// A thread-safe, mutex-protected wrapper for cross-thread sharing.
///
/// Backed by `parking_lot::Mutex`.
pub type ThreadSafe<T> = Arc<Mutex<T>>;

/// A thread-safe hash map for cross-thread key-value storage.
pub type ThreadSafeMap<K, V> = Arc<Mutex<HashMap<K, V>>>;

/// A thread-safe reader-writer lock wrapper for read-heavy workloads.
pub type ThreadSafeRw<T> = Arc<RwLock<T>>;

// =============================================================================
// CALLBACK TYPES
// =============================================================================

/// A callback that receives a single parameter.
pub type DataCallback<T> = Box<dyn Fn(T) + Send + Sync>;

// =============================================================================
// CONSTRUCTOR HELPERS
// =============================================================================

/// Create a new `Shared<T>` from a value.
#[inline]
pub fn shared<T>(value: T) -> Shared<T> {
    Rc::new(RefCell::new(value))
}

/// Create a new `ThreadSafe<T>` from a value.
#[inline]
pub fn thread_safe<T>(value: T) -> ThreadSafe<T> {
    Arc::new(Mutex::new(value))
}

/// Create a new empty `ThreadSafeMap<K, V>`.
#[inline]
pub fn thread_safe_map<K, V>() -> ThreadSafeMap<K, V> {
    Arc::new(Mutex::new(HashMap::new()))
}

/// Create a new `ThreadSafeRw<T>` from a value.
#[inline]
pub fn thread_safe_rw<T>(value: T) -> ThreadSafeRw<T> {
    Arc::new(RwLock::new(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_creation() {
        let value: Shared<i32> = shared(42);
        assert_eq!(*value.borrow(), 42);

        *value.borrow_mut() = 100;
        assert_eq!(*value.borrow(), 100);
    }

    #[test]
    fn test_thread_safe_creation() {
        let value: ThreadSafe<i32> = thread_safe(42);
        assert_eq!(*value.lock(), 42);

        *value.lock() = 100;
        assert_eq!(*value.lock(), 100);
    }

    #[test]
    fn test_thread_safe_map() {
        let map: ThreadSafeMap<String, i32> = thread_safe_map();
        map.lock().insert("key1".to_string(), 1);
        map.lock().insert("key2".to_string(), 2);

        assert_eq!(map.lock().get("key1"), Some(&1));
    }

    #[test]
    fn test_thread_safe_rw() {
        let value: ThreadSafeRw<i32> = thread_safe_rw(42);

        assert_eq!(*value.read(), 42);
        assert_eq!(*value.read(), 42);

        *value.write() = 100;
        assert_eq!(*value.read(), 100);
    }

    #[test]
    fn test_data_callback() {
        let total = thread_safe(0);
        let total_clone = total.clone();
        let callback: DataCallback<i32> = Box::new(move |n| *total_clone.lock() += n);

        callback(3);
        callback(4);
        assert_eq!(*total.lock(), 7);
    }
}
