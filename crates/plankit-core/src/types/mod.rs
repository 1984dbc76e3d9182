//! Type system utilities and aliases.
//!
//! ## Modules
//!
//! - [`aliases`]: Type aliases for `Rc<RefCell<T>>`, `Arc<Mutex<T>>` and callbacks.

pub mod aliases;

pub use aliases::*;
