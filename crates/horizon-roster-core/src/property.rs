//! Reactive property cells.
//!
//! A [`Property<T>`] wraps a value and reports whether a write actually
//! changed it, so the owner only emits its notification signal on real
//! changes.
//!
//! ```
//! use horizon_roster_core::{Property, Signal};
//!
//! struct Pager {
//!     page: Property<usize>,
//!     page_changed: Signal<usize>,
//! }
//!
//! impl Pager {
//!     fn go_to(&self, page: usize) {
//!         if self.page.set(page) {
//!             self.page_changed.emit(page);
//!         }
//!     }
//! }
//!
//! let pager = Pager { page: Property::new(1), page_changed: Signal::new() };
//! pager.go_to(2);
//! assert_eq!(pager.page.get(), 2);
//! ```

use std::fmt;

use parking_lot::RwLock;

/// A value cell with change detection.
///
/// Uses interior mutability with a `parking_lot::RwLock`, so a property can
/// be written through a shared reference and is `Send + Sync` whenever `T` is.
pub struct Property<T> {
    value: RwLock<T>,
}

impl<T: Clone> Property<T> {
    /// Create a new property with an initial value.
    pub fn new(value: T) -> Self {
        Self {
            value: RwLock::new(value),
        }
    }

    /// Get a clone of the current value.
    ///
    /// For large types, prefer [`with`](Self::with).
    pub fn get(&self) -> T {
        self.value.read().clone()
    }

    /// Access the value through a closure without cloning.
    pub fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        f(&self.value.read())
    }

    /// Set the value without change detection.
    pub fn set_silent(&self, value: T) {
        *self.value.write() = value;
    }
}

impl<T: Clone + PartialEq> Property<T> {
    /// Set the value, returning `true` if it changed.
    pub fn set(&self, value: T) -> bool {
        let mut current = self.value.write();
        if *current == value {
            false
        } else {
            *current = value;
            true
        }
    }

    /// Set the value, returning the previous one if it changed.
    pub fn replace(&self, value: T) -> Option<T> {
        let mut current = self.value.write();
        if *current == value {
            None
        } else {
            Some(std::mem::replace(&mut *current, value))
        }
    }

    /// Mutate the value in place, returning `true` if the result differs
    /// from the value before the call.
    pub fn update<F>(&self, f: F) -> bool
    where
        F: FnOnce(&mut T),
    {
        let mut current = self.value.write();
        let before = current.clone();
        f(&mut current);
        *current != before
    }
}

impl<T: Clone + Default> Default for Property<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone> Clone for Property<T> {
    fn clone(&self) -> Self {
        Self::new(self.get())
    }
}

impl<T: fmt::Debug> fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("value", &*self.value.read())
            .finish()
    }
}
