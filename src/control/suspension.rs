//! Memoized deferred computation that is safe to force from many threads.
//!
//! A [`Suspension`] pairs a pure thunk with a memo cell. The first call to
//! [`Suspension::force`] evaluates the thunk and publishes the result; every
//! later call returns the published value. Once a value is published the
//! thunk is released, together with everything it captured.
//!
//! # Race Policy
//!
//! No lock is held while the thunk runs. If several threads force the same
//! unforced suspension at once, each of them may evaluate the thunk, but only
//! the first result to be published is kept and every caller receives a
//! reference to that one value. Thunks must therefore be pure: running one
//! twice must be indistinguishable from running it once, apart from the time
//! spent. The thunk slot is locked only to clone or clear it, never while
//! the thunk runs.
//!
//! # Examples
//!
//! ```rust
//! use perseus::control::Suspension;
//! use std::sync::Arc;
//! use std::thread;
//!
//! let suspension = Arc::new(Suspension::new(|| (1..=10).sum::<i32>()));
//!
//! let handles: Vec<_> = (0..4)
//!     .map(|_| {
//!         let suspension = Arc::clone(&suspension);
//!         thread::spawn(move || *suspension.force())
//!     })
//!     .collect();
//!
//! for handle in handles {
//!     assert_eq!(handle.join().unwrap(), 55);
//! }
//! ```

use std::fmt;
use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;

/// The shared thunk type stored by a [`Suspension`].
type Thunk<T> = Arc<dyn Fn() -> T + Send + Sync>;

/// A deferred value with a memo cell.
///
/// The cell holds either an unforced thunk or a forced value. `Suspension<T>`
/// is `Send + Sync` whenever `T` is, because the thunk is required to be
/// `Send + Sync` and the memo cell is a [`OnceLock`].
///
/// # Examples
///
/// ```rust
/// use perseus::control::Suspension;
///
/// let suspension = Suspension::new(|| String::from("computed"));
/// assert_eq!(suspension.get(), None);
/// assert_eq!(suspension.force(), "computed");
/// assert_eq!(suspension.get().map(String::as_str), Some("computed"));
/// ```
pub struct Suspension<T> {
    /// `None` once a value has been published.
    thunk: Mutex<Option<Thunk<T>>>,
    value: OnceLock<T>,
}

impl<T> Suspension<T> {
    /// Creates an unforced suspension. The thunk is not called here.
    #[inline]
    pub fn new<F>(thunk: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        let thunk: Thunk<T> = Arc::new(thunk);
        Self {
            thunk: Mutex::new(Some(thunk)),
            value: OnceLock::new(),
        }
    }

    /// Returns the memoized value, evaluating the thunk first if needed.
    ///
    /// The reference returned is stable: every call on the same suspension,
    /// from any thread, yields the same value.
    pub fn force(&self) -> &T {
        if let Some(value) = self.value.get() {
            return value;
        }
        let thunk = self.thunk.lock().clone();
        let Some(thunk) = thunk else {
            // The slot is cleared only after the value is published.
            return match self.value.get() {
                Some(value) => value,
                None => unreachable!("suspension released its thunk before publishing"),
            };
        };
        let computed = thunk();
        drop(thunk);
        // Loses quietly if another thread published first.
        let value = self.value.get_or_init(move || computed);
        let released = self.thunk.lock().take();
        drop(released);
        value
    }

    /// Returns the memoized value without forcing.
    #[inline]
    #[must_use]
    pub fn get(&self) -> Option<&T> {
        self.value.get()
    }

    /// Returns `true` once a value has been published.
    #[inline]
    #[must_use]
    pub fn is_forced(&self) -> bool {
        self.value.get().is_some()
    }

    /// Consumes the suspension, returning the memoized value if it was forced.
    #[inline]
    pub fn into_inner(self) -> Option<T> {
        self.value.into_inner()
    }
}

impl<T: fmt::Debug> fmt::Debug for Suspension<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value.get() {
            Some(value) => formatter.debug_tuple("Suspension").field(value).finish(),
            None => formatter.write_str("Suspension(<unforced>)"),
        }
    }
}

impl<T: fmt::Display> fmt::Display for Suspension<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value.get() {
            Some(value) => write!(formatter, "{value}"),
            None => write!(formatter, "<unforced>"),
        }
    }
}

static_assertions::assert_impl_all!(Suspension<i32>: Send, Sync);
static_assertions::assert_impl_all!(Suspension<String>: Send, Sync);
