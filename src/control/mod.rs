//! Control structures for deferred evaluation.
//!
//! - [`Suspension`]: a pure thunk paired with a memo cell, forced at most
//!   once per observer and shareable across threads
//!
//! # Examples
//!
//! ```rust
//! use perseus::control::Suspension;
//!
//! let suspension = Suspension::new(|| 6 * 7);
//! assert!(!suspension.is_forced());
//!
//! assert_eq!(*suspension.force(), 42);
//! assert!(suspension.is_forced());
//! ```

mod suspension;

pub use suspension::Suspension;
