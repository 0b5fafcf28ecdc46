//! Utility Module
//!
//! - [`interner`]: String interning for shader tokens
//!
//! # String Interning
//!
//! Interned strings (Symbols) can be compared in O(1) time and are the storage
//! behind [`Key`](crate::key::Key).
//!
//! ```rust,ignore
//! use glsl_interface::utils::interner;
//!
//! let sym1 = interner::intern("viewProjection");
//! let sym2 = interner::intern("viewProjection");
//! assert_eq!(sym1, sym2); // O(1) comparison
//! ```

pub mod interner;

pub use interner::Symbol;
