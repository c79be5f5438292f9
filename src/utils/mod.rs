//! Utilities
//!
//! Cross-cutting helpers: bounded string staging and exact-count I/O.

pub mod io;
pub mod strings;
