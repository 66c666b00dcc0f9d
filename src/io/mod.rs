//! I/O utilities for archive access
//!
//! This module provides readers used to pull member bytes out of
//! compressed streams.

pub mod sequential;

pub use sequential::SequentialReader;
