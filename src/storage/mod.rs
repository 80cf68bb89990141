//! Storage layer for Curadoria
//!
//! Reads contributor fragments and reads/writes the generated aggregate.

pub mod aggregate;
pub mod fragment;
