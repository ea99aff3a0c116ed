//! Core file access primitives

pub mod io;
