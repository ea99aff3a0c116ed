//! Text primitives for record parsing and site searching

pub mod string_ops;
