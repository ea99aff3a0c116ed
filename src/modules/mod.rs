//! GenBank record model, file access and queries

pub mod io;
pub mod query;
pub mod seq;
