//! Infrastructure layer: the key-value store behind every record.

pub mod store;
