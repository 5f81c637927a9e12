//! Domain layer containing business entities.
//!
//! Entities are plain data plus the few rules that belong to the data
//! itself (default expiry, counter key layout, quota window). They do not
//! depend on the store or on HTTP.

pub mod entities;
