//! File-backed YAML configuration stores with dot-path addressing, typed
//! reads, and record codecs for locations and items.
//!
//! # Invariants
//! - Absent paths read as sentinels (`None`/0/false), never as errors.
//! - Construction is failure-tolerant: a malformed backing file logs one
//!   error and yields an empty document.
//! - `save` is write-then-reload, so memory matches disk afterwards.

mod codec;
mod store;
mod value;

pub use store::{STORE_EXTENSION, SeedOutcome, Store, StoreError, load_document, seed_default};
pub use value::{Document, Value};

pub fn crate_info() -> &'static str {
    "outpost-config v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("config"));
    }
}
