//! Shared types for outpost plugins: world locations, item stacks, display
//! text, and the capabilities a plugin receives from its host (diagnostics,
//! bundled resources).
//!
//! # Invariants
//! - Identifier enums resolve fallibly; an unknown identifier is the caller's
//!   error to handle, never a panic.
//! - Host-agnostic: no file or network I/O except behind the `Resources` seam.

mod item;
mod location;
mod log;
mod resources;
mod text;

pub use item::{IdentifierKind, Item, ItemFlag, Material, UnknownIdentifier};
pub use location::Location;
pub use log::{LogEntry, LogLevel, LogSink, MemoryLog, TracingLog};
pub use resources::{DirResources, MemoryResources, Resources};
pub use text::{COLOR_CHAR, COLOR_MARKER, Text, translate_color_codes};

pub fn crate_info() -> &'static str {
    "outpost-common v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("common"));
    }
}
