//! CLI styling utilities: semantic colors and tables.

use std::sync::atomic::{AtomicBool, Ordering};

pub mod colors;
pub mod table;

pub use colors::SemanticStyle;
pub use table::*;

static NO_COLOR: AtomicBool = AtomicBool::new(false);

/// Sets the global no-color flag.
pub fn set_no_color(value: bool) {
    NO_COLOR.store(value, Ordering::SeqCst);
}

/// Checks if colors are disabled.
pub fn no_color() -> bool {
    NO_COLOR.load(Ordering::SeqCst)
}
