//! Reusable widgets for the run page

mod dialog;

pub use dialog::{centered_rect, DialogBuilder};

pub const SPINNER: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Spinner glyph for a tick count
pub fn spinner_frame(index: usize) -> &'static str {
    SPINNER[index % SPINNER.len()]
}
