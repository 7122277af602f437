/// Terminal output for termpix.
///
/// Emits a `RenderedGrid` as ANSI truecolor escape sequences or plain text.
pub mod ansi;

pub use ansi::{grid_to_string, write_grid};
