//! Output handling for human-readable and JSON modes

mod formatter;

pub use formatter::Formatter;

/// Output settings shared by every command
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputConfig {
    /// Emit strict JSON instead of human-readable text
    pub json: bool,
    /// Disable colored output
    pub no_color: bool,
    /// Suppress everything except errors
    pub quiet: bool,
}
