/// Exit codes for the fmtbridge CLI
///
/// These exit codes allow users and CI/CD systems to distinguish between
/// different types of failures.
/// Success - The document was formatted (or needed no changes)
pub const SUCCESS: i32 = 0;

/// Formatting failed - The tool errored, replied with malformed output, or
/// returned an unusable edit batch
pub const FORMAT_FAILED: i32 = 1;

/// Tool error - Configuration error, file access error, or usage error
pub const TOOL_ERROR: i32 = 2;

/// Helper functions for consistent exit behavior
pub mod exit {
    use super::{FORMAT_FAILED, SUCCESS, TOOL_ERROR};

    /// Exit with success code (0)
    pub fn success() -> ! {
        std::process::exit(SUCCESS);
    }

    /// Exit with formatting failed code (1)
    pub fn format_failed() -> ! {
        std::process::exit(FORMAT_FAILED);
    }

    /// Exit with tool error code (2)
    pub fn tool_error() -> ! {
        std::process::exit(TOOL_ERROR);
    }
}
