//! Exit codes for the dupescan application.

/// Process exit codes.
///
/// - 0: Success (completed normally, duplicates found)
/// - 1: General error (unexpected failure)
/// - 2: No duplicates found (completed normally)
/// - 3: Partial success (completed with some non-fatal per-item errors)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Scan completed and duplicates were found.
    Success = 0,
    /// An unexpected error occurred.
    GeneralError = 1,
    /// Scan completed but no duplicates were found.
    NoDuplicates = 2,
    /// Scan completed but some items were skipped or failed.
    PartialSuccess = 3,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "DS000",
            Self::GeneralError => "DS001",
            Self::NoDuplicates => "DS002",
            Self::PartialSuccess => "DS003",
        }
    }
}
