//! Process exit codes

/// Exit codes returned by the `s3h` binary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Operation completed
    Success = 0,
    /// The provider or the local filesystem rejected the operation
    GeneralError = 1,
    /// Bad arguments or configuration
    UsageError = 2,
}

impl ExitCode {
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Map an operation's success flag to an exit code
    pub fn from_success(ok: bool) -> Self {
        if ok {
            ExitCode::Success
        } else {
            ExitCode::GeneralError
        }
    }
}
