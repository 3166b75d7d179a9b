/// Process exit codes.
///
/// Scripts key off these: 2 means some renames landed and some did
/// not, 3 means the user declined at the prompt, 4 means nothing was
/// attempted at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    Success = 0,
    GeneralError = 1,
    PartialFailure = 2,
    Cancelled = 3,
    Failure = 4,
}

impl ExitCode {
    pub fn code(self) -> i32 {
        self as i32
    }
}
