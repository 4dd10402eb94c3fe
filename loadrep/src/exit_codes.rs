#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    Success = 0,

    /// Invalid CLI/config options (bad flags, bad patterns, bad cleanup
    /// parameters).
    InvalidInput = 30,

    /// Analysis failure (store errors, missing runs, malformed data).
    RuntimeError = 40,
}

impl ExitCode {
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}
