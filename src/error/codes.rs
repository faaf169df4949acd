#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Success = 0,
    GeneralError = 1,
    InvalidArguments = 2,
    PathNotFound = 3,
    NothingToProcess = 4,
    PermissionError = 7,
    BackupError = 8,
    RenameFailures = 9,
    RestoreFailures = 10,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}
