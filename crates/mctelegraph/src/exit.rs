use std::fmt;
use std::io;

use mctelegraph_codec::TelegraphError;

// Exit codes follow the sysexits-style ranges used across our CLIs.
pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::NotFound => FAILURE,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn telegraph_error(context: &str, err: TelegraphError) -> CliError {
    match err {
        TelegraphError::Io(source) => io_error(context, source),
        TelegraphError::InvalidArgument(_) => CliError::new(INTERNAL, format!("{context}: {err}")),
        other => CliError::new(DATA_INVALID, format!("{context}: {other}")),
    }
}

#[cfg(test)]
mod tests {
    use mctelegraph_codec::OperatingMode;

    use super::*;

    #[test]
    fn wire_errors_are_data_invalid() {
        let err = telegraph_error(
            "decode failed",
            TelegraphError::UnsupportedVersion {
                version: 4,
                record_size: 128,
            },
        );
        assert_eq!(err.code, DATA_INVALID);
        assert!(err.message.starts_with("decode failed: "));
    }

    #[test]
    fn sentinel_errors_are_data_invalid() {
        let err = telegraph_error(
            "encode failed",
            TelegraphError::SentinelViolation {
                field: "membrane_cap",
                mode: OperatingMode::CurrentClamp,
            },
        );
        assert_eq!(err.code, DATA_INVALID);
    }

    #[test]
    fn io_errors_keep_their_class() {
        let err = telegraph_error(
            "read failed",
            TelegraphError::Io(io::Error::from(io::ErrorKind::PermissionDenied)),
        );
        assert_eq!(err.code, PERMISSION_DENIED);
    }
}
