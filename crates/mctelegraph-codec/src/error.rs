use crate::record::OperatingMode;

/// Errors that can occur while encoding or decoding telegraph records.
#[derive(Debug, thiserror::Error)]
pub enum TelegraphError {
    /// A caller-supplied destination cannot hold the result.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// The input ends before the declared or minimum record size.
    #[error("truncated record ({available} bytes available, {needed} needed)")]
    TruncatedRecord { needed: usize, available: usize },

    /// No known layout can be read for this version and size.
    #[error("unsupported telegraph version {version} (record size {record_size})")]
    UnsupportedVersion { version: u32, record_size: u32 },

    /// A conditional field holds a value its operating mode forbids.
    #[error("{field} must hold its sentinel value in {mode} mode")]
    SentinelViolation {
        field: &'static str,
        mode: OperatingMode,
    },

    /// An enumerated selector is outside its closed set.
    #[error("invalid value {value} for {field}")]
    InvalidField { field: &'static str, value: u32 },

    /// A text field does not fit its fixed-width slot.
    #[error("{field} is {len} bytes (max {max}, NUL not allowed)")]
    FieldTooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },

    /// A streamed record declares a size outside the configured bounds.
    #[error("record size {size} exceeds limit of {max} bytes")]
    RecordTooLarge { size: usize, max: usize },

    /// An I/O error occurred while reading or writing a record stream.
    #[error("record stream I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stream ended before a complete record was received.
    #[error("record stream closed (incomplete record)")]
    StreamClosed,
}

impl TelegraphError {
    /// True for errors caused by the producer violating the record contract,
    /// as opposed to malformed or unreadable wire data.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            TelegraphError::InvalidArgument(_)
                | TelegraphError::SentinelViolation { .. }
                | TelegraphError::FieldTooLong { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, TelegraphError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caller_errors_are_distinct_from_wire_errors() {
        let sentinel = TelegraphError::SentinelViolation {
            field: "membrane_cap",
            mode: OperatingMode::CurrentClamp,
        };
        let truncated = TelegraphError::TruncatedRecord {
            needed: 128,
            available: 12,
        };

        assert!(sentinel.is_caller_error());
        assert!(!truncated.is_caller_error());
        assert!(!TelegraphError::StreamClosed.is_caller_error());
    }

    #[test]
    fn messages_name_the_offending_field() {
        let err = TelegraphError::SentinelViolation {
            field: "series_resistance",
            mode: OperatingMode::CurrentClampZero,
        };
        assert_eq!(
            err.to_string(),
            "series_resistance must hold its sentinel value in I = 0 mode"
        );
    }
}
