use std::io::{ErrorKind, Read};

use bytes::BytesMut;
use tracing::debug;

use crate::codec::{decode_record_buf, DecodeConfig, DecodedRecord, RECORD_SIZE};
use crate::error::{Result, TelegraphError};

const INITIAL_BUFFER_CAPACITY: usize = 4 * RECORD_SIZE;
const READ_CHUNK_SIZE: usize = 4 * 1024;

/// Reads complete telegraph records from any `Read` stream.
///
/// Records are self-delimiting through their declared size, so a capture of
/// concatenated records of mixed versions reads back one record at a time.
pub struct RecordReader<T> {
    inner: T,
    buf: BytesMut,
    config: DecodeConfig,
}

impl<T: Read> RecordReader<T> {
    /// Create a new record reader with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, DecodeConfig::default())
    }

    /// Create a new record reader with explicit configuration.
    pub fn with_config(inner: T, config: DecodeConfig) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            config,
        }
    }

    /// Read the next complete record (blocking).
    ///
    /// Returns `Err(TelegraphError::StreamClosed)` when EOF is reached.
    pub fn read_record(&mut self) -> Result<DecodedRecord> {
        loop {
            if let Some(decoded) = decode_record_buf(&mut self.buf, &self.config)? {
                if decoded.is_provisional() {
                    debug!(
                        version = decoded.version,
                        record_size = decoded.record_size,
                        "read record from newer telegraph version"
                    );
                }
                return Ok(decoded);
            }

            let mut chunk = [0u8; READ_CHUNK_SIZE];
            let read = match self.inner.read(&mut chunk) {
                Ok(n) => n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(TelegraphError::Io(err)),
            };

            if read == 0 {
                return Err(TelegraphError::StreamClosed);
            }

            self.buf.extend_from_slice(&chunk[..read]);
        }
    }

    /// True if no partially received bytes are buffered.
    pub fn is_drained(&self) -> bool {
        self.buf.is_empty()
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Current record reader configuration.
    pub fn config(&self) -> &DecodeConfig {
        &self.config
    }
}

impl<T: Read> Iterator for RecordReader<T> {
    type Item = Result<DecodedRecord>;

    /// Yields records until a clean EOF. EOF with buffered bytes yields
    /// one final `StreamClosed` error.
    fn next(&mut self) -> Option<Self::Item> {
        match self.read_record() {
            Err(TelegraphError::StreamClosed) if self.buf.is_empty() => None,
            Err(TelegraphError::StreamClosed) => {
                self.buf.clear();
                Some(Err(TelegraphError::StreamClosed))
            }
            other => Some(other),
        }
    }
}
