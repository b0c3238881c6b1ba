use std::io::{ErrorKind, Write};

use bytes::BytesMut;

use crate::codec::{encode_record_with, RecordLayout, RECORD_SIZE};
use crate::error::{Result, TelegraphError};
use crate::record::TelegraphRecord;

/// Writes complete telegraph records to any `Write` stream.
pub struct RecordWriter<T> {
    inner: T,
    buf: BytesMut,
    layout: RecordLayout,
}

impl<T: Write> RecordWriter<T> {
    /// Create a new record writer emitting the current layout.
    pub fn new(inner: T) -> Self {
        Self::with_layout(inner, RecordLayout::Current)
    }

    /// Create a new record writer emitting an explicit layout.
    pub fn with_layout(inner: T, layout: RecordLayout) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(RECORD_SIZE),
            layout,
        }
    }

    /// Encode and write one record in the writer's layout (blocking).
    pub fn write_record(&mut self, record: &TelegraphRecord) -> Result<()> {
        self.write_record_with(record, self.layout)
    }

    /// Encode and write one record in an explicit layout.
    ///
    /// Validation errors are returned before any byte reaches the stream.
    pub fn write_record_with(
        &mut self,
        record: &TelegraphRecord,
        layout: RecordLayout,
    ) -> Result<()> {
        self.buf.clear();
        encode_record_with(record, layout, &mut self.buf)?;

        let mut offset = 0usize;
        while offset < self.buf.len() {
            match self.inner.write(&self.buf[offset..]) {
                Ok(0) => return Err(TelegraphError::StreamClosed),
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(TelegraphError::Io(err)),
            }
        }

        self.flush()
    }

    /// Flush the underlying stream.
    pub fn flush(&mut self) -> Result<()> {
        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(TelegraphError::Io(err)),
            }
        }
    }

    /// Layout used by [`write_record`](Self::write_record).
    pub fn layout(&self) -> RecordLayout {
        self.layout
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Consume the writer and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    use super::*;
    use crate::codec::{decode_record, LEGACY_RECORD_SIZE};
    use crate::reader::RecordReader;
    use crate::record::{HardwareType, OperatingMode};

    fn record(channel_id: u32) -> TelegraphRecord {
        TelegraphRecord {
            channel_id,
            hardware_type: HardwareType::Mc700A,
            com_port_id: 1,
            ..TelegraphRecord::default()
        }
    }

    #[test]
    fn write_single_record() {
        let mut writer = RecordWriter::new(Cursor::new(Vec::<u8>::new()));
        writer.write_record(&record(1)).unwrap();

        let wire = writer.into_inner().into_inner();
        assert_eq!(wire.len(), RECORD_SIZE);
        assert_eq!(decode_record(&wire).unwrap().record, record(1));
    }

    #[test]
    fn legacy_writer_emits_short_records() {
        let mut writer =
            RecordWriter::with_layout(Cursor::new(Vec::<u8>::new()), RecordLayout::Legacy);
        assert_eq!(writer.layout(), RecordLayout::Legacy);

        writer.write_record(&record(1)).unwrap();
        writer.write_record(&record(2)).unwrap();

        let wire = writer.into_inner().into_inner();
        assert_eq!(wire.len(), 2 * LEGACY_RECORD_SIZE);
    }

    #[test]
    fn invalid_record_writes_nothing() {
        let mut writer = RecordWriter::new(Cursor::new(Vec::<u8>::new()));
        let bad = TelegraphRecord {
            operating_mode: OperatingMode::CurrentClamp,
            series_resistance: 1e7,
            ..record(1)
        };

        let err = writer.write_record(&bad).unwrap_err();
        assert!(matches!(err, TelegraphError::SentinelViolation { .. }));
        assert!(writer.get_ref().get_ref().is_empty());
    }

    #[test]
    fn flush_propagates() {
        let sink = FlushTrackingWriter::default();
        let flag = Arc::clone(&sink.flushed);
        let mut writer = RecordWriter::new(sink);

        writer.write_record(&record(1)).unwrap();

        assert!(flag.load(Ordering::SeqCst));
    }

    #[test]
    fn handles_interrupted_and_would_block() {
        let sink = FlakyWriter {
            failures: vec![ErrorKind::Interrupted, ErrorKind::WouldBlock],
            data: Vec::new(),
        };
        let mut writer = RecordWriter::new(sink);
        writer.write_record(&record(5)).unwrap();

        assert_eq!(writer.into_inner().data.len(), RECORD_SIZE);
    }

    #[test]
    fn stream_closed_when_write_returns_zero() {
        let mut writer = RecordWriter::new(ZeroWriter);
        let err = writer.write_record(&record(1)).unwrap_err();
        assert!(matches!(err, TelegraphError::StreamClosed));
    }

    #[test]
    fn written_records_read_back() {
        let mut writer = RecordWriter::new(Cursor::new(Vec::<u8>::new()));
        writer.write_record(&record(1)).unwrap();
        writer
            .write_record_with(&record(2), RecordLayout::Legacy)
            .unwrap();

        let wire = writer.into_inner().into_inner();
        let mut reader = RecordReader::new(Cursor::new(wire));
        assert_eq!(reader.read_record().unwrap().layout, RecordLayout::Current);
        assert_eq!(reader.read_record().unwrap().layout, RecordLayout::Legacy);
    }

    #[derive(Default)]
    struct FlushTrackingWriter {
        flushed: Arc<AtomicBool>,
        data: Vec<u8>,
    }

    impl Write for FlushTrackingWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.data.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            self.flushed.store(true, Ordering::SeqCst);
            Ok(())
        }
    }

    struct FlakyWriter {
        failures: Vec<ErrorKind>,
        data: Vec<u8>,
    }

    impl Write for FlakyWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            if let Some(kind) = self.failures.pop() {
                return Err(std::io::Error::from(kind));
            }
            // Short writes exercise the offset loop.
            let n = buf.len().min(100);
            self.data.extend_from_slice(&buf[..n]);
            Ok(n)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    struct ZeroWriter;

    impl Write for ZeroWriter {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Ok(0)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }
}
