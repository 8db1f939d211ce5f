use std::fmt;
use std::io::{ErrorKind, Read};
use std::iter::FusedIterator;

use tracing::{debug, warn};

// Size of one packed joystick record on the wire
pub const RECORD_SIZE: usize = 8;

const KIND_BUTTON: u8 = 0x01;
const KIND_AXIS: u8 = 0x02;

// Event kind as reported by the joystick driver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Button,
    Axis,
    // Anything else, including init records (0x80 | kind)
    Other(u8),
}

impl EventKind {
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            KIND_BUTTON => EventKind::Button,
            KIND_AXIS => EventKind::Axis,
            other => EventKind::Other(other),
        }
    }

    pub fn as_byte(self) -> u8 {
        match self {
            EventKind::Button => KIND_BUTTON,
            EventKind::Axis => KIND_AXIS,
            EventKind::Other(byte) => byte,
        }
    }
}

/// One hardware record, exactly as read from the device node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawEvent {
    /// Milliseconds since the device was opened
    pub timestamp: u32,
    pub value: i16,
    pub kind: EventKind,
    /// Raw channel id, only meaningful together with `kind`
    pub id: u8,
}

impl RawEvent {
    pub fn axis(id: u8, value: i16) -> Self {
        Self {
            timestamp: 0,
            value,
            kind: EventKind::Axis,
            id,
        }
    }

    pub fn button(id: u8, value: i16) -> Self {
        Self {
            timestamp: 0,
            value,
            kind: EventKind::Button,
            id,
        }
    }

    pub fn with_timestamp(mut self, timestamp: u32) -> Self {
        self.timestamp = timestamp;
        self
    }

    // Layout: u32 time, i16 value, u8 type, u8 number. Native endian, no padding.
    pub fn decode(record: &[u8; RECORD_SIZE]) -> Self {
        Self {
            timestamp: u32::from_ne_bytes([record[0], record[1], record[2], record[3]]),
            value: i16::from_ne_bytes([record[4], record[5]]),
            kind: EventKind::from_byte(record[6]),
            id: record[7],
        }
    }

    pub fn encode(&self) -> [u8; RECORD_SIZE] {
        let mut record = [0u8; RECORD_SIZE];
        record[0..4].copy_from_slice(&self.timestamp.to_ne_bytes());
        record[4..6].copy_from_slice(&self.value.to_ne_bytes());
        record[6] = self.kind.as_byte();
        record[7] = self.id;
        record
    }
}

/// Pulls fixed-size records from a blocking byte source.
///
/// The first short or failed read closes the reader for good: the joystick
/// driver only fails reads once the controller is gone.
pub struct EventReader {
    source: Box<dyn Read + Send>,
    closed: bool,
    records_read: u64,
}

impl fmt::Debug for EventReader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventReader")
            .field("closed", &self.closed)
            .field("records_read", &self.records_read)
            .finish_non_exhaustive()
    }
}

impl EventReader {
    pub fn new<R: Read + Send + 'static>(source: R) -> Self {
        Self {
            source: Box::new(source),
            closed: false,
            records_read: 0,
        }
    }

    // Read one record; None means end of stream
    pub fn next_event(&mut self) -> Option<RawEvent> {
        if self.closed {
            return None;
        }

        // One read per record. Only signal interruptions are retried, a partial
        // record is never completed by a second read.
        let mut record = [0u8; RECORD_SIZE];
        let read = loop {
            match self.source.read(&mut record) {
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                other => break other,
            }
        };

        match read {
            Ok(RECORD_SIZE) => {
                self.records_read += 1;
                let event = RawEvent::decode(&record);
                debug!("Decoded raw event: {:?}", event);
                Some(event)
            }
            Ok(n) => {
                debug!(
                    "Short read of {} bytes, device stream ended after {} records",
                    n, self.records_read
                );
                self.closed = true;
                None
            }
            Err(e) => {
                warn!("Device read failed, closing stream: {}", e);
                self.closed = true;
                None
            }
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn records_read(&self) -> u64 {
        self.records_read
    }
}

impl Iterator for EventReader {
    type Item = RawEvent;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_event()
    }
}

impl FusedIterator for EventReader {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Cursor};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn stream(events: &[RawEvent]) -> Vec<u8> {
        events.iter().flat_map(|e| e.encode()).collect()
    }

    #[test]
    fn decodes_packed_record() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&1234u32.to_ne_bytes());
        bytes.extend_from_slice(&(-300i16).to_ne_bytes());
        bytes.push(0x02);
        bytes.push(5);

        let mut reader = EventReader::new(Cursor::new(bytes));
        let event = reader.next_event().unwrap();

        assert_eq!(event.timestamp, 1234);
        assert_eq!(event.value, -300);
        assert_eq!(event.kind, EventKind::Axis);
        assert_eq!(event.id, 5);
    }

    #[test]
    fn init_flag_is_not_a_plain_kind() {
        assert_eq!(EventKind::from_byte(0x81), EventKind::Other(0x81));
        assert_eq!(EventKind::from_byte(0x82), EventKind::Other(0x82));
        assert_eq!(EventKind::from_byte(0x01), EventKind::Button);
    }

    #[test]
    fn yields_every_full_record_then_ends() {
        let events = [
            RawEvent::axis(0, 6000).with_timestamp(10),
            RawEvent::button(3, 1).with_timestamp(20),
        ];
        let reader = EventReader::new(Cursor::new(stream(&events)));

        let read: Vec<RawEvent> = reader.collect();
        assert_eq!(read, events);
    }

    #[test]
    fn short_trailing_record_ends_stream() {
        let mut bytes = stream(&[RawEvent::button(1, 1)]);
        bytes.extend_from_slice(&[0xAA, 0xBB, 0xCC]);

        let mut reader = EventReader::new(Cursor::new(bytes));
        assert!(reader.next_event().is_some());
        assert!(reader.next_event().is_none());
        assert!(reader.is_closed());
        assert_eq!(reader.records_read(), 1);
    }

    struct FailingSource {
        calls: Arc<AtomicUsize>,
    }

    impl Read for FailingSource {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(io::Error::new(ErrorKind::Other, "No such device"))
        }
    }

    // Hands out the buffered bytes in fixed-size pieces
    struct ChunkedSource {
        data: Vec<u8>,
        chunks: Vec<usize>,
    }

    impl Read for ChunkedSource {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.chunks.is_empty() {
                return Ok(0);
            }
            let len = self.chunks.remove(0).min(buf.len()).min(self.data.len());
            buf[..len].copy_from_slice(&self.data[..len]);
            self.data.drain(..len);
            Ok(len)
        }
    }

    #[test]
    fn split_record_is_not_reassembled() {
        let mut reader = EventReader::new(ChunkedSource {
            data: RawEvent::axis(0, 6000).encode().to_vec(),
            chunks: vec![3, 5],
        });

        assert!(reader.next_event().is_none());
        assert!(reader.is_closed());
        assert_eq!(reader.records_read(), 0);
        assert!(reader.next_event().is_none());
    }

    struct InterruptedOnce {
        interrupted: bool,
        record: [u8; RECORD_SIZE],
    }

    impl Read for InterruptedOnce {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if !self.interrupted {
                self.interrupted = true;
                return Err(io::Error::new(ErrorKind::Interrupted, "signal"));
            }
            buf[..RECORD_SIZE].copy_from_slice(&self.record);
            Ok(RECORD_SIZE)
        }
    }

    #[test]
    fn interrupted_read_is_resumed() {
        let event = RawEvent::button(6, 1).with_timestamp(77);
        let mut reader = EventReader::new(InterruptedOnce {
            interrupted: false,
            record: event.encode(),
        });

        assert_eq!(reader.next_event(), Some(event));
        assert!(!reader.is_closed());
    }

    #[test]
    fn failed_read_closes_without_retry() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut reader = EventReader::new(FailingSource {
            calls: calls.clone(),
        });

        assert!(reader.next_event().is_none());
        assert!(reader.next_event().is_none());
        assert!(reader.next().is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
