//! Session loop - drives the reader until the controller goes away
//!
//! Modelled as a two-state machine:
//!
//! ```text
//! Running ──(end of stream)──► Disconnected
//! ```
//!
//! Everything runs on the calling thread. Each event is fully processed
//! before the next read is issued.

use chrono::Duration;
use statum::{machine, state};
use tracing::{debug, info, trace};

use super::axis_normalizer::{AxisNormalizer, Observation};
use super::button_dispatcher::ButtonDispatcher;
use super::event_reader::{EventKind, EventReader, RawEvent};
use super::reporter::{ObservationSink, SinkError};

// Counters collected over one session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub events_read: u64,
    pub axis_reports: u64,
    pub button_reports: u64,
    pub ignored: u64,
    pub last_timestamp_ms: u32,
}

impl SessionStats {
    fn record(&mut self, event: &RawEvent, observation: &Observation) {
        self.events_read += 1;
        self.last_timestamp_ms = event.timestamp;
        match observation {
            Observation::Ignored => self.ignored += 1,
            Observation::AxisChanged { .. } => self.axis_reports += 1,
            Observation::ButtonChanged { .. } => self.button_reports += 1,
        }
    }

    // Device-relative time of the last event seen
    pub fn uptime(&self) -> Duration {
        Duration::milliseconds(i64::from(self.last_timestamp_ms))
    }
}

#[state]
#[derive(Debug, Clone)]
pub enum SessionState {
    Running,
    Disconnected,
}

#[machine]
#[derive(Debug)]
pub struct Session<S: SessionState> {
    reader: EventReader,
    axes: AxisNormalizer,
    buttons: ButtonDispatcher,
    stats: SessionStats,
}

impl<S: SessionState> Session<S> {
    pub fn axes(&self) -> &AxisNormalizer {
        &self.axes
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }
}

impl Session<Running> {
    pub fn start(reader: EventReader, axes: AxisNormalizer) -> Self {
        info!(
            "Starting session with deadzone threshold {}",
            axes.deadzone()
        );
        Self::new(reader, axes, ButtonDispatcher::new(), SessionStats::default())
    }

    // Route one event to the component owning its kind
    pub fn dispatch(&mut self, event: RawEvent) -> Observation {
        let observation = match event.kind {
            EventKind::Axis => self.axes.apply(&event),
            EventKind::Button => self.buttons.apply(&event, &mut self.axes),
            EventKind::Other(kind) => {
                trace!("Ignoring event of kind {:#04x}", kind);
                Observation::Ignored
            }
        };
        self.stats.record(&event, &observation);
        observation
    }

    /// Process events until the reader reports end of stream.
    ///
    /// Returns an error only when the sink itself fails; a disconnect is the
    /// normal way for a session to end.
    pub fn run<K: ObservationSink>(
        mut self,
        sink: &mut K,
    ) -> Result<Session<Disconnected>, SinkError> {
        info!("Session running, waiting for controller events");

        while let Some(event) = self.reader.next_event() {
            let observation = self.dispatch(event);
            if observation.is_ignored() {
                continue;
            }
            sink.report(&observation)?;
        }

        debug!("Reader closed after {} records", self.reader.records_read());
        sink.disconnected()?;

        info!(
            "Controller disconnected: {} events ({} axis, {} button, {} ignored) over {}ms",
            self.stats.events_read,
            self.stats.axis_reports,
            self.stats.button_reports,
            self.stats.ignored,
            self.stats.uptime().num_milliseconds()
        );
        Ok(self.transition())
    }
}
