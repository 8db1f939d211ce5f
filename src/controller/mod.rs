//! Controller subsystem for joystick input handling
//!
//! Implements a single-threaded pipeline over the raw joystick stream:
//!
//! 1. [`event_reader`] - Fixed-size record decoding from the device node
//! 2. [`axis_normalizer`] - Per-axis state, channel table and deadzone policy
//! 3. [`button_dispatcher`] - Button transitions and trigger release resets
//! 4. [`session`] - The read/dispatch loop until disconnect
//! 5. [`reporter`] - Consumers of the resulting observations
//!
//! # Architecture
//!
//! ```text
//!                        ┌─► AxisNormalizer ───┐
//! Device ──► EventReader ┤         ▲           ├──► ObservationSink
//!                        └─► ButtonDispatcher ─┘
//! ```

pub mod axis_normalizer;
pub mod button_dispatcher;
pub mod event_reader;
pub mod reporter;
pub mod session;

pub use axis_normalizer::{AxisNormalizer, AxisState, LogicalAxis, Observation};
pub use button_dispatcher::ButtonDispatcher;
pub use event_reader::{EventKind, EventReader, RawEvent};
pub use reporter::{ConsoleReporter, ObservationSink, SinkError};
pub use session::{Disconnected, Running, Session, SessionStats};
