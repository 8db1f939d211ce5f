use tracing::debug;

use super::axis_normalizer::{AxisNormalizer, Component, LogicalAxis, Observation};
use super::event_reader::RawEvent;

// Raw ids of the digital L2/R2 channels
pub const BTN_L2: u8 = 0x06;
pub const BTN_R2: u8 = 0x07;

// The analog trigger axes do not return to rest on their own, the release of
// the matching digital button is the only reliable signal.
const RELEASE_RESETS: [(u8, Component); 2] = [(BTN_L2, Component::X), (BTN_R2, Component::Y)];

#[derive(Debug, Clone, Copy, Default)]
pub struct ButtonDispatcher;

impl ButtonDispatcher {
    pub fn new() -> Self {
        Self
    }

    /// Report a button transition and apply the trigger release policy.
    pub fn apply(&self, event: &RawEvent, axes: &mut AxisNormalizer) -> Observation {
        let pressed = event.value != 0;

        if !pressed {
            if let Some((_, component)) = RELEASE_RESETS.iter().find(|(id, _)| *id == event.id) {
                debug!(
                    "Button {} released, resetting trigger component {:?}",
                    event.id, component
                );
                axes.axis_mut(LogicalAxis::Triggers).set(*component, 0);
            }
        }

        Observation::ButtonChanged {
            id: event.id,
            pressed,
        }
    }
}
