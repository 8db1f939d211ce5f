//! Axis normalization for delta-only joystick streams
//!
//! The driver reports one channel per event, so the 2-D position of every
//! logical axis has to be accumulated here. After each update the deadzone
//! policy decides whether the new position is reported or swallowed.
//!
//! # Deadzone geometry
//!
//! The rest region is a square of half-width `threshold` around the origin
//! (Chebyshev distance), not a circle. The classic zero-crossing test
//!
//! ```text
//! |x| + |y| + ||x| - |y|| < 2T
//! ```
//!
//! reduces to `max(|x|, |y|) < T` through the identity
//! `a + b + |a - b| = 2 * max(a, b)`, which is what [`in_deadzone`] computes.

use std::fmt;

use tracing::{debug, trace};

use super::event_reader::RawEvent;

pub const DEADZONE_THRESHOLD: u16 = 5000;
pub const AXIS_MAX: i16 = 32767;
pub const AXIS_MIN: i16 = -32767;

// Logical axis groups, in report index order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalAxis {
    StickLeft = 0,
    StickRight = 1,
    Triggers = 2,
    Dpad = 3,
}

impl LogicalAxis {
    pub const ALL: [LogicalAxis; 4] = [
        LogicalAxis::StickLeft,
        LogicalAxis::StickRight,
        LogicalAxis::Triggers,
        LogicalAxis::Dpad,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    // Triggers rest at full deflection, so a deadzone around zero makes no sense there
    pub fn is_deadzone_filtered(self) -> bool {
        !matches!(self, LogicalAxis::Triggers)
    }
}

impl fmt::Display for LogicalAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Component {
    X,
    Y,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    Keep,
    Invert,
}

impl Sign {
    // Stored components always stay inside [AXIS_MIN, AXIS_MAX]
    pub fn apply(self, value: i16) -> i16 {
        let signed = match self {
            Sign::Keep => value,
            Sign::Invert => value.saturating_neg(),
        };
        signed.clamp(AXIS_MIN, AXIS_MAX)
    }
}

/// Where a raw axis channel lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelMapping {
    pub axis: LogicalAxis,
    pub component: Component,
    pub sign: Sign,
}

const fn mapping(axis: LogicalAxis, component: Component, sign: Sign) -> ChannelMapping {
    ChannelMapping {
        axis,
        component,
        sign,
    }
}

/// Raw axis channel table, indexed by raw id. Ids past the end are unmapped.
pub const CHANNEL_TABLE: [ChannelMapping; 8] = [
    mapping(LogicalAxis::StickLeft, Component::X, Sign::Keep),
    mapping(LogicalAxis::StickLeft, Component::Y, Sign::Invert),
    mapping(LogicalAxis::Triggers, Component::X, Sign::Invert),
    mapping(LogicalAxis::StickRight, Component::X, Sign::Keep),
    mapping(LogicalAxis::StickRight, Component::Y, Sign::Invert),
    mapping(LogicalAxis::Triggers, Component::Y, Sign::Invert),
    mapping(LogicalAxis::Dpad, Component::X, Sign::Keep),
    mapping(LogicalAxis::Dpad, Component::Y, Sign::Invert),
];

pub fn channel_mapping(id: u8) -> Option<ChannelMapping> {
    CHANNEL_TABLE.get(usize::from(id)).copied()
}

// Persistent position of one logical axis
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AxisState {
    pub x: i16,
    pub y: i16,
}

impl AxisState {
    pub fn set(&mut self, component: Component, value: i16) {
        match component {
            Component::X => self.x = value,
            Component::Y => self.y = value,
        }
    }

    pub fn get(&self, component: Component) -> i16 {
        match component {
            Component::X => self.x,
            Component::Y => self.y,
        }
    }

    pub fn reset(&mut self) {
        *self = AxisState::default();
    }
}

/// True when the point lies inside the square rest region.
pub fn in_deadzone(state: AxisState, threshold: u16) -> bool {
    let magnitude = state.x.unsigned_abs().max(state.y.unsigned_abs());
    magnitude < threshold
}

/// Result of feeding one raw event into the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observation {
    Ignored,
    AxisChanged { axis: LogicalAxis, x: i16, y: i16 },
    ButtonChanged { id: u8, pressed: bool },
}

impl Observation {
    pub fn is_ignored(&self) -> bool {
        matches!(self, Observation::Ignored)
    }
}

#[derive(Debug, Clone)]
pub struct AxisNormalizer {
    axes: [AxisState; 4],
    deadzone: u16,
}

impl Default for AxisNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl AxisNormalizer {
    pub fn new() -> Self {
        Self::with_deadzone(DEADZONE_THRESHOLD)
    }

    pub fn with_deadzone(deadzone: u16) -> Self {
        debug!("Creating AxisNormalizer with deadzone {}", deadzone);
        Self {
            axes: [AxisState::default(); 4],
            deadzone,
        }
    }

    pub fn deadzone(&self) -> u16 {
        self.deadzone
    }

    pub fn axes(&self) -> &[AxisState; 4] {
        &self.axes
    }

    pub fn axis(&self, axis: LogicalAxis) -> AxisState {
        self.axes[axis.index()]
    }

    pub fn axis_mut(&mut self, axis: LogicalAxis) -> &mut AxisState {
        &mut self.axes[axis.index()]
    }

    /// Apply one axis event and report the resulting position.
    ///
    /// Unmapped channels are a normal outcome and leave every axis untouched.
    pub fn apply(&mut self, event: &RawEvent) -> Observation {
        let Some(ChannelMapping {
            axis,
            component,
            sign,
        }) = channel_mapping(event.id)
        else {
            trace!("Ignoring unmapped axis channel {}", event.id);
            return Observation::Ignored;
        };

        let deadzone = self.deadzone;
        let state = self.axis_mut(axis);
        state.set(component, sign.apply(event.value));

        if axis.is_deadzone_filtered() && in_deadzone(*state, deadzone) {
            trace!("Axis {:?} inside deadzone, resetting", axis);
            state.reset();
            return Observation::Ignored;
        }

        Observation::AxisChanged {
            axis,
            x: state.x,
            y: state.y,
        }
    }
}
