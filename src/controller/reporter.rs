use std::io::{self, Write};

use super::axis_normalizer::Observation;

#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("Failed to write report: {0}")]
    Write(#[from] io::Error),
}

/// Consumer of the observations produced by a session.
pub trait ObservationSink {
    /// Called for every observation that is not `Ignored`.
    fn report(&mut self, observation: &Observation) -> Result<(), SinkError>;

    fn disconnected(&mut self) -> Result<(), SinkError> {
        Ok(())
    }
}

// Collects observations in memory, used by tests and replays
impl ObservationSink for Vec<Observation> {
    fn report(&mut self, observation: &Observation) -> Result<(), SinkError> {
        self.push(*observation);
        Ok(())
    }
}

// Line based console output, flushed after each line
#[derive(Debug)]
pub struct ConsoleReporter<W: Write> {
    out: W,
}

impl ConsoleReporter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ObservationSink for ConsoleReporter<W> {
    fn report(&mut self, observation: &Observation) -> Result<(), SinkError> {
        match observation {
            Observation::Ignored => return Ok(()),
            Observation::ButtonChanged { id, pressed } => {
                writeln!(self.out, "event received: {}, {}", id, u8::from(*pressed))?
            }
            Observation::AxisChanged { axis, x, y } => {
                writeln!(self.out, "axis {} at ({:6}, {:6})", axis, x, y)?
            }
        }
        self.out.flush()?;
        Ok(())
    }

    fn disconnected(&mut self) -> Result<(), SinkError> {
        writeln!(self.out, "controller disconnected")?;
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::axis_normalizer::LogicalAxis;

    #[test]
    fn formats_each_observation_on_its_own_line() {
        let mut reporter = ConsoleReporter::new(Vec::new());
        reporter
            .report(&Observation::ButtonChanged { id: 6, pressed: true })
            .unwrap();
        reporter
            .report(&Observation::AxisChanged {
                axis: LogicalAxis::StickRight,
                x: -6000,
                y: 32767,
            })
            .unwrap();
        reporter.report(&Observation::Ignored).unwrap();
        reporter.disconnected().unwrap();

        let text = String::from_utf8(reporter.into_inner()).unwrap();
        assert_eq!(
            text,
            "event received: 6, 1\naxis 1 at ( -6000,  32767)\ncontroller disconnected\n"
        );
    }
}
