//! Phase-based progress reporting
//!
//! Long-running radio and network operations report progress as a stream of
//! ticks on the fixed scale `0..=MAX_PROGRESS`. A tick of zero marks the start
//! of the next phase; ticks within a phase never decrease.
//!
//! [`ProgressReporter`] maps those ticks onto an ordered list of phase labels
//! and renders them through a [`PhaseSink`]:
//!
//! ```text
//! Preparing to write codeplug to radio... 100%
//! Erasing the radio's codeplug... 100%
//! Writing codeplug to radio...  42%
//! ```
//!
//! Operations receive the reporter as `&mut dyn Progress`. An error returned
//! from [`Progress::report`] asks the operation to stop, and the operation
//! returns that error to its caller.

use std::io::{self, Write};

use thiserror::Error;

/// Upper end of the tick scale shared by every operation
pub const MAX_PROGRESS: u32 = 1000;

/// Errors raised by a progress reporter
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProgressError {
    /// More phases were started than the reporter was configured with
    #[error("operation started phase {started} but only {configured} phase(s) are configured")]
    PhaseOverrun {
        /// 1-based number of the phase that was started
        started: usize,
        /// Number of configured phases
        configured: usize,
    },
    /// The operation was cancelled by the reporter's owner
    #[error("operation cancelled")]
    Cancelled,
    /// Writing the status output failed
    #[error("progress output failed: {0}")]
    Output(String),
}

impl From<io::Error> for ProgressError {
    fn from(e: io::Error) -> Self {
        ProgressError::Output(e.to_string())
    }
}

/// Receiver of progress ticks
pub trait Progress {
    /// Report `tick` (in `0..=MAX_PROGRESS`). A tick of zero starts the next
    /// phase.
    fn report(&mut self, tick: u32) -> Result<(), ProgressError>;
}

impl<P: Progress + ?Sized> Progress for &mut P {
    fn report(&mut self, tick: u32) -> Result<(), ProgressError> {
        (**self).report(tick)
    }
}

/// A progress receiver that discards every tick
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl Progress for Silent {
    fn report(&mut self, _tick: u32) -> Result<(), ProgressError> {
        Ok(())
    }
}

/// Percentage shown for `tick`, truncated
pub fn percent(tick: u32) -> u32 {
    (u64::from(tick) * 100 / u64::from(MAX_PROGRESS)) as u32
}

/// Tick for `done` out of `total` units of work, capped at [`MAX_PROGRESS`]
pub fn scaled_tick(done: usize, total: usize) -> u32 {
    if total == 0 || done >= total {
        return MAX_PROGRESS;
    }
    (done as u64 * u64::from(MAX_PROGRESS) / total as u64) as u32
}

/// Output side of a [`ProgressReporter`]
pub trait PhaseSink {
    /// A new phase starts. `index` is 0-based.
    fn begin_phase(&mut self, index: usize, label: &str) -> io::Result<()>;

    /// Progress within the current phase
    fn update(&mut self, label: &str, tick: u32, percent: u32) -> io::Result<()>;

    /// The operation is over; terminate the status line
    fn finish(&mut self) -> io::Result<()>;
}

/// Plain text sink: one carriage-return-refreshed line per phase
#[derive(Debug)]
pub struct TextSink<W: Write> {
    out: W,
    dirty: bool,
}

impl<W: Write> TextSink<W> {
    /// Create a sink writing to `out`
    pub fn new(out: W) -> Self {
        Self { out, dirty: false }
    }

    /// Recover the underlying writer
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> PhaseSink for TextSink<W> {
    fn begin_phase(&mut self, index: usize, _label: &str) -> io::Result<()> {
        if index != 0 {
            writeln!(self.out)?;
        }
        Ok(())
    }

    fn update(&mut self, label: &str, _tick: u32, percent: u32) -> io::Result<()> {
        write!(self.out, "{}... {:3}%\r", label, percent)?;
        self.dirty = true;
        self.out.flush()
    }

    fn finish(&mut self) -> io::Result<()> {
        if self.dirty {
            writeln!(self.out)?;
            self.dirty = false;
        }
        self.out.flush()
    }
}

/// Maps a tick stream onto an ordered list of phase labels
///
/// A reporter serves exactly one operation. Starting more phases than were
/// configured is rejected with [`ProgressError::PhaseOverrun`].
pub struct ProgressReporter<S: PhaseSink> {
    phases: Vec<String>,
    started: usize,
    sink: S,
}

impl<S: PhaseSink> ProgressReporter<S> {
    /// Create a reporter for `phases`, rendering through `sink`
    pub fn new<I>(phases: I, sink: S) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self {
            phases: phases.into_iter().map(Into::into).collect(),
            started: 0,
            sink,
        }
    }

    /// Number of phases started so far
    pub fn phases_started(&self) -> usize {
        self.started
    }

    /// Label of the current phase. Before the first phase starts this is the
    /// first label.
    pub fn current_label(&self) -> &str {
        self.phases
            .get(self.started.saturating_sub(1))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Terminate the status output
    pub fn finish(&mut self) -> Result<(), ProgressError> {
        self.sink.finish().map_err(Into::into)
    }

    /// Recover the sink
    pub fn into_sink(self) -> S {
        self.sink
    }
}

impl<S: PhaseSink> Progress for ProgressReporter<S> {
    fn report(&mut self, tick: u32) -> Result<(), ProgressError> {
        if tick == 0 {
            if self.started >= self.phases.len() {
                log::error!(
                    "progress: phase {} started, {} configured",
                    self.started + 1,
                    self.phases.len()
                );
                return Err(ProgressError::PhaseOverrun {
                    started: self.started + 1,
                    configured: self.phases.len(),
                });
            }
            self.sink.begin_phase(self.started, &self.phases[self.started])?;
            self.started += 1;
        }

        let label = self.current_label().to_string();
        self.sink.update(&label, tick, percent(tick))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_reporter(phases: &[&str]) -> ProgressReporter<TextSink<Vec<u8>>> {
        ProgressReporter::new(phases.iter().copied(), TextSink::new(Vec::new()))
    }

    fn output(reporter: ProgressReporter<TextSink<Vec<u8>>>) -> String {
        String::from_utf8(reporter.into_sink().into_inner()).unwrap()
    }

    #[test]
    fn test_percent_truncates() {
        assert_eq!(percent(0), 0);
        assert_eq!(percent(9), 0);
        assert_eq!(percent(10), 1);
        assert_eq!(percent(999), 99);
        assert_eq!(percent(MAX_PROGRESS), 100);
    }

    #[test]
    fn test_scaled_tick() {
        assert_eq!(scaled_tick(0, 4), 0);
        assert_eq!(scaled_tick(1, 4), MAX_PROGRESS / 4);
        assert_eq!(scaled_tick(4, 4), MAX_PROGRESS);
        assert_eq!(scaled_tick(9, 4), MAX_PROGRESS);
        assert_eq!(scaled_tick(0, 0), MAX_PROGRESS);
    }

    #[test]
    fn test_two_phases() {
        let mut reporter = text_reporter(&["Reading", "Writing"]);
        for tick in 0..=MAX_PROGRESS {
            reporter.report(tick).unwrap();
        }
        for tick in 0..=MAX_PROGRESS {
            reporter.report(tick).unwrap();
        }
        assert_eq!(reporter.phases_started(), 2);
        reporter.finish().unwrap();

        let out = output(reporter);
        let lines: Vec<&str> = out.trim_end_matches('\n').split('\n').collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("Reading...   0%\r"));
        assert!(!lines[0].contains("Writing"));
        assert!(lines[0].ends_with("Reading... 100%\r"));
        assert!(lines[1].starts_with("Writing...   0%\r"));
        assert!(!lines[1].contains("Reading"));
        assert!(lines[1].ends_with("Writing... 100%\r"));
    }

    #[test]
    fn test_plateau_at_99() {
        let mut reporter = text_reporter(&["Writing"]);
        reporter.report(0).unwrap();
        reporter.report(MAX_PROGRESS - 1).unwrap();
        let out = output(reporter);
        assert!(out.ends_with("Writing...  99%\r"));
    }

    #[test]
    fn test_ticks_before_first_phase_use_first_label() {
        let mut reporter = text_reporter(&["Preparing", "Reading"]);
        reporter.report(500).unwrap();
        assert_eq!(reporter.phases_started(), 0);
        reporter.report(0).unwrap();
        assert_eq!(reporter.current_label(), "Preparing");
        let out = output(reporter);
        assert_eq!(out, "Preparing...  50%\rPreparing...   0%\r");
    }

    #[test]
    fn test_phase_overrun_rejected() {
        let mut reporter = text_reporter(&["Reading", "Writing"]);
        reporter.report(0).unwrap();
        reporter.report(0).unwrap();
        assert_eq!(
            reporter.report(0),
            Err(ProgressError::PhaseOverrun {
                started: 3,
                configured: 2
            })
        );
        // The reporter stays on the last phase
        assert_eq!(reporter.current_label(), "Writing");
        reporter.report(MAX_PROGRESS).unwrap();
    }

    #[test]
    fn test_finish_without_output_is_empty() {
        let mut reporter = text_reporter(&["Reading"]);
        reporter.finish().unwrap();
        assert_eq!(output(reporter), "");
    }

    #[test]
    fn test_silent() {
        let mut silent = Silent;
        for tick in [0, 10, 0, 0, 0] {
            silent.report(tick).unwrap();
        }
    }
}
