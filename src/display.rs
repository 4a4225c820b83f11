//! Console rendering of operation progress
//!
//! On a terminal each phase gets its own indicatif bar. Otherwise the plain
//! text sink is used, one carriage-return-refreshed line per phase.

use std::io::{self, IsTerminal, Stdout};

use dmrradio_core::progress::{PhaseSink, ProgressReporter, TextSink, MAX_PROGRESS};
use indicatif::{ProgressBar, ProgressStyle};

/// Create a bar style showing the phase label and percentage
fn create_phase_style() -> Result<ProgressStyle, Box<dyn std::error::Error>> {
    Ok(ProgressStyle::default_bar()
        .template("{msg}... {percent:>3}% [{bar:40.cyan/blue}]")?
        .progress_chars("#>-"))
}

/// Progress sink using one indicatif progress bar per phase
#[derive(Default)]
pub struct BarSink {
    current_bar: Option<ProgressBar>,
}

impl BarSink {
    fn create_bar(&mut self, label: &str) {
        if let Some(pb) = self.current_bar.take() {
            pb.finish();
        }
        let pb = ProgressBar::new(u64::from(MAX_PROGRESS));
        pb.set_style(create_phase_style().unwrap_or_else(|_| ProgressStyle::default_bar()));
        pb.set_message(label.to_string());
        self.current_bar = Some(pb);
    }
}

impl PhaseSink for BarSink {
    fn begin_phase(&mut self, _index: usize, label: &str) -> io::Result<()> {
        self.create_bar(label);
        Ok(())
    }

    fn update(&mut self, label: &str, tick: u32, _percent: u32) -> io::Result<()> {
        if self.current_bar.is_none() {
            self.create_bar(label);
        }
        if let Some(pb) = &self.current_bar {
            pb.set_position(u64::from(tick));
        }
        Ok(())
    }

    fn finish(&mut self) -> io::Result<()> {
        if let Some(pb) = self.current_bar.take() {
            pb.finish();
        }
        Ok(())
    }
}

/// Progress sink chosen for the process's stdout
pub enum ConsoleSink {
    /// Interactive terminal
    Bars(BarSink),
    /// Pipe or file
    Text(TextSink<Stdout>),
}

impl ConsoleSink {
    /// Bars when stdout is a terminal, plain text otherwise
    pub fn for_stdout() -> Self {
        let stdout = io::stdout();
        if stdout.is_terminal() {
            ConsoleSink::Bars(BarSink::default())
        } else {
            ConsoleSink::Text(TextSink::new(stdout))
        }
    }
}

impl PhaseSink for ConsoleSink {
    fn begin_phase(&mut self, index: usize, label: &str) -> io::Result<()> {
        match self {
            ConsoleSink::Bars(sink) => sink.begin_phase(index, label),
            ConsoleSink::Text(sink) => sink.begin_phase(index, label),
        }
    }

    fn update(&mut self, label: &str, tick: u32, percent: u32) -> io::Result<()> {
        match self {
            ConsoleSink::Bars(sink) => sink.update(label, tick, percent),
            ConsoleSink::Text(sink) => sink.update(label, tick, percent),
        }
    }

    fn finish(&mut self) -> io::Result<()> {
        match self {
            ConsoleSink::Bars(sink) => sink.finish(),
            ConsoleSink::Text(sink) => sink.finish(),
        }
    }
}

/// Reporter for an operation with the given phase labels
pub fn reporter<I>(phases: I) -> ProgressReporter<ConsoleSink>
where
    I: IntoIterator,
    I::Item: Into<String>,
{
    ProgressReporter::new(phases, ConsoleSink::for_stdout())
}
