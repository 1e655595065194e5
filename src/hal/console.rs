//! Terminal output for the desktop runner.
//!
//! [`TerminalGauge`] is a simulated output device that redraws a single
//! bar on a terminal line. [`ConsoleObserver`] prints dry-run labels and
//! the stop notice.

use std::io::{self, Write};

use crate::controller::RunOutcome;
use crate::traits::{BreathObserver, BreathingDevice};
use crate::waveform::Phase;

/// Simulated output that draws its level as a bar.
///
/// # Example
///
/// ```rust
/// use rs_breathe::hal::TerminalGauge;
/// use rs_breathe::traits::BreathingDevice;
///
/// let mut gauge = TerminalGauge::new(Vec::new()).with_width(4);
/// gauge.set_value(0.5).unwrap();
/// assert_eq!(gauge.get_ref().as_slice(), b"\r[##  ]  50%");
/// ```
#[derive(Debug)]
pub struct TerminalGauge<W: Write> {
    out: W,
    width: usize,
    last_cells: Option<usize>,
}

impl TerminalGauge<io::Stderr> {
    /// Gauge drawn on standard error.
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }
}

impl<W: Write> TerminalGauge<W> {
    /// Default bar width in characters.
    pub const DEFAULT_WIDTH: usize = 40;

    /// Creates a gauge writing to `out`.
    pub fn new(out: W) -> Self {
        Self {
            out,
            width: Self::DEFAULT_WIDTH,
            last_cells: None,
        }
    }

    /// Set the bar width in characters (at least 1).
    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width.max(1);
        self
    }

    /// Borrow the underlying writer.
    pub fn get_ref(&self) -> &W {
        &self.out
    }

    fn draw(&mut self, level: f32) -> io::Result<()> {
        let level = level.clamp(0.0, 1.0);
        let cells = (level * self.width as f32).round() as usize;
        // PWM issues a thousand updates per phase; skip redraws that change nothing.
        if self.last_cells == Some(cells) {
            return Ok(());
        }
        self.last_cells = Some(cells);
        write!(
            self.out,
            "\r[{}{}] {:>3}%",
            "#".repeat(cells),
            " ".repeat(self.width - cells),
            (level * 100.0).round() as u32
        )?;
        self.out.flush()
    }
}

impl<W: Write> BreathingDevice for TerminalGauge<W> {
    type Error = io::Error;

    fn on(&mut self) -> io::Result<()> {
        self.draw(1.0)
    }

    fn off(&mut self) -> io::Result<()> {
        self.draw(0.0)
    }

    fn set_value(&mut self, duty: f32) -> io::Result<()> {
        self.draw(duty)
    }
}

/// Prints phase labels and the stop notice to standard output.
#[derive(Debug, Default)]
pub struct ConsoleObserver;

impl BreathObserver for ConsoleObserver {
    fn phase_label(&mut self, phase: Phase) {
        println!("{}", phase.label());
    }

    fn stopped(&mut self, _outcome: &RunOutcome) {
        println!();
        println!("Breathing stopped manually...");
    }
}
