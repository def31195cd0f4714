//! Console progress lines with elapsed wall-clock time.
//!
//! `start` prints `label... ` without a newline; the matching `stop` rewrites
//! the same line as `label... 1.234 sec`. Entries form a stack, so nested
//! sections are tolerated, but each `start` must be closed before the next
//! one is printed for the in-place rewrite to land on the right line.

use std::io::{self, Write};
use std::time::{Duration, Instant};
use tracing::debug;

/// A completed timed section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timing {
    pub label: String,
    pub elapsed: Duration,
}

impl Timing {
    /// Elapsed time formatted in seconds with millisecond precision.
    pub fn seconds(&self) -> String {
        format!("{:.3}", self.elapsed.as_secs_f64())
    }
}

pub struct TimingStack<W: Write> {
    out: W,
    entries: Vec<(String, Instant)>,
    counter: usize,
}

impl TimingStack<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TimingStack<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            entries: Vec::new(),
            counter: 0,
        }
    }

    pub fn start(&mut self, label: impl Into<String>) -> io::Result<()> {
        let label = label.into();
        write!(self.out, "{label}... ")?;
        self.out.flush()?;
        self.entries.push((label, Instant::now()));
        Ok(())
    }

    /// Start a section with an automatically numbered label.
    pub fn start_next(&mut self) -> io::Result<()> {
        let label = format!("Run command {}", self.counter);
        self.counter += 1;
        self.start(label)
    }

    /// Close the most recent section. Returns `None` when nothing is open.
    pub fn stop(&mut self) -> io::Result<Option<Timing>> {
        let Some((label, started)) = self.entries.pop() else {
            return Ok(None);
        };
        let timing = Timing {
            label,
            elapsed: started.elapsed(),
        };
        writeln!(self.out, "\r{}... {} sec", timing.label, timing.seconds())?;
        self.out.flush()?;
        debug!(
            label = %timing.label,
            elapsed_ms = timing.elapsed.as_millis() as u64,
            "timed section finished"
        );
        Ok(Some(timing))
    }

    pub fn depth(&self) -> usize {
        self.entries.len()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
