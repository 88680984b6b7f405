//! Instantaneous descriptions and the observers that receive them while a machine runs.
//!
//! A run reports to a [`Tracer`]: once when it starts, once per configuration (the initial
//! one included) and once with the verdict. Tracers cannot fail a run. The writing tracers
//! keep the first I/O error they hit and hand it back from `finish`.

use crate::types::{Symbol, EMPTY_MEMORY_GLYPH};
use serde::Serialize;
use std::fmt;
use std::io::{self, Write};

/// A snapshot of the machine: state, memory register, tape contents and head position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub state: String,
    pub memory: Symbol,
    pub tape: Vec<Symbol>,
    pub head: usize,
}

impl Snapshot {
    /// Renders the tape left to right, one glyph per cell.
    pub fn render_tape(&self) -> String {
        self.tape.iter().map(|symbol| symbol.glyph()).collect()
    }

    /// Renders the memory register, using `∅` when it is empty.
    pub fn render_memory(&self) -> String {
        match self.memory {
            Symbol::Blank => EMPTY_MEMORY_GLYPH.to_string(),
            Symbol::Char(c) => c.to_string(),
        }
    }

    fn prefix(&self) -> String {
        format!("({}, {})  ", self.state, self.render_memory())
    }
}

impl fmt::Display for Snapshot {
    /// Two lines: `(state, memory)  tape`, then a `^` under the cell the head is on.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = self.prefix();
        writeln!(f, "{}{}", prefix, self.render_tape())?;
        write!(f, "{}^", " ".repeat(prefix.chars().count() + self.head))
    }
}

/// Receives the trace of a run.
pub trait Tracer {
    /// Called once before the initial configuration is recorded.
    fn begin(&mut self, _input: &str) {}

    /// Called with the initial configuration and after every successful step.
    fn record(&mut self, snapshot: &Snapshot);

    /// Called once when the run is over.
    fn verdict(&mut self, _input: &str, _accepted: bool) {}
}

/// Collects every configuration of a run.
impl Tracer for Vec<Snapshot> {
    fn record(&mut self, snapshot: &Snapshot) {
        self.push(snapshot.clone());
    }
}

/// Discards the trace.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoTrace;

impl Tracer for NoTrace {
    fn record(&mut self, _snapshot: &Snapshot) {}
}

/// Keeps the first write error so later writes become no-ops.
#[derive(Debug)]
struct Sink<W: Write> {
    writer: W,
    error: Option<io::Error>,
}

impl<W: Write> Sink<W> {
    fn new(writer: W) -> Self {
        Self {
            writer,
            error: None,
        }
    }

    fn emit(&mut self, write: impl FnOnce(&mut W) -> io::Result<()>) {
        if self.error.is_some() {
            return;
        }
        if let Err(e) = write(&mut self.writer) {
            self.error = Some(e);
        }
    }

    fn finish(mut self) -> io::Result<W> {
        if let Some(e) = self.error.take() {
            return Err(e);
        }
        self.writer.flush()?;
        Ok(self.writer)
    }
}

/// Prints a human readable trace.
///
/// ```text
/// ===================================
/// Simulating input: 11
/// ===================================
///
/// (q0, ∅)  11
///          ^
///
/// Result: ACCEPTED
/// ```
#[derive(Debug)]
pub struct TextTracer<W: Write> {
    sink: Sink<W>,
}

const RULE: &str = "===================================";

impl<W: Write> TextTracer<W> {
    pub fn new(writer: W) -> Self {
        Self {
            sink: Sink::new(writer),
        }
    }

    /// Flushes the writer and returns it, or the first error that occurred while tracing.
    pub fn finish(self) -> io::Result<W> {
        self.sink.finish()
    }
}

impl<W: Write> Tracer for TextTracer<W> {
    fn begin(&mut self, input: &str) {
        self.sink.emit(|w| {
            writeln!(w, "{}", RULE)?;
            writeln!(w, "Simulating input: {}", input)?;
            writeln!(w, "{}\n", RULE)
        });
    }

    fn record(&mut self, snapshot: &Snapshot) {
        self.sink.emit(|w| writeln!(w, "{}\n", snapshot));
    }

    fn verdict(&mut self, _input: &str, accepted: bool) {
        let result = if accepted { "ACCEPTED" } else { "REJECTED" };
        self.sink.emit(|w| writeln!(w, "Result: {}\n", result));
    }
}

#[derive(Serialize)]
#[serde(tag = "event", rename_all = "lowercase")]
enum Event<'a> {
    Begin {
        input: &'a str,
    },
    Config {
        state: &'a str,
        memory: Symbol,
        tape: String,
        head: usize,
    },
    Verdict {
        input: &'a str,
        accepted: bool,
    },
}

/// Writes the trace as JSON lines, one event per line.
#[derive(Debug)]
pub struct JsonTracer<W: Write> {
    sink: Sink<W>,
}

impl<W: Write> JsonTracer<W> {
    pub fn new(writer: W) -> Self {
        Self {
            sink: Sink::new(writer),
        }
    }

    /// Flushes the writer and returns it, or the first error that occurred while tracing.
    pub fn finish(self) -> io::Result<W> {
        self.sink.finish()
    }

    fn write_event(&mut self, event: &Event<'_>) {
        self.sink.emit(|w| {
            serde_json::to_writer(&mut *w, event)?;
            writeln!(w)
        });
    }
}

impl<W: Write> Tracer for JsonTracer<W> {
    fn begin(&mut self, input: &str) {
        self.write_event(&Event::Begin { input });
    }

    fn record(&mut self, snapshot: &Snapshot) {
        self.write_event(&Event::Config {
            state: &snapshot.state,
            memory: snapshot.memory,
            tape: snapshot.render_tape(),
            head: snapshot.head,
        });
    }

    fn verdict(&mut self, input: &str, accepted: bool) {
        self.write_event(&Event::Verdict { input, accepted });
    }
}
