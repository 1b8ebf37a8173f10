// ABOUTME: Operator-facing output for deployment runs.
// ABOUTME: Renders steps, warnings and results as text, quietly, or as JSON lines.

use serde::Serialize;
use std::time::{Duration, Instant};

/// How results are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Headline, one line per step, then the result
    Normal,
    /// Only the result and problems (for CI logs)
    Quiet,
    /// One JSON object per line
    Json,
}

impl OutputMode {
    /// `--json` wins over `--quiet`.
    pub fn from_flags(quiet: bool, json: bool) -> Self {
        match (quiet, json) {
            (_, true) => OutputMode::Json,
            (true, false) => OutputMode::Quiet,
            (false, false) => OutputMode::Normal,
        }
    }
}

#[derive(Clone, Copy)]
enum Stream {
    Stdout,
    Stderr,
}

pub struct Output {
    mode: OutputMode,
    started: Option<Instant>,
}

impl Output {
    pub fn new(mode: OutputMode) -> Self {
        Self {
            mode,
            started: None,
        }
    }

    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    /// Start the run clock reported with the final result.
    pub fn start_timer(&mut self) {
        self.started = Some(Instant::now());
    }

    pub fn elapsed(&self) -> Option<Duration> {
        self.started.map(|t| t.elapsed())
    }

    /// Headline for a run. Text mode only.
    pub fn progress(&self, message: &str) {
        if self.mode == OutputMode::Normal {
            println!("{message}");
        }
    }

    /// One step of a run.
    pub fn step(&self, message: &str) {
        match self.mode {
            OutputMode::Normal => println!("  → {message}"),
            OutputMode::Quiet => {}
            OutputMode::Json => self.emit(Stream::Stdout, "step", message),
        }
    }

    pub fn warning(&self, message: &str) {
        match self.mode {
            OutputMode::Json => self.emit(Stream::Stderr, "warning", message),
            _ => eprintln!("Warning: {message}"),
        }
    }

    pub fn error(&self, message: &str) {
        match self.mode {
            OutputMode::Json => self.emit(Stream::Stderr, "error", message),
            _ => eprintln!("Error: {message}"),
        }
    }

    /// Final result line, with the run time in normal mode.
    pub fn success(&self, message: &str) {
        match (self.mode, self.elapsed()) {
            (OutputMode::Normal, Some(elapsed)) => {
                println!("{message} ({:.1}s)", elapsed.as_secs_f64())
            }
            (OutputMode::Json, _) => self.emit(Stream::Stdout, "success", message),
            _ => println!("{message}"),
        }
    }

    /// Structured payload such as a run report. JSON mode only.
    pub fn record<T: Serialize>(&self, kind: &str, data: &T) {
        if self.mode == OutputMode::Json {
            write_line(Stream::Stdout, &Record { event: kind, data });
        }
    }

    fn emit(&self, stream: Stream, event: &str, message: &str) {
        let line = Event {
            event,
            message,
            duration_secs: self.elapsed().map(|d| d.as_secs_f64()),
        };
        write_line(stream, &line);
    }
}

fn write_line<T: Serialize>(stream: Stream, value: &T) {
    let Ok(json) = serde_json::to_string(value) else {
        return;
    };
    match stream {
        Stream::Stdout => println!("{json}"),
        Stream::Stderr => eprintln!("{json}"),
    }
}

#[derive(Serialize)]
struct Event<'a> {
    event: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration_secs: Option<f64>,
}

#[derive(Serialize)]
struct Record<'a, T: Serialize> {
    event: &'a str,
    data: &'a T,
}
