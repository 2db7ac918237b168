//! Tolerant NDJSON record stream.
//!
//! Lines are accumulated into a buffer and the buffer is re-parsed after each
//! line, so a record whose encoding spans several physical lines is still
//! reconstructed. Content that can never parse is discarded and the stream
//! moves on.
//!
//! # Buffer states
//! ```text
//! parse OK (object)   -> emit record, clear buffer
//! parse OK (other)    -> discard, clear buffer
//! EOF-class error     -> keep buffering (record continues on next line)
//! any other error     -> discard stale content, re-try the current line alone
//! end of input        -> discard whatever is still buffered
//! ```

use std::fs::File;
use std::io::{self, BufRead, BufReader, Cursor, ErrorKind};
use std::path::Path;

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};

/// A parsed JSON object.
pub type Record = Map<String, Value>;

/// Default upper bound for a single buffered record (16 MiB).
pub const DEFAULT_MAX_RECORD_BYTES: usize = 16 * 1024 * 1024;

/// Line iterator over an opened file.
pub type FileLines = io::Lines<BufReader<File>>;

/// Line iterator over in-memory text.
pub type TextLines = io::Lines<Cursor<String>>;

const MEMORY_ORIGIN: &str = "<memory>";

/// Options controlling how records are read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReaderOptions {
    /// Record a diagnostic for every piece of discarded content.
    pub strict: bool,
    /// Partial records larger than this are dropped.
    pub max_record_bytes: usize,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            strict: false,
            max_record_bytes: DEFAULT_MAX_RECORD_BYTES,
        }
    }
}

impl ReaderOptions {
    /// Tolerant defaults with strict diagnostics switched on.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            strict: true,
            ..Self::default()
        }
    }
}

/// Lazy, finite, non-restartable sequence of JSON objects.
pub struct RecordStream<I> {
    lines: Option<I>,
    origin: String,
    buffer: String,
    buffer_start: usize,
    line_no: usize,
    max_record_bytes: usize,
    open_failure: Option<String>,
    diagnostics: Option<Diagnostics>,
}

impl RecordStream<FileLines> {
    /// Opens an NDJSON file.
    ///
    /// A missing file yields an empty stream. Any other open failure is logged
    /// (and reported as a diagnostic when one is attached) and also yields an
    /// empty stream.
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let origin = path.display().to_string();
        match File::open(path) {
            Ok(file) => Self::new(BufReader::new(file).lines(), origin),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(origin = %origin, "record file not found, stream is empty");
                Self::empty(origin)
            }
            Err(err) => {
                warn!(origin = %origin, error = %err, "failed to open record file");
                let mut stream = Self::empty(origin);
                stream.open_failure = Some(err.to_string());
                stream
            }
        }
    }
}

impl RecordStream<TextLines> {
    /// Streams records out of in-memory text.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self::new(Cursor::new(text.into()).lines(), MEMORY_ORIGIN)
    }
}

impl<R: BufRead> RecordStream<io::Lines<R>> {
    /// Streams records out of any buffered reader.
    pub fn from_reader(reader: R) -> Self {
        Self::new(reader.lines(), MEMORY_ORIGIN)
    }
}

impl<I> RecordStream<I>
where
    I: Iterator<Item = io::Result<String>>,
{
    /// Wraps a line iterator. Lines are expected without their terminator.
    pub fn new(lines: I, origin: impl Into<String>) -> Self {
        Self {
            lines: Some(lines),
            origin: origin.into(),
            buffer: String::new(),
            buffer_start: 0,
            line_no: 0,
            max_record_bytes: DEFAULT_MAX_RECORD_BYTES,
            open_failure: None,
            diagnostics: None,
        }
    }

    fn empty(origin: String) -> Self {
        Self {
            lines: None,
            origin,
            buffer: String::new(),
            buffer_start: 0,
            line_no: 0,
            max_record_bytes: DEFAULT_MAX_RECORD_BYTES,
            open_failure: None,
            diagnostics: None,
        }
    }

    /// Applies reader options. Strict mode needs a sink; see [`Self::with_diagnostics`].
    #[must_use]
    pub fn with_options(mut self, options: ReaderOptions) -> Self {
        self.max_record_bytes = options.max_record_bytes.max(1);
        self
    }

    /// Reports discarded content into `sink`.
    #[must_use]
    pub fn with_diagnostics(mut self, sink: Diagnostics) -> Self {
        self.diagnostics = Some(sink);
        self
    }

    /// Where this stream reads from.
    #[must_use]
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Number of physical lines consumed so far.
    #[must_use]
    pub fn lines_read(&self) -> usize {
        self.line_no
    }

    fn report(&self, line: usize, kind: DiagnosticKind) {
        debug!(origin = %self.origin, line, reason = %kind, "discarding input");
        if let Some(sink) = &self.diagnostics {
            sink.push(Diagnostic {
                origin: self.origin.clone(),
                line,
                kind,
            });
        }
    }

    fn feed(&mut self, line: &str) -> Option<Record> {
        if self.buffer.is_empty() {
            if line.trim().is_empty() {
                return None;
            }
            self.buffer_start = self.line_no;
        }
        self.buffer.push_str(line);
        self.buffer.push('\n');

        match serde_json::from_str::<Value>(&self.buffer) {
            Ok(value) => {
                let start = self.buffer_start;
                self.buffer.clear();
                self.emit(start, value)
            }
            Err(err) if err.is_eof() => {
                if self.buffer.len() > self.max_record_bytes {
                    let bytes = self.buffer.len();
                    self.buffer.clear();
                    self.report(
                        self.buffer_start,
                        DiagnosticKind::Oversized {
                            bytes,
                            limit: self.max_record_bytes,
                        },
                    );
                }
                None
            }
            Err(err) => {
                // Appending more text cannot repair a syntax error, but the
                // current line may be the start of the next record.
                let start = self.buffer_start;
                let resync = start < self.line_no;
                self.buffer.clear();
                self.report(
                    start,
                    DiagnosticKind::Malformed {
                        message: err.to_string(),
                    },
                );
                if resync {
                    self.feed(line)
                } else {
                    None
                }
            }
        }
    }

    fn emit(&self, line: usize, value: Value) -> Option<Record> {
        match value {
            Value::Object(record) => Some(record),
            other => {
                self.report(
                    line,
                    DiagnosticKind::NotAnObject {
                        found: json_type_name(&other).to_string(),
                    },
                );
                None
            }
        }
    }

    fn finish(&mut self) {
        self.lines = None;
        if !self.buffer.trim().is_empty() {
            self.report(
                self.buffer_start,
                DiagnosticKind::TrailingPartial {
                    bytes: self.buffer.len(),
                },
            );
        }
        self.buffer.clear();
    }
}

impl<I> Iterator for RecordStream<I>
where
    I: Iterator<Item = io::Result<String>>,
{
    type Item = Record;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(message) = self.open_failure.take() {
            self.report(0, DiagnosticKind::Io { message });
        }

        loop {
            let lines = self.lines.as_mut()?;
            let line = match lines.next() {
                Some(Ok(line)) => line,
                Some(Err(err)) if err.kind() == ErrorKind::InvalidData => {
                    self.line_no += 1;
                    self.report(
                        self.line_no,
                        DiagnosticKind::Io {
                            message: err.to_string(),
                        },
                    );
                    continue;
                }
                Some(Err(err)) => {
                    warn!(origin = %self.origin, error = %err, "read failed, ending record stream");
                    self.report(
                        self.line_no + 1,
                        DiagnosticKind::Io {
                            message: err.to_string(),
                        },
                    );
                    self.finish();
                    return None;
                }
                None => {
                    self.finish();
                    return None;
                }
            };

            self.line_no += 1;
            if let Some(record) = self.feed(&line) {
                return Some(record);
            }
        }
    }
}

/// Name of a JSON value's type, for messages.
pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
