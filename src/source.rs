//! Record sources.
//!
//! A source has a single capability: produce a finite sequence of typed
//! records. The NDJSON backend reads through a [`RecordStream`] and coerces
//! each object into a [`Person`] or [`Publication`]; in-memory slices and
//! vectors satisfy the same traits for embedding and tests.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
use crate::error::ValidationError;
use crate::model::{Person, Publication};
use crate::record_stream::{ReaderOptions, Record, RecordStream};

/// Produces the personnel feed.
pub trait PersonnelSource {
    /// Iterates people. Records without an id are never yielded.
    fn people(&self) -> Box<dyn Iterator<Item = Person> + '_>;

    /// Drains diagnostics gathered while iterating (strict mode only).
    fn take_diagnostics(&self) -> Vec<Diagnostic> {
        Vec::new()
    }
}

/// Produces the publication feed.
pub trait PublicationSource {
    /// Iterates publications. Records without an id are never yielded.
    fn publications(&self) -> Box<dyn Iterator<Item = Publication> + '_>;

    /// Drains diagnostics gathered while iterating (strict mode only).
    fn take_diagnostics(&self) -> Vec<Diagnostic> {
        Vec::new()
    }
}

impl PersonnelSource for [Person] {
    fn people(&self) -> Box<dyn Iterator<Item = Person> + '_> {
        Box::new(self.iter().cloned())
    }
}

impl PersonnelSource for Vec<Person> {
    fn people(&self) -> Box<dyn Iterator<Item = Person> + '_> {
        self.as_slice().people()
    }
}

impl PublicationSource for [Publication] {
    fn publications(&self) -> Box<dyn Iterator<Item = Publication> + '_> {
        Box::new(self.iter().cloned())
    }
}

impl PublicationSource for Vec<Publication> {
    fn publications(&self) -> Box<dyn Iterator<Item = Publication> + '_> {
        self.as_slice().publications()
    }
}

#[derive(Debug, Clone)]
enum Input {
    File(PathBuf),
    Text(String),
}

/// NDJSON-backed source.
///
/// The same type serves both feeds: it is a [`PersonnelSource`] and a
/// [`PublicationSource`], and each call to `people()` / `publications()`
/// re-reads the input from the start.
#[derive(Debug, Clone)]
pub struct NdjsonSource {
    input: Input,
    options: ReaderOptions,
    diagnostics: Diagnostics,
}

impl NdjsonSource {
    /// Reads from a file. A missing file behaves as an empty feed.
    #[must_use]
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            input: Input::File(path.into()),
            options: ReaderOptions::default(),
            diagnostics: Diagnostics::new(),
        }
    }

    /// Reads from in-memory NDJSON text.
    #[must_use]
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            input: Input::Text(text.into()),
            options: ReaderOptions::default(),
            diagnostics: Diagnostics::new(),
        }
    }

    /// Replaces the reader options.
    #[must_use]
    pub fn with_options(mut self, options: ReaderOptions) -> Self {
        self.options = options;
        self
    }

    /// The backing file, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match &self.input {
            Input::File(path) => Some(path),
            Input::Text(_) => None,
        }
    }

    /// Diagnostics gathered so far, without draining them.
    #[must_use]
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.snapshot()
    }

    fn coerced<T: 'static>(
        &self,
        coerce: fn(Record) -> Result<T, ValidationError>,
    ) -> Box<dyn Iterator<Item = T> + '_> {
        let sink = self.options.strict.then(|| self.diagnostics.clone());
        match &self.input {
            Input::File(path) => Box::new(Coerced::new(RecordStream::open(path), self.options, sink, coerce)),
            Input::Text(text) => Box::new(Coerced::new(
                RecordStream::from_text(text.clone()),
                self.options,
                sink,
                coerce,
            )),
        }
    }
}

impl PersonnelSource for NdjsonSource {
    fn people(&self) -> Box<dyn Iterator<Item = Person> + '_> {
        self.coerced(Person::from_record)
    }

    fn take_diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.take()
    }
}

impl PublicationSource for NdjsonSource {
    fn publications(&self) -> Box<dyn Iterator<Item = Publication> + '_> {
        self.coerced(Publication::from_record)
    }

    fn take_diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.take()
    }
}

/// Record stream mapped through a coercion, dropping rejected records.
struct Coerced<I, T> {
    stream: RecordStream<I>,
    sink: Option<Diagnostics>,
    coerce: fn(Record) -> Result<T, ValidationError>,
}

impl<I, T> Coerced<I, T>
where
    I: Iterator<Item = std::io::Result<String>>,
{
    fn new(
        stream: RecordStream<I>,
        options: ReaderOptions,
        sink: Option<Diagnostics>,
        coerce: fn(Record) -> Result<T, ValidationError>,
    ) -> Self {
        let stream = stream.with_options(options);
        let stream = match &sink {
            Some(sink) => stream.with_diagnostics(sink.clone()),
            None => stream,
        };
        Self { stream, sink, coerce }
    }
}

impl<I, T> Iterator for Coerced<I, T>
where
    I: Iterator<Item = std::io::Result<String>>,
{
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let record = self.stream.next()?;
            match (self.coerce)(record) {
                Ok(value) => return Some(value),
                Err(err) => {
                    let line = self.stream.lines_read();
                    debug!(origin = %self.stream.origin(), line, error = %err, "dropping record");
                    if let Some(sink) = &self.sink {
                        sink.push(Diagnostic {
                            origin: self.stream.origin().to_string(),
                            line,
                            kind: DiagnosticKind::Rejected(err),
                        });
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const PEOPLE: &str = concat!(
        "{\"id\":\"p1\",\"name\":\"Alice\",\"PI\":true}\n",
        "{\"name\":\"No Id\"}\n",
        "not json\n",
        "{\"id\":\"p2\",\n",
        " \"name\":\"Bob\"}\n",
    );

    #[test]
    fn test_people_from_text() {
        let source = NdjsonSource::from_text(PEOPLE);
        let people: Vec<Person> = source.people().collect();

        assert_eq!(people.len(), 2);
        assert_eq!(people[0].id, "p1");
        assert!(people[0].is_pi());
        assert_eq!(people[1].name, "Bob");
        assert!(PersonnelSource::take_diagnostics(&source).is_empty());
    }

    #[test]
    fn test_strict_mode_reports_without_changing_output() {
        let source = NdjsonSource::from_text(PEOPLE).with_options(ReaderOptions::strict());
        let people: Vec<Person> = source.people().collect();
        assert_eq!(people.len(), 2);

        let diags = PersonnelSource::take_diagnostics(&source);
        assert_eq!(diags.len(), 2);
        assert_eq!(diags[0].line, 2);
        assert_eq!(
            diags[0].kind,
            DiagnosticKind::Rejected(ValidationError::missing("id"))
        );
        assert_eq!(diags[1].line, 3);
        assert!(matches!(diags[1].kind, DiagnosticKind::Malformed { .. }));
    }

    #[test]
    fn test_publications_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("publications.ndjson");
        fs::write(
            &path,
            "{\"id\":\"pb1\",\"title\":\"T\",\"authors\":[\"p1\",\"Bob\"],\"venue\":\"V\"}\n{\"id\":\"\"}\n",
        )
        .unwrap();

        let source = NdjsonSource::open(&path);
        assert_eq!(source.path(), Some(path.as_path()));

        let publications: Vec<Publication> = source.publications().collect();
        assert_eq!(publications.len(), 1);
        assert_eq!(publications[0].authors, vec!["p1", "Bob"]);
        assert_eq!(publications[0].venue(), Some("V"));
    }

    #[test]
    fn test_missing_file_is_empty_feed() {
        let dir = tempdir().unwrap();
        let source = NdjsonSource::open(dir.path().join("nope.ndjson")).with_options(ReaderOptions::strict());
        assert_eq!(source.people().count(), 0);
        assert!(source.diagnostics().is_empty());
    }

    #[test]
    fn test_source_is_rereadable() {
        let source = NdjsonSource::from_text(PEOPLE);
        assert_eq!(source.people().count(), 2);
        assert_eq!(source.people().count(), 2);
    }

    #[test]
    fn test_in_memory_sources() {
        let people = vec![Person::new("p1", "Alice")];
        let publications = vec![Publication::new("pb1", "T").with_authors(["p1"])];

        assert_eq!(people.people().count(), 1);
        assert_eq!(publications.publications().next().unwrap().authors, vec!["p1"]);
        assert!(PublicationSource::take_diagnostics(&publications).is_empty());
    }
}
