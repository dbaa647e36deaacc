//! Interpreter session: owns the document model and dispatches statements.
//!
//! A `Session` is the only writer of its object and variable stores. Readers
//! (a renderer, an exporter) borrow a `Snapshot`, which the borrow checker
//! keeps from overlapping with any statement being executed.

use std::fmt;

use crate::config::{ErrorPolicy, SessionConfig};
use crate::errors::{CadError, CommandError, LineError, SourceContext, VariableError};
use crate::log::{debug, warn};
use crate::model::{
    Construct, Dimension, Object, ObjectId, ObjectKind, ObjectStore, Value, VariableKind,
    VariableStore, split_name,
};
use crate::tokenize::{Tokens, tokenize};
use crate::types::{Bounds, Coordinate};

/// What executing one line did
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Empty, blank or comment-only line
    Nothing,
    /// An object was appended, and optionally stored under a `&name`
    Object { id: ObjectId, variable: Option<String> },
    /// A `set` statement bound a variable
    Variable { name: String },
}

/// Result of running a whole source text under `ErrorPolicy::Continue`
#[derive(Debug, Default)]
pub struct ParseReport {
    /// Lines that executed a statement successfully
    pub statements: usize,
    /// Failed lines, in source order
    pub failures: Vec<LineError>,
}

impl ParseReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Read-only view of the model for rendering
#[derive(Clone, Copy, Debug)]
pub struct Snapshot<'a> {
    pub objects: &'a [Object],
    pub dimensions: &'a [Dimension],
}

impl Snapshot<'_> {
    /// Extent of everything drawable, dimensions included
    pub fn bounds(&self) -> Option<Bounds> {
        let object_points = self.objects.iter().flat_map(|o| o.points().iter().copied());
        let dimension_points = self
            .dimensions
            .iter()
            .flat_map(|d| [d.start, d.end, d.line_start, d.line_end]);
        Bounds::enclosing(object_points.chain(dimension_points))
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty() && self.dimensions.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct Session {
    config: SessionConfig,
    objects: ObjectStore,
    variables: VariableStore,
    dimensions: Vec<Dimension>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SessionConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn objects(&self) -> &ObjectStore {
        &self.objects
    }

    pub fn variables(&self) -> &VariableStore {
        &self.variables
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            objects: self.objects.as_slice(),
            dimensions: &self.dimensions,
        }
    }

    pub fn add_dimension(&mut self, dimension: Dimension) {
        self.dimensions.push(dimension);
    }

    /// End the current document: both stores empty, ids restart at 0
    pub fn reset(&mut self) {
        self.objects.clear();
        self.variables.clear();
        self.dimensions.clear();
    }

    // ========================================================================
    // Execution
    // ========================================================================

    /// Execute one line of source (without its terminator).
    ///
    /// Effects of earlier lines are never rolled back; a failing line leaves
    /// the model as it was.
    pub fn execute(&mut self, line: &str) -> Result<Outcome, CadError> {
        match tokenize(line, self.config.limits)? {
            Some(tokens) => self.dispatch(&tokens),
            None => Ok(Outcome::Nothing),
        }
    }

    /// Run a tokenized statement
    pub fn dispatch(&mut self, tokens: &Tokens) -> Result<Outcome, CadError> {
        debug!(command = %tokens.command, arguments = ?tokens.arguments, "dispatch");

        if let Some(kind) = ObjectKind::from_keyword(&tokens.command) {
            return self.create_object(kind, tokens);
        }
        match tokens.command.as_str() {
            "set" => self.set_variable(&tokens.arguments),
            _ => Err(CommandError::UnknownCommand {
                keyword: tokens.command.clone(),
            }
            .into()),
        }
    }

    fn create_object(&mut self, kind: ObjectKind, tokens: &Tokens) -> Result<Outcome, CadError> {
        let (coords, capture) = match tokens.capture() {
            Some(raw) => {
                let (_, name) = split_name(raw)?;
                let coords = &tokens.arguments[..tokens.arguments.len() - 1];
                (coords, Some(name))
            }
            None => (&tokens.arguments[..], None),
        };

        let object = kind.constructor().construct(coords)?;
        debug!(%object, "created object");
        let id = self.objects.push(object);

        let variable = capture.map(|name| {
            let var = self.variables.bind(name, Value::Object(id));
            debug!(%var, "stored object");
            var.name.clone()
        });
        Ok(Outcome::Object { id, variable })
    }

    fn set_variable(&mut self, arguments: &[String]) -> Result<Outcome, CadError> {
        let [name, value] = arguments else {
            return Err(CommandError::ArgumentCount {
                command: "set",
                expected: 2,
                found: arguments.len(),
            }
            .into());
        };
        let var = self.variables.set(name, value)?;
        debug!(%var, "recorded variable");
        Ok(Outcome::Variable {
            name: var.name.clone(),
        })
    }

    /// Execute a whole source text line by line.
    ///
    /// Under `ErrorPolicy::Abort` the first failing line is returned as the
    /// error. Under `ErrorPolicy::Continue` failures are collected in the
    /// report and the remaining lines still run.
    pub fn parse_source(&mut self, name: &str, source: &str) -> Result<ParseReport, LineError> {
        let ctx = SourceContext::new(name, source);
        let mut report = ParseReport::default();
        let mut offset = 0;

        for (index, chunk) in source.split_inclusive('\n').enumerate() {
            let number = index + 1;
            let line = chunk.strip_suffix('\n').unwrap_or(chunk);
            let line = line.strip_suffix('\r').unwrap_or(line);
            debug!(line = number, text = line, "parsing");

            match self.execute(line) {
                Ok(Outcome::Nothing) => {}
                Ok(_) => report.statements += 1,
                Err(error) => {
                    let error = LineError::new(&ctx, number, offset, line.len(), error);
                    match self.config.error_policy {
                        ErrorPolicy::Abort => return Err(error),
                        ErrorPolicy::Continue => {
                            warn!(line = number, error = %error.error, "skipping line");
                            report.failures.push(error);
                        }
                    }
                }
            }
            offset += chunk.len();
        }

        Ok(report)
    }

    // ========================================================================
    // Typed lookups
    // ========================================================================

    pub fn scalar(&self, name: &str) -> Result<f64, VariableError> {
        match self.variables.get(name, VariableKind::Scalar)? {
            Value::Scalar(v) => Ok(v),
            other => Err(mismatch(name, VariableKind::Scalar, other)),
        }
    }

    pub fn coordinate(&self, name: &str) -> Result<Coordinate, VariableError> {
        match self.variables.get(name, VariableKind::Coordinate)? {
            Value::Coordinate(c) => Ok(c),
            other => Err(mismatch(name, VariableKind::Coordinate, other)),
        }
    }

    /// Dereference an `&name` variable
    pub fn object(&self, name: &str) -> Result<&Object, VariableError> {
        match self.variables.get(name, VariableKind::Object)? {
            Value::Object(id) => self.objects.get(id),
            other => Err(mismatch(name, VariableKind::Object, other)),
        }
    }

    /// Text dump of the whole model
    pub fn summary(&self) -> String {
        self.to_string()
    }
}

fn mismatch(name: &str, expected: VariableKind, found: Value) -> VariableError {
    VariableError::KindMismatch {
        name: name.to_string(),
        expected,
        found: found.kind(),
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "objects ({}):", self.objects.len())?;
        for (id, object) in self.objects.iter() {
            writeln!(f, "  {id} {object}")?;
        }
        writeln!(f, "variables ({}):", self.variables.len())?;
        for var in self.variables.iter() {
            writeln!(f, "  {var}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{CoordinateError, LexError};

    #[test]
    fn line_is_created_and_captured() {
        let mut s = Session::new();
        let outcome = s.execute("line x0mm;y0mm, w10mm=&a").unwrap();
        assert_eq!(
            outcome,
            Outcome::Object {
                id: ObjectId(0),
                variable: Some("a".to_string())
            }
        );
        assert_eq!(s.objects().len(), 1);
        assert_eq!(
            s.variables().lookup("a").unwrap().value,
            Value::Object(ObjectId(0))
        );
    }

    #[test]
    fn trailing_object_argument_without_equals() {
        let mut s = Session::new();
        s.execute("line x0;y0, h5, &up").unwrap();
        assert_eq!(
            s.object("up").unwrap().points()[1],
            Coordinate::new(0, 5)
        );
    }

    #[test]
    fn comments_and_blank_lines_do_nothing() {
        let mut s = Session::new();
        assert_eq!(s.execute("# sample").unwrap(), Outcome::Nothing);
        assert_eq!(s.execute("").unwrap(), Outcome::Nothing);
        assert!(s.snapshot().is_empty());
    }

    #[test]
    fn unsupported_kind_leaves_store_untouched() {
        let mut s = Session::new();
        let err = s.execute("rect x0mm;y0mm, x1mm;y1mm").unwrap_err();
        assert_eq!(
            err,
            CadError::Command(CommandError::UnsupportedObjectKind {
                kind: ObjectKind::Rect
            })
        );
        assert!(s.objects().is_empty());
        assert!(matches!(
            s.execute("circle x0;y0, w5"),
            Err(CadError::Command(CommandError::UnsupportedObjectKind { .. }))
        ));
    }

    #[test]
    fn unknown_command() {
        let mut s = Session::new();
        assert_eq!(
            s.execute("triangle x0;y0, w1, h1"),
            Err(CadError::Command(CommandError::UnknownCommand {
                keyword: "triangle".to_string()
            }))
        );
    }

    #[test]
    fn failed_line_does_not_consume_an_id() {
        let mut s = Session::new();
        s.execute("line x0;y0, w1").unwrap();
        assert!(s.execute("line x0;y0, w1xyz").is_err());
        assert!(s.execute("line w1, w1").is_err());
        let outcome = s.execute("line x0;y0, h1").unwrap();
        assert!(matches!(outcome, Outcome::Object { id: ObjectId(1), .. }));
    }

    #[test]
    fn bad_capture_name_creates_nothing() {
        let mut s = Session::new();
        assert!(matches!(
            s.execute("line x0;y0, w1, &"),
            Err(CadError::Variable(VariableError::EmptyName))
        ));
        assert!(s.objects().is_empty());
    }

    #[test]
    fn set_needs_two_arguments() {
        let mut s = Session::new();
        assert_eq!(
            s.execute("set $a"),
            Err(CadError::Command(CommandError::ArgumentCount {
                command: "set",
                expected: 2,
                found: 1
            }))
        );
        assert!(s.execute("set $a, 1, 2").is_err());
    }

    #[test]
    fn typed_lookups() {
        let mut s = Session::new();
        s.execute("set $ratio, 0.5").unwrap();
        s.execute("set @origin, x1cm;y2cm").unwrap();
        s.execute("set &future, 7").unwrap();

        assert_eq!(s.scalar("ratio"), Ok(0.5));
        assert_eq!(s.coordinate("origin"), Ok(Coordinate::new(10, 20)));
        assert_eq!(
            s.object("future"),
            Err(VariableError::DanglingReference { index: 7, len: 0 })
        );
        assert!(matches!(
            s.coordinate("ratio"),
            Err(VariableError::KindMismatch { .. })
        ));
    }

    #[test]
    fn reference_recorded_before_target_resolves_later() {
        let mut s = Session::new();
        s.execute("set &first, 0").unwrap();
        assert!(s.object("first").is_err());
        s.execute("line x0;y0, w3").unwrap();
        assert_eq!(s.object("first").unwrap().kind(), ObjectKind::Line);
    }

    #[test]
    fn parse_source_aborts_on_first_error() {
        let mut s = Session::new();
        let err = s
            .parse_source("t.ncad", "line x0;y0, w1\nline x0;y0, q1\nline x0;y0, h1\n")
            .unwrap_err();
        assert_eq!(err.line, 2);
        assert_eq!(err.span, miette::SourceSpan::from((15, 14)));
        assert!(matches!(
            err.error,
            CadError::Coordinate(CoordinateError::Syntax { .. })
        ));
        assert_eq!(s.objects().len(), 1);
    }

    #[test]
    fn parse_source_can_keep_going() {
        let config = SessionConfig::default().with_error_policy(ErrorPolicy::Continue);
        let mut s = Session::with_config(config);
        let report = s
            .parse_source("t.ncad", "line x0;y0, w1\r\nbogus\r\n\r\nline x0;y0, h1 =\r\nline x1;y1, h1")
            .unwrap();
        assert_eq!(report.statements, 2);
        let lines: Vec<_> = report.failures.iter().map(|f| f.line).collect();
        assert_eq!(lines, [2, 4]);
        assert!(matches!(
            report.failures[1].error,
            CadError::Lex(LexError::MissingCaptureName)
        ));
        assert!(std::sync::Arc::ptr_eq(
            report.failures[0].src.inner(),
            report.failures[1].src.inner()
        ));
        assert_eq!(s.objects().len(), 2);
    }

    #[test]
    fn reset_starts_a_new_document() {
        let mut s = Session::new();
        s.execute("line x0;y0, w1 = &a").unwrap();
        s.reset();
        assert!(s.objects().is_empty());
        assert!(s.variables().is_empty());
        let outcome = s.execute("line x0;y0, w1").unwrap();
        assert!(matches!(outcome, Outcome::Object { id: ObjectId(0), .. }));
    }

    #[test]
    fn snapshot_includes_dimensions() {
        let mut s = Session::new();
        s.execute("line x0;y0, w100").unwrap();
        s.add_dimension(Dimension {
            start: Coordinate::new(0, 0),
            end: Coordinate::new(100, 0),
            line_start: Coordinate::new(0, -10),
            line_end: Coordinate::new(100, -10),
        });
        let snap = s.snapshot();
        assert_eq!(snap.objects.len(), 1);
        assert_eq!(snap.dimensions.len(), 1);
        let b = snap.bounds().unwrap();
        assert_eq!((b.min, b.max), (Coordinate::new(0, -10), Coordinate::new(100, 0)));
    }
}
