//! Error types with rich diagnostics using miette
//!
//! Every stage returns its own error enum; `CadError` unifies them for the
//! dispatcher and `LineError` attaches the source location for the driver.

use std::sync::Arc;

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

use crate::model::{ObjectKind, VariableKind};

/// Source context for error reporting
///
/// The text is shared, so every `LineError` from one source points at the
/// same allocation.
#[derive(Debug, Clone)]
pub struct SourceContext {
    /// Name of the source (filename or "<input>")
    pub name: String,
    /// The full source text
    pub source: Arc<str>,
}

impl SourceContext {
    pub fn new(name: impl Into<String>, source: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
        }
    }

    /// Create a NamedSource for miette
    pub fn named_source(&self) -> NamedSource<Arc<str>> {
        NamedSource::new(&self.name, Arc::clone(&self.source))
    }
}

// ============================================================================
// Lexing
// ============================================================================

/// Malformed or over-limit line
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum LexError {
    #[error("command keyword longer than {limit} characters")]
    #[diagnostic(code(nanocad::lex::keyword_too_long))]
    KeywordTooLong { limit: usize },

    #[error("argument {index} longer than {limit} characters")]
    #[diagnostic(code(nanocad::lex::argument_too_long))]
    ArgumentTooLong { index: usize, limit: usize },

    #[error("more than {limit} arguments")]
    #[diagnostic(code(nanocad::lex::too_many_arguments))]
    TooManyArguments { limit: usize },

    #[error("argument {index} is empty")]
    #[diagnostic(
        code(nanocad::lex::empty_argument),
        help("remove the extra `,`")
    )]
    EmptyArgument { index: usize },

    #[error("unexpected character {found:?} before object variable")]
    #[diagnostic(
        code(nanocad::lex::bad_capture),
        help("an object can only be stored in a `&name` variable")
    )]
    UnexpectedCaptureChar { found: char },

    #[error("missing variable name after `=`")]
    #[diagnostic(code(nanocad::lex::missing_capture))]
    MissingCaptureName,

    #[error("unexpected {found:?} after object variable")]
    #[diagnostic(code(nanocad::lex::trailing_capture))]
    TrailingAfterCapture { found: char },
}

// ============================================================================
// Units
// ============================================================================

/// Bad numeral or unit suffix in a length
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum UnitError {
    #[error("invalid character {found:?} in number {input:?}")]
    #[diagnostic(code(nanocad::unit::invalid_numeral_char))]
    InvalidNumeralChar { input: String, found: char },

    #[error("invalid character {found:?} in unit of {input:?}")]
    #[diagnostic(
        code(nanocad::unit::invalid_unit_char),
        help("units are written after the number, e.g. `10cm`")
    )]
    InvalidUnitChar { input: String, found: char },

    #[error("missing number in {input:?}")]
    #[diagnostic(code(nanocad::unit::missing_numeral))]
    MissingNumeral { input: String },

    #[error("malformed number {numeral:?}")]
    #[diagnostic(code(nanocad::unit::malformed_numeral))]
    MalformedNumeral { numeral: String },

    #[error("unknown unit {unit:?}")]
    #[diagnostic(code(nanocad::unit::unknown_unit), help("supported units are m, cm and mm"))]
    UnknownUnit { unit: String },

    #[error("length {input:?} is out of range")]
    #[diagnostic(code(nanocad::unit::out_of_range))]
    OutOfRange { input: String },
}

// ============================================================================
// Coordinates
// ============================================================================

/// Bad coordinate expression
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum CoordinateError {
    #[error("invalid coordinate {expr:?}: {message}")]
    #[diagnostic(
        code(nanocad::coord::syntax),
        help("coordinates are written `x<len>;y<len>`, `w<len>` or `h<len>`")
    )]
    Syntax { expr: String, message: String },

    #[error("relative coordinate {expr:?} has no base point")]
    #[diagnostic(
        code(nanocad::coord::missing_base),
        help("`w` and `h` are only allowed after an absolute point")
    )]
    MissingBase { expr: String },

    #[error("relative coordinate {expr:?} moves past the representable range")]
    #[diagnostic(code(nanocad::coord::out_of_range))]
    OutOfRange { expr: String },
}

// ============================================================================
// Variables
// ============================================================================

#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum VariableError {
    #[error("invalid variable type {tag:?} in {raw:?}")]
    #[diagnostic(
        code(nanocad::var::unknown_type),
        help("prefix the name with `$` (number), `@` (coordinate) or `&` (object)")
    )]
    UnknownType { tag: char, raw: String },

    #[error("variable name is empty")]
    #[diagnostic(code(nanocad::var::empty_name))]
    EmptyName,

    #[error("cannot use {value:?} as a {kind} value")]
    #[diagnostic(code(nanocad::var::invalid_value))]
    InvalidValue { kind: VariableKind, value: String },

    #[error("undefined variable: {name}")]
    #[diagnostic(code(nanocad::var::undefined))]
    Undefined { name: String },

    #[error("variable {name} holds a {found}, not a {expected}")]
    #[diagnostic(code(nanocad::var::kind_mismatch))]
    KindMismatch {
        name: String,
        expected: VariableKind,
        found: VariableKind,
    },

    #[error("object #{index} does not exist ({len} objects defined)")]
    #[diagnostic(code(nanocad::var::dangling_reference))]
    DanglingReference { index: usize, len: usize },
}

// ============================================================================
// Commands
// ============================================================================

#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command: {keyword}")]
    #[diagnostic(
        code(nanocad::command::unknown),
        help("known commands are line, rect, circle and set")
    )]
    UnknownCommand { keyword: String },

    #[error("{kind} objects cannot be constructed yet")]
    #[diagnostic(code(nanocad::command::unsupported_object))]
    UnsupportedObjectKind { kind: ObjectKind },

    #[error("{command} expects {expected} arguments, got {found}")]
    #[diagnostic(code(nanocad::command::argument_count))]
    ArgumentCount {
        command: &'static str,
        expected: usize,
        found: usize,
    },
}

// ============================================================================
// Unified
// ============================================================================

/// Any failure while interpreting a single line
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum CadError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Unit(#[from] UnitError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Coordinate(#[from] CoordinateError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Variable(#[from] VariableError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Command(#[from] CommandError),
}

/// A `CadError` located in its source
#[derive(Error, Diagnostic, Debug)]
#[error("failed to parse line {line}")]
#[diagnostic(code(nanocad::line))]
pub struct LineError {
    /// 1-based line number
    pub line: usize,
    #[source_code]
    pub src: NamedSource<Arc<str>>,
    #[label("{error}")]
    pub span: SourceSpan,
    #[source]
    #[diagnostic_source]
    pub error: CadError,
}

impl LineError {
    /// Locate `error` on line `line` (1-based) starting at byte `offset`
    pub fn new(ctx: &SourceContext, line: usize, offset: usize, len: usize, error: CadError) -> Self {
        Self {
            line,
            src: ctx.named_source(),
            span: (offset, len).into(),
            error,
        }
    }
}
