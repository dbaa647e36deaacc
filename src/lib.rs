//! nanocad: a tiny, line-oriented CAD description language.
//!
//! ```text
//! # a wall and a door jamb
//! set $scale, 1.5
//! line x0mm;y0mm, w10cm = &wall
//! line x5mm;y5mm, h20mm
//! ```
//!
//! Each line is a comment, a `set` assignment or an object command. Lengths
//! carry a unit (`m`, `cm`, `mm` or none for millimetres) and are stored as
//! whole millimetres. Interpreting a source yields a [`Session`] holding the
//! objects and variables it defined.

use pest_derive::Parser;

pub mod config;
pub mod coord;
pub mod errors;
pub mod log;
pub mod model;
pub mod session;
pub mod tokenize;
pub mod types;
pub mod units;

pub use config::{ErrorPolicy, Limits, SessionConfig};
pub use errors::{CadError, LineError};
pub use model::{Dimension, Object, ObjectId, ObjectKind, Value, Variable, VariableKind};
pub use session::{Outcome, ParseReport, Session, Snapshot};
pub use types::{Bounds, Coordinate, Length, Unit};

pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[grammar = "coord.pest"]
pub struct CoordinateParser;

/// Interpret a whole source text in a fresh session.
///
/// Stops at the first failing line; use [`Session::parse_source`] with
/// [`ErrorPolicy::Continue`] to collect every failure instead.
pub fn parse(source: &str) -> Result<Session, miette::Report> {
    let mut session = Session::new();
    session.parse_source("<input>", source)?;
    Ok(session)
}
