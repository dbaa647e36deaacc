//! Coordinate expression parsing.

use pest::Parser;
use pest::iterators::Pair;

use crate::errors::{CadError, CoordinateError};
use crate::types::{Coordinate, Length};
use crate::units::to_base_unit;
use crate::{CoordinateParser, Rule};

/// Parse a coordinate expression into an absolute point.
///
/// `base` is the previous point of the object being built. Absolute `x;y`
/// expressions ignore it; `w`/`h` expressions require it.
pub fn parse_coordinate(expr: &str, base: Option<Coordinate>) -> Result<Coordinate, CadError> {
    let mut pairs = CoordinateParser::parse(Rule::coordinate, expr).map_err(|e| {
        CoordinateError::Syntax {
            expr: expr.to_string(),
            message: e.variant.message().into_owned(),
        }
    })?;

    // coordinate -> (absolute | width | height) ~ EOI
    let form = pairs
        .next()
        .and_then(|p| p.into_inner().next())
        .ok_or_else(|| syntax(expr, "empty coordinate"))?;

    match form.as_rule() {
        Rule::absolute => {
            let mut lengths = form.into_inner();
            let x = parse_length(lengths.next(), expr)?;
            let y = parse_length(lengths.next(), expr)?;
            Ok(Coordinate::from_lengths(x, y))
        }
        Rule::width => {
            let base = require_base(expr, base)?;
            let dx = parse_length(form.into_inner().next(), expr)?;
            base.shifted_x(dx).ok_or_else(|| out_of_range(expr).into())
        }
        Rule::height => {
            let base = require_base(expr, base)?;
            let dy = parse_length(form.into_inner().next(), expr)?;
            base.shifted_y(dy).ok_or_else(|| out_of_range(expr).into())
        }
        other => Err(syntax(expr, &format!("unexpected rule {other:?}")).into()),
    }
}

fn parse_length(pair: Option<Pair<Rule>>, expr: &str) -> Result<Length, CadError> {
    let pair = pair.ok_or_else(|| syntax(expr, "missing length"))?;
    Ok(to_base_unit(pair.as_str())?)
}

fn require_base(expr: &str, base: Option<Coordinate>) -> Result<Coordinate, CoordinateError> {
    base.ok_or_else(|| CoordinateError::MissingBase {
        expr: expr.to_string(),
    })
}

fn out_of_range(expr: &str) -> CoordinateError {
    CoordinateError::OutOfRange {
        expr: expr.to_string(),
    }
}

fn syntax(expr: &str, message: &str) -> CoordinateError {
    CoordinateError::Syntax {
        expr: expr.to_string(),
        message: message.to_string(),
    }
}
