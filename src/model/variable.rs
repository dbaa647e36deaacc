//! Typed variables and the variable store.
//!
//! A variable's kind is picked by the first character of its name in the
//! source: `$` scalar, `@` coordinate, `&` object reference. The tag is not
//! part of the stored name.

use std::fmt;

use crate::coord::parse_coordinate;
use crate::errors::{CadError, VariableError};
use crate::log::warn;
use crate::types::Coordinate;

use super::object::ObjectId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VariableKind {
    Scalar,
    Coordinate,
    Object,
}

impl VariableKind {
    pub fn from_tag(tag: char) -> Option<VariableKind> {
        match tag {
            '$' => Some(VariableKind::Scalar),
            '@' => Some(VariableKind::Coordinate),
            '&' => Some(VariableKind::Object),
            _ => None,
        }
    }

    pub const fn tag(self) -> char {
        match self {
            VariableKind::Scalar => '$',
            VariableKind::Coordinate => '@',
            VariableKind::Object => '&',
        }
    }
}

impl fmt::Display for VariableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            VariableKind::Scalar => "scalar",
            VariableKind::Coordinate => "coordinate",
            VariableKind::Object => "object",
        };
        f.write_str(s)
    }
}

/// Payload of a variable
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Value {
    Scalar(f64),
    Coordinate(Coordinate),
    /// Only valid while the referenced object exists; the object store being
    /// append-only is what keeps it valid once it has been.
    Object(ObjectId),
}

impl Value {
    pub fn kind(&self) -> VariableKind {
        match self {
            Value::Scalar(_) => VariableKind::Scalar,
            Value::Coordinate(_) => VariableKind::Coordinate,
            Value::Object(_) => VariableKind::Object,
        }
    }

    /// Parse the textual value of a `set` statement for the given kind.
    ///
    /// Scalars take any finite decimal float, exponent form (`1e3`)
    /// included; `inf` and `NaN` are rejected.
    pub fn parse(kind: VariableKind, raw: &str) -> Result<Value, CadError> {
        let invalid = || VariableError::InvalidValue {
            kind,
            value: raw.to_string(),
        };
        match kind {
            VariableKind::Scalar => match raw.parse::<f64>() {
                Ok(v) if v.is_finite() => Ok(Value::Scalar(v)),
                _ => Err(invalid().into()),
            },
            VariableKind::Coordinate => Ok(Value::Coordinate(parse_coordinate(raw, None)?)),
            VariableKind::Object => {
                // Digits only: `usize::from_str` would also take a leading `+`
                if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(invalid().into());
                }
                raw.parse::<usize>()
                    .map(|i| Value::Object(ObjectId(i)))
                    .map_err(|_| invalid().into())
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Scalar(v) => write!(f, "{v}"),
            Value::Coordinate(c) => write!(f, "{c}"),
            Value::Object(id) => write!(f, "{id}"),
        }
    }
}

/// A named binding
#[derive(Clone, Debug, PartialEq)]
pub struct Variable {
    pub name: String,
    pub value: Value,
}

impl Variable {
    pub fn kind(&self) -> VariableKind {
        self.value.kind()
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{} = {}", self.kind().tag(), self.name, self.value)
    }
}

/// Split a raw `$name` / `@name` / `&name` into its kind and bare name
pub fn split_name(raw: &str) -> Result<(VariableKind, &str), VariableError> {
    let mut chars = raw.chars();
    let tag = chars.next().ok_or(VariableError::EmptyName)?;
    let kind = VariableKind::from_tag(tag).ok_or_else(|| VariableError::UnknownType {
        tag,
        raw: raw.to_string(),
    })?;
    let name = chars.as_str();
    if name.is_empty() {
        return Err(VariableError::EmptyName);
    }
    Ok((kind, name))
}

/// Append-only list of bindings.
///
/// Re-binding a name appends a new binding that shadows the earlier ones
/// (last write wins); older bindings stay reachable through `history`.
#[derive(Clone, Debug, Default)]
pub struct VariableStore {
    bindings: Vec<Variable>,
}

impl VariableStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Interpret a `set` statement: `raw_name` carries the type tag
    pub fn set(&mut self, raw_name: &str, raw_value: &str) -> Result<&Variable, CadError> {
        let (kind, name) = split_name(raw_name)?;
        let value = Value::parse(kind, raw_value)?;
        Ok(self.bind(name, value))
    }

    /// Append a binding
    pub fn bind(&mut self, name: impl Into<String>, value: Value) -> &Variable {
        let name = name.into();
        if self.contains(&name) {
            warn!(name = %name, "variable rebound; earlier binding is shadowed");
        }
        self.bindings.push(Variable { name, value });
        &self.bindings[self.bindings.len() - 1]
    }

    /// Most recent binding of `name`
    pub fn lookup(&self, name: &str) -> Option<&Variable> {
        self.bindings.iter().rev().find(|v| v.name == name)
    }

    /// Every binding of `name`, oldest first
    pub fn history<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Variable> + 'a {
        self.bindings.iter().filter(move |v| v.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// Typed lookup; `expected` must match the binding's kind
    pub fn get(&self, name: &str, expected: VariableKind) -> Result<Value, VariableError> {
        let var = self.lookup(name).ok_or_else(|| VariableError::Undefined {
            name: name.to_string(),
        })?;
        if var.kind() != expected {
            return Err(VariableError::KindMismatch {
                name: name.to_string(),
                expected,
                found: var.kind(),
            });
        }
        Ok(var.value)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// All bindings in declaration order, shadowed ones included
    pub fn iter(&self) -> std::slice::Iter<'_, Variable> {
        self.bindings.iter()
    }

    pub(crate) fn clear(&mut self) {
        self.bindings.clear();
    }
}
