//! Geometric objects and the object store.

use std::fmt;

use enum_dispatch::enum_dispatch;

use crate::coord::parse_coordinate;
use crate::errors::{CadError, CommandError, VariableError};
use crate::types::{Bounds, Coordinate};

/// Object kinds named by the command vocabulary
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Line,
    Rect,
    Circle,
}

impl ObjectKind {
    pub const ALL: [ObjectKind; 3] = [ObjectKind::Line, ObjectKind::Rect, ObjectKind::Circle];

    pub fn from_keyword(keyword: &str) -> Option<ObjectKind> {
        Self::ALL.into_iter().find(|k| k.keyword() == keyword)
    }

    pub const fn keyword(self) -> &'static str {
        match self {
            ObjectKind::Line => "line",
            ObjectKind::Rect => "rect",
            ObjectKind::Circle => "circle",
        }
    }

    /// Number of points an object of this kind carries, if it can be built
    pub const fn arity(self) -> Option<usize> {
        match self {
            ObjectKind::Line => Some(2),
            ObjectKind::Rect | ObjectKind::Circle => None,
        }
    }

    pub fn constructor(self) -> Constructor {
        match self {
            ObjectKind::Line => LineConstructor.into(),
            kind => UnsupportedConstructor { kind }.into(),
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Position of an object in its store.
///
/// Acts as a weak reference: it stays valid only because the store never
/// removes or reorders objects. Deleting objects would require generational
/// ids instead.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId(pub usize);

impl ObjectId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A drawable primitive
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Object {
    kind: ObjectKind,
    points: Vec<Coordinate>,
    layer: u8,
}

impl Object {
    pub fn line(start: Coordinate, end: Coordinate) -> Self {
        Self {
            kind: ObjectKind::Line,
            points: vec![start, end],
            layer: 0,
        }
    }

    pub fn with_layer(mut self, layer: u8) -> Self {
        self.layer = layer;
        self
    }

    pub fn kind(&self) -> ObjectKind {
        self.kind
    }

    /// Points in construction order; the count always matches the kind's arity
    pub fn points(&self) -> &[Coordinate] {
        &self.points
    }

    /// Rendering layer; irrelevant to parsing
    pub fn layer(&self) -> u8 {
        self.layer
    }

    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::enclosing(self.points.iter().copied())
    }
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        for (i, p) in self.points.iter().enumerate() {
            if i == 0 {
                write!(f, " {p}")?;
            } else {
                write!(f, " -> {p}")?;
            }
        }
        if self.layer != 0 {
            write!(f, " [layer {}]", self.layer)?;
        }
        Ok(())
    }
}

/// Dimension annotation between two points.
///
/// Never produced by the interpreter; a rendering layer may attach these to
/// a session and read them back through its snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dimension {
    pub start: Coordinate,
    pub end: Coordinate,
    pub line_start: Coordinate,
    pub line_end: Coordinate,
}

// ============================================================================
// Construction
// ============================================================================

/// Builds an object from the coordinate arguments of its command
#[enum_dispatch]
pub trait Construct {
    fn construct(&self, args: &[String]) -> Result<Object, CadError>;
}

#[enum_dispatch(Construct)]
#[derive(Clone, Copy, Debug)]
pub enum Constructor {
    LineConstructor,
    UnsupportedConstructor,
}

/// `line <from>, <to>`: the second point may be relative to the first
#[derive(Clone, Copy, Debug)]
pub struct LineConstructor;

impl Construct for LineConstructor {
    fn construct(&self, args: &[String]) -> Result<Object, CadError> {
        let [from, to] = args else {
            return Err(CommandError::ArgumentCount {
                command: ObjectKind::Line.keyword(),
                expected: ObjectKind::Line.arity().unwrap_or_default(),
                found: args.len(),
            }
            .into());
        };
        let start = parse_coordinate(from, None)?;
        let end = parse_coordinate(to, Some(start))?;
        Ok(Object::line(start, end))
    }
}

/// Kinds that are part of the vocabulary but have no construction rule
#[derive(Clone, Copy, Debug)]
pub struct UnsupportedConstructor {
    pub kind: ObjectKind,
}

impl Construct for UnsupportedConstructor {
    fn construct(&self, _args: &[String]) -> Result<Object, CadError> {
        Err(CommandError::UnsupportedObjectKind { kind: self.kind }.into())
    }
}

// ============================================================================
// Store
// ============================================================================

/// Append-only object list; an object's id is its insertion position
#[derive(Clone, Debug, Default)]
pub struct ObjectStore {
    objects: Vec<Object>,
}

impl ObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, object: Object) -> ObjectId {
        self.objects.push(object);
        ObjectId(self.objects.len() - 1)
    }

    /// Dereference an id, failing if it points past the end of the store
    pub fn get(&self, id: ObjectId) -> Result<&Object, VariableError> {
        self.objects
            .get(id.index())
            .ok_or(VariableError::DanglingReference {
                index: id.index(),
                len: self.objects.len(),
            })
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn last(&self) -> Option<(ObjectId, &Object)> {
        self.objects
            .last()
            .map(|o| (ObjectId(self.objects.len() - 1), o))
    }

    pub fn iter(&self) -> impl Iterator<Item = (ObjectId, &Object)> {
        self.objects
            .iter()
            .enumerate()
            .map(|(i, o)| (ObjectId(i), o))
    }

    pub fn as_slice(&self) -> &[Object] {
        &self.objects
    }

    pub fn bounds(&self) -> Option<Bounds> {
        self.objects
            .iter()
            .filter_map(Object::bounds)
            .reduce(Bounds::union)
    }

    pub(crate) fn clear(&mut self) {
        self.objects.clear();
    }
}
