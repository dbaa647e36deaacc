//! Strongly-typed length and coordinate primitives.
//!
//! All geometry is stored as whole millimetres (the base unit). Lengths only
//! come into existence through the unit converter or the constructors here,
//! so nothing downstream has to care which suffix the source text used.

use std::fmt;
use std::ops::{Add, Neg, Sub};

use glam::I64Vec2;

/// Length in millimetres (the base unit)
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct Length(pub i64);

impl Length {
    pub const ZERO: Length = Length(0);

    #[inline]
    pub const fn mm(val: i64) -> Length {
        Length(val)
    }

    /// Get the raw millimetre count
    #[inline]
    pub const fn raw(self) -> i64 {
        self.0
    }

    /// Saturates at `i64::MAX` for `i64::MIN`
    #[inline]
    pub fn abs(self) -> Length {
        Length(self.0.saturating_abs())
    }

    /// `None` when the sum does not fit in an `i64`
    #[inline]
    pub fn checked_add(self, rhs: Length) -> Option<Length> {
        self.0.checked_add(rhs.0).map(Length)
    }

    /// `None` when the difference does not fit in an `i64`
    #[inline]
    pub fn checked_sub(self, rhs: Length) -> Option<Length> {
        self.0.checked_sub(rhs.0).map(Length)
    }
}

// Operators saturate; use the checked variants where overflow must be reported

impl Add for Length {
    type Output = Length;
    fn add(self, rhs: Length) -> Length {
        Length(self.0.saturating_add(rhs.0))
    }
}

impl Sub for Length {
    type Output = Length;
    fn sub(self, rhs: Length) -> Length {
        Length(self.0.saturating_sub(rhs.0))
    }
}

impl Neg for Length {
    type Output = Length;
    fn neg(self) -> Length {
        Length(self.0.saturating_neg())
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}mm", self.0)
    }
}

/// Length unit suffixes understood by the language
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Unit {
    Millimeter,
    Centimeter,
    Meter,
}

impl Unit {
    /// Resolve a unit suffix. An empty suffix means millimetres.
    pub fn from_suffix(suffix: &str) -> Option<Unit> {
        match suffix {
            "" | "mm" => Some(Unit::Millimeter),
            "cm" => Some(Unit::Centimeter),
            "m" => Some(Unit::Meter),
            _ => None,
        }
    }

    /// How many millimetres one of this unit is worth
    pub const fn scale(self) -> f64 {
        match self {
            Unit::Millimeter => 1.0,
            Unit::Centimeter => 10.0,
            Unit::Meter => 1000.0,
        }
    }

    pub const fn suffix(self) -> &'static str {
        match self {
            Unit::Millimeter => "mm",
            Unit::Centimeter => "cm",
            Unit::Meter => "m",
        }
    }
}

/// An absolute point, both axes in millimetres
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Coordinate {
    pub x: Length,
    pub y: Length,
}

impl Coordinate {
    pub const ORIGIN: Coordinate = Coordinate {
        x: Length::ZERO,
        y: Length::ZERO,
    };

    pub const fn new(x: i64, y: i64) -> Self {
        Self {
            x: Length(x),
            y: Length(y),
        }
    }

    pub const fn from_lengths(x: Length, y: Length) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn to_vec(self) -> I64Vec2 {
        I64Vec2::new(self.x.0, self.y.0)
    }

    #[inline]
    pub fn from_vec(v: I64Vec2) -> Self {
        Self::new(v.x, v.y)
    }

    /// This point moved along the x axis, y unchanged; `None` on overflow
    pub fn shifted_x(self, delta: Length) -> Option<Self> {
        Some(Self::from_lengths(self.x.checked_add(delta)?, self.y))
    }

    /// This point moved along the y axis, x unchanged; `None` on overflow
    pub fn shifted_y(self, delta: Length) -> Option<Self> {
        Some(Self::from_lengths(self.x, self.y.checked_add(delta)?))
    }
}

impl From<I64Vec2> for Coordinate {
    fn from(v: I64Vec2) -> Self {
        Self::from_vec(v)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x.0, self.y.0)
    }
}

/// Axis-aligned bounding box over a set of coordinates
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bounds {
    pub min: Coordinate,
    pub max: Coordinate,
}

impl Bounds {
    pub fn from_point(p: Coordinate) -> Self {
        Self { min: p, max: p }
    }

    /// Smallest box containing every point, or `None` for an empty set
    pub fn enclosing<I>(points: I) -> Option<Bounds>
    where
        I: IntoIterator<Item = Coordinate>,
    {
        let mut points = points.into_iter();
        let first = points.next()?;
        Some(points.fold(Bounds::from_point(first), |b, p| b.including(p)))
    }

    pub fn including(self, p: Coordinate) -> Self {
        let v = p.to_vec();
        Self {
            min: Coordinate::from_vec(self.min.to_vec().min(v)),
            max: Coordinate::from_vec(self.max.to_vec().max(v)),
        }
    }

    pub fn union(self, other: Bounds) -> Self {
        self.including(other.min).including(other.max)
    }

    /// Horizontal extent, or `None` if it exceeds the `i64` range
    pub fn width(&self) -> Option<Length> {
        self.max.x.checked_sub(self.min.x)
    }

    /// Vertical extent, or `None` if it exceeds the `i64` range
    pub fn height(&self) -> Option<Length> {
        self.max.y.checked_sub(self.min.y)
    }
}
