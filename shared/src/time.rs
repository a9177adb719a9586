//! Animation clock value
//!
//! [`CharAnimTime`] is a seconds value that distinguishes *how* a time is zero.
//! A zero reached while time was increasing orders just above a steady zero,
//! and one reached while decreasing orders just below it. Blend consumers rely
//! on this to tell "exactly at the start" from "about to leave the start".

use std::cmp::Ordering;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

use serde::{Deserialize, Serialize};

/// Remainders below this are treated as zero by [`CharAnimTime::epsilon_zero`]
pub const TIME_EPSILON: f32 = 0.00001;

/// How a [`CharAnimTime`] value should be interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TimeKind {
    /// A regular seconds value
    NonZero,
    /// Zero, approached from below
    ZeroIncreasing,
    /// Exactly zero
    #[default]
    ZeroSteady,
    /// Zero, approached from above
    ZeroDecreasing,
    /// Unbounded duration
    Infinity,
}

impl TimeKind {
    fn zero_direction(self) -> i8 {
        match self {
            TimeKind::ZeroIncreasing => 1,
            TimeKind::ZeroDecreasing => -1,
            _ => 0,
        }
    }

    fn from_zero_direction(direction: i8) -> Self {
        match direction.signum() {
            1 => TimeKind::ZeroIncreasing,
            -1 => TimeKind::ZeroDecreasing,
            _ => TimeKind::ZeroSteady,
        }
    }
}

/// Animation time in seconds with typed zeroes and an infinity
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct CharAnimTime {
    time: f32,
    kind: TimeKind,
}

impl CharAnimTime {
    /// Steady zero
    pub const ZERO: Self = Self {
        time: 0.0,
        kind: TimeKind::ZeroSteady,
    };

    /// Unbounded time
    pub const INFINITY: Self = Self {
        time: f32::INFINITY,
        kind: TimeKind::Infinity,
    };

    /// Create a time from seconds. Exactly 0.0 becomes a steady zero.
    pub fn from_seconds(time: f32) -> Self {
        if time == 0.0 {
            Self::ZERO
        } else {
            Self {
                time,
                kind: TimeKind::NonZero,
            }
        }
    }

    /// Create a zero of a particular direction
    pub fn zero(kind: TimeKind) -> Self {
        let kind = match kind {
            TimeKind::NonZero | TimeKind::Infinity => TimeKind::ZeroSteady,
            zero => zero,
        };
        Self { time: 0.0, kind }
    }

    pub fn seconds(&self) -> f32 {
        match self.kind {
            TimeKind::NonZero | TimeKind::Infinity => self.time,
            _ => 0.0,
        }
    }

    pub fn kind(&self) -> TimeKind {
        self.kind
    }

    pub fn is_infinite(&self) -> bool {
        self.kind == TimeKind::Infinity
    }

    /// True for every zero kind and for a non-zero value holding exactly 0.0
    pub fn equals_zero(&self) -> bool {
        match self.kind {
            TimeKind::ZeroIncreasing | TimeKind::ZeroSteady | TimeKind::ZeroDecreasing => true,
            TimeKind::NonZero => self.time == 0.0,
            TimeKind::Infinity => false,
        }
    }

    pub fn epsilon_zero(&self) -> bool {
        self.seconds().abs() < TIME_EPSILON
    }

    pub fn greater_than_zero(&self) -> bool {
        if self.equals_zero() {
            return false;
        }
        self.is_infinite() || self.time > 0.0
    }

    /// Ratio of two times. Division by any zero yields 0.
    pub fn div_time(&self, other: &CharAnimTime) -> f32 {
        if other.equals_zero() || other.is_infinite() {
            return 0.0;
        }
        if self.is_infinite() {
            return f32::INFINITY;
        }
        self.seconds() / other.seconds()
    }

    fn negated(self) -> Self {
        match self.kind {
            TimeKind::NonZero => Self::from_seconds(-self.time),
            TimeKind::Infinity => self,
            zero => Self::zero(TimeKind::from_zero_direction(-zero.zero_direction())),
        }
    }
}

impl PartialEq for CharAnimTime {
    fn eq(&self, other: &Self) -> bool {
        self.partial_cmp(other) == Some(Ordering::Equal)
    }
}

impl PartialOrd for CharAnimTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self.is_infinite(), other.is_infinite()) {
            (true, true) => return Some(Ordering::Equal),
            (true, false) => return Some(Ordering::Greater),
            (false, true) => return Some(Ordering::Less),
            (false, false) => {}
        }

        match self.seconds().partial_cmp(&other.seconds())? {
            Ordering::Equal => Some(
                self.kind
                    .zero_direction()
                    .cmp(&other.kind.zero_direction()),
            ),
            ordering => Some(ordering),
        }
    }
}

impl Add for CharAnimTime {
    type Output = CharAnimTime;

    fn add(self, rhs: Self) -> Self::Output {
        if self.is_infinite() || rhs.is_infinite() {
            return Self::INFINITY;
        }
        if self.equals_zero() && rhs.equals_zero() {
            let direction = self.kind.zero_direction() + rhs.kind.zero_direction();
            return Self::zero(TimeKind::from_zero_direction(direction));
        }
        Self::from_seconds(self.seconds() + rhs.seconds())
    }
}

impl Sub for CharAnimTime {
    type Output = CharAnimTime;

    fn sub(self, rhs: Self) -> Self::Output {
        if self.is_infinite() && rhs.is_infinite() {
            return Self::ZERO;
        }
        self + rhs.negated()
    }
}

impl AddAssign for CharAnimTime {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl SubAssign for CharAnimTime {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Mul<f32> for CharAnimTime {
    type Output = CharAnimTime;

    fn mul(self, rhs: f32) -> Self::Output {
        match self.kind {
            TimeKind::NonZero => Self::from_seconds(self.time * rhs),
            TimeKind::Infinity if rhs == 0.0 => Self::ZERO,
            TimeKind::Infinity => self,
            _ if rhs == 0.0 => Self::ZERO,
            _ if rhs < 0.0 => self.negated(),
            _ => self,
        }
    }
}

impl From<f32> for CharAnimTime {
    fn from(value: f32) -> Self {
        Self::from_seconds(value)
    }
}
