use std::f64::consts::PI;
use std::fmt::Display;
use std::ops::{Add, Mul, Neg, Sub};

use approx::{AbsDiffEq, RelativeEq};

const TWO_PI: f64 = 2.0 * PI;

/// Which trigonometric function a value came out of, for [Angle::from_trig].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrigFunction {
    Sin,
    Cos,
    Tan,
    Cot,
}

/// A plane angle, stored in radians.
///
/// No normalization happens on construction or arithmetic; call
/// [Angle::normalized] to bring the measure into `[0, 2pi)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd)]
pub struct Angle(f64);

impl Angle {
    pub const ZERO: Angle = Angle(0.0);
    pub const HALF_TURN: Angle = Angle(PI);

    pub fn from_radians(radians: f64) -> Self {
        Self(radians)
    }

    pub fn from_degrees(degrees: f64) -> Self {
        Self(degrees.to_radians())
    }

    /// Inverts the given trig function. Arguments to arcsin and arccos are
    /// clamped into [-1, 1] first, since they're usually normalized dot
    /// products that can stray slightly past 1.
    pub fn from_trig(value: f64, function: TrigFunction) -> Self {
        let radians = match function {
            TrigFunction::Sin => value.clamp(-1.0, 1.0).asin(),
            TrigFunction::Cos => value.clamp(-1.0, 1.0).acos(),
            TrigFunction::Tan => value.atan(),
            // arccot with range (0, pi), so cot = 0 is a quarter turn
            TrigFunction::Cot => PI / 2.0 - value.atan(),
        };
        Self(radians)
    }

    pub fn acos(value: f64) -> Self {
        Self::from_trig(value, TrigFunction::Cos)
    }

    pub fn asin(value: f64) -> Self {
        Self::from_trig(value, TrigFunction::Sin)
    }

    pub fn radians(&self) -> f64 {
        self.0
    }

    pub fn degrees(&self) -> f64 {
        self.0.to_degrees()
    }

    /// The same direction, with measure in `[0, 2pi)`.
    pub fn normalized(&self) -> Self {
        let r = self.0.rem_euclid(TWO_PI);
        // rem_euclid can round up to exactly 2pi for tiny negative inputs
        if r >= TWO_PI {
            Self(0.0)
        } else {
            Self(r)
        }
    }

    /// The same direction, with measure in `(-pi, pi]`.
    pub fn normalized_signed(&self) -> Self {
        let r = self.normalized().0;
        if r > PI {
            Self(r - TWO_PI)
        } else {
            Self(r)
        }
    }

    /// The explementary angle, `2pi - self`.
    pub fn explement(&self) -> Self {
        Self(TWO_PI - self.0)
    }

    pub fn sin(&self) -> f64 {
        self.0.sin()
    }

    pub fn cos(&self) -> f64 {
        self.0.cos()
    }

    pub fn tan(&self) -> f64 {
        self.0.tan()
    }

    pub fn cot(&self) -> f64 {
        self.0.tan().recip()
    }

    pub fn sinh(&self) -> f64 {
        self.0.sinh()
    }

    pub fn cosh(&self) -> f64 {
        self.0.cosh()
    }

    pub fn tanh(&self) -> f64 {
        self.0.tanh()
    }
}

impl Display for Angle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.6} deg", self.degrees())
    }
}

impl Add for Angle {
    type Output = Angle;

    fn add(self, rhs: Angle) -> Angle {
        Angle(self.0 + rhs.0)
    }
}

impl Sub for Angle {
    type Output = Angle;

    fn sub(self, rhs: Angle) -> Angle {
        Angle(self.0 - rhs.0)
    }
}

impl Neg for Angle {
    type Output = Angle;

    fn neg(self) -> Angle {
        Angle(-self.0)
    }
}

impl Mul<f64> for Angle {
    type Output = Angle;

    fn mul(self, rhs: f64) -> Angle {
        Angle(self.0 * rhs)
    }
}

impl AbsDiffEq for Angle {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.0.abs_diff_eq(&other.0, epsilon)
    }
}

impl RelativeEq for Angle {
    fn default_max_relative() -> f64 {
        f64::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: f64, max_relative: f64) -> bool {
        self.0.relative_eq(&other.0, epsilon, max_relative)
    }
}
