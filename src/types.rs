//! Types specific to the M2L core

use std::fmt;
use std::marker::PhantomData;
use std::ops::{Add, AddAssign, Index, Mul, Neg, Sub};

use crate::traits::{Expansion, M2lCapability};

/// Real scalars usable as point coordinates and expansion coefficients
pub trait RealScalar: num::Float + Default + fmt::Debug + Send + Sync {}

impl<T: num::Float + Default + fmt::Debug + Send + Sync> RealScalar for T {}

/// Error raised by the M2L core
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FmmError {
    /// An expansion was used where a field translation it does not provide is required.
    ///
    /// This is a configuration error: there is no fallback translation, so the
    /// pipeline cannot proceed with this expansion.
    #[error("Expansion `{expansion}` does not have a correct {operation}")]
    UnsupportedOperation {
        /// Name of the offending expansion type
        expansion: &'static str,
        /// Name of the missing operation
        operation: &'static str,
    },
}

impl FmmError {
    /// Unsupported operation error for the expansion type `E`
    pub fn unsupported<E: ?Sized>(operation: &'static str) -> Self {
        Self::UnsupportedOperation {
            expansion: std::any::type_name::<E>(),
            operation,
        }
    }
}

/// Result type
pub type Result<T> = std::result::Result<T, FmmError>;

/// A point (or translation vector) in three dimensions
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point<T> {
    coords: [T; 3],
}

impl<T: RealScalar> Point<T> {
    /// Create a point from its coordinates
    pub fn new(x: T, y: T, z: T) -> Self {
        Self { coords: [x, y, z] }
    }

    /// The origin
    pub fn zero() -> Self {
        Self::new(T::zero(), T::zero(), T::zero())
    }

    /// Coordinates of the point
    pub fn coords(&self) -> &[T; 3] {
        &self.coords
    }

    /// Euclidean inner product
    pub fn dot(&self, other: &Self) -> T {
        self.coords
            .iter()
            .zip(other.coords.iter())
            .fold(T::zero(), |acc, (&a, &b)| acc + a * b)
    }

    /// Euclidean norm
    pub fn norm(&self) -> T {
        self.dot(self).sqrt()
    }
}

impl<T> From<[T; 3]> for Point<T> {
    fn from(coords: [T; 3]) -> Self {
        Self { coords }
    }
}

impl<T> Index<usize> for Point<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.coords[index]
    }
}

impl<T: RealScalar> Add for Point<T> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self[0] + rhs[0], self[1] + rhs[1], self[2] + rhs[2])
    }
}

impl<T: RealScalar> AddAssign for Point<T> {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl<T: RealScalar> Sub for Point<T> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self[0] - rhs[0], self[1] - rhs[1], self[2] - rhs[2])
    }
}

impl<T: RealScalar> Neg for Point<T> {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self[0], -self[1], -self[2])
    }
}

impl<T: RealScalar> Mul<T> for Point<T> {
    type Output = Self;

    fn mul(self, rhs: T) -> Self {
        Self::new(self[0] * rhs, self[1] * rhs, self[2] * rhs)
    }
}

/// Static description of the capabilities of an expansion type
///
/// Printed as part of the diagnostic when an expansion is missing a translation.
pub struct ExpansionTraits<E: Expansion>(PhantomData<E>);

impl<E: Expansion> ExpansionTraits<E> {
    /// Create the descriptor
    pub const fn new() -> Self {
        Self(PhantomData)
    }

    /// Whether `E` provides a multipole-to-local translation
    pub const fn has_m2l() -> bool {
        <E::M2l as M2lCapability<E>>::HAS_M2L
    }

    /// Name of the expansion type
    pub fn name() -> &'static str {
        std::any::type_name::<E>()
    }
}

impl<E: Expansion> Default for ExpansionTraits<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Expansion> fmt::Display for ExpansionTraits<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Expansion: {}", Self::name())?;
        writeln!(f, "  has_M2L: {}", Self::has_m2l())?;
        writeln!(
            f,
            "  multipole_type: {}",
            std::any::type_name::<E::Multipole>()
        )?;
        writeln!(f, "  local_type: {}", std::any::type_name::<E::Local>())?;
        write!(f, "  point_type: {}", std::any::type_name::<E::Point>())
    }
}
