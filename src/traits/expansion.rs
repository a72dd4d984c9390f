//! Expansions and their field translation capabilities
use std::ops::Sub;

use crate::types::{FmmError, Result};

mod private {
    pub trait Sealed {}
}

/// An expansion (kernel) type used by an FMM
///
/// The associated [`Expansion::M2l`] marker states, at compile time, whether the
/// expansion provides a multipole-to-local translation. Set it to [`Supported`] to
/// route translations to the expansion's [`M2lOperator`] implementation, or to
/// [`Unsupported`] if the expansion has none.
pub trait Expansion: Sized {
    /// Multipole coefficients of a source region
    type Multipole;
    /// Local coefficients of a target region
    type Local;
    /// Points and translation vectors
    type Point: Sub<Output = Self::Point>;
    /// M2L capability marker
    type M2l: M2lCapability<Self>;
}

/// Multipole to local translation provided by an expansion
pub trait M2lOperator: Expansion {
    /// Translate `source` by `translation` and accumulate the result into `target`.
    ///
    /// Implementations must add to `target`, never overwrite it, since several
    /// sources contribute to the same local expansion.
    fn m2l(&self, source: &Self::Multipole, target: &mut Self::Local, translation: &Self::Point);
}

/// Compile time M2L capability of an expansion type
///
/// Implemented only by the markers [`Supported`] and [`Unsupported`].
pub trait M2lCapability<E: Expansion>: private::Sealed {
    /// Whether `E` provides an M2L translation
    const HAS_M2L: bool;

    /// Apply the M2L translation of `E`, if it has one
    fn m2l(
        expansion: &E,
        source: &E::Multipole,
        target: &mut E::Local,
        translation: &E::Point,
    ) -> Result<()>;
}

/// Marker for expansions implementing [`M2lOperator`]
#[derive(Debug, Clone, Copy)]
pub struct Supported;

/// Marker for expansions without an M2L translation
#[derive(Debug, Clone, Copy)]
pub struct Unsupported;

impl private::Sealed for Supported {}
impl private::Sealed for Unsupported {}

impl<E: M2lOperator> M2lCapability<E> for Supported {
    const HAS_M2L: bool = true;

    #[inline]
    fn m2l(
        expansion: &E,
        source: &E::Multipole,
        target: &mut E::Local,
        translation: &E::Point,
    ) -> Result<()> {
        expansion.m2l(source, target, translation);
        Ok(())
    }
}

impl<E: Expansion> M2lCapability<E> for Unsupported {
    const HAS_M2L: bool = false;

    fn m2l(
        _expansion: &E,
        _source: &E::Multipole,
        _target: &mut E::Local,
        _translation: &E::Point,
    ) -> Result<()> {
        Err(FmmError::unsupported::<E>("M2L"))
    }
}
