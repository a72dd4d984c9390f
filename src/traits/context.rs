//! Binding between tree regions and expansion storage
use std::ops::DerefMut;

use crate::traits::{Expansion, Region};

/// Multipole coefficients of the expansion used by a context
pub type MultipoleOf<C> = <<C as Context>::Expansion as Expansion>::Multipole;

/// Local coefficients of the expansion used by a context
pub type LocalOf<C> = <<C as Context>::Expansion as Expansion>::Local;

/// Access to the expansion and to the coefficient storage of each region
///
/// Storage for a region must already be allocated (by the upward pass) before
/// it is passed to any accessor.
pub trait Context {
    /// Expansion type
    type Expansion: Expansion;
    /// Source region handle
    type SourceBox: Region<Point = <Self::Expansion as Expansion>::Point>;
    /// Target region handle
    type TargetBox: Region<Point = <Self::Expansion as Expansion>::Point>;

    /// The expansion object
    fn expansion(&self) -> &Self::Expansion;

    /// Multipole coefficients of a source region
    fn multipole(&self, source: &Self::SourceBox) -> &MultipoleOf<Self>;

    /// Local coefficients of a target region
    fn local(&mut self, target: &Self::TargetBox) -> &mut LocalOf<Self>;

    /// Borrow everything needed for one M2L translation at once:
    /// the expansion, the source multipole and the target local.
    fn m2l_operands(
        &mut self,
        source: &Self::SourceBox,
        target: &Self::TargetBox,
    ) -> (&Self::Expansion, &MultipoleOf<Self>, &mut LocalOf<Self>);
}

/// A context whose local storage can be updated through a shared reference
///
/// Each target's local expansion sits behind its own lock, which allows
/// translations into different targets to run concurrently.
pub trait SharedContext: Context + Sync {
    /// Guard giving exclusive access to one local expansion
    type LocalGuard<'a>: DerefMut<Target = LocalOf<Self>>
    where
        Self: 'a;

    /// Lock the local coefficients of a target region
    fn lock_local(&self, target: &Self::TargetBox) -> Self::LocalGuard<'_>;
}
