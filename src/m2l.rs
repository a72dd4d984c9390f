//! Dispatch of multipole to local translations
use log::{error, trace};

use crate::traits::{Context, Expansion, M2lCapability, M2lOperator, Region};
use crate::types::{ExpansionTraits, FmmError, Result};

/// Capability dispatched M2L evaluator
///
/// Routes a single source/target interaction to the M2L operator of the expansion
/// bound to a [`Context`]. Whether the expansion has such an operator is decided
/// by its [`Expansion::M2l`] marker at compile time, so supported expansions pay
/// no dispatch cost.
pub struct M2l;

impl M2l {
    /// Check that the expansion `E` provides an M2L translation.
    ///
    /// Logs a diagnostic describing `E` and returns
    /// [`FmmError::UnsupportedOperation`] if it does not.
    #[inline]
    pub fn check<E: Expansion>() -> Result<()> {
        if <E::M2l as M2lCapability<E>>::HAS_M2L {
            Ok(())
        } else {
            error!(
                "Expansion does not have a correct M2L!\n{}",
                ExpansionTraits::<E>::new()
            );
            Err(FmmError::unsupported::<E>("M2L"))
        }
    }

    /// Translate the multipole expansion of `source` into the local expansion of `target`.
    ///
    /// The translation vector is `target.center() - source.center()` and the result
    /// is accumulated into the local storage of `target`. If the expansion lacks an
    /// M2L operator an error is returned and no storage is touched.
    pub fn evaluate<C: Context>(
        context: &mut C,
        source: &C::SourceBox,
        target: &C::TargetBox,
    ) -> Result<()> {
        Self::check::<C::Expansion>()?;

        trace!("M2L:\n  {:?}\n  {:?}", source, target);

        let translation = target.center() - source.center();
        let (expansion, multipole, local) = context.m2l_operands(source, target);
        <<C::Expansion as Expansion>::M2l as M2lCapability<C::Expansion>>::m2l(
            expansion,
            multipole,
            local,
            &translation,
        )
    }

    /// Translate `source` into `target` for an expansion statically known to have an M2L operator.
    ///
    /// Equivalent to [`M2l::evaluate`], but expansions without an operator are rejected
    /// by the compiler instead of at run time.
    pub fn translate<C>(context: &mut C, source: &C::SourceBox, target: &C::TargetBox)
    where
        C: Context,
        C::Expansion: M2lOperator,
    {
        trace!("M2L:\n  {:?}\n  {:?}", source, target);

        let translation = target.center() - source.center();
        let (expansion, multipole, local) = context.m2l_operands(source, target);
        expansion.m2l(multipole, local, &translation);
    }
}
