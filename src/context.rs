//! Index keyed storage of multipole and local expansions
use std::hash::{Hash, Hasher};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::traits::{Context, Expansion, Region, SharedContext};

/// Handle to a region stored in an [`FmmContext`]
#[derive(Debug, Clone, Copy)]
pub struct RegionBox<P> {
    index: usize,
    center: P,
}

impl<P> RegionBox<P> {
    /// Index of the region's storage in its context
    pub fn index(&self) -> usize {
        self.index
    }
}

impl<P> PartialEq for RegionBox<P> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl<P> Eq for RegionBox<P> {}

impl<P> Hash for RegionBox<P> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.hash(state);
    }
}

impl<P: Clone + std::fmt::Debug> Region for RegionBox<P> {
    type Point = P;

    fn center(&self) -> P {
        self.center.clone()
    }
}

/// Context owning one expansion object and the coefficients of every region
///
/// Each region has a multipole and a local expansion. Local expansions sit behind
/// a per-region lock so that the context can also be used as a [`SharedContext`].
pub struct FmmContext<E: Expansion> {
    expansion: E,
    multipoles: Vec<E::Multipole>,
    locals: Vec<Mutex<E::Local>>,
}

impl<E: Expansion> FmmContext<E> {
    /// Create a context with no regions
    pub fn new(expansion: E) -> Self {
        Self {
            expansion,
            multipoles: Vec::new(),
            locals: Vec::new(),
        }
    }

    /// Create a context with space reserved for `capacity` regions
    pub fn with_capacity(expansion: E, capacity: usize) -> Self {
        Self {
            expansion,
            multipoles: Vec::with_capacity(capacity),
            locals: Vec::with_capacity(capacity),
        }
    }

    /// Add a region with the given multipole expansion and an empty local expansion
    pub fn add_region(&mut self, center: E::Point, multipole: E::Multipole) -> RegionBox<E::Point>
    where
        E::Local: Default,
    {
        self.add_region_with_local(center, multipole, E::Local::default())
    }

    /// Add a region with the given multipole and local expansions
    pub fn add_region_with_local(
        &mut self,
        center: E::Point,
        multipole: E::Multipole,
        local: E::Local,
    ) -> RegionBox<E::Point> {
        let index = self.multipoles.len();
        self.multipoles.push(multipole);
        self.locals.push(Mutex::new(local));
        RegionBox { index, center }
    }

    /// Number of regions
    pub fn len(&self) -> usize {
        self.multipoles.len()
    }

    /// Check if the context has no regions
    pub fn is_empty(&self) -> bool {
        self.multipoles.is_empty()
    }

    /// Multipole expansions of all regions, in order of insertion
    pub fn multipoles(&self) -> &[E::Multipole] {
        &self.multipoles
    }

    /// Copy of the local expansion of a region
    pub fn local_value(&self, region: &RegionBox<E::Point>) -> E::Local
    where
        E::Local: Clone,
    {
        self.locals[region.index]
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Consume the context, returning the local expansions of all regions
    pub fn into_locals(self) -> Vec<E::Local> {
        self.locals
            .into_iter()
            .map(|local| local.into_inner().unwrap_or_else(PoisonError::into_inner))
            .collect()
    }
}

impl<E> Context for FmmContext<E>
where
    E: Expansion,
    E::Point: Clone + std::fmt::Debug,
{
    type Expansion = E;
    type SourceBox = RegionBox<E::Point>;
    type TargetBox = RegionBox<E::Point>;

    fn expansion(&self) -> &E {
        &self.expansion
    }

    fn multipole(&self, source: &Self::SourceBox) -> &E::Multipole {
        &self.multipoles[source.index]
    }

    fn local(&mut self, target: &Self::TargetBox) -> &mut E::Local {
        self.locals[target.index]
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn m2l_operands(
        &mut self,
        source: &Self::SourceBox,
        target: &Self::TargetBox,
    ) -> (&E, &E::Multipole, &mut E::Local) {
        (
            &self.expansion,
            &self.multipoles[source.index],
            self.locals[target.index]
                .get_mut()
                .unwrap_or_else(PoisonError::into_inner),
        )
    }
}

impl<E> SharedContext for FmmContext<E>
where
    E: Expansion + Sync,
    E::Point: Clone + std::fmt::Debug,
    E::Multipole: Sync,
    E::Local: Send,
{
    type LocalGuard<'a> = MutexGuard<'a, E::Local> where Self: 'a;

    fn lock_local(&self, target: &Self::TargetBox) -> Self::LocalGuard<'_> {
        self.locals[target.index]
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
