//! Deferred evaluation of M2L interactions
use std::hash::Hash;

use itertools::Itertools;
use log::{debug, trace};
use rayon::iter::ParallelIterator;
use rayon::slice::ParallelSlice;

use crate::m2l::M2l;
use crate::traits::{Context, Expansion, M2lCapability, Region, SharedContext};
use crate::types::Result;

/// Lifecycle of an [`M2lBatch`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchState {
    /// Accepting insertions
    Open,
    /// Translations are being applied
    Draining,
    /// Executed; must be cleared before reuse
    Spent,
}

/// Options for batched M2L evaluation
#[derive(Debug, Clone)]
pub struct M2lBatchOptions {
    /// Number of target regions handed to each task during parallel execution
    batch_size: usize,
    /// Number of interactions to reserve space for on construction
    initial_capacity: usize,
}

impl Default for M2lBatchOptions {
    fn default() -> Self {
        Self {
            batch_size: 128,
            initial_capacity: 0,
        }
    }
}

impl M2lBatchOptions {
    /// Set the number of target regions handed to each task during parallel execution
    pub fn set_batch_size(&mut self, size: usize) {
        self.batch_size = size;
    }

    /// Number of target regions handed to each task during parallel execution
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Set the number of interactions to reserve space for on construction
    pub fn set_initial_capacity(&mut self, capacity: usize) {
        self.initial_capacity = capacity;
    }

    /// Number of interactions to reserve space for on construction
    pub fn initial_capacity(&self) -> usize {
        self.initial_capacity
    }
}

/// A lazy M2L evaluator
///
/// Saves source/target box pairs during tree traversal and sends all of them to
/// the [`M2l`] dispatcher in a single pass. Every pair updates its target additively,
/// so the order in which pairs are executed does not affect the result beyond
/// floating point rounding.
///
/// A batch is executed once. Reusing it requires an explicit [`M2lBatch::clear`].
pub struct M2lBatch<C: Context> {
    m2l_list: Vec<(C::SourceBox, C::TargetBox)>,
    state: BatchState,
    options: M2lBatchOptions,
}

impl<C: Context> Default for M2lBatch<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Context> M2lBatch<C> {
    /// Create an empty batch with default options
    pub fn new() -> Self {
        Self::with_options(M2lBatchOptions::default())
    }

    /// Create an empty batch
    pub fn with_options(options: M2lBatchOptions) -> Self {
        Self {
            m2l_list: Vec::with_capacity(options.initial_capacity),
            state: BatchState::Open,
            options,
        }
    }

    /// Batch options
    pub fn options(&self) -> &M2lBatchOptions {
        &self.options
    }

    /// Mutable batch options
    pub fn options_mut(&mut self) -> &mut M2lBatchOptions {
        &mut self.options
    }

    /// Current state
    pub fn state(&self) -> BatchState {
        self.state
    }

    /// Number of recorded interactions
    pub fn len(&self) -> usize {
        self.m2l_list.len()
    }

    /// Check if no interactions are recorded
    pub fn is_empty(&self) -> bool {
        self.m2l_list.is_empty()
    }

    /// Recorded interactions, in order of insertion
    pub fn iter(&self) -> std::slice::Iter<'_, (C::SourceBox, C::TargetBox)> {
        self.m2l_list.iter()
    }

    /// Insert a source-target box interaction to the interaction list.
    ///
    /// # Panics
    ///
    /// Panics if the batch has already been executed and not cleared since.
    pub fn insert(&mut self, source: C::SourceBox, target: C::TargetBox) {
        assert!(
            self.state == BatchState::Open,
            "M2L batch has already been executed; call clear() before reusing it"
        );
        self.m2l_list.push((source, target));
    }

    /// Drop all recorded interactions and accept insertions again
    pub fn clear(&mut self) {
        self.m2l_list.clear();
        self.state = BatchState::Open;
    }

    /// Compute all interactions in the interaction list, in order of insertion.
    ///
    /// If the expansion has no M2L operator an error is returned before anything is
    /// evaluated and the batch is left unchanged. Otherwise every pair is evaluated
    /// exactly once and the batch is spent afterwards. Executing an empty or spent
    /// batch does nothing.
    pub fn execute(&mut self, context: &mut C) -> Result<()> {
        if self.m2l_list.is_empty() {
            debug!("No M2L interactions to execute");
            self.state = BatchState::Spent;
            return Ok(());
        }
        M2l::check::<C::Expansion>()?;

        self.state = BatchState::Draining;
        debug!("Executing {} M2L interactions", self.m2l_list.len());

        let result = self
            .m2l_list
            .drain(..)
            .try_for_each(|(source, target)| M2l::evaluate(context, &source, &target));

        self.state = BatchState::Spent;
        result
    }

    /// Compute all interactions in the interaction list in parallel.
    ///
    /// Interactions are partitioned by target, so each target's local expansion is
    /// updated by exactly one task; within a partition sources are applied in order
    /// of insertion. Partitions are distributed over the rayon thread pool in chunks of
    /// [`M2lBatchOptions::batch_size`] targets. The result equals that of
    /// [`M2lBatch::execute`] up to floating point rounding.
    pub fn execute_parallel(&mut self, context: &C) -> Result<()>
    where
        C: SharedContext,
        C::SourceBox: Send + Sync,
        C::TargetBox: Hash + Eq + Send + Sync,
    {
        if self.m2l_list.is_empty() {
            debug!("No M2L interactions to execute");
            self.state = BatchState::Spent;
            return Ok(());
        }
        M2l::check::<C::Expansion>()?;

        self.state = BatchState::Draining;

        let partitions = self
            .m2l_list
            .drain(..)
            .map(|(source, target)| (target, source))
            .into_group_map()
            .into_iter()
            .collect_vec();

        debug!(
            "Executing M2L interactions for {} targets in parallel",
            partitions.len()
        );

        let result = partitions
            .par_chunks(self.options.batch_size.max(1))
            .try_for_each(|chunk| -> Result<()> {
                for (target, sources) in chunk {
                    let mut local = context.lock_local(target);
                    for source in sources {
                        trace!("M2L:\n  {:?}\n  {:?}", source, target);
                        let translation = target.center() - source.center();
                        <<C::Expansion as Expansion>::M2l as M2lCapability<C::Expansion>>::m2l(
                            context.expansion(),
                            context.multipole(source),
                            &mut *local,
                            &translation,
                        )?;
                    }
                }
                Ok(())
            });

        self.state = BatchState::Spent;
        result
    }
}

impl<C: Context> Extend<(C::SourceBox, C::TargetBox)> for M2lBatch<C> {
    fn extend<I: IntoIterator<Item = (C::SourceBox, C::TargetBox)>>(&mut self, iter: I) {
        for (source, target) in iter {
            self.insert(source, target);
        }
    }
}

impl<C: Context> FromIterator<(C::SourceBox, C::TargetBox)> for M2lBatch<C> {
    fn from_iter<I: IntoIterator<Item = (C::SourceBox, C::TargetBox)>>(iter: I) -> Self {
        let mut batch = Self::new();
        batch.extend(iter);
        batch
    }
}
