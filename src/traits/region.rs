//! Regions of space
use std::fmt::Debug;

/// A handle to a node (box) of the spatial decomposition tree
///
/// Handles are cheap to copy and are held by value. The M2L core only reads the
/// centre of a region; coefficient storage is looked up through a
/// [`Context`](crate::traits::Context).
pub trait Region: Clone + Debug {
    /// Point type
    type Point;

    /// Geometric centre of the region
    fn center(&self) -> Self::Point;
}
