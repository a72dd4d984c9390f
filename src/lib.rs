//! FMM M2L
//!
//! Multipole-to-local dispatch and deferred batch evaluation for fast multipole methods.
#![cfg_attr(feature = "strict", deny(warnings))]
#![warn(missing_docs)]

pub mod batch;
pub mod context;
pub mod laplace;
pub mod m2l;
pub mod traits;
pub mod types;

pub use batch::{BatchState, M2lBatch, M2lBatchOptions};
pub use context::{FmmContext, RegionBox};
pub use laplace::Laplace3dExpansion;
pub use m2l::M2l;
pub use types::{ExpansionTraits, FmmError, Point, Result};
