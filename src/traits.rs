//! Trait definitions

mod context;
mod expansion;
mod region;

pub use context::{Context, LocalOf, MultipoleOf, SharedContext};
pub use expansion::{Expansion, M2lCapability, M2lOperator, Supported, Unsupported};
pub use region::Region;
