//! Capabilities of types and the gate deciding which generic instantiations
//! they allow.

pub mod capability;
pub mod gate;

pub use capability::{Capabilities, Capability};
pub use gate::{permits, Rejection, Site};
