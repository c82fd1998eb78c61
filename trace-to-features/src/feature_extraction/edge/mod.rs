//! Pulse-onset (t0) locators. Two independent strategies exist; an analysis
//! selects one per run and pairs it with the matching level estimators in
//! [`super::levels`].

pub mod derivative;
pub mod threshold;

pub use derivative::DerivativeEdge;
pub use threshold::ThresholdEdge;
