pub mod benchmark;
#[cfg(feature = "scenarios")]
pub mod comparison;
pub mod rebalancing;
