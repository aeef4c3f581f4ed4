//! Disable-rule trait, built-in rules, and the ordered rule chain.

/// Ordered, short-circuiting rule evaluation.
pub mod chain;
/// Rule trait and built-in policies.
pub mod rules;
