//! Asset state machine and per-session selection bookkeeping.

/// Asset wrapper, lifecycle state, and image variants.
pub mod asset;
/// Session-owned selection order and limits.
pub mod selection;
