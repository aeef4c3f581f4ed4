//! Work that leaves the interaction thread, and how results come back.

/// Runtime event stream payloads.
pub mod events;
/// HUD lifecycle context and its command-loop handle.
pub mod hud;
/// Background pixelation and the editor registry that receives it.
pub mod mosaic;
