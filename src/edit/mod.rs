//! Pen and mosaic editing over a host-rendered photo.

/// Edit session controller.
pub mod content;
/// Rendering collaborator interface and edit notifications.
pub mod host;
/// Mosaic overlay model and pixelation.
pub mod mosaic;
/// Pen overlay model.
pub mod pen;
