use crate::types::{Bitmap, Size};

/// Edit tool whose overlay captures touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditKind {
    /// Freehand pen.
    Pen,
    /// Mosaic brush.
    Mosaic,
}

/// Overlay views installed over the displayed photo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverlayKind {
    /// Pen strokes layer.
    PenCanvas,
    /// Mosaic cover layer.
    Mosaic,
}

/// Surface the host flattens into a bitmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Surface {
    /// Pen layer only: the last committed pen image plus live strokes.
    PenLayer,
    /// Displayed photo with every visible overlay.
    Photo,
}

/// Notifications sent to the host as edits progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditEvent {
    /// A stroke or path started.
    StrokeBegan(EditKind),
    /// A stroke or path finished and was recorded.
    StrokeEnded(EditKind),
    /// Mosaic overlay installed; the mosaic tool can now be offered.
    MosaicReady,
    /// An edit was undone.
    Undone(EditKind),
}

/// Rendering side of the editor.
///
/// Implemented by the view layer. All calls arrive on the interaction thread.
pub trait EditorHost {
    /// Flattens `surface` into a bitmap of `size`. `None` when nothing can be captured.
    fn screenshot(&mut self, surface: Surface, size: Size) -> Option<Bitmap>;

    /// Replaces the image shown under every overlay.
    fn set_displayed_image(&mut self, image: &Bitmap);

    /// Replaces the committed pen layer; `None` clears it.
    fn set_pen_layer_image(&mut self, image: Option<&Bitmap>);

    /// Inserts `overlay` directly below `below` in the view stack.
    fn insert_overlay_below(&mut self, overlay: OverlayKind, below: OverlayKind);

    /// Enables or disables touch handling for `overlay`.
    fn set_overlay_interactive(&mut self, overlay: OverlayKind, interactive: bool);

    /// Shows or hides `overlay`.
    fn set_overlay_hidden(&mut self, overlay: OverlayKind, hidden: bool);

    /// Hides or restores text and other auxiliary annotation views.
    fn set_annotations_hidden(&mut self, hidden: bool);

    /// Current zoom of the scroll view hosting the photo.
    fn zoom_scale(&self) -> f32;

    /// Delivers an edit notification.
    fn notify(&mut self, event: EditEvent);
}
