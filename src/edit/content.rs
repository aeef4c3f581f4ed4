use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::{
    config::EditorOptions,
    persist::{
        CacheResult, SnapshotStorage,
        cache::EditCache,
        file::{self, FileStorage},
    },
    types::{Bitmap, Point, Size},
};

use super::{
    host::{EditEvent, EditKind, EditorHost, OverlayKind, Surface},
    mosaic::MosaicOverlay,
    pen::PenCanvas,
};

const PEN_CACHE_KEY: &str = "pen";
const MOSAIC_CACHE_KEY: &str = "mosaic";

/// Pixelation work for one mosaic setup.
#[derive(Debug, Clone)]
pub struct MosaicJob {
    /// Matches the controller's generation only if no newer setup started.
    pub generation: u64,
    /// Photo to pixelate.
    pub image: Bitmap,
    /// Block size in pixels.
    pub level: u32,
}

/// What happened to a delivered pixelation result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MosaicOutcome {
    /// Overlay installed and the host notified.
    Installed,
    /// Pixelation produced nothing; the mosaic tool stays unavailable.
    Unavailable,
    /// A newer setup superseded this result.
    Stale,
    /// The editor was torn down before delivery.
    HostGone,
}

/// Edit session controller for one photo: pen and mosaic overlays, each
/// with its own single-level undo cache.
pub struct EditorContent<H: EditorHost, S: SnapshotStorage = FileStorage> {
    host: H,
    options: EditorOptions,
    image: Bitmap,
    displayed: Bitmap,
    canvas: PenCanvas,
    mosaic: Option<MosaicOverlay>,
    mosaic_generation: u64,
    mosaic_idx: usize,
    active_tool: Option<EditKind>,
    pen_cache: EditCache<S>,
    mosaic_cache: EditCache<S>,
    owned_dir: Option<PathBuf>,
}

impl<H: EditorHost> EditorContent<H, FileStorage> {
    /// Opens a session whose undo snapshots live in its own scratch directory.
    ///
    /// The directory is removed again when the session is dropped; a
    /// configured root above it is left in place.
    pub fn open(host: H, image: Bitmap, options: EditorOptions) -> CacheResult<Self> {
        let dir = file::session_dir(&options.cache)?;
        let pen = FileStorage::open(&dir)?;
        let mosaic = FileStorage::open(&dir)?;
        let mut content = Self::with_storage(host, image, options, pen, mosaic);
        content.owned_dir = Some(dir);
        Ok(content)
    }
}

impl<H: EditorHost, S: SnapshotStorage> EditorContent<H, S> {
    /// Builds a session over caller-provided storage backends.
    pub fn with_storage(mut host: H, image: Bitmap, options: EditorOptions, pen_storage: S, mosaic_storage: S) -> Self {
        let keep = options.cache.keep_in_memory;
        host.set_displayed_image(&image);
        host.set_overlay_interactive(OverlayKind::PenCanvas, false);
        Self {
            host,
            canvas: PenCanvas::new(options.pen_width),
            mosaic_idx: options.default_mosaic_index,
            options,
            displayed: image.clone(),
            image,
            mosaic: None,
            mosaic_generation: 0,
            active_tool: None,
            pen_cache: EditCache::new(PEN_CACHE_KEY, pen_storage, keep),
            mosaic_cache: EditCache::new(MOSAIC_CACHE_KEY, mosaic_storage, keep),
            owned_dir: None,
        }
    }

    /// Scratch directory created by [`Self::open`], if any.
    pub fn scratch_dir(&self) -> Option<&Path> {
        self.owned_dir.as_deref()
    }

    /// Rendering collaborator.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutable access to the rendering collaborator.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Options the session was opened with.
    pub fn options(&self) -> &EditorOptions {
        &self.options
    }

    /// Photo the session started from.
    pub fn image(&self) -> &Bitmap {
        &self.image
    }

    /// Image currently shown under the overlays.
    pub fn displayed_image(&self) -> &Bitmap {
        &self.displayed
    }

    /// Pen overlay model.
    pub fn canvas(&self) -> &PenCanvas {
        &self.canvas
    }

    /// Mosaic overlay, once installed.
    pub fn mosaic(&self) -> Option<&MosaicOverlay> {
        self.mosaic.as_ref()
    }

    /// Tool whose overlay currently receives touches.
    pub fn active_tool(&self) -> Option<EditKind> {
        self.active_tool
    }

    /// Makes the overlay of `tool` the only one receiving touches.
    pub fn select_tool(&mut self, tool: Option<EditKind>) {
        self.active_tool = tool;
        self.host
            .set_overlay_interactive(OverlayKind::PenCanvas, tool == Some(EditKind::Pen));
        if self.mosaic.is_some() {
            self.host
                .set_overlay_interactive(OverlayKind::Mosaic, tool == Some(EditKind::Mosaic));
        }
    }

    // ===== Pen =====

    /// Starts a pen stroke. Returns false unless the pen tool is active.
    pub fn pen_begin(&mut self, point: Point) -> bool {
        if self.active_tool != Some(EditKind::Pen) {
            return false;
        }
        let scale = self.host.zoom_scale();
        self.canvas.begin_stroke(point, scale);
        self.host.notify(EditEvent::StrokeBegan(EditKind::Pen));
        true
    }

    /// Extends the live pen stroke.
    pub fn pen_move(&mut self, point: Point) {
        let scale = self.host.zoom_scale();
        self.canvas.extend_stroke(point, scale);
    }

    /// Flattens the pen layer, commits it, and stores it for undo.
    pub fn pen_end(&mut self) {
        if !self.canvas.end_stroke() {
            return;
        }

        match self.host.screenshot(Surface::PenLayer, Size::of(&self.image)) {
            Some(shot) => {
                self.host.set_pen_layer_image(Some(&shot));
                self.canvas.set_last_pen_image(Some(shot.clone()));
                self.canvas.reset();
                self.pen_cache.write(shot);
            }
            None => {
                warn!("pen layer capture failed; stroke not recorded");
                self.canvas.reset();
            }
        }
        self.host.notify(EditEvent::StrokeEnded(EditKind::Pen));
    }

    /// Consumes the stored pen edit and clears the pen layer. No-op without one.
    pub fn pen_undo(&mut self) -> bool {
        if self.pen_cache.read(true).is_none() {
            return false;
        }
        self.canvas.set_last_pen_image(None);
        self.canvas.reset();
        self.host.set_pen_layer_image(None);
        self.host.notify(EditEvent::Undone(EditKind::Pen));
        true
    }

    /// True when a pen edit can be undone.
    pub fn pen_can_undo(&self) -> bool {
        self.pen_cache.has_snapshot()
    }

    // ===== Mosaic =====

    /// Drops the current overlay and describes the pixelation to run off the interaction path.
    ///
    /// The style index in use survives the rebuild.
    pub fn prepare_mosaic(&mut self) -> MosaicJob {
        if let Some(mosaic) = self.mosaic.take() {
            self.mosaic_idx = mosaic.current_idx();
        }
        self.mosaic_generation += 1;
        MosaicJob {
            generation: self.mosaic_generation,
            image: self.image.clone(),
            level: self.options.mosaic_level,
        }
    }

    /// Installs the overlay built from a finished pixelation.
    pub fn install_mosaic(&mut self, generation: u64, pixelated: Option<Bitmap>) -> MosaicOutcome {
        if generation != self.mosaic_generation {
            debug!(generation, current = self.mosaic_generation, "stale mosaic result dropped");
            return MosaicOutcome::Stale;
        }
        let Some(pixelated) = pixelated else {
            info!("mosaic unavailable for this photo");
            return MosaicOutcome::Unavailable;
        };

        self.mosaic = Some(MosaicOverlay::new(
            pixelated,
            self.options.mosaic_styles.clone(),
            self.mosaic_idx,
            self.options.mosaic_width,
        ));
        self.host
            .insert_overlay_below(OverlayKind::Mosaic, OverlayKind::PenCanvas);
        self.host.set_overlay_interactive(
            OverlayKind::Mosaic,
            self.active_tool == Some(EditKind::Mosaic),
        );
        info!("mosaic created");
        self.host.notify(EditEvent::MosaicReady);
        MosaicOutcome::Installed
    }

    /// Switches the mosaic style and shows the latest committed mosaic state.
    pub fn set_mosaic_image(&mut self, idx: usize) {
        if let Some(mosaic) = self.mosaic.as_mut() {
            mosaic.set_cover(idx);
        }
        let shown = self.mosaic_cache.read(false).unwrap_or_else(|| self.image.clone());
        self.show(shown);
    }

    /// Starts a mosaic path. Returns false unless the mosaic tool is active and installed.
    pub fn mosaic_begin(&mut self, point: Point) -> bool {
        if self.active_tool != Some(EditKind::Mosaic) {
            return false;
        }
        let scale = self.host.zoom_scale();
        let Some(mosaic) = self.mosaic.as_mut() else {
            return false;
        };
        mosaic.begin_path(point, scale);
        self.host.notify(EditEvent::StrokeBegan(EditKind::Mosaic));
        true
    }

    /// Extends the live mosaic path.
    pub fn mosaic_move(&mut self, point: Point) {
        let scale = self.host.zoom_scale();
        if let Some(mosaic) = self.mosaic.as_mut() {
            mosaic.extend_path(point, scale);
        }
    }

    /// Flattens the photo with the mosaic applied, excluding pen and text
    /// layers, shows it, and stores it for undo.
    pub fn mosaic_end(&mut self) {
        let ended = self.mosaic.as_mut().is_some_and(|mosaic| mosaic.end_path());
        if !ended {
            return;
        }

        self.host.set_overlay_hidden(OverlayKind::PenCanvas, true);
        self.host.set_annotations_hidden(true);
        let shot = self.host.screenshot(Surface::Photo, Size::of(&self.image));
        self.host.set_overlay_hidden(OverlayKind::PenCanvas, false);
        self.host.set_annotations_hidden(false);

        match shot {
            Some(shot) => {
                self.show(shot.clone());
                self.mosaic_cache.write(shot);
            }
            None => warn!("photo capture failed; mosaic stroke not recorded"),
        }
        if let Some(mosaic) = self.mosaic.as_mut() {
            mosaic.reset();
        }
        self.host.notify(EditEvent::StrokeEnded(EditKind::Mosaic));
    }

    /// Consumes the stored mosaic edit and shows the original photo again. No-op without one.
    pub fn mosaic_undo(&mut self) -> bool {
        if self.mosaic_cache.read(true).is_none() {
            return false;
        }
        self.show(self.image.clone());
        if let Some(mosaic) = self.mosaic.as_mut() {
            mosaic.reset();
        }
        self.host.notify(EditEvent::Undone(EditKind::Mosaic));
        true
    }

    /// True when a mosaic edit can be undone.
    pub fn mosaic_can_undo(&self) -> bool {
        self.mosaic_cache.has_snapshot()
    }

    fn show(&mut self, image: Bitmap) {
        self.host.set_displayed_image(&image);
        self.displayed = image;
    }
}

impl<H: EditorHost, S: SnapshotStorage> Drop for EditorContent<H, S> {
    fn drop(&mut self) {
        self.pen_cache.clear();
        self.mosaic_cache.clear();
        if let Some(dir) = self.owned_dir.take() {
            file::remove_session_dir(&dir);
        }
    }
}
