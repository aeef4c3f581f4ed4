use image::{Rgba, imageops::{self, FilterType}};

use crate::{
    config::MosaicStyle,
    types::{Bitmap, Point},
};

use super::pen::PenStroke;

/// Block-pixelates `image` with square blocks of `level` pixels.
///
/// Returns `None` for an empty image or a zero level; the mosaic tool is
/// then unavailable for that photo.
pub fn pixelate(image: &Bitmap, level: u32) -> Option<Bitmap> {
    if level == 0 || image.width() == 0 || image.height() == 0 {
        return None;
    }
    let small_w = image.width().div_ceil(level);
    let small_h = image.height().div_ceil(level);
    let small = imageops::resize(image, small_w, small_h, FilterType::Triangle);
    Some(imageops::resize(&small, image.width(), image.height(), FilterType::Nearest))
}

/// Mosaic overlay model: brush paths revealing a cover image over the photo.
#[derive(Debug, Clone)]
pub struct MosaicOverlay {
    pixelated: Bitmap,
    styles: Vec<MosaicStyle>,
    current_idx: usize,
    cover: Bitmap,
    line_width: f32,
    paths: Vec<PenStroke>,
    drawing: bool,
}

impl MosaicOverlay {
    /// Overlay over `pixelated`, showing style `idx` (falls back to the first style).
    pub fn new(pixelated: Bitmap, styles: Vec<MosaicStyle>, idx: usize, line_width: f32) -> Self {
        let styles = if styles.is_empty() {
            vec![MosaicStyle::Pixelated]
        } else {
            styles
        };
        let cover = pixelated.clone();
        let mut overlay = Self {
            pixelated,
            styles,
            current_idx: 0,
            cover,
            line_width,
            paths: Vec::new(),
            drawing: false,
        };
        overlay.set_cover(idx);
        overlay
    }

    /// Switches the revealed cover to style `idx`. Out-of-range indexes are ignored.
    pub fn set_cover(&mut self, idx: usize) {
        let Some(style) = self.styles.get(idx) else {
            return;
        };
        self.cover = match style {
            MosaicStyle::Pixelated => self.pixelated.clone(),
            MosaicStyle::Solid { rgba } => {
                Bitmap::from_pixel(self.pixelated.width(), self.pixelated.height(), Rgba(*rgba))
            }
        };
        self.current_idx = idx;
    }

    /// Index of the style being revealed.
    pub fn current_idx(&self) -> usize {
        self.current_idx
    }

    /// Image revealed where the user paints.
    pub fn cover(&self) -> &Bitmap {
        &self.cover
    }

    /// Starts a path at `point`, given in view coordinates at `zoom_scale`.
    pub fn begin_path(&mut self, point: Point, zoom_scale: f32) {
        let scale = zoom_scale.max(f32::EPSILON);
        self.paths.push(PenStroke {
            points: vec![point.unscaled(scale)],
            width: self.line_width / scale,
        });
        self.drawing = true;
    }

    /// Extends the live path.
    pub fn extend_path(&mut self, point: Point, zoom_scale: f32) {
        if !self.drawing {
            return;
        }
        if let Some(path) = self.paths.last_mut() {
            path.points.push(point.unscaled(zoom_scale.max(f32::EPSILON)));
        }
    }

    /// Finishes the live path. Returns false when no path was in progress.
    pub fn end_path(&mut self) -> bool {
        std::mem::replace(&mut self.drawing, false)
    }

    /// Paths painted since the last commit.
    pub fn paths(&self) -> &[PenStroke] {
        &self.paths
    }

    /// Drops all paths.
    pub fn reset(&mut self) {
        self.paths.clear();
        self.drawing = false;
    }
}
