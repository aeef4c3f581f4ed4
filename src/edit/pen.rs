use crate::types::{Bitmap, Point};

/// One freehand stroke in content coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct PenStroke {
    /// Points in content coordinates.
    pub points: Vec<Point>,
    /// Line width in content coordinates.
    pub width: f32,
}

/// Pen overlay model: live strokes on top of the last committed pen image.
#[derive(Debug, Clone, Default)]
pub struct PenCanvas {
    width: f32,
    strokes: Vec<PenStroke>,
    drawing: bool,
    last_pen_image: Option<Bitmap>,
}

impl PenCanvas {
    /// Empty canvas drawing lines `width` points wide.
    pub fn new(width: f32) -> Self {
        Self {
            width,
            ..Self::default()
        }
    }

    /// Starts a stroke at `point`, given in view coordinates at `zoom_scale`.
    pub fn begin_stroke(&mut self, point: Point, zoom_scale: f32) {
        let scale = zoom_scale.max(f32::EPSILON);
        self.strokes.push(PenStroke {
            points: vec![point.unscaled(scale)],
            width: self.width / scale,
        });
        self.drawing = true;
    }

    /// Extends the live stroke.
    pub fn extend_stroke(&mut self, point: Point, zoom_scale: f32) {
        if !self.drawing {
            return;
        }
        if let Some(stroke) = self.strokes.last_mut() {
            stroke.points.push(point.unscaled(zoom_scale.max(f32::EPSILON)));
        }
    }

    /// Finishes the live stroke. Returns false when no stroke was in progress.
    pub fn end_stroke(&mut self) -> bool {
        std::mem::replace(&mut self.drawing, false)
    }

    /// True while a stroke is in progress.
    pub fn is_drawing(&self) -> bool {
        self.drawing
    }

    /// Live strokes since the last commit.
    pub fn strokes(&self) -> &[PenStroke] {
        &self.strokes
    }

    /// Last committed pen layer.
    pub fn last_pen_image(&self) -> Option<&Bitmap> {
        self.last_pen_image.as_ref()
    }

    /// Replaces the committed pen layer.
    pub fn set_last_pen_image(&mut self, image: Option<Bitmap>) {
        self.last_pen_image = image;
    }

    /// Drops live strokes. The committed pen image is kept.
    pub fn reset(&mut self) {
        self.strokes.clear();
        self.drawing = false;
    }
}
