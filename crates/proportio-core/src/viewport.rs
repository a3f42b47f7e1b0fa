//! Mapping between image space and display space.
//!
//! Rulers and locks live in image coordinates, so zooming and panning
//! never touch them. Renderers map through [`ViewTransform`] once per
//! frame; input dispatch maps pointer positions back before calling
//! into the session.

use serde::{Deserialize, Serialize};

use crate::types::{Dimensions, Point};

/// Smallest allowed zoom factor.
pub const MIN_SCALE: f64 = 0.05;

/// Largest allowed zoom factor.
pub const MAX_SCALE: f64 = 40.0;

/// `display = image * scale + offset`, applied per axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewTransform {
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ViewTransform {
    /// One image pixel per display pixel, no offset.
    pub const IDENTITY: Self = Self {
        scale: 1.0,
        offset_x: 0.0,
        offset_y: 0.0,
    };

    /// Largest transform that shows the whole image centered in
    /// `viewport`.
    ///
    /// Returns [`IDENTITY`](Self::IDENTITY) when either size has a zero
    /// side.
    #[must_use]
    pub fn fit(image: Dimensions, viewport: Dimensions) -> Self {
        if image.width == 0 || image.height == 0 || viewport.width == 0 || viewport.height == 0 {
            return Self::IDENTITY;
        }
        let (iw, ih) = (f64::from(image.width), f64::from(image.height));
        let (vw, vh) = (f64::from(viewport.width), f64::from(viewport.height));
        let scale = (vw / iw).min(vh / ih).clamp(MIN_SCALE, MAX_SCALE);
        Self {
            scale,
            offset_x: iw.mul_add(-scale, vw) / 2.0,
            offset_y: ih.mul_add(-scale, vh) / 2.0,
        }
    }

    #[must_use]
    pub fn image_to_display(&self, p: Point) -> Point {
        Point::new(
            p.x.mul_add(self.scale, self.offset_x),
            p.y.mul_add(self.scale, self.offset_y),
        )
    }

    #[must_use]
    pub fn display_to_image(&self, p: Point) -> Point {
        Point::new(
            (p.x - self.offset_x) / self.scale,
            (p.y - self.offset_y) / self.scale,
        )
    }

    /// Multiply the scale by `factor`, keeping the image point under
    /// `anchor` (a display position) fixed on screen.
    ///
    /// The resulting scale is clamped to `[MIN_SCALE, MAX_SCALE]`.
    /// Non-finite or non-positive factors are ignored.
    pub fn zoom_about(&mut self, anchor: Point, factor: f64) {
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }
        let before = self.display_to_image(anchor);
        self.scale = (self.scale * factor).clamp(MIN_SCALE, MAX_SCALE);
        let after = self.image_to_display(before);
        self.offset_x += anchor.x - after.x;
        self.offset_y += anchor.y - after.y;
    }

    /// Shift the image by `(dx, dy)` display pixels.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.offset_x += dx;
        self.offset_y += dy;
    }
}
