// Copyright 2025 the Kozaneba Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Affine, Point, Rect, Vec2};

/// Default lower zoom bound before the first fit.
pub const DEFAULT_MIN_ZOOM: f64 = 1e-3;

/// Default upper zoom bound.
pub const DEFAULT_MAX_ZOOM: f64 = 1.5;

/// Exponential easing parameters for [`Viewport::advance`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Easing {
    /// Fraction of the remaining distance covered per frame.
    pub factor: f64,
    /// Zoom difference below which zoom snaps to its target.
    pub scale_epsilon: f64,
    /// Pan difference, in view pixels, below which pan snaps to its target.
    pub pan_epsilon: f64,
}

impl Default for Easing {
    fn default() -> Self {
        Self {
            factor: 0.25,
            scale_epsilon: 1e-4,
            pan_epsilon: 0.5,
        }
    }
}

/// Pan/zoom viewport over the note world, with an eased target state.
///
/// The transform maps world coordinates to view pixels as
/// `view = view_origin + pan + world * zoom`. Besides the current zoom and
/// pan, the viewport tracks a *target* zoom and pan. Wheel zoom, panning and
/// fitting move both together; programmatic zoom moves only the target and
/// [`Viewport::advance`] eases the current state toward it frame by frame.
///
/// Zoom always stays inside `[min_zoom, max_zoom]`.
#[derive(Clone, Debug)]
pub struct Viewport {
    view_rect: Rect,
    zoom: f64,
    pan: Vec2,
    target_zoom: f64,
    target_pan: Vec2,
    min_zoom: f64,
    max_zoom: f64,
    easing: Easing,
    world_to_view: Affine,
    view_to_world: Affine,
}

impl Viewport {
    /// Creates a viewport covering `view_rect` at zoom `1.0` with zero pan.
    ///
    /// Zoom is limited to `[DEFAULT_MIN_ZOOM, DEFAULT_MAX_ZOOM]` until the
    /// first [`Viewport::fit_world`].
    #[must_use]
    pub fn new(view_rect: Rect) -> Self {
        let mut vp = Self {
            view_rect,
            zoom: 1.0,
            pan: Vec2::ZERO,
            target_zoom: 1.0,
            target_pan: Vec2::ZERO,
            min_zoom: DEFAULT_MIN_ZOOM,
            max_zoom: DEFAULT_MAX_ZOOM,
            easing: Easing::default(),
            world_to_view: Affine::IDENTITY,
            view_to_world: Affine::IDENTITY,
        };
        vp.rebuild_transforms();
        vp
    }

    /// Returns the view rectangle in device coordinates.
    #[must_use]
    pub fn view_rect(&self) -> Rect {
        self.view_rect
    }

    /// Sets the view rectangle. Zoom and pan are unchanged.
    pub fn set_view_rect(&mut self, rect: Rect) {
        if self.view_rect == rect {
            return;
        }
        self.view_rect = rect;
        self.rebuild_transforms();
    }

    /// Current zoom factor.
    #[must_use]
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Current pan offset in view pixels.
    #[must_use]
    pub fn pan(&self) -> Vec2 {
        self.pan
    }

    /// Zoom factor the viewport is easing toward.
    #[must_use]
    pub fn target_zoom(&self) -> f64 {
        self.target_zoom
    }

    /// Pan offset the viewport is easing toward.
    #[must_use]
    pub fn target_pan(&self) -> Vec2 {
        self.target_pan
    }

    /// Lower zoom bound.
    #[must_use]
    pub fn min_zoom(&self) -> f64 {
        self.min_zoom
    }

    /// Upper zoom bound.
    #[must_use]
    pub fn max_zoom(&self) -> f64 {
        self.max_zoom
    }

    /// Sets the zoom bounds and clamps current and target zoom into them.
    ///
    /// The range is normalized so that `min_zoom <= max_zoom`.
    pub fn set_zoom_limits(&mut self, min_zoom: f64, max_zoom: f64) {
        let (min_zoom, max_zoom) = if min_zoom <= max_zoom {
            (min_zoom, max_zoom)
        } else {
            (max_zoom, min_zoom)
        };
        self.min_zoom = min_zoom;
        self.max_zoom = max_zoom;
        self.zoom = self.clamp_zoom(self.zoom);
        self.target_zoom = self.clamp_zoom(self.target_zoom);
        self.rebuild_transforms();
    }

    /// Easing parameters.
    #[must_use]
    pub fn easing(&self) -> Easing {
        self.easing
    }

    /// Replaces the easing parameters.
    pub fn set_easing(&mut self, easing: Easing) {
        self.easing = easing;
    }

    /// Returns `true` when the current state equals the target state.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.zoom == self.target_zoom && self.pan == self.target_pan
    }

    /// Translates current and target pan by the same view-space delta.
    pub fn pan_by_view(&mut self, delta: Vec2) {
        if delta == Vec2::ZERO {
            return;
        }
        self.pan += delta;
        self.target_pan += delta;
        self.rebuild_transforms();
    }

    /// Zooms immediately around an anchor in view coordinates.
    ///
    /// The world point under `anchor_view` stays under it. Current and target
    /// state are both set, which cancels any easing in progress. Non-positive
    /// factors are ignored.
    pub fn zoom_about_view_point(&mut self, anchor_view: Point, factor: f64) {
        if factor <= 0.0 {
            return;
        }
        let anchor_world = self.view_to_world_point(anchor_view);
        let zoom = self.clamp_zoom(self.zoom * factor);
        let pan = self.pan_keeping(anchor_world, anchor_view, zoom);
        self.zoom = zoom;
        self.target_zoom = zoom;
        self.pan = pan;
        self.target_pan = pan;
        self.rebuild_transforms();
    }

    /// Sets only the target zoom, anchored at the view centre.
    ///
    /// The world point currently at the centre will be at the centre once the
    /// easing settles.
    pub fn set_target_zoom(&mut self, zoom: f64) {
        let center = self.view_rect.center();
        let center_world = self.view_to_world_point(center);
        let zoom = self.clamp_zoom(zoom);
        self.target_zoom = zoom;
        self.target_pan = self.pan_keeping(center_world, center, zoom);
    }

    /// Multiplies the target zoom by `factor`, anchored at the view centre.
    ///
    /// Non-positive factors are ignored.
    pub fn scale_target_zoom(&mut self, factor: f64) {
        if factor > 0.0 {
            self.set_target_zoom(self.target_zoom * factor);
        }
    }

    /// Fits `world` into the view, centered, with the given margin fraction.
    ///
    /// The fitted zoom becomes the new minimum zoom (raising the maximum if it
    /// would otherwise fall below), and the result is applied to both current
    /// and target state without easing. Degenerate world or view rectangles
    /// leave the viewport unchanged.
    pub fn fit_world(&mut self, world: Rect, margin: f64) {
        if world.width() <= 0.0 || world.height() <= 0.0 {
            return;
        }
        let view_size = self.view_rect.size();
        if view_size.width <= 0.0 || view_size.height <= 0.0 {
            return;
        }
        let zoom = (view_size.width / world.width()).min(view_size.height / world.height()) * margin;
        self.min_zoom = zoom;
        self.max_zoom = self.max_zoom.max(zoom);

        let view_origin = self.view_rect.origin().to_vec2();
        let pan =
            self.view_rect.center().to_vec2() - view_origin - world.center().to_vec2() * zoom;
        self.zoom = zoom;
        self.target_zoom = zoom;
        self.pan = pan;
        self.target_pan = pan;
        self.rebuild_transforms();
        tracing::trace!(zoom, "viewport fitted to world");
    }

    /// Moves one easing step toward the target state.
    ///
    /// While zoom or pan differs from its target by more than the easing
    /// epsilons, both move [`Easing::factor`] of the remaining distance and
    /// this returns `true`. Otherwise the state snaps exactly onto the target
    /// and this returns `false`.
    pub fn advance(&mut self) -> bool {
        let dz = self.target_zoom - self.zoom;
        let dp = self.target_pan - self.pan;
        let e = self.easing;
        if dz.abs() > e.scale_epsilon || dp.x.abs() > e.pan_epsilon || dp.y.abs() > e.pan_epsilon
        {
            self.zoom += dz * e.factor;
            self.pan += dp * e.factor;
            self.rebuild_transforms();
            true
        } else {
            if !self.is_settled() {
                self.zoom = self.target_zoom;
                self.pan = self.target_pan;
                self.rebuild_transforms();
            }
            false
        }
    }

    /// World-to-view transform.
    #[must_use]
    pub fn world_to_view(&self) -> Affine {
        self.world_to_view
    }

    /// Returns the visible world-space rectangle.
    #[must_use]
    pub fn visible_world_rect(&self) -> Rect {
        self.view_to_world_rect(self.view_rect)
    }

    /// Converts a world-space point into view coordinates.
    #[must_use]
    pub fn world_to_view_point(&self, pt: Point) -> Point {
        self.world_to_view * pt
    }

    /// Converts a view-space point into world coordinates.
    #[must_use]
    pub fn view_to_world_point(&self, pt: Point) -> Point {
        self.view_to_world * pt
    }

    /// Converts a world-space rectangle into view coordinates.
    #[must_use]
    pub fn world_to_view_rect(&self, rect: Rect) -> Rect {
        Rect::from_points(
            self.world_to_view * rect.origin(),
            self.world_to_view * Point::new(rect.x1, rect.y1),
        )
    }

    /// Converts a view-space rectangle into world coordinates.
    ///
    /// The result is normalized, whatever corner order `rect` uses.
    #[must_use]
    pub fn view_to_world_rect(&self, rect: Rect) -> Rect {
        Rect::from_points(
            self.view_to_world * rect.origin(),
            self.view_to_world * Point::new(rect.x1, rect.y1),
        )
    }

    /// Snapshot of the current viewport state for debugging and inspection.
    #[must_use]
    pub fn debug_info(&self) -> ViewportDebugInfo {
        ViewportDebugInfo {
            view_rect: self.view_rect,
            visible_world_rect: self.visible_world_rect(),
            zoom: self.zoom,
            pan: self.pan,
            target_zoom: self.target_zoom,
            target_pan: self.target_pan,
            min_zoom: self.min_zoom,
            max_zoom: self.max_zoom,
        }
    }

    fn clamp_zoom(&self, zoom: f64) -> f64 {
        zoom.clamp(self.min_zoom, self.max_zoom)
    }

    /// Pan that puts `world` at `view` under `zoom`.
    fn pan_keeping(&self, world: Point, view: Point, zoom: f64) -> Vec2 {
        view.to_vec2() - self.view_rect.origin().to_vec2() - world.to_vec2() * zoom
    }

    fn rebuild_transforms(&mut self) {
        let view_origin = self.view_rect.origin().to_vec2();
        // World → view: scale, then translate by pan into the view rect.
        self.world_to_view = Affine::translate(view_origin + self.pan) * Affine::scale(self.zoom);
        self.view_to_world = self.world_to_view.inverse();
    }
}

/// Debug snapshot of a [`Viewport`] state.
#[derive(Clone, Copy, Debug)]
pub struct ViewportDebugInfo {
    /// View rectangle in device coordinates.
    pub view_rect: Rect,
    /// World-space rectangle currently visible.
    pub visible_world_rect: Rect,
    /// Current zoom.
    pub zoom: f64,
    /// Current pan in view pixels.
    pub pan: Vec2,
    /// Target zoom.
    pub target_zoom: f64,
    /// Target pan.
    pub target_pan: Vec2,
    /// Lower zoom bound.
    pub min_zoom: f64,
    /// Upper zoom bound.
    pub max_zoom: f64,
}
