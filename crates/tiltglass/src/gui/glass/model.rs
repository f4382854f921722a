use crate::gui::glass::{
    GLASS_HEIGHT_FRACTION, GLASS_WIDTH_FRACTION, TILT_GAIN, WATER_MARGIN, WATER_RADIUS_DIVISOR,
};
use gyrio::TiltSample;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum GeometryError {
    #[error("{width:.0}x{height:.0} surface leaves no room for the water inside the glass")]
    SurfaceTooSmall { width: f64, height: f64 },
}

/// The fixed rectangle the water may move in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlassGeometry {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl GlassGeometry {
    /// Derives the glass from the surface extent: 60% of the width, 80%
    /// of the height, centered. Surfaces whose glass cannot hold the
    /// water margin on both axes are rejected, which keeps the clamp in
    /// [`Self::water_point`] well-ordered.
    pub fn from_surface(surface_width: f64, surface_height: f64) -> Result<Self, GeometryError> {
        let width = surface_width * GLASS_WIDTH_FRACTION;
        let height = surface_height * GLASS_HEIGHT_FRACTION;
        if width < 2.0 * WATER_MARGIN || height < 2.0 * WATER_MARGIN {
            return Err(GeometryError::SurfaceTooSmall {
                width: surface_width,
                height: surface_height,
            });
        }

        Ok(Self {
            left: (surface_width - width) / 2.0,
            top: (surface_height - height) / 2.0,
            width,
            height,
        })
    }

    pub fn center(&self) -> Point {
        Point::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    pub fn water_radius(&self) -> f64 {
        self.width / WATER_RADIUS_DIVISOR
    }

    /// Maps a sample to the water center. The sample axes are
    /// cross-applied: rotation about the device's x axis tips the glass
    /// forward and moves the water vertically, rotation about y moves it
    /// sideways. Screen y grows downward, so the vertical offset is
    /// subtracted.
    pub fn water_point(&self, sample: TiltSample) -> Point {
        let center = self.center();
        let offset_x = sample.y * TILT_GAIN;
        let offset_y = sample.x * TILT_GAIN;

        Point::new(
            (center.x + offset_x).clamp(
                self.left + WATER_MARGIN,
                self.left + self.width - WATER_MARGIN,
            ),
            (center.y - offset_y).clamp(
                self.top + WATER_MARGIN,
                self.top + self.height - WATER_MARGIN,
            ),
        )
    }
}

/// Latest sample plus whether the visualization screen is active.
pub struct State {
    pub sample: TiltSample,
    pub sampling: bool,
}

impl State {
    pub fn new() -> Self {
        Self {
            sample: TiltSample::default(),
            sampling: false,
        }
    }

    /// Entering the visualization screen.
    pub fn activate(&mut self) {
        self.sampling = true;
    }

    /// Leaving the visualization screen. The last sample is kept; only
    /// sampling stops.
    pub fn deactivate(&mut self) {
        self.sampling = false;
    }

    /// Stores `sample`, last-write-wins, and reports whether a redraw is
    /// needed. Samples arriving while inactive and non-finite samples
    /// leave the state untouched.
    pub fn apply_sample(&mut self, sample: TiltSample) -> bool {
        if !self.sampling || !sample.is_finite() {
            return false;
        }
        let changed = self.sample != sample;
        self.sample = sample;
        changed
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // A 200x200 surface yields the 120x160 glass at (40, 20).
    fn glass() -> GlassGeometry {
        GlassGeometry::from_surface(200.0, 200.0).unwrap()
    }

    #[test]
    fn test_surface_derivation() {
        let g = glass();
        assert_eq!(g.left, 40.0);
        assert_eq!(g.top, 20.0);
        assert_eq!(g.width, 120.0);
        assert_eq!(g.height, 160.0);
        assert_eq!(g.water_radius(), 20.0);
    }

    #[test]
    fn test_zero_sample_is_centered() {
        assert_eq!(
            glass().water_point(TiltSample::default()),
            Point::new(100.0, 100.0)
        );
    }

    #[test]
    fn test_water_point_stays_inside_margin() {
        let g = glass();
        let magnitudes = [0.0, 0.1, 1.0, 10.0, 1e6, f64::MAX];
        for &mx in &magnitudes {
            for &my in &magnitudes {
                for (sx, sy) in [(1.0, 1.0), (1.0, -1.0), (-1.0, 1.0), (-1.0, -1.0)] {
                    let p = g.water_point(TiltSample::new(mx * sx, my * sy));
                    assert!((60.0..=140.0).contains(&p.x), "x out of bounds: {:?}", p);
                    assert!((40.0..=160.0).contains(&p.y), "y out of bounds: {:?}", p);
                }
            }
        }
    }

    #[test]
    fn test_large_positive_y_clamps_right() {
        let p = glass().water_point(TiltSample::new(0.0, 100.0));
        assert_eq!(p.x, 140.0); // left + width - margin
        assert_eq!(p.y, 100.0);
    }

    #[test]
    fn test_large_positive_x_clamps_up() {
        // screen y is inverted, so a large positive x rotation hits the
        // low y bound
        let p = glass().water_point(TiltSample::new(100.0, 0.0));
        assert_eq!(p.x, 100.0);
        assert_eq!(p.y, 40.0); // top + margin
    }

    #[test]
    fn test_axes_are_cross_applied() {
        let g = glass();
        // the y component moves the water horizontally
        assert_eq!(
            g.water_point(TiltSample::new(0.0, 0.5)),
            Point::new(125.0, 100.0)
        );
        // the x component moves it vertically, inverted
        assert_eq!(
            g.water_point(TiltSample::new(0.5, 0.0)),
            Point::new(100.0, 75.0)
        );
    }

    #[test]
    fn test_water_point_is_pure() {
        let g = glass();
        let s = TiltSample::new(0.3, -0.7);
        assert_eq!(g.water_point(s), g.water_point(s));
    }

    #[test]
    fn test_degenerate_surfaces_rejected() {
        assert!(GlassGeometry::from_surface(50.0, 200.0).is_err()); // glass 30 wide
        assert!(GlassGeometry::from_surface(200.0, 40.0).is_err()); // glass 32 tall
        assert!(GlassGeometry::from_surface(0.0, 0.0).is_err());
        assert!(GlassGeometry::from_surface(67.0, 50.0).is_ok()); // 40.2x40 glass
    }

    #[test]
    fn test_inactive_state_ignores_samples() {
        let mut state = State::new();
        assert!(!state.apply_sample(TiltSample::new(1.0, 1.0)));
        assert_eq!(state.sample, TiltSample::default());

        state.activate();
        assert!(state.apply_sample(TiltSample::new(1.0, 1.0)));

        state.deactivate();
        assert!(!state.apply_sample(TiltSample::new(2.0, 2.0)));
        assert_eq!(state.sample, TiltSample::new(1.0, 1.0));
    }

    #[test]
    fn test_duplicate_and_non_finite_samples_skip_redraw() {
        let mut state = State::new();
        state.activate();
        assert!(state.apply_sample(TiltSample::new(0.5, 0.5)));
        assert!(!state.apply_sample(TiltSample::new(0.5, 0.5)));
        assert!(!state.apply_sample(TiltSample::new(f64::NAN, 0.0)));
        assert_eq!(state.sample, TiltSample::new(0.5, 0.5));
    }
}
