pub mod model;
pub mod view;

pub use model::{GeometryError, GlassGeometry, Point, State};
pub use view::draw;

// Glass footprint as fractions of the drawing surface.
pub const GLASS_WIDTH_FRACTION: f64 = 0.6;
pub const GLASS_HEIGHT_FRACTION: f64 = 0.8;
pub const WATER_MARGIN: f64 = 20.0; // closest the water center gets to a wall
pub const TILT_GAIN: f64 = 50.0; // screen offset per rad/s
pub const GLASS_STROKE_WIDTH: f64 = 8.0;
pub const WATER_RADIUS_DIVISOR: f64 = 6.0; // radius = glass width / this
