use super::model::{GeometryError, GlassGeometry, State};
use super::GLASS_STROKE_WIDTH;
use crate::gui::theme::ThemeColors;
use cairo::Context;
use std::f64::consts::PI;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DrawError {
    #[error(transparent)]
    Cairo(#[from] cairo::Error),
    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

/// Renders one frame: the glass outline and the water circle at the
/// position the latest sample maps to.
pub fn draw(
    cr: &Context,
    state: &State,
    colors: &ThemeColors,
    surface_width: f64,
    surface_height: f64,
) -> Result<(), DrawError> {
    let glass = GlassGeometry::from_surface(surface_width, surface_height)?;
    draw_glass(cr, &glass, colors)?;
    draw_water(cr, &glass, state, colors)?;
    Ok(())
}

fn draw_glass(
    cr: &Context,
    glass: &GlassGeometry,
    colors: &ThemeColors,
) -> Result<(), cairo::Error> {
    let (r, g, b, a) = colors.glass.into_components();
    cr.set_source_rgba(r, g, b, a);
    cr.rectangle(glass.left, glass.top, glass.width, glass.height);
    cr.set_line_width(GLASS_STROKE_WIDTH);
    cr.stroke()
}

fn draw_water(
    cr: &Context,
    glass: &GlassGeometry,
    state: &State,
    colors: &ThemeColors,
) -> Result<(), cairo::Error> {
    let center = glass.water_point(state.sample);
    let (r, g, b, a) = colors.water.into_components();
    cr.set_source_rgba(r, g, b, a);
    cr.arc(center.x, center.y, glass.water_radius(), 0.0, 2.0 * PI);
    cr.fill()
}
