#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::config::StaffStyle;

/// Vertical metrics of the staff for one surface size.
///
/// Recomputed whenever the surface is resized; nothing else holds on to
/// the old values.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaffGeometry {
    /// Y of the middle staff line (B4)
    pub center_y: f32,
    /// Distance between adjacent staff lines
    pub line_spacing: f32,
    pub note_radius: f32,
}

impl StaffGeometry {
    /// Geometry for a surface `height` pixels tall.
    ///
    /// Spacing scales with the height but never drops below the style's
    /// minimum, so very short surfaces clip the staff rather than squash it.
    pub fn for_height(height: f32, style: &StaffStyle) -> Self {
        let line_spacing = (height / style.spacing_divisor).max(style.min_line_spacing);
        Self {
            center_y: height / 2.0,
            line_spacing,
            note_radius: line_spacing * style.note_radius_factor,
        }
    }

    /// Half a line spacing: the distance between a line and the next space.
    pub fn step(&self) -> f32 {
        self.line_spacing / 2.0
    }

    /// Y of the top staff line (F5).
    pub fn top_line_y(&self) -> f32 {
        self.center_y - 2.0 * self.line_spacing
    }
}

impl Default for StaffGeometry {
    fn default() -> Self {
        Self::for_height(0.0, &StaffStyle::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tall_surface_scales_spacing() {
        let geometry = StaffGeometry::for_height(600.0, &StaffStyle::default());
        assert_eq!(geometry.center_y, 300.0);
        assert_eq!(geometry.line_spacing, 40.0);
        assert!((geometry.note_radius - 18.0).abs() < 1e-4);
        assert_eq!(geometry.top_line_y(), 220.0);
    }

    #[test]
    fn short_surface_keeps_minimum_spacing() {
        let geometry = StaffGeometry::for_height(90.0, &StaffStyle::default());
        assert_eq!(geometry.line_spacing, 14.0);
        assert_eq!(geometry.center_y, 45.0);
        assert_eq!(geometry.step(), 7.0);
    }
}
