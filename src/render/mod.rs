//! Staff rendering: clear, draw the five lines and a clef, then the notes.
//!
//! The renderer never asks anyone how big it is. `resize` is handed the
//! new height and turns it into a [`StaffGeometry`]; drawing reads only
//! that geometry and the surface width.

pub mod surface;

use crate::{
    catalog::NoteDescriptor,
    config::StaffStyle,
    staff::{self, StaffGeometry, StemDirection},
};

pub use surface::{Color, DisplayList, DrawCommand, DrawingSurface, Font, FontFamily};

const CLEF: &str = "\u{1D11E}";
const SHARP: &str = "\u{266F}";

pub struct StaffRenderer {
    style: StaffStyle,
    geometry: StaffGeometry,
    /// Last scene drawn, redrawn after a resize
    target: Option<NoteDescriptor>,
    played: Vec<NoteDescriptor>,
}

impl StaffRenderer {
    pub fn new(style: StaffStyle) -> Self {
        Self {
            style,
            geometry: StaffGeometry::default(),
            target: None,
            played: Vec::new(),
        }
    }

    pub fn geometry(&self) -> &StaffGeometry {
        &self.geometry
    }

    pub fn style(&self) -> &StaffStyle {
        &self.style
    }

    /// Recompute the geometry for a surface `height` pixels tall and redraw
    /// the current scene.
    pub fn resize<S: DrawingSurface + ?Sized>(
        &mut self,
        height: f32,
        surface: &mut S,
    ) -> StaffGeometry {
        self.geometry = StaffGeometry::for_height(height, &self.style);
        self.redraw(surface);
        self.geometry
    }

    /// Draw `target` (centered, target colour) and `played` notes (offset to
    /// the right, played colour) on a fresh staff.
    pub fn render<S: DrawingSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        target: Option<&NoteDescriptor>,
        played: &[NoteDescriptor],
    ) {
        self.target = target.copied();
        self.played.clear();
        self.played.extend_from_slice(played);
        self.redraw(surface);
    }

    /// Draw the current scene again.
    pub fn redraw<S: DrawingSurface + ?Sized>(&self, surface: &mut S) {
        surface.clear();

        let (width, height) = surface.size();
        if width <= 0.0 || height <= 0.0 {
            return;
        }

        self.draw_staff(surface, width);
        self.draw_clef(surface);

        let center_x = width / 2.0;
        if let Some(target) = &self.target {
            self.draw_note(surface, target, center_x, self.style.target_color);
        }
        // Played notes all share one column
        for note in &self.played {
            self.draw_note(
                surface,
                note,
                center_x + self.style.played_offset,
                self.style.played_color,
            );
        }
    }

    fn draw_staff<S: DrawingSurface + ?Sized>(&self, surface: &mut S, width: f32) {
        let g = &self.geometry;
        surface.set_stroke(self.style.staff_color, self.style.staff_line_width);

        let (left, right) = (self.style.staff_margin, width - self.style.staff_margin);
        for line in 0..5 {
            let y = g.top_line_y() + line as f32 * g.line_spacing;
            surface.stroke_line((left, y), (right, y));
        }
    }

    fn draw_clef<S: DrawingSurface + ?Sized>(&self, surface: &mut S) {
        let g = &self.geometry;
        surface.set_fill(self.style.staff_color);
        surface.fill_text(
            CLEF,
            (self.style.clef_x, g.center_y + g.line_spacing),
            Font {
                size: g.line_spacing * self.style.clef_size,
                family: FontFamily::Serif,
            },
        );
    }

    fn draw_note<S: DrawingSurface + ?Sized>(
        &self,
        surface: &mut S,
        note: &NoteDescriptor,
        x: f32,
        color: Color,
    ) {
        let g = &self.geometry;
        let y = staff::vertical_offset(note, g);
        let r = g.note_radius;

        surface.set_fill(color);
        surface.set_stroke(color, 1.0);

        surface.fill_ellipse((x, y), (r * 1.2, r * 0.8), -0.2);

        let stem = g.line_spacing * self.style.stem_length;
        match staff::stem_direction(note) {
            StemDirection::Up => {
                let sx = x + r * 1.1;
                surface.stroke_line((sx, y), (sx, y - stem));
            }
            StemDirection::Down => {
                let sx = x - r * 1.1;
                surface.stroke_line((sx, y), (sx, y + stem));
            }
        }

        if note.is_sharp() {
            surface.fill_text(
                SHARP,
                (x - g.line_spacing * 1.5, y + g.line_spacing * 0.4),
                Font {
                    size: g.line_spacing * self.style.sharp_size,
                    family: FontFamily::SansSerif,
                },
            );
        }

        let half = self.style.ledger_half_width;
        let ledgers = staff::ledger_lines_below(note)
            .iter()
            .chain(staff::ledger_lines_above(note));
        for &index in ledgers {
            let ly = staff::y_for_index(index, g);
            surface.stroke_line((x - half, ly), (x + half, ly));
        }
    }
}

impl Default for StaffRenderer {
    fn default() -> Self {
        Self::new(StaffStyle::default())
    }
}
