/*
Staff Coordinates
=================

Maps catalog notes onto a treble staff. Everything is derived from one
integer, the diatonic index: steps along C D E F G A B counted from C4.

  index = (octave - 4) * 7 + letter position      (C = 0 ... B = 6)

Accidentals are ignored, so C#4 shares C4's slot and gets a sharp sign.

  index   note   staff
   14     C6     ── ledger ──
   13     B5
   12     A5     ── ledger ──
   11     G5
   10     F5     ━━━━━━━━━━━━  top line
    9     E5
    8     D5     ━━━━━━━━━━━━
    7     C5
    6     B4     ━━━━━━━━━━━━  center line (center_y)
    5     A4
    4     G4     ━━━━━━━━━━━━
    3     F4
    2     E4     ━━━━━━━━━━━━  bottom line
    1     D4
    0     C4     ── ledger ──

Each index step is half a line spacing, so lines and spaces alternate:

  y = center_y - (index - 6) * line_spacing / 2

Screen y grows downward; higher notes get smaller y.

Stems go down from the center line up, and up below it, keeping them on
the side away from the rest of the staff.
*/

pub mod geometry;

pub use geometry::StaffGeometry;

use crate::catalog::NoteDescriptor;

/// Diatonic index of the middle staff line (B4).
pub const CENTER_INDEX: i32 = 6;

/// Diatonic indices of the five staff lines, bottom (E4) to top (F5).
pub const STAFF_LINES: [i32; 5] = [2, 4, 6, 8, 10];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StemDirection {
    Up,
    Down,
}

pub fn diatonic_index(note: &NoteDescriptor) -> i32 {
    (note.octave - 4) * 7 + note.letter.scale_index()
}

/// Y of a note head's center.
pub fn vertical_offset(note: &NoteDescriptor, geometry: &StaffGeometry) -> f32 {
    y_for_index(diatonic_index(note), geometry)
}

/// Y of any diatonic index; used for ledger lines as well as note heads.
pub fn y_for_index(index: i32, geometry: &StaffGeometry) -> f32 {
    geometry.center_y - (index - CENTER_INDEX) as f32 * geometry.step()
}

/// Ledger lines needed above the staff: A5's line from A5 up, C6's from C6 up.
pub fn ledger_lines_above(note: &NoteDescriptor) -> &'static [i32] {
    match diatonic_index(note) {
        i if i >= 14 => &[12, 14],
        i if i >= 12 => &[12],
        _ => &[],
    }
}

/// Ledger lines needed below the staff: C4's line for C4 and anything lower.
pub fn ledger_lines_below(note: &NoteDescriptor) -> &'static [i32] {
    if diatonic_index(note) <= 0 {
        &[0]
    } else {
        &[]
    }
}

pub fn stem_direction(note: &NoteDescriptor) -> StemDirection {
    if diatonic_index(note) >= CENTER_INDEX {
        StemDirection::Down
    } else {
        StemDirection::Up
    }
}
