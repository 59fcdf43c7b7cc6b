//! The 2D drawing capability the staff renderer paints onto, plus a
//! recording implementation that front ends replay and tests inspect.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontFamily {
    Serif,
    SansSerif,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Font {
    pub size: f32,
    pub family: FontFamily,
}

/// (x, y) in pixels, y growing downward.
pub type Point = (f32, f32);

/// Immediate-mode 2D drawing.
pub trait DrawingSurface {
    /// Current (width, height) in pixels.
    fn size(&self) -> (f32, f32);

    /// Erase the whole surface.
    fn clear(&mut self);

    fn set_stroke(&mut self, color: Color, width: f32);

    fn set_fill(&mut self, color: Color);

    /// Stroke connected segments through `points` with the current stroke.
    fn stroke_path(&mut self, points: &[Point]);

    fn stroke_line(&mut self, from: Point, to: Point) {
        self.stroke_path(&[from, to]);
    }

    /// Fill an ellipse with the current fill, rotated by `rotation` radians.
    fn fill_ellipse(&mut self, center: Point, radii: (f32, f32), rotation: f32);

    /// Fill `text` with its baseline-left corner at `at`.
    fn fill_text(&mut self, text: &str, at: Point, font: Font);
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear,
    Path {
        points: Vec<Point>,
        color: Color,
        width: f32,
    },
    Ellipse {
        center: Point,
        radii: (f32, f32),
        rotation: f32,
        color: Color,
    },
    Text {
        text: String,
        at: Point,
        font: Font,
        color: Color,
    },
}

/// A surface that records what was drawn since the last clear.
#[derive(Debug, Clone)]
pub struct DisplayList {
    width: f32,
    height: f32,
    stroke: (Color, f32),
    fill: Color,
    commands: Vec<DrawCommand>,
}

impl DisplayList {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            stroke: (Color::BLACK, 1.0),
            fill: Color::BLACK,
            commands: Vec::new(),
        }
    }

    pub fn set_size(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn paths(&self) -> impl Iterator<Item = (&[Point], Color)> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Path { points, color, .. } => Some((points.as_slice(), *color)),
            _ => None,
        })
    }

    pub fn ellipses(&self) -> impl Iterator<Item = (Point, Color)> + '_ {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Ellipse { center, color, .. } => Some((*center, *color)),
            _ => None,
        })
    }

    pub fn texts(&self) -> impl Iterator<Item = (&str, Point)> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text { text, at, .. } => Some((text.as_str(), *at)),
            _ => None,
        })
    }
}

impl DrawingSurface for DisplayList {
    fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    fn clear(&mut self) {
        self.commands.clear();
        self.commands.push(DrawCommand::Clear);
    }

    fn set_stroke(&mut self, color: Color, width: f32) {
        self.stroke = (color, width);
    }

    fn set_fill(&mut self, color: Color) {
        self.fill = color;
    }

    fn stroke_path(&mut self, points: &[Point]) {
        if points.len() < 2 {
            return;
        }
        let (color, width) = self.stroke;
        self.commands.push(DrawCommand::Path {
            points: points.to_vec(),
            color,
            width,
        });
    }

    fn fill_ellipse(&mut self, center: Point, radii: (f32, f32), rotation: f32) {
        self.commands.push(DrawCommand::Ellipse {
            center,
            radii,
            rotation,
            color: self.fill,
        });
    }

    fn fill_text(&mut self, text: &str, at: Point, font: Font) {
        self.commands.push(DrawCommand::Text {
            text: text.to_owned(),
            at,
            font,
            color: self.fill,
        });
    }
}
