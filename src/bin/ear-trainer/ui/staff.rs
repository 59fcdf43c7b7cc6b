//! Replays the staff renderer's display list onto a ratatui canvas.
//!
//! The renderer works in pixels with y growing down; the canvas works in
//! its own units with y growing up. One terminal cell is treated as
//! `PX_PER_COL` x `PX_PER_ROW` pixels, roughly the shape of a glyph.

use ratatui::{
    layout::Rect,
    style::Color,
    text::Line as TextLine,
    widgets::{
        canvas::{Canvas, Context, Line, Points},
        Block, Borders,
    },
    Frame,
};

use ear_trainer::render::{self, DisplayList, DrawCommand, DrawingSurface};

pub const PX_PER_COL: f32 = 8.0;
pub const PX_PER_ROW: f32 = 16.0;

/// Surface size in pixels for a canvas occupying `area` (inside its border).
pub fn surface_size(area: Rect) -> (f32, f32) {
    let inner = Block::default().borders(Borders::ALL).inner(area);
    (
        inner.width as f32 * PX_PER_COL,
        inner.height as f32 * PX_PER_ROW,
    )
}

pub fn render_staff(frame: &mut Frame, area: Rect, list: &DisplayList) {
    let (width, height) = list.size();
    let canvas = Canvas::default()
        .block(Block::default().title(" Staff ").borders(Borders::ALL))
        .marker(ratatui::symbols::Marker::Braille)
        .x_bounds([0.0, width as f64])
        .y_bounds([0.0, height as f64])
        .paint(|ctx| {
            for command in list.commands() {
                paint(ctx, command, height);
            }
        });

    frame.render_widget(canvas, area);
}

fn paint(ctx: &mut Context, command: &DrawCommand, height: f32) {
    let flip = |(x, y): (f32, f32)| (x as f64, (height - y) as f64);

    match command {
        DrawCommand::Clear => {}
        DrawCommand::Path { points, color, .. } => {
            for segment in points.windows(2) {
                let (x1, y1) = flip(segment[0]);
                let (x2, y2) = flip(segment[1]);
                ctx.draw(&Line::new(x1, y1, x2, y2, ink(*color)));
            }
        }
        DrawCommand::Ellipse {
            center,
            radii,
            rotation,
            color,
        } => {
            let coords: Vec<(f64, f64)> = ellipse_fill(*center, *radii, *rotation)
                .into_iter()
                .map(flip)
                .collect();
            ctx.draw(&Points {
                coords: &coords,
                color: ink(*color),
            });
        }
        DrawCommand::Text { text, at, color, .. } => {
            let (x, y) = flip(*at);
            let line = TextLine::styled(text.clone(), ink(*color));
            ctx.print(x, y, line);
        }
    }
}

/// Pixel centers inside a rotated ellipse.
fn ellipse_fill(center: (f32, f32), radii: (f32, f32), rotation: f32) -> Vec<(f32, f32)> {
    let (cx, cy) = center;
    let (rx, ry) = radii;
    if rx <= 0.0 || ry <= 0.0 {
        return Vec::new();
    }
    let (sin, cos) = rotation.sin_cos();
    let reach = rx.max(ry).ceil() as i32;

    let mut points = Vec::new();
    for dy in -reach..=reach {
        for dx in -reach..=reach {
            let (x, y) = (dx as f32, dy as f32);
            // Rotate back into the ellipse's own frame
            let u = x * cos + y * sin;
            let v = -x * sin + y * cos;
            if (u / rx).powi(2) + (v / ry).powi(2) <= 1.0 {
                points.push((cx + x, cy + y));
            }
        }
    }
    points
}

/// Paper-black becomes the terminal's foreground.
fn ink(color: render::Color) -> Color {
    if color == render::Color::BLACK {
        Color::Reset
    } else {
        Color::Rgb(color.r, color.g, color.b)
    }
}
