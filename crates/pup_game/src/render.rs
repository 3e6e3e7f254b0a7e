use glam::{Affine2, Vec2};

pub type Color = [u8; 4];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpriteDraw {
    pub sheet: String,
    pub animation: String,
    pub frame: usize,
    pub position: Vec2,
    /// Point of the frame placed at `position`, in frame-relative 0..1.
    pub anchor: Vec2,
    pub flip_x: bool,
    /// Hue rotation in turns, 0 for none.
    pub hue: f32,
}

pub trait RenderSurface {
    fn set_transform(&mut self, transform: Affine2);
    fn fill_rect(&mut self, rect: Rect, color: Color);
    fn draw_sprite(&mut self, sprite: SpriteDraw);
    fn draw_text(&mut self, text: &str, position: Vec2, color: Color);

    fn debug_rect(&mut self, rect: Rect) {
        self.fill_rect(rect, [0xff, 0x00, 0xff, 0x40]);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Transform(Affine2),
    Rect { rect: Rect, color: Color },
    Sprite(SpriteDraw),
    Text { text: String, position: Vec2, color: Color },
}

#[derive(Debug, Default)]
pub struct CommandRecorder {
    pub commands: Vec<DrawCommand>,
}

impl CommandRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    #[cfg(test)]
    pub fn sprites(&self) -> impl Iterator<Item = &SpriteDraw> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Sprite(s) => Some(s),
            _ => None,
        })
    }

    #[cfg(test)]
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

impl RenderSurface for CommandRecorder {
    fn set_transform(&mut self, transform: Affine2) {
        self.commands.push(DrawCommand::Transform(transform));
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::Rect { rect, color });
    }

    fn draw_sprite(&mut self, sprite: SpriteDraw) {
        self.commands.push(DrawCommand::Sprite(sprite));
    }

    fn draw_text(&mut self, text: &str, position: Vec2, color: Color) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            position,
            color,
        });
    }
}
