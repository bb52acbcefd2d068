/// Default palette and color type for the step indicator.

use rand::Rng;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn to_skia(self) -> tiny_skia::Color {
        tiny_skia::Color::from_rgba8(self.r, self.g, self.b, self.a)
    }

    pub fn blend(self, other: Color, t: f32) -> Color {
        let inv = 1.0 - t;
        Color {
            r: (self.r as f32 * inv + other.r as f32 * t) as u8,
            g: (self.g as f32 * inv + other.g as f32 * t) as u8,
            b: (self.b as f32 * inv + other.b as f32 * t) as u8,
            a: (self.a as f32 * inv + other.a as f32 * t) as u8,
        }
    }

    /// Opaque random color, used as the last-resort fallback paint.
    pub fn random() -> Color {
        let mut rng = rand::thread_rng();
        Color::rgb(rng.gen(), rng.gen(), rng.gen())
    }
}

// Circles and indicators
pub const CIRCLE: Color = Color::rgb(0x3F, 0xB9, 0x50);
pub const INDICATOR: Color = Color::rgb(0x3F, 0xB9, 0x50);

// Connector lines
pub const LINE_PENDING: Color = Color::rgb(0x48, 0x4F, 0x58);
pub const LINE_DONE: Color = Color::rgb(0x58, 0xA6, 0xFF);

// Text
pub const NUMBER_TEXT: Color = Color::rgb(0xE6, 0xED, 0xF3);
pub const LABEL_TEXT: Color = Color::rgb(0x8B, 0x94, 0x9E);

// Background used by the demo binary
pub const BG: Color = Color::rgb(0x0D, 0x11, 0x17);
