use polyview_base::CellKind;

use crate::{PaintError, Result};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Self = Self::from_rgb(255, 255, 255);
    pub const BLACK: Self = Self::from_rgb(0, 0, 0);

    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn from_rgba_unmultiplied(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn from_u24(rgb: u32) -> Self {
        Self::from_rgb((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    pub fn from_hex(text: &str) -> Result<Self> {
        let digits = text.trim().trim_start_matches('#');
        let invalid = || PaintError::InvalidColor(text.to_string());
        if !digits.is_ascii() || !matches!(digits.len(), 6 | 8) {
            return Err(invalid());
        }
        let channel = |idx: usize| u8::from_str_radix(&digits[idx..idx + 2], 16).map_err(|_| invalid());
        let alpha = if digits.len() == 8 { channel(6)? } else { 255 };
        Ok(Self::from_rgba_unmultiplied(channel(0)?, channel(2)?, channel(4)?, alpha))
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Multiplies the RGB channels by `factor`, clamped to the channel range.
    pub fn scaled(self, factor: f32) -> Self {
        let channel = |value: u8| (f32::from(value) * factor).round().clamp(0.0, 255.0) as u8;
        Self {
            r: channel(self.r),
            g: channel(self.g),
            b: channel(self.b),
            a: self.a,
        }
    }

    pub fn opacity(self) -> f32 {
        f32::from(self.a) / 255.0
    }
}

/// Lightens (positive `percent`) or darkens (negative) every channel by
/// `round(2.55 * percent)`, clamped to `[0, 255]`.
pub fn shade(color: Color, percent: f32) -> Color {
    // Half-way values round toward positive infinity.
    let amount = (2.55 * f64::from(percent) + 0.5).floor() as i32;
    let channel = |value: u8| (i32::from(value) + amount).clamp(0, 255) as u8;
    Color {
        r: channel(color.r),
        g: channel(color.g),
        b: channel(color.b),
        a: color.a,
    }
}

pub const PIECE_PALETTE: [Color; 20] = [
    Color::from_u24(0xFF6666),
    Color::from_u24(0xFFCC66),
    Color::from_u24(0x99CC66),
    Color::from_u24(0x66CCCC),
    Color::from_u24(0x6699CC),
    Color::from_u24(0xCC99CC),
    Color::from_u24(0xFF99CC),
    Color::from_u24(0xCCCCCC),
    Color::from_u24(0x99CC99),
    Color::from_u24(0xCC6666),
    Color::from_u24(0x99CCCC),
    Color::from_u24(0xCC9966),
    Color::from_u24(0x66CC99),
    Color::from_u24(0x9966CC),
    Color::from_u24(0x9999CC),
    Color::from_u24(0xFF9966),
    Color::from_u24(0xFF6699),
    Color::from_u24(0x66FF99),
    Color::from_u24(0x99FFCC),
    Color::from_u24(0xFFCC99),
];

pub fn piece_color(index: usize) -> Color {
    PIECE_PALETTE[index % PIECE_PALETTE.len()]
}

pub const BACKGROUND_START: Color = Color::from_u24(0xF5F7FA);
pub const BACKGROUND_END: Color = Color::from_u24(0xE9ECEF);

/// Tones for cells that no piece owns, chosen by the cell's raw code.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpecialPalette {
    pub wall: Color,
    pub air: Color,
    pub unassigned: Color,
}

impl SpecialPalette {
    pub const ISOMETRIC: Self = Self {
        wall: Color::from_u24(0x333333),
        air: Color::from_u24(0xF0F0F0),
        unassigned: Color::from_u24(0xE0E0E0),
    };

    pub const FLAT: Self = Self {
        wall: Color::from_u24(0x555555),
        air: Color::from_u24(0xF0F0F0),
        unassigned: Color::from_u24(0xEEEEEE),
    };

    pub fn color_for(&self, kind: CellKind) -> Color {
        match kind {
            CellKind::Wall => self.wall,
            CellKind::Air => self.air,
            CellKind::Fillable => self.unassigned,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_darken_and_lighten_clamp() {
        let color = Color::from_u24(0x6699CC);
        assert_eq!(shade(color, -100.0), Color::from_rgb(0, 0, 0));
        assert_eq!(shade(color, 100.0), Color::from_rgb(255, 255, 255));
        for color in PIECE_PALETTE {
            assert_eq!(shade(color, -100.0), Color::BLACK);
            assert_eq!(shade(color, 100.0), Color::WHITE);
        }
    }

    #[test]
    fn shade_moves_channels_by_rounded_amount() {
        let color = Color::from_rgb(100, 150, 200);
        assert_eq!(shade(color, 10.0), Color::from_rgb(126, 176, 226));
        // -25.5 rounds up to -25
        assert_eq!(shade(color, -10.0), Color::from_rgb(75, 125, 175));
        assert_eq!(shade(color, 0.0), color);
    }

    #[test]
    fn shade_keeps_alpha() {
        let color = Color::from_rgba_unmultiplied(10, 20, 30, 128);
        assert_eq!(shade(color, 50.0).a, 128);
    }

    #[test]
    fn palette_cycles() {
        assert_eq!(piece_color(0), piece_color(20));
        assert_eq!(piece_color(7), piece_color(47));
        assert_ne!(piece_color(0), piece_color(1));
    }

    #[test]
    fn hex_roundtrip() -> Result<()> {
        let color = Color::from_hex("#FF6666")?;
        assert_eq!(color, Color::from_rgb(255, 102, 102));
        assert_eq!(color.to_hex(), "#ff6666");
        assert_eq!(Color::from_hex("00000080")?.a, 128);
        assert!(Color::from_hex("#12345").is_err());
        assert!(Color::from_hex("#zzzzzz").is_err());
        Ok(())
    }

    #[test]
    fn special_cells_follow_raw_code() {
        let palette = SpecialPalette::ISOMETRIC;
        assert_eq!(palette.color_for(CellKind::from_code(0)), palette.wall);
        assert_eq!(palette.color_for(CellKind::from_code(-1)), palette.air);
        assert_eq!(palette.color_for(CellKind::from_code(4)), palette.unassigned);
    }
}
