/// Linear RGB color, tightly packed (12 bytes)
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(1.0, 1.0, 1.0);
    pub const GOLD: Rgb = Rgb::new(1.0, 0.8, 0.2);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` (leading `#` optional)
    pub fn from_hex(hex: &str) -> Option<Rgb> {
        let hex = hex.trim_start_matches('#');
        if hex.len() != 6 {
            return None;
        }
        let channel = |range: std::ops::Range<usize>| {
            hex.get(range)
                .and_then(|s| u8::from_str_radix(s, 16).ok())
                .map(|v| v as f32 / 255.0)
        };
        Some(Rgb::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    pub fn scale(self, factor: f32) -> Rgb {
        Rgb::new(self.r * factor, self.g * factor, self.b * factor)
    }

    pub fn lerp(self, other: Rgb, t: f32) -> Rgb {
        Rgb::new(
            self.r + (other.r - self.r) * t,
            self.g + (other.g - self.g) * t,
            self.b + (other.b - self.b) * t,
        )
    }

    /// Fully saturated color from a hue in [0, 1)
    pub fn from_hue(hue: f32) -> Rgb {
        let h = hue.rem_euclid(1.0) * 6.0;
        let x = 1.0 - ((h % 2.0) - 1.0).abs();
        match h as u32 {
            0 => Rgb::new(1.0, x, 0.0),
            1 => Rgb::new(x, 1.0, 0.0),
            2 => Rgb::new(0.0, 1.0, x),
            3 => Rgb::new(0.0, x, 1.0),
            4 => Rgb::new(x, 0.0, 1.0),
            _ => Rgb::new(1.0, 0.0, x),
        }
    }
}
