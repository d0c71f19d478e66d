#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Multiply blend, the way a tinted texture is drawn.
    pub const fn tint(self, by: Rgb) -> Rgb {
        Rgb(
            (self.0 as u16 * by.0 as u16 / 255) as u8,
            (self.1 as u16 * by.1 as u16 / 255) as u8,
            (self.2 as u16 * by.2 as u16 / 255) as u8,
        )
    }

    pub const fn darken(self) -> Rgb {
        Rgb(self.0 / 2, self.1 / 2, self.2 / 2)
    }
}

/// The five colors shared by the car and the garages.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PaletteColor {
    Red,
    Green,
    Blue,
    Yellow,
    Purple,
}

impl PaletteColor {
    /// Garage order, top lane first.
    pub const ALL: [PaletteColor; 5] = [
        PaletteColor::Red,
        PaletteColor::Green,
        PaletteColor::Blue,
        PaletteColor::Yellow,
        PaletteColor::Purple,
    ];

    pub const fn rgb(self) -> Rgb {
        match self {
            PaletteColor::Red => Rgb(230, 41, 55),
            PaletteColor::Green => Rgb(0, 228, 48),
            PaletteColor::Blue => Rgb(0, 121, 241),
            PaletteColor::Yellow => Rgb(253, 249, 0),
            PaletteColor::Purple => Rgb(200, 122, 255),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PaletteColor::Red => "red",
            PaletteColor::Green => "green",
            PaletteColor::Blue => "blue",
            PaletteColor::Yellow => "yellow",
            PaletteColor::Purple => "purple",
        }
    }
}

pub const BACKGROUND: Rgb = Rgb(80, 80, 80);
pub const GRID: Rgb = Rgb(245, 245, 245);
pub const TEXT: Rgb = Rgb(200, 200, 200);
pub const WHITE: Rgb = Rgb(255, 255, 255);
pub const SHADOW: Rgb = Rgb(30, 30, 30);
pub const TIRE: Rgb = Rgb(25, 25, 25);
pub const WINDOW: Rgb = Rgb(170, 215, 235);
pub const GARAGE_DOOR: Rgb = Rgb(60, 60, 60);
