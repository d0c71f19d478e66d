//! The car texture. Drawn tinted with the car color, so a white body takes
//! on the palette color exactly.

use std::path::Path;

use tracing::{info, warn};

use crate::color::{Rgb, TIRE, WHITE, WINDOW};
use crate::error::{GameError, Result};
use crate::render::PixelBuf;

/// Alpha below this is treated as transparent.
const ALPHA_CUTOFF: u8 = 128;

#[rustfmt::skip]
const CAR_ART: [&str; 16] = [
    "................",
    "................",
    "................",
    "................",
    "....#######.....",
    "...##ww#ww##....",
    "..###ww#ww###...",
    ".##############.",
    "################",
    "################",
    "################",
    ".###oo#####oo##.",
    "....oo.....oo...",
    "................",
    "................",
    "................",
];

pub struct Sprite {
    w: usize,
    h: usize,
    px: Vec<Option<Rgb>>,
}

impl Sprite {
    /// Built-in car, used when no texture file is available.
    pub fn procedural() -> Self {
        let h = CAR_ART.len();
        let w = CAR_ART[0].len();
        let px = CAR_ART
            .iter()
            .flat_map(|row| row.bytes())
            .map(|b| match b {
                b'#' => Some(WHITE),
                b'w' => Some(WINDOW),
                b'o' => Some(TIRE),
                _ => None,
            })
            .collect();
        Self { w, h, px }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let img = image::open(path)
            .map_err(|e| GameError::asset(path, e))?
            .to_rgba8();
        let (w, h) = (img.width() as usize, img.height() as usize);
        if w == 0 || h == 0 {
            return Err(GameError::asset(path, "empty image"));
        }
        let px = img
            .pixels()
            .map(|p| {
                let [r, g, b, a] = p.0;
                (a >= ALPHA_CUTOFF).then_some(Rgb(r, g, b))
            })
            .collect();
        info!(path = %path.display(), w, h, "loaded car texture");
        Ok(Self { w, h, px })
    }

    /// Texture from `path`, or the built-in car if it cannot be loaded.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            info!(path = %path.display(), "no car texture, using built-in sprite");
            return Self::procedural();
        }
        Self::load(path).unwrap_or_else(|e| {
            warn!("{e}, using built-in sprite");
            Self::procedural()
        })
    }

    /// Nearest-neighbour scale into the `w`×`h` box at (`x`, `y`).
    pub fn draw(&self, buf: &mut PixelBuf, x: i32, y: i32, w: i32, h: i32, tint: Rgb) {
        if w <= 0 || h <= 0 {
            return;
        }
        for dy in 0..h {
            let sy = dy as usize * self.h / h as usize;
            for dx in 0..w {
                let sx = dx as usize * self.w / w as usize;
                if let Some(c) = self.px[sy * self.w + sx] {
                    buf.set(x + dx, y + dy, c.tint(tint));
                }
            }
        }
    }
}
