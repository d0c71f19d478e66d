//! Draw pass. The play field is painted into a pixel buffer scaled to the
//! terminal, then blitted two pixels per cell with the upper half block.

use std::io::{self, Write};

use crossterm::{
    cursor, queue,
    style::{self, Color as CColor},
};

use crate::color::{BACKGROUND, GARAGE_DOOR, GRID, Rgb, SHADOW, TEXT, WHITE};
use crate::config::{GARAGE_COUNT, SCREEN_HEIGHT, SCREEN_WIDTH, SQUARE_SIZE};
use crate::game::Game;
use crate::geometry::{Rect, Vec2};
use crate::sprite::Sprite;

/// Row-major RGB pixels, two per terminal cell vertically.
pub struct PixelBuf {
    w: usize,
    h: usize,
    px: Vec<Rgb>,
}

fn ccolor(c: Rgb) -> CColor {
    CColor::Rgb {
        r: c.0,
        g: c.1,
        b: c.2,
    }
}

impl PixelBuf {
    pub fn new(w: usize, h: usize) -> Self {
        let mut buf = Self {
            w: 0,
            h: 0,
            px: Vec::new(),
        };
        buf.resize(w, h);
        buf
    }

    pub fn width(&self) -> usize {
        self.w
    }

    pub fn height(&self) -> usize {
        self.h
    }

    /// Contents are not preserved; the next draw repaints everything.
    pub fn resize(&mut self, w: usize, h: usize) {
        self.w = w;
        self.h = h;
        self.px.clear();
        self.px.resize(w * h, SHADOW);
    }

    pub fn clear(&mut self, c: Rgb) {
        self.px.fill(c);
    }

    /// Pixel span `[lo, lo + len)` clamped to `[0, max)`.
    fn clip(lo: i32, len: i32, max: usize) -> std::ops::Range<usize> {
        let max = max as i64;
        let lo = i64::from(lo);
        let a = lo.clamp(0, max) as usize;
        let b = (lo + i64::from(len)).clamp(0, max) as usize;
        a..b.max(a)
    }

    pub fn set(&mut self, x: i32, y: i32, c: Rgb) {
        self.fill_rect(x, y, 1, 1, c);
    }

    pub fn get(&self, x: usize, y: usize) -> Rgb {
        self.px[y * self.w + x]
    }

    /// Fill the part of the rectangle that lies inside the buffer.
    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, c: Rgb) {
        let cols = Self::clip(x, w, self.w);
        if cols.is_empty() {
            return;
        }
        for row in Self::clip(y, h, self.h) {
            let base = row * self.w;
            self.px[base + cols.start..base + cols.end].fill(c);
        }
    }

    pub fn stroke_rect(&mut self, x: i32, y: i32, w: i32, h: i32, c: Rgb) {
        if w <= 0 || h <= 0 {
            return;
        }
        self.fill_rect(x, y, w, 1, c);
        self.fill_rect(x, y + h - 1, w, 1, c);
        self.fill_rect(x, y, 1, h, c);
        self.fill_rect(x + w - 1, y, 1, h, c);
    }

    /// Blit to the terminal: the upper pixel of each cell is the foreground
    /// of `▀`, the lower one the background. Color changes are only queued
    /// when the color differs from the previous cell in the row.
    pub fn render(&self, out: &mut impl Write) -> io::Result<()> {
        queue!(out, cursor::MoveTo(0, 0))?;
        if self.w == 0 {
            return out.flush();
        }
        let rows = self.h / 2;
        for (row, pair) in self.px.chunks_exact(self.w * 2).take(rows).enumerate() {
            let (upper, lower) = pair.split_at(self.w);
            let mut fg = None;
            let mut bg = None;
            for (&top, &bot) in upper.iter().zip(lower) {
                if bg != Some(bot) {
                    queue!(out, style::SetBackgroundColor(ccolor(bot)))?;
                    bg = Some(bot);
                }
                if top == bot {
                    queue!(out, style::Print(' '))?;
                    continue;
                }
                if fg != Some(top) {
                    queue!(out, style::SetForegroundColor(ccolor(top)))?;
                    fg = Some(top);
                }
                queue!(out, style::Print('\u{2580}'))?;
            }
            if row + 1 < rows {
                queue!(out, style::ResetColor, style::Print("\r\n"))?;
            }
        }
        queue!(out, style::ResetColor)?;
        out.flush()
    }
}

/// 3x5 glyphs, row-major, for the characters the game prints.
#[rustfmt::skip]
fn glyph(ch: char) -> Option<[u8; 15]> {
    Some(match ch {
        '0' => [1,1,1, 1,0,1, 1,0,1, 1,0,1, 1,1,1],
        '1' => [0,1,0, 1,1,0, 0,1,0, 0,1,0, 1,1,1],
        '2' => [1,1,1, 0,0,1, 1,1,1, 1,0,0, 1,1,1],
        '3' => [1,1,1, 0,0,1, 0,1,1, 0,0,1, 1,1,1],
        '4' => [1,0,1, 1,0,1, 1,1,1, 0,0,1, 0,0,1],
        '5' => [1,1,1, 1,0,0, 1,1,1, 0,0,1, 1,1,1],
        '6' => [1,1,1, 1,0,0, 1,1,1, 1,0,1, 1,1,1],
        '7' => [1,1,1, 0,0,1, 0,1,0, 0,1,0, 0,1,0],
        '8' => [1,1,1, 1,0,1, 1,1,1, 1,0,1, 1,1,1],
        '9' => [1,1,1, 1,0,1, 1,1,1, 0,0,1, 1,1,1],
        'A' => [0,1,0, 1,0,1, 1,1,1, 1,0,1, 1,0,1],
        'C' => [0,1,1, 1,0,0, 1,0,0, 1,0,0, 0,1,1],
        'D' => [1,1,0, 1,0,1, 1,0,1, 1,0,1, 1,1,0],
        'E' => [1,1,1, 1,0,0, 1,1,0, 1,0,0, 1,1,1],
        'G' => [0,1,1, 1,0,0, 1,0,1, 1,0,1, 0,1,1],
        'M' => [1,0,1, 1,1,1, 1,1,1, 1,0,1, 1,0,1],
        'N' => [1,1,0, 1,0,1, 1,0,1, 1,0,1, 1,0,1],
        'O' => [0,1,0, 1,0,1, 1,0,1, 1,0,1, 0,1,0],
        'P' => [1,1,0, 1,0,1, 1,1,0, 1,0,0, 1,0,0],
        'R' => [1,1,0, 1,0,1, 1,1,0, 1,0,1, 1,0,1],
        'S' => [0,1,1, 1,0,0, 0,1,0, 0,0,1, 1,1,0],
        'T' => [1,1,1, 0,1,0, 0,1,0, 0,1,0, 0,1,0],
        'U' => [1,0,1, 1,0,1, 1,0,1, 1,0,1, 1,1,1],
        'V' => [1,0,1, 1,0,1, 1,0,1, 1,0,1, 0,1,0],
        _ => return None,
    })
}

/// Width in pixels of `text` at `scale`.
fn text_width(text: &str, scale: i32) -> i32 {
    (text.chars().count() as i32 * 4 - 1) * scale
}

/// `text` centered on `cx`, each font pixel drawn as a `scale`² block with
/// a drop shadow. Unknown characters render as blanks.
pub fn draw_text(buf: &mut PixelBuf, cx: i32, y: i32, text: &str, fg: Rgb, scale: i32) {
    let start_x = cx - text_width(text, scale) / 2;
    for (i, ch) in text.chars().enumerate() {
        let Some(bits) = glyph(ch) else { continue };
        let gx = start_x + i as i32 * 4 * scale;
        for row in 0..5 {
            for col in 0..3 {
                if bits[row * 3 + col] == 1 {
                    let px = gx + col as i32 * scale;
                    let py = y + row as i32 * scale;
                    buf.fill_rect(px + scale, py + scale, scale, scale, SHADOW);
                    buf.fill_rect(px, py, scale, scale, fg);
                }
            }
        }
    }
}

// ── World to pixel mapping ──────────────────────────────────────────────────

/// Fits the play field into the buffer, keeping its aspect ratio, centered.
#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    scale: f32,
    ox: i32,
    oy: i32,
}

impl Viewport {
    pub fn fit(pw: usize, ph: usize) -> Self {
        let scale = (pw as f32 / SCREEN_WIDTH).min(ph as f32 / SCREEN_HEIGHT);
        Self {
            scale,
            ox: ((pw as f32 - SCREEN_WIDTH * scale) / 2.0).round() as i32,
            oy: ((ph as f32 - SCREEN_HEIGHT * scale) / 2.0).round() as i32,
        }
    }

    pub fn point(&self, v: Vec2) -> (i32, i32) {
        (
            self.ox + (v.x * self.scale).round() as i32,
            self.oy + (v.y * self.scale).round() as i32,
        )
    }

    /// Edges are rounded, not sizes, so neighbouring squares tile exactly.
    pub fn rect(&self, r: Rect) -> (i32, i32, i32, i32) {
        let (x0, y0) = self.point(Vec2::new(r.x, r.y));
        let (x1, y1) = self.point(Vec2::new(r.x + r.w, r.y + r.h));
        (x0, y0, x1 - x0, y1 - y0)
    }
}

// ── Game drawing ────────────────────────────────────────────────────────────

pub struct Renderer {
    car: Sprite,
}

impl Renderer {
    pub fn new(car: Sprite) -> Self {
        Self { car }
    }

    /// Paints one frame of `game`. Reads state only.
    pub fn draw(&self, game: &Game, buf: &mut PixelBuf) {
        buf.clear(SHADOW);
        let view = Viewport::fit(buf.width(), buf.height());
        let text_scale = (buf.width() as i32 / 160).max(1);

        if game.is_game_over() {
            self.draw_game_over(game, buf, text_scale);
            return;
        }

        self.draw_field(buf, &view);
        self.draw_garages(game, buf, &view);
        self.draw_car(game, buf, &view);
        self.draw_score(game, buf, &view, text_scale);

        if game.is_paused() {
            let (cx, cy) = view.point(Vec2::new(SCREEN_WIDTH / 2.0, SCREEN_HEIGHT / 2.0));
            draw_text(buf, cx, cy - 2 * text_scale, "PAUSED", TEXT, text_scale * 2);
        }
    }

    fn draw_field(&self, buf: &mut PixelBuf, view: &Viewport) {
        let (x, y, w, h) = view.rect(Rect::new(
            Vec2::default(),
            Vec2::new(SCREEN_WIDTH, SCREEN_HEIGHT),
        ));
        buf.fill_rect(x, y, w, h, BACKGROUND);

        // Lane boundaries
        for i in 0..=GARAGE_COUNT {
            let (lx, ly) = view.point(Vec2::new(0.0, i as f32 * SQUARE_SIZE));
            let ly = ly.min(y + h - 1);
            buf.fill_rect(lx, ly, w, 1, GRID);
        }
    }

    fn draw_garages(&self, game: &Game, buf: &mut PixelBuf, view: &Viewport) {
        for garage in game.garages() {
            let (x, y, w, h) = view.rect(garage.rect());
            let c = garage.color.rgb();
            buf.fill_rect(x, y, w, h, c);
            buf.stroke_rect(x, y, w, h, c.darken());
            // Door opening facing the road
            let door = (h / 6).max(1);
            buf.fill_rect(x, y + door, 1, h - 2 * door, GARAGE_DOOR);
        }
    }

    fn draw_car(&self, game: &Game, buf: &mut PixelBuf, view: &Viewport) {
        let car = game.car();
        let (x, y, w, h) = view.rect(car.rect());
        self.car.draw(buf, x, y, w, h, car.color.rgb());
    }

    fn draw_score(&self, game: &Game, buf: &mut PixelBuf, view: &Viewport, scale: i32) {
        let (cx, _) = view.point(Vec2::new(SCREEN_WIDTH / 2.0, 0.0));
        let (_, top) = view.point(Vec2::default());
        draw_text(buf, cx, top + 2 * scale, &game.score().to_string(), WHITE, scale);
    }

    fn draw_game_over(&self, game: &Game, buf: &mut PixelBuf, scale: i32) {
        let cx = buf.width() as i32 / 2;
        let cy = buf.height() as i32 / 2;
        let line = 7 * scale;
        draw_text(buf, cx, cy - 2 * line, "GAME OVER", TEXT, scale * 2);
        draw_text(buf, cx, cy, &game.score().to_string(), WHITE, scale);
        draw_text(buf, cx, cy + line, "PRESS ENTER", TEXT, scale);
    }
}
