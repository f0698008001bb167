use minifb::{Key, Window, WindowOptions};
use ndarray::{Array1, Array2};
use tracing::debug;

use crate::error::{PlotError, PlotResult};
use crate::levels::LevelSet;
use crate::pipeline::PhasePortrait;

const MARGIN_LEFT: usize = 56;
const MARGIN_RIGHT: usize = 16;
const MARGIN_TOP: usize = 28;
const MARGIN_BOTTOM: usize = 40;
const GAP: usize = 48;
const FONT_SCALE: usize = 2;

pub const BACKGROUND: u32 = 0xFFFFFF;
const INK: u32 = 0x202020;
const FRAME: u32 = 0x808080;

/// Magnitude colors follow `t^MAGNITUDE_GAMMA` to compress the dynamic range.
pub const MAGNITUDE_GAMMA: f64 = 0.5;

/// Consumes a computed portrait and shows it somewhere.
pub trait RenderAdapter {
    fn render(&mut self, portrait: &PhasePortrait) -> PlotResult<()>;
}

/// 0RGB frame buffer, row-major, top row first.
#[derive(Clone, Debug)]
pub struct Frame {
    pub width: usize,
    pub height: usize,
    pub buffer: Vec<u32>,
}

impl Frame {
    fn new(width: usize, height: usize) -> Self {
        Frame { width, height, buffer: vec![BACKGROUND; width * height] }
    }

    pub fn pixel(&self, x: usize, y: usize) -> u32 {
        self.buffer[y * self.width + x]
    }

    fn put(&mut self, x: usize, y: usize, color: u32) {
        if x < self.width && y < self.height {
            self.buffer[y * self.width + x] = color;
        }
    }
}

/// Top-left corner of the left (argument) and right (magnitude) panels.
pub fn panel_origins(panel: usize) -> [(usize, usize); 2] {
    [(MARGIN_LEFT, MARGIN_TOP), (MARGIN_LEFT + panel + GAP, MARGIN_TOP)]
}

pub fn frame_size(panel: usize) -> (usize, usize) {
    (
        MARGIN_LEFT + 2 * panel + GAP + MARGIN_RIGHT,
        MARGIN_TOP + panel + MARGIN_BOTTOM,
    )
}

// 3x5 pixel font, only the glyphs the labels use
fn glyph(ch: char) -> [u8; 5] {
    match ch {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        'a' => [0b111, 0b101, 0b111, 0b101, 0b101],
        'e' => [0b111, 0b100, 0b111, 0b100, 0b111],
        'f' => [0b111, 0b100, 0b111, 0b100, 0b100],
        'g' => [0b111, 0b100, 0b101, 0b101, 0b111],
        'i' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'm' => [0b101, 0b111, 0b111, 0b101, 0b101],
        'r' => [0b110, 0b101, 0b110, 0b101, 0b101],
        'z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '(' => [0b001, 0b010, 0b010, 0b010, 0b001],
        ')' => [0b100, 0b010, 0b010, 0b010, 0b100],
        '|' => [0b010, 0b010, 0b010, 0b010, 0b010],
        _ => [0; 5],
    }
}

fn draw_char(frame: &mut Frame, x: usize, y: usize, ch: char, color: u32) {
    for (dy, row) in glyph(ch).iter().enumerate() {
        for dx in 0..3 {
            if row & (1 << (2 - dx)) == 0 {
                continue;
            }
            for sy in 0..FONT_SCALE {
                for sx in 0..FONT_SCALE {
                    frame.put(x + dx * FONT_SCALE + sx, y + dy * FONT_SCALE + sy, color);
                }
            }
        }
    }
}

fn text_width(text: &str) -> usize {
    text.chars().count() * 4 * FONT_SCALE
}

fn draw_text(frame: &mut Frame, x: usize, y: usize, text: &str, color: u32) {
    let mut offset_x = x;
    for ch in text.chars() {
        draw_char(frame, offset_x, y, ch, color);
        offset_x += 4 * FONT_SCALE;
    }
}

fn hsv_to_rgb(h: f64, s: f64, v: f64) -> u32 {
    let h6 = (h.rem_euclid(1.0)) * 6.0;
    let sector = h6.floor();
    let f = h6 - sector;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));
    let (r, g, b) = match sector as u32 {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };
    pack(r, g, b)
}

fn pack(r: f64, g: f64, b: f64) -> u32 {
    let c = |x: f64| (x.clamp(0.0, 1.0) * 255.0).round() as u32;
    (c(r) << 16) | (c(g) << 8) | c(b)
}

/// Cyclic hue wheel, `t` and `t + 1` give the same color.
pub fn phase_color(t: f64) -> u32 {
    hsv_to_rgb(t, 0.85, 0.95)
}

const RAMP: [(f64, f64, f64); 5] = [
    (0.267, 0.005, 0.329),
    (0.231, 0.322, 0.545),
    (0.129, 0.569, 0.549),
    (0.369, 0.788, 0.384),
    (0.992, 0.906, 0.145),
];

/// Dark-to-bright perceptual ramp over `t ∈ [0, 1]`.
pub fn magnitude_color(t: f64) -> u32 {
    let t = t.clamp(0.0, 1.0) * (RAMP.len() - 1) as f64;
    let k = (t.floor() as usize).min(RAMP.len() - 2);
    let f = t - k as f64;
    let (a, b) = (RAMP[k], RAMP[k + 1]);
    pack(a.0 + (b.0 - a.0) * f, a.1 + (b.1 - a.1) * f, a.2 + (b.2 - a.2) * f)
}

fn normalized(levels: &LevelSet, value: f64) -> f64 {
    match (levels.min(), levels.max()) {
        (Some(lo), Some(hi)) if hi > lo && hi.is_finite() && lo.is_finite() => (value - lo) / (hi - lo),
        _ => 0.0,
    }
}

// nearest sample for pixel p of a panel `pixels` wide
fn sample_index(p: usize, pixels: usize, samples: usize) -> usize {
    if pixels <= 1 || samples <= 1 {
        return 0;
    }
    ((p * (samples - 1)) as f64 / (pixels - 1) as f64).round() as usize
}

fn fill_panel<M>(frame: &mut Frame, origin: (usize, usize), panel: usize, field: &Array2<f64>, levels: &LevelSet, color_of: M)
where
    M: Fn(f64) -> u32,
{
    let (rows, cols) = field.dim();
    // one color per band, colored by its midpoint
    let palette: Vec<u32> = (0..levels.bands())
        .map(|k| color_of(normalized(levels, levels.band_center(k))))
        .collect();

    for py in 0..panel {
        // imaginary axis grows upward
        let i = sample_index(panel - 1 - py, panel, rows);
        for px in 0..panel {
            let j = sample_index(px, panel, cols);
            if let Some(band) = levels.band_of(field[[i, j]]) {
                frame.put(origin.0 + px, origin.1 + py, palette[band]);
            }
        }
    }

    for k in 0..panel {
        frame.put(origin.0 + k, origin.1, FRAME);
        frame.put(origin.0 + k, origin.1 + panel - 1, FRAME);
        frame.put(origin.0, origin.1 + k, FRAME);
        frame.put(origin.0 + panel - 1, origin.1 + k, FRAME);
    }
}

fn axis_ends(axis: &Array1<f64>) -> (String, String) {
    let lo = axis.iter().next().copied().unwrap_or(0.0);
    let hi = axis.iter().last().copied().unwrap_or(0.0);
    (format!("{:.1}", lo), format!("{:.1}", hi))
}

fn label_panel(frame: &mut Frame, origin: (usize, usize), panel: usize, portrait: &PhasePortrait, title: &str, y_label: bool) {
    let (x0, y0) = origin;
    let glyph_h = 5 * FONT_SCALE;

    draw_text(frame, x0 + panel.saturating_sub(text_width(title)) / 2, y0.saturating_sub(glyph_h + 8), title, INK);

    let (re_lo, re_hi) = axis_ends(&portrait.re_axis);
    let below = y0 + panel + 4;
    draw_text(frame, x0, below, &re_lo, INK);
    draw_text(frame, (x0 + panel).saturating_sub(text_width(&re_hi)), below, &re_hi, INK);
    draw_text(frame, x0 + panel.saturating_sub(text_width("re")) / 2, below + glyph_h + 6, "re", INK);

    if y_label {
        let (im_lo, im_hi) = axis_ends(&portrait.im_axis);
        draw_text(frame, x0.saturating_sub(text_width(&im_hi) + 4), y0, &im_hi, INK);
        draw_text(frame, x0.saturating_sub(text_width(&im_lo) + 4), y0 + panel - glyph_h, &im_lo, INK);
        draw_text(frame, x0.saturating_sub(text_width("im") + 4), y0 + (panel - glyph_h) / 2, "im", INK);
    }
}

/// Paints both filled-contour panels into a fresh frame buffer.
pub fn rasterize(portrait: &PhasePortrait, panel: usize) -> PlotResult<Frame> {
    if panel < 2 * 5 * FONT_SCALE {
        return Err(PlotError::invalid(format!("panel of {} pixels is too small", panel)));
    }
    let (width, height) = frame_size(panel);
    let mut frame = Frame::new(width, height);
    let [left, right] = panel_origins(panel);

    let arg_levels = portrait.argument_levels();
    let mag_levels = portrait.magnitude_levels();
    debug!(bands = arg_levels.bands(), width, height, "rasterizing panels");

    fill_panel(&mut frame, left, panel, &portrait.polar.argument, &arg_levels, phase_color);
    fill_panel(&mut frame, right, panel, &portrait.polar.magnitude, &mag_levels, |t| {
        magnitude_color(t.max(0.0).powf(MAGNITUDE_GAMMA))
    });

    label_panel(&mut frame, left, panel, portrait, "arg(f(z))", true);
    label_panel(&mut frame, right, panel, portrait, "|f(z)|", false);

    Ok(frame)
}

/// Blocks in a minifb window until it is closed or Escape is pressed.
pub struct WindowRenderer {
    pub title: String,
    pub panel: usize,
}

impl WindowRenderer {
    pub fn new(panel: usize) -> Self {
        WindowRenderer { title: "phase portrait".to_string(), panel }
    }
}

impl RenderAdapter for WindowRenderer {
    fn render(&mut self, portrait: &PhasePortrait) -> PlotResult<()> {
        let frame = rasterize(portrait, self.panel)?;

        let mut window = Window::new(&self.title, frame.width, frame.height, WindowOptions::default())?;
        window.set_target_fps(30);

        while window.is_open() && !window.is_key_down(Key::Escape) {
            window.update_with_buffer(&frame.buffer, frame.width, frame.height)?;
        }
        Ok(())
    }
}
