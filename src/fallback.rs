//! Synthetic placeholder shown whenever no real slice can be produced.

use font8x8::legacy::BASIC_LEGACY;
use image::{Rgba, RgbaImage};

use crate::enums::Orientation;
use crate::slice_image::SliceImage;

pub const PLACEHOLDER_SIZE: u32 = 256;

/// Reason shown while no volume has been supplied yet.
pub const WAITING_REASON: &str = "Placeholder - waiting for NIfTI data";

const GLYPH_SIZE: u32 = 8;
const MAX_COLUMNS: usize = (PLACEHOLDER_SIZE / GLYPH_SIZE) as usize;
const MAX_REASON_LINES: usize = 3;

const BACKGROUND: Rgba<u8> = Rgba([0, 0, 0, 255]);
const TITLE_COLOR: Rgba<u8> = Rgba([255, 255, 255, 255]);
const REASON_COLOR: Rgba<u8> = Rgba([255, 255, 0, 255]);

const INNER_RADIUS: f32 = 10.0;
const TITLE_TOP: u32 = 12;
const REASON_TOP: u32 = PLACEHOLDER_SIZE - 48;
const LINE_SPACING: u32 = 14;

/// Draw a 256x256 radial gradient labelled with the plane, slice position
/// and `reason`.
///
/// The outer radius varies with `slice_index` so stepping through the
/// placeholder still shows motion.
pub fn render_placeholder(
    slice_index: usize,
    slice_count: usize,
    orientation: Orientation,
    reason: &str,
) -> SliceImage {
    let center = PLACEHOLDER_SIZE as f32 / 2.0;
    let outer_radius = 80.0 + (slice_index % 30) as f32;

    let mut image = RgbaImage::from_fn(PLACEHOLDER_SIZE, PLACEHOLDER_SIZE, |x, y| {
        let dx = x as f32 + 0.5 - center;
        let dy = y as f32 + 0.5 - center;
        let distance = (dx * dx + dy * dy).sqrt();
        if distance > outer_radius {
            return BACKGROUND;
        }
        let t = ((distance - INNER_RADIUS) / (outer_radius - INNER_RADIUS)).clamp(0.0, 1.0);
        let g = ((1.0 - t) * 255.0).round() as u8;
        Rgba([g, g, g, 255])
    });

    let title = format!(
        "{orientation} view - slice {}/{slice_count}",
        slice_index.saturating_add(1)
    );
    draw_text_centered(&mut image, &title, TITLE_TOP, TITLE_COLOR);

    for (row, line) in reason_lines(reason).iter().enumerate() {
        let top = REASON_TOP + row as u32 * LINE_SPACING;
        draw_text_centered(&mut image, line, top, REASON_COLOR);
    }

    SliceImage::from(image)
}

/// Split `reason` on sentence breaks into at most three lines that fit the width.
fn reason_lines(reason: &str) -> Vec<String> {
    reason
        .split(". ")
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .take(MAX_REASON_LINES)
        .map(|line| line.chars().take(MAX_COLUMNS).collect())
        .collect()
}

fn draw_text_centered(image: &mut RgbaImage, text: &str, top: u32, color: Rgba<u8>) {
    let columns = text.chars().take(MAX_COLUMNS).count() as u32;
    let left = image.width().saturating_sub(columns * GLYPH_SIZE) / 2;

    for (column, ch) in text.chars().take(MAX_COLUMNS).enumerate() {
        let glyph_left = left + column as u32 * GLYPH_SIZE;
        for (row, bits) in glyph_for_char(ch).iter().enumerate() {
            let y = top + row as u32;
            for bit in 0..GLYPH_SIZE {
                if (bits >> bit) & 0x01 == 0 {
                    continue;
                }
                let x = glyph_left + bit;
                if x < image.width() && y < image.height() {
                    image.put_pixel(x, y, color);
                }
            }
        }
    }
}

fn glyph_for_char(ch: char) -> [u8; 8] {
    let index = ch as usize;
    if index < BASIC_LEGACY.len() {
        BASIC_LEGACY[index]
    } else {
        BASIC_LEGACY[b'?' as usize]
    }
}
