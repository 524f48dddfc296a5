//! 3x5 bitmap font, HUD panel, win banner and the F3 debug overlay.

use crate::app::{Banner, Color, HudState, LoopMetricsSnapshot};

use super::raster::{blend_pixel_clipped, draw_rect_outline, fill_rect};

const GLYPH_WIDTH: i32 = 3;
const GLYPH_HEIGHT: i32 = 5;
const HUD_TEXT_SCALE: i32 = 2;
const BANNER_TITLE_SCALE: i32 = 4;
const PANEL_MARGIN: i32 = 8;
const PANEL_INSET: i32 = 6;

const HUD_TEXT_COLOR: Color = [250, 246, 230, 255];
const HUD_PANEL_COLOR: Color = [12, 14, 28, 190];
const HUD_BORDER_COLOR: Color = [120, 110, 70, 255];
const BANNER_PANEL_COLOR: Color = [20, 16, 6, 220];
const BANNER_BORDER_COLOR: Color = [240, 200, 60, 255];
const BANNER_TITLE_COLOR: Color = [255, 220, 90, 255];
const OVERLAY_TEXT_COLOR: Color = [176, 220, 198, 255];
const OVERLAY_PANEL_COLOR: Color = [6, 10, 12, 200];

#[derive(Debug, Clone)]
pub(crate) struct OverlayData {
    pub metrics: LoopMetricsSnapshot,
    pub render_fps_cap: Option<u32>,
    pub entity_count: usize,
    pub tick_counter: u64,
}

const fn glyph_advance(scale: i32) -> i32 {
    (GLYPH_WIDTH + 1) * scale
}

const fn line_advance(scale: i32) -> i32 {
    (GLYPH_HEIGHT + 2) * scale
}

pub(crate) fn text_width_px(text: &str, scale: i32) -> i32 {
    let chars = text.chars().count() as i32;
    if chars == 0 {
        return 0;
    }
    chars * glyph_advance(scale) - scale
}

/// Top-left panel with one HUD line per row.
pub(crate) fn draw_hud(frame: &mut [u8], width: u32, height: u32, hud: &HudState) {
    if hud.lines.is_empty() {
        return;
    }
    let lines: Vec<&str> = hud.lines.iter().map(String::as_str).collect();
    draw_text_panel(
        frame,
        width,
        height,
        PANEL_MARGIN,
        PANEL_MARGIN,
        &lines,
        HUD_TEXT_SCALE,
        HUD_TEXT_COLOR,
        HUD_PANEL_COLOR,
        Some(HUD_BORDER_COLOR),
    );
}

pub(crate) fn draw_banner(frame: &mut [u8], width: u32, height: u32, banner: &Banner) {
    if width == 0 || height == 0 {
        return;
    }
    let title_width = text_width_px(&banner.title, BANNER_TITLE_SCALE);
    let subtitle_width = text_width_px(&banner.subtitle, HUD_TEXT_SCALE);
    let panel_width = title_width.max(subtitle_width) + PANEL_INSET * 4;
    let panel_height = line_advance(BANNER_TITLE_SCALE) + line_advance(HUD_TEXT_SCALE)
        + PANEL_INSET * 3;
    let panel_left = (width as i32 - panel_width) / 2;
    let panel_top = (height as i32 - panel_height) / 2;

    fill_rect(
        frame,
        width,
        height,
        panel_left,
        panel_top,
        panel_width,
        panel_height,
        BANNER_PANEL_COLOR,
    );
    draw_rect_outline(
        frame,
        width,
        height,
        panel_left,
        panel_top,
        panel_width,
        panel_height,
        BANNER_BORDER_COLOR,
    );

    let title_top = panel_top + PANEL_INSET * 2;
    draw_text_clipped(
        frame,
        width,
        height,
        (width as i32 - title_width) / 2,
        title_top,
        &banner.title,
        BANNER_TITLE_SCALE,
        BANNER_TITLE_COLOR,
    );
    draw_text_clipped(
        frame,
        width,
        height,
        (width as i32 - subtitle_width) / 2,
        title_top + line_advance(BANNER_TITLE_SCALE),
        &banner.subtitle,
        HUD_TEXT_SCALE,
        HUD_TEXT_COLOR,
    );
}

/// Bottom-left diagnostics panel.
pub(crate) fn draw_overlay(frame: &mut [u8], width: u32, height: u32, data: &OverlayData) {
    let lines = build_overlay_lines(data);
    let lines: Vec<&str> = lines.iter().map(String::as_str).collect();
    let panel_height = lines.len() as i32 * line_advance(HUD_TEXT_SCALE) + PANEL_INSET * 2;
    draw_text_panel(
        frame,
        width,
        height,
        PANEL_MARGIN,
        height as i32 - PANEL_MARGIN - panel_height,
        &lines,
        HUD_TEXT_SCALE,
        OVERLAY_TEXT_COLOR,
        OVERLAY_PANEL_COLOR,
        None,
    );
}

fn build_overlay_lines(data: &OverlayData) -> Vec<String> {
    let cap_text = match data.render_fps_cap {
        Some(value) => value.to_string(),
        None => "off".to_string(),
    };
    vec![
        format!("FPS: {:.0} (cap {})", data.metrics.fps, cap_text),
        format!("TPS: {:.1}", data.metrics.tps),
        format!("Frame: {:.2} ms", data.metrics.frame_time_ms),
        format!("Entities: {}", data.entity_count),
        format!("Tick: {}", data.tick_counter),
    ]
}

#[allow(clippy::too_many_arguments)]
fn draw_text_panel(
    frame: &mut [u8],
    width: u32,
    height: u32,
    left: i32,
    top: i32,
    lines: &[&str],
    scale: i32,
    text_color: Color,
    panel_color: Color,
    border_color: Option<Color>,
) {
    if width == 0 || height == 0 || lines.is_empty() {
        return;
    }
    let longest = lines
        .iter()
        .map(|line| text_width_px(line, scale))
        .max()
        .unwrap_or(0);
    let panel_width = longest + PANEL_INSET * 2;
    let panel_height = lines.len() as i32 * line_advance(scale) - 2 * scale + PANEL_INSET * 2;
    fill_rect(
        frame,
        width,
        height,
        left,
        top,
        panel_width,
        panel_height,
        panel_color,
    );
    if let Some(border) = border_color {
        draw_rect_outline(
            frame,
            width,
            height,
            left,
            top,
            panel_width,
            panel_height,
            border,
        );
    }

    let mut y = top + PANEL_INSET;
    for line in lines {
        draw_text_clipped(
            frame,
            width,
            height,
            left + PANEL_INSET,
            y,
            line,
            scale,
            text_color,
        );
        y += line_advance(scale);
    }
}

/// Lowercase letters render with the uppercase shapes; characters outside the table draw as blanks.
#[allow(clippy::too_many_arguments)]
pub(crate) fn draw_text_clipped(
    frame: &mut [u8],
    width: u32,
    height: u32,
    mut x: i32,
    y: i32,
    text: &str,
    scale: i32,
    color: Color,
) {
    if width == 0 || height == 0 || scale <= 0 {
        return;
    }
    for ch in text.chars() {
        if let Some(rows) = glyph_rows(ch) {
            draw_glyph_clipped(frame, width, height, x, y, rows, scale, color);
        }
        x += glyph_advance(scale);
    }
}

#[allow(clippy::too_many_arguments)]
fn draw_glyph_clipped(
    frame: &mut [u8],
    width: u32,
    height: u32,
    x: i32,
    y: i32,
    rows: [u8; GLYPH_HEIGHT as usize],
    scale: i32,
    color: Color,
) {
    for (row_index, row_bits) in rows.iter().enumerate() {
        let cell_top = y + row_index as i32 * scale;
        for col in 0..GLYPH_WIDTH {
            if row_bits & (1 << (GLYPH_WIDTH - 1 - col)) == 0 {
                continue;
            }
            let cell_left = x + col * scale;
            for sy in 0..scale {
                for sx in 0..scale {
                    let px = cell_left + sx;
                    let py = cell_top + sy;
                    if py < height as i32 {
                        blend_pixel_clipped(frame, width, px, py, color);
                    }
                }
            }
        }
    }
}

fn glyph_rows(ch: char) -> Option<[u8; 5]> {
    let rows = match ch.to_ascii_uppercase() {
        ' ' => return None,
        '0' => [7, 5, 5, 5, 7],
        '1' => [2, 6, 2, 2, 7],
        '2' => [7, 1, 7, 4, 7],
        '3' => [7, 1, 7, 1, 7],
        '4' => [5, 5, 7, 1, 1],
        '5' => [7, 4, 7, 1, 7],
        '6' => [7, 4, 7, 5, 7],
        '7' => [7, 1, 2, 2, 2],
        '8' => [7, 5, 7, 5, 7],
        '9' => [7, 5, 7, 1, 7],
        'A' => [2, 5, 7, 5, 5],
        'B' => [6, 5, 6, 5, 6],
        'C' => [7, 4, 4, 4, 7],
        'D' => [6, 5, 5, 5, 6],
        'E' => [7, 4, 6, 4, 7],
        'F' => [7, 4, 6, 4, 4],
        'G' => [7, 4, 5, 5, 7],
        'H' => [5, 5, 7, 5, 5],
        'I' => [7, 2, 2, 2, 7],
        'J' => [7, 1, 1, 5, 7],
        'K' => [5, 5, 6, 5, 5],
        'L' => [4, 4, 4, 4, 7],
        'M' => [5, 7, 7, 5, 5],
        'N' => [6, 5, 5, 5, 5],
        'O' => [2, 5, 5, 5, 2],
        'P' => [6, 5, 6, 4, 4],
        'Q' => [7, 5, 5, 7, 1],
        'R' => [6, 5, 6, 5, 5],
        'S' => [7, 4, 7, 1, 7],
        'T' => [7, 2, 2, 2, 2],
        'U' => [5, 5, 5, 5, 7],
        'V' => [5, 5, 5, 5, 2],
        'W' => [5, 5, 7, 7, 5],
        'X' => [5, 5, 2, 5, 5],
        'Y' => [5, 5, 2, 2, 2],
        'Z' => [7, 1, 2, 4, 7],
        '!' => [2, 2, 2, 0, 2],
        '?' => [7, 1, 3, 0, 2],
        '.' => [0, 0, 0, 0, 2],
        ',' => [0, 0, 0, 2, 4],
        ':' => [0, 2, 0, 2, 0],
        '\'' => [2, 2, 0, 0, 0],
        '-' => [0, 0, 7, 0, 0],
        '+' => [0, 2, 7, 2, 0],
        '/' => [1, 1, 2, 4, 4],
        '(' => [1, 2, 2, 2, 1],
        ')' => [4, 2, 2, 2, 4],
        '=' => [0, 7, 0, 7, 0],
        '%' => [5, 1, 2, 4, 5],
        _ => return None,
    };
    Some(rows)
}
