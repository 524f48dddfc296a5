//! Clipped software rasterization into an RGBA8 frame buffer.

use crate::app::Color;

pub(crate) fn fill_frame(frame: &mut [u8], color: Color) {
    for chunk in frame.chunks_exact_mut(4) {
        chunk.copy_from_slice(&color);
    }
}

pub(crate) fn blend_pixel_clipped(frame: &mut [u8], width: u32, x: i32, y: i32, color: Color) {
    if x < 0 || y < 0 || x >= width as i32 || color[3] == 0 {
        return;
    }
    let Some(pixel_offset) = (y as usize)
        .checked_mul(width as usize)
        .and_then(|row| row.checked_add(x as usize))
    else {
        return;
    };
    let Some(byte_offset) = pixel_offset.checked_mul(4) else {
        return;
    };
    let Some(pixel) = frame.get_mut(byte_offset..byte_offset + 4) else {
        return;
    };

    if color[3] == u8::MAX {
        pixel.copy_from_slice(&color);
        return;
    }
    let alpha = color[3] as u16;
    let inverse = u8::MAX as u16 - alpha;
    for channel in 0..3 {
        let blended = (color[channel] as u16 * alpha + pixel[channel] as u16 * inverse) / 255;
        pixel[channel] = blended as u8;
    }
    pixel[3] = u8::MAX;
}

fn fill_span(frame: &mut [u8], width: u32, height: u32, y: i32, x0: i32, x1: i32, color: Color) {
    if y < 0 || y >= height as i32 {
        return;
    }
    let start = x0.max(0);
    let end = x1.min(width as i32 - 1);
    for x in start..=end {
        blend_pixel_clipped(frame, width, x, y, color);
    }
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn fill_rect(
    frame: &mut [u8],
    width: u32,
    height: u32,
    left: i32,
    top: i32,
    rect_width: i32,
    rect_height: i32,
    color: Color,
) {
    if rect_width <= 0 || rect_height <= 0 {
        return;
    }
    for y in top..top + rect_height {
        fill_span(frame, width, height, y, left, left + rect_width - 1, color);
    }
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn draw_rect_outline(
    frame: &mut [u8],
    width: u32,
    height: u32,
    left: i32,
    top: i32,
    rect_width: i32,
    rect_height: i32,
    color: Color,
) {
    if rect_width <= 1 || rect_height <= 1 {
        return;
    }
    fill_rect(frame, width, height, left, top, rect_width, 1, color);
    fill_rect(
        frame,
        width,
        height,
        left,
        top + rect_height - 1,
        rect_width,
        1,
        color,
    );
    fill_rect(frame, width, height, left, top, 1, rect_height, color);
    fill_rect(
        frame,
        width,
        height,
        left + rect_width - 1,
        top,
        1,
        rect_height,
        color,
    );
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn fill_ellipse(
    frame: &mut [u8],
    width: u32,
    height: u32,
    center_x: f32,
    center_y: f32,
    radius_x: f32,
    radius_y: f32,
    color: Color,
) {
    if width == 0 || height == 0 {
        return;
    }
    if !(radius_x.is_finite() && radius_y.is_finite()) || radius_x <= 0.0 || radius_y <= 0.0 {
        return;
    }

    let top = (center_y - radius_y).floor() as i32;
    let bottom = (center_y + radius_y).ceil() as i32;
    for y in top.max(0)..=bottom.min(height as i32 - 1) {
        let dy = (y as f32 + 0.5 - center_y) / radius_y;
        if dy.abs() > 1.0 {
            continue;
        }
        let half_span = radius_x * (1.0 - dy * dy).sqrt();
        let x0 = (center_x - half_span).round() as i32;
        let x1 = (center_x + half_span).round() as i32 - 1;
        if x1 >= x0 {
            fill_span(frame, width, height, y, x0, x1, color);
        }
    }
}

pub(crate) fn fill_circle(
    frame: &mut [u8],
    width: u32,
    height: u32,
    center_x: f32,
    center_y: f32,
    radius: f32,
    color: Color,
) {
    fill_ellipse(
        frame, width, height, center_x, center_y, radius, radius, color,
    );
}
