//! Pixel level preprocessing: thresholding and white margin removal.

use std::fmt::Display;

use image::{imageops, Rgb, RgbImage};
use serde::{Deserialize, Serialize};

pub const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

pub fn is_black(pixel: &Rgb<u8>) -> bool {
    *pixel == BLACK
}

pub fn is_white(pixel: &Rgb<u8>) -> bool {
    *pixel == WHITE
}

/// Maps a single channel value to 255 if it exceeds `threshold`, else to 0.
pub fn binarize_value(value: u8, threshold: u8) -> u8 {
    if value > threshold {
        255
    } else {
        0
    }
}

/// Thresholds every channel of every pixel independently.
///
/// Scan noise collapses to pure black or white, while strongly saturated
/// marker colors keep a mixed value such as `(255, 0, 0)`.
pub fn binarize(img: &RgbImage, threshold: u8) -> RgbImage {
    let mut out = img.clone();
    for pixel in out.pixels_mut() {
        for channel in pixel.0.iter_mut() {
            *channel = binarize_value(*channel, threshold);
        }
    }
    out
}

/// Number of all-white lines found inward from each edge of an image.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Border {
    pub top: u32,
    pub bottom: u32,
    pub left: u32,
    pub right: u32,
}

impl Border {
    pub fn is_empty(&self) -> bool {
        *self == Border::default()
    }
}

impl Display for Border {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "top={} bottom={} left={} right={}",
            self.top, self.bottom, self.left, self.right
        )
    }
}

/// Counts consecutive lines, starting at offset 0, for which `is_white_line` holds.
/// Stops at the first line that is not all white or after `length` lines.
fn count_white_lines(length: u32, is_white_line: impl Fn(u32) -> bool) -> u32 {
    let mut index = 0;
    while index < length && is_white_line(index) {
        index += 1;
    }
    index
}

/// Measures the white margin on each of the four edges of a binarized image.
pub fn find_white_border(img: &RgbImage) -> Border {
    let (width, height) = img.dimensions();

    let white_row = |y: u32| (0..width).all(|x| is_white(img.get_pixel(x, y)));
    let white_col = |x: u32| (0..height).all(|y| is_white(img.get_pixel(x, y)));

    Border {
        top: count_white_lines(height, |i| white_row(i)),
        bottom: count_white_lines(height, |i| white_row(height - 1 - i)),
        left: count_white_lines(width, |i| white_col(i)),
        right: count_white_lines(width, |i| white_col(width - 1 - i)),
    }
}

/// Removes the given margin. A margin that covers the whole image leaves an
/// empty image behind.
pub fn crop_border(img: &RgbImage, border: &Border) -> RgbImage {
    let (width, height) = img.dimensions();
    let cropped_width = width.saturating_sub(border.left.saturating_add(border.right));
    let cropped_height = height.saturating_sub(border.top.saturating_add(border.bottom));

    imageops::crop_imm(img, border.left, border.top, cropped_width, cropped_height).to_image()
}
