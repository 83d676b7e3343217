use image::{DynamicImage, RgbImage};

/// Converts a decoded picture of any color type into the RGB pixel grid the
/// pipeline works on.
pub fn parse_img(img: &DynamicImage) -> RgbImage {
    img.to_rgb8()
}
