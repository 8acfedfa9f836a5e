use std::collections::HashMap;

use image::DynamicImage;

use crate::models::{ColorName, Rgb};

// Dominant-color extraction constants, v1. These are fixed for
// reproducibility; changing any of them changes every stored color name.
const SAMPLE_GRID: u32 = 10;
/// Pixels more transparent than this are ignored
const ALPHA_FLOOR: u8 = 32;
/// Pixels darker than this luminance fraction are ignored
const LUMINANCE_FLOOR: f32 = 0.05;
/// Coarse RGB quantization step
const QUANT_STEP: u8 = 16;

// Color-name cascade thresholds
const LOW_SATURATION: f32 = 0.15;
const NEAR_BLACK_VALUE: f32 = 0.12;
const BLACK_VALUE: f32 = 0.15;
const WHITE_VALUE: f32 = 0.85;
const LIGHT_GRAY_VALUE: f32 = 0.70;
const DARK_GRAY_VALUE: f32 = 0.30;
const BROWN_MAX_VALUE: f32 = 0.60;
const BROWN_MIN_SATURATION: f32 = 0.50;
const OLIVE_MAX_VALUE: f32 = 0.55;

/// Relative luminance fraction of an sRGB pixel (Rec. 709 weights)
fn luminance(r: u8, g: u8, b: u8) -> f32 {
    (0.2126 * r as f32 + 0.7152 * g as f32 + 0.0722 * b as f32) / 255.0
}

fn saturation(r: u8, g: u8, b: u8) -> f32 {
    let max = r.max(g).max(b) as f32;
    let min = r.min(g).min(b) as f32;
    if max == 0.0 {
        0.0
    } else {
        (max - min) / max
    }
}

/// Extracts the visually dominant color of a garment photo
///
/// The image is downsampled to a fixed grid; near-transparent and near-black
/// pixels (typically background and shadow) are discarded, and the survivors
/// are bucketed on a coarse quantized RGB grid. Each pixel contributes its
/// luminance weighted by `saturation^0.7`, which favors the garment's actual
/// hue over washed-out highlights. Returns `None` if every pixel is filtered
/// out.
pub fn extract_dominant_color(image: &DynamicImage) -> Option<Rgb> {
    let small = image.resize_exact(SAMPLE_GRID, SAMPLE_GRID, image::imageops::FilterType::Triangle);
    let rgba = small.to_rgba8();

    let mut buckets: HashMap<(u8, u8, u8), f32> = HashMap::new();

    for pixel in rgba.pixels() {
        let [r, g, b, a] = pixel.0;
        if a < ALPHA_FLOOR {
            continue;
        }
        let luma = luminance(r, g, b);
        if luma < LUMINANCE_FLOOR {
            continue;
        }

        let key = (
            r / QUANT_STEP * QUANT_STEP,
            g / QUANT_STEP * QUANT_STEP,
            b / QUANT_STEP * QUANT_STEP,
        );
        let weight = luma * saturation(r, g, b).powf(0.7);
        *buckets.entry(key).or_insert(0.0) += weight;
    }

    let ((r, g, b), _) = buckets
        .into_iter()
        .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))?;

    // De-quantize to the bucket center
    let half = QUANT_STEP / 2;
    Some(Rgb::new(
        r.saturating_add(half),
        g.saturating_add(half),
        b.saturating_add(half),
    ))
}

/// Maps a color value onto the fixed name taxonomy
///
/// An ordered rule cascade over hue/saturation/value: the low-saturation
/// branch yields the achromatic names by brightness, then a hue-range table
/// yields the chromatic names, with brightness/saturation refinements
/// distinguishing Brown from Orange and Olive from Yellow.
pub fn classify_color_name(color: Rgb) -> ColorName {
    let (h, s, v) = color.hsv();

    // Very dark pixels read as black regardless of nominal saturation
    if v < NEAR_BLACK_VALUE {
        return ColorName::Black;
    }

    if s < LOW_SATURATION {
        return if v < BLACK_VALUE {
            ColorName::Black
        } else if v > WHITE_VALUE {
            ColorName::White
        } else if v > LIGHT_GRAY_VALUE {
            ColorName::LightGray
        } else if v < DARK_GRAY_VALUE {
            ColorName::DarkGray
        } else {
            ColorName::Gray
        };
    }

    if !(15.0..345.0).contains(&h) {
        ColorName::Red
    } else if h < 45.0 {
        if v < BROWN_MAX_VALUE && s > BROWN_MIN_SATURATION {
            ColorName::Brown
        } else {
            ColorName::Orange
        }
    } else if h < 75.0 {
        if v < OLIVE_MAX_VALUE {
            ColorName::Olive
        } else {
            ColorName::Yellow
        }
    } else if h < 165.0 {
        ColorName::Green
    } else if h < 195.0 {
        ColorName::Teal
    } else if h < 255.0 {
        ColorName::Blue
    } else if h < 290.0 {
        ColorName::Purple
    } else if h < 345.0 {
        ColorName::Magenta
    } else {
        ColorName::Colored
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn solid_image(r: u8, g: u8, b: u8, a: u8) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(32, 32, Rgba([r, g, b, a])))
    }

    #[test]
    fn test_dominant_color_of_solid_image() {
        let color = extract_dominant_color(&solid_image(30, 60, 200, 255)).unwrap();
        // De-quantized bucket center lands within one step of the source
        assert!((color.r as i32 - 30).unsigned_abs() <= 16);
        assert!((color.g as i32 - 60).unsigned_abs() <= 16);
        assert!((color.b as i32 - 200).unsigned_abs() <= 16);
        assert_eq!(classify_color_name(color), ColorName::Blue);
    }

    #[test]
    fn test_fully_transparent_image_has_no_dominant_color() {
        assert!(extract_dominant_color(&solid_image(200, 10, 10, 0)).is_none());
    }

    #[test]
    fn test_near_black_image_has_no_dominant_color() {
        assert!(extract_dominant_color(&solid_image(3, 3, 3, 255)).is_none());
    }

    #[test]
    fn test_majority_color_wins() {
        let mut img = RgbaImage::from_pixel(10, 10, Rgba([220, 30, 30, 255]));
        for x in 0..3 {
            img.put_pixel(x, 0, Rgba([30, 30, 220, 255]));
        }
        let color = extract_dominant_color(&DynamicImage::ImageRgba8(img)).unwrap();
        assert_eq!(classify_color_name(color), ColorName::Red);
    }

    #[test]
    fn test_low_saturation_never_chromatic() {
        // Sweep the achromatic axis plus slightly tinted grays
        for value in (0u16..=255).step_by(5) {
            let v = value as u8;
            let tinted = Rgb::new(v, v, v.saturating_add(v / 10));
            let (_, s, _) = tinted.hsv();
            if s < LOW_SATURATION {
                let name = classify_color_name(tinted);
                assert!(
                    matches!(
                        name,
                        ColorName::Black
                            | ColorName::White
                            | ColorName::LightGray
                            | ColorName::DarkGray
                            | ColorName::Gray
                    ),
                    "saturation {} value {} classified as {:?}",
                    s,
                    v,
                    name
                );
            }
        }
    }

    #[test]
    fn test_black_and_white_thresholds() {
        assert_eq!(classify_color_name(Rgb::new(10, 10, 10)), ColorName::Black);
        assert_eq!(
            classify_color_name(Rgb::new(250, 250, 250)),
            ColorName::White
        );
        assert_eq!(
            classify_color_name(Rgb::new(200, 200, 200)),
            ColorName::LightGray
        );
        assert_eq!(
            classify_color_name(Rgb::new(60, 60, 60)),
            ColorName::DarkGray
        );
        assert_eq!(classify_color_name(Rgb::new(120, 120, 120)), ColorName::Gray);
    }

    #[test]
    fn test_chromatic_hues() {
        assert_eq!(classify_color_name(Rgb::new(230, 20, 20)), ColorName::Red);
        assert_eq!(classify_color_name(Rgb::new(255, 140, 20)), ColorName::Orange);
        assert_eq!(classify_color_name(Rgb::new(240, 240, 30)), ColorName::Yellow);
        assert_eq!(classify_color_name(Rgb::new(30, 200, 30)), ColorName::Green);
        assert_eq!(classify_color_name(Rgb::new(30, 200, 200)), ColorName::Teal);
        assert_eq!(classify_color_name(Rgb::new(30, 60, 220)), ColorName::Blue);
        assert_eq!(classify_color_name(Rgb::new(140, 40, 230)), ColorName::Purple);
        assert_eq!(classify_color_name(Rgb::new(230, 40, 200)), ColorName::Magenta);
    }

    #[test]
    fn test_brown_refinement() {
        // Dark, saturated orange-range hue reads as brown
        assert_eq!(classify_color_name(Rgb::new(120, 70, 20)), ColorName::Brown);
        // Bright version of the same hue stays orange
        assert_eq!(classify_color_name(Rgb::new(250, 150, 40)), ColorName::Orange);
    }

    #[test]
    fn test_olive_refinement() {
        // Dark yellow reads as olive
        assert_eq!(classify_color_name(Rgb::new(120, 120, 30)), ColorName::Olive);
    }
}
