// src/imaging.rs

use chrono::{DateTime, Utc};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};

use crate::error::CliError;

const MAX_ENCODE_ATTEMPTS: u32 = 3;
const QUALITY_STEP: f32 = 0.1;
const QUALITY_FLOOR: f32 = 0.1;

/// Size and resolution bounds a photo must satisfy before upload.
#[derive(Debug, Clone)]
pub struct NormalizeOptions {
    pub max_size_mb: f64,
    pub max_width: u32,
    pub max_height: u32,
    pub min_width: u32,
    pub min_height: u32,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            max_size_mb: 2.0,
            max_width: 1600,
            max_height: 1600,
            min_width: 300,
            min_height: 300,
        }
    }
}

/// A photo resized and re-encoded to fit the upload constraints.
#[derive(Debug, Clone)]
pub struct NormalizedImage {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub modified_at: DateTime<Utc>,
}

/// Resize and re-encode a garment photo so the backend never has to.
///
/// Dimensions are raised to the minimums first, then capped at the maximums,
/// both uniformly. Encoding starts at a quality picked from how far the
/// source overshoots the byte budget and steps down on each retry; after the
/// attempt limit the last output is returned as-is rather than failing the
/// upload for being slightly over budget.
pub fn normalize(
    file_name: &str,
    source: &[u8],
    opts: &NormalizeOptions,
) -> Result<NormalizedImage, CliError> {
    let decoded = image::load_from_memory(source)?;
    let resized = fit_to_bounds(decoded, opts);

    let budget = (opts.max_size_mb * 1024.0 * 1024.0) as usize;
    let mut quality = initial_quality(source.len(), budget);
    let mut encoded = encode_jpeg(&resized, quality)?;
    let mut attempts = 1;
    while encoded.len() > budget && attempts < MAX_ENCODE_ATTEMPTS {
        quality = (quality - QUALITY_STEP).max(QUALITY_FLOOR);
        encoded = encode_jpeg(&resized, quality)?;
        attempts += 1;
    }
    tracing::debug!(
        target: "armoire_cli::imaging",
        %file_name,
        source_bytes = source.len(),
        encoded_bytes = encoded.len(),
        attempts,
        quality,
        "Normalized garment photo"
    );

    let (width, height) = resized.dimensions();
    Ok(NormalizedImage {
        file_name: file_name.to_string(),
        bytes: encoded,
        width,
        height,
        modified_at: Utc::now(),
    })
}

/// Uniform scale: up to the minimums first, then down to the maximums.
fn fit_to_bounds(image: DynamicImage, opts: &NormalizeOptions) -> DynamicImage {
    let (width, height) = image.dimensions();
    let (w, h) = (f64::from(width), f64::from(height));

    let mut scale = 1.0_f64;
    if width < opts.min_width || height < opts.min_height {
        scale = (f64::from(opts.min_width) / w).max(f64::from(opts.min_height) / h);
    }
    let (scaled_w, scaled_h) = (w * scale, h * scale);
    if scaled_w > f64::from(opts.max_width) || scaled_h > f64::from(opts.max_height) {
        scale *= (f64::from(opts.max_width) / scaled_w).min(f64::from(opts.max_height) / scaled_h);
    }
    if (scale - 1.0).abs() < f64::EPSILON {
        return image;
    }

    let target_w = (w * scale).round().max(1.0) as u32;
    let target_h = (h * scale).round().max(1.0) as u32;
    image.resize_exact(target_w, target_h, FilterType::Lanczos3)
}

/// Coarse starting quality from how far the source overshoots the budget.
fn initial_quality(source_len: usize, budget: usize) -> f32 {
    if budget == 0 {
        return QUALITY_FLOOR;
    }
    let ratio = source_len as f64 / budget as f64;
    if ratio > 5.0 {
        0.5
    } else if ratio > 2.0 {
        0.7
    } else if ratio > 1.5 {
        0.8
    } else {
        0.9
    }
}

fn encode_jpeg(image: &DynamicImage, quality: f32) -> Result<Vec<u8>, CliError> {
    let mut out = Vec::new();
    let q = (quality * 100.0).round().clamp(1.0, 100.0) as u8;
    let mut encoder = JpegEncoder::new_with_quality(&mut out, q);
    // JPEG has no alpha channel; flatten before encoding.
    encoder.encode_image(&image.to_rgb8())?;
    Ok(out)
}
