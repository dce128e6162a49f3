//! Photo compression for inline storage
//!
//! Photos are downscaled to a maximum width, re-encoded as JPEG and stored as
//! self-contained `data:` URLs inside their area.

use std::io::Cursor;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use base64::{engine::general_purpose::STANDARD, Engine};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageDecoder, ImageReader};

use sitecheck_types::PhotoError;

pub const DEFAULT_MAX_WIDTH: u32 = 1200;
pub const DEFAULT_QUALITY: f32 = 0.8;

/// Prefix of every encoded photo
pub const DATA_URL_PREFIX: &str = "data:image/jpeg;base64,";

/// Compression parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompressOptions {
    /// Photos wider than this are scaled down to exactly this width
    pub max_width: u32,
    /// Fidelity in (0, 1]; higher keeps more detail and produces larger output
    pub quality: f32,
}

impl Default for CompressOptions {
    fn default() -> Self {
        Self {
            max_width: DEFAULT_MAX_WIDTH,
            quality: DEFAULT_QUALITY,
        }
    }
}

impl CompressOptions {
    pub fn new(max_width: u32, quality: f32) -> Self {
        Self { max_width, quality }
    }

    pub fn validate(&self) -> Result<(), PhotoError> {
        if self.max_width == 0 {
            return Err(PhotoError::InvalidOptions("max width must be positive".to_string()));
        }
        if !(self.quality > 0.0 && self.quality <= 1.0) {
            return Err(PhotoError::InvalidOptions(format!(
                "quality must be in (0, 1], got {}",
                self.quality
            )));
        }
        Ok(())
    }

    /// JPEG encoder quality (1-100)
    pub fn jpeg_quality(&self) -> u8 {
        (self.quality * 100.0).round().clamp(1.0, 100.0) as u8
    }
}

/// Output dimensions for a photo of `width` x `height`
///
/// Only shrinks: the height is scaled proportionally and rounded, never below 1.
pub fn target_dimensions(width: u32, height: u32, max_width: u32) -> (u32, u32) {
    if width <= max_width {
        return (width, height);
    }
    let scaled = (height as f64 * max_width as f64 / width as f64).round();
    (max_width, (scaled as u32).max(1))
}

/// Decode a photo and bake its EXIF orientation into the pixels
///
/// The re-encoded JPEG carries no EXIF, so the rotation cannot be left to the viewer.
fn decode_upright(bytes: &[u8]) -> image::ImageResult<DynamicImage> {
    let mut decoder = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()?
        .into_decoder()?;
    let orientation = decoder.orientation()?;
    let mut img = DynamicImage::from_decoder(decoder)?;
    img.apply_orientation(orientation);
    Ok(img)
}

/// Compress an in-memory photo
pub fn compress(bytes: &[u8], options: &CompressOptions) -> Result<String, PhotoError> {
    compress_named(bytes, "<memory>", options)
}

/// Compress an in-memory photo; `name` labels decode errors
pub fn compress_named(bytes: &[u8], name: &str, options: &CompressOptions) -> Result<String, PhotoError> {
    options.validate()?;

    let img = decode_upright(bytes).map_err(|e| PhotoError::Decode {
        photo: name.to_string(),
        reason: e.to_string(),
    })?;

    let (width, height) = img.dimensions();
    let (target_w, target_h) = target_dimensions(width, height, options.max_width);
    let img = if (target_w, target_h) != (width, height) {
        img.resize_exact(target_w, target_h, FilterType::Triangle)
    } else {
        img
    };

    // JPEG has no alpha channel
    let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
    let mut buffer = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut buffer, options.jpeg_quality());
    rgb.write_with_encoder(encoder)
        .map_err(|e| PhotoError::Encode(e.to_string()))?;

    tracing::debug!(
        photo = name,
        from = %format!("{}x{}", width, height),
        to = %format!("{}x{}", target_w, target_h),
        bytes_in = bytes.len(),
        bytes_out = buffer.len(),
        "compressed photo"
    );

    Ok(format!("{}{}", DATA_URL_PREFIX, STANDARD.encode(&buffer)))
}

/// Read and compress a photo file, naming it in errors
pub fn compress_file(path: &Path, options: &CompressOptions) -> Result<String, PhotoError> {
    let input = PhotoInput::from_file(path)?;
    compress_named(&input.bytes, &input.name, options)
}

/// One photo of a batch
#[derive(Debug, Clone)]
pub struct PhotoInput {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl PhotoInput {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, PhotoError> {
        Ok(Self::new(path.display().to_string(), std::fs::read(path)?))
    }
}

/// Compress a batch of photos on `jobs` worker threads (0 = CPU count)
///
/// Result `i` always belongs to input `i`, whatever order the workers finish
/// in. Each photo succeeds or fails on its own.
pub fn compress_batch(
    inputs: &[PhotoInput],
    options: &CompressOptions,
    jobs: usize,
) -> Vec<Result<String, PhotoError>> {
    compress_batch_with_progress(inputs, options, jobs, &|| {})
}

/// Like [`compress_batch`], calling `on_done` from a worker as each photo finishes
pub fn compress_batch_with_progress(
    inputs: &[PhotoInput],
    options: &CompressOptions,
    jobs: usize,
    on_done: &(dyn Fn() + Sync),
) -> Vec<Result<String, PhotoError>> {
    let jobs = match jobs {
        0 => num_cpus::get(),
        n => n,
    }
    .min(inputs.len())
    .max(1);

    let next_index = AtomicUsize::new(0);
    let mut slots: Vec<Option<Result<String, PhotoError>>> = inputs.iter().map(|_| None).collect();

    thread::scope(|scope| {
        let handles: Vec<_> = (0..jobs)
            .map(|_| {
                let next_index = &next_index;
                scope.spawn(move || {
                    let mut done = Vec::new();
                    loop {
                        let idx = next_index.fetch_add(1, Ordering::SeqCst);
                        if idx >= inputs.len() {
                            break;
                        }
                        let input = &inputs[idx];
                        done.push((idx, compress_named(&input.bytes, &input.name, options)));
                        on_done();
                    }
                    done
                })
            })
            .collect();

        for handle in handles {
            match handle.join() {
                Ok(done) => {
                    for (idx, result) in done {
                        slots[idx] = Some(result);
                    }
                }
                Err(_) => tracing::error!("photo compression worker panicked"),
            }
        }
    });

    slots
        .into_iter()
        .zip(inputs)
        .map(|(slot, input)| {
            slot.unwrap_or_else(|| {
                Err(PhotoError::Encode(format!("{}: compression did not complete", input.name)))
            })
        })
        .collect()
}

/// Recover the JPEG bytes of an encoded photo
pub fn decode_data_url(url: &str) -> Result<Vec<u8>, PhotoError> {
    let invalid = |reason: String| PhotoError::Decode {
        photo: "data URL".to_string(),
        reason,
    };

    let (header, data) = url
        .split_once(',')
        .ok_or_else(|| invalid("missing ',' separator".to_string()))?;
    if !header.starts_with("data:") || !header.ends_with(";base64") {
        return Err(invalid(format!("unsupported header '{}'", header)));
    }

    STANDARD.decode(data).map_err(|e| invalid(e.to_string()))
}
