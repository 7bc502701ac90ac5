// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image processor — decoding from files, encoded bytes, or raw channel
// buffers, normalisation to RGB, and filtered scaling. Operates on in-memory
// images using the `image` crate.

use std::path::Path;

use image::imageops::FilterType;
use image::{DynamicImage, GrayAlphaImage, GrayImage, ImageFormat, RgbImage, RgbaImage};
use mittools_core::ResizeFilter;
use mittools_core::error::MitToolsError;
use tracing::{debug, info, instrument};

/// Largest image `scale` will produce, in pixels (16384 x 16384).
pub const MAX_PIXELS: u64 = 1 << 28;

/// Map the toolkit's filter names onto the `image` crate's resampling filters.
pub fn filter_type(filter: ResizeFilter) -> FilterType {
    match filter {
        ResizeFilter::Lanczos3 => FilterType::Lanczos3,
        ResizeFilter::CatmullRom => FilterType::CatmullRom,
        ResizeFilter::Gaussian => FilterType::Gaussian,
        ResizeFilter::Nearest => FilterType::Nearest,
        ResizeFilter::Triangle => FilterType::Triangle,
    }
}

/// Image pipeline operating on a single in-memory image.
///
/// Transformations consume `self` and return a new `ImageProcessor`, so calls
/// chain:
///
/// ```ignore
/// ImageProcessor::open("page.jpg")?
///     .scale(0.5, ResizeFilter::Lanczos3)
///     .to_rgb()
///     .save("page-small.png")?;
/// ```
pub struct ImageProcessor {
    image: DynamicImage,
}

impl ImageProcessor {
    // -- Construction ---------------------------------------------------------

    /// Load an image from a file path.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self, MitToolsError> {
        let img = image::open(path.as_ref()).map_err(|err| {
            MitToolsError::ImageError(format!(
                "Failed to open image {}: {}",
                path.as_ref().display(),
                err
            ))
        })?;
        info!(width = img.width(), height = img.height(), "Image loaded");
        Ok(Self { image: img })
    }

    /// Create a processor from encoded bytes (JPEG, PNG, etc.).
    #[instrument(skip(data), fields(data_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self, MitToolsError> {
        let img = image::load_from_memory(data).map_err(|err| {
            MitToolsError::ImageError(format!("failed to decode image: {}", err))
        })?;
        debug!(
            width = img.width(),
            height = img.height(),
            "Image decoded from bytes"
        );
        Ok(Self { image: img })
    }

    /// Build an image from a tightly packed, row-major `height x width x
    /// channels` buffer. One channel is gray, two gray+alpha, three RGB, and
    /// four RGBA.
    pub fn from_raw(
        width: u32,
        height: u32,
        channels: usize,
        data: &[u8],
    ) -> Result<Self, MitToolsError> {
        if !(1..=4).contains(&channels) {
            return Err(MitToolsError::UnsupportedChannels(channels));
        }
        let expected = width as usize * height as usize * channels;
        if data.len() != expected {
            return Err(MitToolsError::InvalidBuffer {
                expected,
                actual: data.len(),
            });
        }

        let buffer = data.to_vec();
        let invalid = || MitToolsError::InvalidBuffer {
            expected,
            actual: data.len(),
        };
        let image = match channels {
            1 => DynamicImage::from(GrayImage::from_raw(width, height, buffer).ok_or_else(invalid)?),
            2 => DynamicImage::from(
                GrayAlphaImage::from_raw(width, height, buffer).ok_or_else(invalid)?,
            ),
            3 => DynamicImage::from(RgbImage::from_raw(width, height, buffer).ok_or_else(invalid)?),
            _ => DynamicImage::from(RgbaImage::from_raw(width, height, buffer).ok_or_else(invalid)?),
        };
        debug!(width, height, channels, "Image built from raw buffer");
        Ok(Self { image })
    }

    /// Wrap an already-decoded `DynamicImage`.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self { image }
    }

    // -- Accessors ------------------------------------------------------------

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Borrow the underlying `DynamicImage`.
    pub fn as_dynamic(&self) -> &DynamicImage {
        &self.image
    }

    /// Consume the processor and return the underlying `DynamicImage`.
    pub fn into_dynamic(self) -> DynamicImage {
        self.image
    }

    /// Consume the processor and return the pixels as 8-bit RGB.
    pub fn into_rgb8(self) -> RgbImage {
        match self.image {
            DynamicImage::ImageRgb8(rgb) => rgb,
            other => other.to_rgb8(),
        }
    }

    // -- Transformations (consume self, return new Self) -----------------------

    /// Normalise to three-channel 8-bit colour. Alpha is discarded.
    pub fn to_rgb(self) -> Self {
        Self {
            image: DynamicImage::ImageRgb8(self.into_rgb8()),
        }
    }

    /// Scale both dimensions by `factor` with the given filter.
    ///
    /// The new size is `round(width * factor) x round(height * factor)`,
    /// never smaller than one pixel. Results above [`MAX_PIXELS`] are
    /// rejected.
    #[instrument(skip(self))]
    pub fn scale(self, factor: f32, filter: ResizeFilter) -> Result<Self, MitToolsError> {
        if !(factor.is_finite() && factor > 0.0) {
            return Err(MitToolsError::InvalidArgument(format!(
                "scale factor must be positive, got {factor}"
            )));
        }
        let target = |side: u32| (f64::from(side) * f64::from(factor)).round().max(1.0);
        let (width, height) = (target(self.image.width()), target(self.image.height()));
        if width * height > MAX_PIXELS as f64 {
            return Err(MitToolsError::InvalidArgument(format!(
                "scaling by {factor} gives {width}x{height}, more than {MAX_PIXELS} pixels"
            )));
        }
        let (new_width, new_height) = (width as u32, height as u32);
        info!(
            from_w = self.image.width(),
            from_h = self.image.height(),
            new_width,
            new_height,
            "Scaling image"
        );
        Ok(self.resize_exact(new_width, new_height, filter))
    }

    /// Resize to fit within `max_width` x `max_height`, preserving aspect
    /// ratio.
    pub fn resize(self, max_width: u32, max_height: u32, filter: ResizeFilter) -> Self {
        let resized = self
            .image
            .resize(max_width, max_height, filter_type(filter));
        debug!(
            new_w = resized.width(),
            new_h = resized.height(),
            "Resize complete"
        );
        Self { image: resized }
    }

    /// Resize to exactly `width` x `height`, ignoring aspect ratio.
    pub fn resize_exact(self, width: u32, height: u32, filter: ResizeFilter) -> Self {
        let resized = self
            .image
            .resize_exact(width, height, filter_type(filter));
        Self { image: resized }
    }

    // -- Output ---------------------------------------------------------------

    /// Encode the current image as PNG bytes.
    pub fn to_png_bytes(&self) -> Result<Vec<u8>, MitToolsError> {
        encode_to_format(&self.image, ImageFormat::Png)
    }

    /// Write the image to a file. The format is inferred from the file extension.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), MitToolsError> {
        self.image.save(path.as_ref()).map_err(|err| {
            MitToolsError::ImageError(format!(
                "Failed to save image {}: {}",
                path.as_ref().display(),
                err
            ))
        })
    }
}

/// Open `input`, scale it by `scale` with `filter`, and write it to `output`.
pub fn scale_down(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    filter: ResizeFilter,
    scale: f32,
) -> Result<(), MitToolsError> {
    ImageProcessor::open(input)?
        .scale(scale, filter)?
        .save(output)
}

/// Encode a `DynamicImage` into the specified format, returning the raw bytes.
pub fn encode_to_format(
    image: &DynamicImage,
    format: ImageFormat,
) -> Result<Vec<u8>, MitToolsError> {
    let mut buffer = Vec::new();
    let mut cursor = std::io::Cursor::new(&mut buffer);
    image
        .write_to(&mut cursor, format)
        .map_err(|err| MitToolsError::ImageError(format!("image encoding failed: {}", err)))?;
    Ok(buffer)
}
