//! Reusable raster surface and thumbnail encoding
//!
//! One surface is shared by every page of a generation, so memory stays at a
//! single page's worth of pixels. A [`SurfaceFrame`] mutably borrows the
//! surface for one page and is consumed by encoding, which means a page's
//! pixels are always extracted before the surface is resized for the next.

use super::Thumbnail;
use crate::types::Result;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageEncoder};
use std::sync::Arc;

const BYTES_PER_PIXEL: usize = 3;

/// RGB pixel buffer reused across pages
#[derive(Debug, Default)]
pub struct RasterSurface {
    pixels: Vec<u8>,
    width: u32,
    height: u32,
}

impl RasterSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resize to `width` x `height`, fill opaque white, and lend out a frame
    pub fn prepare(&mut self, width: u32, height: u32) -> SurfaceFrame<'_> {
        let len = width as usize * height as usize * BYTES_PER_PIXEL;
        self.pixels.clear();
        self.pixels.resize(len, 255);
        self.width = width;
        self.height = height;
        SurfaceFrame { surface: self }
    }

    /// Bytes currently reserved by the pixel buffer
    pub fn capacity_bytes(&self) -> usize {
        self.pixels.capacity()
    }
}

/// One page's exclusive view of the surface
#[derive(Debug)]
pub struct SurfaceFrame<'a> {
    surface: &'a mut RasterSurface,
}

impl SurfaceFrame<'_> {
    pub fn width(&self) -> u32 {
        self.surface.width
    }

    pub fn height(&self) -> u32 {
        self.surface.height
    }

    /// RGB8 pixels, row-major
    pub fn pixels(&self) -> &[u8] {
        &self.surface.pixels
    }

    /// Fill the whole frame with one color
    pub fn fill(&mut self, rgb: [u8; 3]) {
        for pixel in self.surface.pixels.chunks_exact_mut(BYTES_PER_PIXEL) {
            pixel.copy_from_slice(&rgb);
        }
    }

    /// Alpha-blend an RGBA bitmap over the frame, anchored top-left.
    ///
    /// Rows or columns beyond either bitmap are ignored, so a renderer that
    /// rounds its output size differently cannot write out of bounds.
    pub fn composite_rgba(&mut self, rgba: &[u8], src_width: u32, src_height: u32) {
        let width = self.surface.width.min(src_width) as usize;
        let height = self.surface.height.min(src_height) as usize;
        let dst_stride = self.surface.width as usize * BYTES_PER_PIXEL;
        let src_stride = src_width as usize * 4;

        for y in 0..height {
            for x in 0..width {
                let src = y * src_stride + x * 4;
                let dst = y * dst_stride + x * BYTES_PER_PIXEL;
                let Some(px) = rgba.get(src..src + 4) else {
                    return;
                };
                let alpha = px[3] as u32;
                for channel in 0..BYTES_PER_PIXEL {
                    let under = self.surface.pixels[dst + channel] as u32;
                    let over = px[channel] as u32;
                    self.surface.pixels[dst + channel] =
                        ((over * alpha + under * (255 - alpha) + 127) / 255) as u8;
                }
            }
        }
    }

    /// Encode the frame as a JPEG data URI, releasing the surface
    pub fn encode_jpeg(self, quality: u8) -> Result<Thumbnail> {
        let mut jpeg = Vec::new();
        JpegEncoder::new_with_quality(&mut jpeg, quality).write_image(
            &self.surface.pixels,
            self.surface.width,
            self.surface.height,
            ExtendedColorType::Rgb8,
        )?;

        let data_uri = format!("data:image/jpeg;base64,{}", STANDARD.encode(&jpeg));
        Ok(Thumbnail {
            data_uri: Arc::from(data_uri),
            width: self.surface.width,
            height: self.surface.height,
        })
    }
}

/// Pixel size of a thumbnail whose longer edge is `max_dimension`
pub fn thumbnail_size(page_width: f32, page_height: f32, max_dimension: u32) -> Option<(u32, u32)> {
    if !(page_width.is_finite() && page_height.is_finite()) || page_width <= 0.0 || page_height <= 0.0
    {
        return None;
    }

    let scale = max_dimension as f32 / page_width.max(page_height);
    let width = ((page_width * scale).round() as u32).clamp(1, max_dimension);
    let height = ((page_height * scale).round() as u32).clamp(1, max_dimension);
    Some((width, height))
}
