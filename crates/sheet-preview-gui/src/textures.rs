//! egui textures for the current thumbnail snapshot

use eframe::egui;
use sheet_preview::{Thumbnail, ThumbnailMap};
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Default)]
pub struct ThumbnailTextures {
    /// Page index -> (data URI the texture was decoded from, texture)
    textures: HashMap<usize, (Arc<str>, egui::TextureHandle)>,
}

impl ThumbnailTextures {
    /// Upload thumbnails that are new in `thumbnails` and drop stale ones
    pub fn sync(&mut self, ctx: &egui::Context, thumbnails: &ThumbnailMap) {
        self.textures.retain(|page, (href, _)| {
            thumbnails
                .get(page)
                .is_some_and(|thumbnail| Arc::ptr_eq(&thumbnail.data_uri, href))
        });

        for (page, thumbnail) in thumbnails {
            if self.textures.contains_key(page) {
                continue;
            }
            match decode(thumbnail) {
                Ok(image) => {
                    let handle = ctx.load_texture(
                        format!("thumbnail-{page}"),
                        image,
                        egui::TextureOptions::LINEAR,
                    );
                    self.textures
                        .insert(*page, (Arc::clone(&thumbnail.data_uri), handle));
                }
                Err(e) => log::warn!("Failed to decode thumbnail for page {}: {}", page + 1, e),
            }
        }
    }

    pub fn get(&self, page: usize) -> Option<&egui::TextureHandle> {
        self.textures.get(&page).map(|(_, handle)| handle)
    }

    pub fn clear(&mut self) {
        self.textures.clear();
    }
}

fn decode(thumbnail: &Thumbnail) -> anyhow::Result<egui::ColorImage> {
    let jpeg = thumbnail.jpeg_bytes()?;
    let rgba = image::load_from_memory(&jpeg)?.to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    Ok(egui::ColorImage::from_rgba_unmultiplied(size, rgba.as_raw()))
}
