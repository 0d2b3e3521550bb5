use crate::prelude::*;
use appgen_core::export::{
    background_rgba, composite_over, scaled_dimensions, to_data_url, ExportOptions, ImageFormat,
};
use image::DynamicImage;
use std::io::Cursor;
use std::path::PathBuf;

/// Renders the active page of a diagram.
pub trait Canvas {
    /// `data:` URL of the current page, or `None` when no page is open.
    fn page_data_url(&self, options: &ExportOptions) -> Result<Option<String>>;
}

/// A page rendering exported by the editor as a PNG file.
#[derive(Debug, Clone, Default)]
pub struct PngCanvas {
    page: Option<PathBuf>,
}

impl PngCanvas {
    pub fn new(page: Option<PathBuf>) -> Self {
        Self { page }
    }
}

impl Canvas for PngCanvas {
    fn page_data_url(&self, options: &ExportOptions) -> Result<Option<String>> {
        let Some(path) = &self.page else {
            return Ok(None);
        };

        let page = image::open(path)
            .with_context(|| f!("Failed to open page rendering {}", path.display()))?;
        let bytes = rasterize(page, options)?;

        Ok(Some(to_data_url(&bytes, options.format)))
    }
}

/// Scale the page, flatten it onto the theme background and encode it.
pub fn rasterize(page: DynamicImage, options: &ExportOptions) -> Result<Vec<u8>> {
    let (width, height) = scaled_dimensions(page.width(), page.height(), options.scale)?;
    let page = if (width, height) == (page.width(), page.height()) {
        page
    } else {
        page.resize_exact(width, height, image::imageops::FilterType::Triangle)
    };

    let mut pixels = page.to_rgba8();
    if options.fill_background {
        let background = background_rgba(options.dark);
        for pixel in pixels.pixels_mut() {
            pixel.0 = composite_over(pixel.0, background);
        }
    }

    let format = match options.format {
        ImageFormat::Png => image::ImageFormat::Png,
    };

    let mut buf = Vec::new();
    DynamicImage::ImageRgba8(pixels)
        .write_to(&mut Cursor::new(&mut buf), format)
        .context("Failed to encode page image")?;

    Ok(buf)
}
