use base64::Engine;

/// Raster formats a page can be exported to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageFormat {
    #[default]
    Png,
}

impl ImageFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
        }
    }
}

/// How the current page is rasterised before it is sent to the model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExportOptions {
    pub scale: f32,
    pub dark: bool,
    pub fill_background: bool,
    pub format: ImageFormat,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            scale: 1.0,
            dark: false,
            fill_background: true,
            format: ImageFormat::Png,
        }
    }
}

const LIGHT_BACKGROUND: [u8; 4] = [255, 255, 255, 255];
const DARK_BACKGROUND: [u8; 4] = [24, 24, 27, 255];

/// Opaque canvas background for the given theme.
pub fn background_rgba(dark: bool) -> [u8; 4] {
    if dark {
        DARK_BACKGROUND
    } else {
        LIGHT_BACKGROUND
    }
}

/// Composite an RGBA pixel over an opaque background (straight alpha).
pub fn composite_over(pixel: [u8; 4], background: [u8; 4]) -> [u8; 4] {
    let alpha = u32::from(pixel[3]);
    let blend = |fg: u8, bg: u8| -> u8 {
        let value = (u32::from(fg) * alpha + u32::from(bg) * (255 - alpha) + 127) / 255;
        value as u8
    };

    [
        blend(pixel[0], background[0]),
        blend(pixel[1], background[1]),
        blend(pixel[2], background[2]),
        255,
    ]
}

/// Longest side, in pixels, an exported page may have.
pub const MAX_EXPORT_DIMENSION: u32 = 16_384;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ExportError {
    #[error("Exported page would be {width}x{height} pixels; each side is limited to {MAX_EXPORT_DIMENSION}")]
    TooLarge { width: u64, height: u64 },
}

/// Target size for a scaled export; never collapses below one pixel.
///
/// Sizes over [`MAX_EXPORT_DIMENSION`] on either side are rejected before
/// anything is allocated for them.
pub fn scaled_dimensions(width: u32, height: u32, scale: f32) -> Result<(u32, u32), ExportError> {
    let scale = if scale.is_finite() && scale > 0.0 {
        f64::from(scale)
    } else {
        1.0
    };
    let scale_one = |v: u32| ((f64::from(v) * scale).round() as u64).max(1);
    let (scaled_width, scaled_height) = (scale_one(width), scale_one(height));

    let limit = u64::from(MAX_EXPORT_DIMENSION);
    if scaled_width > limit || scaled_height > limit {
        return Err(ExportError::TooLarge {
            width: scaled_width,
            height: scaled_height,
        });
    }

    Ok((scaled_width as u32, scaled_height as u32))
}

/// Encode image bytes as a `data:` URL for a multimodal chat message.
pub fn to_data_url(bytes: &[u8], format: ImageFormat) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
    format!("data:{};base64,{encoded}", format.mime_type())
}
