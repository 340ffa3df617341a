use crate::format::ImageFormat;

pub use crate::operations::{EditSet, ImageOperation, OperationKind};

/// Pixel dimensions
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// A rectangle in pixel coordinates, origin at the top left corner
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Requested output size and crop
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum ImageSize {
    /// Keep the source resolution
    #[default]
    Original,
    /// Scale to fit inside the given box, keeping the aspect ratio
    Fit(Size),
    /// Cut out the given area of the source
    Crop(Rect),
}

/// Color with components in the 0.0..=1.0 range, in red-green-blue-alpha order
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Color {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);

    pub const fn rgb(red: f64, green: f64, blue: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha: 1.0,
        }
    }

    pub const fn rgba(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }
}

/// Which library family the caller would rather have load, edit and save the image.
/// Only a hint; the encode pathway is decided by the output format.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum ImageFramework {
    #[default]
    FilterGraph,
    Raster,
}

/// Options for a single image conversion.
///
/// Conversions never modify the caller's value; resolution works on a copy.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageSettings {
    /// Output format, defaults to the source image format
    pub format: Option<ImageFormat>,
    /// Output size and crop, defaults to the source resolution
    pub size: ImageSize,
    /// From 0.0 to 1.0 where 1.0 is lossless. Ignored by lossless formats.
    pub quality: Option<f64>,
    /// Frame rate for animated formats
    pub frame_rate: Option<u32>,
    /// Keep only the primary image or the first frame of an animation
    pub skip_animation: bool,
    /// Keep the alpha channel; does nothing for images without one
    pub preserve_alpha_channel: bool,
    /// Embed a small preview into the file, JPEG and HEIF only
    pub embed_thumbnail: bool,
    /// Convert colors for display on older devices
    pub optimize_color_for_sharing: bool,
    /// Matte for formats without transparency support, white when unset
    pub background_color: Option<Color>,
    /// Edits applied before encoding, at most one of each kind
    pub edit: EditSet,
    pub preferred_framework: ImageFramework,
}

impl Default for ImageSettings {
    fn default() -> Self {
        Self {
            format: None,
            size: ImageSize::Original,
            quality: None,
            frame_rate: None,
            skip_animation: false,
            preserve_alpha_channel: true,
            embed_thumbnail: false,
            optimize_color_for_sharing: false,
            background_color: None,
            edit: EditSet::new(),
            preferred_framework: ImageFramework::FilterGraph,
        }
    }
}

impl ImageSettings {
    pub fn with_format(format: ImageFormat) -> Self {
        Self {
            format: Some(format),
            ..Default::default()
        }
    }
}
