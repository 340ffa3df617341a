use std::borrow::Cow;

use image::{ColorType, DynamicImage, ImageBuffer, Pixel, Primitive};

/// Drops channels the image does not use: alpha if every pixel is opaque,
/// color if every pixel is gray. Precision is never reduced.
pub(crate) fn compact_pixel_format(image: &DynamicImage) -> Cow<'_, DynamicImage> {
    use DynamicImage::*;
    let unused = match image {
        ImageLumaA8(pixels) => unused_channels(pixels),
        ImageRgb8(pixels) => unused_channels(pixels),
        ImageRgba8(pixels) => unused_channels(pixels),
        ImageLumaA16(pixels) => unused_channels(pixels),
        ImageRgb16(pixels) => unused_channels(pixels),
        ImageRgba16(pixels) => unused_channels(pixels),
        _ => return Cow::Borrowed(image),
    };
    let mut color = image.color();
    if unused.color {
        color = without_color(color);
    }
    if unused.alpha {
        color = without_alpha(color);
    }
    convert(image, color)
}

/// 8 bits per channel RGB, or RGBA if any pixel is translucent
pub(crate) fn to_8bit_rgb(image: &DynamicImage) -> Cow<'_, DynamicImage> {
    match image {
        DynamicImage::ImageRgb8(_) | DynamicImage::ImageRgba8(_) => Cow::Borrowed(image),
        _ if is_opaque(image) => Cow::Owned(DynamicImage::ImageRgb8(image.to_rgb8())),
        _ => Cow::Owned(DynamicImage::ImageRgba8(image.to_rgba8())),
    }
}

/// 8 bits per channel in the closest color type, for output that should display the same everywhere
pub(crate) fn to_8bit(image: &DynamicImage) -> Cow<'_, DynamicImage> {
    let color = match image.color() {
        ColorType::L16 => ColorType::L8,
        ColorType::La16 => ColorType::La8,
        ColorType::Rgb16 | ColorType::Rgb32F => ColorType::Rgb8,
        ColorType::Rgba16 | ColorType::Rgba32F => ColorType::Rgba8,
        other => other,
    };
    convert(image, color)
}

pub(crate) fn is_opaque(image: &DynamicImage) -> bool {
    use DynamicImage::*;
    match image {
        ImageLumaA8(pixels) => unused_channels(pixels).alpha,
        ImageRgba8(pixels) => unused_channels(pixels).alpha,
        ImageLumaA16(pixels) => unused_channels(pixels).alpha,
        ImageRgba16(pixels) => unused_channels(pixels).alpha,
        ImageRgba32F(pixels) => unused_channels(pixels).alpha,
        other => !other.color().has_alpha(),
    }
}

fn without_color(color: ColorType) -> ColorType {
    match color {
        ColorType::Rgb8 => ColorType::L8,
        ColorType::Rgba8 => ColorType::La8,
        ColorType::Rgb16 => ColorType::L16,
        ColorType::Rgba16 => ColorType::La16,
        other => other,
    }
}

fn without_alpha(color: ColorType) -> ColorType {
    match color {
        ColorType::La8 => ColorType::L8,
        ColorType::Rgba8 => ColorType::Rgb8,
        ColorType::La16 => ColorType::L16,
        ColorType::Rgba16 => ColorType::Rgb16,
        ColorType::Rgba32F => ColorType::Rgb32F,
        other => other,
    }
}

fn convert(image: &DynamicImage, color: ColorType) -> Cow<'_, DynamicImage> {
    if image.color() == color {
        return Cow::Borrowed(image);
    }
    let converted = match color {
        ColorType::L8 => DynamicImage::ImageLuma8(image.to_luma8()),
        ColorType::La8 => DynamicImage::ImageLumaA8(image.to_luma_alpha8()),
        ColorType::Rgb8 => DynamicImage::ImageRgb8(image.to_rgb8()),
        ColorType::L16 => DynamicImage::ImageLuma16(image.to_luma16()),
        ColorType::La16 => DynamicImage::ImageLumaA16(image.to_luma_alpha16()),
        ColorType::Rgb16 => DynamicImage::ImageRgb16(image.to_rgb16()),
        ColorType::Rgba16 => DynamicImage::ImageRgba16(image.to_rgba16()),
        ColorType::Rgb32F => DynamicImage::ImageRgb32F(image.to_rgb32f()),
        ColorType::Rgba32F => DynamicImage::ImageRgba32F(image.to_rgba32f()),
        _ => DynamicImage::ImageRgba8(image.to_rgba8()),
    };
    Cow::Owned(converted)
}

#[derive(Copy, Clone, PartialEq, Eq)]
struct UnusedChannels {
    color: bool,
    alpha: bool,
}

/// Scans the whole image once. A channel counts as unused until a pixel proves otherwise.
fn unused_channels<P, Container>(input: &ImageBuffer<P, Container>) -> UnusedChannels
where
    P: Pixel,
    Container: std::ops::Deref<Target = [P::Subpixel]>,
{
    let mut unused = UnusedChannels {
        color: P::CHANNEL_COUNT >= 3,
        alpha: P::HAS_ALPHA,
    };
    let max = <P::Subpixel as Primitive>::DEFAULT_MAX_VALUE;
    for row in input.rows() {
        for pixel in row {
            let channels = pixel.channels();
            if P::CHANNEL_COUNT >= 3 {
                unused.color &= channels[0] == channels[1] && channels[0] == channels[2];
            }
            if P::HAS_ALPHA {
                // alpha is the last channel in every DynamicImage variant
                unused.alpha &= channels[channels.len() - 1] == max;
            }
        }
        if !unused.color && !unused.alpha {
            break;
        }
    }
    unused
}
