use std::path::Path;

use crate::{error::ConvertError, format::ImageFormat, image::Image, settings::ImageSettings};

/// Returns a copy of `settings` with the output format filled in and corrected
/// for the bit depth of `image`. Does not touch the filesystem.
pub fn resolve_settings(
    settings: &ImageSettings,
    image: &Image,
    destination: &Path,
) -> Result<ImageSettings, ConvertError> {
    let format = ImageFormat::resolve(
        settings.format,
        image.type_identifier.as_deref(),
        destination.extension(),
    )?;
    let mut resolved = settings.clone();
    resolved.format = Some(format.for_bit_depth(image.is_high_bit_depth()));
    Ok(resolved)
}
