//! The conversion pipeline: validate paths, decode, resolve, edit, encode.

use std::{fs, path::Path};

use log::debug;

use crate::{
    codec::Codec,
    encode,
    encoders::ImageCodec,
    error::ConvertError,
    image::{Image, ImageInfo},
    metadata::MetadataBag,
    resolve::resolve_settings,
    settings::ImageSettings,
};

/// Filesystem and metadata flags of a conversion
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Do not carry any source properties over to the output
    pub skip_metadata: bool,
    /// Replace the destination if it already exists
    pub overwrite: bool,
    /// Remove the source after a successful conversion. Best-effort.
    pub delete_source_file: bool,
}

/// Runs conversions through a codec back-end.
///
/// Holds no per-conversion state, so one converter can serve many threads at once
/// as long as its codec can.
#[derive(Debug, Default, Clone)]
pub struct Converter<C = ImageCodec> {
    codec: C,
}

impl Converter<ImageCodec> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<C: Codec> Converter<C> {
    pub fn with_codec(codec: C) -> Self {
        Self { codec }
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// Converts the image at `source` and writes it to `destination`.
    ///
    /// `settings` is not modified; the format that was actually written is in the returned [ImageInfo],
    /// along with the dimensions after edits.
    pub fn convert(
        &self,
        source: &Path,
        destination: &Path,
        settings: &ImageSettings,
        options: ConvertOptions,
    ) -> Result<ImageInfo, ConvertError> {
        if !source.exists() {
            return Err(ConvertError::SourceNotFound {
                path: source.to_owned(),
            });
        }
        encode::prepare_destination(destination, options.overwrite)?;

        let image = self
            .codec
            .decode(source)
            .map_err(|source_error| ConvertError::FailedToReadImage {
                path: source.to_owned(),
                source: source_error,
            })?;

        let properties = if options.skip_metadata {
            None
        } else {
            self.capture_properties(&image)
        };

        let settings = resolve_settings(settings, &image, destination)?;
        let format = settings.format.ok_or(ConvertError::UnknownImageFormat)?;

        let image = if settings.edit.is_empty() {
            image
        } else {
            self.codec.apply_edits(image, &settings.edit)
        };

        encode::encode(
            &self.codec,
            &image,
            destination,
            &settings,
            properties.as_ref(),
        )?;

        if options.delete_source_file {
            if let Err(error) = fs::remove_file(source) {
                debug!("leaving source {} in place: {error}", source.display());
            }
        }

        Ok(ImageInfo {
            format,
            size: image.size(),
        })
    }

    /// Writes an already decoded image, see [encode::save_image].
    pub fn save_image(
        &self,
        image: &Image,
        destination: &Path,
        overwrite: bool,
        settings: &ImageSettings,
        properties: Option<&MetadataBag>,
    ) -> Result<(), ConvertError> {
        encode::save_image(
            &self.codec,
            image,
            destination,
            overwrite,
            settings,
            properties,
        )
    }

    fn capture_properties(&self, image: &Image) -> Option<MetadataBag> {
        match self.codec.copy_properties(image) {
            Ok(bag) => Some(bag),
            Err(error) => {
                debug!("continuing without metadata: {error}");
                None
            }
        }
    }
}

/// Converts `source` to `destination` with the default `image` crate back-end.
pub fn convert(
    source: impl AsRef<Path>,
    destination: impl AsRef<Path>,
    settings: &ImageSettings,
    options: ConvertOptions,
) -> Result<ImageInfo, ConvertError> {
    Converter::new().convert(source.as_ref(), destination.as_ref(), settings, options)
}
