use std::{fs, path::Path};

use log::{debug, trace};

use crate::{
    codec::{
        Bgra, ColorSpace, FilterGraphWriter, FilterImage, HeifOptions, PixelFormat,
        RasterDestination, RasterOptions, RasterWriter,
    },
    error::ConvertError,
    format::ImageFormat,
    image::Image,
    metadata::MetadataBag,
    settings::ImageSettings,
};

/// The two mutually exclusive ways an image can be written
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Pathway {
    /// HEIF family: oriented composition with extended color, quality is the only option
    FilterGraph,
    /// Everything else: the generic writer with the full option set
    Raster,
}

impl Pathway {
    pub fn for_format(format: ImageFormat) -> Self {
        if format.is_heif_family() {
            Pathway::FilterGraph
        } else {
            Pathway::Raster
        }
    }
}

/// Writes an already decoded image, applying the same destination collision policy
/// as a full conversion.
///
/// `settings.format` must be set, see [crate::resolve::resolve_settings].
pub fn save_image<W>(
    writer: &W,
    image: &Image,
    destination: &Path,
    overwrite: bool,
    settings: &ImageSettings,
    properties: Option<&MetadataBag>,
) -> Result<(), ConvertError>
where
    W: RasterWriter + FilterGraphWriter + ?Sized,
{
    prepare_destination(destination, overwrite)?;
    encode(writer, image, destination, settings, properties)
}

/// Makes sure nothing is in the way of writing to `path`.
pub(crate) fn prepare_destination(path: &Path, overwrite: bool) -> Result<(), ConvertError> {
    if !path.exists() {
        return Ok(());
    }
    if !overwrite {
        return Err(ConvertError::DestinationExists {
            path: path.to_owned(),
        });
    }
    fs::remove_file(path).map_err(|source| ConvertError::CannotOverwrite {
        path: path.to_owned(),
        source,
    })
}

/// Writes the image to `destination` in the format the settings carry.
pub fn encode<W>(
    writer: &W,
    image: &Image,
    destination: &Path,
    settings: &ImageSettings,
    properties: Option<&MetadataBag>,
) -> Result<(), ConvertError>
where
    W: RasterWriter + FilterGraphWriter + ?Sized,
{
    let format = settings.format.ok_or(ConvertError::UnknownImageFormat)?;
    match Pathway::for_format(format) {
        Pathway::FilterGraph => {
            write_filter_graph(writer, image, destination, format, settings, properties)
        }
        Pathway::Raster => write_raster(writer, image, destination, format, settings, properties),
    }
}

fn write_filter_graph<W: FilterGraphWriter + ?Sized>(
    writer: &W,
    image: &Image,
    path: &Path,
    format: ImageFormat,
    settings: &ImageSettings,
    properties: Option<&MetadataBag>,
) -> Result<(), ConvertError> {
    let filter_image = FilterImage::new(image, properties);
    let options = HeifOptions {
        quality: settings.quality,
    };
    let result = match format {
        ImageFormat::Heif10 if writer.supports_heif10() => {
            writer.write_heif10(&filter_image, path, ColorSpace::ExtendedSrgb, &options)
        }
        ImageFormat::Heif10 => {
            debug!("10-bit HEIF output is not supported, writing {} as heif", path.display());
            writer.write_heif(
                &filter_image,
                path,
                PixelFormat::Rgba16,
                ColorSpace::ExtendedSrgb,
                &options,
            )
        }
        _ => writer.write_heif(
            &filter_image,
            path,
            PixelFormat::Rgba16,
            ColorSpace::Srgb,
            &options,
        ),
    };
    result.map_err(|source| ConvertError::FailedToSaveImage {
        path: path.to_owned(),
        format,
        source: Some(source),
    })
}

fn write_raster<W: RasterWriter + ?Sized>(
    writer: &W,
    image: &Image,
    path: &Path,
    format: ImageFormat,
    settings: &ImageSettings,
    properties: Option<&MetadataBag>,
) -> Result<(), ConvertError> {
    let mut destination =
        writer
            .create(path, format)
            .map_err(|source| ConvertError::FailedToCreateImageFile {
                path: path.to_owned(),
                format,
                source,
            })?;
    let options = raster_options(settings, properties);
    destination.add_image(image, &options);
    if destination.finalize() {
        Ok(())
    } else {
        Err(ConvertError::FailedToSaveImage {
            path: path.to_owned(),
            format,
            source: None,
        })
    }
}

/// Builds the raster writer options. Only the allow-listed property categories are forwarded.
pub(crate) fn raster_options<'a>(
    settings: &ImageSettings,
    properties: Option<&'a MetadataBag>,
) -> RasterOptions<'a> {
    let mut options = RasterOptions {
        embed_thumbnail: settings.embed_thumbnail,
        optimize_color_for_sharing: settings.optimize_color_for_sharing,
        quality: settings.quality,
        background_color: settings.background_color.map(Bgra::from),
        ..Default::default()
    };
    if let Some(bag) = properties {
        options.properties.extend(bag.forwarded());
        for category in bag.categories().filter(|c| !c.is_forwarded()) {
            trace!("not forwarding {category} properties");
        }
    }
    options
}

#[cfg(test)]
mod tests {
    use exif::{Field, In, Tag, Value};
    use image::DynamicImage;

    use super::*;
    use crate::codec::recording::{HeifCall, RecordingCodec};
    use crate::metadata::{Properties, PropertyCategory};
    use crate::settings::Color;

    fn small_image() -> Image {
        Image::new(DynamicImage::new_rgb8(30, 20))
    }

    fn ascii(tag: Tag, ifd_num: In, text: &str) -> Field {
        Field {
            tag,
            ifd_num,
            value: Value::Ascii(vec![text.as_bytes().to_vec()]),
        }
    }

    fn full_bag() -> MetadataBag {
        let mut bag = MetadataBag::new();
        let fields = |tag| Properties::Fields(vec![ascii(tag, In::PRIMARY, "x")]);
        bag.insert(PropertyCategory::Gps, fields(Tag::GPSLatitudeRef));
        bag.insert(PropertyCategory::Exif, fields(Tag::LensModel));
        bag.insert(PropertyCategory::Tiff, fields(Tag::Make));
        bag.insert(PropertyCategory::Interop, fields(Tag::InteroperabilityIndex));
        bag.insert(
            PropertyCategory::Thumbnail,
            Properties::Fields(vec![ascii(Tag::Make, In::THUMBNAIL, "x")]),
        );
        bag.insert(PropertyCategory::Iptc, Properties::Raw(vec![0x1c, 2, 0]));
        bag
    }

    #[test]
    fn pathway_follows_format() {
        assert_eq!(Pathway::for_format(ImageFormat::Heif), Pathway::FilterGraph);
        assert_eq!(Pathway::for_format(ImageFormat::Heif10), Pathway::FilterGraph);
        assert_eq!(Pathway::for_format(ImageFormat::Heic), Pathway::Raster);
        assert_eq!(Pathway::for_format(ImageFormat::Jpeg2000), Pathway::Raster);
    }

    #[test]
    fn missing_format_is_reported_before_writing() {
        let codec = RecordingCodec::new(small_image());
        let result = encode(&codec, &small_image(), Path::new("out"), &ImageSettings::default(), None);
        assert!(matches!(result, Err(ConvertError::UnknownImageFormat)));
        assert!(codec.calls().is_empty());
    }

    #[test]
    fn raster_options_forward_only_the_allow_list() {
        let codec = RecordingCodec::new(small_image());
        let bag = full_bag();
        let settings = ImageSettings {
            quality: Some(0.8),
            embed_thumbnail: true,
            background_color: Some(Color::rgb(1.0, 0.5, 0.0)),
            ..ImageSettings::with_format(ImageFormat::Jpeg)
        };
        encode(&codec, &small_image(), Path::new("out.jpg"), &settings, Some(&bag)).unwrap();

        let calls = codec.raster_calls();
        assert_eq!(calls.len(), 1);
        let call = &calls[0];
        assert_eq!(call.format, ImageFormat::Jpeg);
        assert!(call.embed_thumbnail);
        assert!(!call.optimize_color_for_sharing);
        assert_eq!(call.quality, Some(0.8));
        assert_eq!(call.background_color, Some(Bgra([0.0, 0.5, 1.0, 1.0])));
        assert_eq!(
            call.categories,
            vec![
                PropertyCategory::Gps,
                PropertyCategory::Exif,
                PropertyCategory::Tiff,
                PropertyCategory::Iptc,
            ]
        );
    }

    #[test]
    fn raster_options_without_metadata_or_extras() {
        let options = raster_options(&ImageSettings::default(), None);
        assert!(options.properties.is_empty());
        assert_eq!(options.quality, None);
        assert_eq!(options.background_color, None);
        assert!(!options.embed_thumbnail);
    }

    #[test]
    fn raster_create_failure() {
        let mut codec = RecordingCodec::new(small_image());
        codec.fail_create = true;
        let settings = ImageSettings::with_format(ImageFormat::Bmp);
        let result = encode(&codec, &small_image(), Path::new("out.bmp"), &settings, None);
        assert!(matches!(
            result,
            Err(ConvertError::FailedToCreateImageFile {
                format: ImageFormat::Bmp,
                ..
            })
        ));
        assert!(codec.calls().is_empty());
    }

    #[test]
    fn raster_finalize_failure() {
        let mut codec = RecordingCodec::new(small_image());
        codec.fail_finalize = true;
        let settings = ImageSettings::with_format(ImageFormat::Png);
        let result = encode(&codec, &small_image(), Path::new("out.png"), &settings, None);
        assert!(matches!(
            result,
            Err(ConvertError::FailedToSaveImage {
                format: ImageFormat::Png,
                source: None,
                ..
            })
        ));
    }

    #[test]
    fn heif_gets_quality_and_nothing_else() {
        let codec = RecordingCodec::new(small_image());
        let bag = full_bag();
        let settings = ImageSettings {
            quality: Some(0.5),
            embed_thumbnail: true,
            background_color: Some(Color::BLACK),
            ..ImageSettings::with_format(ImageFormat::Heif)
        };
        encode(&codec, &small_image(), Path::new("out.heif"), &settings, Some(&bag)).unwrap();
        assert!(codec.raster_calls().is_empty());
        assert_eq!(
            codec.heif_calls(),
            vec![HeifCall {
                path: "out.heif".into(),
                ten_bit: false,
                pixel_format: Some(PixelFormat::Rgba16),
                color_space: ColorSpace::Srgb,
                options: HeifOptions { quality: Some(0.5) },
                width: 30,
                height: 20,
                with_properties: true,
            }]
        );
    }

    #[test]
    fn heif10_uses_extended_color() {
        let codec = RecordingCodec::new(small_image());
        let settings = ImageSettings::with_format(ImageFormat::Heif10);
        encode(&codec, &small_image(), Path::new("out.heif"), &settings, None).unwrap();
        let calls = codec.heif_calls();
        assert!(calls[0].ten_bit);
        assert_eq!(calls[0].pixel_format, None);
        assert_eq!(calls[0].color_space, ColorSpace::ExtendedSrgb);
        assert!(!calls[0].with_properties);
    }

    #[test]
    fn heif10_falls_back_silently_without_support() {
        let mut codec = RecordingCodec::new(small_image());
        codec.heif10_supported = false;
        let settings = ImageSettings::with_format(ImageFormat::Heif10);
        encode(&codec, &small_image(), Path::new("out.heif"), &settings, None).unwrap();
        let calls = codec.heif_calls();
        assert_eq!(calls.len(), 1);
        assert!(!calls[0].ten_bit);
        assert_eq!(calls[0].pixel_format, Some(PixelFormat::Rgba16));
        assert_eq!(calls[0].color_space, ColorSpace::ExtendedSrgb);
    }

    #[test]
    fn heif_orientation_comes_from_properties() {
        let codec = RecordingCodec::new(small_image());
        let mut bag = MetadataBag::new();
        bag.insert(
            PropertyCategory::Tiff,
            Properties::Fields(vec![Field {
                tag: Tag::Orientation,
                ifd_num: In::PRIMARY,
                value: Value::Short(vec![6]),
            }]),
        );
        let settings = ImageSettings::with_format(ImageFormat::Heif);
        encode(&codec, &small_image(), Path::new("out.heif"), &settings, Some(&bag)).unwrap();
        let call = &codec.heif_calls()[0];
        assert_eq!((call.width, call.height), (20, 30));
    }

    #[test]
    fn heif_writer_failure_is_a_save_failure() {
        let mut codec = RecordingCodec::new(small_image());
        codec.fail_heif = true;
        let settings = ImageSettings::with_format(ImageFormat::Heif);
        let result = encode(&codec, &small_image(), Path::new("out.heif"), &settings, None);
        assert!(matches!(
            result,
            Err(ConvertError::FailedToSaveImage {
                format: ImageFormat::Heif,
                source: Some(_),
                ..
            })
        ));
    }

    #[test]
    fn save_image_refuses_existing_destination() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("taken.png");
        fs::write(&path, b"keep me").unwrap();
        let codec = RecordingCodec::new(small_image());
        let settings = ImageSettings::with_format(ImageFormat::Png);

        let result = save_image(&codec, &small_image(), &path, false, &settings, None);
        assert!(matches!(result, Err(ConvertError::DestinationExists { .. })));
        assert_eq!(fs::read(&path).unwrap(), b"keep me");
        assert!(codec.calls().is_empty());

        save_image(&codec, &small_image(), &path, true, &settings, None).unwrap();
        assert!(!path.exists());
        assert_eq!(codec.raster_calls().len(), 1);
    }

    #[test]
    fn unremovable_destination_cannot_be_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let result = prepare_destination(dir.path(), true);
        assert!(matches!(result, Err(ConvertError::CannotOverwrite { .. })));
        assert!(dir.path().exists());
    }
}
