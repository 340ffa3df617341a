use std::borrow::Cow;
use std::collections::BTreeMap;
use std::io::Cursor;

use exif::{Context, Field, In, Tag, Value};
use image::DynamicImage;

use crate::metadata::{MetadataBag, PropertyCategory};

/// Tags that describe how the source container stores its pixels.
/// They are meaningless once the pixels are re-encoded, and the EXIF writer rejects some of them.
const LAYOUT_TAGS: [Tag; 22] = [
    Tag::ImageWidth,
    Tag::ImageLength,
    Tag::PixelXDimension,
    Tag::PixelYDimension,
    Tag::BitsPerSample,
    Tag::Compression,
    Tag::PhotometricInterpretation,
    Tag::SamplesPerPixel,
    Tag::RowsPerStrip,
    Tag::PlanarConfiguration,
    // Predictor, ExtraSamples and SampleFormat have no named constants
    Tag(Context::Tiff, 317),
    Tag(Context::Tiff, 338),
    Tag(Context::Tiff, 339),
    Tag::ExifIFDPointer,
    Tag::GPSInfoIFDPointer,
    Tag::InteropIFDPointer,
    Tag::StripOffsets,
    Tag::StripByteCounts,
    Tag::TileOffsets,
    Tag::TileByteCounts,
    Tag::JPEGInterchangeFormat,
    Tag::JPEGInterchangeFormatLength,
];

/// Extracts the raw EXIF blob from any container the EXIF reader understands
/// (JPEG, PNG, TIFF, HEIF, WebP).
pub(crate) fn read_from_container(bytes: &[u8]) -> Option<Vec<u8>> {
    let exif = exif::Reader::new()
        .read_from_container(&mut Cursor::new(bytes))
        .ok()?;
    Some(exif.buf().to_vec())
}

/// Parses a raw EXIF blob and sorts its fields by the directory they came from.
pub(crate) fn split_into_categories(
    raw_exif: Vec<u8>,
) -> Result<BTreeMap<PropertyCategory, Vec<Field>>, exif::Error> {
    let exif = exif::Reader::new().read_raw(raw_exif)?;
    let mut categories: BTreeMap<PropertyCategory, Vec<Field>> = BTreeMap::new();
    for field in exif.fields() {
        if LAYOUT_TAGS.contains(&field.tag) {
            continue;
        }
        categories
            .entry(category_of(field))
            .or_default()
            .push(field.clone());
    }
    Ok(categories)
}

fn category_of(field: &Field) -> PropertyCategory {
    if field.ifd_num != In::PRIMARY {
        return PropertyCategory::Thumbnail;
    }
    match field.tag.context() {
        Context::Tiff => PropertyCategory::Tiff,
        Context::Gps => PropertyCategory::Gps,
        Context::Interop => PropertyCategory::Interop,
        _ if field.tag == Tag::MakerNote => PropertyCategory::MakerNote,
        _ => PropertyCategory::Exif,
    }
}

/// Serializes fields into a big-endian EXIF blob (TIFF structure, no `Exif\0\0` prefix),
/// optionally with a JPEG thumbnail in IFD1.
pub(crate) fn write_blob(fields: &[&Field], thumbnail: Option<&[u8]>) -> Result<Vec<u8>, exif::Error> {
    let mut writer = exif::experimental::Writer::new();
    // values the reader could not decode cannot be written back
    for field in fields.iter().filter(|f| !matches!(f.value, Value::Unknown(..))) {
        writer.push_field(field);
    }
    if let Some(jpeg) = thumbnail {
        writer.set_jpeg(jpeg, In::THUMBNAIL);
    }
    let mut blob = Cursor::new(Vec::new());
    writer.write(&mut blob, false)?;
    Ok(blob.into_inner())
}

/// The EXIF orientation (1 to 8) recorded in the bag's TIFF category
pub fn orientation(bag: &MetadataBag) -> Option<u32> {
    bag.get(PropertyCategory::Tiff)?
        .fields()
        .iter()
        .find(|field| field.tag == Tag::Orientation && field.ifd_num == In::PRIMARY)?
        .value
        .get_uint(0)
}

/// Returns the image as it should be displayed given its EXIF orientation.
/// Values outside of 1 to 8 are ignored.
pub fn apply_orientation(image: &DynamicImage, orientation: u32) -> Cow<'_, DynamicImage> {
    // An explanation of Exif orientation:
    // https://web.archive.org/web/20200412005226/https://www.impulseadventure.com/photo/exif-orientation.html
    let oriented = match orientation {
        2 => image.fliph(),
        3 => image.rotate180(),
        4 => image.flipv(),
        5 => image.rotate90().fliph(),
        6 => image.rotate90(),
        7 => image.rotate270().fliph(),
        8 => image.rotate270(),
        _ => return Cow::Borrowed(image),
    };
    Cow::Owned(oriented)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::Properties;

    fn orientation_field(value: u16) -> Field {
        Field {
            tag: Tag::Orientation,
            ifd_num: In::PRIMARY,
            value: Value::Short(vec![value]),
        }
    }

    #[test]
    fn orientation_is_read_from_tiff_category() {
        let mut bag = MetadataBag::new();
        assert_eq!(orientation(&bag), None);
        bag.insert(
            PropertyCategory::Tiff,
            Properties::Fields(vec![orientation_field(6)]),
        );
        assert_eq!(orientation(&bag), Some(6));
    }

    #[test]
    fn sideways_orientations_swap_dimensions() {
        let image = DynamicImage::new_rgb8(30, 20);
        for value in 5..=8 {
            let oriented = apply_orientation(&image, value);
            assert_eq!((oriented.width(), oriented.height()), (20, 30));
        }
        for value in [0, 1, 2, 3, 4, 9] {
            let oriented = apply_orientation(&image, value);
            assert_eq!((oriented.width(), oriented.height()), (30, 20));
        }
        assert!(matches!(apply_orientation(&image, 1), Cow::Borrowed(_)));
    }

    #[test]
    fn thumbnail_fields_are_kept_apart() {
        let primary = orientation_field(3);
        let mut thumbnail = orientation_field(1);
        thumbnail.ifd_num = In::THUMBNAIL;
        assert_eq!(category_of(&primary), PropertyCategory::Tiff);
        assert_eq!(category_of(&thumbnail), PropertyCategory::Thumbnail);
    }

    #[test]
    fn blob_round_trips_through_the_reader() {
        let make = Field {
            tag: Tag::Make,
            ifd_num: In::PRIMARY,
            value: Value::Ascii(vec![b"Acme".to_vec()]),
        };
        let unknown = Field {
            tag: Tag(Context::Exif, 0xbeef),
            ifd_num: In::PRIMARY,
            value: Value::Unknown(7, 1, 0),
        };
        let blob = write_blob(&[&make, &orientation_field(6), &unknown], None).unwrap();
        let categories = split_into_categories(blob).unwrap();
        let tiff = &categories[&PropertyCategory::Tiff];
        assert_eq!(tiff.len(), 2);
        assert!(tiff.iter().any(|f| f.tag == Tag::Make));
        assert!(!categories.contains_key(&PropertyCategory::Exif));
    }

    #[test]
    fn layout_tags_are_not_captured() {
        let width = Field {
            tag: Tag::ImageWidth,
            ifd_num: In::PRIMARY,
            value: Value::Long(vec![640]),
        };
        let predictor = Field {
            tag: Tag(Context::Tiff, 317),
            ifd_num: In::PRIMARY,
            value: Value::Short(vec![2]),
        };
        let sample_format = Field {
            tag: Tag(Context::Tiff, 339),
            ifd_num: In::PRIMARY,
            value: Value::Short(vec![1, 1, 1]),
        };
        let pixel_width = Field {
            tag: Tag::PixelXDimension,
            ifd_num: In::PRIMARY,
            value: Value::Long(vec![640]),
        };
        let exposure = Field {
            tag: Tag::ExposureTime,
            ifd_num: In::PRIMARY,
            value: Value::Rational(vec![(1, 60).into()]),
        };
        let fields = [
            &width,
            &predictor,
            &sample_format,
            &pixel_width,
            &exposure,
            &orientation_field(1),
        ];
        let blob = write_blob(&fields, None).unwrap();
        let categories = split_into_categories(blob).unwrap();
        let tiff = &categories[&PropertyCategory::Tiff];
        assert_eq!(tiff.len(), 1);
        assert_eq!(tiff[0].tag, Tag::Orientation);
        // pixel dimensions no longer hold once the image is edited
        let exif = &categories[&PropertyCategory::Exif];
        assert_eq!(exif.len(), 1);
        assert_eq!(exif[0].tag, Tag::ExposureTime);
    }
}
