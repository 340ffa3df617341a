//! Source image properties carried over to the output.

use std::collections::BTreeMap;

use crate::{error::BackendError, image::Image};

/// Groups of image properties, named after the dictionaries they come from
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display)]
pub enum PropertyCategory {
    Gps,
    Exif,
    Tiff,
    /// Camera maker specific data (the EXIF MakerNote)
    MakerNote,
    Iptc,
    /// EXIF interoperability IFD
    Interop,
    /// Tags describing the embedded thumbnail (IFD1)
    Thumbnail,
}

impl PropertyCategory {
    /// Categories forwarded to raster writers, in lookup order.
    /// Anything else in a bag is never written.
    pub const FORWARDED: [PropertyCategory; 5] = [
        PropertyCategory::Gps,
        PropertyCategory::Exif,
        PropertyCategory::Tiff,
        PropertyCategory::MakerNote,
        PropertyCategory::Iptc,
    ];

    pub fn is_forwarded(self) -> bool {
        Self::FORWARDED.contains(&self)
    }
}

/// Payload of one category. Not interpreted beyond what writing it back requires.
#[derive(Debug, Clone)]
pub enum Properties {
    Fields(Vec<exif::Field>),
    Raw(Vec<u8>),
}

impl Properties {
    /// Parsed fields; empty for raw payloads
    pub fn fields(&self) -> &[exif::Field] {
        match self {
            Properties::Fields(fields) => fields,
            Properties::Raw(_) => &[],
        }
    }

    pub fn raw(&self) -> Option<&[u8]> {
        match self {
            Properties::Fields(_) => None,
            Properties::Raw(bytes) => Some(bytes),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Properties::Fields(fields) => fields.is_empty(),
            Properties::Raw(bytes) => bytes.is_empty(),
        }
    }
}

/// Properties captured from a source image, read-only once captured.
#[derive(Debug, Clone, Default)]
pub struct MetadataBag {
    entries: BTreeMap<PropertyCategory, Properties>,
}

impl MetadataBag {
    pub fn new() -> Self {
        Default::default()
    }

    /// Reads the EXIF and IPTC blobs the decoder left on the image.
    pub fn capture(image: &Image) -> Result<MetadataBag, BackendError> {
        let mut bag = MetadataBag::new();
        if let Some(raw_exif) = &image.exif {
            let categories = crate::exif::split_into_categories(raw_exif.clone())
                .map_err(|e| BackendError::from(format!("unreadable EXIF: {e}")))?;
            for (category, fields) in categories {
                bag.insert(category, Properties::Fields(fields));
            }
        }
        if let Some(iptc) = &image.iptc {
            bag.insert(PropertyCategory::Iptc, Properties::Raw(iptc.clone()));
        }
        Ok(bag)
    }

    /// Empty payloads are not stored, so a present category always has content.
    pub fn insert(&mut self, category: PropertyCategory, properties: Properties) {
        if properties.is_empty() {
            self.entries.remove(&category);
        } else {
            self.entries.insert(category, properties);
        }
    }

    pub fn get(&self, category: PropertyCategory) -> Option<&Properties> {
        self.entries.get(&category)
    }

    pub fn contains(&self, category: PropertyCategory) -> bool {
        self.entries.contains_key(&category)
    }

    pub fn categories(&self) -> impl Iterator<Item = PropertyCategory> + '_ {
        self.entries.keys().copied()
    }

    /// The allow-listed categories present in the bag
    pub fn forwarded(&self) -> impl Iterator<Item = (PropertyCategory, &Properties)> + '_ {
        PropertyCategory::FORWARDED
            .into_iter()
            .filter_map(|category| self.get(category).map(|properties| (category, properties)))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use exif::{Field, In, Tag, Value};
    use image::DynamicImage;

    use super::*;

    fn field(tag: Tag, value: Value) -> Field {
        Field {
            tag,
            ifd_num: In::PRIMARY,
            value,
        }
    }

    #[test]
    fn empty_payloads_are_not_stored() {
        let mut bag = MetadataBag::new();
        bag.insert(PropertyCategory::Exif, Properties::Fields(Vec::new()));
        bag.insert(PropertyCategory::Iptc, Properties::Raw(Vec::new()));
        assert!(bag.is_empty());
    }

    #[test]
    fn forwarded_skips_unlisted_categories() {
        let mut bag = MetadataBag::new();
        let interop = field(Tag::InteroperabilityIndex, Value::Ascii(vec![b"R98".to_vec()]));
        bag.insert(PropertyCategory::Interop, Properties::Fields(vec![interop]));
        bag.insert(PropertyCategory::Iptc, Properties::Raw(vec![1, 2, 3]));
        let forwarded: Vec<PropertyCategory> = bag.forwarded().map(|(c, _)| c).collect();
        assert_eq!(forwarded, vec![PropertyCategory::Iptc]);
        assert_eq!(bag.len(), 2);
    }

    #[test]
    fn capture_splits_exif_by_directory() {
        let gps = field(Tag::GPSLatitudeRef, Value::Ascii(vec![b"N".to_vec()]));
        let exposure = field(Tag::ExposureTime, Value::Rational(vec![(1, 250).into()]));
        let make = field(Tag::Make, Value::Ascii(vec![b"Acme".to_vec()]));
        let maker_note = field(Tag::MakerNote, Value::Undefined(vec![7, 7, 7], 0));
        let blob = crate::exif::write_blob(&[&gps, &exposure, &make, &maker_note], None).unwrap();

        let mut image = Image::new(DynamicImage::new_rgb8(1, 1));
        image.exif = Some(blob);
        image.iptc = Some(vec![0x1c, 0x02, 0x05]);
        let bag = MetadataBag::capture(&image).unwrap();

        let categories: Vec<PropertyCategory> = bag.categories().collect();
        assert_eq!(
            categories,
            vec![
                PropertyCategory::Gps,
                PropertyCategory::Exif,
                PropertyCategory::Tiff,
                PropertyCategory::MakerNote,
                PropertyCategory::Iptc,
            ]
        );
        let exif_fields = bag.get(PropertyCategory::Exif).unwrap().fields();
        assert_eq!(exif_fields.len(), 1);
        assert_eq!(exif_fields[0].tag, Tag::ExposureTime);
        assert_eq!(
            bag.get(PropertyCategory::Iptc).unwrap().raw(),
            Some(&[0x1c, 0x02, 0x05][..])
        );
    }

    #[test]
    fn garbage_exif_fails_capture() {
        let mut image = Image::new(DynamicImage::new_rgb8(1, 1));
        image.exif = Some(b"definitely not TIFF".to_vec());
        assert!(MetadataBag::capture(&image).is_err());
    }
}
