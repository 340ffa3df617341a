use std::{num::NonZeroU8, path::Path};

use arbitrary::Unstructured;
use image::ImageFormat;

/// A small RGB image built from fuzzer input
#[derive(Debug)]
pub struct StructuredImage {
    pub width: NonZeroU8,
    pub height: NonZeroU8,
    rgb_data: Vec<u8>,
}

impl StructuredImage {
    pub fn save_as_png(&self, path: impl AsRef<Path>) -> image::ImageResult<()> {
        let (width, height) = (self.width.get() as u32, self.height.get() as u32);
        let img = image::RgbImage::from_fn(width, height, |x, y| {
            let idx = (y * width + x) as usize * 3;
            image::Rgb([
                self.rgb_data[idx],
                self.rgb_data[idx + 1],
                self.rgb_data[idx + 2],
            ])
        });
        img.save_with_format(path, ImageFormat::Png)
    }
}

impl<'a> arbitrary::Arbitrary<'a> for StructuredImage {
    fn arbitrary(unstructured: &mut Unstructured<'a>) -> arbitrary::Result<Self> {
        let width: NonZeroU8 = unstructured.arbitrary()?;
        let height: NonZeroU8 = unstructured.arbitrary()?;
        let rgb_data_len = width.get() as usize * height.get() as usize * 3;
        let rgb_data = unstructured.bytes(rgb_data_len)?;

        Ok(Self {
            width,
            height,
            rgb_data: rgb_data.to_vec(),
        })
    }
}

/// Converts `image` with `settings` and checks that the written file has the reported size.
pub fn convert_and_check(
    image: &StructuredImage,
    destination_name: &str,
    settings: &imagetool::ImageSettings,
) -> imagetool::ImageInfo {
    let temp_directory = tempfile::tempdir().expect("failed to create temporary directory");
    let input_path = temp_directory.path().join("input_image.png");
    image
        .save_as_png(&input_path)
        .expect("failed to save image as PNG");
    let output_path = temp_directory.path().join(destination_name);

    let info = imagetool::convert(
        &input_path,
        &output_path,
        settings,
        imagetool::ConvertOptions::default(),
    )
    .expect("conversion failed");

    let written = image::open(&output_path).expect("could not open the output file");
    assert_eq!(
        (written.width(), written.height()),
        (info.size.width, info.size.height),
        "{}",
        output_path.display()
    );
    info
}
