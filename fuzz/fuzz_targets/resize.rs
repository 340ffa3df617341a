#![no_main]

use std::num::NonZeroU8;

use imagetool::operations::ImageOperation;
use imagetool::{ImageFormat, ImageSettings, Size};
use imagetool_fuzz::{convert_and_check, StructuredImage};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|input: (StructuredImage, NonZeroU8, NonZeroU8)| {
    let (image, new_width, new_height) = input;
    let new_size = Size::new(new_width.get() as u32, new_height.get() as u32);

    let settings = ImageSettings {
        edit: [ImageOperation::Resize(new_size)].into_iter().collect(),
        ..ImageSettings::with_format(ImageFormat::Jpeg)
    };
    let info = convert_and_check(&image, "resized.jpg", &settings);

    assert_eq!(info.format, ImageFormat::Jpeg);
    assert_eq!(info.size, new_size);
});
