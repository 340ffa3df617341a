#![no_main]

use imagetool::operations::ImageOperation;
use imagetool::{ImageSettings, Rect, Size};
use imagetool_fuzz::{convert_and_check, StructuredImage};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|input: (StructuredImage, u8, u8, u8, u8)| {
    let (image, x, y, width, height) = input;
    let rect = Rect::new(x.into(), y.into(), width.into(), height.into());
    let (image_width, image_height) = (image.width.get() as u32, image.height.get() as u32);

    let settings = ImageSettings {
        edit: [ImageOperation::Crop(rect)].into_iter().collect(),
        ..Default::default()
    };
    let info = convert_and_check(&image, "cropped.png", &settings);

    // crops are clamped to the image, and ignored when nothing of the image is left
    let expected = if rect.x >= image_width || rect.y >= image_height || rect.width == 0 || rect.height == 0 {
        Size::new(image_width, image_height)
    } else {
        Size::new(
            rect.width.min(image_width - rect.x),
            rect.height.min(image_height - rect.y),
        )
    };
    assert_eq!(info.size, expected);
});
