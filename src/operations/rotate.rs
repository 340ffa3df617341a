//! Image rotation in quarter turns.

use crate::image::Image;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Rotation {
    Clockwise90,
    Clockwise180,
    Clockwise270,
}

pub fn rotate(image: &mut Image, rotation: Rotation) {
    image.pixels = match rotation {
        Rotation::Clockwise90 => image.pixels.rotate90(),
        Rotation::Clockwise180 => image.pixels.rotate180(),
        Rotation::Clockwise270 => image.pixels.rotate270(),
    };
}
