use image::imageops::{flip_horizontal_in_place, flip_vertical_in_place};

use crate::image::Image;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

pub fn flip(image: &mut Image, axis: Axis) {
    match axis {
        Axis::Horizontal => flip_horizontal_in_place(&mut image.pixels),
        Axis::Vertical => flip_vertical_in_place(&mut image.pixels),
    };
}
