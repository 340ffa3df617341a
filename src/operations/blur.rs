use crate::image::Image;

pub fn blur(image: &mut Image, sigma: f32) {
    if sigma.is_nan() || sigma <= 0.0 {
        return;
    }
    image.pixels = image.pixels.blur(sigma);
}

#[cfg(test)]
mod tests {
    use image::{DynamicImage, GenericImageView, GrayImage, Luma};

    use super::*;

    fn dot() -> Image {
        let mut pixels = GrayImage::new(9, 9);
        pixels.put_pixel(4, 4, Luma([255]));
        Image::new(DynamicImage::ImageLuma8(pixels))
    }

    #[test]
    fn spreads_a_single_bright_pixel() {
        let mut image = dot();
        blur(&mut image, 1.5);
        let center = image.pixels.get_pixel(4, 4).0[0];
        let neighbor = image.pixels.get_pixel(5, 4).0[0];
        assert!(center < 255);
        assert!(neighbor > 0);
        assert_eq!(image.pixels.dimensions(), (9, 9));
    }

    #[test]
    fn meaningless_sigma_is_ignored() {
        for sigma in [0.0, -2.0, f32::NAN] {
            let mut image = dot();
            blur(&mut image, sigma);
            assert_eq!(image.pixels.as_bytes(), dot().pixels.as_bytes());
        }
    }
}
