use sg_core::{Image, ImageView, Rgb8, to_gray};
use sg_morph::{bitor, close, threshold_above};

use crate::config::MaskConfig;

/// The three binary masks every later stage reads.
#[derive(Debug, Clone, PartialEq)]
pub struct Masks {
    /// Near-white shape interiors.
    pub fill: Image<u8>,
    /// Near-black outlines.
    pub stroke: Image<u8>,
    /// `close(fill | stroke)`.
    pub foreground: Image<u8>,
}

impl Masks {
    pub fn width(&self) -> usize {
        self.fill.width()
    }

    pub fn height(&self) -> usize {
        self.fill.height()
    }
}

pub fn build_masks(image: &ImageView<'_, Rgb8>, cfg: &MaskConfig) -> Masks {
    let gray = to_gray(image);
    masks_from_gray(&gray, cfg)
}

pub fn masks_from_gray(gray: &Image<u8>, cfg: &MaskConfig) -> Masks {
    let fill = threshold_above(&gray.as_view(), cfg.fill_threshold);
    let inverted = invert_levels(gray);
    let stroke = threshold_above(&inverted.as_view(), cfg.stroke_threshold);
    let foreground = close(&bitor(&fill, &stroke).as_view(), cfg.close_kernel);

    Masks {
        fill,
        stroke,
        foreground,
    }
}

fn invert_levels(gray: &Image<u8>) -> Image<u8> {
    gray.map(|&v| 255 - v)
}

#[cfg(test)]
mod tests {
    use sg_core::Image;
    use sg_morph::count_nonzero;

    use super::masks_from_gray;
    use crate::config::MaskConfig;

    #[test]
    fn only_extreme_levels_are_classified() {
        let gray = Image::from_vec(5, 1, vec![0u8, 1, 200, 254, 255]).expect("valid image");
        let masks = masks_from_gray(&gray, &MaskConfig::default());

        assert_eq!(masks.stroke.data(), &[255, 0, 0, 0, 0]);
        assert_eq!(masks.fill.data(), &[0, 0, 0, 0, 255]);
        assert_eq!(count_nonzero(&masks.foreground), 2);
    }

    #[test]
    fn closing_bridges_one_pixel_gaps() {
        let mut data = vec![200u8; 9 * 9];
        for y in 2..7 {
            for x in 2..7 {
                data[y * 9 + x] = 0;
            }
        }
        data[4 * 9 + 4] = 128;
        let gray = Image::from_vec(9, 9, data).expect("valid image");
        let masks = masks_from_gray(&gray, &MaskConfig::default());

        assert_eq!(masks.stroke.get(4, 4), Some(&0));
        assert_eq!(masks.foreground.get(4, 4), Some(&255));
        assert_eq!(masks.foreground.get(0, 0), Some(&0));
    }
}
