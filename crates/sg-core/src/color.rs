use crate::{Error, Image, ImageView};

/// One RGB pixel, channels in `R, G, B` order.
pub type Rgb8 = [u8; 3];

/// Validates an interleaved byte buffer and packs it into an RGB image.
///
/// Only 3-channel input is accepted; anything else is rejected with
/// [`Error::UnsupportedChannels`] rather than guessed at.
pub fn from_interleaved(
    width: usize,
    height: usize,
    channels: usize,
    bytes: &[u8],
) -> Result<Image<Rgb8>, Error> {
    if channels != 3 {
        return Err(Error::UnsupportedChannels { channels });
    }

    let expected = width
        .checked_mul(height)
        .and_then(|n| n.checked_mul(channels))
        .ok_or(Error::SizeMismatch {
            expected: usize::MAX,
            actual: bytes.len(),
        })?;
    if bytes.len() != expected {
        return Err(Error::SizeMismatch {
            expected,
            actual: bytes.len(),
        });
    }

    let pixels = bytes
        .chunks_exact(3)
        .map(|px| [px[0], px[1], px[2]])
        .collect();
    Image::from_vec(width, height, pixels)
}

// BT.601 luma in Q14 fixed point; the weights sum to 1 << 14.
const W_R: u32 = 4899;
const W_G: u32 = 9617;
const W_B: u32 = 1868;
const SHIFT: u32 = 14;

pub fn to_gray(img: &ImageView<'_, Rgb8>) -> Image<u8> {
    let mut out = Vec::with_capacity(img.width() * img.height());
    for y in 0..img.height() {
        for px in img.row(y) {
            let [r, g, b] = *px;
            let acc = W_R * u32::from(r) + W_G * u32::from(g) + W_B * u32::from(b);
            out.push(((acc + (1 << (SHIFT - 1))) >> SHIFT) as u8);
        }
    }

    Image::from_vec(img.width(), img.height(), out).expect("one gray sample per pixel")
}
