use crate::{
    filter::Weights,
    image::Image,
    types::{Intensity, Value},
};

const SHORT_RAMP: &str = "@%#*+=-:. ";
const LONG_RAMP: &str =
    "$@B%8&WM#*oahkbdpqwmZO0QLCJUYXzcvunxrjft/\\|()1{}[]?-_+~<>i!lI;:,\"^`'. ";

/// Glyph table ordered from dense (dark) to sparse (light).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Ramp {
    /// 10 glyphs.
    #[default]
    Short,
    /// 70 glyphs.
    Long,
}

impl Ramp {
    pub fn glyphs(self) -> &'static [u8] {
        match self {
            Ramp::Short => SHORT_RAMP.as_bytes(),
            Ramp::Long => LONG_RAMP.as_bytes(),
        }
    }

    /// Glyph for a luminance value; `0` maps to the first glyph, `255` to the last.
    pub fn glyph(self, luminance: Intensity) -> char {
        let glyphs = self.glyphs();
        let index = luminance as usize * (glyphs.len() - 1) / 255;
        glyphs[index] as char
    }
}

/// Renders `image` as ASCII art, one line per row with the top row first.
///
/// Luminance is channel `0` for single- and dual-channel images and the luma of
/// R, G, B otherwise.
pub fn to_ascii(image: &Image, ramp: Ramp) -> String {
    let (width, height) = (image.width(), image.height());
    let mut out = String::with_capacity((width + 1) * height);

    for y in (0..height).rev() {
        for x in 0..width {
            out.push(ramp.glyph(luminance(image, x, y)));
        }
        out.push('\n');
    }
    out
}

fn luminance(image: &Image, x: usize, y: usize) -> Intensity {
    if image.channels() < 3 {
        return image.get(x, y, 0);
    }
    let [wr, wg, wb] = Weights::Luma.rgb();
    let lum = image.get(x, y, 0) as Value * wr
        + image.get(x, y, 1) as Value * wg
        + image.get(x, y, 2) as Value * wb;
    lum.clamp(0.0, 255.0) as Intensity
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ramps_are_ascii() {
        assert_eq!(Ramp::Short.glyphs().len(), 10);
        assert_eq!(Ramp::Long.glyphs().len(), 70);
        assert_eq!(Ramp::Long.glyph(0), '$');
        assert_eq!(Ramp::Long.glyph(255), ' ');
    }

    #[test]
    fn black_and_white() {
        let black = Image::new(2, 1, 3);
        assert_eq!(to_ascii(&black, Ramp::Short), "@@\n");

        let mut white = Image::new(2, 1, 1);
        white.for_each_pixel(|_, _, px| px[0] = 255);
        assert_eq!(to_ascii(&white, Ramp::Short), "  \n");
    }

    #[test]
    fn top_row_comes_first() {
        let mut image = Image::new(1, 2, 1);
        image.set(0, 1, 0, 255);
        assert_eq!(to_ascii(&image, Ramp::Short), " \n@\n");
    }

    #[test]
    fn mid_gray_maps_inside_the_ramp() {
        assert_eq!(Ramp::Short.glyph(128), '+');
    }

    #[test]
    fn empty_image_is_empty_text() {
        assert_eq!(to_ascii(&Image::new(0, 0, 3), Ramp::Long), "");
    }
}
