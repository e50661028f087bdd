use ndarray::Array2;
use rayon::{
    iter::{IndexedParallelIterator, ParallelIterator},
    slice::ParallelSliceMut,
};

use crate::{
    error::{MarchingSquaresError, Result},
    image::Image,
    types::{Intensity, Value},
};

/// Number of colour channels touched by the filters; anything past this (alpha) is copied.
const COLOR_CHANNELS: usize = 3;

/// Channel weights for grayscale conversion.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Weights {
    /// ITU-R BT.601 luma: `0.299 R + 0.587 G + 0.114 B`.
    #[default]
    Luma,
    /// `0.333` per channel.
    Uniform,
}

impl Weights {
    pub fn rgb(self) -> [Value; 3] {
        match self {
            Weights::Luma => [0.299, 0.587, 0.114],
            Weights::Uniform => [0.333, 0.333, 0.333],
        }
    }
}

/// Replaces R, G and B with their weighted sum, truncated to 8 bits. Alpha is untouched.
///
/// Returns [`MarchingSquaresError::ChannelCount`] for images with fewer than 3 channels.
pub fn to_grayscale(image: &mut Image, weights: Weights) -> Result<()> {
    if image.channels() < COLOR_CHANNELS {
        return Err(MarchingSquaresError::ChannelCount {
            required: COLOR_CHANNELS,
            actual: image.channels(),
        });
    }

    let [wr, wg, wb] = weights.rgb();
    image.for_each_pixel(|_, _, px| {
        let gray = px[0] as Value * wr + px[1] as Value * wg + px[2] as Value * wb;
        let gray = gray as Intensity;
        px[..COLOR_CHANNELS].fill(gray);
    });

    log::debug!(
        "grayscale {:?} over {}x{}",
        weights,
        image.width(),
        image.height()
    );
    Ok(())
}

/// A convolution kernel, indexed `weights[[y, x]]`.
///
/// Tap `(x, y)` reads pixel `(px + x - width / 2, py + y - height / 2)`, so row `0`
/// samples the row below the centre pixel.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    weights: Array2<Value>,
}

impl Kernel {
    /// Builds a kernel from row-major weights.
    ///
    /// Returns [`MarchingSquaresError::InvalidKernel`] for empty kernels and
    /// [`MarchingSquaresError::SizeMismatch`] when `weights` has the wrong length.
    pub fn from_vec(width: usize, height: usize, weights: Vec<Value>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(MarchingSquaresError::InvalidKernel { width, height });
        }
        let expected = width * height;
        let actual = weights.len();
        let weights = Array2::from_shape_vec((height, width), weights)
            .map_err(|_| MarchingSquaresError::SizeMismatch { expected, actual })?;
        Ok(Self { weights })
    }

    /// Box blur: every tap weighs `1 / (width * height)`.
    pub fn mean(width: usize, height: usize) -> Result<Self> {
        let n = (width * height).max(1);
        Self::from_vec(width, height, vec![1.0 / n as Value; width * height])
    }

    /// Horizontal Sobel operator.
    pub fn sobel_x() -> Self {
        Self {
            weights: ndarray::arr2(&[[-1.0, 0.0, 1.0], [-2.0, 0.0, 2.0], [-1.0, 0.0, 1.0]]),
        }
    }

    /// Vertical Sobel operator.
    pub fn sobel_y() -> Self {
        Self {
            weights: ndarray::arr2(&[[-1.0, -2.0, -1.0], [0.0, 0.0, 0.0], [1.0, 2.0, 1.0]]),
        }
    }

    pub fn width(&self) -> usize {
        self.weights.ncols()
    }

    pub fn height(&self) -> usize {
        self.weights.nrows()
    }

    pub fn get(&self, x: usize, y: usize) -> Value {
        self.weights[[y, x]]
    }
}

/// Convolves the colour channels of `image` with `kernel`.
///
/// The kernel is centred on `(width / 2, height / 2)`. Taps outside the image are
/// skipped rather than padded, and sums are clamped to `0..=255`. Channels past the
/// first three are copied unchanged.
pub fn convolve(image: &Image, kernel: &Kernel) -> Image {
    let (width, height, channels) = (image.width(), image.height(), image.channels());
    let (kw, kh) = (kernel.width(), kernel.height());
    let (mid_x, mid_y) = ((kw / 2) as isize, (kh / 2) as isize);
    let color = channels.min(COLOR_CHANNELS);

    let mut out = image.clone();
    let row_len = width * channels;
    if row_len == 0 {
        return out;
    }

    out.as_mut_slice()
        .par_chunks_mut(row_len)
        .enumerate()
        .for_each(|(y, row)| {
            for x in 0..width {
                let mut sums = [0.0 as Value; COLOR_CHANNELS];
                for ky in 0..kh {
                    let sy = y as isize + ky as isize - mid_y;
                    if sy < 0 || sy >= height as isize {
                        continue;
                    }
                    for kx in 0..kw {
                        let sx = x as isize + kx as isize - mid_x;
                        if sx < 0 || sx >= width as isize {
                            continue;
                        }
                        let weight = kernel.get(kx, ky);
                        for (c, sum) in sums.iter_mut().enumerate().take(color) {
                            *sum += image.get(sx as usize, sy as usize, c) as Value * weight;
                        }
                    }
                }
                for (c, sum) in sums.iter().enumerate().take(color) {
                    row[x * channels + c] = sum.round().clamp(0.0, 255.0) as Intensity;
                }
            }
        });

    log::debug!("convolved {}x{} with a {}x{} kernel", width, height, kw, kh);
    out
}

/// In-place [`convolve`].
pub fn apply(image: &mut Image, kernel: &Kernel) {
    *image = convolve(image, kernel);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rgba(width: usize, height: usize, px: [Intensity; 4]) -> Image {
        let mut image = Image::new(width, height, 4);
        image.for_each_pixel(|_, _, p| p.copy_from_slice(&px));
        image
    }

    #[test]
    fn luma_grayscale() {
        let mut image = rgba(1, 1, [255, 0, 0, 7]);
        to_grayscale(&mut image, Weights::Luma).unwrap();
        assert_eq!(image.get(0, 0, 0), 76);
        assert_eq!(image.get(0, 0, 1), 76);
        assert_eq!(image.get(0, 0, 2), 76);
        assert_eq!(image.get(0, 0, 3), 7);
    }

    #[test]
    fn uniform_grayscale_truncates() {
        let mut image = rgba(2, 2, [90, 90, 90, 255]);
        to_grayscale(&mut image, Weights::Uniform).unwrap();
        assert_eq!(image.get(1, 1, 0), 89);
    }

    #[test]
    fn grayscale_needs_three_channels() {
        let mut image = Image::new(2, 2, 1);
        assert!(matches!(
            to_grayscale(&mut image, Weights::Luma),
            Err(MarchingSquaresError::ChannelCount {
                required: 3,
                actual: 1
            })
        ));
    }

    #[test]
    fn kernel_shape_is_checked() {
        assert!(Kernel::from_vec(3, 3, vec![0.0; 8]).is_err());
        assert!(matches!(
            Kernel::mean(0, 3),
            Err(MarchingSquaresError::InvalidKernel {
                width: 0,
                height: 3
            })
        ));
        let k = Kernel::from_vec(2, 1, vec![0.25, 0.75]).unwrap();
        assert_eq!((k.width(), k.height(), k.get(1, 0)), (2, 1, 0.75));
    }

    #[test]
    fn mean_keeps_uniform_interior() {
        let image = rgba(5, 5, [120, 60, 30, 200]);
        let out = convolve(&image, &Kernel::mean(3, 3).unwrap());
        for c in 0..3 {
            let v = out.get(2, 2, c) as i32;
            assert!((v - image.get(2, 2, c) as i32).abs() <= 1);
        }
        assert_eq!(out.get(2, 2, 3), 200);
        // the corner only sees 4 of 9 taps
        assert_eq!(out.get(0, 0, 0), 53);
    }

    #[test]
    fn sobel_is_zero_on_flat_interior() {
        let image = rgba(4, 4, [100, 100, 100, 255]);
        let out = convolve(&image, &Kernel::sobel_x());
        assert_eq!(out.get(1, 1, 0), 0);
        assert_eq!(out.get(2, 2, 2), 0);
        let out = convolve(&image, &Kernel::sobel_y());
        assert_eq!(out.get(1, 2, 1), 0);
    }

    #[test]
    fn sobel_clamps_instead_of_wrapping() {
        // step from 0 to 255 along x saturates at the edge
        let mut image = Image::new(4, 3, 3);
        image.for_each_pixel(|x, _, p| p.fill(if x >= 2 { 255 } else { 0 }));
        let mut out = image.clone();
        apply(&mut out, &Kernel::sobel_x());
        assert_eq!(out.get(1, 1, 0), 255);
        assert_eq!(out.get(2, 1, 0), 255);
        // flat region left of the step
        let out = convolve(&image, &Kernel::sobel_x());
        assert_eq!(out.get(0, 1, 0), 0);
    }
}
