use ndarray::{Array3, Axis};

use crate::{
    error::{MarchingSquaresError, Result},
    field::Field,
    types::{Intensity, Value},
};

/// An 8-bit raster with interleaved channels.
///
/// Pixels are stored as `data[[y, x, channel]]`; row `0` is the bottom row, matching
/// [`Field`].
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    data: Array3<Intensity>,
}

impl Image {
    /// Creates a `width × height` image with `channels` zeroed channels.
    pub fn new(width: usize, height: usize, channels: usize) -> Self {
        Self {
            data: Array3::zeros((height, width, channels)),
        }
    }

    /// Builds an image from interleaved row-major bytes, bottom row first.
    ///
    /// Returns [`MarchingSquaresError::SizeMismatch`] if the length doesn't match.
    pub fn from_vec(
        width: usize,
        height: usize,
        channels: usize,
        data: Vec<Intensity>,
    ) -> Result<Self> {
        let expected = width * height * channels;
        let actual = data.len();
        let data = Array3::from_shape_vec((height, width, channels), data)
            .map_err(|_| MarchingSquaresError::SizeMismatch { expected, actual })?;
        Ok(Self { data })
    }

    /// The fallback RGBA test image: red ramps left to right, green bottom to top.
    pub fn gradient(width: usize, height: usize) -> Self {
        let mut image = Self::new(width, height, 4);
        image.for_each_pixel(|x, y, px| {
            px[0] = normalized_to_intensity(x as Value / width as Value);
            px[1] = normalized_to_intensity(y as Value / height as Value);
            px[2] = normalized_to_intensity(0.5);
            px[3] = 255;
        });
        image
    }

    pub fn width(&self) -> usize {
        self.data.dim().1
    }

    pub fn height(&self) -> usize {
        self.data.dim().0
    }

    pub fn channels(&self) -> usize {
        self.data.dim().2
    }

    pub fn get(&self, x: usize, y: usize, channel: usize) -> Intensity {
        self.data[[y, x, channel]]
    }

    pub fn set(&mut self, x: usize, y: usize, channel: usize, v: Intensity) {
        self.data[[y, x, channel]] = v
    }

    /// Stores a `[0, 1]` value, rounded and clamped to `0..=255`.
    pub fn set_normalized(&mut self, x: usize, y: usize, channel: usize, v: Value) {
        self.set(x, y, channel, normalized_to_intensity(v))
    }

    /// Calls `f(x, y, pixel)` for every pixel, where `pixel` holds all channels.
    pub fn for_each_pixel<F>(&mut self, mut f: F)
    where
        F: FnMut(usize, usize, &mut [Intensity]),
    {
        let (width, channels) = (self.width(), self.channels());
        if width == 0 || channels == 0 {
            return;
        }
        for (i, px) in self.as_mut_slice().chunks_exact_mut(channels).enumerate() {
            f(i % width, i / width, px);
        }
    }

    /// Interleaved samples, bottom row first.
    pub(crate) fn as_mut_slice(&mut self) -> &mut [Intensity] {
        // `data` is only ever built in standard layout
        self.data.as_slice_mut().unwrap_or_default()
    }

    /// The underlying `[[y, x, channel]]` array.
    pub fn as_array(&self) -> &Array3<Intensity> {
        &self.data
    }

    /// Copies one channel into a [`Field`] for contouring.
    pub fn channel(&self, channel: usize) -> Result<Field> {
        let channels = self.channels();
        if channel >= channels {
            return Err(MarchingSquaresError::ChannelOutOfRange { channel, channels });
        }
        Ok(Field::from_array(
            self.data.index_axis(Axis(2), channel).to_owned(),
        ))
    }
}

pub(crate) fn normalized_to_intensity(v: Value) -> Intensity {
    (v * 255.0).round().clamp(0.0, 255.0) as Intensity
}
