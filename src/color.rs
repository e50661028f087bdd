use crate::{image::Image, types::Value};

/// Converts HSV to RGB.
///
/// `h` is in degrees, `s` and `v` in `[0, 1]`. Hues of `360` and above fall outside
/// the six sectors and yield the grey `(v - c, v - c, v - c)`.
///
/// ```text
///  c  = v · s
///  h' = h / 60
///  x  = c · (1 − |h' mod 2 − 1|)
///  m  = v − c
/// ```
pub fn hsv_to_rgb(h: Value, s: Value, v: Value) -> [Value; 3] {
    let c = v * s;
    let h_prime = h / 60.0;
    let x = c * (1.0 - ((h_prime % 2.0) - 1.0).abs());

    let [r, g, b] = match h_prime {
        hp if hp < 1.0 => [c, x, 0.0],
        hp if hp < 2.0 => [x, c, 0.0],
        hp if hp < 3.0 => [0.0, c, x],
        hp if hp < 4.0 => [0.0, x, c],
        hp if hp < 5.0 => [x, 0.0, c],
        hp if hp < 6.0 => [c, 0.0, x],
        _ => [0.0, 0.0, 0.0],
    };

    let m = v - c;
    [r + m, g + m, b + m]
}

/// Color under a picker position: `x` selects the hue, `y` the saturation, value is `1`.
pub fn picker_rgb(x: Value, y: Value) -> [Value; 3] {
    hsv_to_rgb(x * 360.0, y, 1.0)
}

/// RGBA image of the hue/saturation plane, hue along x and saturation along y.
pub fn picker_image(width: usize, height: usize) -> Image {
    let mut image = Image::new(width, height, 4);
    for y in 0..height {
        for x in 0..width {
            let rgb = picker_rgb(x as Value / width as Value, y as Value / height as Value);
            for (c, v) in rgb.into_iter().enumerate() {
                image.set_normalized(x, y, c, v);
            }
            image.set(x, y, 3, 255);
        }
    }
    image
}
