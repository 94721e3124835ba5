use std::path::Path;

use image::imageops::{self, FilterType};
use image::io::Reader;
use image::RgbImage;
use ndarray::Array4;

use crate::error::PredictError;

/// Side length of the square input the classifier was trained on.
pub const INPUT_SIZE: u32 = 128;

/// Decodes an image file (format sniffed from its bytes) into the `[1, H, W, 3]` model input.
pub fn load_input(path: &Path) -> Result<Array4<f32>, PredictError> {
    let reader = Reader::open(path)
        .and_then(Reader::with_guessed_format)
        .map_err(PredictError::Read)?;
    let img = reader.decode()?;
    Ok(to_input(&img.to_rgb8()))
}

/// Stretches to `INPUT_SIZE`x`INPUT_SIZE` with nearest sampling and scales channels to [0, 1].
pub fn to_input(rgb: &RgbImage) -> Array4<f32> {
    let resized = imageops::resize(rgb, INPUT_SIZE, INPUT_SIZE, FilterType::Nearest);

    let size = INPUT_SIZE as usize;
    Array4::from_shape_fn((1, size, size, 3), |(_, y, x, c)| {
        resized.get_pixel(x as u32, y as u32)[c] as f32 / 255.0
    })
}
