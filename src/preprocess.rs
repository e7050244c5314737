//! Image preprocessing
//!
//! Turns an uploaded image into the model's input tensor: RGB, resized to a
//! square frame, scaled into [0, 1], channel-last with a leading batch
//! dimension of one (`[1, H, W, 3]`).

use image::imageops::FilterType;
use tract_onnx::prelude::*;

/// Side length of the square input frame
pub const INPUT_SIZE: u32 = 128;

/// Number of colour channels fed to the model
pub const CHANNELS: usize = 3;

/// Decode `bytes` and build a `[1, size, size, 3]` f32 tensor
pub fn image_to_tensor(bytes: &[u8], size: u32) -> Result<Tensor, image::ImageError> {
    let image = image::load_from_memory(bytes)?;

    // Exact resize without preserving aspect ratio, nearest neighbour like
    // the loader the model was trained with
    let resized = image.resize_exact(size, size, FilterType::Nearest).to_rgb8();

    let side = size as usize;
    let array = tract_ndarray::Array4::from_shape_fn((1, side, side, CHANNELS), |(_, y, x, c)| {
        resized.get_pixel(x as u32, y as u32)[c] as f32 / 255.0
    });

    Ok(array.into())
}
