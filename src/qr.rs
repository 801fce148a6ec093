//! QR code rendering.

use image::{ExtendedColorType, GrayImage, ImageEncoder, Luma, codecs::png::PngEncoder, imageops};
use qrcode::{EcLevel, QrCode};

use crate::error::AppError;

/// Render `data` as a square PNG exactly `size` pixels wide.
///
/// The code is drawn with whole-pixel modules at the largest scale that
/// fits, then centered on a white canvas of the requested size.
///
/// # Errors
///
/// Returns `AppError::QrEncoding` if the data does not fit in a QR code,
/// if the code cannot be drawn within `size` pixels, or if PNG encoding fails.
pub fn render_png(data: &str, size: u32) -> Result<Vec<u8>, AppError> {
    let code = QrCode::with_error_correction_level(data.as_bytes(), EcLevel::M)
        .map_err(|e| AppError::QrEncoding(format!("failed to create QR code: {e}")))?;

    let rendered = code
        .render::<Luma<u8>>()
        .max_dimensions(size, size)
        .build();

    if rendered.width() > size || rendered.height() > size {
        return Err(AppError::QrEncoding(format!(
            "QR code needs {}px but image size is {size}px",
            rendered.width()
        )));
    }

    let mut canvas = GrayImage::from_pixel(size, size, Luma([255]));
    let x = i64::from((size - rendered.width()) / 2);
    let y = i64::from((size - rendered.height()) / 2);
    imageops::overlay(&mut canvas, &rendered, x, y);

    let mut png_bytes: Vec<u8> = Vec::new();
    PngEncoder::new(&mut png_bytes)
        .write_image(
            canvas.as_raw(),
            canvas.width(),
            canvas.height(),
            ExtendedColorType::L8,
        )
        .map_err(|e| AppError::QrEncoding(format!("failed to encode QR code PNG: {e}")))?;

    Ok(png_bytes)
}
