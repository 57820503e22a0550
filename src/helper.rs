//! Rendering a finished [`QrCode`] as SVG, text or an image.
//!
//! Every renderer draws the code's quiet zone as a light border. None of them
//! alter the encoded symbol.

use std::fs;
use std::path::Path;

use image::{ImageBuffer, Luma};

use crate::error::{QrError, Result};
use crate::qrcode::QrCode;

/*---- Utilities ----*/

// Returns a string of SVG code for an image depicting
// the given QR Code, surrounded by its quiet zone.
// The string always uses Unix newlines (\n), regardless of the platform.
pub fn to_svg_string(qr: &QrCode) -> String {
    let border = qr.quiet_zone() as usize;
    let size = qr.size();
    let dimension = size + border * 2;
    let mut result = String::new();
    result += "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";
    result += "<!DOCTYPE svg PUBLIC \"-//W3C//DTD SVG 1.1//EN\" \"http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd\">\n";
    result += &format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" version=\"1.1\" viewBox=\"0 0 {0} {0}\" stroke=\"none\">\n",
        dimension
    );
    result += "\t<rect width=\"100%\" height=\"100%\" fill=\"#FFFFFF\"/>\n";
    result += "\t<path d=\"";
    let mut first = true;
    for y in 0..size {
        for x in 0..size {
            if qr.matrix().is_dark(y, x) {
                if !first {
                    result += " ";
                }
                first = false;
                result += &format!("M{},{}h1v1h-1z", x + border, y + border);
            }
        }
    }
    result += "\" fill=\"#000000\"/>\n";
    result += "</svg>\n";
    result
}

/// Renders the code as text, two characters per module so it looks square in
/// a terminal. Dark modules are `█`, light ones spaces; lines end with `\n`.
pub fn to_ascii(qr: &QrCode) -> String {
    let border = qr.quiet_zone() as i32;
    let size = qr.size() as i32;
    let mut out = String::new();
    for y in -border..size + border {
        for x in -border..size + border {
            let c = if qr.get_module(x, y) { '█' } else { ' ' };
            out.push(c);
            out.push(c);
        }
        out.push('\n');
    }
    out
}

/// Prints the given QrCode object to the console.
pub fn print_qr(qr: &QrCode) {
    println!("{}", to_ascii(qr));
}

/// Draws the code into a grayscale buffer, `module_px` pixels per module.
///
/// # Errors
///
/// Returns [`QrError::InvalidOption`] when `module_px` is zero or the image
/// side would overflow `u32`.
///
/// # Example
///
/// ```rust
/// use qrcraft::{generate, helper::to_image_buffer, EncodeOptions};
///
/// let qr = generate("Hello, World!", &EncodeOptions::default()).unwrap();
/// let img = to_image_buffer(&qr, 1).unwrap();
/// assert_eq!(img.width(), qr.size() as u32 + 8);
/// ```
pub fn to_image_buffer(qr: &QrCode, module_px: u32) -> Result<ImageBuffer<Luma<u8>, Vec<u8>>> {
    if module_px == 0 {
        return Err(QrError::InvalidOption("module_px must be at least 1".into()));
    }
    let border = qr.quiet_zone();
    let side = u32::try_from(qr.size())
        .ok()
        .and_then(|s| border.checked_mul(2).and_then(|b| b.checked_add(s)))
        .and_then(|modules| modules.checked_mul(module_px))
        .ok_or_else(|| QrError::InvalidOption("image dimensions overflow".into()))?;

    let mut img = ImageBuffer::new(side, side);
    for (x, y, pixel) in img.enumerate_pixels_mut() {
        let qr_x = (x / module_px) as i64 - i64::from(border);
        let qr_y = (y / module_px) as i64 - i64::from(border);
        let dark = i32::try_from(qr_x)
            .ok()
            .zip(i32::try_from(qr_y).ok())
            .map_or(false, |(qx, qy)| qr.get_module(qx, qy));
        *pixel = if dark {
            Luma([0u8]) // Black
        } else {
            Luma([255u8]) // White
        };
    }
    Ok(img)
}

/// Renders the code with [`to_image_buffer`] and saves it as a PNG file,
/// creating the parent directory if it does not exist.
pub fn save_png<P: AsRef<Path>>(qr: &QrCode, path: P, module_px: u32) -> Result<()> {
    let path = path.as_ref();
    let img = to_image_buffer(qr, module_px)?;
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() && !dir.exists() {
            fs::create_dir_all(dir).map_err(image::ImageError::IoError)?;
        }
    }
    img.save_with_format(path, image::ImageFormat::Png)?;
    Ok(())
}
