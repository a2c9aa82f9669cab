//! PNG encoding for RGBA image data.
//!
//! Writes truecolor-with-alpha (color type 6) images, with an optional
//! `pHYs` chunk so viewers and print tools pick up the intended DPI.

use std::io::Write;

/// PNG file signature.
pub const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

const METERS_PER_INCH: f64 = 0.0254;

/// Pixels per meter for a resolution in dots per inch (96 dpi = 3780).
pub fn dpi_to_pixels_per_meter(dpi: u32) -> u32 {
    (dpi as f64 / METERS_PER_INCH).round() as u32
}

/// Create a PNG image from RGBA pixel data.
///
/// # Arguments
/// - `pixels`: straight (non-premultiplied) RGBA, 4 bytes per pixel
/// - `width`: Image width in pixels
/// - `height`: Image height in pixels
/// - `dpi`: resolution recorded in a `pHYs` chunk, if any
pub fn create_png(
    pixels: &[u8],
    width: usize,
    height: usize,
    dpi: Option<u32>,
) -> Result<Vec<u8>, String> {
    if pixels.len() != width * height * 4 {
        return Err(format!(
            "pixel buffer holds {} bytes, {}x{} RGBA needs {}",
            pixels.len(),
            width,
            height,
            width * height * 4
        ));
    }

    let mut png = Vec::new();
    png.extend_from_slice(&PNG_SIGNATURE);

    // IHDR chunk
    let mut ihdr_data = Vec::with_capacity(13);
    ihdr_data.extend_from_slice(&(width as u32).to_be_bytes());
    ihdr_data.extend_from_slice(&(height as u32).to_be_bytes());
    ihdr_data.push(8); // bit depth
    ihdr_data.push(6); // color type (RGBA)
    ihdr_data.push(0); // compression method
    ihdr_data.push(0); // filter method
    ihdr_data.push(0); // interlace method
    write_chunk(&mut png, b"IHDR", &ihdr_data);

    // pHYs chunk: x and y pixels per unit, unit 1 = meter
    if let Some(dpi) = dpi {
        let ppm = dpi_to_pixels_per_meter(dpi).to_be_bytes();
        let mut phys_data = Vec::with_capacity(9);
        phys_data.extend_from_slice(&ppm);
        phys_data.extend_from_slice(&ppm);
        phys_data.push(1);
        write_chunk(&mut png, b"pHYs", &phys_data);
    }

    let idat_data =
        deflate_idat(pixels, width, height).map_err(|e| format!("IDAT compression failed: {}", e))?;
    write_chunk(&mut png, b"IDAT", &idat_data);

    write_chunk(&mut png, b"IEND", &[]);

    Ok(png)
}

/// Write a PNG chunk
fn write_chunk(png: &mut Vec<u8>, chunk_type: &[u8; 4], data: &[u8]) {
    png.extend_from_slice(&(data.len() as u32).to_be_bytes());
    png.extend_from_slice(chunk_type);
    png.extend_from_slice(data);

    let mut hasher = crc32fast::Hasher::new();
    hasher.update(chunk_type);
    hasher.update(data);
    png.extend_from_slice(&hasher.finalize().to_be_bytes());
}

/// Deflate RGBA scanlines for the IDAT chunk, using the Sub filter on every
/// row. Large flat fills compress far better than unfiltered.
fn deflate_idat(pixels: &[u8], width: usize, height: usize) -> std::io::Result<Vec<u8>> {
    let stride = width * 4;
    let mut filtered = Vec::with_capacity(height * (1 + stride));

    for row in pixels.chunks_exact(stride.max(1)).take(height) {
        filtered.push(1); // filter type: Sub
        for (i, &byte) in row.iter().enumerate() {
            let left = if i >= 4 { row[i - 4] } else { 0 };
            filtered.push(byte.wrapping_sub(left));
        }
    }

    let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(&filtered)?;
    encoder.finish()
}

/// Find a chunk by type and return its data.
pub fn find_chunk<'a>(png: &'a [u8], chunk_type: &[u8; 4]) -> Option<&'a [u8]> {
    let mut pos = PNG_SIGNATURE.len();
    while pos + 8 <= png.len() {
        let len = u32::from_be_bytes(png[pos..pos + 4].try_into().ok()?) as usize;
        let kind = &png[pos + 4..pos + 8];
        let data = png.get(pos + 8..pos + 8 + len)?;
        if kind == chunk_type {
            return Some(data);
        }
        pos += 12 + len;
    }
    None
}
