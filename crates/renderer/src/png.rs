//! PNG encoding for 8-bit gray and RGB image data.
//!
//! Geographic extents travel with the image as `tEXt` chunks so downstream
//! tools can re-attach coordinates without the source GeoTIFF.

use std::io::Write;

/// PNG color type of the encoded samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PngColor {
    /// Color type 0, one byte per pixel.
    Gray,
    /// Color type 2, three bytes per pixel.
    Rgb,
}

impl PngColor {
    fn color_type(&self) -> u8 {
        match self {
            PngColor::Gray => 0,
            PngColor::Rgb => 2,
        }
    }

    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            PngColor::Gray => 1,
            PngColor::Rgb => 3,
        }
    }
}

const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// Create a PNG image from row-major 8-bit pixel data.
///
/// # Arguments
/// - `pixels`: `width * height * bytes_per_pixel` bytes, row by row
/// - `width`: Image width in pixels
/// - `height`: Image height in pixels
/// - `color`: Gray or RGB
/// - `text`: `tEXt` keyword/value pairs written before the image data
pub fn create_png(
    pixels: &[u8],
    width: usize,
    height: usize,
    color: PngColor,
    text: &[(&str, String)],
) -> Result<Vec<u8>, String> {
    let row_len = width * color.bytes_per_pixel();
    if pixels.len() != row_len * height {
        return Err(format!(
            "expected {} bytes for {}x{} {:?}, got {}",
            row_len * height,
            width,
            height,
            color,
            pixels.len()
        ));
    }

    let mut png = Vec::new();

    // PNG signature
    png.extend_from_slice(&PNG_SIGNATURE);

    // IHDR chunk
    let mut ihdr_data = Vec::with_capacity(13);
    ihdr_data.extend_from_slice(&(width as u32).to_be_bytes());
    ihdr_data.extend_from_slice(&(height as u32).to_be_bytes());
    ihdr_data.push(8); // bit depth
    ihdr_data.push(color.color_type());
    ihdr_data.push(0); // compression method
    ihdr_data.push(0); // filter method
    ihdr_data.push(0); // interlace method
    write_chunk(&mut png, b"IHDR", &ihdr_data);

    // tEXt chunks
    for (keyword, value) in text {
        if keyword.is_empty() || keyword.len() > 79 || keyword.contains('\0') {
            return Err(format!("invalid tEXt keyword {:?}", keyword));
        }
        let mut data = Vec::with_capacity(keyword.len() + 1 + value.len());
        data.extend_from_slice(keyword.as_bytes());
        data.push(0);
        data.extend_from_slice(value.as_bytes());
        write_chunk(&mut png, b"tEXt", &data);
    }

    // IDAT chunk (image data)
    let idat_data = deflate_idat(pixels, row_len, height)
        .map_err(|e| format!("IDAT compression failed: {}", e))?;
    write_chunk(&mut png, b"IDAT", &idat_data);

    // IEND chunk
    write_chunk(&mut png, b"IEND", &[]);

    Ok(png)
}

/// Collect the `tEXt` keyword/value pairs of an encoded PNG.
pub fn text_chunks(png: &[u8]) -> Vec<(String, String)> {
    let mut out = Vec::new();
    if png.len() < PNG_SIGNATURE.len() || png[..8] != PNG_SIGNATURE {
        return out;
    }

    let mut pos = 8;
    while pos + 8 <= png.len() {
        let len = u32::from_be_bytes([png[pos], png[pos + 1], png[pos + 2], png[pos + 3]]) as usize;
        let kind = &png[pos + 4..pos + 8];
        let data_end = pos + 8 + len;
        if data_end + 4 > png.len() {
            break;
        }
        if kind == b"tEXt" {
            let data = &png[pos + 8..data_end];
            if let Some(nul) = data.iter().position(|b| *b == 0) {
                out.push((
                    String::from_utf8_lossy(&data[..nul]).into_owned(),
                    String::from_utf8_lossy(&data[nul + 1..]).into_owned(),
                ));
            }
        }
        pos = data_end + 4;
    }
    out
}

/// Write a PNG chunk
fn write_chunk(png: &mut Vec<u8>, chunk_type: &[u8; 4], data: &[u8]) {
    // Write length
    png.extend_from_slice(&(data.len() as u32).to_be_bytes());

    // Write chunk type
    png.extend_from_slice(chunk_type);

    // Write data
    png.extend_from_slice(data);

    // Write CRC over type and data
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(chunk_type);
    hasher.update(data);
    png.extend_from_slice(&hasher.finalize().to_be_bytes());
}

/// Deflate image rows for the IDAT chunk.
fn deflate_idat(
    pixels: &[u8],
    row_len: usize,
    height: usize,
) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    // Add filter byte (0 = no filter) to each scanline
    let mut uncompressed = Vec::with_capacity(height * (1 + row_len));
    for row in pixels.chunks_exact(row_len.max(1)).take(height) {
        uncompressed.push(0); // filter type: none
        uncompressed.extend_from_slice(row);
    }

    let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(&uncompressed)?;
    let compressed = encoder.finish()?;

    Ok(compressed)
}
