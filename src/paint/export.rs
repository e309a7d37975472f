use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use super::raster::Raster;
use crate::error::PaintError;

/// Download name for exported paintings
pub const EXPORT_FILENAME: &str = "masterpiece.png";

/// Encode the raster as an 8-bit RGBA PNG
pub fn encode_png(raster: &Raster) -> Result<Vec<u8>, PaintError> {
    let mut bytes = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut bytes, raster.width(), raster.height());
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(raster.data())?;
        writer.finish()?;
    }
    Ok(bytes)
}

/// `data:image/png;base64,...` form of encoded PNG bytes
pub fn data_uri(png_bytes: &[u8]) -> String {
    format!("data:image/png;base64,{}", STANDARD.encode(png_bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint::color::Color;

    const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn test_png_has_signature_and_decodes() {
        let mut raster = Raster::new(3, 2, Color::WHITE);
        raster.set_pixel(1, 1, Color::rgb(10, 20, 30));

        let bytes = encode_png(&raster).unwrap();
        assert_eq!(&bytes[..8], &PNG_SIGNATURE);

        let decoder = png::Decoder::new(bytes.as_slice());
        let mut reader = decoder.read_info().unwrap();
        let mut pixels = vec![0; reader.output_buffer_size()];
        let info = reader.next_frame(&mut pixels).unwrap();
        assert_eq!((info.width, info.height), (3, 2));
        assert_eq!(&pixels[..info.buffer_size()], raster.data());
    }

    #[test]
    fn test_data_uri_prefix() {
        let uri = data_uri(&[1, 2, 3]);
        assert_eq!(uri, "data:image/png;base64,AQID");
    }
}
