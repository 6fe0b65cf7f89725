//! Upload normalization
//!
//! Every upload is decoded, turned upright according to its orientation tag,
//! flattened to 8-bit RGB and re-encoded as JPEG, whatever format the phone
//! sent.

use std::io::Cursor;

use image::{DynamicImage, ImageDecoder, ImageReader, RgbImage, codecs::jpeg::JpegEncoder};
use thiserror::Error;

/// JPEG quality used for every stored image
pub const JPEG_QUALITY: u8 = 95;

/// Extension of every stored image
pub const STORED_EXTENSION: &str = "jpg";

#[derive(Debug, Error)]
pub enum ImageProcessingError {
    /// The bytes are not an image this server can read
    #[error("Unsupported or corrupt image: {0}")]
    Decode(String),

    #[error("Failed to encode JPEG: {0}")]
    Encode(String),
}

/// Result of normalizing one upload
#[derive(Debug)]
pub struct NormalizedImage {
    pub jpeg: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Decode, orient, flatten and re-encode an uploaded image
pub fn normalize_upload(bytes: &[u8]) -> Result<NormalizedImage, ImageProcessingError> {
    let upright = decode_upright(bytes)?;
    let jpeg = encode_jpeg(&upright)?;
    Ok(NormalizedImage {
        jpeg,
        width: upright.width(),
        height: upright.height(),
    })
}

/// Decode `bytes` and apply the embedded orientation tag, if any
pub fn decode_upright(bytes: &[u8]) -> Result<RgbImage, ImageProcessingError> {
    let decode_error = |e: image::ImageError| ImageProcessingError::Decode(e.to_string());

    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| ImageProcessingError::Decode(e.to_string()))?;
    let mut decoder = reader.into_decoder().map_err(decode_error)?;
    let orientation_tag = match decoder.orientation() {
        Ok(orientation) => orientation.to_exif(),
        Err(e) => {
            tracing::debug!("Ignoring unreadable orientation metadata: {}", e);
            1
        }
    };
    let image = DynamicImage::from_decoder(decoder).map_err(decode_error)?;

    tracing::debug!(
        "Decoded {}x{} image, orientation tag {}",
        image.width(),
        image.height(),
        orientation_tag
    );
    Ok(apply_orientation(image, orientation_tag).to_rgb8())
}

/// Rotate according to an EXIF orientation tag.
///
/// Angles below are counter-clockwise: 3 → 180°, 6 → 270°, 8 → 90°. Every
/// other value, mirrored ones included, leaves the image as it is.
pub fn apply_orientation(image: DynamicImage, orientation_tag: u8) -> DynamicImage {
    // `rotate90`/`rotate270` turn clockwise.
    match orientation_tag {
        3 => image.rotate180(),
        6 => image.rotate90(),
        8 => image.rotate270(),
        _ => image,
    }
}

pub fn encode_jpeg(image: &RgbImage) -> Result<Vec<u8>, ImageProcessingError> {
    let mut buffer = Vec::new();
    JpegEncoder::new_with_quality(&mut buffer, JPEG_QUALITY)
        .encode_image(image)
        .map_err(|e| ImageProcessingError::Encode(e.to_string()))?;
    Ok(buffer)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, Rgba, RgbaImage};

    /// 32x16 image: left half red, right half blue
    pub(crate) fn upright_fixture() -> RgbImage {
        RgbImage::from_fn(32, 16, |x, _| {
            if x < 16 {
                Rgb([255, 0, 0])
            } else {
                Rgb([0, 0, 255])
            }
        })
    }

    pub(crate) fn png_bytes(image: &DynamicImage) -> Vec<u8> {
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    /// JPEG bytes carrying an EXIF APP1 segment with only an orientation tag
    fn jpeg_with_orientation(image: &RgbImage, orientation_tag: u8) -> Vec<u8> {
        let plain = encode_jpeg(image).unwrap();

        let mut exif = Vec::new();
        exif.extend_from_slice(b"Exif\0\0");
        exif.extend_from_slice(b"MM\0\x2a\0\0\0\x08"); // big-endian TIFF header, IFD at 8
        exif.extend_from_slice(&[0x00, 0x01]); // one entry
        exif.extend_from_slice(&[0x01, 0x12, 0x00, 0x03, 0x00, 0x00, 0x00, 0x01]);
        exif.extend_from_slice(&[0x00, orientation_tag, 0x00, 0x00]);
        exif.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]); // no next IFD

        let segment_length = (exif.len() + 2) as u16;
        let mut bytes = vec![0xFF, 0xD8, 0xFF, 0xE1];
        bytes.extend_from_slice(&segment_length.to_be_bytes());
        bytes.extend_from_slice(&exif);
        bytes.extend_from_slice(&plain[2..]);
        bytes
    }

    fn is_red(pixel: &Rgb<u8>) -> bool {
        pixel[0] > 200 && pixel[2] < 60
    }

    fn is_blue(pixel: &Rgb<u8>) -> bool {
        pixel[2] > 200 && pixel[0] < 60
    }

    #[test]
    fn test_supported_orientations_restore_identical_pixels() {
        // テスト項目: 3/6/8 の各向きタグで保存された画像がすべて同じ正立画像に戻る
        // given (前提条件): 各タグが示す向きでカメラが保存した画像
        let upright = DynamicImage::ImageRgb8(upright_fixture());
        let stored = [
            (3, upright.rotate180()),
            (6, upright.rotate270()),
            (8, upright.rotate90()),
        ];

        for (tag, image) in stored {
            // when (操作):
            let restored = apply_orientation(image, tag).to_rgb8();

            // then (期待する結果):
            assert_eq!(restored, upright_fixture(), "orientation tag {}", tag);
        }
    }

    #[test]
    fn test_other_orientation_values_pass_through() {
        // テスト項目: 未対応（反転を含む）の向きタグでは画像が変更されない
        // given (前提条件):
        let image = DynamicImage::ImageRgb8(upright_fixture());

        for tag in [0, 1, 2, 4, 5, 7, 9] {
            // when (操作):
            let result = apply_orientation(image.clone(), tag).to_rgb8();

            // then (期待する結果):
            assert_eq!(result, upright_fixture(), "orientation tag {}", tag);
        }
    }

    #[test]
    fn test_decode_upright_reads_exif_orientation() {
        // テスト項目: JPEG の EXIF 向きタグに従って正立画像にデコードされる
        // given (前提条件):
        let upright = DynamicImage::ImageRgb8(upright_fixture());
        let stored = [
            (3, upright.rotate180().to_rgb8()),
            (6, upright.rotate270().to_rgb8()),
            (8, upright.rotate90().to_rgb8()),
        ];

        for (tag, image) in stored {
            // when (操作):
            let decoded = decode_upright(&jpeg_with_orientation(&image, tag)).unwrap();

            // then (期待する結果): JPEG の誤差を許容して色の配置を確認する
            assert_eq!(decoded.dimensions(), (32, 16), "orientation tag {}", tag);
            assert!(is_red(decoded.get_pixel(4, 8)), "orientation tag {}", tag);
            assert!(is_blue(decoded.get_pixel(27, 8)), "orientation tag {}", tag);
        }
    }

    #[test]
    fn test_alpha_is_flattened_to_rgb() {
        // テスト項目: アルファ付き PNG が 3 チャンネルの JPEG に変換される
        // given (前提条件):
        let rgba = RgbaImage::from_pixel(8, 8, Rgba([10, 200, 30, 128]));
        let bytes = png_bytes(&DynamicImage::ImageRgba8(rgba));

        // when (操作):
        let normalized = normalize_upload(&bytes).unwrap();

        // then (期待する結果):
        assert_eq!((normalized.width, normalized.height), (8, 8));
        let reloaded = image::load_from_memory(&normalized.jpeg).unwrap();
        assert_eq!(
            image::guess_format(&normalized.jpeg).unwrap(),
            ImageFormat::Jpeg
        );
        assert_eq!(reloaded.color(), image::ColorType::Rgb8);
    }

    #[test]
    fn test_garbage_bytes_are_a_decode_error() {
        // テスト項目: 画像でないバイト列は Decode エラーになる
        // given (前提条件):
        let bytes = b"definitely not an image";

        // when (操作):
        let result = normalize_upload(bytes);

        // then (期待する結果):
        assert!(matches!(result, Err(ImageProcessingError::Decode(_))));
    }

    #[test]
    fn test_truncated_png_is_a_decode_error() {
        // テスト項目: 途中で切れた PNG は Decode エラーになる
        // given (前提条件):
        let bytes = png_bytes(&DynamicImage::ImageRgb8(upright_fixture()));
        let truncated = &bytes[..bytes.len() / 2];

        // when (操作):
        let result = normalize_upload(truncated);

        // then (期待する結果):
        assert!(matches!(result, Err(ImageProcessingError::Decode(_))));
    }
}
