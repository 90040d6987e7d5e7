use asset_common::{
    scene::{ColorSpace, ImageFormat, LoadedImage},
    AssetRef,
};

use crate::error::AssetLoadError;

/// Decodes a PNG, JPEG or BMP file into tightly packed RGBA8 texels.
pub fn decode_image(
    asset: &AssetRef,
    bytes: &[u8],
    color_space: ColorSpace,
) -> Result<LoadedImage, AssetLoadError> {
    let image = image::load_from_memory(bytes)
        .map_err(|error| AssetLoadError::image(asset.clone(), error))?
        .into_rgba8();

    Ok(LoadedImage {
        dimensions: image.dimensions(),
        format: ImageFormat::R8G8B8A8_UNORM,
        color_space,
        bytes: image.into_raw(),
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::AssetLoadErrorKind;

    /// A small PNG with a known colour, for tests that need real image bytes.
    pub fn png_bytes(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
        let image = image::RgbaImage::from_pixel(width, height, image::Rgba(rgba));
        let mut bytes = std::io::Cursor::new(Vec::new());
        image
            .write_to(&mut bytes, image::ImageFormat::Png)
            .unwrap();
        bytes.into_inner()
    }

    #[test]
    fn decodes_png_into_rgba8() {
        let bytes = png_bytes(3, 2, [10, 20, 30, 255]);
        let image = decode_image(&"a.png".into(), &bytes, ColorSpace::SRGB).unwrap();

        assert_eq!(image.dimensions, (3, 2));
        assert_eq!(image.format, ImageFormat::R8G8B8A8_UNORM);
        assert_eq!(image.color_space, ColorSpace::SRGB);
        assert_eq!(image.bytes.len(), 3 * 2 * 4);
        assert_eq!(&image.bytes[..4], &[10, 20, 30, 255]);
    }

    #[test]
    fn decodes_jpeg_backdrops() {
        let image = image::RgbImage::from_pixel(8, 4, image::Rgb([200, 120, 40]));
        let mut bytes = std::io::Cursor::new(Vec::new());
        image
            .write_to(&mut bytes, image::ImageFormat::Jpeg)
            .unwrap();

        let image =
            decode_image(&"space.jpg".into(), bytes.get_ref(), ColorSpace::SRGB).unwrap();
        assert_eq!(image.dimensions, (8, 4));
        assert_eq!(image.format, ImageFormat::R8G8B8A8_UNORM);
        assert_eq!(image.bytes.len(), 8 * 4 * 4);
        // No alpha in a JPEG, so every texel comes out opaque
        assert!(image.bytes.chunks_exact(4).all(|texel| texel[3] == 255));
    }

    #[test]
    fn grayscale_is_expanded_to_rgba8() {
        let image = image::GrayImage::from_pixel(2, 2, image::Luma([90]));
        let mut bytes = std::io::Cursor::new(Vec::new());
        image
            .write_to(&mut bytes, image::ImageFormat::Png)
            .unwrap();

        let image =
            decode_image(&"mask.png".into(), bytes.get_ref(), ColorSpace::Linear).unwrap();
        assert_eq!(image.format, ImageFormat::R8G8B8A8_UNORM);
        assert_eq!(&image.bytes[..4], &[90, 90, 90, 255]);
    }

    #[test]
    fn garbage_is_a_decode_error() {
        let error = decode_image(&"broken.jpg".into(), b"not an image", ColorSpace::SRGB)
            .unwrap_err();
        assert_eq!(error.asset, AssetRef::from_path("broken.jpg"));
        assert!(matches!(error.kind, AssetLoadErrorKind::ImageDecode(_)));
    }
}
