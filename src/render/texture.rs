use crate::error::{AssetKind, LoadError};
use image::{imageops, imageops::FilterType, ImageError, RgbaImage};
use std::path::Path;

/// Decode any supported image file into RGBA8, the engine-native format.
pub fn decode_rgba(path: &Path) -> Result<RgbaImage, LoadError> {
    if !path.is_file() {
        return Err(LoadError::MissingAsset {
            kind: AssetKind::Texture,
            path: path.to_path_buf(),
        });
    }
    let img = image::open(path).map_err(|source| match source {
        ImageError::IoError(e) => LoadError::io(path, e),
        source => LoadError::UnsupportedTextureFormat {
            path: path.to_path_buf(),
            source,
        },
    })?;
    Ok(img.to_rgba8())
}

/// Stretch `img` to a `size x size` square. Nearest-neighbour keeps
/// pixel art crisp.
pub fn scale_to_tile(img: &RgbaImage, size: u32) -> RgbaImage {
    if img.width() == size && img.height() == size {
        return img.clone();
    }
    imageops::resize(img, size, size, FilterType::Nearest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use std::fs;

    #[test]
    fn missing_file_is_missing_asset() {
        let err = decode_rgba(Path::new("/nope/tile.png")).unwrap_err();
        assert!(matches!(
            err,
            LoadError::MissingAsset {
                kind: AssetKind::Texture,
                ..
            }
        ));
    }

    #[test]
    fn garbage_bytes_are_unsupported() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("tile.png");
        fs::write(&path, b"definitely not a png").expect("write");
        let err = decode_rgba(&path).unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedTextureFormat { .. }));
    }

    #[test]
    fn decodes_png_and_scales() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("tile.png");
        RgbaImage::from_pixel(4, 4, Rgba([10, 20, 30, 255]))
            .save(&path)
            .expect("save");

        let img = decode_rgba(&path).expect("decode");
        let scaled = scale_to_tile(&img, 16);
        assert_eq!(scaled.dimensions(), (16, 16));
        assert!(scaled.pixels().all(|p| *p == Rgba([10, 20, 30, 255])));
    }
}
