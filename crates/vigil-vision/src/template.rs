//! 템플릿/마스크 디코딩.
//!
//! 참조 이미지는 로드 시점에 한 번 그레이스케일로 변환해 고정한다.
//! 템플릿 디코딩 실패는 루프 에러가 아니라 영구 비활성 항목을 만든다.

use std::path::Path;

use image::GrayImage;
use tracing::warn;

use vigil_core::error::CoreError;

use crate::grayscale::to_luma;

/// 참조 이미지를 그레이스케일 템플릿으로 로드
///
/// 디코딩 실패는 `None` — 해당 감시 항목은 영구 비활성이 되며
/// 경고만 남긴다.
pub fn load_template(path: &Path) -> Option<GrayImage> {
    match image::open(path) {
        Ok(img) => Some(to_luma(&img.to_rgba8())),
        Err(e) => {
            warn!("템플릿 디코딩 실패 — 비활성 항목: {}: {e}", path.display());
            None
        }
    }
}

/// 마스크 이미지를 이진 버퍼로 로드
///
/// 그레이스케일 변환 후 휘도 1 이하를 0, 나머지를 255로 이진화한다.
/// 매칭은 0이 아닌 픽셀만 포함으로 취급한다.
pub fn load_mask(path: &Path) -> Result<GrayImage, CoreError> {
    let img = image::open(path)
        .map_err(|e| CoreError::Decode(format!("마스크 디코딩 실패: {}: {e}", path.display())))?;
    let mut mask = to_luma(&img.to_rgba8());
    for pixel in mask.pixels_mut() {
        pixel.0[0] = if pixel.0[0] > 1 { 255 } else { 0 };
    }
    Ok(mask)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn write_png(dir: &tempfile::TempDir, name: &str, w: u32, h: u32) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut img = RgbaImage::new(w, h);
        for (x, y, p) in img.enumerate_pixels_mut() {
            *p = Rgba([(x * 40) as u8, (y * 40) as u8, 128, 255]);
        }
        img.save(&path).unwrap();
        path
    }

    #[test]
    fn load_template_decodes_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(&dir, "template.png", 6, 4);

        let template = load_template(&path).unwrap();
        assert_eq!(template.dimensions(), (6, 4));
    }

    #[test]
    fn missing_template_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_template(&dir.path().join("nope.png")).is_none());
    }

    #[test]
    fn corrupt_template_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"not an image").unwrap();
        assert!(load_template(&path).is_none());
    }

    #[test]
    fn load_mask_decodes_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(&dir, "mask.png", 6, 4);
        let mask = load_mask(&path).unwrap();
        assert_eq!(mask.dimensions(), (6, 4));
    }

    #[test]
    fn mask_is_binarized_at_threshold_one() {
        // 휘도 0/1은 제외(0), 2 이상은 포함(255)
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mask.png");
        let values = [0u8, 1, 2, 128, 255];
        let mut img = RgbaImage::new(values.len() as u32, 1);
        for (x, &v) in values.iter().enumerate() {
            img.put_pixel(x as u32, 0, Rgba([v, v, v, 255]));
        }
        img.save(&path).unwrap();

        let mask = load_mask(&path).unwrap();
        let expected = [0u8, 0, 255, 255, 255];
        for (x, &e) in expected.iter().enumerate() {
            assert_eq!(mask.get_pixel(x as u32, 0).0[0], e, "x = {x}");
        }
    }

    #[test]
    fn missing_mask_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_mask(&dir.path().join("nope.png")).unwrap_err();
        assert!(matches!(err, CoreError::Decode(_)));
    }
}
