//! OCR 텍스트 추출.
//!
//! `leptess` 기반 Tesseract 래퍼. `ocr` feature flag 활성화 시에만 빌드된다.
//! Tesseract 호출은 수백 ms가 걸릴 수 있어 `spawn_blocking`으로 감싼다.

use std::path::PathBuf;

use async_trait::async_trait;
use image::RgbaImage;
use tracing::debug;

use vigil_core::error::CoreError;
use vigil_core::ports::ocr_provider::OcrProvider;

/// 로컬 Tesseract OCR — `OcrProvider` 포트 구현
pub struct LocalOcr {
    /// tessdata 경로 (None이면 시스템 기본값)
    tessdata_path: Option<PathBuf>,
}

impl LocalOcr {
    /// 새 OCR 제공자 생성
    pub fn new(tessdata_path: Option<PathBuf>) -> Self {
        Self { tessdata_path }
    }

    /// tessdata 경로 반환
    pub fn tessdata_path(&self) -> Option<&PathBuf> {
        self.tessdata_path.as_ref()
    }
}

#[async_trait]
impl OcrProvider for LocalOcr {
    async fn extract_text(&self, image: &RgbaImage, lang: &str) -> Result<String, CoreError> {
        let (w, h) = image.dimensions();
        if w == 0 || h == 0 {
            return Err(CoreError::Ocr("빈 이미지: 너비 또는 높이가 0".to_string()));
        }

        let tessdata = self
            .tessdata_path
            .as_ref()
            .map(|p| p.to_string_lossy().to_string());
        let lang = lang.to_string();
        let rgba = image.clone();

        // Tesseract는 블로킹 호출 — 별도 스레드에서 실행
        let text = tokio::task::spawn_blocking(move || -> Result<String, CoreError> {
            let mut png = std::io::Cursor::new(Vec::new());
            image::DynamicImage::ImageRgba8(rgba)
                .write_to(&mut png, image::ImageFormat::Png)
                .map_err(|e| CoreError::Ocr(format!("프레임 인코딩 실패: {e}")))?;

            let mut lt = leptess::LepTess::new(tessdata.as_deref(), &lang)
                .map_err(|e| CoreError::Ocr(format!("OCR 초기화 실패: {e}")))?;

            lt.set_image_from_mem(png.get_ref())
                .map_err(|e| CoreError::Ocr(format!("OCR 이미지 설정 실패: {e}")))?;

            lt.get_utf8_text()
                .map_err(|e| CoreError::Ocr(format!("OCR 텍스트 추출 실패: {e}")))
        })
        .await
        .map_err(|e| CoreError::Ocr(format!("OCR 작업 조인 실패: {e}")))??;

        let text = text.trim().to_string();
        debug!("OCR 추출: {}자", text.chars().count());
        Ok(text)
    }

    fn provider_name(&self) -> &str {
        "local-tesseract"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn empty_image_returns_error() {
        let ocr = LocalOcr::new(None);
        let img = RgbaImage::new(0, 0);
        let result = ocr.extract_text(&img, "eng").await;
        assert!(matches!(result.unwrap_err(), CoreError::Ocr(_)));
    }

    #[test]
    fn provider_metadata() {
        let ocr = LocalOcr::new(Some(PathBuf::from("/usr/share/tessdata")));
        assert_eq!(ocr.provider_name(), "local-tesseract");
        assert_eq!(
            ocr.tessdata_path(),
            Some(&PathBuf::from("/usr/share/tessdata"))
        );
    }
}
