//! OCR 제공자 포트.
//!
//! 구현: `vigil-vision` crate (`ocr` feature, leptess 기반)

use async_trait::async_trait;
use image::RgbaImage;

use crate::error::CoreError;

/// OCR 제공자 — 프레임에서 텍스트 추출
///
/// 템플릿 매칭이 임계값에 미달했을 때만 폴백 경로로 호출된다.
/// 키워드 포함 여부 판정은 엔진이 수행한다 (항목별 키워드 재정의 지원).
#[async_trait]
pub trait OcrProvider: Send + Sync {
    /// 이미지에서 텍스트 추출
    ///
    /// - `lang`: Tesseract 언어 코드 (예: "eng", "kor")
    async fn extract_text(&self, image: &RgbaImage, lang: &str) -> Result<String, CoreError>;

    /// 제공자 이름 (예: "local-tesseract")
    fn provider_name(&self) -> &str;
}
