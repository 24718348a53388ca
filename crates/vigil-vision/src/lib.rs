//! # vigil-vision
//!
//! 감지 파이프라인의 이미지 처리 크레이트.
//! 화면 캡처, 그레이스케일 변환, 마스크 지원 정규화 상관 매칭,
//! 템플릿/마스크 디코딩, OCR 텍스트 추출을 담당한다.

pub mod capture;
pub mod grayscale;
pub mod matcher;
#[cfg(feature = "ocr")]
pub mod ocr;
pub mod template;
