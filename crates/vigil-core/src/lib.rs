//! # vigil-core
//!
//! VIGIL 도메인 모델, 포트(trait) 정의, 에러 타입.
//! 모든 크레이트가 공유하는 핵심 타입과 인터페이스를 제공한다.
//!
//! ## 구조
//!
//! - [`models`] — 도메인 데이터 구조체 (감시 항목, 프레임, 좌표)
//! - [`ports`] — Hexagonal Architecture 포트 인터페이스 (async_trait)
//! - [`error`] — 핵심 에러 타입 (thiserror)
//! - [`config`] — 애플리케이션 설정 구조체

pub mod config;
pub mod error;
pub mod models;
pub mod ports;

#[cfg(test)]
mod tests {
    use crate::config::AppConfig;

    #[test]
    fn config_defaults() {
        let config = AppConfig::default_config();
        assert_eq!(config.detector.tick_interval_ms, 100);
        assert_eq!(config.detector.ocr_lang, "eng");
        assert_eq!(config.detector.ocr_keyword, "skip");
        assert!(config.watches.is_empty());
    }

    #[test]
    fn config_serde_roundtrip() {
        let config = AppConfig::default_config();
        let json = serde_json::to_string(&config).unwrap();
        let back: AppConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.detector.tick_interval_ms, config.detector.tick_interval_ms);
        assert_eq!(back.detector.ocr_keyword, config.detector.ocr_keyword);
    }
}
