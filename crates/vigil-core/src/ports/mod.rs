//! 포트 인터페이스 (trait).
//!
//! Hexagonal Architecture의 포트 레이어.
//! 각 어댑터 crate가 이 trait들을 구현하며,
//! `vigil-app`에서 `Arc<dyn T>`로 와이어링한다.
//!
//! 감지 엔진은 포트에만 의존하므로 가짜 구현으로 격리 테스트가 가능하다.

pub mod audio;
pub mod frame_source;
pub mod input_driver;
pub mod notifier;
pub mod ocr_provider;
pub mod window;
