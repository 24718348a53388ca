//! # vigil-engine
//!
//! 감지 엔진 크레이트. 감시 항목 레지스트리, 주기적 감지 루프
//! (캡처 → 매칭 → OCR 폴백 → 에지 트리거 → 액션 발화),
//! 관찰용 이벤트 브로드캐스트를 담당한다.

pub mod detector;
pub mod event;
pub mod registry;

pub use detector::{Detector, RunSummary};
pub use event::DetectorEvent;
pub use registry::WatchRegistry;
