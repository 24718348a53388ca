//! # vigil-automation
//!
//! 이펙트 어댑터 크레이트.
//! 상승 에지에서 실행되는 부수 효과 — 포인터/키보드 입력, 데스크톱 알림,
//! 사운드 재생, 창 전면 전환 — 의 포트 구현과, 액션별 실패를 격리하며
//! 순서대로 발화하는 `EffectDispatcher`를 제공한다.

pub mod audio;
pub mod dispatcher;
pub mod input_driver;
pub mod notifier;
pub mod window;
