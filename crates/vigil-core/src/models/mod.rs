//! 도메인 데이터 모델.
//!
//! 감지 파이프라인이 공유하는 구조체를 정의한다.

pub mod frame;
pub mod geometry;
pub mod watch;
