//! 입력 드라이버 포트.
//!
//! 마우스/키보드 조작을 위한 크로스 플랫폼 인터페이스를 정의한다.

use async_trait::async_trait;

use crate::error::CoreError;

/// 입력 드라이버 — 마우스/키보드 시뮬레이션 인터페이스
///
/// 구현체: `EnigoInputDriver` (실제 입력), `NoOpInputDriver` (테스트/드라이런)
#[async_trait]
pub trait InputDriver: Send + Sync {
    /// 마우스를 절대 좌표로 즉시 이동
    async fn mouse_move(&self, x: i32, y: i32) -> Result<(), CoreError>;

    /// 마우스를 지정 시간에 걸쳐 절대 좌표로 이동 (0이면 즉시)
    async fn mouse_move_over(&self, x: i32, y: i32, duration_ms: u64) -> Result<(), CoreError>;

    /// 현재 포인터 위치에서 왼쪽 버튼 클릭
    async fn click(&self) -> Result<(), CoreError>;

    /// 키 입력 (이름 기반, 예: "enter", "esc", "f5", 단일 문자)
    async fn key_press(&self, key: &str) -> Result<(), CoreError>;

    /// 플랫폼 이름 (예: "macos", "windows", "linux", "noop")
    fn platform(&self) -> &str;
}
