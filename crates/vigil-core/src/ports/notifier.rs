//! 데스크톱 알림 포트.
//!
//! 구현: `vigil-automation` crate (notify-rust 기반)

use async_trait::async_trait;

use crate::error::CoreError;

/// 데스크톱 알림 인터페이스
#[async_trait]
pub trait DesktopNotifier: Send + Sync {
    /// 알림 표시 (제목 + 본문)
    async fn show(&self, title: &str, body: &str) -> Result<(), CoreError>;
}
