//! 데스크톱 알림 어댑터.
//!
//! `DesktopNotifier` 포트 구현. notify-rust 기반.

use async_trait::async_trait;
use notify_rust::Notification;
use tracing::debug;

use vigil_core::error::CoreError;
use vigil_core::ports::notifier::DesktopNotifier;

/// 앱 이름 (알림 발신자 표시용)
const APP_NAME: &str = "VIGIL";

/// 데스크톱 알림 어댑터 — notify-rust 기반
pub struct NotifyRustNotifier;

impl NotifyRustNotifier {
    /// 새 알림 어댑터 생성
    pub fn new() -> Self {
        Self
    }
}

impl Default for NotifyRustNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DesktopNotifier for NotifyRustNotifier {
    async fn show(&self, title: &str, body: &str) -> Result<(), CoreError> {
        debug!("알림: {title}");

        Notification::new()
            .summary(title)
            .body(body)
            .appname(APP_NAME)
            .show()
            .map_err(|e| CoreError::Effect(format!("알림 표시 실패: {e}")))?;

        Ok(())
    }
}

/// No-Op 알림 — 테스트/드라이런용
pub struct NoOpNotifier;

#[async_trait]
impl DesktopNotifier for NoOpNotifier {
    async fn show(&self, title: &str, _body: &str) -> Result<(), CoreError> {
        debug!(title, "[NoOp] 알림");
        Ok(())
    }
}
