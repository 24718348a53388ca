//! 창 전환 포트.
//!
//! 구현: `vigil-automation` crate (플랫폼별: xdotool / Win32 / osascript)

use async_trait::async_trait;

use crate::error::CoreError;

/// 창 활성화 인터페이스
#[async_trait]
pub trait WindowActivator: Send + Sync {
    /// 제목에 부분 문자열이 포함된(대소문자 무시) 가시 창을 전면으로.
    ///
    /// 일치하는 창이 없으면 `Ok(false)` — 에러가 아니다.
    async fn activate_matching(&self, title_substring: &str) -> Result<bool, CoreError>;

    /// 백엔드 이름 (예: "xdotool", "win32", "noop")
    fn backend_name(&self) -> &str;
}
