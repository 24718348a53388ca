//! 프레임 소스 포트.
//!
//! 구현: `vigil-vision` crate (xcap 기반)

use async_trait::async_trait;

use crate::error::CoreError;
use crate::models::frame::CapturedFrame;
use crate::models::geometry::Region;

/// 프레임 소스 — 화면 픽셀 캡처 인터페이스
///
/// 캡처는 틱 주기보다 짧게 끝나야 하며, 실패는 호출자가 로깅하고
/// 해당 틱에서 그 감시 항목을 건너뛴다. 루프를 중단시키는 실패는 없다.
#[async_trait]
pub trait FrameSource: Send + Sync {
    /// 지정 영역(없으면 주 모니터 전체)의 현재 픽셀을 캡처한다
    async fn capture(&self, region: Option<Region>) -> Result<CapturedFrame, CoreError>;

    /// 백엔드 이름 (예: "xcap")
    fn backend_name(&self) -> &str;
}
