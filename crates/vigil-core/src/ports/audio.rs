//! 사운드 재생 포트.
//!
//! 구현: `vigil-automation` crate (rodio, 전용 오디오 스레드)

use std::path::Path;

use crate::error::CoreError;

/// 사운드 싱크 — 파이어 앤 포겟 재생
///
/// `play`는 재생 요청을 큐에 넣고 즉시 반환한다.
/// 디코딩/재생 실패는 백엔드 내부에서 로깅되며 틱을 막지 않는다.
pub trait AudioSink: Send + Sync {
    /// 오디오 파일 비동기 재생 요청
    fn play(&self, path: &Path) -> Result<(), CoreError>;

    /// 백엔드 이름 (예: "rodio", "noop")
    fn backend_name(&self) -> &str;
}
