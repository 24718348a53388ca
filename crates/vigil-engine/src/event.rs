//! 감지 엔진 이벤트.
//!
//! 루프 진행 상황을 관찰자(CLI 로거, 향후 UI)에게 브로드캐스트한다.
//! 수신자가 없거나 뒤처져도 루프는 영향받지 않는다.

use vigil_core::models::geometry::Point;
use vigil_core::models::watch::WatchId;

/// 감지 루프가 발행하는 이벤트
#[derive(Debug, Clone)]
pub enum DetectorEvent {
    /// 상승 에지 감지 — 액션 발화 직전에 발행
    Detected {
        /// 감지된 감시 항목
        watch_id: WatchId,
        /// 매칭 점수 (OCR 폴백 감지면 1.0)
        score: f64,
        /// 매칭 중심의 절대 화면 좌표
        center: Point,
    },
    /// 복구 가능한 틱 내부 에러 (캡처/OCR/액션 실패)
    Error {
        /// 에러가 특정 항목에 귀속되면 그 식별자
        watch_id: Option<WatchId>,
        /// 에러 설명
        message: String,
    },
}
