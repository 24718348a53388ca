//! VIGIL 핵심 에러 타입.
//!
//! 모든 어댑터 crate는 백엔드 실패를 `CoreError`로 래핑한다.
//! 감지 루프는 이 에러들을 감시 항목/액션 단위로 잡아 이벤트로 변환하며,
//! 어떤 경우에도 루프 자체를 중단시키지 않는다.

use thiserror::Error;

/// 코어 레이어 에러.
/// 캡처, 디코딩, OCR, 이펙트 실행 등 감지 파이프라인 공통 에러를 정의한다.
#[derive(Debug, Error)]
pub enum CoreError {
    /// 스크린 캡처 실패 (영역 불가/범위 초과)
    #[error("캡처 에러: {0}")]
    Capture(String),

    /// 템플릿/마스크 이미지 디코딩 실패 — 해당 감시 항목은 영구 비활성
    #[error("디코딩 에러: {0}")]
    Decode(String),

    /// OCR 처리 실패 (엔진 불가 또는 빈 결과)
    #[error("OCR 에러: {0}")]
    Ocr(String),

    /// 액션 백엔드 실패 (포인터/키/알림/사운드/창 전환)
    #[error("이펙트 에러: {0}")]
    Effect(String),

    /// 설정값 오류
    #[error("설정 에러: {0}")]
    Config(String),

    /// JSON 직렬화/역직렬화 실패
    #[error("직렬화 에러: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O 에러
    #[error("I/O 에러: {0}")]
    Io(#[from] std::io::Error),

    /// 내부 에러 (예상치 못한 상황)
    #[error("내부 에러: {0}")]
    Internal(String),
}
