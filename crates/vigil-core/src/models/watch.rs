//! 감시 항목(Watch) 모델과 에지 트리거 상태 기계.

use std::path::PathBuf;
use std::sync::Arc;

use image::GrayImage;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::geometry::Region;

/// 감시 항목 식별자
pub type WatchId = Uuid;

/// 감지 상태 기계 — 에지 트리거의 명시적 2-상태 표현
///
/// `Idle → Detected` 전이(상승 에지)에서만 액션이 발화하고,
/// 점수가 임계값 아래로 떨어지는 즉시 `Idle`로 복귀해 재무장한다.
/// 감지가 지속되는 동안에는 추가 발화가 없다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DetectState {
    /// 미감지 — 다음 감지에서 발화 가능
    #[default]
    Idle,
    /// 감지 지속 중 — 이번 에피소드는 이미 발화됨
    Detected,
}

impl DetectState {
    /// 틱마다 한 번 호출되는 전이 규칙.
    ///
    /// 반환값이 `true`면 상승 에지 — 액션을 정확히 한 번 발화해야 한다.
    pub fn advance(&mut self, found: bool) -> bool {
        match (*self, found) {
            (DetectState::Idle, true) => {
                *self = DetectState::Detected;
                true
            }
            (_, false) => {
                *self = DetectState::Idle;
                false
            }
            (DetectState::Detected, true) => false,
        }
    }

    /// 현재 감지 지속 중인지 여부
    pub fn is_detected(&self) -> bool {
        matches!(self, DetectState::Detected)
    }
}

/// 포인터 이동 액션 파라미터
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovePointer {
    /// 이동에 걸리는 시간 (0이면 즉시 점프)
    #[serde(default)]
    pub duration_ms: u64,
}

/// 감시 항목에 설정된 액션 집합
///
/// 모든 필드가 선택적이며, 상승 에지에서 설정된 것만 순서대로 실행된다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WatchActions {
    /// 매칭 중심으로 포인터 이동
    #[serde(default)]
    pub move_pointer: Option<MovePointer>,
    /// 현재 포인터 위치에서 클릭
    #[serde(default)]
    pub click: bool,
    /// 키 입력 (키 이름, 예: "enter", "f5", "a")
    #[serde(default)]
    pub press_key: Option<String>,
    /// 데스크톱 알림 표시
    #[serde(default)]
    pub notify: bool,
    /// 사운드 파일 비동기 재생
    #[serde(default)]
    pub sound: Option<PathBuf>,
    /// 제목에 부분 문자열이 포함된 창을 전면으로 (대소문자 무시)
    #[serde(default)]
    pub activate_window: Option<String>,
}

impl WatchActions {
    /// 설정된 액션이 하나도 없는지 여부
    pub fn is_empty(&self) -> bool {
        self.move_pointer.is_none()
            && !self.click
            && self.press_key.is_none()
            && !self.notify
            && self.sound.is_none()
            && self.activate_window.is_none()
    }
}

/// 감시 항목 — 추적 대상 이미지 하나와 매칭 파라미터, 액션 설정
///
/// 감지 루프가 읽는 동안 제어 컨텍스트가 임계값/영역/액션을
/// 제자리에서 수정할 수 있다. 템플릿과 마스크는 로드 시점에 고정되며
/// `Arc`로 보관해 틱 스냅샷이 저렴하게 복제한다.
#[derive(Debug, Clone)]
pub struct Watch {
    /// 식별자
    pub id: WatchId,
    /// 원본 이미지 경로 (목록 표시, 알림 본문용)
    pub source_path: PathBuf,
    /// 그레이스케일 템플릿. `None`이면 디코딩 실패 — 영구 비활성 항목
    pub template: Option<Arc<GrayImage>>,
    /// 이진 마스크 (템플릿과 동일 크기, 0이 아닌 픽셀만 매칭 참여)
    pub mask: Option<Arc<GrayImage>>,
    /// 캡처 영역. `None`이면 주 모니터 전체
    pub region: Option<Region>,
    /// 감지 임계값, (0, 1] 범위. 점수 `>= threshold`면 감지
    pub threshold: f64,
    /// 템플릿 매칭 실패 시 OCR 키워드 폴백 사용 여부
    pub ocr_fallback: bool,
    /// 항목별 OCR 키워드 (None이면 전역 키워드 사용)
    pub ocr_keyword: Option<String>,
    /// 상승 에지에서 실행할 액션 집합
    pub actions: WatchActions,
    /// 에지 트리거 상태
    pub state: DetectState,
}

/// 기본 감지 임계값
pub const DEFAULT_THRESHOLD: f64 = 0.8;

impl Watch {
    /// 새 감시 항목 생성
    ///
    /// 마스크가 템플릿과 크기가 다르면 버리고 경고를 남긴다.
    pub fn new(source_path: PathBuf, template: Option<GrayImage>, mask: Option<GrayImage>) -> Self {
        let template = template.map(Arc::new);
        let mask = match (&template, mask) {
            (Some(t), Some(m)) if t.dimensions() == m.dimensions() => Some(Arc::new(m)),
            (Some(t), Some(m)) => {
                tracing::warn!(
                    "마스크 크기 불일치 ({}x{} vs 템플릿 {}x{}) — 마스크 무시: {}",
                    m.width(),
                    m.height(),
                    t.width(),
                    t.height(),
                    source_path.display()
                );
                None
            }
            (Some(_), None) => None,
            (None, _) => None,
        };

        Self {
            id: Uuid::new_v4(),
            source_path,
            template,
            mask,
            region: None,
            threshold: DEFAULT_THRESHOLD,
            ocr_fallback: false,
            ocr_keyword: None,
            actions: WatchActions::default(),
            state: DetectState::default(),
        }
    }

    /// 템플릿 디코딩에 실패한 비활성 항목인지 여부
    pub fn is_inert(&self) -> bool {
        self.template.is_none()
    }

    /// 템플릿 크기 (width, height). 비활성 항목이면 (0, 0)
    pub fn template_size(&self) -> (u32, u32) {
        self.template
            .as_ref()
            .map(|t| t.dimensions())
            .unwrap_or((0, 0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::GrayImage;

    #[test]
    fn edge_trigger_sequence() {
        // 점수 시퀀스 [미달, 초과, 초과, 미달, 초과] → 2번째와 5번째 틱에서만 발화
        let mut state = DetectState::default();
        let sequence = [false, true, true, false, true];
        let fires: Vec<bool> = sequence.iter().map(|&f| state.advance(f)).collect();
        assert_eq!(fires, vec![false, true, false, false, true]);
    }

    #[test]
    fn sustained_detection_fires_once() {
        let mut state = DetectState::default();
        assert!(state.advance(true));
        for _ in 0..10 {
            assert!(!state.advance(true));
        }
        assert!(state.is_detected());
    }

    #[test]
    fn rearm_on_miss() {
        let mut state = DetectState::default();
        assert!(state.advance(true));
        assert!(!state.advance(false));
        assert!(!state.is_detected());
        // 재진입 시 다시 발화
        assert!(state.advance(true));
    }

    #[test]
    fn inert_watch_without_template() {
        let w = Watch::new(PathBuf::from("missing.png"), None, None);
        assert!(w.is_inert());
        assert_eq!(w.template_size(), (0, 0));
    }

    #[test]
    fn mismatched_mask_dropped() {
        let template = GrayImage::new(10, 10);
        let mask = GrayImage::new(8, 8);
        let w = Watch::new(PathBuf::from("t.png"), Some(template), Some(mask));
        assert!(w.mask.is_none());
        assert!(!w.is_inert());
    }

    #[test]
    fn matching_mask_kept() {
        let template = GrayImage::new(10, 10);
        let mask = GrayImage::new(10, 10);
        let w = Watch::new(PathBuf::from("t.png"), Some(template), Some(mask));
        assert!(w.mask.is_some());
    }

    #[test]
    fn default_actions_empty() {
        let actions = WatchActions::default();
        assert!(actions.is_empty());

        let actions = WatchActions {
            click: true,
            ..WatchActions::default()
        };
        assert!(!actions.is_empty());
    }
}
