//! 액션 디스패처.
//!
//! 상승 에지에서 감시 항목에 설정된 액션을 고정 순서로 실행한다:
//! 포인터 이동 → 클릭 → 키 입력 → 알림 → 사운드 → 창 전환.
//!
//! 액션 하나의 실패가 나머지를 막지 않는다. 각 실패는 경고 로그와 함께
//! 수집되어 호출자에게 반환된다.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, warn};

use vigil_core::error::CoreError;
use vigil_core::models::geometry::Point;
use vigil_core::models::watch::WatchActions;
use vigil_core::ports::audio::AudioSink;
use vigil_core::ports::input_driver::InputDriver;
use vigil_core::ports::notifier::DesktopNotifier;
use vigil_core::ports::window::WindowActivator;

/// 알림 제목 (본문은 `"<원본 이미지 경로> detected."`)
const NOTIFY_TITLE: &str = "Detected";

/// 액션 디스패처 — 포트 묶음을 쥐고 액션 집합을 순서대로 실행
pub struct EffectDispatcher {
    input: Arc<dyn InputDriver>,
    notifier: Arc<dyn DesktopNotifier>,
    audio: Arc<dyn AudioSink>,
    window: Arc<dyn WindowActivator>,
}

impl EffectDispatcher {
    /// 포트 구현체를 묶어 디스패처 생성
    pub fn new(
        input: Arc<dyn InputDriver>,
        notifier: Arc<dyn DesktopNotifier>,
        audio: Arc<dyn AudioSink>,
        window: Arc<dyn WindowActivator>,
    ) -> Self {
        Self {
            input,
            notifier,
            audio,
            window,
        }
    }

    /// 액션 집합을 고정 순서로 실행.
    ///
    /// `center`는 매칭 중심의 절대 화면 좌표. 반환값은 실패한 액션의
    /// 에러 메시지 목록 — 비어 있으면 전부 성공.
    pub async fn fire(
        &self,
        actions: &WatchActions,
        source_path: &Path,
        center: Point,
    ) -> Vec<String> {
        let mut failures = Vec::new();

        if let Some(mv) = &actions.move_pointer {
            let result = self
                .input
                .mouse_move_over(center.x, center.y, mv.duration_ms)
                .await;
            record(&mut failures, "move_pointer", result);
        }

        if actions.click {
            record(&mut failures, "click", self.input.click().await);
        }

        if let Some(key) = &actions.press_key {
            record(&mut failures, "press_key", self.input.key_press(key).await);
        }

        if actions.notify {
            let body = format!("{} detected.", source_path.display());
            record(
                &mut failures,
                "notify",
                self.notifier.show(NOTIFY_TITLE, &body).await,
            );
        }

        if let Some(sound) = &actions.sound {
            record(&mut failures, "sound", self.audio.play(sound));
        }

        if let Some(title) = &actions.activate_window {
            let result = self.window.activate_matching(title).await.map(|raised| {
                if !raised {
                    debug!("전환할 창 없음: \"{title}\"");
                }
            });
            record(&mut failures, "activate_window", result);
        }

        failures
    }
}

/// 액션 결과 기록 — 실패는 경고 로그 + 메시지 수집
fn record(failures: &mut Vec<String>, action: &str, result: Result<(), CoreError>) {
    if let Err(e) = result {
        warn!("액션 실패 ({action}): {e}");
        failures.push(format!("{action}: {e}"));
    }
}

// ============================================================
// 테스트
// ============================================================
