//! 입력 드라이버 구현.
//!
//! `NoOpInputDriver` (테스트/드라이런용)와 `EnigoInputDriver` (실제 입력,
//! `enigo` feature)를 제공한다.

use async_trait::async_trait;
use tracing::debug;

use vigil_core::error::CoreError;
use vigil_core::ports::input_driver::InputDriver;

/// 부드러운 이동의 보간 스텝 간격
#[cfg(feature = "enigo")]
const MOVE_STEP_MS: u64 = 10;

// ============================================================
// NoOpInputDriver — 테스트/드라이런용
// ============================================================

/// No-Op 입력 드라이버 — 모든 입력을 로깅만 하고 실행하지 않음
pub struct NoOpInputDriver;

#[async_trait]
impl InputDriver for NoOpInputDriver {
    async fn mouse_move(&self, x: i32, y: i32) -> Result<(), CoreError> {
        debug!(x, y, "[NoOp] 마우스 이동");
        Ok(())
    }

    async fn mouse_move_over(&self, x: i32, y: i32, duration_ms: u64) -> Result<(), CoreError> {
        debug!(x, y, duration_ms, "[NoOp] 마우스 이동 (보간)");
        Ok(())
    }

    async fn click(&self) -> Result<(), CoreError> {
        debug!("[NoOp] 클릭");
        Ok(())
    }

    async fn key_press(&self, key: &str) -> Result<(), CoreError> {
        debug!(key, "[NoOp] 키 입력");
        Ok(())
    }

    fn platform(&self) -> &str {
        "noop"
    }
}

// ============================================================
// EnigoInputDriver — 실제 마우스/키보드 입력
// ============================================================

/// 실제 마우스/키보드 입력 드라이버 (enigo 기반)
///
/// macOS: Accessibility 권한 필요
/// Windows: UIAccess 또는 관리자 권한 필요
/// Linux: X11 또는 Wayland + uinput 권한 필요
#[cfg(feature = "enigo")]
pub struct EnigoInputDriver {
    /// enigo 인스턴스 (Send지만 !Sync → tokio::sync::Mutex 사용)
    enigo: tokio::sync::Mutex<enigo::Enigo>,
}

#[cfg(feature = "enigo")]
impl EnigoInputDriver {
    /// 새 EnigoInputDriver 생성
    pub fn new() -> Result<Self, CoreError> {
        let settings = enigo::Settings::default();
        let enigo = enigo::Enigo::new(&settings)
            .map_err(|e| CoreError::Effect(format!("입력 드라이버 초기화 실패: {e}")))?;
        Ok(Self {
            enigo: tokio::sync::Mutex::new(enigo),
        })
    }

    /// 키 이름 문자열 → enigo 키 매핑
    ///
    /// 일반적인 키 이름("enter", "esc", "f5" 등)을 지원한다.
    /// 단일 문자는 Unicode 키로, 알 수 없는 이름은 에러.
    fn parse_key(key: &str) -> Result<enigo::Key, CoreError> {
        use enigo::Key;

        let lower = key.to_lowercase();
        let mapped = match lower.as_str() {
            "enter" | "return" => Key::Return,
            "tab" => Key::Tab,
            "escape" | "esc" => Key::Escape,
            "backspace" => Key::Backspace,
            "delete" | "del" => Key::Delete,
            "space" => Key::Space,
            "home" => Key::Home,
            "end" => Key::End,
            "pageup" => Key::PageUp,
            "pagedown" => Key::PageDown,
            "up" => Key::UpArrow,
            "down" => Key::DownArrow,
            "left" => Key::LeftArrow,
            "right" => Key::RightArrow,
            "f1" => Key::F1,
            "f2" => Key::F2,
            "f3" => Key::F3,
            "f4" => Key::F4,
            "f5" => Key::F5,
            "f6" => Key::F6,
            "f7" => Key::F7,
            "f8" => Key::F8,
            "f9" => Key::F9,
            "f10" => Key::F10,
            "f11" => Key::F11,
            "f12" => Key::F12,
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(ch), None) => Key::Unicode(ch),
                    _ => {
                        return Err(CoreError::Effect(format!("알 수 없는 키 이름: {key}")));
                    }
                }
            }
        };
        Ok(mapped)
    }
}

#[cfg(feature = "enigo")]
#[async_trait]
impl InputDriver for EnigoInputDriver {
    async fn mouse_move(&self, x: i32, y: i32) -> Result<(), CoreError> {
        use enigo::Mouse;
        debug!(x, y, "[Enigo] 마우스 이동");
        let mut enigo = self.enigo.lock().await;
        enigo
            .move_mouse(x, y, enigo::Coordinate::Abs)
            .map_err(|e| CoreError::Effect(format!("마우스 이동 실패: {e}")))?;
        Ok(())
    }

    async fn mouse_move_over(&self, x: i32, y: i32, duration_ms: u64) -> Result<(), CoreError> {
        use enigo::Mouse;

        if duration_ms == 0 {
            return self.mouse_move(x, y).await;
        }

        debug!(x, y, duration_ms, "[Enigo] 마우스 이동 (보간)");

        let (start_x, start_y) = {
            let enigo = self.enigo.lock().await;
            enigo
                .location()
                .map_err(|e| CoreError::Effect(format!("포인터 위치 조회 실패: {e}")))?
        };

        // 고정 스텝 간격으로 선형 보간 — 잠금은 스텝마다 풀어
        // 다른 입력 호출을 오래 막지 않는다
        let steps = (duration_ms / MOVE_STEP_MS).max(1);
        for step in 1..=steps {
            let t = step as f64 / steps as f64;
            let ix = start_x + ((x - start_x) as f64 * t).round() as i32;
            let iy = start_y + ((y - start_y) as f64 * t).round() as i32;
            {
                let mut enigo = self.enigo.lock().await;
                enigo
                    .move_mouse(ix, iy, enigo::Coordinate::Abs)
                    .map_err(|e| CoreError::Effect(format!("마우스 이동 실패: {e}")))?;
            }
            tokio::time::sleep(std::time::Duration::from_millis(MOVE_STEP_MS)).await;
        }
        Ok(())
    }

    async fn click(&self) -> Result<(), CoreError> {
        use enigo::Mouse;
        debug!("[Enigo] 클릭");
        let mut enigo = self.enigo.lock().await;
        enigo
            .button(enigo::Button::Left, enigo::Direction::Click)
            .map_err(|e| CoreError::Effect(format!("마우스 클릭 실패: {e}")))?;
        Ok(())
    }

    async fn key_press(&self, key: &str) -> Result<(), CoreError> {
        use enigo::Keyboard;
        debug!(key, "[Enigo] 키 입력");
        let parsed = Self::parse_key(key)?;
        let mut enigo = self.enigo.lock().await;
        enigo
            .key(parsed, enigo::Direction::Click)
            .map_err(|e| CoreError::Effect(format!("키 입력 실패: {e}")))?;
        Ok(())
    }

    fn platform(&self) -> &str {
        #[cfg(target_os = "macos")]
        {
            "macos"
        }
        #[cfg(target_os = "windows")]
        {
            "windows"
        }
        #[cfg(target_os = "linux")]
        {
            "linux"
        }
        #[cfg(not(any(target_os = "macos", target_os = "windows", target_os = "linux")))]
        {
            "unknown"
        }
    }
}

/// 플랫폼별 입력 드라이버 생성 팩토리
///
/// `enigo` feature 활성화 시 실제 입력 드라이버 반환,
/// 초기화 실패 또는 비활성화 시 NoOp 드라이버 반환.
pub fn create_platform_input_driver() -> Box<dyn InputDriver> {
    #[cfg(feature = "enigo")]
    {
        match EnigoInputDriver::new() {
            Ok(driver) => {
                tracing::info!("실제 입력 드라이버 (enigo) 초기화 완료");
                return Box::new(driver);
            }
            Err(e) => {
                tracing::warn!("enigo 초기화 실패, NoOp 폴백: {e}");
            }
        }
    }
    Box::new(NoOpInputDriver)
}
