//! 창 전면 전환 어댑터.
//!
//! `WindowActivator` 포트 구현. 플랫폼별 백엔드:
//! - Linux: `xdotool` (X11/XWayland 한정)
//! - Windows: Win32 `EnumWindows` + `SetForegroundWindow`
//! - macOS: `osascript` 경유 앱 활성화 (창 제목 대신 프로세스 이름 매칭)
//!
//! 일치하는 창이 없으면 `Ok(false)` — 액션은 조용히 no-op이 된다.

use async_trait::async_trait;
use tracing::debug;

use vigil_core::error::CoreError;
use vigil_core::ports::window::WindowActivator;

/// 제목 부분 일치 (대소문자 무시)
pub fn title_contains(title: &str, needle: &str) -> bool {
    title.to_lowercase().contains(&needle.to_lowercase())
}

/// 플랫폼 창 전환기 — `WindowActivator` 포트 구현
pub struct PlatformWindowActivator;

impl PlatformWindowActivator {
    /// 새 창 전환기 생성
    pub fn new() -> Self {
        Self
    }
}

impl Default for PlatformWindowActivator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WindowActivator for PlatformWindowActivator {
    async fn activate_matching(&self, title_substring: &str) -> Result<bool, CoreError> {
        let needle = title_substring.to_string();
        // 플랫폼 API 호출은 블로킹 — 워커 스레드로 격리
        let raised = tokio::task::spawn_blocking(move || activate_platform(&needle))
            .await
            .map_err(|e| CoreError::Effect(format!("창 전환 작업 조인 실패: {e}")))??;

        if !raised {
            debug!("일치하는 창 없음: \"{title_substring}\"");
        }
        Ok(raised)
    }

    fn backend_name(&self) -> &str {
        #[cfg(target_os = "linux")]
        {
            "xdotool"
        }
        #[cfg(target_os = "windows")]
        {
            "win32"
        }
        #[cfg(target_os = "macos")]
        {
            "osascript"
        }
        #[cfg(not(any(target_os = "linux", target_os = "windows", target_os = "macos")))]
        {
            "noop"
        }
    }
}

/// No-Op 창 전환기 — 테스트/드라이런용
pub struct NoOpWindowActivator;

#[async_trait]
impl WindowActivator for NoOpWindowActivator {
    async fn activate_matching(&self, title_substring: &str) -> Result<bool, CoreError> {
        debug!(title_substring, "[NoOp] 창 전환");
        Ok(false)
    }

    fn backend_name(&self) -> &str {
        "noop"
    }
}

// ============================================================
// 플랫폼별 구현
// ============================================================

#[cfg(target_os = "linux")]
fn activate_platform(needle: &str) -> Result<bool, CoreError> {
    use std::process::Command;
    use tracing::warn;

    // 가시 창 전체 나열 (빈 패턴 = 모든 창)
    let search = match Command::new("xdotool")
        .args(["search", "--onlyvisible", "--name", ""])
        .output()
    {
        Ok(output) if output.status.success() => output,
        Ok(output) => {
            let stderr = String::from_utf8_lossy(&output.stderr);
            debug!("xdotool search 실패: {}", stderr.trim());
            return Ok(false);
        }
        Err(e) => {
            if e.kind() == std::io::ErrorKind::NotFound {
                warn!("xdotool 미설치 — 창 전환 불가 ('sudo apt install xdotool')");
                return Ok(false);
            }
            return Err(CoreError::Effect(format!("xdotool 실행 실패: {e}")));
        }
    };

    for window_id in String::from_utf8_lossy(&search.stdout).lines() {
        let window_id = window_id.trim();
        if window_id.is_empty() {
            continue;
        }

        let title = Command::new("xdotool")
            .args(["getwindowname", window_id])
            .output()
            .ok()
            .filter(|o| o.status.success())
            .map(|o| String::from_utf8_lossy(&o.stdout).trim().to_string())
            .unwrap_or_default();

        if !title.is_empty() && title_contains(&title, needle) {
            debug!("창 전환: {window_id} — {title}");
            let activated = Command::new("xdotool")
                .args(["windowactivate", window_id])
                .status()
                .map(|s| s.success())
                .unwrap_or(false);
            return Ok(activated);
        }
    }

    Ok(false)
}

#[cfg(target_os = "windows")]
fn activate_platform(needle: &str) -> Result<bool, CoreError> {
    use windows_sys::Win32::Foundation::{HWND, LPARAM};
    use windows_sys::Win32::UI::WindowsAndMessaging::{
        EnumWindows, GetWindowTextW, IsWindowVisible, SetForegroundWindow, ShowWindow, SW_SHOW,
    };

    struct SearchState {
        needle: String,
        found: HWND,
    }

    unsafe extern "system" fn enum_callback(hwnd: HWND, lparam: LPARAM) -> i32 {
        let state = &mut *(lparam as *mut SearchState);
        if IsWindowVisible(hwnd) == 0 {
            return 1;
        }
        let mut title_buf = [0u16; 512];
        let len = GetWindowTextW(hwnd, title_buf.as_mut_ptr(), title_buf.len() as i32);
        if len > 0 {
            let title = String::from_utf16_lossy(&title_buf[..len as usize]);
            if title.to_lowercase().contains(&state.needle) {
                state.found = hwnd;
                return 0; // 첫 일치에서 열거 중단
            }
        }
        1
    }

    let mut state = SearchState {
        needle: needle.to_lowercase(),
        found: std::ptr::null_mut(),
    };

    unsafe {
        EnumWindows(Some(enum_callback), &mut state as *mut SearchState as LPARAM);
        if state.found.is_null() {
            return Ok(false);
        }
        ShowWindow(state.found, SW_SHOW);
        Ok(SetForegroundWindow(state.found) != 0)
    }
}

#[cfg(target_os = "macos")]
fn activate_platform(needle: &str) -> Result<bool, CoreError> {
    use std::process::Command;

    // 가시 프로세스 이름 나열 — macOS는 창 제목 열거에 접근성 권한이
    // 필요해 프로세스 이름 매칭으로 근사한다
    let list = Command::new("osascript")
        .args([
            "-e",
            "tell application \"System Events\" to get name of every application process whose visible is true",
        ])
        .output()
        .map_err(|e| CoreError::Effect(format!("osascript 실행 실패: {e}")))?;

    if !list.status.success() {
        debug!(
            "osascript 실패: {}",
            String::from_utf8_lossy(&list.stderr).trim()
        );
        return Ok(false);
    }

    let names = String::from_utf8_lossy(&list.stdout);
    for name in names.trim().split(", ") {
        if !name.is_empty() && title_contains(name, needle) {
            let escaped = name.replace('"', "\\\"");
            let activated = Command::new("osascript")
                .args(["-e", &format!("tell application \"{escaped}\" to activate")])
                .status()
                .map(|s| s.success())
                .unwrap_or(false);
            return Ok(activated);
        }
    }

    Ok(false)
}

#[cfg(not(any(target_os = "linux", target_os = "windows", target_os = "macos")))]
fn activate_platform(_needle: &str) -> Result<bool, CoreError> {
    Ok(false)
}
