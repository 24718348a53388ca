//! 애플리케이션 설정 구조체.
//!
//! 감지 루프 주기, OCR 설정, 시작 시 등록할 감시 항목 목록을 정의한다.
//! `config` crate를 통해 TOML 파일/환경변수에서 로드되며, 이 파일은
//! 시작 입력일 뿐이다 — 런타임에 추가/제거된 항목은 저장되지 않는다.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::models::geometry::Region;
use crate::models::watch::{WatchActions, DEFAULT_THRESHOLD};

/// 최상위 애플리케이션 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// 감지 루프 설정
    #[serde(default)]
    pub detector: DetectorConfig,
    /// 시작 시 등록할 감시 항목
    #[serde(default)]
    pub watches: Vec<WatchConfig>,
}

impl AppConfig {
    /// 기본 설정 생성
    pub fn default_config() -> Self {
        Self::default()
    }
}

/// 감지 루프 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// 틱 주기 (밀리초). 틱 작업이 주기를 초과하면 다음 틱은 지연 없이 시작
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    /// OCR 언어 코드
    #[serde(default = "default_ocr_lang")]
    pub ocr_lang: String,
    /// 전역 OCR 키워드 (항목별 재정의 가능)
    #[serde(default = "default_ocr_keyword")]
    pub ocr_keyword: String,
}

fn default_tick_interval_ms() -> u64 {
    100
}

fn default_ocr_lang() -> String {
    "eng".to_string()
}

fn default_ocr_keyword() -> String {
    "skip".to_string()
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            ocr_lang: default_ocr_lang(),
            ocr_keyword: default_ocr_keyword(),
        }
    }
}

/// 감시 항목 설정 한 개
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchConfig {
    /// 참조 이미지 경로
    pub image: PathBuf,
    /// 마스크 이미지 경로 (템플릿과 동일 크기)
    #[serde(default)]
    pub mask: Option<PathBuf>,
    /// 캡처 영역 (없으면 주 모니터 전체)
    #[serde(default)]
    pub region: Option<Region>,
    /// 감지 임계값, (0, 1]
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    /// OCR 키워드 폴백 사용 여부
    #[serde(default)]
    pub ocr_fallback: bool,
    /// 항목별 OCR 키워드 (없으면 전역 키워드)
    #[serde(default)]
    pub ocr_keyword: Option<String>,
    /// 상승 에지에서 실행할 액션
    #[serde(default)]
    pub actions: WatchActions,
}

fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD
}

impl WatchConfig {
    /// 임계값이 (0, 1] 범위인지 검증
    pub fn validate(&self) -> Result<(), crate::error::CoreError> {
        if self.threshold <= 0.0 || self.threshold > 1.0 {
            return Err(crate::error::CoreError::Config(format!(
                "임계값 {}은(는) (0, 1] 범위를 벗어남: {}",
                self.threshold,
                self.image.display()
            )));
        }
        Ok(())
    }
}
