//! # vigil-app
//!
//! VIGIL 바이너리 진입점.
//! 설정 로드, 감시 항목 조립, 어댑터 DI, 감지 루프 구동/종료를 담당한다.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use directories::ProjectDirs;
use tokio::sync::watch;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use vigil_automation::audio::{NoOpAudioSink, RodioAudioSink};
use vigil_automation::dispatcher::EffectDispatcher;
use vigil_automation::input_driver::{create_platform_input_driver, NoOpInputDriver};
use vigil_automation::notifier::{NoOpNotifier, NotifyRustNotifier};
use vigil_automation::window::{NoOpWindowActivator, PlatformWindowActivator};
use vigil_core::config::{AppConfig, WatchConfig};
use vigil_core::models::watch::Watch;
use vigil_core::ports::audio::AudioSink;
use vigil_core::ports::frame_source::FrameSource;
use vigil_core::ports::input_driver::InputDriver;
use vigil_core::ports::notifier::DesktopNotifier;
use vigil_core::ports::ocr_provider::OcrProvider;
use vigil_core::ports::window::WindowActivator;
use vigil_engine::{Detector, DetectorEvent, WatchRegistry};
use vigil_vision::capture::XcapFrameSource;
use vigil_vision::template::{load_mask, load_template};

/// VIGIL — 화면 감시 + 템플릿 매칭 자동화 데몬
///
/// 설정된 이미지가 화면에 나타나는 순간(상승 에지)에만
/// 알림/클릭/키 입력 등의 액션을 실행한다.
#[derive(Parser, Debug)]
#[command(name = "vigil")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// 설정 파일 경로 (기본: 플랫폼 설정 디렉터리의 vigil.toml)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// 감지 주기 오버라이드 (밀리초)
    #[arg(long)]
    tick_ms: Option<u64>,

    /// 드라이런 — 감지는 수행하되 모든 액션을 NoOp으로 대체
    #[arg(long)]
    dry_run: bool,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, short = 'l', default_value = "info")]
    log_level: String,
}

/// 설정 파일 경로 결정 (CLI 인자 또는 플랫폼별 기본 경로)
///
/// # 플랫폼별 기본 경로:
/// - macOS: `~/Library/Application Support/io.vigil.vigil/vigil.toml`
/// - Windows: `%APPDATA%\vigil\vigil\config\vigil.toml`
/// - Linux: `~/.config/vigil/vigil.toml`
fn resolve_config_path(arg: Option<&Path>) -> PathBuf {
    arg.map(Path::to_path_buf)
        .or_else(|| {
            ProjectDirs::from("io", "vigil", "vigil").map(|p| p.config_dir().join("vigil.toml"))
        })
        .unwrap_or_else(|| PathBuf::from("./vigil.toml"))
}

/// 설정 로드 — 파일(없어도 됨) 위에 환경변수(`VIGIL_` 접두사) 오버레이
fn load_config(path: &Path) -> Result<AppConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::from(path.to_path_buf()).required(false))
        .add_source(config::Environment::with_prefix("VIGIL").separator("__"))
        .build()
        .context("설정 소스 구성 실패")?;
    settings
        .try_deserialize::<AppConfig>()
        .context("설정 역직렬화 실패")
}

/// 설정 항목 하나를 감시 항목으로 조립
///
/// 템플릿 디코딩 실패는 비활성 항목으로 등록된다 (루프가 건너뜀).
/// 마스크 로드 실패는 마스크만 버린다.
fn build_watch(cfg: &WatchConfig) -> Result<Watch> {
    cfg.validate()
        .with_context(|| format!("감시 항목 설정 오류: {}", cfg.image.display()))?;

    let template = load_template(&cfg.image);
    let mask = cfg.mask.as_ref().and_then(|mask_path| {
        match load_mask(mask_path) {
            Ok(mask) => Some(mask),
            Err(e) => {
                warn!("마스크 로드 실패 ({}): {e}", mask_path.display());
                None
            }
        }
    });

    let mut watch = Watch::new(cfg.image.clone(), template, mask);
    watch.region = cfg.region;
    watch.threshold = cfg.threshold;
    watch.ocr_fallback = cfg.ocr_fallback;
    watch.ocr_keyword = cfg.ocr_keyword.clone();
    watch.actions = cfg.actions.clone();
    Ok(watch)
}

/// OCR 제공자 생성 (`ocr` feature 활성화 시에만 실제 구현)
fn create_ocr_provider() -> Option<Arc<dyn OcrProvider>> {
    #[cfg(feature = "ocr")]
    {
        Some(Arc::new(vigil_vision::ocr::LocalOcr::new(None)))
    }
    #[cfg(not(feature = "ocr"))]
    {
        None
    }
}

/// 배너 출력
fn print_banner(dry_run: bool) {
    println!();
    println!("╔════════════════════════════════════════════╗");
    println!("║  ██╗   ██╗██╗ ██████╗ ██╗██╗               ║");
    println!("║  ██║   ██║██║██╔════╝ ██║██║               ║");
    println!("║  ██║   ██║██║██║  ███╗██║██║               ║");
    println!("║  ╚██╗ ██╔╝██║██║   ██║██║██║               ║");
    println!("║   ╚████╔╝ ██║╚██████╔╝██║███████╗          ║");
    println!("║    ╚═══╝  ╚═╝ ╚═════╝ ╚═╝╚══════╝          ║");
    println!("║                                            ║");
    if dry_run {
        println!("║   화면 감시 자동화 — 드라이런 (액션 없음)    ║");
    } else {
        println!("║   화면 감시 + 템플릿 매칭 자동화             ║");
    }
    println!("╚════════════════════════════════════════════╝");
    println!();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // tracing 초기화
    let log_filter = format!(
        "vigil={lvl},vigil_app={lvl},vigil_core={lvl},vigil_vision={lvl},vigil_automation={lvl},vigil_engine={lvl}",
        lvl = args.log_level
    );
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_filter)),
        )
        .init();

    print_banner(args.dry_run);
    info!("VIGIL 시작");

    // 설정 로드 + CLI 오버라이드
    let config_path = resolve_config_path(args.config.as_deref());
    info!("설정 파일: {}", config_path.display());
    let mut config = load_config(&config_path)?;
    if let Some(tick_ms) = args.tick_ms {
        config.detector.tick_interval_ms = tick_ms;
    }

    // 감시 항목 조립
    let registry = Arc::new(WatchRegistry::new());
    for watch_cfg in &config.watches {
        match build_watch(watch_cfg) {
            Ok(watch) => {
                registry.add(watch);
            }
            Err(e) => {
                error!("{e:#}");
            }
        }
    }
    if registry.is_empty() {
        warn!("등록된 감시 항목 없음 — 루프는 유휴 상태로 돈다");
    }

    // 어댑터 조립 (드라이런이면 액션 전부 NoOp)
    let frames: Arc<dyn FrameSource> = Arc::new(XcapFrameSource::new());
    let (input, notifier, audio, window): (
        Arc<dyn InputDriver>,
        Arc<dyn DesktopNotifier>,
        Arc<dyn AudioSink>,
        Arc<dyn WindowActivator>,
    ) = if args.dry_run {
        (
            Arc::new(NoOpInputDriver),
            Arc::new(NoOpNotifier),
            Arc::new(NoOpAudioSink),
            Arc::new(NoOpWindowActivator),
        )
    } else {
        (
            Arc::from(create_platform_input_driver()),
            Arc::new(NotifyRustNotifier::new()),
            Arc::new(RodioAudioSink::new()),
            Arc::new(PlatformWindowActivator::new()),
        )
    };
    let dispatcher = Arc::new(EffectDispatcher::new(input, notifier, audio, window));
    let ocr = create_ocr_provider();
    if ocr.is_none() {
        info!("OCR 폴백 비활성 (ocr feature 미포함 빌드)");
    }

    let detector = Arc::new(Detector::new(
        config.detector.clone(),
        registry,
        frames,
        ocr,
        dispatcher,
    ));

    // 이벤트 관찰 태스크 — 감지/에러를 로그로 흘린다
    let mut events = detector.subscribe();
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(DetectorEvent::Detected {
                    watch_id,
                    score,
                    center,
                }) => {
                    info!(
                        "[이벤트] 감지 {watch_id} — 점수 {score:.4}, 중심 ({}, {})",
                        center.x, center.y
                    );
                }
                Ok(DetectorEvent::Error { watch_id, message }) => {
                    warn!("[이벤트] 에러 {watch_id:?} — {message}");
                }
                Err(tokio::sync::broadcast::error::RecvError::Lagged(missed)) => {
                    warn!("[이벤트] 수신 지연으로 {missed}건 누락");
                }
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    // Ctrl-C → 종료 신호
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("종료 신호 대기 실패: {e}");
            return;
        }
        info!("Ctrl-C 수신 — 종료 중");
        let _ = shutdown_tx.send(true);
    });

    let summary = detector.run(shutdown_rx).await;
    println!(
        "종료: 틱 {}회, 감지 {}건, 에러 {}건, 가동 {:.1}초",
        summary.ticks,
        summary.detections,
        summary.errors,
        summary.elapsed.as_secs_f64()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    #[test]
    fn explicit_config_path_wins() {
        let path = resolve_config_path(Some(Path::new("/tmp/custom.toml")));
        assert_eq!(path, PathBuf::from("/tmp/custom.toml"));
    }

    #[test]
    fn missing_config_file_yields_defaults() {
        let config = load_config(Path::new("/nonexistent/vigil.toml")).unwrap();
        assert_eq!(config.detector.tick_interval_ms, 100);
        assert!(config.watches.is_empty());
    }

    #[test]
    fn config_file_is_parsed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vigil.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            r#"
[detector]
tick_interval_ms = 250

[[watches]]
image = "skip.png"
threshold = 0.9

[watches.actions]
click = true
"#
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.detector.tick_interval_ms, 250);
        assert_eq!(config.watches.len(), 1);
        assert_eq!(config.watches[0].threshold, 0.9);
        assert!(config.watches[0].actions.click);
    }

    #[test]
    fn watch_with_missing_image_is_inert() {
        let cfg = WatchConfig {
            image: PathBuf::from("/nonexistent/button.png"),
            mask: None,
            region: None,
            threshold: 0.8,
            ocr_fallback: false,
            ocr_keyword: None,
            actions: Default::default(),
        };
        let watch = build_watch(&cfg).unwrap();
        assert!(watch.is_inert());
    }

    #[test]
    fn invalid_threshold_is_rejected() {
        let cfg = WatchConfig {
            image: PathBuf::from("a.png"),
            mask: None,
            region: None,
            threshold: 1.5,
            ocr_fallback: false,
            ocr_keyword: None,
            actions: Default::default(),
        };
        assert!(build_watch(&cfg).is_err());
    }
}
