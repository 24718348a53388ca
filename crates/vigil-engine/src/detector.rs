//! 감지 루프.
//!
//! 고정 주기 틱마다 레지스트리의 감시 항목을 삽입 순서로 처리한다:
//! 캡처 → 그레이스케일 → 템플릿 매칭 → (미달 시) OCR 폴백 →
//! 에지 트리거 전이 → 상승 에지에서 액션 발화.
//!
//! 틱이 주기를 넘기면 다음 틱을 즉시 시작하되 밀린 틱을 합치지 않는다.
//! 항목 하나의 캡처/매칭/액션 실패는 그 항목의 해당 틱만 건너뛴다.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use tokio::sync::{broadcast, watch};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use vigil_automation::dispatcher::EffectDispatcher;
use vigil_core::config::DetectorConfig;
use vigil_core::error::CoreError;
use vigil_core::models::geometry::Point;
use vigil_core::models::watch::{Watch, WatchId};
use vigil_core::ports::frame_source::FrameSource;
use vigil_core::ports::ocr_provider::OcrProvider;
use vigil_vision::grayscale::to_luma;
use vigil_vision::matcher::match_template;

use crate::event::DetectorEvent;
use crate::registry::WatchRegistry;

/// 이벤트 채널 용량 — 수신자가 뒤처지면 오래된 이벤트부터 버린다
const EVENT_CAPACITY: usize = 64;

/// 실행 누계 — 종료 시 요약 출력용
#[derive(Debug, Clone, Copy)]
pub struct RunSummary {
    /// 수행한 틱 수
    pub ticks: u64,
    /// 상승 에지 감지 수
    pub detections: u64,
    /// 복구된 에러 수
    pub errors: u64,
    /// 루프 가동 시간
    pub elapsed: Duration,
}

/// 감지 루프 본체
///
/// 포트 구현체를 `Arc<dyn Trait>`로 쥐어 테스트에서 목으로 교체한다.
pub struct Detector {
    config: DetectorConfig,
    registry: Arc<WatchRegistry>,
    frames: Arc<dyn FrameSource>,
    ocr: Option<Arc<dyn OcrProvider>>,
    dispatcher: Arc<EffectDispatcher>,
    event_tx: broadcast::Sender<DetectorEvent>,
    ticks: AtomicU64,
    detections: AtomicU64,
    errors: AtomicU64,
}

/// 틱 처리용 파라미터 스냅샷 — 항목 잠금을 틱 내내 잡지 않기 위한 복사본
struct TickParams {
    id: WatchId,
    source_path: std::path::PathBuf,
    template: Arc<image::GrayImage>,
    mask: Option<Arc<image::GrayImage>>,
    region: Option<vigil_core::models::geometry::Region>,
    threshold: f64,
    ocr_fallback: bool,
    ocr_keyword: Option<String>,
    actions: vigil_core::models::watch::WatchActions,
}

impl TickParams {
    /// 활성 항목에서 스냅샷 추출. 비활성(템플릿 디코딩 실패) 항목은 `None`
    fn snapshot(watch: &Watch) -> Option<Self> {
        let template = watch.template.as_ref()?.clone();
        Some(Self {
            id: watch.id,
            source_path: watch.source_path.clone(),
            template,
            mask: watch.mask.clone(),
            region: watch.region,
            threshold: watch.threshold,
            ocr_fallback: watch.ocr_fallback,
            ocr_keyword: watch.ocr_keyword.clone(),
            actions: watch.actions.clone(),
        })
    }
}

impl Detector {
    /// 새 감지 루프 생성
    pub fn new(
        config: DetectorConfig,
        registry: Arc<WatchRegistry>,
        frames: Arc<dyn FrameSource>,
        ocr: Option<Arc<dyn OcrProvider>>,
        dispatcher: Arc<EffectDispatcher>,
    ) -> Self {
        let (event_tx, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            config,
            registry,
            frames,
            ocr,
            dispatcher,
            event_tx,
            ticks: AtomicU64::new(0),
            detections: AtomicU64::new(0),
            errors: AtomicU64::new(0),
        }
    }

    /// 이벤트 수신 채널 구독
    pub fn subscribe(&self) -> broadcast::Receiver<DetectorEvent> {
        self.event_tx.subscribe()
    }

    /// 종료 신호가 올 때까지 고정 주기로 틱 수행
    ///
    /// 틱이 주기를 넘기면 다음 틱을 지연 없이 시작한다 (밀린 틱 합치기 없음).
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) -> RunSummary {
        let started = Instant::now();
        let interval_ms = self.config.tick_interval_ms.max(1);
        info!(
            "감지 루프 시작: 주기 {interval_ms}ms, 항목 {}개, 캡처 백엔드 {}",
            self.registry.len(),
            self.frames.backend_name()
        );

        let mut ticker = tokio::time::interval(Duration::from_millis(interval_ms));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.run_tick().await;
                }
                result = shutdown.changed() => {
                    if result.is_err() || *shutdown.borrow() {
                        info!("종료 신호 수신 — 감지 루프 정지");
                        break;
                    }
                }
            }
        }

        let summary = self.summary(started.elapsed());
        info!(
            "실행 요약: 틱 {}회, 감지 {}건, 에러 {}건, 가동 {:.1}초",
            summary.ticks,
            summary.detections,
            summary.errors,
            summary.elapsed.as_secs_f64()
        );
        summary
    }

    /// 틱 하나 수행 — 항목을 삽입 순서로 순차 처리
    ///
    /// 테스트에서 페이싱 없이 결정적으로 구동하기 위한 공개 진입점.
    pub async fn run_tick(&self) {
        self.ticks.fetch_add(1, Ordering::Relaxed);
        for entry in self.registry.snapshot() {
            self.process_watch(&entry).await;
        }
    }

    /// 현재 누계 요약
    pub fn summary(&self, elapsed: Duration) -> RunSummary {
        RunSummary {
            ticks: self.ticks.load(Ordering::Relaxed),
            detections: self.detections.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
            elapsed,
        }
    }

    /// 항목 하나를 한 틱 처리
    async fn process_watch(&self, entry: &Arc<RwLock<Watch>>) {
        let Some(params) = TickParams::snapshot(&entry.read()) else {
            // 비활성 항목 — 캡처 없이 건너뜀
            return;
        };

        let frame = match self.frames.capture(params.region).await {
            Ok(frame) => Arc::new(frame),
            Err(e) => {
                warn!("캡처 실패 ({}): {e}", params.source_path.display());
                self.record_error(Some(params.id), format!("캡처 실패: {e}"));
                return;
            }
        };

        // 그레이스케일 변환 + 매칭은 CPU 집약적 — 블로킹 풀로 격리
        let matched = {
            let frame = frame.clone();
            let template = params.template.clone();
            let mask = params.mask.clone();
            tokio::task::spawn_blocking(move || {
                let gray = to_luma(&frame.pixels);
                match_template(&gray, &template, mask.as_deref())
            })
            .await
        };
        let matched = match matched {
            Ok(matched) => matched,
            Err(e) => {
                self.record_error(Some(params.id), format!("매칭 작업 조인 실패: {e}"));
                return;
            }
        };

        let (tw, th) = params.template.dimensions();
        let mut hit: Option<(f64, Point)> = None;

        if let Some(m) = matched {
            debug!(
                "매칭 점수 {:.4} @ ({}, {}) — {}",
                m.score,
                m.location.x,
                m.location.y,
                params.source_path.display()
            );
            if m.score >= params.threshold {
                let center = Point::new(
                    frame.origin.x + m.location.x + (tw / 2) as i32,
                    frame.origin.y + m.location.y + (th / 2) as i32,
                );
                hit = Some((m.score, center));
            }
        }

        // 템플릿 미달 시에만 OCR 폴백
        if hit.is_none() && params.ocr_fallback {
            hit = self.try_ocr_fallback(&params, &frame).await;
        }

        let found = hit.is_some();
        // 에지 전이만 짧은 쓰기 잠금
        let fired = entry.write().state.advance(found);
        if !fired {
            return;
        }

        let (score, center) = hit.unwrap_or((0.0, frame.origin));
        info!(
            "감지: {} (점수 {score:.4}, 중심 ({}, {}))",
            params.source_path.display(),
            center.x,
            center.y
        );
        self.detections.fetch_add(1, Ordering::Relaxed);
        self.emit(DetectorEvent::Detected {
            watch_id: params.id,
            score,
            center,
        });

        if params.actions.is_empty() {
            return;
        }
        let failures = self
            .dispatcher
            .fire(&params.actions, &params.source_path, center)
            .await;
        for failure in failures {
            self.record_error(Some(params.id), failure);
        }
    }

    /// OCR 폴백 — 키워드 포함이면 프레임 중심을 합성 감지 위치로 쓴다
    async fn try_ocr_fallback(
        &self,
        params: &TickParams,
        frame: &Arc<vigil_core::models::frame::CapturedFrame>,
    ) -> Option<(f64, Point)> {
        let ocr = self.ocr.as_ref()?;

        let text = match ocr
            .extract_text(&frame.pixels, &self.config.ocr_lang)
            .await
        {
            Ok(text) => text,
            Err(e) => {
                warn!("OCR 실패 ({}): {e}", params.source_path.display());
                self.record_error(Some(params.id), format!("OCR 실패: {e}"));
                return None;
            }
        };

        let keyword = params
            .ocr_keyword
            .as_deref()
            .unwrap_or(&self.config.ocr_keyword);
        if keyword.is_empty() || !text.to_lowercase().contains(&keyword.to_lowercase()) {
            return None;
        }

        debug!(
            "OCR 키워드 감지: \"{keyword}\" — {}",
            params.source_path.display()
        );
        let (fw, fh) = frame.dimensions();
        let center = Point::new(
            frame.origin.x + (fw / 2) as i32,
            frame.origin.y + (fh / 2) as i32,
        );
        Some((1.0, center))
    }

    /// 에러 누계 + 이벤트 발행
    fn record_error(&self, watch_id: Option<WatchId>, message: String) {
        self.errors.fetch_add(1, Ordering::Relaxed);
        self.emit(DetectorEvent::Error { watch_id, message });
    }

    /// 이벤트 브로드캐스트 — 수신자가 없으면 조용히 버린다
    fn emit(&self, event: DetectorEvent) {
        let _ = self.event_tx.send(event);
    }
}

// ============================================================
// 테스트
// ============================================================
