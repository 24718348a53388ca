//! 사운드 재생 어댑터.
//!
//! `AudioSink` 포트 구현. rodio의 출력 스트림은 !Send 객체를 포함하므로
//! 전용 스레드가 스트림을 소유하고, 재생 요청은 채널로 전달한다.
//! `play`는 큐잉 후 즉시 반환 — 감지 틱을 절대 막지 않는다.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Sender};

use tracing::{debug, warn};

use vigil_core::error::CoreError;
use vigil_core::ports::audio::AudioSink;

/// rodio 기반 사운드 싱크 — 전용 오디오 스레드에 파일 경로를 큐잉
pub struct RodioAudioSink {
    tx: Sender<PathBuf>,
}

impl RodioAudioSink {
    /// 새 사운드 싱크 생성 (오디오 스레드 기동)
    ///
    /// 출력 장치 초기화는 첫 재생 요청 시점으로 미룬다 —
    /// 장치가 없는 환경에서도 생성 자체는 성공한다.
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel::<PathBuf>();

        // !Send 오디오 객체를 소유하는 전용 스레드
        let spawned = std::thread::Builder::new()
            .name("vigil-audio".to_string())
            .spawn(move || {
                let mut output: Option<(rodio::OutputStream, rodio::OutputStreamHandle)> = None;

                while let Ok(path) = rx.recv() {
                    if output.is_none() {
                        match rodio::OutputStream::try_default() {
                            Ok(o) => output = Some(o),
                            Err(e) => {
                                warn!("오디오 출력 초기화 실패: {e}");
                                continue;
                            }
                        }
                    }
                    let Some((_stream, handle)) = output.as_ref() else {
                        continue;
                    };
                    if let Err(e) = play_file(handle, &path) {
                        warn!("사운드 재생 실패: {}: {e}", path.display());
                    }
                }
                debug!("오디오 스레드 종료");
            });

        if let Err(e) = spawned {
            warn!("오디오 스레드 기동 실패: {e}");
        }

        Self { tx }
    }
}

impl Default for RodioAudioSink {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioSink for RodioAudioSink {
    fn play(&self, path: &Path) -> Result<(), CoreError> {
        debug!("사운드 재생 큐잉: {}", path.display());
        self.tx
            .send(path.to_path_buf())
            .map_err(|e| CoreError::Effect(format!("오디오 큐잉 실패: {e}")))
    }

    fn backend_name(&self) -> &str {
        "rodio"
    }
}

/// 파일 하나를 디코딩해 분리(detached) 재생한다
fn play_file(handle: &rodio::OutputStreamHandle, path: &Path) -> Result<(), CoreError> {
    let file = std::fs::File::open(path)
        .map_err(|e| CoreError::Effect(format!("사운드 파일 열기 실패: {e}")))?;
    let source = rodio::Decoder::new(std::io::BufReader::new(file))
        .map_err(|e| CoreError::Effect(format!("사운드 디코딩 실패: {e}")))?;
    let sink = rodio::Sink::try_new(handle)
        .map_err(|e| CoreError::Effect(format!("오디오 싱크 생성 실패: {e}")))?;
    sink.append(source);
    // 재생 완료를 기다리지 않는다 — 틱과 독립적으로 끝까지 재생
    sink.detach();
    Ok(())
}

/// No-Op 사운드 싱크 — 테스트/드라이런용
pub struct NoOpAudioSink;

impl AudioSink for NoOpAudioSink {
    fn play(&self, path: &Path) -> Result<(), CoreError> {
        debug!("[NoOp] 사운드 재생: {}", path.display());
        Ok(())
    }

    fn backend_name(&self) -> &str {
        "noop"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noop_sink_ok() {
        let sink = NoOpAudioSink;
        assert!(sink.play(Path::new("ding.wav")).is_ok());
        assert_eq!(sink.backend_name(), "noop");
    }

    #[test]
    fn rodio_sink_queues_without_blocking() {
        // 오디오 장치가 없어도 큐잉은 성공해야 한다
        // (실패는 오디오 스레드 내부에서 로깅된다)
        let sink = RodioAudioSink::new();
        assert_eq!(sink.backend_name(), "rodio");
        assert!(sink.play(Path::new("/nonexistent/ding.wav")).is_ok());
    }
}
