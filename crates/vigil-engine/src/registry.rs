//! 감시 항목 레지스트리.
//!
//! 감지 루프가 순회하는 동안 제어 컨텍스트(CLI, 향후 UI)가
//! 항목을 추가/제거/수정할 수 있도록 공유 가능한 잠금 구조로 보관한다.
//! 순회 순서는 항상 삽입 순서.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::info;

use vigil_core::models::watch::{Watch, WatchId};

/// 공유 감시 항목 레지스트리
///
/// 외부 목록 잠금은 추가/제거/스냅샷 동안만 잡는다. 항목별 잠금은
/// 틱이 파라미터를 스냅샷하거나 에지 상태를 전이할 때만 짧게 잡는다.
#[derive(Default)]
pub struct WatchRegistry {
    watches: RwLock<Vec<Arc<RwLock<Watch>>>>,
}

impl WatchRegistry {
    /// 빈 레지스트리 생성
    pub fn new() -> Self {
        Self::default()
    }

    /// 항목 추가, 식별자 반환
    pub fn add(&self, watch: Watch) -> WatchId {
        let id = watch.id;
        info!(
            "감시 항목 추가: {} ({})",
            watch.source_path.display(),
            if watch.is_inert() { "비활성" } else { "활성" }
        );
        self.watches.write().push(Arc::new(RwLock::new(watch)));
        id
    }

    /// 항목 제거. 존재했으면 `true`
    pub fn remove(&self, id: WatchId) -> bool {
        let mut watches = self.watches.write();
        let before = watches.len();
        watches.retain(|w| w.read().id != id);
        let removed = watches.len() < before;
        if removed {
            info!("감시 항목 제거: {id}");
        }
        removed
    }

    /// 식별자로 항목 조회
    pub fn get(&self, id: WatchId) -> Option<Arc<RwLock<Watch>>> {
        self.watches.read().iter().find(|w| w.read().id == id).cloned()
    }

    /// 현재 항목의 얕은 스냅샷 (삽입 순서)
    ///
    /// 스냅샷 이후 제거된 항목은 틱이 마저 처리할 수 있다 — 허용 동작.
    pub fn snapshot(&self) -> Vec<Arc<RwLock<Watch>>> {
        self.watches.read().clone()
    }

    /// 항목 식별자 목록 (삽입 순서)
    pub fn ids(&self) -> Vec<WatchId> {
        self.watches.read().iter().map(|w| w.read().id).collect()
    }

    /// 항목 수
    pub fn len(&self) -> usize {
        self.watches.read().len()
    }

    /// 비어 있는지 여부
    pub fn is_empty(&self) -> bool {
        self.watches.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::GrayImage;
    use std::path::PathBuf;

    fn sample_watch(name: &str) -> Watch {
        Watch::new(
            PathBuf::from(name),
            Some(GrayImage::from_fn(4, 4, |x, y| {
                image::Luma([((x * 31 + y * 17) % 256) as u8])
            })),
            None,
        )
    }

    #[test]
    fn add_and_remove() {
        let registry = WatchRegistry::new();
        let id = registry.add(sample_watch("a.png"));
        assert_eq!(registry.len(), 1);
        assert!(registry.get(id).is_some());

        assert!(registry.remove(id));
        assert!(registry.is_empty());
        assert!(!registry.remove(id));
    }

    #[test]
    fn snapshot_preserves_insertion_order() {
        let registry = WatchRegistry::new();
        let id_a = registry.add(sample_watch("a.png"));
        let id_b = registry.add(sample_watch("b.png"));
        let id_c = registry.add(sample_watch("c.png"));

        assert_eq!(registry.ids(), vec![id_a, id_b, id_c]);

        // 중간 제거 후에도 나머지 순서 유지
        registry.remove(id_b);
        assert_eq!(registry.ids(), vec![id_a, id_c]);
    }

    #[test]
    fn snapshot_survives_concurrent_removal() {
        let registry = WatchRegistry::new();
        let id = registry.add(sample_watch("a.png"));
        let snapshot = registry.snapshot();

        registry.remove(id);

        // 스냅샷이 잡은 Arc는 제거 이후에도 유효
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].read().id, id);
        assert!(registry.is_empty());
    }
}
