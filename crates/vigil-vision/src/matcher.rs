//! 마스크 지원 정규화 상관 템플릿 매칭.
//!
//! OpenCV `TM_CCOEFF_NORMED`와 동일한 점수 정의: 템플릿과 프레임 창을
//! 각각 평균 차감(zero-mean)한 뒤 정규화 상관을 계산한다.
//! 마스크가 있으면 0이 아닌 픽셀만 분자/분모 양쪽에 참여한다.
//!
//! 한 번의 창 순회로 점수를 얻기 위해 항등식을 사용한다:
//! Σ T'(I − μI) = Σ T'·I  (마스크 내 Σ T' = 0이므로),
//! Σ (I − μI)² = Σ I² − (Σ I)²/n.

use image::GrayImage;
use tracing::warn;

use vigil_core::models::frame::TemplateMatch;
use vigil_core::models::geometry::Point;

/// 분모 0 판정 임계값 (평탄한 창/템플릿)
const FLAT_EPS: f64 = 1e-9;

/// 프레임에서 템플릿의 최고 점수 배치를 찾는다.
///
/// - 반환 점수는 이론상 [-1, 1]이며, 동점은 행 우선 스캔에서 먼저
///   나온 배치가 이긴다.
/// - 템플릿이 프레임보다 어느 한 변이라도 크면 `None` — 에러가 아니라
///   해당 틱의 미감지로 처리된다.
/// - 평탄한 템플릿(분산 0)이나 픽셀이 전혀 없는 마스크는 점수가
///   정의되지 않으므로 `None`.
pub fn match_template(
    frame: &GrayImage,
    template: &GrayImage,
    mask: Option<&GrayImage>,
) -> Option<TemplateMatch> {
    let (fw, fh) = frame.dimensions();
    let (tw, th) = template.dimensions();

    if tw == 0 || th == 0 || tw > fw || th > fh {
        return None;
    }

    let mask = match mask {
        Some(m) if m.dimensions() != template.dimensions() => {
            warn!(
                "마스크 크기 불일치 ({}x{} vs {}x{}) — 마스크 무시",
                m.width(),
                m.height(),
                tw,
                th
            );
            None
        }
        other => other,
    };

    let t_raw = template.as_raw();
    let m_raw = mask.map(|m| m.as_raw().as_slice());

    // 템플릿 전처리: 마스크 내 평균 차감값과 그 제곱합
    let mut n = 0u64;
    let mut t_sum = 0.0f64;
    for (i, &t) in t_raw.iter().enumerate() {
        if included(m_raw, i) {
            n += 1;
            t_sum += t as f64;
        }
    }
    if n == 0 {
        warn!("마스크에 포함 픽셀이 없음 — 매칭 불가");
        return None;
    }
    let t_mean = t_sum / n as f64;

    let mut tzm = vec![0.0f64; t_raw.len()];
    let mut tzm_sq_sum = 0.0f64;
    for (i, &t) in t_raw.iter().enumerate() {
        if included(m_raw, i) {
            let v = t as f64 - t_mean;
            tzm[i] = v;
            tzm_sq_sum += v * v;
        }
    }
    if tzm_sq_sum < FLAT_EPS {
        // 평탄한 템플릿은 모든 창과 상관이 정의되지 않는다
        return None;
    }

    let f_raw = frame.as_raw();
    let fw = fw as usize;
    let tw_us = tw as usize;
    let th_us = th as usize;
    let inv_n = 1.0 / n as f64;

    let mut best_score = f64::NEG_INFINITY;
    let mut best_loc = Point::new(0, 0);

    for y0 in 0..=(fh - th) as usize {
        for x0 in 0..=(frame.width() - tw) as usize {
            let mut cross = 0.0f64;
            let mut i_sum = 0.0f64;
            let mut i_sq_sum = 0.0f64;

            for ty in 0..th_us {
                let t_row = ty * tw_us;
                let f_row = (y0 + ty) * fw + x0;
                for tx in 0..tw_us {
                    let ti = t_row + tx;
                    if !included(m_raw, ti) {
                        continue;
                    }
                    let iv = f_raw[f_row + tx] as f64;
                    cross += tzm[ti] * iv;
                    i_sum += iv;
                    i_sq_sum += iv * iv;
                }
            }

            let i_var = i_sq_sum - i_sum * i_sum * inv_n;
            let score = if i_var < FLAT_EPS {
                // 평탄한 창과의 상관은 0으로 간주
                0.0
            } else {
                cross / (tzm_sq_sum * i_var).sqrt()
            };

            // 동점은 행 우선 첫 배치 유지 (strict greater)
            if score > best_score {
                best_score = score;
                best_loc = Point::new(x0 as i32, y0 as i32);
            }
        }
    }

    Some(TemplateMatch {
        score: best_score,
        location: best_loc,
    })
}

/// 템플릿 인덱스 `i`가 마스크에 포함되는지 여부
#[inline]
fn included(mask: Option<&[u8]>, i: usize) -> bool {
    match mask {
        Some(m) => m[i] != 0,
        None => true,
    }
}
