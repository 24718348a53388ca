//! 스크린 캡처.
//!
//! xcap 기반 `FrameSource` 포트 구현. 영역 캡처는 주 모니터 전체를
//! 잡은 뒤 잘라낸다 — 잘린 버퍼의 화면 원점을 함께 반환해
//! 절대 좌표 환산이 가능하게 한다.

use async_trait::async_trait;
use image::RgbaImage;
use tracing::debug;
use xcap::Monitor;

use vigil_core::error::CoreError;
use vigil_core::models::frame::CapturedFrame;
use vigil_core::models::geometry::{Point, Region};
use vigil_core::ports::frame_source::FrameSource;

/// 스크린 캡처 — xcap 기반 `FrameSource` 구현
pub struct XcapFrameSource;

impl XcapFrameSource {
    /// 새 캡처 인스턴스 생성
    pub fn new() -> Self {
        Self
    }

    /// 주 모니터 핸들 반환 (주 모니터 판별 실패 시 첫 모니터)
    fn primary_monitor() -> Result<Monitor, CoreError> {
        let monitors = Monitor::all()
            .map_err(|e| CoreError::Capture(format!("모니터 목록 조회 실패: {e}")))?;

        monitors
            .into_iter()
            .reduce(|primary, m| {
                if m.is_primary().unwrap_or(false) {
                    m
                } else {
                    primary
                }
            })
            .ok_or_else(|| CoreError::Capture("모니터를 찾을 수 없음".to_string()))
    }
}

impl Default for XcapFrameSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FrameSource for XcapFrameSource {
    async fn capture(&self, region: Option<Region>) -> Result<CapturedFrame, CoreError> {
        let monitor = Self::primary_monitor()?;
        let mon_x = monitor.x().unwrap_or(0);
        let mon_y = monitor.y().unwrap_or(0);

        let image = monitor
            .capture_image()
            .map_err(|e| CoreError::Capture(format!("스크린 캡처 실패: {e}")))?;

        debug!("스크린 캡처 완료: {}x{}", image.width(), image.height());

        match region {
            None => Ok(CapturedFrame::new(image, Point::new(mon_x, mon_y))),
            Some(r) => {
                let pixels = crop_to_region(&image, mon_x, mon_y, r)?;
                Ok(CapturedFrame::new(pixels, r.origin()))
            }
        }
    }

    fn backend_name(&self) -> &str {
        "xcap"
    }
}

/// 모니터 버퍼에서 화면 좌표 영역을 잘라낸다
///
/// 영역이 모니터 밖으로 나가면 캡처 에러 — 호출자가 틱 단위로
/// 보고하고 건너뛴다.
fn crop_to_region(
    image: &RgbaImage,
    mon_x: i32,
    mon_y: i32,
    region: Region,
) -> Result<RgbaImage, CoreError> {
    if region.is_empty() {
        return Err(CoreError::Capture(format!(
            "빈 캡처 영역: {}x{}",
            region.w, region.h
        )));
    }

    let rel_x = region.x - mon_x;
    let rel_y = region.y - mon_y;
    let (img_w, img_h) = image.dimensions();

    let out_of_bounds = rel_x < 0
        || rel_y < 0
        || (rel_x as u32).saturating_add(region.w) > img_w
        || (rel_y as u32).saturating_add(region.h) > img_h;
    if out_of_bounds {
        return Err(CoreError::Capture(format!(
            "영역이 모니터 범위를 벗어남: ({}, {}) {}x{} (모니터 {}x{})",
            region.x, region.y, region.w, region.h, img_w, img_h
        )));
    }

    Ok(image::imageops::crop_imm(image, rel_x as u32, rel_y as u32, region.w, region.h).to_image())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn numbered_image(w: u32, h: u32) -> RgbaImage {
        let mut img = RgbaImage::new(w, h);
        for (x, y, p) in img.enumerate_pixels_mut() {
            *p = Rgba([x as u8, y as u8, 0, 255]);
        }
        img
    }

    #[test]
    fn crop_inside_bounds() {
        let img = numbered_image(100, 80);
        let out = crop_to_region(&img, 0, 0, Region::new(10, 20, 30, 40)).unwrap();
        assert_eq!(out.dimensions(), (30, 40));
        // 잘린 버퍼의 (0,0)은 원본의 (10,20)
        assert_eq!(out.get_pixel(0, 0).0[0], 10);
        assert_eq!(out.get_pixel(0, 0).0[1], 20);
    }

    #[test]
    fn crop_respects_monitor_origin() {
        // 모니터 원점이 (100, 50)일 때 화면 좌표 (110, 60)은 버퍼의 (10, 10)
        let img = numbered_image(100, 80);
        let out = crop_to_region(&img, 100, 50, Region::new(110, 60, 5, 5)).unwrap();
        assert_eq!(out.get_pixel(0, 0).0[0], 10);
        assert_eq!(out.get_pixel(0, 0).0[1], 10);
    }

    #[test]
    fn crop_out_of_bounds_is_error() {
        let img = numbered_image(100, 80);
        assert!(crop_to_region(&img, 0, 0, Region::new(-5, 0, 10, 10)).is_err());
        assert!(crop_to_region(&img, 0, 0, Region::new(95, 0, 10, 10)).is_err());
        assert!(crop_to_region(&img, 0, 0, Region::new(0, 75, 10, 10)).is_err());
    }

    #[test]
    fn crop_empty_region_is_error() {
        let img = numbered_image(100, 80);
        assert!(crop_to_region(&img, 0, 0, Region::new(0, 0, 0, 10)).is_err());
    }
}
