//! 캡처 프레임과 매칭 결과 모델.

use image::RgbaImage;

use super::geometry::Point;

/// 캡처된 화면 프레임
///
/// `origin`은 픽셀 버퍼 좌상단의 전체 화면 기준 좌표.
/// 영역 캡처면 영역 원점, 전체 모니터 캡처면 모니터 원점이 된다.
/// 매칭 좌표를 절대 화면 좌표로 환산할 때 사용한다.
#[derive(Debug, Clone)]
pub struct CapturedFrame {
    /// RGBA 픽셀 버퍼
    pub pixels: RgbaImage,
    /// 버퍼 좌상단의 화면 좌표
    pub origin: Point,
}

impl CapturedFrame {
    /// 새 프레임 생성
    pub fn new(pixels: RgbaImage, origin: Point) -> Self {
        Self { pixels, origin }
    }

    /// 프레임 해상도 (width, height)
    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }
}

/// 템플릿 매칭 결과 — 최고 점수 배치 하나
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemplateMatch {
    /// 정규화 상관 점수 (이론상 [-1, 1], 임계값 비교는 `>=`)
    pub score: f64,
    /// 최고 점수 배치의 좌상단 (프레임 내부 좌표)
    pub location: Point,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_dimensions() {
        let frame = CapturedFrame::new(RgbaImage::new(64, 32), Point::new(100, 200));
        assert_eq!(frame.dimensions(), (64, 32));
        assert_eq!(frame.origin, Point::new(100, 200));
    }
}
