//! 그레이스케일 변환.
//!
//! BT.601 luma 가중치 정수 연산. 캡처 프레임은 매 틱 변환되므로
//! 픽셀 버퍼 직접 접근으로 처리한다.

use image::{GrayImage, RgbaImage};

/// RGBA 프레임을 BT.601 luma 그레이스케일로 변환
///
/// luma = (299·R + 587·G + 114·B) / 1000, 알파는 무시.
pub fn to_luma(rgba: &RgbaImage) -> GrayImage {
    let (w, h) = rgba.dimensions();
    let src = rgba.as_raw();
    let mut out = Vec::with_capacity((w * h) as usize);

    for pixel in src.chunks_exact(4) {
        let r = pixel[0] as u32;
        let g = pixel[1] as u32;
        let b = pixel[2] as u32;
        out.push(((299 * r + 587 * g + 114 * b) / 1000) as u8);
    }

    // w*h 픽셀을 그대로 채웠으므로 from_raw는 항상 성공한다
    GrayImage::from_raw(w, h, out).unwrap_or_else(|| GrayImage::new(w, h))
}
