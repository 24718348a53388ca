//! 화면 좌표 기하 타입.

use serde::{Deserialize, Serialize};

/// 화면 좌표 점
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    /// 새 점 생성
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// 화면 좌표 직사각형 영역
///
/// 좌표 원점은 전체 화면 기준이며, 멀티 모니터 배치에 따라
/// `x`/`y`는 음수가 될 수 있다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub x: i32,
    pub y: i32,
    pub w: u32,
    pub h: u32,
}

impl Region {
    /// 새 영역 생성
    pub fn new(x: i32, y: i32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    /// 영역 좌상단 원점
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// 면적이 0인 영역 여부
    pub fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }
}
