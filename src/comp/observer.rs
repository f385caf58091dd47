/// 觀察者
///
/// 每次更新視野時由宿主重新提供，系統不保留
use serde::{Deserialize, Serialize};

/// 單位觀察者
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitObserver {
    pub x: i32,
    pub y: i32,
    /// 視野半徑（格）
    pub vision_range: i32,
}

impl UnitObserver {
    pub fn new(x: i32, y: i32, vision_range: i32) -> Self {
        Self { x, y, vision_range }
    }
}

/// 建築觀察者，實際半徑 = 建築基礎視野 + vision_bonus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildingObserver {
    pub x: i32,
    pub y: i32,
    pub vision_bonus: i32,
}

impl BuildingObserver {
    pub fn new(x: i32, y: i32, vision_bonus: i32) -> Self {
        Self { x, y, vision_bonus }
    }
}
