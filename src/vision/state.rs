/// 可見性狀態
///
/// 每個格子對每個陣營只會是三種狀態之一，數值大小即代表「看得多清楚」，
/// 因此合併時可以直接取最大值。
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum VisibilityState {
    /// 從未看過
    Unexplored = 0,
    /// 看過，但目前不在視野內
    Explored = 1,
    /// 目前在視野內
    Visible = 2,
}

impl VisibilityState {
    /// 從格子位元組還原，超出範圍的值視為 Visible
    pub fn from_byte(b: u8) -> Self {
        match b {
            0 => VisibilityState::Unexplored,
            1 => VisibilityState::Explored,
            _ => VisibilityState::Visible,
        }
    }

    pub fn as_byte(self) -> u8 {
        self as u8
    }

    pub fn is_explored(self) -> bool {
        self >= VisibilityState::Explored
    }

    pub fn is_visible(self) -> bool {
        self == VisibilityState::Visible
    }
}

impl Default for VisibilityState {
    fn default() -> Self {
        VisibilityState::Unexplored
    }
}
