/// 陣營探索記憶
///
/// 每個陣營一張持久的探索網格，第一次被引用時才建立（全為 Unexplored）
use hashbrown::HashMap;

use super::grid::TileGrid;
use super::state::VisibilityState;

pub type FactionId = u32;

#[derive(Debug, Clone, Default)]
pub struct ExplorationStore {
    width: usize,
    height: usize,
    maps: HashMap<FactionId, TileGrid>,
}

impl ExplorationStore {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            maps: HashMap::new(),
        }
    }

    /// 取得陣營網格，不存在就建立
    pub fn get_or_create(&mut self, faction: FactionId) -> &mut TileGrid {
        let (w, h) = (self.width, self.height);
        self.maps
            .entry(faction)
            .or_insert_with(|| TileGrid::new(w, h))
    }

    /// 唯讀查詢，沒有網格就回傳 None（視同全未探索）
    pub fn get(&self, faction: FactionId) -> Option<&TileGrid> {
        self.maps.get(&faction)
    }

    pub fn state(&self, faction: FactionId, x: i32, y: i32) -> VisibilityState {
        self.maps
            .get(&faction)
            .map(|m| m.get(x, y))
            .unwrap_or(VisibilityState::Unexplored)
    }

    /// 合併當幀視野：memory[i] = max(memory[i], visibility[i])
    pub fn merge(&mut self, faction: FactionId, visibility: &TileGrid) {
        self.get_or_create(faction).merge_max(visibility);
    }

    /// Visible 降為 Explored，沒有網格就什麼都不做
    pub fn demote(&mut self, faction: FactionId) {
        if let Some(map) = self.maps.get_mut(&faction) {
            map.demote_visible();
        }
    }

    /// 清空陣營記憶，這是唯一會讓狀態倒退的操作
    pub fn reset(&mut self, faction: FactionId) {
        if let Some(map) = self.maps.get_mut(&faction) {
            map.fill(VisibilityState::Unexplored);
        }
    }

    /// 已探索百分比 (0-100)
    pub fn explored_percent(&self, faction: FactionId) -> f64 {
        let total = self.width * self.height;
        if total == 0 {
            return 0.0;
        }
        let explored = self
            .maps
            .get(&faction)
            .map(|m| m.count_at_least(VisibilityState::Explored))
            .unwrap_or(0);
        explored as f64 * 100.0 / total as f64
    }
}
