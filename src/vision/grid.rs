/// 格子狀態圖
///
/// 一格一個位元組的可見性網格，探索記憶與當幀視野共用同一種結構
use super::state::VisibilityState;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TileGrid {
    width: usize,
    height: usize,
    cells: Vec<u8>,
}

impl TileGrid {
    /// 創建全為 Unexplored 的網格
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![VisibilityState::Unexplored.as_byte(); width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    /// 座標轉索引，越界回傳 None
    pub fn index(&self, x: i32, y: i32) -> Option<usize> {
        if self.in_bounds(x, y) {
            Some(y as usize * self.width + x as usize)
        } else {
            None
        }
    }

    /// 越界一律視為 Unexplored
    pub fn get(&self, x: i32, y: i32) -> VisibilityState {
        self.index(x, y)
            .map(|i| VisibilityState::from_byte(self.cells[i]))
            .unwrap_or(VisibilityState::Unexplored)
    }

    pub fn set(&mut self, x: i32, y: i32, state: VisibilityState) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = state.as_byte();
        }
    }

    pub fn fill(&mut self, state: VisibilityState) {
        let b = state.as_byte();
        self.cells.iter_mut().for_each(|c| *c = b);
    }

    /// Visible 降為 Explored，其餘不動
    pub fn demote_visible(&mut self) {
        let visible = VisibilityState::Visible.as_byte();
        let explored = VisibilityState::Explored.as_byte();
        for c in self.cells.iter_mut() {
            if *c >= visible {
                *c = explored;
            }
        }
    }

    /// 逐格取最大值合併，不會降低任何格子的狀態
    pub fn merge_max(&mut self, other: &TileGrid) {
        debug_assert_eq!(self.cells.len(), other.cells.len());
        for (m, v) in self.cells.iter_mut().zip(other.cells.iter()) {
            if *v > *m {
                *m = *v;
            }
        }
    }

    /// 狀態至少為 `state` 的格子數
    pub fn count_at_least(&self, state: VisibilityState) -> usize {
        let b = state.as_byte();
        self.cells.iter().filter(|c| **c >= b).count()
    }

    pub fn bytes(&self) -> &[u8] {
        &self.cells
    }
}
