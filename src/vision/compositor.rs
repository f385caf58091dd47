/// 迷霧繪製
///
/// 只處理鏡頭內的格子。目前可見的格子完全不畫，
/// 其他格子依四鄰可見數量把透明度往下調，做出柔和的邊緣。
use vek::Rgba;

use crate::config::FogSetting;

use super::grid::TileGrid;
use super::state::VisibilityState;

/// 繪圖目標
pub trait FogCanvas {
    /// 以螢幕座標填滿矩形，color.a 為透明度
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgba<f32>);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub x: f32,
    pub y: f32,
    pub zoom: f32,
}

impl Camera {
    pub fn new(x: f32, y: f32, zoom: f32) -> Self {
        Self { x, y, zoom }
    }
}

/// 鏡頭內的格子範圍，end 不包含
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileRect {
    pub start_x: i32,
    pub start_y: i32,
    pub end_x: i32,
    pub end_y: i32,
}

impl TileRect {
    pub fn new(start_x: i32, start_y: i32, end_x: i32, end_y: i32) -> Self {
        Self { start_x, start_y, end_x, end_y }
    }

    /// 裁切到世界範圍內
    pub fn clip(&self, width: usize, height: usize) -> TileRect {
        TileRect {
            start_x: self.start_x.max(0),
            start_y: self.start_y.max(0),
            end_x: self.end_x.min(width as i32),
            end_y: self.end_y.min(height as i32),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// 實際畫出的格子
    pub drawn: usize,
    /// 因為可見而略過的格子
    pub skipped_visible: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct FogStyle {
    pub unexplored_alpha: f32,
    pub explored_alpha: f32,
    pub edge_softening: f32,
    pub tile_size: f32,
    pub color: Rgba<f32>,
}

impl Default for FogStyle {
    fn default() -> Self {
        FogStyle::from_setting(&FogSetting::default())
    }
}

impl FogStyle {
    pub fn from_setting(setting: &FogSetting) -> Self {
        Self {
            unexplored_alpha: setting.unexplored_alpha,
            explored_alpha: setting.explored_alpha,
            edge_softening: setting.edge_softening,
            tile_size: setting.tile_size,
            color: setting.fog_rgb(),
        }
    }
}

const NEIGHBORS: [(i32, i32); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];

pub struct RenderCompositor {
    style: FogStyle,
}

impl RenderCompositor {
    pub fn new(style: FogStyle) -> Self {
        Self { style }
    }

    pub fn style(&self) -> &FogStyle {
        &self.style
    }

    /// 記憶與當幀視野取最大值
    pub fn effective_state(memory: Option<&TileGrid>, visibility: &TileGrid, x: i32, y: i32) -> VisibilityState {
        let remembered = memory.map(|m| m.get(x, y)).unwrap_or(VisibilityState::Unexplored);
        remembered.max(visibility.get(x, y))
    }

    /// 單格的迷霧透明度，可見格回傳 None
    ///
    /// 鄰居取的是合併後的狀態，所以從未探索過的格子也會被旁邊的可見格照亮一點
    pub fn tile_alpha(&self, memory: Option<&TileGrid>, visibility: &TileGrid, x: i32, y: i32) -> Option<f32> {
        let base = match Self::effective_state(memory, visibility, x, y) {
            VisibilityState::Visible => return None,
            VisibilityState::Explored => self.style.explored_alpha,
            VisibilityState::Unexplored => self.style.unexplored_alpha,
        };

        let mut total = 0;
        let mut lit = 0;
        for (dx, dy) in NEIGHBORS.iter() {
            let (nx, ny) = (x + dx, y + dy);
            if !visibility.in_bounds(nx, ny) {
                continue;
            }
            total += 1;
            if Self::effective_state(memory, visibility, nx, ny) == VisibilityState::Visible {
                lit += 1;
            }
        }
        if total == 0 {
            return Some(base);
        }
        Some(base * (1.0 - self.style.edge_softening * lit as f32 / total as f32))
    }

    /// 畫出鏡頭內的迷霧
    pub fn render<C: FogCanvas + ?Sized>(
        &self,
        canvas: &mut C,
        camera: Camera,
        view: TileRect,
        memory: Option<&TileGrid>,
        visibility: &TileGrid,
    ) -> RenderStats {
        let mut stats = RenderStats::default();
        let view = view.clip(visibility.width(), visibility.height());
        let size = self.style.tile_size * camera.zoom;

        for y in view.start_y..view.end_y {
            for x in view.start_x..view.end_x {
                let alpha = match self.tile_alpha(memory, visibility, x, y) {
                    Some(a) => a,
                    None => {
                        stats.skipped_visible += 1;
                        continue;
                    }
                };
                let sx = (x as f32 * self.style.tile_size - camera.x) * camera.zoom;
                let sy = (y as f32 * self.style.tile_size - camera.y) * camera.zoom;
                let color = Rgba::new(self.style.color.r, self.style.color.g, self.style.color.b, alpha);
                canvas.fill_rect(sx, sy, size, size, color);
                stats.drawn += 1;
            }
        }
        stats
    }
}
