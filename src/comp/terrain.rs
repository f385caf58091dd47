/// 地形圖
///
/// 以格子為單位的地形類型，可由設定檔的區域描述建立，
/// 並輸出給迷霧系統使用的遮擋旗標網格
use serde::{Deserialize, Serialize};
use vek::Vec2;

use crate::vision::occlusion::{TerrainOcclusionMap, TileFlags};

/// 地形類型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TerrainType {
    /// 平地 - 無遮擋
    Ground = 0,
    /// 高地 - 提供視野優勢
    Hill = 1,
    /// 森林 - 遮擋視野
    Forest = 2,
    /// 水面 - 無遮擋
    Water = 3,
    /// 建築 - 遮擋視野
    Building = 4,
    /// 懸崖 - 遮擋視野
    Cliff = 5,
}

impl TerrainType {
    pub fn flags(self) -> TileFlags {
        match self {
            TerrainType::Forest | TerrainType::Building | TerrainType::Cliff => TileFlags::BLOCKS_SIGHT,
            TerrainType::Hill => TileFlags::ELEVATED,
            TerrainType::Ground | TerrainType::Water => TileFlags::empty(),
        }
    }
}

impl Default for TerrainType {
    fn default() -> Self {
        TerrainType::Ground
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum RegionShape {
    Rectangle,
    Circle,
}

/// 地形區域定義（單位：格）
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TerrainRegion {
    pub name: String,
    pub terrain_type: TerrainType,
    pub center_x: f32,
    pub center_y: f32,
    pub width: f32,
    pub height: f32,
    pub shape: RegionShape,
}

/// 地圖設定
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct TerrainConfig {
    pub width: usize,
    pub height: usize,
    pub regions: Vec<TerrainRegion>,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            width: 64,
            height: 64,
            regions: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TerrainMap {
    pub width: usize,
    pub height: usize,
    tiles: Vec<TerrainType>,
}

impl TerrainMap {
    /// 全平地
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            tiles: vec![TerrainType::Ground; width * height],
        }
    }

    /// 依序套用區域，後面的覆蓋前面的
    pub fn from_config(config: &TerrainConfig) -> Self {
        let mut map = Self::new(config.width, config.height);
        for region in &config.regions {
            map.apply_region(region);
        }
        log::debug!("地形建立完成: {}x{}，{} 個區域", map.width, map.height, config.regions.len());
        map
    }

    pub fn apply_region(&mut self, region: &TerrainRegion) {
        match region.shape {
            RegionShape::Rectangle => self.apply_rectangle_region(region),
            RegionShape::Circle => self.apply_circle_region(region),
        }
    }

    /// 以格子中心判斷是否落在矩形內
    fn apply_rectangle_region(&mut self, region: &TerrainRegion) {
        let min_x = region.center_x - region.width * 0.5;
        let max_x = region.center_x + region.width * 0.5;
        let min_y = region.center_y - region.height * 0.5;
        let max_y = region.center_y + region.height * 0.5;

        let (x0, x1) = self.clamp_span(min_x, max_x, self.width);
        let (y0, y1) = self.clamp_span(min_y, max_y, self.height);
        for y in y0..y1 {
            for x in x0..x1 {
                let cx = x as f32 + 0.5;
                let cy = y as f32 + 0.5;
                if cx >= min_x && cx <= max_x && cy >= min_y && cy <= max_y {
                    self.tiles[y * self.width + x] = region.terrain_type;
                }
            }
        }
    }

    fn apply_circle_region(&mut self, region: &TerrainRegion) {
        let radius = region.width.min(region.height) * 0.5;
        let center = Vec2::new(region.center_x, region.center_y);

        let (x0, x1) = self.clamp_span(region.center_x - radius, region.center_x + radius, self.width);
        let (y0, y1) = self.clamp_span(region.center_y - radius, region.center_y + radius, self.height);
        for y in y0..y1 {
            for x in x0..x1 {
                let pos = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                if center.distance(pos) <= radius {
                    self.tiles[y * self.width + x] = region.terrain_type;
                }
            }
        }
    }

    fn clamp_span(&self, min: f32, max: f32, limit: usize) -> (usize, usize) {
        let lo = (min.floor() as i64).clamp(0, limit as i64) as usize;
        let hi = (max.ceil() as i64).clamp(0, limit as i64) as usize;
        (lo, hi)
    }

    pub fn terrain_at(&self, x: i32, y: i32) -> TerrainType {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return TerrainType::Ground;
        }
        self.tiles[y as usize * self.width + x as usize]
    }

    pub fn set(&mut self, x: usize, y: usize, terrain: TerrainType) {
        if x < self.width && y < self.height {
            self.tiles[y * self.width + x] = terrain;
        }
    }

    /// 輸出迷霧系統用的遮擋旗標位元組網格
    pub fn occlusion_bytes(&self) -> Vec<u8> {
        self.tiles.iter().map(|t| t.flags().bits()).collect()
    }

    pub fn to_occlusion_map(&self) -> TerrainOcclusionMap {
        let mut map = TerrainOcclusionMap::open(self.width, self.height);
        for y in 0..self.height {
            for x in 0..self.width {
                map.set(x as i32, y as i32, self.tiles[y * self.width + x].flags());
            }
        }
        map
    }
}
