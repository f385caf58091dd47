/// 戰爭迷霧系統
///
/// 對外的唯一入口。持有所有陣營的探索記憶、當幀視野與地形遮擋，
/// 一次只合成一個「目前陣營」的迷霧給畫面使用。
use failure::Error;

use crate::comp::observer::{BuildingObserver, UnitObserver};
use crate::config::FogSetting;

use super::compositor::{Camera, FogCanvas, FogStyle, RenderCompositor, RenderStats, TileRect};
use super::computer::{VisibilityComputer, VisionParams};
use super::error::FogError;
use super::exploration::{ExplorationStore, FactionId};
use super::occlusion::TerrainOcclusionMap;
use super::state::VisibilityState;

pub struct FogOfWar {
    width: usize,
    height: usize,
    setting: FogSetting,
    terrain: TerrainOcclusionMap,
    store: ExplorationStore,
    computer: VisibilityComputer,
    compositor: RenderCompositor,
    active_faction: FactionId,
    enabled: bool,
}

impl Default for FogOfWar {
    fn default() -> Self {
        FogOfWar::new(FogSetting::default())
    }
}

impl FogOfWar {
    /// 建立空世界，使用前需呼叫 init
    pub fn new(setting: FogSetting) -> Self {
        let params = Self::params(&setting);
        Self {
            width: 0,
            height: 0,
            terrain: TerrainOcclusionMap::open(0, 0),
            store: ExplorationStore::new(0, 0),
            computer: VisibilityComputer::new(0, 0, setting.update_interval, params),
            compositor: RenderCompositor::new(FogStyle::from_setting(&setting)),
            setting,
            active_faction: 0,
            enabled: true,
        }
    }

    fn params(setting: &FogSetting) -> VisionParams {
        VisionParams {
            default_building_range: setting.default_building_range,
            elevation_bonus: setting.elevation_bonus,
            sweep: setting.sweep_mode(),
        }
    }

    /// 設定世界大小，所有陣營記憶、當幀視野與地形一併重設
    pub fn init(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.terrain = TerrainOcclusionMap::open(width, height);
        self.store = ExplorationStore::new(width, height);
        self.computer = VisibilityComputer::new(
            width,
            height,
            self.setting.update_interval,
            Self::params(&self.setting),
        );
        log::info!("戰爭迷霧初始化: {}x{}", width, height);
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// 設定地形遮擋位元組網格（長度須等於 width * height）
    pub fn set_terrain_data(&mut self, occlusion: &[u8]) -> Result<(), Error> {
        let terrain = TerrainOcclusionMap::from_bytes(self.width, self.height, occlusion).map_err(|e| {
            log::warn!("地形資料大小不符: {}", e);
            e
        })?;
        self.terrain = terrain;
        self.computer.mark_dirty();
        Ok(())
    }

    pub fn set_terrain(&mut self, terrain: TerrainOcclusionMap) -> Result<(), Error> {
        if terrain.width() != self.width || terrain.height() != self.height {
            log::warn!(
                "地形大小 {}x{} 與世界 {}x{} 不符",
                terrain.width(),
                terrain.height(),
                self.width,
                self.height
            );
            return Err(FogError::TerrainSizeMismatch {
                expected: self.width * self.height,
                actual: terrain.width() * terrain.height(),
            }
            .into());
        }
        self.terrain = terrain;
        self.computer.mark_dirty();
        Ok(())
    }

    pub fn terrain(&self) -> &TerrainOcclusionMap {
        &self.terrain
    }

    /// 切換目前陣營：舊陣營的 Visible 降為 Explored，當幀視野清空，下次更新強制重算
    pub fn set_active_faction(&mut self, faction: FactionId) {
        if faction == self.active_faction {
            return;
        }
        self.store.demote(self.active_faction);
        self.computer.clear();
        self.computer.mark_dirty();
        log::info!("目前陣營 {} -> {}", self.active_faction, faction);
        self.active_faction = faction;
    }

    pub fn active_faction(&self) -> FactionId {
        self.active_faction
    }

    /// 每個模擬 tick 呼叫一次，可能因節流而不做事；有重算時回傳 true
    pub fn update_vision(&mut self, tick: u64, units: &[UnitObserver], buildings: &[BuildingObserver]) -> bool {
        if !self.enabled {
            return false;
        }
        self.computer.update(
            tick,
            units,
            buildings,
            &self.terrain,
            &mut self.store,
            self.active_faction,
        )
    }

    fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    /// 目前陣營看這一格的狀態（記憶與當幀視野取最大值）
    pub fn visibility_state(&self, x: i32, y: i32) -> VisibilityState {
        if !self.in_bounds(x, y) {
            return VisibilityState::Unexplored;
        }
        if !self.enabled {
            return VisibilityState::Visible;
        }
        RenderCompositor::effective_state(
            self.store.get(self.active_faction),
            self.computer.visibility(),
            x,
            y,
        )
    }

    pub fn is_explored(&self, x: i32, y: i32) -> bool {
        self.visibility_state(x, y).is_explored()
    }

    /// 只看當幀視野
    pub fn is_visible(&self, x: i32, y: i32) -> bool {
        if !self.in_bounds(x, y) {
            return false;
        }
        if !self.enabled {
            return true;
        }
        self.computer.visibility().get(x, y).is_visible()
    }

    /// 任一陣營的探索記憶查詢，不受 enabled 影響
    pub fn is_explored_by(&self, faction: FactionId, x: i32, y: i32) -> bool {
        self.store.state(faction, x, y).is_explored()
    }

    /// 目前陣營的已探索百分比 (0-100)
    pub fn get_explored_percent(&self) -> f64 {
        if !self.enabled {
            return 100.0;
        }
        self.store.explored_percent(self.active_faction)
    }

    pub fn explored_percent_for(&self, faction: FactionId) -> f64 {
        self.store.explored_percent(faction)
    }

    /// 畫出鏡頭內的迷霧，view 的 end 不包含
    pub fn render<C: FogCanvas + ?Sized>(
        &self,
        canvas: &mut C,
        cam_x: f32,
        cam_y: f32,
        zoom: f32,
        view_start_x: i32,
        view_start_y: i32,
        view_end_x: i32,
        view_end_y: i32,
    ) -> RenderStats {
        self.render_view(
            canvas,
            Camera::new(cam_x, cam_y, zoom),
            TileRect::new(view_start_x, view_start_y, view_end_x, view_end_y),
        )
    }

    pub fn render_view<C: FogCanvas + ?Sized>(&self, canvas: &mut C, camera: Camera, view: TileRect) -> RenderStats {
        if !self.enabled {
            return RenderStats::default();
        }
        self.compositor.render(
            canvas,
            camera,
            view,
            self.store.get(self.active_faction),
            self.computer.visibility(),
        )
    }

    /// 關閉時所有格子都回報為已探索且可見（觀戰、除錯用）
    pub fn set_enabled(&mut self, enabled: bool) {
        if enabled && !self.enabled {
            self.computer.mark_dirty();
        }
        self.enabled = enabled;
        log::info!("戰爭迷霧 {}", if enabled { "開啟" } else { "關閉" });
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// 下一次 update_vision 強制重算
    pub fn mark_dirty(&mut self) {
        self.computer.mark_dirty();
    }

    /// 清空陣營的探索記憶；若是目前陣營，當幀視野也一併清空
    pub fn reset_faction_exploration(&mut self, faction: FactionId) {
        self.store.reset(faction);
        if faction == self.active_faction {
            self.computer.clear();
            self.computer.mark_dirty();
        }
        log::info!("陣營 {} 探索記憶已重設", faction);
    }
}
