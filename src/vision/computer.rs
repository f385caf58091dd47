/// 視野計算器
///
/// 匯整所有觀察者成為一幀的可見網格，並依節流規則決定是否重算。
/// 重算順序固定為：降級上一幀 → 重新投射 → 合併進陣營記憶，
/// 呼叫端永遠看不到新舊混合的狀態。
use crate::comp::observer::{BuildingObserver, UnitObserver};

use super::exploration::{ExplorationStore, FactionId};
use super::grid::TileGrid;
use super::occlusion::TerrainOcclusionMap;
use super::ray_caster::{cast_visibility_circle, SweepMode};
use super::state::VisibilityState;
use super::throttle::RecomputePolicy;

/// 視野半徑相關參數
#[derive(Debug, Clone, Copy)]
pub struct VisionParams {
    pub default_building_range: i32,
    pub elevation_bonus: i32,
    pub sweep: SweepMode,
}

impl Default for VisionParams {
    fn default() -> Self {
        Self {
            default_building_range: 6,
            elevation_bonus: 2,
            sweep: SweepMode::default(),
        }
    }
}

pub struct VisibilityComputer {
    visibility: TileGrid,
    policy: RecomputePolicy,
    params: VisionParams,
}

impl VisibilityComputer {
    pub fn new(width: usize, height: usize, update_interval: u64, params: VisionParams) -> Self {
        Self {
            visibility: TileGrid::new(width, height),
            policy: RecomputePolicy::new(update_interval),
            params,
        }
    }

    /// 當幀視野
    pub fn visibility(&self) -> &TileGrid {
        &self.visibility
    }

    pub fn mark_dirty(&mut self) {
        self.policy.mark_dirty();
    }

    /// 清空當幀視野
    pub fn clear(&mut self) {
        self.visibility.fill(VisibilityState::Unexplored);
    }

    /// 單位的實際視野：基礎視野，站在高地上再加成
    pub fn unit_radius(&self, unit: &UnitObserver, terrain: &TerrainOcclusionMap) -> i32 {
        if terrain.is_elevated(unit.x, unit.y) {
            unit.vision_range.saturating_add(self.params.elevation_bonus)
        } else {
            unit.vision_range
        }
    }

    pub fn building_radius(&self, building: &BuildingObserver) -> i32 {
        self.params.default_building_range.saturating_add(building.vision_bonus)
    }

    /// 依節流規則更新視野，有重算時回傳 true
    pub fn update(
        &mut self,
        tick: u64,
        units: &[UnitObserver],
        buildings: &[BuildingObserver],
        terrain: &TerrainOcclusionMap,
        store: &mut ExplorationStore,
        faction: FactionId,
    ) -> bool {
        if !self.policy.needs_recompute(tick) {
            log::trace!("tick {} 視野節流略過", tick);
            return false;
        }

        // 1. 上一幀的 Visible 一律降為 Explored
        store.demote(faction);
        self.clear();

        // 2. 所有觀察者重新投射
        let sweep = self.params.sweep;
        let blocking = |x: i32, y: i32| terrain.blocks_sight(x, y);
        for unit in units {
            let radius = self.unit_radius(unit, terrain);
            cast_visibility_circle(&mut self.visibility, unit.x, unit.y, radius, sweep, &blocking);
        }
        for building in buildings {
            let radius = self.building_radius(building);
            cast_visibility_circle(&mut self.visibility, building.x, building.y, radius, sweep, &blocking);
        }

        // 3. 合併進陣營記憶
        store.merge(faction, &self.visibility);
        self.policy.record(tick);

        log::debug!(
            "tick {} 陣營 {} 視野重算: {} 單位, {} 建築, {} 格可見",
            tick,
            faction,
            units.len(),
            buildings.len(),
            self.visibility.count_at_least(VisibilityState::Visible)
        );
        true
    }
}
