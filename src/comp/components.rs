/// 迷霧系統使用的 ECS 組件與資源
use specs::storage::VecStorage;
use specs::Component;
use serde::{Deserialize, Serialize};
use vek::Vec2;

use crate::vision::exploration::FactionId;

/// 格子座標
#[derive(Copy, Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct TilePos(pub Vec2<i32>);

impl Component for TilePos {
    type Storage = VecStorage<Self>;
}

/// 單位視野
#[derive(Copy, Clone, Debug, Deserialize, Serialize)]
pub struct Sight {
    pub range: i32,
}

impl Component for Sight {
    type Storage = VecStorage<Self>;
}

/// 建築（瞭望塔等）提供的額外視野
#[derive(Copy, Clone, Debug, Deserialize, Serialize)]
pub struct Watchtower {
    pub vision_bonus: i32,
}

impl Component for Watchtower {
    type Storage = VecStorage<Self>;
}

/// 所屬陣營
#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Faction(pub FactionId);

impl Component for Faction {
    type Storage = VecStorage<Self>;
}

/// 目前模擬 tick
#[derive(Copy, Clone, Debug, Default)]
pub struct Tick(pub u64);
