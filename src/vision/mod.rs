/// 戰爭迷霧模組
/// 
/// 射線視野、各陣營探索記憶、節流重算與迷霧繪製
pub mod state;
pub mod grid;
pub mod error;
pub mod occlusion;
pub mod ray_caster;
pub mod exploration;
pub mod throttle;
pub mod computer;
pub mod compositor;
pub mod text_canvas;
pub mod fog_of_war;

pub use self::{
    state::VisibilityState,
    grid::TileGrid,
    error::FogError,
    occlusion::{TerrainOcclusionMap, TileFlags},
    ray_caster::{cast_visibility_circle, SweepMode},
    exploration::{ExplorationStore, FactionId},
    throttle::RecomputePolicy,
    computer::{VisibilityComputer, VisionParams},
    compositor::{Camera, FogCanvas, FogStyle, RenderCompositor, RenderStats, TileRect},
    text_canvas::TextCanvas,
    fog_of_war::FogOfWar,
};
