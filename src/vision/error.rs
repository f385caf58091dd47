/// 戰爭迷霧錯誤
use failure::Fail;

#[derive(Debug, Clone, PartialEq, Fail)]
pub enum FogError {
    #[fail(display = "terrain grid has {} cells, world needs {}", actual, expected)]
    TerrainSizeMismatch { expected: usize, actual: usize },
    #[fail(display = "invalid fog setting `{}`: {}", field, reason)]
    InvalidSetting { field: &'static str, reason: String },
}
