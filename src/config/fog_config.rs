/// 戰爭迷霧設定
///
/// 從 fog.toml 讀取，缺少的欄位使用預設值
use failure::Error;
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;
use vek::Rgba;

use crate::comp::terrain::TerrainConfig;
use crate::vision::error::FogError;
use crate::vision::ray_caster::{SweepMode, DEFAULT_ANGULAR_DENSITY};

pub const CONFIG_FILE: &str = "fog.toml";

/// 射線取樣方式（設定檔用）
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum SweepKind {
    Angular,
    Scanline,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct FogSetting {
    /// 兩次重算之間最少間隔幾個 tick
    pub update_interval: u64,
    /// 建築基礎視野半徑（格）
    pub default_building_range: i32,
    /// 單位站在高地上的額外視野
    pub elevation_bonus: i32,
    /// 未探索格子的迷霧透明度
    pub unexplored_alpha: f32,
    /// 已探索但不在視野內的透明度
    pub explored_alpha: f32,
    /// 邊緣柔化強度：alpha *= 1 - edge_softening * 可見鄰居比例
    pub edge_softening: f32,
    /// 每格像素
    pub tile_size: f32,
    pub fog_color: [u8; 3],
    pub sweep: SweepKind,
    pub angular_density: f64,
}

impl Default for FogSetting {
    fn default() -> Self {
        Self {
            update_interval: 5,
            default_building_range: 6,
            elevation_bonus: 2,
            unexplored_alpha: 0.95,
            explored_alpha: 0.5,
            edge_softening: 0.5,
            tile_size: 32.0,
            fog_color: [0, 0, 0],
            sweep: SweepKind::Angular,
            angular_density: DEFAULT_ANGULAR_DENSITY,
        }
    }
}

impl FogSetting {
    pub fn sweep_mode(&self) -> SweepMode {
        match self.sweep {
            SweepKind::Angular => SweepMode::Angular {
                density: self.angular_density,
            },
            SweepKind::Scanline => SweepMode::Scanline,
        }
    }

    pub fn fog_rgb(&self) -> Rgba<f32> {
        let [r, g, b] = self.fog_color;
        Rgba::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0)
    }

    /// 檢查數值範圍
    pub fn validate(&self) -> Result<(), FogError> {
        if self.update_interval == 0 {
            return Err(invalid("update_interval", "must be at least 1 tick"));
        }
        for (field, alpha) in [
            ("unexplored_alpha", self.unexplored_alpha),
            ("explored_alpha", self.explored_alpha),
            ("edge_softening", self.edge_softening),
        ] {
            if !(0.0..=1.0).contains(&alpha) {
                return Err(invalid(field, &format!("{} is outside [0, 1]", alpha)));
            }
        }
        if !(self.tile_size > 0.0) {
            return Err(invalid("tile_size", "must be positive"));
        }
        if !(self.angular_density > 0.0) {
            return Err(invalid("angular_density", "must be positive"));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: &str) -> FogError {
    FogError::InvalidSetting {
        field,
        reason: reason.to_string(),
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(default)]
pub struct Setting {
    pub fog: FogSetting,
    pub map: TerrainConfig,
}

impl FromStr for Setting {
    type Err = Error;

    /// 解析 toml 並檢查數值
    fn from_str(s: &str) -> Result<Self, Error> {
        let setting: Setting = toml::from_str(s)?;
        setting.fog.validate()?;
        Ok(setting)
    }
}

impl Setting {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let mut file = File::open(path.as_ref())?;
        let mut str_val = String::new();
        file.read_to_string(&mut str_val)?;
        str_val.parse()
    }

    /// 讀不到或格式錯誤時退回預設值
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match Self::from_file(path.as_ref()) {
            Ok(s) => s,
            Err(e) => {
                log::warn!("讀取 {} 失敗，使用預設設定: {}", path.as_ref().display(), e);
                Setting::default()
            }
        }
    }
}

lazy_static! {
    pub static ref CONFIG: Setting = Setting::load_or_default(CONFIG_FILE);
}
