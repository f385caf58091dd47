/// Open MOBA Fog Library
/// 
/// 格子地圖的戰爭迷霧：射線視野、陣營探索記憶、節流重算與迷霧繪製

pub mod comp;
pub mod vision;
pub mod config;
pub mod tick;

// Re-export commonly used types
pub use crate::comp::*;
pub use crate::vision::*;
