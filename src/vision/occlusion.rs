/// 地形遮擋圖
///
/// 由外部提供的位元組網格，每格是一組旗標：是否阻擋視線、是否為高地
use bitflags::bitflags;
use failure::Error;

use super::error::FogError;

bitflags! {
    /// 單格地形旗標
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct TileFlags: u8 {
        /// 阻擋視線（沒有半遮擋）
        const BLOCKS_SIGHT = 0b0000_0001;
        /// 站在上面的單位獲得額外視野
        const ELEVATED = 0b0000_0010;
    }
}

#[derive(Debug, Clone, Default)]
pub struct TerrainOcclusionMap {
    width: usize,
    height: usize,
    flags: Vec<TileFlags>,
}

impl TerrainOcclusionMap {
    /// 全空地
    pub fn open(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            flags: vec![TileFlags::empty(); width * height],
        }
    }

    /// 從位元組網格建立，長度必須等於 width * height
    pub fn from_bytes(width: usize, height: usize, bytes: &[u8]) -> Result<Self, Error> {
        let expected = width * height;
        if bytes.len() != expected {
            return Err(FogError::TerrainSizeMismatch {
                expected,
                actual: bytes.len(),
            }
            .into());
        }
        Ok(Self {
            width,
            height,
            flags: bytes.iter().map(|b| TileFlags::from_bits_truncate(*b)).collect(),
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    fn flags_at(&self, x: i32, y: i32) -> TileFlags {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return TileFlags::empty();
        }
        self.flags[y as usize * self.width + x as usize]
    }

    /// 越界不算阻擋，射線本身會因越界而停止
    pub fn blocks_sight(&self, x: i32, y: i32) -> bool {
        self.flags_at(x, y).contains(TileFlags::BLOCKS_SIGHT)
    }

    pub fn is_elevated(&self, x: i32, y: i32) -> bool {
        self.flags_at(x, y).contains(TileFlags::ELEVATED)
    }

    pub fn set(&mut self, x: i32, y: i32, flags: TileFlags) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        let w = self.width;
        self.flags[y as usize * w + x as usize] = flags;
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.flags.iter().map(|f| f.bits()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_bytes_size_mismatch() {
        let err = TerrainOcclusionMap::from_bytes(3, 3, &[0u8; 8]).unwrap_err();
        let fog_err = err.downcast::<FogError>().unwrap();
        assert_eq!(fog_err, FogError::TerrainSizeMismatch { expected: 9, actual: 8 });
    }

    #[test]
    fn test_flags_lookup() {
        let mut bytes = vec![0u8; 4];
        bytes[1] = TileFlags::BLOCKS_SIGHT.bits();
        bytes[2] = TileFlags::ELEVATED.bits() | 0b1000_0000;
        let map = TerrainOcclusionMap::from_bytes(2, 2, &bytes).unwrap();
        assert!(map.blocks_sight(1, 0));
        assert!(!map.blocks_sight(0, 0));
        assert!(map.is_elevated(0, 1));
        assert!(!map.blocks_sight(0, 1));
        assert!(!map.blocks_sight(5, 5));
        // 未知位元被丟棄
        assert_eq!(map.to_bytes()[2], TileFlags::ELEVATED.bits());
    }
}
