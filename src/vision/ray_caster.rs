/// 射線投射
///
/// 從中心格向外發出整數 Bresenham 射線，遇到遮擋、越界或超出半徑就停止。
/// 純函數，不持有任何狀態，結果寫入呼叫端提供的網格。
use bresenham::Bresenham;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::iter;

use super::grid::TileGrid;
use super::state::VisibilityState;

/// 預設角度取樣密度（圓周長的倍數）
pub const DEFAULT_ANGULAR_DENSITY: f64 = 1.5;

/// 射線的取樣方式
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SweepMode {
    /// 沿圓周取樣角度，每個角度一條射線
    Angular { density: f64 },
    /// 逐列取弦，對圓內每一格各發一條射線；較慢但不會漏格
    Scanline,
}

impl Default for SweepMode {
    fn default() -> Self {
        SweepMode::Angular {
            density: DEFAULT_ANGULAR_DENSITY,
        }
    }
}

/// 標記以 (cx, cy) 為中心、半徑 radius 的可見圓
///
/// 中心格一定會被標記（即使 radius <= 0），中心格本身永遠不視為遮擋。
/// 中心在世界外時什麼都不標記。
/// radius 會先截到世界寬加高，超過的部分本來就不可能落在世界內。
pub fn cast_visibility_circle<F>(
    out: &mut TileGrid,
    cx: i32,
    cy: i32,
    radius: i32,
    mode: SweepMode,
    is_blocking: F,
) where
    F: Fn(i32, i32) -> bool,
{
    if !out.in_bounds(cx, cy) {
        return;
    }
    out.set(cx, cy, VisibilityState::Visible);
    if radius <= 0 {
        return;
    }

    let radius = radius.min(world_reach(out)) as i64;
    let r2 = radius * radius;
    let origin = (cx as i64, cy as i64);
    match mode {
        SweepMode::Angular { density } => {
            // 射線瞄準兩倍半徑外的點，由 r2 截斷；取樣數取 8 的倍數，確保有正對角線的射線
            let reach = (radius * 2) as f64;
            let samples = ((2.0 * PI * reach * density).ceil() as usize).max(8);
            let steps = (samples + 7) / 8 * 8;
            for i in 0..steps {
                let angle = i as f64 / steps as f64 * 2.0 * PI;
                let ex = origin.0 + (angle.cos() * reach).round() as i64;
                let ey = origin.1 + (angle.sin() * reach).round() as i64;
                trace_ray(out, origin, (ex, ey), r2, &is_blocking);
            }
        }
        SweepMode::Scanline => {
            for dy in -radius..=radius {
                let half = isqrt(r2 - dy * dy);
                for dx in -half..=half {
                    trace_ray(out, origin, (origin.0 + dx, origin.1 + dy), r2, &is_blocking);
                }
            }
        }
    }
}

/// 世界內任兩格的距離上限
fn world_reach(out: &TileGrid) -> i32 {
    out.width()
        .saturating_add(out.height())
        .min((i32::MAX / 4) as usize) as i32
}

/// 沿一條射線標記可見格，遇到停止條件立即結束（該格不標記）
fn trace_ray<F>(out: &mut TileGrid, origin: (i64, i64), end: (i64, i64), r2: i64, is_blocking: &F)
where
    F: Fn(i32, i32) -> bool,
{
    let start = (origin.0 as isize, origin.1 as isize);
    let stop = (end.0 as isize, end.1 as isize);

    // Bresenham 迭代器不含終點
    let points = Bresenham::new(start, stop).chain(iter::once(stop));
    for (px, py) in points {
        if (px, py) == start {
            continue;
        }
        let dx = px as i64 - origin.0;
        let dy = py as i64 - origin.1;
        if dx * dx + dy * dy > r2 {
            return;
        }
        let (x, y) = match (i32::try_from(px), i32::try_from(py)) {
            (Ok(x), Ok(y)) => (x, y),
            _ => return,
        };
        if !out.in_bounds(x, y) {
            return;
        }
        if is_blocking(x, y) {
            return;
        }
        out.set(x, y, VisibilityState::Visible);
    }
}

fn isqrt(n: i64) -> i64 {
    if n <= 0 {
        return 0;
    }
    let mut r = (n as f64).sqrt() as i64;
    while r * r > n {
        r -= 1;
    }
    while (r + 1) * (r + 1) <= n {
        r += 1;
    }
    r
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open(_: i32, _: i32) -> bool {
        false
    }

    fn disk(cx: i32, cy: i32, r: i32) -> Vec<(i32, i32)> {
        let mut tiles = Vec::new();
        for dy in -r..=r {
            for dx in -r..=r {
                if dx * dx + dy * dy <= r * r {
                    tiles.push((cx + dx, cy + dy));
                }
            }
        }
        tiles
    }

    fn visible(grid: &TileGrid, x: i32, y: i32) -> bool {
        grid.get(x, y) == VisibilityState::Visible
    }

    #[test]
    fn test_zero_radius_marks_only_center() {
        for mode in [SweepMode::default(), SweepMode::Scanline] {
            let mut grid = TileGrid::new(9, 9);
            cast_visibility_circle(&mut grid, 4, 4, 0, mode, open);
            assert_eq!(grid.count_at_least(VisibilityState::Visible), 1);
            assert!(visible(&grid, 4, 4));

            let mut grid = TileGrid::new(9, 9);
            cast_visibility_circle(&mut grid, 4, 4, -3, mode, open);
            assert_eq!(grid.count_at_least(VisibilityState::Visible), 1);
        }
    }

    #[test]
    fn test_center_outside_world_marks_nothing() {
        let mut grid = TileGrid::new(10, 10);
        cast_visibility_circle(&mut grid, 12, 5, 3, SweepMode::default(), open);
        assert_eq!(grid.count_at_least(VisibilityState::Visible), 0);
    }

    #[test]
    fn test_never_marks_beyond_radius() {
        for r in 1..=12 {
            for mode in [SweepMode::default(), SweepMode::Scanline] {
                let mut grid = TileGrid::new(41, 41);
                cast_visibility_circle(&mut grid, 20, 20, r, mode, open);
                for y in 0..41 {
                    for x in 0..41 {
                        if visible(&grid, x, y) {
                            let (dx, dy) = (x - 20, y - 20);
                            assert!(dx * dx + dy * dy <= r * r, "r={} ({}, {})", r, x, y);
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_scanline_is_gap_free() {
        for r in 0..=15 {
            let mut grid = TileGrid::new(61, 61);
            cast_visibility_circle(&mut grid, 30, 30, r, SweepMode::Scanline, open);
            let expected = disk(30, 30, r);
            for (x, y) in &expected {
                assert!(visible(&grid, *x, *y), "r={} missing ({}, {})", r, x, y);
            }
            assert_eq!(grid.count_at_least(VisibilityState::Visible), expected.len());
        }
    }

    #[test]
    fn test_angular_default_is_gap_free() {
        for r in 1..=20 {
            let mut grid = TileGrid::new(41, 41);
            cast_visibility_circle(&mut grid, 20, 20, r, SweepMode::default(), open);
            let expected = disk(20, 20, r);
            for (x, y) in &expected {
                assert!(visible(&grid, *x, *y), "r={} missing ({}, {})", r, x, y);
            }
            assert_eq!(grid.count_at_least(VisibilityState::Visible), expected.len());
        }
    }

    #[test]
    fn test_angular_covers_diagonal_near_center() {
        // 中心附近距離 √2、√5 的格子
        for r in 2..=3 {
            let mut grid = TileGrid::new(9, 9);
            cast_visibility_circle(&mut grid, r, r, r, SweepMode::default(), open);
            assert!(visible(&grid, r + 1, r + 1));
            assert!(visible(&grid, r + 1, r - 1));
            if r == 3 {
                for (dx, dy) in [(-1, -2), (1, -2), (2, -1), (2, 1), (-1, 2), (1, 2)] {
                    assert!(visible(&grid, r + dx, r + dy), "({}, {})", dx, dy);
                }
            }
        }
    }

    #[test]
    fn test_huge_radius_is_clamped_to_world() {
        for mode in [SweepMode::default(), SweepMode::Scanline] {
            let mut grid = TileGrid::new(10, 10);
            cast_visibility_circle(&mut grid, 5, 5, i32::MAX, mode, open);
            assert_eq!(grid.count_at_least(VisibilityState::Visible), 100);

            let mut grid = TileGrid::new(10, 10);
            cast_visibility_circle(&mut grid, 9, 0, i32::MAX - 1, mode, |x, _| x == 4);
            assert!(visible(&grid, 5, 9));
            assert!(!visible(&grid, 3, 0));
        }
    }

    #[test]
    fn test_single_blocker_casts_hard_shadow() {
        let blocker = |x: i32, y: i32| (x, y) == (5, 6);
        for mode in [SweepMode::default(), SweepMode::Scanline] {
            let mut grid = TileGrid::new(10, 10);
            cast_visibility_circle(&mut grid, 5, 9, 5, mode, blocker);

            // 遮擋物後方整條射線都看不到
            assert!(!visible(&grid, 5, 6));
            assert!(!visible(&grid, 5, 5));
            assert!(!visible(&grid, 5, 4));
            assert!(!visible(&grid, 5, 3));
            // 遮擋物前方與旁邊的射線不受影響
            assert!(visible(&grid, 5, 7));
            assert!(visible(&grid, 5, 8));
            assert!(visible(&grid, 8, 8));
            assert!(visible(&grid, 3, 6));
            assert!(visible(&grid, 7, 6));
            assert!(visible(&grid, 2, 5));
            assert!(visible(&grid, 8, 5));
        }
    }

    #[test]
    fn test_wall_blocks_everything_behind_it() {
        let wall = |x: i32, _: i32| x == 7;
        for mode in [SweepMode::default(), SweepMode::Scanline] {
            let mut grid = TileGrid::new(12, 12);
            cast_visibility_circle(&mut grid, 5, 5, 4, mode, wall);
            for y in 0..12 {
                for x in 7..12 {
                    assert!(!visible(&grid, x, y));
                }
            }
            assert!(visible(&grid, 6, 5));
            assert!(visible(&grid, 3, 5));
        }
    }

    #[test]
    fn test_origin_is_never_blocking() {
        let on_self = |x: i32, y: i32| (x, y) == (5, 5);
        let mut grid = TileGrid::new(10, 10);
        cast_visibility_circle(&mut grid, 5, 5, 3, SweepMode::Scanline, on_self);
        assert_eq!(grid.count_at_least(VisibilityState::Visible), disk(5, 5, 3).len());

        // 其餘全是牆時只看得到自己
        let everywhere = |_: i32, _: i32| true;
        let mut grid = TileGrid::new(10, 10);
        cast_visibility_circle(&mut grid, 5, 5, 3, SweepMode::default(), everywhere);
        assert_eq!(grid.count_at_least(VisibilityState::Visible), 1);
    }

    #[test]
    fn test_corner_observer_stays_in_bounds() {
        let mut grid = TileGrid::new(10, 10);
        cast_visibility_circle(&mut grid, 0, 0, 3, SweepMode::Scanline, open);
        let expected = disk(0, 0, 3)
            .into_iter()
            .filter(|(x, y)| *x >= 0 && *y >= 0)
            .count();
        assert_eq!(grid.count_at_least(VisibilityState::Visible), expected);
        assert!(visible(&grid, 0, 3));
        assert!(visible(&grid, 3, 0));
    }

    #[test]
    fn test_isqrt() {
        assert_eq!(isqrt(0), 0);
        assert_eq!(isqrt(8), 2);
        assert_eq!(isqrt(9), 3);
        assert_eq!(isqrt(24), 4);
        assert_eq!(isqrt(25), 5);
    }
}
