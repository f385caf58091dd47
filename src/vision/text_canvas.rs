/// 文字畫布
///
/// 把迷霧疊層畫成字元格，給主程式和日誌使用
use vek::Rgba;

use super::compositor::FogCanvas;

pub struct TextCanvas {
    cols: usize,
    rows: usize,
    cell: f32,
    alpha: Vec<Option<f32>>,
}

impl TextCanvas {
    /// cell 為一個字元對應的螢幕像素
    pub fn new(cols: usize, rows: usize, cell: f32) -> Self {
        Self {
            cols,
            rows,
            cell,
            alpha: vec![None; cols * rows],
        }
    }

    pub fn alpha_at(&self, col: usize, row: usize) -> Option<f32> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        self.alpha[row * self.cols + col]
    }

    fn glyph(alpha: Option<f32>) -> char {
        match alpha {
            None => '.',
            Some(a) if a < 0.4 => '-',
            Some(a) if a < 0.7 => '+',
            Some(_) => '#',
        }
    }

    pub fn to_text(&self) -> String {
        let mut out = String::with_capacity((self.cols + 1) * self.rows);
        for row in 0..self.rows {
            for col in 0..self.cols {
                out.push(Self::glyph(self.alpha[row * self.cols + col]));
            }
            out.push('\n');
        }
        out
    }
}

impl FogCanvas for TextCanvas {
    fn fill_rect(&mut self, x: f32, y: f32, _w: f32, _h: f32, color: Rgba<f32>) {
        if x < 0.0 || y < 0.0 || self.cell <= 0.0 {
            return;
        }
        let col = (x / self.cell).floor() as usize;
        let row = (y / self.cell).floor() as usize;
        if col >= self.cols || row >= self.rows {
            return;
        }
        let slot = &mut self.alpha[row * self.cols + col];
        *slot = Some(slot.map_or(color.a, |a| a.max(color.a)));
    }
}
