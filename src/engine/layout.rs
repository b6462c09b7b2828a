//! Nominal table geometry. Animations interpolate between slot centers in
//! this coordinate space; the host maps it onto its real canvas.

use crate::game::{pyramid, GameMode, PileId};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableMetrics {
    pub width: f64,
    pub height: f64,
    pub card_width: f64,
    pub card_height: f64,
    pub margin: f64,
    /// Vertical fan step for face-up tableau cards.
    pub tableau_step: f64,
}

impl Default for TableMetrics {
    fn default() -> Self {
        Self {
            width: 960.0,
            height: 640.0,
            card_width: 72.0,
            card_height: 96.0,
            margin: 16.0,
            tableau_step: 24.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableLayout {
    pub metrics: TableMetrics,
    pub mode: GameMode,
}

impl TableLayout {
    pub fn new(mode: GameMode, metrics: TableMetrics) -> Self {
        Self { metrics, mode }
    }

    fn column_x(&self, col: usize, columns: usize) -> f64 {
        let m = &self.metrics;
        let span = m.width - 2.0 * m.margin;
        let step = span / columns as f64;
        m.margin + step * (col as f64 + 0.5)
    }

    fn top_row_y(&self) -> f64 {
        self.metrics.margin + self.metrics.card_height / 2.0
    }

    fn tableau_y(&self, depth: usize) -> f64 {
        self.top_row_y() + self.metrics.card_height + self.metrics.tableau_step * depth as f64
    }

    /// Center of the `index`-th card of a pile. Squared piles (stock,
    /// waste, foundations) ignore the index.
    pub fn slot_center(&self, pile: PileId, index: usize) -> (f64, f64) {
        match pile {
            PileId::Stock => (self.column_x(0, 10), self.top_row_y()),
            PileId::Waste => (self.column_x(1, 10), self.top_row_y()),
            PileId::Foundation(idx) => (self.column_x(6 + idx.min(3), 10), self.top_row_y()),
            PileId::Freecell(idx) => (self.column_x(idx.min(3), 10), self.top_row_y()),
            PileId::Tableau(col) => {
                let columns = match self.mode {
                    GameMode::Spider => 10,
                    GameMode::Freecell => 8,
                    _ => 7,
                };
                (self.column_x(col, columns), self.tableau_y(index))
            }
            PileId::Pyramid(idx) => {
                let (row, col) = pyramid::slot_position(idx.min(pyramid::PYRAMID_SLOTS - 1));
                let m = &self.metrics;
                let x = m.width / 2.0
                    + (col as f64 - row as f64 / 2.0) * (m.card_width + 4.0);
                let y = self.top_row_y() + row as f64 * (m.card_height * 0.55);
                (x, y)
            }
            PileId::Discard => (self.column_x(9, 10), self.top_row_y()),
            PileId::Hand(player) => {
                let m = &self.metrics;
                (
                    self.column_x(player, 8),
                    m.height - m.margin - m.card_height / 2.0,
                )
            }
        }
    }

    /// Launch point for deal animations, just off the top-left corner.
    pub fn deal_origin(&self) -> (f64, f64) {
        (-self.metrics.card_width, -self.metrics.card_height)
    }

    pub fn off_screen_bottom(&self) -> f64 {
        self.metrics.height + self.metrics.card_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_centers_stay_inside_the_table() {
        let layout = TableLayout::new(GameMode::Klondike, TableMetrics::default());
        for pile in [
            PileId::Stock,
            PileId::Waste,
            PileId::Foundation(3),
            PileId::Tableau(6),
        ] {
            let (x, y) = layout.slot_center(pile, 5);
            assert!(x > 0.0 && x < layout.metrics.width, "{pile:?} x={x}");
            assert!(y > 0.0 && y < layout.metrics.height, "{pile:?} y={y}");
        }
    }

    #[test]
    fn pyramid_rows_descend() {
        let layout = TableLayout::new(GameMode::Pyramid, TableMetrics::default());
        let (_, apex_y) = layout.slot_center(PileId::Pyramid(0), 0);
        let (_, base_y) = layout.slot_center(PileId::Pyramid(27), 0);
        assert!(base_y > apex_y);
    }

    #[test]
    fn deeper_tableau_cards_sit_lower() {
        let layout = TableLayout::new(GameMode::Klondike, TableMetrics::default());
        let (_, shallow) = layout.slot_center(PileId::Tableau(2), 0);
        let (_, deep) = layout.slot_center(PileId::Tableau(2), 6);
        assert!(deep > shallow);
    }
}
