//! The garden reference game.
//!
//! A small Pai Sho style game: the standard 17x17 diamond with four edge
//! temples and red/white gardens around the center, plus a tile table
//! covering the whole declarative vocabulary.

mod tiles;

pub use tiles::{
    garden_definition, BADGERMOLE, DRAGON, GINSENG, JADE, KOI, LOTUS, ORCHID, PHOENIX, ROSE,
    TURTLE, WHEEL,
};

use crate::board::{BoardLayout, PointType};
use crate::core::Coord;

/// Board side length of the garden game.
pub const BOARD_SIZE: u8 = 17;

/// The garden board layout: a size-17 diamond, temples at the four edge
/// midpoints, red gardens in the NE/SW center quadrants and white in the
/// NW/SE ones.
#[must_use]
pub fn garden_layout() -> BoardLayout {
    let mid = BOARD_SIZE / 2;
    let mut layout = BoardLayout::diamond(BOARD_SIZE)
        .with_point_type(Coord::new(0, mid), PointType::Temple)
        .with_point_type(Coord::new(mid, 0), PointType::Temple)
        .with_point_type(Coord::new(mid, BOARD_SIZE - 1), PointType::Temple)
        .with_point_type(Coord::new(BOARD_SIZE - 1, mid), PointType::Temple);

    for row in 0..BOARD_SIZE {
        for col in 0..BOARD_SIZE {
            let dr = row as i32 - mid as i32;
            let dc = col as i32 - mid as i32;
            if dr.abs() + dc.abs() > 4 || dr == 0 || dc == 0 {
                continue;
            }
            let garden = if dr * dc < 0 {
                PointType::Red
            } else {
                PointType::White
            };
            layout = layout.with_point_type(Coord::new(row, col), garden);
        }
    }
    layout
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;

    #[test]
    fn test_layout_has_four_temples() {
        let board = Board::new(&garden_layout());
        let temples = board
            .playable_points()
            .filter(|&p| board.point(p).has_type(PointType::Temple))
            .count();
        assert_eq!(temples, 4);
    }

    #[test]
    fn test_gardens_split_by_quadrant() {
        let board = Board::new(&garden_layout());
        // NE of center: red. NW of center: white.
        let ne = board.point_at(6, 10).unwrap();
        assert!(ne.has_type(PointType::Red));
        let nw = board.point_at(6, 6).unwrap();
        assert!(nw.has_type(PointType::White));
        // Axis points stay neutral.
        let axis = board.point_at(8, 10).unwrap();
        assert!(!axis.has_type(PointType::Red));
        assert!(!axis.has_type(PointType::White));
    }
}
