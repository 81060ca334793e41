//! Board model: point arena, geometry queries, tile seating.

pub mod grid;
pub mod point;

pub use grid::{Board, BoardLayout, Direction};
pub use point::{BoardPoint, Occupancy, PointIndex, PointType, PointTypeSet};
