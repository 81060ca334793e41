//! Tile definitions, instances, and the per-game tile table.

pub mod definition;
pub mod instance;
pub mod registry;

pub use definition::{DeployType, TerritorialZone, TileAttribute, TileDefinition, TileFilter};
pub use instance::{Tile, TileLocation};
pub use registry::{GameDefinition, SetupError};
