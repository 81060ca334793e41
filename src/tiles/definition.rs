//! Tile definitions - static per-game tile data.
//!
//! `TileDefinition` holds the immutable, declarative properties of a tile
//! type: how it moves, what abilities it carries, where it may deploy.
//! The engine interprets this table and never mutates it.
//!
//! Instance-specific data (owner, location, protection flags) is stored
//! separately in `Tile`.

use serde::{Deserialize, Serialize};

use crate::abilities::AbilityDescriptor;
use crate::core::{Player, TeamFilter, TileCode};
use crate::movement::MovementDescriptor;

use super::instance::Tile;

/// Intrinsic tile attributes the rules read.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileAttribute {
    /// The per-player unique tile whose deployment gates captures.
    Banner,
    /// Flower-typed tile for banner capture gating.
    Flower,
    /// Occupies a 2x2 block of points instead of one.
    Gigantic,
}

/// Where a tile may be deployed from its pile.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeployType {
    /// Any empty playable point.
    Anywhere,
    /// Only temple (gate) points.
    TemplesOnly,
    /// Points orthogonally adjacent to a temple point.
    AdjacentToTemple,
    /// Points within the territorial zone of a friendly tile of the
    /// given code.
    WithinTileZone(TileCode),
}

/// A territorial zone declared by a tile type.
///
/// The zone itself is never stored: it is derived on demand as all points
/// within `size` Manhattan distance of the owning tile's point. The
/// abilities listed here are discovered exactly like the tile's own.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TerritorialZone {
    pub size: u8,
    pub abilities: Vec<AbilityDescriptor>,
}

impl TerritorialZone {
    /// A zone with no attached abilities.
    #[must_use]
    pub fn sized(size: u8) -> Self {
        Self {
            size,
            abilities: Vec::new(),
        }
    }

    /// Attach an ability (builder pattern).
    #[must_use]
    pub fn with_ability(mut self, ability: AbilityDescriptor) -> Self {
        self.abilities.push(ability);
        self
    }
}

/// Filter over tiles: by code and by team, relative to a perspective
/// player. An empty code list matches any code.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileFilter {
    pub codes: Vec<TileCode>,
    pub owners: TeamFilter,
}

impl TileFilter {
    /// Match any tile.
    #[must_use]
    pub fn any() -> Self {
        Self::default()
    }

    /// Match any friendly tile.
    #[must_use]
    pub fn friendly() -> Self {
        Self {
            codes: Vec::new(),
            owners: TeamFilter::Friendly,
        }
    }

    /// Match any enemy tile.
    #[must_use]
    pub fn enemy() -> Self {
        Self {
            codes: Vec::new(),
            owners: TeamFilter::Enemy,
        }
    }

    /// Restrict to one code (builder pattern).
    #[must_use]
    pub fn with_code(mut self, code: TileCode) -> Self {
        self.codes.push(code);
        self
    }

    /// Check a tile against the filter from `perspective`.
    #[must_use]
    pub fn matches(&self, perspective: Player, tile: &Tile) -> bool {
        if !self.owners.matches(perspective, tile.owner) {
            return false;
        }
        self.codes.is_empty() || self.codes.contains(&tile.code)
    }
}

/// Static tile definition.
///
/// ## Example
///
/// ```
/// use paisho_engine::core::TileCode;
/// use paisho_engine::movement::MovementDescriptor;
/// use paisho_engine::tiles::{DeployType, TileAttribute, TileDefinition};
///
/// let rose = TileDefinition::new(TileCode::new(1), "Rose")
///     .with_count(3)
///     .with_attribute(TileAttribute::Flower)
///     .with_movement(MovementDescriptor::standard(3))
///     .with_deploy(DeployType::Anywhere);
///
/// assert_eq!(rose.movements.len(), 1);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TileDefinition {
    /// Tile type code, unique within a game definition.
    pub code: TileCode,

    /// Tile name (for display/debugging).
    pub name: String,

    /// Copies of this tile each player starts with in their pile.
    pub count: u8,

    /// Declarative movement shapes, tried in order.
    pub movements: Vec<MovementDescriptor>,

    /// Declarative abilities.
    pub abilities: Vec<AbilityDescriptor>,

    /// Legal deployment point categories.
    pub deploy_types: Vec<DeployType>,

    /// Optional territorial zone.
    pub territorial_zone: Option<TerritorialZone>,

    /// Intrinsic attributes.
    pub attributes: Vec<TileAttribute>,
}

impl TileDefinition {
    /// Create a definition with one copy per player and nothing else.
    #[must_use]
    pub fn new(code: TileCode, name: impl Into<String>) -> Self {
        Self {
            code,
            name: name.into(),
            count: 1,
            movements: Vec::new(),
            abilities: Vec::new(),
            deploy_types: Vec::new(),
            territorial_zone: None,
            attributes: Vec::new(),
        }
    }

    /// Set the per-player copy count (builder pattern).
    #[must_use]
    pub fn with_count(mut self, count: u8) -> Self {
        self.count = count;
        self
    }

    /// Add a movement descriptor (builder pattern).
    #[must_use]
    pub fn with_movement(mut self, movement: MovementDescriptor) -> Self {
        self.movements.push(movement);
        self
    }

    /// Add an ability descriptor (builder pattern).
    #[must_use]
    pub fn with_ability(mut self, ability: AbilityDescriptor) -> Self {
        self.abilities.push(ability);
        self
    }

    /// Add a deploy type (builder pattern).
    #[must_use]
    pub fn with_deploy(mut self, deploy: DeployType) -> Self {
        self.deploy_types.push(deploy);
        self
    }

    /// Set the territorial zone (builder pattern).
    #[must_use]
    pub fn with_zone(mut self, zone: TerritorialZone) -> Self {
        self.territorial_zone = Some(zone);
        self
    }

    /// Add an attribute (builder pattern).
    #[must_use]
    pub fn with_attribute(mut self, attribute: TileAttribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Attribute membership test.
    #[must_use]
    pub fn has_attribute(&self, attribute: TileAttribute) -> bool {
        self.attributes.contains(&attribute)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TileId;
    use crate::tiles::TileLocation;

    #[test]
    fn test_definition_builder() {
        let def = TileDefinition::new(TileCode::new(2), "Dragon")
            .with_count(2)
            .with_movement(MovementDescriptor::standard(4))
            .with_deploy(DeployType::TemplesOnly)
            .with_attribute(TileAttribute::Banner);

        assert_eq!(def.name, "Dragon");
        assert_eq!(def.count, 2);
        assert_eq!(def.movements.len(), 1);
        assert!(def.has_attribute(TileAttribute::Banner));
        assert!(!def.has_attribute(TileAttribute::Gigantic));
    }

    #[test]
    fn test_tile_filter_codes() {
        let mut tile = Tile::new(TileId::new(1), TileCode::new(5), Player::Host);
        tile.location = TileLocation::Pile;

        let any = TileFilter::any();
        assert!(any.matches(Player::Host, &tile));
        assert!(any.matches(Player::Guest, &tile));

        let coded = TileFilter::any().with_code(TileCode::new(5));
        assert!(coded.matches(Player::Host, &tile));

        let other = TileFilter::any().with_code(TileCode::new(6));
        assert!(!other.matches(Player::Host, &tile));
    }

    #[test]
    fn test_tile_filter_teams() {
        let tile = Tile::new(TileId::new(1), TileCode::new(5), Player::Guest);

        assert!(TileFilter::enemy().matches(Player::Host, &tile));
        assert!(!TileFilter::friendly().matches(Player::Host, &tile));
        assert!(TileFilter::friendly().matches(Player::Guest, &tile));
    }

    #[test]
    fn test_zone_builder() {
        let zone = TerritorialZone::sized(6);
        assert_eq!(zone.size, 6);
        assert!(zone.abilities.is_empty());
    }

    #[test]
    fn test_definition_serialization() {
        let def = TileDefinition::new(TileCode::new(1), "Rose")
            .with_movement(MovementDescriptor::standard(3));
        let json = serde_json::to_string(&def).unwrap();
        let back: TileDefinition = serde_json::from_str(&json).unwrap();
        assert_eq!(back, def);
    }
}
