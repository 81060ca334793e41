//! Runtime ability instances.
//!
//! Descriptors are static data; an `Ability` is one descriptor evaluated
//! against one board state, carrying its resolved trigger outcomes and
//! targets. Instances are rebuilt from scratch each processing pass; an
//! instance judged identical to one active from a previous pass is
//! *preserved* (keeps its activated state) so ongoing effects persist
//! without replay.

use serde::{Deserialize, Serialize};

use crate::board::PointIndex;
use crate::core::TileId;

use super::descriptor::{AbilityDescriptor, AbilityKind, TriggerType};

/// What one trigger clause concretely matched.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerOutcome {
    pub trigger_type: TriggerType,
    /// The tiles that satisfied the clause, sorted.
    pub triggering_tiles: Vec<TileId>,
    /// The points involved, sorted (e.g. where a capture happened).
    pub triggering_points: Vec<PointIndex>,
}

impl TriggerOutcome {
    /// An outcome with sorted tile and point lists.
    #[must_use]
    pub fn new(
        trigger_type: TriggerType,
        mut triggering_tiles: Vec<TileId>,
        mut triggering_points: Vec<PointIndex>,
    ) -> Self {
        triggering_tiles.sort();
        triggering_points.sort();
        Self {
            trigger_type,
            triggering_tiles,
            triggering_points,
        }
    }
}

/// One ability evaluated against the current board.
#[derive(Clone, Debug, PartialEq)]
pub struct Ability {
    /// The tile whose definition declares the ability.
    pub source: TileId,
    /// Where the source tile sat at discovery (`None` when captured).
    pub source_point: Option<PointIndex>,
    /// The declaration, cloned from the tile table.
    pub descriptor: AbilityDescriptor,
    /// One outcome per trigger clause; all clauses held.
    pub trigger_outcomes: Vec<TriggerOutcome>,
    /// Resolved target tiles, sorted.
    pub target_tiles: Vec<TileId>,
    /// Resolved target points, sorted.
    pub target_points: Vec<PointIndex>,
    /// Whether the ability has activated (this move, or - for preserved
    /// ongoing abilities - on an earlier move).
    pub activated: bool,
    /// Order in which discovery produced this instance.
    pub discovery_order: usize,
}

impl Ability {
    /// The fieldless effect kind.
    #[must_use]
    pub const fn kind(&self) -> AbilityKind {
        self.descriptor.kind()
    }

    /// Whether this is an ongoing ability.
    #[must_use]
    pub const fn is_ongoing(&self) -> bool {
        self.kind().is_ongoing()
    }

    /// Identity for cross-pass preservation: same kind, same source tile,
    /// same source point, same resolved trigger target sets.
    #[must_use]
    pub fn same_ability(&self, other: &Ability) -> bool {
        self.kind() == other.kind()
            && self.source == other.source
            && self.source_point == other.source_point
            && self.trigger_outcomes == other.trigger_outcomes
    }

    /// Whether two abilities share one concrete triggering action: the
    /// same trigger type matched by the same tile. Such abilities model
    /// simultaneous effects and activate together.
    #[must_use]
    pub fn shares_triggering_action(&self, other: &Ability) -> bool {
        self.trigger_outcomes.iter().any(|mine| {
            other.trigger_outcomes.iter().any(|theirs| {
                mine.trigger_type == theirs.trigger_type
                    && mine
                        .triggering_tiles
                        .iter()
                        .any(|t| theirs.triggering_tiles.contains(t))
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abilities::descriptor::{AbilityEffect, TriggerType};

    fn sample(source: u32, outcome_tiles: Vec<TileId>) -> Ability {
        Ability {
            source: TileId::new(source),
            source_point: Some(PointIndex::new(40)),
            descriptor: AbilityDescriptor::new(AbilityEffect::ProtectFromCapture),
            trigger_outcomes: vec![TriggerOutcome::new(
                TriggerType::WhileSurroundingTargetTile,
                outcome_tiles,
                vec![],
            )],
            target_tiles: vec![],
            target_points: vec![],
            activated: false,
            discovery_order: 0,
        }
    }

    #[test]
    fn test_outcome_sorts_lists() {
        let outcome = TriggerOutcome::new(
            TriggerType::WhenDeployed,
            vec![TileId::new(5), TileId::new(2)],
            vec![PointIndex::new(9), PointIndex::new(1)],
        );
        assert_eq!(outcome.triggering_tiles, vec![TileId::new(2), TileId::new(5)]);
        assert_eq!(
            outcome.triggering_points,
            vec![PointIndex::new(1), PointIndex::new(9)]
        );
    }

    #[test]
    fn test_same_ability_identity() {
        let a = sample(1, vec![TileId::new(7)]);
        let b = sample(1, vec![TileId::new(7)]);
        assert!(a.same_ability(&b));

        // Different trigger targets break identity.
        let c = sample(1, vec![TileId::new(8)]);
        assert!(!a.same_ability(&c));

        // Different source breaks identity.
        let d = sample(2, vec![TileId::new(7)]);
        assert!(!a.same_ability(&d));
    }

    #[test]
    fn test_identity_ignores_order_in_lists() {
        let a = sample(1, vec![TileId::new(3), TileId::new(9)]);
        let b = sample(1, vec![TileId::new(9), TileId::new(3)]);
        assert!(a.same_ability(&b));
    }

    #[test]
    fn test_shared_triggering_action() {
        let a = sample(1, vec![TileId::new(7)]);
        let b = sample(2, vec![TileId::new(7), TileId::new(8)]);
        assert!(a.shares_triggering_action(&b));

        let c = sample(2, vec![TileId::new(8)]);
        assert!(!a.shares_triggering_action(&c));
    }
}
