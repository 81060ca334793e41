//! The ability manager - coordinating brains into one state machine.
//!
//! Per move: `Idle -> AbilitiesDiscovered -> (Activating)* -> (Prompting)?
//! -> Idle`. Each pass rebuilds the ability set from scratch (discovery),
//! resolves targets, preserves instances judged identical to active ones
//! from the previous pass, orders the rest, and activates them. If an
//! activation mutates the board, discovery restarts with the updated
//! capture list; this repeats to a fixpoint.
//!
//! The reprocessing loop carries a hard pass cap. Two abilities that
//! perpetually re-trigger each other would otherwise loop forever; at the
//! cap the engine stops best-effort and reports a diagnostic rather than
//! failing the move.

use rustc_hash::FxHashMap;

use crate::board::{Board, PointIndex};
use crate::core::{Diagnostic, DiagnosticKind, TileId};
use crate::movement::MovementModifier;
use crate::rules::ActivationFlags;
use crate::tiles::GameDefinition;

use super::activation;
use super::descriptor::{AbilityCategory, AbilityEffect, ActivationRequirement};
use super::instance::Ability;
use super::prompt::{PromptRequest, PromptTargetData};
use super::targets::{self, TargetResolution};
use super::triggers::{self, MoveContext};

/// Hard cap on reprocessing passes for one move.
pub const MAX_PASSES: usize = 64;

/// Coordinates trigger, target, and ability brains across moves.
#[derive(Clone, Debug, Default)]
pub struct AbilityManager {
    /// Current ability instances; ongoing actives persist across moves.
    active: Vec<Ability>,
    /// Points remembered by `RecordTilePoint`, by target tile.
    recorded_points: FxHashMap<TileId, PointIndex>,
    /// `(source tile, category)` pairs canceled this move.
    canceled_sources: Vec<(TileId, AbilityCategory)>,
}

impl AbilityManager {
    /// A manager with no active abilities.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently active (and activated) ability instances.
    #[must_use]
    pub fn active_abilities(&self) -> impl Iterator<Item = &Ability> {
        self.active.iter().filter(|a| a.activated)
    }

    /// Movement modifiers from active movement-modifying abilities
    /// targeting `tile`.
    #[must_use]
    pub fn movement_modifiers_for(&self, tile: TileId) -> Vec<MovementModifier> {
        let mut out = Vec::new();
        for ability in self.active_abilities() {
            if !ability.target_tiles.contains(&tile) {
                continue;
            }
            match &ability.descriptor.effect {
                AbilityEffect::ExtendMovement {
                    movement_type,
                    amount,
                } => out.push(MovementModifier::Extend {
                    movement_type: *movement_type,
                    amount: *amount,
                }),
                AbilityEffect::ManipulateExistingMovement { from, replacement } => {
                    out.push(MovementModifier::Substitute {
                        from: *from,
                        replacement: (**replacement).clone(),
                    });
                }
                AbilityEffect::GrantBonusMovement { movement } => {
                    out.push(MovementModifier::Bonus {
                        movement: (**movement).clone(),
                    });
                }
                _ => {}
            }
        }
        out
    }

    /// Run ability processing for one move to its fixpoint (or first
    /// outstanding prompt). Captured-tile and pile tallies accumulate
    /// across all passes into the returned flags.
    pub fn process_abilities(
        &mut self,
        board: &mut Board,
        def: &GameDefinition,
        context: &mut MoveContext,
        prompt_data: &PromptTargetData,
    ) -> ActivationFlags {
        let mut flags = ActivationFlags::default();
        self.canceled_sources.clear();
        let mut activated_instants: Vec<Ability> = Vec::new();

        for &captured in &context.captured_tiles {
            if let Some(tile) = board.tile_mut(captured) {
                tile.being_captured = true;
            }
        }

        let mut pass = 0;
        loop {
            if pass >= MAX_PASSES {
                flags.diagnostics.push(Diagnostic::emit(
                    None,
                    DiagnosticKind::FixpointCapReached,
                    format!("ability reprocessing stopped after {MAX_PASSES} passes"),
                ));
                break;
            }
            pass += 1;

            let (discovered, parked) =
                self.discover(board, def, context, prompt_data, &mut flags.diagnostics);
            let mut discovered = discovered;

            // Preservation: an instance judged the same as one already
            // activated keeps its activated state instead of replaying.
            for ability in &mut discovered {
                let preserved = self
                    .active
                    .iter()
                    .any(|a| a.activated && a.same_ability(ability))
                    || activated_instants.iter().any(|a| a.same_ability(ability));
                if preserved {
                    ability.activated = true;
                }
            }

            // Everything not rediscovered is torn down when the flags are
            // recomputed from the new active set.
            self.active = discovered;

            // Cancellation is re-checked every pass: preserved cancel
            // abilities re-assert their entries without replaying.
            for ability in &self.active {
                if !ability.activated {
                    continue;
                }
                if let AbilityEffect::CancelAbilities { categories } = &ability.descriptor.effect {
                    for &target in &ability.target_tiles {
                        for &category in categories {
                            if !self.canceled_sources.contains(&(target, category)) {
                                self.canceled_sources.push((target, category));
                            }
                        }
                    }
                }
            }

            self.refresh_ongoing_flags(board);

            for (_, request) in &parked {
                if flags.needed_prompt.is_none() {
                    flags.needed_prompt = Some(request.clone());
                }
            }

            let mut board_changed_this_pass = false;
            let order = self.activation_order(def);
            for idx in order {
                if self.active[idx].activated {
                    continue;
                }
                if parked.iter().any(|&(p, _)| p == idx) {
                    continue;
                }
                if self.is_canceled(&self.active[idx]) {
                    continue;
                }
                if self.is_cancel_targeted(&self.active[idx]) {
                    continue;
                }

                let changed = self.activate_at(
                    board,
                    def,
                    idx,
                    context,
                    prompt_data,
                    &mut activated_instants,
                    &mut flags,
                );
                if changed {
                    board_changed_this_pass = true;
                    flags.board_has_changed = true;
                    // The board moved under the remaining abilities;
                    // restart discovery against the new state.
                    break;
                }
            }

            if !board_changed_this_pass {
                break;
            }
        }

        for &captured in &context.captured_tiles {
            if let Some(tile) = board.tile_mut(captured) {
                tile.being_captured = false;
            }
        }

        flags
    }

    /// Discover eligible abilities: every tile on the board, plus tiles
    /// just captured (for their "when captured" triggers). Returns the
    /// fresh instances and the indices parked awaiting a prompt.
    fn discover(
        &self,
        board: &Board,
        def: &GameDefinition,
        context: &MoveContext,
        prompt_data: &PromptTargetData,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> (Vec<Ability>, Vec<(usize, PromptRequest)>) {
        let mut discovered: Vec<Ability> = Vec::new();
        let mut parked: Vec<(usize, PromptRequest)> = Vec::new();

        let mut sources: Vec<TileId> = board.tiles_on_board().into_iter().map(|(id, _)| id).collect();
        for &captured in &context.captured_tiles {
            if !sources.contains(&captured) {
                sources.push(captured);
            }
        }

        for source in sources {
            let Some(tile) = board.tile(source) else {
                continue;
            };
            let Some(tile_def) = def.get(tile.code) else {
                diagnostics.push(Diagnostic::emit(
                    Some(source),
                    DiagnosticKind::UnknownTileCode,
                    format!("no definition for {}", tile.code),
                ));
                continue;
            };
            let source_point = tile.point();

            let zone_abilities = tile_def
                .territorial_zone
                .iter()
                .flat_map(|z| z.abilities.iter());
            for descriptor in tile_def.abilities.iter().chain(zone_abilities) {
                // Every trigger clause must hold.
                let mut outcomes = Vec::with_capacity(descriptor.triggers.len());
                let mut eligible = true;
                for clause in &descriptor.triggers {
                    match triggers::evaluate_trigger(board, def, context, source, clause) {
                        Some(outcome) => outcomes.push(outcome),
                        None => {
                            eligible = false;
                            break;
                        }
                    }
                }
                if !eligible {
                    continue;
                }

                let mut ability = Ability {
                    source,
                    source_point,
                    descriptor: descriptor.clone(),
                    trigger_outcomes: outcomes,
                    target_tiles: Vec::new(),
                    target_points: Vec::new(),
                    activated: false,
                    discovery_order: discovered.len(),
                };

                if self.is_canceled(&ability) {
                    continue;
                }

                match targets::resolve_targets(board, def, &ability, prompt_data, diagnostics) {
                    TargetResolution::Empty => continue,
                    TargetResolution::NeedsPrompt(request) => {
                        parked.push((discovered.len(), request));
                        discovered.push(ability);
                    }
                    TargetResolution::Targets { tiles, points } => {
                        ability.target_tiles = tiles;
                        ability.target_points = points;

                        if !self.requirements_hold(board, &ability) {
                            continue;
                        }
                        if self.is_cancel_targeted(&ability) {
                            continue;
                        }
                        discovered.push(ability);
                    }
                }
            }
        }

        (discovered, parked)
    }

    /// Check declared activation requirements.
    fn requirements_hold(&self, board: &Board, ability: &Ability) -> bool {
        ability
            .descriptor
            .activation_requirements
            .iter()
            .all(|requirement| match requirement {
                ActivationRequirement::TargetTilesNotInTemple => {
                    ability.target_tiles.iter().all(|&id| {
                        board.tile(id).and_then(|t| t.point()).is_none_or(|p| {
                            !board.point(p).has_type(crate::board::PointType::Temple)
                        })
                    })
                }
            })
    }

    /// Canceled-by-source check: the ability's source tile had this
    /// category canceled earlier in the move.
    fn is_canceled(&self, ability: &Ability) -> bool {
        let category = ability.kind().category();
        self.canceled_sources
            .iter()
            .any(|&(tile, cat)| tile == ability.source && cat == category)
    }

    /// Canceled-by-target check: an active `CancelAbilitiesTargetingTiles`
    /// shields one of this ability's resolved targets.
    fn is_cancel_targeted(&self, ability: &Ability) -> bool {
        let category = ability.kind().category();
        self.active.iter().any(|shield| {
            shield.activated
                && matches!(
                    &shield.descriptor.effect,
                    AbilityEffect::CancelAbilitiesTargetingTiles { categories }
                        if categories.contains(&category)
                )
                && shield
                    .target_tiles
                    .iter()
                    .any(|t| ability.target_tiles.contains(t))
        })
    }

    /// Activation order: explicit priorities first (highest group first),
    /// then the game's canonical order list, then everything else in
    /// discovery order.
    fn activation_order(&self, def: &GameDefinition) -> Vec<usize> {
        let canonical = def.ability_order();
        let mut indices: Vec<usize> = (0..self.active.len()).collect();
        indices.sort_by_key(|&i| {
            let ability = &self.active[i];
            let (priority_group, priority_rank) = match ability.descriptor.priority {
                Some(p) => (0u8, u8::MAX - p),
                None => (1, 0),
            };
            let canonical_pos = canonical
                .iter()
                .position(|&k| k == ability.kind())
                .unwrap_or(canonical.len());
            (
                priority_group,
                priority_rank,
                canonical_pos,
                ability.discovery_order,
            )
        });
        indices
    }

    /// Activate the ability at `idx`, plus any ready ability sharing the
    /// same concrete triggering action (simultaneous effects). Returns
    /// whether the board changed.
    #[allow(clippy::too_many_arguments)]
    fn activate_at(
        &mut self,
        board: &mut Board,
        def: &GameDefinition,
        idx: usize,
        context: &mut MoveContext,
        prompt_data: &PromptTargetData,
        activated_instants: &mut Vec<Ability>,
        flags: &mut ActivationFlags,
    ) -> bool {
        let mut changed = self.activate_single(
            board,
            def,
            idx,
            context,
            prompt_data,
            activated_instants,
            flags,
        );

        // Simultaneity: a ready ability triggered by the same concrete
        // action activates together with this one.
        if self.active[idx].activated {
            let simultaneous: Vec<usize> = (0..self.active.len())
                .filter(|&j| j != idx)
                .filter(|&j| !self.active[j].activated)
                // Parked abilities (no resolved targets yet) stay parked.
                .filter(|&j| !self.active[j].target_tiles.is_empty())
                .filter(|&j| !self.is_canceled(&self.active[j]))
                .filter(|&j| self.active[j].shares_triggering_action(&self.active[idx]))
                .collect();
            for j in simultaneous {
                if self.activate_single(
                    board,
                    def,
                    j,
                    context,
                    prompt_data,
                    activated_instants,
                    flags,
                ) {
                    changed = true;
                }
            }
        }

        changed
    }

    /// Activate exactly one ability. Returns whether the board changed.
    #[allow(clippy::too_many_arguments)]
    fn activate_single(
        &mut self,
        board: &mut Board,
        def: &GameDefinition,
        idx: usize,
        context: &mut MoveContext,
        prompt_data: &PromptTargetData,
        activated_instants: &mut Vec<Ability>,
        flags: &mut ActivationFlags,
    ) -> bool {
        let ability = self.active[idx].clone();

        match &ability.descriptor.effect {
            AbilityEffect::CancelAbilities { categories } => {
                for &target in &ability.target_tiles {
                    for &category in categories {
                        self.canceled_sources.push((target, category));
                    }
                }
                // Deactivate matching already-activated abilities; the
                // cancel entries keep them from re-establishing this move.
                for other in &mut self.active {
                    if other.activated
                        && ability.target_tiles.contains(&other.source)
                        && categories.contains(&other.kind().category())
                    {
                        other.activated = false;
                    }
                }
                self.active[idx].activated = true;
                activated_instants.push(self.active[idx].clone());
                flags.abilities_activated = true;
                self.refresh_ongoing_flags(board);
                tracing::debug!(source = %ability.source, "cancel abilities activated");
                false
            }

            _ => {
                let outcome = activation::activate(
                    board,
                    def,
                    &ability,
                    &mut self.recorded_points,
                    prompt_data,
                );
                flags.diagnostics.extend(outcome.diagnostics);

                if let Some(request) = outcome.needs_prompt {
                    // Parked: nothing further from this ability, everything
                    // already committed stays committed.
                    if flags.needed_prompt.is_none() {
                        flags.needed_prompt = Some(request);
                    }
                    return false;
                }

                self.active[idx].activated = true;
                flags.abilities_activated = true;
                if !ability.is_ongoing() {
                    activated_instants.push(self.active[idx].clone());
                }

                for &captured in &outcome.captured {
                    context.captured_tiles.push(captured);
                    flags.tile_records.captured_tiles.push(captured);
                    if let Some(tile) = board.tile_mut(captured) {
                        tile.being_captured = true;
                    }
                }
                for &piled in &outcome.moved_to_piles {
                    flags.tile_records.tiles_moved_to_piles.push(piled);
                }

                if ability.is_ongoing() {
                    self.refresh_ongoing_flags(board);
                }

                tracing::debug!(
                    source = %ability.source,
                    kind = ?ability.kind(),
                    board_changed = outcome.board_changed,
                    "ability activated"
                );
                outcome.board_changed
            }
        }
    }

    /// Recompute every tile's ongoing-effect flags from the active set
    /// and the move's cancellation entries. Idempotent.
    fn refresh_ongoing_flags(&self, board: &mut Board) {
        for id in board.all_tile_ids() {
            if let Some(tile) = board.tile_mut(id) {
                tile.clear_ongoing_flags();
            }
        }
        for ability in self.active_abilities() {
            match ability.descriptor.effect {
                AbilityEffect::ProtectFromCapture => {
                    for &target in &ability.target_tiles {
                        if let Some(tile) = board.tile_mut(target) {
                            tile.protected = true;
                        }
                    }
                }
                AbilityEffect::ImmobilizeTargetTiles => {
                    for &target in &ability.target_tiles {
                        if let Some(tile) = board.tile_mut(target) {
                            tile.immobilized = true;
                        }
                    }
                }
                _ => {}
            }
        }
        for &(canceled, _) in &self.canceled_sources {
            if let Some(tile) = board.tile_mut(canceled) {
                tile.zone_suppressed = true;
            }
        }
    }

    /// The point currently recorded for a tile, if any.
    #[must_use]
    pub fn recorded_point_for(&self, tile: TileId) -> Option<PointIndex> {
        self.recorded_points.get(&tile).copied()
    }
}
