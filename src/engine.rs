//! The move engine: commits turns to the piece state and schedules animations.
//!
//! Every accepted turn mutates the permutation immediately and then hands the
//! presentation layer an [`Animation`] to play. While anything is in flight, or
//! while scripted work is still queued, new commands are refused rather than
//! interleaved. The presentation layer reports each finished animation through
//! [`MoveEngine::complete`], and polls [`MoveEngine::tick`] once per frame to
//! start queued work.

use std::collections::VecDeque;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rustc_hash::FxHashSet;
use tracing::{debug, info, warn};

use crate::catalog::{self, MoveDef, SliceDef};
use crate::command::Command;
use crate::config::EngineConfig;
use crate::error::{PuzzleError, PuzzleResult};
use crate::geometry::Axis;
use crate::moves::MoveToken;
use crate::shape::{ShapeController, ShapeState, ShapeStep};
use crate::state::{PieceId, PieceState};

/// A committed turn, for the presentation layer to play.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Turn {
    pub token: MoveToken,
    /// Pieces whose slot changed, in ring order.
    pub pieces: Vec<PieceId>,
    pub axis: Axis,
    /// Signed angle about the positive axis.
    pub degrees: i32,
    pub duration: Duration,
}

/// One step of a shape transition, for the presentation layer to play.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShapeAnimation {
    pub step: ShapeStep,
    pub pieces: Vec<PieceId>,
    pub duration: Duration,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Animation {
    Turn(Turn),
    Shape(ShapeAnimation),
}

impl Animation {
    pub fn duration(&self) -> Duration {
        match self {
            Animation::Turn(turn) => turn.duration,
            Animation::Shape(step) => step.duration,
        }
    }
}

/// Why a command did nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Ignored {
    /// A turn or shape step is animating, or scripted work is queued.
    TurnInProgress,
    /// Undo with nothing to undo.
    EmptyHistory,
    /// Undo while the next move is set to hide pieces.
    HideModePending,
    /// The requested shape is already active.
    AlreadyInShape,
}

/// What a command did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    /// Play this, then call [`MoveEngine::complete`].
    Animate(Animation),
    /// The visibility of these pieces was set.
    Visibility { pieces: Vec<PieceId>, hidden: bool },
    /// This many items were queued; [`MoveEngine::tick`] starts them.
    Queued(usize),
    /// The hide-next flag now has this value.
    HideNext(bool),
    /// The puzzle was returned to its solved arrangement.
    Reset,
    Ignored(Ignored),
}

/// Work waiting for the engine to go idle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Pending {
    Move(MoveToken),
    Step(ShapeStep),
    /// Flip the shape flag to the transition's target.
    Settle,
}

/// The slice turns a token resolves to, with their signed angles.
struct Plan {
    def: MoveDef,
    degrees: i32,
    parts: Vec<(&'static SliceDef, i32)>,
}

pub struct MoveEngine {
    config: EngineConfig,
    state: PieceState,
    history: Vec<MoveToken>,
    pending: VecDeque<Pending>,
    /// Animations started but not yet reported complete.
    in_flight: u32,
    hide_next: bool,
    hidden: FxHashSet<PieceId>,
    shape: ShapeController,
    rng: StdRng,
}

impl Default for MoveEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl MoveEngine {
    pub fn new(config: EngineConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            config,
            state: PieceState::new(),
            history: Vec::new(),
            pending: VecDeque::new(),
            in_flight: 0,
            hide_next: false,
            hidden: FxHashSet::default(),
            shape: ShapeController::new(),
            rng,
        }
    }

    pub fn state(&self) -> &PieceState {
        &self.state
    }

    pub fn history(&self) -> &[MoveToken] {
        &self.history
    }

    /// Moves still waiting in the queue, in order.
    pub fn pending_moves(&self) -> Vec<MoveToken> {
        self.pending
            .iter()
            .filter_map(|item| match item {
                Pending::Move(token) => Some(*token),
                _ => None,
            })
            .collect()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn in_flight(&self) -> u32 {
        self.in_flight
    }

    /// Whether new commands are currently refused.
    pub fn is_busy(&self) -> bool {
        self.in_flight > 0 || !self.pending.is_empty()
    }

    pub fn hide_next(&self) -> bool {
        self.hide_next
    }

    pub fn hidden(&self) -> &FxHashSet<PieceId> {
        &self.hidden
    }

    pub fn shape(&self) -> ShapeState {
        self.shape.current()
    }

    /// The shape being transitioned to, if a transition is underway.
    pub fn shape_target(&self) -> Option<ShapeState> {
        self.shape.target()
    }

    /// Runs one inbound command.
    pub fn execute(&mut self, command: Command) -> PuzzleResult<Effect> {
        match command {
            Command::Move(token) => self.apply(token),
            Command::Undo => self.undo(),
            Command::Shuffle => Ok(self.shuffle()),
            Command::Reset => Ok(self.reset()),
            Command::SetShape(target) => self.set_shape(target),
            Command::ToggleHideNext => Ok(Effect::HideNext(self.toggle_hide_next())),
        }
    }

    /// Applies one turn.
    ///
    /// Refused while busy. Rejected without any change if the token does not
    /// resolve or involves a slice absent from the current shape. If hide-next
    /// is set, the turned layer's pieces change visibility instead and the
    /// permutation is left alone.
    pub fn apply(&mut self, token: MoveToken) -> PuzzleResult<Effect> {
        if self.is_busy() {
            debug!(%token, "turn refused, engine busy");
            return Ok(Effect::Ignored(Ignored::TurnInProgress));
        }
        let plan = plan(token)?;
        self.shape.current().check_move(token.letter, token.wide)?;

        if self.hide_next {
            self.hide_next = false;
            return Ok(self.toggle_visibility(&plan));
        }

        self.history.push(token);
        Ok(Effect::Animate(Animation::Turn(self.commit(token, plan))))
    }

    /// Reverts the most recent turn. Undo is not itself recorded.
    pub fn undo(&mut self) -> PuzzleResult<Effect> {
        if self.is_busy() {
            return Ok(Effect::Ignored(Ignored::TurnInProgress));
        }
        if self.hide_next {
            return Ok(Effect::Ignored(Ignored::HideModePending));
        }
        let Some(last) = self.history.pop() else {
            return Ok(Effect::Ignored(Ignored::EmptyHistory));
        };

        let inverse = last.inverse();
        match plan(inverse) {
            Ok(plan) => {
                debug!(undone = %last, "undo");
                Ok(Effect::Animate(Animation::Turn(self.commit(inverse, plan))))
            }
            Err(err) => {
                self.history.push(last);
                Err(err)
            }
        }
    }

    /// Queues a random sequence of turns legal in the current shape.
    pub fn shuffle(&mut self) -> Effect {
        if self.is_busy() {
            return Effect::Ignored(Ignored::TurnInProgress);
        }
        let letters = self.shape.current().shuffle_letters();
        for _ in 0..self.config.shuffle_length {
            let letter = letters[self.rng.gen_range(0..letters.len())];
            let cased = if self.rng.gen_bool(0.5) {
                letter.to_ascii_uppercase()
            } else {
                letter
            };
            self.pending.push_back(Pending::Move(MoveToken::new(cased)));
        }
        info!(
            turns = self.config.shuffle_length,
            shape = %self.shape.current(),
            "shuffle queued"
        );
        Effect::Queued(self.config.shuffle_length)
    }

    /// Starts a transition to another shape.
    ///
    /// The steps are queued, and the shape flag flips only after the last one
    /// has finished playing.
    pub fn set_shape(&mut self, target: ShapeState) -> PuzzleResult<Effect> {
        if self.is_busy() {
            return Ok(Effect::Ignored(Ignored::TurnInProgress));
        }
        let from = self.shape.current();
        let Some(steps) = self.shape.begin(target)? else {
            return Ok(Effect::Ignored(Ignored::AlreadyInShape));
        };
        self.pending.extend(steps.iter().copied().map(Pending::Step));
        self.pending.push_back(Pending::Settle);
        info!(%from, to = %target, steps = steps.len(), "shape transition queued");
        Ok(Effect::Queued(steps.len()))
    }

    /// Flips the hide-next flag, returning its new value.
    ///
    /// Accepted even while busy; it only affects the next applied move.
    pub fn toggle_hide_next(&mut self) -> bool {
        self.hide_next = !self.hide_next;
        debug!(hide_next = self.hide_next, "hide-next toggled");
        self.hide_next
    }

    /// Returns the puzzle to its solved arrangement and clears all queues.
    ///
    /// Refused while an animation is in flight. An unfinished shape
    /// transition is abandoned and the shape stays where it started.
    pub fn reset(&mut self) -> Effect {
        if self.in_flight > 0 {
            return Effect::Ignored(Ignored::TurnInProgress);
        }
        self.state.reset();
        self.history.clear();
        self.pending.clear();
        self.hide_next = false;
        self.hidden.clear();
        self.shape.abandon();
        info!(shape = %self.shape.current(), "puzzle reset");
        Effect::Reset
    }

    /// Starts the next queued item if nothing is in flight.
    ///
    /// Called once per frame by the presentation layer.
    pub fn tick(&mut self) -> Option<Animation> {
        while self.in_flight == 0 {
            match self.pending.pop_front()? {
                Pending::Move(token) => match plan(token) {
                    Ok(plan) => {
                        self.history.push(token);
                        return Some(Animation::Turn(self.commit(token, plan)));
                    }
                    Err(err) => warn!(%token, %err, "dropping queued move"),
                },
                Pending::Step(step) => {
                    self.in_flight += 1;
                    debug!(?step, "shape step started");
                    return Some(Animation::Shape(ShapeAnimation {
                        step,
                        pieces: step.pieces(),
                        duration: self.config.shape_step_duration,
                    }));
                }
                Pending::Settle => {
                    if let Some(shape) = self.shape.settle() {
                        info!(%shape, "shape settled");
                    }
                }
            }
        }
        None
    }

    /// Reports that one animation finished playing.
    ///
    /// When nothing is left in flight the queue is drained immediately,
    /// returning the next animation to play, if any.
    pub fn complete(&mut self) -> Option<Animation> {
        if self.in_flight == 0 {
            warn!("completion reported with nothing in flight");
        } else {
            self.in_flight -= 1;
        }
        if self.in_flight == 0 {
            self.tick()
        } else {
            None
        }
    }

    /// Plays everything out instantly, as a presenter whose animations take no
    /// time would. Returns the animations in the order they started.
    pub fn finish_all(&mut self) -> Vec<Animation> {
        let mut played = Vec::new();
        while self.is_busy() {
            let next = if self.in_flight > 0 {
                self.complete()
            } else {
                self.tick()
            };
            played.extend(next);
        }
        played
    }

    fn commit(&mut self, token: MoveToken, plan: Plan) -> Turn {
        let mut pieces = Vec::with_capacity(plan.parts.len() * catalog::RING_LEN);
        for (slice, degrees) in plan.parts {
            self.state.turn_slice(slice, degrees, &mut pieces);
        }
        self.in_flight += 1;
        debug!(%token, degrees = plan.degrees, moved = pieces.len(), "turn committed");
        Turn {
            token,
            pieces,
            axis: plan.def.axis(),
            degrees: plan.degrees,
            duration: self.config.turn_duration,
        }
    }

    fn toggle_visibility(&mut self, plan: &Plan) -> Effect {
        let pieces: Vec<PieceId> = plan
            .parts
            .iter()
            .flat_map(|(slice, _)| slice.slots())
            .map(|slot| self.state.piece_at(slot))
            .collect();
        let hidden = !pieces.iter().all(|piece| self.hidden.contains(piece));
        for &piece in &pieces {
            if hidden {
                self.hidden.insert(piece);
            } else {
                self.hidden.remove(&piece);
            }
        }
        debug!(count = pieces.len(), hidden, "visibility toggled");
        Effect::Visibility { pieces, hidden }
    }
}

/// Resolves a token into the slice turns it stands for.
///
/// Axis moves become their three component slices; a two-layer grip adds the
/// adjacent middle slice turned through the same physical angle.
fn plan(token: MoveToken) -> PuzzleResult<Plan> {
    let def = catalog::lookup(token.letter)?;
    let degrees = token.degrees(&def);
    let parts = match def {
        MoveDef::Slice(slice) => {
            let mut parts = vec![(slice, degrees)];
            if token.wide {
                let middle =
                    catalog::adjacent(slice.letter).ok_or(PuzzleError::NoAdjacentSlice(slice.letter))?;
                parts.push((middle, degrees));
            }
            parts
        }
        MoveDef::Axis(axis) => {
            if token.wide {
                return Err(PuzzleError::NoAdjacentSlice(axis.letter));
            }
            axis.components
                .iter()
                .map(|&(letter, reversed)| {
                    let slice = catalog::slice(letter)
                        .ok_or_else(|| PuzzleError::UnknownMove(letter.to_string()))?;
                    let sense = if reversed {
                        token.sense.flipped()
                    } else {
                        token.sense
                    };
                    Ok((slice, sense.signed(slice.degrees)))
                })
                .collect::<PuzzleResult<Vec<_>>>()?
        }
    };
    Ok(Plan {
        def,
        degrees,
        parts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{AXIS_LETTERS, SLICE_LETTERS};
    use crate::geometry::rotate;
    use crate::slots::{slot_coord, slot_index, SLOT_COUNT};

    fn engine() -> MoveEngine {
        MoveEngine::new(EngineConfig::seeded(7))
    }

    /// Applies a move and lets its animation finish.
    fn turn(engine: &mut MoveEngine, token: &str) -> Effect {
        let effect = engine.apply(token.parse().unwrap()).unwrap();
        engine.finish_all();
        effect
    }

    fn occupants(engine: &MoveEngine) -> [PieceId; SLOT_COUNT] {
        *engine.state().occupants()
    }

    fn all_letters() -> impl Iterator<Item = char> {
        SLICE_LETTERS.into_iter().chain(AXIS_LETTERS)
    }

    #[test]
    fn test_apply_r_golden_values() {
        let mut engine = engine();
        let effect = turn(&mut engine, "r");

        let Effect::Animate(Animation::Turn(turn)) = effect else {
            panic!("expected a turn, got {effect:?}");
        };
        assert_eq!(turn.pieces, vec![26, 23, 20, 11, 2, 5, 8, 17]);
        assert_eq!(turn.axis, Axis::X);
        assert_eq!(turn.degrees, -90);

        let state = engine.state();
        assert_eq!(state.piece_at(26), 20);
        assert_eq!(state.piece_at(23), 11);
        assert_eq!(state.piece_at(8), 26);
        assert_eq!(state.piece_at(17), 23);
        assert_eq!(state.piece_at(14), 14, "the r center never moves");
    }

    #[test]
    fn test_l_then_upper_l_is_identity() {
        let mut engine = engine();
        turn(&mut engine, "l");
        assert!(!engine.state().is_home());
        turn(&mut engine, "L");
        for slot in 0..SLOT_COUNT {
            assert_eq!(engine.state().piece_at(slot), slot);
        }
        assert!(engine.state().is_solved());
    }

    #[test]
    fn test_inverse_restores_every_move() {
        for letter in all_letters() {
            for token in [letter.to_string(), letter.to_ascii_uppercase().to_string()] {
                let mut engine = engine();
                turn(&mut engine, "r");
                turn(&mut engine, "U");
                let before = occupants(&engine);

                turn(&mut engine, &token);
                let inverse = token.parse::<MoveToken>().unwrap().inverse().to_string();
                turn(&mut engine, &inverse);

                assert_eq!(occupants(&engine), before, "{token} then {inverse}");
            }
        }
    }

    #[test]
    fn test_four_turns_are_identity() {
        let tokens = all_letters()
            .map(|c| c.to_string())
            .chain(["rw", "Lw", "uw", "Dw", "fw", "Bw"].map(String::from));
        for token in tokens {
            let mut engine = engine();
            for _ in 0..4 {
                turn(&mut engine, &token);
            }
            assert!(engine.state().is_solved(), "{token} x4");
        }
    }

    #[test]
    fn test_axis_moves_rotate_whole_puzzle() {
        for letter in AXIS_LETTERS {
            let mut engine = engine();
            let effect = turn(&mut engine, &letter.to_string());
            let Effect::Animate(Animation::Turn(turn)) = effect else {
                panic!("expected a turn");
            };
            assert_eq!(turn.pieces.len(), 24, "{letter} moves every ring piece");

            let quarter = turn.axis.quarter_turn(turn.degrees);
            for piece in 0..SLOT_COUNT {
                let (x, y, z) = rotate(quarter, slot_coord(piece));
                assert_eq!(
                    engine.state().slot_of(piece),
                    slot_index(x, y, z),
                    "{letter} misplaced piece {piece}"
                );
                assert_eq!(engine.state().orientation(piece), quarter);
            }
        }
    }

    #[test]
    fn test_axis_moves_follow_their_outer_slice() {
        for (axis, outer) in [("x", "r"), ("y", "u"), ("z", "f")] {
            let mut engine = engine();
            turn(&mut engine, axis);
            let mut reference = MoveEngine::new(EngineConfig::seeded(7));
            turn(&mut reference, outer);
            let ring = catalog::slice(outer.chars().next().unwrap()).unwrap().ring;
            for slot in ring {
                assert_eq!(
                    engine.state().piece_at(slot),
                    reference.state().piece_at(slot),
                    "{axis} disagrees with {outer} at slot {slot}"
                );
            }
        }
    }

    #[test]
    fn test_wide_turn_equals_outer_plus_middle() {
        let mut wide = engine();
        turn(&mut wide, "rw");

        let mut separate = engine();
        turn(&mut separate, "r");
        // m turns opposite to r in letter case
        turn(&mut separate, "M");

        assert_eq!(occupants(&wide), occupants(&separate));
        assert_eq!(wide.history().len(), 1);
    }

    #[test]
    fn test_wide_rejected_without_partner() {
        let mut engine = engine();
        for token in ["mw", "xw", "Ew"] {
            assert!(matches!(
                engine.apply(token.parse().unwrap()),
                Err(PuzzleError::NoAdjacentSlice(_))
            ));
        }
        assert!(engine.history().is_empty());
        assert_eq!(engine.in_flight(), 0);
    }

    #[test]
    fn test_unknown_move_changes_nothing() {
        let mut engine = engine();
        assert_eq!(
            engine.apply(MoveToken::new('q')),
            Err(PuzzleError::UnknownMove("q".to_string()))
        );
        assert!(engine.state().is_solved());
        assert!(engine.history().is_empty());
        assert!(!engine.is_busy());
    }

    #[test]
    fn test_bijection_survives_random_sequences() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut engine = engine();
        let tokens = ["l", "M", "r", "U", "e", "D", "f", "S", "b", "x", "Y", "z", "rw", "Fw"];
        for _ in 0..200 {
            let token = tokens[rng.gen_range(0..tokens.len())];
            turn(&mut engine, token);
            assert!(engine.state().is_permutation(), "after {token}");
        }
    }

    #[test]
    fn test_undo_round_trip() {
        let mut engine = engine();
        turn(&mut engine, "f");
        turn(&mut engine, "d");
        let before = occupants(&engine);
        let history_before = engine.history().len();

        turn(&mut engine, "rw");
        let effect = engine.undo().unwrap();
        assert!(matches!(effect, Effect::Animate(Animation::Turn(ref t)) if t.token.to_string() == "Rw"));
        engine.finish_all();

        assert_eq!(occupants(&engine), before);
        assert_eq!(engine.history().len(), history_before);
    }

    #[test]
    fn test_undo_walks_back_to_solved() {
        let mut engine = engine();
        for token in ["r", "U", "x", "m", "B"] {
            turn(&mut engine, token);
        }
        while !engine.history().is_empty() {
            engine.undo().unwrap();
            engine.finish_all();
        }
        assert!(engine.state().is_solved());
        assert_eq!(engine.undo(), Ok(Effect::Ignored(Ignored::EmptyHistory)));
    }

    #[test]
    fn test_noop_under_lock() {
        let mut engine = engine();
        engine.apply(MoveToken::new('r')).unwrap();
        assert_eq!(engine.in_flight(), 1);
        let before = occupants(&engine);

        assert_eq!(
            engine.apply(MoveToken::new('u')),
            Ok(Effect::Ignored(Ignored::TurnInProgress))
        );
        assert_eq!(engine.undo(), Ok(Effect::Ignored(Ignored::TurnInProgress)));
        assert_eq!(engine.shuffle(), Effect::Ignored(Ignored::TurnInProgress));
        assert_eq!(engine.reset(), Effect::Ignored(Ignored::TurnInProgress));

        assert_eq!(occupants(&engine), before);
        assert_eq!(engine.history().len(), 1);
        assert_eq!(engine.pending_len(), 0);

        assert_eq!(engine.complete(), None);
        assert!(!engine.is_busy());
        assert!(matches!(
            engine.apply(MoveToken::new('u')),
            Ok(Effect::Animate(_))
        ));
    }

    #[test]
    fn test_shuffle_queues_twenty_legal_moves() {
        let mut engine = engine();
        assert_eq!(engine.shuffle(), Effect::Queued(20));
        let queued = engine.pending_moves();
        assert_eq!(queued.len(), 20);
        assert!(queued
            .iter()
            .all(|t| SLICE_LETTERS.contains(&t.letter) && !t.wide));
        assert!(engine.history().is_empty(), "nothing runs before the first tick");
    }

    #[test]
    fn test_shuffle_in_reduced_shape_skips_middles() {
        let mut engine = MoveEngine::new(EngineConfig {
            shuffle_length: 200,
            ..EngineConfig::seeded(3)
        });
        engine.set_shape(ShapeState::Reduced2x2).unwrap();
        engine.finish_all();
        assert_eq!(engine.shape(), ShapeState::Reduced2x2);

        engine.shuffle();
        let queued = engine.pending_moves();
        assert_eq!(queued.len(), 200);
        assert!(queued.iter().all(|t| !catalog::MIDDLE_SLICES.contains(&t.letter)));
    }

    #[test]
    fn test_shuffle_drains_one_at_a_time() {
        let mut engine = engine();
        engine.shuffle();

        let first = engine.tick().expect("first queued move starts");
        assert!(matches!(first, Animation::Turn(_)));
        assert_eq!(engine.in_flight(), 1);
        assert_eq!(engine.pending_len(), 19);
        assert_eq!(engine.tick(), None, "nothing starts while a turn is in flight");

        let mut started = 1;
        while let Some(next) = engine.complete() {
            assert!(matches!(next, Animation::Turn(_)));
            assert_eq!(engine.in_flight(), 1);
            started += 1;
        }
        assert_eq!(started, 20);
        assert_eq!(engine.history().len(), 20);
        assert!(engine.state().is_permutation());
        assert!(!engine.is_busy());
    }

    #[test]
    fn test_seeded_shuffles_repeat() {
        let mut first = engine();
        let mut second = engine();
        first.shuffle();
        second.shuffle();
        assert_eq!(first.pending_moves(), second.pending_moves());
    }

    #[test]
    fn test_hide_next_toggles_instead_of_turning() {
        let mut engine = engine();
        assert!(engine.toggle_hide_next());

        let effect = engine.apply(MoveToken::new('u')).unwrap();
        let Effect::Visibility { pieces, hidden } = effect else {
            panic!("expected a visibility change, got {effect:?}");
        };
        assert!(hidden);
        assert_eq!(pieces.len(), 9);
        assert!(pieces.contains(&16), "the center is hidden with its ring");
        assert!(!engine.hide_next(), "the flag is consumed");
        assert!(engine.state().is_solved());
        assert!(engine.history().is_empty());
        assert!(!engine.is_busy());
        assert_eq!(engine.hidden().len(), 9);

        engine.toggle_hide_next();
        let effect = engine.apply(MoveToken::new('U')).unwrap();
        assert!(matches!(effect, Effect::Visibility { hidden: false, .. }));
        assert!(engine.hidden().is_empty());
    }

    #[test]
    fn test_undo_refused_while_hide_pending() {
        let mut engine = engine();
        turn(&mut engine, "r");
        engine.toggle_hide_next();
        assert_eq!(engine.undo(), Ok(Effect::Ignored(Ignored::HideModePending)));
        assert_eq!(engine.history().len(), 1);
    }

    #[test]
    fn test_shape_transition_runs_in_sequence() {
        let mut engine = engine();
        assert_eq!(
            engine.set_shape(ShapeState::ReducedPyramorphix),
            Ok(Effect::Queued(3))
        );
        assert_eq!(engine.shape_target(), Some(ShapeState::ReducedPyramorphix));
        assert_eq!(
            engine.apply(MoveToken::new('r')),
            Ok(Effect::Ignored(Ignored::TurnInProgress)),
            "moves wait for the transition"
        );

        let mut steps = Vec::new();
        let mut next = engine.tick();
        while let Some(Animation::Shape(step)) = next {
            assert_eq!(engine.shape(), ShapeState::Standard3x3, "flag flips last");
            steps.push(step.step);
            next = engine.complete();
        }
        assert_eq!(
            steps,
            vec![
                ShapeStep::ScaleMiddlesIn,
                ShapeStep::ScaleCornersOut,
                ShapeStep::MorphToPyramorphix
            ]
        );
        assert_eq!(engine.shape(), ShapeState::ReducedPyramorphix);
        assert!(!engine.is_busy());
        assert!(matches!(
            engine.apply(MoveToken::new('m')),
            Err(PuzzleError::IllegalInShape { letter: 'm', .. })
        ));
    }

    #[test]
    fn test_shape_noops() {
        let mut engine = engine();
        assert_eq!(
            engine.set_shape(ShapeState::Standard3x3),
            Ok(Effect::Ignored(Ignored::AlreadyInShape))
        );
        engine.set_shape(ShapeState::Reduced2x2).unwrap();
        engine.finish_all();
        assert_eq!(
            engine.set_shape(ShapeState::Pyramorphix),
            Err(PuzzleError::UnsupportedShapeTransition {
                from: ShapeState::Reduced2x2,
                to: ShapeState::Pyramorphix,
            })
        );
        assert_eq!(engine.shape(), ShapeState::Reduced2x2);
        assert!(!engine.is_busy());
    }

    #[test]
    fn test_middle_move_undone_after_reduction() {
        let mut engine = engine();
        turn(&mut engine, "m");
        engine.set_shape(ShapeState::Reduced2x2).unwrap();
        engine.finish_all();

        assert!(matches!(engine.undo(), Ok(Effect::Animate(_))));
        engine.finish_all();
        assert!(engine.state().is_solved());
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut engine = engine();
        turn(&mut engine, "r");
        engine.toggle_hide_next();
        engine.apply(MoveToken::new('f')).unwrap();
        engine.toggle_hide_next();
        engine.set_shape(ShapeState::Pyramorphix).unwrap();

        assert_eq!(engine.reset(), Effect::Reset);
        assert!(engine.state().is_solved());
        assert!(engine.history().is_empty());
        assert_eq!(engine.pending_len(), 0);
        assert!(!engine.hide_next());
        assert!(engine.hidden().is_empty());
        assert_eq!(engine.shape(), ShapeState::Standard3x3);
        assert_eq!(engine.shape_target(), None);
    }

    #[test]
    fn test_stray_completion_is_harmless() {
        let mut engine = engine();
        assert_eq!(engine.complete(), None);
        assert_eq!(engine.in_flight(), 0);
        assert!(matches!(
            engine.apply(MoveToken::new('r')),
            Ok(Effect::Animate(_))
        ));
    }

    #[test]
    fn test_execute_dispatches_commands() {
        let mut engine = engine();
        assert!(matches!(
            engine.execute(Command::Move(MoveToken::new('d'))),
            Ok(Effect::Animate(_))
        ));
        engine.finish_all();
        assert_eq!(engine.execute(Command::ToggleHideNext), Ok(Effect::HideNext(true)));
        assert_eq!(engine.execute(Command::ToggleHideNext), Ok(Effect::HideNext(false)));
        assert!(matches!(engine.execute(Command::Undo), Ok(Effect::Animate(_))));
        engine.finish_all();
        assert_eq!(engine.execute(Command::Shuffle), Ok(Effect::Queued(20)));
        assert_eq!(engine.execute(Command::Reset), Ok(Effect::Reset));
    }
}
