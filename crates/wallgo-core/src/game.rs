use serde::{Deserialize, Serialize};

use wallgo_protocol::{Intent, Outcome, Phase, PlayerId, PlayerSnapshot, Snapshot, Square, WallSlot};

use crate::board::Board;
use crate::region::Partition;
use crate::rng::GameRng;
use crate::rules::{self, RuleViolation};

/// End-of-game detection rule.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndRule {
    /// End once any empty region is sealed off: the union of components that
    /// still contain pieces no longer spans the board.
    #[default]
    ReachableShortfall,
    /// End only when neither player has a legal step and no single additional
    /// wall could enlarge either player's controlled area.
    Exhaustion,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub size: u8,
    pub pieces_per_player: u8,
    pub moves_per_turn: u8,
    pub end_rule: EndRule,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            size: 7,
            pieces_per_player: 2,
            moves_per_turn: 2,
            end_rule: EndRule::ReachableShortfall,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayerState {
    pub name: String,
    pub pieces_placed: u8,
}

/// The whole mutable game state. Mutated only through
/// [`GameEngine::try_apply_intent`]; a rejected intent leaves it untouched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameState {
    pub board: Board,
    pub phase: Phase,
    pub current_player: PlayerId,
    pub players: [PlayerState; 2],
    pub moves_this_turn: u8,
    pub last_moved_to: Option<Square>,
    pub locked_piece: Option<Square>,
    pub winner: Option<Outcome>,
}

/// Authoritative rules engine for one game.
///
/// Single-writer: the room owning this engine serializes intents into it one
/// at a time. The engine performs no I/O and never suspends.
#[derive(Clone, Debug)]
pub struct GameEngine {
    config: GameConfig,
    state: GameState,
    rng: GameRng,
}

impl GameEngine {
    /// Start a fresh game; the first mover is drawn from the seed.
    pub fn new(config: GameConfig, names: [String; 2], seed: u64) -> Self {
        let mut rng = GameRng::seed_from_u64(seed);
        let first = PlayerId((rng.next_u32() & 1) as u8);
        Self::start(config, names, first, rng)
    }

    /// Start a fresh game with a fixed first mover.
    pub fn with_first_mover(config: GameConfig, names: [String; 2], first: PlayerId) -> Self {
        Self::start(config, names, first, GameRng::seed_from_u64(0))
    }

    fn start(config: GameConfig, names: [String; 2], first: PlayerId, rng: GameRng) -> Self {
        let [name_one, name_two] = names;
        Self {
            config,
            state: GameState {
                board: Board::new(config.size),
                phase: Phase::Placement,
                current_player: first,
                players: [
                    PlayerState {
                        name: name_one,
                        pieces_placed: 0,
                    },
                    PlayerState {
                        name: name_two,
                        pieces_placed: 0,
                    },
                ],
                moves_this_turn: 0,
                last_moved_to: None,
                locked_piece: None,
                winner: None,
            },
            rng,
        }
    }

    /// Resume from an externally held state, e.g. a replay position.
    pub fn from_state(config: GameConfig, state: GameState) -> Self {
        Self {
            config,
            state,
            rng: GameRng::seed_from_u64(0),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn is_over(&self) -> bool {
        self.state.phase == Phase::End
    }

    /// Apply one player intent. All guards run before any mutation, so on
    /// `Err` the state is bit-identical to what it was before the call.
    pub fn try_apply_intent(
        &mut self,
        player: PlayerId,
        intent: Intent,
    ) -> Result<(), RuleViolation> {
        if self.state.phase == Phase::End {
            return Err(RuleViolation::GameOver);
        }
        if player != self.state.current_player {
            return Err(RuleViolation::NotYourTurn);
        }
        match intent {
            Intent::PlacePiece { at } => self.apply_place(player, at),
            Intent::MovePiece { from, to } => self.apply_move(player, from, to),
            Intent::PlaceWall { slot } => self.apply_wall(player, slot),
        }
    }

    fn apply_place(&mut self, player: PlayerId, at: Square) -> Result<(), RuleViolation> {
        if self.state.phase != Phase::Placement {
            return Err(RuleViolation::WrongPhase);
        }
        let placed = self.state.players[player.index()].pieces_placed;
        rules::check_place(&self.state.board, at, placed, self.config.pieces_per_player)?;

        self.state.board.place(at, player);
        self.state.players[player.index()].pieces_placed += 1;

        let done = self
            .state
            .players
            .iter()
            .all(|p| p.pieces_placed == self.config.pieces_per_player);
        // Strict alternation: with equal quotas the opponent of the final
        // placement is the original first mover.
        self.state.current_player = player.opponent();
        if done {
            self.state.phase = Phase::Move;
        }
        Ok(())
    }

    fn apply_move(&mut self, player: PlayerId, from: Square, to: Square) -> Result<(), RuleViolation> {
        match self.state.phase {
            Phase::Move => {}
            Phase::Wall => return Err(RuleViolation::MoveQuotaSpent),
            _ => return Err(RuleViolation::WrongPhase),
        }
        rules::check_move(&self.state.board, player, from, to, self.state.locked_piece)?;

        self.state.board.relocate(from, to);
        self.state.moves_this_turn += 1;
        self.state.last_moved_to = Some(to);
        self.state.locked_piece = Some(to);
        if self.state.moves_this_turn >= self.config.moves_per_turn {
            self.state.phase = Phase::Wall;
        }
        Ok(())
    }

    fn apply_wall(&mut self, player: PlayerId, slot: WallSlot) -> Result<(), RuleViolation> {
        if !matches!(self.state.phase, Phase::Move | Phase::Wall) {
            return Err(RuleViolation::WrongPhase);
        }
        // The wall closes a turn; a turn must contain at least one step.
        let Some(anchor) = self.state.last_moved_to else {
            return Err(RuleViolation::NoMoveYet);
        };
        rules::check_wall(&self.state.board, slot, anchor)?;

        self.state.board.activate_wall(slot);
        self.state.moves_this_turn = 0;
        self.state.last_moved_to = None;
        self.state.locked_piece = None;

        let partition = Partition::compute(&self.state.board);
        let next = player.opponent();
        // A player who cannot step cannot complete a turn, so the game also
        // ends when the incoming player is out of moves.
        if self.termination_reached(&partition) || !rules::has_any_move(&self.state.board, next) {
            self.state.phase = Phase::End;
            self.state.winner = Some(partition.outcome());
        } else {
            self.state.phase = Phase::Move;
            self.state.current_player = next;
        }
        Ok(())
    }

    fn termination_reached(&self, partition: &Partition) -> bool {
        match self.config.end_rule {
            EndRule::ReachableShortfall => {
                partition.piece_reachable_area() < self.state.board.len()
            }
            EndRule::Exhaustion => {
                let board = &self.state.board;
                let stuck = !rules::has_any_move(board, PlayerId(0))
                    && !rules::has_any_move(board, PlayerId(1));
                stuck && !self.any_wall_grows_area(partition)
            }
        }
    }

    /// Could any single additional wall enlarge its builder's controlled
    /// area? Probes every buildable slot against a board copy.
    fn any_wall_grows_area(&self, current: &Partition) -> bool {
        for player in [PlayerId(0), PlayerId(1)] {
            let base = current.controlled_area(player);
            for slot in rules::buildable_slots(&self.state.board, player) {
                let mut probe = self.state.board.clone();
                probe.activate_wall(slot);
                if Partition::compute(&probe).controlled_area(player) > base {
                    return true;
                }
            }
        }
        false
    }

    /// Project the state onto the wire format.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            size: self.config.size,
            phase: self.state.phase,
            current_player: self.state.current_player,
            players: self
                .state
                .players
                .iter()
                .enumerate()
                .map(|(i, p)| PlayerSnapshot {
                    id: PlayerId(i as u8),
                    name: p.name.clone(),
                    pieces_placed: p.pieces_placed,
                })
                .collect(),
            board: self.state.board.occupancy().to_vec(),
            walls: self.state.board.walls().active_slots(),
            moves_this_turn: self.state.moves_this_turn,
            last_moved_to: self.state.last_moved_to,
            locked_piece: self.state.locked_piece,
            winner: self.state.winner,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config(end_rule: EndRule) -> GameConfig {
        GameConfig {
            size: 3,
            pieces_per_player: 2,
            moves_per_turn: 2,
            end_rule,
        }
    }

    fn engine() -> GameEngine {
        GameEngine::with_first_mover(
            small_config(EndRule::ReachableShortfall),
            ["Alice".into(), "Bob".into()],
            PlayerId(0),
        )
    }

    fn place(engine: &mut GameEngine, player: u8, row: i8, col: i8) {
        engine
            .try_apply_intent(
                PlayerId(player),
                Intent::PlacePiece {
                    at: Square::new(row, col),
                },
            )
            .unwrap();
    }

    /// P0 on (0,0)/(0,1), P1 on (2,2)/(2,0); P0 to move.
    fn placed_engine() -> GameEngine {
        let mut engine = engine();
        place(&mut engine, 0, 0, 0);
        place(&mut engine, 1, 2, 2);
        place(&mut engine, 0, 0, 1);
        place(&mut engine, 1, 2, 0);
        engine
    }

    #[test]
    fn placement_alternates_then_enters_move_phase() {
        let mut engine = engine();
        assert_eq!(engine.state().phase, Phase::Placement);

        place(&mut engine, 0, 0, 0);
        assert_eq!(engine.state().current_player, PlayerId(1));
        // Out of turn.
        assert_eq!(
            engine.try_apply_intent(
                PlayerId(0),
                Intent::PlacePiece {
                    at: Square::new(1, 1)
                }
            ),
            Err(RuleViolation::NotYourTurn)
        );

        place(&mut engine, 1, 2, 2);
        place(&mut engine, 0, 0, 1);
        place(&mut engine, 1, 2, 0);

        assert_eq!(engine.state().phase, Phase::Move);
        assert_eq!(engine.state().current_player, PlayerId(0));
        // Placement is closed.
        assert_eq!(
            engine.try_apply_intent(
                PlayerId(0),
                Intent::PlacePiece {
                    at: Square::new(1, 1)
                }
            ),
            Err(RuleViolation::WrongPhase)
        );
    }

    #[test]
    fn rejected_intent_leaves_state_unchanged() {
        let mut engine = placed_engine();
        let before = engine.snapshot();

        // Wall with no move this turn.
        assert_eq!(
            engine.try_apply_intent(
                PlayerId(0),
                Intent::PlaceWall {
                    slot: WallSlot::vertical(0, 0)
                }
            ),
            Err(RuleViolation::NoMoveYet)
        );
        // Opponent piece.
        assert_eq!(
            engine.try_apply_intent(
                PlayerId(0),
                Intent::MovePiece {
                    from: Square::new(2, 2),
                    to: Square::new(1, 2)
                }
            ),
            Err(RuleViolation::NotYourPiece)
        );

        assert_eq!(engine.snapshot(), before);
    }

    #[test]
    fn second_step_is_locked_to_the_moved_piece() {
        let mut engine = placed_engine();
        engine
            .try_apply_intent(
                PlayerId(0),
                Intent::MovePiece {
                    from: Square::new(0, 0),
                    to: Square::new(1, 0),
                },
            )
            .unwrap();

        assert_eq!(engine.state().locked_piece, Some(Square::new(1, 0)));
        assert_eq!(
            engine.try_apply_intent(
                PlayerId(0),
                Intent::MovePiece {
                    from: Square::new(0, 1),
                    to: Square::new(1, 1)
                }
            ),
            Err(RuleViolation::PieceLocked)
        );

        // The locked piece may still take its second step.
        engine
            .try_apply_intent(
                PlayerId(0),
                Intent::MovePiece {
                    from: Square::new(1, 0),
                    to: Square::new(1, 1),
                },
            )
            .unwrap();
        assert_eq!(engine.state().phase, Phase::Wall);
    }

    #[test]
    fn quota_forces_wall_phase_and_anchored_wall_ends_turn() {
        let mut engine = placed_engine();
        engine
            .try_apply_intent(
                PlayerId(0),
                Intent::MovePiece {
                    from: Square::new(0, 0),
                    to: Square::new(1, 0),
                },
            )
            .unwrap();
        engine
            .try_apply_intent(
                PlayerId(0),
                Intent::MovePiece {
                    from: Square::new(1, 0),
                    to: Square::new(1, 1),
                },
            )
            .unwrap();

        assert_eq!(
            engine.try_apply_intent(
                PlayerId(0),
                Intent::MovePiece {
                    from: Square::new(1, 1),
                    to: Square::new(1, 0)
                }
            ),
            Err(RuleViolation::MoveQuotaSpent)
        );
        // Not adjacent to the moved piece.
        assert_eq!(
            engine.try_apply_intent(
                PlayerId(0),
                Intent::PlaceWall {
                    slot: WallSlot::vertical(2, 1)
                }
            ),
            Err(RuleViolation::WallNotAnchored)
        );

        engine
            .try_apply_intent(
                PlayerId(0),
                Intent::PlaceWall {
                    slot: WallSlot::horizontal(1, 1),
                },
            )
            .unwrap();
        assert_eq!(engine.state().phase, Phase::Move);
        assert_eq!(engine.state().current_player, PlayerId(1));
        assert_eq!(engine.state().moves_this_turn, 0);
        assert_eq!(engine.state().locked_piece, None);
    }

    #[test]
    fn wall_after_a_single_step_ends_the_turn_early() {
        let mut engine = placed_engine();
        engine
            .try_apply_intent(
                PlayerId(0),
                Intent::MovePiece {
                    from: Square::new(0, 0),
                    to: Square::new(1, 0),
                },
            )
            .unwrap();
        engine
            .try_apply_intent(
                PlayerId(0),
                Intent::PlaceWall {
                    slot: WallSlot::horizontal(1, 0),
                },
            )
            .unwrap();

        assert_eq!(engine.state().current_player, PlayerId(1));
        assert_eq!(engine.state().phase, Phase::Move);
    }

    /// Place P0 on (0,1)/(1,0) and P1 on (2,2)/(2,0), then play three turns
    /// whose final wall seals the empty corner (0,0).
    fn seal_empty_corner(engine: &mut GameEngine) {
        place(engine, 0, 0, 1);
        place(engine, 1, 2, 2);
        place(engine, 0, 1, 0);
        place(engine, 1, 2, 0);

        let turns = [
            // P0 shuffles in place, then cuts (0,0) off from (0,1).
            (0, (0, 1), (1, 1), WallSlot::vertical(0, 0)),
            // P1 shuffles and builds a harmless wall.
            (1, (2, 2), (1, 2), WallSlot::horizontal(1, 2)),
            // P0 again: (0,0) loses its last open edge.
            (0, (1, 0), (1, 1), WallSlot::horizontal(0, 0)),
        ];
        for (player, home, via, slot) in turns {
            let (home, via) = (Square::new(home.0, home.1), Square::new(via.0, via.1));
            engine
                .try_apply_intent(PlayerId(player), Intent::MovePiece { from: home, to: via })
                .unwrap();
            engine
                .try_apply_intent(PlayerId(player), Intent::MovePiece { from: via, to: home })
                .unwrap();
            engine
                .try_apply_intent(PlayerId(player), Intent::PlaceWall { slot })
                .unwrap();
        }
    }

    #[test]
    fn sealing_an_empty_pocket_ends_the_game() {
        let mut engine = engine();
        seal_empty_corner(&mut engine);

        assert_eq!(engine.state().phase, Phase::End);
        // Two pieces each in the surviving region: split, a draw.
        assert_eq!(engine.state().winner, Some(Outcome::Draw));
        // Game over: every further intent bounces.
        assert_eq!(
            engine.try_apply_intent(
                PlayerId(1),
                Intent::MovePiece {
                    from: Square::new(2, 2),
                    to: Square::new(1, 2)
                }
            ),
            Err(RuleViolation::GameOver)
        );
    }

    #[test]
    fn exhaustion_rule_ignores_empty_pockets() {
        // Same pocket seal, but under the exhaustion rule the game keeps
        // going while pieces can still move.
        let config = small_config(EndRule::Exhaustion);
        let mut engine =
            GameEngine::with_first_mover(config, ["Alice".into(), "Bob".into()], PlayerId(0));
        seal_empty_corner(&mut engine);

        assert_eq!(engine.state().phase, Phase::Move);
        assert_eq!(engine.state().winner, None);
        assert_eq!(engine.state().current_player, PlayerId(1));
    }

    #[test]
    fn boxed_in_opponent_ends_the_game() {
        // Hand-built position: P1's lone reachable pieces are sealed once the
        // pending wall lands.
        let mut board = Board::new(3);
        board.place(Square::new(0, 0), PlayerId(0));
        board.place(Square::new(2, 1), PlayerId(0));
        board.place(Square::new(2, 2), PlayerId(1));
        board.place(Square::new(0, 2), PlayerId(1));
        board.activate_wall(WallSlot::vertical(0, 1));
        board.activate_wall(WallSlot::horizontal(0, 2));
        board.activate_wall(WallSlot::horizontal(1, 2));

        let state = GameState {
            board,
            phase: Phase::Wall,
            current_player: PlayerId(0),
            players: [
                PlayerState {
                    name: "Alice".into(),
                    pieces_placed: 2,
                },
                PlayerState {
                    name: "Bob".into(),
                    pieces_placed: 2,
                },
            ],
            moves_this_turn: 2,
            last_moved_to: Some(Square::new(2, 1)),
            locked_piece: Some(Square::new(2, 1)),
            winner: None,
        };
        let mut engine = GameEngine::from_state(small_config(EndRule::ReachableShortfall), state);
        engine
            .try_apply_intent(
                PlayerId(0),
                Intent::PlaceWall {
                    slot: WallSlot::vertical(2, 1),
                },
            )
            .unwrap();

        assert_eq!(engine.state().phase, Phase::End);
        // P1 holds two one-square cells, P0 the remaining seven squares.
        assert_eq!(
            engine.state().winner,
            Some(Outcome::Winner { player: PlayerId(0) })
        );
    }

    #[test]
    fn replay_from_identical_inputs_is_identical() {
        let build = || {
            let mut engine = GameEngine::new(
                small_config(EndRule::ReachableShortfall),
                ["Alice".into(), "Bob".into()],
                7,
            );
            let first = engine.state().current_player;
            let second = first.opponent();
            engine
                .try_apply_intent(
                    first,
                    Intent::PlacePiece {
                        at: Square::new(0, 0),
                    },
                )
                .unwrap();
            engine
                .try_apply_intent(
                    second,
                    Intent::PlacePiece {
                        at: Square::new(2, 2),
                    },
                )
                .unwrap();
            engine.snapshot()
        };
        assert_eq!(build(), build());
    }
}
