use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::config::GameConfig;
use crate::field::Field;
use crate::piece::{Piece, Position};
use crate::shapes::PieceKind;

// ============================================================================
// Scoring
// ============================================================================

pub const SCORE_SINGLE: u32 = 100;
pub const SCORE_DOUBLE: u32 = 300;
pub const SCORE_TRIPLE: u32 = 500;
pub const SCORE_TETRIS: u32 = 800;

/// Points per lock, indexed by rows cleared; anything past the end uses the last entry.
pub const SCORE_TABLE: [u32; 5] = [0, SCORE_SINGLE, SCORE_DOUBLE, SCORE_TRIPLE, SCORE_TETRIS];

pub fn score_for_lines(lines: u32) -> u32 {
    SCORE_TABLE[(lines as usize).min(SCORE_TABLE.len() - 1)]
}

// ============================================================================
// Types
// ============================================================================

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
pub enum Status {
    Active,
    Paused,
    GameOver,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Action {
    MoveLeft,
    MoveRight,
    MoveDown,
    Rotate,
    HardDrop,
    TogglePause,
    Reset,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum GameEvent {
    PieceMoved,
    PieceRotated,
    PieceLocked,
    LinesCleared(u32),
    Paused,
    Unpaused,
    GameRestarted,
    GameOver,
}

// ============================================================================
// Piece Provider Trait
// ============================================================================

pub trait PieceProvider {
    fn next_piece(&mut self) -> PieceKind;
}

/// Uniform draw over the seven kinds from a seedable generator.
pub struct RandomPieceProvider {
    rng: StdRng,
}

impl RandomPieceProvider {
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl PieceProvider for RandomPieceProvider {
    fn next_piece(&mut self) -> PieceKind {
        PieceKind::ALL[self.rng.gen_range(0..PieceKind::ALL.len())]
    }
}

/// Cycles through a fixed list of kinds.
pub struct SequencePieceProvider {
    pieces: Vec<PieceKind>,
    index: usize,
}

impl SequencePieceProvider {
    /// Panics if `pieces` is empty.
    pub fn new(pieces: Vec<PieceKind>) -> Self {
        assert!(!pieces.is_empty(), "piece sequence must not be empty");
        Self { pieces, index: 0 }
    }
}

impl PieceProvider for SequencePieceProvider {
    fn next_piece(&mut self) -> PieceKind {
        let piece = self.pieces[self.index % self.pieces.len()];
        self.index += 1;
        piece
    }
}

// ============================================================================
// Game State
// ============================================================================

/// One immutable snapshot of a session. Transitions consume it and return the next.
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub struct GameState {
    #[serde(skip)]
    config: GameConfig,
    field: Field,
    current_piece: Piece,
    next_piece: Piece,
    score: u32,
    lines_cleared: u32,
    pieces_locked: u32,
    status: Status,
}

impl GameState {
    /// Fresh session: empty field, current then next drawn from `provider`.
    pub fn new(config: GameConfig, provider: &mut dyn PieceProvider) -> Self {
        let field = Field::new(config.width, config.height);
        let current_piece = Piece::spawn(provider.next_piece(), config.width);
        let next_piece = Piece::spawn(provider.next_piece(), config.width);
        Self::from_parts(config, field, current_piece, next_piece)
    }

    /// Active state over an arbitrary field, used to set up positions directly.
    pub fn from_parts(config: GameConfig, field: Field, current_piece: Piece, next_piece: Piece) -> Self {
        Self {
            config,
            field,
            current_piece,
            next_piece,
            score: 0,
            lines_cleared: 0,
            pieces_locked: 0,
            status: Status::Active,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    pub fn current_piece(&self) -> &Piece {
        &self.current_piece
    }

    pub fn next_piece(&self) -> &Piece {
        &self.next_piece
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lines_cleared(&self) -> u32 {
        self.lines_cleared
    }

    pub fn pieces_locked(&self) -> u32 {
        self.pieces_locked
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_paused(&self) -> bool {
        self.status == Status::Paused
    }

    pub fn is_game_over(&self) -> bool {
        self.status == Status::GameOver
    }

    /// Field with the falling piece drawn in; a finished game shows only the stack.
    pub fn display_field(&self) -> Field {
        match self.status {
            Status::GameOver => self.field.clone(),
            _ => self.field.merged(&self.current_piece),
        }
    }

    // ------------------------------------------------------------------------
    // Transitions
    // ------------------------------------------------------------------------

    pub fn apply(self, action: Action, provider: &mut dyn PieceProvider) -> Self {
        match action {
            Action::MoveLeft => self.move_left(),
            Action::MoveRight => self.move_right(),
            Action::MoveDown => self.move_down(provider),
            Action::Rotate => self.rotate(),
            Action::HardDrop => self.hard_drop(provider),
            Action::TogglePause => self.toggle_pause(),
            Action::Reset => self.reset(provider),
        }
    }

    pub fn move_left(self) -> Self {
        self.shifted(-1)
    }

    pub fn move_right(self) -> Self {
        self.shifted(1)
    }

    /// One row down, or a lock when the row below is blocked.
    pub fn move_down(self, provider: &mut dyn PieceProvider) -> Self {
        if self.status != Status::Active {
            return self;
        }
        let candidate = self.current_piece.moved(0, 1);
        if self.field.collides(&candidate) {
            let resting = self.current_piece;
            return self.lock(resting, provider);
        }
        Self {
            current_piece: candidate,
            ..self
        }
    }

    /// Rotates clockwise, retrying one column left then one column right.
    pub fn rotate(self) -> Self {
        if self.status != Status::Active {
            return self;
        }
        let rotated = self.current_piece.rotated();
        for dx in [0, -1, 1] {
            let candidate = rotated.moved(dx, 0);
            if !self.field.collides(&candidate) {
                return Self {
                    current_piece: candidate,
                    ..self
                };
            }
        }
        self
    }

    pub fn hard_drop(self, provider: &mut dyn PieceProvider) -> Self {
        if self.status != Status::Active {
            return self;
        }
        let below = Position::new(0, 1);
        let mut resting = self.current_piece;
        while !self.field.collides_at(&resting, below) {
            resting = resting.moved(0, 1);
        }
        self.lock(resting, provider)
    }

    pub fn toggle_pause(self) -> Self {
        let status = match self.status {
            Status::Active => Status::Paused,
            Status::Paused => Status::Active,
            Status::GameOver => return self,
        };
        Self { status, ..self }
    }

    pub fn reset(self, provider: &mut dyn PieceProvider) -> Self {
        Self::new(self.config, provider)
    }

    fn shifted(self, dx: i16) -> Self {
        if self.status != Status::Active {
            return self;
        }
        let candidate = self.current_piece.moved(dx, 0);
        if self.field.collides(&candidate) {
            return self;
        }
        Self {
            current_piece: candidate,
            ..self
        }
    }

    /// Merges `resting`, clears rows, scores, and promotes the next piece.
    /// Ends the game instead of promoting when the next piece has no room.
    fn lock(self, resting: Piece, provider: &mut dyn PieceProvider) -> Self {
        let (field, lines) = self.field.merged(&resting).cleared_full_rows();
        let score = self.score + score_for_lines(lines);
        let lines_cleared = self.lines_cleared + lines;
        let pieces_locked = self.pieces_locked + 1;

        if field.collides(&self.next_piece) {
            return Self {
                field,
                current_piece: resting,
                score,
                lines_cleared,
                pieces_locked,
                status: Status::GameOver,
                ..self
            };
        }

        let next_piece = Piece::spawn(provider.next_piece(), self.config.width);
        Self {
            field,
            current_piece: self.next_piece,
            next_piece,
            score,
            lines_cleared,
            pieces_locked,
            ..self
        }
    }
}

// ============================================================================
// Game
// ============================================================================

/// Owns the session state and its piece source; records events for observers.
pub struct Game {
    state: GameState,
    piece_provider: Box<dyn PieceProvider>,
    events: Vec<GameEvent>,
}

impl Game {
    pub fn new(config: GameConfig) -> Self {
        Self::with_provider(config, Box::new(RandomPieceProvider::from_entropy()))
    }

    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self::with_provider(config, Box::new(RandomPieceProvider::seeded(seed)))
    }

    pub fn with_provider(config: GameConfig, mut provider: Box<dyn PieceProvider>) -> Self {
        let state = GameState::new(config, provider.as_mut());
        Self::with_state(state, provider)
    }

    pub fn with_state(state: GameState, provider: Box<dyn PieceProvider>) -> Self {
        Self {
            state,
            piece_provider: provider,
            events: Vec::new(),
        }
    }

    /// Active game on `field` with `current` falling; the next piece comes from `provider`.
    pub fn with_field(field: Field, current: Piece, mut provider: Box<dyn PieceProvider>) -> Self {
        let config = GameConfig {
            width: field.width(),
            height: field.height(),
            ..GameConfig::default()
        };
        let next = Piece::spawn(provider.next_piece(), config.width);
        Self::with_state(GameState::from_parts(config, field, current, next), provider)
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn apply(&mut self, action: Action) {
        let next = self.state.clone().apply(action, self.piece_provider.as_mut());
        let before = std::mem::replace(&mut self.state, next);
        self.record_events(action, &before);
    }

    pub fn move_left(&mut self) {
        self.apply(Action::MoveLeft);
    }

    pub fn move_right(&mut self) {
        self.apply(Action::MoveRight);
    }

    pub fn move_down(&mut self) {
        self.apply(Action::MoveDown);
    }

    pub fn rotate(&mut self) {
        self.apply(Action::Rotate);
    }

    pub fn hard_drop(&mut self) {
        self.apply(Action::HardDrop);
    }

    pub fn toggle_pause(&mut self) {
        self.apply(Action::TogglePause);
    }

    pub fn reset(&mut self) {
        self.apply(Action::Reset);
    }

    /// Timer entry point: gravity only applies to an active game.
    pub fn tick(&mut self) {
        if self.state.status() == Status::Active {
            self.apply(Action::MoveDown);
        }
    }

    pub fn display_field(&self) -> Field {
        self.state.display_field()
    }

    /// Takes and clears all pending events
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    fn record_events(&mut self, action: Action, before: &GameState) {
        let after = &self.state;

        if action == Action::Reset {
            self.events.push(GameEvent::GameRestarted);
            return;
        }

        match (before.status(), after.status()) {
            (Status::Active, Status::Paused) => self.events.push(GameEvent::Paused),
            (Status::Paused, Status::Active) => self.events.push(GameEvent::Unpaused),
            _ => {}
        }

        if after.pieces_locked() > before.pieces_locked() {
            self.events.push(GameEvent::PieceLocked);
            let lines = after.lines_cleared() - before.lines_cleared();
            if lines > 0 {
                self.events.push(GameEvent::LinesCleared(lines));
            }
            if after.is_game_over() {
                self.events.push(GameEvent::GameOver);
            }
            return;
        }

        if after.current_piece() != before.current_piece() {
            match action {
                Action::Rotate => self.events.push(GameEvent::PieceRotated),
                _ => self.events.push(GameEvent::PieceMoved),
            }
        }
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}

// ============================================================================
// Test Helpers
// ============================================================================

pub mod test_helpers {
    use super::*;
    use crate::field::Cell;
    use crate::shapes::Color;

    pub const JUNK: Cell = Cell::Filled(Color::rgb(0x80, 0x80, 0x80));

    pub fn empty_field() -> Field {
        let config = GameConfig::default();
        Field::new(config.width, config.height)
    }

    pub fn fill_row(field: &mut Field, y: usize) {
        for x in 0..field.width() {
            field.set(x, y, JUNK);
        }
    }

    pub fn fill_row_with_gap(field: &mut Field, y: usize, gap_x: usize) {
        for x in 0..field.width() {
            if x != gap_x {
                field.set(x, y, JUNK);
            }
        }
    }

    /// Game on `field` whose pieces come from a fixed cycle.
    pub fn game_with(field: Field, current: Piece, sequence: Vec<PieceKind>) -> Game {
        Game::with_field(field, current, Box::new(SequencePieceProvider::new(sequence)))
    }
}
