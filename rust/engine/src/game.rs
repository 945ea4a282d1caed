use crate::board::{Board, Coord, Mark};
use crate::errors::GameError;
use crate::names::pick_name;
use crate::outcome::{evaluate, Outcome};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Builder;

/// Opaque match identifier (UUID text).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchId(String);

impl MatchId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Random v4 UUID drawn from `rng`.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut bytes = [0u8; 16];
        rng.fill(&mut bytes);
        Self(Builder::from_random_bytes(bytes).into_uuid().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for MatchId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for MatchId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Full state of one game: identity, grid, side to move and outcome.
///
/// This is also the record shape handed to the record store and pushed to
/// room members. `outcome` is omitted from JSON while the match is undecided.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    /// Assigned at creation, never changes
    pub id: MatchId,
    /// Two-word display label
    pub name: String,
    pub board: Board,
    /// Side that moves next
    pub turn: Mark,
    /// Set once the match is decided, never cleared
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<Outcome>,
}

impl Match {
    /// Empty match with an explicit identity.
    pub fn new(id: MatchId, name: impl Into<String>, starting_mark: Mark) -> Self {
        Self {
            id,
            name: name.into(),
            board: Board::empty(),
            turn: starting_mark,
            outcome: None,
        }
    }

    pub fn is_decided(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn occupied_cells(&self) -> usize {
        self.board.occupied_count()
    }

    /// See [`apply_move`].
    pub fn apply_move(&self, coord: Coord) -> Result<Match, GameError> {
        apply_move(self, coord)
    }
}

/// Creates an empty match with a fresh id and display name drawn from `rng`.
///
/// ```
/// use noughts_engine::board::Mark;
/// use noughts_engine::game::create;
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha20Rng;
///
/// let mut rng = ChaCha20Rng::seed_from_u64(1);
/// let game = create(Mark::X, &mut rng);
/// assert_eq!(game.turn, Mark::X);
/// assert_eq!(game.occupied_cells(), 0);
/// assert!(game.outcome.is_none());
/// ```
pub fn create<R: Rng + ?Sized>(starting_mark: Mark, rng: &mut R) -> Match {
    let id = MatchId::generate(rng);
    let name = pick_name(rng);
    Match::new(id, name, starting_mark)
}

/// Applies the side-to-move's mark at `coord` and returns the next match.
///
/// The input is never modified.
///
/// - `coord` outside the grid: [`GameError::OutOfRange`].
/// - match already decided: [`GameError::MatchDecided`].
/// - `coord` already occupied: `Ok` with a copy equal to `current`; turn and
///   outcome are untouched.
/// - otherwise the cell takes the mover's mark, the outcome is re-evaluated
///   for the mover and the turn passes to the opponent.
///
/// # Examples
///
/// ```
/// use noughts_engine::board::{Coord, Mark};
/// use noughts_engine::game::{apply_move, Match, MatchId};
///
/// let start = Match::new(MatchId::new("m-1"), "Red Panda", Mark::X);
/// let next = apply_move(&start, Coord::new(1, 1)).unwrap();
/// assert_eq!(next.board.get(Coord::new(1, 1)), Some(Mark::X));
/// assert_eq!(next.turn, Mark::O);
///
/// // Replaying the same cell changes nothing.
/// let again = apply_move(&next, Coord::new(1, 1)).unwrap();
/// assert_eq!(again, next);
/// ```
pub fn apply_move(current: &Match, coord: Coord) -> Result<Match, GameError> {
    let coord = coord.validate()?;

    if current.is_decided() {
        return Err(GameError::MatchDecided);
    }

    if current.board.is_occupied(coord) {
        return Ok(current.clone());
    }

    let mover = current.turn;
    let board = current.board.with_mark(coord, mover);

    Ok(Match {
        id: current.id.clone(),
        name: current.name.clone(),
        board,
        turn: mover.opponent(),
        outcome: evaluate(&board, mover),
    })
}
