use crate::errors::{ErrorSeverity, IntoErrorResponse};
use crate::events::{RoomBroadcaster, RoomEvent};
use crate::store::{RecordStore, StoreError};
use noughts_ai::minimax::MinimaxAdvisor;
use noughts_ai::{AdvisorError, MoveAdvisor};
use noughts_engine::board::{Coord, Mark};
use noughts_engine::errors::GameError;
use noughts_engine::game::{self, Match, MatchId};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;
use tokio::sync::Mutex as AsyncMutex;
use warp::http::StatusCode;

/// Upper bound on the number of matches a lobby listing returns.
pub const MAX_LOBBY_LIMIT: usize = 10;

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("Match not found: {0}")]
    NotFound(MatchId),
    #[error(transparent)]
    Game(#[from] GameError),
    #[error(transparent)]
    Advisor(#[from] AdvisorError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl IntoErrorResponse for DirectoryError {
    fn status_code(&self) -> StatusCode {
        match self {
            DirectoryError::NotFound(_) => StatusCode::NOT_FOUND,
            DirectoryError::Game(GameError::MatchDecided) => StatusCode::CONFLICT,
            DirectoryError::Game(_) => StatusCode::BAD_REQUEST,
            DirectoryError::Advisor(AdvisorError::UnknownAdvisor(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            DirectoryError::Advisor(_) => StatusCode::CONFLICT,
            DirectoryError::Store(StoreError::Unavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
            DirectoryError::Store(StoreError::StoragePoisoned) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            DirectoryError::NotFound(_) => "match_not_found",
            DirectoryError::Game(GameError::OutOfRange { .. }) => "coordinate_out_of_range",
            DirectoryError::Game(GameError::MatchDecided) => "match_decided",
            DirectoryError::Game(GameError::InvalidBoard(_)) => "invalid_board",
            DirectoryError::Advisor(AdvisorError::MatchDecided) => "match_decided",
            DirectoryError::Advisor(AdvisorError::NoLegalMoves) => "no_legal_moves",
            DirectoryError::Advisor(AdvisorError::UnknownAdvisor(_)) => "advisor_unavailable",
            DirectoryError::Store(StoreError::Unavailable(_)) => "store_unavailable",
            DirectoryError::Store(StoreError::StoragePoisoned) => "storage_poisoned",
        }
    }

    fn error_message(&self) -> String {
        self.to_string()
    }

    fn error_details(&self) -> Option<serde_json::Value> {
        match self {
            DirectoryError::NotFound(id) => Some(serde_json::json!({ "match_id": id })),
            DirectoryError::Game(GameError::OutOfRange { row, col }) => Some(serde_json::json!({
                "row": row,
                "col": col,
                "allowed": "0..=2"
            })),
            _ => None,
        }
    }

    fn severity(&self) -> ErrorSeverity {
        match self {
            DirectoryError::Store(StoreError::StoragePoisoned) => ErrorSeverity::Critical,
            DirectoryError::Store(_) | DirectoryError::Advisor(AdvisorError::UnknownAdvisor(_)) => {
                ErrorSeverity::Server
            }
            _ => ErrorSeverity::Client,
        }
    }
}

/// Result of a move submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveReceipt {
    /// Record after the submission
    #[serde(rename = "match")]
    pub record: Match,
    /// False when the target cell was already occupied and nothing changed
    pub applied: bool,
}

/// Construction knobs for [`MatchDirectory`].
#[derive(Clone)]
pub struct DirectoryOptions {
    /// Seed for id and name generation; random when absent
    pub seed: Option<u64>,
    pub advisor: Arc<dyn MoveAdvisor>,
    /// Listing size used when a caller does not ask for one
    pub lobby_limit: usize,
}

impl DirectoryOptions {
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    pub fn with_advisor(mut self, advisor: Arc<dyn MoveAdvisor>) -> Self {
        self.advisor = advisor;
        self
    }

    pub fn with_lobby_limit(mut self, limit: usize) -> Self {
        self.lobby_limit = limit;
        self
    }
}

impl Default for DirectoryOptions {
    fn default() -> Self {
        Self {
            seed: None,
            advisor: Arc::new(MinimaxAdvisor::with_pruning()),
            lobby_limit: MAX_LOBBY_LIMIT,
        }
    }
}

impl fmt::Debug for DirectoryOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirectoryOptions")
            .field("seed", &self.seed)
            .field("advisor", &self.advisor.name())
            .field("lobby_limit", &self.lobby_limit)
            .finish()
    }
}

type LockTable = Mutex<HashMap<MatchId, Arc<AsyncMutex<()>>>>;

/// Sole mutator of match records.
///
/// Move submissions for the same match run one at a time (load, apply,
/// store, notify); submissions for different matches proceed in parallel.
pub struct MatchDirectory {
    store: Arc<dyn RecordStore>,
    rooms: Arc<RoomBroadcaster>,
    advisor: Arc<dyn MoveAdvisor>,
    rng: Mutex<ChaCha20Rng>,
    locks: LockTable,
    lobby_limit: usize,
}

impl MatchDirectory {
    pub fn new(
        store: Arc<dyn RecordStore>,
        rooms: Arc<RoomBroadcaster>,
        options: DirectoryOptions,
    ) -> Self {
        let seed = options.seed.unwrap_or_else(rand::random);
        Self {
            store,
            rooms,
            advisor: options.advisor,
            rng: Mutex::new(ChaCha20Rng::seed_from_u64(seed)),
            locks: Mutex::new(HashMap::new()),
            lobby_limit: options.lobby_limit.min(MAX_LOBBY_LIMIT),
        }
    }

    pub fn rooms(&self) -> Arc<RoomBroadcaster> {
        Arc::clone(&self.rooms)
    }

    pub fn advisor_name(&self) -> &str {
        self.advisor.name()
    }

    pub fn lobby_limit(&self) -> usize {
        self.lobby_limit
    }

    pub async fn create_match(&self, starting_mark: Mark) -> Result<Match, DirectoryError> {
        let record = {
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            game::create(starting_mark, &mut *rng)
        };
        self.store.put(record.clone()).await?;

        tracing::info!(
            match_id = %record.id,
            name = %record.name,
            starting_mark = %starting_mark,
            "match created"
        );
        Ok(record)
    }

    pub async fn get_match(&self, id: &MatchId) -> Result<Match, DirectoryError> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| DirectoryError::NotFound(id.clone()))
    }

    /// Undecided matches in store order, at most `min(limit, MAX_LOBBY_LIMIT)`.
    pub async fn list_open_matches(&self, limit: usize) -> Result<Vec<Match>, DirectoryError> {
        let limit = limit.min(MAX_LOBBY_LIMIT);
        let open = self
            .store
            .list_where(&|record: &Match| !record.is_decided(), limit)
            .await?;
        Ok(open)
    }

    /// Applies a move for the side to move and pushes the result to the room.
    ///
    /// A move onto an occupied cell is stored and broadcast unchanged with
    /// `applied == false`. Errors leave the stored record untouched.
    pub async fn submit_move(
        &self,
        id: &MatchId,
        coord: Coord,
    ) -> Result<MoveReceipt, DirectoryError> {
        let lease = self.lease_lock(id);
        let _serialized = lease.lock.lock().await;

        let current = self.get_match(id).await?;
        let next = match game::apply_move(&current, coord) {
            Ok(next) => next,
            Err(err) => {
                tracing::debug!(match_id = %id, coord = %coord, error = %err, "move rejected");
                return Err(err.into());
            }
        };
        let applied = next.occupied_cells() > current.occupied_cells();

        self.store.put(next.clone()).await?;
        self.rooms.notify(
            id,
            RoomEvent::MatchUpdated {
                match_id: id.clone(),
                applied,
                record: next.clone(),
            },
        );

        tracing::info!(
            match_id = %id,
            coord = %coord,
            mover = %current.turn,
            applied,
            outcome = ?next.outcome,
            "move submitted"
        );

        Ok(MoveReceipt {
            record: next,
            applied,
        })
    }

    /// Advisor recommendation for the side to move.
    pub async fn recommend_move(&self, id: &MatchId) -> Result<Coord, DirectoryError> {
        let record = self.get_match(id).await?;
        let coord = self.advisor.recommend(&record)?;
        tracing::debug!(
            match_id = %id,
            advisor = self.advisor.name(),
            coord = %coord,
            "move recommended"
        );
        Ok(coord)
    }

    /// Per-match locks currently held or awaited.
    pub fn active_locks(&self) -> usize {
        lock_table(&self.locks).len()
    }

    fn lease_lock(&self, id: &MatchId) -> LockLease<'_> {
        let lock = Arc::clone(lock_table(&self.locks).entry(id.clone()).or_default());
        LockLease {
            table: &self.locks,
            id: id.clone(),
            lock,
        }
    }
}

impl fmt::Debug for MatchDirectory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MatchDirectory")
            .field("advisor", &self.advisor.name())
            .field("lobby_limit", &self.lobby_limit)
            .field("rooms", &self.rooms)
            .finish_non_exhaustive()
    }
}

// The table and the RNG hold no invariant a panicking holder can break.
fn lock_table(table: &LockTable) -> MutexGuard<'_, HashMap<MatchId, Arc<AsyncMutex<()>>>> {
    table.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Shared handle on one match's lock; the table entry goes away with the last lease.
struct LockLease<'a> {
    table: &'a LockTable,
    id: MatchId,
    lock: Arc<AsyncMutex<()>>,
}

impl Drop for LockLease<'_> {
    fn drop(&mut self) {
        let mut table = lock_table(self.table);
        let idle = table
            .get(&self.id)
            .is_some_and(|entry| Arc::ptr_eq(entry, &self.lock) && Arc::strong_count(entry) == 2);
        if idle {
            table.remove(&self.id);
        }
    }
}
