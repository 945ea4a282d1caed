use crate::directory::{DirectoryError, MatchDirectory};
use crate::errors::IntoErrorResponse;
use noughts_engine::board::{Coord, Mark};
use noughts_engine::game::MatchId;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use warp::http::StatusCode;
use warp::reply::{self, Response};
use warp::Reply;

#[derive(Debug, Default, Deserialize)]
pub struct CreateMatchRequest {
    /// Side that moves first; `x` when omitted
    #[serde(default)]
    pub starting_mark: Option<Mark>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListMatchesQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct MoveRequest {
    pub row: usize,
    pub col: usize,
}

#[derive(Debug, Serialize)]
pub struct SuggestionResponse {
    pub row: usize,
    pub col: usize,
    pub advisor: String,
}

/// Creates an empty match.
///
/// # HTTP Method and Path
/// - **Method**: POST
/// - **Path**: `/api/matches`
///
/// # Request Format
/// ```json
/// { "starting_mark": "o" }
/// ```
///
/// # Response Format
/// - **Success (201 Created)**: the new match record
/// - **Error (503 Service Unavailable)**: the record store rejected the write
pub async fn create_match(directory: Arc<MatchDirectory>, request: CreateMatchRequest) -> Response {
    let starting_mark = request.starting_mark.unwrap_or(Mark::X);
    match directory.create_match(starting_mark).await {
        Ok(record) => success_response(StatusCode::CREATED, record),
        Err(err) => directory_error(err),
    }
}

/// Lists undecided matches in creation order.
///
/// `GET /api/matches?limit=N`; the limit defaults to the configured lobby size
/// and never exceeds 10.
pub async fn list_matches(directory: Arc<MatchDirectory>, query: ListMatchesQuery) -> Response {
    let limit = query.limit.unwrap_or_else(|| directory.lobby_limit());
    match directory.list_open_matches(limit).await {
        Ok(records) => success_response(StatusCode::OK, records),
        Err(err) => directory_error(err),
    }
}

/// `GET /api/matches/{id}`: the stored record or 404.
pub async fn get_match(directory: Arc<MatchDirectory>, id: String) -> Response {
    match directory.get_match(&MatchId::from(id)).await {
        Ok(record) => success_response(StatusCode::OK, record),
        Err(err) => directory_error(err),
    }
}

/// Applies a move for the side to move.
///
/// # HTTP Method and Path
/// - **Method**: POST
/// - **Path**: `/api/matches/{id}/moves`
///
/// # Request Format
/// ```json
/// { "row": 0, "col": 2 }
/// ```
///
/// # Response Format
/// - **Success (200 OK)**: `{"match": {...}, "applied": true}`; `applied` is
///   false when the cell was already taken and the record is unchanged
/// - **Error (400 Bad Request)**: `coordinate_out_of_range`
/// - **Error (404 Not Found)**: `match_not_found`
/// - **Error (409 Conflict)**: `match_decided`
pub async fn submit_move(
    directory: Arc<MatchDirectory>,
    id: String,
    request: MoveRequest,
) -> Response {
    let coord = Coord::new(request.row, request.col);
    match directory.submit_move(&MatchId::from(id), coord).await {
        Ok(receipt) => success_response(StatusCode::OK, receipt),
        Err(err) => directory_error(err),
    }
}

/// `GET /api/matches/{id}/suggestion`: the advisor's move for the side to move.
pub async fn suggest_move(directory: Arc<MatchDirectory>, id: String) -> Response {
    match directory.recommend_move(&MatchId::from(id)).await {
        Ok(coord) => success_response(
            StatusCode::OK,
            SuggestionResponse {
                row: coord.row,
                col: coord.col,
                advisor: directory.advisor_name().to_string(),
            },
        ),
        Err(err) => directory_error(err),
    }
}

fn success_response<T>(status: StatusCode, body: T) -> Response
where
    T: Serialize,
{
    reply::with_status(reply::json(&body), status).into_response()
}

fn directory_error(err: DirectoryError) -> Response {
    err.into_http_response()
}
