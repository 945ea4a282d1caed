pub mod health;
pub mod matches;
pub mod sse;

pub use health::health;
pub use matches::{
    create_match, get_match, list_matches, submit_move, suggest_move, CreateMatchRequest,
    ListMatchesQuery, MoveRequest, SuggestionResponse,
};
pub use sse::stream_events;
