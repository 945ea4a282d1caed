//! # noughts_web: Live Tic-Tac-Toe Rooms over HTTP
//!
//! Serves matches held by a [`MatchDirectory`] and pushes every change to
//! the viewers of that match through Server-Sent Events.
//!
//! - [`store`] - Record store port and the in-memory store
//! - [`directory`] - Creation, lookup, lobby listing and serialized move submission
//! - [`events`] - Per-match rooms and best-effort event fan-out
//! - [`server`] - warp routes, shared context and server lifecycle
//! - [`settings`] - Layered server configuration

pub mod directory;
pub mod errors;
pub mod events;
pub mod handlers;
pub mod logging;
pub mod middleware;
pub mod server;
pub mod settings;
pub mod store;

pub use directory::{DirectoryError, DirectoryOptions, MatchDirectory, MoveReceipt, MAX_LOBBY_LIMIT};
pub use errors::{ErrorResponse, ErrorSeverity, IntoErrorResponse};
pub use events::{Connection, ConnectionId, ConnectionStream, RoomBroadcaster, RoomEvent, RoomKey};
pub use logging::{init_logging, init_test_logging, LogEntry, LogFormat, TestLogSubscriber};
pub use middleware::{log_response, request_log};
pub use server::{AppContext, ServerConfig, ServerError, ServerHandle, WebServer};
pub use settings::{ServerSettings, SettingsError, SettingsResolved, ValueSource};
pub use store::{InMemoryRecordStore, RecordStore, StoreError};
