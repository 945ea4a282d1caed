use crate::directory::MatchDirectory;
use crate::events::RoomBroadcaster;
use serde::Serialize;
use warp::reply::Json;

#[derive(Debug, Serialize)]
struct HealthBody<'a> {
    status: &'static str,
    advisor: &'a str,
    open_rooms: usize,
    subscribers: usize,
}

/// `GET /health`: liveness plus a snapshot of live rooms.
pub fn health(directory: &MatchDirectory, rooms: &RoomBroadcaster) -> Json {
    warp::reply::json(&HealthBody {
        status: "ok",
        advisor: directory.advisor_name(),
        open_rooms: rooms.room_count(),
        subscribers: rooms.subscriber_count(),
    })
}
