use crate::directory::MatchDirectory;
use crate::errors::IntoErrorResponse;
use crate::events::{Connection, RoomBroadcaster, RoomEvent};
use noughts_engine::game::MatchId;
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;
use tokio_stream::StreamExt;
use warp::http;
use warp::reply::{self, Response};
use warp::sse;
use warp::Reply;

const KEEP_ALIVE_INTERVAL: Duration = Duration::from_secs(15);

/// `GET /api/matches/{id}/events`: joins the match room and streams its events.
///
/// A missing match answers 404 and subscribes nothing. The connection leaves
/// every room when the client goes away; the stream ends if the connection is
/// pruned from its room.
pub async fn stream_events(
    id: String,
    directory: Arc<MatchDirectory>,
    rooms: Arc<RoomBroadcaster>,
) -> Response {
    let id = MatchId::from(id);
    let connection = rooms.connect();

    if let Err(err) = rooms.join(&connection, &directory, &id).await {
        return err.into_http_response();
    }

    let stream = connection_stream(connection);
    let keep_alive = sse::keep_alive()
        .interval(KEEP_ALIVE_INTERVAL)
        .text(":keep-alive\n");

    let reply = sse::reply(keep_alive.stream(stream));
    reply::with_header(reply, http::header::CACHE_CONTROL, "no-cache").into_response()
}

fn connection_stream(
    connection: Connection,
) -> impl tokio_stream::Stream<Item = Result<sse::Event, Infallible>> {
    connection
        .into_stream()
        .map(|event| Ok(render_event(&event)))
}

fn render_event(event: &RoomEvent) -> sse::Event {
    match serde_json::to_string(event) {
        Ok(json) => sse::Event::default().event("room_event").data(json),
        Err(err) => {
            let fallback = serde_json::json!({
                "type": "error",
                "message": format!("failed to serialize room event: {err}")
            })
            .to_string();
            sse::Event::default().event("room_event").data(fallback)
        }
    }
}
