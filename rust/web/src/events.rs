use crate::directory::{DirectoryError, MatchDirectory};
use noughts_engine::game::{Match, MatchId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::pin::Pin;
use std::sync::{Arc, PoisonError, RwLock};
use std::task::{Context, Poll};
use tokio::sync::mpsc;
use tokio_stream::Stream;
use uuid::Uuid;

// Per-connection queue depth; a full queue drops the member.
const EVENT_CHANNEL_BUFFER: usize = 1000;

pub type EventSender = mpsc::Sender<RoomEvent>;
pub type EventReceiver = mpsc::Receiver<RoomEvent>;

/// Identifies one live connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Room address: `"match-" + id`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RoomKey(String);

impl RoomKey {
    pub fn for_match(id: &MatchId) -> Self {
        Self(format!("match-{id}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Pushed to every member of a match room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RoomEvent {
    /// The record after a move submission; `applied` is false for a no-op
    MatchUpdated {
        match_id: MatchId,
        applied: bool,
        record: Match,
    },
    ConnectionJoined {
        match_id: MatchId,
        connection_id: ConnectionId,
    },
}

impl RoomEvent {
    pub fn match_id(&self) -> &MatchId {
        match self {
            RoomEvent::MatchUpdated { match_id, .. } => match_id,
            RoomEvent::ConnectionJoined { match_id, .. } => match_id,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            RoomEvent::MatchUpdated { .. } => "match_updated",
            RoomEvent::ConnectionJoined { .. } => "connection_joined",
        }
    }
}

/// A live viewer. Dropping it removes it from every room it joined.
///
/// The connection holds a sender of its own so it can join rooms; once turned
/// into a [`ConnectionStream`] only room memberships keep the channel open.
pub struct Connection {
    membership: Membership,
    sender: EventSender,
    receiver: EventReceiver,
}

impl Connection {
    pub fn id(&self) -> ConnectionId {
        self.membership.id
    }

    pub fn receiver(&mut self) -> &mut EventReceiver {
        &mut self.receiver
    }

    /// Stops joining and yields room events until every membership is gone.
    ///
    /// A member pruned from its last room (closed or full queue) sees the
    /// buffered events and then the end of the stream.
    pub fn into_stream(self) -> ConnectionStream {
        let Connection {
            membership,
            sender,
            receiver,
        } = self;
        drop(sender);
        ConnectionStream {
            receiver,
            _membership: membership,
        }
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection").field("id", &self.membership.id).finish()
    }
}

/// Room events for one connection; dropping it leaves every room.
#[derive(Debug)]
pub struct ConnectionStream {
    receiver: EventReceiver,
    _membership: Membership,
}

impl Stream for ConnectionStream {
    type Item = RoomEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<RoomEvent>> {
        self.receiver.poll_recv(cx)
    }
}

#[derive(Debug)]
struct Membership {
    id: ConnectionId,
    rooms: RoomBroadcaster,
}

impl Drop for Membership {
    fn drop(&mut self) {
        self.rooms.disconnect(self.id);
    }
}

type Members = HashMap<ConnectionId, EventSender>;

/// Fans room events out to the connections subscribed to each match.
///
/// Cloning is cheap and every clone shares the same rooms.
#[derive(Debug, Clone, Default)]
pub struct RoomBroadcaster {
    inner: Arc<RoomBroadcasterInner>,
}

#[derive(Debug, Default)]
struct RoomBroadcasterInner {
    rooms: RwLock<HashMap<RoomKey, Members>>,
}

impl RoomBroadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connect(&self) -> Connection {
        self.connect_with_buffer(EVENT_CHANNEL_BUFFER)
    }

    pub fn connect_with_buffer(&self, buffer: usize) -> Connection {
        let (sender, receiver) = mpsc::channel(buffer.max(1));
        let id = ConnectionId::new();
        tracing::debug!(connection_id = %id, "connection opened");
        Connection {
            membership: Membership {
                id,
                rooms: self.clone(),
            },
            sender,
            receiver,
        }
    }

    /// Subscribes `connection` to the room of match `id`.
    ///
    /// The match is looked up first; if it cannot be loaded nothing is
    /// subscribed. Joining a room twice keeps a single membership and only
    /// the first join is announced to the room.
    pub async fn join(
        &self,
        connection: &Connection,
        directory: &MatchDirectory,
        id: &MatchId,
    ) -> Result<RoomKey, DirectoryError> {
        directory.get_match(id).await?;

        let room = RoomKey::for_match(id);
        let newly_joined = {
            let mut guard = self.write_rooms();
            guard
                .entry(room.clone())
                .or_default()
                .insert(connection.id(), connection.sender.clone())
                .is_none()
        };

        if newly_joined {
            tracing::info!(
                match_id = %id,
                connection_id = %connection.id(),
                room = %room,
                "connection joined room"
            );
            self.notify(
                id,
                RoomEvent::ConnectionJoined {
                    match_id: id.clone(),
                    connection_id: connection.id(),
                },
            );
        }

        Ok(room)
    }

    /// Removes `connection` from the room of match `id`. Returns whether it was a member.
    pub fn leave(&self, connection: &Connection, id: &MatchId) -> bool {
        self.remove_members(&RoomKey::for_match(id), &[connection.id()])
    }

    /// Delivers `event` to every member of the room of match `id`.
    ///
    /// Members whose channel is closed or full are dropped from the room.
    pub fn notify(&self, id: &MatchId, event: RoomEvent) {
        let room = RoomKey::for_match(id);
        tracing::debug!(
            match_id = %id,
            room = %room,
            event_type = event.kind(),
            "broadcasting room event"
        );

        let members: Vec<(ConnectionId, EventSender)> = {
            let guard = self.read_rooms();
            match guard.get(&room) {
                Some(members) => members
                    .iter()
                    .map(|(id, sender)| (*id, sender.clone()))
                    .collect(),
                None => {
                    tracing::debug!(room = %room, "no members in room");
                    return;
                }
            }
        };

        let mut failed = Vec::new();
        for (connection_id, sender) in members {
            if let Err(err) = sender.try_send(event.clone()) {
                tracing::warn!(
                    room = %room,
                    connection_id = %connection_id,
                    error = %err,
                    "dropping room member"
                );
                failed.push(connection_id);
            }
        }
        if !failed.is_empty() {
            self.remove_members(&room, &failed);
        }
    }

    /// Discards the room of match `id` with all its memberships.
    pub fn drop_room(&self, id: &MatchId) {
        let room = RoomKey::for_match(id);
        if self.write_rooms().remove(&room).is_some() {
            tracing::debug!(room = %room, "room dropped");
        }
    }

    pub fn room_size(&self, id: &MatchId) -> usize {
        self.read_rooms()
            .get(&RoomKey::for_match(id))
            .map_or(0, HashMap::len)
    }

    /// Memberships across all rooms.
    pub fn subscriber_count(&self) -> usize {
        self.read_rooms().values().map(HashMap::len).sum()
    }

    pub fn room_count(&self) -> usize {
        self.read_rooms().len()
    }

    fn disconnect(&self, connection_id: ConnectionId) {
        let mut guard = self.write_rooms();
        guard.retain(|_, members| {
            members.remove(&connection_id);
            !members.is_empty()
        });
        tracing::debug!(connection_id = %connection_id, "connection closed");
    }

    fn remove_members(&self, room: &RoomKey, ids: &[ConnectionId]) -> bool {
        let mut guard = self.write_rooms();
        let Some(members) = guard.get_mut(room) else {
            return false;
        };
        let before = members.len();
        members.retain(|id, _| !ids.contains(id));
        let removed = members.len() != before;
        if members.is_empty() {
            guard.remove(room);
        }
        removed
    }

    // Poisoned locks are recovered; notify never fails.
    fn read_rooms(&self) -> std::sync::RwLockReadGuard<'_, HashMap<RoomKey, Members>> {
        self.inner
            .rooms
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write_rooms(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<RoomKey, Members>> {
        self.inner
            .rooms
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
