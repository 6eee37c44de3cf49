use std::{
    collections::{HashMap, HashSet},
    sync::atomic::{AtomicU64, Ordering},
};

use tokio::sync::{mpsc, Mutex};

use crate::chat::RoomId;

use super::ServerEvent;

pub type ConnectionId = u64;

/// In-memory room membership for live sockets. Nothing here is persisted;
/// a restart simply empties every room.
#[derive(Default)]
pub struct Relay {
    next_id: AtomicU64,
    inner: Mutex<RelayInner>,
}

#[derive(Default)]
struct RelayInner {
    rooms: HashMap<RoomId, HashSet<ConnectionId>>,
    connections: HashMap<ConnectionId, mpsc::UnboundedSender<ServerEvent>>,
}

impl Relay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a connection; events for it arrive on the returned receiver.
    pub async fn connect(&self) -> (ConnectionId, mpsc::UnboundedReceiver<ServerEvent>) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::unbounded_channel();

        self.inner.lock().await.connections.insert(id, tx);
        (id, rx)
    }

    /// Returns false if the connection is unknown or already in the room.
    pub async fn join(&self, connection: ConnectionId, room: RoomId) -> bool {
        let mut inner = self.inner.lock().await;
        if !inner.connections.contains_key(&connection) {
            return false;
        }
        inner.rooms.entry(room).or_default().insert(connection)
    }

    /// Sends `event` to every member of `room`, returning how many took it.
    pub async fn broadcast(&self, room: &RoomId, event: &ServerEvent) -> usize {
        let inner = self.inner.lock().await;
        let Some(members) = inner.rooms.get(room) else {
            return 0;
        };

        members
            .iter()
            .filter_map(|id| inner.connections.get(id))
            .filter(|tx| tx.send(event.clone()).is_ok())
            .count()
    }

    pub async fn disconnect(&self, connection: ConnectionId) {
        let mut inner = self.inner.lock().await;
        inner.connections.remove(&connection);
        inner.rooms.retain(|_, members| {
            members.remove(&connection);
            !members.is_empty()
        });
    }

    #[cfg(test)]
    pub(crate) async fn members(&self, room: &RoomId) -> usize {
        self.inner.lock().await.rooms.get(room).map_or(0, HashSet::len)
    }
}
