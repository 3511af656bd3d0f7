//! Membership registry implementation
//!
//! The central registry that tracks room membership for one namespace and
//! fans packets out to the selected sockets.

use std::collections::HashSet;

use tokio::sync::{broadcast, RwLock};

use super::config::RegistryConfig;
use super::event::RegistryEvent;
use super::index::MembershipIndex;
use super::packet::{BroadcastOptions, Packet};
use super::{Room, SocketId};
use crate::directory::{ConnectionDirectory, SocketHandle};

/// Membership counters for a registry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegistryStats {
    /// Number of non-empty rooms
    pub rooms: usize,
    /// Number of sockets with a membership entry
    pub sockets: usize,
    /// Total (socket, room) pairs
    pub memberships: usize,
}

/// Room membership registry for one namespace
///
/// Both indexes sit behind a single `RwLock`: joins and leaves take the write
/// lock, broadcasts and queries hold the read lock for their whole traversal.
/// Share it between tasks as `Arc<MembershipRegistry<D>>`.
pub struct MembershipRegistry<D> {
    /// Room and socket indexes
    index: RwLock<MembershipIndex>,

    /// Live connections, consulted during broadcast
    directory: D,

    /// Membership event fan-out (None when events are disabled)
    events: Option<broadcast::Sender<RegistryEvent>>,

    /// Configuration
    config: RegistryConfig,
}

impl<D: ConnectionDirectory> MembershipRegistry<D> {
    /// Create a new registry with default configuration
    pub fn new(directory: D) -> Self {
        Self::with_config(directory, RegistryConfig::default())
    }

    /// Create a new registry with custom configuration
    pub fn with_config(directory: D, config: RegistryConfig) -> Self {
        let events = config
            .events_enabled
            .then(|| broadcast::channel(config.event_capacity.max(1)).0);

        Self {
            index: RwLock::new(MembershipIndex::new()),
            directory,
            events,
            config,
        }
    }

    /// Get the registry configuration
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Get the connection directory
    pub fn directory(&self) -> &D {
        &self.directory
    }

    /// Add a socket to a room
    ///
    /// The room is created if it does not exist. Joining a room twice is a
    /// no-op.
    pub async fn join(&self, id: &str, room: &str) {
        let mut changes = Vec::new();
        let mut index = self.index.write().await;
        index.join(id, room, &mut changes);
        self.publish(changes);
        drop(index);
    }

    /// Remove a socket from a room
    ///
    /// The room is deleted once its last member leaves. Leaving a room that
    /// was not joined is a no-op.
    pub async fn leave(&self, id: &str, room: &str) {
        let mut changes = Vec::new();
        let mut index = self.index.write().await;
        index.leave(id, room, &mut changes);
        self.publish(changes);
        drop(index);
    }

    /// Remove a socket from every room and forget it
    ///
    /// Called when a socket disconnects.
    pub async fn leave_all(&self, id: &str) {
        let mut changes = Vec::new();
        let mut index = self.index.write().await;
        index.leave_all(id, &mut changes);

        let rooms_left = changes
            .iter()
            .filter(|e| matches!(e, RegistryEvent::Left { .. }))
            .count();
        tracing::debug!(socket = %id, rooms_left = rooms_left, "Socket left all rooms");

        self.publish(changes);
        drop(index);
    }

    /// Broadcast a packet to the sockets selected by `opts`
    ///
    /// With target rooms, each socket in any of them receives the packet at
    /// most once. Without, every socket known to the registry receives it.
    /// Sockets in `opts.except` and sockets the directory no longer knows are
    /// skipped.
    ///
    /// Returns the number of sockets the packet was handed to.
    pub async fn broadcast(&self, packet: Packet, opts: &BroadcastOptions) -> usize {
        let index = self.index.read().await;

        if opts.is_global() {
            let mut delivered = 0;
            for id in index.sockets() {
                if opts.except.contains(id) {
                    continue;
                }
                if self.deliver_to(id, &packet, opts) {
                    delivered += 1;
                }
            }

            tracing::trace!(delivered = delivered, "Broadcast to all sockets");
            return delivered;
        }

        let mut delivered: HashSet<&SocketId> = HashSet::new();
        for room in &opts.rooms {
            let Some(members) = index.members(room) else {
                continue;
            };

            for id in members {
                if delivered.contains(id) || opts.except.contains(id) {
                    continue;
                }
                if self.deliver_to(id, &packet, opts) {
                    delivered.insert(id);
                }
            }
        }

        tracing::trace!(
            rooms = ?opts.rooms,
            delivered = delivered.len(),
            "Broadcast to rooms"
        );
        delivered.len()
    }

    /// Resolve one socket and hand it the packet
    fn deliver_to(&self, id: &str, packet: &Packet, opts: &BroadcastOptions) -> bool {
        match self.directory.lookup(id) {
            Some(handle) => {
                handle.deliver(packet, &opts.flags);
                true
            }
            None => {
                // Disconnected but memberships not cleaned up yet
                tracing::trace!(socket = %id, "Skipping socket with no live connection");
                false
            }
        }
    }

    /// Subscribe to membership events
    ///
    /// When events are disabled the returned receiver is already closed.
    pub fn subscribe(&self) -> broadcast::Receiver<RegistryEvent> {
        match &self.events {
            Some(tx) => tx.subscribe(),
            None => broadcast::channel(1).1,
        }
    }

    /// Send change records to subscribers
    ///
    /// Callers hold the index write lock so events go out in mutation order.
    fn publish(&self, changes: Vec<RegistryEvent>) {
        for event in changes {
            match &event {
                RegistryEvent::RoomCreated(room) => {
                    tracing::debug!(room = %room, "Room created");
                }
                RegistryEvent::RoomDeleted(room) => {
                    tracing::debug!(room = %room, "Room deleted");
                }
                RegistryEvent::Joined { socket, room } => {
                    tracing::trace!(socket = %socket, room = %room, "Socket joined room");
                }
                RegistryEvent::Left { socket, room } => {
                    tracing::trace!(socket = %socket, room = %room, "Socket left room");
                }
            }

            if let Some(tx) = &self.events {
                // No subscribers is fine
                let _ = tx.send(event);
            }
        }
    }

    /// Rooms a socket has joined
    ///
    /// `None` if the socket is unknown; an empty set if it left every room
    /// without disconnecting.
    pub async fn rooms_of(&self, id: &str) -> Option<HashSet<Room>> {
        self.index.read().await.rooms_of(id).cloned()
    }

    /// Members of a room (empty if the room does not exist)
    pub async fn members(&self, room: &str) -> HashSet<SocketId> {
        self.index
            .read()
            .await
            .members(room)
            .cloned()
            .unwrap_or_default()
    }

    /// Check if a room exists
    pub async fn has_room(&self, room: &str) -> bool {
        self.index.read().await.members(room).is_some()
    }

    /// Get total number of rooms
    pub async fn room_count(&self) -> usize {
        self.index.read().await.room_count()
    }

    /// Get total number of sockets with a membership entry
    pub async fn socket_count(&self) -> usize {
        self.index.read().await.socket_count()
    }

    /// Get membership statistics
    pub async fn stats(&self) -> RegistryStats {
        let index = self.index.read().await;
        RegistryStats {
            rooms: index.room_count(),
            sockets: index.socket_count(),
            memberships: index.membership_count(),
        }
    }
}
