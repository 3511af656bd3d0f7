//! Concurrent socket directory
//!
//! `SocketMap` keeps live sockets in a `DashMap` so the host can register
//! and drop connections from any task while broadcasts look them up.

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tokio::sync::mpsc;

use super::{ConnectionDirectory, SocketHandle};
use crate::error::DirectoryError;
use crate::registry::{Packet, PacketFlags, SocketId};

/// A packet queued for one socket, with its broadcast flags
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub packet: Packet,
    pub flags: PacketFlags,
}

/// Socket handle backed by an unbounded mpsc channel
///
/// The receiving half normally lives in the connection's writer task.
#[derive(Debug, Clone)]
pub struct ChannelSocket {
    tx: mpsc::UnboundedSender<Delivery>,
}

impl ChannelSocket {
    /// Wrap an existing sender
    pub fn new(tx: mpsc::UnboundedSender<Delivery>) -> Self {
        Self { tx }
    }

    /// Create a handle together with its receiving half
    pub fn pair() -> (Self, mpsc::UnboundedReceiver<Delivery>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Whether the receiving half has been dropped
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

impl SocketHandle for ChannelSocket {
    fn deliver(&self, packet: &Packet, flags: &PacketFlags) {
        let delivery = Delivery {
            packet: packet.clone(),
            flags: *flags,
        };

        // Writer task is gone; the host will remove the socket shortly.
        if self.tx.send(delivery).is_err() {
            tracing::trace!("Dropped packet for closed socket channel");
        }
    }
}

/// Directory of live sockets keyed by id
pub struct SocketMap<H = ChannelSocket> {
    sockets: DashMap<SocketId, Arc<H>>,
}

impl<H: SocketHandle> SocketMap<H> {
    /// Create an empty directory
    pub fn new() -> Self {
        Self {
            sockets: DashMap::new(),
        }
    }

    /// Register a live socket
    ///
    /// Fails if a socket with the same id is already registered.
    pub fn insert(&self, id: impl Into<SocketId>, handle: H) -> Result<(), DirectoryError> {
        match self.sockets.entry(id.into()) {
            Entry::Occupied(entry) => Err(DirectoryError::AlreadyConnected(entry.key().clone())),
            Entry::Vacant(entry) => {
                tracing::debug!(socket = %entry.key(), "Socket registered");
                entry.insert(Arc::new(handle));
                Ok(())
            }
        }
    }

    /// Remove a socket, returning its handle if it was registered
    pub fn remove(&self, id: &str) -> Option<Arc<H>> {
        let removed = self.sockets.remove(id).map(|(_, handle)| handle);
        if removed.is_some() {
            tracing::debug!(socket = %id, "Socket removed");
        }
        removed
    }

    /// Whether a socket is registered under `id`
    pub fn contains(&self, id: &str) -> bool {
        self.sockets.contains_key(id)
    }

    /// Number of registered sockets
    pub fn len(&self) -> usize {
        self.sockets.len()
    }

    /// Whether no sockets are registered
    pub fn is_empty(&self) -> bool {
        self.sockets.is_empty()
    }
}

impl<H: SocketHandle> Default for SocketMap<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: SocketHandle> ConnectionDirectory for SocketMap<H> {
    type Handle = Arc<H>;

    fn lookup(&self, id: &str) -> Option<Self::Handle> {
        self.sockets.get(id).map(|entry| Arc::clone(entry.value()))
    }
}
