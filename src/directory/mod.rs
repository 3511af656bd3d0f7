//! Connection directory contracts
//!
//! The registry never owns connections. During a broadcast it resolves each
//! target id through a [`ConnectionDirectory`] and hands the packet to the
//! returned [`SocketHandle`]. A lookup that finds nothing means the socket
//! went away before its memberships were cleaned up, and is skipped.
//!
//! [`SocketMap`] and [`ChannelSocket`] are ready-made implementations for
//! hosts that keep their sockets as mpsc senders.

pub mod socket_map;

use std::sync::Arc;

use crate::registry::{Packet, PacketFlags};

pub use socket_map::{ChannelSocket, Delivery, SocketMap};

/// A live connection that can be handed packets
///
/// Delivery is fire-and-forget: implementations must not block, and any
/// failure is theirs to handle.
pub trait SocketHandle: Send + Sync {
    /// Queue a packet for this socket
    fn deliver(&self, packet: &Packet, flags: &PacketFlags);
}

impl<T: SocketHandle + ?Sized> SocketHandle for Arc<T> {
    fn deliver(&self, packet: &Packet, flags: &PacketFlags) {
        (**self).deliver(packet, flags)
    }
}

/// Lookup of socket id to live handle
pub trait ConnectionDirectory: Send + Sync {
    /// Handle type returned by lookups
    type Handle: SocketHandle;

    /// Resolve a socket id, returning `None` if it has no live connection
    fn lookup(&self, id: &str) -> Option<Self::Handle>;
}

impl<D: ConnectionDirectory + ?Sized> ConnectionDirectory for Arc<D> {
    type Handle = D::Handle;

    fn lookup(&self, id: &str) -> Option<Self::Handle> {
        (**self).lookup(id)
    }
}
