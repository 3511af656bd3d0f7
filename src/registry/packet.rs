//! Packet and broadcast option types
//!
//! This module defines the payload handed to every target socket and the
//! options that select those targets.

use std::collections::HashSet;

use bytes::Bytes;

use super::{Room, SocketId};

/// An already-encoded packet to be delivered to sockets
///
/// Cheap to clone: every target shares the same `Bytes` allocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    /// Encoded packet data (zero-copy via reference counting)
    pub data: Bytes,
}

impl Packet {
    /// Create a packet from encoded bytes
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self { data: data.into() }
    }

    /// Create a packet from static data
    pub fn from_static(data: &'static [u8]) -> Self {
        Self {
            data: Bytes::from_static(data),
        }
    }

    /// Length of the encoded data in bytes
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the packet carries no data
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Delivery hints passed through to each socket handle unchanged
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PacketFlags {
    /// Packet may be dropped if the socket is not ready to write
    pub volatile: bool,
    /// Transport should compress the packet if it can
    pub compress: bool,
}

/// Target selection for a broadcast
///
/// With no rooms the packet goes to every socket known to the registry.
#[derive(Debug, Clone, Default)]
pub struct BroadcastOptions {
    /// Rooms to broadcast to, in order (empty = all sockets)
    pub rooms: Vec<Room>,
    /// Socket ids that never receive the packet
    pub except: HashSet<SocketId>,
    /// Flags for this packet
    pub flags: PacketFlags,
}

impl BroadcastOptions {
    /// Broadcast to every socket
    pub fn all() -> Self {
        Self::default()
    }

    /// Broadcast to a single room
    pub fn to_room(room: impl Into<Room>) -> Self {
        Self::default().room(room)
    }

    /// Add a target room
    pub fn room(mut self, room: impl Into<Room>) -> Self {
        self.rooms.push(room.into());
        self
    }

    /// Add several target rooms
    pub fn rooms<I, R>(mut self, rooms: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<Room>,
    {
        self.rooms.extend(rooms.into_iter().map(Into::into));
        self
    }

    /// Exclude a socket
    pub fn except(mut self, id: impl Into<SocketId>) -> Self {
        self.except.insert(id.into());
        self
    }

    /// Mark the packet as volatile
    pub fn volatile(mut self) -> Self {
        self.flags.volatile = true;
        self
    }

    /// Ask the transport to compress the packet
    pub fn compress(mut self, compress: bool) -> Self {
        self.flags.compress = compress;
        self
    }

    /// Whether this broadcast targets every socket
    pub fn is_global(&self) -> bool {
        self.rooms.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packet_shares_data() {
        let packet = Packet::from_static(b"hello");
        let clone = packet.clone();

        assert_eq!(packet.len(), 5);
        assert_eq!(packet.data.as_ptr(), clone.data.as_ptr());
    }

    #[test]
    fn test_options_default_is_global() {
        let opts = BroadcastOptions::all();

        assert!(opts.is_global());
        assert!(opts.except.is_empty());
        assert_eq!(opts.flags, PacketFlags::default());
    }

    #[test]
    fn test_options_builder_chaining() {
        let opts = BroadcastOptions::to_room("x")
            .rooms(["y", "z"])
            .except("a")
            .except("b")
            .volatile()
            .compress(true);

        assert_eq!(opts.rooms, vec!["x", "y", "z"]);
        assert!(opts.except.contains("a"));
        assert!(opts.except.contains("b"));
        assert!(opts.flags.volatile);
        assert!(opts.flags.compress);
        assert!(!opts.is_global());
    }
}
