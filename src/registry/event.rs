//! Membership events
//!
//! Observers subscribe through [`MembershipRegistry::subscribe`] and receive
//! these after each mutation has been applied.
//!
//! [`MembershipRegistry::subscribe`]: super::MembershipRegistry::subscribe

use super::{Room, SocketId};

/// A change to room membership
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryEvent {
    /// A room gained its first member
    RoomCreated(Room),
    /// A room lost its last member and was removed
    RoomDeleted(Room),
    /// A socket joined a room it was not in
    Joined { socket: SocketId, room: Room },
    /// A socket left a room it was in
    Left { socket: SocketId, room: Room },
}

impl std::fmt::Display for RegistryEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryEvent::RoomCreated(room) => write!(f, "room created: {}", room),
            RegistryEvent::RoomDeleted(room) => write!(f, "room deleted: {}", room),
            RegistryEvent::Joined { socket, room } => write!(f, "{} joined {}", socket, room),
            RegistryEvent::Left { socket, room } => write!(f, "{} left {}", socket, room),
        }
    }
}
