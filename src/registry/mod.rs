//! Room membership registry
//!
//! The registry tracks which sockets are in which rooms and fans packets out
//! to them. Connections are not owned here: during a broadcast each target id
//! is resolved through the host's [`ConnectionDirectory`].
//!
//! # Architecture
//!
//! ```text
//!                     Arc<MembershipRegistry>
//!                ┌──────────────────────────────┐
//!                │ RwLock<MembershipIndex {     │
//!                │   rooms: room -> {socket},   │
//!                │   sids:  socket -> {room},   │
//!                │ }>                           │
//!                └──────────────┬───────────────┘
//!                               │
//!      join / leave / leave_all │ broadcast(packet, opts)
//!                               ▼
//!                     ConnectionDirectory::lookup(id)
//!                               │
//!              ┌────────────────┼────────────────┐
//!              ▼                ▼                ▼
//!        SocketHandle     SocketHandle         (gone: skip)
//!         deliver()        deliver()
//! ```
//!
//! Both indexes share one lock so they are never observed out of sync.
//! Packets wrap `bytes::Bytes`, so every target shares a single allocation.
//!
//! [`ConnectionDirectory`]: crate::directory::ConnectionDirectory

pub mod config;
pub mod event;
mod index;
pub mod packet;
pub mod store;

pub use config::RegistryConfig;
pub use event::RegistryEvent;
pub use packet::{BroadcastOptions, Packet, PacketFlags};
pub use store::{MembershipRegistry, RegistryStats};

/// Opaque identifier of one connected socket
pub type SocketId = String;

/// Opaque room name
pub type Room = String;
