//! Room membership and broadcast fan-out
//!
//! `rooms-rs` tracks which connected sockets belong to which named rooms and
//! delivers packets to the right subset of them. Connections themselves are
//! owned by the host: the registry only looks sockets up through a
//! [`ConnectionDirectory`] when it broadcasts.
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use rooms_rs::{BroadcastOptions, ChannelSocket, MembershipRegistry, Packet, SocketMap};
//!
//! # async fn run() -> Result<(), rooms_rs::DirectoryError> {
//! let sockets = Arc::new(SocketMap::new());
//! let registry = MembershipRegistry::new(Arc::clone(&sockets));
//!
//! let (socket, mut rx) = ChannelSocket::pair();
//! sockets.insert("a", socket)?;
//! registry.join("a", "lobby").await;
//!
//! registry
//!     .broadcast(Packet::from_static(b"hello"), &BroadcastOptions::to_room("lobby"))
//!     .await;
//! assert!(rx.recv().await.is_some());
//! # Ok(())
//! # }
//! ```

pub mod directory;
pub mod error;
pub mod registry;

pub use directory::{ChannelSocket, ConnectionDirectory, Delivery, SocketHandle, SocketMap};
pub use error::DirectoryError;
pub use registry::{
    BroadcastOptions, MembershipRegistry, Packet, PacketFlags, RegistryConfig, RegistryEvent,
    RegistryStats, Room, SocketId,
};
