//! Error types
//!
//! Membership and broadcast operations never fail. The only fallible surface
//! is registering sockets in the bundled [`SocketMap`](crate::SocketMap).

use crate::registry::SocketId;

/// Error type for socket directory operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    /// A live socket is already registered under this id
    AlreadyConnected(SocketId),
}

impl std::fmt::Display for DirectoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DirectoryError::AlreadyConnected(id) => {
                write!(f, "Socket already connected: {}", id)
            }
        }
    }
}

impl std::error::Error for DirectoryError {}
