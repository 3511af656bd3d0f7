//! Chat rooms example
//!
//! Run with: cargo run --example chat_rooms
//!
//! Simulates a handful of connected sockets, each with its own writer task,
//! joining rooms and receiving broadcasts. Set `RUST_LOG=rooms_rs=trace` to
//! see every membership change and skipped delivery.

use std::sync::Arc;
use std::time::Duration;

use rooms_rs::{
    BroadcastOptions, ChannelSocket, MembershipRegistry, Packet, RegistryEvent, SocketMap,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("rooms_rs=debug".parse()?)
                .add_directive("chat_rooms=debug".parse()?),
        )
        .init();

    let sockets = Arc::new(SocketMap::new());
    let registry = Arc::new(MembershipRegistry::new(Arc::clone(&sockets)));

    // Log membership events as an observer
    let mut events = registry.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            match event {
                RegistryEvent::RoomCreated(_) | RegistryEvent::RoomDeleted(_) => {
                    tracing::info!(%event, "Room lifecycle");
                }
                _ => tracing::debug!(%event, "Membership"),
            }
        }
    });

    // Connect sockets, each with a writer task draining its channel
    for id in ["alice", "bob", "carol"] {
        let (socket, mut rx) = ChannelSocket::pair();
        sockets.insert(id, socket)?;

        tokio::spawn(async move {
            while let Some(delivery) = rx.recv().await {
                tracing::info!(
                    socket = id,
                    bytes = delivery.packet.len(),
                    volatile = delivery.flags.volatile,
                    "Writing packet: {}",
                    String::from_utf8_lossy(&delivery.packet.data)
                );
            }
        });
    }

    registry.join("alice", "general").await;
    registry.join("bob", "general").await;
    registry.join("bob", "random").await;
    registry.join("carol", "random").await;

    // bob is in both rooms but gets this once; alice is the sender
    let opts = BroadcastOptions::default()
        .rooms(["general", "random"])
        .except("alice");
    let n = registry
        .broadcast(Packet::from_static(b"hi from alice"), &opts)
        .await;
    tracing::info!(delivered = n, "Room broadcast");

    // carol disconnects; the host drops the socket, then cleans up rooms
    sockets.remove("carol");
    let n = registry
        .broadcast(Packet::from_static(b"announcement"), &BroadcastOptions::all().volatile())
        .await;
    tracing::info!(delivered = n, "Global broadcast before cleanup");
    registry.leave_all("carol").await;

    let stats = registry.stats().await;
    tracing::info!(
        rooms = stats.rooms,
        sockets = stats.sockets,
        memberships = stats.memberships,
        "Registry stats"
    );

    tokio::time::sleep(Duration::from_millis(50)).await;
    Ok(())
}
