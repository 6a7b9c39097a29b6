//! Two nodes exchanging messages over the in-memory mesh.
//!
//! Run with: cargo run --example chat

use bytes::Bytes;
use gossamer::{ChannelEvent, ChannelId, GossipNetwork, Node, NodeConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let network = GossipNetwork::new();
    let (endpoint_alice, mut inbox_alice) = network.create_endpoint().await;
    let (endpoint_bob, mut inbox_bob) = network.create_endpoint().await;

    let channel = ChannelId::from("lobby");
    let mut alice = Node::new(endpoint_alice, NodeConfig::default());
    let mut bob = Node::new(endpoint_bob, NodeConfig::default());
    alice.join_channel(channel.clone());
    bob.join_channel(channel.clone());

    alice.send(&channel, Bytes::from_static(b"hi bob")).await?;
    alice
        .send(&channel, Bytes::from_static(b"are you there?"))
        .await?;
    for payload in inbox_bob.drain() {
        bob.handle_wire(&payload)?;
    }

    bob.send(&channel, Bytes::from_static(b"hi alice")).await?;
    for payload in inbox_alice.drain() {
        alice.handle_wire(&payload)?;
    }

    for (channel_id, event) in alice.take_events() {
        if let ChannelEvent::MessageAcknowledged(id) = event {
            println!("[alice] {channel_id}: {id} acknowledged");
        }
    }

    let log = alice.channel(&channel).unwrap().local_log();
    println!("[alice] log:");
    for entry in log.entries() {
        println!("  {} @ {}", entry.message_id, entry.timestamp);
    }
    Ok(())
}
