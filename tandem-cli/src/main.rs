use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use std::sync::Arc;
use std::time::Duration;
use tandem_core::{Candidate, SdpKind};
use tandem_signaling::{
    HttpRelayFetcher, MemoryRoomStore, RelayCredentialFetcher, SessionEvent, SessionEvents,
    SignalingConfig, SignalingSession,
};
use tokio::time::timeout;
use tracing_subscriber::EnvFilter;

/// How long both peers must stay silent before the demo considers the exchange finished.
const DEMO_IDLE: Duration = Duration::from_millis(500);

#[derive(Parser)]
#[command(name = "tandem")]
#[command(about = "Room-based WebRTC signaling tools")]
struct Cli {
    /// Print debug logs from the signaling layer
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch STUN/TURN servers from a credential endpoint
    Relays {
        /// Credential endpoint; falls back to TANDEM_RELAY_URL
        #[arg(long)]
        url: Option<String>,
    },
    /// Run two in-process peers through a full offer/answer exchange
    Demo {
        #[arg(long, default_value = "demo-room")]
        room: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let fallback = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)),
        )
        .init();

    let config = SignalingConfig::from_env();

    match cli.command {
        Commands::Relays { url } => run_relays(url, config).await,
        Commands::Demo { room } => run_demo(room, config).await,
    }
}

async fn run_relays(url: Option<String>, config: SignalingConfig) -> Result<()> {
    let url = url
        .or_else(|| config.relay_credentials_url.clone())
        .context("No credential endpoint given. Pass --url or set TANDEM_RELAY_URL")?;

    println!("{} {}", "🔑 Fetching relay servers from".cyan(), url);

    let fetcher = HttpRelayFetcher::new(&config).context("Failed to build HTTP client")?;
    let servers = fetcher
        .fetch(&url)
        .await
        .with_context(|| format!("Credential request to {} failed", url))?;

    if servers.is_empty() {
        println!("{}", "No relay servers returned".yellow());
        return Ok(());
    }

    for server in &servers {
        println!("  {} {}", "•".green(), server.url.bold());
        if !server.username.is_empty() {
            println!("      username:   {}", server.username);
            println!("      credential: {}", server.credential.dimmed());
        }
    }
    println!("{}", format!("✨ {} relay servers", servers.len()).green().bold());
    Ok(())
}

async fn run_demo(room: String, config: SignalingConfig) -> Result<()> {
    println!("{} {}", "🚀 Starting signaling demo in room".green().bold(), room);

    let store = Arc::new(MemoryRoomStore::new());
    let fetcher: Arc<dyn RelayCredentialFetcher> =
        Arc::new(HttpRelayFetcher::new(&config).context("Failed to build HTTP client")?);

    let (alice, mut alice_events) =
        SignalingSession::new(store.clone(), fetcher.clone(), config.clone());
    let (bob, mut bob_events) = SignalingSession::new(store.clone(), fetcher, config);

    let outcome = exchange(
        &room,
        (&alice, &mut alice_events),
        (&bob, &mut bob_events),
    )
    .await;

    // Both leave even when the exchange failed half way.
    alice.disconnect_from_room().await;
    bob.disconnect_from_room().await;
    outcome?;

    println!("{}", "✨ Demo finished, both peers left the room".green().bold());
    Ok(())
}

async fn exchange(
    room: &str,
    (alice, alice_events): (&SignalingSession, &mut SessionEvents),
    (bob, bob_events): (&SignalingSession, &mut SessionEvents),
) -> Result<()> {
    alice.connect_to_room(room, false).await?;
    wait_connected("alice", alice_events).await?;

    bob.connect_to_room(room, false).await?;
    wait_connected("bob", bob_events).await?;

    alice.send_offer_description("v=0 alice-offer").await?;
    alice
        .send_local_candidate(Candidate::new(0, "audio", "candidate:1 1 udp 2122260223 10.0.0.1 50000 typ host"))
        .await?;

    // The idle timer restarts after every event, so this ends once both peers are quiet.
    loop {
        tokio::select! {
            Some(event) = alice_events.recv() => print_event("alice", &event),
            Some(event) = bob_events.recv() => {
                print_event("bob", &event);

                if let SessionEvent::RemoteDescriptionReceived { description, .. } = &event {
                    if description.kind == SdpKind::Offer {
                        bob.send_answer_description("v=0 bob-answer").await?;
                        bob.send_local_candidate(Candidate::new(
                            0,
                            "audio",
                            "candidate:1 1 udp 2122260223 10.0.0.2 50001 typ host",
                        ))
                        .await?;
                    }
                }
            }
            _ = tokio::time::sleep(DEMO_IDLE) => break,
        }
    }

    Ok(())
}

async fn wait_connected(name: &str, events: &mut SessionEvents) -> Result<()> {
    loop {
        let event = timeout(Duration::from_secs(5), events.recv())
            .await
            .with_context(|| format!("{} timed out joining the room", name))?
            .with_context(|| format!("{} event channel closed", name))?;

        print_event(name, &event);
        if matches!(event, SessionEvent::RoomConnected { .. }) {
            return Ok(());
        }
    }
}

fn print_event(name: &str, event: &SessionEvent) {
    let who = format!("[{}]", name).bold();
    match event {
        SessionEvent::RoomConnected {
            role,
            relay_servers,
        } => println!(
            "{} {} as {} ({} relay servers)",
            who,
            "joined".green(),
            role.to_string().bold(),
            relay_servers.len()
        ),
        SessionEvent::RemoteDescriptionReceived { from, description } => println!(
            "{} {} {} from {}: {}",
            who,
            "received".cyan(),
            description.kind,
            from,
            description.content
        ),
        SessionEvent::RemoteCandidateReceived { from, candidate } => println!(
            "{} {} candidate from {}: {}",
            who,
            "received".cyan(),
            from,
            candidate.content
        ),
        SessionEvent::StoreDeliveryFailed(e) => {
            println!("{} {} {}", who, "store error:".red(), e)
        }
    }
}
