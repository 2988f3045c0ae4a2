use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use futures::{sink::SinkExt, stream::StreamExt};
use godcell_core::{join_player, leave_player, spawner, GameConfig, SystemRunner, Tag, World};
use godcell_net::{Broadcaster, ClientIntent, GameEvent};
use serde::Deserialize;
use std::{
    net::SocketAddr,
    sync::{Arc, Mutex},
    time::Duration,
};
use tokio::sync::broadcast;
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

/// Maximum inbound frame size. Intents are tiny.
const MAX_MESSAGE_SIZE: usize = 16 * 1024;

/// One serialized event on the fan-out channel. `target` is set for
/// events addressed to a single socket.
#[derive(Debug, Clone)]
struct Outbound {
    target: Option<Arc<str>>,
    payload: Arc<str>,
}

impl Outbound {
    fn is_for(&self, socket_id: &str) -> bool {
        self.target.as_deref().map_or(true, |t| t == socket_id)
    }
}

/// Realizes the core's outbound capability on top of a tokio broadcast
/// channel. Sending with no subscribers is not an error.
struct ChannelBroadcaster<'a> {
    tx: &'a broadcast::Sender<Outbound>,
}

impl ChannelBroadcaster<'_> {
    fn send(&self, target: Option<&str>, event: &GameEvent) {
        match serde_json::to_string(event) {
            Ok(json) => {
                let _ = self.tx.send(Outbound {
                    target: target.map(Arc::from),
                    payload: Arc::from(json),
                });
            }
            Err(e) => tracing::error!("Failed to serialize {}: {}", event.name(), e),
        }
    }
}

impl Broadcaster for ChannelBroadcaster<'_> {
    fn broadcast(&mut self, event: GameEvent) {
        self.send(None, &event);
    }

    fn emit_to(&mut self, socket_id: &str, event: GameEvent) {
        self.send(Some(socket_id), &event);
    }
}

struct Game {
    world: World,
    runner: SystemRunner,
}

/// Server state shared by the tick loop and every connection.
struct AppState {
    tx: broadcast::Sender<Outbound>,
    game: Mutex<Game>,
}

impl AppState {
    /// Runs `f` against the game under the lock with a broadcaster bound to
    /// the fan-out channel.
    fn with_game<R>(&self, f: impl FnOnce(&mut Game, &mut ChannelBroadcaster<'_>) -> R) -> Option<R> {
        let mut broadcaster = ChannelBroadcaster { tx: &self.tx };
        match self.game.lock() {
            Ok(mut game) => Some(f(&mut game, &mut broadcaster)),
            Err(e) => {
                tracing::error!("Failed to lock game mutex: {}", e);
                None
            }
        }
    }
}

fn build_state(config: GameConfig, seed_content: bool) -> anyhow::Result<Arc<AppState>> {
    let (tx, _rx) = broadcast::channel::<Outbound>(1024);
    let mut world = World::new(config);
    if seed_content {
        spawner::seed_world(&mut world, &mut ChannelBroadcaster { tx: &tx })?;
    }
    Ok(Arc::new(AppState {
        tx,
        game: Mutex::new(Game {
            world,
            runner: SystemRunner::with_default_systems(),
        }),
    }))
}

fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/ws", get(websocket_handler))
        .route("/api/stats", get(get_stats))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "godcell_server=info,godcell_core=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config_path = std::env::var("GODCELL_CONFIG").unwrap_or_else(|_| "config.toml".into());
    let config = GameConfig::load_or_default(&config_path)?;
    let tick_rate = config.world.tick_rate.max(1);
    tracing::info!(fingerprint = %config.fingerprint(), tick_rate, "Loaded config from {}", config_path);

    let state = build_state(config, true)?;
    tokio::spawn(tick_loop(state.clone(), tick_rate));

    let addr = SocketAddr::from(([0, 0, 0, 0], 3000));
    tracing::info!("Godcell server listening on {}", addr);
    tracing::info!("    WebSocket: ws://{}/ws", addr);
    tracing::info!("    Stats API: http://{}/api/stats", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router(state)).await?;
    Ok(())
}

/// Fixed-rate simulation. A late tick still advances by the nominal step so
/// the simulation stays deterministic in tick count.
async fn tick_loop(state: Arc<AppState>, tick_rate: u32) {
    let dt = 1.0 / f64::from(tick_rate);
    let mut interval = tokio::time::interval(Duration::from_secs_f64(dt));
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    loop {
        interval.tick().await;
        state.with_game(|game, broadcaster| {
            let Game { world, runner } = game;
            runner.update(world, dt, broadcaster);
        });
    }
}

/// REST endpoint: Get server stats
async fn get_stats(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let stats = state.with_game(|game, _| {
        let metrics = &game.world.metrics;
        serde_json::json!({
            "tick": game.world.clock.tick,
            "entities": game.world.entity_count(),
            "players": game.world.count_tag(Tag::Player),
            "connected": game.world.connected_players(),
            "last_tick_us": metrics.last_tick_duration().as_micros() as u64,
            "peak_tick_us": metrics.peak_tick_duration().as_micros() as u64,
            "uptime_s": metrics.uptime().as_secs(),
            "counters": metrics.counters().into_iter().collect::<std::collections::BTreeMap<_, _>>(),
        })
    });
    Json(stats.unwrap_or_else(|| serde_json::json!({ "error": "game state unavailable" })))
}

#[derive(Debug, Deserialize)]
struct JoinParams {
    name: Option<String>,
}

async fn websocket_handler(
    ws: WebSocketUpgrade,
    Query(params): Query<JoinParams>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let name = params
        .name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| "cell".to_string());
    ws.on_upgrade(move |socket| websocket(socket, state, name))
}

async fn websocket(stream: WebSocket, state: Arc<AppState>, name: String) {
    let (mut sender, mut receiver) = stream.split();
    let socket_id = Uuid::new_v4().to_string();

    // Subscribe before joining so the client sees its own join event.
    let mut rx = state.tx.subscribe();
    let joined = state
        .with_game(|game, broadcaster| join_player(&mut game.world, broadcaster, &socket_id, &name))
        .and_then(|r| {
            r.map_err(|e| tracing::error!("Join failed for {}: {}", socket_id, e))
                .ok()
        });
    if joined.is_none() {
        return;
    }
    tracing::info!("Client connected: {} ({})", socket_id, name);

    let own_id = socket_id.clone();
    let send_task = tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(out) if out.is_for(&own_id) => {
                    if sender.send(Message::Text(out.payload.to_string())).await.is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!("Client {} lagged, skipped {} events", own_id, skipped);
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    while let Some(Ok(message)) = receiver.next().await {
        let Message::Text(text) = message else {
            continue;
        };
        if text.len() > MAX_MESSAGE_SIZE {
            tracing::warn!(
                "Client {} sent oversized message: {} bytes (max: {})",
                socket_id,
                text.len(),
                MAX_MESSAGE_SIZE
            );
            continue;
        }
        match serde_json::from_str::<ClientIntent>(&text) {
            Ok(intent) => {
                state.with_game(|game, _| game.world.intents.push_back((socket_id.clone(), intent)));
            }
            Err(e) => tracing::debug!("Client {} sent malformed intent: {}", socket_id, e),
        }
    }

    send_task.abort();
    state.with_game(|game, broadcaster| leave_player(&mut game.world, broadcaster, &socket_id));
    tracing::info!("Client disconnected: {}", socket_id);
}
