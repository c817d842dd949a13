mod config;
mod script;

use bytes::BytesMut;
use config::BotConfig;
use mc_bot_entities::{EntityEvent, EntityTracker, WorldView};
use mc_bot_proto::codec::ProtoEncode;
use mc_bot_proto::packets::ClientboundPacket;
use script::{Command, Script};
use tokio::io::AsyncBufReadExt;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Work for the task that owns the tracker.
#[derive(Debug)]
enum Input {
    Packet(ClientboundPacket),
    Command(Command),
}

fn log_event(event: &EntityEvent, world: &WorldView<'_>) {
    match event {
        EntityEvent::EntitySpawn(id) => {
            if let Some(e) = world.entity(*id) {
                let label = e.username.as_deref().or(e.name.as_deref()).unwrap_or("-");
                info!(
                    entity = id,
                    kind = e.kind.as_str(),
                    position = %e.position,
                    "entitySpawn {label}"
                );
            }
        }
        EntityEvent::EntityGone(e) => {
            info!(entity = e.id, kind = e.kind.as_str(), "entityGone");
        }
        EntityEvent::PlayerJoined(name) | EntityEvent::PlayerUpdated(name) => {
            let ping = world.player(name).map(|p| p.ping);
            info!(player = %name, ?ping, "{}", event.name());
        }
        EntityEvent::PlayerLeft(player) => {
            info!(player = %player.username, "playerLeft");
        }
        EntityEvent::Error(err) => warn!("interaction failed: {err}"),
        other => debug!("{} {other:?}", other.name()),
    }
}

/// Feed the capture (and any due commands) to the tracker task. Returns the number of
/// packets sent.
async fn replay_capture(
    path: &str,
    mut script: Script,
    tx: mpsc::Sender<Input>,
) -> Result<usize, Box<dyn std::error::Error>> {
    let file = tokio::fs::File::open(path).await?;
    let mut lines = tokio::io::BufReader::new(file).lines();
    let mut applied = 0;
    let mut line_no = 0;

    for command in script.take_due(applied) {
        tx.send(Input::Command(command)).await?;
    }
    while let Some(line) = lines.next_line().await? {
        line_no += 1;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<ClientboundPacket>(line) {
            Ok(packet) => {
                tx.send(Input::Packet(packet)).await?;
                applied += 1;
                for command in script.take_due(applied) {
                    tx.send(Input::Command(command)).await?;
                }
            }
            Err(e) => warn!(line = line_no, "skipping capture line: {e}"),
        }
    }
    for command in script.take_rest() {
        tx.send(Input::Command(command)).await?;
    }
    Ok(applied)
}

#[tokio::main]
async fn main() {
    let path = std::env::args().nth(1).unwrap_or_else(|| "bot.toml".into());
    let config = match BotConfig::load(&path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load {path}: {e}");
            std::process::exit(1);
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    let features = match config.feature_set() {
        Ok(f) => f,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    let script = match &config.replay.commands {
        Some(commands) => {
            let parsed = tokio::fs::read_to_string(commands)
                .await
                .map_err(|e| e.to_string())
                .and_then(|text| text.parse::<Script>().map_err(|e| e.to_string()));
            match parsed {
                Ok(s) => s,
                Err(e) => {
                    eprintln!("Failed to load {commands}: {e}");
                    std::process::exit(1);
                }
            }
        }
        None => Script::default(),
    };

    info!(
        "mc-bot v{} replaying {} as {} (version {})",
        env!("CARGO_PKG_VERSION"),
        config.replay.capture,
        config.bot.username,
        config.bot.version
    );
    info!("Features: {}", features.iter().collect::<Vec<_>>().join(", "));
    if !script.is_empty() {
        info!("Scripted commands: {}", script.len());
    }

    let mut tracker = EntityTracker::new(config.bot.username.clone(), &features);
    tracker.subscribe_fn(log_event);

    // Single writer: only this task touches the tracker.
    let (tx, mut rx) = mpsc::channel::<Input>(256);
    let worker = tokio::spawn(async move {
        while let Some(input) = rx.recv().await {
            match input {
                Input::Packet(packet) => tracker.handle(&packet),
                Input::Command(command) => {
                    if let Err(e) = command.apply(&mut tracker) {
                        debug!("{command:?}: {e}");
                    }
                }
            }
            for packet in tracker.drain_outgoing() {
                let mut body = BytesMut::new();
                packet.proto_encode(&mut body);
                info!(packet = packet.name(), bytes = body.len(), "outgoing {packet:?}");
            }
        }
        tracker
    });

    tokio::select! {
        result = replay_capture(&config.replay.capture, script, tx) => match result {
            Ok(count) => info!("Replayed {count} packets"),
            Err(e) => warn!("Replay stopped: {e}"),
        },
        _ = tokio::signal::ctrl_c() => info!("Shutdown signal received"),
    }

    match worker.await {
        Ok(tracker) => {
            info!(
                entities = tracker.entities().len(),
                players = tracker.players().len(),
                "Replay finished"
            );
            if let Some(me) = tracker.local_entity() {
                info!(entity = me.id, position = %me.position, "Local entity");
            }
            for player in tracker.players().iter() {
                info!(
                    player = %player.username,
                    ping = player.ping,
                    gamemode = player.gamemode,
                    entity = ?player.entity,
                    "{}",
                    player.display_name
                );
            }
        }
        Err(e) => warn!("Tracker task failed: {e}"),
    }
}
