//! Tab-list roster and its reconciliation against the entity registry.
//!
//! Players are keyed by username; a secondary UUID index is kept in lockstep. A player's
//! link to its entity is a plain id into the registry and never owns the entity.

use std::collections::HashMap;

use mc_bot_proto::packets::{PlayerInfo, PlayerInfoAction, PlayerInfoEntry};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::chat::ChatMessage;
use crate::entity::EntityId;
use crate::events::EntityEvent;
use crate::registry::EntityRegistry;

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub username: String,
    pub uuid: Uuid,
    /// Latency in milliseconds.
    pub ping: i32,
    pub gamemode: i32,
    pub display_name: ChatMessage,
    /// Linked entity, if the player is currently spawned in view.
    pub entity: Option<EntityId>,
}

impl Player {
    fn new(entry: &PlayerInfoEntry, username: &str) -> Self {
        Self {
            username: username.to_string(),
            uuid: entry.uuid,
            ping: entry.ping,
            gamemode: entry.gamemode,
            display_name: ChatMessage::plain(username),
            entity: None,
        }
    }

    /// Apply a raw display-name component; malformed components fall back to the plain
    /// username.
    fn apply_display_name(&mut self, raw: Option<&str>) {
        self.display_name = match raw.map(ChatMessage::from_json) {
            Some(Ok(name)) => name,
            Some(Err(e)) => {
                warn!(player = %self.username, "malformed display name: {e}");
                ChatMessage::plain(&self.username)
            }
            None => ChatMessage::plain(&self.username),
        };
    }
}

/// Registry state the roster reads while reconciling.
pub(crate) struct RosterContext<'a> {
    pub entities: &'a EntityRegistry,
    pub local_entity: Option<EntityId>,
}

#[derive(Debug, Default)]
pub struct PlayerRoster {
    players: HashMap<String, Player>,
    uuid_to_username: HashMap<Uuid, String>,
    local_player: Option<String>,
}

impl PlayerRoster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, username: &str) -> Option<&Player> {
        self.players.get(username)
    }

    pub fn get_mut(&mut self, username: &str) -> Option<&mut Player> {
        self.players.get_mut(username)
    }

    pub fn username_for(&self, uuid: &Uuid) -> Option<&str> {
        self.uuid_to_username.get(uuid).map(String::as_str)
    }

    pub fn by_uuid(&self, uuid: &Uuid) -> Option<&Player> {
        self.username_for(uuid).and_then(|name| self.players.get(name))
    }

    /// The roster entry whose entity is the local player, once known.
    pub fn local_player(&self) -> Option<&Player> {
        self.local_player.as_deref().and_then(|name| self.players.get(name))
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Player> {
        self.players.values()
    }

    fn insert(&mut self, player: Player) {
        // A username re-added under a new uuid retires the old uuid.
        if let Some(previous) = self.players.get(&player.username) {
            if previous.uuid != player.uuid {
                debug!(
                    player = %player.username,
                    old = %previous.uuid,
                    new = %player.uuid,
                    "uuid changed"
                );
                self.uuid_to_username.remove(&previous.uuid);
            }
        }
        self.uuid_to_username
            .insert(player.uuid, player.username.clone());
        self.players.insert(player.username.clone(), player);
    }

    fn remove(&mut self, uuid: &Uuid) -> Option<Player> {
        let username = self.uuid_to_username.remove(uuid)?;
        if self.players.get(&username).map(|p| p.uuid) != Some(*uuid) {
            return None;
        }
        if self.local_player.as_deref() == Some(username.as_str()) {
            self.local_player = None;
        }
        self.players.remove(&username)
    }

    /// Clear every link to `entity`. Returns the affected usernames.
    pub(crate) fn unlink_entity(&mut self, entity: EntityId) -> Vec<String> {
        let mut unlinked = Vec::new();
        for player in self.players.values_mut() {
            if player.entity == Some(entity) {
                player.entity = None;
                unlinked.push(player.username.clone());
            }
        }
        unlinked
    }

    /// Link `username` to `entity` unless the player is already linked.
    pub(crate) fn link_if_unlinked(&mut self, username: &str, entity: EntityId) -> bool {
        match self.players.get_mut(username) {
            Some(player) if player.entity.is_none() => {
                player.entity = Some(entity);
                true
            }
            _ => false,
        }
    }

    /// Apply one `player_info` packet. Entries are processed in order and independently;
    /// an entry that cannot be applied is skipped without affecting the rest.
    pub(crate) fn apply_player_info(
        &mut self,
        packet: &PlayerInfo,
        ctx: &RosterContext<'_>,
        events: &mut Vec<EntityEvent>,
    ) {
        let Some(action) = packet.action() else {
            debug!(action = packet.action, "ignoring unknown player_info action");
            return;
        };
        for entry in &packet.data {
            match action {
                PlayerInfoAction::Add => self.add(entry, ctx, events),
                _ => self.update(action, entry, ctx, events),
            }
        }
    }

    fn add(&mut self, entry: &PlayerInfoEntry, ctx: &RosterContext<'_>, events: &mut Vec<EntityEvent>) {
        let existing = self.username_for(&entry.uuid).map(str::to_string);
        let (username, is_new) = match existing {
            Some(username) => (username, false),
            None => {
                let Some(name) = entry.name.as_deref() else {
                    debug!(uuid = %entry.uuid, "player_info add without a name");
                    return;
                };
                self.insert(Player::new(entry, name));
                events.push(EntityEvent::PlayerJoined(name.to_string()));
                (name.to_string(), true)
            }
        };

        let linked = find_player_entity(ctx.entities, &username);
        let Some(player) = self.players.get_mut(&username) else {
            return;
        };
        if !is_new {
            player.gamemode = entry.gamemode;
            player.ping = entry.ping;
        }
        if let Some(raw) = entry.display_name.as_deref() {
            player.apply_display_name(Some(raw));
        }
        player.entity = linked;

        if linked.is_some() && linked == ctx.local_entity {
            self.local_player = Some(username.clone());
        }
        if !is_new {
            events.push(EntityEvent::PlayerUpdated(username));
        }
    }

    fn update(
        &mut self,
        action: PlayerInfoAction,
        entry: &PlayerInfoEntry,
        ctx: &RosterContext<'_>,
        events: &mut Vec<EntityEvent>,
    ) {
        let Some(username) = self.username_for(&entry.uuid).map(str::to_string) else {
            debug!(uuid = %entry.uuid, ?action, "player_info for unknown player");
            return;
        };
        let Some(player) = self.players.get_mut(&username) else {
            return;
        };

        match action {
            PlayerInfoAction::UpdateGamemode => player.gamemode = entry.gamemode,
            PlayerInfoAction::UpdatePing => player.ping = entry.ping,
            PlayerInfoAction::UpdateDisplayName => {
                player.apply_display_name(entry.display_name.as_deref())
            }
            PlayerInfoAction::Remove => {
                if player.entity.is_some() && player.entity == ctx.local_entity {
                    debug!(player = %username, "ignoring removal of the local player");
                    return;
                }
                if let Some(mut removed) = self.remove(&entry.uuid) {
                    removed.entity = None;
                    events.push(EntityEvent::PlayerLeft(Box::new(removed)));
                }
                return;
            }
            PlayerInfoAction::Add => return,
        }
        events.push(EntityEvent::PlayerUpdated(username));
    }
}

/// Lowest-id player entity whose username is exactly `username`.
fn find_player_entity(entities: &EntityRegistry, username: &str) -> Option<EntityId> {
    entities
        .iter()
        .filter(|e| e.is_player() && e.username.as_deref() == Some(username))
        .map(|e| e.id)
        .min()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mc_bot_proto::packets::EntityKind;

    fn uuid(n: u128) -> Uuid {
        Uuid::from_u128(n)
    }

    fn entry(n: u128, name: &str) -> PlayerInfoEntry {
        PlayerInfoEntry {
            uuid: uuid(n),
            name: Some(name.to_string()),
            ping: 10,
            gamemode: 0,
            display_name: None,
        }
    }

    fn packet(action: i32, data: Vec<PlayerInfoEntry>) -> PlayerInfo {
        PlayerInfo { action, data }
    }

    fn apply(
        roster: &mut PlayerRoster,
        entities: &EntityRegistry,
        local: Option<EntityId>,
        pkt: &PlayerInfo,
    ) -> Vec<EntityEvent> {
        let mut events = Vec::new();
        let ctx = RosterContext {
            entities,
            local_entity: local,
        };
        roster.apply_player_info(pkt, &ctx, &mut events);
        events
    }

    #[test]
    fn add_new_player_joins_once() {
        let mut roster = PlayerRoster::new();
        let entities = EntityRegistry::new();
        let events = apply(&mut roster, &entities, None, &packet(0, vec![entry(1, "Alice")]));
        assert_eq!(events, vec![EntityEvent::PlayerJoined("Alice".into())]);

        let alice = roster.get("Alice").unwrap();
        assert_eq!(alice.uuid, uuid(1));
        assert_eq!(alice.display_name.to_string(), "Alice");
        assert!(alice.entity.is_none());
        assert_eq!(roster.username_for(&uuid(1)), Some("Alice"));
    }

    #[test]
    fn second_add_is_an_update() {
        let mut roster = PlayerRoster::new();
        let entities = EntityRegistry::new();
        apply(&mut roster, &entities, None, &packet(0, vec![entry(1, "Alice")]));

        let mut again = entry(1, "Alice");
        again.ping = 99;
        again.gamemode = 1;
        let events = apply(&mut roster, &entities, None, &packet(0, vec![again]));
        assert_eq!(events, vec![EntityEvent::PlayerUpdated("Alice".into())]);
        let alice = roster.get("Alice").unwrap();
        assert_eq!(alice.ping, 99);
        assert_eq!(alice.gamemode, 1);
    }

    #[test]
    fn add_links_existing_entity_by_exact_name() {
        let mut roster = PlayerRoster::new();
        let mut entities = EntityRegistry::new();
        let e = entities.get_or_create(8);
        e.kind = EntityKind::Player;
        e.username = Some("alice".into());
        let e = entities.get_or_create(9);
        e.kind = EntityKind::Player;
        e.username = Some("Alice".into());

        apply(&mut roster, &entities, None, &packet(0, vec![entry(1, "Alice")]));
        assert_eq!(roster.get("Alice").unwrap().entity, Some(9));
    }

    #[test]
    fn add_for_local_entity_records_local_player() {
        let mut roster = PlayerRoster::new();
        let mut entities = EntityRegistry::new();
        let me = entities.get_or_create(1);
        me.kind = EntityKind::Player;
        me.username = Some("Bot".into());

        apply(&mut roster, &entities, Some(1), &packet(0, vec![entry(7, "Bot")]));
        assert_eq!(roster.local_player().map(|p| p.username.as_str()), Some("Bot"));
    }

    #[test]
    fn display_name_on_add_and_reset() {
        let mut roster = PlayerRoster::new();
        let entities = EntityRegistry::new();
        let mut e = entry(1, "Alice");
        e.display_name = Some(r#"{"text":"[VIP] Alice"}"#.into());
        let events = apply(&mut roster, &entities, None, &packet(0, vec![e]));
        assert_eq!(events.len(), 1);
        assert_eq!(roster.get("Alice").unwrap().display_name.to_string(), "[VIP] Alice");

        let mut reset = entry(1, "Alice");
        reset.name = None;
        let events = apply(&mut roster, &entities, None, &packet(3, vec![reset]));
        assert_eq!(events, vec![EntityEvent::PlayerUpdated("Alice".into())]);
        assert_eq!(roster.get("Alice").unwrap().display_name.to_string(), "Alice");
    }

    #[test]
    fn malformed_display_name_falls_back_to_username() {
        let mut roster = PlayerRoster::new();
        let entities = EntityRegistry::new();
        apply(&mut roster, &entities, None, &packet(0, vec![entry(1, "Alice")]));
        let mut bad = entry(1, "Alice");
        bad.display_name = Some("{oops".into());
        let events = apply(&mut roster, &entities, None, &packet(3, vec![bad]));
        assert_eq!(events.len(), 1);
        assert_eq!(roster.get("Alice").unwrap().display_name.to_string(), "Alice");
    }

    #[test]
    fn gamemode_and_ping_updates() {
        let mut roster = PlayerRoster::new();
        let entities = EntityRegistry::new();
        apply(&mut roster, &entities, None, &packet(0, vec![entry(1, "Alice")]));

        let mut gm = entry(1, "Alice");
        gm.gamemode = 3;
        let events = apply(&mut roster, &entities, None, &packet(1, vec![gm]));
        assert_eq!(events.len(), 1);
        assert_eq!(roster.get("Alice").unwrap().gamemode, 3);

        let mut ping = entry(1, "Alice");
        ping.ping = 250;
        apply(&mut roster, &entities, None, &packet(2, vec![ping]));
        assert_eq!(roster.get("Alice").unwrap().ping, 250);
    }

    #[test]
    fn updates_for_unknown_players_are_ignored_per_item() {
        let mut roster = PlayerRoster::new();
        let entities = EntityRegistry::new();
        apply(&mut roster, &entities, None, &packet(0, vec![entry(1, "Alice")]));

        let mut alice = entry(1, "Alice");
        alice.ping = 5;
        let events = apply(
            &mut roster,
            &entities,
            None,
            &packet(2, vec![entry(99, "Ghost"), alice]),
        );
        assert_eq!(events, vec![EntityEvent::PlayerUpdated("Alice".into())]);
        assert_eq!(roster.get("Alice").unwrap().ping, 5);
    }

    #[test]
    fn unknown_action_is_noop() {
        let mut roster = PlayerRoster::new();
        let entities = EntityRegistry::new();
        let events = apply(&mut roster, &entities, None, &packet(7, vec![entry(1, "Alice")]));
        assert!(events.is_empty());
        assert!(roster.is_empty());
    }

    #[test]
    fn remove_player() {
        let mut roster = PlayerRoster::new();
        let entities = EntityRegistry::new();
        apply(&mut roster, &entities, None, &packet(0, vec![entry(1, "Alice")]));
        roster.get_mut("Alice").unwrap().entity = Some(5);

        let events = apply(&mut roster, &entities, None, &packet(4, vec![entry(1, "Alice")]));
        assert_eq!(events.len(), 1);
        match &events[0] {
            EntityEvent::PlayerLeft(p) => {
                assert_eq!(p.username, "Alice");
                assert!(p.entity.is_none());
            }
            other => panic!("unexpected event {other:?}"),
        }
        assert!(roster.get("Alice").is_none());
        assert!(roster.username_for(&uuid(1)).is_none());
    }

    #[test]
    fn readd_under_new_uuid_retires_old_uuid() {
        let mut roster = PlayerRoster::new();
        let entities = EntityRegistry::new();
        apply(&mut roster, &entities, None, &packet(0, vec![entry(1, "Alice")]));
        apply(&mut roster, &entities, None, &packet(0, vec![entry(2, "Alice")]));
        assert_eq!(roster.len(), 1);
        assert_eq!(roster.get("Alice").unwrap().uuid, uuid(2));
        assert!(roster.username_for(&uuid(1)).is_none());
        assert_eq!(roster.username_for(&uuid(2)), Some("Alice"));

        // the retired uuid no longer reaches the live player
        let events = apply(&mut roster, &entities, None, &packet(4, vec![entry(1, "Alice")]));
        assert!(events.is_empty());
        assert_eq!(roster.by_uuid(&uuid(2)).map(|p| p.username.as_str()), Some("Alice"));

        let events = apply(&mut roster, &entities, None, &packet(4, vec![entry(2, "Alice")]));
        assert_eq!(events.len(), 1);
        assert!(roster.is_empty());
        assert!(roster.username_for(&uuid(2)).is_none());
    }

    #[test]
    fn remove_of_local_player_is_ignored() {
        let mut roster = PlayerRoster::new();
        let mut entities = EntityRegistry::new();
        let me = entities.get_or_create(1);
        me.kind = EntityKind::Player;
        me.username = Some("Bot".into());
        apply(&mut roster, &entities, Some(1), &packet(0, vec![entry(7, "Bot")]));

        let events = apply(&mut roster, &entities, Some(1), &packet(4, vec![entry(7, "Bot")]));
        assert!(events.is_empty());
        let bot = roster.get("Bot").unwrap();
        assert_eq!(bot.entity, Some(1));
        assert_eq!(roster.username_for(&uuid(7)), Some("Bot"));
    }

    #[test]
    fn unlink_keeps_roster_entry() {
        let mut roster = PlayerRoster::new();
        let entities = EntityRegistry::new();
        apply(&mut roster, &entities, None, &packet(0, vec![entry(1, "Alice")]));
        assert!(roster.link_if_unlinked("Alice", 5));
        assert!(!roster.link_if_unlinked("Alice", 6));
        assert_eq!(roster.unlink_entity(5), vec!["Alice".to_string()]);
        assert!(roster.get("Alice").unwrap().entity.is_none());
        assert_eq!(roster.len(), 1);
    }
}
