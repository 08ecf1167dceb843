use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{Card, GameRoom, PlayerId, RoomId};

/// Начальное состояние для вошедшего игрока (только его данные + стол).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct InitialView {
    pub hand: Vec<Card>,
    pub table_cards: Vec<Card>,
    pub eaten_cards: Vec<Card>,
    pub chkobba: u32,
    pub current_turn: Option<PlayerId>,
}

/// Полное состояние комнаты для рассылки всем участникам.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoomStateView {
    pub table_cards: Vec<Card>,
    pub hands: BTreeMap<PlayerId, Vec<Card>>,
    pub eaten_cards: BTreeMap<PlayerId, Vec<Card>>,
    pub chkobba: BTreeMap<PlayerId, u32>,
    pub current_turn: Option<PlayerId>,
}

/// Итог игры: сколько карт взял каждый игрок.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameOverDto {
    pub results: BTreeMap<PlayerId, usize>,
}

/// Отказ в доборе: уходит только запросившему.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DrawRejectedDto {
    pub reason: String,
}

/// Исходящее сообщение. Имя события = тег.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerMessage {
    InitialState(InitialView),
    UpdateState(RoomStateView),
    GameOver(GameOverDto),
    DrawRejected(DrawRejectedDto),
}

impl ServerMessage {
    /// JSON для транспорта.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Кому доставить сообщение.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum Audience {
    /// Всем участникам комнаты.
    Room,
    /// Только одному игроку.
    Player(PlayerId),
}

/// Сообщение + адресат.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Outbound {
    pub room: RoomId,
    pub audience: Audience,
    pub message: ServerMessage,
}

impl Outbound {
    pub fn to_room(room: &str, message: ServerMessage) -> Self {
        Self {
            room: room.to_string(),
            audience: Audience::Room,
            message,
        }
    }

    pub fn to_player(room: &str, player: &str, message: ServerMessage) -> Self {
        Self {
            room: room.to_string(),
            audience: Audience::Player(player.to_string()),
            message,
        }
    }
}

/// Собрать `InitialView` для игрока.
pub fn build_initial_view(room: &GameRoom, player: &str) -> InitialView {
    InitialView {
        hand: room.hand(player).to_vec(),
        table_cards: room.table.to_vec(),
        eaten_cards: room.eaten(player).to_vec(),
        chkobba: room.chkobba(player),
        current_turn: room.current_turn.clone(),
    }
}

/// Собрать `RoomStateView` (игроки в порядке id, чтобы JSON был стабильным).
pub fn build_room_state(room: &GameRoom) -> RoomStateView {
    let mut hands = BTreeMap::new();
    let mut eaten_cards = BTreeMap::new();
    let mut chkobba = BTreeMap::new();
    for p in &room.players {
        hands.insert(p.clone(), room.hand(p).to_vec());
        eaten_cards.insert(p.clone(), room.eaten(p).to_vec());
        chkobba.insert(p.clone(), room.chkobba(p));
    }

    RoomStateView {
        table_cards: room.table.to_vec(),
        hands,
        eaten_cards,
        chkobba,
        current_turn: room.current_turn.clone(),
    }
}
