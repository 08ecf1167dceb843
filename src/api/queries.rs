use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{GameRoom, PlayerId, RoomId};
use crate::engine::{RandomSource, RoomRegistry};

use super::dto::{build_room_state, RoomStateView};

/// Запросы "только чтение".
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Query {
    /// Получить состояние комнаты.
    GetRoom { room: RoomId },

    /// Получить список комнат (для лобби).
    ListRooms,
}

/// Результат запроса "только чтение".
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum QueryResponse {
    Room(RoomSnapshotDto),
    Rooms(Vec<RoomId>),
}

/// Снимок комнаты для отладки/админки: состояние + то, что не рассылается игрокам.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoomSnapshotDto {
    pub room: RoomId,
    pub players: Vec<PlayerId>,
    pub deck_remaining: usize,
    pub connected: BTreeMap<PlayerId, bool>,
    pub state: RoomStateView,
}

/// Сформировать DTO снимка по комнате.
pub fn build_room_snapshot(room: &GameRoom) -> RoomSnapshotDto {
    RoomSnapshotDto {
        room: room.id.clone(),
        players: room.players.clone(),
        deck_remaining: room.deck.len(),
        connected: room
            .players
            .iter()
            .map(|p| (p.clone(), room.is_connected(p)))
            .collect(),
        state: build_room_state(room),
    }
}

/// Выполнить запрос. None: комнаты нет.
pub fn run_query<R: RandomSource>(registry: &RoomRegistry<R>, query: &Query) -> Option<QueryResponse> {
    match query {
        Query::GetRoom { room } => registry
            .snapshot(room)
            .map(|r| QueryResponse::Room(build_room_snapshot(&r))),
        Query::ListRooms => Some(QueryResponse::Rooms(registry.room_ids())),
    }
}
