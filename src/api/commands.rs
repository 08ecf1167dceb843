use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::domain::{Card, PlayerId, RoomId};
use crate::engine::{DrawStatus, EngineError, RandomSource, RoomEvent, RoomRegistry};

use super::dto::{
    build_initial_view, build_room_state, DrawRejectedDto, GameOverDto, Outbound, ServerMessage,
};
use super::errors::{ApiError, DRAW_REJECTED_REASON};

/// Входящий запрос от транспорта.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "intent", rename_all = "snake_case")]
pub enum Intent {
    /// Войти в комнату (или переподключиться).
    Join { room: RoomId, player: PlayerId },

    /// Сыграть карту с руки.
    Play {
        room: RoomId,
        player: PlayerId,
        card: Card,
    },

    /// Добрать карты.
    Draw { room: RoomId, player: PlayerId },

    /// Начать игру заново.
    Restart { room: RoomId },

    /// Транспорт потерял соединение с игроком.
    Disconnect { player: PlayerId },
}

impl Intent {
    /// Разбор JSON-запроса.
    pub fn from_json(raw: &str) -> Result<Self, ApiError> {
        Ok(serde_json::from_str(raw)?)
    }
}

/// Выполнить запрос и собрать исходящие сообщения.
///
/// Ошибки наружу не выходят:
/// - неизвестная комната / игрок, карты нет на руке: тишина;
/// - добор при чужих картах: отказ только запросившему;
/// - всё остальное: в лог и тишина.
pub fn dispatch<R: RandomSource>(registry: &RoomRegistry<R>, intent: Intent) -> Vec<Outbound> {
    match execute(registry, &intent) {
        Ok(out) => out,
        Err(ApiError::PreconditionNotMet(reason)) => match intent {
            Intent::Draw { room, player } => vec![Outbound::to_player(
                &room,
                &player,
                ServerMessage::DrawRejected(DrawRejectedDto { reason }),
            )],
            _ => Vec::new(),
        },
        Err(e) if e.is_silent() => {
            debug!("[api] запрос {:?} проигнорирован: {:?}", intent, e);
            Vec::new()
        }
        Err(e) => {
            warn!("[api] запрос {:?} не выполнен: {:?}", intent, e);
            Vec::new()
        }
    }
}

fn execute<R: RandomSource>(registry: &RoomRegistry<R>, intent: &Intent) -> Result<Vec<Outbound>, ApiError> {
    match intent {
        Intent::Join { room, player } => {
            let t = registry.join(room, player);
            Ok(vec![Outbound::to_player(
                room,
                player,
                ServerMessage::InitialState(build_initial_view(&t.room, player)),
            )])
        }

        Intent::Play { room, player, card } => {
            let t = registry.play(room, player, *card)?;
            Ok(vec![Outbound::to_room(
                room,
                ServerMessage::UpdateState(build_room_state(&t.room)),
            )])
        }

        Intent::Draw { room, player } => {
            let t = registry.draw(room, player)?;
            let mut out = vec![Outbound::to_room(
                room,
                ServerMessage::UpdateState(build_room_state(&t.room)),
            )];
            if let DrawStatus::Finished(results) = t.outcome {
                out.push(Outbound::to_room(
                    room,
                    ServerMessage::GameOver(GameOverDto { results }),
                ));
            }
            Ok(out)
        }

        Intent::Restart { room } => {
            let t = registry.restart(room)?;
            Ok(vec![Outbound::to_room(
                room,
                ServerMessage::UpdateState(build_room_state(&t.room)),
            )])
        }

        Intent::Disconnect { player } => {
            let rooms = registry.disconnect(player);
            if rooms.is_empty() {
                return Err(EngineError::UnknownPlayer(player.clone()).into());
            }
            Ok(Vec::new())
        }
    }
}

/// Превратить событие таймера в рассылку для комнаты.
pub fn map_room_event(event: RoomEvent) -> Outbound {
    match event {
        RoomEvent::TurnSkipped { room, .. } => Outbound::to_room(
            &room.id,
            ServerMessage::UpdateState(build_room_state(&room)),
        ),
    }
}

/// Отказ в доборе в том виде, как его получает клиент.
pub fn draw_rejected() -> ServerMessage {
    ServerMessage::DrawRejected(DrawRejectedDto {
        reason: DRAW_REJECTED_REASON.to_string(),
    })
}
