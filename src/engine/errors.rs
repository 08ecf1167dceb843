use crate::domain::{Card, PlayerId, RoomId};

use thiserror::Error;

/// Ошибки игрового движка.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Комната {0} не найдена")]
    UnknownRoom(RoomId),

    #[error("Игрок {0} не найден в комнате")]
    UnknownPlayer(PlayerId),

    #[error("У игрока {player} нет карты {card}")]
    IllegalMove { player: PlayerId, card: Card },

    #[error("Другие игроки ещё держат карты")]
    PreconditionNotMet,

    #[error("Таймер дисконнекта игрока {player} устарел")]
    StaleTimer { player: PlayerId },

    #[error("Нет активного tokio-рантайма для таймера дисконнекта")]
    TimerRuntimeUnavailable,

    #[error("Внутренняя ошибка: {0}")]
    Internal(&'static str),
}
