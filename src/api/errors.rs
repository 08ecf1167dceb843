use serde::{Deserialize, Serialize};

use crate::domain::{PlayerId, RoomId};
use crate::engine::EngineError;

/// Причина отказа в доборе, как её видит клиент.
pub const DRAW_REJECTED_REASON: &str = "other players still hold cards";

/// Ошибки внешнего API (то, что видит транспорт).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum ApiError {
    /// Неправильные входные данные (например, битый JSON).
    BadRequest(String),

    /// Комната не найдена.
    UnknownRoom(RoomId),

    /// Игрок не найден в комнате.
    UnknownPlayer(PlayerId),

    /// Карты нет на руке.
    IllegalMove(String),

    /// Добор сейчас невозможен.
    PreconditionNotMet(String),

    /// Внутренняя ошибка сервера.
    Internal(String),
}

impl ApiError {
    /// Ошибки, о которых клиенту ничего не сообщаем.
    pub fn is_silent(&self) -> bool {
        matches!(
            self,
            ApiError::UnknownRoom(_) | ApiError::UnknownPlayer(_) | ApiError::IllegalMove(_)
        )
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::UnknownRoom(room) => ApiError::UnknownRoom(room),
            EngineError::UnknownPlayer(player) => ApiError::UnknownPlayer(player),
            e @ EngineError::IllegalMove { .. } => ApiError::IllegalMove(e.to_string()),
            EngineError::PreconditionNotMet => {
                ApiError::PreconditionNotMet(DRAW_REJECTED_REASON.to_string())
            }
            e => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}
