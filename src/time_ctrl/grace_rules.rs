// src/time_ctrl/grace_rules.rs
//! Конфигурация грейс-периода после дисконнекта.
//!
//! Здесь описываем только "правила", без состояния и без привязки к конкретной комнате.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Профиль тайминга (на будущее можно добавить Fast/Relaxed и т.д.).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum GraceProfile {
    /// 30 сек на возвращение после дисконнекта.
    Standard,
}

/// Правила грейс-периода для всех комнат реестра.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GraceRules {
    /// Сколько секунд ждём отключённого игрока, прежде чем пропустить его ход.
    pub grace_secs: u32,
}

impl GraceRules {
    /// Строгий конструктор.
    pub const fn new(grace_secs: u32) -> Self {
        Self { grace_secs }
    }

    /// Стандартный профиль: 30 сек.
    pub const fn standard() -> Self {
        Self { grace_secs: 30 }
    }

    /// Получить правила по профилю.
    pub const fn from_profile(profile: GraceProfile) -> Self {
        match profile {
            GraceProfile::Standard => Self::standard(),
        }
    }

    /// Загрузить правила из JSON (например, `{"grace_secs": 10}`).
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn grace_period(&self) -> Duration {
        Duration::from_secs(u64::from(self.grace_secs))
    }
}

impl Default for GraceRules {
    fn default() -> Self {
        Self::standard()
    }
}
