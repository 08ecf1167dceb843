// src/time_ctrl/mod.rs
//! Контроль времени: грейс-период после дисконнекта.
//!
//! Здесь собираем:
//! - правила (`GraceRules`);
//! - таймеры дисконнекта комнаты (`DisconnectTimers`).

pub mod disconnect_timer;
pub mod grace_rules;

pub use disconnect_timer::{DisconnectTimers, GraceTimer};
pub use grace_rules::{GraceProfile, GraceRules};
