//! Игровой движок: взятки, добор, очередь хода, конец игры, реестр комнат.
//!
//! Основные операции (над одной `GameRoom`, см. `game_loop`):
//!   - `join_player` – вход / переподключение
//!   - `play_card` – ход картой с взяткой
//!   - `draw_cards` – добор
//!   - `restart` – новая игра теми же игроками
//!   - `expire_grace` – пропуск хода после грейс-периода
//!
//! `RoomRegistry` оборачивает эти операции для многих комнат и таймеров.

pub mod capture;
pub mod dealing;
pub mod end_game;
pub mod errors;
pub mod game_loop;
pub mod room_manager;
pub mod turns;

pub use capture::{find_subset_sum, resolve_capture, CaptureOutcome, CapturePlan};
pub use dealing::{deal_shares, HAND_SIZE};
pub use errors::EngineError;
pub use game_loop::{
    advance_turn, create_room, draw_cards, expire_grace, join_player, mark_disconnected,
    play_card, restart, shuffled_deck, DrawStatus, JoinKind,
};
pub use room_manager::{ManagedRoom, RoomEvent, RoomRegistry, Transition};
pub use turns::next_connected_after;

/// RNG интерфейс для engine.
/// Реализации: в infra (обёртки над `rand`).
pub trait RandomSource {
    fn shuffle<T>(&mut self, slice: &mut [T]);
}
