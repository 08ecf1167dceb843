//! Доменная модель: карты, колода, стол, игровая комната.

pub mod card;
pub mod deck;
pub mod room;
pub mod table;

/// Идентификаторы приходят от внешнего транспорта как непрозрачные строки.
pub type PlayerId = String;
pub type RoomId = String;

// Удобные реэкспорты, чтобы в других модулях писать crate::domain::Card и т.п.
pub use card::*;
pub use deck::*;
pub use room::*;
pub use table::*;
