//! Внешний API движка.
//!
//! Здесь описываются:
//! - входящие запросы и диспетчер (commands.rs): всё, что меняет состояние;
//! - запросы (queries.rs): только чтение;
//! - DTO (dto.rs): исходящие сообщения для транспорта;
//! - ошибки (errors.rs): то, что видит клиент.

pub mod commands;
pub mod dto;
pub mod errors;
pub mod queries;

pub use commands::*;
pub use dto::*;
pub use errors::*;
pub use queries::*;
