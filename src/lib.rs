//! Авторитетный движок карточной игры chkobba (шкоба) для комнат реального времени.
//!
//! Транспорт (сокеты, сериализация на проводе): внешний. Движок принимает
//! запросы `api::Intent`, меняет состояние комнаты одним атомарным переходом
//! и отдаёт исходящие сообщения `api::Outbound`.

pub mod api;
pub mod domain;
pub mod engine;
pub mod infra;
pub mod time_ctrl;
