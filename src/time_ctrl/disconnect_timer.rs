// src/time_ctrl/disconnect_timer.rs
//! Отложенные задачи грейс-периода: не больше одной живой задачи на игрока.

use std::collections::HashMap;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::domain::PlayerId;
use crate::engine::EngineError;

/// Живой таймер одного игрока.
///
/// `generation` отличает этот таймер от предыдущих/следующих таймеров
/// того же игрока: сработавшая задача действует, только если её поколение
/// всё ещё записано в `DisconnectTimers`.
#[derive(Debug)]
pub struct GraceTimer {
    pub generation: u64,
    handle: JoinHandle<()>,
}

/// Таймеры дисконнекта одной комнаты.
#[derive(Debug, Default)]
pub struct DisconnectTimers {
    pending: HashMap<PlayerId, GraceTimer>,
    next_generation: u64,
}

impl DisconnectTimers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_pending(&self, player: &str) -> bool {
        self.pending.contains_key(player)
    }

    /// Запланировать `on_fire` через `delay` для игрока.
    ///
    /// Нужен активный tokio-рантайм. Если таймер уже есть: ничего не делаем
    /// и возвращаем поколение существующего.
    pub fn schedule<F>(&mut self, player: &str, delay: Duration, on_fire: F) -> Result<u64, EngineError>
    where
        F: FnOnce(u64) + Send + 'static,
    {
        if let Some(existing) = self.pending.get(player) {
            return Ok(existing.generation);
        }

        let runtime = Handle::try_current().map_err(|_| EngineError::TimerRuntimeUnavailable)?;

        self.next_generation += 1;
        let generation = self.next_generation;
        let handle = runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            on_fire(generation);
        });

        self.pending
            .insert(player.to_string(), GraceTimer { generation, handle });
        Ok(generation)
    }

    /// Отменить таймер игрока (переподключение). true, если он был.
    pub fn cancel(&mut self, player: &str) -> bool {
        match self.pending.remove(player) {
            Some(timer) => {
                timer.handle.abort();
                true
            }
            None => false,
        }
    }

    /// Снять запись сработавшего таймера, если это всё ещё он.
    ///
    /// false: таймер был отменён или заменён, пока задача ждала лок комнаты.
    pub fn take_if_current(&mut self, player: &str, generation: u64) -> bool {
        match self.pending.get(player) {
            Some(timer) if timer.generation == generation => {
                self.pending.remove(player);
                true
            }
            _ => false,
        }
    }

    /// Отменить все таймеры (удаление комнаты).
    pub fn cancel_all(&mut self) {
        for (_, timer) in self.pending.drain() {
            timer.handle.abort();
        }
    }
}

impl Drop for DisconnectTimers {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
