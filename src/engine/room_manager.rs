// src/engine/room_manager.rs

use std::collections::HashMap;
use std::sync::{Arc, Weak};

use log::{debug, info, warn};
use parking_lot::Mutex;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

use crate::domain::{Card, GameRoom, PlayerId, RoomId};
use crate::engine::game_loop::{self, DrawStatus, JoinKind};
use crate::engine::{CaptureOutcome, EngineError, RandomSource};
use crate::time_ctrl::{DisconnectTimers, GraceRules};

/// Результат перехода: что случилось + снимок комнаты сразу после него.
#[derive(Clone, Debug)]
pub struct Transition<T> {
    pub outcome: T,
    pub room: GameRoom,
}

/// События, которые случаются без входящего запроса (сработал таймер).
#[derive(Clone, Debug)]
pub enum RoomEvent {
    /// Грейс-период истёк, ход отключённого игрока пропущен.
    TurnSkipped {
        room: GameRoom,
        skipped: PlayerId,
        next: Option<PlayerId>,
    },
}

/// Внутренний объект: одна комната + её таймеры дисконнекта.
pub struct ManagedRoom {
    pub room: GameRoom,
    timers: DisconnectTimers,
}

impl ManagedRoom {
    fn new(room: GameRoom) -> Self {
        Self {
            room,
            timers: DisconnectTimers::new(),
        }
    }
}

type SharedRoom = Arc<Mutex<ManagedRoom>>;

struct Shared<R> {
    rooms: Mutex<HashMap<RoomId, SharedRoom>>,
    rng: Mutex<R>,
    rules: GraceRules,
    events: UnboundedSender<RoomEvent>,
}

/// Реестр комнат:
/// - хранит комнаты по RoomId (одна запись на комнату);
/// - каждая комната под своим локом, поэтому переходы одной комнаты
///   идут строго по очереди, а разные комнаты независимы;
/// - держит таймеры дисконнекта и шлёт `RoomEvent`, когда таймер что-то поменял.
///
/// Клонируется дёшево: все клоны смотрят на одно и то же состояние.
pub struct RoomRegistry<R> {
    shared: Arc<Shared<R>>,
}

impl<R> Clone for RoomRegistry<R> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<R: RandomSource> RoomRegistry<R> {
    /// Создать пустой реестр. Второй элемент: поток событий от таймеров.
    pub fn new(rules: GraceRules, rng: R) -> (Self, UnboundedReceiver<RoomEvent>) {
        let (events, rx) = unbounded_channel();
        let shared = Shared {
            rooms: Mutex::new(HashMap::new()),
            rng: Mutex::new(rng),
            rules,
            events,
        };
        (
            Self {
                shared: Arc::new(shared),
            },
            rx,
        )
    }

    pub fn rules(&self) -> &GraceRules {
        &self.shared.rules
    }

    fn room(&self, room_id: &str) -> Result<SharedRoom, EngineError> {
        self.shared
            .rooms
            .lock()
            .get(room_id)
            .cloned()
            .ok_or_else(|| EngineError::UnknownRoom(room_id.to_string()))
    }

    /// Есть ли комната с таким id.
    pub fn has_room(&self, room_id: &str) -> bool {
        self.shared.rooms.lock().contains_key(room_id)
    }

    /// Список комнат (для лобби/отладки), отсортированный.
    pub fn room_ids(&self) -> Vec<RoomId> {
        let mut ids: Vec<RoomId> = self.shared.rooms.lock().keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Снимок состояния комнаты (read-only).
    pub fn snapshot(&self, room_id: &str) -> Option<GameRoom> {
        let room = self.room(room_id).ok()?;
        let managed = room.lock();
        Some(managed.room.clone())
    }

    /// Висит ли у игрока таймер дисконнекта.
    pub fn has_pending_timer(&self, room_id: &str, player: &str) -> bool {
        self.room(room_id)
            .map(|room| room.lock().timers.is_pending(player))
            .unwrap_or(false)
    }

    /// Вход игрока. Комната создаётся при первом входе.
    ///
    /// Для уже известного игрока это переподключение: его таймер отменяется
    /// до любых других изменений.
    pub fn join(&self, room_id: &str, player: &str) -> Transition<JoinKind> {
        let room = {
            let mut rooms = self.shared.rooms.lock();
            Arc::clone(rooms.entry(room_id.to_string()).or_insert_with(|| {
                let mut rng = self.shared.rng.lock();
                info!("[registry] создана комната {}", room_id);
                Arc::new(Mutex::new(ManagedRoom::new(game_loop::create_room(
                    room_id.to_string(),
                    &mut *rng,
                ))))
            }))
        };

        let mut managed = room.lock();
        if managed.timers.cancel(player) {
            debug!("[room {}] таймер дисконнекта {} отменён", room_id, player);
        }
        let outcome = game_loop::join_player(&mut managed.room, player);
        Transition {
            outcome,
            room: managed.room.clone(),
        }
    }

    /// Сыграть карту.
    pub fn play(&self, room_id: &str, player: &str, card: Card) -> Result<Transition<CaptureOutcome>, EngineError> {
        let room = self.room(room_id)?;
        let mut managed = room.lock();
        let outcome = game_loop::play_card(&mut managed.room, player, card)?;
        Ok(Transition {
            outcome,
            room: managed.room.clone(),
        })
    }

    /// Добор карт.
    pub fn draw(&self, room_id: &str, player: &str) -> Result<Transition<DrawStatus>, EngineError> {
        let room = self.room(room_id)?;
        let mut managed = room.lock();
        let outcome = game_loop::draw_cards(&mut managed.room, player)?;
        Ok(Transition {
            outcome,
            room: managed.room.clone(),
        })
    }

    /// Перезапуск игры в комнате.
    ///
    /// Если ход достался отключённому игроку без живого таймера
    /// (его прежний таймер уже отработал), таймер заводится заново.
    pub fn restart(&self, room_id: &str) -> Result<Transition<()>, EngineError> {
        let room = self.room(room_id)?;
        let mut managed = room.lock();
        {
            let mut rng = self.shared.rng.lock();
            game_loop::restart(&mut managed.room, &mut *rng);
        }

        let idle_holder = managed
            .room
            .current_turn
            .clone()
            .filter(|p| !managed.room.is_connected(p) && !managed.timers.is_pending(p));
        if let Some(holder) = idle_holder {
            if let Err(e) = self.arm_grace_timer(&room, &mut managed, &holder) {
                warn!("[room {}] таймер для {} после рестарта: {}", room_id, holder, e);
            }
        }

        Ok(Transition {
            outcome: (),
            room: managed.room.clone(),
        })
    }

    /// Дисконнект игрока во всех комнатах, где он есть.
    ///
    /// Возвращает id затронутых комнат.
    pub fn disconnect(&self, player: &str) -> Vec<RoomId> {
        let rooms: Vec<(RoomId, SharedRoom)> = self
            .shared
            .rooms
            .lock()
            .iter()
            .map(|(id, room)| (id.clone(), Arc::clone(room)))
            .collect();

        let mut touched = Vec::new();
        for (room_id, room) in rooms {
            match self.disconnect_shared(&room, player) {
                Ok(()) => touched.push(room_id),
                Err(EngineError::UnknownPlayer(_)) => {}
                Err(e) => {
                    warn!("[room {}] дисконнект {}: {}", room_id, player, e);
                    touched.push(room_id);
                }
            }
        }
        touched.sort();
        touched
    }

    /// Дисконнект игрока в конкретной комнате.
    pub fn disconnect_from(&self, room_id: &str, player: &str) -> Result<(), EngineError> {
        let room = self.room(room_id)?;
        self.disconnect_shared(&room, player)
    }

    fn disconnect_shared(&self, room: &SharedRoom, player: &str) -> Result<(), EngineError> {
        let mut managed = room.lock();
        game_loop::mark_disconnected(&mut managed.room, player)?;

        if managed.timers.is_pending(player) {
            debug!("[room {}] таймер {} уже запущен", managed.room.id, player);
            return Ok(());
        }

        self.arm_grace_timer(room, &mut managed, player)?;
        Ok(())
    }

    /// Завести грейс-таймер игрока. Вызывается под локом комнаты.
    fn arm_grace_timer(
        &self,
        room: &SharedRoom,
        managed: &mut ManagedRoom,
        player: &str,
    ) -> Result<u64, EngineError> {
        let weak = Arc::downgrade(room);
        let events = self.shared.events.clone();
        let player_id = player.to_string();
        let delay = self.shared.rules.grace_period();
        let generation = managed.timers.schedule(player, delay, move |generation| {
            fire_grace_timer(weak, player_id, generation, events)
        })?;

        debug!(
            "[room {}] игрок {} отключён, грейс {:?} (таймер #{})",
            managed.room.id, player, delay, generation
        );
        Ok(generation)
    }

    /// Убрать комнату из реестра (внешний хук очистки).
    ///
    /// Все таймеры комнаты отменяются.
    pub fn remove_room(&self, room_id: &str) -> bool {
        let removed = self.shared.rooms.lock().remove(room_id);
        match removed {
            Some(room) => {
                room.lock().timers.cancel_all();
                info!("[registry] комната {} удалена", room_id);
                true
            }
            None => false,
        }
    }
}

/// Срабатывание грейс-таймера. Обычный переход комнаты под её локом.
///
/// Всё перепроверяем: комната жива, таймер всё ещё актуален,
/// игрок всё ещё отключён и ход всё ещё его.
fn fire_grace_timer(
    room: Weak<Mutex<ManagedRoom>>,
    player: PlayerId,
    generation: u64,
    events: UnboundedSender<RoomEvent>,
) {
    let Some(room) = room.upgrade() else {
        debug!("[timer] комната игрока {} уже удалена", player);
        return;
    };

    let mut managed = room.lock();
    if !managed.timers.take_if_current(&player, generation) {
        debug!("[room {}] таймер #{} игрока {} отменён", managed.room.id, generation, player);
        return;
    }

    match game_loop::expire_grace(&mut managed.room, &player) {
        Ok(next) => {
            let event = RoomEvent::TurnSkipped {
                room: managed.room.clone(),
                skipped: player,
                next,
            };
            if events.send(event).is_err() {
                debug!("[room {}] нет получателя событий", managed.room.id);
            }
        }
        Err(e) => debug!("[room {}] {}", managed.room.id, e),
    }
}
