use std::collections::BTreeMap;

use log::{debug, info};

use crate::domain::deck::{Deck, INITIAL_TABLE_CARDS};
use crate::domain::{Card, GameRoom, PlayerId, RoomId};
use crate::engine::capture::{resolve_capture, CaptureOutcome, CapturePlan};
use crate::engine::dealing::{deal_shares, HAND_SIZE};
use crate::engine::end_game;
use crate::engine::errors::EngineError;
use crate::engine::turns::next_connected_after;
use crate::engine::RandomSource;

/// Что произошло при входе игрока в комнату.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JoinKind {
    /// Новый игрок: получил 3 карты.
    NewPlayer,
    /// Уже известный игрок вернулся после дисконнекта.
    Reconnected,
}

/// Статус после добора карт.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DrawStatus {
    Ongoing,
    /// Колода и руки пусты: итог по игрокам.
    Finished(BTreeMap<PlayerId, usize>),
}

/// Свежая перемешанная колода.
pub fn shuffled_deck<R: RandomSource>(rng: &mut R) -> Deck {
    let mut deck = Deck::standard_52();
    rng.shuffle(&mut deck.cards);
    deck
}

/// Создать комнату: новая колода, 4 карты на стол, игроков пока нет.
pub fn create_room<R: RandomSource>(id: RoomId, rng: &mut R) -> GameRoom {
    let mut deck = shuffled_deck(rng);
    let table = deck.deal_initial();
    GameRoom::new(id, deck, table)
}

/// Вход игрока в комнату.
///
/// - новый id: раздаём 3 карты, игрок подключён; ход получает, только если
///   сейчас ничей;
/// - известный id: это переподключение, меняется только статус подключения
///   (и ход, если он ничей).
pub fn join_player(room: &mut GameRoom, player: &str) -> JoinKind {
    if room.has_player(player) {
        room.connected.insert(player.to_string(), true);
        if room.current_turn.is_none() {
            room.current_turn = Some(player.to_string());
        }
        debug!("[room {}] игрок {} переподключился", room.id, player);
        return JoinKind::Reconnected;
    }

    let hand = room.deck.draw_n(HAND_SIZE);
    let id = player.to_string();
    room.players.push(id.clone());
    room.hands.insert(id.clone(), hand);
    room.eaten_cards.insert(id.clone(), Vec::new());
    room.chkobba_count.insert(id.clone(), 0);
    room.connected.insert(id.clone(), true);
    if room.current_turn.is_none() {
        room.current_turn = Some(id);
    }

    info!(
        "[room {}] новый игрок {} (всего игроков: {})",
        room.id,
        player,
        room.players.len()
    );
    JoinKind::NewPlayer
}

/// Сыграть карту с руки.
///
/// Карта должна быть у игрока на руке, иначе `IllegalMove` и комната не меняется.
/// После успешного хода ход переходит к следующему подключённому игроку.
pub fn play_card(room: &mut GameRoom, player: &str, card: Card) -> Result<CaptureOutcome, EngineError> {
    let actor = room
        .player_index(player)
        .ok_or_else(|| EngineError::UnknownPlayer(player.to_string()))?;

    let hand_pos = room
        .hand(player)
        .iter()
        .position(|c| *c == card)
        .ok_or_else(|| EngineError::IllegalMove {
            player: player.to_string(),
            card,
        })?;

    let plan = resolve_capture(room.table.as_slice(), card);
    let outcome = apply_capture(room, player, hand_pos, card, &plan)?;

    debug!(
        "[room {}] {} сыграл {}: взял {} карт{}",
        room.id,
        player,
        card,
        outcome.captured.len(),
        if outcome.sweep { " (chkobba)" } else { "" }
    );

    advance_turn(room, actor);
    Ok(outcome)
}

/// Применить план взятки одним шагом.
///
/// Сначала забираем карты со стола (это единственный шаг, который может
/// не сойтись), и только потом трогаем руку и взятки игрока.
fn apply_capture(
    room: &mut GameRoom,
    player: &str,
    hand_pos: usize,
    played: Card,
    plan: &CapturePlan,
) -> Result<CaptureOutcome, EngineError> {
    let mut captured = if plan.is_capture() {
        room.table
            .take_positions(&plan.positions())
            .ok_or(EngineError::Internal("план взятки не совпадает со столом"))?
    } else {
        Vec::new()
    };

    let hand = room
        .hands
        .get_mut(player)
        .ok_or_else(|| EngineError::UnknownPlayer(player.to_string()))?;
    hand.remove(hand_pos);

    if !plan.is_capture() {
        room.table.place(played);
        return Ok(CaptureOutcome {
            captured,
            sweep: false,
        });
    }

    captured.push(played);
    room.eaten_cards
        .entry(player.to_string())
        .or_default()
        .extend(captured.iter().copied());

    let sweep = room.table.is_empty();
    if sweep {
        *room.chkobba_count.entry(player.to_string()).or_insert(0) += 1;
    }

    Ok(CaptureOutcome { captured, sweep })
}

/// Передать ход следующему подключённому игроку.
///
/// Сканируем от текущего игрока; если хода ни у кого нет: от `fallback_start`.
/// Если кроме стартового никого подключённого нет: ход становится None.
pub fn advance_turn(room: &mut GameRoom, fallback_start: usize) {
    let start = room
        .current_turn
        .as_deref()
        .and_then(|p| room.player_index(p))
        .unwrap_or(fallback_start);

    room.current_turn = next_connected_after(&room.players, &room.connected, start);
}

/// Добор карт.
///
/// Разрешён, только когда у всех ПОДКЛЮЧЁННЫХ игроков пустые руки.
/// Отключённые игроки тоже получают свою долю.
pub fn draw_cards(room: &mut GameRoom, requester: &str) -> Result<DrawStatus, EngineError> {
    if !room.has_player(requester) {
        return Err(EngineError::UnknownPlayer(requester.to_string()));
    }

    let someone_holds = room
        .players
        .iter()
        .any(|p| room.is_connected(p) && !room.hand(p).is_empty());
    if someone_holds {
        return Err(EngineError::PreconditionNotMet);
    }

    let shares = deal_shares(room.players.len(), room.deck.len());
    for (player, share) in room.players.iter().zip(shares) {
        let cards = room.deck.draw_n(share);
        room.hands.entry(player.clone()).or_default().extend(cards);
    }

    debug!(
        "[room {}] добор по запросу {}, в колоде осталось {}",
        room.id,
        requester,
        room.deck.len()
    );

    if end_game::is_terminal(room) {
        let results = end_game::results(room);
        info!("[room {}] игра окончена: {:?}", room.id, results);
        return Ok(DrawStatus::Finished(results));
    }

    Ok(DrawStatus::Ongoing)
}

/// Начать игру заново с теми же игроками.
///
/// Статусы подключения и таймеры не трогаем.
pub fn restart<R: RandomSource>(room: &mut GameRoom, rng: &mut R) {
    let mut deck = shuffled_deck(rng);
    room.table.reset(deck.draw_n(INITIAL_TABLE_CARDS));

    for player in &room.players {
        room.hands.insert(player.clone(), deck.draw_n(HAND_SIZE));
        room.eaten_cards.insert(player.clone(), Vec::new());
        room.chkobba_count.insert(player.clone(), 0);
    }

    room.deck = deck;
    room.current_turn = room.players.first().cloned();

    info!("[room {}] перезапуск игры ({} игроков)", room.id, room.players.len());
}

/// Отметить игрока отключённым. Остальное состояние не меняется.
pub fn mark_disconnected(room: &mut GameRoom, player: &str) -> Result<(), EngineError> {
    if !room.has_player(player) {
        return Err(EngineError::UnknownPlayer(player.to_string()));
    }
    room.connected.insert(player.to_string(), false);
    Ok(())
}

/// Истёк грейс-период отключённого игрока.
///
/// Ход пропускается, только если игрок всё ещё отключён и ход всё ещё его.
/// Иначе `StaleTimer`: таймер больше не актуален, ничего не меняем.
/// Возвращает нового владельца хода.
pub fn expire_grace(room: &mut GameRoom, player: &str) -> Result<Option<PlayerId>, EngineError> {
    let idx = room
        .player_index(player)
        .ok_or_else(|| EngineError::UnknownPlayer(player.to_string()))?;

    let stale = room.is_connected(player) || room.current_turn.as_deref() != Some(player);
    if stale {
        return Err(EngineError::StaleTimer {
            player: player.to_string(),
        });
    }

    advance_turn(room, idx);
    info!(
        "[room {}] грейс-период {} истёк, ход у {:?}",
        room.id, player, room.current_turn
    );
    Ok(room.current_turn.clone())
}
