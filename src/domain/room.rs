use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::card::Card;
use crate::domain::deck::{Deck, DECK_SIZE};
use crate::domain::table::TableCards;
use crate::domain::{PlayerId, RoomId};

/// Авторитетное состояние одной игровой комнаты.
///
/// Таймеры дисконнекта здесь НЕ хранятся: это рантайм-ресурсы,
/// они живут рядом с комнатой в менеджере комнат (`ManagedRoom`).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameRoom {
    pub id: RoomId,

    /// Ещё не розданные карты.
    pub deck: Deck,

    /// Карты на столе.
    pub table: TableCards,

    /// Игроки в порядке первого входа. Никогда не переупорядочивается и не сокращается.
    pub players: Vec<PlayerId>,

    /// Карты на руках.
    pub hands: HashMap<PlayerId, Vec<Card>>,

    /// Взятые карты (только дописываются, кроме рестарта).
    pub eaten_cards: HashMap<PlayerId, Vec<Card>>,

    /// Сколько раз игрок очистил стол взяткой.
    pub chkobba_count: HashMap<PlayerId, u32>,

    /// Чей сейчас ход (None: пауза, нет подходящего игрока).
    pub current_turn: Option<PlayerId>,

    /// Последний известный статус подключения.
    pub connected: HashMap<PlayerId, bool>,
}

impl GameRoom {
    /// Пустая комната с заданной колодой и стартовым столом.
    pub fn new(id: RoomId, deck: Deck, table: Vec<Card>) -> Self {
        Self {
            id,
            deck,
            table: TableCards::from_cards(table),
            players: Vec::new(),
            hands: HashMap::new(),
            eaten_cards: HashMap::new(),
            chkobba_count: HashMap::new(),
            current_turn: None,
            connected: HashMap::new(),
        }
    }

    pub fn has_player(&self, player: &str) -> bool {
        self.players.iter().any(|p| p == player)
    }

    pub fn player_index(&self, player: &str) -> Option<usize> {
        self.players.iter().position(|p| p == player)
    }

    pub fn is_connected(&self, player: &str) -> bool {
        self.connected.get(player).copied().unwrap_or(false)
    }

    pub fn hand(&self, player: &str) -> &[Card] {
        self.hands.get(player).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn eaten(&self, player: &str) -> &[Card] {
        self.eaten_cards.get(player).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn chkobba(&self, player: &str) -> u32 {
        self.chkobba_count.get(player).copied().unwrap_or(0)
    }

    /// Общее количество карт во всех контейнерах комнаты.
    pub fn card_count(&self) -> usize {
        self.deck.len()
            + self.table.len()
            + self.hands.values().map(Vec::len).sum::<usize>()
            + self.eaten_cards.values().map(Vec::len).sum::<usize>()
    }

    /// Проверка инвариантов модели. Возвращает описание первого нарушения.
    ///
    /// - ровно 52 карты суммарно;
    /// - каждая (suit, value) встречается ровно один раз;
    /// - игроки без повторов;
    /// - current_turn (если есть) всегда один из игроков.
    pub fn check_invariants(&self) -> Result<(), String> {
        let total = self.card_count();
        if total != DECK_SIZE {
            return Err(format!("в комнате {total} карт вместо {DECK_SIZE}"));
        }

        let mut seen = std::collections::HashSet::with_capacity(DECK_SIZE);
        let all = self
            .deck
            .cards
            .iter()
            .chain(self.table.as_slice())
            .chain(self.hands.values().flatten())
            .chain(self.eaten_cards.values().flatten());
        for card in all {
            if !seen.insert(*card) {
                return Err(format!("карта {card} встречается дважды"));
            }
        }

        for (i, p) in self.players.iter().enumerate() {
            if self.players[..i].contains(p) {
                return Err(format!("игрок {p} записан дважды"));
            }
        }

        if let Some(turn) = &self.current_turn {
            if !self.has_player(turn) {
                return Err(format!("current_turn={turn} не является игроком комнаты"));
            }
        }

        Ok(())
    }
}
