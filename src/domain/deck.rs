use serde::{Deserialize, Serialize};

use crate::domain::card::{Card, Suit, MAX_VALUE, MIN_VALUE};

/// Полный размер колоды.
pub const DECK_SIZE: usize = 52;

/// Сколько карт выкладывается на стол при создании комнаты / рестарте.
pub const INITIAL_TABLE_CARDS: usize = 4;

/// Колода карт. Упорядоченный список, карты берутся СПЕРЕДИ.
/// Перемешивание делает engine (через RNG из infra), НЕ здесь.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Deck {
    pub cards: Vec<Card>,
}

impl Deck {
    /// Стандартная 52-карточная колода в порядке:
    /// Clubs 1..13, Diamonds 1..13, Hearts 1..13, Spades 1..13.
    pub fn standard_52() -> Self {
        let mut cards = Vec::with_capacity(DECK_SIZE);
        for suit in Suit::ALL {
            for value in MIN_VALUE..=MAX_VALUE {
                cards.push(Card::new(suit, value));
            }
        }
        Deck { cards }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Снять первые 4 карты: начальный стол.
    pub fn deal_initial(&mut self) -> Vec<Card> {
        self.draw_n(INITIAL_TABLE_CARDS)
    }

    /// Взять до n карт сверху (спереди). Если карт меньше: отдаём сколько есть.
    pub fn draw_n(&mut self, n: usize) -> Vec<Card> {
        let take = n.min(self.cards.len());
        self.cards.drain(..take).collect()
    }
}
