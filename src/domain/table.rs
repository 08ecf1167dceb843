use serde::{Deserialize, Serialize};

use crate::domain::card::Card;

/// Карты, лежащие на столе лицом вверх.
///
/// Порядок важен: по нему выбирается первая совпавшая карта
/// и идёт перебор подмножеств.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct TableCards {
    cards: Vec<Card>,
}

impl TableCards {
    pub fn from_cards(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    pub fn as_slice(&self) -> &[Card] {
        &self.cards
    }

    pub fn to_vec(&self) -> Vec<Card> {
        self.cards.clone()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Положить карту на стол (в конец).
    pub fn place(&mut self, card: Card) {
        self.cards.push(card);
    }

    /// Заменить содержимое стола целиком (рестарт).
    pub fn reset(&mut self, cards: Vec<Card>) {
        self.cards = cards;
    }

    /// Забрать карты по позициям: всё или ничего.
    ///
    /// Позиции сначала проверяются (в пределах стола, без повторов),
    /// и только потом стол меняется. При ошибке возвращаем None и стол
    /// остаётся нетронутым. Результат идёт в порядке позиций на столе.
    pub fn take_positions(&mut self, positions: &[usize]) -> Option<Vec<Card>> {
        let mut sorted = positions.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        if sorted.len() != positions.len() || sorted.iter().any(|&i| i >= self.cards.len()) {
            return None;
        }

        let mut taken = Vec::with_capacity(sorted.len());
        let mut kept = Vec::with_capacity(self.cards.len() - sorted.len());
        let mut next = sorted.iter().peekable();
        for (idx, card) in self.cards.drain(..).enumerate() {
            if next.peek() == Some(&&idx) {
                next.next();
                taken.push(card);
            } else {
                kept.push(card);
            }
        }
        self.cards = kept;
        Some(taken)
    }
}
