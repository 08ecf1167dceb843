use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Масть карты.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub enum Suit {
    #[serde(rename = "c")]
    Clubs, // ♣
    #[serde(rename = "d")]
    Diamonds, // ♦
    #[serde(rename = "h")]
    Hearts, // ♥
    #[serde(rename = "s")]
    Spades, // ♠
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Clubs, Suit::Diamonds, Suit::Hearts, Suit::Spades];
}

/// Минимальный и максимальный номинал карты.
pub const MIN_VALUE: u8 = 1;
pub const MAX_VALUE: u8 = 13;

/// Карта: масть + номинал 1..=13.
///
/// Карта: чистое значение: две карты с одинаковыми (suit, value) неразличимы,
/// а в одной колоде такая пара встречается ровно один раз.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "WireCard")]
pub struct Card {
    pub suit: Suit,
    pub value: u8,
}

impl Card {
    pub const fn new(suit: Suit, value: u8) -> Self {
        Self { suit, value }
    }
}

/// Карта в том виде, как она приходит с провода (номинал ещё не проверен).
#[derive(Deserialize)]
struct WireCard {
    suit: Suit,
    value: u8,
}

impl TryFrom<WireCard> for Card {
    type Error = CardParseError;

    fn try_from(raw: WireCard) -> Result<Self, Self::Error> {
        check_value(raw.value)?;
        Ok(Card::new(raw.suit, raw.value))
    }
}

fn check_value(value: u8) -> Result<u8, CardParseError> {
    if (MIN_VALUE..=MAX_VALUE).contains(&value) {
        Ok(value)
    } else {
        Err(CardParseError::InvalidValue(value.to_string()))
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ch = match self {
            Suit::Clubs => 'c',
            Suit::Diamonds => 'd',
            Suit::Hearts => 'h',
            Suit::Spades => 's',
        };
        write!(f, "{ch}")
    }
}

impl fmt::Display for Card {
    /// Формат вида `5c`, `13h`, `1s`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.suit)
    }
}

/// Ошибки разбора текстового представления карты.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CardParseError {
    #[error("Строка карты слишком короткая: {0:?}")]
    TooShort(String),

    #[error("Недопустимая масть: {0}")]
    InvalidSuit(char),

    #[error("Недопустимый номинал: {0:?}")]
    InvalidValue(String),
}

/// Парсинг строки вида "5c", "13h", "1S".
impl FromStr for Card {
    type Err = CardParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let mut chars = s.chars();
        let suit_ch = match chars.next_back() {
            Some(ch) if !chars.as_str().is_empty() => ch,
            _ => return Err(CardParseError::TooShort(s.to_string())),
        };
        let value_str = chars.as_str();

        let suit = match suit_ch {
            'c' | 'C' => Suit::Clubs,
            'd' | 'D' => Suit::Diamonds,
            'h' | 'H' => Suit::Hearts,
            's' | 'S' => Suit::Spades,
            other => return Err(CardParseError::InvalidSuit(other)),
        };

        let value: u8 = value_str
            .parse()
            .map_err(|_| CardParseError::InvalidValue(value_str.to_string()))?;
        let value = check_value(value)?;

        Ok(Card { suit, value })
    }
}
