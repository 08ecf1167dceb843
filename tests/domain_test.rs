// tests/domain_test.rs
//
// Доменные типы: карта, колода, стол, инварианты комнаты.

use std::collections::HashSet;

use chkobba_engine::domain::{
    Card, CardParseError, Deck, GameRoom, Suit, TableCards, DECK_SIZE, INITIAL_TABLE_CARDS,
};

fn card(s: &str) -> Card {
    s.parse().expect("valid card")
}

//
// TEST 1 — текстовый формат карты
//
#[test]
fn card_display_and_parse_roundtrip() {
    let c = Card::new(Suit::Hearts, 13);
    assert_eq!(c.to_string(), "13h");
    assert_eq!(card("13h"), c);
    assert_eq!(card("1S"), Card::new(Suit::Spades, 1));
    assert_eq!(card(" 7d "), Card::new(Suit::Diamonds, 7));
}

//
// TEST 2 — битые строки карт дают ошибку, а не панику
//
#[test]
fn card_parse_errors() {
    assert!(matches!("".parse::<Card>(), Err(CardParseError::TooShort(_))));
    assert!(matches!("c".parse::<Card>(), Err(CardParseError::TooShort(_))));
    assert_eq!("5x".parse::<Card>(), Err(CardParseError::InvalidSuit('x')));
    assert!(matches!("0c".parse::<Card>(), Err(CardParseError::InvalidValue(_))));
    assert!(matches!("14c".parse::<Card>(), Err(CardParseError::InvalidValue(_))));
    assert!(matches!("ac".parse::<Card>(), Err(CardParseError::InvalidValue(_))));
}

//
// TEST 3 — карта в JSON как {suit, value} с короткими мастями
//
#[test]
fn card_serde_shape() {
    let json = serde_json::to_string(&Card::new(Suit::Clubs, 5)).unwrap();
    assert_eq!(json, r#"{"suit":"c","value":5}"#);

    let back: Card = serde_json::from_str(r#"{"suit":"s","value":12}"#).unwrap();
    assert_eq!(back, Card::new(Suit::Spades, 12));
}

//
// TEST 4 — стандартная колода: 52 уникальные карты 1..13 каждой масти
//
#[test]
fn standard_deck_has_52_unique_cards() {
    let deck = Deck::standard_52();
    assert_eq!(deck.len(), DECK_SIZE);

    let unique: HashSet<Card> = deck.cards.iter().copied().collect();
    assert_eq!(unique.len(), DECK_SIZE);

    for suit in Suit::ALL {
        let values: Vec<u8> = deck
            .cards
            .iter()
            .filter(|c| c.suit == suit)
            .map(|c| c.value)
            .collect();
        assert_eq!(values, (1..=13).collect::<Vec<u8>>());
    }
}

//
// TEST 5 — карты берутся спереди, короткая колода отдаёт сколько есть
//
#[test]
fn deck_draws_from_front() {
    let mut deck = Deck::standard_52();

    let table = deck.deal_initial();
    assert_eq!(table.len(), INITIAL_TABLE_CARDS);
    assert_eq!(table, vec![card("1c"), card("2c"), card("3c"), card("4c")]);

    let hand = deck.draw_n(3);
    assert_eq!(hand, vec![card("5c"), card("6c"), card("7c")]);
    assert_eq!(deck.len(), 52 - 7);

    let rest = deck.draw_n(100);
    assert_eq!(rest.len(), 45);
    assert!(deck.is_empty());
    assert!(deck.draw_n(3).is_empty());
}

//
// TEST 6 — снятие карт со стола: всё или ничего
//
#[test]
fn table_take_positions_is_all_or_nothing() {
    let mut table = TableCards::from_cards(vec![card("2c"), card("3d"), card("5h"), card("1s")]);

    // Позиция вне стола: стол не трогаем.
    assert_eq!(table.take_positions(&[0, 9]), None);
    assert_eq!(table.len(), 4);

    // Повтор позиции: тоже отказ.
    assert_eq!(table.take_positions(&[1, 1]), None);
    assert_eq!(table.len(), 4);

    let taken = table.take_positions(&[3, 1]).unwrap();
    assert_eq!(taken, vec![card("3d"), card("1s")]);
    assert_eq!(table.as_slice(), &[card("2c"), card("5h")]);
}

//
// TEST 7 — check_invariants ловит потерянные и задвоенные карты
//
#[test]
fn room_invariants_detect_violations() {
    let mut deck = Deck::standard_52();
    let table = deck.deal_initial();
    let mut room = GameRoom::new("r".into(), deck, table);
    assert_eq!(room.card_count(), 52);
    assert!(room.check_invariants().is_ok());

    // Потеряли карту.
    let lost = room.deck.cards.pop().unwrap();
    assert!(room.check_invariants().is_err());

    // Вернули, но задвоили другую.
    room.deck.cards.pop();
    room.deck.cards.push(lost);
    room.deck.cards.push(lost);
    assert_eq!(room.card_count(), 52);
    assert!(room.check_invariants().is_err());
}

//
// TEST 8 — current_turn должен указывать на игрока комнаты
//
#[test]
fn room_invariants_check_current_turn() {
    let mut deck = Deck::standard_52();
    let table = deck.deal_initial();
    let mut room = GameRoom::new("r".into(), deck, table);
    room.current_turn = Some("ghost".into());
    assert!(room.check_invariants().is_err());
}

//
// TEST 9 — номинал вне 1..=13 не проходит и через JSON
//
#[test]
fn card_json_rejects_out_of_range_value() {
    assert!(serde_json::from_str::<Card>(r#"{"suit":"c","value":200}"#).is_err());
    assert!(serde_json::from_str::<Card>(r#"{"suit":"c","value":0}"#).is_err());
    assert!(serde_json::from_str::<Card>(r#"{"suit":"h","value":14}"#).is_err());
    assert_eq!(
        serde_json::from_str::<Card>(r#"{"suit":"h","value":13}"#).unwrap(),
        Card::new(Suit::Hearts, 13)
    );
}
