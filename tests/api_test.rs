// tests/api_test.rs
//
// Внешний слой: Intent → dispatch → Outbound.
//  - вход → initial_state только вошедшему;
//  - ход / рестарт → update_state всей комнате;
//  - отказ в доборе → draw_rejected только запросившему;
//  - ошибки клиента → тишина;
//  - полная партия до game_over;
//  - JSON формы запросов и ответов;
//  - события таймеров и read-only запросы.

use chkobba_engine::api::{
    dispatch, draw_rejected, map_room_event, run_query, ApiError, Audience, Intent, Outbound, Query,
    QueryResponse, ServerMessage, DRAW_REJECTED_REASON,
};
use chkobba_engine::domain::{Card, Suit};
use chkobba_engine::engine::{RoomEvent, RoomRegistry};
use chkobba_engine::infra::NoShuffle;
use chkobba_engine::time_ctrl::GraceRules;

const ROOM: &str = "api-room";

fn registry() -> RoomRegistry<NoShuffle> {
    let (registry, _events) = RoomRegistry::new(GraceRules::standard(), NoShuffle);
    registry
}

fn join(registry: &RoomRegistry<NoShuffle>, player: &str) -> Vec<Outbound> {
    dispatch(
        registry,
        Intent::Join {
            room: ROOM.into(),
            player: player.into(),
        },
    )
}

fn play(registry: &RoomRegistry<NoShuffle>, player: &str, card: Card) -> Vec<Outbound> {
    dispatch(
        registry,
        Intent::Play {
            room: ROOM.into(),
            player: player.into(),
            card,
        },
    )
}

fn draw(registry: &RoomRegistry<NoShuffle>, player: &str) -> Vec<Outbound> {
    dispatch(
        registry,
        Intent::Draw {
            room: ROOM.into(),
            player: player.into(),
        },
    )
}

//
// TEST 1 — вход: initial_state только вошедшему
//
#[test]
fn join_sends_initial_state_to_joiner_only() {
    let registry = registry();

    let out = join(&registry, "alice");

    assert_eq!(out.len(), 1);
    assert_eq!(out[0].room, ROOM);
    assert_eq!(out[0].audience, Audience::Player("alice".into()));
    let ServerMessage::InitialState(view) = &out[0].message else {
        panic!("expected initial_state, got {:?}", out[0].message);
    };
    assert_eq!(view.hand.len(), 3);
    assert_eq!(view.table_cards.len(), 4);
    assert!(view.eaten_cards.is_empty());
    assert_eq!(view.chkobba, 0);
    assert_eq!(view.current_turn.as_deref(), Some("alice"));

    let json = out[0].message.to_json().unwrap();
    assert!(json.contains(r#""event":"initial_state""#), "{json}");
    assert!(json.contains(r#"{"suit":"c","value":5}"#), "{json}");
}

//
// TEST 2 — ход: update_state всей комнате
//
#[test]
fn play_broadcasts_update_state() {
    let registry = registry();
    join(&registry, "alice");
    join(&registry, "bob");

    // Стол 1c 2c 3c 4c, у alice 5c 6c 7c: 5 = 1 + 4.
    let out = play(&registry, "alice", "5c".parse().unwrap());

    assert_eq!(out.len(), 1);
    assert_eq!(out[0].audience, Audience::Room);
    let ServerMessage::UpdateState(state) = &out[0].message else {
        panic!("expected update_state, got {:?}", out[0].message);
    };
    let c = |s: &str| s.parse::<Card>().unwrap();
    assert_eq!(state.table_cards, vec![c("2c"), c("3c")]);
    assert_eq!(state.eaten_cards["alice"], vec![c("1c"), c("4c"), c("5c")]);
    assert_eq!(state.hands["alice"], vec![c("6c"), c("7c")]);
    assert_eq!(state.current_turn.as_deref(), Some("bob"));
    assert!(out[0]
        .message
        .to_json()
        .unwrap()
        .contains(r#""event":"update_state""#));
}

//
// TEST 3 — ошибки клиента: тишина и никаких изменений
//
#[test]
fn client_errors_are_silent() {
    let registry = registry();
    join(&registry, "alice");
    let before = registry.snapshot(ROOM).unwrap();

    // Карты нет на руке.
    assert!(play(&registry, "alice", Card::new(Suit::Hearts, 13)).is_empty());
    // Неизвестный игрок.
    assert!(play(&registry, "ghost", "5c".parse().unwrap()).is_empty());
    assert!(draw(&registry, "ghost").is_empty());
    // Неизвестная комната.
    let out = dispatch(
        &registry,
        Intent::Play {
            room: "nope".into(),
            player: "alice".into(),
            card: "5c".parse().unwrap(),
        },
    );
    assert!(out.is_empty());
    assert!(dispatch(&registry, Intent::Restart { room: "nope".into() }).is_empty());

    assert_eq!(registry.snapshot(ROOM).unwrap(), before);
    assert!(!registry.has_room("nope"));
}

//
// TEST 4 — добор при картах на руках: отказ только запросившему
//
#[test]
fn draw_rejected_goes_to_requester_only() {
    let registry = registry();
    join(&registry, "alice");
    join(&registry, "bob");
    let before = registry.snapshot(ROOM).unwrap();

    let out = draw(&registry, "bob");

    assert_eq!(out.len(), 1);
    assert_eq!(out[0].audience, Audience::Player("bob".into()));
    assert_eq!(out[0].message, draw_rejected());
    let ServerMessage::DrawRejected(dto) = &out[0].message else {
        panic!("expected draw_rejected");
    };
    assert_eq!(dto.reason, DRAW_REJECTED_REASON);
    assert_eq!(registry.snapshot(ROOM).unwrap(), before);
}

//
// TEST 5 — полная партия через dispatch до game_over
//
#[test]
fn full_game_ends_with_game_over() {
    let registry = registry();
    join(&registry, "alice");
    join(&registry, "bob");

    let mut game_over = None;
    for _ in 0..500 {
        let room = registry.snapshot(ROOM).unwrap();
        let holder = room
            .players
            .iter()
            .find(|p| !room.hand(p).is_empty())
            .cloned();

        match holder {
            Some(player) => {
                let card = room.hand(&player)[0];
                assert_eq!(play(&registry, &player, card).len(), 1);
            }
            None => {
                let out = draw(&registry, "alice");
                assert!(matches!(out[0].message, ServerMessage::UpdateState(_)));
                if let Some(last) = out.get(1) {
                    game_over = Some(last.clone());
                    break;
                }
            }
        }
    }

    let last = game_over.expect("game did not finish");
    assert_eq!(last.audience, Audience::Room);
    let ServerMessage::GameOver(dto) = &last.message else {
        panic!("expected game_over, got {:?}", last.message);
    };

    let room = registry.snapshot(ROOM).unwrap();
    assert!(room.deck.is_empty());
    for p in &room.players {
        assert_eq!(dto.results[p], room.eaten(p).len());
    }
    let eaten: usize = dto.results.values().sum();
    assert_eq!(eaten + room.table.len(), 52);
    assert!(last.message.to_json().unwrap().contains(r#""event":"game_over""#));

    // Рестарт после конца игры.
    let out = dispatch(&registry, Intent::Restart { room: ROOM.into() });
    assert_eq!(out.len(), 1);
    let ServerMessage::UpdateState(state) = &out[0].message else {
        panic!("expected update_state after restart");
    };
    assert_eq!(state.table_cards.len(), 4);
    assert_eq!(state.hands["alice"].len(), 3);
    assert_eq!(state.hands["bob"].len(), 3);
    assert!(state.eaten_cards.values().all(|e| e.is_empty()));
    assert_eq!(state.current_turn.as_deref(), Some("alice"));
}

//
// TEST 6 — разбор JSON-запросов
//
#[test]
fn intents_parse_from_json() {
    let play = Intent::from_json(
        r#"{"intent":"play","room":"r","player":"a","card":{"suit":"c","value":5}}"#,
    )
    .unwrap();
    assert_eq!(
        play,
        Intent::Play {
            room: "r".into(),
            player: "a".into(),
            card: Card::new(Suit::Clubs, 5),
        }
    );

    assert_eq!(
        Intent::from_json(r#"{"intent":"disconnect","player":"a"}"#).unwrap(),
        Intent::Disconnect { player: "a".into() }
    );
    assert_eq!(
        Intent::from_json(r#"{"intent":"restart","room":"r"}"#).unwrap(),
        Intent::Restart { room: "r".into() }
    );

    assert!(Intent::from_json(r#"{"intent":"fold","room":"r"}"#).is_err());
    assert!(Intent::from_json(
        r#"{"intent":"play","room":"r","player":"a","card":{"suit":"x","value":5}}"#
    )
    .is_err());
    assert!(matches!(
        Intent::from_json(
            r#"{"intent":"play","room":"r","player":"a","card":{"suit":"c","value":200}}"#
        ),
        Err(ApiError::BadRequest(_))
    ));
}

//
// TEST 7 — дисконнект без рантайма и неизвестного игрока: тишина
//
#[test]
fn disconnect_produces_no_messages() {
    let registry = registry();
    join(&registry, "alice");

    assert!(dispatch(&registry, Intent::Disconnect { player: "ghost".into() }).is_empty());
    assert!(dispatch(&registry, Intent::Disconnect { player: "alice".into() }).is_empty());
    assert!(!registry.snapshot(ROOM).unwrap().is_connected("alice"));
}

//
// TEST 8 — событие таймера превращается в update_state для комнаты
//
#[test]
fn room_event_maps_to_room_broadcast() {
    let registry = registry();
    join(&registry, "alice");
    join(&registry, "bob");
    let room = registry.snapshot(ROOM).unwrap();

    let out = map_room_event(RoomEvent::TurnSkipped {
        room: room.clone(),
        skipped: "alice".into(),
        next: Some("bob".into()),
    });

    assert_eq!(out.room, ROOM);
    assert_eq!(out.audience, Audience::Room);
    let ServerMessage::UpdateState(state) = out.message else {
        panic!("expected update_state");
    };
    assert_eq!(state.hands.len(), 2);
    assert_eq!(state.current_turn, room.current_turn);
}

//
// TEST 9 — read-only запросы
//
#[test]
fn queries_report_rooms() {
    let registry = registry();
    assert_eq!(
        run_query(&registry, &Query::ListRooms),
        Some(QueryResponse::Rooms(Vec::new()))
    );

    join(&registry, "alice");
    join(&registry, "bob");

    assert_eq!(
        run_query(&registry, &Query::ListRooms),
        Some(QueryResponse::Rooms(vec![ROOM.to_string()]))
    );
    assert_eq!(run_query(&registry, &Query::GetRoom { room: "nope".into() }), None);

    let Some(QueryResponse::Room(snapshot)) =
        run_query(&registry, &Query::GetRoom { room: ROOM.into() })
    else {
        panic!("expected room snapshot");
    };
    assert_eq!(snapshot.players, vec!["alice".to_string(), "bob".to_string()]);
    assert_eq!(snapshot.deck_remaining, 52 - 4 - 6);
    assert!(snapshot.connected.values().all(|c| *c));
    assert_eq!(snapshot.state.table_cards.len(), 4);
}
