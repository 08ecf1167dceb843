// src/bin/chkobba_dev_cli.rs

use std::time::Duration;

use chkobba_engine::api::{dispatch, map_room_event, Intent, Outbound, ServerMessage};
use chkobba_engine::domain::{GameRoom, PlayerId};
use chkobba_engine::engine::{RoomEvent, RoomRegistry};
use chkobba_engine::infra::DeterministicRng;
use chkobba_engine::time_ctrl::GraceRules;
use tokio::sync::mpsc::UnboundedReceiver;

const ROOM: &str = "dev-room";
const MAX_STEPS: usize = 500;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("chkobba_dev_cli: стартуем dev-CLI одной комнаты…");

    let rules = load_rules();
    let seed = std::env::var("CHKOBBA_SEED")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or_else(rand::random);

    println!("[CLI] grace = {} сек, seed = {}", rules.grace_secs, seed);

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("[CLI] не удалось поднять tokio-рантайм: {e}");
            return;
        }
    };

    runtime.block_on(run(rules, seed));

    println!("[CLI] Завершение работы dev-CLI.");
}

/// Правила грейс-периода:
/// - первый аргумент: путь к JSON-конфигу (`{"grace_secs": 2}`);
/// - иначе переменная `CHKOBBA_GRACE_SECS`;
/// - иначе 1 сек (стандартные 30 сек для dev-прогона слишком долго).
fn load_rules() -> GraceRules {
    if let Some(path) = std::env::args().nth(1) {
        match std::fs::read_to_string(&path).map(|raw| GraceRules::from_json(&raw)) {
            Ok(Ok(rules)) => return rules,
            Ok(Err(e)) => eprintln!("[CLI] битый конфиг {path}: {e}"),
            Err(e) => eprintln!("[CLI] не читается {path}: {e}"),
        }
    }

    std::env::var("CHKOBBA_GRACE_SECS")
        .ok()
        .and_then(|s| s.parse::<u32>().ok())
        .map(GraceRules::new)
        .unwrap_or(GraceRules::new(1))
}

async fn run(rules: GraceRules, seed: u64) {
    let grace = rules.grace_period();
    let (registry, mut events) = RoomRegistry::new(rules, DeterministicRng::from_seed(seed));

    let players: Vec<PlayerId> = ["alice", "bob", "carol"].iter().map(|s| s.to_string()).collect();

    println!();
    println!("================ JOIN =================");
    for p in &players {
        send(&registry, Intent::Join { room: ROOM.into(), player: p.clone() });
    }
    debug_print_room(&registry);

    println!();
    println!("================ DISCONNECT bob =================");
    send(&registry, Intent::Disconnect { player: "bob".into() });

    // Пусть alice сыграет, ход уйдёт к carol (bob пропускается).
    play_one(&registry);
    play_one(&registry);

    tokio::time::sleep(grace + Duration::from_millis(100)).await;
    drain_events(&mut events);

    println!();
    println!("================ RECONNECT bob =================");
    send(&registry, Intent::Join { room: ROOM.into(), player: "bob".into() });

    println!();
    println!("================ PLAY UNTIL GAME OVER =================");
    for step in 0..MAX_STEPS {
        let Some(room) = registry.snapshot(ROOM) else {
            println!("[CLI] комната пропала");
            return;
        };

        if room.players.iter().any(|p| !room.hand(p).is_empty()) {
            play_one(&registry);
            continue;
        }

        let requester = room.players.first().cloned().unwrap_or_default();
        let out = send(&registry, Intent::Draw { room: ROOM.into(), player: requester });
        if out
            .iter()
            .any(|o| matches!(o.message, ServerMessage::GameOver(_)))
        {
            println!("[CLI] игра окончена на шаге {step}");
            break;
        }
    }

    debug_print_room(&registry);

    println!();
    println!("================ RESTART =================");
    send(&registry, Intent::Restart { room: ROOM.into() });
    debug_print_room(&registry);
}

/// Сыграть первую карту того, чей ход; если у него пусто: первого игрока с картами.
fn play_one(registry: &RoomRegistry<DeterministicRng>) {
    let Some(room) = registry.snapshot(ROOM) else {
        return;
    };

    let actor = room
        .current_turn
        .clone()
        .filter(|p| !room.hand(p).is_empty())
        .or_else(|| room.players.iter().find(|p| !room.hand(p).is_empty()).cloned());

    let Some(actor) = actor else {
        return;
    };
    let Some(card) = room.hand(&actor).first().copied() else {
        return;
    };

    println!("[CLI] {} играет {}", actor, card);
    send(registry, Intent::Play { room: ROOM.into(), player: actor, card });
}

fn send(registry: &RoomRegistry<DeterministicRng>, intent: Intent) -> Vec<Outbound> {
    let out = dispatch(registry, intent);
    for o in &out {
        print_outbound(o);
    }
    out
}

fn drain_events(events: &mut UnboundedReceiver<RoomEvent>) {
    while let Ok(event) = events.try_recv() {
        let RoomEvent::TurnSkipped { skipped, next, .. } = &event;
        println!("[CLI] таймер: ход {} пропущен, теперь ход {:?}", skipped, next);
        print_outbound(&map_room_event(event));
    }
}

fn print_outbound(o: &Outbound) {
    match o.message.to_json() {
        Ok(json) => println!("  -> {:?} {}", o.audience, json),
        Err(e) => println!("  -> {:?} <ошибка сериализации: {e}>", o.audience),
    }
}

fn debug_print_room(registry: &RoomRegistry<DeterministicRng>) {
    let Some(room) = registry.snapshot(ROOM) else {
        println!("[CLI] комнаты {} нет", ROOM);
        return;
    };
    print_room(&room);
}

fn print_room(room: &GameRoom) {
    println!(
        "[CLI] комната {}: колода={}, стол=[{}], ход={:?}",
        room.id,
        room.deck.len(),
        room.table
            .as_slice()
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(" "),
        room.current_turn
    );
    for p in &room.players {
        println!(
            "      {:<6} online={} рука={} взято={} chkobba={}",
            p,
            room.is_connected(p),
            room.hand(p).len(),
            room.eaten(p).len(),
            room.chkobba(p)
        );
    }
    if let Err(e) = room.check_invariants() {
        println!("[CLI] НАРУШЕН ИНВАРИАНТ: {e}");
    }
}
