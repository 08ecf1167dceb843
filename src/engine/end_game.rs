use std::collections::BTreeMap;

use crate::domain::{GameRoom, PlayerId};

/// Игра окончена: колода пуста и ни у кого нет карт на руках.
pub fn is_terminal(room: &GameRoom) -> bool {
    room.deck.is_empty() && room.players.iter().all(|p| room.hand(p).is_empty())
}

/// Итог игры: количество взятых карт у каждого игрока.
///
/// Это счёт-заглушка. Очки по правилам (больше всех карт, больше всех
/// бубен и т.п.) здесь не считаются.
pub fn results(room: &GameRoom) -> BTreeMap<PlayerId, usize> {
    room.players
        .iter()
        .map(|p| (p.clone(), room.eaten(p).len()))
        .collect()
}
