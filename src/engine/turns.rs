use std::collections::HashMap;

use crate::domain::PlayerId;

/// Найти следующего подключённого игрока по кругу после `start` (не включая его).
///
/// Если круг замкнулся на `start` и другого подключённого игрока нет: None.
pub fn next_connected_after(
    players: &[PlayerId],
    connected: &HashMap<PlayerId, bool>,
    start: usize,
) -> Option<PlayerId> {
    let n = players.len();
    if n == 0 {
        return None;
    }

    let start = start % n;
    (1..n)
        .map(|step| &players[(start + step) % n])
        .find(|p| connected.get(*p).copied().unwrap_or(false))
        .cloned()
}
