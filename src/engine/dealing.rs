// src/engine/dealing.rs

/// Стандартный размер раздачи на руку.
pub const HAND_SIZE: usize = 3;

/// Сколько карт получит каждый игрок при доборе (в порядке `players`).
///
/// - хватает на всех по 3: каждому по 3;
/// - иначе `base = r / n` каждому и ещё по одной первым `r % n` игрокам.
pub fn deal_shares(player_count: usize, remaining: usize) -> Vec<usize> {
    if player_count == 0 {
        return Vec::new();
    }

    if remaining >= HAND_SIZE * player_count {
        return vec![HAND_SIZE; player_count];
    }

    let base = remaining / player_count;
    let extra = remaining % player_count;
    (0..player_count)
        .map(|i| if i < extra { base + 1 } else { base })
        .collect()
}
