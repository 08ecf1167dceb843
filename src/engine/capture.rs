// src/engine/capture.rs
//! Разрешение взятки: точное совпадение номинала, затем поиск подмножества
//! карт стола с суммой, равной номиналу сыгранной карты.

use serde::{Deserialize, Serialize};

use crate::domain::Card;

/// Что должна сделать сыгранная карта со столом.
///
/// План чистый: считается по срезу карт стола и ничего не меняет.
/// Применяется одним атомарным шагом в `game_loop::play_card`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CapturePlan {
    /// Забрать одну карту того же номинала (позиция на столе).
    Match { position: usize },
    /// Забрать набор карт, сумма которых равна номиналу (позиции по возрастанию).
    Sum { positions: Vec<usize> },
    /// Взятки нет: карта ложится на стол.
    Place,
}

impl CapturePlan {
    /// Позиции на столе, которые уходят во взятку.
    pub fn positions(&self) -> Vec<usize> {
        match self {
            CapturePlan::Match { position } => vec![*position],
            CapturePlan::Sum { positions } => positions.clone(),
            CapturePlan::Place => Vec::new(),
        }
    }

    pub fn is_capture(&self) -> bool {
        !matches!(self, CapturePlan::Place)
    }
}

/// Итог применённого хода.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CaptureOutcome {
    /// Все взятые карты: карты стола, затем сыгранная карта. Пусто, если взятки нет.
    pub captured: Vec<Card>,
    /// Стол опустел после взятки (chkobba).
    pub sweep: bool,
}

/// Решить, что забирает `played` со стола `table`.
///
/// 1. Первая по порядку стола карта того же номинала.
/// 2. Иначе: первое подмножество, найденное поиском в глубину по позициям.
/// 3. Иначе: взятки нет.
///
/// Если подходящих подмножеств несколько, берётся первое найденное.
pub fn resolve_capture(table: &[Card], played: Card) -> CapturePlan {
    if let Some(position) = table.iter().position(|c| c.value == played.value) {
        return CapturePlan::Match { position };
    }

    match find_subset_sum(table, u32::from(played.value)) {
        Some(positions) => CapturePlan::Sum { positions },
        None => CapturePlan::Place,
    }
}

/// Первое (в порядке DFS по позициям) непустое подмножество карт с суммой `target`.
///
/// Перебор экспоненциальный, но стол маленький.
pub fn find_subset_sum(cards: &[Card], target: u32) -> Option<Vec<usize>> {
    if target == 0 {
        return None;
    }
    let mut path = Vec::with_capacity(cards.len());
    if backtrack(cards, target, 0, 0, &mut path) {
        Some(path)
    } else {
        None
    }
}

fn backtrack(cards: &[Card], target: u32, start: usize, sum: u32, path: &mut Vec<usize>) -> bool {
    if sum == target {
        return true;
    }
    if sum > target || start == cards.len() {
        return false;
    }

    for i in start..cards.len() {
        path.push(i);
        if backtrack(cards, target, i + 1, sum + u32::from(cards[i].value), path) {
            return true;
        }
        path.pop();
    }
    false
}
