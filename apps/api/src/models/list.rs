//! Stable identity for list entries.
//!
//! Entries are addressed by an id assigned when they are created, never by their
//! current position. A position looked up from a stale id simply fails to resolve,
//! so interleaved reorders and removals can never touch the wrong entry.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(Uuid);

impl ItemId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for ItemId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

pub trait Identified {
    fn id(&self) -> ItemId;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

pub fn position_of<T: Identified>(items: &[T], id: ItemId) -> Option<usize> {
    items.iter().position(|item| item.id() == id)
}

/// Removes the entry with `id`, keeping the relative order of the rest.
/// Returns `false` when nothing matched.
pub fn remove_by_id<T: Identified>(items: &mut Vec<T>, id: ItemId) -> bool {
    match position_of(items, id) {
        Some(index) => {
            items.remove(index);
            true
        }
        None => false,
    }
}

/// Swaps the entry with `id` and its neighbour in `direction`.
/// Returns `false` for an unknown id or a move past either end.
pub fn move_by_id<T: Identified>(items: &mut [T], id: ItemId, direction: Direction) -> bool {
    let Some(index) = position_of(items, id) else {
        return false;
    };
    let target = match direction {
        Direction::Up => index.checked_sub(1),
        Direction::Down => Some(index + 1).filter(|t| *t < items.len()),
    };
    match target {
        Some(target) => {
            items.swap(index, target);
            true
        }
        None => false,
    }
}
