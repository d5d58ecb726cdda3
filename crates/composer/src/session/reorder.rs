//! Reordering of the block list.
//!
//! Every operation relocates exactly one element; all other instances keep
//! their relative order and their identity, so prop state and error-map
//! keys stay valid across moves. Out-of-range moves (first up, last down)
//! and moves that would land an element where it already is are no-ops.

use uuid::Uuid;

use crate::models::BlockInstance;

fn position(blocks: &[BlockInstance], id: Uuid) -> Option<usize> {
    blocks.iter().position(|b| b.id == id)
}

/// Move a block one step towards the front. No-op for the first element
/// or an unknown id.
pub fn move_up(blocks: &mut [BlockInstance], id: Uuid) -> bool {
    match position(blocks, id) {
        Some(i) if i > 0 => {
            blocks.swap(i - 1, i);
            true
        }
        _ => false,
    }
}

/// Move a block one step towards the back. No-op for the last element or
/// an unknown id.
pub fn move_down(blocks: &mut [BlockInstance], id: Uuid) -> bool {
    match position(blocks, id) {
        Some(i) if i + 1 < blocks.len() => {
            blocks.swap(i, i + 1);
            true
        }
        _ => false,
    }
}

/// Move a block directly before `anchor`.
pub fn move_before(blocks: &mut Vec<BlockInstance>, id: Uuid, anchor: Uuid) -> bool {
    relocate(blocks, id, anchor, false)
}

/// Move a block directly after `anchor`.
pub fn move_after(blocks: &mut Vec<BlockInstance>, id: Uuid, anchor: Uuid) -> bool {
    relocate(blocks, id, anchor, true)
}

fn relocate(blocks: &mut Vec<BlockInstance>, id: Uuid, anchor: Uuid, after: bool) -> bool {
    if id == anchor {
        return false;
    }
    let (Some(from), Some(anchor_pos)) = (position(blocks, id), position(blocks, anchor)) else {
        return false;
    };

    // Index the moved element will occupy once removed from `from`.
    let mut to = if from < anchor_pos {
        anchor_pos - 1
    } else {
        anchor_pos
    };
    if after {
        to += 1;
    }

    if to == from {
        return false;
    }

    let moved = blocks.remove(from);
    blocks.insert(to, moved);
    true
}
