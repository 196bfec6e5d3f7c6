//! Breadth-first searches over the board.

use std::collections::VecDeque;

use crate::board::{Adjacency, IslandGrid, TileId};

/// Tiles the Diver can reach from `from`, with the step count to each.
///
/// Sunk and flooded positions are passable; every non-sunk tile reached is a
/// destination. Dry tiles end a path. Only positions that ever held a tile
/// are part of the board. Results come out in BFS order.
#[must_use]
pub fn swim_reach(grid: &IslandGrid, from: TileId) -> Vec<(TileId, u8)> {
    let tiles = grid.all_tiles();
    let Some(start) = grid.get(from) else {
        return Vec::new();
    };

    let mut visited = vec![false; tiles.len()];
    visited[from.index()] = true;
    let mut queue = VecDeque::from([(start.coord, 0u8)]);
    let mut reached = Vec::new();

    while let Some((coord, depth)) = queue.pop_front() {
        for next in coord.neighbors(Adjacency::Orthogonal) {
            let Some(id) = grid.placed_at(next) else {
                continue;
            };
            if std::mem::replace(&mut visited[id.index()], true) {
                continue;
            }
            let Some(tile) = grid.get(id) else {
                continue;
            };
            if !tile.is_sunk() {
                reached.push((id, depth + 1));
            }
            if tile.is_sunk() || tile.is_flooded() {
                queue.push_back((tile.coord, depth + 1));
            }
        }
    }
    reached
}

/// Active tiles within `max_steps` adjacent steps of `from`, walking only
/// over tiles still in play. `from` itself is excluded.
#[must_use]
pub fn walk_reach(grid: &IslandGrid, from: TileId, adjacency: Adjacency, max_steps: u8) -> Vec<TileId> {
    let mut visited = vec![false; grid.all_tiles().len()];
    if let Some(slot) = visited.get_mut(from.index()) {
        *slot = true;
    }
    let mut queue = VecDeque::from([(from, 0u8)]);
    let mut reached = Vec::new();

    while let Some((id, depth)) = queue.pop_front() {
        if depth == max_steps {
            continue;
        }
        for next in grid.neighbors(id, adjacency) {
            if std::mem::replace(&mut visited[next.index()], true) {
                continue;
            }
            reached.push(next);
            queue.push_back((next, depth + 1));
        }
    }
    reached
}
