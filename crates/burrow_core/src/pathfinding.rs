//! # Pathfinding
//!
//! A* over the 4-connected walkable grid with unit edge cost and a Manhattan
//! heuristic, plus a bounded breadth-first tree used to cost many stand cells
//! from one origin in a single pass.
//!
//! ## Budget
//!
//! Both searches stop after `max_expansions` popped nodes. Running out of
//! budget reports "unreachable", which callers treat like any other miss.
//!
//! ## Tie-breaking
//!
//! Open-set entries order by `(f, h, insertion sequence)`, so equal-cost
//! frontiers always resolve the same way for the same input.

use std::cmp::Reverse;
use std::collections::hash_map::Entry;
use std::collections::{BinaryHeap, HashMap, VecDeque};

use crate::cell::CellCoord;
use crate::walkability::WalkabilityMap;

/// Best-known cost and parent for a visited node.
#[derive(Clone, Copy)]
struct NodeRecord {
    g: u32,
    parent: Option<CellCoord>,
}

/// Shortest path from `start` to `goal`, both included.
///
/// `start == goal` on a walkable cell yields the single-cell path.
#[must_use]
pub fn find_path(
    map: &WalkabilityMap,
    start: CellCoord,
    goal: CellCoord,
    max_expansions: usize,
) -> Option<Vec<CellCoord>> {
    if !map.is_walkable(start) || !map.is_walkable(goal) {
        return None;
    }
    if start == goal {
        return Some(vec![start]);
    }

    let mut records: HashMap<CellCoord, NodeRecord> = HashMap::new();
    let mut open: BinaryHeap<Reverse<(u32, u32, u64, CellCoord)>> = BinaryHeap::new();
    let mut sequence: u64 = 0;
    let mut expansions = 0usize;

    records.insert(start, NodeRecord { g: 0, parent: None });
    let h0 = start.manhattan(goal);
    open.push(Reverse((h0, h0, sequence, start)));

    while let Some(Reverse((f, h, _, cell))) = open.pop() {
        let g = records[&cell].g;
        if g + h != f {
            // stale entry superseded by a cheaper push
            continue;
        }
        if cell == goal {
            return Some(reconstruct(&records, goal));
        }
        expansions += 1;
        if expansions > max_expansions {
            tracing::trace!(%start, %goal, max_expansions, "path search budget exhausted");
            return None;
        }

        for next in cell.neighbors4() {
            if !map.is_walkable(next) {
                continue;
            }
            let tentative = g + 1;
            let improved = match records.entry(next) {
                Entry::Occupied(mut slot) => {
                    if tentative < slot.get().g {
                        slot.insert(NodeRecord { g: tentative, parent: Some(cell) });
                        true
                    } else {
                        false
                    }
                }
                Entry::Vacant(slot) => {
                    slot.insert(NodeRecord { g: tentative, parent: Some(cell) });
                    true
                }
            };
            if improved {
                sequence += 1;
                let h_next = next.manhattan(goal);
                open.push(Reverse((tentative + h_next, h_next, sequence, next)));
            }
        }
    }
    None
}

fn reconstruct(records: &HashMap<CellCoord, NodeRecord>, goal: CellCoord) -> Vec<CellCoord> {
    let mut path = vec![goal];
    let mut cursor = goal;
    while let Some(parent) = records.get(&cursor).and_then(|r| r.parent) {
        path.push(parent);
        cursor = parent;
    }
    path.reverse();
    path
}

/// Shortest-path tree from one origin over walkable cells.
#[derive(Clone, Debug, Default)]
pub struct PathTree {
    origin: CellCoord,
    /// Distance and parent of every reached cell.
    reached: HashMap<CellCoord, (u32, Option<CellCoord>)>,
}

impl PathTree {
    /// Root of the tree.
    #[must_use]
    pub const fn origin(&self) -> CellCoord {
        self.origin
    }

    /// Steps from the origin to `cell`, if reached.
    #[must_use]
    pub fn distance(&self, cell: CellCoord) -> Option<u32> {
        self.reached.get(&cell).map(|(d, _)| *d)
    }

    /// Path from the origin to `cell`, both included.
    #[must_use]
    pub fn path_to(&self, cell: CellCoord) -> Option<Vec<CellCoord>> {
        self.reached.get(&cell)?;
        let mut path = vec![cell];
        let mut cursor = cell;
        while let Some((_, Some(parent))) = self.reached.get(&cursor) {
            path.push(*parent);
            cursor = *parent;
        }
        path.reverse();
        Some(path)
    }

    /// Number of reached cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.reached.len()
    }

    /// True when not even the origin was reached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reached.is_empty()
    }
}

/// Breadth-first expansion from `start`, capped at `max_expansions` nodes.
///
/// Empty when `start` itself is not walkable.
#[must_use]
pub fn reachable_from(map: &WalkabilityMap, start: CellCoord, max_expansions: usize) -> PathTree {
    let mut tree = PathTree {
        origin: start,
        reached: HashMap::new(),
    };
    if !map.is_walkable(start) {
        return tree;
    }

    let mut queue = VecDeque::from([start]);
    tree.reached.insert(start, (0, None));
    let mut expansions = 0usize;

    while let Some(cell) = queue.pop_front() {
        expansions += 1;
        if expansions > max_expansions {
            break;
        }
        let d = tree.reached[&cell].0;
        for next in cell.neighbors4() {
            if map.is_walkable(next) && !tree.reached.contains_key(&next) {
                tree.reached.insert(next, (d + 1, Some(cell)));
                queue.push_back(next);
            }
        }
    }
    tree
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::GridBounds;
    use crate::grid::GridIndex;
    use crate::material::MaterialKind;

    fn open_map(width: u32, height: u32) -> (GridIndex, WalkabilityMap) {
        let mut grid = GridIndex::new();
        grid.extend_bounds(GridBounds::from_origin(CellCoord::new(0, 0), width, height));
        let map = WalkabilityMap::from_grid(&grid);
        (grid, map)
    }

    fn assert_valid_path(map: &WalkabilityMap, path: &[CellCoord], a: CellCoord, b: CellCoord) {
        assert_eq!(path.first(), Some(&a));
        assert_eq!(path.last(), Some(&b));
        for pair in path.windows(2) {
            assert!(pair[0].is_adjacent4(pair[1]), "{} -> {} not adjacent", pair[0], pair[1]);
        }
        assert!(path.iter().all(|c| map.is_walkable(*c)));
    }

    #[test]
    fn test_trivial_path() {
        let (_, map) = open_map(4, 4);
        let origin = CellCoord::new(0, 0);
        assert_eq!(find_path(&map, origin, origin, 16), Some(vec![origin]));
    }

    #[test]
    fn test_open_field_is_manhattan() {
        let (_, map) = open_map(20, 20);
        let a = CellCoord::new(1, 2);
        let b = CellCoord::new(15, 17);
        let path = find_path(&map, a, b, 10_000).expect("open field must be reachable");
        assert_valid_path(&map, &path, a, b);
        assert_eq!(path.len() as u32 - 1, a.manhattan(b));
    }

    #[test]
    fn test_enclosed_goal_is_unreachable() {
        let (mut grid, _) = open_map(10, 10);
        let goal = CellCoord::new(5, 5);
        for n in goal.neighbors4() {
            grid.set_solid(n, MaterialKind::Stone);
        }
        let map = WalkabilityMap::from_grid(&grid);
        assert_eq!(find_path(&map, CellCoord::new(0, 0), goal, 10_000), None);
    }

    #[test]
    fn test_detour_around_wall() {
        let (mut grid, _) = open_map(9, 9);
        for y in 0..8 {
            grid.set_solid(CellCoord::new(4, y), MaterialKind::Stone);
        }
        let map = WalkabilityMap::from_grid(&grid);
        let a = CellCoord::new(0, 0);
        let b = CellCoord::new(8, 0);
        let path = find_path(&map, a, b, 10_000).expect("gap at the bottom row");
        assert_valid_path(&map, &path, a, b);
        assert_eq!(path.len() - 1, 8 + 2 * 8);
    }

    #[test]
    fn test_budget_exhaustion() {
        let (_, map) = open_map(64, 64);
        assert!(find_path(&map, CellCoord::new(0, 0), CellCoord::new(63, 63), 10).is_none());
    }

    #[test]
    fn test_deterministic_paths() {
        let (_, map) = open_map(12, 12);
        let a = CellCoord::new(0, 0);
        let b = CellCoord::new(9, 7);
        let first = find_path(&map, a, b, 1000);
        for _ in 0..5 {
            assert_eq!(find_path(&map, a, b, 1000), first);
        }
    }

    #[test]
    fn test_reachable_tree_matches_astar_lengths() {
        let (mut grid, _) = open_map(10, 10);
        for y in 1..10 {
            grid.set_solid(CellCoord::new(3, y), MaterialKind::Mud);
        }
        let map = WalkabilityMap::from_grid(&grid);
        let origin = CellCoord::new(0, 5);
        let tree = reachable_from(&map, origin, 1000);
        for target in [CellCoord::new(9, 9), CellCoord::new(5, 0), CellCoord::new(0, 0)] {
            let astar = find_path(&map, origin, target, 1000).expect("reachable");
            assert_eq!(tree.distance(target), Some(astar.len() as u32 - 1));
            let tree_path = tree.path_to(target).expect("in tree");
            assert_valid_path(&map, &tree_path, origin, target);
        }
        assert_eq!(tree.distance(CellCoord::new(3, 4)), None, "solid cells are never reached");
    }
}
