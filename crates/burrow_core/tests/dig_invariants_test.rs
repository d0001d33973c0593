//! # Dig Invariant Tests
//!
//! Frontier correctness and durability monotonicity over a whole world,
//! checked after the initial build and after every single hit.

use burrow_core::{AsciiTerrain, CellCoord, HitOutcome, MaterialKind, World};

const CAVERN: &str = "
    ##########
    #mm....#g#
    #m..##.#.#
    #..#cc...#
    #.##ss##.#
    #....d...#
    ##########
";

fn build(map: &str) -> World {
    World::builder()
        .terrain_source(AsciiTerrain::parse(map).expect("valid map"))
        .build()
        .expect("world builds")
}

/// `c ∈ frontier ⟺ solid(c) ∧ some 4-neighbor is walkable`, for every cell
/// in and around the bounds.
fn assert_frontier_invariant(world: &World) {
    for cell in world.bounds().expanded(1).iter() {
        let expected = world.is_solid(cell)
            && cell.neighbors4().iter().any(|n| world.is_walkable(*n));
        assert_eq!(
            world.frontier().contains(&cell),
            expected,
            "frontier membership wrong at {cell}"
        );
    }
    for cell in world.frontier() {
        assert!(world.bounds().contains(*cell), "frontier leaked outside bounds: {cell}");
    }
}

/// Test: The invariant holds right after the build.
#[test]
fn test_frontier_invariant_after_build() {
    let world = build(CAVERN);
    assert_frontier_invariant(&world);
    assert!(!world.frontier().contains(&CellCoord::new(0, 0)), "corner is buried");
}

/// Test: The invariant holds after every hit while the cavern is mined out.
#[test]
fn test_frontier_invariant_after_every_hit() {
    let mut world = build(CAVERN);
    let mut hits = 0;
    loop {
        // always strike the smallest frontier cell so the run is repeatable
        let Some(target) = world.frontier().iter().copied().min() else {
            break;
        };
        world.apply_hit(target, 1);
        hits += 1;
        assert_frontier_invariant(&world);
        assert!(hits < 10_000, "mining never finished");
    }
    assert_eq!(world.stats().solid_cells, 0, "every cell reachable from the cavern gets dug");
}

/// Test: Hits on empty or unknown cells change nothing.
#[test]
fn test_hit_on_non_solid_is_noop() {
    let mut world = build(CAVERN);
    let before = world.stats();
    assert_eq!(world.apply_hit(CellCoord::new(3, 1), 5), HitOutcome::Ignored);
    assert_eq!(world.apply_hit(CellCoord::new(-40, 90), 5), HitOutcome::Ignored);
    assert_eq!(world.stats(), before);
    assert_frontier_invariant(&world);
}

/// Test: Durability drops by max(1, d) per hit until the cell breaks.
#[test]
fn test_durability_monotonicity() {
    let mut world = build(CAVERN);
    for (cell, damage) in [(CellCoord::new(4, 3), 1), (CellCoord::new(5, 4), 0), (CellCoord::new(1, 1), 3)] {
        let mut last = world.durability(cell).expect("solid cell").current;
        loop {
            match world.apply_hit(cell, damage) {
                HitOutcome::Damaged { remaining, .. } => {
                    assert_eq!(remaining.current, last - damage.max(1));
                    last = remaining.current;
                }
                HitOutcome::Broken { .. } => {
                    assert!(last <= damage.max(1), "broke early at {last}");
                    break;
                }
                HitOutcome::Ignored => panic!("solid cell ignored a hit"),
            }
        }
        assert!(!world.is_solid(cell));
        assert!(world.durability(cell).is_none());
        assert!(!world.apply_hit(cell, damage).broke(), "further hits are no-ops");
    }
}

/// Test: Scenario - a lone solid in an open 10x10 room.
#[test]
fn test_lone_solid_scenario() {
    let mut rows = vec![".........."; 10];
    rows[5] = ".....#....";
    let world = build(&rows.join("\n"));
    let target = CellCoord::new(5, 5);
    assert_eq!(world.frontier().iter().copied().collect::<Vec<_>>(), vec![target]);
    assert_eq!(world.frontier_candidates(CellCoord::new(0, 0), 20, 5), vec![target]);
}

/// Test: Scenario - four unit hits break a 4 HP stone on the fourth.
#[test]
fn test_four_hit_scenario() {
    let mut world = build("...\n.#.\n...");
    let cell = CellCoord::new(1, 1);
    let broke: Vec<bool> = (0..4).map(|_| world.apply_hit(cell, 1).broke()).collect();
    assert_eq!(broke, vec![false, false, false, true]);
    assert!(!world.is_solid(cell));
}

/// Test: Scenario - trivial and enclosed paths.
#[test]
fn test_path_scenarios() {
    let world = build("
        .......
        ...#...
        ..#.#..
        ...#...
    ");
    let origin = CellCoord::new(0, 0);
    assert_eq!(world.find_path(origin, origin, 10), Some(vec![origin]));
    assert_eq!(world.find_path(origin, CellCoord::new(3, 2), 1000), None);
}

/// Test: Breaking a cell records the value axes of what was dug.
#[test]
fn test_break_reports_kind() {
    let mut world = build(CAVERN);
    let gold = CellCoord::new(8, 1);
    assert_eq!(world.value(gold), 40);
    let outcome = (0..4).map(|_| world.apply_hit(gold, 1)).last();
    assert_eq!(outcome, Some(HitOutcome::Broken { kind: MaterialKind::Gold }));
    assert_eq!(world.value(gold), 0);
}
