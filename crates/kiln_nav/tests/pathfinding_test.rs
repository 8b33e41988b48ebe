//! # Pathfinding Integration Tests
//!
//! Scenario coverage for every strategy against the public API.

use kiln_nav::{NavConfig, PathFinder, PathStrategy, StrategyBudgets, TileMetric, TilePos};

fn p(x: i32, y: i32) -> TilePos {
    TilePos::new(x, y)
}

fn assert_connected(path: &[TilePos]) {
    for pair in path.windows(2) {
        let dx = (pair[1].x - pair[0].x).abs();
        let dy = (pair[1].y - pair[0].y).abs();
        assert!(dx <= 1 && dy <= 1 && dx + dy > 0, "gap between {:?} and {:?}", pair[0], pair[1]);
    }
}

// ── A* ────────────────────────────────────────────────────────────────────────

/// Test: 100×100 open grid, (0,0) → (10,10) is ten diagonal steps.
#[test]
fn test_open_grid_diagonal_is_ten_steps() {
    let finder = PathFinder::new(100, 100);
    let path = finder.find_path(p(0, 0), p(10, 10), PathStrategy::BoundedAStarLarge, 8);

    assert_eq!(path.len(), 11);
    assert_eq!(path.first(), Some(&p(0, 0)));
    assert_eq!(path.last(), Some(&p(10, 10)));
    for pair in path.windows(2) {
        assert!(pair[1].x > pair[0].x && pair[1].y > pair[0].y, "not monotonic: {pair:?}");
    }
}

#[test]
fn test_astar_avoids_single_obstacle() {
    let mut finder = PathFinder::new(100, 100);
    finder.set_obstacle(5, 5, true, true);
    let path = finder.find_path(p(0, 0), p(10, 10), PathStrategy::BoundedAStarLarge, 8);

    assert_eq!(path.first(), Some(&p(0, 0)));
    assert_eq!(path.last(), Some(&p(10, 10)));
    assert!(!path.contains(&p(5, 5)));
    assert_connected(&path);
}

#[test]
fn test_astar_routes_around_wall() {
    let mut finder = PathFinder::new(100, 100);
    for y in 0..8 {
        finder.set_obstacle(5, y, true, true);
    }
    let path = finder.find_path(p(0, 4), p(10, 4), PathStrategy::BoundedAStarLarge, 8);

    assert_eq!(path.first(), Some(&p(0, 4)));
    assert_eq!(path.last(), Some(&p(10, 4)));
    assert!(path.iter().all(|t| !(t.x == 5 && t.y < 8)));
    assert_connected(&path);
}

#[test]
fn test_unreachable_goal_is_empty_for_every_search() {
    let mut finder = PathFinder::new(100, 100);
    for dy in -1..=1 {
        for dx in -1..=1 {
            if dx != 0 || dy != 0 {
                finder.set_obstacle(50 + dx, 50 + dy, true, false);
            }
        }
    }
    for strategy in [
        PathStrategy::GreedyBestFirst,
        PathStrategy::BoundedAStar,
        PathStrategy::BoundedAStarLarge,
    ] {
        assert!(finder.find_path(p(0, 0), p(50, 50), strategy, 8).is_empty());
    }
}

#[test]
fn test_tiny_budget_gives_up() {
    let config = NavConfig {
        budgets: StrategyBudgets {
            astar: 1,
            ..StrategyBudgets::default()
        },
        ..NavConfig::default()
    };
    let finder = PathFinder::with_config(50, 50, config);
    assert!(finder
        .find_path(p(0, 0), p(40, 40), PathStrategy::BoundedAStar, 8)
        .is_empty());
}

// ── Corner sealing ────────────────────────────────────────────────────────────

#[test]
fn test_hard_diagonal_seals_corner() {
    let mut finder = PathFinder::new(5, 5);
    finder.set_obstacle(1, 1, true, true);
    // From (0,0) the only in-bounds moves are E, S and SE; SE is blocked and
    // the hard corner seals E and S.
    assert!(finder
        .find_path(p(0, 0), p(2, 0), PathStrategy::BoundedAStarLarge, 8)
        .is_empty());
}

#[test]
fn test_soft_diagonal_does_not_seal_corner() {
    let mut finder = PathFinder::new(5, 5);
    finder.set_obstacle(1, 1, true, false);
    let path = finder.find_path(p(0, 0), p(2, 0), PathStrategy::BoundedAStarLarge, 8);
    assert_eq!(path, vec![p(0, 0), p(1, 0), p(2, 0)]);
}

#[test]
fn test_goal_is_exempt_from_sealing() {
    let mut finder = PathFinder::new(5, 5);
    finder.set_obstacle(1, 1, true, true);
    let path = finder.find_path(p(0, 0), p(1, 0), PathStrategy::BoundedAStar, 8);
    assert_eq!(path, vec![p(0, 0), p(1, 0)]);
}

// ── Dynamic obstacles ─────────────────────────────────────────────────────────

#[test]
fn test_dynamic_obstacle_forces_detour() {
    let finder = PathFinder::new(20, 20);
    let direct = finder.find_path(p(0, 0), p(10, 10), PathStrategy::BoundedAStarLarge, 8);
    assert!(direct.contains(&p(5, 5)));

    let detour = finder.find_path_with_dynamic(
        p(0, 0),
        p(10, 10),
        PathStrategy::BoundedAStarLarge,
        8,
        &[p(5, 5), p(-3, 7), p(99, 99)],
    );
    assert_eq!(detour.last(), Some(&p(10, 10)));
    assert!(!detour.contains(&p(5, 5)));
    assert_connected(&detour);

    // The grid itself is untouched.
    assert!(!finder.is_blocked(5, 5));
}

// ── Immediate step ────────────────────────────────────────────────────────────

#[test]
fn test_step_walks_straight_to_near_goal() {
    let finder = PathFinder::new(10, 10);
    let path = finder.find_path(p(0, 0), p(3, 0), PathStrategy::ImmediateStep, 8);
    assert_eq!(path, vec![p(0, 0), p(1, 0), p(2, 0), p(3, 0)]);
}

#[test]
fn test_step_returns_partial_path_for_far_goal() {
    let finder = PathFinder::new(100, 100);
    let path = finder.find_path(p(0, 0), p(60, 0), PathStrategy::ImmediateStep, 8);
    assert_eq!(path.len(), 11);
    assert_eq!(path.last(), Some(&p(10, 0)));
}

#[test]
fn test_step_fans_out_around_obstacle() {
    let mut finder = PathFinder::new(10, 10);
    finder.set_obstacle(1, 5, true, false);
    let path = finder.find_path(p(0, 5), p(4, 5), PathStrategy::ImmediateStep, 8);
    assert_eq!(path.last(), Some(&p(4, 5)));
    assert!(!path.contains(&p(1, 5)));
    assert_connected(&path);
}

#[test]
fn test_step_boxed_in_is_empty() {
    let mut finder = PathFinder::new(10, 10);
    for dy in -1..=1 {
        for dx in -1..=1 {
            if dx != 0 || dy != 0 {
                finder.set_obstacle(5 + dx, 5 + dy, true, false);
            }
        }
    }
    assert!(finder
        .find_path(p(5, 5), p(9, 9), PathStrategy::ImmediateStep, 8)
        .is_empty());
}

// ── Greedy ────────────────────────────────────────────────────────────────────

#[test]
fn test_greedy_reaches_goal() {
    let mut finder = PathFinder::new(30, 30);
    finder.set_obstacle(6, 6, true, false);
    let path = finder.find_path(p(2, 2), p(12, 9), PathStrategy::GreedyBestFirst, 8);
    assert_eq!(path.first(), Some(&p(2, 2)));
    assert_eq!(path.last(), Some(&p(12, 9)));
    assert_connected(&path);
}

// ── Determinism ───────────────────────────────────────────────────────────────

#[test]
fn test_repeated_queries_are_identical() {
    let config = NavConfig {
        budgets: StrategyBudgets {
            astar_large: 5_000,
            ..StrategyBudgets::default()
        },
        metric: TileMetric::Octile,
    };
    let mut finder = PathFinder::with_config(40, 40, config);
    for y in 3..30 {
        finder.set_obstacle(20, y, true, y % 2 == 0);
    }
    let first = finder.find_path(p(2, 15), p(35, 15), PathStrategy::BoundedAStarLarge, 8);
    let _ = finder.find_path(p(0, 0), p(39, 39), PathStrategy::GreedyBestFirst, 8);
    let second = finder.find_path(p(2, 15), p(35, 15), PathStrategy::BoundedAStarLarge, 8);
    assert!(!first.is_empty());
    assert_eq!(first, second);
}

#[test]
fn test_bitmap_load() {
    let mut finder = PathFinder::new(3, 3);
    #[rustfmt::skip]
    let soft = [
        0, 1, 0,
        0, 1, 0,
        0, 0, 0,
    ];
    finder.set_obstacle_bitmap(&soft, &[0; 9]).unwrap();
    let path = finder.find_path(p(0, 0), p(2, 0), PathStrategy::BoundedAStarLarge, 4);
    assert_eq!(
        path,
        vec![p(0, 0), p(0, 1), p(0, 2), p(1, 2), p(2, 2), p(2, 1), p(2, 0)]
    );
}
