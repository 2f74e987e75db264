//! Obstacles module - spawning, per-turn spread and damage
//!
//! Plain ice and chocolate are placed at level start and broken by adjacent
//! matches. Health-bearing obstacles (trash, spawners) are topped up to the
//! mode's caps and only destroyed through damage.

use log::{debug, warn};

use crate::board::Board;
use crate::events::EngineEvent;
use crate::grid::DIRS4;
use crate::level::LevelParams;
use crate::rng::RandomSource;
use crate::types::{
    Cue, ObstacleCaps, ObstacleKind, CHOCOLATE_SPAWNER_CONFIG, ICE_SPAWNER_CONFIG,
    PLAIN_SPAWN_ATTEMPTS, SPECIAL_SPAWN_ATTEMPTS,
};

/// A cell that can receive a newly spawned obstacle
fn is_spawnable(board: &Board, i: usize) -> bool {
    !board.is_blocked(i) && board.special(i).is_none()
}

/// Place up to `count` obstacles of `kind` on random free cells.
///
/// Best effort: at most `attempts` random draws are made in total.
pub fn spawn_plain<R: RandomSource>(
    board: &mut Board,
    rng: &mut R,
    kind: ObstacleKind,
    count: u32,
    attempts: u32,
) -> u32 {
    let mut spawned = 0;
    for _ in 0..attempts {
        if spawned >= count {
            break;
        }
        let i = rng.next_index(board.len());
        if is_spawnable(board, i) {
            board.place_obstacle(i, kind);
            spawned += 1;
        }
    }
    if spawned < count {
        warn!(
            "placed {}/{} {} after {} attempts",
            spawned,
            count,
            kind.as_str(),
            attempts
        );
    }
    spawned
}

/// Top up every unlocked health-bearing kind to its cap.
///
/// Each missing slot gets up to `SPECIAL_SPAWN_ATTEMPTS` random draws.
pub fn spawn_special_obstacles<R: RandomSource>(
    board: &mut Board,
    rng: &mut R,
    caps: &ObstacleCaps,
    level: u32,
) -> u32 {
    let mut spawned = 0;
    for kind in ObstacleKind::SPECIAL {
        let Some(config) = kind.config() else {
            continue;
        };
        if level < config.start_level {
            continue;
        }
        let present = board.count_obstacles(kind) as u32;
        let missing = caps.cap_for(kind).saturating_sub(present);
        for _ in 0..missing {
            let placed = (0..SPECIAL_SPAWN_ATTEMPTS).any(|_| {
                let i = rng.next_index(board.len());
                is_spawnable(board, i) && board.place_obstacle(i, kind)
            });
            if placed {
                spawned += 1;
            } else {
                warn!(
                    "no free cell for {} after {} attempts",
                    kind.as_str(),
                    SPECIAL_SPAWN_ATTEMPTS
                );
            }
        }
    }
    spawned
}

/// Level-start obstacle placement: chocolate, then ice, then special kinds
pub fn spawn_obstacles<R: RandomSource>(
    board: &mut Board,
    rng: &mut R,
    params: &LevelParams,
    caps: &ObstacleCaps,
) {
    let chocolates = spawn_plain(
        board,
        rng,
        ObstacleKind::Chocolate,
        params.chocolates_to_spawn,
        PLAIN_SPAWN_ATTEMPTS,
    );
    let ices = spawn_plain(
        board,
        rng,
        ObstacleKind::Ice,
        params.ices_to_spawn,
        PLAIN_SPAWN_ATTEMPTS,
    );
    let specials = spawn_special_obstacles(board, rng, caps, params.level);
    debug!(
        "spawned obstacles: chocolate {}/{} ice {}/{} special {}",
        chocolates, params.chocolates_to_spawn, ices, params.ices_to_spawn, specials
    );
}

/// Pick the cell a source spreads into this turn, if any.
///
/// Neighbours are visited in random order; every free neighbour gets one roll
/// and the first success wins.
fn spread_target<R: RandomSource>(board: &Board, rng: &mut R, i: usize, rate: u32) -> Option<usize> {
    let mut dirs = DIRS4;
    rng.shuffle(&mut dirs);
    for (dr, dc) in dirs {
        let Some(n) = board.grid().offset(i, dr, dc) else {
            continue;
        };
        if board.is_blocked(n) {
            continue;
        }
        if rng.roll_percent(rate) {
            return Some(n);
        }
    }
    None
}

fn apply_spread(board: &mut Board, targets: &[usize], kind: ObstacleKind, events: &mut Vec<EngineEvent>) {
    for &n in targets {
        if board.obstacle(n) == Some(kind) {
            continue;
        }
        board.place_obstacle(n, kind);
        events.push(EngineEvent::ObstacleSpread { index: n, kind });
    }
}

/// Ice spawners spread plain ice (one neighbour per spawner per turn).
///
/// All targets are chosen on the pre-spread board.
pub fn expand_ice<R: RandomSource>(
    board: &mut Board,
    rng: &mut R,
    level: u32,
    events: &mut Vec<EngineEvent>,
) -> usize {
    if level < ICE_SPAWNER_CONFIG.start_level {
        return 0;
    }
    let mut targets = Vec::new();
    for i in 0..board.len() {
        if board.obstacle(i) == Some(ObstacleKind::IceSpawner) {
            if let Some(n) = spread_target(board, rng, i, ICE_SPAWNER_CONFIG.spread_rate) {
                targets.push(n);
            }
        }
    }
    apply_spread(board, &targets, ObstacleKind::Ice, events);
    targets.len()
}

/// Plain chocolate (level-scaled rate) and chocolate spawners (fixed rate)
/// spread plain chocolate.
pub fn expand_chocolate<R: RandomSource>(
    board: &mut Board,
    rng: &mut R,
    level: u32,
    chocolate_rate: u32,
    events: &mut Vec<EngineEvent>,
) -> usize {
    let mut targets = Vec::new();
    for i in 0..board.len() {
        let rate = match board.obstacle(i) {
            Some(ObstacleKind::Chocolate) => chocolate_rate,
            Some(ObstacleKind::ChocolateSpawner) if level >= CHOCOLATE_SPAWNER_CONFIG.start_level => {
                CHOCOLATE_SPAWNER_CONFIG.spread_rate
            }
            _ => 0,
        };
        if rate == 0 {
            continue;
        }
        if let Some(n) = spread_target(board, rng, i, rate) {
            targets.push(n);
        }
    }
    apply_spread(board, &targets, ObstacleKind::Chocolate, events);
    targets.len()
}

/// Apply damage to a health-bearing obstacle.
///
/// Returns true when the obstacle was destroyed by this hit. Cells without a
/// health-bearing obstacle are left untouched.
pub fn damage_obstacle(
    board: &mut Board,
    i: usize,
    amount: u32,
    events: &mut Vec<EngineEvent>,
) -> bool {
    let Some(kind) = board.obstacle(i).filter(|k| k.is_health_bearing()) else {
        return false;
    };
    let health = board.health(i).unwrap_or(0) as u32;
    if health > amount {
        let left = (health - amount) as u8;
        board.set_health(i, Some(left));
        events.push(EngineEvent::ObstacleDamaged { index: i, health: left });
        return false;
    }

    board.clear_obstacle(i);
    events.push(EngineEvent::ObstacleDestroyed { index: i, kind });
    match kind {
        ObstacleKind::IceSpawner => {
            for n in board.grid().area3x3(i) {
                let freezable = matches!(
                    board.obstacle(n),
                    None | Some(ObstacleKind::Ice) | Some(ObstacleKind::Chocolate)
                );
                if freezable {
                    board.place_obstacle(n, ObstacleKind::Ice);
                }
            }
            events.push(EngineEvent::Cue(Cue::IceBreak));
            events.push(EngineEvent::Cue(Cue::Shake { strong: true }));
        }
        _ => events.push(EngineEvent::Cue(Cue::Bomb)),
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{ScriptedRng, SimpleRng};
    use crate::types::EASY_MODE;

    #[test]
    fn test_trash_needs_two_hits() {
        let mut board = Board::parse(&["000", "0t0", "000"]).unwrap();
        let mut events = Vec::new();
        assert!(!damage_obstacle(&mut board, 4, 1, &mut events));
        assert_eq!(board.health(4), Some(1));
        assert!(damage_obstacle(&mut board, 4, 1, &mut events));
        assert_eq!(board.obstacle(4), None);
        assert_eq!(board.health(4), None);
    }

    #[test]
    fn test_damage_ignores_plain_obstacles() {
        let mut board = Board::parse(&["ic0"]).unwrap();
        let mut events = Vec::new();
        assert!(!damage_obstacle(&mut board, 0, 5, &mut events));
        assert!(!damage_obstacle(&mut board, 1, 5, &mut events));
        assert!(!damage_obstacle(&mut board, 2, 5, &mut events));
        assert!(events.is_empty());
        assert_eq!(board.obstacle(0), Some(ObstacleKind::Ice));
    }

    #[test]
    fn test_ice_spawner_freezes_area_but_spares_trash() {
        let mut board = Board::parse(&["0ct0", "0s00", "0000"]).unwrap();
        let mut events = Vec::new();
        assert!(damage_obstacle(&mut board, 5, 2, &mut events));
        for i in [0, 1, 4, 5, 6, 8, 9, 10] {
            assert_eq!(board.obstacle(i), Some(ObstacleKind::Ice), "cell {i}");
        }
        assert_eq!(board.obstacle(2), Some(ObstacleKind::Trash));
        assert_eq!(board.obstacle(3), None);
        assert_eq!(board.obstacle(7), None);
        assert!(board.is_consistent());
        assert!(events.contains(&EngineEvent::Cue(Cue::IceBreak)));
        assert!(events.contains(&EngineEvent::Cue(Cue::Shake { strong: true })));
    }

    #[test]
    fn test_trash_destruction_does_not_shake() {
        let mut board = Board::parse(&["0t0"]).unwrap();
        let mut events = Vec::new();
        assert!(damage_obstacle(&mut board, 1, 2, &mut events));
        assert!(events.contains(&EngineEvent::Cue(Cue::Bomb)));
        assert!(!events
            .iter()
            .any(|e| matches!(e, EngineEvent::Cue(Cue::Shake { .. }))));
    }

    #[test]
    fn test_spawn_special_respects_level_and_cap() {
        let mut board = Board::new(8, 8);
        let mut rng = SimpleRng::new(5);
        assert_eq!(spawn_special_obstacles(&mut board, &mut rng, &EASY_MODE.caps, 7), 0);
        assert_eq!(spawn_special_obstacles(&mut board, &mut rng, &EASY_MODE.caps, 20), 3);
        // Already at cap: nothing more is added.
        assert_eq!(spawn_special_obstacles(&mut board, &mut rng, &EASY_MODE.caps, 20), 0);
        assert_eq!(board.count_obstacles(ObstacleKind::Trash), 1);
        assert_eq!(board.health(board.obstacles().iter().position(|o| o.is_some()).unwrap()), Some(2));
    }

    #[test]
    fn test_special_top_up_gives_up_on_a_full_board() {
        let mut board = Board::parse(&["ii", "ci"]).unwrap();
        let mut rng = SimpleRng::new(3);
        assert_eq!(spawn_special_obstacles(&mut board, &mut rng, &EASY_MODE.caps, 20), 0);
        assert_eq!(board.count_obstacles(ObstacleKind::Trash), 0);
    }

    #[test]
    fn test_spawn_plain_is_bounded_by_attempts() {
        let mut board = Board::new(2, 1);
        let mut rng = SimpleRng::new(11);
        let placed = spawn_plain(&mut board, &mut rng, ObstacleKind::Ice, 12, PLAIN_SPAWN_ATTEMPTS);
        assert!(placed <= 2);
        assert_eq!(board.count_obstacles(ObstacleKind::Ice) as u32, placed);
    }

    #[test]
    fn test_chocolate_spreads_one_cell_per_source() {
        let mut board = Board::parse(&["000", "0c0", "000"]).unwrap();
        // Every roll succeeds.
        let mut rng = ScriptedRng::new(vec![0]);
        let mut events = Vec::new();
        let spread = expand_chocolate(&mut board, &mut rng, 10, 100, &mut events);
        assert_eq!(spread, 1);
        assert_eq!(board.count_obstacles(ObstacleKind::Chocolate), 2);
        assert!(board.is_consistent());
    }

    #[test]
    fn test_ice_spawner_waits_for_start_level() {
        let mut board = Board::parse(&["000", "0s0", "000"]).unwrap();
        let mut rng = ScriptedRng::new(vec![0]);
        let mut events = Vec::new();
        assert_eq!(expand_ice(&mut board, &mut rng, 11, &mut events), 0);
        assert_eq!(expand_ice(&mut board, &mut rng, 12, &mut events), 1);
        assert_eq!(board.count_obstacles(ObstacleKind::Ice), 1);
    }

    #[test]
    fn test_boxed_in_source_does_not_spread() {
        let mut board = Board::parse(&["tit", "isi", "tit"]).unwrap();
        let mut rng = ScriptedRng::new(vec![0]);
        let mut events = Vec::new();
        assert_eq!(expand_ice(&mut board, &mut rng, 20, &mut events), 0);
    }
}
