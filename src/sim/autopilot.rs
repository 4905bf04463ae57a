//! Demo-mode input: the game plays itself
//!
//! Used when `TickInput::idle_mode` is set. Reads the state, never mutates it,
//! and only fills in the same fields a human would press.

use glam::Vec2;

use super::player::Movement;
use super::shop::{self, ShopOption};
use super::state::{GamePhase, GameState};
use super::tick::TickInput;

/// Enemies closer than this are kited
const DANGER_RADIUS: f32 = 250.0;
/// Dash out when something gets this close
const DASH_RADIUS: f32 = 110.0;
/// Wander back toward the middle beyond this distance
const HOME_RADIUS: f32 = 400.0;
/// Health below which healing is bought first
const LOW_HEALTH: i32 = 50;

/// Held keys that move roughly along `dir`
fn movement_toward(dir: Vec2) -> Movement {
    let dead_zone = 0.3;
    let d = dir.normalize_or_zero();
    Movement {
        up: d.y < -dead_zone,
        down: d.y > dead_zone,
        left: d.x < -dead_zone,
        right: d.x > dead_zone,
    }
}

/// Next purchase the autopilot wants, if it can afford one
fn pick_purchase(state: &GameState) -> Option<ShopOption> {
    let wants = if state.player.health < LOW_HEALTH {
        [
            ShopOption::FullHeal,
            ShopOption::PartialHeal,
            ShopOption::WeaponUpgrade,
            ShopOption::LaserSight,
        ]
    } else {
        [
            ShopOption::WeaponUpgrade,
            ShopOption::PartialHeal,
            ShopOption::LaserSight,
            ShopOption::FullHeal,
        ]
    };
    wants
        .into_iter()
        .find(|o| shop::offer(state, *o).available)
}

/// Fill `input` for this tick
pub fn drive(state: &GameState, input: &mut TickInput) {
    match state.phase {
        GamePhase::GameOver => {
            input.restart = true;
            return;
        }
        GamePhase::Shop => {
            match pick_purchase(state) {
                Some(option) => input.buy = Some(option),
                None => input.shop_continue = true,
            }
            return;
        }
        _ => {}
    }
    if state.paused {
        input.pause = true;
        return;
    }

    let me = state.player.pos;
    let nearest = state
        .enemies
        .iter()
        .filter(|e| e.is_active())
        .min_by(|a, b| {
            a.pos
                .distance_squared(me)
                .partial_cmp(&b.pos.distance_squared(me))
                .unwrap_or(std::cmp::Ordering::Equal)
        });

    let mut heading = Vec2::ZERO;
    if let Some(enemy) = nearest {
        let dist = enemy.pos.distance(me);
        input.aim = Some(enemy.pos);
        // Alternate so the trigger latch releases between shots
        input.fire = !state.weapon.latched;
        if dist < DANGER_RADIUS {
            heading = me - enemy.pos;
            // Sidestep a little so we don't get pinned in corners
            heading += heading.perp() * 0.5;
        }
        input.dash = dist < DASH_RADIUS;
    }

    if heading == Vec2::ZERO {
        let pickup = state
            .items
            .iter()
            .map(|i| i.pos)
            .chain(state.stars.iter().map(|s| s.pos))
            .min_by(|a, b| {
                a.distance_squared(me)
                    .partial_cmp(&b.distance_squared(me))
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
        if let Some(target) = pickup {
            heading = target - me;
        } else {
            let home = state.map.arena.center();
            if home.distance(me) > HOME_RADIUS {
                heading = home - me;
            }
        }
    }

    input.movement = movement_toward(heading);
}
