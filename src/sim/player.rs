//! The player character: movement, dash, invulnerability

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geom::Rect;
use super::obstacles::ObstacleMap;
use super::timer::{FrameCounter, Millis, Timer};
use crate::consts::*;

/// Held movement keys for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movement {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl Movement {
    /// Velocity at `speed`; right wins over left and down over up when both are held.
    /// Diagonals are scaled by sqrt(2)/2 so they are no faster than straight moves.
    pub fn velocity(&self, speed: f32) -> Vec2 {
        let mut v = Vec2::ZERO;
        if self.left {
            v.x = -speed;
        }
        if self.right {
            v.x = speed;
        }
        if self.up {
            v.y = -speed;
        }
        if self.down {
            v.y = speed;
        }
        if v.x != 0.0 && v.y != 0.0 {
            v *= std::f32::consts::FRAC_1_SQRT_2;
        }
        v
    }

    pub fn is_idle(&self) -> bool {
        self.velocity(1.0) == Vec2::ZERO
    }
}

/// Per-tick inputs the player needs from the orchestrator
#[derive(Debug, Clone, Copy)]
pub struct PlayerControl {
    pub now: Millis,
    /// Tick length in milliseconds
    pub dt: Millis,
    pub movement: Movement,
    /// Rising edge of the dash key
    pub dash_pressed: bool,
    /// Invincibility power-up is active
    pub invincible: bool,
}

/// The single player entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    pub health: i32,
    pub max_health: i32,
    pub invulnerable: bool,
    /// Hit cooldown, restarted when damage lands
    pub hit_timer: Timer,
    pub dashing: bool,
    pub dash_started: Millis,
    /// Dash cooldown, restarted when a dash begins
    pub dash_timer: Timer,
    /// Facing left
    pub flip_x: bool,
    pub anim: FrameCounter,
    /// Kill count credited to the player
    pub score: u32,
}

impl Player {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            health: PLAYER_MAX_HEALTH,
            max_health: PLAYER_MAX_HEALTH,
            invulnerable: false,
            hit_timer: Timer::new(PLAYER_HIT_COOLDOWN),
            dashing: false,
            dash_started: 0.0,
            dash_timer: Timer::new(DASH_COOLDOWN),
            flip_x: false,
            anim: FrameCounter::new(ANIM_FRAMES, PLAYER_ANIM_STEP),
            score: 0,
        }
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Health for display, never negative
    pub fn display_health(&self) -> i32 {
        self.health.max(0)
    }

    pub fn bounds(&self) -> Rect {
        Rect::square(self.pos, CHARACTER_SIZE)
    }

    /// Last time a dash started (for the HUD's dash bar)
    pub fn last_dash(&self) -> Millis {
        self.dash_timer.started_at
    }

    /// Advance one tick; returns the new bounds
    pub fn update(&mut self, ctl: &PlayerControl, map: &ObstacleMap) -> Rect {
        let now = ctl.now;
        let mut vel = ctl.movement.velocity(PLAYER_SPEED);

        if ctl.dash_pressed && !self.dashing && self.dash_timer.done(now) {
            self.dashing = true;
            self.dash_started = now;
            self.dash_timer.restart(now);
        }

        if self.dashing {
            if now - self.dash_started < DASH_DURATION {
                if vel != Vec2::ZERO {
                    vel *= DASH_SPEED / PLAYER_SPEED;
                } else {
                    let dir = if self.flip_x { -1.0 } else { 1.0 };
                    vel.x = DASH_SPEED * dir;
                }
                self.invulnerable = true;
            } else {
                self.dashing = false;
                if !ctl.invincible {
                    self.invulnerable = false;
                }
            }
        }

        let step = (ctl.dt / 1000.0) as f32;
        self.slide(vel * step, map);
        self.vel = vel;

        if vel.x < 0.0 {
            self.flip_x = true;
        } else if vel.x > 0.0 {
            self.flip_x = false;
        }

        self.anim.advance(ctl.dt);

        // Hit invulnerability wears off unless a dash or the power-up holds it
        if self.invulnerable && !self.dashing && !ctl.invincible && self.hit_timer.lapsed(now) {
            self.invulnerable = false;
        }

        self.bounds()
    }

    /// Axis-separated move: each axis is applied only if it stays clear of walls
    fn slide(&mut self, delta: Vec2, map: &ObstacleMap) {
        let half = CHARACTER_SIZE / 2.0;
        let world = map.world;
        let clamp_x = |x: f32| x.clamp(world.x + half, (world.right() - half).max(world.x + half));
        let clamp_y = |y: f32| y.clamp(world.y + half, (world.bottom() - half).max(world.y + half));

        let new_x = clamp_x(self.pos.x + delta.x);
        if map.is_position_valid(Vec2::new(new_x, self.pos.y), CHARACTER_SIZE) {
            self.pos.x = new_x;
        }
        let new_y = clamp_y(self.pos.y + delta.y);
        if map.is_position_valid(Vec2::new(self.pos.x, new_y), CHARACTER_SIZE) {
            self.pos.y = new_y;
        }
    }

    /// Apply damage unless invulnerable or under the invincibility power-up
    pub fn take_damage(&mut self, amount: i32, now: Millis, invincible: bool) -> bool {
        if self.invulnerable || invincible {
            return false;
        }
        self.health -= amount;
        self.invulnerable = true;
        self.hit_timer.restart(now);
        true
    }

    /// Heal up to max health; returns the amount actually restored
    pub fn heal(&mut self, amount: i32) -> i32 {
        let before = self.health;
        self.health = (self.health + amount).min(self.max_health);
        self.health - before
    }

    /// Zero velocity without touching anything else (pause, shop, game over)
    pub fn freeze(&mut self) {
        self.vel = Vec2::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn control(now: Millis, movement: Movement) -> PlayerControl {
        PlayerControl {
            now,
            dt: 1000.0 / 60.0,
            movement,
            dash_pressed: false,
            invincible: false,
        }
    }

    fn open_map() -> ObstacleMap {
        ObstacleMap::default()
    }

    #[test]
    fn test_diagonal_speed_matches_axis_speed() {
        let diag = Movement {
            up: true,
            right: true,
            ..Default::default()
        };
        let axis = Movement {
            right: true,
            ..Default::default()
        };
        let d = diag.velocity(PLAYER_SPEED).length();
        let a = axis.velocity(PLAYER_SPEED).length();
        assert!((d - a).abs() < 1e-3);
        assert!((d - PLAYER_SPEED * std::f32::consts::SQRT_2).abs() > 1.0);
    }

    #[test]
    fn test_opposite_keys_resolve_right_and_down() {
        let all = Movement {
            up: true,
            down: true,
            left: true,
            right: true,
        };
        let v = all.velocity(10.0);
        assert!(v.x > 0.0 && v.y > 0.0);
    }

    #[test]
    fn test_damage_then_invulnerable() {
        let mut p = Player::new(Vec2::new(1600.0, 1600.0));
        assert!(p.take_damage(20, 5000.0, false));
        assert!(!p.take_damage(20, 5100.0, false));
        assert_eq!(p.health, 80);
    }

    #[test]
    fn test_invulnerability_wears_off_after_cooldown() {
        let map = open_map();
        let mut p = Player::new(Vec2::new(1600.0, 1600.0));
        assert!(p.take_damage(20, 5000.0, false));
        p.update(&control(5400.0, Movement::default()), &map);
        assert!(p.invulnerable);
        p.update(&control(5501.0, Movement::default()), &map);
        assert!(!p.invulnerable);
        assert!(p.take_damage(20, 5502.0, false));
        assert_eq!(p.health, 60);
    }

    #[test]
    fn test_power_up_blocks_damage() {
        let mut p = Player::new(Vec2::ZERO);
        assert!(!p.take_damage(20, 0.0, true));
        assert_eq!(p.health, PLAYER_MAX_HEALTH);
    }

    #[test]
    fn test_health_can_go_negative_but_displays_zero() {
        let mut p = Player::new(Vec2::ZERO);
        p.health = 10;
        assert!(p.take_damage(20, 0.0, false));
        assert_eq!(p.health, -10);
        assert!(!p.is_alive());
        assert_eq!(p.display_health(), 0);
    }

    #[test]
    fn test_heal_clamps() {
        let mut p = Player::new(Vec2::ZERO);
        p.health = 90;
        assert_eq!(p.heal(20), 10);
        assert_eq!(p.health, 100);
    }

    #[test]
    fn test_dash_moves_in_facing_direction_and_grants_invulnerability() {
        let map = open_map();
        let mut p = Player::new(Vec2::new(1600.0, 1600.0));
        p.flip_x = true;
        let mut ctl = control(2000.0, Movement::default());
        ctl.dash_pressed = true;
        p.update(&ctl, &map);
        assert!(p.dashing);
        assert!(p.invulnerable);
        assert_eq!(p.vel, Vec2::new(-DASH_SPEED, 0.0));
        assert!(p.pos.x < 1600.0);

        // Duration over: dash ends and invulnerability clears
        p.update(&control(2100.0, Movement::default()), &map);
        assert!(!p.dashing);
        assert!(!p.invulnerable);
    }

    #[test]
    fn test_dash_end_keeps_invulnerability_under_power_up() {
        let map = open_map();
        let mut p = Player::new(Vec2::new(1600.0, 1600.0));
        let mut ctl = control(2000.0, Movement::default());
        ctl.dash_pressed = true;
        p.update(&ctl, &map);
        let mut later = control(2200.0, Movement::default());
        later.invincible = true;
        p.update(&later, &map);
        assert!(!p.dashing);
        assert!(p.invulnerable);
    }

    #[test]
    fn test_dash_respects_cooldown() {
        let map = open_map();
        let mut p = Player::new(Vec2::new(1600.0, 1600.0));
        let mut ctl = control(500.0, Movement::default());
        ctl.dash_pressed = true;
        // Less than one cooldown since session start
        p.update(&ctl, &map);
        assert!(!p.dashing);

        ctl.now = 999.0;
        p.update(&ctl, &map);
        assert!(!p.dashing);

        ctl.now = 1000.0;
        p.update(&ctl, &map);
        assert!(p.dashing);
    }

    #[test]
    fn test_dash_scales_held_direction() {
        let map = open_map();
        let mut p = Player::new(Vec2::new(1600.0, 1600.0));
        let mut ctl = control(
            3000.0,
            Movement {
                down: true,
                ..Default::default()
            },
        );
        ctl.dash_pressed = true;
        p.update(&ctl, &map);
        assert!((p.vel.y - DASH_SPEED).abs() < 1e-3);
        assert_eq!(p.vel.x, 0.0);
    }

    #[test]
    fn test_slides_along_wall() {
        let map = ObstacleMap::walled_arena();
        // Pressed against the left wall: x blocked, y still moves
        let mut p = Player::new(Vec2::new(105.0, 1600.0));
        for i in 0..30 {
            p.update(
                &control(
                    10_000.0 + i as f64 * 16.0,
                    Movement {
                        left: true,
                        up: true,
                        ..Default::default()
                    },
                ),
                &map,
            );
        }
        assert!(p.pos.y < 1600.0);
        // The wall's inner edge is at x = 40
        assert!(p.pos.x >= 40.0 + CHARACTER_SIZE / 2.0);
        assert!(p.pos.x < 105.0);
        assert!(map.is_position_valid(p.pos, CHARACTER_SIZE));
    }

    #[test]
    fn test_facing_follows_horizontal_velocity() {
        let map = open_map();
        let mut p = Player::new(Vec2::new(1600.0, 1600.0));
        let left = Movement {
            left: true,
            ..Default::default()
        };
        p.update(&control(100.0, left), &map);
        assert!(p.flip_x);
        // Vertical-only movement keeps the facing
        let up = Movement {
            up: true,
            ..Default::default()
        };
        p.update(&control(116.0, up), &map);
        assert!(p.flip_x);
    }

    proptest! {
        #[test]
        fn prop_speed_never_exceeds_axis_speed(up: bool, down: bool, left: bool, right: bool) {
            let m = Movement { up, down, left, right };
            let len = m.velocity(PLAYER_SPEED).length();
            prop_assert!(len <= PLAYER_SPEED + 1e-3);
            if !m.is_idle() {
                prop_assert!((len - PLAYER_SPEED).abs() < 1e-3);
            }
        }
    }
}
