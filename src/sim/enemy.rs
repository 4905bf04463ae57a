//! Enemies: pursuit, melee, ranged attacks, stun

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::geom::Rect;
use super::obstacles::ObstacleMap;
use super::player::Player;
use super::timer::{FrameCounter, Millis, Timer};
use crate::aim_angle;
use crate::consts::*;

/// Enemy archetype
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Closes to melee range and hits the player
    Zombie,
    /// Keeps its distance and fires bullets
    Shooter,
}

/// Starting health for an enemy spawned in `wave`
pub fn health_for(wave: u32, boss: bool) -> i32 {
    let base = ENEMY_HEALTH + (wave as i32 - 1) * ENEMY_HEALTH_PER_WAVE;
    if boss {
        base * BOSS_HEALTH_MULTIPLIER + wave as i32 * BOSS_HEALTH_PER_WAVE
    } else {
        base
    }
}

/// Speed multiplier; bosses get faster every third wave
pub fn speed_multiplier_for(wave: u32, boss: bool) -> f32 {
    if boss {
        BOSS_SPEED_MULTIPLIER + (wave / BOSS_SPAWN_WAVE) as f32 * BOSS_SPEED_PER_STAGE
    } else {
        1.0
    }
}

/// Per-tick context shared by every enemy
#[derive(Debug, Clone, Copy)]
pub struct EnemyContext {
    pub now: Millis,
    pub dt: Millis,
    /// Invincibility power-up is active
    pub invincible: bool,
}

/// What one enemy did this tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnemyAction {
    /// Aim angles (radians, "up is positive") of bullets fired from `origin`
    pub shots: Vec<f32>,
    pub origin: Vec2,
    /// Melee attack landed on the player
    pub player_damaged: bool,
    /// Took invincibility contact damage
    pub contact_hit: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub kind: EnemyKind,
    pub boss: bool,
    pub pos: Vec2,
    pub vel: Vec2,
    pub health: i32,
    pub max_health: i32,
    pub alive: bool,
    /// Death rewards already granted; gates the reward pass to once per enemy
    pub reward_granted: bool,
    pub speed_multiplier: f32,
    pub shot_timer: Timer,
    /// Visual hit marker
    pub hit: bool,
    pub stunned: bool,
    pub hit_timer: Timer,
    pub flip_x: bool,
    pub anim: FrameCounter,
}

impl Enemy {
    pub fn new(id: u32, pos: Vec2, kind: EnemyKind, boss: bool, wave: u32) -> Self {
        let health = health_for(wave, boss);
        let cooldown = if boss {
            BOSS_SHOOTER_COOLDOWN
        } else {
            SHOOTER_COOLDOWN
        };
        Self {
            id,
            kind,
            boss,
            pos,
            vel: Vec2::ZERO,
            health,
            max_health: health,
            alive: true,
            reward_granted: false,
            speed_multiplier: speed_multiplier_for(wave, boss),
            shot_timer: Timer::new(cooldown),
            hit: false,
            stunned: false,
            hit_timer: Timer::new(ENEMY_STUN_COOLDOWN),
            flip_x: false,
            anim: FrameCounter::new(ANIM_FRAMES, PLAYER_ANIM_STEP),
        }
    }

    #[inline]
    pub fn is_shooter(&self) -> bool {
        self.kind == EnemyKind::Shooter
    }

    /// Collision box edge
    pub fn size(&self) -> f32 {
        if self.boss {
            CHARACTER_SIZE * BOSS_SCALE
        } else {
            CHARACTER_SIZE
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::square(self.pos, self.size())
    }

    /// Alive with health left, the definition wave completion counts
    pub fn is_active(&self) -> bool {
        self.alive && self.health > 0
    }

    /// Run AI for one tick
    ///
    /// Returns `None` on the tick the enemy is found dead and on every tick after.
    pub fn update<R: Rng>(
        &mut self,
        ctx: &EnemyContext,
        player: &mut Player,
        map: &ObstacleMap,
        rng: &mut R,
    ) -> Option<EnemyAction> {
        if self.health <= 0 && self.alive {
            self.health = 0;
            self.alive = false;
        }
        if !self.alive || self.health <= 0 {
            return None;
        }

        let now = ctx.now;
        let mut action = EnemyAction {
            origin: self.pos,
            ..Default::default()
        };

        let d = player.pos - self.pos;
        let dist = d.length();
        let jitter = rng.random_range(-ENEMY_SPEED_RANDOM..=ENEMY_SPEED_RANDOM) as f32;
        let speed = ENEMY_SPEED * self.speed_multiplier + jitter;
        let move_range = if self.is_shooter() {
            SHOOTER_SHOOTING_RANGE
        } else {
            ENEMY_RANGE
        };

        if dist > move_range {
            let vel = d / dist * speed;
            let step = vel * (ctx.dt / 1000.0) as f32;
            let size = self.size();
            let new_x = Vec2::new(self.pos.x + step.x, self.pos.y);
            if map.is_position_valid(new_x, size) {
                self.pos.x = new_x.x;
            }
            let new_y = Vec2::new(self.pos.x, self.pos.y + step.y);
            if map.is_position_valid(new_y, size) {
                self.pos.y = new_y.y;
            }
            self.vel = vel;
        } else {
            self.vel = Vec2::ZERO;
        }

        self.flip_x = d.x < 0.0;

        if !self.is_shooter()
            && dist < ENEMY_ATTACK_RANGE
            && !player.invulnerable
            && !ctx.invincible
        {
            action.player_damaged = player.take_damage(ENEMY_MELEE_DAMAGE, now, ctx.invincible);
        }

        if self.is_shooter() && dist < SHOOTER_SHOOTING_RANGE && self.shot_timer.done(now) {
            action.shots = self.shoot(player.pos);
            self.shot_timer.restart(now);
        }

        if ctx.invincible && player.bounds().intersects(&self.bounds()) {
            self.health -= INVINCIBLE_CONTACT_DAMAGE;
            self.hit = true;
            action.contact_hit = true;
        }

        // Stun is visual only and never gates movement or attacks
        if self.stunned && self.hit_timer.lapsed(now) {
            self.stunned = false;
            self.hit = false;
        }

        self.anim.advance(ctx.dt);

        Some(action)
    }

    /// Aim angles toward `target`; bosses fire a five-bullet spread
    pub fn shoot(&self, target: Vec2) -> Vec<f32> {
        let angle = aim_angle(self.pos, target);
        if self.boss {
            BOSS_SPREAD_DEG
                .iter()
                .map(|offset| angle + offset.to_radians())
                .collect()
        } else {
            vec![angle]
        }
    }

    /// Unconditional damage; enemies have no invulnerability
    pub fn take_damage(&mut self, amount: i32, now: Millis) {
        self.health -= amount;
        self.hit = true;
        self.stunned = true;
        self.hit_timer.restart(now);
        if self.health <= 0 {
            self.health = 0;
            self.alive = false;
        }
    }

    pub fn freeze(&mut self) {
        self.vel = Vec2::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn ctx(now: Millis) -> EnemyContext {
        EnemyContext {
            now,
            dt: 16.0,
            invincible: false,
        }
    }

    #[test]
    fn test_stats_scale_with_wave() {
        assert_eq!(health_for(1, false), 100);
        assert_eq!(health_for(4, false), 160);
        assert_eq!(health_for(3, true), 140 * 5 + 150);
        assert_eq!(speed_multiplier_for(1, false), 1.0);
        assert!((speed_multiplier_for(6, true) - 1.9).abs() < 1e-6);
    }

    #[test]
    fn test_boss_shotgun_spread() {
        let boss = Enemy::new(1, Vec2::new(500.0, 500.0), EnemyKind::Shooter, true, 6);
        let target = Vec2::new(500.0, 100.0);
        let angles = boss.shoot(target);
        assert_eq!(angles.len(), 5);
        let center = aim_angle(boss.pos, target);
        for (angle, offset) in angles.iter().zip([-20.0f32, -10.0, 0.0, 10.0, 20.0]) {
            assert!((angle - center - offset.to_radians()).abs() < 1e-5);
        }
    }

    #[test]
    fn test_regular_shooter_fires_single_bullet() {
        let e = Enemy::new(1, Vec2::ZERO, EnemyKind::Shooter, false, 1);
        assert_eq!(e.shoot(Vec2::new(10.0, 0.0)).len(), 1);
    }

    #[test]
    fn test_aim_angle_sign_convention() {
        // Target straight above: angle 0
        let e = Enemy::new(1, Vec2::new(100.0, 100.0), EnemyKind::Shooter, false, 1);
        assert!(e.shoot(Vec2::new(100.0, 0.0))[0].abs() < 1e-6);
        // Target to the right: +90 degrees
        let right = e.shoot(Vec2::new(200.0, 100.0))[0];
        assert!((right - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn test_death_check_runs_first() {
        let mut rng = Pcg32::seed_from_u64(1);
        let map = ObstacleMap::default();
        let mut player = Player::new(Vec2::new(1000.0, 1000.0));
        let mut e = Enemy::new(1, Vec2::new(1010.0, 1000.0), EnemyKind::Zombie, false, 1);
        e.health = -5;
        assert!(e.update(&ctx(1000.0), &mut player, &map, &mut rng).is_none());
        assert!(!e.alive);
        assert_eq!(e.health, 0);
        assert_eq!(player.health, PLAYER_MAX_HEALTH);
    }

    #[test]
    fn test_melee_hits_once_per_invulnerability_window() {
        let mut rng = Pcg32::seed_from_u64(2);
        let map = ObstacleMap::default();
        let mut player = Player::new(Vec2::new(1000.0, 1000.0));
        let mut e = Enemy::new(1, Vec2::new(1030.0, 1000.0), EnemyKind::Zombie, false, 1);
        let first = e.update(&ctx(1000.0), &mut player, &map, &mut rng).unwrap();
        assert!(first.player_damaged);
        let second = e.update(&ctx(1016.0), &mut player, &map, &mut rng).unwrap();
        assert!(!second.player_damaged);
        assert_eq!(player.health, PLAYER_MAX_HEALTH - ENEMY_MELEE_DAMAGE);
    }

    #[test]
    fn test_zombie_pursues_from_afar() {
        let mut rng = Pcg32::seed_from_u64(3);
        let map = ObstacleMap::default();
        let mut player = Player::new(Vec2::new(1000.0, 1000.0));
        let mut e = Enemy::new(1, Vec2::new(1400.0, 1000.0), EnemyKind::Zombie, false, 1);
        e.update(&ctx(1000.0), &mut player, &map, &mut rng);
        assert!(e.pos.x < 1400.0);
        assert!(e.flip_x);
        assert!(e.vel.x < 0.0);
    }

    #[test]
    fn test_enemy_slides_along_wall() {
        use super::super::obstacles::{ArenaBounds, ObstacleTile};

        let mut rng = Pcg32::seed_from_u64(7);
        // Column 66 spans x 1048..1064, rows 50..=90 cover y 792..1448
        let wall = (50..=90).map(|row| ObstacleTile::at_cell(66, row)).collect();
        let map = ObstacleMap::from_tiles(
            wall,
            Rect::new(0.0, 0.0, MAP_SIZE, MAP_SIZE),
            ArenaBounds::default(),
        );
        let mut player = Player::new(Vec2::new(1500.0, 1500.0));
        let mut e = Enemy::new(1, Vec2::new(990.0, 1000.0), EnemyKind::Zombie, false, 1);
        for i in 0..30 {
            e.update(&ctx(1000.0 + i as f64 * 16.0), &mut player, &map, &mut rng);
        }
        // x is held at the wall face, y keeps closing in
        assert!(e.pos.x <= 1000.0);
        assert!(e.pos.y > 1010.0);
        assert!(map.is_position_valid(e.pos, CHARACTER_SIZE));
    }

    #[test]
    fn test_shooter_holds_range_and_respects_cooldown() {
        let mut rng = Pcg32::seed_from_u64(4);
        let map = ObstacleMap::default();
        let mut player = Player::new(Vec2::new(1000.0, 1000.0));
        let mut e = Enemy::new(1, Vec2::new(1300.0, 1000.0), EnemyKind::Shooter, false, 1);
        let a = e.update(&ctx(2000.0), &mut player, &map, &mut rng).unwrap();
        assert_eq!(a.shots.len(), 1);
        assert_eq!(e.pos, Vec2::new(1300.0, 1000.0));
        let b = e.update(&ctx(2999.0), &mut player, &map, &mut rng).unwrap();
        assert!(b.shots.is_empty());
        let c = e.update(&ctx(3000.0), &mut player, &map, &mut rng).unwrap();
        assert_eq!(c.shots.len(), 1);
    }

    #[test]
    fn test_invincible_contact_damage_every_tick() {
        let mut rng = Pcg32::seed_from_u64(5);
        let map = ObstacleMap::default();
        let mut player = Player::new(Vec2::new(1000.0, 1000.0));
        let mut e = Enemy::new(1, Vec2::new(1040.0, 1000.0), EnemyKind::Zombie, false, 1);
        let mut c = ctx(1000.0);
        c.invincible = true;
        for i in 0..2 {
            c.now = 1000.0 + i as f64 * 16.0;
            let a = e.update(&c, &mut player, &map, &mut rng).unwrap();
            assert!(a.contact_hit);
            assert!(!a.player_damaged);
        }
        assert_eq!(e.health, 0);
        assert_eq!(player.health, PLAYER_MAX_HEALTH);
        // Found dead on the next tick
        c.now += 16.0;
        assert!(e.update(&c, &mut player, &map, &mut rng).is_none());
        assert!(!e.alive);
    }

    #[test]
    fn test_take_damage_and_stun_recovery() {
        let mut rng = Pcg32::seed_from_u64(6);
        let map = ObstacleMap::default();
        let mut player = Player::new(Vec2::new(1000.0, 1000.0));
        let mut e = Enemy::new(1, Vec2::new(2000.0, 2000.0), EnemyKind::Zombie, false, 1);
        e.take_damage(30, 500.0);
        assert!(e.stunned && e.hit);
        assert_eq!(e.health, 70);
        e.update(&ctx(600.0), &mut player, &map, &mut rng);
        assert!(e.stunned);
        e.update(&ctx(601.0), &mut player, &map, &mut rng);
        assert!(!e.stunned);

        e.take_damage(500, 700.0);
        assert_eq!(e.health, 0);
        assert!(!e.alive);
        assert!(!e.is_active());
    }
}
