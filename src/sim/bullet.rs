//! Player and enemy projectiles
//!
//! Collision priority is the same for both kinds: walls first (the bullet is
//! destroyed with no effect), then the opposing side, then the world edge.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::enemy::Enemy;
use super::geom::Rect;
use super::obstacles::ObstacleMap;
use super::player::Player;
use super::timer::Millis;
use crate::aim_direction;
use crate::consts::*;

/// Result of advancing a bullet one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BulletOutcome {
    /// Still in flight
    Flying,
    /// Hit a wall; no damage dealt
    Blocked,
    /// Left the world
    Expired,
    /// Player bullet hit the enemy at `index` for `damage`
    HitEnemy { index: usize, damage: i32, at: Vec2 },
    /// Enemy bullet damaged the player
    HitPlayer,
}

impl BulletOutcome {
    /// True if the bullet should be removed
    pub fn is_spent(&self) -> bool {
        !matches!(self, BulletOutcome::Flying)
    }
}

fn in_flight(rect: &Rect, map: &ObstacleMap) -> BulletOutcome {
    if map.in_world(rect) {
        BulletOutcome::Flying
    } else {
        BulletOutcome::Expired
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerBullet {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Velocity at launch, restored when the game resumes from pause
    pub launch_vel: Vec2,
    pub damage: i32,
    /// Sprite rotation in radians
    pub rotation: f32,
}

impl PlayerBullet {
    /// Bullet fired at `angle_deg` in the weapon's `atan2(dx, dy)` convention
    pub fn new<R: Rng>(origin: Vec2, angle_deg: f32, damage_bonus: i32, rng: &mut R) -> Self {
        let a = (angle_deg - 90.0).to_radians();
        let speed = BULLET_SPEED
            + rng.random_range(-BULLET_SPEED_RANDOM..=BULLET_SPEED_RANDOM) as f32;
        let vel = Vec2::new(a.cos() * speed, -a.sin() * speed);
        let damage = BULLET_DAMAGE
            + rng.random_range(-BULLET_DAMAGE_RANDOM..=BULLET_DAMAGE_RANDOM)
            + damage_bonus;
        Self {
            pos: origin,
            vel,
            launch_vel: vel,
            damage,
            rotation: -a,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::square(self.pos, PLAYER_BULLET_SIZE)
    }

    /// Damage this bullet deals to `enemy`
    pub fn damage_against(&self, enemy: &Enemy, boss_killer: bool) -> i32 {
        match (boss_killer, enemy.boss) {
            (true, true) => self.damage * 3,
            (true, false) => enemy.health + 100,
            (false, _) => self.damage,
        }
    }

    /// Move, then resolve walls, then the first alive enemy overlapped
    pub fn update(
        &mut self,
        dt: Millis,
        enemies: &mut [Enemy],
        map: &ObstacleMap,
        boss_killer: bool,
        now: Millis,
    ) -> BulletOutcome {
        self.pos += self.vel * (dt / 1000.0) as f32;
        let rect = self.bounds();
        if map.blocked(&rect) {
            return BulletOutcome::Blocked;
        }
        let target = enemies
            .iter()
            .position(|e| e.alive && e.bounds().intersects(&rect));
        if let Some(index) = target {
            let enemy = &mut enemies[index];
            let damage = self.damage_against(enemy, boss_killer);
            enemy.take_damage(damage, now);
            return BulletOutcome::HitEnemy {
                index,
                damage,
                at: enemy.pos,
            };
        }
        in_flight(&rect, map)
    }

    pub fn freeze(&mut self) {
        self.vel = Vec2::ZERO;
    }

    pub fn resume(&mut self) {
        self.vel = self.launch_vel;
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyBullet {
    pub pos: Vec2,
    pub vel: Vec2,
    pub launch_vel: Vec2,
    /// Aim angle in radians ("up is positive")
    pub angle: f32,
}

impl EnemyBullet {
    pub fn new<R: Rng>(origin: Vec2, angle: f32, rng: &mut R) -> Self {
        let speed = SHOOTER_BULLET_SPEED
            + rng.random_range(-BULLET_SPEED_RANDOM..=BULLET_SPEED_RANDOM) as f32;
        let vel = aim_direction(angle) * speed;
        Self {
            pos: origin,
            vel,
            launch_vel: vel,
            angle,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::square(self.pos, ENEMY_BULLET_SIZE)
    }

    /// Move, then resolve walls, then the player
    ///
    /// A bullet that overlaps an invulnerable player keeps flying.
    pub fn update(
        &mut self,
        dt: Millis,
        player: &mut Player,
        map: &ObstacleMap,
        invincible: bool,
        now: Millis,
    ) -> BulletOutcome {
        self.pos += self.vel * (dt / 1000.0) as f32;
        let rect = self.bounds();
        if map.blocked(&rect) {
            return BulletOutcome::Blocked;
        }
        if rect.intersects(&player.bounds())
            && player.take_damage(ENEMY_BULLET_DAMAGE, now, invincible)
        {
            return BulletOutcome::HitPlayer;
        }
        in_flight(&rect, map)
    }

    pub fn freeze(&mut self) {
        self.vel = Vec2::ZERO;
    }

    pub fn resume(&mut self) {
        self.vel = self.launch_vel;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::enemy::EnemyKind;
    use crate::sim::obstacles::{ArenaBounds, ObstacleTile};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(99)
    }

    #[test]
    fn test_player_bullet_direction() {
        let mut r = rng();
        // 90 degrees in the weapon convention points right
        let b = PlayerBullet::new(Vec2::ZERO, 90.0, 0, &mut r);
        assert!(b.vel.x > 500.0);
        assert!(b.vel.y.abs() < 1e-3);
        // 0 degrees points down the screen
        let down = PlayerBullet::new(Vec2::ZERO, 0.0, 0, &mut r);
        assert!(down.vel.y > 500.0);
        assert!(down.vel.x.abs() < 1e-3);
    }

    #[test]
    fn test_player_bullet_damage_range() {
        let mut r = rng();
        for _ in 0..100 {
            let b = PlayerBullet::new(Vec2::ZERO, 0.0, 20, &mut r);
            assert!((65..=75).contains(&b.damage));
            let speed = b.vel.length();
            assert!((569.0..=631.0).contains(&speed));
        }
    }

    #[test]
    fn test_enemy_bullet_direction() {
        let mut r = rng();
        let up = EnemyBullet::new(Vec2::ZERO, 0.0, &mut r);
        assert!(up.vel.y < -150.0);
        let right = EnemyBullet::new(Vec2::ZERO, std::f32::consts::FRAC_PI_2, &mut r);
        assert!(right.vel.x > 150.0);
    }

    #[test]
    fn test_boss_killer_overkills_regular_enemy() {
        let mut r = rng();
        let mut b = PlayerBullet::new(Vec2::new(500.0, 500.0), 90.0, 0, &mut r);
        b.damage = 50;
        let mut enemy = Enemy::new(1, Vec2::new(500.0, 500.0), EnemyKind::Zombie, false, 1);
        enemy.health = 30;
        assert_eq!(b.damage_against(&enemy, true), 130);

        let map = ObstacleMap::default();
        let mut enemies = vec![enemy];
        let outcome = b.update(0.0, &mut enemies, &map, true, 1000.0);
        assert_eq!(
            outcome,
            BulletOutcome::HitEnemy {
                index: 0,
                damage: 130,
                at: Vec2::new(500.0, 500.0)
            }
        );
        assert!(!enemies[0].alive);
    }

    #[test]
    fn test_boss_killer_triples_against_boss() {
        let mut r = rng();
        let mut b = PlayerBullet::new(Vec2::ZERO, 0.0, 0, &mut r);
        b.damage = 50;
        let boss = Enemy::new(1, Vec2::ZERO, EnemyKind::Shooter, true, 3);
        assert_eq!(b.damage_against(&boss, true), 150);
        assert_eq!(b.damage_against(&boss, false), 50);
    }

    #[test]
    fn test_wall_takes_precedence_over_enemy() {
        let mut r = rng();
        let tile = ObstacleTile::at_cell(31, 31);
        let map = ObstacleMap::from_tiles(
            vec![tile],
            Rect::new(0.0, 0.0, MAP_SIZE, MAP_SIZE),
            ArenaBounds::default(),
        );
        // Bullet, wall tile and enemy all overlap at (496, 496)
        let mut b = PlayerBullet::new(Vec2::new(496.0, 496.0), 90.0, 0, &mut r);
        let mut enemies = vec![Enemy::new(1, Vec2::new(500.0, 500.0), EnemyKind::Zombie, false, 1)];
        let outcome = b.update(0.0, &mut enemies, &map, false, 1000.0);
        assert_eq!(outcome, BulletOutcome::Blocked);
        assert_eq!(enemies[0].health, enemies[0].max_health);
    }

    #[test]
    fn test_one_bullet_hits_only_first_alive_enemy() {
        let mut r = rng();
        let map = ObstacleMap::default();
        let mut b = PlayerBullet::new(Vec2::new(500.0, 500.0), 90.0, 0, &mut r);
        let mut dead = Enemy::new(1, Vec2::new(500.0, 500.0), EnemyKind::Zombie, false, 1);
        dead.alive = false;
        let mut enemies = vec![
            dead,
            Enemy::new(2, Vec2::new(505.0, 500.0), EnemyKind::Zombie, false, 1),
            Enemy::new(3, Vec2::new(510.0, 500.0), EnemyKind::Zombie, false, 1),
        ];
        let outcome = b.update(0.0, &mut enemies, &map, false, 1000.0);
        assert!(matches!(outcome, BulletOutcome::HitEnemy { index: 1, .. }));
        assert!(enemies[1].health < enemies[1].max_health);
        assert_eq!(enemies[2].health, enemies[2].max_health);
    }

    #[test]
    fn test_bullet_expires_outside_world() {
        let mut r = rng();
        let map = ObstacleMap::default();
        let mut b = PlayerBullet::new(Vec2::new(3190.0, 1600.0), 90.0, 0, &mut r);
        let mut enemies = Vec::new();
        let outcome = b.update(100.0, &mut enemies, &map, false, 0.0);
        assert_eq!(outcome, BulletOutcome::Expired);
    }

    #[test]
    fn test_enemy_bullet_hits_player_once() {
        let mut r = rng();
        let map = ObstacleMap::default();
        let mut player = Player::new(Vec2::new(1000.0, 1000.0));
        let mut a = EnemyBullet::new(Vec2::new(1000.0, 1000.0), 0.0, &mut r);
        let mut b = EnemyBullet::new(Vec2::new(1000.0, 1000.0), 0.0, &mut r);
        assert_eq!(a.update(0.0, &mut player, &map, false, 100.0), BulletOutcome::HitPlayer);
        // Invulnerable now: passes through
        assert_eq!(b.update(0.0, &mut player, &map, false, 150.0), BulletOutcome::Flying);
        assert_eq!(player.health, PLAYER_MAX_HEALTH - ENEMY_BULLET_DAMAGE);
    }

    #[test]
    fn test_pause_restores_exact_velocity() {
        let mut r = rng();
        let mut b = EnemyBullet::new(Vec2::ZERO, 1.0, &mut r);
        let before = b.vel;
        b.freeze();
        assert_eq!(b.vel, Vec2::ZERO);
        b.resume();
        assert_eq!(b.vel, before);
    }
}
