//! Smile Survivor - a top-down wave survival shooter
//!
//! Core modules:
//! - `sim`: Seeded simulation (entities, collisions, waves, shop)
//! - `hud`: Read-only presentation snapshot derived from the game state
//! - `audio`: Sound effect dispatch from game events
//! - `settings`: Player preferences

pub mod audio;
pub mod hud;
pub mod settings;
pub mod sim;

pub use hud::HudSnapshot;
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
///
/// Times are milliseconds, speeds are pixels per second unless noted.
pub mod consts {
    /// Tile edge length of the obstacle grid
    pub const TILE_SIZE: f32 = 16.0;
    /// Number of distinct tile codes in a map grid (0-7)
    pub const TILE_TYPES: u8 = 8;
    /// World size (200 tiles square)
    pub const MAP_SIZE: f32 = 3200.0;
    pub const MAP_COLS: usize = 200;
    pub const MAP_ROWS: usize = 200;
    /// Wall thickness of the built-in arena, in tiles
    pub const BORDER_TILES: usize = 3;

    /// Playable arena (inside the 3-tile border)
    pub const MAP_X_START: f32 = 48.0;
    pub const MAP_X_END: f32 = 3152.0;
    pub const MAP_Y_START: f32 = 48.0;
    pub const MAP_Y_END: f32 = 3152.0;

    /// Collision box edge for regular actors (player, enemies)
    pub const CHARACTER_SIZE: f32 = 96.0;
    /// Bosses are drawn and collide at twice the size
    pub const BOSS_SCALE: f32 = 2.0;

    /// Player
    pub const PLAYER_SPEED: f32 = 195.0;
    pub const PLAYER_MAX_HEALTH: i32 = 100;
    pub const PLAYER_HIT_COOLDOWN: f64 = 500.0;
    pub const DASH_SPEED: f32 = 750.0;
    pub const DASH_DURATION: f64 = 100.0;
    pub const DASH_COOLDOWN: f64 = 1000.0;
    /// Player animation advances every 150ms (60ms * 2.5)
    pub const PLAYER_ANIM_STEP: f64 = 150.0;
    pub const ANIM_FRAMES: u8 = 4;

    /// Weapon
    pub const SHOT_COOLDOWN: f64 = 100.0;
    pub const BULLET_SPEED: f32 = 600.0;
    pub const BULLET_SPEED_RANDOM: i32 = 30;
    pub const BULLET_DAMAGE: i32 = 50;
    pub const BULLET_DAMAGE_RANDOM: i32 = 5;
    pub const BULLET_OFFSET_X: f32 = 7.0;
    pub const BULLET_OFFSET_Y: f32 = 0.0;
    pub const PLAYER_BULLET_SIZE: f32 = 12.0;
    /// Multishot fan: one extra bullet every 22 degrees from 0 up to 360
    pub const MULTISHOT_STEP_DEG: u32 = 22;
    /// Damage added per weapon upgrade
    pub const WEAPON_UPGRADE_DAMAGE: i32 = 10;
    /// Firing is blocked this long after resuming or restarting
    pub const SHOOT_RESUME_DELAY: f64 = 300.0;

    /// Enemies
    pub const ENEMY_SPEED: f32 = 90.0;
    pub const ENEMY_SPEED_RANDOM: i32 = 30;
    pub const ENEMY_HEALTH: i32 = 100;
    pub const ENEMY_HEALTH_PER_WAVE: i32 = 20;
    /// Melee enemies stop closing in at this distance
    pub const ENEMY_RANGE: f32 = 50.0;
    pub const ENEMY_ATTACK_RANGE: f32 = 60.0;
    pub const SHOOTER_SHOOTING_RANGE: f32 = 500.0;
    pub const SHOOTER_COOLDOWN: f64 = 1000.0;
    pub const BOSS_SHOOTER_COOLDOWN: f64 = 1500.0;
    pub const SHOOTER_BULLET_SPEED: f32 = 210.0;
    pub const ENEMY_BULLET_SIZE: f32 = 16.0;
    pub const ENEMY_MELEE_DAMAGE: i32 = 20;
    pub const ENEMY_BULLET_DAMAGE: i32 = 20;
    pub const ENEMY_STUN_COOLDOWN: f64 = 100.0;
    /// Damage dealt to an overlapping enemy each tick while invincible
    pub const INVINCIBLE_CONTACT_DAMAGE: i32 = 50;
    pub const BOSS_HEALTH_MULTIPLIER: i32 = 5;
    pub const BOSS_HEALTH_PER_WAVE: i32 = 50;
    pub const BOSS_SPEED_MULTIPLIER: f32 = 1.5;
    pub const BOSS_SPEED_PER_STAGE: f32 = 0.2;
    /// Boss cadence before wave 6, and the stage length for speed/type
    pub const BOSS_SPAWN_WAVE: u32 = 3;
    /// From this wave on, two bosses arrive on every even wave
    pub const DOUBLE_BOSS_WAVE: u32 = 6;
    /// Boss shotgun offsets in degrees
    pub const BOSS_SPREAD_DEG: [f32; 5] = [-20.0, -10.0, 0.0, 10.0, 20.0];

    /// Items, stars
    pub const ITEM_SIZE: f32 = 32.0;
    pub const COIN_VALUE: u32 = 10;
    pub const POTION_HEAL: i32 = 20;
    pub const COIN_ANIM_STEP: f64 = 100.0;
    pub const STAR_SIZE: f32 = 175.0;
    pub const POWER_DURATION: f64 = 10000.0;

    /// Waves and spawning
    pub const COUNTDOWN_START: i32 = 3;
    pub const WAVE_COMPLETE_DELAY: f64 = 1500.0;
    pub const SPAWN_ATTEMPTS: u32 = 50;
    pub const ENEMY_SPAWN_MIN_DIST: i32 = 300;
    pub const ENEMY_SPAWN_MAX_DIST: i32 = 1000;
    pub const ENEMY_SPAWN_MARGIN: f32 = 100.0;
    pub const PICKUP_SPAWN_MIN_DIST: i32 = 200;
    pub const PICKUP_SPAWN_MAX_DIST: i32 = 500;
    pub const PICKUP_SPAWN_MARGIN: f32 = 150.0;
    /// Extra clearance below the top edge, kept free for the HUD band
    pub const SPAWN_TOP_CLEARANCE: f32 = 100.0;
    pub const COLA_SPAWN_INTERVAL: f64 = 25000.0;
    pub const STAR_SPAWN_INTERVAL: f64 = 45000.0;
    pub const STAR_MIN_WAVE: u32 = 3;
    pub const BOSS_DROP_COUNT: u32 = 5;
    pub const BOSS_DROP_SPREAD: i32 = 50;
    pub const COIN_DROP_CHANCE: f64 = 0.15;
    pub const POTION_DROP_CHANCE: f64 = 0.20;

    /// Rewards
    pub const COMBO_WINDOW: f64 = 2000.0;
    pub const KILL_COINS: u32 = 5;
    pub const BOSS_KILL_COINS: u32 = 25;
    pub const BOSS_BONUS_BASE: u32 = 100;
    pub const BOSS_BONUS_PER_WAVE: u32 = 20;
    pub const WAVE_BONUS_PER_WAVE: u32 = 20;

    /// Shop
    pub const WEAPON_COST_PER_LEVEL: u32 = 50;
    pub const PARTIAL_HEAL_COST: u32 = 30;
    pub const PARTIAL_HEAL_AMOUNT: i32 = 20;
    pub const FULL_HEAL_COST: u32 = 80;
    pub const LASER_SIGHT_COST: u32 = 200;

    /// Screen feedback magnitudes (decay one unit per tick, hurt flash two)
    pub const SHAKE_PLAYER_HIT: u32 = 5;
    pub const SHAKE_ENEMY_HIT: u32 = 3;
    pub const SHAKE_CONTACT: u32 = 3;
    pub const SHAKE_KILL: u32 = 5;
    pub const SHAKE_BOSS_KILL: u32 = 15;
    pub const HURT_FLASH: i32 = 50;
    /// Hurt flash fades by this much per tick
    pub const HURT_FLASH_DECAY: i32 = 2;

    /// Host frame length used by the headless runner and tests (60 Hz)
    pub const SIM_DT: f64 = 1000.0 / 60.0;
}

/// Unit direction for an angle in the "up is positive" aim convention
///
/// Angle 0 points up the screen, positive angles turn clockwise.
#[inline]
pub fn aim_direction(angle: f32) -> Vec2 {
    Vec2::new(angle.sin(), -angle.cos())
}

/// Aim angle (radians) from `from` toward `to` in the "up is positive" convention
#[inline]
pub fn aim_angle(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.x.atan2(-d.y)
}

/// Screen-space aim angle (degrees) used by the player's weapon: `atan2(dx, dy)`
#[inline]
pub fn weapon_angle_deg(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.x.atan2(d.y).to_degrees()
}
