//! Game state and core simulation types
//!
//! Everything one session needs lives in [`GameState`], passed by reference
//! into [`super::tick`]. Nothing here is global.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::bullet::{EnemyBullet, PlayerBullet};
use super::director::{self, WaveState};
use super::enemy::Enemy;
use super::obstacles::ObstacleMap;
use super::particle::ParticleField;
use super::pickup::{Item, PowerUpKind, Star};
use super::player::Player;
use super::shop::ShopOption;
use super::timer::{Millis, Timer, Toggle};
use super::weapon::Weapon;
use crate::consts::*;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// 3-2-1 before a wave; the player can move, nothing spawns
    Countdown,
    /// Enemies spawn and fight
    WaveActive,
    /// Wave cleared, short celebration before the shop
    WaveComplete,
    /// Between waves; the world is frozen and upgrades can be bought
    Shop,
    /// Player died
    GameOver,
}

/// Pre-wave countdown
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Countdown {
    /// Set on the first countdown tick
    pub started_at: Option<Millis>,
    pub value: i32,
}

impl Default for Countdown {
    fn default() -> Self {
        Self {
            started_at: None,
            value: COUNTDOWN_START,
        }
    }
}

impl Countdown {
    /// Advance; returns true once the countdown has run out
    pub fn advance(&mut self, now: Millis) -> bool {
        let start = *self.started_at.get_or_insert(now);
        self.value = COUNTDOWN_START - ((now - start) / 1000.0).floor() as i32;
        if self.value <= 0 {
            self.started_at = None;
            true
        } else {
            false
        }
    }
}

/// Chained-kill multiplier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Combo {
    pub count: u32,
    pub multiplier: f32,
    pub last_kill: Option<Millis>,
}

impl Default for Combo {
    fn default() -> Self {
        Self {
            count: 0,
            multiplier: 1.0,
            last_kill: None,
        }
    }
}

impl Combo {
    fn within_window(&self, now: Millis) -> bool {
        self.last_kill.is_some_and(|t| now - t < COMBO_WINDOW)
    }

    /// Record a kill; returns the multiplier that applies to it
    ///
    /// A kill outside the window starts a new chain at count 1 and pays 1.0.
    /// Each chained kill after it adds 0.1, so the second pays 1.1.
    pub fn register_kill(&mut self, now: Millis) -> f32 {
        if self.within_window(now) {
            self.count += 1;
        } else {
            self.count = 1;
        }
        self.multiplier = 1.0 + (self.count - 1) as f32 * 0.1;
        self.last_kill = Some(now);
        self.multiplier
    }

    /// Drop the chain once the window has passed without a kill
    pub fn decay(&mut self, now: Millis) {
        if self.count > 0 && self.last_kill.is_none_or(|t| now - t > COMBO_WINDOW) {
            self.count = 0;
            self.multiplier = 1.0;
        }
    }
}

/// The three independently timed power-ups
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PowerUps {
    pub invincible: Toggle,
    pub multishot: Toggle,
    pub boss_killer: Toggle,
}

impl PowerUps {
    pub fn get(&self, kind: PowerUpKind) -> &Toggle {
        match kind {
            PowerUpKind::Invincible => &self.invincible,
            PowerUpKind::Multishot => &self.multishot,
            PowerUpKind::BossKiller => &self.boss_killer,
        }
    }

    fn get_mut(&mut self, kind: PowerUpKind) -> &mut Toggle {
        match kind {
            PowerUpKind::Invincible => &mut self.invincible,
            PowerUpKind::Multishot => &mut self.multishot,
            PowerUpKind::BossKiller => &mut self.boss_killer,
        }
    }

    /// Turn on, or restart the timer if already on
    pub fn activate(&mut self, kind: PowerUpKind, now: Millis) {
        self.get_mut(kind).set(now);
    }

    #[inline]
    pub fn is_active(&self, kind: PowerUpKind) -> bool {
        self.get(kind).is_on()
    }

    pub fn any_active(&self) -> bool {
        PowerUpKind::ALL.iter().any(|k| self.is_active(*k))
    }

    /// Switch off every power-up whose duration has run out
    pub fn expire(&mut self, now: Millis) -> Vec<PowerUpKind> {
        PowerUpKind::ALL
            .into_iter()
            .filter(|k| self.get_mut(*k).expire_after(POWER_DURATION, now))
            .collect()
    }

    /// Whole seconds left, rounded up; `None` when inactive
    pub fn remaining_secs(&self, kind: PowerUpKind, now: Millis) -> Option<u32> {
        self.get(kind)
            .elapsed(now)
            .map(|elapsed| ((POWER_DURATION - elapsed) / 1000.0).ceil().max(0.0) as u32)
    }
}

/// Something that happened during a tick, for audio and transient effects
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum GameEvent {
    ShotFired { bullets: u32 },
    EnemyHit { id: u32, damage: i32, at: Vec2 },
    EnemyKilled { id: u32, boss: bool, at: Vec2, coins: u32 },
    PlayerHurt { health: i32 },
    CoinCollected { amount: u32 },
    PotionConsumed { healed: i32 },
    PowerUpActivated(PowerUpKind),
    PowerUpExpired(PowerUpKind),
    BossIncoming { count: u32 },
    WaveStarted(u32),
    WaveCompleted { wave: u32, bonus: u32 },
    ShopOpened(u32),
    Purchased { option: ShopOption, cost: u32 },
    Paused,
    Resumed,
    GameOver { wave: u32, kills: u32 },
    Restarted { seed: u64 },
}

/// Complete session state (deterministic for a given seed and input stream)
#[derive(Debug, Clone, Serialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Milliseconds since the session started
    pub time: Millis,
    pub phase: GamePhase,
    /// Pause overlay, only ever set during `WaveActive`
    pub paused: bool,
    pub countdown: Countdown,
    pub wave: WaveState,
    pub coins: u32,
    pub kills: u32,
    pub combo: Combo,
    pub weapon: Weapon,
    pub powers: PowerUps,
    pub screen_shake: u32,
    pub hurt_flash: i32,
    pub cola_timer: Timer,
    pub star_timer: Timer,
    pub player: Player,
    /// Sorted by id (spawn order)
    pub enemies: Vec<Enemy>,
    pub player_bullets: Vec<PlayerBullet>,
    pub enemy_bullets: Vec<EnemyBullet>,
    pub items: Vec<Item>,
    pub stars: Vec<Star>,
    /// Visual particles (not gameplay-affecting)
    pub particles: ParticleField,
    /// Events produced by the most recent tick
    pub events: Vec<GameEvent>,
    /// Game over has been handled
    pub game_over_handled: bool,
    #[serde(skip)]
    pub map: ObstacleMap,
    #[serde(skip)]
    pub rng: Pcg32,
    next_id: u32,
}

impl GameState {
    /// Start a session at wave 1 on `map`
    pub fn new(seed: u64, map: ObstacleMap) -> Self {
        let spawn = map.arena.center();
        let mut state = Self {
            seed,
            time: 0.0,
            phase: GamePhase::Countdown,
            paused: false,
            countdown: Countdown::default(),
            wave: WaveState::new(1, 0.0),
            coins: 0,
            kills: 0,
            combo: Combo::default(),
            weapon: Weapon::default(),
            powers: PowerUps::default(),
            screen_shake: 0,
            hurt_flash: 0,
            cola_timer: Timer::new(COLA_SPAWN_INTERVAL),
            star_timer: Timer::new(STAR_SPAWN_INTERVAL),
            player: Player::new(spawn),
            enemies: Vec::new(),
            player_bullets: Vec::new(),
            enemy_bullets: Vec::new(),
            items: Vec::new(),
            stars: Vec::new(),
            particles: ParticleField::default(),
            events: Vec::new(),
            game_over_handled: false,
            map,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        };

        director::spawn_cola(&mut state);
        director::spawn_cola(&mut state);
        log::info!("Session started (seed {seed})");
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Enemies still in the fight
    pub fn active_enemies(&self) -> usize {
        self.enemies.iter().filter(|e| e.is_active()).count()
    }

    /// Seed for the session that follows this one
    pub fn next_seed(&self) -> u64 {
        self.seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407)
    }

    /// Start over at wave 1 on the same map
    pub fn restart(&mut self) {
        let seed = self.next_seed();
        let cap = self.particles.cap;
        let map = std::mem::take(&mut self.map);
        *self = GameState::new(seed, map);
        self.particles.cap = cap;
        self.weapon.disable_for(self.time, SHOOT_RESUME_DELAY);
        self.events.push(GameEvent::Restarted { seed });
        log::info!("Restarted with seed {seed}");
    }

    /// Ensure entities are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.enemies.sort_by_key(|e| e.id);
    }
}
