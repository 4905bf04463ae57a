//! Combat and spawn director
//!
//! Wave sizing, enemy/boss spawning, periodic pickups, drop tables and kill
//! rewards. Every function takes the whole [`GameState`] so the bookkeeping
//! stays in one place.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::enemy::{Enemy, EnemyKind};
use super::obstacles::ObstacleMap;
use super::pickup::{Item, ItemKind, PowerUpKind, Star};
use super::state::{Countdown, GameEvent, GamePhase, GameState};
use super::timer::{Millis, Timer};
use crate::consts::*;

/// Boss death burst colour
const BOSS_BURST: u32 = 0xff6432;
const BLOOD_DARK: u32 = 0xc83232;
const BLOOD_LIGHT: u32 = 0xff6464;

/// Total regular enemies a wave issues
pub fn enemies_per_wave(wave: u32) -> u32 {
    5 + wave * 2
}

/// Alive enemies allowed at once
pub fn max_alive(wave: u32) -> usize {
    (5 + wave as usize * 2).min(25)
}

/// Enemies spawned per batch
pub fn batch_size(wave: u32) -> u32 {
    (1 + wave / 2).min(10)
}

pub fn spawn_interval(wave: u32) -> Millis {
    (3000.0 - wave as f64 * 100.0).max(1500.0)
}

/// Bosses arriving this wave: one every third wave, then two on every even wave from wave 6
pub fn boss_count(wave: u32) -> u32 {
    if wave >= DOUBLE_BOSS_WAVE {
        if wave % 2 == 0 { 2 } else { 0 }
    } else if wave % BOSS_SPAWN_WAVE == 0 {
        1
    } else {
        0
    }
}

pub fn boss_is_shooter(wave: u32) -> bool {
    (wave / BOSS_SPAWN_WAVE) % 2 == 0
}

pub fn shooter_chance(wave: u32) -> f64 {
    (0.1 + wave as f64 * 0.05).min(0.5)
}

/// Per-wave spawn bookkeeping
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaveState {
    pub number: u32,
    pub enemies_per_wave: u32,
    /// Regular enemies issued so far
    pub spawned: u32,
    /// Batch cadence; `duration` is the wave's spawn interval
    pub spawn_timer: Timer,
    pub boss_spawned: bool,
    /// Completion bonus paid
    pub completed: bool,
    pub completed_at: Option<Millis>,
}

impl WaveState {
    pub fn new(number: u32, now: Millis) -> Self {
        Self {
            number,
            enemies_per_wave: enemies_per_wave(number),
            spawned: 0,
            spawn_timer: Timer::started(spawn_interval(number), now),
            boss_spawned: false,
            completed: false,
            completed_at: None,
        }
    }

    pub fn quota_issued(&self) -> bool {
        self.spawned >= self.enemies_per_wave
    }
}

/// Outcome of a spawn position search
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpawnSearch {
    Found(Vec2),
    /// Every attempt was blocked; carries the last candidate
    Exhausted(Vec2),
}

/// Random ring search around `origin`, clamped into the arena
pub fn search_spawn<R: Rng>(
    rng: &mut R,
    map: &ObstacleMap,
    origin: Vec2,
    min_dist: i32,
    max_dist: i32,
    margin: f32,
    boss: bool,
) -> SpawnSearch {
    let mut last = origin;
    for _ in 0..SPAWN_ATTEMPTS {
        let angle = rng.random::<f32>() * std::f32::consts::TAU;
        let dist = rng.random_range(min_dist..=max_dist) as f32;
        let candidate = map
            .arena
            .clamp_spawn(origin + Vec2::new(angle.cos(), angle.sin()) * dist, margin);
        if map.is_spawn_valid(candidate, boss) {
            return SpawnSearch::Found(candidate);
        }
        last = candidate;
    }
    SpawnSearch::Exhausted(last)
}

/// Spawn one enemy for the current wave; always produces an enemy
pub fn spawn_enemy(state: &mut GameState, boss: bool) -> u32 {
    let wave = state.wave.number;
    let search = search_spawn(
        &mut state.rng,
        &state.map,
        state.player.pos,
        ENEMY_SPAWN_MIN_DIST,
        ENEMY_SPAWN_MAX_DIST,
        ENEMY_SPAWN_MARGIN,
        boss,
    );
    let pos = match search {
        SpawnSearch::Found(p) => p,
        SpawnSearch::Exhausted(p) => {
            log::warn!("No clear spawn point after {SPAWN_ATTEMPTS} attempts, using {p}");
            p
        }
    };

    let kind = if boss {
        if boss_is_shooter(wave) {
            EnemyKind::Shooter
        } else {
            EnemyKind::Zombie
        }
    } else if state.rng.random::<f64>() < shooter_chance(wave) {
        EnemyKind::Shooter
    } else {
        EnemyKind::Zombie
    };

    let id = state.next_entity_id();
    state.enemies.push(Enemy::new(id, pos, kind, boss, wave));
    log::debug!("Spawned {kind:?} #{id} (boss: {boss}) at {pos}");
    id
}

/// Batch spawning and boss arrival for an active wave
pub fn update_spawning(state: &mut GameState) {
    let now = state.time;
    let wave = state.wave.number;
    let cap = max_alive(wave);
    let alive = state.enemies.iter().filter(|e| e.alive).count();

    if state.wave.spawn_timer.lapsed(now) && alive < cap && !state.wave.quota_issued() {
        let count = batch_size(wave)
            .min(state.wave.enemies_per_wave - state.wave.spawned)
            .min((cap - alive) as u32);
        for _ in 0..count {
            spawn_enemy(state, false);
            state.wave.spawned += 1;
        }
        state.wave.spawn_timer.restart(now);
    }

    if !state.wave.boss_spawned && state.wave.spawned >= 1 {
        let bosses = boss_count(wave);
        if bosses > 0 {
            for _ in 0..bosses {
                spawn_enemy(state, true);
            }
            state.wave.boss_spawned = true;
            state.screen_shake = 10 + bosses * 5;
            state.events.push(GameEvent::BossIncoming { count: bosses });
            log::info!("Wave {wave}: {bosses} boss(es) incoming");
        }
    }
}

/// Wave is done once its quota is issued and nothing is left alive
///
/// Pays the completion bonus exactly once per wave; returns true on that call.
pub fn check_wave_complete(state: &mut GameState) -> bool {
    if state.phase != GamePhase::WaveActive || state.wave.completed {
        return false;
    }
    if !state.wave.quota_issued() || state.active_enemies() > 0 {
        return false;
    }
    let wave = state.wave.number;
    let bonus = wave * WAVE_BONUS_PER_WAVE;
    state.coins += bonus;
    state.wave.completed = true;
    state.wave.completed_at = Some(state.time);
    state.phase = GamePhase::WaveComplete;
    state.events.push(GameEvent::WaveCompleted { wave, bonus });
    log::info!("Wave {wave} complete, +{bonus} coins");
    true
}

/// Move from the celebration to the shop once the delay has passed
pub fn advance_celebration(state: &mut GameState) {
    if state.phase != GamePhase::WaveComplete {
        return;
    }
    let now = state.time;
    if state
        .wave
        .completed_at
        .is_some_and(|t| now - t >= WAVE_COMPLETE_DELAY)
    {
        state.phase = GamePhase::Shop;
        state.events.push(GameEvent::ShopOpened(state.wave.number));
        log::info!("Shop open after wave {}", state.wave.number);
    }
}

/// Leave the shop: set up the next wave and start its countdown
pub fn begin_next_wave(state: &mut GameState) {
    let now = state.time;
    let next = state.wave.number + 1;
    state.wave = WaveState::new(next, now);
    state.player_bullets.clear();
    state.enemy_bullets.clear();
    state.items.clear();
    spawn_cola(state);
    spawn_cola(state);
    state.cola_timer.restart(now);
    state.countdown = Countdown::default();
    state.phase = GamePhase::Countdown;
    log::info!(
        "Wave {next}: {} enemies, interval {}ms",
        state.wave.enemies_per_wave,
        state.wave.spawn_timer.duration
    );
}

/// Bookkeeping for one confirmed death
pub fn reward_kill(state: &mut GameState, id: u32, boss: bool, at: Vec2) {
    let now = state.time;
    state.kills += 1;
    state.player.score += 1;
    let multiplier = state.combo.register_kill(now);

    let base = if boss { BOSS_KILL_COINS } else { KILL_COINS };
    let mut coins = (base as f32 * multiplier).floor() as u32;
    if boss {
        coins += BOSS_BONUS_BASE + state.wave.number * BOSS_BONUS_PER_WAVE;
    }
    state.coins += coins;
    state.screen_shake = if boss { SHAKE_BOSS_KILL } else { SHAKE_KILL };

    if boss {
        state.particles.burst(&mut state.rng, at, BOSS_BURST, 30, 8.0);
    } else {
        state.particles.burst(&mut state.rng, at, BLOOD_DARK, 12, 5.0);
        state.particles.burst(&mut state.rng, at, BLOOD_LIGHT, 8, 3.0);
    }

    drop_items(state, at, boss);
    state.events.push(GameEvent::EnemyKilled {
        id,
        boss,
        at,
        coins,
    });
    log::debug!(
        "Killed #{id} (boss: {boss}), +{coins} coins, combo x{:.1}",
        multiplier
    );
}

/// Death drops: bosses scatter five, regular enemies roll once
pub fn drop_items(state: &mut GameState, at: Vec2, boss: bool) {
    if boss {
        for _ in 0..BOSS_DROP_COUNT {
            let dx = state.rng.random_range(-BOSS_DROP_SPREAD..=BOSS_DROP_SPREAD) as f32;
            let dy = state.rng.random_range(-BOSS_DROP_SPREAD..=BOSS_DROP_SPREAD) as f32;
            let pos = at + Vec2::new(dx, dy);
            if state.map.is_spawn_valid(pos, false) {
                let kind = if state.rng.random::<f64>() < 0.5 {
                    ItemKind::Coin
                } else {
                    ItemKind::Potion
                };
                state.items.push(Item::new(pos, kind));
            }
        }
        return;
    }

    let roll = state.rng.random::<f64>();
    let kind = if roll < COIN_DROP_CHANCE {
        ItemKind::Coin
    } else if roll < POTION_DROP_CHANCE {
        ItemKind::Potion
    } else {
        return;
    };
    if state.map.is_spawn_valid(at, false) {
        state.items.push(Item::new(at, kind));
    }
}

/// Drop a potion near the player, or on the player if nowhere is clear
pub fn spawn_cola(state: &mut GameState) {
    let pos = match search_pickup_spot(state) {
        SpawnSearch::Found(p) => p,
        SpawnSearch::Exhausted(_) => state.player.pos,
    };
    state.items.push(Item::new(pos, ItemKind::Potion));
    log::debug!("Potion spawned at {pos}");
}

/// Place a random power-up star near the player; nothing if nowhere is clear
pub fn spawn_star(state: &mut GameState) -> bool {
    match search_pickup_spot(state) {
        SpawnSearch::Found(pos) => {
            let kind = PowerUpKind::random(&mut state.rng);
            state.stars.push(Star::new(pos, kind, state.time));
            log::debug!("{kind:?} star spawned at {pos}");
            true
        }
        SpawnSearch::Exhausted(_) => {
            log::warn!("No clear spot for a star");
            false
        }
    }
}

fn search_pickup_spot(state: &mut GameState) -> SpawnSearch {
    search_spawn(
        &mut state.rng,
        &state.map,
        state.player.pos,
        PICKUP_SPAWN_MIN_DIST,
        PICKUP_SPAWN_MAX_DIST,
        PICKUP_SPAWN_MARGIN,
        false,
    )
}

/// Timed potion and star spawners
pub fn periodic_spawns(state: &mut GameState) {
    let now = state.time;
    if state.cola_timer.done(now) {
        spawn_cola(state);
        state.cola_timer.restart(now);
    }
    if state.wave.number >= STAR_MIN_WAVE && state.star_timer.done(now) {
        spawn_star(state);
        state.star_timer.restart(now);
    }
}
