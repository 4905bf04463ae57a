//! Per-frame simulation tick
//!
//! One call advances the session by the host's frame delta. The phases run in
//! a fixed order: game over, pause and shop short-circuits, countdown, player,
//! enemies, bullets, pickups, particles, spawning, wave completion, periodic
//! spawners, power-up expiry, decay. Later phases see what earlier ones did in
//! the same tick.

use glam::Vec2;

use super::autopilot;
use super::bullet::{BulletOutcome, EnemyBullet, PlayerBullet};
use super::director;
use super::enemy::EnemyContext;
use super::pickup::{ItemEffect, PowerUpKind};
use super::player::{Movement, PlayerControl};
use super::shop::{self, ShopOption};
use super::state::{GameEvent, GamePhase, GameState};
use super::timer::Millis;
use super::weapon::Weapon;
use crate::consts::*;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Held direction keys
    pub movement: Movement,
    /// Dash key went down this tick
    pub dash: bool,
    /// Fire button held
    pub fire: bool,
    /// Aim point in world coordinates
    pub aim: Option<Vec2>,
    /// Pause toggle
    pub pause: bool,
    /// Leave the shop and start the next countdown
    pub shop_continue: bool,
    /// Shop menu choice
    pub buy: Option<ShopOption>,
    /// Start over after game over
    pub restart: bool,
    /// Idle/demo mode - the autopilot plays
    pub idle_mode: bool,
}

/// Advance the game state by `dt` milliseconds of host time
pub fn tick(state: &mut GameState, input: &TickInput, dt: Millis) {
    state.events.clear();
    let dt = dt.max(0.0);
    state.time += dt;

    let mut input = input.clone();
    if input.idle_mode {
        autopilot::drive(state, &mut input);
    }
    let input = &input;

    // Game over beats everything, including pause and shop
    if state.phase == GamePhase::GameOver || state.player.health <= 0 {
        enter_game_over(state);
        if input.restart {
            state.restart();
        }
        return;
    }

    if input.pause && state.phase == GamePhase::WaveActive {
        if state.paused {
            resume(state);
        } else {
            state.paused = true;
            freeze_world(state);
            state.events.push(GameEvent::Paused);
            log::debug!("Paused at {:.0}ms", state.time);
        }
    }
    if state.paused {
        return;
    }

    if state.phase == GamePhase::Shop {
        freeze_world(state);
        if let Some(option) = input.buy {
            shop::purchase(state, option);
        }
        if input.shop_continue {
            director::begin_next_wave(state);
        }
        return;
    }

    let now = state.time;
    if state.phase == GamePhase::Countdown && state.countdown.advance(now) {
        state.phase = GamePhase::WaveActive;
        state.wave.spawn_timer.restart(now);
        state.events.push(GameEvent::WaveStarted(state.wave.number));
        log::info!("Wave {} started", state.wave.number);
    }

    update_player(state, input, dt);
    update_enemies(state, dt);
    update_bullets(state, dt);
    update_pickups(state, dt);
    state.particles.update(Vec2::ZERO);

    if state.phase == GamePhase::WaveActive {
        director::update_spawning(state);
    }
    director::check_wave_complete(state);
    director::advance_celebration(state);
    director::periodic_spawns(state);

    for kind in state.powers.expire(now) {
        state.events.push(GameEvent::PowerUpExpired(kind));
        log::debug!("{kind:?} expired");
    }

    state.screen_shake = state.screen_shake.saturating_sub(1);
    state.combo.decay(now);
    state.hurt_flash = (state.hurt_flash - HURT_FLASH_DECAY).max(0);
}

/// Runs its body once per death, then only holds the world still
fn enter_game_over(state: &mut GameState) {
    if state.game_over_handled {
        return;
    }
    state.game_over_handled = true;
    state.phase = GamePhase::GameOver;
    state.paused = false;
    freeze_world(state);
    state.events.push(GameEvent::GameOver {
        wave: state.wave.number,
        kills: state.kills,
    });
    log::info!(
        "Game over on wave {} with {} kills, {} coins",
        state.wave.number,
        state.kills,
        state.coins
    );
}

fn resume(state: &mut GameState) {
    state.paused = false;
    for b in &mut state.player_bullets {
        b.resume();
    }
    for b in &mut state.enemy_bullets {
        b.resume();
    }
    state.weapon.disable_for(state.time, SHOOT_RESUME_DELAY);
    state.events.push(GameEvent::Resumed);
    log::debug!("Resumed at {:.0}ms", state.time);
}

/// Zero every velocity without removing anything
fn freeze_world(state: &mut GameState) {
    state.player.freeze();
    for e in &mut state.enemies {
        e.freeze();
    }
    for b in &mut state.player_bullets {
        b.freeze();
    }
    for b in &mut state.enemy_bullets {
        b.freeze();
    }
}

fn update_player(state: &mut GameState, input: &TickInput, dt: Millis) {
    let now = state.time;
    let ctl = PlayerControl {
        now,
        dt,
        movement: input.movement,
        dash_pressed: input.dash,
        invincible: state.powers.is_active(PowerUpKind::Invincible),
    };
    state.player.update(&ctl, &state.map);

    if let Some(aim) = input.aim {
        state.weapon.aim_at(state.player.pos, aim);
    }
    let multishot = state.powers.is_active(PowerUpKind::Multishot);
    let angles = state.weapon.trigger(now, input.fire, multishot);
    if angles.is_empty() {
        return;
    }
    let origin = Weapon::muzzle(state.player.pos);
    for angle in &angles {
        let bullet = PlayerBullet::new(origin, *angle, state.weapon.damage_bonus, &mut state.rng);
        state.player_bullets.push(bullet);
    }
    state.events.push(GameEvent::ShotFired {
        bullets: angles.len() as u32,
    });
}

/// AI pass, then the death-reward pass
fn update_enemies(state: &mut GameState, dt: Millis) {
    let ctx = EnemyContext {
        now: state.time,
        dt,
        invincible: state.powers.is_active(PowerUpKind::Invincible),
    };

    for enemy in state.enemies.iter_mut() {
        let Some(action) = enemy.update(&ctx, &mut state.player, &state.map, &mut state.rng)
        else {
            continue;
        };
        for angle in action.shots {
            let bullet = EnemyBullet::new(action.origin, angle, &mut state.rng);
            state.enemy_bullets.push(bullet);
        }
        if action.player_damaged {
            state.hurt_flash = HURT_FLASH;
            state.screen_shake = SHAKE_PLAYER_HIT;
            state.events.push(GameEvent::PlayerHurt {
                health: state.player.health,
            });
        }
        if action.contact_hit {
            state.screen_shake = SHAKE_CONTACT;
        }
    }

    let dead: Vec<(u32, bool, Vec2)> = state
        .enemies
        .iter_mut()
        .filter(|e| !e.alive && !e.reward_granted)
        .map(|e| {
            e.reward_granted = true;
            (e.id, e.boss, e.pos)
        })
        .collect();
    for (id, boss, at) in dead {
        director::reward_kill(state, id, boss, at);
    }
    state.enemies.retain(|e| e.alive || !e.reward_granted);
}

fn update_bullets(state: &mut GameState, dt: Millis) {
    let now = state.time;
    let boss_killer = state.powers.is_active(PowerUpKind::BossKiller);
    let invincible = state.powers.is_active(PowerUpKind::Invincible);

    let mut bullets = std::mem::take(&mut state.player_bullets);
    bullets.retain_mut(|b| {
        match b.update(dt, &mut state.enemies, &state.map, boss_killer, now) {
            BulletOutcome::HitEnemy { index, damage, at } => {
                state.screen_shake = SHAKE_ENEMY_HIT;
                state.events.push(GameEvent::EnemyHit {
                    id: state.enemies[index].id,
                    damage,
                    at,
                });
                false
            }
            outcome => !outcome.is_spent(),
        }
    });
    state.player_bullets = bullets;

    let mut bullets = std::mem::take(&mut state.enemy_bullets);
    bullets.retain_mut(|b| {
        match b.update(dt, &mut state.player, &state.map, invincible, now) {
            BulletOutcome::HitPlayer => {
                state.hurt_flash = HURT_FLASH;
                state.screen_shake = SHAKE_PLAYER_HIT;
                state.events.push(GameEvent::PlayerHurt {
                    health: state.player.health,
                });
                false
            }
            outcome => !outcome.is_spent(),
        }
    });
    state.enemy_bullets = bullets;
}

fn update_pickups(state: &mut GameState, dt: Millis) {
    let mut items = std::mem::take(&mut state.items);
    items.retain_mut(|item| match item.update(dt, &mut state.player) {
        None => true,
        Some(ItemEffect::Coins(amount)) => {
            state.coins += amount;
            state.events.push(GameEvent::CoinCollected { amount });
            false
        }
        Some(ItemEffect::Healed(healed)) => {
            state.events.push(GameEvent::PotionConsumed { healed });
            false
        }
    });
    state.items = items;

    let mut picked = Vec::new();
    state.stars.retain(|star| match star.update(&state.player) {
        Some(kind) => {
            picked.push(kind);
            false
        }
        None => true,
    });
    for kind in picked {
        state.powers.activate(kind, state.time);
        state.events.push(GameEvent::PowerUpActivated(kind));
        log::debug!("{kind:?} activated");
    }
}
