//! Read-only HUD snapshot
//!
//! Everything a presentation layer needs to draw the overlay, derived from the
//! game state once per frame. Building a snapshot never touches the state.

use glam::Vec2;
use serde::Serialize;

use crate::settings::Settings;
use crate::sim::pickup::PowerUpKind;
use crate::sim::shop::{self, ShopOffer};
use crate::sim::{GamePhase, GameState};
use crate::consts::*;

/// Laser sight starts this far from the player
const LASER_OFFSET: f32 = 30.0;
const LASER_LENGTH: f32 = 800.0;
/// Hurt overlay alpha ceiling (out of 255)
const HURT_ALPHA_MAX: i32 = 150;

/// Health bar colour band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HealthBand {
    Green,
    Orange,
    Red,
}

impl HealthBand {
    pub fn from_ratio(ratio: f32) -> Self {
        if ratio > 0.6 {
            HealthBand::Green
        } else if ratio > 0.3 {
            HealthBand::Orange
        } else {
            HealthBand::Red
        }
    }

    /// 0xRRGGBB
    pub fn color(&self) -> u32 {
        match self {
            HealthBand::Green => 0x00ff00,
            HealthBand::Orange => 0xffa500,
            HealthBand::Red => 0xff0000,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PowerUpTimer {
    pub kind: PowerUpKind,
    /// Whole seconds left, rounded up
    pub seconds: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LaserSegment {
    pub start: Vec2,
    pub end: Vec2,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HudSnapshot {
    pub phase: GamePhase,
    pub paused: bool,
    pub wave: u32,
    pub coins: u32,
    pub kills: u32,
    /// Shown only during the pre-wave countdown
    pub countdown: Option<i32>,
    pub combo: u32,
    pub combo_multiplier: f32,

    pub health: i32,
    pub max_health: i32,
    pub health_ratio: f32,
    pub health_band: HealthBand,
    /// 0 right after a dash, 1 when the next dash is ready
    pub dash_ratio: f32,

    /// Active power-ups in fixed order
    pub power_ups: Vec<PowerUpTimer>,
    /// Any power-up running; the player sprite switches to its powered look
    pub powered: bool,
    /// Player glow colour, highest priority active power-up first
    pub glow: Option<u32>,
    /// Red overlay alpha in [0, 1]
    pub hurt_alpha: f32,
    /// Camera shake magnitude after settings
    pub screen_shake: u32,
    pub laser: Option<LaserSegment>,
    /// Empty unless the shop is open
    pub shop: Vec<ShopOffer>,

    pub player_pos: Vec2,
    pub player_frame: u8,
    pub player_flip: bool,
    pub enemies_alive: usize,
}

impl HudSnapshot {
    pub fn capture(state: &GameState, settings: &Settings) -> Self {
        let now = state.time;
        let player = &state.player;

        let health = player.display_health();
        let health_ratio = if player.max_health > 0 {
            health as f32 / player.max_health as f32
        } else {
            0.0
        };
        let dash_ratio = ((now - player.last_dash()) / DASH_COOLDOWN).clamp(0.0, 1.0) as f32;

        let power_ups = PowerUpKind::ALL
            .into_iter()
            .filter_map(|kind| {
                state
                    .powers
                    .remaining_secs(kind, now)
                    .map(|seconds| PowerUpTimer { kind, seconds })
            })
            .collect();

        // First match wins: invincible, multishot, boss killer
        let glow = if settings.powerup_effects {
            PowerUpKind::ALL
                .into_iter()
                .find(|k| state.powers.is_active(*k))
                .map(|k| k.color())
        } else {
            None
        };

        let hurt_alpha = if settings.effective_hurt_flash() {
            (state.hurt_flash * 3).clamp(0, HURT_ALPHA_MAX) as f32 / 255.0
        } else {
            0.0
        };

        let laser = state.weapon.laser_sight.then(|| {
            let dir = state.weapon.aim_vector();
            let start = player.pos + dir * LASER_OFFSET;
            LaserSegment {
                start,
                end: start + dir * LASER_LENGTH,
            }
        });

        let shop = if state.phase == GamePhase::Shop {
            shop::offers(state)
        } else {
            Vec::new()
        };

        Self {
            phase: state.phase,
            paused: state.paused,
            wave: state.wave.number,
            coins: state.coins,
            kills: state.kills,
            countdown: (state.phase == GamePhase::Countdown).then_some(state.countdown.value),
            combo: state.combo.count,
            combo_multiplier: state.combo.multiplier,
            health,
            max_health: player.max_health,
            health_ratio,
            health_band: HealthBand::from_ratio(health_ratio),
            dash_ratio,
            power_ups,
            powered: state.powers.any_active(),
            glow,
            hurt_alpha,
            screen_shake: if settings.effective_screen_shake() {
                state.screen_shake
            } else {
                0
            },
            laser,
            shop,
            player_pos: player.pos,
            player_frame: player.anim.frame,
            player_flip: player.flip_x,
            enemies_alive: state.active_enemies(),
        }
    }
}
