//! The player's gun: aiming, fire latch, upgrades

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::timer::{Millis, Timer};
use crate::consts::*;
use crate::weapon_angle_deg;

/// Player weapon state carried across waves
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Weapon {
    pub level: u32,
    /// Added to every player bullet's damage
    pub damage_bonus: i32,
    pub laser_sight: bool,
    /// Last aim angle in degrees (`atan2(dx, dy)`, 0 = straight down)
    pub aim_deg: f32,
    pub shot_timer: Timer,
    /// Set when a shot fires, cleared when the trigger is released
    pub latched: bool,
    /// No shots until strictly after this time
    pub disabled_until: Millis,
}

impl Default for Weapon {
    fn default() -> Self {
        Self {
            level: 1,
            damage_bonus: 0,
            laser_sight: false,
            aim_deg: 90.0,
            shot_timer: Timer::new(SHOT_COOLDOWN),
            latched: false,
            disabled_until: 0.0,
        }
    }
}

impl Weapon {
    /// Point the gun from `from` at a world position
    pub fn aim_at(&mut self, from: Vec2, target: Vec2) {
        if target != from {
            self.aim_deg = weapon_angle_deg(from, target);
        }
    }

    /// Block firing for `delay` ms from `now`
    pub fn disable_for(&mut self, now: Millis, delay: Millis) {
        self.disabled_until = now + delay;
    }

    pub fn can_fire(&self, now: Millis) -> bool {
        now > self.disabled_until && self.shot_timer.done(now)
    }

    /// Handle the trigger for one tick; returns the angles (degrees) of the bullets fired
    ///
    /// One shot per press: holding the trigger does not auto-fire.
    pub fn trigger(&mut self, now: Millis, fire_held: bool, multishot: bool) -> Vec<f32> {
        let mut angles = Vec::new();
        if fire_held && !self.latched && self.can_fire(now) {
            angles.push(self.aim_deg);
            if multishot {
                angles.extend((0..360).step_by(MULTISHOT_STEP_DEG as usize).map(|d| d as f32));
            }
            self.latched = true;
            self.shot_timer.restart(now);
        }
        if !fire_held {
            self.latched = false;
        }
        angles
    }

    /// Where bullets leave the gun
    pub fn muzzle(player_pos: Vec2) -> Vec2 {
        player_pos + Vec2::new(BULLET_OFFSET_X, BULLET_OFFSET_Y)
    }

    pub fn upgrade_cost(&self) -> u32 {
        self.level * WEAPON_COST_PER_LEVEL
    }

    pub fn upgrade(&mut self) {
        self.level += 1;
        self.damage_bonus += WEAPON_UPGRADE_DAMAGE;
    }

    /// Unit vector along the current aim in screen space
    pub fn aim_vector(&self) -> Vec2 {
        let a = self.aim_deg.to_radians();
        Vec2::new(a.sin(), a.cos())
    }
}
