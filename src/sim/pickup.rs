//! Collectibles: coins, potions and power-up stars

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::geom::Rect;
use super::player::Player;
use super::timer::{FrameCounter, Millis};
use crate::consts::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemKind {
    Coin,
    /// Health potion (a cola can)
    Potion,
}

/// Effect of collecting an item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemEffect {
    Coins(u32),
    /// Amount actually restored (zero at full health)
    Healed(i32),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub pos: Vec2,
    pub kind: ItemKind,
    /// Coin spin; potions stay on frame 0
    pub anim: FrameCounter,
}

impl Item {
    pub fn new(pos: Vec2, kind: ItemKind) -> Self {
        Self {
            pos,
            kind,
            anim: FrameCounter::new(ANIM_FRAMES, COIN_ANIM_STEP),
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::square(self.pos, ITEM_SIZE)
    }

    /// Animate, then collect on overlap with the player
    pub fn update(&mut self, dt: Millis, player: &mut Player) -> Option<ItemEffect> {
        if self.kind == ItemKind::Coin {
            self.anim.advance(dt);
        }
        if !self.bounds().intersects(&player.bounds()) {
            return None;
        }
        Some(match self.kind {
            ItemKind::Coin => ItemEffect::Coins(COIN_VALUE),
            ItemKind::Potion => ItemEffect::Healed(player.heal(POTION_HEAL)),
        })
    }
}

/// Timed buffs granted by stars
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// Red star: no damage taken, contact damages enemies
    Invincible,
    /// Gold star: every shot adds a full-circle fan
    Multishot,
    /// Purple star: triple damage on bosses, one-shot everything else
    BossKiller,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 3] = [
        PowerUpKind::Invincible,
        PowerUpKind::Multishot,
        PowerUpKind::BossKiller,
    ];

    /// Uniformly random kind
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }

    /// Core colour of the star and the player glow (0xRRGGBB)
    pub fn color(&self) -> u32 {
        match self {
            PowerUpKind::Invincible => 0xff3232,
            PowerUpKind::Multishot => 0xffff32,
            PowerUpKind::BossKiller => 0xb432ff,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Star {
    pub pos: Vec2,
    pub kind: PowerUpKind,
    pub spawned_at: Millis,
}

impl Star {
    pub fn new(pos: Vec2, kind: PowerUpKind, now: Millis) -> Self {
        Self {
            pos,
            kind,
            spawned_at: now,
        }
    }

    /// Cosmetic scale factor around 1.0
    pub fn pulse(&self, now: Millis) -> f32 {
        1.0 + 0.15 * ((now - self.spawned_at) / 150.0).sin() as f32
    }

    pub fn bounds(&self) -> Rect {
        Rect::square(self.pos, STAR_SIZE)
    }

    /// Power-up granted if the player touches the star this tick
    pub fn update(&self, player: &Player) -> Option<PowerUpKind> {
        self.bounds()
            .intersects(&player.bounds())
            .then_some(self.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_coin_pickup() {
        let mut player = Player::new(Vec2::new(100.0, 100.0));
        let mut far = Item::new(Vec2::new(400.0, 100.0), ItemKind::Coin);
        assert_eq!(far.update(16.0, &mut player), None);
        let mut near = Item::new(Vec2::new(120.0, 100.0), ItemKind::Coin);
        assert_eq!(near.update(16.0, &mut player), Some(ItemEffect::Coins(10)));
    }

    #[test]
    fn test_potion_heal_clamps() {
        let mut player = Player::new(Vec2::new(100.0, 100.0));
        player.health = 95;
        let mut potion = Item::new(Vec2::new(100.0, 100.0), ItemKind::Potion);
        assert_eq!(potion.update(16.0, &mut player), Some(ItemEffect::Healed(5)));
        assert_eq!(player.health, 100);
    }

    #[test]
    fn test_coin_spins_potion_does_not() {
        let mut player = Player::new(Vec2::ZERO);
        let mut coin = Item::new(Vec2::new(1000.0, 0.0), ItemKind::Coin);
        let mut potion = Item::new(Vec2::new(1000.0, 0.0), ItemKind::Potion);
        for _ in 0..7 {
            coin.update(16.0, &mut player);
            potion.update(16.0, &mut player);
        }
        assert_eq!(coin.anim.frame, 1);
        assert_eq!(potion.anim.frame, 0);
    }

    #[test]
    fn test_star_yields_kind_on_touch() {
        let player = Player::new(Vec2::new(100.0, 100.0));
        let star = Star::new(Vec2::new(200.0, 100.0), PowerUpKind::Multishot, 0.0);
        assert_eq!(star.update(&player), Some(PowerUpKind::Multishot));
        let far = Star::new(Vec2::new(400.0, 100.0), PowerUpKind::Multishot, 0.0);
        assert_eq!(far.update(&player), None);
    }

    #[test]
    fn test_star_pulse_bounds() {
        let star = Star::new(Vec2::ZERO, PowerUpKind::Invincible, 1000.0);
        assert_eq!(star.pulse(1000.0), 1.0);
        for t in 0..200 {
            let p = star.pulse(1000.0 + t as f64 * 37.0);
            assert!((0.849..=1.151).contains(&p));
        }
    }

    #[test]
    fn test_random_kind_covers_all() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut seen = [false; 3];
        for _ in 0..100 {
            let kind = PowerUpKind::random(&mut rng);
            let i = PowerUpKind::ALL.iter().position(|k| *k == kind).unwrap();
            seen[i] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }
}
