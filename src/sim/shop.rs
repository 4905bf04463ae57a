//! Between-wave shop
//!
//! Purchases are plain state transitions. A purchase whose conditions are not
//! met (wrong phase, not enough coins, full health, already owned) leaves the
//! state untouched.

use serde::{Deserialize, Serialize};

use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShopOption {
    /// +10 bullet damage; price rises with each level
    WeaponUpgrade,
    PartialHeal,
    FullHeal,
    /// Permanent aiming line
    LaserSight,
}

impl ShopOption {
    pub const ALL: [ShopOption; 4] = [
        ShopOption::WeaponUpgrade,
        ShopOption::PartialHeal,
        ShopOption::FullHeal,
        ShopOption::LaserSight,
    ];

    /// Map the menu keys 1-4
    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(ShopOption::WeaponUpgrade),
            2 => Some(ShopOption::PartialHeal),
            3 => Some(ShopOption::FullHeal),
            4 => Some(ShopOption::LaserSight),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ShopOption::WeaponUpgrade => "Weapon Upgrade",
            ShopOption::PartialHeal => "Heal +20",
            ShopOption::FullHeal => "Full Heal",
            ShopOption::LaserSight => "Laser Sight",
        }
    }
}

/// One line of the shop menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ShopOffer {
    pub option: ShopOption,
    pub cost: u32,
    /// Purchase would go through right now
    pub available: bool,
    /// Laser sight already bought
    pub owned: bool,
}

/// Price and availability of `option` for the current state
pub fn offer(state: &GameState, option: ShopOption) -> ShopOffer {
    let hurt = state.player.health < state.player.max_health;
    let (cost, allowed, owned) = match option {
        ShopOption::WeaponUpgrade => (state.weapon.upgrade_cost(), true, false),
        ShopOption::PartialHeal => (PARTIAL_HEAL_COST, hurt, false),
        ShopOption::FullHeal => (FULL_HEAL_COST, hurt, false),
        ShopOption::LaserSight => {
            let owned = state.weapon.laser_sight;
            (LASER_SIGHT_COST, !owned, owned)
        }
    };
    ShopOffer {
        option,
        cost,
        available: allowed && state.coins >= cost,
        owned,
    }
}

pub fn offers(state: &GameState) -> Vec<ShopOffer> {
    ShopOption::ALL.iter().map(|o| offer(state, *o)).collect()
}

/// Try to buy `option`; returns true if the purchase went through
pub fn purchase(state: &mut GameState, option: ShopOption) -> bool {
    if state.phase != GamePhase::Shop {
        return false;
    }
    let deal = offer(state, option);
    if !deal.available {
        return false;
    }
    state.coins -= deal.cost;
    match option {
        ShopOption::WeaponUpgrade => state.weapon.upgrade(),
        ShopOption::PartialHeal => {
            state.player.heal(PARTIAL_HEAL_AMOUNT);
        }
        ShopOption::FullHeal => state.player.health = state.player.max_health,
        ShopOption::LaserSight => state.weapon.laser_sight = true,
    }
    state.events.push(GameEvent::Purchased {
        option,
        cost: deal.cost,
    });
    log::debug!("Bought {} for {} coins", option.label(), deal.cost);
    true
}
