//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time only advances through [`tick`]
//! - Seeded RNG only (one generator, owned by the state)
//! - Stable iteration order (by entity ID)
//! - No rendering, audio or platform dependencies

pub mod autopilot;
pub mod bullet;
pub mod director;
pub mod enemy;
pub mod geom;
pub mod obstacles;
pub mod particle;
pub mod pickup;
pub mod player;
pub mod shop;
pub mod state;
pub mod tick;
pub mod timer;
pub mod weapon;

pub use bullet::{BulletOutcome, EnemyBullet, PlayerBullet};
pub use director::WaveState;
pub use enemy::{Enemy, EnemyKind};
pub use geom::Rect;
pub use obstacles::{ArenaBounds, MapError, ObstacleMap, ObstacleTile};
pub use particle::{Particle, ParticleField};
pub use pickup::{Item, ItemKind, PowerUpKind, Star};
pub use player::{Movement, Player};
pub use shop::{ShopOffer, ShopOption};
pub use state::{Combo, Countdown, GameEvent, GamePhase, GameState, PowerUps};
pub use tick::{TickInput, tick};
pub use timer::{Millis, Timer, Toggle};
pub use weapon::Weapon;
