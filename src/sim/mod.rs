//! Real-time simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - One fixed step per tick, durations counted in ticks
//! - Seeded RNG only
//! - No rendering, input or storage dependencies

pub mod collision;
pub mod level;
pub mod particles;
pub mod physics;
pub mod session;
pub mod state;
pub mod tick;

pub use collision::{Contact, collect_coins, fell_out, portal_reached, resolve_platform};
pub use level::{GenerationExhausted, generate};
pub use particles::{Particle, ParticlePool};
pub use physics::integrate;
pub use session::{Fade, Hud, LevelSession, SessionPhase};
pub use state::{
    Actor, Coin, GravitySign, LevelLayout, MotionAxis, Platform, PlatformMotion, Portal,
    SessionContext, SimEntity,
};
pub use tick::{TickInput, TickOutcome, tick};
