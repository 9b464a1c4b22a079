//! Gravity Hop - a gravity-flipping platformer
//!
//! Core modules:
//! - `sim`: Frame-driven simulation (physics, collisions, level generation, session)
//! - `tuning`: Per-level difficulty table
//! - `progress`: Persisted progress record and live profile
//! - `persistence`: Save/load gateways (memory, file, LocalStorage)
//! - `shop`: Cosmetic skin catalog and purchases
//! - `flow`: Menu/flow controller driving the session

pub mod flow;
pub mod persistence;
pub mod progress;
pub mod settings;
pub mod shop;
pub mod sim;
pub mod tuning;

pub use flow::{Game, Screen, View};
pub use progress::{Profile, ProgressRecord};
pub use settings::{QualityPreset, Settings};
pub use shop::{PurchaseError, ShopCatalog, Skin};

use serde::{Deserialize, Serialize};

/// Game configuration constants
///
/// All durations are in ticks and all speeds in pixels per tick.
pub mod consts {
    /// Default canvas dimensions
    pub const SCREEN_WIDTH: f32 = 800.0;
    pub const SCREEN_HEIGHT: f32 = 600.0;

    /// Downward acceleration per tick (multiplied by the gravity sign)
    pub const GRAVITY: f32 = 0.5;

    /// Actor defaults
    pub const ACTOR_RADIUS: f32 = 20.0;
    pub const ACTOR_SPEED: f32 = 5.0;
    /// Negative: a jump under normal gravity moves up the screen
    pub const ACTOR_JUMP_POWER: f32 = -12.0;
    pub const TRAIL_LENGTH: usize = 10;

    /// Collectibles
    pub const COIN_RADIUS: f32 = 10.0;
    pub const COIN_SCORE: u64 = 10;
    pub const COIN_HOVER_SPEED: f32 = 0.05;
    pub const COIN_HOVER_AMPLITUDE: f32 = 3.0;

    /// Portal
    pub const PORTAL_RADIUS: f32 = 25.0;
    pub const PORTAL_SPIN_SPEED: f32 = 0.05;

    /// Vertical speed above which a landing counts as hard
    pub const HARD_LANDING_SPEED: f32 = 8.0;
    /// How far past the top/bottom edge the actor may go before game over
    pub const FALL_MARGIN: f32 = 50.0;

    /// Particle burst sizes
    pub const LANDING_PARTICLES: usize = 5;
    pub const COIN_PARTICLES: usize = 15;
    pub const GRAVITY_FLIP_PARTICLES: usize = 20;
    pub const PORTAL_PARTICLES: usize = 30;

    /// Fade transition alpha step per tick
    pub const FADE_STEP: u8 = 10;
    /// "Level N" banner duration after fade-in (3 seconds at 60 Hz)
    pub const INTRO_MESSAGE_TICKS: u32 = 180;

    /// Number of level buttons on the level-select screen
    pub const LEVEL_SELECT_SLOTS: u32 = 5;
}

/// An opaque RGB color handed to the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build a color from possibly out-of-range channels (clamped to 0..=255)
    pub fn clamped(r: i32, g: i32, b: i32) -> Self {
        Self {
            r: r.clamp(0, 255) as u8,
            g: g.clamp(0, 255) as u8,
            b: b.clamp(0, 255) as u8,
        }
    }

    /// CSS `rgb(...)` string for Canvas2D
    pub fn css(&self) -> String {
        format!("rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

/// Named colors
pub mod palette {
    use super::Rgb;

    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const RED: Rgb = Rgb::new(255, 50, 50);
    pub const GREEN: Rgb = Rgb::new(50, 255, 50);
    pub const BLUE: Rgb = Rgb::new(50, 50, 255);
    pub const YELLOW: Rgb = Rgb::new(255, 255, 0);
    pub const PURPLE: Rgb = Rgb::new(150, 50, 200);
    pub const CYAN: Rgb = Rgb::new(0, 255, 255);
    pub const ORANGE: Rgb = Rgb::new(255, 165, 0);
    pub const GOLD: Rgb = Rgb::new(255, 215, 0);
}
