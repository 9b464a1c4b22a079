//! Data-driven level balance
//!
//! Difficulty scales by bracket: levels 0-3 each have a hand-tuned row,
//! everything from level 4 on shares the last row with a growing platform count.

/// Generation parameters for one level
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelTuning {
    /// Random platforms in addition to the base platform
    pub platform_count: u32,
    /// Probability that a random platform moves
    pub moving_chance: f32,
    /// Upper bound (inclusive) of the per-tick speed of a moving platform
    pub max_speed: u32,
}

impl LevelTuning {
    pub fn for_level(level: u32) -> Self {
        match level {
            0 => Self {
                platform_count: 8,
                moving_chance: 0.3,
                max_speed: 2,
            },
            1 => Self {
                platform_count: 10,
                moving_chance: 0.5,
                max_speed: 3,
            },
            2 => Self {
                platform_count: 12,
                moving_chance: 0.7,
                max_speed: 4,
            },
            3 => Self {
                platform_count: 10,
                moving_chance: 0.8,
                max_speed: 5,
            },
            _ => Self {
                platform_count: 8 + level,
                moving_chance: 0.9,
                max_speed: 5,
            },
        }
    }
}

/// Base platform geometry
pub const BASE_PLATFORM_HEIGHT: f32 = 50.0;
/// Width lost by the base platform per level
pub const BASE_SHRINK_PER_LEVEL: f32 = 100.0;
/// The base platform never gets narrower than this (reached at level 7 on an 800px screen)
pub const MIN_BASE_WIDTH: f32 = 120.0;

/// Random platform width is `MIN_PLATFORM_WIDTH + U[0, span)` with
/// `span = PLATFORM_WIDTH_SPAN - PLATFORM_WIDTH_SHRINK * level`, floored at 1
pub const MIN_PLATFORM_WIDTH: f32 = 80.0;
pub const PLATFORM_WIDTH_SPAN: i32 = 201;
pub const PLATFORM_WIDTH_SHRINK: i32 = 10;
pub const MIN_PLATFORM_HEIGHT: f32 = 15.0;
pub const PLATFORM_HEIGHT_SPAN: i32 = 11;
/// Random platforms keep clear of the top of the screen and the base strip
pub const PLATFORM_TOP_MARGIN: f32 = 100.0;
pub const PLATFORM_BOTTOM_MARGIN: f32 = 50.0;

/// Moving platforms travel `MIN_MOVE_RANGE + U[0, MOVE_RANGE_SPAN)` from their origin
pub const MIN_MOVE_RANGE: f32 = 100.0;
pub const MOVE_RANGE_SPAN: i32 = 101;

/// Collectibles per level: `BASE_COINS + COINS_PER_LEVEL * level`
pub const BASE_COINS: u32 = 5;
pub const COINS_PER_LEVEL: u32 = 2;
/// Rejection-sampling budget per coin
pub const COIN_ATTEMPTS: u32 = 20;
/// After this many failed attempts the "near a platform top" rule is dropped
pub const COIN_RELAX_AFTER: u32 = 15;
/// A good coin spot hovers this far above a platform top...
pub const COIN_HOVER_HEIGHT: f32 = 30.0;
/// ...within this vertical tolerance...
pub const COIN_BAND: f32 = 50.0;
/// ...and at most this far past either end of the platform
pub const COIN_OVERHANG: f32 = 20.0;

/// Portal floats this far above its platform
pub const PORTAL_LIFT: f32 = 40.0;
/// Fallback portal height when no platform sits in the upper half
pub const PORTAL_FALLBACK_Y: f32 = 100.0;
