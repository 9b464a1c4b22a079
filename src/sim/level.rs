//! Procedural level generation
//!
//! Given a level index and an RNG stream, builds the platforms, coins and
//! portal for one attempt. Same seed in, same layout out.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::{Coin, LevelLayout, MotionAxis, Platform, Portal, SessionContext};
use crate::tuning::*;
use crate::{Rgb, palette};

/// A coin slot that rejection sampling could not fill
///
/// Not fatal: the level simply has fewer coins than requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("coin slot {slot} could not be placed after {attempts} attempts")]
pub struct GenerationExhausted {
    pub slot: usize,
    pub attempts: u32,
}

/// Uniform integer in `[0, span)`, or 0 when the span is empty
fn roll<R: Rng + ?Sized>(rng: &mut R, span: i64) -> f32 {
    if span <= 0 {
        0.0
    } else {
        rng.random_range(0..span) as f32
    }
}

/// Platform colors: three fixed, two drifting with the level
pub fn platform_colors(level: u32) -> [Rgb; 5] {
    let l = level.min(255) as i32;
    [
        palette::GREEN,
        palette::BLUE,
        palette::PURPLE,
        Rgb::clamped(50 + l * 30, 200 - l * 20, 100 + l * 30),
        Rgb::clamped(200 - l * 15, 50 + l * 30, 150),
    ]
}

/// Width of the base platform for a level (full width on level 0)
pub fn base_width(level: u32, screen_width: f32) -> f32 {
    if level == 0 {
        return screen_width;
    }
    let shrunk = screen_width - level as f32 * BASE_SHRINK_PER_LEVEL;
    shrunk.max(MIN_BASE_WIDTH.min(screen_width))
}

/// Build the layout for `level_index`
pub fn generate<R: Rng + ?Sized>(level_index: u32, ctx: &SessionContext, rng: &mut R) -> LevelLayout {
    let (width, height) = (ctx.width, ctx.height);
    let tuning = LevelTuning::for_level(level_index);
    let colors = platform_colors(level_index);
    let mut layout = LevelLayout::empty(level_index, ctx.spawn_point());

    // Base platform always exists, centered at the bottom
    let base = base_width(level_index, width);
    layout.platforms.push(Platform::new(
        Vec2::new((width - base) / 2.0, height - BASE_PLATFORM_HEIGHT),
        base,
        BASE_PLATFORM_HEIGHT,
        palette::GREEN,
    ));

    let width_span = (PLATFORM_WIDTH_SPAN as i64 - PLATFORM_WIDTH_SHRINK as i64 * level_index as i64).max(1);
    for _ in 0..tuning.platform_count {
        let w = (MIN_PLATFORM_WIDTH + roll(rng, width_span)).min(width);
        let h = MIN_PLATFORM_HEIGHT + roll(rng, PLATFORM_HEIGHT_SPAN as i64);
        let x = roll(rng, (width - w) as i64);
        let y = roll(rng, (height - PLATFORM_TOP_MARGIN - PLATFORM_BOTTOM_MARGIN) as i64) + PLATFORM_TOP_MARGIN;

        let moving = rng.random::<f32>() < tuning.moving_chance;
        let motion = if moving {
            let speed = roll(rng, tuning.max_speed as i64) + 1.0;
            let axis = if rng.random::<f32>() > 0.5 {
                MotionAxis::Vertical
            } else {
                MotionAxis::Horizontal
            };
            Some((axis, speed))
        } else {
            None
        };
        let color = colors[rng.random_range(0..colors.len())];

        let mut platform = Platform::new(Vec2::new(x, y), w, h, color);
        if let Some((axis, speed)) = motion {
            let range = MIN_MOVE_RANGE + roll(rng, MOVE_RANGE_SPAN as i64);
            platform = platform.with_motion(axis, speed, range);
        }
        layout.platforms.push(platform);
    }

    place_coins(&mut layout, level_index, width, height, rng);
    layout.portal = Some(place_portal(&mut layout.platforms, level_index, width, height));

    log::debug!(
        "Level {} generated: {} platforms, {} coins, {} skipped",
        level_index,
        layout.platforms.len(),
        layout.coins.len(),
        layout.skipped.len()
    );
    layout
}

/// Rejection-sample coins near platform tops, never inside a platform
fn place_coins<R: Rng + ?Sized>(layout: &mut LevelLayout, level: u32, width: f32, height: f32, rng: &mut R) {
    let count = BASE_COINS.saturating_add(COINS_PER_LEVEL.saturating_mul(level));
    for slot in 0..count as usize {
        let mut placed = false;
        for attempt in 0..COIN_ATTEMPTS {
            let candidate = Vec2::new(roll(rng, (width - 100.0) as i64) + 50.0, roll(rng, (height - 150.0) as i64) + 50.0);

            let near_platform = layout.platforms.iter().any(|p| {
                (candidate.y - (p.top() - COIN_HOVER_HEIGHT)).abs() < COIN_BAND
                    && candidate.x > p.left() - COIN_OVERHANG
                    && candidate.x < p.right() + COIN_OVERHANG
            });
            let inside_platform = layout.platforms.iter().any(|p| p.contains(candidate));

            if (near_platform || attempt > COIN_RELAX_AFTER) && !inside_platform {
                layout.coins.push(Coin::new(candidate));
                placed = true;
                break;
            }
        }

        if !placed {
            let exhausted = GenerationExhausted {
                slot,
                attempts: COIN_ATTEMPTS,
            };
            log::debug!("Level {}: {}", level, exhausted);
            layout.skipped.push(exhausted);
        }
    }
}

/// Portal sits above the highest platform in the upper half of the screen.
/// Sorts `platforms` by ascending top edge as a side effect.
fn place_portal(platforms: &mut [Platform], level: u32, width: f32, height: f32) -> Portal {
    if level > 0 {
        platforms.sort_by(|a, b| a.top().total_cmp(&b.top()));
        if let Some(p) = platforms.iter().find(|p| p.top() < height / 2.0) {
            return Portal::new(Vec2::new(p.left() + p.width / 2.0, p.top() - PORTAL_LIFT));
        }
    }
    Portal::new(Vec2::new(width / 2.0, PORTAL_FALLBACK_Y))
}
