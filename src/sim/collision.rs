//! Collision detection and response for the actor
//!
//! Platforms are axis-aligned rectangles and the actor is treated as its
//! bounding box for the broad check. Only vertical contacts are resolved:
//! the actor lands on the surface gravity pushes it into, and bumps its head
//! on the opposite surface.

use glam::Vec2;

use super::state::{Actor, Coin, GravitySign, LevelLayout, Platform};
use crate::consts::FALL_MARGIN;

/// Result of resolving the actor against one platform
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Contact {
    /// Came to rest on the gravity-facing surface
    Landed {
        /// Where the actor touches the platform
        point: Vec2,
        /// Vertical speed just before the snap
        impact_speed: f32,
    },
    /// Hit the opposite surface: vertical speed killed, still airborne
    Bumped,
}

/// Actor bounding box overlaps the platform rectangle
#[inline]
pub fn overlaps(actor: &Actor, platform: &Platform) -> bool {
    actor.pos.y + actor.radius > platform.top()
        && actor.pos.y - actor.radius < platform.bottom()
        && actor.pos.x + actor.radius > platform.left()
        && actor.pos.x - actor.radius < platform.right()
}

/// Resolve the actor against a single platform for the current gravity
pub fn resolve_platform(actor: &mut Actor, platform: &Platform, gravity: GravitySign) -> Option<Contact> {
    if !overlaps(actor, platform) {
        return None;
    }

    let r = actor.radius;
    let vy = actor.vel.y;
    // Leading edge moving toward the top surface / bottom surface
    let onto_top = vy > 0.0 && actor.pos.y - r < platform.top();
    let onto_bottom = vy < 0.0 && actor.pos.y + r > platform.bottom();

    match gravity {
        GravitySign::Down if onto_top => {
            actor.pos.y = platform.top() - r;
            Some(land(actor, Vec2::new(actor.pos.x, platform.top()), vy))
        }
        GravitySign::Down if onto_bottom => {
            actor.pos.y = platform.bottom() + r;
            actor.vel.y = 0.0;
            Some(Contact::Bumped)
        }
        GravitySign::Up if onto_bottom => {
            actor.pos.y = platform.bottom() + r;
            Some(land(actor, Vec2::new(actor.pos.x, platform.bottom()), vy))
        }
        GravitySign::Up if onto_top => {
            actor.pos.y = platform.top() - r;
            actor.vel.y = 0.0;
            Some(Contact::Bumped)
        }
        _ => None,
    }
}

fn land(actor: &mut Actor, point: Vec2, vy_before: f32) -> Contact {
    actor.vel.y = 0.0;
    actor.on_ground = true;
    Contact::Landed {
        point,
        impact_speed: vy_before.abs(),
    }
}

/// Circles touch, compared on squared distance
#[inline]
pub fn circles_touch(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    a.distance_squared(b) <= (ra + rb) * (ra + rb)
}

/// Mark every uncollected coin the actor touches; returns their indices
pub fn collect_coins(actor: &Actor, coins: &mut [Coin]) -> Vec<usize> {
    let mut hits = Vec::new();
    for (i, coin) in coins.iter_mut().enumerate() {
        if !coin.collected && circles_touch(actor.pos, actor.radius, coin.pos, coin.radius) {
            coin.collected = true;
            hits.push(i);
        }
    }
    hits
}

/// Portal is only live once every coin is collected
pub fn portal_reached(actor: &Actor, layout: &LevelLayout) -> bool {
    match &layout.portal {
        Some(portal) if layout.all_collected() => {
            circles_touch(actor.pos, actor.radius, portal.pos, portal.radius)
        }
        _ => false,
    }
}

/// Actor left the playfield vertically
#[inline]
pub fn fell_out(actor: &Actor, screen_height: f32) -> bool {
    actor.pos.y < -FALL_MARGIN || actor.pos.y > screen_height + FALL_MARGIN
}
