//! Simulation entities and per-session context
//!
//! Everything here is plain data plus the small per-entity animation step.
//! Rendering reads these types but never mutates them.

use std::collections::VecDeque;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::level::GenerationExhausted;
use crate::consts::*;
use crate::{Rgb, palette};

/// Direction gravity pulls the actor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GravitySign {
    /// Toward the bottom of the screen (+y)
    #[default]
    Down,
    /// Toward the top of the screen (-y)
    Up,
}

impl GravitySign {
    /// Scalar multiplier (+1 for down, -1 for up)
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            GravitySign::Down => 1.0,
            GravitySign::Up => -1.0,
        }
    }

    /// Integer form used by the persisted record
    pub fn as_i8(self) -> i8 {
        match self {
            GravitySign::Down => 1,
            GravitySign::Up => -1,
        }
    }

    /// Anything negative is "up", everything else falls back to "down"
    pub fn from_i8(sign: i8) -> Self {
        if sign < 0 {
            GravitySign::Up
        } else {
            GravitySign::Down
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            GravitySign::Down => GravitySign::Up,
            GravitySign::Up => GravitySign::Down,
        }
    }
}

/// Per-tick animation step shared by level entities
pub trait SimEntity {
    fn update(&mut self);
}

/// The player-controlled sphere
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub speed: f32,
    pub jump_power: f32,
    pub on_ground: bool,
    pub color: Rgb,
    /// Last `TRAIL_LENGTH` positions, oldest first
    #[serde(skip)]
    pub trail: VecDeque<Vec2>,
}

impl Actor {
    pub fn new(pos: Vec2, color: Rgb) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            radius: ACTOR_RADIUS,
            speed: ACTOR_SPEED,
            jump_power: ACTOR_JUMP_POWER,
            on_ground: false,
            color,
            trail: VecDeque::with_capacity(TRAIL_LENGTH + 1),
        }
    }

    /// Record current position to trail (call once per tick, before moving)
    pub fn record_trail(&mut self) {
        self.trail.push_back(self.pos);
        while self.trail.len() > TRAIL_LENGTH {
            self.trail.pop_front();
        }
    }
}

/// Axis a moving platform oscillates along
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MotionAxis {
    Horizontal,
    Vertical,
}

/// Back-and-forth motion around an origin
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformMotion {
    pub axis: MotionAxis,
    /// Pixels per tick
    pub speed: f32,
    /// Top-left corner at generation time
    pub origin: Vec2,
    /// +1 or -1
    pub direction: f32,
    /// Displacement from `origin` past which the direction flips
    pub range: f32,
}

/// A solid axis-aligned rectangle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Platform {
    /// Top-left corner
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    pub color: Rgb,
    /// `None` for static platforms
    pub motion: Option<PlatformMotion>,
}

impl Platform {
    pub fn new(pos: Vec2, width: f32, height: f32, color: Rgb) -> Self {
        Self {
            pos,
            width,
            height,
            color,
            motion: None,
        }
    }

    /// Make this platform oscillate along `axis`
    pub fn with_motion(mut self, axis: MotionAxis, speed: f32, range: f32) -> Self {
        self.motion = Some(PlatformMotion {
            axis,
            speed,
            origin: self.pos,
            direction: 1.0,
            range,
        });
        self
    }

    pub fn is_moving(&self) -> bool {
        self.motion.is_some()
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.width
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.height
    }

    /// Strictly inside the solid rectangle (edges don't count)
    pub fn contains(&self, point: Vec2) -> bool {
        point.x > self.left() && point.x < self.right() && point.y > self.top() && point.y < self.bottom()
    }
}

impl SimEntity for Platform {
    fn update(&mut self) {
        let Some(motion) = self.motion.as_mut() else {
            return;
        };
        let step = motion.speed * motion.direction;
        let displacement = match motion.axis {
            MotionAxis::Horizontal => {
                self.pos.x += step;
                self.pos.x - motion.origin.x
            }
            MotionAxis::Vertical => {
                self.pos.y += step;
                self.pos.y - motion.origin.y
            }
        };
        if displacement.abs() > motion.range {
            motion.direction = -motion.direction;
        }
    }
}

/// A collectible coin
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coin {
    pub pos: Vec2,
    pub radius: f32,
    /// Terminal once set: collected coins never come back within a layout
    pub collected: bool,
    pub hover_phase: f32,
}

impl Coin {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            radius: COIN_RADIUS,
            collected: false,
            hover_phase: 0.0,
        }
    }

    /// Vertical bob for rendering only (collision uses `pos`)
    pub fn hover_offset(&self) -> f32 {
        self.hover_phase.sin() * COIN_HOVER_AMPLITUDE
    }

    pub fn color(&self) -> Rgb {
        palette::YELLOW
    }
}

impl SimEntity for Coin {
    fn update(&mut self) {
        if !self.collected {
            self.hover_phase += COIN_HOVER_SPEED;
        }
    }
}

/// Level exit, live once every coin is collected
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Portal {
    pub pos: Vec2,
    pub radius: f32,
    pub spin: f32,
}

impl Portal {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            radius: PORTAL_RADIUS,
            spin: 0.0,
        }
    }

    pub fn color(&self) -> Rgb {
        palette::CYAN
    }
}

impl SimEntity for Portal {
    fn update(&mut self) {
        self.spin += PORTAL_SPIN_SPEED;
    }
}

/// Everything that makes up one level attempt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelLayout {
    pub level_index: u32,
    pub actor_spawn: Vec2,
    /// Base platform first at generation time; sorted by height once a portal is placed
    pub platforms: Vec<Platform>,
    pub coins: Vec<Coin>,
    pub portal: Option<Portal>,
    /// Coin slots the generator gave up on
    #[serde(default)]
    pub skipped: Vec<GenerationExhausted>,
}

impl LevelLayout {
    /// A layout with nothing but the actor spawn
    pub fn empty(level_index: u32, actor_spawn: Vec2) -> Self {
        Self {
            level_index,
            actor_spawn,
            platforms: Vec::new(),
            coins: Vec::new(),
            portal: None,
            skipped: Vec::new(),
        }
    }

    pub fn collected_count(&self) -> usize {
        self.coins.iter().filter(|c| c.collected).count()
    }

    /// True when no uncollected coin remains (vacuously true with zero coins)
    pub fn all_collected(&self) -> bool {
        self.coins.iter().all(|c| c.collected)
    }
}

/// Screen size, gravity and cosmetics shared by one session
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub width: f32,
    pub height: f32,
    pub gravity: GravitySign,
    /// Maximum live particles (0 disables effects)
    pub particle_cap: usize,
    /// Color of the equipped skin
    pub actor_color: Rgb,
}

impl Default for SessionContext {
    fn default() -> Self {
        Self {
            width: SCREEN_WIDTH,
            height: SCREEN_HEIGHT,
            gravity: GravitySign::Down,
            particle_cap: 500,
            actor_color: palette::WHITE,
        }
    }
}

impl SessionContext {
    /// Where a fresh actor appears
    pub fn spawn_point(&self) -> Vec2 {
        Vec2::new(self.width / 4.0, self.height / 2.0)
    }
}
