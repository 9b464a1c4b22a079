//! Level session state machine
//!
//! Owns the current layout, the actor, particles, score and the fade
//! transition between levels. [`super::tick::tick`] advances it; the flow
//! controller drives the player-choice transitions (`retry`, `advance`,
//! `return_to_menu`).

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::level;
use super::particles::ParticlePool;
use super::state::{Actor, GravitySign, LevelLayout, SessionContext};
use crate::Rgb;

/// Which half of the level-change fade is running
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Fade {
    /// Alpha ramps 0 -> 255; the next level loads at full opacity
    Out,
    /// Alpha ramps 255 -> 0, then play resumes
    In,
}

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Active gameplay
    Playing,
    /// Frozen until resumed
    Paused,
    /// Actor fell off the screen; waits for retry or menu
    GameOver,
    /// Portal reached; waits for next, retry or menu
    LevelComplete,
    /// Fading between levels
    Transitioning(Fade),
}

/// Read-only HUD snapshot for the renderer
#[derive(Debug, Clone, PartialEq)]
pub struct Hud {
    pub score: u64,
    pub total_coins: u64,
    pub level_index: u32,
    pub gravity: GravitySign,
    pub collected: usize,
    pub total: usize,
    /// Ticks left on the "Level N" banner
    pub message_ticks: u32,
    pub fade_alpha: u8,
    /// Help overlay; owned by the flow controller
    pub show_help: bool,
}

/// One player's run through a sequence of levels
#[derive(Debug, Clone)]
pub struct LevelSession {
    pub(crate) ctx: SessionContext,
    pub(crate) layout: LevelLayout,
    pub(crate) actor: Actor,
    pub(crate) particles: ParticlePool,
    pub(crate) score: u64,
    pub(crate) phase: SessionPhase,
    pub(crate) fade_alpha: u8,
    pub(crate) message_ticks: u32,
    pub(crate) time_ticks: u64,
    rng: Pcg32,
}

impl LevelSession {
    /// Start a session on `level_index` with a freshly generated layout
    pub fn new(ctx: SessionContext, seed: u64, level_index: u32) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let layout = level::generate(level_index, &ctx, &mut rng);
        Self::assemble(ctx, layout, rng, seed)
    }

    /// Start a session on a prebuilt layout (custom levels, tests)
    pub fn from_layout(ctx: SessionContext, layout: LevelLayout, seed: u64) -> Self {
        Self::assemble(ctx, layout, Pcg32::seed_from_u64(seed), seed)
    }

    fn assemble(mut ctx: SessionContext, layout: LevelLayout, rng: Pcg32, seed: u64) -> Self {
        ctx.gravity = GravitySign::Down;
        let actor = Actor::new(layout.actor_spawn, ctx.actor_color);
        let particles = ParticlePool::new(ctx.particle_cap, seed ^ 0x9e37_79b9_7f4a_7c15);
        Self {
            ctx,
            layout,
            actor,
            particles,
            score: 0,
            phase: SessionPhase::Playing,
            fade_alpha: 0,
            message_ticks: 0,
            time_ticks: 0,
            rng,
        }
    }

    /// Replace the layout wholesale and reset per-attempt state
    pub fn load_level(&mut self, level_index: u32) {
        self.layout = level::generate(level_index, &self.ctx, &mut self.rng);
        self.actor = Actor::new(self.layout.actor_spawn, self.ctx.actor_color);
        self.score = 0;
        self.ctx.gravity = GravitySign::Down;
        self.phase = SessionPhase::Playing;
        self.fade_alpha = 0;
        log::info!(
            "Level {} loaded ({} coins, {} platforms)",
            level_index + 1,
            self.layout.coins.len(),
            self.layout.platforms.len()
        );
    }

    /// Regenerate the current level. Only valid after the attempt ended.
    pub fn retry(&mut self) -> bool {
        match self.phase {
            SessionPhase::GameOver | SessionPhase::LevelComplete => {
                self.load_level(self.layout.level_index);
                true
            }
            _ => false,
        }
    }

    /// Begin the fade to the next level. Only valid after completing one.
    pub fn advance(&mut self) -> bool {
        if self.phase != SessionPhase::LevelComplete {
            return false;
        }
        self.fade_alpha = 0;
        self.phase = SessionPhase::Transitioning(Fade::Out);
        true
    }

    /// Drop the attempt and park the session on level 0 behind the menu
    pub fn return_to_menu(&mut self) {
        self.load_level(0);
        self.message_ticks = 0;
    }

    pub fn pause(&mut self) -> bool {
        if self.phase == SessionPhase::Playing {
            self.phase = SessionPhase::Paused;
            true
        } else {
            false
        }
    }

    pub fn resume(&mut self) -> bool {
        if self.phase == SessionPhase::Paused {
            self.phase = SessionPhase::Playing;
            true
        } else {
            false
        }
    }

    /// Put the actor back where a saved record left it
    pub fn restore(&mut self, pos: Vec2, gravity: GravitySign, score: u64) {
        self.score = score;
        self.actor.pos = pos;
        self.actor.vel = Vec2::ZERO;
        self.actor.trail.clear();
        self.ctx.gravity = gravity;
    }

    /// Recolor the actor (skin change)
    pub fn set_actor_color(&mut self, color: Rgb) {
        self.ctx.actor_color = color;
        self.actor.color = color;
    }

    pub fn set_particle_cap(&mut self, cap: usize) {
        self.ctx.particle_cap = cap;
        self.particles.set_cap(cap);
    }

    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    pub fn layout(&self) -> &LevelLayout {
        &self.layout
    }

    pub fn particles(&self) -> &ParticlePool {
        &self.particles
    }

    pub fn context(&self) -> &SessionContext {
        &self.ctx
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn level_index(&self) -> u32 {
        self.layout.level_index
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn gravity(&self) -> GravitySign {
        self.ctx.gravity
    }

    pub fn fade_alpha(&self) -> u8 {
        self.fade_alpha
    }

    pub fn message_ticks(&self) -> u32 {
        self.message_ticks
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    pub fn hud(&self, total_coins: u64) -> Hud {
        Hud {
            score: self.score,
            total_coins,
            level_index: self.layout.level_index,
            gravity: self.ctx.gravity,
            collected: self.layout.collected_count(),
            total: self.layout.coins.len(),
            message_ticks: self.message_ticks,
            fade_alpha: self.fade_alpha,
            show_help: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_starts_playing() {
        let session = LevelSession::new(SessionContext::default(), 11, 2);
        assert_eq!(session.phase(), SessionPhase::Playing);
        assert_eq!(session.level_index(), 2);
        assert_eq!(session.score(), 0);
        assert_eq!(session.gravity(), GravitySign::Down);
        assert_eq!(session.actor().pos, Vec2::new(200.0, 300.0));
    }

    #[test]
    fn test_retry_only_after_attempt_ends() {
        let mut session = LevelSession::new(SessionContext::default(), 11, 1);
        assert!(!session.retry());

        session.phase = SessionPhase::GameOver;
        session.score = 30;
        session.ctx.gravity = GravitySign::Up;
        assert!(session.retry());
        assert_eq!(session.phase(), SessionPhase::Playing);
        assert_eq!(session.level_index(), 1);
        assert_eq!(session.score(), 0);
        assert_eq!(session.gravity(), GravitySign::Down);
    }

    #[test]
    fn test_advance_only_from_level_complete() {
        let mut session = LevelSession::new(SessionContext::default(), 11, 1);
        assert!(!session.advance());
        session.phase = SessionPhase::LevelComplete;
        assert!(session.advance());
        assert_eq!(session.phase(), SessionPhase::Transitioning(Fade::Out));
    }

    #[test]
    fn test_pause_resume() {
        let mut session = LevelSession::new(SessionContext::default(), 11, 0);
        assert!(!session.resume());
        assert!(session.pause());
        assert_eq!(session.phase(), SessionPhase::Paused);
        assert!(!session.pause());
        assert!(session.resume());
        assert_eq!(session.phase(), SessionPhase::Playing);
    }

    #[test]
    fn test_return_to_menu_parks_on_level_zero() {
        let mut session = LevelSession::new(SessionContext::default(), 4, 3);
        session.score = 50;
        session.return_to_menu();
        assert_eq!(session.level_index(), 0);
        assert_eq!(session.score(), 0);
    }

    #[test]
    fn test_skin_color_survives_reload() {
        let mut session = LevelSession::new(SessionContext::default(), 4, 0);
        session.set_actor_color(crate::palette::GOLD);
        session.phase = SessionPhase::GameOver;
        session.retry();
        assert_eq!(session.actor().color, crate::palette::GOLD);
    }
}
