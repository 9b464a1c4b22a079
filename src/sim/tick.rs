//! Fixed timestep simulation tick
//!
//! One call per display refresh. Order within a playing tick:
//! jump -> physics (clears ground) -> entity animation -> particles ->
//! platforms (move, then resolve) -> coins -> portal -> fall-out -> gravity flip.

use super::collision::{self, Contact};
use super::session::{Fade, LevelSession, SessionPhase};
use super::state::SimEntity;
use super::physics;
use crate::consts::*;

/// Normalized input for a single tick
///
/// Movement and jump are "currently held"; the rest are edges the host
/// latches on key-down and [`TickInput::clear_edges`] consumes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickInput {
    pub move_left: bool,
    pub move_right: bool,
    pub jump: bool,
    pub flip_gravity: bool,
    pub pause: bool,
    pub toggle_help: bool,
    pub retry: bool,
}

impl TickInput {
    /// Clear one-shot inputs after processing
    pub fn clear_edges(&mut self) {
        self.flip_gravity = false;
        self.pause = false;
        self.toggle_help = false;
        self.retry = false;
    }
}

/// Everything that happened during one tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickOutcome {
    /// Indices of coins collected this tick
    pub collected: Vec<usize>,
    pub landed: bool,
    /// Landing faster than `HARD_LANDING_SPEED`
    pub hard_landing: bool,
    /// Hit the surface opposite to gravity
    pub bumped: bool,
    pub completed: bool,
    pub fell_off: bool,
    pub gravity_flipped: bool,
    pub paused: bool,
    pub resumed: bool,
    /// Level loaded at full fade-out opacity
    pub level_loaded: Option<u32>,
}

/// Advance the session by one tick
pub fn tick(session: &mut LevelSession, input: &TickInput) -> TickOutcome {
    let mut outcome = TickOutcome::default();

    // Handle pause toggle; resuming keeps simulating this tick
    if input.pause {
        if session.pause() {
            outcome.paused = true;
            return outcome;
        }
        outcome.resumed = session.resume();
    }

    match session.phase {
        SessionPhase::Playing => simulate(session, input, &mut outcome),
        SessionPhase::Transitioning(fade) => step_fade(session, fade, &mut outcome),
        SessionPhase::Paused | SessionPhase::GameOver | SessionPhase::LevelComplete => {}
    }

    outcome
}

fn step_fade(session: &mut LevelSession, fade: Fade, outcome: &mut TickOutcome) {
    match fade {
        Fade::Out => {
            session.fade_alpha = session.fade_alpha.saturating_add(FADE_STEP);
            if session.fade_alpha == u8::MAX {
                // Fully opaque: swap the level underneath
                let next = session.level_index().saturating_add(1);
                session.load_level(next);
                session.fade_alpha = u8::MAX;
                session.phase = SessionPhase::Transitioning(Fade::In);
                outcome.level_loaded = Some(next);
            }
        }
        Fade::In => {
            session.fade_alpha = session.fade_alpha.saturating_sub(FADE_STEP);
            if session.fade_alpha == 0 {
                session.phase = SessionPhase::Playing;
                session.message_ticks = INTRO_MESSAGE_TICKS;
            }
        }
    }
}

fn simulate(session: &mut LevelSession, input: &TickInput, outcome: &mut TickOutcome) {
    session.time_ticks += 1;
    let gravity = session.ctx.gravity;

    // Jump reads last tick's ground contact, so it runs before physics clears it
    if input.jump {
        session.actor.jump(gravity);
    }
    physics::integrate(&mut session.actor, input, gravity, session.ctx.width);

    for coin in session.layout.coins.iter_mut() {
        coin.update();
    }
    if let Some(portal) = session.layout.portal.as_mut() {
        portal.update();
    }
    session.particles.tick();

    // Each platform moves immediately before it is tested
    for platform in session.layout.platforms.iter_mut() {
        platform.update();
        match collision::resolve_platform(&mut session.actor, platform, gravity) {
            Some(Contact::Landed { point, impact_speed }) => {
                outcome.landed = true;
                if impact_speed > HARD_LANDING_SPEED {
                    outcome.hard_landing = true;
                    session.particles.spawn(point, platform.color, LANDING_PARTICLES);
                }
            }
            Some(Contact::Bumped) => outcome.bumped = true,
            None => {}
        }
    }

    let hits = collision::collect_coins(&session.actor, &mut session.layout.coins);
    for &i in &hits {
        let coin = &session.layout.coins[i];
        session.score += COIN_SCORE;
        session.particles.spawn(coin.pos, coin.color(), COIN_PARTICLES);
    }
    outcome.collected = hits;

    if collision::portal_reached(&session.actor, &session.layout) {
        session.phase = SessionPhase::LevelComplete;
        outcome.completed = true;
        let color = session.layout.portal.as_ref().map(|p| p.color()).unwrap_or(crate::palette::CYAN);
        session.particles.spawn(session.actor.pos, color, PORTAL_PARTICLES);
        log::info!("Level {} complete (score {})", session.level_index() + 1, session.score);
    } else if collision::fell_out(&session.actor, session.ctx.height) {
        session.phase = SessionPhase::GameOver;
        outcome.fell_off = true;
        log::info!("Game over on level {}", session.level_index() + 1);
    }

    session.message_ticks = session.message_ticks.saturating_sub(1);

    // Flip takes effect from the next tick
    if input.flip_gravity && session.phase == SessionPhase::Playing {
        session.ctx.gravity = gravity.flipped();
        session.particles.spawn(session.actor.pos, session.actor.color, GRAVITY_FLIP_PARTICLES);
        outcome.gravity_flipped = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette;
    use crate::sim::state::{Coin, GravitySign, LevelLayout, Platform, Portal, SessionContext};
    use glam::Vec2;
    use proptest::prelude::*;

    fn scene(platforms: Vec<Platform>, coins: Vec<Coin>, portal: Option<Portal>) -> LevelSession {
        let mut layout = LevelLayout::empty(1, Vec2::new(100.0, 300.0));
        layout.platforms = platforms;
        layout.coins = coins;
        layout.portal = portal;
        LevelSession::from_layout(SessionContext::default(), layout, 12345)
    }

    fn floor() -> Platform {
        Platform::new(Vec2::new(0.0, 320.0), 800.0, 50.0, palette::GREEN)
    }

    #[test]
    fn test_tick_lands_on_floor() {
        let mut session = scene(vec![floor()], vec![], None);
        session.actor.vel = Vec2::new(0.0, 4.0);

        let outcome = tick(&mut session, &TickInput::default());
        assert!(outcome.landed);
        assert!(!outcome.hard_landing);
        assert_eq!(session.actor().pos.y, 320.0 - session.actor().radius);
        assert_eq!(session.actor().vel.y, 0.0);
        assert!(session.actor().on_ground);
    }

    #[test]
    fn test_jump_after_landing() {
        let mut session = scene(vec![floor()], vec![], None);
        tick(&mut session, &TickInput::default());
        assert!(session.actor().on_ground);

        let jump = TickInput {
            jump: true,
            ..Default::default()
        };
        tick(&mut session, &jump);
        assert!(!session.actor().on_ground);
        assert_eq!(session.actor().vel.y, -11.5);
        assert_eq!(session.actor().pos.y, 288.5);
    }

    #[test]
    fn test_airborne_jump_ignored() {
        let mut session = scene(vec![], vec![], None);
        let jump = TickInput {
            jump: true,
            ..Default::default()
        };
        tick(&mut session, &jump);
        assert_eq!(session.actor().vel.y, 0.5);
    }

    #[test]
    fn test_hard_landing_spawns_particles() {
        let mut session = scene(vec![floor()], vec![], None);
        session.actor.pos.y = 290.0;
        session.actor.vel.y = 12.0;
        let outcome = tick(&mut session, &TickInput::default());
        assert!(outcome.landed);
        assert!(outcome.hard_landing);
        assert_eq!(session.particles().len(), LANDING_PARTICLES);
        assert!(session.particles().particles().iter().all(|p| p.color == palette::GREEN));
    }

    #[test]
    fn test_coin_scores_once() {
        let coin = Coin::new(Vec2::new(110.0, 300.0));
        let mut session = scene(vec![floor()], vec![coin], None);

        let outcome = tick(&mut session, &TickInput::default());
        assert_eq!(outcome.collected, vec![0]);
        assert_eq!(session.score(), 10);
        assert_eq!(session.particles().len(), COIN_PARTICLES);

        for _ in 0..10 {
            let outcome = tick(&mut session, &TickInput::default());
            assert!(outcome.collected.is_empty());
        }
        assert_eq!(session.score(), 10);
        assert_eq!(session.layout().collected_count(), 1);
    }

    #[test]
    fn test_fall_off_is_game_over() {
        let mut session = scene(vec![], vec![], None);
        session.actor.pos.y = 650.0;
        session.actor.vel.y = 3.0;
        let outcome = tick(&mut session, &TickInput::default());
        assert!(outcome.fell_off);
        assert_eq!(session.phase(), SessionPhase::GameOver);

        // Terminal: nothing moves until the flow controller acts
        let pos = session.actor().pos;
        tick(&mut session, &TickInput::default());
        assert_eq!(session.actor().pos, pos);
    }

    #[test]
    fn test_fall_off_under_inverted_gravity() {
        let mut session = scene(vec![], vec![], None);
        session.ctx.gravity = GravitySign::Up;
        session.actor.pos.y = -49.0;
        session.actor.vel.y = -2.0;
        assert!(tick(&mut session, &TickInput::default()).fell_off);
    }

    #[test]
    fn test_pause_freezes_and_resumes() {
        let mut session = scene(vec![], vec![], None);
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        let outcome = tick(&mut session, &pause);
        assert!(outcome.paused);
        assert_eq!(session.phase(), SessionPhase::Paused);
        let pos = session.actor().pos;

        tick(&mut session, &TickInput::default());
        assert_eq!(session.actor().pos, pos);

        let outcome = tick(&mut session, &pause);
        assert!(outcome.resumed);
        assert_eq!(session.phase(), SessionPhase::Playing);
        assert_ne!(session.actor().pos, pos);
    }

    #[test]
    fn test_pause_ignored_after_game_over() {
        let mut session = scene(vec![], vec![], None);
        session.phase = SessionPhase::GameOver;
        let outcome = tick(
            &mut session,
            &TickInput {
                pause: true,
                ..Default::default()
            },
        );
        assert!(!outcome.paused);
        assert!(!outcome.resumed);
        assert_eq!(session.phase(), SessionPhase::GameOver);
    }

    #[test]
    fn test_gravity_flip() {
        let mut session = scene(vec![], vec![], None);
        let flip = TickInput {
            flip_gravity: true,
            ..Default::default()
        };
        let outcome = tick(&mut session, &flip);
        assert!(outcome.gravity_flipped);
        assert_eq!(session.gravity(), GravitySign::Up);
        assert_eq!(session.particles().len(), GRAVITY_FLIP_PARTICLES);
        // This tick still fell downward; the next one pulls up
        assert_eq!(session.actor().vel.y, 0.5);
        tick(&mut session, &TickInput::default());
        assert_eq!(session.actor().vel.y, 0.0);
    }

    #[test]
    fn test_clear_edges_keeps_held_keys() {
        let mut input = TickInput {
            move_left: true,
            jump: true,
            flip_gravity: true,
            pause: true,
            toggle_help: true,
            retry: true,
            ..Default::default()
        };
        input.clear_edges();
        assert_eq!(
            input,
            TickInput {
                move_left: true,
                jump: true,
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_portal_completes_then_fades_to_next_level() {
        let portal = Portal::new(Vec2::new(100.0, 300.0));
        let mut session = scene(vec![floor()], vec![], Some(portal));
        session.ctx.gravity = GravitySign::Up;
        session.score = 40;

        let outcome = tick(&mut session, &TickInput::default());
        assert!(outcome.completed);
        assert_eq!(session.phase(), SessionPhase::LevelComplete);
        assert!(session.advance());

        for _ in 0..25 {
            let outcome = tick(&mut session, &TickInput::default());
            assert_eq!(outcome.level_loaded, None);
        }
        assert_eq!(session.fade_alpha(), 250);
        let outcome = tick(&mut session, &TickInput::default());
        assert_eq!(outcome.level_loaded, Some(2));
        assert_eq!(session.fade_alpha(), 255);
        assert_eq!(session.phase(), SessionPhase::Transitioning(Fade::In));
        assert_eq!(session.level_index(), 2);
        assert_eq!(session.score(), 0);
        assert_eq!(session.gravity(), GravitySign::Down);

        for _ in 0..25 {
            tick(&mut session, &TickInput::default());
            assert_eq!(session.phase(), SessionPhase::Transitioning(Fade::In));
        }
        tick(&mut session, &TickInput::default());
        assert_eq!(session.fade_alpha(), 0);
        assert_eq!(session.phase(), SessionPhase::Playing);
        assert_eq!(session.message_ticks(), INTRO_MESSAGE_TICKS);

        tick(&mut session, &TickInput::default());
        assert_eq!(session.message_ticks(), INTRO_MESSAGE_TICKS - 1);
    }

    fn order_strategy() -> impl Strategy<Value = Vec<usize>> {
        (1usize..6).prop_flat_map(|n| Just((0..n).collect::<Vec<_>>()).prop_shuffle())
    }

    proptest! {
        #[test]
        fn prop_portal_waits_for_every_coin(order in order_strategy()) {
            let portal_pos = Vec2::new(400.0, 100.0);
            let coins = (0..order.len())
                .map(|i| Coin::new(Vec2::new(80.0 + i as f32 * 120.0, 450.0)))
                .collect();
            let mut session = scene(vec![], coins, Some(Portal::new(portal_pos)));

            for (step, &coin) in order.iter().enumerate() {
                // Visit the portal first: never completes while a coin is missing
                session.actor.pos = portal_pos;
                session.actor.vel = Vec2::ZERO;
                let outcome = tick(&mut session, &TickInput::default());
                prop_assert!(!outcome.completed);
                prop_assert_eq!(session.phase(), SessionPhase::Playing);

                session.actor.pos = session.layout().coins[coin].pos;
                session.actor.vel = Vec2::ZERO;
                let outcome = tick(&mut session, &TickInput::default());
                prop_assert_eq!(outcome.collected, vec![coin]);
                prop_assert_eq!(session.score(), (step as u64 + 1) * COIN_SCORE);
            }

            session.actor.pos = portal_pos;
            session.actor.vel = Vec2::ZERO;
            let outcome = tick(&mut session, &TickInput::default());
            prop_assert!(outcome.completed);
            prop_assert_eq!(session.phase(), SessionPhase::LevelComplete);
        }
    }
}
