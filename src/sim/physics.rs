//! Actor integration
//!
//! One explicit Euler step per tick. Horizontal speed is instantaneous
//! (no acceleration or friction); vertical speed accumulates gravity.

use super::state::{Actor, GravitySign};
use super::tick::TickInput;
use crate::consts::GRAVITY;

impl Actor {
    /// Leave the ground. Only works if the previous tick's collision pass
    /// left `on_ground` set, so call this before [`integrate`].
    pub fn jump(&mut self, gravity: GravitySign) {
        if self.on_ground {
            self.vel.y = self.jump_power * gravity.sign();
        }
    }
}

/// Advance the actor one tick and clamp it to the screen's side edges.
///
/// Clears `on_ground`; the collision pass that follows re-asserts it.
pub fn integrate(actor: &mut Actor, input: &TickInput, gravity: GravitySign, screen_width: f32) {
    actor.record_trail();

    actor.vel.y += GRAVITY * gravity.sign();
    actor.vel.x = if input.move_left {
        -actor.speed
    } else if input.move_right {
        actor.speed
    } else {
        0.0
    };

    actor.pos += actor.vel;

    if actor.pos.x - actor.radius < 0.0 {
        actor.pos.x = actor.radius;
        actor.vel.x = 0.0;
    } else if actor.pos.x + actor.radius > screen_width {
        actor.pos.x = screen_width - actor.radius;
        actor.vel.x = 0.0;
    }

    actor.on_ground = false;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette;
    use glam::Vec2;

    fn actor_at(x: f32, y: f32) -> Actor {
        Actor::new(Vec2::new(x, y), palette::WHITE)
    }

    #[test]
    fn test_gravity_accumulates() {
        let mut actor = actor_at(100.0, 100.0);
        let input = TickInput::default();
        integrate(&mut actor, &input, GravitySign::Down, 800.0);
        integrate(&mut actor, &input, GravitySign::Down, 800.0);
        assert_eq!(actor.vel.y, 1.0);
        assert_eq!(actor.pos.y, 101.5);

        let mut actor = actor_at(100.0, 100.0);
        integrate(&mut actor, &input, GravitySign::Up, 800.0);
        assert_eq!(actor.vel.y, -0.5);
        assert_eq!(actor.pos.y, 99.5);
    }

    #[test]
    fn test_horizontal_speed_is_instant() {
        let mut actor = actor_at(100.0, 100.0);
        let right = TickInput {
            move_right: true,
            ..Default::default()
        };
        integrate(&mut actor, &right, GravitySign::Down, 800.0);
        assert_eq!(actor.vel.x, 5.0);
        assert_eq!(actor.pos.x, 105.0);

        // Left wins when both are held
        let both = TickInput {
            move_left: true,
            move_right: true,
            ..Default::default()
        };
        integrate(&mut actor, &both, GravitySign::Down, 800.0);
        assert_eq!(actor.vel.x, -5.0);

        integrate(&mut actor, &TickInput::default(), GravitySign::Down, 800.0);
        assert_eq!(actor.vel.x, 0.0);
    }

    #[test]
    fn test_side_clamps() {
        let left = TickInput {
            move_left: true,
            ..Default::default()
        };
        let mut actor = actor_at(22.0, 100.0);
        integrate(&mut actor, &left, GravitySign::Down, 800.0);
        assert_eq!(actor.pos.x, 20.0);
        assert_eq!(actor.vel.x, 0.0);

        let right = TickInput {
            move_right: true,
            ..Default::default()
        };
        let mut actor = actor_at(778.0, 100.0);
        integrate(&mut actor, &right, GravitySign::Down, 800.0);
        assert_eq!(actor.pos.x, 780.0);
        assert_eq!(actor.vel.x, 0.0);
    }

    #[test]
    fn test_integrate_clears_ground_and_records_trail() {
        let mut actor = actor_at(100.0, 100.0);
        actor.on_ground = true;
        integrate(&mut actor, &TickInput::default(), GravitySign::Down, 800.0);
        assert!(!actor.on_ground);
        assert_eq!(actor.trail.back().copied(), Some(Vec2::new(100.0, 100.0)));
    }

    #[test]
    fn test_jump_needs_ground() {
        let mut actor = actor_at(100.0, 100.0);
        actor.jump(GravitySign::Down);
        assert_eq!(actor.vel.y, 0.0);

        actor.on_ground = true;
        actor.jump(GravitySign::Down);
        assert_eq!(actor.vel.y, -12.0);

        actor.jump(GravitySign::Up);
        assert_eq!(actor.vel.y, 12.0);
    }
}
