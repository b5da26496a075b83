use crate::entity::Actor;
use crate::geom::rects_intersect;
use crate::input::Buttons;
use crate::params::{FallPolicy, Params};
use crate::scene::World;

/// What happened during one step.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Events {
    pub jumped: bool,
    /// Came to rest on a surface this step (including staying at rest).
    pub landed: bool,
    /// Carried along by the moving platform.
    pub rode: bool,
    /// Left the bottom of the world and was put back on the spawn point.
    pub fell: bool,
    pub won: bool,
}

/// Advance the actor and the moving platform by one tick.
///
/// Order matters: input, jump, gravity, integration, static landings,
/// moving platform, world floor, goal. Physics never fails.
pub fn step(params: &Params, world: &mut World, a: &mut Actor, buttons: Buttons) -> Events {
    let mut ev = Events::default();
    let was_airborne = a.airborne;

    // Right wins when both directions are held.
    a.dx = if buttons.contains(Buttons::RIGHT) {
        params.speed
    } else if buttons.contains(Buttons::LEFT) {
        -params.speed
    } else {
        0.0
    };

    if buttons.contains(Buttons::JUMP) && !a.airborne {
        a.dy = params.jump_impulse;
        a.airborne = true;
        ev.jumped = true;
    }

    // No terminal velocity.
    a.dy += params.gravity;

    let prev_bottom = a.bottom();
    a.x += a.dx;
    a.y += a.dy;

    // Landing-only contact. Each hit snaps the bottom edge up, so after the
    // loop the actor rests on the highest surface it crossed.
    let landing_dy = params.landing_dy();
    for o in &world.obstacles {
        if a.lands_on(prev_bottom, &o.rect) {
            a.rest_on(o.rect.y, landing_dy);
            ev.landed = true;
        }
    }

    if let Some(m) = world.moving.as_mut() {
        let shift = m.advance();
        if a.lands_on(prev_bottom, &m.obstacle.rect) {
            a.rest_on(m.obstacle.rect.y, landing_dy);
            a.x += shift;
            ev.landed = true;
            ev.rode = true;
        }
    }

    let floor = world.viewport.h;
    if a.bottom() > floor {
        match params.fall_policy {
            FallPolicy::Respawn => {
                let (sx, sy) = world.spawn;
                log::debug!("actor fell out of the world at x={:.1}, respawning", a.x);
                a.x = sx;
                a.y = sy;
                a.dx = 0.0;
                a.dy = 0.0;
                ev.fell = true;
            }
            FallPolicy::ClampToFloor => {
                a.rest_on(floor, landing_dy);
                ev.landed = true;
            }
        }
    }

    if was_airborne && !a.airborne {
        log::debug!("touched down at ({:.1}, {:.1})", a.x, a.y);
    }

    ev.won = rects_intersect(&a.rect(), &world.goal.rect);
    ev
}

#[cfg(test)]
mod tests {
    use super::{step, Events};
    use crate::entity::{Actor, MovingObstacle, Obstacle};
    use crate::geom::{Color, Rect, Viewport};
    use crate::input::Buttons;
    use crate::params::{FallPolicy, LandingReset, Params};
    use crate::scene::World;
    use proptest::prelude::*;

    fn approx_eq(a: f32, b: f32) {
        let eps = 1e-4;
        assert!(
            (a - b).abs() <= eps,
            "expected {b}, got {a} (diff {})",
            (a - b).abs()
        );
    }

    // Ground along the bottom, one ledge in the middle, goal up in the corner.
    fn world() -> World {
        World {
            viewport: Viewport::new(800.0, 600.0),
            spawn: (100.0, 530.0),
            actor_size: (40.0, 40.0),
            actor_color: Color::BLUE,
            obstacles: vec![
                Obstacle::new(Rect::new(0.0, 580.0, 800.0, 20.0), Color::GREEN),
                Obstacle::new(Rect::new(300.0, 500.0, 200.0, 20.0), Color::GREEN),
            ],
            moving: None,
            goal: Obstacle::new(Rect::new(700.0, 100.0, 30.0, 30.0), Color::RED),
        }
    }

    fn with_slider(mut w: World) -> World {
        w.moving = Some(MovingObstacle {
            obstacle: Obstacle::new(Rect::new(200.0, 400.0, 100.0, 10.0), Color::ORANGE),
            direction: 1.0,
            step: 2.0,
            min_x: 0.0,
            max_x: 800.0,
        });
        w
    }

    fn actor(x: f32, y: f32) -> Actor {
        Actor { x, y, w: 40.0, h: 40.0, ..Actor::default() }
    }

    #[test]
    fn resting_on_ground_stays_put() {
        let p = Params::default();
        let mut w = world();
        let mut a = actor(100.0, 540.0);

        for _ in 0..120 {
            let ev = step(&p, &mut w, &mut a, Buttons::empty());
            assert!(ev.landed);
            assert_eq!(a.x, 100.0);
            assert_eq!(a.y, 540.0);
            assert_eq!(a.dy, 0.0);
            assert!(!a.airborne);
        }
    }

    #[test]
    fn no_keys_means_no_horizontal_motion() {
        let p = Params::default();
        let mut w = world();
        let mut a = actor(100.0, 540.0);
        a.dx = 5.0;

        step(&p, &mut w, &mut a, Buttons::empty());
        assert_eq!(a.dx, 0.0);
        assert_eq!(a.x, 100.0);
    }

    #[test]
    fn right_wins_over_left() {
        let p = Params::default();
        let mut w = world();
        let mut a = actor(100.0, 540.0);

        step(&p, &mut w, &mut a, Buttons::LEFT | Buttons::RIGHT);
        assert_eq!(a.dx, p.speed);
        assert_eq!(a.x, 105.0);

        step(&p, &mut w, &mut a, Buttons::LEFT);
        assert_eq!(a.dx, -p.speed);
        assert_eq!(a.x, 100.0);
    }

    #[test]
    fn jump_from_ground() {
        let p = Params::default();
        let mut w = world();
        let mut a = actor(100.0, 540.0);

        let ev = step(&p, &mut w, &mut a, Buttons::JUMP);
        assert!(ev.jumped);
        assert!(!ev.landed);
        assert!(a.airborne);
        approx_eq(a.dy, p.jump_impulse + p.gravity);
        approx_eq(a.y, 540.0 + p.jump_impulse + p.gravity);
        assert!(a.y < 540.0);
    }

    #[test]
    fn no_double_jump() {
        let p = Params::default();
        let mut w = world();
        let mut held = actor(100.0, 300.0);
        held.airborne = true;
        held.dy = -5.0;
        let mut released = held;

        let ev = step(&p, &mut w, &mut held, Buttons::JUMP);
        step(&p, &mut w.clone(), &mut released, Buttons::empty());
        assert!(!ev.jumped);
        assert_eq!(held.dy, released.dy);
        assert_eq!(held.y, released.y);
    }

    #[test]
    fn full_jump_arc_lands_back_on_ground() {
        let p = Params::default();
        let mut w = world();
        let mut a = actor(100.0, 540.0);

        step(&p, &mut w, &mut a, Buttons::JUMP);
        let mut ticks = 1;
        while a.airborne {
            let ev = step(&p, &mut w, &mut a, Buttons::JUMP);
            assert!(!ev.jumped);
            ticks += 1;
            assert!(ticks < 200, "never landed");
        }
        assert_eq!(a.y + a.h, 580.0);
        assert_eq!(a.dy, 0.0);
    }

    #[test]
    fn lands_flush_on_ledge() {
        let p = Params::default();
        let mut w = world();
        let mut a = actor(350.0, 455.0);
        a.airborne = true;
        a.dy = 5.0;

        let ev = step(&p, &mut w, &mut a, Buttons::empty());
        assert!(ev.landed);
        assert_eq!(a.y + a.h, 500.0);
        assert_eq!(a.dy, 0.0);
        assert!(!a.airborne);
    }

    #[test]
    fn gravity_landing_reset() {
        let p = Params { landing_reset: LandingReset::Gravity, ..Params::default() };
        let mut w = world();
        let mut a = actor(350.0, 455.0);
        a.airborne = true;
        a.dy = 5.0;

        step(&p, &mut w, &mut a, Buttons::empty());
        assert_eq!(a.y + a.h, 500.0);
        assert_eq!(a.dy, p.gravity);
    }

    #[test]
    fn highest_crossed_surface_wins() {
        let p = Params::default();
        let mut w = world();
        let mut a = actor(350.0, 455.0);
        a.airborne = true;
        a.dy = 100.0;

        step(&p, &mut w, &mut a, Buttons::empty());
        assert_eq!(a.y + a.h, 500.0);
    }

    #[test]
    fn side_contact_is_ignored() {
        let p = Params::default();
        let mut w = world();
        // Bottom edge already below the ledge top, walking into its left side.
        let mut a = actor(262.0, 470.0);
        a.airborne = true;

        let ev = step(&p, &mut w, &mut a, Buttons::RIGHT);
        assert!(!ev.landed);
        assert_eq!(a.x, 267.0);
        approx_eq(a.y, 470.0 + p.gravity);
    }

    #[test]
    fn rides_moving_platform() {
        let p = Params::default();
        let mut w = with_slider(world());
        let mut a = actor(220.0, 360.0);

        let ev = step(&p, &mut w, &mut a, Buttons::empty());
        assert!(ev.rode);
        assert_eq!(a.x, 222.0);
        assert_eq!(a.y, 360.0);

        let ev = step(&p, &mut w, &mut a, Buttons::RIGHT);
        assert!(ev.rode);
        assert_eq!(a.x, 229.0);
    }

    #[test]
    fn ride_follows_platform_reversal() {
        let p = Params::default();
        let mut w = with_slider(world());
        if let Some(m) = w.moving.as_mut() {
            m.obstacle.rect.x = 699.0;
        }
        let mut a = actor(720.0, 360.0);

        // Platform clamps at 700 (moved 1) then heads back left.
        step(&p, &mut w, &mut a, Buttons::empty());
        assert_eq!(a.x, 721.0);
        step(&p, &mut w, &mut a, Buttons::empty());
        assert_eq!(a.x, 719.0);
    }

    #[test]
    fn falling_out_respawns() {
        let p = Params::default();
        let mut w = world();
        let mut a = actor(100.0, 590.0);
        a.airborne = true;
        a.dy = 3.0;
        a.dx = 5.0;

        let ev = step(&p, &mut w, &mut a, Buttons::empty());
        assert!(ev.fell);
        assert_eq!((a.x, a.y), w.spawn);
        assert_eq!(a.dx, 0.0);
        assert_eq!(a.dy, 0.0);
    }

    #[test]
    fn falling_out_clamps_to_floor() {
        let p = Params { fall_policy: FallPolicy::ClampToFloor, ..Params::default() };
        let mut w = world();
        let mut a = actor(100.0, 590.0);
        a.airborne = true;
        a.dy = 3.0;

        let ev = step(&p, &mut w, &mut a, Buttons::empty());
        assert!(!ev.fell);
        assert!(ev.landed);
        assert_eq!(a.y + a.h, 600.0);
        assert!(!a.airborne);
    }

    #[test]
    fn inside_goal_wins() {
        let p = Params::default();
        let mut w = world();
        let mut a = actor(705.0, 105.0);

        let ev = step(&p, &mut w, &mut a, Buttons::empty());
        assert_eq!(
            ev,
            Events { won: true, ..Events::default() }
        );
    }

    #[test]
    fn touching_goal_edge_does_not_win() {
        let p = Params::default();
        let mut w = world();
        let mut a = actor(660.0, 100.0);

        let ev = step(&p, &mut w, &mut a, Buttons::empty());
        assert_eq!(a.x + a.w, w.goal.rect.x);
        assert!(!ev.won);
    }

    proptest! {
        #[test]
        fn gravity_is_unconditional_in_free_fall(
            x in 0.0f32..700.0,
            y in 0.0f32..100.0,
            dy in -10.0f32..10.0,
        ) {
            let p = Params::default();
            let mut w = world();
            let mut a = actor(x, y);
            a.airborne = true;
            a.dy = dy;

            step(&p, &mut w, &mut a, Buttons::JUMP);
            prop_assert_eq!(a.dy, dy + p.gravity);
        }

        #[test]
        fn idle_input_zeroes_dx(prev_dx in -20.0f32..20.0, x in 0.0f32..700.0) {
            let p = Params::default();
            let mut w = world();
            let mut a = actor(x, 200.0);
            a.dx = prev_dx;

            step(&p, &mut w, &mut a, Buttons::empty());
            prop_assert_eq!(a.dx, 0.0);
            prop_assert_eq!(a.x, x);
        }
    }
}
