//! Session controller: owns the world, the actor and the
//! `NotStarted -> Running -> Ended` lifecycle.

use crate::clock::FrameClock;
use crate::entity::Actor;
use crate::error::SessionError;
use crate::geom::Viewport;
use crate::input::Buttons;
use crate::params::Params;
use crate::render::{draw, Surface};
use crate::scene::{SceneDesc, World};
use crate::step::{step, Events};

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Phase {
    NotStarted,
    Running { started_ms: f64 },
    Ended { elapsed_ms: f64 },
}

/// Result of one host frame.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Tick {
    /// Simulation steps run this frame.
    pub steps: u32,
    /// Events merged across all steps.
    pub events: Events,
    /// The session ended on this frame.
    pub ended: bool,
}

#[derive(Clone, Debug)]
pub struct Session {
    params: Params,
    template: World,
    world: World,
    actor: Actor,
    phase: Phase,
    clock: FrameClock,
}

impl Session {
    pub fn new(params: Params, scene: &SceneDesc, viewport: Viewport) -> Result<Self, SessionError> {
        params.validate()?;
        let template = scene.resolve(viewport)?;
        let actor = template.spawn_actor();
        log::debug!(
            "session built: {} obstacles, moving platform: {}",
            template.obstacles.len(),
            template.moving.is_some()
        );

        Ok(Self {
            params,
            world: template.clone(),
            template,
            actor,
            phase: Phase::NotStarted,
            clock: FrameClock::new(),
        })
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        matches!(self.phase, Phase::Running { .. })
    }

    /// Begin ticking. Only valid before the first start or after a restart.
    pub fn start(&mut self, now_ms: f64) -> bool {
        if self.phase != Phase::NotStarted {
            return false;
        }
        self.phase = Phase::Running { started_ms: now_ms };
        self.clock.reset();
        log::info!("session started");
        true
    }

    /// Run the steps due for this frame, draw the result and check for a win.
    ///
    /// Does nothing unless the session is running.
    pub fn tick<S: Surface + ?Sized>(&mut self, buttons: Buttons, now_ms: f64, surface: &mut S) -> Tick {
        let started_ms = match self.phase {
            Phase::Running { started_ms } => started_ms,
            _ => return Tick::default(),
        };

        let mut out = Tick::default();
        let due = self.clock.steps(self.params.stepping, now_ms);
        for _ in 0..due {
            let ev = step(&self.params, &mut self.world, &mut self.actor, buttons);
            out.steps += 1;
            merge(&mut out.events, ev);
            if ev.won {
                break;
            }
        }

        draw(&self.world, &self.actor, surface);

        if out.events.won {
            let elapsed_ms = (now_ms - started_ms).max(0.0);
            self.phase = Phase::Ended { elapsed_ms };
            out.ended = true;
            log::info!("goal reached after {:.0} ms", elapsed_ms);
        }
        out
    }

    /// Fresh world and actor, back to `NotStarted`.
    pub fn restart(&mut self) {
        self.world = self.template.clone();
        self.actor = self.world.spawn_actor();
        self.phase = Phase::NotStarted;
        self.clock.reset();
        log::info!("session restarted");
    }

    /// Whole seconds from start to goal, once ended.
    pub fn elapsed_seconds(&self) -> Option<u64> {
        match self.phase {
            Phase::Ended { elapsed_ms } => Some((elapsed_ms / 1000.0).floor() as u64),
            _ => None,
        }
    }

    /// Draw the current state without stepping, e.g. behind the start prompt.
    pub fn render<S: Surface + ?Sized>(&self, surface: &mut S) {
        draw(&self.world, &self.actor, surface);
    }
}

fn merge(into: &mut Events, ev: Events) {
    into.jumped |= ev.jumped;
    into.landed |= ev.landed;
    into.rode |= ev.rode;
    into.fell |= ev.fell;
    into.won |= ev.won;
}

#[cfg(test)]
mod tests {
    use super::{Phase, Session};
    use crate::geom::Viewport;
    use crate::input::Buttons;
    use crate::params::{Params, Stepping};
    use crate::render::{DrawList, NullSurface};
    use crate::scene::SceneDesc;

    fn session(params: Params) -> Session {
        Session::new(params, &SceneDesc::tower(), Viewport::new(800.0, 600.0)).unwrap()
    }

    fn place_in_goal(s: &mut Session) {
        let goal = s.world.goal.rect;
        let a = &mut s.actor;
        a.x = goal.x + 1.0;
        a.y = goal.y + 1.0;
    }

    #[test]
    fn idle_until_started() {
        let mut s = session(Params::default());
        let before = *s.actor();
        let t = s.tick(Buttons::RIGHT, 16.0, &mut NullSurface);
        assert_eq!(t.steps, 0);
        assert_eq!(*s.actor(), before);
        assert_eq!(s.phase(), Phase::NotStarted);
    }

    #[test]
    fn start_only_once() {
        let mut s = session(Params::default());
        assert!(s.start(0.0));
        assert!(!s.start(10.0));
        assert_eq!(s.phase(), Phase::Running { started_ms: 0.0 });
    }

    #[test]
    fn spawn_drops_onto_ground_and_settles() {
        let mut s = session(Params::default());
        s.start(0.0);
        for i in 0..30 {
            s.tick(Buttons::empty(), i as f64 * 16.0, &mut NullSurface);
        }
        let a = s.actor();
        assert_eq!(a.y + a.h, 580.0);
        assert!(!a.airborne);
        assert!(s.is_running());
    }

    #[test]
    fn win_fires_once_and_halts() {
        let mut s = session(Params::default());
        s.start(1_000.0);
        place_in_goal(&mut s);

        let mut list = DrawList::default();
        let t = s.tick(Buttons::empty(), 3_500.0, &mut list);
        assert!(t.ended);
        assert!(t.events.won);
        assert_eq!(t.steps, 1);
        assert_eq!(list.clears, 1);
        assert_eq!(s.phase(), Phase::Ended { elapsed_ms: 2_500.0 });
        assert_eq!(s.elapsed_seconds(), Some(2));

        let frozen = *s.actor();
        let t = s.tick(Buttons::RIGHT, 3_516.0, &mut list);
        assert_eq!(t.steps, 0);
        assert!(!t.ended);
        assert_eq!(*s.actor(), frozen);
        assert_eq!(list.clears, 1);
    }

    #[test]
    fn restart_rebuilds_everything() {
        let mut s = session(Params::default());
        let fresh_actor = *s.actor();
        let fresh_world = s.world().clone();

        s.start(0.0);
        for i in 0..50 {
            s.tick(Buttons::RIGHT, i as f64 * 16.0, &mut NullSurface);
        }
        place_in_goal(&mut s);
        s.tick(Buttons::empty(), 900.0, &mut NullSurface);
        assert!(s.elapsed_seconds().is_some());

        s.restart();
        assert_eq!(s.phase(), Phase::NotStarted);
        assert_eq!(*s.actor(), fresh_actor);
        assert_eq!(*s.world(), fresh_world);
        assert_eq!(s.elapsed_seconds(), None);
        assert!(s.start(5_000.0));
    }

    #[test]
    fn fixed_stepping_stops_mid_frame_on_win() {
        let params = Params {
            stepping: Stepping::Fixed { hz: 60.0, max_steps: 8 },
            ..Params::default()
        };
        let mut s = session(params);
        s.start(0.0);
        s.tick(Buttons::empty(), 0.0, &mut NullSurface);
        place_in_goal(&mut s);

        // 100ms would be six steps; the first one already wins.
        let t = s.tick(Buttons::empty(), 100.0, &mut NullSurface);
        assert_eq!(t.steps, 1);
        assert!(t.ended);
    }

    #[test]
    fn rejects_bad_params() {
        let params = Params { gravity: 0.0, ..Params::default() };
        assert!(Session::new(params, &SceneDesc::tower(), Viewport::new(800.0, 600.0)).is_err());
    }
}
