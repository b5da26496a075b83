//! Scene descriptors and the resolved world they produce.
//!
//! Layouts are written relative to the viewport (`frac * extent + offset`)
//! and resolved once, when a session is built. Later viewport changes do not
//! move anything.

use serde::{Deserialize, Serialize};

use crate::entity::{Actor, MovingObstacle, Obstacle};
use crate::error::SceneError;
use crate::geom::{Color, Rect, Viewport};

/// One coordinate or extent, either absolute or relative to the viewport.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Coord {
    Abs(f32),
    Rel {
        #[serde(default)]
        frac: f32,
        #[serde(default)]
        offset: f32,
    },
}

impl Coord {
    pub const fn rel(frac: f32, offset: f32) -> Self {
        Coord::Rel { frac, offset }
    }

    pub fn resolve(self, extent: f32) -> f32 {
        match self {
            Coord::Abs(v) => v,
            Coord::Rel { frac, offset } => frac * extent + offset,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RectDesc {
    pub x: Coord,
    pub y: Coord,
    pub w: Coord,
    pub h: Coord,
}

impl RectDesc {
    fn resolve(&self, vp: Viewport) -> Rect {
        Rect::new(
            self.x.resolve(vp.w),
            self.y.resolve(vp.h),
            self.w.resolve(vp.w),
            self.h.resolve(vp.h),
        )
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObstacleDesc {
    pub rect: RectDesc,
    pub color: Color,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MovingDesc {
    pub rect: RectDesc,
    pub color: Color,
    pub step: f32,
    #[serde(default = "default_direction")]
    pub direction: f32,
    /// Horizontal travel range; the whole viewport width when absent.
    #[serde(default)]
    pub bounds: Option<[Coord; 2]>,
}

fn default_direction() -> f32 {
    1.0
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SceneDesc {
    pub spawn: [Coord; 2],
    pub actor_size: [f32; 2],
    #[serde(default = "default_actor_color")]
    pub actor_color: Color,
    pub obstacles: Vec<ObstacleDesc>,
    #[serde(default)]
    pub moving: Option<MovingDesc>,
    pub goal: ObstacleDesc,
}

fn default_actor_color() -> Color {
    Color::BLUE
}

/// Names accepted by [`SceneDesc::preset`].
pub const PRESETS: &[&str] = &["tower", "ladder"];

fn rect(x: Coord, y: Coord, w: Coord, h: Coord) -> RectDesc {
    RectDesc { x, y, w, h }
}

fn ground() -> ObstacleDesc {
    ObstacleDesc {
        rect: rect(
            Coord::Abs(-10.0),
            Coord::rel(1.0, -20.0),
            Coord::rel(1.0, 20.0),
            Coord::Abs(20.0),
        ),
        color: Color::GREEN,
    }
}

fn ledge(x: Coord, y: Coord, w: f32) -> ObstacleDesc {
    ObstacleDesc {
        rect: rect(x, y, Coord::Abs(w), Coord::Abs(20.0)),
        color: Color::GREEN,
    }
}

impl SceneDesc {
    /// Ground, two ledges, a sliding platform and a goal box above them.
    pub fn tower() -> Self {
        Self {
            spawn: [Coord::rel(0.5, -20.0), Coord::rel(1.0, -70.0)],
            actor_size: [40.0, 40.0],
            actor_color: Color::BLUE,
            obstacles: vec![
                ground(),
                ledge(Coord::rel(0.5, -100.0), Coord::rel(1.0, -100.0), 200.0),
                ledge(Coord::rel(0.5, 150.0), Coord::rel(1.0, -200.0), 200.0),
            ],
            moving: Some(MovingDesc {
                rect: rect(
                    Coord::rel(0.5, -50.0),
                    Coord::rel(1.0, -150.0),
                    Coord::Abs(100.0),
                    Coord::Abs(10.0),
                ),
                color: Color::ORANGE,
                step: 2.0,
                direction: 1.0,
                bounds: None,
            }),
            goal: ObstacleDesc {
                rect: rect(
                    Coord::rel(0.5, -15.0),
                    Coord::rel(1.0, -300.0),
                    Coord::Abs(30.0),
                    Coord::Abs(30.0),
                ),
                color: Color::RED,
            },
        }
    }

    /// Static staircase climbing to the right, finish flag on the top step.
    pub fn ladder() -> Self {
        Self {
            spawn: [Coord::Abs(40.0), Coord::rel(1.0, -70.0)],
            actor_size: [40.0, 40.0],
            actor_color: Color::BLUE,
            obstacles: vec![
                ground(),
                ledge(Coord::rel(0.2, 0.0), Coord::rel(1.0, -110.0), 160.0),
                ledge(Coord::rel(0.4, 0.0), Coord::rel(1.0, -200.0), 160.0),
                ledge(Coord::rel(0.6, 0.0), Coord::rel(1.0, -290.0), 160.0),
            ],
            moving: None,
            goal: ObstacleDesc {
                rect: rect(
                    Coord::rel(0.6, 120.0),
                    Coord::rel(1.0, -340.0),
                    Coord::Abs(20.0),
                    Coord::Abs(50.0),
                ),
                color: Color::RED,
            },
        }
    }

    pub fn preset(name: &str) -> Result<Self, SceneError> {
        match name {
            "tower" => Ok(Self::tower()),
            "ladder" => Ok(Self::ladder()),
            other => Err(SceneError::UnknownPreset(other.to_owned())),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, SceneError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Pin every coordinate against `vp` and check the result is playable.
    pub fn resolve(&self, vp: Viewport) -> Result<World, SceneError> {
        if !(vp.w.is_finite() && vp.h.is_finite() && vp.w > 0.0 && vp.h > 0.0) {
            return Err(SceneError::Viewport { w: vp.w, h: vp.h });
        }

        let spawn = (self.spawn[0].resolve(vp.w), self.spawn[1].resolve(vp.h));
        let [aw, ah] = self.actor_size;
        checked("actor", Rect::new(spawn.0, spawn.1, aw, ah))?;
        if spawn.1 + ah > vp.h {
            // Would leave the world on the first tick, and again after every respawn.
            return Err(SceneError::SpawnBelowFloor { bottom: spawn.1 + ah, floor: vp.h });
        }

        let obstacles = self
            .obstacles
            .iter()
            .enumerate()
            .map(|(i, o)| {
                let r = checked(&format!("obstacle {i}"), o.rect.resolve(vp))?;
                Ok(Obstacle::new(r, o.color))
            })
            .collect::<Result<Vec<_>, SceneError>>()?;

        let moving = match &self.moving {
            Some(m) => Some(resolve_moving(m, vp)?),
            None => None,
        };

        let goal = Obstacle::new(checked("goal", self.goal.rect.resolve(vp))?, self.goal.color);

        Ok(World {
            viewport: vp,
            spawn,
            actor_size: (aw, ah),
            actor_color: self.actor_color,
            obstacles,
            moving,
            goal,
        })
    }
}

fn checked(what: &str, r: Rect) -> Result<Rect, SceneError> {
    if !r.is_finite() {
        return Err(SceneError::NonFinite { what: what.to_owned() });
    }
    if r.w <= 0.0 || r.h <= 0.0 {
        return Err(SceneError::EmptyRect { what: what.to_owned(), w: r.w, h: r.h });
    }
    Ok(r)
}

fn resolve_moving(m: &MovingDesc, vp: Viewport) -> Result<MovingObstacle, SceneError> {
    let r = checked("moving platform", m.rect.resolve(vp))?;
    if !(m.step.is_finite() && m.step > 0.0) {
        return Err(SceneError::MovingStep(m.step));
    }
    let (min_x, max_x) = match m.bounds {
        Some([lo, hi]) => (lo.resolve(vp.w), hi.resolve(vp.w)),
        None => (0.0, vp.w),
    };
    if !(min_x.is_finite() && max_x.is_finite()) || max_x - min_x <= r.w {
        return Err(SceneError::MovingBounds { min_x, max_x, w: r.w });
    }

    Ok(MovingObstacle {
        obstacle: Obstacle::new(r, m.color),
        direction: if m.direction < 0.0 { -1.0 } else { 1.0 },
        step: m.step,
        min_x,
        max_x,
    })
}

/// A scene pinned to a concrete viewport. Cloned to reset a session.
#[derive(Clone, Debug, PartialEq)]
pub struct World {
    pub viewport: Viewport,
    pub spawn: (f32, f32),
    pub actor_size: (f32, f32),
    pub actor_color: Color,
    pub obstacles: Vec<Obstacle>,
    pub moving: Option<MovingObstacle>,
    pub goal: Obstacle,
}

impl World {
    pub fn spawn_actor(&self) -> Actor {
        Actor {
            x: self.spawn.0,
            y: self.spawn.1,
            w: self.actor_size.0,
            h: self.actor_size.1,
            color: self.actor_color,
            ..Actor::default()
        }
    }
}
