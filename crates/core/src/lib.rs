#![allow(clippy::many_single_char_names)]

mod clock;
mod entity;
mod error;
mod geom;
mod input;
mod params;
mod render;
mod scene;
mod session;
mod step;

pub use clock::FrameClock;
pub use entity::{Actor, MovingObstacle, Obstacle};
pub use error::{ConfigError, SceneError, SessionError};
pub use geom::{rects_intersect, Color, Rect, Viewport};
pub use input::{Buttons, KeyMap, KeyState};
pub use params::{FallPolicy, LandingReset, Params, Stepping};
pub use render::{draw, DrawList, NullSurface, Surface};
pub use scene::{Coord, MovingDesc, ObstacleDesc, RectDesc, SceneDesc, World, PRESETS};
pub use session::{Phase, Session, Tick};
pub use step::{step, Events};
