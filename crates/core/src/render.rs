use crate::entity::Actor;
use crate::geom::{Color, Rect, Viewport};
use crate::scene::World;

/// Something that can fill rectangles, e.g. a 2D canvas context.
pub trait Surface {
    fn clear(&mut self, viewport: Viewport);
    fn fill_rect(&mut self, rect: &Rect, color: Color);
}

/// Paint one frame: actor, static obstacles, moving platform, goal.
pub fn draw<S: Surface + ?Sized>(world: &World, actor: &Actor, surface: &mut S) {
    surface.clear(world.viewport);
    surface.fill_rect(&actor.rect(), actor.color);
    for o in &world.obstacles {
        surface.fill_rect(&o.rect, o.color);
    }
    if let Some(m) = &world.moving {
        surface.fill_rect(&m.obstacle.rect, m.obstacle.color);
    }
    surface.fill_rect(&world.goal.rect, world.goal.color);
}

/// A surface that draws nothing. Handy for headless stepping.
#[derive(Copy, Clone, Debug, Default)]
pub struct NullSurface;

impl Surface for NullSurface {
    fn clear(&mut self, _viewport: Viewport) {}
    fn fill_rect(&mut self, _rect: &Rect, _color: Color) {}
}

/// Records draw calls in order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DrawList {
    pub clears: usize,
    pub rects: Vec<(Rect, Color)>,
}

impl Surface for DrawList {
    fn clear(&mut self, _viewport: Viewport) {
        self.clears += 1;
        self.rects.clear();
    }

    fn fill_rect(&mut self, rect: &Rect, color: Color) {
        self.rects.push((*rect, color));
    }
}
