use serde::{Deserialize, Serialize};

use crate::geom::{Color, Rect};

/// The player square.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Actor {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub dx: f32,
    pub dy: f32,

    /// Set by a jump, cleared by a landing. Gates re-triggering the jump.
    pub airborne: bool,
    pub color: Color,
}

impl Actor {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.w, self.h)
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// Strict horizontal overlap with `r`.
    #[inline]
    pub fn spans(&self, r: &Rect) -> bool {
        self.x < r.x + r.w && self.x + self.w > r.x
    }

    /// Landing-only contact: the bottom edge started at or above `r`'s top
    /// and has now reached or passed it.
    #[inline]
    pub fn lands_on(&self, prev_bottom: f32, r: &Rect) -> bool {
        self.spans(r) && prev_bottom <= r.y && self.bottom() >= r.y
    }

    pub fn rest_on(&mut self, top: f32, dy: f32) {
        self.y = top - self.h;
        self.dy = dy;
        self.airborne = false;
    }
}

/// A static collidable rectangle, or the goal marker.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub rect: Rect,
    pub color: Color,
}

impl Obstacle {
    pub const fn new(rect: Rect, color: Color) -> Self {
        Self { rect, color }
    }
}

/// A platform sliding horizontally between `min_x` and `max_x`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MovingObstacle {
    pub obstacle: Obstacle,
    /// +1.0 or -1.0.
    pub direction: f32,
    pub step: f32,
    pub min_x: f32,
    pub max_x: f32,
}

impl MovingObstacle {
    /// Move one tick and return the displacement actually applied.
    ///
    /// The platform stops exactly on a bound and turns around there.
    pub fn advance(&mut self) -> f32 {
        let r = &mut self.obstacle.rect;
        let from = r.x;
        let mut to = from + self.direction * self.step;

        if to <= self.min_x {
            to = self.min_x;
            self.direction = 1.0;
        } else if to + r.w >= self.max_x {
            to = self.max_x - r.w;
            self.direction = -1.0;
        }

        r.x = to;
        to - from
    }
}

#[cfg(test)]
mod tests {
    use super::{Actor, MovingObstacle, Obstacle};
    use crate::geom::{Color, Rect};

    fn slider(x: f32, direction: f32) -> MovingObstacle {
        MovingObstacle {
            obstacle: Obstacle::new(Rect::new(x, 300.0, 100.0, 10.0), Color::ORANGE),
            direction,
            step: 2.0,
            min_x: 0.0,
            max_x: 400.0,
        }
    }

    #[test]
    fn reverses_exactly_at_right_bound() {
        let mut m = slider(297.0, 1.0);
        assert_eq!(m.advance(), 2.0);
        assert_eq!(m.direction, 1.0);

        // 299 + 2 would overshoot to 301; stop at 300 instead.
        assert_eq!(m.advance(), 1.0);
        assert_eq!(m.obstacle.rect.right(), 400.0);
        assert_eq!(m.direction, -1.0);

        assert_eq!(m.advance(), -2.0);
        assert_eq!(m.obstacle.rect.x, 298.0);
    }

    #[test]
    fn reverses_exactly_at_left_bound() {
        let mut m = slider(2.0, -1.0);
        assert_eq!(m.advance(), -2.0);
        assert_eq!(m.obstacle.rect.x, 0.0);
        assert_eq!(m.direction, 1.0);
        assert_eq!(m.advance(), 2.0);
    }

    #[test]
    fn never_leaves_bounds() {
        let mut m = slider(150.0, 1.0);
        for _ in 0..1000 {
            m.advance();
            assert!(m.obstacle.rect.x >= m.min_x);
            assert!(m.obstacle.rect.right() <= m.max_x);
        }
    }

    #[test]
    fn landing_needs_horizontal_overlap() {
        let platform = Rect::new(100.0, 200.0, 50.0, 10.0);
        let mut a = Actor { x: 60.0, y: 165.0, w: 40.0, h: 40.0, ..Actor::default() };
        // Right edge touches the platform's left edge only.
        assert!(!a.lands_on(195.0, &platform));
        a.x = 61.0;
        assert!(a.lands_on(195.0, &platform));
        // Started below the top: no landing from underneath.
        assert!(!a.lands_on(201.0, &platform));
    }
}
