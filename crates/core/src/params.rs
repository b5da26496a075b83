use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// What a landing does to vertical velocity.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LandingReset {
    /// `dy = 0`; gravity is re-applied on the next tick.
    #[default]
    Zero,
    /// `dy = gravity`, as some legacy layouts did.
    Gravity,
}

/// What happens when the actor's bottom edge leaves the viewport.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallPolicy {
    /// Put the actor back on its spawn point and report a fall.
    #[default]
    Respawn,
    /// Treat the bottom of the viewport as one more platform.
    ClampToFloor,
}

/// How host frames map onto simulation steps.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Stepping {
    /// One step per rendered frame. Motion speed follows the display refresh rate.
    #[default]
    PerFrame,
    /// Whole steps at `hz`, driven by elapsed host time.
    Fixed { hz: f32, max_steps: u32 },
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Params {
    // Per-tick units: pixels per tick, pixels per tick squared.
    pub speed: f32,
    pub jump_impulse: f32,
    pub gravity: f32,

    pub landing_reset: LandingReset,
    pub fall_policy: FallPolicy,
    pub stepping: Stepping,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            speed: 5.0,
            jump_impulse: -15.0,
            gravity: 0.8,

            landing_reset: LandingReset::Zero,
            fall_policy: FallPolicy::Respawn,
            stepping: Stepping::PerFrame,
        }
    }
}

impl Params {
    /// Parse from JSON. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let params: Params = serde_json::from_str(json)?;
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        fn invalid(field: &'static str, reason: &'static str) -> Result<(), ConfigError> {
            Err(ConfigError::Invalid { field, reason })
        }

        if !self.speed.is_finite() || self.speed < 0.0 {
            return invalid("speed", "must be finite and non-negative");
        }
        if !self.jump_impulse.is_finite() || self.jump_impulse >= 0.0 {
            return invalid("jump_impulse", "must be finite and negative (upward)");
        }
        if !self.gravity.is_finite() || self.gravity <= 0.0 {
            return invalid("gravity", "must be finite and positive");
        }
        if let Stepping::Fixed { hz, max_steps } = self.stepping {
            if !hz.is_finite() || hz <= 0.0 {
                return invalid("stepping.hz", "must be finite and positive");
            }
            if max_steps == 0 {
                return invalid("stepping.max_steps", "must be at least 1");
            }
        }
        Ok(())
    }

    /// Vertical velocity left after landing on a surface.
    #[inline]
    pub fn landing_dy(&self) -> f32 {
        match self.landing_reset {
            LandingReset::Zero => 0.0,
            LandingReset::Gravity => self.gravity,
        }
    }
}
