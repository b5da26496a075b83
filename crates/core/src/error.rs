use thiserror::Error;

/// Rejected tuning parameters or key bindings.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("malformed config json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid parameter `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// A scene descriptor that cannot be turned into a playable world.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("malformed scene json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown scene preset: {0}")]
    UnknownPreset(String),

    #[error("viewport must be positive and finite, got {w}x{h}")]
    Viewport { w: f32, h: f32 },

    #[error("{what} has a non-finite coordinate")]
    NonFinite { what: String },

    #[error("{what} must have a positive size, got {w}x{h}")]
    EmptyRect { what: String, w: f32, h: f32 },

    #[error("actor spawns with its bottom edge at {bottom}, below the world floor at {floor}")]
    SpawnBelowFloor { bottom: f32, floor: f32 },

    #[error("moving platform step must be positive, got {0}")]
    MovingStep(f32),

    #[error("moving platform bounds [{min_x}, {max_x}] cannot hold a platform {w} wide")]
    MovingBounds { min_x: f32, max_x: f32, w: f32 },
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Scene(#[from] SceneError),
}
