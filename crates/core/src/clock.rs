use crate::params::Stepping;

/// Turns host frame timestamps into a number of simulation steps.
#[derive(Clone, Debug, Default)]
pub struct FrameClock {
    last_ms: Option<f64>,
    acc_ms: f64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.last_ms = None;
        self.acc_ms = 0.0;
    }

    /// How many steps to run for a frame shown at `now_ms`.
    ///
    /// `PerFrame` always runs exactly one. `Fixed` runs as many whole steps
    /// as elapsed time allows, up to `max_steps`; time beyond the cap is
    /// dropped so a stalled tab does not fast-forward.
    pub fn steps(&mut self, stepping: Stepping, now_ms: f64) -> u32 {
        match stepping {
            Stepping::PerFrame => {
                self.last_ms = Some(now_ms);
                1
            }
            Stepping::Fixed { hz, max_steps } => {
                let dt_ms = 1000.0 / hz as f64;
                let elapsed = match self.last_ms {
                    Some(last) => (now_ms - last).max(0.0),
                    // First frame after (re)start runs one step.
                    None => dt_ms,
                };
                self.last_ms = Some(now_ms);
                self.acc_ms += elapsed;

                let n = (self.acc_ms / dt_ms).floor() as u64;
                if n > max_steps as u64 {
                    self.acc_ms = 0.0;
                    max_steps
                } else {
                    self.acc_ms -= n as f64 * dt_ms;
                    n as u32
                }
            }
        }
    }
}
