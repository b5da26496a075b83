use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use skyhop_core::{Buttons, NullSurface, Params, SceneDesc, Session, Viewport};

/// Frame interval the replay pretends the host runs at.
const FRAME_MS: f64 = 1000.0 / 60.0;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Replay {
    viewport: Viewport,
    #[serde(default)]
    preset: Option<String>,
    #[serde(default)]
    scene: Option<SceneDesc>,
    #[serde(default)]
    params: Params,
    inputs: Vec<u8>,
}

impl Replay {
    fn scene(&self) -> Result<SceneDesc> {
        match (&self.preset, &self.scene) {
            (Some(_), Some(_)) => bail!("replay sets both `preset` and `scene`"),
            (None, Some(scene)) => Ok(scene.clone()),
            (Some(name), None) => Ok(SceneDesc::preset(name)?),
            (None, None) => Ok(SceneDesc::tower()),
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .context("usage: cargo run -p skyhop_core --features cli --bin replay -- <replay.json>")?;
    let raw = fs::read_to_string(&path)
        .with_context(|| format!("failed to read replay {}", path.display()))?;
    let replay: Replay = serde_json::from_str(&raw).context("malformed replay json")?;

    let scene = replay.scene()?;
    let mut session = Session::new(replay.params, &scene, replay.viewport)?;
    session.start(0.0);
    log::info!("replaying {} frames from {}", replay.inputs.len(), path.display());

    println!("frame,x,y,dx,dy,airborne,won");
    for (frame, bits) in replay.inputs.iter().enumerate() {
        let buttons = Buttons::from_bits_truncate(*bits);
        let tick = session.tick(buttons, frame as f64 * FRAME_MS, &mut NullSurface);
        let a = session.actor();
        println!(
            "{},{},{},{},{},{},{}",
            frame, a.x, a.y, a.dx, a.dy, a.airborne as u8, tick.events.won as u8
        );
        if tick.events.fell {
            log::warn!("frame {frame}: fell out of the world");
        }
        if tick.ended {
            log::info!("goal reached on frame {frame}");
            break;
        }
    }

    Ok(())
}
