use skyhop_core::{step, Buttons, Params, SceneDesc, Viewport};

fn main() {
    let params = Params::default();
    let mut world = SceneDesc::tower()
        .resolve(Viewport::new(960.0, 540.0))
        .expect("tower preset resolves");
    let mut actor = world.spawn_actor();

    let mut jumped: u32 = 0;
    let mut landings: u32 = 0;
    let mut rode: u32 = 0;
    let mut fell: u32 = 0;
    let mut won_at = None;

    for frame in 0..600 {
        let mut buttons = Buttons::empty();
        if frame < 120 {
            buttons |= Buttons::RIGHT;
        }
        if frame == 10 || frame == 200 {
            buttons |= Buttons::JUMP;
        }

        let ev = step(&params, &mut world, &mut actor, buttons);
        jumped += ev.jumped as u32;
        landings += ev.landed as u32;
        rode += ev.rode as u32;
        fell += ev.fell as u32;
        if ev.won && won_at.is_none() {
            won_at = Some(frame);
        }
    }

    println!(
        "{{\"x\":{},\"y\":{},\"dx\":{},\"dy\":{},\"airborne\":{},\"jumped\":{},\"landed_ticks\":{},\"rode\":{},\"fell\":{},\"won_at\":{}}}",
        actor.x,
        actor.y,
        actor.dx,
        actor.dy,
        actor.airborne,
        jumped,
        landings,
        rode,
        fell,
        won_at.map_or("null".to_string(), |f| f.to_string())
    );
}
