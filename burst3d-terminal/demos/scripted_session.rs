/// Example: drive the engine through a scripted gesture sequence without a terminal UI
///
/// Usage: cargo run --example scripted_session
///
/// Holds each pose for a while at 60 ticks per second and prints a line per
/// half second. The model explodes and reassembles, then the index finger
/// arms the delayed redirect and the run stops once it fires.
use burst3d_core::{Engine, SceneConfig};
use burst3d_terminal::{SimulatedHand, TerminalNavigator, DEMO_SCRIPT};
use tracing_subscriber::EnvFilter;

const DT: f32 = 1.0 / 60.0;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let mut engine = Engine::new(SceneConfig::default());
    let mut hand = SimulatedHand::new();
    let mut navigator = TerminalNavigator::default();
    let mut elapsed = 0.0f32;

    for (pose, x, seconds) in DEMO_SCRIPT {
        hand.set_pose(pose);
        let palm = hand.palm();
        hand.nudge(x - palm.x, 0.0);
        println!("-- {} --", hand.label());

        let ticks = (seconds / DT).round() as usize;
        for tick in 0..ticks {
            engine.submit(hand.sample().as_ref());
            let snapshot = engine.tick(DT, &mut navigator);
            elapsed += DT;

            if tick % 30 == 0 {
                let state = &snapshot.state;
                println!(
                    "t={:5.2}s gesture={:<9} mode={:<14} yaw={:+.2} solid={:.2} swarm={:.2} redirect={}",
                    elapsed,
                    state.gesture.label(),
                    state.visual_mode(),
                    snapshot.rig.rotation.y,
                    snapshot.layers.solid.opacity,
                    snapshot.layers.ambient_progress,
                    snapshot.redirect.label(),
                );
            }
            if let Some(destination) = navigator.destination() {
                println!("t={:5.2}s navigating to {}", elapsed, destination);
                return;
            }
        }
    }
}
