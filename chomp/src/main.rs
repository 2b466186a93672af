//! Headless autoplay run of Chomp.
//!
//! Usage: `chomp [config.json]`. Set `RUST_LOG` to change verbosity.

use anyhow::Result;
use chomp::{GameConfig, SceneServices, SceneState, SCORE_KEY};
use scene2d::{Engine, EngineContext, EngineEvent, KeyCode, SceneMachine, Vec2};

/// Give up after two minutes of simulated time.
const MAX_FRAMES: u64 = 60 * 120;
const ARROWS: [KeyCode; 4] = [
    KeyCode::ArrowLeft,
    KeyCode::ArrowRight,
    KeyCode::ArrowUp,
    KeyCode::ArrowDown,
];

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match std::env::args().nth(1) {
        Some(path) => GameConfig::load(&path)?,
        None => GameConfig::default(),
    };
    let services = SceneServices::new(config);
    let machine = SceneMachine::new(SceneState::Boot.build(&services));

    let engine = Engine::new().with_title("Chomp").with_size(1024, 768);
    let mut ctx = engine.context();
    let ready = ctx.events_mut().subscribe();

    let mut scene = None;
    let ctx = engine.run_with(ctx, machine, |ctx| {
        for EngineEvent::SceneReady { scene: key } in ready.try_iter() {
            scene = SceneState::from_key(key);
        }
        if ctx.frame() > MAX_FRAMES {
            log::warn!("out of time");
            return false;
        }
        match scene {
            Some(SceneState::MainMenu) => {
                ctx.input_mut().release_key(KeyCode::Enter);
                ctx.input_mut().press_key(KeyCode::Enter);
                true
            }
            Some(SceneState::Game) => {
                steer(ctx);
                true
            }
            Some(SceneState::GameOver) | Some(SceneState::Win) => false,
            _ => true,
        }
    })?;

    let score: u32 = ctx.session().get_or_default(SCORE_KEY);
    log::info!("final score {}", score);
    Ok(())
}

/// Hold the arrows that point at the nearest dot.
fn steer(ctx: &mut EngineContext) {
    let display = ctx.display();
    let Some((_, player)) = display.find("player") else {
        return;
    };
    let from = player.position;
    let target = display
        .find_all("dot")
        .map(|(_, n)| n.position)
        .min_by(|a, b| from.distance(*a).total_cmp(&from.distance(*b)));

    let wanted: Vec<KeyCode> = match target {
        Some(to) => arrows_towards(from, to),
        None => Vec::new(),
    };

    let input = ctx.input_mut();
    for key in ARROWS {
        if wanted.contains(&key) {
            input.press_key(key);
        } else {
            input.release_key(key);
        }
    }
}

fn arrows_towards(from: Vec2, to: Vec2) -> Vec<KeyCode> {
    let d = to - from;
    let mut keys = Vec::new();
    if d.x < -2.0 {
        keys.push(KeyCode::ArrowLeft);
    } else if d.x > 2.0 {
        keys.push(KeyCode::ArrowRight);
    }
    if d.y < -2.0 {
        keys.push(KeyCode::ArrowUp);
    } else if d.y > 2.0 {
        keys.push(KeyCode::ArrowDown);
    }
    keys
}
