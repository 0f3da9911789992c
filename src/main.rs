//! Sunshine headless runner
//!
//! Loads settings and arena geometry, lets a scripted pilot play one session
//! against the stock enemies and logs what happens.
//!
//! Usage: `sunshine [settings.json] [obstacles.json] [waypoints.json]`

use std::path::Path;

use glam::Vec2;

use sunshine::Settings;
use sunshine::consts::*;
use sunshine::persistence;
use sunshine::sim::grid::has_line_of_sight;
use sunshine::sim::{
    Circle, DebugOverlay, GameEvent, GamePhase, GameState, Rect, TickInput, scenario, tick,
};

/// Give up after this much simulated time
const SESSION_LIMIT_SECS: f32 = 180.0;
/// Frames between debug overlay summaries
const OVERLAY_INTERVAL: u64 = 300;

/// One running session plus its frame pacing
struct Session {
    state: GameState,
    accumulator: f32,
    frames: u64,
}

impl Session {
    fn new(state: GameState) -> Self {
        Self {
            state,
            accumulator: 0.0,
            frames: 0,
        }
    }

    /// Run simulation ticks for one frame
    fn update(&mut self, dt: f32) {
        let dt = dt.min(0.1);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let input = autopilot(&self.state);
            tick(&mut self.state, &input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;

            for event in self.state.drain_events() {
                report(event);
            }
        }

        self.frames += 1;
        if log::log_enabled!(log::Level::Debug) && self.frames % OVERLAY_INTERVAL == 0 {
            let overlay = DebugOverlay::capture(&self.state);
            for enemy in &overlay.enemies {
                log::debug!(
                    "{}: {:.0}% health, {} vantage tiles",
                    enemy.name,
                    enemy.health_percent * 100.0,
                    enemy.visible_tiles.len()
                );
            }
            if let Some(hit) = overlay.aim_hit {
                log::debug!("Aim blocked at ({:.0}, {:.0})", hit.x, hit.y);
            }
        }
    }
}

/// Scripted pilot: face the nearest live enemy, keep some distance, shoot
/// when the line is clear and strafe back and forth
fn autopilot(state: &GameState) -> TickInput {
    let player = &state.player.body;
    let nearest = state
        .enemies
        .iter()
        .filter(|e| e.body.is_alive())
        .min_by(|a, b| {
            a.body
                .pos
                .distance_squared(player.pos)
                .partial_cmp(&b.body.pos.distance_squared(player.pos))
                .unwrap_or(std::cmp::Ordering::Equal)
        });

    let Some(target) = nearest else {
        return TickInput::default();
    };

    let distance = target.body.pos.distance(player.pos);
    let clear = has_line_of_sight(player.pos, target.body.pos, &state.world.obstacles);
    let strafe_left = (state.time_ticks / 120) % 2 == 0;

    TickInput {
        move_forward: !clear || distance > 450.0,
        move_back: clear && distance < 250.0,
        strafe_left,
        strafe_right: !strafe_left,
        aim: Some(target.body.pos),
        attack: clear,
    }
}

fn report(event: GameEvent) {
    match event {
        GameEvent::Sound(sound) => {
            log::debug!("Sound {} at volume {:.1}", sound.asset_name(), sound.volume());
        }
        GameEvent::ProjectileSpawned { owner } => log::trace!("{:?} fired", owner),
        GameEvent::PhaseChanged(phase) => log::info!("Session ended: {:?}", phase),
    }
}

fn load_obstacles(path: Option<&str>, bounds: &Rect) -> Vec<Circle> {
    match path.map(|p| persistence::load_obstacles(p)) {
        Some(Ok(obstacles)) => obstacles,
        Some(Err(err)) => {
            log::warn!("Falling back to stock obstacles: {}", err);
            scenario::default_obstacles(bounds)
        }
        None => scenario::default_obstacles(bounds),
    }
}

fn load_waypoints(path: Option<&str>, bounds: &Rect) -> Vec<Vec2> {
    match path.map(|p| persistence::load_waypoints(p)) {
        Some(Ok(waypoints)) => waypoints,
        Some(Err(err)) => {
            log::warn!("Falling back to stock waypoints: {}", err);
            scenario::default_waypoints(bounds)
        }
        None => scenario::default_waypoints(bounds),
    }
}

fn main() {
    env_logger::init();
    log::info!("Sunshine (headless) starting...");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let arg = |i: usize| args.get(i).map(String::as_str);

    let settings = match arg(0) {
        Some(path) => Settings::load(Path::new(path)),
        None => Settings::default(),
    };
    let bounds = Rect::new(0.0, 0.0, settings.arena_width, settings.arena_height);
    let obstacles = load_obstacles(arg(1), &bounds);
    let waypoints = load_waypoints(arg(2), &bounds);

    let state = match GameState::new(&settings, obstacles, waypoints) {
        Ok(state) => state,
        Err(err) => {
            log::error!("Could not build enemy behavior: {}", err);
            std::process::exit(1);
        }
    };

    let mut session = Session::new(state);
    let limit = (SESSION_LIMIT_SECS / SIM_DT) as u64;
    while !session.state.is_over() && session.state.time_ticks < limit {
        session.update(SIM_DT);
    }

    let state = &session.state;
    let seconds = state.time_ticks as f32 * SIM_DT;
    match state.phase {
        GamePhase::Won => log::info!("Player won after {:.1}s", seconds),
        GamePhase::Lost => log::info!("Player lost after {:.1}s", seconds),
        GamePhase::Running => log::info!("No winner after {:.1}s", seconds),
    }
    log::info!(
        "Player health {:.0}, enemies left {}",
        state.player.body.health.max(0.0),
        state.enemies.iter().filter(|e| e.body.is_alive()).count()
    );
}
