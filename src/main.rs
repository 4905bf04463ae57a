//! Smile Survivor - headless native runner
//!
//! Plays the game on autopilot at a simulated 60 Hz and logs what happens.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use smile_survivor::HudSnapshot;
use smile_survivor::audio::{AudioManager, LogBackend};
use smile_survivor::consts::SIM_DT;
use smile_survivor::settings::{QualityPreset, Settings};
use smile_survivor::sim::{GamePhase, GameState, ObstacleMap, TickInput, tick};

#[derive(Parser, Debug)]
#[command(name = "smile-survivor")]
#[command(about = "Run the wave survival simulation headlessly on autopilot")]
struct Cli {
    /// Map grid file (rows of comma-separated tile codes); built-in arena if omitted
    #[arg(long)]
    map: Option<PathBuf>,
    /// Settings JSON file
    #[arg(long, default_value = "settings.json")]
    settings: PathBuf,
    #[arg(long, default_value_t = 12345)]
    seed: u64,
    /// Frames to simulate
    #[arg(long, default_value_t = 60 * 60 * 5)]
    frames: u32,
    /// Log a HUD snapshot every N frames (0 = only at the end)
    #[arg(long, default_value_t = 600)]
    report_every: u32,
    /// Override the quality preset (low, medium, high)
    #[arg(long, value_parser = parse_quality)]
    quality: Option<QualityPreset>,
    /// Write the effective settings back to the settings file
    #[arg(long)]
    save_settings: bool,
}

struct Runner {
    state: GameState,
    settings: Settings,
    audio: AudioManager<LogBackend>,
    input: TickInput,
    last_phase: GamePhase,
    deaths: u32,
    best_wave: u32,
}

impl Runner {
    fn new(seed: u64, map: ObstacleMap, settings: Settings) -> Self {
        let mut state = GameState::new(seed, map);
        state.particles.cap = settings.max_particles();
        let mut audio = AudioManager::new(LogBackend::default());
        audio.apply_settings(&settings);
        Self {
            last_phase: state.phase,
            state,
            settings,
            audio,
            input: TickInput {
                idle_mode: true,
                ..Default::default()
            },
            deaths: 0,
            best_wave: 1,
        }
    }

    /// Run one frame
    fn update(&mut self) {
        tick(&mut self.state, &self.input, SIM_DT);
        self.audio.dispatch(&self.state.events);

        let phase = self.state.phase;
        if phase != self.last_phase {
            log::debug!("Phase {:?} -> {:?}", self.last_phase, phase);
            if phase == GamePhase::GameOver {
                self.deaths += 1;
            }
            self.last_phase = phase;
        }
        self.best_wave = self.best_wave.max(self.state.wave.number);
    }

    fn snapshot(&self) -> HudSnapshot {
        HudSnapshot::capture(&self.state, &self.settings)
    }
}

fn parse_quality(s: &str) -> Result<QualityPreset, String> {
    QualityPreset::parse(s).ok_or_else(|| format!("unknown quality preset {s:?}"))
}

fn load_map(path: Option<&PathBuf>) -> Result<ObstacleMap> {
    match path {
        Some(p) => ObstacleMap::load(p).with_context(|| format!("loading map {}", p.display())),
        None => Ok(ObstacleMap::walled_arena()),
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    log::info!("Smile Survivor (headless) starting, seed {}", cli.seed);

    let mut settings = Settings::load_or_default(&cli.settings);
    if let Some(preset) = cli.quality {
        settings.apply_preset(preset);
    }
    log::info!(
        "Quality {}, particle cap {}",
        settings.quality.as_str(),
        settings.max_particles()
    );
    if cli.save_settings {
        settings
            .save(&cli.settings)
            .with_context(|| format!("saving settings to {}", cli.settings.display()))?;
    }
    let map = load_map(cli.map.as_ref())?;

    let mut runner = Runner::new(cli.seed, map, settings);
    for frame in 1..=cli.frames {
        runner.update();
        if cli.report_every > 0 && frame % cli.report_every == 0 {
            log::info!(
                "frame {frame}: {}",
                serde_json::to_string(&runner.snapshot())?
            );
        }
    }

    let hud = runner.snapshot();
    println!("{}", serde_json::to_string_pretty(&hud)?);
    log::info!(
        "Done after {} frames: wave {} (best {}), {} kills, {} deaths, {} sounds",
        cli.frames,
        hud.wave,
        runner.best_wave,
        hud.kills,
        runner.deaths,
        runner.audio.backend().played
    );
    Ok(())
}
