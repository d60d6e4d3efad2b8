// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use alchemy::config::{ConfigEvent, ConfigWatcher};
use alchemy::{
    Ability, AbilitiesFile, Category, EngineConfig, Instrument, MusicEngine, ScoredAction, Song,
    SongFile,
};
use anyhow::{anyhow, Context, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn, Level};

/// Frame rate of the simulated game loop
const FRAME_RATE: u32 = 60;
/// Seconds between status lines
const STATUS_INTERVAL: u32 = 5;

const DEMO_SONG: &str = r#"
song:
  name: Demo
sections:
  - { name: calm, energy: 1.0, links: [0, 1] }
  - { name: groove, energy: 2.5, links: [0, 2, 3] }
  - { name: drive, energy: 4.0, links: [1, 3] }
  - { name: climax, energy: 5.5, links: [2, 1] }
nodes:
  - { instrument: Pads, section: 0, low: { name: pads_calm, length: 8.0 } }
  - { instrument: Pads, section: 1, low: { name: pads_groove, length: 8.0 } }
  - { instrument: Pads, section: 2, low: { name: pads_drive, length: 8.0 } }
  - { instrument: Pads, section: 3, low: { name: pads_climax, length: 8.0 } }
  - instrument: Lead
    section: 0
    low: { name: lead_calm_low, length: 8.0 }
    med: { name: lead_calm_med, length: 8.0 }
  - instrument: Lead
    section: 1
    low: { name: lead_groove_low, length: 8.0 }
    med: { name: lead_groove_med, length: 8.0 }
    high: { name: lead_groove_high, length: 8.0 }
  - instrument: Lead
    section: 3
    low: { name: lead_climax_low, length: 8.0 }
    med: { name: lead_climax_med, length: 8.0 }
    high: { name: lead_climax_high, length: 8.0 }
  - instrument: Drums
    section: 1
    low: { name: drums_groove_low, length: 8.0 }
    med: { name: drums_groove_med, length: 8.0 }
    high: { name: drums_groove_high, length: 8.0 }
  - instrument: Drums
    section: 2
    low: { name: drums_drive_low, length: 8.0 }
    med: { name: drums_drive_med, length: 8.0 }
    high: { name: drums_drive_high, length: 8.0 }
  - instrument: Drums
    section: 3
    low: { name: drums_climax_low, length: 8.0 }
    med: { name: drums_climax_med, length: 8.0 }
    high: { name: drums_climax_high, length: 8.0 }
  - instrument: Bass
    section: 0
    low: { name: bass_calm_low, length: 8.0 }
  - instrument: Bass
    section: 2
    low: { name: bass_drive_low, length: 8.0 }
    med: { name: bass_drive_med, length: 8.0 }
    high: { name: bass_drive_high, length: 8.0 }
  - instrument: Bass
    section: 3
    low: { name: bass_climax_low, length: 8.0 }
    med: { name: bass_climax_med, length: 8.0 }
    high: { name: bass_climax_high, length: 8.0 }
"#;

fn print_usage() {
    println!("Alchemy - Gameplay-reactive music engine simulator");
    println!();
    println!("Usage: alchemy [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --song <FILE>        Song YAML (default: built-in demo song)");
    println!("  --abilities <FILE>   Abilities YAML (default: demo abilities)");
    println!("  --config <FILE>      Engine configuration TOML");
    println!("  --seconds <N>        Simulated play time (default 60)");
    println!("  --seed <N>           Seed for simulated gameplay (default 1)");
    println!("  --realtime           Run at wall-clock speed until done or Ctrl+C");
    println!("  --watch              Hot-reload the song file when it changes");
    println!("  --verbose            Log section transitions and clip changes");
    println!("  --help               Show this help message");
}

/// Command line options
#[derive(Debug)]
struct Options {
    song: Option<PathBuf>,
    abilities: Option<PathBuf>,
    config: Option<PathBuf>,
    seconds: f32,
    seed: u64,
    realtime: bool,
    watch: bool,
    verbose: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            song: None,
            abilities: None,
            config: None,
            seconds: 60.0,
            seed: 1,
            realtime: false,
            watch: false,
            verbose: false,
        }
    }
}

/// Parse arguments; `None` means help was requested
fn parse_args(args: &[String]) -> Result<Option<Options>> {
    let mut options = Options::default();
    let mut iter = args.iter().skip(1);

    while let Some(arg) = iter.next() {
        let mut value = |name: &str| {
            iter.next()
                .cloned()
                .ok_or_else(|| anyhow!("{} requires a value", name))
        };
        match arg.as_str() {
            "--song" => options.song = Some(PathBuf::from(value("--song")?)),
            "--abilities" => options.abilities = Some(PathBuf::from(value("--abilities")?)),
            "--config" => options.config = Some(PathBuf::from(value("--config")?)),
            "--seconds" => {
                let raw = value("--seconds")?;
                options.seconds = raw
                    .parse()
                    .map_err(|_| anyhow!("Invalid number of seconds: {}", raw))?;
            }
            "--seed" => {
                let raw = value("--seed")?;
                options.seed = raw.parse().map_err(|_| anyhow!("Invalid seed: {}", raw))?;
            }
            "--realtime" => options.realtime = true,
            "--watch" => options.watch = true,
            "--verbose" | "-v" => options.verbose = true,
            "--help" | "-h" => return Ok(None),
            other => return Err(anyhow!("Unknown option: {}", other)),
        }
    }

    if options.watch && options.song.is_none() {
        return Err(anyhow!("--watch requires --song"));
    }
    Ok(Some(options))
}

fn demo_abilities() -> Vec<Ability> {
    vec![
        Ability::new("Dash", Category::Mobility).with_instrument("Demo", Instrument::new("Lead")),
        Ability::new("Blaster", Category::Offense).with_instrument("Demo", Instrument::new("Drums")),
        Ability::new("Shield", Category::Defense).with_instrument("Demo", Instrument::new("Bass")),
    ]
}

fn load_song(path: Option<&PathBuf>) -> Result<Song> {
    let file = match path {
        Some(path) => SongFile::load(path)?,
        None => SongFile::from_yaml(DEMO_SONG)?,
    };
    let name = file.song.name.clone();
    file.into_song()
        .with_context(|| format!("Song '{}' cannot be played", name))
}

/// Random stream of scored actions with a slowly wandering intensity
struct Gameplay {
    rng: StdRng,
    /// Scales how busy the player is, 0.1 - 1.0
    intensity: f32,
    shield_up: bool,
}

impl Gameplay {
    fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            intensity: 0.5,
            shield_up: false,
        }
    }

    /// Chance that an event with `rate` per second fires this frame
    fn fires(&mut self, rate: f32, dt: f32) -> bool {
        let p = (rate * self.intensity * dt).clamp(0.0, 1.0);
        self.rng.gen_bool(f64::from(p))
    }

    fn play<S: alchemy::AudioSink>(&mut self, engine: &mut MusicEngine<S>, dt: f32) {
        self.intensity = (self.intensity + self.rng.gen_range(-0.4..=0.4) * dt).clamp(0.1, 1.0);

        let events = [
            (ScoredAction::DashPlain, 1.0),
            (ScoredAction::DashPastEnemy, 0.4),
            (ScoredAction::DashThroughEnemy, 0.15),
            (ScoredAction::ShotBullet, 3.0),
            (ScoredAction::ShotEnemy, 0.8),
            (ScoredAction::TripleKill, 0.05),
            (ScoredAction::ShieldBlockedEnemy, 0.3),
            (ScoredAction::ShieldSavedPlayer, 0.08),
        ];
        for (action, rate) in events {
            if self.fires(rate, dt) {
                debug!(%action, "scored");
                engine.record_action(action, dt);
            }
        }

        if self.fires(0.3, dt) {
            self.shield_up = !self.shield_up;
        }
        if self.shield_up {
            engine.record_action(ScoredAction::ShieldPresent, dt);
        }
    }
}

fn drain_watcher<S: alchemy::AudioSink>(watcher: &ConfigWatcher, engine: &mut MusicEngine<S>) {
    for event in watcher.recv_all() {
        match event {
            ConfigEvent::Reloaded(file) => match file.into_song() {
                Ok(song) => engine.load_song(Arc::new(song)),
                Err(e) => warn!(error = %e, "reloaded song cannot be played"),
            },
            ConfigEvent::Error(message) => warn!("{}", message),
            ConfigEvent::FileCreated(path) => debug!(path = ?path, "file created"),
            ConfigEvent::FileDeleted(path) => debug!(path = ?path, "file deleted"),
        }
    }
}

/// One simulated frame
fn step<S: alchemy::AudioSink>(
    engine: &mut MusicEngine<S>,
    gameplay: &mut Gameplay,
    watcher: Option<&ConfigWatcher>,
    frame: u64,
) {
    let dt = 1.0 / FRAME_RATE as f32;
    if let Some(watcher) = watcher {
        drain_watcher(watcher, engine);
    }
    gameplay.play(engine, dt);

    let elapsed = engine.section_clock().elapsed();
    engine.tick(dt);
    if engine.section_clock().elapsed() < elapsed {
        info!(
            section = engine.current_section(),
            energy = engine.routed_energy(),
            "section started"
        );
    }

    if frame % u64::from(FRAME_RATE * STATUS_INTERVAL) == 0 {
        info!("{}", engine.status());
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let Some(options) = parse_args(&args)? else {
        print_usage();
        return Ok(());
    };

    tracing_subscriber::fmt()
        .with_max_level(if options.verbose { Level::DEBUG } else { Level::INFO })
        .with_target(false)
        .init();

    let mut config = match &options.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    if options.song.is_none() && config.playback.background_instrument.is_none() {
        config.playback.background_instrument = Some("Pads".to_string());
    }

    let song = load_song(options.song.as_ref())?;
    let abilities = match &options.abilities {
        Some(path) => AbilitiesFile::load(path)?.into_abilities(),
        None => demo_abilities(),
    };

    let mut engine = MusicEngine::new(config);
    engine.load_song(Arc::new(song));
    for ability in abilities {
        info!(ability = %ability, "equipped");
        engine.equip(ability);
    }

    let watcher = match (&options.song, options.watch) {
        (Some(path), true) => {
            info!(path = ?path, "watching song file");
            Some(ConfigWatcher::new(path, None)?)
        }
        _ => None,
    };

    let mut gameplay = Gameplay::new(options.seed);
    let frames = (options.seconds.max(0.0) * FRAME_RATE as f32) as u64;

    if options.realtime {
        let mut interval = tokio::time::interval(Duration::from_secs_f32(1.0 / FRAME_RATE as f32));
        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        let mut frame = 0;
        while frame < frames {
            tokio::select! {
                _ = interval.tick() => {
                    frame += 1;
                    step(&mut engine, &mut gameplay, watcher.as_ref(), frame);
                }
                _ = &mut ctrl_c => {
                    info!("interrupted");
                    break;
                }
            }
        }
    } else {
        for frame in 1..=frames {
            step(&mut engine, &mut gameplay, watcher.as_ref(), frame);
        }
    }

    println!("{}", engine.status());
    Ok(())
}
