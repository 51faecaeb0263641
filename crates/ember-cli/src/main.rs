//! Ember CLI - headless tools for Ember particle emitters

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use ember_core::{Quat, Vec3};
use ember_particles::{BehaviourKind, BehaviourRegistry, EmitterDescriptor, ParticleSystem};
use ember_runtime::GameClock;

#[derive(Parser)]
#[command(name = "ember")]
#[command(about = "Headless tools for Ember particle emitters", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate an emitter file: load it, list behaviours, round-trip check
    Validate {
        /// Path to a .emit file
        file: String,
    },

    /// Run a headless simulation of an emitter and print per-tick stats
    Play {
        /// Path to a .emit file
        file: String,

        /// Number of ticks to simulate
        #[arg(long, default_value_t = 120)]
        ticks: u32,

        /// Simulated seconds per tick
        #[arg(long, default_value_t = 1.0 / 60.0)]
        dt: f32,

        /// Print per-tick emitter/particle counts
        #[arg(long)]
        stats: bool,

        /// Pace the simulation against the wall clock instead of
        /// free-running
        #[arg(long)]
        realtime: bool,
    },

    /// List every registered behaviour type
    Behaviours,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { file } => validate(&file),
        Commands::Play {
            file,
            ticks,
            dt,
            stats,
            realtime,
        } => play(&file, ticks, dt, stats, realtime),
        Commands::Behaviours => {
            list_behaviours();
            Ok(())
        }
    }
}

fn validate(file: &str) -> Result<()> {
    let registry = BehaviourRegistry::with_builtins();
    let descriptor = EmitterDescriptor::load_from_file(file, &registry)
        .with_context(|| format!("failed to load '{file}'"))?;

    println!("Name:               {}", descriptor.name());
    println!("Max particles:      {}", descriptor.max_particles());
    println!("Owns children:      {}", descriptor.owns_child_emitters());
    println!("Emission:           {}", descriptor.emission_behaviours().len());
    println!("Generators:         {}", descriptor.generators().len());
    println!("Updates:            {}", descriptor.updaters().len());
    println!("Renderers:          {}", descriptor.renderers().len());
    println!("Lifetime:           {}", descriptor.lifetime_behaviours().len());

    // Serialization must round-trip losslessly
    let doc = descriptor.to_json();
    let reloaded = EmitterDescriptor::from_json(&doc, &registry)?;
    if reloaded.to_json() != doc {
        bail!("round-trip mismatch: save/load does not preserve '{file}'");
    }

    println!("OK");
    Ok(())
}

fn play(file: &str, ticks: u32, dt: f32, stats: bool, realtime: bool) -> Result<()> {
    let mut system = ParticleSystem::new();
    system.set_show_stats(stats);

    let id = system.start_emitter(file, Vec3::ZERO, Quat::IDENTITY);
    if !id.is_valid() {
        bail!("failed to start emitter from '{file}'");
    }

    let mut clock = GameClock::with_fixed_timestep(1.0 / dt as f64);
    let mut simulated = 0;
    while simulated < ticks {
        if realtime {
            // Consume wall-clock time in fixed steps
            clock.tick();
            if !clock.should_fixed_update() {
                std::thread::sleep(std::time::Duration::from_millis(1));
                continue;
            }
            clock.consume_fixed_step();
        }

        system.tick(dt);
        simulated += 1;
        if system.active_count() == 0 {
            println!("[ember] All emitters finished after {simulated} tick(s)");
            break;
        }
    }

    println!(
        "[ember] Simulated {simulated} tick(s): {} emitter(s), {} particle(s), {} draw point(s)",
        system.active_count(),
        system.total_alive_particles(),
        system.draw_list().points.len()
    );
    Ok(())
}

fn list_behaviours() {
    let registry = BehaviourRegistry::with_builtins();
    let kinds = [
        ("Emission", BehaviourKind::Emission),
        ("Generator", BehaviourKind::Generator),
        ("Update", BehaviourKind::Update),
        ("Render", BehaviourKind::Render),
        ("Lifetime", BehaviourKind::Lifetime),
    ];
    for (label, kind) in kinds {
        println!("{label}:");
        for name in registry.names(kind) {
            println!("  {name}");
        }
    }
}
