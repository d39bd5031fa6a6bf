use anyhow::Context;
use clap::{Parser, Subcommand};
use flashgrid_assets::TextureStore;
use flashgrid_common::{Movement, Settings};
use flashgrid_input::{Control, InputState};
use flashgrid_render::{FrameComposer, FrameEvent, RecordingBackend, SceneState};
use flashgrid_world::{OccupancyGrid, cube_counts, generate_cubes};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "flashgrid-cli", about = "Headless tool for flashgrid layouts and frames")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// YAML settings file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Layout file overriding the built-in maze
    #[arg(long, global = true)]
    layout: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Print the effective settings as YAML
    Config,
    /// Inspect a layout: cube counts and an ASCII map
    Grid {
        /// Skip the ASCII map
        #[arg(long)]
        counts_only: bool,
    },
    /// Decode the configured textures and report their shape
    Textures,
    /// Run frames through the composer with a recording backend
    Simulate {
        /// Number of frames to run
        #[arg(short, long, default_value = "60")]
        frames: u64,
        /// Seconds per frame
        #[arg(long, default_value = "0.016")]
        dt: f32,
        /// Hold the forward key for the whole run
        #[arg(long)]
        walk: bool,
        /// Horizontal mouse motion per frame, in pixels
        #[arg(long, default_value = "0")]
        turn: f32,
        /// Press the flashlight key on this frame
        #[arg(long)]
        flashlight_at: Option<u64>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .init();

    let mut settings =
        Settings::load_or_default(cli.config.as_deref()).context("loading settings")?;
    if let Some(layout) = cli.layout {
        settings.world.layout = Some(layout);
    }
    settings.validate()?;

    match cli.command {
        Commands::Info => {
            println!("flashgrid-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("render: {}", flashgrid_render::crate_info());
            println!(
                "layout: {}",
                settings
                    .world
                    .layout
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "built-in".into())
            );
        }
        Commands::Config => {
            print!("{}", settings.to_yaml()?);
        }
        Commands::Grid { counts_only } => {
            let grid = load_grid(&settings)?;
            let (ground, walls) = cube_counts(&grid);
            println!(
                "{}x{} grid: {} wall cells, {} ground cubes, {} wall cubes, {} total",
                grid.width(),
                grid.width(),
                grid.wall_count(),
                ground,
                walls,
                ground + walls
            );
            if !counts_only {
                print!("{grid}");
            }
        }
        Commands::Textures => {
            let mut store = TextureStore::new();
            let materials = store.load_materials(&settings.textures);
            let slots = [
                ("ground diffuse", &settings.textures.ground.diffuse, materials.ground.diffuse),
                ("ground specular", &settings.textures.ground.specular, materials.ground.specular),
                ("wall diffuse", &settings.textures.wall.diffuse, materials.wall.diffuse),
                ("wall specular", &settings.textures.wall.specular, materials.wall.specular),
            ];
            for (slot, path, handle) in slots {
                match store.get(handle) {
                    Some(image) => println!(
                        "{slot}: {} {}x{} {:?}, {} mip levels",
                        path.display(),
                        image.width,
                        image.height,
                        image.format,
                        image.mip_level_count()
                    ),
                    None => println!("{slot}: {} unavailable (placeholder)", path.display()),
                }
            }
        }
        Commands::Simulate {
            frames,
            dt,
            walk,
            turn,
            flashlight_at,
        } => {
            tracing::debug!("simulating {frames} frames at dt={dt}");
            let grid = load_grid(&settings)?;
            let composer = FrameComposer::from_settings(
                generate_cubes(&grid, settings.world.cell_size),
                &settings,
            );
            let mut scene = SceneState::from_settings(&settings);
            let mut input = InputState::new();
            let mut backend = RecordingBackend::new();
            let aspect = settings.window.aspect_ratio();

            if walk {
                input.press(Control::Move(Movement::Forward));
            }

            let mut last_stats = None;
            for frame in 0..frames {
                for event in scene.frame.advance(dt) {
                    match event {
                        FrameEvent::SuspenseCue { at } => {
                            println!("frame {frame}: suspense cue at {at:.2}s")
                        }
                        FrameEvent::CheatAutoEnabled { at } => {
                            println!("frame {frame}: cheat mode forced on at {at:.2}s")
                        }
                    }
                }

                if flashlight_at == Some(frame) {
                    input.press(Control::ToggleFlashlight);
                } else {
                    input.release(Control::ToggleFlashlight);
                }
                if turn != 0.0 {
                    input.mouse_motion(turn, 0.0);
                }

                scene.apply_input(&input.drain());
                backend.clear();
                last_stats = Some(composer.compose(&scene, aspect, &mut backend));
            }

            let camera = &scene.camera;
            let p = camera.position();
            println!(
                "ran {frames} frames ({:.2}s): camera at ({:.2}, {:.2}, {:.2}), yaw {:.1}, pitch {:.1}",
                scene.frame.total_time(),
                p.x,
                p.y,
                p.z,
                camera.yaw(),
                camera.pitch()
            );
            if let Some(stats) = last_stats {
                println!("last frame stats: {stats:?}");
                print!("{}", backend.summary());
            }
        }
    }

    Ok(())
}

fn load_grid(settings: &Settings) -> anyhow::Result<OccupancyGrid> {
    OccupancyGrid::load_or_default(settings.world.layout.as_deref()).context("loading layout")
}
