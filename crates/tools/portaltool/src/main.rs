use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use portal::glam::IVec3;
use portal::{
    AgentId, BlockState, CooldownStore, IgnitionRequest, ItemStack, PortalActivator, PortalAxis,
    PortalConfig, PortalEngine, VoxelWorld,
};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Vertical bounds used when a world file does not exist yet
const NEW_WORLD_MIN_Y: i32 = -64;
const NEW_WORLD_MAX_Y: i32 = 320;

#[derive(Parser)]
#[command(name = "portaltool")]
#[command(about = "Portal frame inspection and activation tool", long_about = None)]
struct Cli {
    /// Portal config file (TOML). Defaults are used when omitted
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a troubleshooting report for the block at a position
    #[command(allow_negative_numbers = true)]
    Inspect {
        /// World snapshot (JSON)
        #[arg(short, long)]
        world: PathBuf,

        /// Activate the frame if it is valid, skipping item checks
        #[arg(long)]
        ignite: bool,

        x: i32,
        y: i32,
        z: i32,
    },

    /// Use an item on a block as a player would
    #[command(allow_negative_numbers = true)]
    Ignite {
        /// World snapshot (JSON)
        #[arg(short, long)]
        world: PathBuf,

        /// Item identifier, e.g. minecraft:flint_and_steel
        #[arg(short, long)]
        item: String,

        /// Damage taken and maximum, as DAMAGE/MAX
        #[arg(long, value_parser = parse_durability)]
        durability: Option<(u32, u32)>,

        /// Stack size
        #[arg(long, default_value_t = 1)]
        count: u32,

        /// Do not consume the item
        #[arg(long)]
        creative: bool,

        x: i32,
        y: i32,
        z: i32,
    },

    /// Remove portal markers around a position
    #[command(allow_negative_numbers = true)]
    Demolish {
        /// World snapshot (JSON)
        #[arg(short, long)]
        world: PathBuf,

        /// Half-extent of the cleared cube (defaults to the configured radius)
        #[arg(short, long)]
        radius: Option<i32>,

        x: i32,
        y: i32,
        z: i32,
    },

    /// Place a rectangular frame into a world, creating the world if needed
    #[command(allow_negative_numbers = true)]
    Build {
        /// World snapshot (JSON)
        #[arg(short, long)]
        world: PathBuf,

        /// Frame block identifier
        #[arg(short, long, default_value = "minecraft:crying_obsidian")]
        block: String,

        #[arg(short, long, value_enum, default_value_t = AxisArg::X)]
        axis: AxisArg,

        /// Outer width
        #[arg(long, default_value_t = 4)]
        width: i32,

        /// Outer height
        #[arg(long, default_value_t = 5)]
        height: i32,

        x: i32,
        y: i32,
        z: i32,
    },

    /// Show the effective configuration or write the defaults to a file
    Config {
        /// Write the default config as TOML to this path
        #[arg(long)]
        write: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum AxisArg {
    X,
    Z,
}

impl From<AxisArg> for PortalAxis {
    fn from(axis: AxisArg) -> Self {
        match axis {
            AxisArg::X => PortalAxis::X,
            AxisArg::Z => PortalAxis::Z,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => PortalConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => PortalConfig::default(),
    };
    let engine = PortalEngine::from_config(config)?;

    match cli.command {
        Commands::Inspect {
            world,
            ignite,
            x,
            y,
            z,
        } => inspect(&engine, &world, IVec3::new(x, y, z), ignite),
        Commands::Ignite {
            world,
            item,
            durability,
            count,
            creative,
            x,
            y,
            z,
        } => {
            let stack = match durability {
                Some((damage, max)) => ItemStack {
                    durability: Some(portal::Durability { damage, max }),
                    ..ItemStack::new(item, count)
                },
                None => ItemStack::new(item, count),
            };
            ignite(&engine, &world, IVec3::new(x, y, z), stack, creative)
        }
        Commands::Demolish {
            world,
            radius,
            x,
            y,
            z,
        } => demolish(&engine, &world, IVec3::new(x, y, z), radius),
        Commands::Build {
            world,
            block,
            axis,
            width,
            height,
            x,
            y,
            z,
        } => build(&world, &block, axis.into(), width, height, IVec3::new(x, y, z)),
        Commands::Config { write } => show_config(&engine, write.as_deref()),
    }
}

fn parse_durability(value: &str) -> std::result::Result<(u32, u32), String> {
    let (damage, max) = value
        .split_once('/')
        .ok_or_else(|| format!("expected DAMAGE/MAX, got '{}'", value))?;
    let damage = damage.trim().parse().map_err(|e| format!("bad damage: {}", e))?;
    let max = max.trim().parse().map_err(|e| format!("bad maximum: {}", e))?;
    if max == 0 {
        return Err("maximum durability must be positive".into());
    }
    Ok((damage, max))
}

fn load_world(path: &Path) -> Result<VoxelWorld> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read world {}", path.display()))?;
    VoxelWorld::from_json(&json).with_context(|| format!("Invalid world file {}", path.display()))
}

fn save_world(path: &Path, world: &VoxelWorld) -> Result<()> {
    std::fs::write(path, world.to_json()?)
        .with_context(|| format!("Failed to write world {}", path.display()))?;
    tracing::info!("Wrote {} blocks to {}", world.len(), path.display());
    Ok(())
}

fn inspect(engine: &PortalEngine, path: &Path, pos: IVec3, ignite: bool) -> Result<()> {
    let mut world = load_world(path)?;
    let report = engine.inspect(&world, pos);

    if matches!(report.state, Ok(BlockState::Air)) {
        print!("{}", engine.config_summary());
        return Ok(());
    }
    print!("{}", report);

    if ignite {
        let Some(geometry) = report.geometry else {
            bail!("No valid frame at {} to ignite", pos);
        };
        let placed = engine.activator().activate(&mut world, &geometry)?;
        println!("Placed {} portal blocks", placed);
        save_world(path, &world)?;
    }
    Ok(())
}

fn ignite(
    engine: &PortalEngine,
    path: &Path,
    pos: IVec3,
    mut item: ItemStack,
    creative: bool,
) -> Result<()> {
    let mut world = load_world(path)?;
    let mut cooldowns = CooldownStore::new();
    let messages = &engine.config().messages;

    let request = IgnitionRequest::new(pos, AgentId(0), &mut item).creative(creative);
    match engine.ignite(&mut world, &mut cooldowns, request) {
        Ok(ignition) => {
            println!("{}", ignition.message_key(messages));
            println!("{}", ignition.geometry);
            println!("Placed {} portal blocks", ignition.placed);
            match item.durability {
                Some(d) if !item.is_empty() => {
                    println!("Item durability: {}/{}", d.remaining(), d.max)
                }
                _ => println!("Items left: {}", item.count),
            }
            save_world(path, &world)
        }
        Err(e) => bail!("{} ({})", e.message_key(messages), e),
    }
}

fn demolish(engine: &PortalEngine, path: &Path, pos: IVec3, radius: Option<i32>) -> Result<()> {
    let mut world = load_world(path)?;
    let removed = match radius {
        Some(radius) => PortalActivator::demolish_around(&mut world, pos, radius)?,
        None => engine.activator().demolish(&mut world, pos)?,
    };
    println!("Removed {} portal blocks", removed);
    if removed > 0 {
        save_world(path, &world)?;
    }
    Ok(())
}

fn build(
    path: &Path,
    block: &str,
    axis: PortalAxis,
    width: i32,
    height: i32,
    anchor: IVec3,
) -> Result<()> {
    if width < 1 || height < 1 {
        bail!("Frame size must be positive, got {}x{}", width, height);
    }

    let mut world = if path.exists() {
        load_world(path)?
    } else {
        VoxelWorld::new(NEW_WORLD_MIN_Y, NEW_WORLD_MAX_Y)
    };

    let state = BlockState::solid(block);
    let lateral = axis.lateral();
    let corner = |across: i32, up: i32| lateral.step(anchor, across) + IVec3::Y * up;
    world.fill(corner(0, 0), corner(width - 1, 0), state.clone());
    world.fill(corner(0, height - 1), corner(width - 1, height - 1), state.clone());
    world.fill(corner(0, 0), corner(0, height - 1), state.clone());
    world.fill(corner(width - 1, 0), corner(width - 1, height - 1), state);

    println!(
        "Built {}x{} {} frame on axis {} at {}",
        width, height, block, axis, anchor
    );
    save_world(path, &world)
}

fn show_config(engine: &PortalEngine, write: Option<&Path>) -> Result<()> {
    match write {
        Some(path) => {
            PortalConfig::default().save(path)?;
            println!("Wrote default config to {}", path.display());
        }
        None => {
            print!("{}", engine.config_summary());
            println!("Demolish radius: {}", engine.activator().radius());
        }
    }
    Ok(())
}
