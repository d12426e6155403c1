use clap::Parser;
use mazerun::game_logic::errors::{MazeError, MazeResult};
use mazerun::maze::{ConstructionSettings, MaterialGroup, MazeBlueprint, plan_maze};
use rand::SeedableRng;
use rand_pcg::Pcg64;

#[derive(Parser, Clone)]
#[command(name = "mazegen")]
#[command(about = "Carve a maze layout and print it with its geometry statistics")]
struct Args {
    /// Requested row count (rounded up to odd, at least 3)
    #[arg(long, default_value = "11")]
    rows: usize,

    /// Requested column count (rounded up to odd, at least 3)
    #[arg(long, default_value = "11")]
    cols: usize,

    /// Random seed for reproducible generation
    #[arg(long)]
    seed: Option<u64>,

    /// World distance between adjacent cells
    #[arg(long, default_value = "3.75")]
    pitch: f32,

    /// Wall height in world units
    #[arg(long, default_value = "3.5")]
    height: f32,

    /// Print vertex, quad and channel counts below the layout
    #[arg(long)]
    stats: bool,
}

fn validate_args(args: &Args) -> MazeResult<()> {
    if args.rows == 0 || args.cols == 0 {
        return Err(MazeError::InvalidConfig {
            reason: "rows and cols must be greater than 0".to_string(),
        });
    }
    let positive = |value: f32| value.is_finite() && value > 0.0;
    if !positive(args.pitch) || !positive(args.height) {
        return Err(MazeError::InvalidConfig {
            reason: format!(
                "pitch and height must be positive finite numbers, got {} and {}",
                args.pitch, args.height
            ),
        });
    }
    Ok(())
}

fn main() -> MazeResult<()> {
    let args = Args::parse();
    validate_args(&args)?;

    let seed = args.seed.unwrap_or_else(rand::random);
    let mut rng = Pcg64::seed_from_u64(seed);
    let settings = ConstructionSettings {
        cell_pitch: args.pitch,
        wall_height: args.height,
        place_start_trigger: false,
    };

    let blueprint = plan_maze(args.rows, args.cols, &settings, &mut rng);
    print!("{}", blueprint.layout);
    if args.stats {
        print_stats(&blueprint, seed);
    }
    Ok(())
}

fn print_stats(blueprint: &MazeBlueprint, seed: u64) {
    let layout = &blueprint.layout;
    let geometry = &blueprint.geometry;

    println!("\nMaze summary:");
    println!("  Seed: {seed}");
    println!("  Size: {}x{}", layout.rows(), layout.cols());
    println!(
        "  Rooms: {}, open cells: {}, passages: {}",
        layout.room_count(),
        layout.open_count(),
        layout.passage_count()
    );
    println!("  Connected: {}", layout.is_connected());
    println!("  Start: {}, goal: {}", blueprint.start, blueprint.goal);
    println!(
        "  Geometry: {} vertices, {} triangles",
        geometry.positions.len(),
        geometry.triangles().len()
    );
    for group in MaterialGroup::ALL {
        println!("    {group:?}: {} quads", geometry.quad_count(group));
    }
}
