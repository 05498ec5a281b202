use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use sunburst::text::EstimatingMeasurer;
use sunburst::{ChartData, ChartLayout, ChartState, data, svg};

#[derive(Parser, Debug)]
#[command(name = "sunburst", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Render the chart as a standalone SVG document.
    Render {
        /// Chart data file (defaults to the bundled service list)
        #[arg(short, long)]
        data: Option<PathBuf>,

        /// Where to write the SVG (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Render with this item hovered, by name or by position in the data file
        #[arg(short, long)]
        active: Option<String>,

        /// Seed for the length jitter and colour picks (overrides the data file)
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Validate a data file and print the derived wedges.
    Check {
        #[arg(short, long)]
        data: PathBuf,
    },
    /// Write the default data file.
    Init {
        #[arg(default_value = "chart.toml")]
        path: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            data,
            output,
            active,
            seed,
        } => render(data.as_deref(), output.as_deref(), active.as_deref(), seed),
        Commands::Check { data } => check(&data),
        Commands::Init { path } => {
            let existed = path.exists();
            let path = data::write_default(&path)?;
            if existed {
                println!("{} already exists, left untouched", path.display());
            } else {
                println!("Wrote {}", path.display());
            }
            Ok(())
        }
    }
}

fn resolve_active(layout: &ChartLayout, query: &str) -> anyhow::Result<usize> {
    let found = match query.parse::<usize>() {
        Ok(index) => layout.wedges.iter().position(|w| w.index == index),
        Err(_) => layout.position_of(query),
    };
    found.with_context(|| format!("No wedge matches '{query}'"))
}

fn render(
    data_path: Option<&Path>,
    output: Option<&Path>,
    active: Option<&str>,
    seed: Option<u64>,
) -> anyhow::Result<()> {
    let mut chart_data = match data_path {
        Some(path) => data::load_or_fallback(path),
        None => ChartData::bundled()?,
    };
    if seed.is_some() {
        chart_data.chart.seed = seed;
    }

    let layout = ChartLayout::from_data(&chart_data, &EstimatingMeasurer)?;
    let mut state = ChartState::new(layout, &chart_data.chart, &chart_data.style);

    if let Some(query) = active {
        let pos = resolve_active(state.layout(), query)?;
        state.handle_pointer_enter(pos, std::time::Duration::ZERO);
        state.settle();
        if let Some(content) = state.panel().content() {
            log::info!("{} ({} side): {}", content.title, content.side, content.body);
        }
    }

    let document = svg::render(&state.frame(), &chart_data.style);
    match output {
        Some(path) => {
            fs_err::write(path, document)?;
            log::info!("Wrote {}", path.display());
        }
        None => print!("{document}"),
    }
    Ok(())
}

fn check(path: &Path) -> anyhow::Result<()> {
    let chart_data = data::load(path)?;
    chart_data.chart.validate()?;
    chart_data.style.validate()?;
    let layout = ChartLayout::from_data(&chart_data, &EstimatingMeasurer)
        .with_context(|| format!("Cannot lay out {}", path.display()))?;

    println!(
        "{} items, {} wedges, inner radius {}, hover radius {:.2}, shrunk radius {:.2}",
        chart_data.items.len(),
        layout.len(),
        layout.inner_radius,
        layout.hover_radius,
        layout.shrunk_radius
    );
    for (wedge, label) in layout.wedges.iter().zip(&layout.labels) {
        println!(
            "{:>3}  {:>7.2}..{:<7.2} factor {:.3}  radius {:>7.2}  {}  {} line(s)  {}",
            wedge.index,
            wedge.start_angle,
            wedge.end_angle,
            wedge.length_factor,
            wedge.outer_radius,
            wedge.color,
            label.lines.len(),
            wedge.item.name
        );
    }
    if layout.palette_exhausted {
        println!("warning: no colours configured, every wedge uses the fallback colour");
    }
    Ok(())
}
