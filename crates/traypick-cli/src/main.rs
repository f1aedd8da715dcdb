//! traypick CLI — run product judgments from detection JSON on the command
//! line.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use traypick::{
    judge, Detection, JudgeConfig, JudgeInput, JudgeResponse, ProductCatalog,
};

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "traypick")]
#[command(about = "Judge vended products from object detections and a tray weight change")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Judge one request from a JSON input file.
    Judge {
        /// Path to a JSON file with `detections` and `delta_weight`.
        #[arg(long)]
        input: PathBuf,

        /// Path to write the response JSON (stdout when omitted).
        #[arg(long)]
        out: Option<PathBuf>,

        /// Path to a catalog JSON file (embedded catalog when omitted).
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Disable hand-proximity gating.
        #[arg(long)]
        no_hand_filter: bool,
    },

    /// Judge a synthetic request for a known product and count.
    Simulate {
        /// Catalog product id.
        #[arg(long)]
        product_id: u32,

        /// Unit count to simulate.
        #[arg(long, default_value = "1")]
        count: u32,

        /// Detection confidence to simulate.
        #[arg(long, default_value = "0.9")]
        confidence: f32,

        /// Path to a catalog JSON file (embedded catalog when omitted).
        #[arg(long)]
        catalog: Option<PathBuf>,
    },

    /// Print catalog statistics, optionally searching by unit weight.
    CatalogInfo {
        /// Path to a catalog JSON file (embedded catalog when omitted).
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Target unit weight in grams for a range search.
        #[arg(long)]
        weight: Option<f64>,

        /// Fractional tolerance for the --weight search.
        #[arg(long, default_value = "0.15")]
        tolerance: f64,
    },
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Judge {
            input,
            out,
            catalog,
            no_hand_filter,
        } => run_judge(&input, out.as_deref(), catalog.as_deref(), no_hand_filter),

        Commands::Simulate {
            product_id,
            count,
            confidence,
            catalog,
        } => run_simulate(product_id, count, confidence, catalog.as_deref()),

        Commands::CatalogInfo {
            catalog,
            weight,
            tolerance,
        } => run_catalog_info(catalog.as_deref(), weight, tolerance),
    }
}

fn load_catalog(path: Option<&Path>) -> CliResult<ProductCatalog> {
    match path {
        Some(path) => Ok(ProductCatalog::from_json_file(path)?),
        None => Ok(ProductCatalog::default()),
    }
}

// ── judge ──────────────────────────────────────────────────────────────

fn run_judge(
    input_path: &Path,
    out_path: Option<&Path>,
    catalog_path: Option<&Path>,
    no_hand_filter: bool,
) -> CliResult<()> {
    let catalog = load_catalog(catalog_path)?;

    let data = std::fs::read_to_string(input_path).map_err(|e| -> CliError {
        format!("failed to read {}: {}", input_path.display(), e).into()
    })?;
    let input: JudgeInput = serde_json::from_str(&data)?;
    let detections = input.validate()?;

    let mut config = JudgeConfig::default();
    config.use_hand_filter = input.use_hand_filter && !no_hand_filter;

    tracing::info!(
        "judging {} detections, delta {:.1} g",
        detections.len(),
        input.delta_weight,
    );
    let result = judge(&detections, input.delta_weight, &catalog, &config);
    let response = JudgeResponse::from(&result);

    let json = serde_json::to_string_pretty(&response)?;
    match out_path {
        Some(path) => {
            std::fs::write(path, &json)?;
            tracing::info!("response written to {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

// ── simulate ───────────────────────────────────────────────────────────

fn run_simulate(
    product_id: u32,
    count: u32,
    confidence: f32,
    catalog_path: Option<&Path>,
) -> CliResult<()> {
    let catalog = load_catalog(catalog_path)?;

    let product = catalog
        .by_id(product_id)
        .ok_or_else(|| -> CliError { format!("product {product_id} not in catalog").into() })?;
    if !product.has_known_weight() {
        return Err(format!("product `{}` has no usable unit weight", product.name).into());
    }

    let delta_weight = -(product.unit_weight_g * count as f64);
    let detection = Detection {
        bbox: [100.0, 100.0, 200.0, 200.0],
        confidence,
        class_id: product.id,
        class_name: product.name.clone(),
        camera: None,
    };

    tracing::info!(
        "simulating {} x{} -> delta {:.1} g",
        product.name,
        count,
        delta_weight,
    );
    let result = judge(
        &[detection],
        delta_weight,
        &catalog,
        &JudgeConfig::default(),
    );
    let response = JudgeResponse::from(&result);
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

// ── catalog-info ───────────────────────────────────────────────────────

fn run_catalog_info(
    catalog_path: Option<&Path>,
    weight: Option<f64>,
    tolerance: f64,
) -> CliResult<()> {
    let catalog = load_catalog(catalog_path)?;

    println!("traypick catalog");
    println!("  products:        {}", catalog.len());
    let weighted = catalog
        .all()
        .iter()
        .filter(|p| p.has_known_weight())
        .count();
    println!("  weight-matched:  {}", weighted);

    if let Some(first) = catalog.all().first() {
        println!(
            "  first:           {} (id {}, {:.0} g, {})",
            first.name, first.id, first.unit_weight_g, first.category.name(),
        );
    }
    if let Some(last) = catalog.all().last() {
        println!(
            "  last:            {} (id {}, {:.0} g, {})",
            last.name, last.id, last.unit_weight_g, last.category.name(),
        );
    }

    if let Some(target_g) = weight {
        let matches = catalog.search_by_weight(target_g, tolerance);
        println!(
            "  within {:.0}% of {:.1} g: {} product(s)",
            tolerance * 100.0,
            target_g,
            matches.len(),
        );
        for product in matches {
            println!(
                "    {} (id {}, {:.0} g, {})",
                product.name,
                product.id,
                product.unit_weight_g,
                product.category.name(),
            );
        }
    }

    Ok(())
}
