use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::warn;
use std::path::PathBuf;
use std::time::Duration;
use wbi_connectivity::api::DEFAULT_BASE_URL;
use wbi_connectivity::compare::{self, ComparisonSelection, MAX_COMPARED};
use wbi_connectivity::{Client, CountriesStore, Favorite, FavoritesStore, Indicator, Settings};
use wbi_connectivity::{stats, storage, view};

#[derive(Parser, Debug)]
#[command(
    name = "wbic",
    version,
    about = "Browse, compare & bookmark World Bank connectivity indicators"
)]
struct Cli {
    /// API base URL.
    #[arg(long, global = true, default_value = DEFAULT_BASE_URL)]
    base_url: String,
    /// Favorites file (default: <data dir>/wbi-connectivity/favorites.json).
    #[arg(long, global = true)]
    favorites: Option<PathBuf>,
    /// Abort requests taking longer than this many seconds (default: wait).
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List countries, optionally filtered by name and region.
    Countries(CountriesArgs),
    /// List the regions present in the catalog.
    Regions,
    /// Show a country's recent history for connectivity indicators.
    Stats(StatsArgs),
    /// Compare up to three countries on their latest value.
    Compare(CompareArgs),
    /// Manage favorite countries and their notes.
    Fav {
        #[command(subcommand)]
        action: FavCommand,
    },
}

#[derive(Args, Debug)]
struct CountriesArgs {
    /// Case-insensitive substring of the country name.
    #[arg(short, long, default_value = "")]
    search: String,
    /// Region substring, or "All".
    #[arg(short, long, default_value = view::ALL_REGIONS)]
    region: String,
    /// Maximum number of rows to print.
    #[arg(long, default_value_t = 100)]
    limit: usize,
}

#[derive(ValueEnum, Clone, Debug)]
enum OutFormat {
    Csv,
    Json,
}

#[derive(Args, Debug)]
struct StatsArgs {
    /// Country code (e.g., DEU)
    country: String,
    /// Indicator alias or code; repeatable (default: all connectivity indicators).
    #[arg(short, long = "indicator")]
    indicators: Vec<Indicator>,
    /// Number of most-recent years to fetch.
    #[arg(long)]
    points: Option<u32>,
    /// Save the fetched observations to a file.
    #[arg(long)]
    out: Option<PathBuf>,
    /// Output format (csv or json). If omitted, inferred from --out extension.
    #[arg(long, value_enum)]
    format: Option<OutFormat>,
    /// Print summary statistics per indicator.
    #[arg(long, default_value_t = false)]
    summary: bool,
}

#[derive(Args, Debug)]
struct CompareArgs {
    /// Country codes; only the first three are used.
    #[arg(required = true)]
    ids: Vec<String>,
    /// Indicator alias or code.
    #[arg(short, long, default_value = "internet")]
    indicator: Indicator,
}

#[derive(Subcommand, Debug)]
enum FavCommand {
    /// Print saved favorites.
    List,
    /// Bookmark a country.
    Add {
        id: String,
        #[arg(long, default_value = "")]
        notes: String,
    },
    /// Remove a bookmark.
    Remove { id: String },
    /// Replace the notes of a bookmark.
    Note { id: String, notes: String },
    /// Export favorites as CSV.
    Export { out: PathBuf },
}

fn fmt_opt(v: Option<f64>) -> String {
    match v {
        Some(x) if x.is_finite() => {
            // Format up to 2 decimals, then trim trailing zeros and trailing dot.
            let s = format!("{:.2}", x);
            s.trim_end_matches('0').trim_end_matches('.').to_string()
        }
        _ => "NA".to_string(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let settings = Settings {
        base_url: cli.base_url,
        timeout: cli.timeout_secs.map(Duration::from_secs),
        favorites_path: cli
            .favorites
            .unwrap_or_else(wbi_connectivity::config::default_favorites_path),
        ..Settings::default()
    };
    match cli.cmd {
        Command::Countries(args) => cmd_countries(&settings, args).await,
        Command::Regions => cmd_regions(&settings).await,
        Command::Stats(args) => cmd_stats(&settings, args).await,
        Command::Compare(args) => cmd_compare(&settings, args).await,
        Command::Fav { action } => cmd_fav(&settings, action).await,
    }
}

async fn loaded_store(settings: &Settings) -> Result<CountriesStore<Client>> {
    let client = Client::new(settings.client_config())?;
    let store = CountriesStore::new(client).with_series_points(settings.series_points);
    store.load_catalog().await.context("load country catalog")?;
    Ok(store)
}

async fn cmd_countries(settings: &Settings, args: CountriesArgs) -> Result<()> {
    let store = loaded_store(settings).await?;
    let catalog = store.catalog();
    let rows = view::filter_catalog(&catalog, &args.search, &args.region);
    for c in rows.iter().take(args.limit) {
        println!("{:<4} {:<40} {}", c.id, c.name, c.region.value.trim());
    }
    if rows.len() > args.limit {
        eprintln!("... {} more (raise --limit)", rows.len() - args.limit);
    }
    Ok(())
}

async fn cmd_regions(settings: &Settings) -> Result<()> {
    let store = loaded_store(settings).await?;
    for region in view::regions(&store.catalog()) {
        println!("{}", region);
    }
    Ok(())
}

async fn cmd_stats(settings: &Settings, args: StatsArgs) -> Result<()> {
    let mut settings = settings.clone();
    if let Some(points) = args.points {
        settings.series_points = points;
    }
    let store = loaded_store(&settings).await?;
    let country = store
        .country(&args.country)
        .with_context(|| format!("unknown country code: {}", args.country))?;

    let indicators = if args.indicators.is_empty() {
        Indicator::ALL.to_vec()
    } else {
        args.indicators
    };
    let codes: Vec<String> = indicators.iter().map(|i| i.code().to_string()).collect();
    store
        .load_country_stats(&country.id, &codes)
        .await
        .with_context(|| format!("load indicators for {}", country.id))?;
    let series = store.series();

    println!("{} ({}), {}", country.name, country.id, country.region.value.trim());
    for indicator in &indicators {
        let points = series
            .get(indicator.code())
            .map(|s| view::chart_points(s))
            .unwrap_or_default();
        println!("\n{}", indicator);
        if points.is_empty() {
            println!("  no data");
        }
        for p in &points {
            println!("  {}  {}", p.year, fmt_opt(Some(p.value)));
        }
    }

    if let Some(path) = args.out.as_ref() {
        let all: Vec<_> = series.values().flatten().cloned().collect();
        let fmt = match args.format {
            Some(OutFormat::Csv) => "csv",
            Some(OutFormat::Json) => "json",
            None => path.extension().and_then(|e| e.to_str()).unwrap_or("csv"),
        }
        .to_ascii_lowercase();
        match fmt.as_str() {
            "csv" => storage::save_series_csv(&all, path)?,
            "json" => storage::save_series_json(&all, path)?,
            other => bail!("unsupported format: {}", other),
        }
        eprintln!("Saved {} rows to {}", all.len(), path.display());
    }

    if args.summary {
        println!();
        for s in stats::summarize(&series) {
            let latest = s
                .latest
                .map(|p| format!("{}={}", p.year, fmt_opt(Some(p.value))))
                .unwrap_or_else(|| "NA".into());
            println!(
                "{}  count={} missing={}  min={} max={} mean={} median={} latest={}",
                s.indicator_id,
                s.count,
                s.missing,
                fmt_opt(s.min),
                fmt_opt(s.max),
                fmt_opt(s.mean),
                fmt_opt(s.median),
                latest
            );
        }
    }

    Ok(())
}

async fn cmd_compare(settings: &Settings, args: CompareArgs) -> Result<()> {
    let store = loaded_store(settings).await?;
    let mut selection = ComparisonSelection::new();
    for id in &args.ids {
        let Some(country) = store.country(id) else {
            bail!("unknown country code: {}", id);
        };
        if !selection.contains(&country.id) && !selection.toggle(&country.id) {
            warn!("ignoring {}: at most {} countries can be compared", id, MAX_COMPARED);
            eprintln!("ignoring {} (limit {})", id, MAX_COMPARED);
        }
    }

    let catalog = store.catalog();
    let bars = compare::compare(store.source(), &catalog, &selection, args.indicator)
        .await
        .context("fetch comparison values")?;
    println!("{}", args.indicator);
    for bar in bars {
        println!("  {:<40} {}", bar.name, fmt_opt(bar.value));
    }
    Ok(())
}

async fn cmd_fav(settings: &Settings, action: FavCommand) -> Result<()> {
    let path = &settings.favorites_path;
    let favorites = FavoritesStore::from_items(storage::load_favorites(path)?);

    let changed = match action {
        FavCommand::List => {
            if favorites.is_empty() {
                println!("no favorites yet");
            }
            for f in favorites.items() {
                println!("{:<4} {:<40} added {}", f.id, f.name, f.added_at.format("%Y-%m-%d"));
                if !f.notes.is_empty() {
                    println!("     {}", f.notes);
                }
            }
            false
        }
        FavCommand::Add { id, notes } => {
            let store = loaded_store(settings).await?;
            let country = store
                .country(&id)
                .with_context(|| format!("unknown country code: {}", id))?;
            let added = favorites
                .add(Favorite::new(country.id.clone(), country.name).with_notes(notes));
            if !added {
                eprintln!("{} is already a favorite", country.id);
            }
            added
        }
        FavCommand::Remove { id } => {
            let removed = favorites.remove(&id.to_ascii_uppercase());
            if !removed {
                eprintln!("{} is not a favorite", id);
            }
            removed
        }
        FavCommand::Note { id, notes } => {
            let id = id.to_ascii_uppercase();
            if !favorites.contains(&id) {
                bail!("{} is not a favorite", id);
            }
            favorites.update_notes(&id, &notes)
        }
        FavCommand::Export { out } => {
            storage::save_favorites_csv(&favorites.items(), &out)?;
            eprintln!("Saved {} favorites to {}", favorites.len(), out.display());
            false
        }
    };

    if changed {
        storage::save_favorites(&favorites.items(), path)?;
        eprintln!("Saved favorites to {}", path.display());
    }
    Ok(())
}
