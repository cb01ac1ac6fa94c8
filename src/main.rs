mod color;
mod data;
mod state;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};

use color::{badge_color, category_palette, Rgb};
use data::filter::{ColorMatch, DurationBucket, SortKey};
use data::model::{Catalog, Difficulty};
use state::SessionState;

/// Browse and filter a catalog of crochet video tutorials.
#[derive(Parser)]
#[command(name = "crochet-finder", version, about)]
struct Args {
    /// Catalog file (.csv, .json, or .parquet)
    catalog: PathBuf,

    /// Case-insensitive search over titles and transcripts
    #[arg(long)]
    search: Option<String>,

    /// Difficulty level (easy, medium, hard, unspecified)
    #[arg(long)]
    difficulty: Option<Difficulty>,

    /// Category tag, matched as a substring
    #[arg(long)]
    category: Option<String>,

    /// Duration bucket
    #[arg(long, value_enum, default_value = "all")]
    duration: DurationArg,

    /// Target color as #rrggbb; results are ranked nearest-first
    #[arg(long)]
    color: Option<String>,

    /// Maximum color distance for a match (with --color)
    #[arg(long, default_value_t = 120.0)]
    tolerance: f64,

    /// Result order when no color target is given
    #[arg(long, value_enum, default_value = "relevance")]
    sort: SortArg,

    /// Show at most this many results
    #[arg(long)]
    limit: Option<usize>,

    /// Print the category legend and exit
    #[arg(long)]
    categories: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum DurationArg {
    All,
    /// At most 15 minutes
    Quick,
    /// More than 15, at most 45
    Medium,
    /// More than 45
    Long,
}

impl From<DurationArg> for DurationBucket {
    fn from(arg: DurationArg) -> Self {
        match arg {
            DurationArg::All => DurationBucket::All,
            DurationArg::Quick => DurationBucket::Quick,
            DurationArg::Medium => DurationBucket::Medium,
            DurationArg::Long => DurationBucket::Long,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum SortArg {
    /// Catalog order
    Relevance,
    /// Shortest first
    DurationAsc,
    /// Longest first
    DurationDesc,
}

impl From<SortArg> for SortKey {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Relevance => SortKey::CatalogOrder,
            SortArg::DurationAsc => SortKey::DurationAsc,
            SortArg::DurationDesc => SortKey::DurationDesc,
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let color_match = args
        .color
        .as_deref()
        .map(|s| {
            let target = Rgb::parse_hex(s)
                .with_context(|| format!("'{s}' is not a #rrggbb color"))?;
            Ok::<_, anyhow::Error>(ColorMatch {
                target,
                tolerance: args.tolerance,
            })
        })
        .transpose()?;

    let mut session = SessionState::default();
    if session.open(&args.catalog).is_err() {
        // The status message carries the load failure detail.
        let reason = session
            .status_message
            .clone()
            .unwrap_or_else(|| "unknown load failure".to_string());
        bail!("could not load {}: {reason}", args.catalog.display());
    }

    if args.categories {
        print_category_legend(session.catalog().expect("catalog loaded"));
        return Ok(());
    }

    session.set_search(args.search);
    session.set_difficulty(args.difficulty);
    if let Some(tag) = args.category {
        session.select_category(tag);
    }
    session.set_duration(args.duration.into());
    session.set_sort(args.sort.into());
    session.set_color_match(color_match);

    print_results(&session, args.limit);
    Ok(())
}

fn print_category_legend(catalog: &Catalog) {
    let chips = category_palette(catalog.categories.len());
    println!("{} categories:", catalog.categories.len());
    for (name, chip) in catalog.categories.iter().zip(chips) {
        println!("  {chip}  {name}");
    }
}

fn print_results(session: &SessionState, limit: Option<usize>) {
    let catalog = session.catalog().expect("catalog loaded");
    let counts = catalog.difficulty_counts();
    println!(
        "{} of {} videos matched (easy {}, medium {}, hard {}, unspecified {})",
        session.visible.len(),
        catalog.len(),
        counts.easy,
        counts.medium,
        counts.hard,
        counts.unspecified
    );

    let shown = limit.unwrap_or(session.visible.len());
    for hit in session.visible.iter().take(shown) {
        let rec = &catalog.records[hit.index];
        println!();
        println!("  {}", rec.title);
        println!("    channel:    {}", rec.channel);
        println!("    thumbnail:  {}", rec.thumbnail_url);
        println!(
            "    difficulty: {} ({})",
            rec.difficulty,
            badge_color(rec.difficulty)
        );
        println!("    duration:   {} min", rec.duration);
        if !rec.category.is_empty() {
            println!("    category:   {}", rec.category);
        }
        match hit.color_distance {
            Some(d) => println!("    color:      {} (distance {d:.2})", rec.dominant_rgb),
            None => println!("    color:      {}", rec.dominant_rgb),
        }
        println!("    watch:      {}", rec.url);
    }
}
