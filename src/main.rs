//! Curadoria CLI - collaborative learning-material catalog

use clap::{Parser, Subcommand};
use curadoria::query::{self, SortField};
use curadoria::render::{self, Links};
use curadoria::schema::{self, Difficulty, Format, Language, LearningStyle, Pace, Subject, Token, UnknownToken};
use curadoria::{Catalog, Query};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "curadoria")]
#[command(about = "Collect, validate and search a catalog of learning materials", long_about = None)]
struct Cli {
    /// Catalog directory (defaults to current directory)
    #[arg(short, long, default_value = ".")]
    root: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate every fragment and regenerate the aggregate, skipping bad entries
    Collect {
        /// Fragment directory (overrides materials_dir)
        #[arg(short, long)]
        materials: Option<PathBuf>,

        /// Aggregate file to write (overrides output)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check every fragment and fail on the first problem
    Validate {
        /// Fragment directory (overrides materials_dir)
        #[arg(short, long)]
        materials: Option<PathBuf>,
    },

    /// Search the aggregate
    Search {
        /// Case-insensitive text matched against every field
        text: Option<String>,

        /// Require a subject (repeat to require several)
        #[arg(long = "subject", value_parser = token::<Subject>)]
        subjects: Vec<Subject>,

        /// Accept a format (repeat to accept several)
        #[arg(long = "format", value_parser = token::<Format>)]
        formats: Vec<Format>,

        #[arg(long = "learning-style", value_parser = token::<LearningStyle>)]
        learning_styles: Vec<LearningStyle>,

        #[arg(long = "language", value_parser = token::<Language>)]
        languages: Vec<Language>,

        #[arg(long = "difficulty", value_parser = token::<Difficulty>)]
        difficulties: Vec<Difficulty>,

        #[arg(long = "pace", value_parser = token::<Pace>)]
        paces: Vec<Pace>,

        /// Only free materials
        #[arg(long)]
        free: bool,

        /// Sort by field (e.g. minutes, title, difficulty)
        #[arg(long)]
        sort: Option<SortField>,

        /// Print results as JSON
        #[arg(long)]
        json: bool,

        /// Aggregate file to read (overrides output)
        #[arg(long)]
        aggregate: Option<PathBuf>,
    },

    /// Show the values present in the aggregate for each filter
    Facets {
        /// Aggregate file to read (overrides output)
        #[arg(long)]
        aggregate: Option<PathBuf>,

        /// Print facets as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the allowed tokens of every enumerated field
    Tokens,
}

fn token<T: Token>(s: &str) -> Result<T, UnknownToken> {
    T::from_token(s).ok_or_else(|| UnknownToken::new::<T>(s))
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        if let Some(hint) = e
            .downcast_ref::<curadoria::Error>()
            .and_then(|e| e.suggestion())
        {
            eprintln!("Hint: {}", hint);
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Collect { materials, output } => {
            collect(&cli.root, materials.as_deref(), output.as_deref())
        }
        Commands::Validate { materials } => validate(&cli.root, materials.as_deref()),
        Commands::Search {
            text,
            subjects,
            formats,
            learning_styles,
            languages,
            difficulties,
            paces,
            free,
            sort,
            json,
            aggregate,
        } => {
            let query = Query {
                text: text.filter(|t| !t.is_empty()),
                subjects: subjects.into_iter().collect(),
                formats: formats.into_iter().collect(),
                learning_styles: learning_styles.into_iter().collect(),
                languages: languages.into_iter().collect(),
                difficulties: difficulties.into_iter().collect(),
                paces: paces.into_iter().collect(),
                free_only: free,
                sort_by: sort,
            };
            search(&cli.root, &query, aggregate.as_deref(), json)
        }
        Commands::Facets { aggregate, json } => facets(&cli.root, aggregate.as_deref(), json),
        Commands::Tokens => {
            list_tokens();
            Ok(())
        }
    }
}

fn collect(
    root: &Path,
    materials: Option<&Path>,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let catalog = Catalog::open(root)?;
    let report = catalog.collect(materials, output)?;

    println!(
        "Collected {} material(s) from {} fragment(s)",
        report.stats.accepted, report.stats.files_read
    );
    if !report.skipped.is_empty() {
        println!("Skipped {}:", report.skipped.len());
        for error in &report.skipped {
            println!("  - {}", error);
        }
    }
    Ok(())
}

fn validate(root: &Path, materials: Option<&Path>) -> anyhow::Result<()> {
    let catalog = Catalog::open(root)?;
    let stats = catalog.validate(materials)?;
    println!(
        "All {} material(s) in {} fragment(s) are valid.",
        stats.accepted, stats.files_read
    );
    Ok(())
}

fn search(
    root: &Path,
    query: &Query,
    aggregate: Option<&Path>,
    json: bool,
) -> anyhow::Result<()> {
    let catalog = Catalog::open(root)?;
    let materials = catalog.load(aggregate)?;
    let result = query::execute(&materials, query);

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        let links = Links::from_config(&catalog.config);
        print!("{}", render::results(&result, &links));
    }
    Ok(())
}

fn facets(root: &Path, aggregate: Option<&Path>, json: bool) -> anyhow::Result<()> {
    let catalog = Catalog::open(root)?;
    let materials = catalog.load(aggregate)?;
    let facets = query::facets(&materials);

    if json {
        println!("{}", serde_json::to_string_pretty(&facets)?);
        return Ok(());
    }

    fn line<T: Token>(label: &str, values: &[T]) {
        let values: Vec<&str> = values.iter().map(|v| v.as_str()).collect();
        println!("{}: {}", label, values.join(", "));
    }

    println!("{} material(s), {} free", facets.total, facets.free);
    line("Subjects", &facets.subjects);
    line("Formats", &facets.formats);
    line("Learning styles", &facets.learning_styles);
    line("Languages", &facets.languages);
    line("Difficulties", &facets.difficulties);
    line("Paces", &facets.paces);
    Ok(())
}

fn list_tokens() {
    for enumeration in schema::enumerations() {
        println!("{} ({}):", enumeration.kind, enumeration.field);
        for token in &enumeration.tokens {
            println!("  {}", token);
        }
    }
    println!("sort fields:");
    for field in SortField::ALL {
        println!("  {}", field);
    }
}
