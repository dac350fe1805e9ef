//! odpkit CLI
//!
//! Command-line front end for:
//! - browsing the ontology design pattern catalog (`categories`, `patterns`)
//! - merging a pattern fragment into a target ontology (`instantiate`)
//! - rendering an ontology as a schema diagram graph (`graph`)

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use odpkit_ingest_rdfowl::{load_ontology_file, write_ntriples};
use odpkit_owl::Axiom;
use odpkit_patterns::{
    CatalogSource, Category, OdpkitConfig, OntologyNamingContext, PatternInstantiator, PatternLibrary,
    TargetContext,
};
use odpkit_sdont::{render_dot, DeclaredClassExtractor, OntologyParser};

mod resolve;

#[derive(Parser)]
#[command(name = "odpkit")]
#[command(author, version, about = "odpkit: ontology design pattern tooling")]
struct Cli {
    /// JSON configuration file (default: ./odpkit.json when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List pattern categories, `Any` first.
    Categories {
        /// Catalog file overriding the configured one
        #[arg(long)]
        catalog: Option<PathBuf>,
    },

    /// List catalogued patterns.
    Patterns {
        /// Category label or IRI (default: Any)
        #[arg(long)]
        category: Option<String>,

        /// Catalog file overriding the configured one
        #[arg(long)]
        catalog: Option<PathBuf>,
    },

    /// Instantiate a pattern into a target ontology.
    ///
    /// Prints the instantiation axioms and the module annotations. With
    /// `--out`, the merged target is written as N-Triples.
    Instantiate {
        /// Pattern fragment: an RDF file, or the IRI of a catalogued pattern
        #[arg(long)]
        pattern: String,

        /// Pattern label used for the module IRI (default: the catalog or
        /// document label)
        #[arg(long)]
        label: Option<String>,

        /// Target ontology file
        #[arg(long)]
        target: PathBuf,

        /// Write the merged target here (N-Triples)
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Separator between target IRI and short names
        #[arg(long)]
        separator: Option<String>,

        /// Keep the pattern's own namespace instead of moving entities into
        /// the target
        #[arg(long)]
        pattern_namespace: bool,

        /// Catalog file overriding the configured one
        #[arg(long)]
        catalog: Option<PathBuf>,
    },

    /// Classify an ontology's subclass axioms into a schema diagram graph.
    Graph {
        /// Ontology file
        input: PathBuf,

        #[arg(long, value_enum, default_value_t = GraphFormat::Dot)]
        format: GraphFormat,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum GraphFormat {
    Dot,
    Json,
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = OdpkitConfig::load(cli.config.as_deref()).context("failed to load configuration")?;

    match cli.command {
        Commands::Categories { catalog } => cmd_categories(&library(&config, catalog)),
        Commands::Patterns { category, catalog } => {
            cmd_patterns(&library(&config, catalog), category.as_deref())
        }
        Commands::Instantiate {
            pattern,
            label,
            target,
            out,
            separator,
            pattern_namespace,
            catalog,
        } => {
            let mut config = config;
            if let Some(sep) = separator {
                config.entity_separator = sep;
            }
            if pattern_namespace {
                config.instantiation.use_target_namespace = false;
            }
            config.validate()?;
            let lib = library(&config, catalog);
            cmd_instantiate(&config, &lib, &pattern, label.as_deref(), &target, out.as_deref())
        }
        Commands::Graph { input, format } => cmd_graph(&input, format),
    }
}

fn library(config: &OdpkitConfig, catalog: Option<PathBuf>) -> PatternLibrary {
    match catalog {
        Some(path) => PatternLibrary::new(CatalogSource::File(path)),
        None => PatternLibrary::new(config.catalog_source()),
    }
}

fn warn_on_catalog_error(lib: &PatternLibrary) {
    if let Some(err) = lib.snapshot().load_error() {
        eprintln!("{} {}", "warning:".yellow().bold(), err);
    }
}

fn cmd_categories(lib: &PatternLibrary) -> Result<()> {
    warn_on_catalog_error(lib);
    for category in lib.list_categories() {
        let count = lib.patterns_for(&category).len();
        println!(
            "{} {} ({} patterns)",
            category.label().bold(),
            category.iri().to_string().dimmed(),
            count
        );
    }
    Ok(())
}

fn cmd_patterns(lib: &PatternLibrary, category: Option<&str>) -> Result<()> {
    warn_on_catalog_error(lib);
    let category = match category {
        Some(needle) => lib
            .find_category_by_label(needle)
            .ok_or_else(|| anyhow!("unknown category: {needle}"))?,
        None => Category::any(),
    };

    println!("{} {}", "Category".green().bold(), category.label());
    for pattern in lib.patterns_for(&category) {
        println!("  {} {} {}", "→".cyan(), pattern.label(), pattern.iri().to_string().dimmed());
    }
    Ok(())
}

fn cmd_instantiate(
    config: &OdpkitConfig,
    lib: &PatternLibrary,
    pattern: &str,
    label: Option<&str>,
    target_path: &Path,
    out: Option<&Path>,
) -> Result<()> {
    let fragment = resolve::pattern_fragment(config, lib, pattern, label)?;
    println!(
        "{} {} into {}",
        "Instantiating".green().bold(),
        fragment.label,
        target_path.display()
    );

    let mut target = load_ontology_file(target_path)?;
    let naming = OntologyNamingContext::new(&target, config.entity_separator.clone());
    let ctx = TargetContext::for_ontology(&target, &naming);
    let instantiation =
        PatternInstantiator::new(&fragment.ontology, &fragment.label, &ctx, &config.instantiation).instantiate()?;

    println!("  {} module {}", "→".cyan(), instantiation.module_iri);
    println!("  {} pattern {}", "→".cyan(), instantiation.pattern_iri);
    print_axioms("Instantiation axioms", &instantiation.instantiation_axioms);
    print_axioms("Module annotations", &instantiation.module_annotation_axioms);

    if let Some(out) = out {
        let added = instantiation.apply_to(&mut target);
        if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(out, write_ntriples(&target))
            .with_context(|| format!("failed to write {}", out.display()))?;
        eprintln!(
            "{} {} ({} new axioms)",
            "wrote".green().bold(),
            out.display().to_string().bold(),
            added
        );
    }
    Ok(())
}

fn print_axioms<'a>(title: &str, axioms: impl IntoIterator<Item = &'a Axiom>) {
    let axioms: Vec<&Axiom> = axioms.into_iter().collect();
    println!("{} ({})", title.bold(), axioms.len());
    for ax in axioms {
        println!("  {ax}");
    }
}

fn cmd_graph(input: &Path, format: GraphFormat) -> Result<()> {
    let onto = load_ontology_file(input)?;
    let build = OntologyParser::new(DeclaredClassExtractor).parse_ontology(&onto)?;

    match format {
        GraphFormat::Dot => print!("{}", render_dot(&build.graph)),
        GraphFormat::Json => println!("{}", serde_json::to_string_pretty(&build.graph)?),
    }

    eprintln!(
        "{} {} nodes, {} edges",
        "graph".green().bold(),
        build.graph.node_count(),
        build.graph.edge_count()
    );
    if !build.report.unsupported.is_empty() {
        eprintln!(
            "{} {} unsupported subclass axioms",
            "warning:".yellow().bold(),
            build.report.unsupported.len()
        );
        for err in &build.report.unsupported {
            eprintln!("  {} {}", "→".yellow(), err);
        }
    }
    Ok(())
}
