use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use clap_complete::generate;
use colored::Colorize;
use serde::Serialize;
use serde_json::json;
use tracing::{debug, warn};
use tracing_subscriber::{fmt, EnvFilter};

use ideomap_core::{
    rank, Axis, Category, CategoryBox, CategoryStats, CategoryStore, ClassificationMode, Config,
    GeometryEngine, IdeomapError, Point3, Result, Submission, SubmissionIdGenerator,
    NOMINAL_LIMIT,
};

mod args;
use args::{Cli, Commands, ConfigAction, PointArgs, Shell};

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.quiet);

    let base_dir = match resolve_base_dir(cli.base_dir) {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("{} {}", "[ERROR]".red().bold(), e);
            return ExitCode::from(e.exit_code() as u8);
        }
    };
    debug!(base_dir = %base_dir.display(), "resolved base directory");

    let defs = cli.definitions.as_deref();
    let result = match cli.command {
        Some(Commands::List { long }) => {
            with_store(&base_dir, defs, |engine, _| handle_list(engine.store(), long))
        }
        Some(Commands::Show { name }) => with_store(&base_dir, defs, |engine, _| {
            print_details(engine.store().get(&name)?);
            Ok(())
        }),
        Some(Commands::Classify { point, mode, json }) => {
            with_store(&base_dir, defs, |engine, config| {
                handle_classify(engine, point, mode.unwrap_or(config.classify.mode), json)
            })
        }
        Some(Commands::Rank { point, limit, json }) => with_store(&base_dir, defs, |engine, _| {
            handle_rank(engine.store(), point, limit, json)
        }),
        Some(Commands::Stats { json }) => {
            with_store(&base_dir, defs, |engine, _| handle_stats(engine.store(), json))
        }
        Some(Commands::Centers { json }) => {
            with_store(&base_dir, defs, |engine, _| handle_centers(engine, json))
        }
        Some(Commands::Project {
            horizontal,
            vertical,
            json,
        }) => with_store(&base_dir, defs, |engine, _| {
            handle_project(engine, horizontal, vertical, json)
        }),
        Some(Commands::Cuboid { name, json }) => {
            with_store(&base_dir, defs, |engine, _| handle_box(engine, &name, json))
        }
        Some(Commands::Submit {
            income,
            ip,
            province,
            name,
            json,
        }) => handle_submit(&income, &ip, &province, &name, json),
        Some(Commands::Config { action }) => handle_config(action, &base_dir),
        Some(Commands::Completions { shell }) => {
            handle_completions(shell);
            Ok(())
        }
        None => {
            Cli::command().print_help().ok();
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "[ERROR]".red().bold(), e);
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

fn init_logging(verbose: bool, quiet: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else if quiet {
        EnvFilter::new("error")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn resolve_base_dir(cli_base: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(base) = cli_base {
        return Ok(base);
    }

    if let Ok(base) = std::env::var("IDEOMAP_BASE") {
        return Ok(PathBuf::from(base));
    }

    Config::default_base_dir()
}

/// Load config and the category store, then run `f` against them.
///
/// An invalid definition set fails here, before any query is answered.
fn with_store<F>(base_dir: &Path, cli_definitions: Option<&Path>, f: F) -> Result<()>
where
    F: FnOnce(&GeometryEngine<'_>, &Config) -> Result<()>,
{
    let config = Config::load(base_dir)?;
    let path = cli_definitions
        .map(Path::to_path_buf)
        .or_else(|| config.definitions_path(base_dir));
    let store = CategoryStore::open(path.as_deref())?;
    debug!(categories = store.len(), "category store ready");

    let engine = GeometryEngine::new(&store);
    f(&engine, &config)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn handle_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let shell = match shell {
        Shell::Bash => clap_complete::Shell::Bash,
        Shell::Zsh => clap_complete::Shell::Zsh,
        Shell::Fish => clap_complete::Shell::Fish,
        Shell::PowerShell => clap_complete::Shell::PowerShell,
        Shell::Elvish => clap_complete::Shell::Elvish,
    };
    generate(shell, &mut cmd, "ideomap", &mut io::stdout());
}

fn handle_list(store: &CategoryStore, long: bool) -> Result<()> {
    if store.is_empty() {
        println!("No categories defined.");
        return Ok(());
    }

    if long {
        println!("Category details:");
        println!("{}", "=".repeat(80));
        for cat in store {
            print_details(cat);
            println!("{}", "-".repeat(40));
        }
        return Ok(());
    }

    println!();
    for (i, cat) in store.iter().enumerate() {
        println!(
            "{:>3}. {} {} ({})",
            i + 1,
            cat.key.cyan().bold(),
            cat.display_name(),
            cat.name_en
        );
    }
    println!();
    println!("{} categories", store.len());
    Ok(())
}

fn print_details(cat: &Category) {
    println!();
    println!("{} ({})", cat.display_name().cyan().bold(), cat.name_en);
    println!("Key: {}", cat.key);
    if !cat.description.is_empty() {
        println!("Description: {}", cat.description);
    }
    println!("Ranges:");
    for axis in Axis::ALL {
        println!("  {:<10} {}", axis.to_string(), cat.range(axis));
    }
    if !cat.examples.is_empty() {
        println!("Examples: {}", cat.examples.join(", "));
    }
}

fn handle_classify(
    engine: &GeometryEngine<'_>,
    point: PointArgs,
    mode: ClassificationMode,
    json: bool,
) -> Result<()> {
    let point = Point3::from(point);
    if Axis::ALL
        .iter()
        .any(|&axis| point.get(axis).abs() > NOMINAL_LIMIT)
    {
        warn!(%point, "point lies outside the nominal [-12, 12] range");
    }

    let result = engine.classify_with(point, mode);

    if json {
        return print_json(&json!({
            "point": point,
            "mode": mode,
            "classified": result.is_some(),
            "category": result,
        }));
    }

    match result {
        Some(cat) => {
            println!(
                "{} -> {} {} ({})",
                point,
                cat.key.green().bold(),
                cat.display_name(),
                cat.name_en
            );
        }
        None => {
            println!("{} -> {}", point, "unclassified".yellow().bold());
        }
    }
    Ok(())
}

fn handle_rank(store: &CategoryStore, point: PointArgs, limit: usize, json: bool) -> Result<()> {
    let point = Point3::from(point);
    let ranked = rank(point, store);
    let top: Vec<_> = ranked.into_iter().take(limit).collect();

    if json {
        return print_json(&top);
    }

    println!("{}", format!("Best matches for {}:", point).cyan().bold());
    println!();
    for (i, m) in top.iter().enumerate() {
        let marker = if m.contained {
            "[IN]".green()
        } else {
            "[NEAR]".yellow()
        };
        println!(
            "{:>3}. {} {} {} (score {:.2})",
            i + 1,
            marker,
            m.category.key.bold(),
            m.category.display_name(),
            m.score
        );
        println!(
            "       economic {:.0}%  culture {:.0}%  authority {:.0}%",
            m.affinity.economic, m.affinity.culture, m.affinity.authority
        );
    }
    Ok(())
}

fn handle_stats(store: &CategoryStore, json: bool) -> Result<()> {
    let stats = CategoryStats::compute(store);
    if json {
        return print_json(&stats);
    }
    print!("{}", stats);
    Ok(())
}

fn handle_centers(engine: &GeometryEngine<'_>, json: bool) -> Result<()> {
    if json {
        let centers: Vec<_> = engine
            .centers()
            .map(|(cat, center)| json!({ "key": cat.key, "center": center }))
            .collect();
        return print_json(&centers);
    }

    for (cat, center) in engine.centers() {
        println!("{:<40} {}", cat.key.cyan(), center);
    }
    Ok(())
}

fn handle_project(
    engine: &GeometryEngine<'_>,
    horizontal: Axis,
    vertical: Axis,
    json: bool,
) -> Result<()> {
    if horizontal == vertical {
        warn!(axis = %horizontal, "projecting onto the same axis twice");
    }
    let projections = engine.project(horizontal, vertical);

    if json {
        return print_json(&projections);
    }

    println!(
        "{}",
        format!("{}-{} projection", horizontal, vertical).cyan().bold()
    );
    println!();
    for p in &projections {
        println!(
            "{:<40} origin ({:.1}, {:.1})  size {:.1} x {:.1}  center ({:.1}, {:.1})",
            p.key, p.origin.0, p.origin.1, p.width, p.height, p.center.0, p.center.1
        );
    }
    Ok(())
}

fn handle_box(engine: &GeometryEngine<'_>, name: &str, json: bool) -> Result<()> {
    let cuboid: CategoryBox = engine.box_of(name)?;

    if json {
        let edges: Vec<_> = cuboid.edges().collect();
        return print_json(&json!({
            "key": cuboid.key,
            "vertices": cuboid.vertices,
            "edges": edges,
        }));
    }

    println!("{}", cuboid.key.cyan().bold());
    println!("Vertices:");
    for (i, v) in cuboid.vertices.iter().enumerate() {
        println!("  {} {}", i, v);
    }
    println!("Edges:");
    for (a, b) in cuboid.edges() {
        println!("  {} -> {}", a, b);
    }
    Ok(())
}

fn handle_submit(income: &str, ip: &str, province: &str, name: &str, json: bool) -> Result<()> {
    let mut ids = SubmissionIdGenerator::new();
    let submission = Submission::new(&mut ids, ip, province, name, income);
    debug!(id = submission.id, class = %submission.social_class, "submission accepted");

    if json {
        return print_json(&json!({
            "status": "success",
            "id": submission.id,
            "social_class": submission.social_class,
            "timestamp": submission.timestamp,
        }));
    }

    println!("{} {}", "Accepted:".green(), submission.id);
    println!("Social class: {}", submission.social_class.to_string().cyan());
    println!("Timestamp: {}", submission.timestamp);
    Ok(())
}

fn handle_config(action: ConfigAction, base_dir: &Path) -> Result<()> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load(base_dir)?;
            match config.get(&key) {
                Some(value) => {
                    println!("{}", value);
                }
                None => {
                    return Err(IdeomapError::ConfigKeyNotFound { key });
                }
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load(base_dir)?;
            config.set(&key, &value)?;
            config.save(base_dir)?;
            println!("{} {} = {}", "Set:".green(), key, value);
        }
        ConfigAction::List => {
            let config = Config::load(base_dir)?;
            println!();
            for (key, value) in config.list() {
                println!("{} = {}", key.cyan(), value);
            }
            println!();
        }
        ConfigAction::Path => {
            let path = Config::path(base_dir);
            println!("{}", path.display());
        }
        ConfigAction::Init => {
            let path = Config::init(base_dir)?;
            println!("{} {}", "Initialized:".green(), path.display());
        }
    }

    Ok(())
}
