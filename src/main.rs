use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use research_roster::browser::{Browser, EmploymentHistory, PublicationList, SearchPage};
use research_roster::config::{
    find_config_file, load_config, user_config_path, write_default_config, Config,
    LOCAL_CONFIG_FILE,
};
use research_roster::models::{EmploymentRecord, PublicationRecord};
use research_roster::store::{Dataset, SqliteStore};
use research_roster::ui::{self, Status};
use research_roster::utils::{
    find_title_collisions, format_year, is_terminal, rank_with, terminal_width,
    title_column_width, truncate_to_width, PageWindow, Pagination, UrlPreference,
};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Research Roster - Browse researchers, their employment and their publications
#[derive(Parser, Debug)]
#[command(name = "research-roster")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Browse researchers, their employment and their publications", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (-v for debug, -vv for trace)
    #[arg(long, short, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, short, value_enum, global = true, default_value_t = OutputFormat::Auto)]
    output: OutputFormat,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Database file (overrides the configuration)
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Output format for results
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// Automatic based on terminal (table if TTY, JSON otherwise)
    Auto,
    /// Table format (human-readable)
    Table,
    /// JSON format (machine-readable)
    Json,
    /// Plain text format
    Plain,
}

impl OutputFormat {
    fn resolve(self) -> OutputFormat {
        match self {
            OutputFormat::Auto if is_terminal() => OutputFormat::Table,
            OutputFormat::Auto => OutputFormat::Json,
            other => other,
        }
    }
}

/// Which linked duplicate survives ranking
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum UrlChoice {
    /// Every later duplicate with a URL replaces the kept one
    Last,
    /// The first duplicate with a URL is kept
    First,
}

impl From<UrlChoice> for UrlPreference {
    fn from(choice: UrlChoice) -> Self {
        match choice {
            UrlChoice::Last => UrlPreference::LastWithUrl,
            UrlChoice::First => UrlPreference::FirstWithUrl,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Search researchers by name or department
    #[command(alias = "s")]
    Search {
        /// Part of a name or department (case-insensitive)
        #[arg(default_value = "")]
        term: String,

        /// Page to show (1-indexed)
        #[arg(long, short, default_value_t = 1)]
        page: usize,

        /// Rows per page (overrides the configuration)
        #[arg(long)]
        page_size: Option<usize>,
    },

    /// List a researcher's publications, deduplicated and sorted by title
    #[command(alias = "p")]
    Publications {
        /// Full name or ORCID iD
        researcher: String,

        /// Page to show (1-indexed)
        #[arg(long, short, default_value_t = 1)]
        page: usize,

        /// Rows per page (overrides the configuration)
        #[arg(long)]
        page_size: Option<usize>,

        /// Which linked duplicate survives
        #[arg(long, value_enum)]
        url_preference: Option<UrlChoice>,

        /// Show titles in lower case
        #[arg(long)]
        lowercase_titles: bool,
    },

    /// Show a researcher's employment history
    #[command(alias = "e")]
    Employment {
        /// Full name or ORCID iD
        researcher: String,
    },

    /// Show a researcher with employment and the first page of publications
    Show {
        /// Full name or ORCID iD
        researcher: String,
    },

    /// Rank a JSON file of publication records
    Rank {
        /// Input JSON file containing an array of publication records
        input: PathBuf,

        /// Write the ranked records here instead of stdout
        #[arg(long)]
        output_file: Option<PathBuf>,

        /// Which linked duplicate survives
        #[arg(long, value_enum)]
        url_preference: Option<UrlChoice>,

        /// Show duplicate groups without ranking
        #[arg(long, short)]
        show: bool,
    },

    /// Load a JSON dataset into the database, creating tables as needed
    Import {
        /// JSON file with `researchers`, `employment` and `publications` arrays
        dataset: PathBuf,
    },

    /// Write a default configuration file
    InitConfig {
        /// Where to write (default: the user configuration directory)
        path: Option<PathBuf>,

        /// Replace an existing file
        #[arg(long, short)]
        force: bool,
    },
}

fn init_tracing(cli: &Cli, config: &Config) {
    let level = if cli.quiet {
        "error"
    } else {
        match cli.verbose {
            0 => config.logging.level.as_str(),
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(format!("research_roster={}", level)));

    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.is_json() {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration from file if specified or found in default locations
    let config_path = cli.config.clone().or_else(find_config_file);
    let mut config = load_config(config_path.as_deref())?;
    if let Some(database) = &cli.database {
        config.database.path = database.clone();
    }

    init_tracing(&cli, &config);
    if let Some(path) = &config_path {
        tracing::info!("Using config file: {}", path.display());
    }

    let format = cli.output.resolve();

    match cli.command {
        Commands::Search {
            ref term,
            page,
            page_size,
        } => {
            if term.trim().is_empty() && !cli.quiet {
                ui::print_status(
                    Status::Info,
                    "Pass part of a researcher's name or department to narrow the list.",
                );
            }
            let browser = open_browser(&config, page_size, None)?;
            let results = browser.search(term.trim(), page)?;
            output_search(&results, format, cli.quiet);
        }

        Commands::Publications {
            ref researcher,
            page,
            page_size,
            url_preference,
            lowercase_titles,
        } => {
            let browser = open_browser(&config, page_size, url_preference)?;
            let list = browser.publications(researcher)?;
            let window = browser.publication_page(&list, page)?;
            let lowercase = lowercase_titles || config.display.lowercase_titles;
            output_publications(&list, &window, format, lowercase, cli.quiet);
        }

        Commands::Employment { ref researcher } => {
            let browser = open_browser(&config, None, None)?;
            let history = browser.employment(researcher)?;
            output_employment(&history, format, cli.quiet);
        }

        Commands::Show { ref researcher } => {
            let browser = open_browser(&config, None, None)?;
            let history = browser.employment(researcher)?;
            let list = browser.publications(&history.researcher.orcid_id)?;
            let window = browser.publication_page(&list, 1)?;

            if format == OutputFormat::Json {
                let value = serde_json::json!({
                    "researcher": history.researcher,
                    "employment": history.employment,
                    "publications": window,
                });
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                ui::print_researcher_header(&history.researcher);
                ui::print_section("Employment");
                print_employment_rows(&history.employment, format);
                ui::print_section("Publications");
                print_publication_rows(&window, format, config.display.lowercase_titles);
                if !cli.quiet {
                    ui::print_page_footer(&window, "publications");
                }
            }
        }

        Commands::Rank {
            ref input,
            ref output_file,
            url_preference,
            show,
        } => {
            let records = read_records(input)?;

            if show {
                let groups = find_title_collisions(&records)?;
                if groups.is_empty() {
                    ui::print_status(Status::Success, "No duplicate titles found");
                }
                for group in &groups {
                    let title = records[group[0]].display_title();
                    println!("{} ({} records):", title, group.len());
                    for &idx in group {
                        let url = records[idx].url.as_deref().unwrap_or("-");
                        println!("  [{}] {}", idx, url);
                    }
                }
                return Ok(());
            }

            let preference = url_preference
                .map(UrlPreference::from)
                .unwrap_or(config.display.url_preference);
            let input_len = records.len();
            let ranked = rank_with(records, preference)?;
            let json = serde_json::to_string_pretty(&ranked)?;

            match output_file {
                Some(path) => {
                    std::fs::write(path, json)
                        .with_context(|| format!("writing {}", path.display()))?;
                    if !cli.quiet {
                        ui::print_status(
                            Status::Success,
                            &format!(
                                "Ranked {} records into {} -> {}",
                                input_len,
                                ranked.len(),
                                path.display()
                            ),
                        );
                    }
                }
                None => println!("{}", json),
            }
        }

        Commands::Import { ref dataset } => {
            let data = Dataset::load(dataset)?;
            let mut store = SqliteStore::create(&config.database.path)?;
            store.import(&data)?;
            if !cli.quiet {
                ui::print_status(
                    Status::Success,
                    &format!(
                        "Imported {} researchers, {} employment rows and {} publications into {}",
                        data.researchers.len(),
                        data.employment.len(),
                        data.publications.len(),
                        config.database.path.display()
                    ),
                );
            }
        }

        Commands::InitConfig { ref path, force } => {
            let target = path
                .clone()
                .or_else(user_config_path)
                .unwrap_or_else(|| PathBuf::from(LOCAL_CONFIG_FILE));
            write_default_config(&target, force)?;
            if !cli.quiet {
                ui::print_status(
                    Status::Success,
                    &format!("Wrote {}", target.display()),
                );
            }
        }
    }

    Ok(())
}

fn open_browser(
    config: &Config,
    page_size: Option<usize>,
    url_preference: Option<UrlChoice>,
) -> Result<Browser<SqliteStore>> {
    let pager = match page_size {
        Some(size) => Pagination::new(size)?,
        None => config.pagination()?,
    };
    let preference = url_preference
        .map(UrlPreference::from)
        .unwrap_or(config.display.url_preference);

    let store = SqliteStore::open(&config.database.path)?;
    Ok(Browser::new(store, pager, preference))
}

fn read_records(path: &Path) -> Result<Vec<PublicationRecord>> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let records = serde_json::from_str(&content)
        .with_context(|| format!("parsing publication records from {}", path.display()))?;
    Ok(records)
}

fn output_search(results: &SearchPage, format: OutputFormat, quiet: bool) {
    match format {
        OutputFormat::Json => print_json(results),
        OutputFormat::Plain => {
            for r in &results.researchers {
                println!("{} ({})", r.display_name(), r.orcid_id);
            }
        }
        OutputFormat::Table => {
            use comfy_table::{Attribute, Cell, Table};
            let mut table = Table::new();
            table.load_preset(comfy_table::presets::UTF8_FULL);
            table.set_header(vec!["Name", "ORCID", "Email"]);

            for r in &results.researchers {
                table.add_row(vec![
                    Cell::new(r.display_name()).add_attribute(Attribute::Bold),
                    Cell::new(&r.orcid_id),
                    Cell::new(r.email.as_deref().unwrap_or_default()),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Auto => unreachable!(),
    }

    if results.researchers.is_empty() && !quiet {
        ui::print_status(Status::Warning, "No researchers match the search.");
    }
    if format != OutputFormat::Json && !quiet {
        ui::print_page_footer(&results.window(), "researchers");
    }
}

fn output_publications(
    list: &PublicationList,
    window: &PageWindow<'_, PublicationRecord>,
    format: OutputFormat,
    lowercase: bool,
    quiet: bool,
) {
    if format == OutputFormat::Json {
        let value = serde_json::json!({
            "researcher": list.researcher,
            "publications": window,
        });
        print_json(&value);
        return;
    }

    if list.publications.is_empty() {
        if !quiet {
            ui::print_status(
                Status::Warning,
                &format!(
                    "No publications found for {}.",
                    list.researcher.display_name()
                ),
            );
        }
        return;
    }

    if !quiet {
        ui::print_status(
            Status::Search,
            &format!("Publications by {}", list.researcher.display_name()),
        );
    }
    print_publication_rows(window, format, lowercase);
    if !quiet {
        ui::print_page_footer(window, "publications");
    }
}

fn shown_title(record: &PublicationRecord, lowercase: bool) -> String {
    if lowercase {
        record.display_title().to_lowercase()
    } else {
        record.display_title().to_string()
    }
}

fn print_publication_rows(
    window: &PageWindow<'_, PublicationRecord>,
    format: OutputFormat,
    lowercase: bool,
) {
    let first = window.first_item_number();
    match format {
        OutputFormat::Table => {
            use comfy_table::{Attribute, Cell, Table};
            let title_width = title_column_width(terminal_width());
            let mut table = Table::new();
            table.load_preset(comfy_table::presets::UTF8_FULL);
            table.set_header(vec!["#", "Title", "Year", "Link"]);

            for (i, record) in window.items.iter().enumerate() {
                let link = record
                    .url
                    .as_deref()
                    .or(record.doi_url.as_deref())
                    .unwrap_or_default();
                table.add_row(vec![
                    Cell::new(first + i),
                    Cell::new(truncate_to_width(&shown_title(record, lowercase), title_width))
                        .add_attribute(Attribute::Bold),
                    Cell::new(format_year(record.year)),
                    Cell::new(link),
                ]);
            }
            println!("{table}");
        }
        _ => {
            for (i, record) in window.items.iter().enumerate() {
                match record.year {
                    Some(year) => println!("{}. {} ({})", first + i, shown_title(record, lowercase), year),
                    None => println!("{}. {}", first + i, shown_title(record, lowercase)),
                }
                if let Some(url) = &record.url {
                    println!("   URL: {}", url);
                }
                if let Some(doi_url) = &record.doi_url {
                    println!("   DOI: {}", doi_url);
                }
            }
        }
    }
}

fn output_employment(history: &EmploymentHistory, format: OutputFormat, quiet: bool) {
    if format == OutputFormat::Json {
        print_json(history);
        return;
    }

    ui::print_researcher_header(&history.researcher);
    if history.employment.is_empty() {
        if !quiet {
            ui::print_status(Status::Warning, "No employment history recorded.");
        }
        return;
    }
    print_employment_rows(&history.employment, format);
}

fn print_employment_rows(rows: &[EmploymentRecord], format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            use comfy_table::{Cell, Table};
            let mut table = Table::new();
            table.load_preset(comfy_table::presets::UTF8_FULL);
            table.set_header(vec!["Organization", "Department", "Role", "Period"]);

            for e in rows {
                table.add_row(vec![
                    Cell::new(e.organization.as_deref().unwrap_or_default()),
                    Cell::new(e.department.as_deref().unwrap_or_default()),
                    Cell::new(e.role_title.as_deref().unwrap_or_default()),
                    Cell::new(e.period()),
                ]);
            }
            println!("{table}");
        }
        _ => {
            for e in rows {
                let place = [e.organization.as_deref(), e.department.as_deref()]
                    .into_iter()
                    .flatten()
                    .collect::<Vec<_>>()
                    .join(", ");
                println!(
                    "{} - {} {}",
                    e.period(),
                    e.role_title.as_deref().unwrap_or("Position"),
                    place
                );
            }
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => tracing::error!("Failed to serialize output: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_version() {
        let version = env!("CARGO_PKG_VERSION");
        let parts: Vec<&str> = version.split('.').collect();
        assert!(parts.len() >= 2);
        assert!(parts[0].parse::<u32>().is_ok());
    }

    #[test]
    fn test_output_format_resolve_keeps_explicit() {
        assert_eq!(OutputFormat::Json.resolve(), OutputFormat::Json);
        assert_eq!(OutputFormat::Plain.resolve(), OutputFormat::Plain);
        assert_ne!(OutputFormat::Auto.resolve(), OutputFormat::Auto);
    }

    #[test]
    fn test_cli_search_defaults() {
        let cli = Cli::try_parse_from(["research-roster", "search"]).unwrap();
        match cli.command {
            Commands::Search {
                term,
                page,
                page_size,
            } => {
                assert_eq!(term, "");
                assert_eq!(page, 1);
                assert_eq!(page_size, None);
            }
            other => panic!("unexpected command: {:?}", other),
        }
        assert_eq!(cli.output, OutputFormat::Auto);
    }

    #[test]
    fn test_cli_publications_options() {
        let cli = Cli::try_parse_from([
            "research-roster",
            "-vv",
            "--output",
            "json",
            "publications",
            "Ada Byron",
            "--page",
            "3",
            "--page-size",
            "5",
            "--url-preference",
            "first",
            "--lowercase-titles",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.output, OutputFormat::Json);
        match cli.command {
            Commands::Publications {
                researcher,
                page,
                page_size,
                url_preference,
                lowercase_titles,
            } => {
                assert_eq!(researcher, "Ada Byron");
                assert_eq!(page, 3);
                assert_eq!(page_size, Some(5));
                assert_eq!(url_preference, Some(UrlChoice::First));
                assert!(lowercase_titles);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cli_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "research-roster",
            "employment",
            "0000-0001",
            "--database",
            "/tmp/roster.db",
            "-q",
        ])
        .unwrap();
        assert!(cli.quiet);
        assert_eq!(cli.database, Some(PathBuf::from("/tmp/roster.db")));
    }

    #[test]
    fn test_cli_rank_command() {
        let cli =
            Cli::try_parse_from(["research-roster", "rank", "pubs.json", "--show"]).unwrap();
        match cli.command {
            Commands::Rank { input, show, .. } => {
                assert_eq!(input, PathBuf::from("pubs.json"));
                assert!(show);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cli_requires_researcher() {
        assert!(Cli::try_parse_from(["research-roster", "publications"]).is_err());
    }

    #[test]
    fn test_url_choice_maps_to_preference() {
        assert_eq!(UrlPreference::from(UrlChoice::Last), UrlPreference::LastWithUrl);
        assert_eq!(UrlPreference::from(UrlChoice::First), UrlPreference::FirstWithUrl);
    }

    #[test]
    fn test_shown_title() {
        let record = PublicationRecord::new("Deep Sea VENTS");
        assert_eq!(shown_title(&record, false), "Deep Sea VENTS");
        assert_eq!(shown_title(&record, true), "deep sea vents");
    }
}
