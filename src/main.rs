use std::path::PathBuf;

use anyhow::Context;
use chrono::{NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use techtrack::config::Config;
use techtrack::models::*;
use techtrack::repository::validation;
use techtrack::store::{LocalStorage, SqliteStore};
use techtrack::views::{self, CategoryFilter, Query, SortKey, StatusFilter};
use techtrack::{render, TechnologyRepository, ValidationError};

#[derive(Parser)]
#[command(name = "techtrack")]
#[command(about = "Track the technologies you are learning")]
struct Cli {
    /// SQLite file holding the technology list
    #[arg(long, global = true, env = "TECHTRACK_DATA")]
    data: Option<PathBuf>,

    /// Storage key the list is kept under
    #[arg(long, global = true, env = "TECHTRACK_KEY")]
    key: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List technologies
    List {
        /// not-started, in-progress, completed or all
        #[arg(short, long, default_value = "all")]
        status: StatusFilter,

        /// Case-insensitive text to look for in title, description and notes
        #[arg(short = 'q', long, default_value = "")]
        search: String,

        /// Category tag or all
        #[arg(short, long, default_value = "all")]
        category: CategoryFilter,

        /// none, title, progress or deadline
        #[arg(long, default_value = "none")]
        sort: SortKey,
    },
    /// Show one technology in full
    Show { id: TechnologyId },
    /// Add a technology
    Add {
        title: String,
        description: String,
        #[command(flatten)]
        details: DetailArgs,

        #[arg(long)]
        deadline: Option<NaiveDate>,

        #[arg(long)]
        notes: Option<String>,
    },
    /// Edit title, description or tags of a technology
    Edit {
        id: TechnologyId,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[command(flatten)]
        details: DetailArgs,
    },
    /// Move a technology to the next status in the cycle
    Advance { id: TechnologyId },
    /// Set the status of one or more technologies
    Status {
        status: Status,
        #[arg(num_args = 0..)]
        ids: Vec<TechnologyId>,
    },
    /// Replace the notes of a technology
    Notes { id: TechnologyId, text: String },
    /// Record an explicit progress percentage
    Progress {
        id: TechnologyId,
        #[arg(value_parser = clap::value_parser!(u8).range(0..=100))]
        value: u8,
    },
    /// Set or clear a deadline (YYYY-MM-DD)
    Deadline {
        id: TechnologyId,
        date: Option<NaiveDate>,

        #[arg(long, conflicts_with = "date")]
        clear: bool,
    },
    /// Give every technology a deadline, one week apart
    AutoDeadlines,
    /// Mark every technology completed
    CompleteAll,
    /// Reset every technology to not started
    Reset,
    /// Remove all notes
    ClearNotes,
    /// Delete a technology
    Delete { id: TechnologyId },
    /// Start a random technology that has not been started yet
    Random,
    /// Show progress statistics
    Stats,
    /// Write the list and its statistics as JSON
    Export {
        /// Output file; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Args)]
struct DetailArgs {
    #[arg(long)]
    category: Option<Category>,

    #[arg(long)]
    priority: Option<Priority>,

    #[arg(long)]
    difficulty: Option<Difficulty>,

    /// Estimated effort in hours
    #[arg(long, allow_negative_numbers = true)]
    hours: Option<i64>,
}

/// Logs go to stderr so stdout carries only command output.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "techtrack=info".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn open_repository(cli: &Cli) -> anyhow::Result<TechnologyRepository<SqliteStore>> {
    let config = match &cli.data {
        Some(path) => Config::new(path.clone()),
        None => Config::load_default()?,
    }
    .with_overrides(None, cli.key.clone());

    let store = SqliteStore::open(&config.data_path)
        .with_context(|| format!("Failed to open {}", config.data_path.display()))?;
    store.migrate()?;

    let storage = LocalStorage::new(store).on_error(|e| {
        eprintln!("warning: changes may not have been saved: {}", e);
    });
    Ok(TechnologyRepository::open_with_key(storage, config.storage_key))
}

fn print_validation(err: &ValidationError) {
    for (field, message) in err.fields() {
        eprintln!("{}: {}", field, message);
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let mut repo = open_repository(&cli)?;

    let command = cli.command.unwrap_or(Commands::List {
        status: StatusFilter::All,
        search: String::new(),
        category: CategoryFilter::All,
        sort: SortKey::None,
    });
    let result = run(&mut repo, command);

    if let Err(err) = result {
        match err.downcast_ref::<ValidationError>() {
            Some(validation) => {
                print_validation(validation);
                std::process::exit(2);
            }
            None => return Err(err),
        }
    }

    Ok(())
}

fn run(repo: &mut TechnologyRepository<SqliteStore>, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::List {
            status,
            search,
            category,
            sort,
        } => {
            let query = Query {
                status,
                search,
                category,
                sort,
            };
            let list = query.apply(repo.technologies());
            if list.is_empty() {
                println!("No technologies match.");
            } else {
                print!("{}", render::render_list(&list));
            }
        }
        Commands::Show { id } => match repo.get(&repo.resolve_id(id.clone())) {
            Some(tech) => print!("{}", render::render_detail(tech)),
            None => println!("No technology with id {}", id),
        },
        Commands::Add {
            title,
            description,
            details,
            deadline,
            notes,
        } => {
            let tech = repo.add_technology(NewTechnology {
                title,
                description,
                category: details.category,
                priority: details.priority,
                difficulty: details.difficulty,
                deadline,
                estimated_hours: details.hours,
                notes,
            })?;
            println!("Added #{} {}", tech.id, tech.title);
        }
        Commands::Edit {
            id,
            title,
            description,
            details,
        } => {
            let update = TechnologyUpdate {
                title,
                description,
                category: details.category,
                priority: details.priority,
                difficulty: details.difficulty,
                estimated_hours: details.hours,
            };
            if update.is_empty() {
                println!("Nothing to change.");
                return Ok(());
            }
            let id = repo.resolve_id(id);
            match repo.update_technology(&id, update)? {
                Some(tech) => println!("Updated #{} {}", tech.id, tech.title),
                None => println!("No technology with id {}", id),
            }
        }
        Commands::Advance { id } => {
            let id = repo.resolve_id(id);
            match repo.advance_status(&id) {
                Some(status) => println!("#{} is now {}", id, status.label().to_lowercase()),
                None => println!("No technology with id {}", id),
            }
        }
        Commands::Status { status, ids } => {
            let ids: Vec<TechnologyId> = ids.into_iter().map(|id| repo.resolve_id(id)).collect();
            let matched = repo.bulk_update_status(&ids, status)?;
            println!("{} of {} set to {}", matched, ids.len(), status);
        }
        Commands::Notes { id, text } => {
            validation::validate_notes(&text)?;
            let id = repo.resolve_id(id);
            if repo.get(&id).is_none() {
                println!("No technology with id {}", id);
                return Ok(());
            }
            repo.update_notes(&id, text);
            println!("Notes saved for #{}", id);
        }
        Commands::Progress { id, value } => {
            let id = repo.resolve_id(id);
            repo.set_progress(&id, value);
            match repo.get(&id) {
                Some(tech) => println!("#{} progress {}%", id, tech.progress()),
                None => println!("No technology with id {}", id),
            }
        }
        Commands::Deadline { id, date, clear } => {
            if date.is_none() && !clear {
                anyhow::bail!("Give a date (YYYY-MM-DD) or --clear");
            }
            let id = repo.resolve_id(id);
            repo.set_deadline(&id, date)?;
            match date {
                Some(date) => println!("#{} due {}", id, date),
                None => println!("Deadline cleared for #{}", id),
            }
        }
        Commands::AutoDeadlines => {
            let suggested = repo.suggest_deadlines(Utc::now().date_naive());
            let matched = repo.set_deadlines(&suggested)?;
            println!("Set {} deadlines", matched);
        }
        Commands::CompleteAll => {
            repo.mark_all_completed();
            println!("All technologies marked completed");
        }
        Commands::Reset => {
            repo.reset_all();
            println!("All technologies reset to not started");
        }
        Commands::ClearNotes => {
            repo.clear_all_notes();
            println!("All notes cleared");
        }
        Commands::Delete { id } => {
            let id = repo.resolve_id(id);
            if repo.delete_technology(&id) {
                println!("Deleted #{}", id);
            } else {
                println!("No technology with id {}", id);
            }
        }
        Commands::Random => match repo.pick_random_not_started() {
            Some(tech) => println!("Start with #{} {}", tech.id, tech.title),
            None => println!("Nothing left to start."),
        },
        Commands::Stats => {
            let list = repo.technologies();
            print!(
                "{}",
                render::render_statistics(
                    &views::statistics(list),
                    &views::category_statistics(list),
                    views::most_common_status(list),
                    &views::deadline_statistics(list, Utc::now().date_naive()),
                )
            );
        }
        Commands::Export { output } => {
            let doc = repo.export(Utc::now());
            let json = doc.to_json_pretty()?;
            match output {
                Some(path) => {
                    std::fs::write(&path, json)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    println!("Exported {} technologies to {}", doc.technologies.len(), path.display());
                }
                None => println!("{}", json),
            }
        }
    }

    Ok(())
}
