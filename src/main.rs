use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

// Exit codes
const EXIT_SUCCESS: i32 = 0;
const EXIT_DATA: i32 = 1;
const EXIT_INVALID_ANSWERS: i32 = 2;
const EXIT_EXPORT: i32 = 3;
const EXIT_CONFIG: i32 = 4;
const EXIT_FAILURE: i32 = 5;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Take the questionnaire interactively (default if no subcommand)
    Take,
    /// Score a set of responses without the interactive form
    Score {
        /// File with one response (1-5) per question in question order,
        /// separated by whitespace or commas; `-` reads stdin
        input: String,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,

        /// Also write the CSV export and print its path
        #[arg(long)]
        export: bool,
    },
    /// List the question bank
    Questions,
    /// Print all dimension profiles
    Profiles,
}

#[derive(Parser, Debug)]
#[command(name = "popa")]
#[command(about = "POPA self-assessment questionnaire", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/popa/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Directory holding questions.csv and pillars.csv (overrides config;
    /// the built-in tables are used when neither names one)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Take);

    popa::logging::init(cli.verbose);

    // Load config
    let config_path = cli.config.map(PathBuf::from);
    let config = match popa::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    if let Err(errors) = popa::config::validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    // Load reference data once; it is shared read-only from here on
    let reference = match config.data_source(cli.data_dir) {
        Some(source) => match popa::reference::load_reference_data(&source) {
            Ok(r) => r,
            Err(e) => {
                eprintln!("{}", popa::reference::describe_load_failure(&e, &source.dir));
                std::process::exit(EXIT_DATA);
            }
        },
        None => match popa::reference::load_builtin_reference_data(config.strict_coverage()) {
            Ok(r) => r,
            Err(e) => {
                eprintln!("Built-in reference data is invalid: {}", e);
                std::process::exit(EXIT_DATA);
            }
        },
    };
    let reference = Arc::new(reference);
    debug!(questions = reference.questions().len(), "Reference data ready");

    let use_colors = popa::output::should_use_colors();

    match command {
        Commands::Take => {
            // Detect the background before the terminal enters raw mode
            let theme = popa::tui::ThemeColors::for_theme(popa::tui::resolve_theme());
            let store = popa::session::SessionStore::new(config.session_ttl());
            let app = popa::tui::App::new(reference, store, config.export_dir(), theme);

            match popa::tui::run_tui(app).await {
                Ok(history) => {
                    if !history.is_empty() {
                        emit(&format!(
                            "Session history:\n{}",
                            popa::output::format_history(&history)
                        ));
                    }
                }
                Err(e) => {
                    eprintln!("TUI error: {:#}", e);
                    std::process::exit(EXIT_FAILURE);
                }
            }
        }
        Commands::Score { input, json, export } => {
            let text = match read_input(&input) {
                Ok(t) => t,
                Err(e) => {
                    eprintln!("Failed to read responses from {}: {}", input, e);
                    std::process::exit(EXIT_INVALID_ANSWERS);
                }
            };

            let answers = match popa::scoring::parse_responses(&text).and_then(|responses| {
                popa::scoring::answers_from_responses(reference.questions(), &responses)
            }) {
                Ok(a) => a,
                Err(e) => {
                    eprintln!("Invalid answers: {}", e);
                    std::process::exit(EXIT_INVALID_ANSWERS);
                }
            };

            let result = popa::scoring::compute_scores(&answers);
            let dominant = result.dominant();

            if json {
                let unanswered: Vec<&str> = result.unanswered().iter().map(|d| d.key()).collect();
                let value = serde_json::json!({
                    "means": result.means(),
                    "normalized": result.normalized(),
                    "dominant": dominant.key(),
                    "unanswered": unanswered,
                });
                match serde_json::to_string_pretty(&value) {
                    Ok(s) => emit(&s),
                    Err(e) => {
                        eprintln!("Failed to encode result: {}", e);
                        std::process::exit(EXIT_FAILURE);
                    }
                }
            } else {
                emit(&format!(
                    "{}\n\n{}\n\n{}",
                    popa::output::format_score_table(&result, use_colors),
                    popa::output::format_dominant(&result, &reference, use_colors),
                    popa::output::format_profile_card(
                        reference.profile(dominant),
                        popa::output::get_terminal_width(),
                        use_colors,
                    )
                ));
            }

            if export {
                match popa::export::write_export(
                    &config.export_dir(),
                    &result,
                    &chrono::Local::now(),
                ) {
                    Ok(path) => {
                        info!(path = %path.display(), "Exported scores");
                        eprintln!("Exported: {}", path.display());
                    }
                    Err(e) => {
                        eprintln!("Export failed: {:#}", e);
                        std::process::exit(EXIT_EXPORT);
                    }
                }
            }
        }
        Commands::Questions => {
            emit(&popa::output::format_question_list(
                reference.questions(),
                use_colors,
            ));
        }
        Commands::Profiles => {
            let width = popa::output::get_terminal_width();
            let cards: Vec<String> = reference
                .profiles()
                .iter()
                .map(|profile| popa::output::format_profile_card(profile, width, use_colors))
                .collect();
            emit(&cards.join("\n\n"));
        }
    }

    std::process::exit(EXIT_SUCCESS);
}

/// Print to stdout; a closed pipe ends output quietly
fn emit(text: &str) {
    if let Err(e) = popa::output::write_report(&mut std::io::stdout().lock(), text) {
        eprintln!("Failed to write output: {}", e);
        std::process::exit(EXIT_FAILURE);
    }
}

/// Read responses from a file, or stdin when `input` is `-`
fn read_input(input: &str) -> std::io::Result<String> {
    if input == "-" {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        Ok(text)
    } else {
        std::fs::read_to_string(input)
    }
}
