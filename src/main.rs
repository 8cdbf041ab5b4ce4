use clap::Parser;
use flowchat::core::config::{self, CliOverrides};
use flowchat::core::i18n::Language;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;

#[derive(Parser)]
#[command(name = "flowchat", about = "Terminal chat for a hosted Langflow flow")]
struct Args {
    /// Flow to run (overrides LANGFLOW_FLOW_ID and the config file)
    #[arg(long)]
    flow_id: Option<String>,

    /// Langflow server root URL
    #[arg(long)]
    base_url: Option<String>,

    /// Interface language
    #[arg(short, long, value_enum)]
    language: Option<Language>,

    /// Retries after the first failed attempt
    #[arg(long)]
    max_retries: Option<u32>,
}

impl From<Args> for CliOverrides {
    fn from(args: Args) -> Self {
        CliOverrides {
            flow_id: args.flow_id,
            base_url: args.base_url,
            language: args.language,
            max_retries: args.max_retries,
        }
    }
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to flowchat.log in current directory
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create("flowchat.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    log::info!("Flowchat starting up");

    // Configuration problems are reported before the terminal is taken over
    let resolved = config::load_config()
        .and_then(|file_config| config::resolve(&file_config, &args.into()));
    let resolved = match resolved {
        Ok(resolved) => resolved,
        Err(e) => {
            log::error!("Startup failed: {}", e);
            eprintln!("flowchat: {e}");
            std::process::exit(1);
        }
    };

    flowchat::tui::run(resolved)
}
