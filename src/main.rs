use std::path::PathBuf;

use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use albumcovers::{
    browser::{BrowserLauncher, PrintUrl, SystemBrowser},
    cli::{self, DownloadOptions},
    config::{self, Config},
    covers::{DEFAULT_OUTPUT_DIR, FailurePolicy},
    error,
    error::EXIT_NETWORK,
    spotify::albums::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE},
    warning,
};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Log in with Spotify and download the covers of all saved albums
    Download(DownloadArgs),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct DownloadArgs {
    /// Directory the covers are written to
    #[clap(long, default_value = DEFAULT_OUTPUT_DIR)]
    pub output: PathBuf,

    /// Albums requested per page
    #[clap(
        long,
        default_value_t = DEFAULT_PAGE_SIZE,
        value_parser = clap::value_parser!(u32).range(1..=MAX_PAGE_SIZE as i64)
    )]
    pub limit: u32,

    /// Market (ISO 3166-1 alpha-2) used for album availability
    #[clap(long)]
    pub market: Option<String>,

    /// Stop at the first cover that cannot be downloaded
    #[clap(long)]
    pub fail_fast: bool,

    /// Print the login URL instead of opening a browser
    #[clap(long)]
    pub no_browser: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    match cli.command {
        Command::Download(args) => {
            if let Err(e) = config::load_env().await {
                warning!("Cannot load environment. Err: {}", e);
            }
            std::process::exit(download(args).await);
        }
        Command::Completions(opt) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}

async fn download(args: DownloadArgs) -> i32 {
    let mut config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return e.exit_code();
        }
    };
    if let Some(market) = args.market {
        config.market = market;
    }

    let launcher: &dyn BrowserLauncher = if args.no_browser {
        &PrintUrl
    } else {
        &SystemBrowser
    };

    let options = DownloadOptions {
        output_dir: args.output,
        page_size: args.limit,
        failure_policy: if args.fail_fast {
            FailurePolicy::Abort
        } else {
            FailurePolicy::Continue
        },
    };

    match cli::download(&config, launcher, &options).await {
        Ok(report) if report.is_complete() => 0,
        Ok(_) => EXIT_NETWORK,
        Err(e) => {
            error!("{}", e);
            e.exit_code()
        }
    }
}
