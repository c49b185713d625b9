use std::path::PathBuf;

use clap::{
    ArgGroup, CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use vibecli::{cli, config, error, utils};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightMagenta.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Sign in to Spotify
    Auth(AuthOptions),

    /// List the tracks of your public playlists
    Tracks(TracksOptions),

    /// Score a voice note and show the tracks that match its vibe
    Analyze(AnalyzeOptions),

    /// Open a track in the Spotify app (falls back to the web player)
    Open(OpenOptions),

    /// Check that the scoring backend is running
    Health,

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct AuthOptions {
    /// Full URL the browser was redirected to; skips the local callback server
    #[clap(long)]
    pub redirect_url: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct TracksOptions {
    /// How many tracks to list: a number or `all`
    #[clap(long, default_value = "all", value_parser = utils::parse_top_tracks)]
    pub top: utils::TopTracks,
}

#[derive(Parser, Debug, Clone)]
#[command(group(ArgGroup::new("input").required(true).args(["file", "score"])))]
pub struct AnalyzeOptions {
    /// Audio clip to upload (.wav, .mp3 or .m4a)
    #[clap(long)]
    pub file: Option<PathBuf>,

    /// Use this mood score in [0, 1] instead of uploading a clip
    #[clap(long, value_parser = utils::parse_score)]
    pub score: Option<f64>,

    /// How many matching tracks to show: 5, 10, 20 or `all`
    #[clap(long, default_value = "5", value_parser = utils::parse_top_tracks)]
    pub top: utils::TopTracks,
}

#[derive(Parser, Debug, Clone)]
pub struct OpenOptions {
    /// Spotify track id
    pub track_id: String,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    match cli.command {
        Command::Auth(opt) => cli::auth(opt.redirect_url).await,
        Command::Tracks(opt) => cli::tracks(opt.top).await,
        Command::Analyze(opt) => cli::analyze(opt.file, opt.score, opt.top).await,
        Command::Open(opt) => cli::open(opt.track_id).await,
        Command::Health => cli::health().await,
        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
