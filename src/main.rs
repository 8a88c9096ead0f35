use std::path::PathBuf;

use clap::{
    Parser,
    Subcommand,
    ValueEnum,
};
use wordflash::{
    core::pipeline,
    player,
    speech::{
        Pronouncer,
        SayEngine,
    },
    web,
    Mode,
    Settings,
    WordflashError,
};

#[derive(Parser)]
#[command(version, about = "Shuffled word flashcards from a spreadsheet")]
struct Cli {
    /// Log level: error, warn, info, debug or trace
    #[arg(long, global = true, default_value = "info")]
    log_level: log::LevelFilter,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the flashcard page and upload endpoint (default)
    Serve(ServeArgs),
    /// Play a local word list in the terminal
    Play {
        file: PathBuf,
        #[arg(short, long, value_enum, default_value_t = PlayMode::WordsOnly)]
        mode: PlayMode,
        #[arg(long)]
        interval_ms: Option<u64>,
        /// Skip pronunciation even when a voice is available
        #[arg(long)]
        mute: bool,
    },
}

#[derive(clap::Args, Default)]
struct ServeArgs {
    #[arg(long)]
    host: Option<String>,
    #[arg(short, long)]
    port: Option<u16>,
    #[arg(long)]
    upload_dir: Option<PathBuf>,
    #[arg(long)]
    max_upload_bytes: Option<usize>,
    #[arg(long)]
    interval_ms: Option<u64>,
    /// Write the effective settings back to the settings file
    #[arg(long)]
    save_settings: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum PlayMode {
    WordsOnly,
    WordsWithMeaning,
}

impl From<PlayMode> for Mode {
    fn from(mode: PlayMode) -> Self {
        match mode {
            PlayMode::WordsOnly => Mode::WordsOnly,
            PlayMode::WordsWithMeaning => Mode::WordsWithMeaning,
        }
    }
}

impl ServeArgs {
    fn apply(self, settings: &mut Settings) {
        if let Some(host) = self.host {
            settings.host = host;
        }
        if let Some(port) = self.port {
            settings.port = port;
        }
        if let Some(upload_dir) = self.upload_dir {
            settings.upload_dir = upload_dir;
        }
        if let Some(max) = self.max_upload_bytes {
            settings.max_upload_bytes = max;
        }
        if let Some(interval) = self.interval_ms {
            settings.reveal_interval_ms = interval;
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), WordflashError> {
    let cli = Cli::parse();

    simple_logger::SimpleLogger::new()
        .with_level(cli.log_level)
        .with_colors(true)
        .with_local_timestamps()
        .init()
        .map_err(|e| WordflashError::Custom(format!("Failed to start logger: {}", e)))?;

    let mut settings = Settings::load();

    match cli.command.unwrap_or(Commands::Serve(ServeArgs::default())) {
        Commands::Serve(args) => {
            let save = args.save_settings;
            args.apply(&mut settings);
            if save {
                let path = settings.save()?;
                log::info!("Settings written to {}", path.display());
            }
            web::serve(&settings).await
        }
        Commands::Play { file, mode, interval_ms, mute } => {
            if let Some(interval) = interval_ms {
                settings.reveal_interval_ms = interval;
            }

            let deck = tokio::task::spawn_blocking(move || pipeline::extract_deck(&file))
                .await
                .map_err(|e| WordflashError::Custom(format!("Extraction task failed: {}", e)))??;

            let pronouncer = if mute {
                Pronouncer::silent()
            } else {
                SayEngine::detect()
                    .map(|engine| Pronouncer::new(Box::new(engine)))
                    .unwrap_or_else(Pronouncer::silent)
            };

            player::terminal::run(deck, mode.into(), settings.reveal_interval(), pronouncer).await
        }
    }
}
