use std::path::{Path, PathBuf};

use clap::Parser;
use tracing::info;

use sbk::app::{App, LaunchOptions};
use sbk::config::Config;
use sbk::diary::Diary;
use sbk::error::AppResult;
use sbk::logging;

/// Read a diary as a flip-book in the terminal.
#[derive(Debug, Parser)]
#[command(name = "sbk", version)]
struct Cli {
    /// Diary JSON document.
    diary: PathBuf,
    /// Raw launch query, e.g. `?page=2&preview=true`. Wins over --page/--preview.
    #[arg(long)]
    query: Option<String>,
    /// Open the spread showing this page.
    #[arg(long)]
    page: Option<String>,
    /// Use the tighter preview padding.
    #[arg(long)]
    preview: bool,
    /// Open as the diary's author; unpaid diaries show in preview.
    #[arg(long)]
    author: bool,
    /// Config file instead of the default search path.
    #[arg(long)]
    config: Option<PathBuf>,
}

impl Cli {
    fn launch_query(&self) -> String {
        if let Some(query) = &self.query {
            return query.clone();
        }
        let mut params = Vec::new();
        if let Some(page) = &self.page {
            params.push(format!("page={page}"));
        }
        if self.preview {
            params.push("preview=true".to_string());
        }
        if params.is_empty() {
            String::new()
        } else {
            format!("?{}", params.join("&"))
        }
    }
}

#[tokio::main(flavor = "multi_thread")]
async fn main() {
    if let Err(err) = run(Cli::parse()).await {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> AppResult<()> {
    let config = match &cli.config {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load()?,
    };
    let log_file = logging::init(&config.log)?;

    let diary = load_diary(&cli.diary, cli.author)?;
    let diary_dir = cli
        .diary
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();
    info!(
        diary = %cli.diary.display(),
        log_file = ?log_file,
        "starting viewer"
    );

    let options = LaunchOptions {
        query: cli.launch_query(),
        viewer_is_author: cli.author,
    };
    let mut app = App::new(diary, diary_dir, options, config);
    app.run().await
}

/// An author opening a diary that does not exist yet gets the starter pages.
fn load_diary(path: &Path, author: bool) -> AppResult<Diary> {
    if author && !path.exists() {
        let slug = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        info!(slug = %slug, "opening starter diary");
        return Ok(Diary::starter(slug));
    }
    Diary::load_from_path(path)
}
