use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use tinyvi::{config::Config, editor::Editor, event_loop, logger, terminal::Terminal};

/// 端末で動く小さなモーダルエディタ
#[derive(Parser)]
#[command(name = "tinyvi")]
#[command(version)]
#[command(about = "A small modal text editor for the terminal", long_about = None)]
struct Cli {
    /// 編集するファイル (存在しなければ新規作成)
    file: Option<String>,

    /// 設定ファイル (デフォルトは ~/.config/tinyvi/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// ログの出力先 (設定ファイルの log_file より優先)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

/// panic 時にカーソルを戻してからメッセージを出す
fn setup_panic_hook() {
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        tracing::error!(%info, "panic");
        let _ = write!(io::stderr(), "{}", termion::cursor::Show);
        let _ = io::stderr().flush();
        default_panic(info);
    }));
}

fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load(cli.config.as_deref()).context("failed to load config")?;
    if let Some(log_file) = cli.log_file {
        config.log_file = Some(log_file);
    }
    let _log_guard = logger::init(config.log_file.as_deref())?;

    let mut terminal = Terminal::new()?;
    let size = terminal.size();
    let mut editor = match cli.file {
        Some(filename) => Editor::open(filename.clone(), size, config)
            .with_context(|| format!("failed to open {filename}"))?,
        None => Editor::new(size, config),
    };

    let stdin = io::stdin();
    event_loop::run(&mut editor, stdin.lock(), terminal.stdout())?;
    Ok(())
}

fn main() {
    setup_panic_hook();
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("tinyvi: {e:#}");
        std::process::exit(1);
    }
}
