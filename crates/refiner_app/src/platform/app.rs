use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use anyhow::Context;
use log::LevelFilter;
use refiner_core::{update, AppState, Msg, RequestId, SelectedFile};
use refiner_engine::{ApiError, DownloadedArtifact};
use refiner_logging::{refiner_info, refiner_warn, DEFAULT_LOG_FILE};

use super::config::AppConfig;
use super::effects::EffectRunner;
use super::input::{parse_command, submit_msg, Command, HELP_TEXT};
use super::render;
use crate::cli::Cli;

/// Everything the message loop reacts to.
#[derive(Debug)]
pub enum LoopEvent {
    Msg(Msg),
    /// Saved to disk only if its session still waits for it.
    Download {
        request_id: RequestId,
        result: Result<DownloadedArtifact, ApiError>,
    },
    Line(String),
    InputClosed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

pub fn run_app(cli: Cli) -> anyhow::Result<()> {
    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    refiner_logging::initialize(cli.log, level, Path::new(DEFAULT_LOG_FILE));

    let mut config = AppConfig::load(&cli.config)
        .with_context(|| format!("loading configuration from {:?}", cli.config))?;
    config.apply_overrides(&cli);

    if cli.init_config {
        let path = config.save(&cli.config)?;
        println!("Wrote {}", path.display());
        return Ok(());
    }

    refiner_info!(
        "Starting against {} (downloads into {:?})",
        config.base_url,
        config.download_dir
    );

    let (event_tx, event_rx) = mpsc::channel::<LoopEvent>();
    let runner = EffectRunner::new(&config, event_tx.clone())
        .context("starting the request engine")?;
    spawn_input_reader(event_tx.clone());

    // Background tick to throttle rendering of async completions.
    thread::spawn(move || {
        let interval = Duration::from_millis(75);
        while event_tx.send(LoopEvent::Msg(Msg::Tick)).is_ok() {
            thread::sleep(interval);
        }
    });

    let mut shell = Shell::new(runner);
    shell.print_screen();
    shell.prompt();

    while let Ok(event) = event_rx.recv() {
        match event {
            LoopEvent::Msg(Msg::Tick) => {
                shell.dispatch_msg(Msg::Tick);
                if shell.render_if_dirty() {
                    shell.prompt();
                }
            }
            LoopEvent::Msg(msg) => shell.dispatch_msg(msg),
            LoopEvent::Download { request_id, result } => {
                shell.complete_download(request_id, result)
            }
            LoopEvent::Line(line) => {
                if shell.handle_line(&line) == Flow::Quit {
                    break;
                }
                shell.prompt();
            }
            LoopEvent::InputClosed => break,
        }
    }

    refiner_info!("Exiting");
    Ok(())
}

fn spawn_input_reader(tx: mpsc::Sender<LoopEvent>) {
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if tx.send(LoopEvent::Line(line)).is_err() {
                        return;
                    }
                }
                Err(err) => {
                    refiner_warn!("Failed to read from stdin: {}", err);
                    break;
                }
            }
        }
        let _ = tx.send(LoopEvent::InputClosed);
    });
}

/// Owns the application state; all mutation goes through `update`.
struct Shell {
    state: AppState,
    runner: EffectRunner,
}

impl Shell {
    fn new(runner: EffectRunner) -> Self {
        Self {
            state: AppState::new(),
            runner,
        }
    }

    fn dispatch_msg(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        self.runner.enqueue(effects);
    }

    fn complete_download(
        &mut self,
        request_id: RequestId,
        result: Result<DownloadedArtifact, ApiError>,
    ) {
        if let Some(msg) = self.runner.finish_download(&self.state, request_id, result) {
            self.dispatch_msg(msg);
        }
    }

    fn handle_line(&mut self, line: &str) -> Flow {
        match parse_command(line) {
            Command::Dispatch(msg) => self.apply_command(msg),
            Command::Upload(path) => match read_resume(&path) {
                Ok(file) => self.apply_command(Msg::FileSelected(Some(file))),
                Err(err) => {
                    refiner_warn!("Failed to read resume {:?}: {}", path, err);
                    println!("Could not read {}: {err}", path.display());
                }
            },
            Command::Submit => self.apply_command(submit_msg(self.state.page())),
            Command::Help => println!("{HELP_TEXT}"),
            Command::Quit => return Flow::Quit,
            Command::Empty => {}
            Command::Invalid(reason) => println!("{reason}"),
        }
        Flow::Continue
    }

    fn apply_command(&mut self, msg: Msg) {
        self.dispatch_msg(msg);
        if !self.render_if_dirty() {
            println!("Nothing to do here; type `help` for commands.");
        }
    }

    fn render_if_dirty(&mut self) -> bool {
        if !self.state.consume_dirty() {
            return false;
        }
        self.print_screen();
        true
    }

    fn print_screen(&self) {
        print!("\n{}", render::render(&self.state.view()));
    }

    fn prompt(&self) {
        print!("> ");
        let _ = io::stdout().flush();
    }
}

fn read_resume(path: &Path) -> io::Result<SelectedFile> {
    let bytes = fs::read(path)?;
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(SelectedFile::new(name, bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn resume_is_read_with_its_file_name() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cv.pdf");
        fs::write(&path, b"%PDF-1.7").unwrap();

        let file = read_resume(&path).unwrap();
        assert_eq!(file.name, "cv.pdf");
        assert_eq!(file.bytes, b"%PDF-1.7".to_vec());
    }

    #[test]
    fn unreadable_resume_is_an_error() {
        let dir = tempdir().unwrap();
        assert!(read_resume(&dir.path().join("missing.pdf")).is_err());
    }
}
