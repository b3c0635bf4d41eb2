use std::io::{self, BufRead, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;

use anyhow::Context;
use ydui_core::{update, AppState, Msg};
use ydui_logging::{ydui_info, ydui_warn};

use super::config::AppConfig;
use super::effects::EffectRunner;
use super::ui::commands::{self, Command};
use super::ui::constants::{CLEAR_SCREEN, TICK_INTERVAL};
use super::ui::render;
use super::{logging, persistence};

pub fn run_app() -> anyhow::Result<()> {
    let config = AppConfig::from_env();
    logging::initialize(config.log_destination);
    ydui_info!(
        "ydui starting server={} state_dir={}",
        config.server,
        config.state_dir.display()
    );

    let (msg_tx, msg_rx) = mpsc::channel::<Msg>();
    let runner = EffectRunner::new(&config, msg_tx.clone()).context("failed to start engine")?;
    let quit = Arc::new(AtomicBool::new(false));

    spawn_input_reader(msg_tx.clone(), quit.clone()).context("failed to start input reader")?;
    thread::Builder::new()
        .name("ydui-tick".to_string())
        .spawn(move || {
            while msg_tx.send(Msg::Tick).is_ok() {
                thread::sleep(TICK_INTERVAL);
            }
        })
        .context("failed to start tick thread")?;

    let mut panel = Panel::new(runner);
    panel.dispatch(Msg::RestoreSettings(persistence::load_settings(
        &config.state_dir,
    )));
    panel.dispatch(Msg::ReloadRequested);
    panel.render()?;

    while let Ok(msg) = msg_rx.recv() {
        if quit.load(Ordering::SeqCst) {
            break;
        }
        let is_tick = matches!(msg, Msg::Tick);
        panel.dispatch(msg);
        if is_tick {
            panel.render()?;
        }
    }

    ydui_info!("ydui shutting down");
    Ok(())
}

/// Owns the panel state between messages. Rendering is coalesced onto ticks.
struct Panel {
    state: AppState,
    runner: EffectRunner,
    needs_render: bool,
}

impl Panel {
    fn new(runner: EffectRunner) -> Self {
        Self {
            state: AppState::new(),
            runner,
            needs_render: true,
        }
    }

    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        self.needs_render |= state.consume_dirty();
        self.state = state;
        self.runner.run(effects);
    }

    fn render(&mut self) -> io::Result<()> {
        if !std::mem::take(&mut self.needs_render) {
            return Ok(());
        }
        let view = self.state.view();
        let mut stdout = io::stdout().lock();
        write!(stdout, "{CLEAR_SCREEN}{}> ", render::render(&view))?;
        stdout.flush()?;

        // An alert is shown once; clearing it needs no redraw of its own.
        if view.alert.is_some() {
            let state = std::mem::take(&mut self.state);
            let (mut state, _) = update(state, Msg::AlertDismissed);
            state.consume_dirty();
            self.state = state;
        }
        Ok(())
    }
}

fn spawn_input_reader(msg_tx: mpsc::Sender<Msg>, quit: Arc<AtomicBool>) -> io::Result<()> {
    thread::Builder::new()
        .name("ydui-input".to_string())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(err) => {
                        ydui_warn!("stdin read failed: {}", err);
                        break;
                    }
                };
                match commands::parse(&line) {
                    Command::Dispatch(msgs) => {
                        for msg in msgs {
                            if msg_tx.send(msg).is_err() {
                                return;
                            }
                        }
                    }
                    Command::Help => println!("{}", commands::HELP),
                    Command::Unknown(text) => {
                        println!("unknown command: {text} (type `help`)");
                    }
                    Command::Quit => break,
                }
            }
            quit.store(true, Ordering::SeqCst);
            let _ = msg_tx.send(Msg::NoOp);
        })?;
    Ok(())
}
