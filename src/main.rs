use std::io::BufRead;
use std::sync::mpsc;

use anyhow::{Context, Result};

use skycast_ui::controller::Event;
use skycast_ui::{command, Command, Controller, TerminalPresenter};

fn main() -> Result<()> {
    skycast_core::init()?;

    let (config, _validation) = skycast_core::Config::load_validated()?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("skycast-tokio")
        .build()
        .context("Failed to create tokio runtime")?;

    let (tx, rx) = mpsc::channel();

    // Input reader: one producer next to the service tasks. EOF quits.
    let input_tx = tx.clone();
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(_) => break,
            };
            if line.trim().is_empty() {
                continue;
            }
            match command::parse(&line) {
                Ok(command) => {
                    let quit = command == Command::Quit;
                    if input_tx.send(Event::Command(command)).is_err() || quit {
                        break;
                    }
                }
                Err(usage) => eprintln!("{}", usage),
            }
        }
        let _ = input_tx.send(Event::Command(Command::Quit));
    });

    let mut controller = Controller::new(
        &config,
        runtime.handle().clone(),
        tx,
        Box::new(TerminalPresenter::new()),
    )?;

    println!("SkyCast — type 'help' for commands");
    controller.run(&rx)?;

    tracing::info!("SkyCast shutting down");
    Ok(())
}
