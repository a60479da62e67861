mod app;
mod cli;
mod gpu;

use std::process::ExitCode;

use clap::Parser;
use winit::event_loop::{ControlFlow, EventLoop};

use crate::app::App;
use crate::cli::LaunchOptions;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let options = LaunchOptions::parse();

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(err) => {
            log::error!("Failed to create event loop: {}", err);
            return ExitCode::FAILURE;
        }
    };
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(options);
    if let Err(err) = event_loop.run_app(&mut app) {
        log::error!("Event loop error: {}", err);
        return ExitCode::FAILURE;
    }

    if app.failed() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
