mod cli;

use std::process::ExitCode;

use tumble_engine::device::GpuInit;
use tumble_engine::logging::{init_logging, LoggingConfig};
use tumble_engine::scene::SceneConfig;
use tumble_engine::window::{Runtime, RuntimeConfig};

fn main() -> ExitCode {
    init_logging(LoggingConfig::default());

    let args = match cli::parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(err) => {
            eprintln!("{err:#}");
            eprintln!("{}", cli::USAGE);
            return ExitCode::FAILURE;
        }
    };

    let scene = SceneConfig {
        variant: args.variant,
        shaders: args.shaders,
        ..SceneConfig::default()
    };

    match Runtime::run(RuntimeConfig::default(), GpuInit::default(), scene) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
