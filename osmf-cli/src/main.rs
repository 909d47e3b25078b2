//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

use osmf_cli::CliError;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    if let Err(err) = osmf_cli::run() {
        if let CliError::ArgumentParsing(parse) = &err {
            // Help and version requests are reported through clap.
            parse.exit();
        }
        eprintln!("osmf: {err}");
        std::process::exit(1);
    }
}
