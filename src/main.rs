use colored::Colorize;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let command_line_interface = schema_synth::cli::CommandLineInterface::load();
    if let Err(error) = command_line_interface.run() {
        eprintln!("{} {error:#}", "error:".red().bold());
        std::process::exit(1);
    }
}
