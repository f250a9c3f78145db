use colored::Colorize;

use astgen::cli::{CommandLineInterface, Outcome};

fn main() {
    let command_line_interface = CommandLineInterface::load();
    simple_logger::SimpleLogger::new()
        .with_level(command_line_interface.log.to_level_filter())
        .init()
        .expect("logger is only installed once");

    match command_line_interface.run() {
        Ok(Outcome::Done) => {}
        Ok(Outcome::Stale(paths)) => {
            for path in &paths {
                eprintln!("{} {}", "stale:".yellow().bold(), path.display());
            }
            std::process::exit(2);
        }
        Err(error) => {
            eprintln!("{} {error:#}", "error:".red().bold());
            std::process::exit(1);
        }
    }
}
