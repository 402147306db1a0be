//! Leadscope CLI entry point.

fn main() {
    if let Err(e) = leadscope_cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
