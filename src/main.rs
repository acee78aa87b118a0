//! `eqt` - equipment inventory tracker
//!
//! Every stock change is recorded in an append-only transaction log.

fn main() {
    if let Err(e) = equipment_tracker::cli::run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
