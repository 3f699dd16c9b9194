//! CLI-facing command handlers.
//!
//! Each handler builds its services from a [`Config`](crate::config::Config),
//! runs the matching use case and prints the outcome.

use anyhow::Error;

mod download;
mod list;
mod search;
mod services;
mod status;
mod update;

pub use download::download;
pub use list::{ListFilter, list};
pub use search::{SearchOptions, search};
pub use services::Services;
pub use status::set_status;
pub use update::update;

fn print_transfer_status(cancelled: bool, nothing: bool) {
    if cancelled {
        println!("Downloads cancelled");
    } else if nothing {
        println!("Nothing to download");
    }
}

fn print_failures(failed: &[(String, Error)]) {
    for (name, e) in failed {
        eprintln!("   warning: failed to download {}: {:#}", name, e);
    }
}
