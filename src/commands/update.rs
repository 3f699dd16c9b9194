use anyhow::Result;

use crate::application::{UpdateReport, UpdateUseCase};
use crate::config::Config;
use crate::runtime::Runtime;

use super::services::Services;
use super::{print_failures, print_transfer_status};

/// Update every mod in the mod list to its newest compatible release
#[tracing::instrument(skip(runtime, config))]
pub async fn update<R: Runtime>(runtime: &R, config: &Config, yes: bool) -> Result<()> {
    let services = Services::from_config(config)?;
    let fetcher = services.fetcher(runtime, config);
    let credentials = services.login_flow(runtime, config);

    let use_case = UpdateUseCase::new(runtime, &services.catalog, &fetcher, &credentials, config);
    let report = use_case.execute(yes).await?;

    print_report(&report, config);
    Ok(())
}

fn print_report(report: &UpdateReport, config: &Config) {
    for name in &report.up_to_date {
        println!("   {} is up to date", name);
    }
    for name in &report.incompatible {
        println!(
            "   {} has no release compatible with game version {}",
            name, config.target
        );
    }
    for name in &report.not_in_catalog {
        println!("   {} is not in the catalog", name);
    }

    print_transfer_status(report.cancelled, report.nothing_to_do());

    for d in &report.updated {
        match d.current {
            Some(current) => println!("   updated {} {} -> {}", d.name, current, d.release.version),
            None => println!("   installed {} {}", d.name, d.release.version),
        }
    }
    print_failures(&report.failed);
}
