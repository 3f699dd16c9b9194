use anyhow::Result;

use crate::application::{DownloadReport, DownloadUseCase};
use crate::config::Config;
use crate::runtime::Runtime;

use super::services::Services;
use super::{print_failures, print_transfer_status};

/// Download the named packages and add them to the mod list
#[tracing::instrument(skip(runtime, config))]
pub async fn download<R: Runtime>(
    runtime: &R,
    config: &Config,
    names: &[String],
    yes: bool,
) -> Result<()> {
    let services = Services::from_config(config)?;
    let fetcher = services.fetcher(runtime, config);
    let credentials = services.login_flow(runtime, config);

    let use_case = DownloadUseCase::new(runtime, &services.catalog, &fetcher, &credentials, config);
    let report = use_case.execute(names, yes).await?;

    print_report(&report, config);
    Ok(())
}

fn print_report(report: &DownloadReport, config: &Config) {
    for name in &report.not_in_catalog {
        println!("   {} was not found in the catalog", name);
    }
    for name in &report.incompatible {
        println!(
            "   {} has no release compatible with game version {}",
            name, config.target
        );
    }

    let nothing = report.downloaded.is_empty() && report.failed.is_empty();
    print_transfer_status(report.cancelled, nothing);

    for d in &report.downloaded {
        println!("   downloaded {} {}", d.name, d.release.version);
    }
    print_failures(&report.failed);
}
