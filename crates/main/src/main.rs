/*
 * SPDX-FileCopyrightText: 2024 A3Mailer Project
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

use std::process::ExitCode;

use chrono::Utc;
use clap::Parser;
use dump::BackupPlan;
use retention::RetentionPolicy;
use store::{S3Store, StoreConfig};
use tracing::{error, info};

/// Back up MySQL/MariaDB databases to S3-compatible storage and prune old
/// backups with a grandfather-father-son retention policy.
#[derive(Debug, Parser)]
#[command(name = "dbvault", version, about)]
struct Args {
    /// Destination S3 bucket.
    #[arg(short, long)]
    bucket: String,

    /// Destination folder in the bucket.
    #[arg(short, long, default_value = "databases")]
    dest: String,

    /// AWS profile to use.
    #[arg(short, long)]
    profile: String,

    /// MySQL/MariaDB user.
    #[arg(short, long, default_value = "root")]
    user: String,

    /// Databases to exclude, delimited by space.
    #[arg(short, long, default_value = dump::DEFAULT_EXCLUDE)]
    exclude: String,

    /// Output success message if the whole run succeeded.
    #[arg(short, long)]
    output: bool,

    /// Reference date override (YYYY-MM-DD); defaults to today in UTC.
    #[arg(long)]
    date: Option<String>,

    /// Store region override.
    #[arg(long)]
    region: Option<String>,

    /// Custom S3-compatible endpoint; switches to path-style addressing.
    #[arg(long)]
    endpoint: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    match run(Args::parse()).await {
        Ok(code) => code,
        Err(err) => {
            error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> anyhow::Result<ExitCode> {
    let now = Utc::now();
    // A malformed override fails the run before anything is dumped or
    // deleted; no retention decision is possible without a reference date.
    let today = match args.date.as_deref() {
        Some(input) => retention::parse_reference_date(input)?,
        None => now.date_naive(),
    };

    let store = S3Store::connect(&StoreConfig {
        bucket: args.bucket.clone(),
        profile: Some(args.profile.clone()),
        region: args.region.clone(),
        endpoint: args.endpoint.clone(),
    })
    .await?;

    let exclude: Vec<String> = args.exclude.split_whitespace().map(str::to_string).collect();
    let databases = dump::list_databases(&args.user, &exclude).await?;

    let plan = BackupPlan {
        prefix: args.dest.clone(),
        date: today.format(retention::DATE_FORMAT).to_string(),
        time: now.format("%H-%M").to_string(),
        user: args.user.clone(),
    };
    let summary = dump::backup_all(&store, &plan, &databases).await;
    info!(
        "Uploaded {} databases, {} failures",
        summary.uploaded.len(),
        summary.failed.len()
    );

    let keep = RetentionPolicy::default().keep_dates(today);
    let outcome = retention::reconcile(&store, &args.dest, &keep).await?;
    info!(
        "Retained {} folders, deleted {} ({} objects), {} failures",
        outcome.retained.len(),
        outcome.deleted.len(),
        outcome.objects_deleted(),
        outcome.failed.len()
    );

    if summary.is_clean() && outcome.is_clean() {
        if args.output {
            println!("Well done for {}/{}", args.bucket, args.dest);
        }
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn default_exclusions_cover_system_schemas() {
        let args = Args::parse_from(["dbvault", "--bucket", "b", "--profile", "p"]);
        assert_eq!(args.dest, "databases");
        assert_eq!(args.user, "root");
        assert_eq!(
            args.exclude,
            "information_schema performance_schema mysql sys"
        );
        assert!(!args.output);
    }
}
