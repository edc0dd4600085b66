mod command;
mod logging;
mod review;

use std::{path::PathBuf, sync::Arc};

use async_std::task;
use clap::{Parser, Subcommand};
use core_types::SortOrder;
use photo_catalog::{DirectoryPhotoCatalog, PhotoCatalogOps};
use service::{
    app_services::{AppServices, create_app_services},
    entitlement::AlwaysGranted,
    photo_groups::find_group,
    triage_service::TriageService,
};

#[derive(Parser, Debug)]
#[command(name = "swipely", about = "Review photos one at a time and clear out the ones you don't want")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Review the photos in a directory
    Review {
        /// Directory holding the photos
        directory: PathBuf,

        /// Drag distance needed before a swipe counts, overrides the saved value
        #[arg(long)]
        threshold: Option<f64>,

        /// Review order (newest or oldest), overrides the saved value
        #[arg(long)]
        sort: Option<SortOrder>,

        /// Only review one month, e.g. 2025-04
        #[arg(long)]
        group: Option<String>,

        /// Do not limit free deletions
        #[arg(long)]
        no_paywall: bool,
    },
    /// List the photos in a directory grouped by month
    Groups {
        directory: PathBuf,
    },
    /// Show or change saved settings
    Settings {
        #[command(subcommand)]
        action: Option<SettingsAction>,
    },
    /// Subscription status and purchases
    Pro {
        #[command(subcommand)]
        action: Option<ProAction>,
    },
}

#[derive(Subcommand, Debug)]
enum SettingsAction {
    Threshold { value: f64 },
    Sort { order: SortOrder },
    ResetOnboarding,
    DeveloperMode {
        #[arg(action = clap::ArgAction::Set)]
        enabled: bool,
    },
}

#[derive(Subcommand, Debug)]
enum ProAction {
    /// Buy a plan (monthly or yearly)
    Purchase { plan: String },
    Restore,
    /// Clear the free deletion counter (developer mode only)
    ResetCount,
    /// Drop the pro flag (developer mode only)
    ResetPro,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _log_guard = logging::init_logging();
    let args = Cli::parse();

    task::block_on(async {
        let services = create_app_services().await?;
        match args.command {
            Commands::Review {
                directory,
                threshold,
                sort,
                group,
                no_paywall,
            } => {
                start_review(&services, directory, threshold, sort, group, no_paywall).await?;
            }
            Commands::Groups { directory } => {
                let catalog: Arc<dyn PhotoCatalogOps> =
                    Arc::new(DirectoryPhotoCatalog::new(directory));
                let service = TriageService::new(services.app_context(catalog).await?);
                for group in service.photo_groups().await? {
                    println!("{}  {:<16} {} photos", group.key(), group.label(), group.len());
                }
            }
            Commands::Settings { action } => settings(&services, action).await?,
            Commands::Pro { action } => pro(&services, action).await?,
        }
        Ok::<(), Box<dyn std::error::Error>>(())
    })
}

async fn start_review(
    services: &AppServices,
    directory: PathBuf,
    threshold: Option<f64>,
    sort: Option<SortOrder>,
    group: Option<String>,
    no_paywall: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let settings_service = services.settings();
    let catalog: Arc<dyn PhotoCatalogOps> = Arc::new(DirectoryPhotoCatalog::new(directory));
    let mut context = services.app_context(catalog).await?;

    if !context.settings.onboarding_complete {
        println!("Swipe right to keep a photo, left to move it to the bin.");
        println!("Nothing is deleted until you commit from the bin. Type help for commands.");
        settings_service.complete_onboarding().await?;
    }
    if let Some(sort) = sort {
        context.settings.sort_order = sort;
    }
    if no_paywall {
        context.entitlement_gate = Arc::new(AlwaysGranted);
    } else if let Some(remaining) = services.pro_access().remaining_free_deletions().await? {
        println!("{} free deletions left", remaining);
    }

    let (deletion_tx, deletion_rx) = flume::unbounded();
    let mut service = TriageService::new(context).with_deletion_events(deletion_tx);
    if let Some(threshold) = threshold {
        service.set_swipe_threshold(threshold)?;
    }

    service.start_session().await?;

    if let Some(key) = group {
        let groups = service.photo_groups().await?;
        let Some(selected) = find_group(&groups, &key) else {
            return Err(format!("No photos taken in {}", key).into());
        };
        service.load_group(selected);
        settings_service.set_has_selected_photo_group(true).await?;
    }

    review::run_review(service, deletion_rx).await?;
    Ok(())
}

async fn settings(
    services: &AppServices,
    action: Option<SettingsAction>,
) -> Result<(), Box<dyn std::error::Error>> {
    let settings_service = services.settings();
    match action {
        None => {
            let settings = settings_service.load_settings().await?;
            println!("onboarding complete: {}", settings.onboarding_complete);
            println!("swipe threshold:     {}", settings.swipe_threshold);
            println!("sort order:          {}", settings.sort_order);
            println!("group selected:      {}", settings.has_selected_photo_group);
            println!("developer mode:      {}", settings.developer_mode);
        }
        Some(SettingsAction::Threshold { value }) => {
            settings_service.set_swipe_threshold(value).await?
        }
        Some(SettingsAction::Sort { order }) => settings_service.set_sort_order(order).await?,
        Some(SettingsAction::ResetOnboarding) => settings_service.reset_onboarding().await?,
        Some(SettingsAction::DeveloperMode { enabled }) => {
            settings_service.set_developer_mode(enabled).await?
        }
    }
    Ok(())
}

async fn pro(
    services: &AppServices,
    action: Option<ProAction>,
) -> Result<(), Box<dyn std::error::Error>> {
    let gate = services.pro_access();
    let developer_mode = services.settings().load_settings().await?.developer_mode;

    match action {
        None => {
            match gate.remaining_free_deletions().await? {
                None => println!("Pro is active"),
                Some(remaining) => println!(
                    "Free plan, {} deletions used, {} left",
                    gate.deletion_count().await?,
                    remaining
                ),
            }
            for plan in gate.offerings() {
                println!("  {:<8} {} {}", plan.identifier, plan.title, plan.price);
            }
        }
        Some(ProAction::Purchase { plan }) => {
            if gate.purchase(&plan).await? {
                println!("Pro is active");
            }
        }
        Some(ProAction::Restore) => {
            if gate.restore_purchases().await? {
                println!("Purchase restored, pro is active");
            } else {
                println!("No purchase to restore");
            }
        }
        Some(ProAction::ResetCount | ProAction::ResetPro) if !developer_mode => {
            return Err("Enable developer mode first: swipely settings developer-mode true".into());
        }
        Some(ProAction::ResetCount) => gate.reset_deletion_count().await?,
        Some(ProAction::ResetPro) => gate.reset_pro_status().await?,
    }
    Ok(())
}
