use async_std::{
    io::{BufReader, prelude::BufReadExt, stdin},
    stream::StreamExt,
};
use core_types::events::DeletionEvent;
use service::{
    error::Error,
    staging_store::SharedStagingStore,
    triage_service::{CommitOutcome, TriageService},
    triage_session::{SessionState, SwipeOutcome},
};

use crate::command::{Command, HELP, parse_command};

/// Reads commands from stdin and applies them until the user quits or input ends.
pub async fn run_review(
    mut service: TriageService,
    deletion_events: flume::Receiver<DeletionEvent>,
) -> Result<(), Error> {
    print_current(&service).await;

    let mut lines = BufReader::new(stdin()).lines();
    while let Some(line) = lines.next().await {
        let line = line.map_err(|e| Error::InvalidInput(e.to_string()))?;
        if line.trim().is_empty() {
            continue;
        }

        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(message) => {
                println!("{}", message);
                continue;
            }
        };

        match command {
            Command::Quit => break,
            Command::Help => println!("{}", HELP),
            Command::Swipe(distance) => {
                let outcome = service.swipe(distance).await;
                report_swipe(&service, outcome).await;
            }
            Command::Keep => {
                let outcome = service.apply(SwipeOutcome::Keep).await;
                report_swipe(&service, outcome).await;
            }
            Command::Delete => {
                let outcome = service.apply(SwipeOutcome::Delete).await;
                report_swipe(&service, outcome).await;
            }
            Command::Bin => print_bin(&service.staging_store()).await,
            Command::Select(index) => match bin_entry(&service.staging_store(), index).await {
                Some(id) => {
                    service.toggle_selection(&id).await;
                    print_bin(&service.staging_store()).await;
                }
                None => println!("No bin entry {}", index),
            },
            Command::SelectAll => {
                service.select_all().await;
                print_bin(&service.staging_store()).await;
            }
            Command::ClearSelection => {
                service.clear_selection().await;
                print_bin(&service.staging_store()).await;
            }
            Command::Restore(Some(index)) => {
                match bin_entry(&service.staging_store(), index).await {
                    Some(id) => {
                        service.restore(&id).await;
                        println!("Restored {}", id);
                    }
                    None => println!("No bin entry {}", index),
                }
            }
            Command::Restore(None) => {
                let restored = service.restore_selected().await;
                println!("Restored {} photos", restored);
            }
            Command::Commit => {
                let selected = service.staging_store().read().await.selected_count();
                if selected == 0 {
                    println!("Nothing selected to delete");
                    continue;
                }
                match service.commit_selected().await {
                    Ok(outcome) => println!("{}", commit_message(selected, outcome)),
                    Err(e) => println!("{}. The bin was left unchanged.", e),
                }
                for event in deletion_events.drain() {
                    tracing::debug!("Deletion event: {:?}", event);
                }
            }
            Command::Status => print_status(&service).await,
            Command::Reset => {
                service.reset();
                print_current(&service).await;
            }
        }
    }

    print_status(&service).await;
    Ok(())
}

/// Describes a finished commit of `selected` bin entries.
fn commit_message(selected: usize, outcome: CommitOutcome) -> String {
    match outcome {
        CommitOutcome::Blocked => "Deleting from the bin needs a subscription".to_string(),
        CommitOutcome::Committed(deleted) if deleted == selected => {
            format!("Deleted {} photos", deleted)
        }
        CommitOutcome::Committed(deleted) => format!(
            "Deleted {} photos, {} were already gone from the library and left the bin",
            deleted,
            selected.saturating_sub(deleted)
        ),
    }
}

async fn report_swipe(service: &TriageService, outcome: SwipeOutcome) {
    match outcome {
        SwipeOutcome::Keep => println!("Kept"),
        SwipeOutcome::Delete => println!("Moved to bin"),
        SwipeOutcome::Cancel => {
            if service.current_photo().is_some() {
                println!("Cancelled");
            }
        }
    }
    print_current(service).await;
}

async fn print_current(service: &TriageService) {
    match service.state() {
        SessionState::InProgress => {
            if let Some(photo) = service.current_photo() {
                let progress = service.progress().await;
                println!(
                    "[{}/{}] {} ({})",
                    progress.reviewed + 1,
                    progress.total,
                    photo.id,
                    photo.created_at.format("%Y-%m-%d %H:%M")
                );
            }
        }
        SessionState::Complete => {
            println!("All photos reviewed. Type bin to see the bin, reset to start again.")
        }
        SessionState::EmptyCatalog => println!("No photos to review."),
        SessionState::NotAuthorized => println!("No access to the photo library."),
        SessionState::NotStarted => println!("Session not started."),
    }
}

async fn print_status(service: &TriageService) {
    let progress = service.progress().await;
    println!(
        "Reviewed {} of {}, {} remaining, {} in the bin",
        progress.reviewed, progress.total, progress.remaining, progress.staged
    );
}

async fn bin_entry(staging_store: &SharedStagingStore, index: usize) -> Option<core_types::PhotoId> {
    let store = staging_store.read().await;
    store
        .entries()
        .get(index.checked_sub(1)?)
        .map(|entry| entry.id.clone())
}

async fn print_bin(staging_store: &SharedStagingStore) {
    let store = staging_store.read().await;
    if store.is_empty() {
        println!("The bin is empty");
        return;
    }
    for (index, entry) in store.entries().iter().enumerate() {
        let marker = if store.is_selected(&entry.id) { "x" } else { " " };
        println!("{:>3} [{}] {}", index + 1, marker, entry.id);
    }
    println!(
        "{} of {} selected{}",
        store.selected_count(),
        store.count(),
        if store.is_all_selected() { " (all)" } else { "" }
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commit_message() {
        assert_eq!(
            commit_message(2, CommitOutcome::Committed(2)),
            "Deleted 2 photos"
        );
        assert_eq!(
            commit_message(3, CommitOutcome::Committed(0)),
            "Deleted 0 photos, 3 were already gone from the library and left the bin"
        );
        assert_eq!(
            commit_message(1, CommitOutcome::Blocked),
            "Deleting from the bin needs a subscription"
        );
    }
}
