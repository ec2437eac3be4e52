use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{timeout_at, Instant};

use crate::github::GitHub;
use crate::types::{Category, Error, IssueBatch};

// Fans out one search task per category under a shared deadline and collects
// the batches in completion order; callers recover identity from the category
// tag. Every requested category gets a batch: tasks still outstanding when
// the deadline hits are aborted and reported as DeadlineExceeded.
pub async fn fetch_all<G>(
    github: &Arc<G>,
    login: &str,
    categories: &[Category],
    deadline: Duration,
) -> Vec<IssueBatch>
where
    G: GitHub + 'static,
{
    let deadline = Instant::now() + deadline;
    let (batch_tx, mut batch_rx) = mpsc::channel(categories.len().max(1));
    let mut tasks = Vec::with_capacity(categories.len());

    for &category in categories {
        let github = Arc::clone(github);
        let login = login.to_string();
        let batch_tx = batch_tx.clone();
        let handle = tokio::spawn(async move {
            let query = category.search_query(&login);
            let outcome = github
                .search_issues(&query)
                .await
                .map(|results| results.items);
            // The receiver may already have given up on the deadline.
            let _ = batch_tx.send(IssueBatch { category, outcome }).await;
        });
        tasks.push((category, handle));
    }
    drop(batch_tx);

    let mut batches = Vec::with_capacity(categories.len());
    let mut deadline_hit = false;
    loop {
        match timeout_at(deadline, batch_rx.recv()).await {
            Ok(Some(batch)) => batches.push(batch),
            Ok(None) => break,
            Err(_) => {
                deadline_hit = true;
                for (_, handle) in &tasks {
                    handle.abort();
                }
                break;
            }
        }
    }

    let received: HashSet<Category> = batches.iter().map(|batch| batch.category).collect();
    for (category, _) in tasks {
        if received.contains(&category) {
            continue;
        }
        let outcome = if deadline_hit {
            Err(Error::DeadlineExceeded(category))
        } else {
            Err(Error::Fetch(format!(
                "{category} fetch ended without reporting a result"
            )))
        };
        batches.push(IssueBatch { category, outcome });
    }

    batches
}
