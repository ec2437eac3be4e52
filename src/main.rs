mod fetch;
mod github;
mod render;
mod text;
mod types;
mod util;

use std::io::{self, IsTerminal, Write};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use tokio::time::timeout;

use crate::fetch::fetch_all;
use crate::github::{GitHub, RestClient, User};
use crate::render::{render, Styles};
use crate::types::{Category, Error};
use crate::util::gh_auth_token;

const IDENTITY_DEADLINE: Duration = Duration::from_secs(3);
const DEFAULT_FETCH_DEADLINE_SECS: u64 = 10;

#[derive(Parser, Debug)]
#[command(author, version, about = "Open pull requests and review requests at a glance")]
struct Args {
    #[arg(long, default_value_t = DEFAULT_FETCH_DEADLINE_SECS, help = "Deadline for the search requests, in seconds")]
    timeout: u64,
    #[arg(long, help = "Disable colored output")]
    no_color: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let token = gh_auth_token()?;
    let github = Arc::new(RestClient::new(token));

    let styles = if args.no_color || !io::stdout().is_terminal() {
        Styles::plain()
    } else {
        Styles::color()
    };

    let mut stdout = io::stdout().lock();
    run(
        &github,
        &mut stdout,
        &styles,
        Duration::from_secs(args.timeout),
    )
    .await?;

    Ok(())
}

async fn run<G, W>(
    github: &Arc<G>,
    out: &mut W,
    styles: &Styles,
    deadline: Duration,
) -> Result<(), Error>
where
    G: GitHub + 'static,
    W: Write,
{
    let user = resolve_identity(github.as_ref()).await?;
    let mut batches = fetch_all(github, &user.login, &Category::ALL, deadline).await;

    // Every batch is inspected before the first byte of output, so a failed
    // category never leaves a partial report behind.
    let mut tables = Vec::with_capacity(Category::ALL.len());
    for category in Category::ALL {
        let Some(index) = batches.iter().position(|batch| batch.category == category) else {
            return Err(Error::Fetch(format!(
                "no result reported for {category} pull requests"
            )));
        };
        let batch = batches.swap_remove(index);
        tables.push((category, batch.outcome?));
    }

    let now = Utc::now();
    for (category, issues) in tables {
        render(out, styles, category, &user.login, &issues, now)?;
    }

    Ok(())
}

async fn resolve_identity<G: GitHub>(github: &G) -> Result<User, Error> {
    let user = match timeout(IDENTITY_DEADLINE, github.authenticated_user()).await {
        Ok(Ok(user)) => user,
        Ok(Err(err)) => return Err(Error::IdentityResolution(err.to_string())),
        Err(_) => return Err(Error::IdentityResolution("request timed out".to_string())),
    };

    if user.login.trim().is_empty() {
        return Err(Error::IdentityResolution(
            "GitHub returned an empty login".to_string(),
        ));
    }

    Ok(user)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use chrono::Utc;

    use super::run;
    use crate::github::{GitHub, SearchResults, User};
    use crate::render::Styles;
    use crate::types::{Category, Error, Issue};

    enum FakeSearch {
        Issues(Vec<Issue>),
        Fail,
        Hang,
    }

    struct FakeGitHub {
        login: &'static str,
        created: FakeSearch,
        review: FakeSearch,
        search_calls: AtomicUsize,
    }

    impl FakeGitHub {
        fn new(login: &'static str, created: FakeSearch, review: FakeSearch) -> Self {
            Self {
                login,
                created,
                review,
                search_calls: AtomicUsize::new(0),
            }
        }
    }

    impl GitHub for FakeGitHub {
        async fn authenticated_user(&self) -> Result<User, Error> {
            Ok(User {
                login: self.login.to_string(),
            })
        }

        async fn search_issues(&self, query: &str) -> Result<SearchResults, Error> {
            self.search_calls.fetch_add(1, Ordering::SeqCst);
            let search = if query.contains("user-review-requested:") {
                &self.review
            } else {
                &self.created
            };
            match search {
                FakeSearch::Issues(issues) => Ok(SearchResults {
                    items: issues.clone(),
                    ..Default::default()
                }),
                FakeSearch::Fail => Err(Error::Fetch("search exploded".to_string())),
                FakeSearch::Hang => std::future::pending().await,
            }
        }
    }

    fn issue(title: &str, url: &str) -> Issue {
        Issue {
            title: Some(title.to_string()),
            html_url: Some(url.to_string()),
            updated_at: Some(Utc::now()),
        }
    }

    async fn run_to_string(
        github: Arc<FakeGitHub>,
        deadline: Duration,
    ) -> (Result<(), Error>, String) {
        let mut out = Vec::new();
        let result = run(&github, &mut out, &Styles::plain(), deadline).await;
        (result, String::from_utf8(out).unwrap())
    }

    #[tokio::test]
    async fn renders_both_tables_in_canonical_order() {
        let github = Arc::new(FakeGitHub::new(
            "octocat",
            FakeSearch::Issues(vec![
                issue("Mine 1", "https://github.com/acme/widgets/pull/1"),
                issue("Mine 2", "https://github.com/acme/widgets/pull/2"),
            ]),
            FakeSearch::Issues(vec![
                issue("Theirs 1", "https://github.com/acme/gadgets/pull/3"),
                issue("Theirs 2", "https://github.com/acme/gadgets/pull/4"),
            ]),
        ));

        let (result, out) = run_to_string(github, Duration::from_secs(5)).await;
        result.unwrap();

        let created = out.find("Pull Requests Created by octocat").unwrap();
        let review = out.find("Review Requests for octocat").unwrap();
        assert!(created < review);
        for url in [
            "https://github.com/acme/widgets/pull/1",
            "https://github.com/acme/widgets/pull/2",
            "https://github.com/acme/gadgets/pull/3",
            "https://github.com/acme/gadgets/pull/4",
        ] {
            assert!(out.contains(url), "missing {url} in output");
        }
    }

    #[tokio::test]
    async fn failed_category_aborts_before_any_rendering() {
        let github = Arc::new(FakeGitHub::new(
            "octocat",
            FakeSearch::Issues(vec![issue(
                "Mine",
                "https://github.com/acme/widgets/pull/1",
            )]),
            FakeSearch::Fail,
        ));

        let (result, out) = run_to_string(github, Duration::from_secs(5)).await;
        assert!(matches!(result, Err(Error::Fetch(_))));
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn empty_login_fails_before_any_search_call() {
        let github = Arc::new(FakeGitHub::new(
            "",
            FakeSearch::Issues(Vec::new()),
            FakeSearch::Issues(Vec::new()),
        ));

        let (result, out) = run_to_string(Arc::clone(&github), Duration::from_secs(5)).await;
        assert!(matches!(result, Err(Error::IdentityResolution(_))));
        assert!(out.is_empty());
        assert_eq!(github.search_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn stalled_category_surfaces_deadline_exceeded() {
        let github = Arc::new(FakeGitHub::new(
            "octocat",
            FakeSearch::Hang,
            FakeSearch::Issues(vec![issue(
                "Theirs",
                "https://github.com/acme/gadgets/pull/3",
            )]),
        ));

        let (result, out) = run_to_string(github, Duration::from_secs(1)).await;
        assert!(matches!(
            result,
            Err(Error::DeadlineExceeded(Category::Created))
        ));
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn empty_result_sets_still_render_both_sections() {
        let github = Arc::new(FakeGitHub::new(
            "octocat",
            FakeSearch::Issues(Vec::new()),
            FakeSearch::Issues(Vec::new()),
        ));

        let (result, out) = run_to_string(github, Duration::from_secs(5)).await;
        result.unwrap();
        assert!(out.contains("Pull Requests Created by octocat"));
        assert!(out.contains("Review Requests for octocat"));
        assert_eq!(out.matches("No pull requests found").count(), 2);
    }
}
