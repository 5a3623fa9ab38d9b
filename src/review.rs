use chrono::Utc;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};

use crate::config::CONFIG;
use crate::domain::qa::{NewReviewRecord, ReviewRecord};
use crate::domain::schema::github_review;
use crate::error::BotResult;
use crate::github::webhooks::ACTION_LABELED;

/// A QA label applied to (or removed from) a pull request.
#[derive(Clone, Copy, Debug)]
pub struct LabelApplication<'a> {
    pub event: &'a str,
    pub action: &'a str,
    pub repo: &'a str,
    pub sender: &'a str,
    pub title: &'a str,
    pub html_url: &'a str,
    pub label: &'a str,
    pub is_done: bool,
}

/// Check out a connection and record the label event, logging any failure.
/// The webhook response never depends on persistence succeeding: the
/// notification has already gone out by the time this runs.
pub fn persist_label_event(
    pool: &Pool<ConnectionManager<PgConnection>>,
    event: &LabelApplication<'_>,
) {
    let conn = ok_or!(pool.get(), why => {
        error!("unable to check out a DB connection for {}: {:?}", event.html_url, why);
        return;
    });

    ok_or!(record_label_event(&*conn, event),
           why => error!("unable to record review event for {}: {:?}", event.html_url, why));
}

/// Insert or update the review record for a pull request, keyed by its
/// html_url. Read-modify-write without transactional isolation: concurrent
/// deliveries for the same PR can race between the lookup and the write,
/// which is accepted.
pub fn record_label_event(conn: &PgConnection, event: &LabelApplication<'_>) -> BotResult<()> {
    let existing = github_review::table
        .filter(github_review::html_url.eq(event.html_url))
        .order(github_review::id.asc())
        .load::<ReviewRecord>(conn)?;

    if existing.len() > 1 {
        warn!(
            "{} review records exist for {}, updating the oldest",
            existing.len(),
            event.html_url
        );
    }

    let now = Utc::now().naive_utc();

    match existing.first() {
        None => {
            let record = NewReviewRecord {
                event: event.event,
                action: event.action,
                repo: event.repo,
                sender: event.sender,
                title: event.title,
                html_url: event.html_url,
                is_requested: true,
                is_done: event.is_done,
                created_at: now,
                updated_at: now,
            };

            diesel::insert_into(github_review::table)
                .values(&record)
                .execute(conn)?;

            info!("inserted review record for {}", event.html_url);
        }

        Some(record) => match flag_updates(
            event.action,
            event.label,
            &CONFIG.qa_review_label,
            &CONFIG.qa_review_done_label,
        ) {
            Some(FlagUpdate::Requested) => {
                diesel::update(github_review::table.find(record.id))
                    .set((
                        github_review::is_requested.eq(true),
                        github_review::updated_at.eq(now),
                    ))
                    .execute(conn)?;

                info!("review requested again for {}", event.html_url);
            }

            Some(FlagUpdate::Done) => {
                diesel::update(github_review::table.find(record.id))
                    .set((
                        github_review::is_requested.eq(true),
                        github_review::is_done.eq(true),
                        github_review::updated_at.eq(now),
                    ))
                    .execute(conn)?;

                info!("review marked done for {}", event.html_url);
            }

            None => debug!(
                "no review state change for {} \"{}\" on {}",
                event.action, event.label, event.html_url
            ),
        },
    }

    Ok(())
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum FlagUpdate {
    /// `is_requested` becomes true.
    Requested,
    /// `is_requested` and `is_done` both become true.
    Done,
}

// only "labeled" events mutate an existing record; "unlabeled" never
// clears flags
fn flag_updates(
    action: &str,
    label: &str,
    review_label: &str,
    done_label: &str,
) -> Option<FlagUpdate> {
    if action != ACTION_LABELED {
        return None;
    }

    if label == review_label {
        Some(FlagUpdate::Requested)
    } else if label == done_label {
        Some(FlagUpdate::Done)
    } else {
        None
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const REVIEW: &str = "2: QA Review";
    const DONE: &str = "QA Review Done";

    #[test]
    fn labeled_with_review_label_sets_requested() {
        assert_eq!(
            flag_updates("labeled", REVIEW, REVIEW, DONE),
            Some(FlagUpdate::Requested)
        );
    }

    #[test]
    fn labeled_with_done_label_sets_requested_and_done() {
        assert_eq!(
            flag_updates("labeled", DONE, REVIEW, DONE),
            Some(FlagUpdate::Done)
        );
    }

    #[test]
    fn repeated_review_label_stays_requested() {
        // delivering the same event twice keeps converging on the same flags
        let first = flag_updates("labeled", REVIEW, REVIEW, DONE);
        let second = flag_updates("labeled", REVIEW, REVIEW, DONE);
        assert_eq!(first, second);
        assert_eq!(second, Some(FlagUpdate::Requested));
    }

    #[test]
    fn unlabeled_never_mutates() {
        assert_eq!(flag_updates("unlabeled", REVIEW, REVIEW, DONE), None);
        assert_eq!(flag_updates("unlabeled", DONE, REVIEW, DONE), None);
    }

    #[test]
    fn unrelated_labels_never_mutate() {
        assert_eq!(flag_updates("labeled", "bug", REVIEW, DONE), None);
    }

    #[test]
    fn pool_checkout_failure_is_logged_not_raised() {
        use std::time::Duration;

        // nothing listens on port 1, so every checkout times out
        let manager =
            ConnectionManager::<PgConnection>::new("postgres://127.0.0.1:1/unreachable");
        let pool = Pool::builder()
            .max_size(1)
            .connection_timeout(Duration::from_millis(100))
            .build_unchecked(manager);

        let event = LabelApplication {
            event: "pull_request",
            action: "labeled",
            repo: "acme/svc-a",
            sender: "carol",
            title: "Rework frobnicator",
            html_url: "https://github.com/acme/svc-a/pull/7",
            label: REVIEW,
            is_done: false,
        };

        // returning at all is the contract: the caller answers 200 either way
        persist_label_event(&pool, &event);
    }
}
