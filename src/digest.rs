use std::thread;

use chrono::Local;
use itertools::Itertools;

use crate::config::CONFIG;
use crate::error::BotResult;
use crate::github::models::PullRequestFromJson;
use crate::github::Client;
use crate::mattermost;

/// A pull request awaiting QA review, derived per digest run.
#[derive(Clone, Debug, PartialEq)]
pub struct QaReviewEntry {
    pub repo: String,
    pub author: String,
    pub title: String,
    pub url: String,
    pub milestone: Option<String>,
    pub labels: Vec<String>,
    pub reviewers: Vec<String>,
    pub qa_reviewers: Vec<String>,
}

/// One listing fetch per watched repository, one chat message per
/// repository that answered. A failed repository is logged and skipped,
/// the others still go out. Messages follow the configured list order,
/// not completion order.
pub fn run() -> BotResult<()> {
    let mut handles = Vec::new();

    for repo in &CONFIG.github_watched_repos {
        let worker_repo = repo.clone();
        handles.push((
            repo.clone(),
            thread::spawn(move || Client::new().open_pull_requests(&worker_repo)),
        ));
    }

    for (repo, handle) in handles {
        let prs = match handle.join() {
            Ok(Ok(prs)) => prs,
            Ok(Err(why)) => {
                error!("unable to list open pull requests for {}: {:?}", repo, why);
                continue;
            }
            Err(_) => {
                error!("pull request listing for {} panicked", repo);
                continue;
            }
        };

        let entries = qa_entries(&prs, &repo, &CONFIG.qa_review_label, &CONFIG.github_qa_users);
        info!("{}: {} open PRs, {} for QA review", repo, prs.len(), entries.len());

        let message = digest_message(&repo, prs.len(), &entries);
        ok_or!(mattermost::post_message(&message),
               why => error!("unable to post digest for {}: {:?}", repo, why));
    }

    Ok(())
}

/// PRs carrying the QA label, sorted ascending by the joined QA reviewer
/// logins. The sort is stable, so ties (including entries with no QA
/// reviewer, which sort first) keep their input order.
pub fn qa_entries(
    prs: &[PullRequestFromJson],
    repo: &str,
    qa_label: &str,
    qa_users: &[String],
) -> Vec<QaReviewEntry> {
    let mut entries = prs
        .iter()
        .filter(|pr| pr.label_names().iter().any(|l| l == qa_label))
        .map(|pr| {
            let reviewers = pr.reviewer_logins();
            let qa_reviewers = reviewers
                .iter()
                .filter(|login| qa_users.iter().any(|u| u == *login))
                .cloned()
                .collect();

            QaReviewEntry {
                repo: repo.to_string(),
                author: pr.user.login.clone(),
                title: pr.title.clone(),
                url: pr.html_url.clone(),
                milestone: pr.milestone.as_ref().map(|m| m.title.clone()),
                labels: pr.label_names(),
                reviewers,
                qa_reviewers,
            }
        })
        .collect::<Vec<_>>();

    entries.sort_by_key(|entry| entry.qa_reviewers.concat());
    entries
}

pub fn digest_message(repo: &str, total_open: usize, entries: &[QaReviewEntry]) -> String {
    let lines = entries.iter().map(entry_line).join("\n");
    let date_tag = Local::now().format("%a_%b_%d_%Y");

    format!(
        "\n---\n{repo}\n---\n\nTotal Open PRs: **{total}**\nOpen for QA review: **{qa}**\n\n{lines}\n\n#github_qa_review #{date}\n",
        repo = repo,
        total = total_open,
        qa = entries.len(),
        lines = lines,
        date = date_tag,
    )
}

fn entry_line(entry: &QaReviewEntry) -> String {
    let reviewers = if entry.qa_reviewers.is_empty() {
        // nobody assigned yet, point at the reader
        ":point_up:".to_string()
    } else {
        entry.qa_reviewers.join(", ")
    };

    match entry.milestone {
        Some(ref milestone) => {
            format!("- ({}) [{}]({}) [{}]", reviewers, entry.title, entry.url, milestone)
        }
        None => format!("- ({}) [{}]({})", reviewers, entry.title, entry.url),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::github::models::{GitHubUser, LabelFromJson, MilestoneFromJson, PullRequestFromJson};

    const QA_LABEL: &str = "2: QA Review";

    fn pr(title: &str, labels: &[&str], reviewers: &[&str]) -> PullRequestFromJson {
        PullRequestFromJson {
            user: GitHubUser {
                login: "carol".to_string(),
            },
            title: title.to_string(),
            html_url: format!("https://github.com/acme/svc-a/pull/{}", title.len()),
            labels: labels
                .iter()
                .map(|l| LabelFromJson { name: l.to_string() })
                .collect(),
            milestone: None,
            requested_reviewers: reviewers
                .iter()
                .map(|r| GitHubUser { login: r.to_string() })
                .collect(),
        }
    }

    fn users(logins: &[&str]) -> Vec<String> {
        logins.iter().map(|l| l.to_string()).collect()
    }

    #[test]
    fn qa_count_is_the_number_of_labelled_prs() {
        let prs = vec![
            pr("one", &[QA_LABEL], &["zoe"]),
            pr("two", &["bug"], &[]),
            pr("three", &[QA_LABEL, "bug"], &[]),
        ];

        let entries = qa_entries(&prs, "svc-a", QA_LABEL, &users(&["zoe", "amy"]));
        assert_eq!(entries.len(), 2);

        // independent of reviewer assignment and sort order
        let entries = qa_entries(&prs, "svc-a", QA_LABEL, &users(&[]));
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn entries_sort_by_joined_qa_reviewer_with_unassigned_first() {
        let prs = vec![
            pr("zoe's", &[QA_LABEL], &["zoe"]),
            pr("amy's", &[QA_LABEL], &["amy"]),
            pr("nobody's", &[QA_LABEL], &["outsider"]),
        ];

        let entries = qa_entries(&prs, "svc-a", QA_LABEL, &users(&["amy", "zoe"]));
        let titles = entries.iter().map(|e| e.title.as_str()).collect::<Vec<_>>();
        assert_eq!(titles, vec!["nobody's", "amy's", "zoe's"]);
    }

    #[test]
    fn ties_keep_input_order() {
        let prs = vec![
            pr("first unassigned", &[QA_LABEL], &[]),
            pr("second unassigned", &[QA_LABEL], &[]),
            pr("first for amy", &[QA_LABEL], &["amy"]),
            pr("second for amy", &[QA_LABEL], &["amy"]),
        ];

        let entries = qa_entries(&prs, "svc-a", QA_LABEL, &users(&["amy"]));
        let titles = entries.iter().map(|e| e.title.as_str()).collect::<Vec<_>>();
        assert_eq!(
            titles,
            vec![
                "first unassigned",
                "second unassigned",
                "first for amy",
                "second for amy"
            ]
        );
    }

    #[test]
    fn unassigned_entries_render_a_placeholder() {
        let entry = QaReviewEntry {
            repo: "svc-a".to_string(),
            author: "carol".to_string(),
            title: "Fix login flow".to_string(),
            url: "https://github.com/acme/svc-a/pull/12".to_string(),
            milestone: Some("v1.2".to_string()),
            labels: vec![QA_LABEL.to_string()],
            reviewers: vec![],
            qa_reviewers: vec![],
        };

        assert_eq!(
            entry_line(&entry),
            "- (:point_up:) [Fix login flow](https://github.com/acme/svc-a/pull/12) [v1.2]"
        );
    }

    #[test]
    fn digest_for_watched_repo_with_one_qa_pr() {
        // svc-a returns 2 open PRs, one labelled for QA with reviewers
        // [alice, bob] and QA user set {bob}
        let prs = vec![
            pr("Fix login flow", &[QA_LABEL], &["alice", "bob"]),
            pr("Bump deps", &[], &[]),
        ];

        let entries = qa_entries(&prs, "svc-a", QA_LABEL, &users(&["bob"]));
        let message = digest_message("svc-a", prs.len(), &entries);

        assert!(message.contains("svc-a"));
        assert!(message.contains("Total Open PRs: **2**"));
        assert!(message.contains("Open for QA review: **1**"));
        assert!(message.contains("- (bob) [Fix login flow]("));
        assert!(message.contains("#github_qa_review #"));
    }

    #[test]
    fn milestones_come_from_the_payload() {
        let mut with_milestone = pr("Fix login flow", &[QA_LABEL], &[]);
        with_milestone.milestone = Some(MilestoneFromJson {
            title: "v1.2".to_string(),
        });

        let entries = qa_entries(&[with_milestone], "svc-a", QA_LABEL, &users(&[]));
        assert_eq!(entries[0].milestone.as_deref(), Some("v1.2"));
    }
}
