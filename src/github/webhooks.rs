use std::io::Read;

use hex::FromHex;
use openssl::hash::MessageDigest;
use openssl::memcmp;
use openssl::pkey::PKey;
use openssl::sign::Signer;
use rocket::data::{self, FromDataSimple};
use rocket::http::Status;
use rocket::{Data, Outcome, Request};

use crate::config::CONFIG;
use crate::error::{BotError, BotResult};
use crate::github::models::{GitHubUser, LabelFromJson, PullRequestFromJson};
use crate::github::Client;
use crate::mattermost;
use crate::review::{self, LabelApplication};
use crate::DB_POOL;

pub const GITHUB_EVENT_PULLS: &str = "pull_request";
pub const ACTION_LABELED: &str = "labeled";
pub const ACTION_UNLABELED: &str = "unlabeled";

// GitHub caps webhook payloads at 25MB
const BODY_LIMIT: u64 = 25 * 1024 * 1024;

#[derive(Debug)]
pub struct Event {
    pub delivery_id: String,
    pub event_name: String,
    pub payload: Payload,
}

#[derive(Debug)]
pub enum Payload {
    PullRequest(PullRequestEvent),
    Unsupported,
}

#[derive(Debug, Deserialize)]
pub struct PullRequestEvent {
    pub action: String,
    pub number: i32,
    pub repository: Repository,
    pub sender: GitHubUser,
    pub label: Option<LabelFromJson>,
    pub pull_request: PullRequestFromJson,
}

#[derive(Debug, Deserialize)]
pub struct Repository {
    pub full_name: String,
}

impl FromDataSimple for Event {
    type Error = &'static str;

    fn from_data(request: &Request<'_>, data: Data) -> data::Outcome<Self, Self::Error> {
        let headers = request.headers();

        // each presence check short-circuits before the HMAC is ever computed
        let secret = match CONFIG.github_webhook_secret {
            Some(ref secret) => secret,
            None => {
                error!("no webhook secret configured, rejecting delivery");
                return Outcome::Failure((Status::Unauthorized, "no webhook secret configured"));
            }
        };

        let signature = match headers.get_one("X-Hub-Signature") {
            Some(sig) => sig.to_string(),
            None => {
                return Outcome::Failure((
                    Status::Unauthorized,
                    "No X-Hub-Signature found on request",
                ));
            }
        };

        let event_name = match headers.get_one("X-GitHub-Event") {
            Some(event) => event.to_string(),
            None => {
                return Outcome::Failure((
                    Status::UnprocessableEntity,
                    "No X-GitHub-Event found on request",
                ));
            }
        };

        let delivery_id = match headers.get_one("X-GitHub-Delivery") {
            Some(id) => id.to_string(),
            None => {
                return Outcome::Failure((
                    Status::Unauthorized,
                    "No X-GitHub-Delivery found on request",
                ));
            }
        };

        let mut body = String::new();
        if let Err(why) = data.open().take(BODY_LIMIT).read_to_string(&mut body) {
            error!("unable to read webhook body: {:?}", why);
            return Outcome::Failure((Status::InternalServerError, "unable to read request body"));
        }

        if !authenticate(secret, &body, &signature) {
            warn!("invalid signature on delivery {}", delivery_id);
            return Outcome::Failure((
                Status::Unauthorized,
                "X-Hub-Signature doesn't match the request body",
            ));
        }

        let payload = match parse_event(&event_name, &body) {
            Ok(payload) => payload,
            Err(why) => {
                error!("unable to parse {} payload: {:?}", event_name, why);
                return Outcome::Failure((
                    Status::UnprocessableEntity,
                    "unable to parse event payload",
                ));
            }
        };

        info!("Received valid webhook ({} id {})", event_name, delivery_id);

        Outcome::Success(Event {
            delivery_id,
            event_name,
            payload,
        })
    }
}

/// Accepts iff `signature` equals `sha1=` + hex(HMAC-SHA1(secret, payload)).
pub fn authenticate(secret: &str, payload: &str, signature: &str) -> bool {
    // https://developer.github.com/webhooks/securing/#validating-payloads-from-github
    if !signature.starts_with("sha1=") {
        return false;
    }

    let sigbytes = ok_or!(Vec::from_hex(&signature["sha1=".len()..]), return false);
    let computed = ok_or!(hmac_sha1(secret.as_bytes(), payload.as_bytes()), return false);

    // constant time comparison
    sigbytes.len() == computed.len() && memcmp::eq(&computed, &sigbytes)
}

pub(crate) fn hmac_sha1(key: &[u8], data: &[u8]) -> Result<Vec<u8>, openssl::error::ErrorStack> {
    let key = PKey::hmac(key)?;
    let mut signer = Signer::new(MessageDigest::sha1(), &key)?;
    signer.update(data)?;
    signer.sign_to_vec()
}

fn parse_event(event_name: &str, body: &str) -> BotResult<Payload> {
    match event_name {
        GITHUB_EVENT_PULLS => {
            let de = &mut serde_json::Deserializer::from_str(body);
            match serde_path_to_error::deserialize(de) {
                Ok(payload) => Ok(Payload::PullRequest(payload)),
                Err(why) => {
                    error!("invalid pull_request payload at {}: {}", why.path(), why);
                    throw!(BotError::Misc(Some(why.to_string())))
                }
            }
        }

        _ => {
            info!("Received {} event, ignoring...", event_name);
            Ok(Payload::Unsupported)
        }
    }
}

/// QA label changes on watched repositories: notify the chat webhook and
/// track the review state. Anything else is acknowledged and dropped.
pub fn handle_pull_request(event: PullRequestEvent) -> BotResult<()> {
    if event.action != ACTION_LABELED && event.action != ACTION_UNLABELED {
        return Ok(());
    }

    let repo = &event.repository.full_name;
    if !CONFIG.qualified_repos().iter().any(|watched| watched == repo) {
        debug!("{} is not watched, ignoring", repo);
        return Ok(());
    }

    let label = match event.label {
        Some(ref label) => label.name.clone(),
        None => return Ok(()),
    };

    if label != CONFIG.qa_review_label && label != CONFIG.qa_review_done_label {
        return Ok(());
    }

    let is_done = label == CONFIG.qa_review_done_label;
    info!("{} \"{}\" on {}#{}", event.action, label, repo, event.number);

    // a finished review carries a summary of the tests the diff touched;
    // a failed fetch degrades to a notification without one
    let tests = if event.action == ACTION_LABELED && is_done {
        match Client::new().pull_request_diff(repo, event.number) {
            Ok(diff) => Some(classify_changed_files(
                &changed_files(&diff),
                &CONFIG.test_file_marker,
                &CONFIG.spec_file_marker,
            )),
            Err(why) => {
                error!("unable to fetch diff for {}#{}: {:?}", repo, event.number, why);
                None
            }
        }
    } else {
        None
    };

    let message = label_notification(&event, is_done, tests.as_ref());
    ok_or!(mattermost::post_message(&message),
           why => error!("unable to post notification for {}#{}: {:?}", repo, event.number, why));

    if let Some(ref pool) = *DB_POOL {
        let record = LabelApplication {
            event: GITHUB_EVENT_PULLS,
            action: &event.action,
            repo,
            sender: &event.sender.login,
            title: &event.pull_request.title,
            html_url: &event.pull_request.html_url,
            label: &label,
            is_done,
        };
        review::persist_label_event(pool, &record);
    }

    Ok(())
}

/// Changed file paths in a unified diff (the `+++ b/` side; deletions
/// show up as `+++ /dev/null` and are skipped).
pub fn changed_files(diff: &str) -> Vec<String> {
    diff.lines()
        .filter_map(|line| line.strip_prefix("+++ b/"))
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Default, PartialEq)]
pub struct ChangedTests {
    pub unit: Vec<String>,
    pub e2e: Vec<String>,
}

pub fn classify_changed_files(paths: &[String], test_marker: &str, spec_marker: &str) -> ChangedTests {
    let mut tests = ChangedTests::default();

    for path in paths {
        if path.contains(test_marker) {
            tests.unit.push(path.clone());
        }
        if path.contains(spec_marker) {
            tests.e2e.push(path.clone());
        }
    }

    tests
}

fn label_notification(
    event: &PullRequestEvent,
    is_done: bool,
    tests: Option<&ChangedTests>,
) -> String {
    let emoji = if event.action == ACTION_LABELED && is_done {
        ":clap: "
    } else {
        ""
    };

    let tag = match (event.action.as_str(), is_done) {
        (ACTION_LABELED, false) => "#github_qa_review_request",
        (ACTION_LABELED, true) => "#github_qa_review_done",
        _ => "#github_qa_review_removed",
    };

    let mut message = format!(
        "\n##### {}[{}]({})\n\n[{}] {} by {}\n",
        emoji,
        event.pull_request.title,
        event.pull_request.html_url,
        event.repository.full_name,
        tag,
        event.sender.login,
    );

    if let Some(tests) = tests {
        message.push_str(&format!(
            "\nUnit test files changed: **{}**\nE2E spec files changed: **{}**\n",
            tests.unit.len(),
            tests.e2e.len(),
        ));
    }

    message
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::github::models::{GitHubUser, LabelFromJson, PullRequestFromJson};

    const SECRET: &str = "hunter2";
    const BODY: &str = r#"{"action":"labeled","number":1}"#;

    fn sign(secret: &str, body: &str) -> String {
        format!(
            "sha1={}",
            hex::encode(hmac_sha1(secret.as_bytes(), body.as_bytes()).unwrap())
        )
    }

    #[test]
    fn signature_accepts_only_exact_match() {
        let sig = sign(SECRET, BODY);
        assert!(authenticate(SECRET, BODY, &sig));

        // a single changed byte in body or secret flips the result
        let mutated_body = BODY.replace("labeled", "laBeled");
        assert!(!authenticate(SECRET, &mutated_body, &sig));
        assert!(!authenticate("hunter3", BODY, &sig));
    }

    #[test]
    fn signature_requires_sha1_prefix_and_valid_hex() {
        assert!(!authenticate(SECRET, BODY, ""));
        assert!(!authenticate(SECRET, BODY, "sha256=deadbeef"));
        assert!(!authenticate(SECRET, BODY, "sha1=nothexatall"));
        // valid hex of the wrong length never matches
        assert!(!authenticate(SECRET, BODY, "sha1=deadbeef"));
    }

    const DIFF: &str = "\
diff --git a/src/app.js b/src/app.js
index 83db48f..bf269f4 100644
--- a/src/app.js
+++ b/src/app.js
@@ -1,3 +1,4 @@
+const x = 1;
diff --git a/src/app.test.js b/src/app.test.js
--- a/src/app.test.js
+++ b/src/app.test.js
diff --git a/e2e/login.spec.js b/e2e/login.spec.js
--- /dev/null
+++ b/e2e/login.spec.js
diff --git a/src/old.js b/src/old.js
--- a/src/old.js
+++ /dev/null
";

    #[test]
    fn changed_files_come_from_the_b_side() {
        assert_eq!(
            changed_files(DIFF),
            vec!["src/app.js", "src/app.test.js", "e2e/login.spec.js"]
        );
    }

    #[test]
    fn changed_files_classify_by_marker() {
        let tests = classify_changed_files(&changed_files(DIFF), ".test.", ".spec.");
        assert_eq!(tests.unit, vec!["src/app.test.js"]);
        assert_eq!(tests.e2e, vec!["e2e/login.spec.js"]);
    }

    fn event(action: &str) -> PullRequestEvent {
        PullRequestEvent {
            action: action.to_string(),
            number: 7,
            repository: Repository {
                full_name: "acme/svc-a".to_string(),
            },
            sender: GitHubUser {
                login: "carol".to_string(),
            },
            label: Some(LabelFromJson {
                name: "QA Review Done".to_string(),
            }),
            pull_request: PullRequestFromJson {
                user: GitHubUser {
                    login: "carol".to_string(),
                },
                title: "Rework frobnicator".to_string(),
                html_url: "https://github.com/acme/svc-a/pull/7".to_string(),
                labels: vec![],
                milestone: None,
                requested_reviewers: vec![],
            },
        }
    }

    #[test]
    fn done_notification_has_emoji_tag_and_test_counts() {
        let tests = ChangedTests {
            unit: vec!["src/app.test.js".to_string()],
            e2e: vec![],
        };
        let message = label_notification(&event(ACTION_LABELED), true, Some(&tests));

        assert!(message.contains(":clap:"));
        assert!(message.contains("#github_qa_review_done"));
        assert!(message.contains("[Rework frobnicator](https://github.com/acme/svc-a/pull/7)"));
        assert!(message.contains("[acme/svc-a]"));
        assert!(message.contains("by carol"));
        assert!(message.contains("Unit test files changed: **1**"));
        assert!(message.contains("E2E spec files changed: **0**"));
    }

    #[test]
    fn request_notification_is_plain() {
        let message = label_notification(&event(ACTION_LABELED), false, None);

        assert!(!message.contains(":clap:"));
        assert!(message.contains("#github_qa_review_request"));
        assert!(!message.contains("test files changed"));
    }

    #[test]
    fn removal_notification_uses_removed_tag() {
        let message = label_notification(&event(ACTION_UNLABELED), true, None);

        assert!(!message.contains(":clap:"));
        assert!(message.contains("#github_qa_review_removed"));
    }
}
