use std::collections::BTreeMap;
use std::env;

lazy_static! {
    pub static ref CONFIG: Config = match init() {
        Ok(config) => config,
        Err(missing) => panic!("Unable to load configuration. Missing: {}", missing.join(", ")),
    };
}

pub const DEFAULT_QA_REVIEW_LABEL: &str = "2: QA Review";
pub const DEFAULT_QA_REVIEW_DONE_LABEL: &str = "QA Review Done";

const GITHUB_OWNER: &str = "GITHUB_OWNER";
const GITHUB_WATCHED_REPOS: &str = "GITHUB_WATCHED_REPOS";
const GITHUB_TOKEN: &str = "GITHUB_TOKEN";
const GITHUB_QA_USERS: &str = "GITHUB_QA_USERS";
const MATTERMOST_INCOMING_WEBHOOK: &str = "MATTERMOST_INCOMING_WEBHOOK";

const GITHUB_WEBHOOK_SECRET: &str = "GITHUB_WEBHOOK_SECRET";
const GITHUB_USER_AGENT: &str = "GITHUB_USER_AGENT";
const GITHUB_QA_REVIEW_LABEL: &str = "GITHUB_QA_REVIEW_LABEL";
const GITHUB_QA_REVIEW_DONE_LABEL: &str = "GITHUB_QA_REVIEW_DONE_LABEL";
const GITHUB_TEST_FILE_MARKER: &str = "GITHUB_TEST_FILE_MARKER";
const GITHUB_SPEC_FILE_MARKER: &str = "GITHUB_SPEC_FILE_MARKER";
const DATABASE_CONNECTION_STRING: &str = "DATABASE_CONNECTION_STRING";
const DB_POOL_SIZE: &str = "DB_POOL_SIZE";

#[derive(Debug)]
pub struct Config {
    pub github_owner: String,
    pub github_watched_repos: Vec<String>,
    pub github_access_token: String,
    pub github_user_agent: String,
    pub github_qa_users: Vec<String>,
    pub github_webhook_secret: Option<String>,
    pub mattermost_webhook_url: String,
    pub database_url: Option<String>,
    pub db_pool_size: u32,
    pub qa_review_label: String,
    pub qa_review_done_label: String,
    pub test_file_marker: String,
    pub spec_file_marker: String,
}

impl Config {
    pub fn check(&self) -> bool {
        info!(
            "configured for owner {} watching {} repositories with {} QA users",
            self.github_owner,
            self.github_watched_repos.len(),
            self.github_qa_users.len()
        );

        if self.github_webhook_secret.is_none() {
            warn!("{} is not set, all webhook deliveries will be rejected", GITHUB_WEBHOOK_SECRET);
        }

        if self.database_url.is_none() {
            warn!("{} is not set, review tracking is disabled", DATABASE_CONNECTION_STRING);
        }

        true
    }

    /// Watched repository names qualified with the configured owner.
    pub fn qualified_repos(&self) -> Vec<String> {
        self.github_watched_repos
            .iter()
            .map(|r| format!("{}/{}", self.github_owner, r))
            .collect()
    }
}

pub fn init() -> Result<Config, Vec<&'static str>> {
    let mut variables: BTreeMap<&'static str, Result<String, _>> = BTreeMap::new();
    let keys = vec![
        GITHUB_OWNER,
        GITHUB_WATCHED_REPOS,
        GITHUB_TOKEN,
        GITHUB_QA_USERS,
        MATTERMOST_INCOMING_WEBHOOK,
    ];

    for var in keys.into_iter() {
        variables.insert(var, lookup(var));
    }

    let all_found = variables.iter().all(|(_, v)| v.is_ok());
    if all_found {
        let mut var = |key| variables.remove(key).unwrap().unwrap();

        Ok(Config {
            github_owner: var(GITHUB_OWNER),
            github_watched_repos: split_list(&var(GITHUB_WATCHED_REPOS)),
            github_access_token: var(GITHUB_TOKEN),
            github_user_agent: lookup(GITHUB_USER_AGENT)
                .unwrap_or_else(|_| String::from("qabot-rs")),
            github_qa_users: split_list(&var(GITHUB_QA_USERS)),
            github_webhook_secret: lookup(GITHUB_WEBHOOK_SECRET).ok(),
            mattermost_webhook_url: var(MATTERMOST_INCOMING_WEBHOOK),
            database_url: lookup(DATABASE_CONNECTION_STRING).ok(),
            db_pool_size: lookup(DB_POOL_SIZE)
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(5),
            qa_review_label: lookup(GITHUB_QA_REVIEW_LABEL)
                .unwrap_or_else(|_| DEFAULT_QA_REVIEW_LABEL.to_string()),
            qa_review_done_label: lookup(GITHUB_QA_REVIEW_DONE_LABEL)
                .unwrap_or_else(|_| DEFAULT_QA_REVIEW_DONE_LABEL.to_string()),
            test_file_marker: lookup(GITHUB_TEST_FILE_MARKER)
                .unwrap_or_else(|_| String::from(".test.")),
            spec_file_marker: lookup(GITHUB_SPEC_FILE_MARKER)
                .unwrap_or_else(|_| String::from(".spec.")),
        })
    } else {
        Err(variables
            .iter()
            .filter(|&(_, v)| v.is_err())
            .map(|(&k, _)| k)
            .collect())
    }
}

fn lookup(base: &str) -> Result<String, env::VarError> {
    let production = env::var("ENVIRONMENT")
        .map(|v| v == "production")
        .unwrap_or(true);

    lookup_in(base, production)
}

/// Outside of production, each key is read from its `_DEV`-suffixed twin first.
fn lookup_in(base: &str, production: bool) -> Result<String, env::VarError> {
    if production {
        env::var(base)
    } else {
        env::var(format!("{}_DEV", base)).or_else(|_| env::var(base))
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod test {
    use std::env;

    use super::*;

    #[test]
    fn comma_lists_are_trimmed() {
        assert_eq!(split_list("svc-a,svc-b"), vec!["svc-a", "svc-b"]);
        assert_eq!(split_list(" svc-a , svc-b ,"), vec!["svc-a", "svc-b"]);
        assert!(split_list("").is_empty());
    }

    // the QABOT_SAMPLE keys are unique to this test, so parallel test
    // threads never observe each other's values
    #[test]
    fn dev_suffix_takes_precedence_outside_production() {
        env::set_var("QABOT_SAMPLE", "prod-value");
        env::set_var("QABOT_SAMPLE_DEV", "dev-value");
        assert_eq!(lookup_in("QABOT_SAMPLE", false).unwrap(), "dev-value");
        assert_eq!(lookup_in("QABOT_SAMPLE", true).unwrap(), "prod-value");

        env::remove_var("QABOT_SAMPLE_DEV");
        assert_eq!(lookup_in("QABOT_SAMPLE", false).unwrap(), "prod-value");
        env::remove_var("QABOT_SAMPLE");
    }
}
