#[derive(Clone, Debug, Deserialize)]
pub struct GitHubUser {
    pub login: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct LabelFromJson {
    pub name: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct MilestoneFromJson {
    pub title: String,
}

/// The slice of the pull request payload this bot consumes, shared by the
/// listing endpoint and the webhook body. Optional fields degrade to
/// defaults rather than failing deserialization.
#[derive(Clone, Debug, Deserialize)]
pub struct PullRequestFromJson {
    pub user: GitHubUser,
    pub title: String,
    pub html_url: String,
    #[serde(default)]
    pub labels: Vec<LabelFromJson>,
    pub milestone: Option<MilestoneFromJson>,
    #[serde(default)]
    pub requested_reviewers: Vec<GitHubUser>,
}

impl PullRequestFromJson {
    pub fn label_names(&self) -> Vec<String> {
        self.labels.iter().map(|l| l.name.clone()).collect()
    }

    pub fn reviewer_logins(&self) -> Vec<String> {
        self.requested_reviewers
            .iter()
            .map(|r| r.login.clone())
            .collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn optional_fields_degrade_to_defaults() {
        let pr: PullRequestFromJson = serde_json::from_str(
            r#"{"user": {"login": "carol"}, "title": "Fix it", "html_url": "https://example.com/pr/1"}"#,
        )
        .unwrap();

        assert!(pr.labels.is_empty());
        assert!(pr.requested_reviewers.is_empty());
        assert!(pr.milestone.is_none());
    }

    #[test]
    fn labels_and_reviewers_flatten_to_names() {
        let pr: PullRequestFromJson = serde_json::from_str(
            r#"{
                "user": {"login": "carol"},
                "title": "Fix it",
                "html_url": "https://example.com/pr/1",
                "labels": [{"name": "2: QA Review"}, {"name": "bug"}],
                "milestone": {"title": "v1.2"},
                "requested_reviewers": [{"login": "alice"}, {"login": "bob"}]
            }"#,
        )
        .unwrap();

        assert_eq!(pr.label_names(), vec!["2: QA Review", "bug"]);
        assert_eq!(pr.reviewer_logins(), vec!["alice", "bob"]);
        assert_eq!(pr.milestone.unwrap().title, "v1.2");
    }
}
