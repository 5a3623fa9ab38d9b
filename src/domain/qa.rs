use chrono::NaiveDateTime;

use super::schema::github_review;

/// Tracks whether a pull request has had QA review requested and/or
/// completed. One row per pull request, keyed by html_url through
/// lookup logic only (no unique constraint is declared).
#[derive(Clone, Debug, Queryable, Serialize)]
pub struct ReviewRecord {
    pub id: i32,
    pub event: String,
    pub action: String,
    pub repo: String,
    pub sender: String,
    pub title: String,
    pub html_url: String,
    pub is_requested: bool,
    pub is_done: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[table_name = "github_review"]
pub struct NewReviewRecord<'a> {
    pub event: &'a str,
    pub action: &'a str,
    pub repo: &'a str,
    pub sender: &'a str,
    pub title: &'a str,
    pub html_url: &'a str,
    pub is_requested: bool,
    pub is_done: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}
