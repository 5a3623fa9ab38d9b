table! {
    github_review (id) {
        id -> Int4,
        event -> Varchar,
        action -> Varchar,
        repo -> Varchar,
        sender -> Varchar,
        title -> Varchar,
        html_url -> Varchar,
        is_requested -> Bool,
        is_done -> Bool,
        created_at -> Timestamp,
        updated_at -> Timestamp,
    }
}
