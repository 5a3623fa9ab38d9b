use std::panic::catch_unwind;

pub fn serve() {
    loop {
        let port = std::env::var("ROCKET_PORT").unwrap_or_else(|_| String::from("8000"));
        info!("Attempting to launch Rocket at port {}...", port);

        let result = catch_unwind(|| {
            rocket::ignite()
                .mount("/", routes![api::github_webhook, api::run_digest])
                .launch();
        });

        ok_or!(result, why => error!("Rocket failed to ignite: {:?}", why));
    }
}

mod api {
    use rocket_contrib::json::Json;
    use serde_json::Value;

    use crate::digest;
    use crate::error::BotResult;
    use crate::github::webhooks::{self, Event, Payload};

    /// Acknowledges a validated delivery with its event name and delivery
    /// id. The raw payload is deliberately not echoed back.
    #[post("/github-webhook", data = "<event>")]
    pub fn github_webhook(event: Event) -> BotResult<Json<Value>> {
        match event.payload {
            Payload::PullRequest(pr_event) => webhooks::handle_pull_request(pr_event)?,
            Payload::Unsupported => (),
        }

        Ok(Json(json!({
            "message": "ok",
            "event": event.event_name,
            "delivery": event.delivery_id,
        })))
    }

    #[post("/digest")]
    pub fn run_digest() -> BotResult<Json<Value>> {
        digest::run()?;

        Ok(Json(json!({ "message": "Successfully posted" })))
    }
}

#[cfg(test)]
mod test {
    use rocket::http::{Header, Status};
    use rocket::local::Client;

    use super::api;
    use crate::github::webhooks;

    const SECRET: &str = "hunter2";

    // action "unlabeled" with a QA label, but on a repository outside the
    // watch list: the handler must acknowledge it and do nothing
    const UNWATCHED_BODY: &str = r#"{
        "action": "unlabeled",
        "number": 7,
        "repository": {"full_name": "someoneelse/other"},
        "sender": {"login": "mallory"},
        "label": {"name": "QA Review Done"},
        "pull_request": {
            "user": {"login": "mallory"},
            "title": "Rework frobnicator",
            "html_url": "https://github.com/someoneelse/other/pull/7"
        }
    }"#;

    fn set_test_config() {
        use std::env;
        env::set_var("GITHUB_OWNER", "acme");
        env::set_var("GITHUB_WATCHED_REPOS", "svc-a,svc-b");
        env::set_var("GITHUB_TOKEN", "test-token");
        env::set_var("GITHUB_QA_USERS", "bob");
        env::set_var("GITHUB_WEBHOOK_SECRET", SECRET);
        env::set_var("MATTERMOST_INCOMING_WEBHOOK", "http://localhost:1/hooks/unused");
    }

    fn sign(body: &str) -> String {
        format!(
            "sha1={}",
            hex::encode(webhooks::hmac_sha1(SECRET.as_bytes(), body.as_bytes()).unwrap())
        )
    }

    // single test so the config env vars are set exactly once before the
    // CONFIG global is first dereferenced
    #[test]
    fn webhook_envelope_validation() {
        set_test_config();

        let rocket = rocket::ignite().mount("/", routes![api::github_webhook]);
        let client = Client::new(rocket).expect("valid rocket instance");

        // missing signature header rejects before any signature work
        let res = client
            .post("/github-webhook")
            .header(Header::new("X-GitHub-Event", "pull_request"))
            .header(Header::new("X-GitHub-Delivery", "delivery-1"))
            .body(UNWATCHED_BODY)
            .dispatch();
        assert_eq!(res.status(), Status::Unauthorized);

        // missing event header is a 422
        let res = client
            .post("/github-webhook")
            .header(Header::new("X-Hub-Signature", sign(UNWATCHED_BODY)))
            .header(Header::new("X-GitHub-Delivery", "delivery-2"))
            .body(UNWATCHED_BODY)
            .dispatch();
        assert_eq!(res.status(), Status::UnprocessableEntity);

        // missing delivery id is a 401
        let res = client
            .post("/github-webhook")
            .header(Header::new("X-Hub-Signature", sign(UNWATCHED_BODY)))
            .header(Header::new("X-GitHub-Event", "pull_request"))
            .body(UNWATCHED_BODY)
            .dispatch();
        assert_eq!(res.status(), Status::Unauthorized);

        // a mismatched signature is a 401
        let res = client
            .post("/github-webhook")
            .header(Header::new("X-Hub-Signature", sign("some other body")))
            .header(Header::new("X-GitHub-Event", "pull_request"))
            .header(Header::new("X-GitHub-Delivery", "delivery-3"))
            .body(UNWATCHED_BODY)
            .dispatch();
        assert_eq!(res.status(), Status::Unauthorized);

        // a valid delivery for an unwatched repository is acknowledged
        // without notifying or touching the database
        let res = client
            .post("/github-webhook")
            .header(Header::new("X-Hub-Signature", sign(UNWATCHED_BODY)))
            .header(Header::new("X-GitHub-Event", "pull_request"))
            .header(Header::new("X-GitHub-Delivery", "delivery-4"))
            .body(UNWATCHED_BODY)
            .dispatch();
        assert_eq!(res.status(), Status::Ok);

        // non-pull-request events are acknowledged and ignored
        let ping = r#"{"zen": "Keep it logically awesome."}"#;
        let res = client
            .post("/github-webhook")
            .header(Header::new("X-Hub-Signature", sign(ping)))
            .header(Header::new("X-GitHub-Event", "ping"))
            .header(Header::new("X-GitHub-Delivery", "delivery-5"))
            .body(ping)
            .dispatch();
        assert_eq!(res.status(), Status::Ok);
    }
}
