use std::collections::BTreeMap;

use reqwest::blocking::Response;
use reqwest::header::{HeaderMap, ACCEPT, AUTHORIZATION, LINK, USER_AGENT};
use serde::de::DeserializeOwned;

use crate::config::CONFIG;
use crate::error::{BotError, BotResult};
use crate::github::models::PullRequestFromJson;

pub const BASE_URL: &str = "https://api.github.com";

const PER_PAGE: u32 = 100;
const MEDIA_TYPE_JSON: &str = "application/vnd.github.v3+json";
const MEDIA_TYPE_DIFF: &str = "application/vnd.github.v3.diff";

type ParameterMap = BTreeMap<&'static str, String>;

#[derive(Debug)]
pub struct Client {
    token: String,
    ua: String,
    client: reqwest::blocking::Client,
}

impl Client {
    pub fn new() -> Self {
        Client {
            token: CONFIG.github_access_token.clone(),
            ua: CONFIG.github_user_agent.clone(),
            client: reqwest::blocking::Client::new(),
        }
    }

    /// All open pull requests for `repo`, qualified with the configured owner.
    pub fn open_pull_requests(&self, repo: &str) -> BotResult<Vec<PullRequestFromJson>> {
        let url = format!("{}/repos/{}/{}/pulls", BASE_URL, CONFIG.github_owner, repo);
        self.get_models(
            &url,
            Some(&btreemap! {
                "state" => "open".to_string(),
                "per_page" => PER_PAGE.to_string(),
            }),
        )
    }

    /// The unified diff of a single pull request. `repo` is owner-qualified.
    pub fn pull_request_diff(&self, repo: &str, number: i32) -> BotResult<String> {
        let url = format!("{}/repos/{}/pulls/{}", BASE_URL, repo, number);
        let res = self.get(&url, None, MEDIA_TYPE_DIFF)?;

        if !res.status().is_success() {
            throw!(BotError::Misc(Some(format!(
                "diff fetch for {}#{} returned {}",
                repo,
                number,
                res.status()
            ))))
        }

        Ok(res.text()?)
    }

    fn get_models<M: DeserializeOwned>(
        &self,
        start_url: &str,
        params: Option<&ParameterMap>,
    ) -> BotResult<Vec<M>> {
        let mut res = self.get(start_url, params, MEDIA_TYPE_JSON)?;
        let mut models = Vec::new();

        loop {
            if !res.status().is_success() {
                throw!(BotError::Misc(Some(format!(
                    "{} returned {}",
                    start_url,
                    res.status()
                ))))
            }

            let next = Self::next_page(res.headers());
            models.extend(self.deserialize::<Vec<M>>(res)?);

            match next {
                Some(url) => res = self.get(&url, None, MEDIA_TYPE_JSON)?,
                None => break,
            }
        }

        Ok(models)
    }

    fn next_page(headers: &HeaderMap) -> Option<String> {
        let lh = headers.get(LINK)?.to_str().ok()?;

        for link in lh.split(',').map(str::trim) {
            let tokens = link.split(';').map(str::trim).collect::<Vec<_>>();

            if tokens.len() != 2 {
                continue;
            }

            if tokens[1] == "rel=\"next\"" {
                let url = tokens[0]
                    .trim_start_matches('<')
                    .trim_end_matches('>')
                    .to_string();
                return Some(url);
            }
        }

        None
    }

    fn get(&self, url: &str, params: Option<&ParameterMap>, accept: &str) -> BotResult<Response> {
        let mut req = self
            .client
            .get(url)
            .header(AUTHORIZATION, format!("token {}", &self.token))
            .header(USER_AGENT, self.ua.clone())
            .header(ACCEPT, accept);

        if let Some(params) = params {
            req = req.query(params);
        }

        debug!("GETing: {}", url);

        Ok(req.send()?)
    }

    fn deserialize<M: DeserializeOwned>(&self, res: Response) -> BotResult<M> {
        let buf = res.text()?;

        match serde_json::from_str(&buf) {
            Ok(m) => Ok(m),
            Err(why) => {
                error!("Unable to parse from JSON ({:?}): {}", why, buf);
                throw!(why)
            }
        }
    }
}
