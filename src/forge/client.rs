use super::CommitSource;
use crate::error::{CodesError, Result};
use crate::model::{RawCommit, RawRepo};
use serde::de::DeserializeOwned;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_API_URL: &str = "https://git.tricoteuses.fr/api/v1";
pub const DEFAULT_ORG: &str = "codes";

#[derive(Debug, Clone)]
pub struct CollectConfig {
    pub api_url: String,
    pub org: String,
    pub repos_per_page: u32,
    pub commits_per_page: u32,
    /// Pause after every successful request.
    pub delay: Duration,
    pub retries: u32,
    /// First retry waits this long, doubling each attempt.
    pub backoff: Duration,
    pub timeout: Duration,
}

impl Default for CollectConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            org: DEFAULT_ORG.to_string(),
            repos_per_page: 50,
            commits_per_page: 100,
            delay: Duration::from_millis(300),
            retries: 3,
            backoff: Duration::from_secs(1),
            timeout: Duration::from_secs(30),
        }
    }
}

impl CollectConfig {
    pub fn repos_url(&self, page: u32) -> String {
        format!(
            "{}/orgs/{}/repos?limit={}&page={}",
            self.api_url.trim_end_matches('/'),
            self.org,
            self.repos_per_page,
            page
        )
    }

    pub fn commits_url(&self, repo: &str, page: u32) -> String {
        format!(
            "{}/repos/{}/{}/commits?limit={}&page={}",
            self.api_url.trim_end_matches('/'),
            self.org,
            repo,
            self.commits_per_page,
            page
        )
    }
}

/// Blocking Forgejo API client. Shared between collector threads.
pub struct ForgejoClient {
    config: CollectConfig,
    agent: ureq::Agent,
    request_count: AtomicUsize,
}

impl ForgejoClient {
    pub fn new(config: CollectConfig) -> Self {
        let agent = ureq::config::Config::builder()
            .http_status_as_error(false)
            .timeout_global(Some(config.timeout))
            .build()
            .new_agent();
        Self {
            config,
            agent,
            request_count: AtomicUsize::new(0),
        }
    }

    pub fn config(&self) -> &CollectConfig {
        &self.config
    }

    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::Relaxed)
    }

    /// GET with retries. A 404 is `Ok(None)` and is not retried.
    fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<Option<T>> {
        let attempts = self.config.retries.max(1);
        let mut last_err = None;

        for attempt in 0..attempts {
            match self.try_get(url) {
                Ok(value) => {
                    thread::sleep(self.config.delay);
                    return Ok(value);
                }
                Err(e) => {
                    warn!("{e} (attempt {}/{attempts})", attempt + 1);
                    last_err = Some(e);
                    if attempt + 1 < attempts {
                        thread::sleep(self.config.backoff * 2u32.pow(attempt));
                    }
                }
            }
        }

        Err(last_err.unwrap_or_else(|| CodesError::Http {
            url: url.to_string(),
            reason: "no attempt made".to_string(),
        }))
    }

    fn try_get<T: DeserializeOwned>(&self, url: &str) -> Result<Option<T>> {
        self.request_count.fetch_add(1, Ordering::Relaxed);
        debug!(url, "GET");

        let response = self
            .agent
            .get(url)
            .header("Accept", "application/json")
            .call()
            .map_err(|e| CodesError::Http {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status().as_u16();
        if status == 404 {
            return Ok(None);
        }
        if status >= 400 {
            return Err(CodesError::Status {
                url: url.to_string(),
                status,
            });
        }

        response
            .into_body()
            .read_json::<T>()
            .map(Some)
            .map_err(|e| CodesError::Http {
                url: url.to_string(),
                reason: format!("invalid JSON body: {e}"),
            })
    }
}

impl CommitSource for ForgejoClient {
    fn repos_page(&self, page: u32) -> Result<Vec<RawRepo>> {
        Ok(self.get_json(&self.config.repos_url(page))?.unwrap_or_default())
    }

    fn commits_page(&self, repo: &str, page: u32) -> Result<Vec<RawCommit>> {
        Ok(self
            .get_json(&self.config.commits_url(repo, page))?
            .unwrap_or_default())
    }
}
