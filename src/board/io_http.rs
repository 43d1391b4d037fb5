// Reading data files over HTTP.

use async_trait::async_trait;
use chrono::Utc;
use election_board::{FailureKind, SourceFailure, SourceOutcome};
use reqwest::Client;
use std::time::Duration;
use url::Url;

use crate::board::io_common::{failure, DataSource};
use crate::board::*;

pub const USER_AGENT: &str = concat!("electboard/", env!("CARGO_PKG_VERSION"));

#[derive(Clone)]
pub struct HttpSource {
    http: Client,
    root: Url,
}

impl HttpSource {
    /// `root` must end with a slash so that paths are joined below it.
    pub fn new(root: Url, timeout: Duration) -> BoardResult<HttpSource> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .context(HttpClientSnafu {})?;
        Ok(HttpSource { http, root })
    }
}

/// The URL of `path` with a `v=<millis>` parameter, so that no cache on the
/// way can answer with a stale copy.
pub fn cache_busted_url(root: &Url, path: &str, now_millis: i64) -> Result<Url, url::ParseError> {
    let mut url = root.join(path)?;
    url.query_pairs_mut()
        .append_pair("v", &now_millis.to_string());
    Ok(url)
}

fn classify(source: String, e: reqwest::Error) -> SourceFailure {
    let kind = if e.is_timeout() {
        FailureKind::Timeout
    } else if e.is_connect() {
        FailureKind::Unreachable
    } else {
        FailureKind::Transport
    };
    failure(source, kind, e)
}

#[async_trait]
impl DataSource for HttpSource {
    fn locate(&self, path: &str) -> String {
        self.root
            .join(path)
            .map(|u| u.to_string())
            .unwrap_or_else(|_| format!("{}{}", self.root, path))
    }

    async fn fetch(&self, path: &str) -> SourceOutcome<Vec<u8>> {
        let loc = self.locate(path);
        let url = cache_busted_url(&self.root, path, Utc::now().timestamp_millis())
            .map_err(|e| failure(loc.clone(), FailureKind::Parse, e))?;
        debug!("fetch: GET {}", url);
        let res = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| classify(loc.clone(), e))?;
        let status = res.status();
        if !status.is_success() {
            return Err(failure(loc, FailureKind::Status(status.as_u16()), status));
        }
        let body = res.bytes().await.map_err(|e| classify(loc.clone(), e))?;
        debug!("fetch: {}: {} bytes", loc, body.len());
        Ok(body.to_vec())
    }

    fn root(&self) -> String {
        self.root.to_string()
    }
}
