//! Upstream results API client
//!
//! Fetches the latest finished rounds for one game table.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use super::HistorySource;
use crate::config::UpstreamConfig;
use crate::error::{Result, SicboError};
use crate::types::HistoryEntry;

/// Results API client
#[derive(Clone)]
pub struct UpstreamClient {
    http: Client,
    config: UpstreamConfig,
}

/// Response envelope: `{ "data": { "resultList": [...] } }`, newest round first
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamResponse {
    data: Option<ResultPage>,
}

#[derive(Debug, Clone, Deserialize)]
struct ResultPage {
    #[serde(rename = "resultList")]
    result_list: Option<Vec<RawRound>>,
}

#[derive(Debug, Clone, Deserialize)]
struct RawRound {
    #[serde(rename = "gameNum")]
    game_num: String,
    score: u8,
    #[serde(rename = "facesList", default)]
    faces_list: Vec<u8>,
}

impl UpstreamClient {
    pub fn new(config: UpstreamConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { http, config })
    }

    fn url(&self) -> String {
        format!(
            "{}/v2/history/getLastResult",
            self.config.base_url.trim_end_matches('/')
        )
    }

    async fn fetch_raw(&self) -> Result<UpstreamResponse> {
        let size = self.config.size.to_string();
        let page = self.config.page.to_string();
        let resp = self
            .http
            .get(self.url())
            .query(&[
                ("gameId", self.config.game_id.as_str()),
                ("size", size.as_str()),
                ("tableId", self.config.table_id.as_str()),
                ("curPage", page.as_str()),
            ])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(SicboError::Api(format!("upstream returned status {}", status)));
        }

        let body = resp.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl HistorySource for UpstreamClient {
    async fn fetch_history(&self) -> Result<Vec<HistoryEntry>> {
        let history = self
            .fetch_raw()
            .await
            .and_then(parse_history)
            .map_err(|e| {
                warn!("Failed to fetch round history: {}", e);
                e.into_unavailable()
            })?;

        debug!(rounds = history.len(), "Fetched round history");
        Ok(history)
    }

    fn name(&self) -> &'static str {
        "upstream"
    }
}

/// Convert an API response into an oldest-first history
pub fn parse_history(response: UpstreamResponse) -> Result<Vec<HistoryEntry>> {
    let rounds = response
        .data
        .and_then(|page| page.result_list)
        .ok_or_else(|| SicboError::DataUnavailable("response has no data.resultList".into()))?;

    if rounds.is_empty() {
        return Err(SicboError::DataUnavailable("empty result list".into()));
    }

    let history: Vec<HistoryEntry> = rounds
        .into_iter()
        .rev()
        .map(|round| {
            let face = |i: usize| round.faces_list.get(i).copied().unwrap_or(0);
            let dice = [face(0), face(1), face(2)];
            HistoryEntry::new(round.game_num, round.score, dice)
        })
        .collect();

    if history.windows(2).any(|pair| pair[0].session >= pair[1].session) {
        debug!("Session ids are not strictly increasing");
    }

    Ok(history)
}
