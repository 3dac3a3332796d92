//! Google Calendar REST client.
//!
//! Covers the single operation this agent needs: inserting an event on
//! the primary calendar. Authorization goes through the cached OAuth
//! flow in [`auth`].

pub mod auth;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::CalendarConfig;
use crate::error::{CalendarError, CalendarResult};

/// Event time as the Calendar API expects it
#[derive(Debug, Clone, Serialize)]
pub struct EventTime {
    /// ISO-8601 timestamp with offset.
    #[serde(rename = "dateTime")]
    pub date_time: String,
}

/// Event insertion request body
#[derive(Debug, Clone, Serialize)]
pub struct EventInsert {
    pub summary: String,
    pub start: EventTime,
    pub end: EventTime,
}

/// The created event as returned by the API
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedEvent {
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
}

/// Client for the Google Calendar v3 API
#[derive(Clone)]
pub struct CalendarClient {
    http: Client,
    config: CalendarConfig,
}

impl CalendarClient {
    /// Create a calendar client
    pub fn new(config: CalendarConfig) -> CalendarResult<Self> {
        let http = Client::builder().build().map_err(CalendarError::Http)?;
        Ok(Self { http, config })
    }

    /// Insert an event on the primary calendar and return its summary.
    ///
    /// `start` and `end` must already be resolved ISO-8601 timestamps
    /// with offset; no date math happens here.
    pub async fn insert_event(
        &self,
        summary: &str,
        start: &str,
        end: &str,
    ) -> CalendarResult<String> {
        let access_token = auth::authorize(&self.http, &self.config).await?;

        let url = format!(
            "{}/calendar/v3/calendars/primary/events",
            self.config.api_base_url.trim_end_matches('/')
        );

        let body = EventInsert {
            summary: summary.to_string(),
            start: EventTime {
                date_time: start.to_string(),
            },
            end: EventTime {
                date_time: end.to_string(),
            },
        };

        let response = self
            .http
            .post(&url)
            .header("Authorization", format!("Bearer {}", access_token))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(CalendarError::Http)?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(CalendarError::Api {
                status: status.as_u16(),
                message: error_body,
            });
        }

        let created: CreatedEvent =
            response
                .json()
                .await
                .map_err(|e| CalendarError::InvalidResponse {
                    message: format!("malformed event response: {}", e),
                })?;

        let created_summary = created.summary.unwrap_or_else(|| summary.to_string());
        info!(summary = %created_summary, "Calendar event created");
        Ok(created_summary)
    }
}
