//! PostgREST implementation of the remote note store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, Method, Response};
use std::time::Duration;
use tracing::{debug, info};

use ainotes_core::{
    Error, Note, NoteFilter, NoteInsert, NoteUpdate, RemoteNoteStore, Result, SortKey,
};

use crate::config::CloudConfig;
use crate::types::{InsertRow, NoteRow, UpdateRow};

/// Client for a hosted PostgREST note table.
pub struct PostgrestNoteStore {
    client: Client,
    config: CloudConfig,
}

impl PostgrestNoteStore {
    /// Create a store with the given configuration.
    pub fn new(config: CloudConfig) -> Result<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        if config.is_configured() {
            info!(
                subsystem = "cloud",
                url = %config.url,
                table = %config.table,
                "Initializing cloud note store"
            );
        } else {
            info!(subsystem = "cloud", "Cloud credentials missing, running in demo mode");
        }

        Ok(Self { client, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(CloudConfig::from_env())
    }

    /// Get the current configuration.
    pub fn config(&self) -> &CloudConfig {
        &self.config
    }

    fn table_url(&self) -> String {
        format!(
            "{}/rest/v1/{}",
            self.config.url.trim_end_matches('/'),
            self.config.table
        )
    }

    /// Build a request with API key and bearer authentication.
    fn build_request(&self, method: Method) -> reqwest::RequestBuilder {
        self.client
            .request(method, self.table_url())
            .header("apikey", &self.config.anon_key)
            .header("Authorization", format!("Bearer {}", self.config.bearer()))
    }

    /// Map transport and status failures to `Unreachable`.
    async fn send(&self, req: reqwest::RequestBuilder, op: &str) -> Result<Response> {
        let response = req
            .send()
            .await
            .map_err(|e| Error::Unreachable(format!("{} request failed: {}", op, e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Unreachable(format!(
                "{} returned {}: {}",
                op, status, body
            )));
        }

        Ok(response)
    }
}

/// Render sort keys as a PostgREST `order` parameter.
pub fn order_param(sort: &[SortKey]) -> String {
    sort.iter()
        .map(|k| {
            format!(
                "{}.{}",
                k.field.as_str(),
                if k.ascending { "asc" } else { "desc" }
            )
        })
        .collect::<Vec<_>>()
        .join(",")
}

#[async_trait]
impl RemoteNoteStore for PostgrestNoteStore {
    async fn query_notes(
        &self,
        user_id: &str,
        filter: NoteFilter,
        sort: &[SortKey],
    ) -> Result<Vec<Note>> {
        let mut params = vec![
            ("select", "*".to_string()),
            ("user_id", format!("eq.{}", user_id)),
            ("is_archived", format!("eq.{}", filter.is_archived)),
        ];
        if !sort.is_empty() {
            params.push(("order", order_param(sort)));
        }

        let req = self.build_request(Method::GET).query(&params);
        let rows: Vec<NoteRow> = self
            .send(req, "query")
            .await?
            .json()
            .await
            .map_err(|e| Error::Unreachable(format!("Failed to parse notes: {}", e)))?;

        debug!(
            subsystem = "cloud",
            op = "query_notes",
            user_id = %user_id,
            is_archived = filter.is_archived,
            result_count = rows.len(),
            "Queried notes"
        );
        Ok(rows.into_iter().map(NoteRow::into_note).collect())
    }

    async fn insert_note(&self, user_id: &str, note: NoteInsert) -> Result<Note> {
        let body = [InsertRow {
            user_id,
            note: &note,
        }];
        let req = self
            .build_request(Method::POST)
            .header("Prefer", "return=representation")
            .json(&body);

        let rows: Vec<NoteRow> = self
            .send(req, "insert")
            .await?
            .json()
            .await
            .map_err(|e| Error::Unreachable(format!("Failed to parse inserted note: {}", e)))?;

        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| Error::Unreachable("insert returned no row".to_string()))?;

        let note = row.into_note();
        debug!(subsystem = "cloud", op = "insert_note", note_id = %note.id, "Inserted note");
        Ok(note)
    }

    async fn update_note(
        &self,
        id: &str,
        update: &NoteUpdate,
        updated_at: DateTime<Utc>,
    ) -> Result<()> {
        let req = self
            .build_request(Method::PATCH)
            .query(&[("id", format!("eq.{}", id))])
            .header("Prefer", "return=minimal")
            .json(&UpdateRow { update, updated_at });

        self.send(req, "update").await?;
        debug!(subsystem = "cloud", op = "update_note", note_id = %id, "Updated note");
        Ok(())
    }

    async fn delete_note(&self, id: &str) -> Result<()> {
        let req = self
            .build_request(Method::DELETE)
            .query(&[("id", format!("eq.{}", id))]);

        self.send(req, "delete").await?;
        debug!(subsystem = "cloud", op = "delete_note", note_id = %id, "Deleted note");
        Ok(())
    }

    fn is_offline_mode(&self) -> bool {
        !self.config.is_configured()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ainotes_core::SortField;

    fn configured() -> CloudConfig {
        CloudConfig {
            url: "https://example.supabase.co/".to_string(),
            anon_key: "anon".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_order_param_active() {
        assert_eq!(
            order_param(&SortKey::active_order()),
            "is_pinned.desc,updated_at.desc"
        );
    }

    #[test]
    fn test_order_param_ascending() {
        assert_eq!(
            order_param(&[SortKey::asc(SortField::CreatedAt)]),
            "created_at.asc"
        );
        assert_eq!(order_param(&[]), "");
    }

    #[test]
    fn test_table_url_trims_trailing_slash() {
        let store = PostgrestNoteStore::new(configured()).unwrap();
        assert_eq!(
            store.table_url(),
            "https://example.supabase.co/rest/v1/notes"
        );
    }

    #[test]
    fn test_unconfigured_store_is_offline() {
        let store = PostgrestNoteStore::new(CloudConfig::default()).unwrap();
        assert!(store.is_offline_mode());

        let store = PostgrestNoteStore::new(configured()).unwrap();
        assert!(!store.is_offline_mode());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = CloudConfig {
            url: "ftp://nope".to_string(),
            anon_key: "k".to_string(),
            ..Default::default()
        };
        assert!(PostgrestNoteStore::new(config).is_err());
    }
}
