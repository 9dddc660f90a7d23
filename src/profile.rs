use crate::config::ProfileSettings;
use crate::error::{IvoneError, Result};
use crate::models::{ProfileData, ProfilePreferences, ProfileUpdate, UserProfile};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;

pub const MISSING_CONFIG_MESSAGE: &str =
    "Supabase configuration is missing. Set SUPABASE_URL and SUPABASE_ANON_KEY.";

#[derive(Deserialize)]
struct UserRow {
    id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default)]
    interaction_count: Option<u64>,
}

#[derive(Deserialize)]
struct PreferencesRow {
    #[serde(default)]
    preferred_name: Option<String>,
    #[serde(default)]
    theme: Option<String>,
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    notification_enabled: Option<bool>,
}

#[derive(Deserialize)]
struct DataRow {
    #[serde(default)]
    interests: Option<Vec<String>>,
    #[serde(default)]
    favorite_topics: Option<Vec<String>>,
    #[serde(default)]
    last_topics: Option<Vec<String>>,
}

#[derive(Serialize)]
struct UserPatch<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<&'a str>,
}

#[derive(Serialize)]
struct DataPatch<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    interests: Option<&'a [String]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    favorite_topics: Option<&'a [String]>,
}

fn merge(user: UserRow, prefs: Option<PreferencesRow>, data: Option<DataRow>) -> UserProfile {
    let defaults = ProfilePreferences::default();
    let preferences = match prefs {
        Some(row) => ProfilePreferences {
            preferred_name: row.preferred_name,
            theme: row.theme.unwrap_or(defaults.theme),
            language: row.language.unwrap_or(defaults.language),
            notification_enabled: row
                .notification_enabled
                .unwrap_or(defaults.notification_enabled),
        },
        None => defaults,
    };
    let data = data
        .map(|row| ProfileData {
            interests: row.interests.unwrap_or_default(),
            favorite_topics: row.favorite_topics.unwrap_or_default(),
            last_topics: row.last_topics.unwrap_or_default(),
        })
        .unwrap_or_default();

    UserProfile {
        id: user.id,
        name: user.name.unwrap_or_default(),
        email: user.email.unwrap_or_default(),
        created_at: user.created_at,
        interaction_count: user.interaction_count.unwrap_or(0),
        preferences,
        data,
    }
}

/// Reads and edits user profiles kept in a Supabase (PostgREST) database.
pub struct ProfileClient {
    client: reqwest::Client,
    rest_url: String,
}

impl ProfileClient {
    pub fn new(settings: &ProfileSettings) -> Result<Self> {
        let (Some(url), Some(key)) = (settings.url.as_deref(), settings.anon_key.as_deref())
        else {
            return Err(IvoneError::ConfigError(MISSING_CONFIG_MESSAGE.to_string()));
        };
        if url.is_empty() || key.is_empty() {
            return Err(IvoneError::ConfigError(MISSING_CONFIG_MESSAGE.to_string()));
        }

        let invalid_key =
            |e: reqwest::header::InvalidHeaderValue| IvoneError::ConfigError(format!("Invalid Supabase key: {}", e));
        let mut headers = HeaderMap::new();
        headers.insert("apikey", HeaderValue::from_str(key).map_err(invalid_key)?);
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", key)).map_err(invalid_key)?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(15))
            .build()?;

        Ok(Self {
            client,
            rest_url: format!("{}/rest/v1", url.trim_end_matches('/')),
        })
    }

    /// The user row merged with its preference and data rows.
    pub async fn fetch_profile(&self, user_id: &str) -> Result<UserProfile> {
        let (users, prefs, data) = futures::try_join!(
            self.select::<UserRow>("users", "id", user_id),
            self.select::<PreferencesRow>("user_preferences", "user_id", user_id),
            self.select::<DataRow>("user_data", "user_id", user_id),
        )?;

        let user = users
            .into_iter()
            .next()
            .ok_or_else(|| IvoneError::ProfileError(format!("usuário {} não encontrado", user_id)))?;

        Ok(merge(user, prefs.into_iter().next(), data.into_iter().next()))
    }

    /// Apply the set fields of `update`. The data row is only touched when
    /// interests or favorite topics change.
    pub async fn update_profile(&self, user_id: &str, update: &ProfileUpdate) -> Result<()> {
        if update.touches_user_row() {
            let patch = UserPatch {
                name: update.name.as_deref(),
                email: update.email.as_deref(),
            };
            self.patch("users", "id", user_id, &patch).await?;
        }

        if update.touches_data_row() {
            let patch = DataPatch {
                interests: update.interests.as_deref(),
                favorite_topics: update.favorite_topics.as_deref(),
            };
            self.patch("user_data", "user_id", user_id, &patch).await?;
        }

        Ok(())
    }

    /// Insert a user and its default preference and data rows.
    pub async fn create_profile(&self, email: &str, name: &str) -> Result<UserProfile> {
        let created: Vec<UserRow> = self
            .insert("users", &json!({ "email": email, "name": name }))
            .await?;
        let user = created
            .into_iter()
            .next()
            .ok_or_else(|| IvoneError::ProfileError("insert returned no row".to_string()))?;

        let prefs: Vec<PreferencesRow> = self
            .insert(
                "user_preferences",
                &json!({ "user_id": user.id, "preferred_name": name }),
            )
            .await?;
        let data: Vec<DataRow> = self
            .insert(
                "user_data",
                &json!({ "user_id": user.id, "interests": [], "favorite_topics": [] }),
            )
            .await?;

        Ok(merge(user, prefs.into_iter().next(), data.into_iter().next()))
    }

    async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        column: &str,
        value: &str,
    ) -> Result<Vec<T>> {
        let response = self
            .client
            .get(format!("{}/{}", self.rest_url, table))
            .query(&[(column, format!("eq.{}", value)), ("select", "*".to_string())])
            .send()
            .await
            .map_err(profile_transport)?;
        Self::read_rows(table, response).await
    }

    async fn patch<B: Serialize>(
        &self,
        table: &str,
        column: &str,
        value: &str,
        body: &B,
    ) -> Result<()> {
        let response = self
            .client
            .patch(format!("{}/{}", self.rest_url, table))
            .query(&[(column, format!("eq.{}", value))])
            .json(body)
            .send()
            .await
            .map_err(profile_transport)?;
        Self::check_status(table, response).await.map(|_| ())
    }

    async fn insert<T: DeserializeOwned>(
        &self,
        table: &str,
        body: &serde_json::Value,
    ) -> Result<Vec<T>> {
        let response = self
            .client
            .post(format!("{}/{}", self.rest_url, table))
            .header("Prefer", "return=representation")
            .json(body)
            .send()
            .await
            .map_err(profile_transport)?;
        Self::read_rows(table, response).await
    }

    async fn check_status(table: &str, response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        tracing::warn!(table, status = %status, body = %body, "profile request rejected");
        Err(IvoneError::ProfileError(format!(
            "{} ({}): {}",
            table,
            status.as_u16(),
            crate::api::response::extract_error_message(&body)
        )))
    }

    async fn read_rows<T: DeserializeOwned>(
        table: &str,
        response: reqwest::Response,
    ) -> Result<Vec<T>> {
        let response = Self::check_status(table, response).await?;
        response
            .json::<Vec<T>>()
            .await
            .map_err(|e| IvoneError::ProfileError(format!("{}: invalid rows: {}", table, e)))
    }
}

fn profile_transport(e: reqwest::Error) -> IvoneError {
    tracing::warn!(error = %e, "profile store unreachable");
    IvoneError::ProfileError(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn settings(url: String) -> ProfileSettings {
        ProfileSettings {
            url: Some(url),
            anon_key: Some("anon".to_string()),
            user_id: "u1".to_string(),
        }
    }

    #[test]
    fn missing_configuration_is_reported() {
        let unconfigured = ProfileSettings {
            url: None,
            anon_key: Some("anon".to_string()),
            user_id: "u1".to_string(),
        };
        let err = ProfileClient::new(&unconfigured).err().unwrap();
        assert!(matches!(err, IvoneError::ConfigError(ref m) if m == MISSING_CONFIG_MESSAGE));
    }

    #[tokio::test]
    async fn fetch_merges_rows_and_fills_defaults() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/rest/v1/users")
                    .query_param("id", "eq.u1")
                    .header("apikey", "anon");
                then.status(200).json_body(serde_json::json!([{
                    "id": "u1",
                    "name": "Ana",
                    "email": "ana@example.org",
                    "created_at": "2024-01-01T00:00:00Z",
                    "interaction_count": 3
                }]));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/rest/v1/user_preferences")
                    .query_param("user_id", "eq.u1");
                then.status(200).json_body(serde_json::json!([]));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/rest/v1/user_data")
                    .query_param("user_id", "eq.u1");
                then.status(200).json_body(serde_json::json!([{
                    "interests": ["rust"],
                    "favorite_topics": null
                }]));
            })
            .await;

        let client = ProfileClient::new(&settings(server.base_url())).unwrap();
        let profile = client.fetch_profile("u1").await.unwrap();

        assert_eq!(profile.name, "Ana");
        assert_eq!(profile.interaction_count, 3);
        assert_eq!(profile.preferences, ProfilePreferences::default());
        assert_eq!(profile.data.interests, vec!["rust".to_string()]);
        assert!(profile.data.favorite_topics.is_empty());
    }

    #[tokio::test]
    async fn unknown_user_is_a_profile_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET);
                then.status(200).json_body(serde_json::json!([]));
            })
            .await;

        let client = ProfileClient::new(&settings(server.base_url())).unwrap();
        let err = client.fetch_profile("ghost").await.unwrap_err();
        assert!(matches!(err, IvoneError::ProfileError(_)));
    }

    #[tokio::test]
    async fn update_only_patches_touched_tables() {
        let server = MockServer::start_async().await;
        let users = server
            .mock_async(|when, then| {
                when.method(PATCH)
                    .path("/rest/v1/users")
                    .query_param("id", "eq.u1")
                    .json_body(serde_json::json!({"name": "Bia"}));
                then.status(204);
            })
            .await;
        let data = server
            .mock_async(|when, then| {
                when.method(PATCH).path("/rest/v1/user_data");
                then.status(204);
            })
            .await;

        let client = ProfileClient::new(&settings(server.base_url())).unwrap();
        let update = ProfileUpdate {
            name: Some("Bia".to_string()),
            ..Default::default()
        };
        client.update_profile("u1", &update).await.unwrap();

        users.assert_async().await;
        data.assert_calls_async(0).await;
    }

    #[tokio::test]
    async fn create_inserts_user_then_default_rows() {
        let server = MockServer::start_async().await;
        let users = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/rest/v1/users")
                    .header("Prefer", "return=representation")
                    .json_body(serde_json::json!({"email": "ana@example.org", "name": "Ana"}));
                then.status(201).json_body(serde_json::json!([{
                    "id": "u9",
                    "name": "Ana",
                    "email": "ana@example.org"
                }]));
            })
            .await;
        let prefs = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/rest/v1/user_preferences")
                    .body_includes("\"user_id\":\"u9\"");
                then.status(201).json_body(serde_json::json!([{
                    "preferred_name": "Ana",
                    "theme": "light"
                }]));
            })
            .await;
        let data = server
            .mock_async(|when, then| {
                when.method(POST).path("/rest/v1/user_data");
                then.status(201).json_body(serde_json::json!([{
                    "interests": [],
                    "favorite_topics": []
                }]));
            })
            .await;

        let client = ProfileClient::new(&settings(server.base_url())).unwrap();
        let profile = client.create_profile("ana@example.org", "Ana").await.unwrap();

        users.assert_async().await;
        prefs.assert_async().await;
        data.assert_async().await;
        assert_eq!(profile.id, "u9");
        assert_eq!(profile.preferences.preferred_name.as_deref(), Some("Ana"));
        assert_eq!(profile.preferences.theme, "light");
        assert_eq!(profile.preferences.language, "pt-BR");
    }
}
