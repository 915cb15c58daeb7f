use crate::constants::PLAYER_BANS_URL;
use crate::error::{Result, ScannerError};
use crate::types::{BanRecord, BansApi};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// HTTP client for the `ISteamUser/GetPlayerBans` endpoint.
pub struct SteamBansClient {
    client: reqwest::Client,
    api_key: String,
}

impl SteamBansClient {
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_key: api_key.into(),
        })
    }
}

#[async_trait::async_trait]
impl BansApi for SteamBansClient {
    #[instrument(skip(self, steam_ids), fields(batch = steam_ids.len()))]
    async fn get_player_bans(&self, steam_ids: &[String]) -> Result<Vec<BanRecord>> {
        let joined = steam_ids.join(",");
        let response = self
            .client
            .get(PLAYER_BANS_URL)
            .query(&[("key", self.api_key.as_str()), ("steamids", joined.as_str())])
            .send()
            .await
            // without_url keeps the API key out of logs and error messages
            .map_err(|err| ScannerError::Transport(err.without_url().to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ScannerError::RateLimited);
        }
        if !status.is_success() {
            return Err(ScannerError::Transport(format!("HTTP {status}")));
        }

        match response.json::<Value>().await {
            Ok(payload) => Ok(parse_players(&payload)),
            Err(err) => {
                warn!("discarding malformed response body: {}", err.without_url());
                Ok(Vec::new())
            }
        }
    }
}

/// Pulls the player list out of a GetPlayerBans payload.
///
/// A missing or malformed `players` field yields zero records; individual
/// entries that fail to parse are skipped.
fn parse_players(payload: &Value) -> Vec<BanRecord> {
    let players = match payload
        .get("players")
        .or_else(|| payload.get("Players"))
        .and_then(Value::as_array)
    {
        Some(list) => list,
        None => {
            warn!("response payload has no players list");
            return Vec::new();
        }
    };

    players
        .iter()
        .filter_map(|entry| match serde_json::from_value::<BanRecord>(entry.clone()) {
            Ok(record) => Some(record),
            Err(err) => {
                debug!("skipping malformed player entry: {err}");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_a_well_formed_players_list() {
        let payload = json!({
            "players": [
                {
                    "SteamId": "76561198000000001",
                    "VACBanned": true,
                    "CommunityBanned": false,
                    "NumberOfGameBans": 2,
                    "DaysSinceLastBan": 7
                },
                {
                    "SteamId": "76561198000000002",
                    "VACBanned": false,
                    "CommunityBanned": false,
                    "NumberOfGameBans": 0,
                    "DaysSinceLastBan": null
                }
            ]
        });

        let records = parse_players(&payload);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].steam_id, "76561198000000001");
        assert!(records[0].vac_banned);
        assert_eq!(records[0].game_bans, 2);
        assert_eq!(records[0].days_since_last_ban, Some(7));
        assert_eq!(records[1].days_since_last_ban, None);
    }

    #[test]
    fn accepts_the_capitalized_players_key() {
        let payload = json!({ "Players": [ { "SteamId": "1" } ] });
        let records = parse_players(&payload);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].steam_id, "1");
        assert!(!records[0].vac_banned);
    }

    #[test]
    fn missing_players_field_yields_no_records() {
        assert!(parse_players(&json!({})).is_empty());
        assert!(parse_players(&json!({ "players": null })).is_empty());
        assert!(parse_players(&json!({ "players": "oops" })).is_empty());
        assert!(parse_players(&json!(42)).is_empty());
    }

    #[test]
    fn malformed_entries_are_skipped_not_fatal() {
        let payload = json!({
            "players": [
                { "SteamId": 12345 },
                { "SteamId": "76561198000000003", "NumberOfGameBans": 1 }
            ]
        });

        let records = parse_players(&payload);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].steam_id, "76561198000000003");
        assert_eq!(records[0].game_bans, 1);
    }

    #[test]
    fn lowercase_steamid_alias_is_accepted() {
        let payload = json!({ "players": [ { "steamid": "9" } ] });
        let records = parse_players(&payload);
        assert_eq!(records[0].steam_id, "9");
    }
}
