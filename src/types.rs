use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Ban status for a single Steam account, as returned by GetPlayerBans.
///
/// Field names mirror the Steam Web API payload so the raw JSON report keeps
/// the familiar shape. Every field is defaulted: a partial record is still
/// worth keeping.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BanRecord {
    #[serde(rename = "SteamId", alias = "steamid", default)]
    pub steam_id: String,

    #[serde(rename = "VACBanned", default)]
    pub vac_banned: bool,

    #[serde(rename = "CommunityBanned", default)]
    pub community_banned: bool,

    #[serde(rename = "NumberOfGameBans", default)]
    pub game_bans: u32,

    /// Days since the most recent ban; absent when the account was never banned.
    #[serde(rename = "DaysSinceLastBan", default)]
    pub days_since_last_ban: Option<u32>,
}

/// Remote ban-status service seam.
///
/// The production implementation talks to the Steam Web API; tests substitute
/// a scripted double. Error variants tell the fetch loop how to react:
/// `RateLimited` and `Transport` are retryable, anything else aborts the run.
#[async_trait::async_trait]
pub trait BansApi: Send + Sync {
    /// Fetch ban records for one batch of SteamIDs.
    async fn get_player_bans(&self, steam_ids: &[String]) -> Result<Vec<BanRecord>>;
}
