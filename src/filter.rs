use crate::constants::{PROFILE_BASE_URL, UNKNOWN_LOGIN};
use crate::types::BanRecord;
use serde::Serialize;
use std::collections::HashMap;

/// Which aggregate records make it into the filtered report.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BanFilter {
    /// Keep records whose last ban falls within the given day window.
    RecentBans { days_threshold: u32 },
    /// Keep records carrying any kind of ban.
    AnyBan,
}

impl BanFilter {
    pub fn from_days_threshold(days_threshold: Option<u32>) -> Self {
        match days_threshold {
            Some(days_threshold) => BanFilter::RecentBans { days_threshold },
            None => BanFilter::AnyBan,
        }
    }

    pub fn matches(&self, record: &BanRecord) -> bool {
        match *self {
            BanFilter::RecentBans { days_threshold } => match record.days_since_last_ban {
                Some(days) => days > 0 && days <= days_threshold,
                None => false,
            },
            BanFilter::AnyBan => {
                record.vac_banned || record.game_bans > 0 || record.community_banned
            }
        }
    }
}

/// Row of the filtered ban report: the API payload shape plus the login and
/// a profile link.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BanReportRow {
    pub login: String,

    #[serde(rename = "SteamId")]
    pub steam_id: String,

    pub profile_url: String,

    #[serde(rename = "VACBanned")]
    pub vac_banned: bool,

    #[serde(rename = "NumberOfGameBans")]
    pub game_bans: u32,

    #[serde(rename = "CommunityBanned")]
    pub community_banned: bool,

    #[serde(rename = "DaysSinceLastBan")]
    pub days_since_last_ban: Option<u32>,
}

/// Projects the kept records into report rows, preserving aggregate order.
///
/// A record whose SteamID has no login in the index gets the stable
/// `"unknown"` sentinel; an empty SteamID yields an empty profile URL.
pub fn make_report_rows(
    records: &[BanRecord],
    logins: &HashMap<String, String>,
    filter: BanFilter,
) -> Vec<BanReportRow> {
    records
        .iter()
        .filter(|record| filter.matches(record))
        .map(|record| BanReportRow {
            login: logins
                .get(&record.steam_id)
                .cloned()
                .unwrap_or_else(|| UNKNOWN_LOGIN.to_string()),
            steam_id: record.steam_id.clone(),
            profile_url: if record.steam_id.is_empty() {
                String::new()
            } else {
                format!("{PROFILE_BASE_URL}{}", record.steam_id)
            },
            vac_banned: record.vac_banned,
            game_bans: record.game_bans,
            community_banned: record.community_banned,
            days_since_last_ban: record.days_since_last_ban,
        })
        .collect()
}
