use crate::constants::MAFILE_EXTENSION;
use crate::error::{Result, ScannerError};
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// One credential file's worth of identity: the login is the file stem, the
/// SteamID comes from the JSON payload.
#[derive(Debug, Clone, PartialEq)]
pub struct MaFileAccount {
    pub login: String,
    pub steam_id: String,
}

/// Reads every `*.maFile` in `dir` (sorted by file name) and extracts
/// `(login, steam_id)` pairs.
///
/// Files without a usable SteamID — unreadable, unparsable, missing the
/// field, or carrying a non-numeric value — are skipped with a warning
/// rather than failing the scan.
pub fn scan_dir(dir: &Path) -> Result<Vec<MaFileAccount>> {
    if !dir.is_dir() {
        return Err(ScannerError::Config(format!(
            "maFile directory does not exist: {}",
            dir.display()
        )));
    }

    let mut paths: Vec<_> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().and_then(|ext| ext.to_str()) == Some(MAFILE_EXTENSION))
        .collect();
    paths.sort();

    let mut accounts = Vec::new();
    for path in paths {
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!("skipping unreadable maFile {}: {err}", path.display());
                continue;
            }
        };
        // SDA exports are occasionally not valid UTF-8; a lossy decode still
        // leaves the numeric fields intact
        let data: Value = match serde_json::from_str(&String::from_utf8_lossy(&bytes)) {
            Ok(data) => data,
            Err(err) => {
                warn!("skipping unparsable maFile {}: {err}", path.display());
                continue;
            }
        };
        let steam_id = match extract_steam_id(&data) {
            Some(id) => id,
            None => {
                warn!("no SteamID found in {}", path.display());
                continue;
            }
        };
        if !steam_id.chars().all(|c| c.is_ascii_digit()) {
            warn!("suspicious SteamID '{steam_id}' in {}", path.display());
            continue;
        }
        let login = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or_default()
            .to_string();
        debug!(login = %login, "found account");
        accounts.push(MaFileAccount { login, steam_id });
    }

    Ok(accounts)
}

/// Deduplicates accounts by SteamID, first login wins, preserving first-seen
/// order. Returns the ordered identifier list and the id-to-login index.
pub fn index_accounts(accounts: &[MaFileAccount]) -> (Vec<String>, HashMap<String, String>) {
    let mut order = Vec::new();
    let mut logins = HashMap::new();
    for account in accounts {
        if !logins.contains_key(&account.steam_id) {
            order.push(account.steam_id.clone());
            logins.insert(account.steam_id.clone(), account.login.clone());
        }
    }
    (order, logins)
}

/// SteamID lives at `Session.SteamID` in SDA exports, but older tools used
/// other spellings; numbers and strings both occur in the wild.
fn extract_steam_id(data: &Value) -> Option<String> {
    let session = data.get("Session");
    let candidates = [
        session.and_then(|s| s.get("SteamID")),
        session.and_then(|s| s.get("steamid")),
        data.get("SteamID"),
        data.get("steamid"),
        data.get("steam_id"),
    ];
    candidates.into_iter().flatten().find_map(value_to_id)
}

fn value_to_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
