/// ISteamUser/GetPlayerBans endpoint.
pub const PLAYER_BANS_URL: &str = "https://api.steampowered.com/ISteamUser/GetPlayerBans/v1/";

/// Base URL for public Steam community profiles.
pub const PROFILE_BASE_URL: &str = "https://steamcommunity.com/profiles/";

/// Login reported when a SteamID has no matching credential file.
pub const UNKNOWN_LOGIN: &str = "unknown";

/// File extension of Steam Desktop Authenticator credential files.
pub const MAFILE_EXTENSION: &str = "maFile";

// Defaults, overridable via config.toml, environment, or CLI flags.
pub const DEFAULT_BATCH_SIZE: usize = 50;
pub const DEFAULT_MIN_RPM: u32 = 10;
pub const DEFAULT_MAX_RPM: u32 = 15;
pub const DEFAULT_RETRIES: u32 = 3;
pub const DEFAULT_BACKOFF_SECONDS: f64 = 1.5;
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 20;
