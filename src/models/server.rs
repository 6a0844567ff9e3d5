// src/models/server.rs
use serde::{Deserialize, Deserializer, Serialize};

/// Upstream sends `null` for fields it could not query.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    pub score: i64,
    /// Seconds connected.
    pub duration: u64,
}

/// Status payload as produced by the upstream query backend.
///
/// `error` is the upstream's own diagnostic and is independent of whether the
/// HTTP exchange succeeded. `player_count` and `players` come from different
/// queries upstream and are never reconciled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerStatus {
    pub last_status_update: String,
    pub error: Option<String>,
    pub server_name: String,
    pub server_type: String,
    pub platform: String,
    pub player_count: u32,
    pub password_protected: bool,
    pub vac_enabled: bool,
    pub port: u16,
    pub steam_id: u64,
    pub keywords: String,
    pub game_id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub players: Vec<Player>,
}

#[cfg(test)]
pub(crate) fn sample_status(players: usize) -> ServerStatus {
    ServerStatus {
        last_status_update: "2024-11-02T18:30:00Z".to_string(),
        error: None,
        server_name: "Midgard".to_string(),
        server_type: "d".to_string(),
        platform: "l".to_string(),
        player_count: players as u32,
        password_protected: true,
        vac_enabled: false,
        port: 2457,
        steam_id: 90_198_765_432_101_234,
        keywords: "0.219.16".to_string(),
        game_id: 892_970,
        players: (0..players)
            .map(|i| Player {
                name: format!("viking{}", i + 1),
                score: i as i64,
                duration: 3661 * (i as u64 + 1),
            })
            .collect(),
    }
}
