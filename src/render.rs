// src/render.rs
use chrono::{DateTime, Local, NaiveDateTime};
use std::fmt;
use crate::models::server::{Player, ServerStatus};
use crate::storage::memory::ViewState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusBadge {
    Online,
    Error,
}

impl StatusBadge {
    pub fn label(self) -> &'static str {
        match self {
            Self::Online => "Online",
            Self::Error => "Error",
        }
    }
}

/// `"{H}h {M}m"`, leftover seconds dropped.
pub fn format_duration(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    format!("{}h {}m", hours, minutes)
}

/// `index` is the 0-based position in the roster.
pub fn player_display_name(player: &Player, index: usize) -> String {
    if player.name.is_empty() {
        format!("Player {}", index + 1)
    } else {
        player.name.clone()
    }
}

pub fn platform_label(platform: &str) -> &'static str {
    if platform == "l" { "Linux" } else { "Windows" }
}

pub fn server_type_label(server_type: &str) -> &'static str {
    if server_type == "d" { "Dedicated" } else { "Listen" }
}

pub fn status_badge(status: &ServerStatus) -> StatusBadge {
    match status.error {
        Some(_) => StatusBadge::Error,
        None => StatusBadge::Online,
    }
}

/// Local time for zoned timestamps, as-is for naive ones, verbatim otherwise.
pub fn format_last_update(timestamp: &str) -> String {
    if let Ok(at) = DateTime::parse_from_rfc3339(timestamp) {
        return at.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string();
    }
    if let Ok(at) = NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%dT%H:%M:%S%.f") {
        return at.format("%Y-%m-%d %H:%M:%S").to_string();
    }
    timestamp.to_string()
}

pub fn render(state: &ViewState) -> String {
    match state {
        ViewState::Loading => "Loading server status...\n".to_string(),
        ViewState::Error(message) => format!("Failed to load server data\n  {}\n", message),
        ViewState::Data(status) => StatusView(status).to_string(),
    }
}

/// Full data view of one status payload.
struct StatusView<'a>(&'a ServerStatus);

impl fmt::Display for StatusView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = self.0;

        writeln!(f, "{}", status.server_name)?;
        writeln!(f, "Last updated: {}", format_last_update(&status.last_status_update))?;

        let mut badges = Vec::new();
        if status.password_protected {
            badges.push("[Password Protected]");
        }
        if status.vac_enabled {
            badges.push("[VAC Enabled]");
        }
        if !badges.is_empty() {
            writeln!(f, "{}", badges.join(" "))?;
        }

        writeln!(f)?;
        writeln!(f, "Players Online: {}", status.player_count)?;
        writeln!(f, "Port:           {}", status.port)?;
        writeln!(f, "Platform:       {}", platform_label(&status.platform))?;
        writeln!(f, "Version:        {}", status.keywords)?;

        if !status.players.is_empty() {
            writeln!(f)?;
            writeln!(f, "Active Players ({})", status.players.len())?;
            for (index, player) in status.players.iter().enumerate() {
                writeln!(
                    f,
                    "  {}  Score: {}  {}",
                    player_display_name(player, index),
                    player.score,
                    format_duration(player.duration)
                )?;
            }
        }

        writeln!(f)?;
        writeln!(f, "Server Details")?;
        writeln!(f, "  Steam ID:    {}", status.steam_id)?;
        writeln!(f, "  Game ID:     {}", status.game_id)?;
        writeln!(f, "  Server Type: {}", server_type_label(&status.server_type))?;
        match status_badge(status) {
            StatusBadge::Online => writeln!(f, "  Status:      {}", StatusBadge::Online.label()),
            StatusBadge::Error => writeln!(f, "  Status:      !! {} !!", StatusBadge::Error.label()),
        }
    }
}
