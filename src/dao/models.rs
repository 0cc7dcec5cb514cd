use serde::{Deserialize, Serialize};

use crate::state::game::Role;

/// One game session as stored in the local session log.
///
/// Field names follow the camelCase layout of the log file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GameSessionEntity {
    /// Session identifier, unique within the log.
    pub id: String,
    /// Unix milliseconds at which the session was created.
    pub created_at: i64,
    /// Unix milliseconds at which roles were dealt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<i64>,
    /// Unix milliseconds at which the game was ended.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<i64>,
    /// Red team size.
    pub red_player_count: u32,
    /// Black team size.
    pub black_player_count: u32,
    /// Sum of both team sizes.
    pub total_players: u32,
    /// Seats with their roles.
    pub players: Vec<SessionPlayerEntity>,
}

/// Seat snapshot stored with a session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SessionPlayerEntity {
    /// Seat number.
    pub id: u32,
    /// Role dealt to the seat.
    pub role: Role,
    /// Whether the seat was eliminated when the snapshot was taken.
    pub is_eliminated: bool,
}

/// Insert `session` into `sessions`, replacing an entry with the same id in
/// place or prepending it when the id is new.
pub fn upsert_session(sessions: &mut Vec<GameSessionEntity>, session: GameSessionEntity) {
    match sessions.iter_mut().find(|existing| existing.id == session.id) {
        Some(existing) => *existing = session,
        None => sessions.insert(0, session),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(id: &str, red: u32) -> GameSessionEntity {
        GameSessionEntity {
            id: id.into(),
            created_at: 1_700_000_000_000,
            started_at: None,
            ended_at: None,
            red_player_count: red,
            black_player_count: 1,
            total_players: red + 1,
            players: vec![SessionPlayerEntity {
                id: 1,
                role: Role::Don,
                is_eliminated: false,
            }],
        }
    }

    #[test]
    fn upsert_prepends_new_and_replaces_known_ids() {
        let mut sessions = Vec::new();
        upsert_session(&mut sessions, session("a", 2));
        upsert_session(&mut sessions, session("b", 2));
        upsert_session(&mut sessions, session("a", 5));

        let ids: Vec<&str> = sessions.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert_eq!(sessions[1].red_player_count, 5);
    }

    #[test]
    fn log_layout_uses_camel_case_and_omits_missing_timestamps() {
        let json = serde_json::to_value(session("game_1_abc", 2)).unwrap();
        assert_eq!(json["redPlayerCount"], 2);
        assert_eq!(json["players"][0]["role"], "don");
        assert_eq!(json["players"][0]["isEliminated"], false);
        assert!(json.get("startedAt").is_none());
        assert!(json.get("endedAt").is_none());
    }

    #[test]
    fn reads_records_written_by_older_clients() {
        let raw = r#"[{"id":"game_1_x","createdAt":1,"endedAt":9,"redPlayerCount":7,
            "blackPlayerCount":3,"totalPlayers":10,
            "players":[{"id":1,"role":"sheriff","isEliminated":true}]}]"#;
        let sessions: Vec<GameSessionEntity> = serde_json::from_str(raw).unwrap();
        assert_eq!(sessions[0].ended_at, Some(9));
        assert_eq!(sessions[0].started_at, None);
        assert_eq!(sessions[0].players[0].role, Role::Sheriff);
    }
}
