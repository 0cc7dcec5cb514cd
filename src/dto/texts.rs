//! Display strings shown by the screens.

use indexmap::IndexMap;
use serde::Serialize;
use utoipa::ToSchema;

use crate::state::game::Role;

/// Interface strings, keyed by the identifier the screens look them up with.
const TEXTS: &[(&str, &str)] = &[
    ("app_title", "MafClub 36"),
    ("play", "Խաղալ"),
    ("produced_by", "Բարի գալուստ, մաղթում ենք լավ խաղ"),
    ("set_players", "Սահմանել Խաղացողներ"),
    ("red_players", "Կարմիր Խաղացողներ"),
    ("black_players", "Սև Խաղացողներ"),
    ("continue", "Շարունակել"),
    ("player", "Խաղացող"),
    ("view_role", "Տեսնել Դերը"),
    ("close_role", "Փակել"),
    ("pass_device_to", "Փոխանցել սարքը՝"),
    ("next_player", "Հաջորդ Խաղացող"),
    ("start_game", "Սկսել Խաղը"),
    ("red_player", "Կարմիր Խաղացող"),
    ("sheriff", "Շերիֆ"),
    ("black_player", "Սև Խաղացող"),
    ("don", "Դոն"),
    ("game_lobby", "Խաղի Սենյակ"),
    ("vote", "Քվեարկել"),
    ("unvote", "Չեղարկել Քվեարկությունը"),
    ("warnings", "Զգուշացումներ"),
    ("start_timer", "Սկսել Ժամանակաչափը"),
    ("reset_timer", "Զրոյացնել Ժամանակաչափը"),
    ("seconds", "վայրկյան"),
    ("handoff_title", "Խնդրում ենք փոխանցել սարքը խաղավարին"),
    ("handoff_desc", ""),
    ("handoff_continue", "Սկսել Խաղը"),
    ("back", "Հետ"),
    ("next", "Հաջորդ"),
    ("confirm", "Հաստատել"),
    ("cancel", "Չեղարկել"),
    ("end_game", "Ավարտել Խաղը"),
];

/// Look an interface string up; unknown keys yield an empty string.
pub fn text(key: &str) -> &'static str {
    TEXTS
        .iter()
        .find_map(|(candidate, value)| (*candidate == key).then_some(*value))
        .unwrap_or_default()
}

/// How a role is labelled and tinted on screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct RoleDisplay {
    pub role: Role,
    pub name: String,
    /// CSS hex color.
    pub color: String,
}

impl From<Role> for RoleDisplay {
    fn from(role: Role) -> Self {
        let (key, color) = match role {
            Role::Red => ("red_player", "#fca5a5"),
            Role::Sheriff => ("sheriff", "#60a5fa"),
            Role::Black => ("black_player", "#d1d5db"),
            Role::Don => ("don", "#6b7280"),
        };
        Self {
            role,
            name: text(key).to_string(),
            color: color.to_string(),
        }
    }
}

/// Everything the front-end needs to label its screens.
#[derive(Debug, Serialize, ToSchema)]
pub struct TextsResponse {
    #[schema(value_type = Object)]
    pub texts: IndexMap<String, String>,
    pub roles: Vec<RoleDisplay>,
}

impl TextsResponse {
    /// Full table in declaration order.
    pub fn build() -> Self {
        Self {
            texts: TEXTS
                .iter()
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .collect(),
            roles: [Role::Red, Role::Sheriff, Role::Black, Role::Don]
                .into_iter()
                .map(RoleDisplay::from)
                .collect(),
        }
    }
}
