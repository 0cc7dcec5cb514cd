use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for the moderator API.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::sse::view_stream,
        crate::routes::game::get_state,
        crate::routes::game::new_game,
        crate::routes::game::set_red_count,
        crate::routes::game::set_black_count,
        crate::routes::game::deal,
        crate::routes::game::reveal_role,
        crate::routes::game::close_role,
        crate::routes::game::toggle_vote,
        crate::routes::game::add_warning,
        crate::routes::game::remove_warning,
        crate::routes::game::eliminate_player,
        crate::routes::game::next_player,
        crate::routes::game::start_timer,
        crate::routes::game::stop_timer,
        crate::routes::game::reset_timer,
        crate::routes::game::set_phase,
        crate::routes::game::end_game,
        crate::routes::screens::current_view,
        crate::routes::screens::play,
        crate::routes::screens::confirm_players,
        crate::routes::screens::advance_reveal,
        crate::routes::screens::texts,
        crate::routes::sessions::list_sessions,
        crate::routes::sessions::get_session,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::game::GameStateSnapshot,
            crate::dto::game::PlayerSnapshot,
            crate::dto::game::TeamCountRequest,
            crate::dto::game::PhaseChangeRequest,
            crate::dto::phase::VisibleGamePhase,
            crate::dto::view::PhaseView,
            crate::dto::view::TimerView,
            crate::dto::texts::TextsResponse,
            crate::dto::texts::RoleDisplay,
            crate::dto::session::SessionSummary,
            crate::state::game::Role,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "sse", description = "Server-sent events streams"),
        (name = "game", description = "Game store operations"),
        (name = "screens", description = "Screen views and actions"),
        (name = "sessions", description = "Recorded session history"),
    )
)]
pub struct ApiDoc;
