//! The four response headers §6 requires on every authenticated response:
//! `X-Game-Turn`, `X-Turn-Phase`, `X-Phase-Time-Remaining`,
//! `X-Action-Points`.

use axum::http::{HeaderMap, HeaderName, HeaderValue};

use galaxy_common::{GameError, PlayerId, TurnPhase};

use crate::http::state::AppState;

fn phase_str(phase: TurnPhase) -> &'static str {
    match phase {
        TurnPhase::Active => "active",
        TurnPhase::Warning => "warning",
        TurnPhase::Final => "final",
    }
}

pub async fn game_headers(state: &AppState, player_id: PlayerId) -> Result<HeaderMap, GameError> {
    let turn_duration = chrono::Duration::from_std(state.config.turn_duration).unwrap_or_else(|_| chrono::Duration::hours(24));
    let current = galaxy_turn::get_current(state.store.as_ref(), state.clock.as_ref(), turn_duration).await?;
    let ledger_row = galaxy_ledger::allocate_action_points(state.store.as_ref(), player_id, current.turn_number).await?;

    let mut headers = HeaderMap::new();
    headers.insert(
        HeaderName::from_static("x-game-turn"),
        HeaderValue::from_str(&current.turn_number.to_string()).unwrap(),
    );
    headers.insert(
        HeaderName::from_static("x-turn-phase"),
        HeaderValue::from_static(phase_str(current.phase)),
    );
    headers.insert(
        HeaderName::from_static("x-phase-time-remaining"),
        HeaderValue::from_str(&current.time_remaining.num_seconds().to_string()).unwrap(),
    );
    headers.insert(
        HeaderName::from_static("x-action-points"),
        HeaderValue::from_str(&ledger_row.points_remaining().to_string()).unwrap(),
    );
    Ok(headers)
}
