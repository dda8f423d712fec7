//! The thin `axum` adapter realizing a representative slice of the §6
//! route table. The HTTP framing itself stays thin and auth/session
//! validation is a stub; handlers only deserialize, delegate to
//! [`crate::gateway::execute_action`] or a read-only domain call, and
//! serialize — none of the interesting logic lives here.

use std::str::FromStr;

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use galaxy_balance::{ActionQuantities, ActionType};
use galaxy_common::{
    BuildingType, EmpireId, ExplorationType, FleetId, PlanetId, ProposalId, ProposalType, Resources,
    SectorCoordinate,
};
use galaxy_diplomacy::ProposalResponse;

use crate::gateway::{self, ActionRequest};
use crate::http::error::ApiError;
use crate::http::headers::game_headers;
use crate::http::state::AppState;
use crate::auth::AuthContext;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/empire", get(get_empire))
        .route("/empire/name", put(rename_empire))
        .route("/planets/:id/buildings", post(queue_building))
        .route("/sectors/:coord/explore", post(explore_sector))
        .route("/colonize", post(colonize_planet))
        .route("/combat/battles", post(initiate_combat))
        .route("/diplomacy/proposals", post(propose_diplomacy))
        .route("/diplomacy/proposals/:id/respond", post(respond_to_proposal))
        .route("/trade-routes", post(propose_trade_route))
        .route("/game/advance-turn", post(advance_turn))
        .with_state(state)
}

fn dev_mode(state: &AppState) -> bool {
    state.config.environment.is_development()
}

async fn attach_headers(state: &AppState, player_id: galaxy_common::PlayerId, body: impl Serialize) -> impl IntoResponse {
    match game_headers(state, player_id).await {
        Ok(headers) => (headers, Json(body)).into_response(),
        Err(_) => Json(body).into_response(),
    }
}

#[derive(Debug, Serialize)]
struct EmpireSnapshot {
    empire: galaxy_store::Empire,
    production: Resources,
    consumption: Resources,
    net: Resources,
}

async fn get_empire(State(state): State<AppState>, auth: AuthContext) -> Result<impl IntoResponse, ApiError> {
    let dev = dev_mode(&state);
    let empire = gateway::resolve_empire(state.store.as_ref(), auth.player_id)
        .await
        .map_err(|e| ApiError::new(e, dev))?;

    let mut tx = state.store.begin().await.map_err(|e| ApiError::new(e.into(), dev))?;
    let planets = tx
        .planets_for_empire(empire.id)
        .await
        .map_err(|e| ApiError::new(e.into(), dev))?;
    let fleets = tx
        .fleets_for_empire(empire.id)
        .await
        .map_err(|e| ApiError::new(e.into(), dev))?;
    tx.rollback().await.map_err(|e| ApiError::new(e.into(), dev))?;

    let snapshot = galaxy_economy::evaluate(&planets, &fleets);
    let body = EmpireSnapshot {
        empire,
        production: snapshot.production,
        consumption: snapshot.consumption,
        net: snapshot.net,
    };
    Ok(attach_headers(&state, auth.player_id, body).await)
}

#[derive(Debug, Deserialize)]
struct RenameEmpireBody {
    name: String,
}

async fn rename_empire(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(body): Json<RenameEmpireBody>,
) -> Result<impl IntoResponse, ApiError> {
    let dev = dev_mode(&state);
    let empire = gateway::resolve_empire(state.store.as_ref(), auth.player_id)
        .await
        .map_err(|e| ApiError::new(e, dev))?;

    let store = state.store.clone();
    let op_store = store.clone();
    let new_name = body.name.clone();
    let empire_id = empire.id;
    let result = gateway::execute_action(
        store.as_ref(),
        state.clock.as_ref(),
        ActionRequest {
            player_id: auth.player_id,
            empire_id,
            action_type: ActionType::RenameEmpire,
            proposed_cost: Resources::zero(),
            quantities: ActionQuantities::default(),
            emergency: false,
        },
        move |_cost| {
            let store = op_store;
            async move {
                let mut tx = store.begin().await.map_err(galaxy_common::GameError::from)?;
                let mut empire = tx.lock_empire(empire_id).await.map_err(galaxy_common::GameError::from)?;
                empire.name = new_name;
                empire.updated_at = chrono::Utc::now();
                tx.update_empire(empire.clone()).await.map_err(galaxy_common::GameError::from)?;
                tx.commit().await.map_err(galaxy_common::GameError::from)?;
                Ok(empire)
            }
        },
    )
    .await
    .map_err(|e| ApiError::new(e, dev))?;

    Ok(attach_headers(&state, auth.player_id, result).await)
}

#[derive(Debug, Deserialize)]
struct QueueBuildingBody {
    building_type: BuildingType,
}

async fn queue_building(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(planet_id): Path<i64>,
    Json(body): Json<QueueBuildingBody>,
) -> Result<impl IntoResponse, ApiError> {
    let dev = dev_mode(&state);
    let empire = gateway::resolve_empire(state.store.as_ref(), auth.player_id)
        .await
        .map_err(|e| ApiError::new(e, dev))?;

    let planet_id = PlanetId(planet_id);
    let building_type = body.building_type;
    let empire_id = empire.id;
    let store = state.store.clone();
    let op_store = store.clone();
    let cost = {
        let mut tx = store.begin().await.map_err(|e| ApiError::new(e.into(), dev))?;
        let planet = tx.lock_planet(planet_id).await.map_err(|e| ApiError::new(e.into(), dev))?;
        tx.rollback().await.map_err(|e| ApiError::new(e.into(), dev))?;
        let existing = planet.buildings.get(&building_type).copied().unwrap_or(0);
        galaxy_territory::building_cost(building_type, existing)
    };

    let result = gateway::execute_action(
        store.as_ref(),
        state.clock.as_ref(),
        ActionRequest {
            player_id: auth.player_id,
            empire_id,
            action_type: ActionType::QueueBuilding,
            proposed_cost: cost,
            quantities: ActionQuantities {
                building_type: Some(building_type),
                ..Default::default()
            },
            emergency: false,
        },
        move |_cost| {
            let store = op_store;
            async move { galaxy_territory::queue_building(store.as_ref(), empire_id, planet_id, building_type).await }
        },
    )
    .await
    .map_err(|e| ApiError::new(e, dev))?;

    Ok(attach_headers(&state, auth.player_id, result).await)
}

#[derive(Debug, Deserialize)]
struct ExploreSectorBody {
    #[serde(rename = "type")]
    exploration_type: ExplorationType,
}

async fn explore_sector(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(coord): Path<String>,
    Json(body): Json<ExploreSectorBody>,
) -> Result<impl IntoResponse, ApiError> {
    let dev = dev_mode(&state);
    let empire = gateway::resolve_empire(state.store.as_ref(), auth.player_id)
        .await
        .map_err(|e| ApiError::new(e, dev))?;
    let sector = SectorCoordinate::from_str(&coord)
        .map_err(|_| ApiError::new(galaxy_common::GameError::validation("malformed sector coordinate"), dev))?;

    let exploration_type = body.exploration_type;
    let empire_id = empire.id;
    let store = state.store.clone();
    let op_store = store.clone();

    let result = gateway::execute_action(
        store.as_ref(),
        state.clock.as_ref(),
        ActionRequest {
            player_id: auth.player_id,
            empire_id,
            action_type: ActionType::ExploreSector,
            proposed_cost: exploration_type.cost(),
            quantities: ActionQuantities::default(),
            emergency: false,
        },
        move |_cost| {
            let store = op_store;
            async move {
                let mut rng = rand::thread_rng();
                galaxy_territory::explore_sector(store.as_ref(), empire_id, sector, exploration_type, &mut rng).await
            }
        },
    )
    .await
    .map_err(|e| ApiError::new(e, dev))?;

    Ok(attach_headers(&state, auth.player_id, result).await)
}

#[derive(Debug, Deserialize)]
struct ColonizeBody {
    planet_id: i64,
    fleet_id: i64,
}

async fn colonize_planet(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(body): Json<ColonizeBody>,
) -> Result<impl IntoResponse, ApiError> {
    let dev = dev_mode(&state);
    let empire = gateway::resolve_empire(state.store.as_ref(), auth.player_id)
        .await
        .map_err(|e| ApiError::new(e, dev))?;

    let empire_id = empire.id;
    let planet_id = PlanetId(body.planet_id);
    let fleet_id = FleetId(body.fleet_id);
    let store = state.store.clone();
    let op_store = store.clone();

    let cost = {
        let mut tx = store.begin().await.map_err(|e| ApiError::new(e.into(), dev))?;
        let planet = tx.lock_planet(planet_id).await.map_err(|e| ApiError::new(e.into(), dev))?;
        tx.rollback().await.map_err(|e| ApiError::new(e.into(), dev))?;
        galaxy_territory::colonization_cost(planet.planet_type)
    };

    let result = gateway::execute_action(
        store.as_ref(),
        state.clock.as_ref(),
        ActionRequest {
            player_id: auth.player_id,
            empire_id,
            action_type: ActionType::ColonizePlanet,
            proposed_cost: cost,
            quantities: ActionQuantities::default(),
            emergency: false,
        },
        move |_cost| {
            let store = op_store;
            async move { galaxy_territory::colonize_planet(store.as_ref(), empire_id, planet_id, fleet_id).await }
        },
    )
    .await
    .map_err(|e| ApiError::new(e, dev))?;

    Ok(attach_headers(&state, auth.player_id, result).await)
}

#[derive(Debug, Deserialize)]
struct InitiateCombatBody {
    attacker_fleet_id: i64,
    defender_fleet_id: i64,
    #[serde(default)]
    surprise_attack: bool,
    #[serde(default)]
    terrain_modifier: f64,
}

async fn initiate_combat(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(body): Json<InitiateCombatBody>,
) -> Result<impl IntoResponse, ApiError> {
    let dev = dev_mode(&state);
    let empire = gateway::resolve_empire(state.store.as_ref(), auth.player_id)
        .await
        .map_err(|e| ApiError::new(e, dev))?;

    let attacker_id = FleetId(body.attacker_fleet_id);
    let defender_id = FleetId(body.defender_fleet_id);
    let options = galaxy_combat::CombatOptions {
        surprise_attack: body.surprise_attack,
        terrain_modifier: body.terrain_modifier,
    };
    let store = state.store.clone();
    let op_store = store.clone();

    let result = gateway::execute_action(
        store.as_ref(),
        state.clock.as_ref(),
        ActionRequest {
            player_id: auth.player_id,
            empire_id: empire.id,
            action_type: ActionType::InitiateCombat,
            proposed_cost: Resources::zero(),
            quantities: ActionQuantities::default(),
            emergency: false,
        },
        move |_cost| {
            let store = op_store;
            async move {
                let mut rng = rand::thread_rng();
                galaxy_combat::resolve(store.as_ref(), attacker_id, defender_id, options, &mut rng).await
            }
        },
    )
    .await
    .map_err(|e| ApiError::new(e, dev))?;

    Ok(attach_headers(&state, auth.player_id, result).await)
}

#[derive(Debug, Deserialize)]
struct ProposeDiplomacyBody {
    target_empire_id: EmpireId,
    proposal_type: ProposalType,
    #[serde(default)]
    terms: serde_json::Value,
}

async fn propose_diplomacy(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(body): Json<ProposeDiplomacyBody>,
) -> Result<impl IntoResponse, ApiError> {
    let dev = dev_mode(&state);
    let empire = gateway::resolve_empire(state.store.as_ref(), auth.player_id)
        .await
        .map_err(|e| ApiError::new(e, dev))?;

    let target = body.target_empire_id;
    let proposal_type = body.proposal_type;
    let terms = body.terms.clone();
    let empire_id = empire.id;
    let store = state.store.clone();
    let op_store = store.clone();

    let result = gateway::execute_action(
        store.as_ref(),
        state.clock.as_ref(),
        ActionRequest {
            player_id: auth.player_id,
            empire_id,
            action_type: ActionType::ProposeDiplomacy,
            proposed_cost: Resources::zero(),
            quantities: ActionQuantities::default(),
            emergency: false,
        },
        move |_cost| {
            let store = op_store;
            async move { galaxy_diplomacy::create_proposal(store.as_ref(), empire_id, target, proposal_type, terms).await }
        },
    )
    .await
    .map_err(|e| ApiError::new(e, dev))?;

    Ok(attach_headers(&state, auth.player_id, result).await)
}

#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
enum RespondBody {
    Accept,
    Reject,
    Counter { terms: serde_json::Value },
}

async fn respond_to_proposal(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(proposal_id): Path<i64>,
    Json(body): Json<RespondBody>,
) -> Result<impl IntoResponse, ApiError> {
    let dev = dev_mode(&state);
    let empire = gateway::resolve_empire(state.store.as_ref(), auth.player_id)
        .await
        .map_err(|e| ApiError::new(e, dev))?;

    let proposal_id = ProposalId(proposal_id);
    let response = match body {
        RespondBody::Accept => ProposalResponse::Accept,
        RespondBody::Reject => ProposalResponse::Reject,
        RespondBody::Counter { terms } => ProposalResponse::Counter(terms),
    };
    let empire_id = empire.id;
    let store = state.store.clone();
    let op_store = store.clone();

    let result = gateway::execute_action(
        store.as_ref(),
        state.clock.as_ref(),
        ActionRequest {
            player_id: auth.player_id,
            empire_id,
            action_type: ActionType::RespondToProposal,
            proposed_cost: Resources::zero(),
            quantities: ActionQuantities::default(),
            emergency: false,
        },
        move |_cost| {
            let store = op_store;
            async move { galaxy_diplomacy::respond(store.as_ref(), proposal_id, empire_id, response).await }
        },
    )
    .await
    .map_err(|e| ApiError::new(e, dev))?;

    Ok(attach_headers(&state, auth.player_id, result).await)
}

#[derive(Debug, Deserialize)]
struct TradeRouteBody {
    partner_empire_id: EmpireId,
    empire_gives: Resources,
    partner_gives: Resources,
    maintenance_cost: Resources,
    cost: Resources,
}

async fn propose_trade_route(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(body): Json<TradeRouteBody>,
) -> Result<impl IntoResponse, ApiError> {
    let dev = dev_mode(&state);
    let empire = gateway::resolve_empire(state.store.as_ref(), auth.player_id)
        .await
        .map_err(|e| ApiError::new(e, dev))?;

    let empire_id = empire.id;
    let partner = body.partner_empire_id;
    let empire_gives = body.empire_gives;
    let partner_gives = body.partner_gives;
    let maintenance_cost = body.maintenance_cost;
    let cost = body.cost;
    let store = state.store.clone();
    let op_store = store.clone();

    let result = gateway::execute_action(
        store.as_ref(),
        state.clock.as_ref(),
        ActionRequest {
            player_id: auth.player_id,
            empire_id,
            action_type: ActionType::ProposeTradeRoute,
            proposed_cost: cost,
            quantities: ActionQuantities::default(),
            emergency: false,
        },
        move |_cost| {
            let store = op_store;
            async move {
                galaxy_diplomacy::establish_trade_route(
                    store.as_ref(),
                    empire_id,
                    partner,
                    empire_gives,
                    partner_gives,
                    maintenance_cost,
                    cost,
                )
                .await
            }
        },
    )
    .await
    .map_err(|e| ApiError::new(e, dev))?;

    Ok(attach_headers(&state, auth.player_id, result).await)
}

#[derive(Debug, Serialize)]
struct AdvanceTurnResponse {
    new_turn_number: u64,
    empires_processed: u64,
    trade_routes_settled: u64,
    colonies_completed: u64,
}

/// `POST /game/advance-turn` (§6: admin cost). The stub [`AuthContext`]
/// doesn't verify real admin permissions; a real deployment's replacement
/// extractor would reject here before this handler ever runs.
async fn advance_turn(State(state): State<AppState>, auth: AuthContext) -> Result<impl IntoResponse, ApiError> {
    let dev = dev_mode(&state);
    if !auth.is_admin {
        return Err(ApiError::new(galaxy_common::GameError::AccessDenied("admin only".into()), dev));
    }

    let outcome = galaxy_turn::advance(state.store.as_ref(), state.clock.as_ref(), 5)
        .await
        .map_err(|e| ApiError::new(e, dev))?;

    Ok(Json(AdvanceTurnResponse {
        new_turn_number: outcome.new_turn_number,
        empires_processed: outcome.report.empires_processed,
        trade_routes_settled: outcome.report.trade_routes_settled,
        colonies_completed: outcome.report.colonies_completed,
    }))
}
