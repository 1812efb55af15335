//! API Handlers
//!
//! HTTP request handlers for each endpoint of the local JSON API.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use tokio::sync::{Mutex, RwLock};
use tracing::info;

use crate::error::{Error, Result};
use crate::managers::{Dashboard, DashboardManager, LineupManager, LineupSlot, PlayersManager, TeamsManager};
use crate::models::{
    HealthResponse, LineupResponse, LineupSlotRequest, LiveStatusResponse, PlayerProfile,
    PlayersQuery, StatsResponse, TeamOverview, TeamsQuery,
};
use crate::service::NflDataService;

/// Application state shared across all handlers.
///
/// The page managers cache their derived collections, so they sit behind
/// async locks and are loaded on first use.
#[derive(Clone)]
pub struct AppState {
    pub service: NflDataService,
    pub dashboard: DashboardManager,
    pub teams: Arc<RwLock<TeamsManager>>,
    pub players: Arc<RwLock<PlayersManager>>,
    pub lineup: Arc<Mutex<LineupManager>>,
}

impl AppState {
    pub fn new(service: NflDataService) -> Self {
        Self {
            dashboard: DashboardManager::new(service.clone()),
            teams: Arc::new(RwLock::new(TeamsManager::new(service.clone()))),
            players: Arc::new(RwLock::new(PlayersManager::new(service.clone()))),
            lineup: Arc::new(Mutex::new(LineupManager::new(service.clone()))),
            service,
        }
    }
}

// == Pages ==
/// Handler for GET /api/dashboard
pub async fn dashboard_handler(State(state): State<AppState>) -> Json<Dashboard> {
    Json(state.dashboard.load_all_sections().await)
}

/// Handler for GET /api/teams
pub async fn teams_handler(
    State(state): State<AppState>,
    Query(query): Query<TeamsQuery>,
) -> Result<Json<Vec<TeamOverview>>> {
    let sort = query.sort()?;
    {
        let mut teams = state.teams.write().await;
        if query.refresh || teams.teams().is_empty() {
            teams.load_teams().await?;
        }
    }

    let teams = state.teams.read().await;
    Ok(Json(teams.view(&query.filter(), sort)))
}

/// Handler for GET /api/players
pub async fn players_handler(
    State(state): State<AppState>,
    Query(query): Query<PlayersQuery>,
) -> Result<Json<Vec<PlayerProfile>>> {
    let sort = query.sort()?;
    {
        let mut players = state.players.write().await;
        if query.refresh || players.players().is_empty() {
            players.load_players().await?;
        }
    }

    let players = state.players.read().await;
    Ok(Json(players.view(&query.filter(), sort)))
}

// == Lineup ==
/// Loads the available players and the saved lineup on first use.
async fn ensure_lineup_loaded(manager: &mut LineupManager) -> Result<()> {
    if manager.available().is_empty() {
        manager.load_available_players().await?;
        if manager.load_saved() {
            info!("Restored saved lineup");
        }
    }
    Ok(())
}

/// Handler for GET /api/lineup
pub async fn lineup_handler(State(state): State<AppState>) -> Result<Json<LineupResponse>> {
    let mut manager = state.lineup.lock().await;
    ensure_lineup_loaded(&mut manager).await?;
    Ok(Json(LineupResponse::from(&*manager)))
}

/// Handler for PUT /api/lineup/:slot
pub async fn update_slot_handler(
    State(state): State<AppState>,
    Path(slot): Path<String>,
    Json(req): Json<LineupSlotRequest>,
) -> Result<Json<LineupResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(Error::InvalidRequest(error_msg));
    }
    let slot: LineupSlot = slot.parse()?;

    let mut manager = state.lineup.lock().await;
    ensure_lineup_loaded(&mut manager).await?;
    manager.update_position(slot, req.player_id.as_deref())?;
    Ok(Json(LineupResponse::from(&*manager)))
}

/// Handler for DELETE /api/lineup
pub async fn clear_lineup_handler(State(state): State<AppState>) -> Json<LineupResponse> {
    let mut manager = state.lineup.lock().await;
    manager.clear();
    Json(LineupResponse::from(&*manager))
}

/// Handler for POST /api/lineup/save
pub async fn save_lineup_handler(State(state): State<AppState>) -> Result<Json<LineupResponse>> {
    let manager = state.lineup.lock().await;
    manager.save()?;
    Ok(Json(LineupResponse::from(&*manager)))
}

// == Live ==
fn live_status(state: &AppState, game_id: String, changed: bool) -> LiveStatusResponse {
    let tracker = state.service.tracker();
    LiveStatusResponse {
        tracking: tracker.is_tracking(&game_id),
        snapshot: tracker.latest(&game_id),
        prediction: tracker.latest_prediction(&game_id),
        changed,
        game_id,
    }
}

/// Handler for GET /api/live/:game_id
///
/// Untracked games are polled once so the caller still gets a snapshot.
pub async fn live_status_handler(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
) -> Result<Json<LiveStatusResponse>> {
    let mut status = live_status(&state, game_id, false);
    if status.snapshot.is_none() {
        let (snapshot, prediction) = state.service.tracker().poll_once(&status.game_id).await?;
        status.snapshot = Some(snapshot);
        status.prediction = Some(prediction);
    }
    Ok(Json(status))
}

/// Handler for POST /api/live/:game_id
pub async fn start_live_handler(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
) -> Result<(StatusCode, Json<LiveStatusResponse>)> {
    if game_id.trim().is_empty() {
        return Err(Error::InvalidRequest("Game ID is required".to_string()));
    }
    let started = state.service.start_live_tracking(&game_id);
    let status = if started { StatusCode::CREATED } else { StatusCode::OK };
    Ok((status, Json(live_status(&state, game_id, started))))
}

/// Handler for DELETE /api/live/:game_id
pub async fn stop_live_handler(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
) -> Json<LiveStatusResponse> {
    let stopped = state.service.stop_live_tracking(&game_id);
    Json(live_status(&state, game_id, stopped))
}

// == Service ==
/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let service = &state.service;
    let cache = service.cache_stats();
    let preferences = service.preferences().lock().stats();
    let rate_limit = service.rate_limit_state();

    Json(StatsResponse {
        hit_rate: cache.hit_rate(),
        cache,
        preferences,
        rate_limit,
        in_flight: service.pipeline().in_flight(),
        tracked_games: service.tracker().tracked_games(),
    })
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
