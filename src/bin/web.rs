//! Single binary web server: JSON API for creating tournaments, entering results and standings.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default so the app is reachable via DNS on a VPS.
//! Override with env: HOST (e.g. 0.0.0.0), PORT (e.g. 8080), INACTIVITY_HOURS (e.g. 12).

use actix_files::Files;
use actix_session::{storage::CookieSessionStore, Session, SessionMiddleware};
use actix_web::{
    cookie::Key,
    delete, get, post, put,
    web::{Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use dart_tournament_engine::{
    compute_standings, create_tournament, enter_score, reopen_match, standings_to_csv, GameMatch, MatchId, Standing, Tournament, TournamentError, TournamentFormat,
    TournamentId,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::RwLock;
use std::time::{Duration, Instant};

/// Per-tournament entry: tournament data + last activity time (for auto-cleanup).
struct TournamentEntry {
    tournament: Tournament,
    last_activity: Instant,
}

/// In-memory state: many tournaments by ID. Entries are removed after the inactivity timeout.
type AppState = Data<RwLock<HashMap<TournamentId, TournamentEntry>>>;

/// Session key holding the tournament this browser created last.
const SESSION_TOURNAMENT_KEY: &str = "tournament_id";

/// How often idle tournaments are swept from memory.
const CLEANUP_INTERVAL: Duration = Duration::from_secs(30 * 60);

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct CreateTournamentBody {
    #[serde(default)]
    name: String,
    #[serde(default = "default_format")]
    format: String,
    player_names: Vec<String>,
}

fn default_format() -> String {
    "round_robin".to_string()
}

/// Scores as sent by the client. Anything that is not a non-negative integer leaves the match unchanged.
#[derive(Deserialize)]
struct ScoreBody {
    #[serde(default)]
    score_player1: Option<serde_json::Value>,
    #[serde(default)]
    score_player2: Option<serde_json::Value>,
}

/// Path segment: tournament id (e.g. /api/tournaments/{id})
#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

/// Path segments: tournament id and match id (e.g. /api/tournaments/{id}/matches/{match_id})
#[derive(Deserialize)]
struct TournamentMatchPath {
    id: TournamentId,
    match_id: MatchId,
}

/// Everything a page needs to show one tournament.
#[derive(Serialize)]
struct TournamentView<'a> {
    tournament: &'a Tournament,
    matches_by_round: BTreeMap<u32, Vec<&'a GameMatch>>,
    standings: Vec<Standing>,
    all_matches_completed: bool,
}

impl<'a> TournamentView<'a> {
    fn new(tournament: &'a Tournament) -> Self {
        Self {
            tournament,
            matches_by_round: tournament.matches_by_round(),
            standings: compute_standings(tournament),
            all_matches_completed: tournament.all_matches_completed(),
        }
    }
}

#[derive(Serialize)]
struct ScoreResponse<'a> {
    applied: bool,
    #[serde(flatten)]
    view: TournamentView<'a>,
}

/// Integer scores, also accepted as numeric strings (form input).
fn score_value(value: &Option<serde_json::Value>) -> Option<i64> {
    match value.as_ref()? {
        serde_json::Value::Number(n) => n.as_i64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn error_response(e: TournamentError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    match e {
        TournamentError::TournamentNotFound(_) | TournamentError::MatchNotFound(_) => {
            HttpResponse::NotFound().json(body)
        }
        _ => HttpResponse::BadRequest().json(body),
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "dart-tournament-engine",
    })
}

/// Avoid 404 in browser tab: favicon not required for app logic.
#[get("/favicon.ico")]
async fn favicon() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

/// Create a tournament with its whole schedule; the id is remembered in the session.
#[post("/api/tournaments")]
async fn api_create_tournament(
    state: AppState,
    session: Session,
    body: Json<CreateTournamentBody>,
) -> HttpResponse {
    let format: TournamentFormat = match body.format.parse() {
        Ok(f) => f,
        Err(e) => return error_response(e),
    };
    let tournament = match create_tournament(&body.name, format, &body.player_names) {
        Ok(t) => t,
        Err(e) => return error_response(e),
    };
    let id = tournament.id;
    if let Err(e) = session.insert(SESSION_TOURNAMENT_KEY, id) {
        log::warn!("Could not store tournament {} in session: {}", id, e);
    }
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = g.entry(id).or_insert(TournamentEntry {
        tournament,
        last_activity: Instant::now(),
    });
    HttpResponse::Ok().json(TournamentView::new(&entry.tournament))
}

/// Tournament this browser created last (404 if none or already cleaned up).
#[get("/api/tournaments/current")]
async fn api_current_tournament(state: AppState, session: Session) -> HttpResponse {
    let id = match session.get::<TournamentId>(SESSION_TOURNAMENT_KEY) {
        Ok(Some(id)) => id,
        Ok(None) => {
            return HttpResponse::NotFound().json(serde_json::json!({ "error": "No tournament" }))
        }
        Err(_) => return HttpResponse::BadRequest().json(serde_json::json!({ "error": "Bad session" })),
    };
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match g.get_mut(&id) {
        Some(entry) => {
            entry.last_activity = Instant::now();
            HttpResponse::Ok().json(TournamentView::new(&entry.tournament))
        }
        None => error_response(TournamentError::TournamentNotFound(id)),
    }
}

/// Get a tournament by id with schedule and standings. Touching it refreshes last_activity.
#[get("/api/tournaments/{id}")]
async fn api_get_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match g.get_mut(&path.id) {
        Some(entry) => {
            entry.last_activity = Instant::now();
            HttpResponse::Ok().json(TournamentView::new(&entry.tournament))
        }
        None => error_response(TournamentError::TournamentNotFound(path.id)),
    }
}

/// Delete a tournament together with its players and matches.
#[delete("/api/tournaments/{id}")]
async fn api_delete_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match g.remove(&path.id) {
        Some(entry) => {
            log::info!("Deleted tournament '{}' ({})", entry.tournament.name, path.id);
            HttpResponse::NoContent().finish()
        }
        None => error_response(TournamentError::TournamentNotFound(path.id)),
    }
}

/// Enter a match result. Missing or negative scores are reported as not applied.
#[put("/api/tournaments/{id}/matches/{match_id}/score")]
async fn api_submit_score(
    state: AppState,
    path: Path<TournamentMatchPath>,
    body: Json<ScoreBody>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return error_response(TournamentError::TournamentNotFound(path.id)),
    };
    entry.last_activity = Instant::now();
    let t = &mut entry.tournament;
    let scores = (score_value(&body.score_player1), score_value(&body.score_player2));
    let applied = match enter_score(t, path.match_id, scores.0, scores.1) {
        Ok(applied) => applied,
        Err(e) => return error_response(e),
    };
    HttpResponse::Ok().json(ScoreResponse {
        applied,
        view: TournamentView::new(t),
    })
}

/// Reopen a completed match (knockout: resets every later match it fed).
#[post("/api/tournaments/{id}/matches/{match_id}/reopen")]
async fn api_reopen_match(state: AppState, path: Path<TournamentMatchPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return error_response(TournamentError::TournamentNotFound(path.id)),
    };
    entry.last_activity = Instant::now();
    let t = &mut entry.tournament;
    match reopen_match(t, path.match_id) {
        Ok(()) => HttpResponse::Ok().json(TournamentView::new(t)),
        Err(e) => error_response(e),
    }
}

/// Current ranking.
#[get("/api/tournaments/{id}/standings")]
async fn api_standings(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match g.get_mut(&path.id) {
        Some(entry) => {
            entry.last_activity = Instant::now();
            HttpResponse::Ok().json(compute_standings(&entry.tournament))
        }
        None => error_response(TournamentError::TournamentNotFound(path.id)),
    }
}

/// Current ranking as a CSV download.
#[get("/api/tournaments/{id}/standings.csv")]
async fn api_standings_csv(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return error_response(TournamentError::TournamentNotFound(path.id)),
    };
    entry.last_activity = Instant::now();
    match standings_to_csv(&compute_standings(&entry.tournament)) {
        Ok(csv) => HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .insert_header((
                "Content-Disposition",
                format!("attachment; filename=\"standings-{}.csv\"", path.id),
            ))
            .body(csv),
        Err(e) => {
            log::error!("CSV export failed for tournament {}: {}", path.id, e);
            HttpResponse::InternalServerError().body("csv error")
        }
    }
}

/// Mark the tournament finished (all matches must have a result).
#[post("/api/tournaments/{id}/finish")]
async fn api_finish_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return error_response(TournamentError::TournamentNotFound(path.id)),
    };
    entry.last_activity = Instant::now();
    let t = &mut entry.tournament;
    match t.finish() {
        Ok(()) => {
            log::info!("Tournament '{}' finished", t.name);
            HttpResponse::Ok().json(TournamentView::new(t))
        }
        Err(e) => error_response(e),
    }
}

/// Distinct real player names across stored tournaments (for name suggestions).
#[get("/api/players/known")]
async fn api_known_players(state: AppState) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let names: BTreeSet<&str> = g
        .values()
        .flat_map(|entry| entry.tournament.known_player_names())
        .collect();
    HttpResponse::Ok().json(names)
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_inactivity_hours() -> u64 {
    12
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let host = std::env::var("HOST").unwrap_or_else(|_| default_host());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or_else(default_port);
    let inactivity_hours: u64 = std::env::var("INACTIVITY_HOURS")
        .ok()
        .and_then(|h| h.parse().ok())
        .unwrap_or_else(default_inactivity_hours);
    let inactivity_timeout = Duration::from_secs(inactivity_hours * 3600);
    let bind = (host.as_str(), port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let state = Data::new(RwLock::new(HashMap::<TournamentId, TournamentEntry>::new()));
    let session_key = Key::generate();
    let serve_static = std::path::Path::new("static").is_dir();

    // Background task: periodically remove tournaments without recent activity
    let state_cleanup = state.clone();
    actix_web::rt::spawn(async move {
        let mut interval = tokio::time::interval(CLEANUP_INTERVAL);
        loop {
            interval.tick().await;
            let mut g = match state_cleanup.write() {
                Ok(guard) => guard,
                Err(_) => continue,
            };
            let before = g.len();
            g.retain(|_, entry| entry.last_activity.elapsed() < inactivity_timeout);
            let removed = before - g.len();
            if removed > 0 {
                log::info!(
                    "Cleaned up {} inactive tournament(s) (no activity for {}h)",
                    removed,
                    inactivity_hours
                );
            }
        }
    });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), session_key.clone())
                    .cookie_secure(false)
                    .build(),
            )
            .service(api_health)
            .service(favicon)
            .service(api_create_tournament)
            .service(api_current_tournament)
            .service(api_get_tournament)
            .service(api_delete_tournament)
            .service(api_submit_score)
            .service(api_reopen_match)
            .service(api_standings)
            .service(api_standings_csv)
            .service(api_finish_tournament)
            .service(api_known_players)
            .configure(|cfg| {
                if serve_static {
                    cfg.service(Files::new("/static", "static").show_files_listing());
                }
            })
    })
    .bind(bind)?
    .run()
    .await
}
