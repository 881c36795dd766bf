//! Single binary web server: JSON API over the tournament standings.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default.
//! Override with env: HOST, PORT, PARTICIPANTS_CSV
//! (directory import, default data/participants.csv).

use actix_web::{
    get, post, put,
    web::{Data, Json, Path, Query},
    App, HttpResponse, HttpServer, Responder,
};
use horse_tournament_standings::{
    draw_seeding, generate_first_round, load_standings, record_match_result, save_standings,
    schedule_tournament, seed_by_ranking, suggest_candidates, BracketPath, HorseId,
    ParticipantDirectory, TournamentCreate, TournamentError, TournamentId, TournamentSearch,
    TournamentStandings, TournamentStore,
};
use serde::Deserialize;

/// Shared state: tournament store and the horse directory it seeds from.
struct AppData {
    store: TournamentStore,
    directory: ParticipantDirectory,
}

type AppState = Data<AppData>;

/// Most directory hits returned by one search.
const PARTICIPANT_SEARCH_LIMIT: usize = 25;

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct ParticipantQuery {
    #[serde(default)]
    name: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "snake_case")]
enum SeedMethod {
    Ranking,
    Draw,
}

#[derive(Deserialize)]
struct SeedBody {
    method: SeedMethod,
}

#[derive(Deserialize)]
struct RecordResultBody {
    #[serde(default)]
    path: BracketPath,
    horse_id: HorseId,
}

#[derive(Deserialize)]
struct SuggestionQuery {
    #[serde(default)]
    path: BracketPath,
    #[serde(default)]
    query: String,
}

/// Path segment: tournament id (e.g. /api/tournaments/{id}/standings)
#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

/// Map a tournament error to a status code with a JSON `{ "error": ... }` body.
fn error_response(e: &TournamentError) -> HttpResponse {
    let body = match e {
        TournamentError::Validation(errors) => {
            serde_json::json!({ "error": e.to_string(), "errors": errors })
        }
        _ => serde_json::json!({ "error": e.to_string() }),
    };
    match e {
        TournamentError::NotFound(_) => HttpResponse::NotFound().json(body),
        TournamentError::AlreadyStarted | TournamentError::IllegalAdvance(_) => {
            HttpResponse::Conflict().json(body)
        }
        TournamentError::InvalidBracketInput(_)
        | TournamentError::BracketCorrupted(_)
        | TournamentError::Validation(_) => HttpResponse::UnprocessableEntity().json(body),
        TournamentError::Storage(_) => {
            log::error!("{e}");
            HttpResponse::InternalServerError().json(body)
        }
    }
}

fn standings_response(result: Result<TournamentStandings, TournamentError>) -> HttpResponse {
    match result {
        Ok(standings) => HttpResponse::Ok().json(standings),
        Err(e) => error_response(&e),
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "horse-tournament-standings",
    })
}

/// Search the horse directory by name.
#[get("/api/participants")]
async fn api_search_participants(state: AppState, query: Query<ParticipantQuery>) -> HttpResponse {
    HttpResponse::Ok().json(state.directory.search(&query.name, PARTICIPANT_SEARCH_LIMIT))
}

/// Schedule a tournament (returns its standings with an empty bracket).
#[post("/api/tournaments")]
async fn api_create_tournament(state: AppState, body: Json<TournamentCreate>) -> HttpResponse {
    let result = schedule_tournament(&body, &state.directory).and_then(|(tournament, standings)| {
        state.store.insert(tournament, standings.clone())?;
        Ok(standings)
    });
    match result {
        Ok(standings) => HttpResponse::Created().json(standings),
        Err(e) => error_response(&e),
    }
}

/// Search tournaments by name and date range.
#[get("/api/tournaments")]
async fn api_search_tournaments(state: AppState, query: Query<TournamentSearch>) -> HttpResponse {
    match state.store.search(&query) {
        Ok(found) => HttpResponse::Ok().json(found),
        Err(e) => error_response(&e),
    }
}

/// Get a tournament's schedule record (404 if not found).
#[get("/api/tournaments/{id}")]
async fn api_get_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    match state.store.tournament(path.id) {
        Ok(tournament) => HttpResponse::Ok().json(tournament),
        Err(e) => error_response(&e),
    }
}

/// Get the standings of a tournament (404 if not found).
#[get("/api/tournaments/{id}/standings")]
async fn api_get_standings(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    standings_response(load_standings(&state.store, path.id))
}

/// Replace the standings of a tournament (rejected if the bracket is inconsistent).
#[put("/api/tournaments/{id}/standings")]
async fn api_save_standings(
    state: AppState,
    path: Path<TournamentPath>,
    body: Json<TournamentStandings>,
) -> HttpResponse {
    if body.id != path.id {
        return HttpResponse::BadRequest()
            .json(serde_json::json!({ "error": "Tournament id does not match the standings" }));
    }
    standings_response(save_standings(&state.store, body.into_inner()))
}

/// Generate the first round from the roster (rejected once anyone has advanced).
#[post("/api/tournaments/{id}/standings/generate")]
async fn api_generate_first_round(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    standings_response(state.store.update_standings(path.id, generate_first_round))
}

/// Reorder the roster by past results or by a random draw.
#[post("/api/tournaments/{id}/standings/seed")]
async fn api_seed(
    state: AppState,
    path: Path<TournamentPath>,
    body: Json<SeedBody>,
) -> HttpResponse {
    let result = match body.method {
        SeedMethod::Ranking => state.store.history_before(path.id).and_then(|history| {
            state
                .store
                .update_standings(path.id, |s| seed_by_ranking(s, &history))
        }),
        SeedMethod::Draw => state
            .store
            .update_standings(path.id, |s| draw_seeding(s, &mut rand::thread_rng())),
    };
    standings_response(result)
}

/// Set the winner of one match.
#[put("/api/tournaments/{id}/standings/result")]
async fn api_record_result(
    state: AppState,
    path: Path<TournamentPath>,
    body: Json<RecordResultBody>,
) -> HttpResponse {
    standings_response(
        state
            .store
            .update_standings(path.id, |s| record_match_result(s, &body.path, body.horse_id)),
    )
}

/// Eligible picks for the node at `path`, filtered by `query`.
#[get("/api/tournaments/{id}/standings/suggestions")]
async fn api_suggestions(
    state: AppState,
    path: Path<TournamentPath>,
    query: Query<SuggestionQuery>,
) -> HttpResponse {
    let standings = match load_standings(&state.store, path.id) {
        Ok(s) => s,
        Err(e) => return error_response(&e),
    };
    match standings.tree.node_at(&query.path) {
        Some(branch) => HttpResponse::Ok().json(suggest_candidates(
            branch,
            &standings.participants,
            &query.query,
        )),
        None => HttpResponse::NotFound().json(serde_json::json!({
            "error": format!("No bracket node at {:?}", query.path.to_string())
        })),
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_participants_csv() -> String {
    "data/participants.csv".to_string()
}

fn load_directory(path: &str) -> ParticipantDirectory {
    match ParticipantDirectory::from_csv_path(path) {
        Ok(directory) => {
            log::info!("Loaded {} horses from {}", directory.len(), path);
            directory
        }
        Err(e) => {
            log::warn!("Could not load participant directory from {}: {}", path, e);
            ParticipantDirectory::default()
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let host = std::env::var("HOST").unwrap_or_else(|_| default_host());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or_else(default_port);
    let csv_path =
        std::env::var("PARTICIPANTS_CSV").unwrap_or_else(|_| default_participants_csv());

    let state = Data::new(AppData {
        store: TournamentStore::new(),
        directory: load_directory(&csv_path),
    });

    let bind = (host.as_str(), port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(api_health)
            .service(api_search_participants)
            .service(api_create_tournament)
            .service(api_search_tournaments)
            .service(api_get_tournament)
            .service(api_get_standings)
            .service(api_save_standings)
            .service(api_generate_first_round)
            .service(api_seed)
            .service(api_record_result)
            .service(api_suggestions)
    })
    .bind(bind)?
    .run()
    .await
}
