//! Othello Web API
//!
//! Serves the engine over HTTP. `/next-move` is the stateless equivalent of
//! the browser's `computeNextMove` call; the remaining routes drive a single
//! shared game session with undo/redo history.

use std::sync::{Arc, Mutex, MutexGuard};

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};

use othello_core::{Board, Game, GameError, MoveReply, Side, Square, Strategy};

// =============================================================================
// Configuration
// =============================================================================

#[derive(Parser, Debug)]
#[command(about = "HTTP front end for the Othello engine")]
struct Args {
    /// Address to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "8000")]
    port: u16,
}

// =============================================================================
// Session State
// =============================================================================

/// Global game session state
struct GameSession {
    /// History of game states (index 0 = starting position)
    states: Vec<Game>,
    /// Squares played (moves[i] = move that led to states[i+1])
    moves: Vec<Square>,
    /// Current position in history
    current_index: usize,
}

impl GameSession {
    fn new() -> Self {
        Self {
            states: vec![Game::new()],
            moves: vec![],
            current_index: 0,
        }
    }

    fn current(&self) -> &Game {
        &self.states[self.current_index]
    }

    fn reset(&mut self) {
        *self = Self::new();
    }

    /// Record a new state after the cursor, dropping any redo branch.
    fn push(&mut self, game: Game, square: Square) {
        self.states.truncate(self.current_index + 1);
        self.moves.truncate(self.current_index);
        self.states.push(game);
        self.moves.push(square);
        self.current_index += 1;
    }

    fn can_undo(&self) -> bool {
        self.current_index > 0
    }

    fn can_redo(&self) -> bool {
        self.current_index < self.states.len() - 1
    }
}

type AppState = Arc<Mutex<GameSession>>;

fn lock(state: &AppState) -> MutexGuard<'_, GameSession> {
    // States are plain values; a panic elsewhere cannot leave one half-written
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

// =============================================================================
// JSON Models
// =============================================================================

#[derive(Deserialize)]
struct NextMoveRequest {
    board: String,
    turn: i32,
}

#[derive(Deserialize)]
struct AnalyzeRequest {
    board: String,
}

#[derive(Debug, Serialize)]
struct SideAnalysisModel {
    count: u32,
    mobility: u32,
    score: i32,
    legal_moves: Vec<(u8, u8)>,
}

#[derive(Debug, Serialize)]
struct AnalysisModel {
    evaluation: i32,
    terminal: bool,
    first: SideAnalysisModel,
    second: SideAnalysisModel,
}

#[derive(Debug, Serialize)]
struct GameStateModel {
    board: String,
    turn: Side,
    result: String,
    first_count: u32,
    second_count: u32,
    evaluation: i32,
    legal_moves: Vec<(u8, u8)>,
    last_move: Option<(u8, u8)>,
    move_index: usize,
    can_undo: bool,
    can_redo: bool,
}

#[derive(Deserialize)]
struct MoveRequest {
    row: i32,
    col: i32,
}

#[derive(Deserialize, Default)]
struct EngineMoveParams {
    /// Minimax unless given
    strategy: Option<Strategy>,
}

#[derive(Debug, Serialize)]
struct HealthModel {
    status: String,
}

#[derive(Debug, Serialize)]
struct ErrorModel {
    detail: String,
}

type ApiError = (StatusCode, Json<ErrorModel>);

fn bad_request(detail: impl ToString) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorModel {
            detail: detail.to_string(),
        }),
    )
}

fn internal_error(detail: impl ToString) -> ApiError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorModel {
            detail: detail.to_string(),
        }),
    )
}

// =============================================================================
// Conversion Functions
// =============================================================================

fn move_pairs(board: &Board, side: Side) -> Vec<(u8, u8)> {
    board
        .legal_moves(side)
        .iter()
        .map(|sq| (sq.row(), sq.col()))
        .collect()
}

fn side_to_model(board: &Board, side: Side) -> SideAnalysisModel {
    SideAnalysisModel {
        count: board.piece_count(side),
        mobility: board.count_legal_moves(side),
        score: board.positional_score(side),
        legal_moves: move_pairs(board, side),
    }
}

fn session_to_model(session: &GameSession) -> GameStateModel {
    let game = session.current();
    let board = game.board();
    let (first_count, second_count) = game.counts();
    let last_move = session.current_index.checked_sub(1).map(|i| {
        let sq = session.moves[i];
        (sq.row(), sq.col())
    });

    GameStateModel {
        board: board.to_encoding(),
        turn: game.turn(),
        result: game.outcome().as_str().to_string(),
        first_count,
        second_count,
        evaluation: game.evaluation(),
        legal_moves: move_pairs(board, game.turn()),
        last_move,
        move_index: session.current_index,
        can_undo: session.can_undo(),
        can_redo: session.can_redo(),
    }
}

// =============================================================================
// API Endpoints
// =============================================================================

async fn next_move(Json(req): Json<NextMoveRequest>) -> Result<Json<MoveReply>, ApiError> {
    let board = Board::from_encoding(&req.board).map_err(bad_request)?;
    let side = Side::from_turn_flag(req.turn);
    let best = tokio::task::spawn_blocking(move || othello_core::best_move(&board, side))
        .await
        .map_err(internal_error)?;
    Ok(Json(MoveReply::from(best)))
}

async fn analyze(Json(req): Json<AnalyzeRequest>) -> Result<Json<AnalysisModel>, ApiError> {
    let board = Board::from_encoding(&req.board).map_err(bad_request)?;
    Ok(Json(AnalysisModel {
        evaluation: board.evaluate(),
        terminal: board.is_terminal(),
        first: side_to_model(&board, Side::First),
        second: side_to_model(&board, Side::Second),
    }))
}

async fn get_game(State(state): State<AppState>) -> Json<GameStateModel> {
    let session = lock(&state);
    Json(session_to_model(&session))
}

async fn make_move(
    State(state): State<AppState>,
    Json(req): Json<MoveRequest>,
) -> Result<Json<GameStateModel>, ApiError> {
    let square = Square::new(req.row, req.col).ok_or_else(|| {
        bad_request(GameError::IllegalMove {
            row: req.row,
            col: req.col,
        })
    })?;

    let mut session = lock(&state);
    let mut game = *session.current();
    game.play(square).map_err(bad_request)?;
    session.push(game, square);
    Ok(Json(session_to_model(&session)))
}

async fn engine_move(
    State(state): State<AppState>,
    Query(params): Query<EngineMoveParams>,
) -> Result<Json<GameStateModel>, ApiError> {
    let strategy = params.strategy.unwrap_or_default();
    let before = *lock(&state).current();

    // Search off the async workers; the session stays unlocked meanwhile
    let (after, played) = tokio::task::spawn_blocking(move || {
        let mut game = before;
        game.strategy_move(strategy).map(|played| (game, played))
    })
    .await
    .map_err(internal_error)?
    .map_err(bad_request)?;

    let mut session = lock(&state);
    if *session.current() != before {
        return Err((
            StatusCode::CONFLICT,
            Json(ErrorModel {
                detail: "Game changed during search".to_string(),
            }),
        ));
    }
    let square = played.ok_or_else(|| bad_request(format!("{} found no move to play", strategy)))?;
    session.push(after, square);
    Ok(Json(session_to_model(&session)))
}

async fn reset_game(State(state): State<AppState>) -> Json<GameStateModel> {
    let mut session = lock(&state);
    session.reset();
    Json(session_to_model(&session))
}

async fn undo(State(state): State<AppState>) -> Result<Json<GameStateModel>, ApiError> {
    let mut session = lock(&state);
    if !session.can_undo() {
        return Err(bad_request("Nothing to undo"));
    }
    session.current_index -= 1;
    Ok(Json(session_to_model(&session)))
}

async fn redo(State(state): State<AppState>) -> Result<Json<GameStateModel>, ApiError> {
    let mut session = lock(&state);
    if !session.can_redo() {
        return Err(bad_request("Nothing to redo"));
    }
    session.current_index += 1;
    Ok(Json(session_to_model(&session)))
}

async fn health() -> Json<HealthModel> {
    Json(HealthModel {
        status: "ok".to_string(),
    })
}

fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/next-move", post(next_move))
        .route("/analyze", post(analyze))
        .route("/game", get(get_game))
        .route("/move", post(make_move))
        .route("/engine-move", post(engine_move))
        .route("/reset", post(reset_game))
        .route("/undo", post(undo))
        .route("/redo", post(redo))
        .route("/health", get(health))
        .layer(cors)
        .with_state(state)
}

// =============================================================================
// Main
// =============================================================================

#[tokio::main]
async fn main() {
    let args = Args::parse();
    let state: AppState = Arc::new(Mutex::new(GameSession::new()));

    let addr = format!("{}:{}", args.host, args.port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            eprintln!("Failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };
    println!("Othello API running on http://{}", addr);

    if let Err(e) = axum::serve(listener, app(state)).await {
        eprintln!("Server error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_state() -> AppState {
        Arc::new(Mutex::new(GameSession::new()))
    }

    #[tokio::test]
    async fn test_next_move_initial() {
        let req = NextMoveRequest {
            board: Board::initial().to_encoding(),
            turn: 0,
        };
        let Json(reply) = next_move(Json(req)).await.unwrap();
        assert_eq!(reply, MoveReply { row: 2, col: 3 });
    }

    #[tokio::test]
    async fn test_next_move_no_move() {
        let req = NextMoveRequest {
            board: "b".repeat(64),
            turn: 1,
        };
        let Json(reply) = next_move(Json(req)).await.unwrap();
        assert_eq!(reply, MoveReply::NONE);
    }

    #[tokio::test]
    async fn test_next_move_bad_board() {
        let req = NextMoveRequest {
            board: "bw".to_string(),
            turn: 0,
        };
        let (status, Json(err)) = next_move(Json(req)).await.unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(err.detail.contains("64"));
    }

    #[tokio::test]
    async fn test_analyze_initial() {
        let req = AnalyzeRequest {
            board: Board::initial().to_encoding(),
        };
        let Json(model) = analyze(Json(req)).await.unwrap();
        assert_eq!(model.evaluation, 0);
        assert!(!model.terminal);
        assert_eq!(model.first.count, 2);
        assert_eq!(model.second.mobility, 4);
        assert_eq!(model.first.legal_moves, vec![(2, 3), (3, 2), (4, 5), (5, 4)]);
    }

    #[tokio::test]
    async fn test_move_undo_redo() {
        let state = new_state();

        let Json(model) = make_move(State(state.clone()), Json(MoveRequest { row: 2, col: 3 }))
            .await
            .unwrap();
        assert_eq!(model.turn, Side::Second);
        assert_eq!(model.last_move, Some((2, 3)));
        assert_eq!((model.first_count, model.second_count), (4, 1));
        assert!(model.can_undo);

        let Json(model) = undo(State(state.clone())).await.unwrap();
        assert_eq!(model.move_index, 0);
        assert_eq!(model.board, Board::initial().to_encoding());
        assert!(model.can_redo);

        let Json(model) = redo(State(state.clone())).await.unwrap();
        assert_eq!(model.move_index, 1);
        assert!(!model.can_redo);

        assert!(redo(State(state)).await.is_err());
    }

    #[tokio::test]
    async fn test_illegal_move_rejected() {
        let state = new_state();
        let (status, Json(err)) = make_move(State(state.clone()), Json(MoveRequest { row: 0, col: 0 }))
            .await
            .unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(err.detail, "illegal move at (0,0)");

        let Json(model) = get_game(State(state)).await;
        assert_eq!(model.move_index, 0);
    }

    #[tokio::test]
    async fn test_move_after_undo_drops_redo_branch() {
        let state = new_state();
        make_move(State(state.clone()), Json(MoveRequest { row: 2, col: 3 })).await.unwrap();
        undo(State(state.clone())).await.unwrap();
        let Json(model) = make_move(State(state.clone()), Json(MoveRequest { row: 3, col: 2 }))
            .await
            .unwrap();
        assert_eq!(model.move_index, 1);
        assert!(!model.can_redo);
        assert_eq!(model.last_move, Some((3, 2)));
    }

    #[tokio::test]
    async fn test_engine_move_and_reset() {
        let state = new_state();
        let Json(model) = engine_move(State(state.clone()), Query(EngineMoveParams::default()))
            .await
            .unwrap();
        assert_eq!(model.last_move, Some((2, 3)));
        assert_eq!(model.turn, Side::Second);

        let Json(model) = reset_game(State(state)).await;
        assert_eq!(model.move_index, 0);
        assert_eq!(model.result, "ongoing");
    }

    #[tokio::test]
    async fn test_engine_move_with_strategy() {
        let state = new_state();
        make_move(State(state.clone()), Json(MoveRequest { row: 2, col: 3 })).await.unwrap();

        let params = EngineMoveParams {
            strategy: Some(Strategy::MobilityDifference),
        };
        let Json(model) = engine_move(State(state), Query(params)).await.unwrap();
        assert_eq!(model.last_move, Some((2, 2)));
        assert_eq!(model.turn, Side::First);
    }

    #[tokio::test]
    async fn test_engine_move_game_over() {
        let state = new_state();
        let board = Board::from_masks(0x0000_0000_FFFF_FFFF, 0xFFFF_FFFF_0000_0000).unwrap();
        lock(&state).states[0] = Game::from_position(board, Side::First);

        let (status, Json(err)) = engine_move(State(state), Query(EngineMoveParams::default()))
            .await
            .unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(err.detail, "game is already over");
    }

    #[test]
    fn test_strategy_query_names() {
        let params: EngineMoveParams = serde_json::from_str(r#"{"strategy":"minimize-opponent-mobility"}"#).unwrap();
        assert_eq!(params.strategy, Some(Strategy::MinimizeOpponentMobility));
        let params: EngineMoveParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params.strategy, None);
    }

    #[tokio::test]
    async fn test_health() {
        let Json(model) = health().await;
        assert_eq!(model.status, "ok");
    }
}
