use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use axum_prometheus::PrometheusMetricLayer;
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use house_ops::config::AppConfig;
use house_ops::error::AppError;
use house_ops::telemetry;
use house_ops::workflows::competition::{CompetitionScorer, Leaderboard, PlaceholderSignals};
use house_ops::workflows::roster::demo::demo_history;
use house_ops::workflows::roster::import::HistoryImporter;
use house_ops::workflows::roster::InMemoryHistory;
use house_ops::workflows::rotation::{
    FairnessReport, FairnessReporter, FairnessScorer, HouseRotation, RotationAssigner,
    RotationWeights, STANDARD_CHORES,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
struct AppState {
    readiness: Arc<AtomicBool>,
    metrics: PrometheusHandle,
    history: Arc<InMemoryHistory>,
    weights: RotationWeights,
    placeholders: PlaceholderSignals,
}

#[derive(Parser, Debug)]
#[command(
    name = "House Operations",
    about = "Run the residency chore rotation and house competition service from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Chore rotation tooling
    Rotation {
        #[command(subcommand)]
        command: RotationCommand,
    },
    /// Print the current competition leaderboard
    Leaderboard(HistoryArgs),
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Subcommand, Debug)]
enum RotationCommand {
    /// Generate this week's chore assignments for every house
    Assign(HistoryArgs),
    /// Report workload balance per house
    Fairness(HistoryArgs),
}

#[derive(Args, Debug)]
struct HistoryArgs {
    /// Chore-tracker CSV export to run against (defaults to the demo roster)
    #[arg(long)]
    history_csv: Option<PathBuf>,
    /// Evaluation date (YYYY-MM-DD, defaults to today)
    #[arg(long, value_parser = parse_date)]
    today: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
struct AssignmentsRequest {
    /// Restrict to one house; omit to rotate every house.
    #[serde(default)]
    house: Option<String>,
    /// Task types to assign, in order. Defaults to the standard catalogue.
    #[serde(default)]
    task_types: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
struct AssignmentsResponse {
    generated_at: DateTime<Utc>,
    rotations: Vec<HouseRotation>,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => run_server(args).await,
        Command::Rotation {
            command: RotationCommand::Assign(args),
        } => run_rotation_assign(args),
        Command::Rotation {
            command: RotationCommand::Fairness(args),
        } => run_rotation_fairness(args),
        Command::Leaderboard(args) => run_leaderboard(args),
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

fn evaluation_time(today: Option<NaiveDate>) -> DateTime<Utc> {
    match today.and_then(|date| date.and_hms_opt(12, 0, 0)) {
        Some(naive) => naive.and_utc(),
        None => Utc::now(),
    }
}

fn load_history(args: &HistoryArgs, now: DateTime<Utc>) -> Result<InMemoryHistory, AppError> {
    match &args.history_csv {
        Some(path) => Ok(HistoryImporter::from_path(path)?),
        None => Ok(demo_history(now)),
    }
}

async fn run_server(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let state = AppState {
        readiness: readiness_flag.clone(),
        metrics: prometheus_handle,
        history: Arc::new(demo_history(Utc::now())),
        weights: config.engine.rotation_weights,
        placeholders: PlaceholderSignals::seeded(config.engine.placeholder_seed),
    };

    let app = Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/rotation/assignments", post(assignments_endpoint))
        .route("/api/v1/rotation/fairness", get(fairness_endpoint))
        .route("/api/v1/competition/leaderboard", get(leaderboard_endpoint))
        .layer(prometheus_layer)
        .with_state(state);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "house operations service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

fn run_rotation_assign(args: HistoryArgs) -> Result<(), AppError> {
    let now = evaluation_time(args.today);
    let history = load_history(&args, now)?;

    let assigner = RotationAssigner::new(
        Arc::new(history),
        FairnessScorer::new(RotationWeights::default()),
    );
    let rotations = assigner.weekly_assignments(now);
    render_rotations(&rotations, now);

    Ok(())
}

fn run_rotation_fairness(args: HistoryArgs) -> Result<(), AppError> {
    let now = evaluation_time(args.today);
    let history = load_history(&args, now)?;

    let report = FairnessReporter::new(Arc::new(history)).report();
    render_fairness(&report, now);

    Ok(())
}

fn run_leaderboard(args: HistoryArgs) -> Result<(), AppError> {
    let now = evaluation_time(args.today);
    let history = load_history(&args, now)?;

    let board = CompetitionScorer::new(Arc::new(history)).leaderboard(now);
    render_leaderboard(&board, now);

    Ok(())
}

async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn readiness_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

async fn metrics_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

async fn assignments_endpoint(
    State(state): State<AppState>,
    Json(payload): Json<AssignmentsRequest>,
) -> Result<Json<AssignmentsResponse>, AppError> {
    let now = Utc::now();
    let assigner = RotationAssigner::new(state.history.clone(), FairnessScorer::new(state.weights));

    let rotations = match payload.house {
        Some(house) => {
            let catalogue = payload.task_types.unwrap_or_else(standard_catalogue);
            let outcome = assigner.assign(&house, &catalogue, now)?;
            vec![HouseRotation { house, outcome }]
        }
        None => assigner.weekly_assignments(now),
    };

    Ok(Json(AssignmentsResponse {
        generated_at: now,
        rotations,
    }))
}

async fn fairness_endpoint(State(state): State<AppState>) -> Json<FairnessReport> {
    Json(FairnessReporter::new(state.history.clone()).report())
}

async fn leaderboard_endpoint(State(state): State<AppState>) -> Json<Leaderboard> {
    let scorer = CompetitionScorer::with_placeholders(state.history.clone(), state.placeholders);
    Json(scorer.leaderboard(Utc::now()))
}

fn standard_catalogue() -> Vec<String> {
    STANDARD_CHORES.iter().map(|chore| chore.to_string()).collect()
}

fn render_rotations(rotations: &[HouseRotation], now: DateTime<Utc>) {
    println!("Weekly chore rotation (evaluated {})", now.date_naive());

    for rotation in rotations {
        println!("\n{}", rotation.house);
        for line in &rotation.outcome.explanation {
            println!("- {line}");
        }
    }
}

fn render_fairness(report: &FairnessReport, now: DateTime<Utc>) {
    println!("Workload fairness report (evaluated {})", now.date_naive());
    println!("Overall fairness: {:.1}/100", report.overall_fairness);

    for house in &report.houses {
        println!("\n{}: {:.1}/100", house.house, house.fairness_score);
        for member in &house.members {
            println!(
                "- {}: {} assigned, {} completed ({:.0}%)",
                member.member_name,
                member.total_assigned,
                member.total_completed,
                member.completion_rate * 100.0
            );
        }
        for recommendation in &house.recommendations {
            println!("! {recommendation}");
        }
    }
}

fn render_leaderboard(board: &Leaderboard, now: DateTime<Utc>) {
    println!("House competition leaderboard (evaluated {})", now.date_naive());
    println!("Season progress: {:.0}%", board.season_progress);

    println!("\nStandings (last 30 days)");
    for score in &board.standings {
        let badge = score
            .badge
            .map(|badge| format!(" [{}]", badge.label()))
            .unwrap_or_default();
        println!(
            "{}. {} - {} pts{badge}",
            score.rank, score.house, score.total_points
        );
        println!(
            "   chores {} | punctuality {} | teamwork {} | cleanliness {} | participation {}",
            score.categories.chore_completion,
            score.categories.punctuality,
            score.categories.teamwork,
            score.categories.cleanliness,
            score.categories.participation
        );
        if !score.achievements.is_empty() {
            println!("   achievements: {}", score.achievements.join(", "));
        }
    }

    println!("\nWeekly sprint (last 7 days)");
    for score in &board.weekly {
        println!(
            "{}. {} - {} pts",
            score.rank, score.house, score.total_points
        );
    }
}
