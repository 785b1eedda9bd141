//! REST handlers for the player resource

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    routing::get,
    Json, Router,
};

use super::error::{ApiError, ApiOperation};
use crate::{
    players::{validation::parse_player_id, Player, PlayerFilter, PlayerListQuery, PlayerPatch},
    repository::PlayerRepository,
    state::AppState,
};

/// Base path of the player resource
pub const PLAYERS_PATH: &str = "/rest/players";

/// Player routes, mounted under [`PLAYERS_PATH`]
pub fn routes<R: PlayerRepository>() -> Router<AppState<R>> {
    Router::new()
        .route(PLAYERS_PATH, get(list_players::<R>).post(create_player::<R>))
        .route(&format!("{PLAYERS_PATH}/count"), get(count_players::<R>))
        .route(
            &format!("{PLAYERS_PATH}/{{id}}"),
            get(get_player::<R>)
                .post(update_player::<R>)
                .delete(delete_player::<R>),
        )
}

fn query_or_bad_request<T>(
    operation: ApiOperation,
    query: Result<Query<T>, QueryRejection>,
) -> Result<T, ApiError> {
    query
        .map(|Query(value)| value)
        .map_err(|e| ApiError::bad_request(operation, e.body_text()))
}

fn json_or_bad_request<T>(
    operation: ApiOperation,
    body: Result<Json<T>, JsonRejection>,
) -> Result<T, ApiError> {
    body.map(|Json(value)| value)
        .map_err(|e| ApiError::bad_request(operation, e.body_text()))
}

async fn list_players<R: PlayerRepository>(
    State(state): State<AppState<R>>,
    query: Result<Query<PlayerListQuery>, QueryRejection>,
) -> Result<Json<Vec<Player>>, ApiError> {
    let op = ApiOperation::List;
    let (filter, order, page) = query_or_bad_request(op, query)?.into_parts();

    let players = state
        .players()
        .list(&filter, order, page)
        .await
        .map_err(|e| ApiError::from_player(op, e))?;

    Ok(Json(players))
}

async fn count_players<R: PlayerRepository>(
    State(state): State<AppState<R>>,
    query: Result<Query<PlayerFilter>, QueryRejection>,
) -> Result<Json<u64>, ApiError> {
    let op = ApiOperation::Count;
    let filter = query_or_bad_request(op, query)?;

    let count = state
        .players()
        .count(&filter)
        .await
        .map_err(|e| ApiError::from_player(op, e))?;

    Ok(Json(count))
}

async fn create_player<R: PlayerRepository>(
    State(state): State<AppState<R>>,
    body: Result<Json<PlayerPatch>, JsonRejection>,
) -> Result<Json<Player>, ApiError> {
    let op = ApiOperation::Create;
    let patch = json_or_bad_request(op, body)?;

    let player = state
        .players()
        .create(patch)
        .await
        .map_err(|e| ApiError::from_player(op, e))?;

    Ok(Json(player))
}

async fn get_player<R: PlayerRepository>(
    State(state): State<AppState<R>>,
    Path(raw_id): Path<String>,
) -> Result<Json<Player>, ApiError> {
    let op = ApiOperation::Get;
    let id = parse_player_id(Some(&raw_id)).map_err(|e| ApiError::from_player(op, e))?;

    let player = state
        .players()
        .get(id)
        .await
        .map_err(|e| ApiError::from_player(op, e))?;

    Ok(Json(player))
}

async fn update_player<R: PlayerRepository>(
    State(state): State<AppState<R>>,
    Path(raw_id): Path<String>,
    body: Result<Json<PlayerPatch>, JsonRejection>,
) -> Result<Json<Player>, ApiError> {
    let op = ApiOperation::Update;
    let id = parse_player_id(Some(&raw_id)).map_err(|e| ApiError::from_player(op, e))?;
    let patch = json_or_bad_request(op, body)?;

    let player = state
        .players()
        .update(id, patch)
        .await
        .map_err(|e| ApiError::from_player(op, e))?;

    Ok(Json(player))
}

async fn delete_player<R: PlayerRepository>(
    State(state): State<AppState<R>>,
    Path(raw_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let op = ApiOperation::Delete;
    let id = parse_player_id(Some(&raw_id)).map_err(|e| ApiError::from_player(op, e))?;

    state
        .players()
        .delete(id)
        .await
        .map_err(|e| ApiError::from_player(op, e))?;

    Ok(StatusCode::OK)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::repository::InMemoryPlayerRepository;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app() -> Router {
        let state = AppState::new(Config::default(), InMemoryPlayerRepository::new());
        routes::<InMemoryPlayerRepository>().with_state(state)
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    fn new_player(name: &str, experience: i64, race: &str) -> Value {
        json!({
            "name": name,
            "title": "Wayfarer",
            "race": race,
            "profession": "ROGUE",
            "experience": experience,
            "birthday": 1_262_304_000_000_i64, // 2010-01-01
        })
    }

    #[tokio::test]
    async fn test_create_then_get() {
        let app = app();
        let (status, created) =
            send(&app, Method::POST, "/rest/players", Some(new_player("Ann", 0, "HUMAN"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(created["level"], 0);
        assert_eq!(created["untilNextLevel"], 100);
        assert_eq!(created["banned"], false);

        let uri = format!("/rest/players/{}", created["id"]);
        let (status, fetched) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_payloads() {
        let app = app();

        let (status, body) = send(
            &app,
            Method::POST,
            "/rest/players",
            Some(new_player("Thirteenchars", 0, "HUMAN")),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "BAD_REQUEST");
        assert_eq!(body["operation"], "create");

        let mut missing_race = new_player("Ann", 0, "HUMAN");
        missing_race.as_object_mut().unwrap().remove("race");
        let (status, _) = send(&app, Method::POST, "/rest/players", Some(missing_race)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) =
            send(&app, Method::POST, "/rest/players", Some(new_player("Ann", 0, "GOBLIN"))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_invalid_ids_are_bad_requests() {
        let app = app();
        for uri in ["/rest/players/0", "/rest/players/abc", "/rest/players/-1"] {
            let (status, _) = send(&app, Method::GET, uri, None).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        }
    }

    #[tokio::test]
    async fn test_unknown_id_is_not_found() {
        let app = app();
        let (status, body) = send(&app, Method::GET, "/rest/players/99", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["entity_id"], "99");

        let (status, _) = send(&app, Method::DELETE, "/rest/players/99", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) =
            send(&app, Method::POST, "/rest/players/99", Some(json!({"banned": true}))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let app = app();
        let (_, created) =
            send(&app, Method::POST, "/rest/players", Some(new_player("Ann", 0, "ELF"))).await;
        let uri = format!("/rest/players/{}", created["id"]);

        let (status, updated) =
            send(&app, Method::POST, &uri, Some(json!({"experience": 100, "banned": true}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["level"], 1);
        assert_eq!(updated["untilNextLevel"], 200);
        assert_eq!(updated["banned"], true);
        assert_eq!(updated["name"], "Ann");

        let (status, body) = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, Value::Null);

        let (status, _) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_list_filters_pages_and_counts() {
        let app = app();
        for (name, exp, race) in [
            ("Ann", 10, "HUMAN"),
            ("Bob", 500, "DWARF"),
            ("Cid", 5000, "HUMAN"),
            ("Dan", 50, "HUMAN"),
            ("Eve", 20, "ELF"),
        ] {
            send(&app, Method::POST, "/rest/players", Some(new_player(name, exp, race))).await;
        }

        // Default page is the first three by id
        let (status, page) = send(&app, Method::GET, "/rest/players", None).await;
        assert_eq!(status, StatusCode::OK);
        let names: Vec<_> = page.as_array().unwrap().iter().map(|p| p["name"].clone()).collect();
        assert_eq!(names, [json!("Ann"), json!("Bob"), json!("Cid")]);

        let (_, page) = send(
            &app,
            Method::GET,
            "/rest/players?race=HUMAN&order=EXPERIENCE&pageNumber=0&pageSize=2",
            None,
        )
        .await;
        let names: Vec<_> = page.as_array().unwrap().iter().map(|p| p["name"].clone()).collect();
        assert_eq!(names, [json!("Ann"), json!("Dan")]);

        let (status, count) = send(
            &app,
            Method::GET,
            "/rest/players/count?race=HUMAN&minExperience=50&pageSize=1",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(count, json!(2));

        let (_, count) = send(&app, Method::GET, "/rest/players/count", None).await;
        assert_eq!(count, json!(5));
    }

    fn names(page: &Value) -> Vec<&str> {
        page.as_array()
            .unwrap()
            .iter()
            .map(|p| p["name"].as_str().unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_list_honours_every_filter_parameter() {
        let app = app();
        for (name, exp, race) in [
            ("Zed", 10, "HUMAN"),
            ("Bob", 500, "DWARF"),
            ("Cid", 5000, "HUMAN"),
            ("Amy", 50, "ELF"),
        ] {
            send(&app, Method::POST, "/rest/players", Some(new_player(name, exp, race))).await;
        }
        // Bob: level 2, born 2015-06-01, banned
        let (status, _) = send(
            &app,
            Method::POST,
            "/rest/players/2",
            Some(json!({
                "title": "Ironhand",
                "profession": "WARRIOR",
                "birthday": 1_433_116_800_000_i64,
                "banned": true,
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let cases = [
            ("title=Iron", vec!["Bob"]),
            ("profession=WARRIOR", vec!["Bob"]),
            ("profession=ROGUE&pageSize=5", vec!["Zed", "Cid", "Amy"]),
            ("after=1420070400000&before=1451606399999", vec!["Bob"]),
            ("after=1420070400000", vec!["Bob"]),
            ("before=1420070400000&pageSize=5", vec!["Zed", "Cid", "Amy"]),
            ("banned=true", vec!["Bob"]),
            ("banned=false&pageSize=5", vec!["Zed", "Cid", "Amy"]),
            ("minLevel=1&maxLevel=5", vec!["Bob"]),
            ("minLevel=1", vec!["Bob", "Cid"]),
            ("maxLevel=0&pageSize=5", vec!["Zed", "Amy"]),
            ("minExperience=50&maxExperience=500", vec!["Bob", "Amy"]),
            ("order=NAME&pageSize=4", vec!["Amy", "Bob", "Cid", "Zed"]),
            ("order=LEVEL&pageSize=4", vec!["Zed", "Amy", "Bob", "Cid"]),
            ("order=BIRTHDAY&pageSize=4", vec!["Zed", "Cid", "Amy", "Bob"]),
            ("order=NAME&pageNumber=1&pageSize=3", vec!["Zed"]),
        ];
        for (query, expected) in cases {
            let (status, page) =
                send(&app, Method::GET, &format!("/rest/players?{query}"), None).await;
            assert_eq!(status, StatusCode::OK, "{query}");
            assert_eq!(names(&page), expected, "{query}");

            let (status, count) =
                send(&app, Method::GET, &format!("/rest/players/count?{query}"), None).await;
            assert_eq!(status, StatusCode::OK, "{query}");
            if !query.contains("page") {
                assert_eq!(count, json!(expected.len()), "{query}");
            }
        }
    }

    #[tokio::test]
    async fn test_list_rejects_bad_query() {
        let app = app();
        let (status, _) = send(&app, Method::GET, "/rest/players?pageSize=0", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(&app, Method::GET, "/rest/players?minLevel=high", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
