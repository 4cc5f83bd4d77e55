use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{error, info, warn};

use crate::{
    app_state::AppState,
    models::{FieldViolation, NewThought, ThoughtPayload, ViolationKind},
    response::{Response, BAD_REQUEST, CREATED, INTERNAL_SERVER_ERROR, OK},
};

/// How many thoughts `GET /thoughts` returns.
pub const RECENT_LIMIT: usize = 20;

#[derive(Serialize, Debug)]
struct SaveFailure<'a> {
    error: &'static str,
    details: &'a BTreeMap<String, FieldViolation>,
}

fn save_failure(details: &BTreeMap<String, FieldViolation>) -> Response {
    Response::json(
        BAD_REQUEST,
        &SaveFailure {
            error: "Could not save thought",
            details,
        },
    )
}

pub(crate) async fn handle_list(state: &AppState) -> Response {
    match state.store.recent(RECENT_LIMIT).await {
        Ok(thoughts) => Response::json(OK, &thoughts),
        Err(e) => {
            error!(error = %e, "error while fetching thoughts");
            Response::error(INTERNAL_SERVER_ERROR, "Could not fetch thoughts")
        }
    }
}

pub(crate) async fn handle_create(body: Option<&str>, state: &AppState) -> Response {
    // a missing body reads as an empty object, which then fails as a missing message
    let payload: ThoughtPayload = match body.map(str::trim).filter(|b| !b.is_empty()) {
        Some(body) => match serde_json::from_str(body) {
            Ok(v) => v,
            Err(e) => {
                let violation = FieldViolation {
                    kind: ViolationKind::Json,
                    message: e.to_string(),
                    path: "body".to_string(),
                    value: None,
                };
                return save_failure(&BTreeMap::from([("body".to_string(), violation)]));
            }
        },
        None => ThoughtPayload::default(),
    };

    let thought = match NewThought::new(payload.message) {
        Ok(thought) => thought,
        Err(e) => {
            warn!(error = %e, "rejected thought");
            return save_failure(&e.errors);
        }
    };

    match state.store.insert(thought).await {
        Ok(thought) => {
            info!(id = %thought.id, "created thought");
            Response::json(CREATED, &thought)
        }
        Err(e) => {
            // write failures are reported the same way as validation failures
            error!(error = %e, "error while saving thought");
            save_failure(&BTreeMap::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        cors::CorsPolicy,
        models::Thought,
        store::{MemoryThoughtStore, ThoughtStore},
    };

    fn state_with(store: Arc<MemoryThoughtStore>) -> AppState {
        AppState::new(store, CorsPolicy::new("https://example.netlify.app"))
    }

    fn json(response: &Response) -> serde_json::Value {
        serde_json::from_str(response.content().unwrap()).unwrap()
    }

    #[tokio::test]
    async fn creates_valid_thought() {
        let store = Arc::new(MemoryThoughtStore::new());
        let state = state_with(Arc::clone(&store));

        let response = handle_create(Some(r#"{"message":"Sunny day!","hearts":99}"#), &state).await;
        assert_eq!(response.get_status_line(), CREATED);
        let thought: Thought = serde_json::from_str(response.content().unwrap()).unwrap();
        assert_eq!(thought.message, "Sunny day!");
        // only `message` is read from the body
        assert_eq!(thought.hearts, 0);
        assert_eq!(store.recent(RECENT_LIMIT).await.unwrap(), vec![thought]);
    }

    #[tokio::test]
    async fn rejects_short_message_without_writing() {
        let store = Arc::new(MemoryThoughtStore::new());
        let state = state_with(Arc::clone(&store));

        let response = handle_create(Some(r#"{"message":"hi"}"#), &state).await;
        assert_eq!(response.get_status_line(), BAD_REQUEST);
        let body = json(&response);
        assert_eq!(body["error"], "Could not save thought");
        assert_eq!(body["details"]["message"]["kind"], "minlength");
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn missing_body_is_missing_message() {
        let state = state_with(Arc::new(MemoryThoughtStore::new()));

        for body in [None, Some(""), Some("{}"), Some(r#"{"message":null}"#)] {
            let response = handle_create(body, &state).await;
            assert_eq!(response.get_status_line(), BAD_REQUEST);
            assert_eq!(json(&response)["details"]["message"]["kind"], "required");
        }
    }

    #[tokio::test]
    async fn unparsable_body_is_bad_request() {
        let state = state_with(Arc::new(MemoryThoughtStore::new()));

        let response = handle_create(Some("{message: nope"), &state).await;
        assert_eq!(response.get_status_line(), BAD_REQUEST);
        assert_eq!(json(&response)["details"]["body"]["kind"], "json");
    }

    #[tokio::test]
    async fn non_string_message_is_not_coerced() {
        let store = Arc::new(MemoryThoughtStore::new());
        let state = state_with(Arc::clone(&store));

        let response = handle_create(Some(r#"{"message":12345}"#), &state).await;
        assert_eq!(response.get_status_line(), BAD_REQUEST);
        assert_eq!(json(&response)["details"]["body"]["kind"], "json");
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn lists_newest_first() {
        let store = Arc::new(MemoryThoughtStore::new());
        let state = state_with(Arc::clone(&store));
        for i in 0..3 {
            handle_create(Some(format!(r#"{{"message":"thought #{i}"}}"#).as_str()), &state).await;
        }

        let response = handle_list(&state).await;
        assert_eq!(response.get_status_line(), OK);
        let thoughts: Vec<Thought> = serde_json::from_str(response.content().unwrap()).unwrap();
        assert_eq!(thoughts.len(), 3);
        assert_eq!(thoughts[0].message, "thought #2");
    }
}
