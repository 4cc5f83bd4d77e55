use tracing::{error, warn};
use uuid::Uuid;

use crate::{
    app_state::AppState,
    response::{Response, INTERNAL_SERVER_ERROR, NOT_FOUND, OK},
};

pub(crate) async fn handle_like(id: &str, state: &AppState) -> Response {
    let id: Uuid = match id.parse() {
        Ok(id) => id,
        Err(e) => {
            warn!(id, error = %e, "malformed thought id");
            return Response::error(INTERNAL_SERVER_ERROR, "Could not update hearts");
        }
    };

    match state.store.toggle_hearts(id).await {
        Ok(Some(thought)) => Response::json(OK, &thought),
        Ok(None) => Response::error(NOT_FOUND, "Thought not found"),
        Err(e) => {
            error!(%id, error = %e, "error while updating hearts");
            Response::error(INTERNAL_SERVER_ERROR, "Could not update hearts")
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        cors::CorsPolicy,
        models::{NewThought, Thought},
        store::{MemoryThoughtStore, ThoughtStore},
    };

    async fn seeded() -> (AppState, Thought) {
        let store = Arc::new(MemoryThoughtStore::new());
        let thought = store
            .insert(NewThought::new(Some("like me twice".to_string())).unwrap())
            .await
            .unwrap();
        (
            AppState::new(store, CorsPolicy::new("https://example.netlify.app")),
            thought,
        )
    }

    fn hearts(response: &Response) -> i64 {
        let body: serde_json::Value = serde_json::from_str(response.content().unwrap()).unwrap();
        body["hearts"].as_i64().unwrap()
    }

    #[tokio::test]
    async fn toggles_between_zero_and_one() {
        let (state, thought) = seeded().await;
        let id = thought.id.to_string();

        let first = handle_like(&id, &state).await;
        assert_eq!(first.get_status_line(), OK);
        assert_eq!(hearts(&first), 1);

        let second = handle_like(&id, &state).await;
        assert_eq!(hearts(&second), 0);
    }

    #[tokio::test]
    async fn unknown_id_is_not_found() {
        let (state, thought) = seeded().await;

        let response = handle_like(&Uuid::new_v4().to_string(), &state).await;
        assert_eq!(response.get_status_line(), NOT_FOUND);
        assert_eq!(response.content(), Some(r#"{"error":"Thought not found"}"#));
        assert_eq!(state.store.recent(20).await.unwrap(), vec![thought]);
    }

    #[tokio::test]
    async fn malformed_id_is_internal_error() {
        let (state, _) = seeded().await;

        let response = handle_like("not-an-id", &state).await;
        assert_eq!(response.get_status_line(), INTERNAL_SERVER_ERROR);
        assert_eq!(response.content(), Some(r#"{"error":"Could not update hearts"}"#));
    }
}
