use std::{collections::HashSet, sync::Arc};

use log::info;
use serde_json::Value;

use crate::{ApiRequest, ApiTransport, StdResult};

/// Follows the pagination cursor of a listing endpoint until the API signals
/// no more pages.
///
/// Listing endpoints return the page items under a named key together with a
/// `next_starting_after` cursor, which is fed back as the `starting_after`
/// query parameter of the next request.
pub struct Paginator {
    transport: Arc<dyn ApiTransport>,
}

impl Paginator {
    /// Creates a new `Paginator` instance with the given transport.
    pub fn new(transport: Arc<dyn ApiTransport>) -> Self {
        Self { transport }
    }

    /// Collects the items under `items_key` across every page of `path`.
    pub async fn collect_all(&self, path: &str, items_key: &str) -> StdResult<Vec<Value>> {
        let mut items = Vec::new();
        let mut cursor: Option<String> = None;
        let mut cursors_followed: HashSet<String> = HashSet::new();

        loop {
            let mut request = ApiRequest::get(path);
            if let Some(cursor) = &cursor {
                request = request.with_query("starting_after", cursor);
            }
            let body = self.transport.send(&request).await?.into_body();
            let page_items = Self::extract_items(&body, items_key);
            if page_items.is_empty() {
                break;
            }
            items.extend(page_items);

            match body.get("next_starting_after").and_then(Value::as_str) {
                Some(next_cursor) if !next_cursor.is_empty() => {
                    if !cursors_followed.insert(next_cursor.to_string()) {
                        info!("Cursor already followed: {next_cursor}");
                        break;
                    }
                    cursor = Some(next_cursor.to_string());
                }
                _ => break,
            }
        }

        Ok(items)
    }

    /// Extracts the page items, tolerating endpoints that return a bare array.
    fn extract_items(body: &Value, items_key: &str) -> Vec<Value> {
        match body.get(items_key).and_then(Value::as_array) {
            Some(page_items) => page_items.clone(),
            None => body.as_array().cloned().unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::{ApiResponse, MockApiTransport};

    use super::*;

    const HISTORY_PATH: &str = "/api/v2/supersearch-enrichment/history/resource-1";

    #[tokio::test]
    async fn collect_all_follows_the_cursor_until_exhausted() {
        let transport = {
            let mut transport = MockApiTransport::new();
            transport
                .expect_send()
                .withf(|request: &ApiRequest| request.query().is_empty())
                .returning(|_| {
                    Ok(ApiResponse::new(
                        json!({
                            "history": [{"event": "created"}, {"event": "started"}],
                            "next_starting_after": "cursor123",
                        }),
                        None,
                    ))
                })
                .times(1);
            transport
                .expect_send()
                .withf(|request: &ApiRequest| {
                    request
                        .query()
                        .contains(&("starting_after".to_string(), "cursor123".to_string()))
                })
                .returning(|_| {
                    Ok(ApiResponse::new(
                        json!({"history": [{"event": "completed"}]}),
                        None,
                    ))
                })
                .times(1);

            transport
        };
        let paginator = Paginator::new(Arc::new(transport));

        let items = paginator.collect_all(HISTORY_PATH, "history").await.unwrap();

        assert_eq!(
            vec![
                json!({"event": "created"}),
                json!({"event": "started"}),
                json!({"event": "completed"}),
            ],
            items
        );
    }

    #[tokio::test]
    async fn collect_all_stops_on_empty_first_page() {
        let transport = {
            let mut transport = MockApiTransport::new();
            transport
                .expect_send()
                .returning(|_| Ok(ApiResponse::new(json!({"history": []}), None)))
                .times(1);

            transport
        };
        let paginator = Paginator::new(Arc::new(transport));

        let items = paginator.collect_all(HISTORY_PATH, "history").await.unwrap();

        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn collect_all_stops_when_the_cursor_repeats() {
        let transport = {
            let mut transport = MockApiTransport::new();
            transport
                .expect_send()
                .returning(|_| {
                    Ok(ApiResponse::new(
                        json!({
                            "history": [{"event": "created"}],
                            "next_starting_after": "cursor123",
                        }),
                        None,
                    ))
                })
                .times(2);

            transport
        };
        let paginator = Paginator::new(Arc::new(transport));

        let items = paginator.collect_all(HISTORY_PATH, "history").await.unwrap();

        assert_eq!(2, items.len());
    }

    #[tokio::test]
    async fn collect_all_accepts_a_bare_array_response() {
        let transport = {
            let mut transport = MockApiTransport::new();
            transport
                .expect_send()
                .returning(|_| {
                    Ok(ApiResponse::new(
                        json!([{"event": "created"}, {"event": "completed"}]),
                        None,
                    ))
                })
                .times(1);

            transport
        };
        let paginator = Paginator::new(Arc::new(transport));

        let items = paginator.collect_all(HISTORY_PATH, "history").await.unwrap();

        assert_eq!(2, items.len());
    }

    #[tokio::test]
    async fn collect_all_fails_when_the_transport_fails() {
        let transport = {
            let mut transport = MockApiTransport::new();
            transport
                .expect_send()
                .returning(|_| Err(anyhow::anyhow!("Error sending request")))
                .times(1);

            transport
        };
        let paginator = Paginator::new(Arc::new(transport));

        paginator
            .collect_all(HISTORY_PATH, "history")
            .await
            .expect_err("Expected an error");
    }
}
