use crate::core::{CanvasClient, QueryParam, RawRecord};
use crate::utils::error::Result;
use serde_json::Value;
use std::collections::HashSet;

/// 依序抓取所有分頁並串接結果
///
/// 第一個請求帶 `params`，之後只跟隨 `next` 連結（連結本身已含查詢參數）。
/// 任何一頁失敗就停止，保留先前已取得的資料。
/// `next` 指回已抓過的網址時也停止。
pub async fn fetch_all<C>(client: &C, path: &str, params: &[QueryParam]) -> Result<Vec<RawRecord>>
where
    C: CanvasClient + ?Sized,
{
    let mut next_url = Some(client.resolve_url(path)?);
    let mut params = Some(params);
    let mut records = Vec::new();
    let mut pages = 0usize;
    let mut visited = HashSet::new();

    while let Some(url) = next_url.take() {
        if !visited.insert(url.clone()) {
            tracing::warn!("⚠️ Pagination loop at {}, stopping", url);
            break;
        }
        match client.fetch_page(&url, params.take()).await {
            Ok(page) => {
                pages += 1;
                match page.body {
                    Value::Array(items) => records.extend(items),
                    single => records.push(single),
                }
                next_url = page.next;
            }
            Err(e) => {
                tracing::warn!("⚠️ API request failed: {} (keeping {} records)", e, records.len());
                break;
            }
        }
    }

    tracing::debug!("📄 {}: {} records from {} page(s)", path, records.len(), pages);
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryCanvas;
    use serde_json::json;

    fn ids(records: &[RawRecord]) -> Vec<i64> {
        records.iter().filter_map(|r| r["id"].as_i64()).collect()
    }

    #[tokio::test]
    async fn test_collects_pages_in_order() {
        let client = InMemoryCanvas::new()
            .with_page("/api/v1/courses", json!([{"id": 1}, {"id": 2}]), Some("https://api/courses?page=2"))
            .with_page("https://api/courses?page=2", json!([{"id": 3}]), Some("https://api/courses?page=3"))
            .with_page("https://api/courses?page=3", json!([{"id": 4}, {"id": 5}]), None);

        let params = vec![("per_page".to_string(), "2".to_string())];
        let records = client.get_paginated("/api/v1/courses", &params).await.unwrap();

        assert_eq!(ids(&records), vec![1, 2, 3, 4, 5]);

        let calls = client.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0].url, "/api/v1/courses");
        assert_eq!(calls[0].params, Some(params.clone()));
        assert_eq!(calls[1].url, "https://api/courses?page=2");
        assert_eq!(calls[1].params, None);
        assert_eq!(calls[2].params, None);
    }

    #[tokio::test]
    async fn test_single_object_page_is_one_record() {
        let client = InMemoryCanvas::new().with_page(
            "/api/v1/users/self",
            json!({"id": 42, "name": "Single"}),
            None,
        );

        let records = client.get_paginated("/api/v1/users/self", &[]).await.unwrap();
        assert_eq!(records, vec![json!({"id": 42, "name": "Single"})]);
    }

    #[tokio::test]
    async fn test_failure_keeps_earlier_pages() {
        let client = InMemoryCanvas::new()
            .with_page("/api/v1/courses", json!([{"id": 1}]), Some("https://api/p2"))
            .with_page("https://api/p2", json!([{"id": 2}, {"id": 3}]), Some("https://api/p3"))
            .with_failure("https://api/p3", 502)
            .with_page("https://api/p4", json!([{"id": 99}]), None);

        let records = client.get_paginated("/api/v1/courses", &[]).await.unwrap();

        assert_eq!(ids(&records), vec![1, 2, 3]);
        assert_eq!(client.calls().len(), 3);
    }

    #[tokio::test]
    async fn test_next_link_cycle_stops() {
        let client = InMemoryCanvas::new()
            .with_page("/api/v1/courses", json!([{"id": 1}]), Some("https://api/p2"))
            .with_page("https://api/p2", json!([{"id": 2}]), Some("/api/v1/courses"));

        let records = client.get_paginated("/api/v1/courses", &[]).await.unwrap();

        assert_eq!(ids(&records), vec![1, 2]);
        assert_eq!(client.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_self_referencing_page_is_fetched_once() {
        let client = InMemoryCanvas::new().with_page(
            "/api/v1/courses",
            json!([{"id": 1}]),
            Some("/api/v1/courses"),
        );

        let records = client.get_paginated("/api/v1/courses", &[]).await.unwrap();

        assert_eq!(ids(&records), vec![1]);
        assert_eq!(client.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_failure_on_first_page_returns_empty() {
        let client = InMemoryCanvas::new().with_failure("/api/v1/courses", 401);

        let records = client.get_paginated("/api/v1/courses", &[]).await.unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_empty_page() {
        let client = InMemoryCanvas::new().with_page("/api/v1/empty", json!([]), None);

        let records = client.get_paginated("/api/v1/empty", &[]).await.unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_unresolvable_path_is_an_error() {
        let client = InMemoryCanvas::new();
        assert!(client.get_paginated("", &[]).await.is_err());
        assert!(client.calls().is_empty());
    }
}
