// Cursor pagination over `opc-next-page`.

use std::future::Future;

use futures_util::{Stream, TryStreamExt};

use crate::error::Error;
use crate::request::{ApiResponse, Pagination};

/// Stream every item of a list operation, page by page.
///
/// `fetch` receives the cursor for each page (`None` for the first) and must
/// return that page. The stream ends when a response has no `opc-next-page`.
pub fn paginate<T, F, Fut>(limit: Option<u32>, mut fetch: F) -> impl Stream<Item = Result<T, Error>>
where
    F: FnMut(Pagination) -> Fut,
    Fut: Future<Output = Result<ApiResponse<Vec<T>>, Error>>,
{
    async_stream::try_stream! {
        let mut page: Option<String> = None;
        loop {
            let response = fetch(Pagination { limit, page: page.take() }).await?;
            let next = response.headers.opc_next_page.clone();
            for item in response.data {
                yield item;
            }
            match next {
                Some(cursor) if !cursor.is_empty() => page = Some(cursor),
                _ => break,
            }
        }
    }
}

/// Collect all pages into a single `Vec<T>`.
pub async fn collect_all<T, F, Fut>(limit: Option<u32>, fetch: F) -> Result<Vec<T>, Error>
where
    F: FnMut(Pagination) -> Fut,
    Fut: Future<Output = Result<ApiResponse<Vec<T>>, Error>>,
{
    paginate(limit, fetch).try_collect().await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::request::ResponseHeaders;

    fn page(items: Vec<u32>, next: Option<&str>) -> ApiResponse<Vec<u32>> {
        ApiResponse {
            data: items,
            headers: ResponseHeaders {
                opc_next_page: next.map(str::to_owned),
                ..ResponseHeaders::default()
            },
        }
    }

    #[tokio::test]
    async fn follows_cursor_until_exhausted() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_in_fetch = Arc::clone(&seen);

        let all = collect_all(Some(2), move |p: Pagination| {
            seen_in_fetch.lock().unwrap().push(p.page.clone());
            async move {
                Ok(match p.page.as_deref() {
                    None => page(vec![1, 2], Some("p2")),
                    Some("p2") => page(vec![3, 4], Some("p3")),
                    _ => page(vec![5], None),
                })
            }
        })
        .await
        .unwrap();

        assert_eq!(all, vec![1, 2, 3, 4, 5]);
        assert_eq!(
            *seen.lock().unwrap(),
            vec![None, Some("p2".to_string()), Some("p3".to_string())]
        );
    }

    #[tokio::test]
    async fn stops_on_first_error() {
        let result = collect_all(None, |p: Pagination| async move {
            if p.page.is_none() {
                Ok(page(vec![1], Some("p2")))
            } else {
                Err(Error::Service {
                    status: 500,
                    code: None,
                    message: "boom".into(),
                    opc_request_id: None,
                    retry_after: None,
                })
            }
        })
        .await;

        assert!(matches!(result, Err(Error::Service { status: 500, .. })));
    }
}
