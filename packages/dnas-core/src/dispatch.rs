//! Request execution and response classification shared by every endpoint.
//!
//! Each call attaches the bearer token and `Accept` header, performs a single
//! round trip, and then either classifies an error status into an
//! [`ApiError`], skips decoding for `201 Created`, parses a `text/csv` body
//! into a table, or decodes the body as JSON.

use crate::client::Client;
use crate::error::{ApiError, ApiErrorKind, Error, ErrorResponse, Result};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;

/// Raw CSV rows, header row included.
pub type CsvTable = Vec<Vec<String>>;

const CSV_CONTENT_TYPE: &str = "text/csv";

/// Where a response body should be decoded to. Chosen by the caller so a
/// CSV endpoint and a JSON endpoint can share one dispatch path.
pub enum Destination<'a, T> {
    Json(&'a mut T),
    Table(&'a mut CsvTable),
}

impl<'a, T> Destination<'a, T> {
    pub fn json(value: &'a mut T) -> Self {
        Destination::Json(value)
    }
}

impl<'a> Destination<'a, CsvTable> {
    pub fn table(rows: &'a mut CsvTable) -> Self {
        Destination::Table(rows)
    }
}

impl Client {
    /// Execute `request` and decode the response into `destination`.
    ///
    /// The destination is only written on a successful, decodable response.
    pub(crate) async fn dispatch<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        destination: Destination<'_, T>,
    ) -> Result<()> {
        let response = request
            .bearer_auth(self.api_key())
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(Error::Transport)?;

        read_response(response, destination).await
    }
}

async fn read_response<T: DeserializeOwned>(
    response: Response,
    destination: Destination<'_, T>,
) -> Result<()> {
    let status = response.status();
    tracing::debug!("GET {} -> {}", response.url().path(), status.as_u16());

    if is_error_status(status) {
        return Err(api_error(response).await.into());
    }

    if status == StatusCode::CREATED {
        return Ok(());
    }

    let is_csv = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        == Some(CSV_CONTENT_TYPE);

    let body = response.bytes().await.map_err(Error::Transport)?;

    match destination {
        Destination::Table(rows) if is_csv => *rows = parse_csv(&body)?,
        Destination::Json(_) if is_csv => return Err(Error::DestinationMismatch),
        Destination::Table(rows) => *rows = serde_json::from_slice(&body)?,
        Destination::Json(value) => *value = serde_json::from_slice(&body)?,
    }

    Ok(())
}

fn is_error_status(status: StatusCode) -> bool {
    status.as_u16() < 200 || status.as_u16() >= 400
}

/// Classify an error response. When the body decodes as a JSON error object
/// its message is attached, empty if the object has none. A body that is
/// not JSON, or cannot be read, yields the bare kind.
async fn api_error(response: Response) -> ApiError {
    let kind = ApiErrorKind::from_status(response.status().as_u16());

    let vendor_message = match response.bytes().await {
        Ok(body) => serde_json::from_slice::<Option<ErrorResponse>>(&body)
            .ok()
            .map(|e| e.and_then(|e| e.message).unwrap_or_default()),
        Err(e) => {
            tracing::debug!("Failed to read error body: {}", e);
            None
        }
    };

    let error = match vendor_message {
        Some(message) => ApiError::with_message(kind, message),
        None => ApiError::new(kind),
    };
    tracing::warn!("DNA Spaces API error: {}", error);
    error
}

fn parse_csv(body: &[u8]) -> Result<CsvTable> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(body);

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(|field| field.to_string()).collect());
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Responder, request_target};
    use serde::Deserialize;

    #[derive(Debug, Default, Deserialize, PartialEq)]
    struct Count {
        count: i64,
    }

    async fn dispatch_json(
        status: u16,
        content_type: Option<&str>,
        body: &str,
    ) -> (Result<()>, Count) {
        let responder = Responder::start(status, content_type, body).await;
        let client = responder.client();
        let mut count = Count { count: -1 };
        let result = client
            .dispatch(client.get("/count"), Destination::json(&mut count))
            .await;
        (result, count)
    }

    #[tokio::test]
    async fn test_error_statuses_map_to_kinds() {
        let cases = [
            (400, ApiErrorKind::BadRequest),
            (401, ApiErrorKind::Unauthorized),
            (403, ApiErrorKind::Forbidden),
            (500, ApiErrorKind::InternalError),
            (402, ApiErrorKind::Unknown),
            (404, ApiErrorKind::Unknown),
            (429, ApiErrorKind::Unknown),
            (502, ApiErrorKind::Unknown),
            (503, ApiErrorKind::Unknown),
            (599, ApiErrorKind::Unknown),
        ];
        for (status, kind) in cases {
            let (result, count) = dispatch_json(status, Some("application/json"), "not json").await;
            let err = result.unwrap_err();
            assert_eq!(err.api_kind(), Some(kind), "status {}", status);
            assert_eq!(count.count, -1, "destination touched for {}", status);
        }
    }

    #[tokio::test]
    async fn test_vendor_message_attached() {
        let (result, _) = dispatch_json(
            403,
            Some("application/json"),
            r#"{"code":403,"message":"API key lacks location scope"}"#,
        )
        .await;
        let err = result.unwrap_err();
        assert!(err.is(ApiErrorKind::Forbidden));
        assert!(err.to_string().contains("API key lacks location scope"));
        match err {
            Error::Api(api) => assert_eq!(api.message(), Some("API key lacks location scope")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_non_json_error_body_is_bare() {
        let (result, _) = dispatch_json(500, Some("text/html"), "<html>oops</html>").await;
        match result.unwrap_err() {
            Error::Api(api) => {
                assert_eq!(api.kind(), ApiErrorKind::InternalError);
                assert_eq!(api.message(), None);
                assert_eq!(api.to_string(), "internal error");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_json_error_without_message() {
        for body in ["{}", r#"{"code":400}"#, "null"] {
            let (result, _) = dispatch_json(400, Some("application/json"), body).await;
            match result.unwrap_err() {
                Error::Api(api) => {
                    assert_eq!(api.kind(), ApiErrorKind::BadRequest, "body {}", body);
                    assert_eq!(api.message(), Some(""), "body {}", body);
                    assert_eq!(api.to_string(), "bad request: ", "body {}", body);
                }
                other => panic!("unexpected error for {}: {:?}", body, other),
            }
        }
    }

    #[tokio::test]
    async fn test_success_statuses_decode() {
        for status in [200, 202, 203, 299, 300, 399] {
            let (result, count) =
                dispatch_json(status, Some("application/json"), r#"{"count":42}"#).await;
            assert!(result.is_ok(), "status {}: {:?}", status, result);
            assert_eq!(count, Count { count: 42 }, "status {}", status);
        }
    }

    #[tokio::test]
    async fn test_created_skips_decode() {
        let (result, count) =
            dispatch_json(201, Some("application/json"), "definitely not json").await;
        assert!(result.is_ok());
        assert_eq!(count.count, -1);
    }

    #[tokio::test]
    async fn test_malformed_json_is_not_api_error() {
        let (result, count) = dispatch_json(200, Some("application/json"), "{\"count\":").await;
        let err = result.unwrap_err();
        assert!(matches!(err, Error::Json(_)));
        assert_eq!(err.api_kind(), None);
        assert_eq!(count.count, -1);
    }

    #[tokio::test]
    async fn test_csv_into_table() {
        let body = "a,b,c\n1,\"two, quoted\",3\nshort\n";
        let responder = Responder::start(200, Some("text/csv"), body).await;
        let client = responder.client();
        let mut rows = CsvTable::new();
        client
            .dispatch(client.get("/history"), Destination::table(&mut rows))
            .await
            .unwrap();
        assert_eq!(
            rows,
            vec![
                vec!["a".to_string(), "b".to_string(), "c".to_string()],
                vec!["1".to_string(), "two, quoted".to_string(), "3".to_string()],
                vec!["short".to_string()],
            ]
        );
    }

    #[tokio::test]
    async fn test_non_utf8_csv_is_not_api_error() {
        let responder = Responder::start(200, Some("text/csv"), b"a,b\n1,\xff\xfe\n").await;
        let client = responder.client();
        let mut rows = CsvTable::new();
        let err = client
            .dispatch(client.get("/history"), Destination::table(&mut rows))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Csv(_)), "{:?}", err);
        assert_eq!(err.api_kind(), None);
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_csv_into_json_destination_fails() {
        let (result, count) = dispatch_json(200, Some("text/csv"), "count\n42\n").await;
        assert!(matches!(result, Err(Error::DestinationMismatch)));
        assert_eq!(count.count, -1);
    }

    #[tokio::test]
    async fn test_csv_with_charset_is_treated_as_json() {
        let (result, _) = dispatch_json(200, Some("text/csv; charset=utf-8"), "count\n42\n").await;
        assert!(matches!(result, Err(Error::Json(_))));
    }

    #[tokio::test]
    async fn test_headers_attached() {
        let responder = Responder::start(200, Some("application/json"), r#"{"count":1}"#).await;
        let client = responder.client();
        let mut count = Count::default();
        client
            .dispatch(client.get("/accessPoints/count?status=all"), Destination::json(&mut count))
            .await
            .unwrap();

        let request = responder.request().await;
        assert_eq!(request_target(&request), "GET /accessPoints/count?status=all");
        let lower = request.to_lowercase();
        assert!(lower.contains("authorization: bearer test-key"), "{}", request);
        assert!(lower.contains("accept: application/json"), "{}", request);
    }

    #[tokio::test]
    async fn test_transport_failure_surfaces() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let http = reqwest::Client::builder().no_proxy().build().unwrap();
        let client = Client::with_http_client("test-key", "io", http)
            .unwrap()
            .with_base_url(&format!("http://{}", addr));
        let mut count = Count::default();
        let err = client
            .dispatch(client.get("/count"), Destination::json(&mut count))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Transport(_)));
        assert_eq!(err.api_kind(), None);
    }
}
