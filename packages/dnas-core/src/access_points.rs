//! Access point status endpoints.

use crate::client::Client;
use crate::de::nullable;
use crate::dispatch::Destination;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Status filter for [`AccessPointsService::count`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessPointStatus {
    All,
    Active,
    Inactive,
    #[default]
    Missing,
}

impl AccessPointStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessPointStatus::All => "all",
            AccessPointStatus::Active => "active",
            AccessPointStatus::Inactive => "inactive",
            AccessPointStatus::Missing => "missing",
        }
    }
}

impl fmt::Display for AccessPointStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A missing access point with its message statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AccessPoint {
    #[serde(deserialize_with = "nullable")]
    pub ap_mac: String,
    /// Messages received
    #[serde(deserialize_with = "nullable")]
    pub count: i64,
    /// Message rate over 15 minutes
    #[serde(deserialize_with = "nullable")]
    pub m15_rate: f64,
    /// Message rate over 1 minute
    #[serde(deserialize_with = "nullable")]
    pub m1_rate: f64,
    /// Message rate over 5 minutes
    #[serde(deserialize_with = "nullable")]
    pub m5_rate: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessPointsCount {
    #[serde(deserialize_with = "nullable")]
    pub count: i64,
}

pub struct AccessPointsService<'a> {
    client: &'a Client,
}

impl<'a> AccessPointsService<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// List missing access points. The API only supports the `missing`
    /// status here, so it is not a parameter.
    pub async fn list_missing(&self) -> Result<Vec<AccessPoint>> {
        let mut access_points = Vec::new();
        let request = self
            .client
            .get("/accessPoints")
            .query(&[("status", AccessPointStatus::Missing.as_str())]);
        self.client
            .dispatch(request, Destination::json(&mut access_points))
            .await?;
        Ok(access_points)
    }

    /// Count access points with the given status.
    pub async fn count(&self, status: AccessPointStatus) -> Result<AccessPointsCount> {
        let mut count = AccessPointsCount::default();
        let request = self
            .client
            .get("/accessPoints/count")
            .query(&[("status", status.as_str())]);
        self.client
            .dispatch(request, Destination::json(&mut count))
            .await?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiErrorKind;
    use crate::testing::{Responder, request_target};

    #[tokio::test]
    async fn test_list_missing() {
        let body = r#"[{"apMac":"00:11:22:33:44:55","count":12,"m15Rate":0.5,"m1Rate":0.1,"m5Rate":0.25}]"#;
        let responder = Responder::start(200, Some("application/json"), body).await;
        let client = responder.client();

        let aps = client.access_points().list_missing().await.unwrap();
        assert_eq!(aps.len(), 1);
        assert_eq!(aps[0].ap_mac, "00:11:22:33:44:55");
        assert_eq!(aps[0].count, 12);
        assert_eq!(aps[0].m5_rate, 0.25);

        let request = responder.request().await;
        assert_eq!(request_target(&request), "GET /accessPoints?status=missing");
    }

    #[tokio::test]
    async fn test_count_with_status() {
        let responder = Responder::start(200, Some("application/json"), r#"{"count":7}"#).await;
        let client = responder.client();

        let count = client
            .access_points()
            .count(AccessPointStatus::Inactive)
            .await
            .unwrap();
        assert_eq!(count.count, 7);

        let request = responder.request().await;
        assert_eq!(request_target(&request), "GET /accessPoints/count?status=inactive");
    }

    #[tokio::test]
    async fn test_count_unauthorized() {
        let body = r#"{"code":401,"message":"bad key"}"#;
        let responder = Responder::start(401, Some("application/json"), body).await;
        let client = responder.client();

        let err = client
            .access_points()
            .count(AccessPointStatus::default())
            .await
            .unwrap_err();
        assert!(err.is(ApiErrorKind::Unauthorized));
    }

    #[test]
    fn test_default_status_is_missing() {
        assert_eq!(AccessPointStatus::default(), AccessPointStatus::Missing);
        assert_eq!(AccessPointStatus::All.to_string(), "all");
    }
}
