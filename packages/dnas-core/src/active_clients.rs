//! Active (currently associated or detected) client endpoints.

use crate::client::Client;
use crate::de::nullable;
use crate::dispatch::Destination;
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Filters for the active client listing and count. Unset fields are left
/// out of the query string.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ClientParameters {
    /// Access point MAC. Associated clients only.
    #[serde(rename = "apMacAddress", skip_serializing_if = "Option::is_none")]
    pub ap_mac_address: Option<String>,

    /// Whether the device has connected to a network
    #[serde(rename = "associated", skip_serializing_if = "Option::is_none")]
    pub associated: Option<bool>,

    #[serde(rename = "buildingID", skip_serializing_if = "Option::is_none")]
    pub building_id: Option<String>,

    #[serde(rename = "campusID", skip_serializing_if = "Option::is_none")]
    pub campus_id: Option<String>,

    /// Device identifier, for example its MAC address
    #[serde(rename = "deviceID", skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,

    /// CLIENT, TAG, ROGUE_AP, ROGUE_CLIENT or INTERFERER
    #[serde(rename = "deviceType", skip_serializing_if = "Option::is_none")]
    pub device_type: Option<String>,

    #[serde(rename = "floorID", skip_serializing_if = "Option::is_none")]
    pub floor_id: Option<String>,

    /// "geojson" for GeoJSON output
    #[serde(rename = "format", skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    /// IP address of the connected device. Associated clients only.
    #[serde(rename = "iPAddress", skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,

    /// Page size, 1000 by default
    #[serde(rename = "limit", skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,

    #[serde(rename = "manufacturer", skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,

    #[serde(rename = "mapElementID", skip_serializing_if = "Option::is_none")]
    pub map_element_id: Option<String>,

    /// "campus", "building" or "floor"
    #[serde(rename = "mapElementLevel", skip_serializing_if = "Option::is_none")]
    pub map_element_level: Option<String>,

    /// 1-based page number
    #[serde(rename = "page", skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,

    /// With deviceType=ROGUE_AP, only return rogue APs with connected clients
    #[serde(rename = "rogueApClients", skip_serializing_if = "Option::is_none")]
    pub rogue_ap_clients: Option<bool>,

    #[serde(rename = "ssid", skip_serializing_if = "Option::is_none")]
    pub ssid: Option<String>,

    #[serde(rename = "username", skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QueryString {
    #[serde(deserialize_with = "nullable")]
    pub tenant_id: String,
}

/// A device as reported by the active clients listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ActiveClient {
    #[serde(deserialize_with = "nullable")]
    pub tenant_id: String,
    #[serde(deserialize_with = "nullable")]
    pub mac_address: String,
    #[serde(deserialize_with = "nullable")]
    pub device_type: String,
    #[serde(deserialize_with = "nullable")]
    pub campus_id: String,
    #[serde(deserialize_with = "nullable")]
    pub building_id: String,
    #[serde(deserialize_with = "nullable")]
    pub floor_id: String,
    /// Location path, e.g. "Campus>Building>Floor"
    #[serde(deserialize_with = "nullable")]
    pub hierarchy: String,
    #[serde(deserialize_with = "nullable")]
    pub coordinates: Vec<f64>,
    #[serde(deserialize_with = "nullable")]
    pub geo_coordinates: Vec<f64>,
    #[serde(deserialize_with = "nullable")]
    pub confidence_factor: f64,
    #[serde(deserialize_with = "nullable")]
    pub max_detected_ap_mac: String,
    #[serde(deserialize_with = "nullable")]
    pub max_detected_band: String,
    #[serde(deserialize_with = "nullable")]
    pub max_detected_rssi: i64,
    #[serde(deserialize_with = "nullable")]
    pub ip_address: Vec<String>,
    #[serde(deserialize_with = "nullable")]
    pub ssid: String,
    #[serde(deserialize_with = "nullable")]
    pub username: String,
    #[serde(deserialize_with = "nullable")]
    pub manufacturer: String,
    #[serde(deserialize_with = "nullable")]
    pub associated: bool,
    #[serde(deserialize_with = "nullable")]
    pub associated_ap_mac: String,
    #[serde(deserialize_with = "nullable")]
    pub band: String,
    #[serde(deserialize_with = "nullable")]
    pub first_active_at: i64,
    #[serde(deserialize_with = "nullable")]
    pub change_on: i64,
    #[serde(deserialize_with = "nullable")]
    pub last_located_time: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientsResponse {
    #[serde(deserialize_with = "nullable")]
    pub results: Vec<ActiveClient>,
    #[serde(rename = "querystring")]
    #[serde(deserialize_with = "nullable")]
    pub query_string: QueryString,
    #[serde(deserialize_with = "nullable")]
    pub success: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientTotal {
    #[serde(deserialize_with = "nullable")]
    pub total: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientCount {
    #[serde(deserialize_with = "nullable")]
    pub results: ClientTotal,
    #[serde(rename = "querystring")]
    #[serde(deserialize_with = "nullable")]
    pub query_string: QueryString,
    #[serde(deserialize_with = "nullable")]
    pub success: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FloorClientCount {
    /// Associated devices on this floor
    #[serde(deserialize_with = "nullable")]
    pub count: i64,
    #[serde(deserialize_with = "nullable")]
    pub floor_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientFloors {
    #[serde(deserialize_with = "nullable")]
    pub results: Vec<FloorClientCount>,
    #[serde(deserialize_with = "nullable")]
    pub success: bool,
}

pub struct ActiveClientsService<'a> {
    client: &'a Client,
}

impl<'a> ActiveClientsService<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// List active clients. Without filters every active client is returned,
    /// paginated (page 1, 1000 per page by default).
    pub async fn list(&self, params: &ClientParameters) -> Result<ClientsResponse> {
        let mut clients = ClientsResponse::default();
        let request = self.client.get("/clients").query(params);
        self.client
            .dispatch(request, Destination::json(&mut clients))
            .await?;
        Ok(clients)
    }

    /// Count active clients matching the filters.
    pub async fn count(&self, params: &ClientParameters) -> Result<ClientCount> {
        let mut count = ClientCount::default();
        let request = self.client.get("/clients/count").query(params);
        self.client
            .dispatch(request, Destination::json(&mut count))
            .await?;
        Ok(count)
    }

    /// Floors that currently have associated clients.
    pub async fn floors(&self) -> Result<ClientFloors> {
        let mut floors = ClientFloors::default();
        self.client
            .dispatch(self.client.get("/clients/floors"), Destination::json(&mut floors))
            .await?;
        Ok(floors)
    }
}
