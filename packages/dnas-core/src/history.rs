//! Client location history.
//!
//! The bulk history listing is served as `text/csv` rather than JSON. The
//! raw table is projected onto [`HistoryRecord`] by column position, with
//! every value kept as the string the API sent. The remaining endpoints are
//! ordinary JSON.

use crate::client::Client;
use crate::de::nullable;
use crate::dispatch::{CsvTable, Destination};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Column order of the history CSV export.
pub const HISTORY_COLUMNS: [&str; 30] = [
    "tenantid",
    "macaddress",
    "devicetype",
    "campusid",
    "buildingid",
    "floorid",
    "floorhierarchy",
    "coordinatex",
    "coordinatey",
    "sourcetimestamp",
    "maxdetectedapmac",
    "maxdetectedband",
    "detectingcontrollers",
    "firstactiveat",
    "locatedsinceactivecount",
    "changedon",
    "manufacturer",
    "associated",
    "associatedapmac",
    "ssid",
    "band",
    "ipv4",
    "ipv6",
    "username",
    "maxdetectedrssi",
    "latitude",
    "longitude",
    "unc",
    "computetype",
    "source",
];

/// Filters for [`HistoryService::list`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct HistoryParameters {
    /// Access point MAC. Associated clients only.
    #[serde(rename = "apMacAddress", skip_serializing_if = "Option::is_none")]
    pub ap_mac_address: Option<String>,

    #[serde(rename = "buildingId", skip_serializing_if = "Option::is_none")]
    pub building_id: Option<String>,

    #[serde(rename = "campusId", skip_serializing_if = "Option::is_none")]
    pub campus_id: Option<String>,

    #[serde(rename = "deviceId", skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,

    /// End of the range, epoch milliseconds
    #[serde(rename = "endTime", skip_serializing_if = "Option::is_none")]
    pub end_time: Option<i64>,

    #[serde(rename = "floorId", skip_serializing_if = "Option::is_none")]
    pub floor_id: Option<String>,

    #[serde(rename = "format", skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    #[serde(rename = "ssid", skip_serializing_if = "Option::is_none")]
    pub ssid: Option<String>,

    /// Start of the range, epoch milliseconds
    #[serde(rename = "startTime", skip_serializing_if = "Option::is_none")]
    pub start_time: Option<i64>,

    /// Time zone of the request, UTC when unset
    #[serde(rename = "timeZone", skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<i64>,

    #[serde(rename = "username", skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

/// Filters for [`HistoryService::count`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct HistoryCountParameters {
    #[serde(rename = "buildingId", skip_serializing_if = "Option::is_none")]
    pub building_id: Option<String>,

    #[serde(rename = "campusId", skip_serializing_if = "Option::is_none")]
    pub campus_id: Option<String>,

    #[serde(rename = "endTime", skip_serializing_if = "Option::is_none")]
    pub end_time: Option<i64>,

    #[serde(rename = "floorId", skip_serializing_if = "Option::is_none")]
    pub floor_id: Option<String>,

    #[serde(rename = "startTime", skip_serializing_if = "Option::is_none")]
    pub start_time: Option<i64>,

    #[serde(rename = "timeZone", skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<i64>,
}

/// Filters for [`HistoryService::clients`] and [`HistoryService::client`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct HistoryClientsParameters {
    #[serde(rename = "apMacAddress", skip_serializing_if = "Option::is_none")]
    pub ap_mac_address: Option<String>,

    #[serde(rename = "buildingId", skip_serializing_if = "Option::is_none")]
    pub building_id: Option<String>,

    #[serde(rename = "campusId", skip_serializing_if = "Option::is_none")]
    pub campus_id: Option<String>,

    #[serde(rename = "endTime", skip_serializing_if = "Option::is_none")]
    pub end_time: Option<i64>,

    #[serde(rename = "floorId", skip_serializing_if = "Option::is_none")]
    pub floor_id: Option<String>,

    /// Search radius around (x, y)
    #[serde(rename = "radius", skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,

    #[serde(rename = "ssid", skip_serializing_if = "Option::is_none")]
    pub ssid: Option<String>,

    #[serde(rename = "startTime", skip_serializing_if = "Option::is_none")]
    pub start_time: Option<i64>,

    #[serde(rename = "timeZone", skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<i64>,

    #[serde(rename = "x", skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,

    #[serde(rename = "y", skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
}

/// The wider filter set accepted for a single device's history. Use with
/// [`HistoryService::client_with`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct HistoryClientDeviceParameters {
    #[serde(rename = "apMacAddress", skip_serializing_if = "Option::is_none")]
    pub ap_mac_address: Option<String>,

    #[serde(rename = "buildingId", skip_serializing_if = "Option::is_none")]
    pub building_id: Option<String>,

    #[serde(rename = "campusId", skip_serializing_if = "Option::is_none")]
    pub campus_id: Option<String>,

    #[serde(rename = "endTime", skip_serializing_if = "Option::is_none")]
    pub end_time: Option<i64>,

    #[serde(rename = "floorId", skip_serializing_if = "Option::is_none")]
    pub floor_id: Option<String>,

    #[serde(rename = "format", skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    #[serde(rename = "radius", skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,

    #[serde(rename = "ssid", skip_serializing_if = "Option::is_none")]
    pub ssid: Option<String>,

    #[serde(rename = "startTime", skip_serializing_if = "Option::is_none")]
    pub start_time: Option<i64>,

    #[serde(rename = "timeZone", skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<i64>,

    #[serde(rename = "username", skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(rename = "x", skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,

    #[serde(rename = "y", skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
}

/// One row of the history export. Values are the raw CSV strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub tenant_id: String,
    pub mac_address: String,
    pub device_type: String,
    pub campus_id: String,
    pub building_id: String,
    pub floor_id: String,
    pub floor_hierarchy: String,
    pub coordinate_x: String,
    pub coordinate_y: String,
    pub source_timestamp: String,
    pub max_detected_ap_mac: String,
    pub max_detected_band: String,
    pub detecting_controllers: String,
    pub first_active_at: String,
    pub located_since_active_count: String,
    pub changed_on: String,
    pub manufacturer: String,
    pub associated: String,
    pub associated_ap_mac: String,
    pub ssid: String,
    pub band: String,
    pub ipv4: String,
    pub ipv6: String,
    pub username: String,
    pub max_detected_rssi: String,
    pub latitude: String,
    pub longitude: String,
    pub unc: String,
    pub compute_type: String,
    pub source: String,
}

impl HistoryRecord {
    /// Map a data row onto a record. `row` is the row's index in the table
    /// and only used for the error.
    pub fn from_row(row: usize, fields: &[String]) -> Result<Self> {
        let fields: &[String; 30] = fields.try_into().map_err(|_| Error::HistoryRowWidth {
            row,
            expected: HISTORY_COLUMNS.len(),
            found: fields.len(),
        })?;
        let [
            tenant_id,
            mac_address,
            device_type,
            campus_id,
            building_id,
            floor_id,
            floor_hierarchy,
            coordinate_x,
            coordinate_y,
            source_timestamp,
            max_detected_ap_mac,
            max_detected_band,
            detecting_controllers,
            first_active_at,
            located_since_active_count,
            changed_on,
            manufacturer,
            associated,
            associated_ap_mac,
            ssid,
            band,
            ipv4,
            ipv6,
            username,
            max_detected_rssi,
            latitude,
            longitude,
            unc,
            compute_type,
            source,
        ] = fields.clone();

        Ok(Self {
            tenant_id,
            mac_address,
            device_type,
            campus_id,
            building_id,
            floor_id,
            floor_hierarchy,
            coordinate_x,
            coordinate_y,
            source_timestamp,
            max_detected_ap_mac,
            max_detected_band,
            detecting_controllers,
            first_active_at,
            located_since_active_count,
            changed_on,
            manufacturer,
            associated,
            associated_ap_mac,
            ssid,
            band,
            ipv4,
            ipv6,
            username,
            max_detected_rssi,
            latitude,
            longitude,
            unc,
            compute_type,
            source,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub results: Vec<HistoryRecord>,
}

impl HistoryResponse {
    /// Drop the header row and project the remaining rows.
    pub fn from_table(table: &CsvTable) -> Result<Self> {
        let Some((header, rows)) = table.split_first() else {
            return Ok(Self::default());
        };

        if !header
            .iter()
            .map(|h| h.trim().to_ascii_lowercase())
            .eq(HISTORY_COLUMNS.iter().map(|c| c.to_string()))
        {
            tracing::warn!(
                "History CSV header does not match the expected column order: {:?}",
                header
            );
        }

        let results = rows
            .iter()
            .enumerate()
            .map(|(i, fields)| HistoryRecord::from_row(i + 1, fields))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { results })
    }
}

/// Record count for a time range. The API sends the number as a string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryCount {
    #[serde(deserialize_with = "nullable")]
    pub count: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HistoryClient {
    #[serde(deserialize_with = "nullable")]
    pub mac_address: String,
}

/// A single location observation of one device.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HistoryClientLocation {
    #[serde(deserialize_with = "nullable")]
    pub floor_id: String,
    #[serde(deserialize_with = "nullable")]
    pub source_timestamp: i64,
    #[serde(deserialize_with = "nullable")]
    pub coordinates: Vec<f64>,
    #[serde(deserialize_with = "nullable")]
    pub associated: bool,
    #[serde(deserialize_with = "nullable")]
    pub associated_apmac: String,
}

pub struct HistoryService<'a> {
    client: &'a Client,
}

impl<'a> HistoryService<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Export client history. Without a time range the last 24 hours are
    /// returned; the API rejects ranges holding more than 50K records.
    pub async fn list(&self, params: &HistoryParameters) -> Result<HistoryResponse> {
        let mut table = CsvTable::new();
        let request = self.client.get("/history").query(params);
        self.client
            .dispatch(request, Destination::table(&mut table))
            .await?;
        let history = HistoryResponse::from_table(&table)?;
        tracing::debug!("History export returned {} records", history.results.len());
        Ok(history)
    }

    /// Number of history records in the range, last 24 hours by default.
    pub async fn count(&self, params: &HistoryCountParameters) -> Result<HistoryCount> {
        let mut count = HistoryCount::default();
        let request = self.client.get("/history/records/count").query(params);
        self.client
            .dispatch(request, Destination::json(&mut count))
            .await?;
        Ok(count)
    }

    /// MAC addresses of clients seen in the range, last day by default.
    pub async fn clients(&self, params: &HistoryClientsParameters) -> Result<Vec<HistoryClient>> {
        let mut clients = Vec::new();
        let request = self.client.get("/history/clients").query(params);
        self.client
            .dispatch(request, Destination::json(&mut clients))
            .await?;
        Ok(clients)
    }

    /// Location history of one device. Ranges are at most one day.
    pub async fn client(
        &self,
        device_id: &str,
        params: &HistoryClientsParameters,
    ) -> Result<Vec<HistoryClientLocation>> {
        self.client_locations(device_id, params).await
    }

    /// As [`client`](Self::client), with the device-specific filters.
    pub async fn client_with(
        &self,
        device_id: &str,
        params: &HistoryClientDeviceParameters,
    ) -> Result<Vec<HistoryClientLocation>> {
        self.client_locations(device_id, params).await
    }

    async fn client_locations<P: Serialize>(
        &self,
        device_id: &str,
        params: &P,
    ) -> Result<Vec<HistoryClientLocation>> {
        let mut locations = Vec::new();
        let request = self
            .client
            .get_item("/history/clients", device_id)?
            .query(params);
        self.client
            .dispatch(request, Destination::json(&mut locations))
            .await?;
        Ok(locations)
    }
}
