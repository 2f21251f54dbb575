//! Command line filters and their mapping onto API parameters.

use anyhow::{Result, bail};
use chrono::{Duration, Utc};
use clap::Args;
use dnas_core::{
    ClientParameters, HistoryClientsParameters, HistoryCountParameters, HistoryParameters,
};

/// Filters shared by `clients list` and `clients count`.
#[derive(Args, Debug, Default)]
pub struct ClientFilters {
    /// Only associated (true) or only probing (false) devices
    #[arg(long)]
    pub associated: Option<bool>,

    /// CLIENT, TAG, ROGUE_AP, ROGUE_CLIENT or INTERFERER
    #[arg(long)]
    pub device_type: Option<String>,

    #[arg(long)]
    pub ap_mac: Option<String>,

    #[arg(long)]
    pub campus_id: Option<String>,

    #[arg(long)]
    pub building_id: Option<String>,

    #[arg(long)]
    pub floor_id: Option<String>,

    #[arg(long)]
    pub ssid: Option<String>,

    #[arg(long)]
    pub username: Option<String>,

    #[arg(long)]
    pub manufacturer: Option<String>,

    /// Page size
    #[arg(long)]
    pub limit: Option<u32>,

    /// Page number, starting at 1
    #[arg(long)]
    pub page: Option<u32>,
}

impl ClientFilters {
    pub fn to_parameters(&self) -> ClientParameters {
        ClientParameters {
            associated: self.associated,
            device_type: self.device_type.clone(),
            ap_mac_address: self.ap_mac.clone(),
            campus_id: self.campus_id.clone(),
            building_id: self.building_id.clone(),
            floor_id: self.floor_id.clone(),
            ssid: self.ssid.clone(),
            username: self.username.clone(),
            manufacturer: self.manufacturer.clone(),
            limit: self.limit,
            page: self.page,
            ..Default::default()
        }
    }
}

/// Time window for history queries. `--hours` counts back from now;
/// `--start`/`--end` take epoch milliseconds. With neither, the API
/// defaults to the last 24 hours.
#[derive(Args, Debug, Default)]
pub struct TimeRange {
    /// Look back this many hours from now
    #[arg(long, conflicts_with_all = ["start", "end"])]
    pub hours: Option<i64>,

    /// Range start, epoch milliseconds
    #[arg(long)]
    pub start: Option<i64>,

    /// Range end, epoch milliseconds
    #[arg(long)]
    pub end: Option<i64>,

    #[arg(long)]
    pub floor_id: Option<String>,
}

impl TimeRange {
    /// Resolve to (start, end) in epoch milliseconds.
    pub fn bounds(&self) -> Result<(Option<i64>, Option<i64>)> {
        if let Some(hours) = self.hours {
            if hours <= 0 {
                bail!("--hours must be positive");
            }
            let now = Utc::now();
            let from = Duration::try_hours(hours).and_then(|d| now.checked_sub_signed(d));
            let Some(from) = from else {
                bail!("--hours {} reaches too far into the past", hours);
            };
            return Ok((Some(from.timestamp_millis()), Some(now.timestamp_millis())));
        }

        if let (Some(start), Some(end)) = (self.start, self.end) {
            if start > end {
                bail!("--start must not be after --end");
            }
        }
        Ok((self.start, self.end))
    }

    pub fn to_history_parameters(&self) -> Result<HistoryParameters> {
        let (start_time, end_time) = self.bounds()?;
        Ok(HistoryParameters {
            start_time,
            end_time,
            floor_id: self.floor_id.clone(),
            ..Default::default()
        })
    }

    pub fn to_count_parameters(&self) -> Result<HistoryCountParameters> {
        let (start_time, end_time) = self.bounds()?;
        Ok(HistoryCountParameters {
            start_time,
            end_time,
            floor_id: self.floor_id.clone(),
            ..Default::default()
        })
    }

    pub fn to_clients_parameters(&self) -> Result<HistoryClientsParameters> {
        let (start_time, end_time) = self.bounds()?;
        Ok(HistoryClientsParameters {
            start_time,
            end_time,
            floor_id: self.floor_id.clone(),
            ..Default::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hours_window() {
        let range = TimeRange {
            hours: Some(2),
            ..Default::default()
        };
        let (start, end) = range.bounds().unwrap();
        let (start, end) = (start.unwrap(), end.unwrap());
        assert_eq!(end - start, 2 * 60 * 60 * 1000);
    }

    #[test]
    fn test_explicit_window() {
        let range = TimeRange {
            start: Some(1_000),
            end: Some(2_000),
            floor_id: Some("f-1".to_string()),
            ..Default::default()
        };
        let params = range.to_history_parameters().unwrap();
        assert_eq!(params.start_time, Some(1_000));
        assert_eq!(params.end_time, Some(2_000));
        assert_eq!(params.floor_id.as_deref(), Some("f-1"));
    }

    #[test]
    fn test_inverted_window_rejected() {
        let range = TimeRange {
            start: Some(2_000),
            end: Some(1_000),
            ..Default::default()
        };
        assert!(range.bounds().is_err());
        let range = TimeRange {
            hours: Some(0),
            ..Default::default()
        };
        assert!(range.to_count_parameters().is_err());
    }

    #[test]
    fn test_huge_hours_rejected() {
        for hours in [i64::MAX / 1000, i64::MAX, 10_000_000_000] {
            let range = TimeRange {
                hours: Some(hours),
                ..Default::default()
            };
            let err = range.bounds().unwrap_err();
            assert!(err.to_string().contains("too far"), "hours {}: {}", hours, err);
        }
    }

    #[test]
    fn test_no_window() {
        let params = TimeRange::default().to_clients_parameters().unwrap();
        assert_eq!(params.start_time, None);
        assert_eq!(params.end_time, None);
    }

    #[test]
    fn test_client_filters() {
        let filters = ClientFilters {
            associated: Some(true),
            device_type: Some("CLIENT".to_string()),
            limit: Some(10),
            ..Default::default()
        };
        let params = filters.to_parameters();
        assert_eq!(params.associated, Some(true));
        assert_eq!(params.device_type.as_deref(), Some("CLIENT"));
        assert_eq!(params.limit, Some(10));
        assert_eq!(params.page, None);
    }
}
