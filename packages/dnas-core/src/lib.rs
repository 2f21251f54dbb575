//! DNA Spaces Core Library
//!
//! A typed client for the Cisco DNA Spaces location API:
//! - Access points (missing list, counts by status)
//! - Active clients (listing, counts, floors)
//! - Client location history (CSV export, counts, per-device history)
//! - Map hierarchy (campuses, buildings, floors)
//!
//! Every call is a single authenticated GET. Error statuses are classified
//! into [`ApiErrorKind`]s that stay matchable after the vendor's message is
//! attached.
//!
//! # Example
//!
//! ```no_run
//! use dnas_core::{ApiErrorKind, Client, HistoryParameters};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = Client::new(&std::env::var("DNAS_API_KEY")?, "io")?;
//!
//!     let count = client.active_clients().count(&Default::default()).await?;
//!     println!("Active clients: {}", count.results.total);
//!
//!     match client.history().list(&HistoryParameters::default()).await {
//!         Ok(history) => println!("{} history records", history.results.len()),
//!         Err(e) if e.is(ApiErrorKind::Unauthorized) => eprintln!("check the API key"),
//!         Err(e) => return Err(e.into()),
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod access_points;
pub mod active_clients;
pub mod client;
pub mod config;
mod de;
mod dispatch;
pub mod error;
pub mod history;
pub mod map;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types
pub use access_points::{AccessPoint, AccessPointStatus, AccessPointsCount};
pub use active_clients::{ClientCount, ClientFloors, ClientParameters, ClientsResponse};
pub use client::{Client, Region};
pub use config::{ClientConfig, ConfigSource, load_client_config};
pub use dispatch::CsvTable;
pub use error::{ApiError, ApiErrorKind, Error, Result};
pub use history::{
    HistoryClientDeviceParameters, HistoryClientsParameters, HistoryCountParameters,
    HistoryParameters, HistoryRecord, HistoryResponse,
};
pub use map::{MapElement, MapHierarchy, MapItem};
