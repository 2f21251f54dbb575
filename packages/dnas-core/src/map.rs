//! Map hierarchy: campuses, buildings and floors.

use crate::client::Client;
use crate::de::nullable;
use crate::dispatch::Destination;
use crate::error::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapHierarchy {
    /// Top level elements, normally campuses
    #[serde(deserialize_with = "nullable")]
    pub map: Vec<MapItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapElement {
    #[serde(deserialize_with = "nullable")]
    pub success: bool,
    #[serde(deserialize_with = "nullable")]
    pub map: MapItem,
}

/// A campus, building or floor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MapItem {
    #[serde(deserialize_with = "nullable")]
    pub address: String,
    /// Creation date-time
    #[serde(deserialize_with = "nullable")]
    pub created_on: String,
    #[serde(deserialize_with = "nullable")]
    pub details: MapItemDetails,
    #[serde(deserialize_with = "nullable")]
    pub id: String,
    #[serde(deserialize_with = "nullable")]
    pub imported_id: String,
    /// Level in the hierarchy
    #[serde(deserialize_with = "nullable")]
    pub level: String,
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    #[serde(deserialize_with = "nullable")]
    pub relationship_data: MapItemRelationshipData,
    #[serde(deserialize_with = "nullable")]
    pub source_type: String,
}

impl MapItem {
    /// This element followed by all of its descendants, depth first.
    pub fn walk(&self) -> Vec<&MapItem> {
        let mut items = vec![self];
        for child in &self.relationship_data.children {
            items.extend(child.walk());
        }
        items
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MapItemDetails {
    #[serde(deserialize_with = "nullable")]
    pub calibration_model_ref: String,
    #[serde(deserialize_with = "nullable")]
    pub floor_number: i64,
    #[serde(rename = "GpsMarkers")]
    #[serde(deserialize_with = "nullable")]
    pub gps_markers: Vec<String>,
    #[serde(deserialize_with = "nullable")]
    pub height: f64,
    #[serde(deserialize_with = "nullable")]
    pub image: MapImage,
    #[serde(deserialize_with = "nullable")]
    pub inclusion_exclusion_region: Vec<serde_json::Map<String, serde_json::Value>>,
    #[serde(deserialize_with = "nullable")]
    pub latitude: f64,
    #[serde(deserialize_with = "nullable")]
    pub length: f64,
    #[serde(deserialize_with = "nullable")]
    pub longitude: f64,
    #[serde(deserialize_with = "nullable")]
    pub obstacles: Vec<String>,
    #[serde(deserialize_with = "nullable")]
    pub offset_x: f64,
    #[serde(deserialize_with = "nullable")]
    pub offset_y: f64,
    #[serde(deserialize_with = "nullable")]
    pub width: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MapItemRelationshipData {
    #[serde(deserialize_with = "nullable")]
    pub ancestor_ids: Vec<String>,
    #[serde(deserialize_with = "nullable")]
    pub ancestors: Vec<String>,
    #[serde(deserialize_with = "nullable")]
    pub children: Vec<MapItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MapImage {
    #[serde(deserialize_with = "nullable")]
    pub cksum: String,
    #[serde(deserialize_with = "nullable")]
    pub color_depth: i64,
    #[serde(deserialize_with = "nullable")]
    pub height: i64,
    /// Whether the source image is compressed
    #[serde(deserialize_with = "nullable")]
    pub image_compressed: bool,
    #[serde(deserialize_with = "nullable")]
    pub image_name: String,
    #[serde(deserialize_with = "nullable")]
    pub max_resolution: i64,
    #[serde(deserialize_with = "nullable")]
    pub size: i64,
    #[serde(deserialize_with = "nullable")]
    pub source_file: String,
    #[serde(deserialize_with = "nullable")]
    pub valid_image_supplied: bool,
    #[serde(deserialize_with = "nullable")]
    pub width: i64,
    #[serde(deserialize_with = "nullable")]
    pub zoom_level: i64,
}

pub struct MapService<'a> {
    client: &'a Client,
}

impl<'a> MapService<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// The full campus, building and floor hierarchy.
    pub async fn hierarchy(&self) -> Result<MapHierarchy> {
        let mut hierarchy = MapHierarchy::default();
        self.client
            .dispatch(self.client.get("/map/hierarchy"), Destination::json(&mut hierarchy))
            .await?;
        Ok(hierarchy)
    }

    /// A single map element by identifier.
    pub async fn element(&self, id: &str) -> Result<MapElement> {
        let mut element = MapElement::default();
        let request = self.client.get_item("/map/elements", id)?;
        self.client
            .dispatch(request, Destination::json(&mut element))
            .await?;
        Ok(element)
    }
}
