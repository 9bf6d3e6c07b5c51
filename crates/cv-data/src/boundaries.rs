//! Region outlines for the choropleth map

use std::path::Path;

use geo::{Geometry, MultiPolygon};
use geojson::GeoJson;
use tracing::{debug, warn};

use crate::DataError;

/// One named region's outline in longitude/latitude degrees
#[derive(Debug, Clone)]
pub struct RegionShape {
    pub name: String,
    pub outline: MultiPolygon<f64>,
}

/// All region outlines from a GeoJSON feature collection, keyed by the
/// feature's `properties.name`
#[derive(Debug, Clone, Default)]
pub struct RegionBoundaries {
    regions: Vec<RegionShape>,
}

impl RegionBoundaries {
    pub fn from_geojson(text: &str) -> Result<Self, DataError> {
        let geojson: GeoJson = text
            .parse()
            .map_err(|e: geojson::Error| DataError::Boundaries(e.to_string()))?;

        let GeoJson::FeatureCollection(collection) = geojson else {
            return Err(DataError::Boundaries("expected a FeatureCollection".to_string()));
        };

        let mut regions = Vec::with_capacity(collection.features.len());
        for (index, feature) in collection.features.into_iter().enumerate() {
            let Some(name) = feature
                .property("name")
                .and_then(|v| v.as_str())
                .map(str::to_string)
            else {
                warn!(index, "Skipping boundary feature without a name");
                continue;
            };

            let Some(geometry) = feature.geometry else {
                warn!(%name, "Skipping boundary feature without geometry");
                continue;
            };

            let outline = match Geometry::<f64>::try_from(geometry) {
                Ok(Geometry::Polygon(polygon)) => MultiPolygon::new(vec![polygon]),
                Ok(Geometry::MultiPolygon(multi)) => multi,
                Ok(_) => {
                    warn!(%name, "Skipping boundary feature that is not a polygon");
                    continue;
                }
                Err(e) => {
                    warn!(%name, error = %e, "Skipping unreadable boundary geometry");
                    continue;
                }
            };

            regions.push(RegionShape { name, outline });
        }

        Ok(Self { regions })
    }

    pub async fn from_path(path: &Path) -> Result<Self, DataError> {
        let text = crate::read_resource(path).await?;
        let boundaries = Self::from_geojson(&text)?;
        debug!(path = %path.display(), regions = boundaries.len(), "Loaded region boundaries");
        Ok(boundaries)
    }

    pub fn get(&self, name: &str) -> Option<&RegionShape> {
        self.regions.iter().find(|region| region.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RegionShape> + '_ {
        self.regions.iter()
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": { "name": "Colorado" },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[-109.05, 41.0], [-102.05, 41.0], [-102.05, 37.0], [-109.05, 37.0], [-109.05, 41.0]]]
                }
            },
            {
                "type": "Feature",
                "properties": { "name": "Hawaii" },
                "geometry": {
                    "type": "MultiPolygon",
                    "coordinates": [
                        [[[-155.0, 19.0], [-155.5, 20.0], [-156.0, 19.0], [-155.0, 19.0]]],
                        [[[-157.5, 21.2], [-157.7, 21.6], [-158.0, 21.3], [-157.5, 21.2]]]
                    ]
                }
            },
            {
                "type": "Feature",
                "properties": { "name": "Somewhere" },
                "geometry": { "type": "Point", "coordinates": [0.0, 0.0] }
            },
            {
                "type": "Feature",
                "properties": {},
                "geometry": { "type": "Point", "coordinates": [0.0, 0.0] }
            }
        ]
    }"#;

    #[test]
    fn test_polygons_and_multipolygons() {
        let boundaries = RegionBoundaries::from_geojson(SAMPLE).unwrap();
        assert_eq!(boundaries.len(), 2);

        let colorado = boundaries.get("Colorado").unwrap();
        assert_eq!(colorado.outline.0.len(), 1);

        let hawaii = boundaries.get("Hawaii").unwrap();
        assert_eq!(hawaii.outline.0.len(), 2);

        assert!(boundaries.get("Somewhere").is_none());
    }

    #[test]
    fn test_rejects_non_collection() {
        let err = RegionBoundaries::from_geojson(r#"{"type": "Point", "coordinates": [0.0, 0.0]}"#)
            .unwrap_err();
        assert!(matches!(err, DataError::Boundaries(_)));

        assert!(RegionBoundaries::from_geojson("not json").is_err());
    }

    #[tokio::test]
    async fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, SAMPLE.as_bytes()).unwrap();

        let boundaries = RegionBoundaries::from_path(file.path()).await.unwrap();
        assert_eq!(boundaries.len(), 2);

        let err = RegionBoundaries::from_path(Path::new("/nonexistent/us-states.json"))
            .await
            .unwrap_err();
        assert!(matches!(err, DataError::Io { .. }));
    }
}
