//! Static charging network loading and spatial queries.
//!
//! The network is loaded once at startup from one or more CSV files with a
//! latitude and longitude column (and optionally a name). Rows that cannot be
//! interpreted are skipped with a warning; a file that lacks the coordinate
//! columns entirely is rejected. Facilities are de-duplicated on coordinates
//! rounded to six decimal places and receive a stable [`FacilityId`] in load
//! order.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, Trim};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::geo::GeoPoint;

/// Stable identifier of a facility within a loaded [`ChargingNetwork`].
pub type FacilityId = usize;

/// Scale used to round coordinates before de-duplication (six decimal places).
const DEDUP_SCALE: f64 = 1_000_000.0;

/// A member of the static charging network.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChargingFacility {
    pub id: FacilityId,
    pub location: GeoPoint,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Counts gathered while loading network data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub loaded: usize,
    pub skipped: usize,
    pub duplicates: usize,
}

/// Immutable set of charging facilities.
#[derive(Debug, Clone, Default)]
pub struct ChargingNetwork {
    facilities: Vec<ChargingFacility>,
    report: LoadReport,
}

impl ChargingNetwork {
    /// Build a network from unnamed points, de-duplicating repeated coordinates.
    pub fn from_points<I>(points: I) -> Self
    where
        I: IntoIterator<Item = GeoPoint>,
    {
        let mut builder = NetworkBuilder::default();
        for point in points {
            builder.push(point, None);
        }
        builder.finish()
    }

    /// Load a network from a single CSV file.
    pub fn from_path(path: &Path) -> Result<Self> {
        Self::from_paths(std::slice::from_ref(&path))
    }

    /// Load and merge several CSV files, de-duplicating across all of them.
    pub fn from_paths<P: AsRef<Path>>(paths: &[P]) -> Result<Self> {
        let mut builder = NetworkBuilder::default();
        for path in paths {
            let path = path.as_ref();
            if !path.exists() {
                return Err(Error::NetworkDataNotFound {
                    path: path.to_path_buf(),
                });
            }
            debug!(path = %path.display(), "loading charging stations");
            let file = fs::File::open(path)?;
            builder.read_csv(file)?;
        }
        let network = builder.finish();
        info!(
            facilities = network.len(),
            skipped = network.report.skipped,
            duplicates = network.report.duplicates,
            "charging network loaded"
        );
        Ok(network)
    }

    /// Load a network from a CSV reader (file or in-memory buffer).
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut builder = NetworkBuilder::default();
        builder.read_csv(reader)?;
        Ok(builder.finish())
    }

    pub fn len(&self) -> usize {
        self.facilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facilities.is_empty()
    }

    /// Row counts from loading.
    pub fn load_report(&self) -> LoadReport {
        self.report
    }

    pub fn get(&self, id: FacilityId) -> Option<&ChargingFacility> {
        self.facilities.get(id)
    }

    /// Facilities in load order.
    pub fn iter(&self) -> impl Iterator<Item = &ChargingFacility> {
        self.facilities.iter()
    }

    /// Closest facility to `point`, ties broken by load order.
    pub fn nearest(&self, point: GeoPoint) -> Option<(&ChargingFacility, f64)> {
        self.facilities
            .iter()
            .map(|f| (f, point.distance_to(&f.location)))
            .fold(None, |best, candidate| match best {
                Some((_, d)) if d <= candidate.1 => best,
                _ => Some(candidate),
            })
    }

    /// Facilities within `radius` miles of `point`, nearest first.
    pub fn within(&self, point: GeoPoint, radius: f64) -> Vec<(&ChargingFacility, f64)> {
        let mut found: Vec<_> = self
            .facilities
            .iter()
            .map(|f| (f, point.distance_to(&f.location)))
            .filter(|(_, d)| *d <= radius)
            .collect();
        // Stable sort keeps load order for equal distances.
        found.sort_by(|a, b| a.1.total_cmp(&b.1));
        found
    }

    /// Unvisited facilities within `max_leg` miles of `point`, in load order.
    pub fn reachable<'a, 'b>(
        &'a self,
        point: GeoPoint,
        max_leg: f64,
        visited: &'b HashSet<FacilityId>,
    ) -> impl Iterator<Item = &'a ChargingFacility> + 'b
    where
        'a: 'b,
    {
        self.facilities
            .iter()
            .filter(move |f| !visited.contains(&f.id) && point.distance_to(&f.location) <= max_leg)
    }
}

#[derive(Default)]
struct NetworkBuilder {
    facilities: Vec<ChargingFacility>,
    seen: HashSet<(i64, i64)>,
    report: LoadReport,
}

impl NetworkBuilder {
    fn push(&mut self, location: GeoPoint, name: Option<String>) {
        let key = (
            (location.lat * DEDUP_SCALE).round() as i64,
            (location.lon * DEDUP_SCALE).round() as i64,
        );
        if !self.seen.insert(key) {
            self.report.duplicates += 1;
            return;
        }
        let id = self.facilities.len();
        self.facilities.push(ChargingFacility { id, location, name });
        self.report.loaded += 1;
    }

    fn read_csv<R: Read>(&mut self, reader: R) -> Result<()> {
        let mut csv_reader = ReaderBuilder::new()
            .trim(Trim::Fields)
            .flexible(true)
            .from_reader(reader);

        let headers = csv_reader
            .headers()
            .map_err(|err| Error::NetworkDataValidation {
                message: format!("failed to read station headers: {err}"),
            })?
            .clone();

        let normalize = |s: &str| {
            s.to_ascii_lowercase()
                .chars()
                .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
                .collect::<String>()
        };
        let normalized: Vec<String> = headers.iter().map(normalize).collect();

        let synonyms: &[(&str, &[&str])] = &[
            ("lat", &["latitude", "lat", "y"]),
            ("lon", &["longitude", "lon", "lng", "long", "x"]),
            ("name", &["name", "station_name", "stationname", "station"]),
        ];

        let mut index_map: HashMap<&str, usize> = HashMap::new();
        for (canon, alts) in synonyms {
            if let Some(i) = alts
                .iter()
                .find_map(|alt| normalized.iter().position(|h| h.as_str() == *alt))
            {
                index_map.insert(*canon, i);
            }
        }

        let (Some(&lat_idx), Some(&lon_idx)) = (index_map.get("lat"), index_map.get("lon")) else {
            return Err(Error::NetworkDataValidation {
                message: format!(
                    "station data missing latitude/longitude columns. Available: {}",
                    headers.iter().collect::<Vec<_>>().join(", ")
                ),
            });
        };
        let name_idx = index_map.get("name").copied();

        for (offset, result) in csv_reader.records().enumerate() {
            // Header is line 1.
            let row = offset + 2;
            let record = match result {
                Ok(record) => record,
                Err(err) => {
                    warn!(row, error = %err, "skipping unreadable station row");
                    self.report.skipped += 1;
                    continue;
                }
            };

            let coordinate = |idx: usize| record.get(idx).and_then(|v| v.parse::<f64>().ok());
            let point = match (coordinate(lat_idx), coordinate(lon_idx)) {
                (Some(lat), Some(lon)) => GeoPoint::checked(lat, lon),
                _ => Err(Error::invalid("coordinates", "missing or non-numeric value")),
            };

            match point {
                Ok(point) => {
                    let name = name_idx
                        .and_then(|i| record.get(i))
                        .filter(|s| !s.is_empty())
                        .map(str::to_string);
                    self.push(point, name);
                }
                Err(err) => {
                    warn!(row, error = %err, "skipping malformed station row");
                    self.report.skipped += 1;
                }
            }
        }

        Ok(())
    }

    fn finish(self) -> ChargingNetwork {
        ChargingNetwork {
            facilities: self.facilities,
            report: self.report,
        }
    }
}
