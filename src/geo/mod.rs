// Geolocation
//
// Point lookups from IPv4 address to approximate coordinates and place names,
// backed by an offline MaxMind GeoLite2-City database. Lookups that find no
// usable record are reported as None and never as errors.

pub mod public_ip;

use maxminddb::{geoip2, Reader};
use std::collections::BTreeMap;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, trace};

/// Language used for city and country names
const NAME_LANGUAGE: &str = "en";

/// Approximate location of an address
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    /// None when the database has no name for the city
    pub city: Option<String>,
    pub country: Option<String>,
}

impl Location {
    /// (lat, lon) pair
    pub fn coords(&self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }

    /// "City, Country" with "unknown" for missing parts
    pub fn place(&self) -> String {
        format!(
            "{}, {}",
            self.city.as_deref().unwrap_or("unknown"),
            self.country.as_deref().unwrap_or("unknown")
        )
    }
}

#[derive(Debug, Error)]
pub enum GeoError {
    #[error("Could not find \"{}\". Place a GeoLite2-City database there or pass --geo-db.", .0.display())]
    DatabaseMissing(PathBuf),

    #[error("cannot load geolocation database {}: {source}", .path.display())]
    Database {
        path: PathBuf,
        #[source]
        source: maxminddb::MaxMindDBError,
    },

    #[error("public address {0} was not found in the geolocation database")]
    HostNotFound(Ipv4Addr),
}

/// IPv4 to location lookup
pub trait GeoResolver {
    /// Location of `addr`, or None if the database has no usable record
    fn resolve(&self, addr: Ipv4Addr) -> Option<Location>;
}

/// Resolver over a GeoLite2-City `.mmdb` file loaded into memory
pub struct MaxMindResolver {
    reader: Reader<Vec<u8>>,
}

impl MaxMindResolver {
    /// Load the database at `path`
    ///
    /// A missing file is reported separately from a corrupt one so the
    /// startup message can tell the user what to do.
    pub fn open(path: &Path) -> Result<Self, GeoError> {
        if !path.is_file() {
            return Err(GeoError::DatabaseMissing(path.to_path_buf()));
        }

        let reader = Reader::open_readfile(path).map_err(|source| GeoError::Database {
            path: path.to_path_buf(),
            source,
        })?;

        info!(
            path = %path.display(),
            database_type = %reader.metadata.database_type,
            "Opened geolocation database"
        );

        Ok(Self { reader })
    }
}

impl GeoResolver for MaxMindResolver {
    fn resolve(&self, addr: Ipv4Addr) -> Option<Location> {
        match self.reader.lookup::<geoip2::City>(IpAddr::V4(addr)) {
            Ok(record) => {
                let location = record.location.as_ref()?;
                Some(Location {
                    latitude: location.latitude?,
                    longitude: location.longitude?,
                    city: record
                        .city
                        .as_ref()
                        .and_then(|c| english_name(c.names.as_ref())),
                    country: record
                        .country
                        .as_ref()
                        .and_then(|c| english_name(c.names.as_ref())),
                })
            }
            Err(e) => {
                trace!(%addr, error = %e, "No geolocation record");
                None
            }
        }
    }
}

fn english_name(names: Option<&BTreeMap<&str, &str>>) -> Option<String> {
    names?.get(NAME_LANGUAGE).map(|name| name.to_string())
}

/// The host's own public address and where it resolves to
#[derive(Debug, Clone, PartialEq)]
pub struct HostIdentity {
    pub address: Ipv4Addr,
    pub location: Location,
}

impl HostIdentity {
    /// Resolve the host's public address, failing if it has no location
    pub fn locate(address: Ipv4Addr, resolver: &dyn GeoResolver) -> Result<Self, GeoError> {
        let location = resolver
            .resolve(address)
            .ok_or(GeoError::HostNotFound(address))?;
        info!(%address, place = %location.place(), "Located host");
        Ok(Self { address, location })
    }
}

impl fmt::Display for HostIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}, {:.2}deg, {:.2}deg)",
            self.address,
            self.location.place(),
            self.location.latitude,
            self.location.longitude
        )
    }
}

/// Fixed table resolver for tests
#[cfg(test)]
#[derive(Default)]
pub struct StaticResolver {
    table: std::collections::HashMap<Ipv4Addr, Location>,
}

#[cfg(test)]
impl StaticResolver {
    pub fn with(mut self, addr: [u8; 4], lat: f64, lon: f64, city: &str, country: &str) -> Self {
        self.table.insert(
            Ipv4Addr::from(addr),
            Location {
                latitude: lat,
                longitude: lon,
                city: Some(city.to_string()),
                country: Some(country.to_string()),
            },
        );
        self
    }

    pub fn insert(&mut self, addr: Ipv4Addr, location: Location) {
        self.table.insert(addr, location);
    }
}

#[cfg(test)]
impl GeoResolver for StaticResolver {
    fn resolve(&self, addr: Ipv4Addr) -> Option<Location> {
        self.table.get(&addr).cloned()
    }
}
