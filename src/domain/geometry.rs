//! Point and polygon geometries written as WKT and read back as GeoJSON.

use serde::{Serialize, Serializer};
use serde_json::{Value, json};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors when parsing well-known text.
#[derive(Debug, Error, PartialEq)]
pub enum GeometryError {
    #[error("unsupported geometry type: {0}")]
    UnsupportedType(String),

    #[error("malformed WKT: {0}")]
    Malformed(String),

    #[error("invalid coordinate '{0}'")]
    InvalidCoordinate(String),
}

/// A single position, optionally with elevation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coord {
    pub x: f64,
    pub y: f64,
    pub z: Option<f64>,
}

impl Coord {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, z: None }
    }

    pub fn with_z(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z: Some(z) }
    }

    fn to_wkt(self) -> String {
        match self.z {
            Some(z) => format!("{} {} {}", self.x, self.y, z),
            None => format!("{} {}", self.x, self.y),
        }
    }

    fn to_json(self) -> Value {
        match self.z {
            Some(z) => json!([self.x, self.y, z]),
            None => json!([self.x, self.y]),
        }
    }
}

impl FromStr for Coord {
    type Err = GeometryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = s
            .split_whitespace()
            .map(|p| p.parse::<f64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| GeometryError::InvalidCoordinate(s.trim().to_string()))?;

        match parts.as_slice() {
            [x, y] => Ok(Coord::new(*x, *y)),
            [x, y, z] => Ok(Coord::with_z(*x, *y, *z)),
            _ => Err(GeometryError::InvalidCoordinate(s.trim().to_string())),
        }
    }
}

/// Geometry attached to an entry (camera position or footprint).
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(Coord),
    /// Rings of a polygon; the first ring is the exterior.
    Polygon(Vec<Vec<Coord>>),
}

impl Geometry {
    /// Formats the geometry as well-known text.
    pub fn to_wkt(&self) -> String {
        match self {
            Geometry::Point(c) => {
                let tag = if c.z.is_some() { "POINT Z" } else { "POINT" };
                format!("{} ({})", tag, c.to_wkt())
            }
            Geometry::Polygon(rings) => {
                let has_z = rings
                    .first()
                    .and_then(|r| r.first())
                    .is_some_and(|c| c.z.is_some());
                let tag = if has_z { "POLYGON Z" } else { "POLYGON" };
                let body = rings
                    .iter()
                    .map(|ring| {
                        let coords: Vec<String> = ring.iter().map(|c| c.to_wkt()).collect();
                        format!("({})", coords.join(", "))
                    })
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{} ({})", tag, body)
            }
        }
    }

    /// Returns the GeoJSON geometry object.
    pub fn to_geojson(&self) -> Value {
        match self {
            Geometry::Point(c) => json!({ "type": "Point", "coordinates": c.to_json() }),
            Geometry::Polygon(rings) => {
                let coords: Vec<Value> = rings
                    .iter()
                    .map(|ring| Value::Array(ring.iter().map(|c| c.to_json()).collect()))
                    .collect();
                json!({ "type": "Polygon", "coordinates": coords })
            }
        }
    }

    /// Parses well-known text (`POINT`, `POINT Z`, `POLYGON`, `POLYGON Z`).
    pub fn from_wkt(wkt: &str) -> Result<Self, GeometryError> {
        let wkt = wkt.trim();
        let open = wkt
            .find('(')
            .ok_or_else(|| GeometryError::Malformed(wkt.to_string()))?;
        if !wkt.ends_with(')') {
            return Err(GeometryError::Malformed(wkt.to_string()));
        }

        let head = wkt[..open].trim().to_ascii_uppercase();
        let kind = head
            .trim_end_matches('Z')
            .trim_end_matches(char::is_whitespace);
        let inner = &wkt[open + 1..wkt.len() - 1];

        match kind {
            "POINT" => Ok(Geometry::Point(inner.parse()?)),
            "POLYGON" => {
                let rings = parse_rings(inner)?;
                if rings.is_empty() {
                    return Err(GeometryError::Malformed(wkt.to_string()));
                }
                Ok(Geometry::Polygon(rings))
            }
            other => Err(GeometryError::UnsupportedType(other.to_string())),
        }
    }
}

fn parse_rings(inner: &str) -> Result<Vec<Vec<Coord>>, GeometryError> {
    let mut rings = Vec::new();
    let mut rest = inner.trim();

    while !rest.is_empty() {
        let body = rest
            .strip_prefix('(')
            .ok_or_else(|| GeometryError::Malformed(inner.to_string()))?;
        let close = body
            .find(')')
            .ok_or_else(|| GeometryError::Malformed(inner.to_string()))?;

        let ring = body[..close]
            .split(',')
            .map(str::parse)
            .collect::<Result<Vec<Coord>, _>>()?;
        rings.push(ring);

        rest = body[close + 1..].trim_start();
        rest = rest.strip_prefix(',').unwrap_or(rest).trim_start();
    }

    Ok(rings)
}

impl fmt::Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_wkt())
    }
}

impl Serialize for Geometry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_geojson().serialize(serializer)
    }
}
