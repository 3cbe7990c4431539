//! Domain primitives: TypeId, RegionId, SystemId, LocationId, Activity, TradeHub.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Item-type identifier from the static data export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TypeId(pub i64);

impl TypeId {
    /// Create a TypeId from its integer key.
    pub fn new(id: i64) -> Self {
        TypeId(id)
    }

    /// Get the underlying integer key.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Market region identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RegionId(pub i64);

impl RegionId {
    pub fn new(id: i64) -> Self {
        RegionId(id)
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Solar-system identifier (production location for cost indices).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SystemId(pub i64);

impl SystemId {
    pub fn new(id: i64) -> Self {
        SystemId(id)
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for SystemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Station or structure identifier. Structures use the full 64-bit range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LocationId(pub i64);

impl LocationId {
    pub fn new(id: i64) -> Self {
        LocationId(id)
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for LocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The (region, station) pair live order books are filtered against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TradeHub {
    pub region: RegionId,
    pub station: LocationId,
}

impl TradeHub {
    pub fn new(region: RegionId, station: LocationId) -> Self {
        TradeHub { region, station }
    }
}

/// Industry activity kind.
///
/// The canonical label for reactions is the plural `reactions`; the
/// cost-index feed reports it singular and is normalized on parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activity {
    Manufacturing,
    Copying,
    Invention,
    Reactions,
    ResearchingTimeEfficiency,
    ResearchingMaterialEfficiency,
}

/// An activity label that maps to no known activity kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownActivity;

impl fmt::Display for UnknownActivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown activity label")
    }
}

impl std::error::Error for UnknownActivity {}

impl Activity {
    /// Map a static-data-export activity id to an activity kind.
    pub fn from_sde_id(id: i64) -> Option<Self> {
        match id {
            1 => Some(Activity::Manufacturing),
            3 => Some(Activity::ResearchingTimeEfficiency),
            4 => Some(Activity::ResearchingMaterialEfficiency),
            5 => Some(Activity::Copying),
            8 => Some(Activity::Invention),
            11 => Some(Activity::Reactions),
            _ => None,
        }
    }

    /// Canonical lowercase label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Activity::Manufacturing => "manufacturing",
            Activity::Copying => "copying",
            Activity::Invention => "invention",
            Activity::Reactions => "reactions",
            Activity::ResearchingTimeEfficiency => "researching_time_efficiency",
            Activity::ResearchingMaterialEfficiency => "researching_material_efficiency",
        }
    }
}

impl FromStr for Activity {
    type Err = UnknownActivity;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "manufacturing" => Ok(Activity::Manufacturing),
            "copying" => Ok(Activity::Copying),
            "invention" => Ok(Activity::Invention),
            // the cost-index feed labels this one singular
            "reaction" | "reactions" => Ok(Activity::Reactions),
            "researching_time_efficiency" => Ok(Activity::ResearchingTimeEfficiency),
            "researching_material_efficiency" => Ok(Activity::ResearchingMaterialEfficiency),
            _ => Err(UnknownActivity),
        }
    }
}

impl fmt::Display for Activity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
