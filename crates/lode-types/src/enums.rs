//! Enumeration types for the mining game state.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Resource Types
// ---------------------------------------------------------------------------

/// A raw resource that can be found by prospecting and extracted by mining.
///
/// On the wire resources are named `"raw a"` through `"raw i"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum Resource {
    /// Raw resource A.
    #[serde(rename = "raw a")]
    RawA,
    /// Raw resource B.
    #[serde(rename = "raw b")]
    RawB,
    /// Raw resource C.
    #[serde(rename = "raw c")]
    RawC,
    /// Raw resource D.
    #[serde(rename = "raw d")]
    RawD,
    /// Raw resource E.
    #[serde(rename = "raw e")]
    RawE,
    /// Raw resource F.
    #[serde(rename = "raw f")]
    RawF,
    /// Raw resource G.
    #[serde(rename = "raw g")]
    RawG,
    /// Raw resource H.
    #[serde(rename = "raw h")]
    RawH,
    /// Raw resource I.
    #[serde(rename = "raw i")]
    RawI,
}

impl Resource {
    /// All resource types in canonical order.
    pub const ALL: [Self; 9] = [
        Self::RawA,
        Self::RawB,
        Self::RawC,
        Self::RawD,
        Self::RawE,
        Self::RawF,
        Self::RawG,
        Self::RawH,
        Self::RawI,
    ];

    /// The wire name of this resource.
    pub const fn name(self) -> &'static str {
        match self {
            Self::RawA => "raw a",
            Self::RawB => "raw b",
            Self::RawC => "raw c",
            Self::RawD => "raw d",
            Self::RawE => "raw e",
            Self::RawF => "raw f",
            Self::RawG => "raw g",
            Self::RawH => "raw h",
            Self::RawI => "raw i",
        }
    }

    /// Look up a resource by its wire name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.name() == name)
    }
}

impl core::fmt::Display for Resource {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}
