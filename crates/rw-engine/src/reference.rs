use glam::IVec3;
use rw_core::Angle12;
use serde::{Deserialize, Serialize};

/// Shared, read-only per-frame reference data.
///
/// The host writes it between frames; during a tick every entity sees the
/// same values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceFrame {
    /// Origin the init branch anchors to.
    pub origin: IVec3,
    /// Target chased by the primary pursuit branch.
    pub primary_target: IVec3,
    /// Target chased by the secondary pursuit branch.
    pub secondary_target: IVec3,
    /// Bearing the adjust branches bank against.
    pub bearing: Angle12,
}
