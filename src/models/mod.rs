use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

pub mod preview;
pub mod upstream;

pub use preview::PreviewData;

// ============================================================================
// Platform
// ============================================================================

/// Where a saved link points. Stored alongside the link and used to pick a
/// preview strategy.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum Platform {
    Youtube,
    X,
    Instagram,
    Other,
}
