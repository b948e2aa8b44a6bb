//! Link matching mode definitions.

use serde::{Deserialize, Serialize};

/// How strictly anchor targets are matched against the target file type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Accept any link containing `.{type}` anywhere (default).
    #[default]
    Loose,
    /// Accept only `.{type}` at the end of the path, before `?` or `#`,
    /// or a `/{type}/` path segment.
    Strict,
}
