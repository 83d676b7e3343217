use serde::{Deserialize, Serialize};

/// Tunable parameters of the reconstruction and solving pipeline.
///
/// Deserializing fills missing fields from [`Config::default`], so a config
/// file only needs to name the values it changes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Channel values strictly above this map to 255, everything else to 0.
    pub binarize_threshold: u8,

    /// A row (column) is a wall line when its black pixel count exceeds this
    /// fraction of the image width (height).
    ///
    /// Calibrated for renderings where wall lines are at least 49% black and
    /// other lines at most 14%. Other rendering conventions need a new value.
    pub wall_density: f64,

    /// Whether the special marker counts as an extra exit during the first
    /// solver pass. This is what keeps start and finish cells alive.
    pub count_special_as_exit: bool,

    /// Fail instead of closing the border when two neighbors disagree on it.
    pub strict_adjacency: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            binarize_threshold: 127,
            wall_density: 1.0 / 3.0,
            count_special_as_exit: true,
            strict_adjacency: false,
        }
    }
}
