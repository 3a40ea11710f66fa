// Unit-space boxes → physical pixels for the input executor.
use serde::{Deserialize, Serialize};

use crate::errors::{TarsError, TarsResult};

/// Normalized bounding box, each coordinate a fraction of the screenshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl BoundingBox {
    /// Decode the compact `[x1,y1,x2,y2]` string stored in `action_inputs`.
    pub fn from_json(encoded: &str) -> TarsResult<Self> {
        let [x1, y1, x2, y2]: [f64; 4] = serde_json::from_str(encoded)?;
        Ok(Self { x1, y1, x2, y2 })
    }

    pub fn center(&self) -> (f64, f64) {
        ((self.x1 + self.x2) / 2.0, (self.y1 + self.y2) / 2.0)
    }

    /// A point box has zero width and height.
    pub fn is_point(&self) -> bool {
        self.x1 == self.x2 && self.y1 == self.y2
    }

    /// Centre of the box on a screen of the given physical size.
    pub fn center_physical(&self, physical_width: u32, physical_height: u32) -> TarsResult<(i32, i32)> {
        if physical_width == 0 || physical_height == 0 {
            return Err(TarsError::Config(format!(
                "invalid screen size {physical_width}x{physical_height}"
            )));
        }
        let (cx, cy) = self.center();
        let px = (cx * physical_width as f64).round() as i32;
        let py = (cy * physical_height as f64).round() as i32;
        Ok((px, py))
    }
}
