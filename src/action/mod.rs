//! Typed view over parsed records for downstream executors.
pub mod geometry;
pub mod kind;

use crate::errors::TarsResult;
use crate::parser::types::ActionRecord;

use self::geometry::BoundingBox;
use self::kind::ActionKind;

impl ActionRecord {
    pub fn kind(&self) -> ActionKind {
        ActionKind::from(self.action_type.as_str())
    }

    /// Decoded `start_box`, if the record has one.
    pub fn start_box(&self) -> TarsResult<Option<BoundingBox>> {
        self.box_input("start_box")
    }

    /// Decoded `end_box`, if the record has one.
    pub fn end_box(&self) -> TarsResult<Option<BoundingBox>> {
        self.box_input("end_box")
    }

    fn box_input(&self, name: &str) -> TarsResult<Option<BoundingBox>> {
        self.action_inputs
            .get(name)
            .map(|encoded| BoundingBox::from_json(encoded))
            .transpose()
    }
}
