use serde::Serialize;

/// Which optional petition sections and requests are emitted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SectionPlan {
    pub include_urgent_relief: bool,
    pub include_material_damages: bool,
    pub include_moral_damages: bool,
    pub include_debt_nullity: bool,
}

impl SectionPlan {
    /// Whether any monetary request is made
    pub fn has_damages(&self) -> bool {
        self.include_material_damages || self.include_moral_damages
    }
}
