use rust_decimal::Decimal;

use crate::models::{NormalizedCase, SectionPlan, ZERO_AMOUNT_LITERAL};

/// Perform Stage 1: decide which optional sections the petition carries
///
/// Pure and total over any normalized case.
pub fn plan(case: &NormalizedCase) -> SectionPlan {
    SectionPlan {
        include_urgent_relief: case.urgent_relief,
        include_material_damages: has_material_damages(case),
        include_moral_damages: case.moral_damages,
        include_debt_nullity: case.problem_type.allows_debt_nullity(),
    }
}

fn has_material_damages(case: &NormalizedCase) -> bool {
    case.material_value != ZERO_AMOUNT_LITERAL && case.material_amount != Some(Decimal::ZERO)
}
