use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Raw intake form as submitted by the consumer
///
/// Every recognized key is declared here; anything else in the payload is
/// dropped during deserialization and never reaches the prompt.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct IntakeForm {
    /// "Cidade/UF" where the action is filed
    #[serde(deserialize_with = "loose_text")]
    pub action_city_state: Option<String>,

    #[serde(deserialize_with = "loose_text")]
    pub author_name: Option<String>,
    #[serde(deserialize_with = "loose_text")]
    pub author_cpf: Option<String>,
    #[serde(deserialize_with = "loose_text")]
    pub author_address: Option<String>,
    #[serde(deserialize_with = "loose_text")]
    pub author_contact: Option<String>,

    #[serde(deserialize_with = "loose_text")]
    pub company_name: Option<String>,
    /// CNPJ and/or address of the utility
    #[serde(deserialize_with = "loose_text")]
    pub company_details: Option<String>,

    #[serde(deserialize_with = "loose_text")]
    pub problem_type: Option<String>,

    /// Installation / consumer unit number printed on the bill
    #[serde(deserialize_with = "loose_text")]
    pub consumer_unit: Option<String>,
    #[serde(deserialize_with = "loose_text")]
    pub problem_description: Option<String>,
    #[serde(deserialize_with = "loose_text")]
    pub protocol_numbers: Option<String>,

    // power-cutoff
    #[serde(deserialize_with = "loose_text")]
    pub cutoff_date: Option<String>,
    #[serde(deserialize_with = "loose_text")]
    pub cutoff_notice: Option<String>,
    #[serde(deserialize_with = "loose_text")]
    pub bills_up_to_date: Option<String>,
    #[serde(deserialize_with = "loose_text")]
    pub reconnection_date: Option<String>,

    // voltage-damage
    #[serde(deserialize_with = "loose_text")]
    pub damage_date: Option<String>,
    #[serde(deserialize_with = "loose_text")]
    pub damaged_equipment: Option<String>,
    #[serde(deserialize_with = "loose_text")]
    pub technical_report: Option<String>,

    // improper-fine
    #[serde(deserialize_with = "loose_text")]
    pub fine_date: Option<String>,
    #[serde(deserialize_with = "loose_text")]
    pub fine_amount: Option<String>,
    #[serde(deserialize_with = "loose_text")]
    pub inspection_details: Option<String>,

    // connection-refusal
    #[serde(deserialize_with = "loose_text")]
    pub connection_request_date: Option<String>,
    #[serde(deserialize_with = "loose_text")]
    pub refusal_reason: Option<String>,

    // improper-billing
    #[serde(deserialize_with = "loose_text")]
    pub billing_period: Option<String>,
    #[serde(deserialize_with = "loose_text")]
    pub billed_amount: Option<String>,
    #[serde(deserialize_with = "loose_text")]
    pub usual_amount: Option<String>,

    #[serde(deserialize_with = "loose_list")]
    pub evidence: Vec<String>,

    #[serde(deserialize_with = "loose_text")]
    pub urgent_decision: Option<String>,
    #[serde(deserialize_with = "loose_text")]
    pub material_value: Option<String>,
    #[serde(rename = "dano-moral-pergunta", deserialize_with = "loose_text")]
    pub moral_damage_requested: Option<String>,
    #[serde(deserialize_with = "loose_text")]
    pub moral_value: Option<String>,
}

impl IntakeForm {
    /// Build a form from an arbitrary JSON value
    ///
    /// Non-object values produce an empty form. Field-level type mismatches
    /// are absorbed by the lenient field deserializers, so this never fails.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Object(_) => Self::deserialize(value).unwrap_or_default(),
            _ => Self::default(),
        }
    }
}

/// Convert a scalar JSON value into trimmed text
///
/// Blank strings, `null`, arrays and objects count as "not informed".
pub(crate) fn scalar_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => return None,
    };
    (!text.is_empty()).then_some(text)
}

fn loose_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(scalar_text(&value))
}

/// Evidence arrives either as a list (checkboxes) or a single string
fn loose_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let items = match &value {
        Value::Array(items) => items.iter().filter_map(scalar_text).collect(),
        other => scalar_text(other).into_iter().collect(),
    };
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_kebab_case_form() {
        let form = IntakeForm::from_value(&json!({
            "author-name": "  Maria da Silva ",
            "problem-type": "power-cutoff",
            "dano-moral-pergunta": "sim",
            "material-value": 300,
            "evidence": ["fatura", "protocolo", ""],
            "favorite-color": "blue"
        }));

        assert_eq!(form.author_name.as_deref(), Some("Maria da Silva"));
        assert_eq!(form.problem_type.as_deref(), Some("power-cutoff"));
        assert_eq!(form.moral_damage_requested.as_deref(), Some("sim"));
        assert_eq!(form.material_value.as_deref(), Some("300"));
        assert_eq!(form.evidence, vec!["fatura", "protocolo"]);
    }

    #[test]
    fn test_mismatched_types_are_absent() {
        let form = IntakeForm::from_value(&json!({
            "author-name": {"first": "Maria"},
            "company-name": null,
            "author-cpf": "   ",
            "evidence": "conta de luz"
        }));

        assert_eq!(form.author_name, None);
        assert_eq!(form.company_name, None);
        assert_eq!(form.author_cpf, None);
        assert_eq!(form.evidence, vec!["conta de luz"]);
    }

    #[test]
    fn test_non_object_payload_is_empty_form() {
        let form = IntakeForm::from_value(&json!(["author-name", "Maria"]));
        assert!(form.author_name.is_none());
        assert!(form.evidence.is_empty());
    }
}
