use std::str::FromStr;

use serde_json::Value;
use tracing::debug;

use crate::error::{PetitionError, Result};
use crate::models::{
    parse_brl, AuthorInfo, FactField, IntakeForm, NormalizedCase, ProblemType, RespondentInfo,
    NOT_APPLICABLE, NOT_INFORMED, TO_BE_ARBITRATED, ZERO_AMOUNT_LITERAL,
};

/// Token that turns a yes/no form field on (exact, case-sensitive)
pub const AFFIRMATIVE_TOKEN: &str = "sim";

/// How much of the form must be filled before a petition is attempted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ValidationPolicy {
    /// Accept anything, default every field
    Lenient,
    /// Reject absent or empty payloads
    #[default]
    NonEmpty,
    /// Reject empty payloads and forms without author name or problem type
    Strict,
}

impl FromStr for ValidationPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lenient" => Ok(ValidationPolicy::Lenient),
            "non-empty" | "nonempty" => Ok(ValidationPolicy::NonEmpty),
            "strict" => Ok(ValidationPolicy::Strict),
            other => Err(format!(
                "unknown validation policy '{}' (expected lenient, non-empty or strict)",
                other
            )),
        }
    }
}

/// Configuration for the field normalizer
#[derive(Debug, Clone, Default)]
pub struct NormalizeConfig {
    pub policy: ValidationPolicy,
}

/// Perform Stage 0: turn a raw payload into a fully defaulted case
///
/// Only the validation policy can reject a payload; once accepted, every
/// field gets a deterministic fallback. The input is never modified.
pub fn normalize(raw: Option<&Value>, config: &NormalizeConfig) -> Result<NormalizedCase> {
    let payload_is_empty = match raw {
        Some(Value::Object(map)) => map.is_empty(),
        _ => true,
    };

    if payload_is_empty && config.policy != ValidationPolicy::Lenient {
        return Err(PetitionError::Input(
            "Nenhum dado recebido do formulário.".to_string(),
        ));
    }

    let form = raw.map(IntakeForm::from_value).unwrap_or_default();

    if config.policy == ValidationPolicy::Strict {
        let mut missing = Vec::new();
        if form.author_name.is_none() {
            missing.push("author-name");
        }
        if form.problem_type.is_none() {
            missing.push("problem-type");
        }
        if !missing.is_empty() {
            return Err(PetitionError::Input(format!(
                "Campos obrigatórios não informados: {}.",
                missing.join(", ")
            )));
        }
    }

    let case = normalize_form(&form);
    debug!(
        "Normalized case: problem={:?}, urgent={}, moral={}, facts={}, evidence={}",
        case.problem_type,
        case.urgent_relief,
        case.moral_damages,
        case.facts.len(),
        case.evidence.len()
    );

    Ok(case)
}

/// Default every field of an already-parsed form
pub fn normalize_form(form: &IntakeForm) -> NormalizedCase {
    let problem_type = ProblemType::from_token(form.problem_type.as_deref());

    let material_value = or_placeholder(&form.material_value, ZERO_AMOUNT_LITERAL);
    let material_amount = parse_brl(&material_value);

    let moral_damages = is_affirmative(form.moral_damage_requested.as_deref());
    let moral_value = or_placeholder(&form.moral_value, TO_BE_ARBITRATED);
    let moral_amount = parse_brl(&moral_value);

    NormalizedCase {
        venue: or_placeholder(&form.action_city_state, NOT_INFORMED),
        author: AuthorInfo {
            name: or_placeholder(&form.author_name, NOT_INFORMED),
            cpf: or_placeholder(&form.author_cpf, NOT_INFORMED),
            address: or_placeholder(&form.author_address, NOT_INFORMED),
            contact: or_placeholder(&form.author_contact, NOT_INFORMED),
        },
        respondent: RespondentInfo {
            name: or_placeholder(&form.company_name, NOT_INFORMED),
            details: or_placeholder(&form.company_details, NOT_INFORMED),
        },
        problem_type,
        problem_label: problem_type.label(),
        consumer_unit: or_placeholder(&form.consumer_unit, NOT_APPLICABLE),
        description: or_placeholder(&form.problem_description, NOT_APPLICABLE),
        protocol_numbers: or_placeholder(&form.protocol_numbers, NOT_APPLICABLE),
        facts: category_facts(form, problem_type),
        evidence: form.evidence.clone(),
        urgent_relief: is_affirmative(form.urgent_decision.as_deref()),
        material_value,
        material_amount,
        moral_damages,
        moral_value,
        moral_amount,
    }
}

/// Exact match against the affirmative token; anything else is "no"
pub fn is_affirmative(value: Option<&str>) -> bool {
    value.map(str::trim) == Some(AFFIRMATIVE_TOKEN)
}

fn or_placeholder(value: &Option<String>, placeholder: &str) -> String {
    value.clone().unwrap_or_else(|| placeholder.to_string())
}

/// Select the fact fields that belong to the problem category
fn category_facts(form: &IntakeForm, problem_type: ProblemType) -> Vec<FactField> {
    let fields: Vec<(&'static str, &Option<String>)> = match problem_type {
        ProblemType::PowerCutoff => vec![
            ("Data do corte", &form.cutoff_date),
            ("Houve aviso prévio do corte", &form.cutoff_notice),
            ("Faturas em dia na data do corte", &form.bills_up_to_date),
            ("Data da religação", &form.reconnection_date),
        ],
        ProblemType::VoltageDamage => vec![
            ("Data da oscilação / dano", &form.damage_date),
            ("Aparelhos danificados", &form.damaged_equipment),
            ("Laudo técnico / orçamento de reparo", &form.technical_report),
        ],
        ProblemType::ImproperFine => vec![
            ("Data da inspeção / multa", &form.fine_date),
            ("Valor cobrado", &form.fine_amount),
            ("Detalhes da inspeção (TOI)", &form.inspection_details),
        ],
        ProblemType::ConnectionRefusal => vec![
            ("Data do pedido de ligação", &form.connection_request_date),
            ("Motivo alegado para a recusa", &form.refusal_reason),
        ],
        ProblemType::ImproperBilling => vec![
            ("Período / mês da fatura contestada", &form.billing_period),
            ("Valor cobrado", &form.billed_amount),
            ("Valor médio habitual", &form.usual_amount),
        ],
        ProblemType::Other | ProblemType::Unspecified => vec![],
    };

    fields
        .into_iter()
        .map(|(label, value)| FactField {
            label,
            value: or_placeholder(value, NOT_APPLICABLE),
        })
        .collect()
}
