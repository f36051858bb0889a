use rust_decimal::Decimal;
use serde::Serialize;

/// Placeholder for party and venue data the consumer left blank
pub const NOT_INFORMED: &str = "Não informado";
/// Placeholder for per-category fact fields
pub const NOT_APPLICABLE: &str = "N/A";
/// Placeholder for an empty evidence list
pub const NO_EVIDENCE: &str = "nenhuma prova especificada";
/// Display text for a moral damage amount left to the judge
pub const TO_BE_ARBITRATED: &str = "a ser arbitrado";

/// Closed classification of the consumer's complaint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProblemType {
    /// Supply cut without notice or while bills were paid
    PowerCutoff,
    /// Appliances burned by voltage surges
    VoltageDamage,
    /// Fine after an inspection (TOI / meter tampering accusation)
    ImproperFine,
    /// New connection refused or delayed
    ConnectionRefusal,
    /// Abusive or wrong bill
    ImproperBilling,
    Other,
    /// Missing or unrecognized token
    Unspecified,
}

impl ProblemType {
    pub const ALL: [ProblemType; 7] = [
        ProblemType::PowerCutoff,
        ProblemType::VoltageDamage,
        ProblemType::ImproperFine,
        ProblemType::ConnectionRefusal,
        ProblemType::ImproperBilling,
        ProblemType::Other,
        ProblemType::Unspecified,
    ];

    /// Resolve a form token; unknown tokens map to `Unspecified`
    pub fn from_token(token: Option<&str>) -> Self {
        match token.map(str::trim) {
            Some("power-cutoff") => ProblemType::PowerCutoff,
            Some("voltage-damage") => ProblemType::VoltageDamage,
            Some("improper-fine") => ProblemType::ImproperFine,
            Some("connection-refusal") => ProblemType::ConnectionRefusal,
            Some("improper-billing") => ProblemType::ImproperBilling,
            Some("other") => ProblemType::Other,
            _ => ProblemType::Unspecified,
        }
    }

    /// Human-readable label used in the petition
    pub fn label(&self) -> &'static str {
        match self {
            ProblemType::PowerCutoff => "Corte indevido no fornecimento de energia elétrica",
            ProblemType::VoltageDamage => "Danos em aparelhos elétricos por oscilação de tensão",
            ProblemType::ImproperFine => {
                "Multa indevida por suposta irregularidade no medidor (TOI)"
            }
            ProblemType::ConnectionRefusal => "Recusa ou demora na ligação de energia elétrica",
            ProblemType::ImproperBilling => "Cobrança indevida em fatura de energia elétrica",
            ProblemType::Other => "Outro problema com a concessionária de energia elétrica",
            ProblemType::Unspecified => "Não especificado",
        }
    }

    /// Categories where a declaration that the charge is not owed makes sense
    pub fn allows_debt_nullity(&self) -> bool {
        matches!(self, ProblemType::ImproperFine | ProblemType::ImproperBilling)
    }
}

/// A single labelled fact for the "DOS FATOS" section
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FactField {
    pub label: &'static str,
    pub value: String,
}

/// Author (consumer) qualification
#[derive(Debug, Clone, Serialize)]
pub struct AuthorInfo {
    pub name: String,
    pub cpf: String,
    pub address: String,
    pub contact: String,
}

/// Respondent (utility company) qualification
#[derive(Debug, Clone, Serialize)]
pub struct RespondentInfo {
    pub name: String,
    pub details: String,
}

/// Fully defaulted view of an intake form
///
/// No slot is ever empty: every text carries either the informed value or
/// its placeholder.
#[derive(Debug, Clone, Serialize)]
pub struct NormalizedCase {
    pub venue: String,
    pub author: AuthorInfo,
    pub respondent: RespondentInfo,
    pub problem_type: ProblemType,
    pub problem_label: &'static str,
    pub consumer_unit: String,
    pub description: String,
    pub protocol_numbers: String,
    /// Per-category facts, only those relevant to `problem_type`
    pub facts: Vec<FactField>,
    pub evidence: Vec<String>,
    pub urgent_relief: bool,
    /// Display text of the material damage amount ("R$ 0,00" when absent)
    pub material_value: String,
    pub material_amount: Option<Decimal>,
    pub moral_damages: bool,
    /// Display text of the moral damage amount ("a ser arbitrado" when absent)
    pub moral_value: String,
    /// `None` when the amount is left to the judge
    pub moral_amount: Option<Decimal>,
}

impl NormalizedCase {
    /// Evidence rendered as a single display list
    pub fn evidence_display(&self) -> String {
        if self.evidence.is_empty() {
            NO_EVIDENCE.to_string()
        } else {
            self.evidence.join("; ")
        }
    }

    /// Author name, or a signature placeholder when not informed
    pub fn signature_name(&self) -> &str {
        if self.author.name == NOT_INFORMED {
            "[Nome Completo do Autor]"
        } else {
            &self.author.name
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_problem_type_resolution_is_total() {
        assert_eq!(ProblemType::from_token(Some("improper-fine")), ProblemType::ImproperFine);
        assert_eq!(ProblemType::from_token(Some(" other ")), ProblemType::Other);
        assert_eq!(ProblemType::from_token(Some("Power-Cutoff")), ProblemType::Unspecified);
        assert_eq!(ProblemType::from_token(Some("")), ProblemType::Unspecified);
        assert_eq!(ProblemType::from_token(None), ProblemType::Unspecified);

        for problem in ProblemType::ALL {
            assert!(!problem.label().is_empty());
        }
    }

    #[test]
    fn test_debt_nullity_rule_table() {
        let allowed: Vec<_> = ProblemType::ALL
            .into_iter()
            .filter(|p| p.allows_debt_nullity())
            .collect();
        assert_eq!(allowed, vec![ProblemType::ImproperFine, ProblemType::ImproperBilling]);
    }
}
