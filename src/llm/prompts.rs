use std::fmt;

use rust_decimal::Decimal;

use crate::models::{format_brl, NormalizedCase, ProblemType, SectionPlan, NOT_INFORMED};

/// Moral damage ceiling assumed for the claim value when the amount is left to the judge
pub const DEFAULT_ARBITRATION_CEILING: Decimal = Decimal::from_parts(10_000, 0, 0, false, 0);

/// Role and tone instructions for the generation provider
pub const PREAMBLE: &str = "Você é um assistente jurídico especializado em criar petições iniciais para o Juizado Especial Cível (JEC) do Brasil, com foco em direito do consumidor contra concessionárias de energia elétrica. Sua linguagem deve ser formal, clara, objetiva e persuasiva.
Baseado nos dados abaixo, gere o texto completo de uma petição inicial. Campos marcados como \"Não informado\" ou \"N/A\" não foram preenchidos: não invente dados, deixe um espaço entre colchetes para preenchimento posterior.";

const CLOSING_INSTRUCTION: &str =
    "Agora, por favor, gere o texto completo e coeso da petição inicial, seguindo exatamente a estrutura acima.";

/// Configuration for prompt composition
#[derive(Debug, Clone)]
pub struct ComposerConfig {
    /// Stand-in for an arbitrated moral damage amount, used only in the claim value sum
    pub arbitration_ceiling: Decimal,
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            arbitration_ceiling: DEFAULT_ARBITRATION_CEILING,
        }
    }
}

/// The single text block handed to the generation provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedPrompt(String);

impl ComposedPrompt {
    pub fn as_str(&self) -> &str {
        &self.0
    }

}

impl fmt::Display for ComposedPrompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Top-level petition sections, in emission order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Addressing,
    Qualification,
    Facts,
    Law,
    UrgentRelief,
    Requests,
    ClaimValue,
    Closing,
}

impl SectionKind {
    pub fn title(&self) -> &'static str {
        match self {
            SectionKind::Addressing => "ENDEREÇAMENTO",
            SectionKind::Qualification => "QUALIFICAÇÃO DAS PARTES",
            SectionKind::Facts => "DOS FATOS",
            SectionKind::Law => "DO DIREITO",
            SectionKind::UrgentRelief => "DA TUTELA DE URGÊNCIA",
            SectionKind::Requests => "DOS PEDIDOS",
            SectionKind::ClaimValue => "DO VALOR DA CAUSA",
            SectionKind::Closing => "FECHAMENTO",
        }
    }
}

/// One rendered section of the prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub kind: SectionKind,
    pub body: String,
}

impl Section {
    fn new(kind: SectionKind, body: String) -> Self {
        Self { kind, body }
    }
}

type SectionBuilder = fn(&NormalizedCase, &SectionPlan, &ComposerConfig) -> Option<Section>;

const SECTION_BUILDERS: [SectionBuilder; 8] = [
    addressing_section,
    qualification_section,
    facts_section,
    law_section,
    urgent_relief_section,
    requests_section,
    claim_value_section,
    closing_section,
];

/// Build the prompt for a normalized case
///
/// Total over any case and plan: mandatory sections always render, optional
/// ones are skipped and the remaining sections are numbered consecutively.
pub fn compose(case: &NormalizedCase, plan: &SectionPlan, config: &ComposerConfig) -> ComposedPrompt {
    let mut prompt = String::with_capacity(4096);

    prompt.push_str(PREAMBLE);
    prompt.push_str("\n\nESTRUTURA DA PETIÇÃO:\n\n");

    for (i, section) in build_sections(case, plan, config).iter().enumerate() {
        prompt.push_str(&format!("{}. **{}**\n", i + 1, section.kind.title()));
        prompt.push_str(&section.body);
        prompt.push_str("\n\n");
    }

    prompt.push_str(CLOSING_INSTRUCTION);
    prompt.push('\n');

    ComposedPrompt(prompt)
}

/// All sections emitted for this case, in order
pub fn build_sections(
    case: &NormalizedCase,
    plan: &SectionPlan,
    config: &ComposerConfig,
) -> Vec<Section> {
    SECTION_BUILDERS
        .iter()
        .filter_map(|build| build(case, plan, config))
        .collect()
}

/// Addressing line to the small-claims court of the venue
pub fn addressing_section(
    case: &NormalizedCase,
    _plan: &SectionPlan,
    _config: &ComposerConfig,
) -> Option<Section> {
    let venue = informed_or(&case.venue, "[Cidade e Estado não informados]");
    Some(Section::new(
        SectionKind::Addressing,
        format!(
            "\"EXCELENTÍSSIMO(A) SENHOR(A) DOUTOR(A) JUIZ(A) DE DIREITO DO JUIZADO ESPECIAL CÍVEL DA COMARCA DE {}.\"",
            venue
        ),
    ))
}

/// Author and respondent identification
pub fn qualification_section(
    case: &NormalizedCase,
    _plan: &SectionPlan,
    _config: &ComposerConfig,
) -> Option<Section> {
    let author = &case.author;
    let respondent = &case.respondent;

    let mut body = String::new();
    body.push_str("Qualifique o autor com: nome completo, nacionalidade (brasileiro(a)), estado civil, profissão, CPF e endereço completo. Qualifique a ré como pessoa jurídica de direito privado, concessionária de serviço público de energia elétrica, com CNPJ e sede (se informados).\n");
    body.push_str(&format!("- Nome completo do autor: {}\n", author.name));
    body.push_str(&format!("- CPF do autor: {}\n", author.cpf));
    body.push_str(&format!("- Endereço do autor: {}\n", author.address));
    body.push_str(&format!("- Contato do autor: {}\n", author.contact));
    body.push_str(&format!("- Nome da empresa ré: {}\n", respondent.name));
    body.push_str(&format!("- CNPJ/Endereço da ré: {}", respondent.details));

    Some(Section::new(SectionKind::Qualification, body))
}

/// Narrative facts plus the problem type's category facts
pub fn facts_section(
    case: &NormalizedCase,
    _plan: &SectionPlan,
    _config: &ComposerConfig,
) -> Option<Section> {
    let mut body = String::new();
    body.push_str(
        "Narre os acontecimentos de forma cronológica e detalhada, usando os dados abaixo. Seja claro e direto.\n",
    );
    body.push_str(&format!("- Problema principal: {}\n", case.problem_label));
    body.push_str(&format!("- Unidade consumidora: {}\n", case.consumer_unit));
    body.push_str(&format!("- Relato do autor: {}\n", case.description));
    for fact in &case.facts {
        body.push_str(&format!("- {}: {}\n", fact.label, fact.value));
    }
    body.push_str(&format!(
        "- Protocolos de atendimento: {}\n",
        case.protocol_numbers
    ));
    body.push_str(&format!("- Provas disponíveis: {}", case.evidence_display()));

    Some(Section::new(SectionKind::Facts, body))
}

/// Legal provisions the law section asks the provider to cite
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Statute {
    /// CDC arts. 6º VIII, 14 and 22
    ConsumerCode,
    /// CDC art. 42, parágrafo único
    UndueChargeRepetition,
    /// ANEEL Resolução Normativa nº 1.000/2021
    AneelSupplyRules,
}

/// Which statutes are cited for this case
pub fn cited_statutes(case: &NormalizedCase, plan: &SectionPlan) -> Vec<Statute> {
    let mut statutes = vec![Statute::ConsumerCode];
    if plan.include_debt_nullity {
        statutes.push(Statute::UndueChargeRepetition);
    }
    if matches!(
        case.problem_type,
        ProblemType::PowerCutoff | ProblemType::ConnectionRefusal | ProblemType::VoltageDamage
    ) {
        statutes.push(Statute::AneelSupplyRules);
    }
    statutes
}

/// Statutes the provider is asked to cite
pub fn law_section(
    case: &NormalizedCase,
    plan: &SectionPlan,
    _config: &ComposerConfig,
) -> Option<Section> {
    let mut lines = vec!["Fundamente juridicamente o pedido.".to_string()];

    for statute in cited_statutes(case, plan) {
        lines.push(match statute {
            Statute::ConsumerCode => "Cite o Código de Defesa do Consumidor (CDC): a relação de consumo (arts. 2º e 3º), a falha na prestação do serviço e a responsabilidade objetiva da concessionária (Art. 14), o dever de fornecer serviço público adequado, eficiente, seguro e contínuo (Art. 22) e a inversão do ônus da prova (Art. 6º, VIII).".to_string(),
            Statute::UndueChargeRepetition => "Cite a cobrança indevida e o direito à repetição do indébito em dobro (Art. 42, parágrafo único, do CDC).".to_string(),
            Statute::AneelSupplyRules => "Cite as condições gerais de fornecimento de energia elétrica da Resolução Normativa ANEEL nº 1.000/2021 aplicáveis ao caso.".to_string(),
        });
    }

    if plan.include_moral_damages {
        lines.push("Sustente o dano moral puro (in re ipsa), pela perda do tempo útil e pelo transtorno causado ao autor.".to_string());
    }

    Some(Section::new(SectionKind::Law, lines.join("\n")))
}

/// Urgent relief request, only when planned
pub fn urgent_relief_section(
    case: &NormalizedCase,
    plan: &SectionPlan,
    _config: &ComposerConfig,
) -> Option<Section> {
    if !plan.include_urgent_relief {
        return None;
    }

    Some(Section::new(
        SectionKind::UrgentRelief,
        format!(
            "O autor pediu uma decisão urgente. Justifique a necessidade da medida liminar (Art. 300 do CPC) com base no \"periculum in mora\" (o perigo da demora) e no \"fumus boni iuris\" (a fumaça do bom direito), explicando por que o autor não pode esperar pela decisão final.\nMedida pretendida: {}.",
            urgent_measure(case.problem_type)
        ),
    ))
}

fn urgent_measure(problem_type: ProblemType) -> &'static str {
    match problem_type {
        ProblemType::PowerCutoff => {
            "o restabelecimento imediato do fornecimento de energia elétrica na unidade consumidora do autor, sob pena de multa diária"
        }
        ProblemType::ConnectionRefusal => {
            "a ligação da unidade consumidora do autor no prazo de 48 horas, sob pena de multa diária"
        }
        ProblemType::ImproperFine | ProblemType::ImproperBilling => {
            "a suspensão da cobrança contestada, vedando-se o corte do fornecimento e a inscrição do nome do autor em cadastros de inadimplentes em razão dela, sob pena de multa diária"
        }
        ProblemType::VoltageDamage | ProblemType::Other | ProblemType::Unspecified => {
            "a adoção imediata das providências necessárias para fazer cessar a lesão ao direito do autor, sob pena de multa diária"
        }
    }
}

/// Ordered request items, before lettering
pub fn request_items(case: &NormalizedCase, plan: &SectionPlan) -> Vec<String> {
    let mut items = vec!["A citação da ré para, querendo, responder à presente ação.".to_string()];

    if plan.include_urgent_relief {
        items.push(format!(
            "A concessão da tutela de urgência, para determinar {}, e sua confirmação ao final.",
            urgent_measure(case.problem_type)
        ));
    }

    items.push("A inversão do ônus da prova, conforme o Art. 6º, VIII, do CDC.".to_string());

    if plan.include_debt_nullity {
        items.push("A procedência da ação para declarar a inexigibilidade do débito contestado, com o cancelamento definitivo da cobrança e, havendo pagamento, a restituição em dobro do valor pago indevidamente.".to_string());
    }

    if plan.include_material_damages {
        items.push(format!(
            "A condenação da ré ao pagamento de indenização por danos materiais no valor de {}.",
            display_amount(&case.material_value, case.material_amount)
        ));
    }

    if plan.include_moral_damages {
        let amount = match case.moral_amount {
            Some(amount) => format_brl(amount),
            None => case.moral_value.clone(),
        };
        items.push(format!(
            "A condenação da ré ao pagamento de indenização por danos morais no valor de {}, ou em valor que Vossa Excelência entender justo.",
            amount
        ));
    }

    items
}

/// Lettered request items
pub fn requests_section(
    case: &NormalizedCase,
    plan: &SectionPlan,
    _config: &ComposerConfig,
) -> Option<Section> {
    let mut body = String::from("Liste todos os pedidos de forma clara, na ordem abaixo:\n");
    let items = request_items(case, plan);
    let last = items.len().saturating_sub(1);
    for (i, item) in items.iter().enumerate() {
        let letter = char::from(b'a' + (i % 26) as u8);
        body.push_str(&format!("{}) {}", letter, item));
        if i != last {
            body.push('\n');
        }
    }

    Some(Section::new(SectionKind::Requests, body))
}

/// Material plus moral damages, with the arbitration ceiling standing in for
/// a moral amount left to the judge. `None` when the sum does not fit a `Decimal`.
pub fn claim_value(
    case: &NormalizedCase,
    plan: &SectionPlan,
    config: &ComposerConfig,
) -> Option<Decimal> {
    let material = if plan.include_material_damages {
        case.material_amount.unwrap_or(Decimal::ZERO)
    } else {
        Decimal::ZERO
    };
    let moral = if plan.include_moral_damages {
        case.moral_amount.unwrap_or(config.arbitration_ceiling)
    } else {
        Decimal::ZERO
    };
    material.checked_add(moral)
}

/// Claim value, or a placeholder when it cannot be computed
pub fn claim_value_section(
    case: &NormalizedCase,
    plan: &SectionPlan,
    config: &ComposerConfig,
) -> Option<Section> {
    let total = claim_value(case, plan, config)
        .map(format_brl)
        .unwrap_or_else(|| UNCOMPUTED_CLAIM_VALUE.to_string());
    let body = if plan.has_damages() {
        format!(
            "Atribua à causa o valor de {} (soma dos danos materiais e morais pleiteados).",
            total
        )
    } else {
        format!("Atribua à causa o valor de {}.", total)
    };

    Some(Section::new(SectionKind::ClaimValue, body))
}

/// Closing formula with venue and signature
pub fn closing_section(
    case: &NormalizedCase,
    _plan: &SectionPlan,
    _config: &ComposerConfig,
) -> Option<Section> {
    Some(Section::new(
        SectionKind::Closing,
        format!(
            "\"Nestes termos, pede deferimento.\n\n{}, [Data].\n\n________________________________________\n{}\"",
            informed_or(&case.venue, "[Local]"),
            case.signature_name()
        ),
    ))
}

const UNCOMPUTED_CLAIM_VALUE: &str = "[valor a calcular]";

fn informed_or<'a>(value: &'a str, placeholder: &'a str) -> &'a str {
    if value == NOT_INFORMED { placeholder } else { value }
}

fn display_amount(text: &str, amount: Option<Decimal>) -> String {
    amount.map(format_brl).unwrap_or_else(|| text.to_string())
}
