use rust_decimal::Decimal;

/// Placeholder used when no material damage amount was informed
pub const ZERO_AMOUNT_LITERAL: &str = "R$ 0,00";

/// Integer digits beyond this are treated as unparseable, keeping sums of a
/// few amounts far away from the `Decimal` range
pub const MAX_INTEGER_DIGITS: usize = 15;

/// Parse a Brazilian-formatted currency string ("R$ 1.234,56", "300", "300,00")
///
/// Returns `None` for anything that is not a plain non-negative amount, or
/// that has more than [`MAX_INTEGER_DIGITS`] integer digits.
pub fn parse_brl(input: &str) -> Option<Decimal> {
    let cleaned: String = input
        .trim()
        .trim_start_matches("R$")
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    if cleaned.is_empty() || !cleaned.chars().all(|c| c.is_ascii_digit() || c == '.' || c == ',') {
        return None;
    }

    let normalized = if cleaned.contains(',') {
        // "1.234,56": dots group thousands, the comma separates cents
        if cleaned.matches(',').count() > 1 {
            return None;
        }
        cleaned.replace('.', "").replace(',', ".")
    } else if cleaned.matches('.').count() == 1
        && cleaned
            .rsplit('.')
            .next()
            .is_some_and(|cents| (1..=2).contains(&cents.len()))
    {
        // "300.00" or "1.5" written with a decimal point
        cleaned
    } else {
        cleaned.replace('.', "")
    };

    let units = normalized.split('.').next().unwrap_or_default();
    if units.trim_start_matches('0').len() > MAX_INTEGER_DIGITS {
        return None;
    }

    normalized.parse::<Decimal>().ok()
}

/// Render a decimal as "R$ 1.234,56"
pub fn format_brl(amount: Decimal) -> String {
    let rounded = amount.round_dp(2);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let text = format!("{:.2}", rounded.abs());
    let (units, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(units.len() + units.len() / 3);
    for (i, digit) in units.chars().enumerate() {
        if i > 0 && (units.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    format!("{}R$ {},{}", if negative { "-" } else { "" }, grouped, cents)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_brl_formats() {
        assert_eq!(parse_brl("R$ 300,00"), Some(Decimal::new(30000, 2)));
        assert_eq!(parse_brl("300"), Some(Decimal::new(300, 0)));
        assert_eq!(parse_brl("R$1.234,56"), Some(Decimal::new(123456, 2)));
        assert_eq!(parse_brl("1.500"), Some(Decimal::new(1500, 0)));
        assert_eq!(parse_brl("300.50"), Some(Decimal::new(30050, 2)));
        assert_eq!(parse_brl("1.5"), Some(Decimal::new(15, 1)));
        assert_eq!(parse_brl("R$ 2.5"), Some(Decimal::new(25, 1)));
        assert_eq!(parse_brl(ZERO_AMOUNT_LITERAL), Some(Decimal::ZERO));
    }

    #[test]
    fn test_parse_brl_rejects_text() {
        assert_eq!(parse_brl("a ser arbitrado"), None);
        assert_eq!(parse_brl(""), None);
        assert_eq!(parse_brl("R$ "), None);
        assert_eq!(parse_brl("1,2,3"), None);
        assert_eq!(parse_brl("-50"), None);
    }

    #[test]
    fn test_parse_brl_rejects_oversized_amounts() {
        assert_eq!(
            parse_brl("999999999999999"),
            Some(Decimal::new(999_999_999_999_999, 0))
        );
        assert_eq!(parse_brl("1000000000000000"), None);
        assert_eq!(parse_brl("79228162514264337593543950335"), None);
        assert_eq!(parse_brl("R$ 79.228.162.514.264.337.593.543.950.335,00"), None);
    }

    #[test]
    fn test_format_brl_groups_thousands() {
        assert_eq!(format_brl(Decimal::new(30000, 2)), "R$ 300,00");
        assert_eq!(format_brl(Decimal::new(1030000, 2)), "R$ 10.300,00");
        assert_eq!(format_brl(Decimal::new(123456789, 2)), "R$ 1.234.567,89");
        assert_eq!(format_brl(Decimal::ZERO), "R$ 0,00");
        assert_eq!(format_brl(Decimal::new(5, 1)), "R$ 0,50");
    }
}
