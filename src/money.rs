use rust_decimal::{Decimal, RoundingStrategy};

/// Format as euro with thousands separators, e.g. `€80,550.00` or `-€4,939.37`
pub fn format_eur(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{}€{}", sign, group_thousands(&format!("{:.2}", rounded.abs())))
}

/// Format a percentage with one decimal, e.g. `53.7%`
pub fn format_pct(pct: Decimal) -> String {
    let rounded = pct.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.1}%", rounded)
}

/// Plain number without trailing zeros, for messages
pub fn format_decimal(value: Decimal) -> String {
    value.normalize().to_string()
}

fn group_thousands(digits: &str) -> String {
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (digits, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (idx, ch) in int_part.chars().enumerate() {
        if idx > 0 && (int_part.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(frac) => format!("{}.{}", grouped, frac),
        None => grouped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn euro_amounts_are_grouped() {
        assert_eq!(format_eur(dec!(80550)), "€80,550.00");
        assert_eq!(format_eur(dec!(1234567.891)), "€1,234,567.89");
        assert_eq!(format_eur(dec!(999.995)), "€1,000.00");
        assert_eq!(format_eur(Decimal::ZERO), "€0.00");
    }

    #[test]
    fn negative_euro_amounts() {
        assert_eq!(format_eur(dec!(-4939.367)), "-€4,939.37");
        assert_eq!(format_eur(dec!(-0.001)), "€0.00");
    }

    #[test]
    fn percentages_have_one_decimal() {
        assert_eq!(format_pct(dec!(53.7)), "53.7%");
        assert_eq!(format_pct(dec!(59.527944444)), "59.5%");
        assert_eq!(format_pct(dec!(-75.30633)), "-75.3%");
    }

    #[test]
    fn decimals_drop_trailing_zeros() {
        assert_eq!(format_decimal(dec!(50000.00)), "50000");
        assert_eq!(format_decimal(dec!(0.0669)), "0.0669");
    }
}
