/// Format a float as a dollar amount with thousands separators: $1,234.56
pub fn money(val: f64) -> String {
    let negative = val < 0.0;
    let abs = val.abs();
    let cents = format!("{:.2}", abs);
    let (int_part, dec_part) = cents.split_once('.').unwrap_or((cents.as_str(), "00"));

    let mut with_commas = String::new();
    for (i, c) in int_part.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            with_commas.push(',');
        }
        with_commas.push(c);
    }
    let with_commas: String = with_commas.chars().rev().collect();

    if negative {
        format!("-${with_commas}.{dec_part}")
    } else {
        format!("${with_commas}.{dec_part}")
    }
}

fn plural(n: u32, unit: &str) -> String {
    if n == 1 {
        format!("1 {unit}")
    } else {
        format!("{n} {unit}s")
    }
}

/// Human span label: "1 year, 2 months, 3 days". Zero components are left
/// out; an empty span reads "0 days".
pub fn span_label(years: u32, months: u32, days: u32) -> String {
    let parts: Vec<String> = [(years, "year"), (months, "month"), (days, "day")]
        .into_iter()
        .filter(|(n, _)| *n > 0)
        .map(|(n, unit)| plural(n, unit))
        .collect();
    if parts.is_empty() {
        "0 days".to_string()
    } else {
        parts.join(", ")
    }
}

/// Signed day delta for tables: "+3d", "-1d", "0d".
pub fn day_delta(days: i64) -> String {
    if days > 0 {
        format!("+{days}d")
    } else {
        format!("{days}d")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_formatting() {
        assert_eq!(money(1234.56), "$1,234.56");
        assert_eq!(money(-500.00), "-$500.00");
        assert_eq!(money(0.0), "$0.00");
        assert_eq!(money(1000000.99), "$1,000,000.99");
        assert_eq!(money(450.5), "$450.50");
    }

    #[test]
    fn test_span_label() {
        assert_eq!(span_label(0, 0, 1), "1 day");
        assert_eq!(span_label(1, 0, 3), "1 year, 3 days");
        assert_eq!(span_label(2, 1, 0), "2 years, 1 month");
        assert_eq!(span_label(0, 0, 0), "0 days");
    }

    #[test]
    fn test_day_delta() {
        assert_eq!(day_delta(3), "+3d");
        assert_eq!(day_delta(0), "0d");
        assert_eq!(day_delta(-2), "-2d");
    }
}
