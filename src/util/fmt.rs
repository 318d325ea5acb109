/// Format a float in the en-US style: thousands separated by commas, always
/// exactly two decimal places. Non-finite values fall back to the standard
/// float formatting since there is nothing to group.
pub fn format_double(value: f64) -> String {
    let raw = format!("{:.2}", value);
    let (sign, digits) = match raw.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", raw.as_str()),
    };
    let (int_part, frac_part) = match digits.split_once('.') {
        Some(parts) => parts,
        // NaN/inf don't produce a decimal point
        None => return raw.clone(),
    };

    let mut grouped =
        String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    format!("{sign}{grouped}.{frac_part}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_double() {
        assert_eq!(format_double(0.0), "0.00");
        assert_eq!(format_double(3.14159), "3.14");
        assert_eq!(format_double(1234.5), "1,234.50");
        assert_eq!(format_double(-1234.5), "-1,234.50");
        assert_eq!(format_double(1_000_000.0), "1,000,000.00");
        assert_eq!(format_double(-0.5), "-0.50");
        assert_eq!(format_double(999.999), "1,000.00");
    }
}
