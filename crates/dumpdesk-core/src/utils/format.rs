/// Format a Brazilian phone number for display.
/// 11 digits -> (XX) XXXXX-XXXX, 10 digits -> (XX) XXXX-XXXX.
/// A leading 55 country code is dropped.
pub fn format_phone(phone: &str) -> String {
    let mut digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() > 11 && digits.starts_with("55") {
        digits.drain(..2);
    }

    match digits.len() {
        11 => format!("({}) {}-{}", &digits[0..2], &digits[2..7], &digits[7..11]),
        10 => format!("({}) {}-{}", &digits[0..2], &digits[2..6], &digits[6..10]),
        _ => phone.to_string(), // Return original if can't format
    }
}

/// Format a CPF (11 digits) or CNPJ (14 digits) document number.
pub fn format_document(doc: &str) -> String {
    let digits: String = doc.chars().filter(|c| c.is_ascii_digit()).collect();
    match digits.len() {
        11 => format!(
            "{}.{}.{}-{}",
            &digits[0..3],
            &digits[3..6],
            &digits[6..9],
            &digits[9..11]
        ),
        14 => format!(
            "{}.{}.{}/{}-{}",
            &digits[0..2],
            &digits[2..5],
            &digits[5..8],
            &digits[8..12],
            &digits[12..14]
        ),
        _ => doc.to_string(),
    }
}

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

/// Format an optional string, returning a default if None or empty
pub fn format_optional(value: &Option<String>, default: &str) -> String {
    match value.as_deref() {
        Some(v) if !v.trim().is_empty() => v.to_string(),
        _ => default.to_string(),
    }
}

/// Format a date string to dd/mm/yyyy
pub fn format_date(date: &str) -> String {
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(date) {
        dt.format("%d/%m/%Y").to_string()
    } else if let Ok(d) = chrono::NaiveDate::parse_from_str(date.get(..10).unwrap_or(date), "%Y-%m-%d") {
        d.format("%d/%m/%Y").to_string()
    } else {
        date.to_string()
    }
}

/// The yyyy-mm-dd part of a backend date, for editing. Empty if unparseable.
pub fn date_input(date: &str) -> String {
    let day = date.get(..10).unwrap_or(date);
    match chrono::NaiveDate::parse_from_str(day, "%Y-%m-%d") {
        Ok(d) => d.format("%Y-%m-%d").to_string(),
        Err(_) => String::new(),
    }
}

pub fn is_valid_date_input(input: &str) -> bool {
    chrono::NaiveDate::parse_from_str(input, "%Y-%m-%d").is_ok()
}

/// Format an amount in reais
pub fn format_currency(amount: f64) -> String {
    let cents = (amount * 100.0).round() as i64;
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.abs();
    format!("{}R$ {},{:02}", sign, cents / 100, cents % 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_phone() {
        assert_eq!(format_phone("11987654321"), "(11) 98765-4321");
        assert_eq!(format_phone("1133334444"), "(11) 3333-4444");
        assert_eq!(format_phone("+55 11 98765-4321"), "(11) 98765-4321");
        assert_eq!(format_phone("(11) 98765-4321"), "(11) 98765-4321");
        assert_eq!(format_phone("123"), "123"); // Too short, return as-is
    }

    #[test]
    fn test_format_document() {
        assert_eq!(format_document("12345678909"), "123.456.789-09");
        assert_eq!(format_document("12345678000195"), "12.345.678/0001-95");
        assert_eq!(format_document("123"), "123");
    }

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("Hello", 10), "Hello");
        assert_eq!(truncate_string("Hello World", 8), "Hello...");
        assert_eq!(truncate_string("Hi", 2), "Hi");
        assert_eq!(truncate_string("Caçamba grande", 7), "Caça...");
    }

    #[test]
    fn test_format_optional() {
        assert_eq!(format_optional(&None, "-"), "-");
        assert_eq!(format_optional(&Some("  ".to_string()), "-"), "-");
        assert_eq!(format_optional(&Some("x".to_string()), "-"), "x");
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("2024-05-01T10:00:00Z"), "01/05/2024");
        assert_eq!(format_date("2027-03-01"), "01/03/2027");
        assert_eq!(format_date("2024-05-01T10:00:00.123"), "01/05/2024");
        assert_eq!(format_date("soon"), "soon");
    }

    #[test]
    fn test_date_input() {
        assert_eq!(date_input("2027-03-01T00:00:00"), "2027-03-01");
        assert_eq!(date_input("2027-03-01"), "2027-03-01");
        assert_eq!(date_input(""), "");
        assert_eq!(date_input("01/03/2027"), "");

        assert!(is_valid_date_input("2027-03-01"));
        assert!(!is_valid_date_input("2027-02-30"));
        assert!(!is_valid_date_input("2027-3-1x"));
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(150.5), "R$ 150,50");
        assert_eq!(format_currency(0.0), "R$ 0,00");
        assert_eq!(format_currency(-2.05), "-R$ 2,05");
    }
}
