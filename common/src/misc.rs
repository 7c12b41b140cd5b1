use crate::error::{AppError, Res};

/// Returns the trimmed value or a `BadRequest` naming the missing field.
pub fn required(field: &str, value: &str) -> Res<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::BadRequest(format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}

/// Emails are compared case-insensitively.
pub fn normalize_email(email: &str) -> Res<String> {
    let email = required("email", email)?.to_lowercase();
    if !email.contains('@') {
        return Err(AppError::BadRequest("email is not valid".to_string()));
    }
    Ok(email)
}

/// WhatsApp numbers are stored as bare digits in international format,
/// e.g. "+974 3312-3456" becomes "97433123456".
pub fn normalize_whatsapp_number(number: &str) -> Res<String> {
    let number = required("whatsappNumber", number)?;
    let digits: String = number
        .chars()
        .filter(|c| !matches!(c, ' ' | '+' | '-' | '(' | ')' | '.'))
        .collect();

    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(AppError::BadRequest(
            "whatsappNumber must contain only digits".to_string(),
        ));
    }
    Ok(digits)
}

/// Empty optional text is stored as NULL.
pub fn optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_rejects_blank_values() {
        assert!(matches!(required("title", "   "), Err(AppError::BadRequest(_))));
        assert_eq!(required("title", " Verão ").unwrap(), "Verão");
    }

    #[test]
    fn email_is_lowercased() {
        assert_eq!(normalize_email(" Ana@X.com ").unwrap(), "ana@x.com");
        assert!(normalize_email("ana").is_err());
    }

    #[test]
    fn whatsapp_number_keeps_only_digits() {
        assert_eq!(
            normalize_whatsapp_number("+974 3312-3456").unwrap(),
            "97433123456"
        );
        assert_eq!(normalize_whatsapp_number("97433123456").unwrap(), "97433123456");
        assert!(normalize_whatsapp_number("call me").is_err());
        assert!(normalize_whatsapp_number("").is_err());
    }

    #[test]
    fn optional_drops_blank_text() {
        assert_eq!(optional(Some("  ")), None);
        assert_eq!(optional(None), None);
        assert_eq!(optional(Some(" R$ 120 ")), Some("R$ 120".to_string()));
    }
}
