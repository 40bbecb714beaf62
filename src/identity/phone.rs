//! 전화번호 E.164 정규화
use crate::error::IdentityError;

/// 공백/괄호/하이픈 등을 제거하고 E.164 형식(+국가코드와 번호, 최대 15자리)으로 맞춘다.
pub fn normalize_phone(raw: &str) -> Result<String, IdentityError> {
    let trimmed = raw.trim();
    let digits: String = trimmed.chars().filter(|c| c.is_ascii_digit()).collect();
    let formatted = format!("+{}", digits);

    if is_e164(&formatted) {
        Ok(formatted)
    } else {
        Err(IdentityError::InvalidPhoneNumber(raw.to_string()))
    }
}

/// `^\+[1-9]\d{1,14}$`
fn is_e164(phone: &str) -> bool {
    let Some(digits) = phone.strip_prefix('+') else {
        return false;
    };
    let len = digits.len();
    (2..=15).contains(&len)
        && digits.chars().all(|c| c.is_ascii_digit())
        && !digits.starts_with('0')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_formatting_characters() {
        assert_eq!(
            normalize_phone(" +1 (415) 555-2671 ").unwrap(),
            "+14155552671"
        );
        assert_eq!(normalize_phone("82-10-1234-5678").unwrap(), "+821012345678");
    }

    #[test]
    fn rejects_invalid_numbers() {
        for raw in ["", "+", "+0123456", "+1", "1234567890123456", "abc"] {
            assert_eq!(
                normalize_phone(raw),
                Err(IdentityError::InvalidPhoneNumber(raw.to_string())),
                "{raw}"
            );
        }
    }
}
