//! Common validation rules shared across request payloads.

use validator::ValidationError;

/// Signatures are captured client-side as data URLs or typed names; cap the
/// size so a hostile payload cannot balloon the row.
pub const MAX_SIGNATURE_LENGTH: usize = 262_144;

/// Upper bound for rejection reasons and decision comments.
pub const MAX_REASON_LENGTH: usize = 500;

/// Validates a captured signature.
///
/// Requirements:
/// - Non-empty after trimming
/// - At most [`MAX_SIGNATURE_LENGTH`] bytes
pub fn validate_signature(signature: &str) -> Result<(), ValidationError> {
    if signature.trim().is_empty() {
        return Err(ValidationError::new("signature_required"));
    }
    if signature.len() > MAX_SIGNATURE_LENGTH {
        return Err(ValidationError::new("signature_too_large"));
    }
    Ok(())
}

/// Validates a rejection reason.
///
/// Requirements:
/// - Non-empty after trimming
/// - At most [`MAX_REASON_LENGTH`] characters
pub fn validate_rejection_reason(reason: &str) -> Result<(), ValidationError> {
    if reason.trim().is_empty() {
        return Err(ValidationError::new("reason_required"));
    }
    if reason.chars().count() > MAX_REASON_LENGTH {
        return Err(ValidationError::new("reason_too_long"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_rejects_empty_and_whitespace() {
        assert!(validate_signature("").is_err());
        assert!(validate_signature("   ").is_err());
    }

    #[test]
    fn signature_rejects_oversized_payloads() {
        let huge = "x".repeat(MAX_SIGNATURE_LENGTH + 1);
        assert!(validate_signature(&huge).is_err());
    }

    #[test]
    fn signature_accepts_typed_names_and_data_urls() {
        assert!(validate_signature("Jane Foreman").is_ok());
        assert!(validate_signature("data:image/png;base64,iVBORw0KGgo=").is_ok());
    }

    #[test]
    fn reason_rejects_empty() {
        assert!(validate_rejection_reason("").is_err());
        assert!(validate_rejection_reason("  \t").is_err());
    }

    #[test]
    fn reason_rejects_over_limit() {
        let long = "r".repeat(MAX_REASON_LENGTH + 1);
        assert!(validate_rejection_reason(&long).is_err());
    }

    #[test]
    fn reason_accepts_normal_text() {
        assert!(validate_rejection_reason("Hours do not match the sign-in sheet").is_ok());
    }
}
