//! Output filename sanitization

/// Characters that are not allowed in output file names
const FORBIDDEN: &[char] = &['\\', '/', '*', '?', ':', '"', '<', '>', '|'];

/// Replace every character from `\ / * ? : " < > |` with `_`.
///
/// Everything else, including spaces, is kept.
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| if FORBIDDEN.contains(&c) { '_' } else { c })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replaces_forbidden_characters() {
        assert_eq!(sanitize_filename("A/B:Test"), "A_B_Test");
        assert_eq!(sanitize_filename(r#"a\b*c?d"e<f>g|h"#), "a_b_c_d_e_f_g_h");
    }

    #[test]
    fn test_keeps_spaces_and_unicode() {
        assert_eq!(sanitize_filename("Summer Fest"), "Summer Fest");
        assert_eq!(sanitize_filename("Fête 2025"), "Fête 2025");
        assert_eq!(sanitize_filename(""), "");
    }

    #[test]
    fn test_idempotent() {
        for s in ["A/B:Test", "plain", "***", "x|y|z", "__/__", "日本/語"] {
            let once = sanitize_filename(s);
            assert_eq!(sanitize_filename(&once), once);
            assert!(!once.contains(FORBIDDEN));
        }
    }
}
