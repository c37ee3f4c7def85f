//! Composite prompt builder.
//!
//! Assembles the generation prompt from the raw query, instructions,
//! the expected response schema, and the caller's profile entries. The
//! output is fully deterministic: same inputs, same string, byte for
//! byte. Fixed markers delimit the prompt so logs and tests can locate
//! it unambiguously.

use sous_core::defaults::{DEFAULT_INSTRUCTIONS, DEFAULT_RESPONSE_SCHEMA, PROMPT_FOOTER, PROMPT_HEADER};

/// Build the composite prompt sent to the generation backend.
///
/// `instructions` and `schema` fall back to the built-in defaults when
/// absent. Profile entries render one per line as ` - key: value`, in
/// the order given.
pub fn build_composite_prompt(
    query: &str,
    instructions: Option<&str>,
    schema: Option<&str>,
    profile: &[(String, String)],
) -> String {
    let mut lines = Vec::with_capacity(5 + profile.len());
    lines.push(PROMPT_HEADER.to_string());
    lines.push(query.to_string());
    lines.push(instructions.unwrap_or(DEFAULT_INSTRUCTIONS).to_string());
    lines.push(schema.unwrap_or(DEFAULT_RESPONSE_SCHEMA).to_string());

    for (key, value) in profile {
        lines.push(format!(" - {key}: {value}"));
    }

    lines.push(PROMPT_FOOTER.to_string());
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_starts_and_ends_with_markers() {
        let prompt = build_composite_prompt("tacos", None, None, &[]);
        assert!(prompt.starts_with(PROMPT_HEADER));
        assert!(prompt.ends_with(PROMPT_FOOTER));
    }

    #[test]
    fn test_query_appears_verbatim_between_markers() {
        let query = "a Mexican vegan dish WITH Tomatoes";
        let prompt = build_composite_prompt(query, None, None, &[]);
        let header_end = prompt.find(PROMPT_HEADER).unwrap() + PROMPT_HEADER.len();
        let footer_start = prompt.find(PROMPT_FOOTER).unwrap();
        assert!(prompt[header_end..footer_start].contains(query));
    }

    #[test]
    fn test_defaults_fill_missing_instructions_and_schema() {
        let prompt = build_composite_prompt("soup", None, None, &[]);
        assert!(prompt.contains(DEFAULT_INSTRUCTIONS));
        assert!(prompt.contains(DEFAULT_RESPONSE_SCHEMA));
    }

    #[test]
    fn test_caller_instructions_replace_defaults() {
        let prompt = build_composite_prompt("soup", Some("Keep it short."), Some("Plain text."), &[]);
        assert!(prompt.contains("Keep it short."));
        assert!(prompt.contains("Plain text."));
        assert!(!prompt.contains(DEFAULT_INSTRUCTIONS));
        assert!(!prompt.contains(DEFAULT_RESPONSE_SCHEMA));
    }

    #[test]
    fn test_profile_entries_render_one_per_line_in_order() {
        let profile = vec![
            ("allergies".to_string(), "peanuts, shellfish".to_string()),
            ("dietary restriction".to_string(), "vegan".to_string()),
        ];
        let prompt = build_composite_prompt("dinner", None, None, &profile);
        let allergies = prompt.find(" - allergies: peanuts, shellfish").unwrap();
        let diet = prompt.find(" - dietary restriction: vegan").unwrap();
        assert!(allergies < diet);
    }

    #[test]
    fn test_empty_profile_adds_no_entry_lines() {
        let prompt = build_composite_prompt("dinner", None, None, &[]);
        assert!(!prompt.contains("\n - "));
    }

    #[test]
    fn test_prompt_is_deterministic() {
        let profile = vec![("allergies".to_string(), "peanuts".to_string())];
        let a = build_composite_prompt("stew", Some("x"), Some("y"), &profile);
        let b = build_composite_prompt("stew", Some("x"), Some("y"), &profile);
        assert_eq!(a, b);
    }
}
