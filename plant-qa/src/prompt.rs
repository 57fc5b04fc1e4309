//! Prompt builder: grounded (subject record) or general framing.

use crate::subject::SubjectRecord;

/// Framing used when no subject record is available.
pub const GENERAL_FRAMING: &str = "As an expert in traditional medicinal plants and Ayurvedic \
medicine, please provide information about the following:";

/// Lead-in for the labeled subject block.
pub const SUBJECT_FRAMING: &str = "Based on the following information about a plant:";

/// Appended to every prompt.
pub const ANSWER_INSTRUCTIONS: &str = "Please provide a comprehensive, accurate, and \
science-based response structured in clear paragraphs. Include information about traditional \
Ayurvedic, Unani, or Siddha medicine applications where relevant.";

/// Builds the final prompt for `query`.
///
/// With a subject, every non-blank field is rendered on its own labeled line
/// followed by the literal query. Without one, the query is wrapped in the
/// general expert framing. Deterministic: equal inputs give equal output.
///
/// # Example
/// ```
/// # use plant_qa::build_prompt;
/// let p = build_prompt("Is it safe?", None);
/// assert!(p.contains("Is it safe?"));
/// assert!(!p.contains("Plant Name:"));
/// ```
pub fn build_prompt(query: &str, subject: Option<&SubjectRecord>) -> String {
    let mut out = String::new();

    match subject {
        Some(s) => {
            out.push_str(SUBJECT_FRAMING);
            out.push_str("\n\n");
            push_field(&mut out, "Plant Name", Some(s.name.as_str()));
            push_field(&mut out, "Scientific Name", Some(s.scientific_name.as_str()));
            push_field(&mut out, "Description", s.description.as_deref());
            push_field(&mut out, "Medicinal Uses", s.uses.as_deref());
            push_field(&mut out, "How to Use", s.usage_instructions.as_deref());
            out.push('\n');
            out.push_str(query);
        }
        None => {
            out.push_str(GENERAL_FRAMING);
            out.push(' ');
            out.push_str(query);
        }
    }

    out.push_str("\n\n");
    out.push_str(ANSWER_INSTRUCTIONS);
    out
}

fn push_field(out: &mut String, label: &str, value: Option<&str>) {
    let Some(v) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return;
    };
    out.push_str(label);
    out.push_str(": ");
    out.push_str(v);
    out.push('\n');
}

/// First `max_chars` characters of `text`, with `…` when cut.
pub fn preview(text: &str, max_chars: usize) -> String {
    let mut it = text.chars();
    let head: String = it.by_ref().take(max_chars).collect();
    if it.next().is_some() {
        format!("{head}…")
    } else {
        head
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LABELS: [&str; 5] = [
        "Plant Name:",
        "Scientific Name:",
        "Description:",
        "Medicinal Uses:",
        "How to Use:",
    ];

    fn ashwagandha() -> SubjectRecord {
        SubjectRecord {
            name: "Ashwagandha".into(),
            scientific_name: "Withania somnifera".into(),
            description: None,
            uses: Some("Stress, Vitality".into()),
            usage_instructions: None,
        }
    }

    #[test]
    fn general_prompt_has_query_and_no_labels() {
        let p = build_prompt("What helps digestion?", None);
        assert!(p.starts_with(GENERAL_FRAMING));
        assert!(p.contains("What helps digestion?"));
        assert!(p.ends_with(ANSWER_INSTRUCTIONS));
        for label in LABELS {
            assert!(!p.contains(label), "unexpected {label}");
        }
    }

    #[test]
    fn subject_prompt_renders_present_fields_only() {
        let p = build_prompt("Is it safe during pregnancy?", Some(&ashwagandha()));
        assert!(p.contains("Plant Name: Ashwagandha\n"));
        assert!(p.contains("Scientific Name: Withania somnifera\n"));
        assert!(p.contains("Medicinal Uses: Stress, Vitality\n"));
        assert!(!p.contains("Description:"));
        assert!(!p.contains("How to Use:"));
        assert!(p.contains("Is it safe during pregnancy?"));
        assert!(!p.contains(GENERAL_FRAMING));
    }

    #[test]
    fn each_optional_field_appears_iff_present() {
        let full = SubjectRecord {
            description: Some("desc-marker".into()),
            uses: Some("uses-marker".into()),
            usage_instructions: Some("howto-marker".into()),
            ..ashwagandha()
        };
        let p = build_prompt("q", Some(&full));
        for marker in ["desc-marker", "uses-marker", "howto-marker"] {
            assert!(p.contains(marker));
        }

        let bare = SubjectRecord {
            description: None,
            uses: None,
            usage_instructions: Some("   ".into()),
            ..ashwagandha()
        };
        let p = build_prompt("q", Some(&bare));
        for marker in ["desc-marker", "uses-marker", "howto-marker", "How to Use:"] {
            assert!(!p.contains(marker));
        }
    }

    #[test]
    fn building_is_deterministic() {
        let s = ashwagandha();
        assert_eq!(build_prompt("q", Some(&s)), build_prompt("q", Some(&s)));
        assert_eq!(build_prompt("q", None), build_prompt("q", None));
    }

    #[test]
    fn preview_is_char_safe() {
        assert_eq!(preview("abc", 10), "abc");
        assert_eq!(preview("अश्वगंधा", 2), "अश…");
        assert_eq!(preview("abcdef", 3), "abc…");
    }
}
