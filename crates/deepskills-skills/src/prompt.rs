//! System prompt section advertising available skills
//!
//! The section is a fixed template with two substitution points: where the
//! skills live and the list of skills. It is meant to be embedded once into
//! a larger system prompt.

use std::path::Path;

use crate::descriptor::SkillMetadata;

const LOCATIONS_PLACEHOLDER: &str = "{skills_locations}";
const LIST_PLACEHOLDER: &str = "{skills_list}";

/// Skills section template
pub const SKILLS_SYSTEM_PROMPT: &str = "
## Skills System

You have access to a skills library that provides specialized capabilities and domain knowledge.

{skills_locations}

**Available Skills:**

{skills_list}

**How to Use Skills (Progressive Disclosure):**

You know each skill exists from its name and description above. Read the full instructions only when a skill is needed:

1. **Recognize when a skill applies**: compare the user's task with each skill's description
2. **Read the skill's full instructions**: use the path shown next to the skill
3. **Follow the instructions**: SKILL.md contains the workflow, best practices and examples
4. **Use supporting files**: a skill directory may contain scripts, configs or reference docs next to SKILL.md

When in doubt, check whether a skill exists for the task.
";

/// Build the skills section for a single skills root.
///
/// Skills are listed in the order given. An empty list keeps the template
/// intact with an empty list section.
pub fn build_metadata_prompt(metadata: &[SkillMetadata], root: &Path) -> String {
    let locations = format!("Skills root: {}", root.display());
    render(&locations, metadata.iter())
}

/// Build the skills section for several roots.
///
/// One location line per root; the skills of all roots form a single list,
/// roots in the order given.
pub fn build_multi_root_prompt<P: AsRef<Path>>(roots: &[(P, Vec<SkillMetadata>)]) -> String {
    let locations = roots
        .iter()
        .map(|(root, _)| format!("Skills root: {}", root.as_ref().display()))
        .collect::<Vec<_>>()
        .join("\n");
    render(&locations, roots.iter().flat_map(|(_, skills)| skills))
}

fn render<'a>(locations: &str, skills: impl Iterator<Item = &'a SkillMetadata>) -> String {
    let list = skills
        .map(SkillMetadata::to_prompt_entry)
        .collect::<Vec<_>>()
        .join("\n");

    // Inserted text is never re-scanned for placeholders
    let slots = [
        (LOCATIONS_PLACEHOLDER, locations),
        (LIST_PLACEHOLDER, list.as_str()),
    ];
    let mut out = String::with_capacity(SKILLS_SYSTEM_PROMPT.len() + locations.len() + list.len());
    let mut rest = SKILLS_SYSTEM_PROMPT;
    for (placeholder, value) in slots {
        if let Some((head, tail)) = rest.split_once(placeholder) {
            out.push_str(head);
            out.push_str(value);
            rest = tail;
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn meta(name: &str) -> SkillMetadata {
        SkillMetadata {
            name: name.to_string(),
            description: format!("Use {name} when needed"),
            path: format!("{name}/SKILL.md"),
        }
    }

    #[test]
    fn test_prompt_lists_skills_in_order() {
        let skills = vec![meta("summarize"), meta("web-research")];
        let prompt = build_metadata_prompt(&skills, Path::new("/opt/skills"));

        assert!(prompt.contains("Skills root: /opt/skills"));
        for skill in &skills {
            assert!(prompt.contains(&skill.name));
            assert!(prompt.contains(&skill.description));
            assert!(prompt.contains(&skill.path));
        }

        let first = prompt.find("summarize/SKILL.md").unwrap();
        let second = prompt.find("web-research/SKILL.md").unwrap();
        assert!(first < second);
        assert!(prompt.contains("- **summarize**: Use summarize when needed"));
    }

    #[test]
    fn test_prompt_empty_list_keeps_template() {
        let prompt = build_metadata_prompt(&[], Path::new("skills"));
        assert!(prompt.contains("Skills root: skills"));
        assert!(prompt.contains("**Available Skills:**"));
        assert!(prompt.contains("**How to Use Skills"));
        assert!(!prompt.contains(LIST_PLACEHOLDER));
        assert!(!prompt.contains(LOCATIONS_PLACEHOLDER));
    }

    #[test]
    fn test_prompt_does_not_expand_placeholders_in_descriptions() {
        let mut skill = meta("tricky");
        skill.description = "mentions {skills_list} literally".to_string();
        let prompt = build_metadata_prompt(&[skill], Path::new("skills"));
        assert!(prompt.contains("mentions {skills_list} literally"));
    }

    #[test]
    fn test_prompt_root_with_placeholder_text() {
        let prompt = build_metadata_prompt(&[meta("summarize")], Path::new("/tmp/{skills_list}"));

        assert!(prompt.contains("Skills root: /tmp/{skills_list}"));
        let list_header = prompt.find("**Available Skills:**").unwrap();
        let entry = prompt.find("- **summarize**").unwrap();
        assert!(list_header < entry);
        assert_eq!(prompt.matches("- **summarize**").count(), 1);
    }

    #[test]
    fn test_multi_root_prompt() {
        let roots = vec![
            (PathBuf::from("/home/u/.deepskills/skills"), vec![meta("a")]),
            (PathBuf::from(".deepskills/skills"), vec![meta("b")]),
        ];
        let prompt = build_multi_root_prompt(&roots);

        assert!(prompt.contains("Skills root: /home/u/.deepskills/skills"));
        assert!(prompt.contains("Skills root: .deepskills/skills"));
        assert!(prompt.find("a/SKILL.md").unwrap() < prompt.find("b/SKILL.md").unwrap());
    }
}
