//! Scaffold for new skill manifests.

/// Render a starter `SKILL.md` with a complete frontmatter header.
pub fn render_skill_template(
    name: &str,
    description: &str,
    model: &str,
    tags: &[String],
    languages: &[String],
) -> String {
    format!(
        "---
name: {name}
description: {description}
model: {model}
tags: [{tags}]
languages: [{languages}]
---

# {name}

You are a specialized agent for {description}.

## Capabilities

- [List what this skill can do]

## Guidelines

1. [First guideline]
2. [Second guideline]

## Output Format

[Describe expected output format]
",
        tags = tags.join(", "),
        languages = languages.join(", "),
    )
}
