//! Bidirectional token substitution.
//!
//! Forward substitution replaces `{{NAME}}` tokens in template content with the
//! values of a [`TemplateVars`]. Reverse substitution turns a concrete project back
//! into template content by replacing those values with their tokens.

use std::collections::HashMap;

use log::trace;
use regex::{Captures, Regex};

use crate::constants::{DALLE, MODULE_PREFIX, PROTECTED_PHRASES, SDK};
use crate::vars::TemplateVars;

/// Matches any `{{UPPER_SNAKE}}` token.
pub const TOKEN_PATTERN: &str = r"\{\{([A-Z][A-Z0-9_]*)\}\}";

/// Substitution tables for a single run.
///
/// Build it once per [`TemplateVars`] and reuse it for every file in the walk.
pub struct Substitution {
    pattern: Regex,
    tokens: HashMap<&'static str, String>,
    literals: Vec<(String, &'static str)>,
}

impl Substitution {
    pub fn new(vars: &TemplateVars) -> Self {
        Self {
            // The pattern is a constant and known to compile.
            pattern: Regex::new(TOKEN_PATTERN).unwrap(),
            tokens: forward_table(vars),
            literals: reverse_table(vars),
        }
    }

    /// Replaces every recognized token with its value in a single pass.
    ///
    /// Substituted values are never re-scanned, and unrecognized tokens are left
    /// as they are.
    pub fn apply_forward(&self, content: &str) -> String {
        self.pattern
            .replace_all(content, |caps: &Captures| match self.tokens.get(&caps[1]) {
                Some(value) => value.clone(),
                None => caps[0].to_string(),
            })
            .into_owned()
    }

    /// Replaces known literal values with their tokens.
    ///
    /// Protected phrases and already-inserted tokens are parked behind markers
    /// made of private-use characters, so a later, shorter literal can never match
    /// inside them.
    pub fn apply_reverse(&self, content: &str) -> String {
        let mut out = content.to_string();

        for (i, phrase) in PROTECTED_PHRASES.iter().enumerate() {
            out = out.replace(phrase, &marker('\u{E000}', i));
        }
        for (i, (literal, _)) in self.literals.iter().enumerate() {
            out = out.replace(literal.as_str(), &marker('\u{E001}', i));
        }
        for (i, (_, token)) in self.literals.iter().enumerate() {
            out = out.replace(&marker('\u{E001}', i), token);
        }
        for (i, phrase) in PROTECTED_PHRASES.iter().enumerate() {
            out = out.replace(&marker('\u{E000}', i), phrase);
        }

        out
    }

    /// The literal → token pairs in the order reverse substitution applies them.
    pub fn reverse_order(&self) -> impl Iterator<Item = (&str, &str)> {
        self.literals.iter().map(|(literal, token)| (literal.as_str(), *token))
    }
}

fn marker(kind: char, index: usize) -> String {
    // Indices stay in the private-use area; there are only a few dozen of them.
    let digit = char::from_u32(0xF000 + index as u32).unwrap_or('\u{F8FF}');
    format!("{kind}{digit}{kind}")
}

fn forward_table(vars: &TemplateVars) -> HashMap<&'static str, String> {
    let packages = format!("{}{}/pkg", MODULE_PREFIX, vars.slug());

    HashMap::from([
        ("SDK", SDK.to_string()),
        ("DALLE", DALLE.to_string()),
        ("APP", format!("{}{}/app", MODULE_PREFIX, vars.slug())),
        // PACKAGES is an alias of SAVEPKG.
        ("PACKAGES", packages.clone()),
        ("SAVEPKG", packages),
        ("PROJECT_NAME", vars.project_name().to_string()),
        ("PROJECT_PROPER", vars.project_proper().to_string()),
        ("PUBLISHER_NAME", vars.publisher_name().to_string()),
        ("PUBLISHER_EMAIL", vars.publisher_email().to_string()),
        ("ORGANIZATION", vars.organization().to_string()),
        ("ORG_NAME", vars.org_name().to_string()),
        ("ORG_LOWER", vars.org_lower().to_string()),
        ("SLUG", vars.slug().to_string()),
        ("GITHUB", vars.github().to_string()),
        ("DOMAIN", vars.domain().to_string()),
        ("CHIFRA", vars.chifra().to_string()),
    ])
}

fn reverse_table(vars: &TemplateVars) -> Vec<(String, &'static str)> {
    let mut literals: Vec<(String, &'static str)> = vec![
        (SDK.to_string(), "{{SDK}}"),
        (DALLE.to_string(), "{{DALLE}}"),
    ];

    if vars.has_slug() {
        literals.push((format!("{}{}/pkg", MODULE_PREFIX, vars.slug()), "{{PACKAGES}}"));
        literals.push((format!("{}{}/app", MODULE_PREFIX, vars.slug()), "{{APP}}"));
    }

    literals.push((vars.chifra().to_string(), "{{CHIFRA}}"));
    literals.push((vars.github().to_string(), "{{GITHUB}}"));
    literals.push((vars.domain().to_string(), "{{DOMAIN}}"));

    if vars.has_slug() {
        literals.push((vars.slug().to_string(), "{{SLUG}}"));
    }

    // On equal values the earlier entry wins: ORG_NAME over ORGANIZATION, and
    // PROJECT_NAME over PROJECT_PROPER.
    literals.push((vars.org_name().to_string(), "{{ORG_NAME}}"));
    // An organization with no name part (such as ",") is only punctuation.
    if !vars.org_name().is_empty() {
        literals.push((vars.organization().to_string(), "{{ORGANIZATION}}"));
    }
    literals.push((vars.org_lower().to_string(), "{{ORG_LOWER}}"));
    literals.push((vars.project_name().to_string(), "{{PROJECT_NAME}}"));
    literals.push((vars.project_proper().to_string(), "{{PROJECT_PROPER}}"));
    literals.push((vars.publisher_email().to_string(), "{{PUBLISHER_EMAIL}}"));
    literals.push((vars.publisher_name().to_string(), "{{PUBLISHER_NAME}}"));

    // A blank value would turn every run of whitespace or punctuation into a token.
    literals.retain(|(literal, _)| !literal.trim().is_empty());
    literals.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
    literals.dedup_by(|later, earlier| later.0 == earlier.0);

    trace!("reverse substitution order: {:?}", literals);
    literals
}
