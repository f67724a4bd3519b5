//! The resolved substitution variables for one run.

use crate::config::Config;
use crate::constants::{CHIFRA, DEFAULT_PUBLISHER_EMAIL, DEFAULT_PUBLISHER_NAME};

/// Substitution variables resolved once per invocation.
///
/// Only the source fields (organization, project name, github, domain and the
/// publisher pair) are supplied; `org_name`, `org_lower`, `slug` and
/// `project_proper` are derived here and cannot be set any other way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateVars {
    project_name: String,
    project_proper: String,
    publisher_name: String,
    publisher_email: String,
    organization: String,
    org_name: String,
    org_lower: String,
    slug: String,
    github: String,
    domain: String,
    chifra: String,
}

impl TemplateVars {
    pub fn new<S: Into<String>>(organization: S, project_name: S, github: S, domain: S) -> Self {
        Self::with_publisher(
            organization.into(),
            project_name.into(),
            github.into(),
            domain.into(),
            DEFAULT_PUBLISHER_NAME.to_string(),
            DEFAULT_PUBLISHER_EMAIL.to_string(),
        )
    }

    pub fn with_publisher<S: Into<String>>(
        organization: S,
        project_name: S,
        github: S,
        domain: S,
        publisher_name: S,
        publisher_email: S,
    ) -> Self {
        let organization: String = organization.into();
        let project_name: String = project_name.into();

        let org_name = organization.split(',').next().unwrap_or_default().trim().to_string();
        let org_lower = org_name.to_lowercase();
        let slug = format!("{}-{}", org_lower, project_name);
        let project_proper = capitalize(&project_name);

        Self {
            project_name,
            project_proper,
            publisher_name: publisher_name.into(),
            publisher_email: publisher_email.into(),
            organization,
            org_name,
            org_lower,
            slug,
            github: github.into(),
            domain: domain.into(),
            chifra: CHIFRA.to_string(),
        }
    }

    /// Builds the variable set from the source fields of a configuration record.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.organization.as_str(),
            config.project_name.as_str(),
            config.github.as_str(),
            config.domain.as_str(),
        )
    }

    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    pub fn project_proper(&self) -> &str {
        &self.project_proper
    }

    pub fn publisher_name(&self) -> &str {
        &self.publisher_name
    }

    pub fn publisher_email(&self) -> &str {
        &self.publisher_email
    }

    pub fn organization(&self) -> &str {
        &self.organization
    }

    pub fn org_name(&self) -> &str {
        &self.org_name
    }

    pub fn org_lower(&self) -> &str {
        &self.org_lower
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn github(&self) -> &str {
        &self.github
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn chifra(&self) -> &str {
        &self.chifra
    }

    /// The slug only identifies the project when both of its halves are known.
    pub fn has_slug(&self) -> bool {
        !self.org_name.is_empty() && !self.project_name.is_empty()
    }
}

/// Upper-cases the first character, leaving the rest untouched.
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_fields() {
        let vars = TemplateVars::new("Acme, Inc.", "widget", "github.com/acme/widget", "acme.io");

        assert_eq!(vars.org_name(), "Acme");
        assert_eq!(vars.org_lower(), "acme");
        assert_eq!(vars.slug(), "acme-widget");
        assert_eq!(vars.project_proper(), "Widget");
        assert_eq!(vars.organization(), "Acme, Inc.");
        assert_eq!(vars.chifra(), CHIFRA);
        assert_eq!(vars.publisher_name(), DEFAULT_PUBLISHER_NAME);
    }

    #[test]
    fn test_new_with_owned_strings() {
        let vars = TemplateVars::new(
            String::from("Acme"),
            String::from("widget"),
            String::new(),
            String::new(),
        );

        assert_eq!(vars.slug(), "acme-widget");
        assert_eq!(vars.publisher_name(), DEFAULT_PUBLISHER_NAME);
        assert_eq!(vars.publisher_email(), DEFAULT_PUBLISHER_EMAIL);
    }

    #[test]
    fn test_empty_fields() {
        let vars = TemplateVars::new("", "", "", "");

        assert_eq!(vars.org_name(), "");
        assert_eq!(vars.project_proper(), "");
        assert_eq!(vars.slug(), "-");
        assert!(!vars.has_slug());
    }

    #[test]
    fn test_org_name_is_trimmed() {
        let vars = TemplateVars::new("  TrueBlocks , LLC", "browse", "", "");
        assert_eq!(vars.org_name(), "TrueBlocks");
        assert_eq!(vars.slug(), "trueblocks-browse");
    }

    #[test]
    fn test_capitalize_non_ascii() {
        assert_eq!(capitalize("élan"), "Élan");
        assert_eq!(capitalize("Widget"), "Widget");
    }
}
