//! User input and interaction handling.
//! Prompts go through the [`Prompter`] trait so the flows can run unattended.

use dialoguer::{Confirm, Input};

use crate::config::Config;
use crate::error::Result;

/// Source of interactive answers.
pub trait Prompter {
    /// Asks a yes/no question. Returns `true` without asking when `skip_prompt` is set.
    fn confirm(&self, skip_prompt: bool, prompt: String, default: bool) -> Result<bool>;

    /// Asks for a line of text. An empty answer yields `default`.
    fn input(&self, prompt: String, default: String) -> Result<String>;
}

/// Terminal prompts backed by dialoguer.
pub struct DialoguerPrompter;

impl DialoguerPrompter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DialoguerPrompter {
    fn default() -> Self {
        DialoguerPrompter::new()
    }
}

impl Prompter for DialoguerPrompter {
    fn confirm(&self, skip_prompt: bool, prompt: String, default: bool) -> Result<bool> {
        if skip_prompt {
            return Ok(true);
        }
        Ok(Confirm::new().with_prompt(prompt).default(default).interact()?)
    }

    fn input(&self, prompt: String, default: String) -> Result<String> {
        let answer: String = Input::new()
            .with_prompt(prompt)
            .default(default.clone())
            .allow_empty(true)
            .interact_text()?;

        let answer = answer.trim();
        Ok(if answer.is_empty() { default } else { answer.to_string() })
    }
}

/// Asks for the four source fields, offering the saved values as defaults.
///
/// # Returns
/// * `Result<Config>` - `config` with the answered fields replaced
pub fn prompt_variables(prompt: &dyn Prompter, config: &Config) -> Result<Config> {
    let mut answered = config.clone();

    answered.organization = prompt.input("Organization".to_string(), config.organization.clone())?;
    answered.project_name = prompt.input("Project Name".to_string(), config.project_name.clone())?;
    answered.github = prompt.input("Github".to_string(), config.github.clone())?;
    answered.domain = prompt.input("Domain".to_string(), config.domain.clone())?;

    Ok(answered)
}
