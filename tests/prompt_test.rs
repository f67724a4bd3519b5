use std::cell::RefCell;
use std::collections::VecDeque;

use create_local_app::config::Config;
use create_local_app::error::Result;
use create_local_app::prompt::{prompt_variables, DialoguerPrompter, Prompter};

/// Answers prompts from a script; an empty answer takes the default.
struct ScriptedPrompter {
    answers: RefCell<VecDeque<&'static str>>,
    asked: RefCell<Vec<(String, String)>>,
}

impl ScriptedPrompter {
    fn new(answers: &[&'static str]) -> Self {
        Self { answers: RefCell::new(answers.iter().copied().collect()), asked: RefCell::new(Vec::new()) }
    }
}

impl Prompter for ScriptedPrompter {
    fn confirm(&self, skip_prompt: bool, _prompt: String, default: bool) -> Result<bool> {
        if skip_prompt {
            return Ok(true);
        }
        Ok(match self.answers.borrow_mut().pop_front() {
            Some("y") => true,
            Some("n") => false,
            _ => default,
        })
    }

    fn input(&self, prompt: String, default: String) -> Result<String> {
        self.asked.borrow_mut().push((prompt, default.clone()));
        let answer = self.answers.borrow_mut().pop_front().unwrap_or_default();
        Ok(if answer.is_empty() { default } else { answer.to_string() })
    }
}

#[test]
fn test_prompt_variables_asks_in_order() {
    let prompter = ScriptedPrompter::new(&["Acme, Inc.", "widget", "github.com/acme/widget", "acme.io"]);

    let config = prompt_variables(&prompter, &Config::default()).unwrap();

    assert_eq!(config.organization, "Acme, Inc.");
    assert_eq!(config.project_name, "widget");
    assert_eq!(config.github, "github.com/acme/widget");
    assert_eq!(config.domain, "acme.io");

    let prompts: Vec<String> = prompter.asked.borrow().iter().map(|(p, _)| p.clone()).collect();
    assert_eq!(prompts, vec!["Organization", "Project Name", "Github", "Domain"]);
}

#[test]
fn test_prompt_variables_offers_saved_values() {
    let saved = Config {
        organization: "Acme, Inc.".to_string(),
        project_name: "widget".to_string(),
        github: "github.com/acme/widget".to_string(),
        domain: "acme.io".to_string(),
        template: "dalle".to_string(),
        preserve_files: vec!["local.json".to_string()],
        ..Config::default()
    };
    let prompter = ScriptedPrompter::new(&["", "gadget", "", ""]);

    let config = prompt_variables(&prompter, &saved).unwrap();

    assert_eq!(config.organization, "Acme, Inc.");
    assert_eq!(config.project_name, "gadget");
    assert_eq!(config.domain, "acme.io");
    // Fields that are not prompted for are carried over.
    assert_eq!(config.template, "dalle");
    assert_eq!(config.preserve_files, saved.preserve_files);
    assert_eq!(prompter.asked.borrow()[1].1, "widget");
}

#[test]
fn test_confirm_skip_prompt() {
    let prompter = DialoguerPrompter::new();
    // Never touches the terminal when the prompt is skipped.
    assert!(prompter.confirm(true, "Proceed?".to_string(), false).unwrap());
}

#[test]
#[ignore = "Requires interactive input"]
fn test_dialoguer_input() {
    let prompter = DialoguerPrompter::default();
    let answer = prompter.input("Organization".to_string(), "Acme".to_string()).unwrap();
    assert!(!answer.is_empty());
}
