//! create-local-app's main application entry point and orchestration logic.
//! Handles command-line argument parsing and dispatches to project creation,
//! template creation and registry management.

use std::path::{Path, PathBuf};

use create_local_app::{
    archive::BUNDLED_TEMPLATES,
    cli::{get_args, Args},
    config::{user_config_dir, Config, ConfigScope, ConfigStore},
    constants::{DEFAULT_TEMPLATE, PROJECT_MARKER},
    error::{default_error_handler, Error, Result},
    logger::init_logger,
    processor::{Materializer, Report},
    prompt::{prompt_variables, DialoguerPrompter, Prompter},
    registry::TemplateRegistry,
    vars::TemplateVars,
};

/// Main application entry point.
fn main() {
    let args = get_args();
    init_logger(args.verbose);

    if let Err(err) = run(args) {
        default_error_handler(err);
    }
}

/// Main application logic execution.
///
/// # Flow
/// 1. Extracts bundled system templates when the binary's version changed
/// 2. Handles the registry commands (`--list`, `--remove`)
/// 3. Loads configuration (project-local first, then user-global)
/// 4. Creates a template from the current directory, or a project in it
fn run(args: Args) -> Result<()> {
    let prompt = DialoguerPrompter::new();

    let config_dir = match &args.config_dir {
        Some(dir) => dir.clone(),
        None => user_config_dir()?,
    };
    let registry = TemplateRegistry::new(&config_dir);
    registry.initialize_system_templates(BUNDLED_TEMPLATES, env!("CARGO_PKG_VERSION"))?;

    if args.list {
        return list_templates(&registry);
    }
    if let Some(name) = &args.remove {
        return remove_template(&prompt, &registry, name, args.force);
    }

    let project_dir = std::env::current_dir()?;
    let store = ConfigStore::for_project(&project_dir, &config_dir);
    let (config, scope) = store.load()?;

    if let Some(name) = &args.create {
        return create_template(&registry, &project_dir, &config, name);
    }
    if let Some(name) = &args.snapshot {
        require_project_marker(&project_dir)?;
        let dest = registry.create_from_directory(&project_dir, name)?;
        println!("Successfully created template: {}", dest.display());
        return Ok(());
    }

    create_project(&prompt, &registry, &store, &project_dir, config, scope, &args)
}

fn list_templates(registry: &TemplateRegistry) -> Result<()> {
    let listing = registry.list()?;

    println!("System templates:");
    for name in &listing.system {
        println!("  {}", name);
    }
    println!("Contributed templates:");
    if listing.contributed.is_empty() {
        println!("  (none)");
    }
    for name in &listing.contributed {
        println!("  {}", name);
    }
    Ok(())
}

fn remove_template(prompt: &dyn Prompter, registry: &TemplateRegistry, name: &str, force: bool) -> Result<()> {
    // Only contributed templates can go; report anything else before asking.
    registry.find_contributed(name)?;

    if !prompt.confirm(force, format!("Remove contributed template '{}'?", name), false)? {
        println!("Operation cancelled.");
        return Ok(());
    }

    let path = registry.remove(name)?;
    println!("Removed template: {}", path.display());
    Ok(())
}

fn require_project_marker(project_dir: &Path) -> Result<()> {
    if !project_dir.join(PROJECT_MARKER).is_file() {
        return Err(Error::ValidationError(format!(
            "{} not found in {}; creating a template requires a project directory",
            PROJECT_MARKER,
            project_dir.display()
        )));
    }
    Ok(())
}

fn create_template(registry: &TemplateRegistry, project_dir: &Path, config: &Config, name: &str) -> Result<()> {
    require_project_marker(project_dir)?;
    config.require_fields("--create")?;

    let vars = TemplateVars::from_config(config);
    println!("Running in create mode with saved values:");
    print_vars(&vars);

    let template_dir = registry.contributed_path(name)?;
    if template_dir.exists() {
        println!("Warning: Template {} already exists and will be updated.", name);
    }

    let report = Materializer::new(&vars).reverse(project_dir, &template_dir)?;
    finish(&report);
    println!("✅ Template '{}' updated from project at {}", name, project_dir.display());
    Ok(())
}

fn create_project(
    prompt: &dyn Prompter,
    registry: &TemplateRegistry,
    store: &ConfigStore,
    project_dir: &Path,
    config: Config,
    scope: ConfigScope,
    args: &Args,
) -> Result<()> {
    if !args.auto && !confirm_non_empty(prompt, project_dir, args.force)? {
        println!("Operation cancelled.");
        return Ok(());
    }

    let mut config = if args.auto {
        config.require_fields("--auto")?;
        println!("Running in auto mode with saved values:");
        config
    } else {
        let answered = prompt_variables(prompt, &config)?;
        answered.require_fields("creating a project")?;
        answered
    };

    let template_name = args
        .template
        .clone()
        .or_else(|| Some(config.template.clone()).filter(|t| !t.is_empty()))
        .unwrap_or_else(|| DEFAULT_TEMPLATE.to_string());
    let template_dir = resolve_template(registry, &template_name)?;

    let changed_template = config.template != template_name;
    config.template = template_name;
    if !args.auto || changed_template {
        store.save_global(&config)?;
        if scope == ConfigScope::Local {
            store.save_local(&config)?;
        }
    }

    let vars = TemplateVars::from_config(&config);
    println!("TEMPLATE_DIR:  {}", template_dir.display());
    println!("PROJECT_DIR:   {}", project_dir.display());
    print_vars(&vars);

    let report = Materializer::new(&vars).forward(&template_dir, project_dir, &config.preserve_files)?;
    finish(&report);
    store.record_template(&config.template)?;

    println!("✅ Project created at {}", project_dir.display());
    println!();
    println!("Next steps:");
    println!("  cd frontend && yarn install && cd ..");
    println!("  wails dev");
    Ok(())
}

fn resolve_template(registry: &TemplateRegistry, name: &str) -> Result<PathBuf> {
    if name == DEFAULT_TEMPLATE {
        // The default may be overridden by a contributed template of the same name.
        return registry.resolve(name).or_else(|_| registry.default_template());
    }
    registry.resolve(name)
}

/// Asks before writing into a directory that already has files.
fn confirm_non_empty(prompt: &dyn Prompter, project_dir: &Path, force: bool) -> Result<bool> {
    let is_empty = std::fs::read_dir(project_dir)?.next().is_none();
    if is_empty {
        return Ok(true);
    }

    println!("The current directory ({}) contains files.", project_dir.display());
    println!("Proceeding will overwrite existing files in an unrecoverable way.");
    prompt.confirm(force, "Are you sure you want to proceed?".to_string(), true)
}

fn print_vars(vars: &TemplateVars) {
    println!("ORGANIZATION:  {}", vars.organization());
    println!("ORG_NAME:      {}", vars.org_name());
    println!("SLUG:          {}", vars.slug());
    println!("PROJECT_NAME:  {}", vars.project_name());
    println!("GITHUB:        {}", vars.github());
    println!("DOMAIN:        {}", vars.domain());
    println!("CHIFRA:        {}", vars.chifra());
}

fn finish(report: &Report) {
    println!("Files: {}", report);
    for err in &report.failed {
        eprintln!("  {}", err);
    }
}
