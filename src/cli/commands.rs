//! Command dispatch

use std::env;
use std::io;
use std::path::PathBuf;

use clap::CommandFactory;
use colored::Colorize;
use tracing::{debug, instrument};

use crate::application::TreeSpec;
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::cli::render::{query_title, render_plain, render_tree};
use crate::config::{global_config_path, project_config_path, OutputFormat, Settings};
use crate::domain::{Batch, LinkedTrees};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::traits::FileSystem;
use crate::infrastructure::InfraError;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let command = cli
        .command
        .as_ref()
        .ok_or_else(|| CliError::Usage("no command given, see --help".to_string()))?;

    if let Commands::Completion { shell } = command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        clap_complete::generate(*shell, &mut cmd, name, &mut io::stdout());
        return Ok(());
    }

    let container = build_container(cli)?;
    match command {
        Commands::Query { nodes, format } => cmd_query(&container, nodes, *format),
        Commands::Links { node, format } => cmd_links(&container, node, *format),
        Commands::Trees => cmd_trees(&container),
        Commands::Check => cmd_check(&container),
        Commands::Config { command } => cmd_config(&container, command),
        Commands::Completion { .. } => Ok(()),
    }
}

/// Resolve the project directory and layered settings, then apply CLI flags.
fn build_container(cli: &Cli) -> CliResult<ServiceContainer> {
    let cwd = env::current_dir().map_err(|e| InfraError::io("resolve current directory", e))?;
    let project_dir = match &cli.project_dir {
        Some(dir) if dir.is_absolute() => dir.clone(),
        Some(dir) => cwd.join(dir),
        None => cwd.clone(),
    };
    if !project_dir.is_dir() {
        return Err(CliError::InvalidArgs(format!(
            "project directory not found: {}",
            project_dir.display()
        )));
    }

    let mut settings = Settings::load(Some(&project_dir))?;
    if let Some(manifest) = &cli.manifest {
        // -m is relative to the invocation directory, not the project
        settings.manifest = if manifest.is_absolute() {
            manifest.clone()
        } else {
            cwd.join(manifest)
        };
    }
    debug!(
        "project_dir={}, manifest={}",
        project_dir.display(),
        settings.manifest.display()
    );
    Ok(ServiceContainer::new(settings, project_dir))
}

fn load_linked(container: &ServiceContainer) -> CliResult<(PathBuf, LinkedTrees<TreeSpec>)> {
    let path = container.manifest_path();
    if !container.fs.is_file(&path) {
        return Err(CliError::Usage(format!(
            "manifest not found: {} (use -m or set `manifest` in .treelink.toml)",
            path.display()
        )));
    }
    let linked = container.link_service().load(&path)?;
    Ok((path, linked))
}

fn print_batch(container: &ServiceContainer, title: &str, batch: &Batch, format: OutputFormat) {
    let separator = container.link_service().separator();
    match format {
        OutputFormat::Tree => output::info(&render_tree(title, batch, separator)),
        OutputFormat::Plain => {
            for line in render_plain(batch, separator) {
                output::info(&line);
            }
        }
    }
}

#[instrument(skip(container))]
fn cmd_query(
    container: &ServiceContainer,
    nodes: &[String],
    format: Option<OutputFormat>,
) -> CliResult<()> {
    let (_, linked) = load_linked(container)?;
    let result = container.link_service().query(&linked, nodes)?;
    if result.is_empty() {
        output::warning("no node is linked to all given nodes");
    }
    let format = format.unwrap_or(container.settings.format);
    print_batch(container, &query_title(nodes), &result, format);
    Ok(())
}

#[instrument(skip(container))]
fn cmd_links(container: &ServiceContainer, node: &str, format: Option<OutputFormat>) -> CliResult<()> {
    let (_, linked) = load_linked(container)?;
    let result = container.link_service().links_of(&linked, node)?;
    let format = format.unwrap_or(container.settings.format);
    print_batch(container, node, &result, format);
    Ok(())
}

#[instrument(skip(container))]
fn cmd_trees(container: &ServiceContainer) -> CliResult<()> {
    let (_, linked) = load_linked(container)?;
    for (name, spec) in linked.trees() {
        match &spec.description {
            Some(description) => output::info(&format!("{}  {}", name, description.dimmed())),
            None => output::info(name),
        }
    }
    Ok(())
}

#[instrument(skip(container))]
fn cmd_check(container: &ServiceContainer) -> CliResult<()> {
    let (path, linked) = load_linked(container)?;
    let graph = linked.graph();
    output::success(&format!("{} is valid", path.display()));
    output::detail(&format!("trees: {}", graph.trees().count()));
    output::detail(&format!("linked nodes: {}", graph.node_count()));
    output::detail(&format!("links: {}", graph.link_count()));
    Ok(())
}

fn cmd_config(container: &ServiceContainer, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            output::info(container.settings.to_toml()?.trim_end());
        }
        ConfigCommands::Path => {
            let fs = container.fs.as_ref();
            output::header("Config files");
            match global_config_path() {
                Some(path) => output::action("global", &describe(fs, path)),
                None => output::action("global", "unavailable"),
            }
            output::action(
                "project",
                &describe(fs, project_config_path(container.project_dir())),
            );
            output::action("manifest", &describe(fs, container.manifest_path()));
        }
    }
    Ok(())
}

fn describe(fs: &dyn FileSystem, path: PathBuf) -> String {
    if fs.exists(&path) {
        path.display().to_string()
    } else {
        format!("{} {}", path.display(), "(missing)".dimmed())
    }
}
