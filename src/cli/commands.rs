//! Command dispatch

use std::io;

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::ApplicationError;
use crate::cli::args::{Cli, Commands, ConfigCommands, ToolsCommands};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, Settings};
use crate::infrastructure::launcher::LaunchOutcome;
use crate::infrastructure::ServiceContainer;
use crate::tree_traits::TreeDisplay;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Err(CliError::Usage("no command given, see --help".to_string()));
    };

    if let Commands::Completion { shell } = command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(*shell, &mut cmd, name, &mut io::stdout());
        return Ok(());
    }

    let settings = Settings::load(cli.config.as_deref())?;
    let mut container = ServiceContainer::new(settings);

    match command {
        Commands::Tree { file } => {
            let tree = container.documents.load(file)?;
            output::info(&tree.to_tree_string());
            Ok(())
        }
        Commands::Fmt { file, write } => {
            if *write {
                let tree = container.documents.load(file)?;
                container.documents.save(file, &tree)?;
                output::action("Formatted", &file.display());
            } else {
                output::info(&container.documents.format(file)?);
            }
            Ok(())
        }
        Commands::Get { file, path, key } => {
            let tree = container.documents.load(file)?;
            let branch = tree
                .branch_path(tree.root(), path.as_slice())
                .map_err(ApplicationError::from)?;
            match key {
                Some(key) => {
                    for leaf in tree.leaves_keyed(branch, key) {
                        output::info(&leaf.value);
                    }
                }
                None => {
                    for line in tree.lines(branch) {
                        output::info(&line);
                    }
                }
            }
            Ok(())
        }
        Commands::Tools { command } => execute_tools(&mut container, command),
        Commands::Config { command } => execute_config(&container, command),
        Commands::Completion { .. } => Ok(()),
    }
}

#[instrument(skip(container))]
fn execute_tools(container: &mut ServiceContainer, command: &ToolsCommands) -> CliResult<()> {
    let settings = container.settings.clone();
    debug!("tools file: {}", settings.tools_file.display());
    let toolsets = container.toolsets.load(&settings.tools_file)?;
    let apps_dir = settings.steam_apps_dir.as_deref();

    match command {
        ToolsCommands::List { all } => {
            let installed = container
                .toolsets
                .discover(&toolsets, &settings.platform, apps_dir);
            output::header(&format!("Toolsets ({})", settings.platform));
            for request in &installed {
                output::success(&format!("{}  {}", request.name, request.program.display()));
            }
            if *all {
                for toolset in toolsets
                    .iter()
                    .filter(|t| !installed.iter().any(|r| r.name == t.name))
                {
                    output::detail(&format!("{} [{}] not found", toolset.name, toolset.platform));
                }
            }
            if installed.is_empty() {
                output::warning("no installed toolsets found");
            }
            Ok(())
        }
        ToolsCommands::Launch { name, wait } => {
            let request =
                container
                    .toolsets
                    .find(&toolsets, name, &settings.platform, apps_dir)?;
            match container.launcher.launch(&request)? {
                LaunchOutcome::Started { pid } => {
                    output::action("Started", &format!("{} (pid {})", request.name, pid));
                }
                LaunchOutcome::AlreadyRunning { pid } => {
                    output::warning(&format!("instance already running (pid {})", pid));
                }
            }
            if *wait {
                if let Some(status) = container.launcher.wait()? {
                    output::detail(&format!("exited: {}", status));
                }
            }
            Ok(())
        }
    }
}

fn execute_config(container: &ServiceContainer, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => output::info(&container.settings.to_toml()?),
        ConfigCommands::Path => match global_config_path() {
            Some(path) => output::info(&path.display()),
            None => output::warning("no config directory available on this system"),
        },
        ConfigCommands::Template => output::info(&Settings::template()),
    }
    Ok(())
}
