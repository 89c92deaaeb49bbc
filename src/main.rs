//! Drydock CLI - Manage a Drydock deployment automation server
//!
//! Drydock is a command-line tool for inspecting and modifying the
//! resources of a Drydock server: projects and their deployment
//! processes, project groups, environments, machines, variables,
//! channels, certificates and feeds. It talks to the server's REST API
//! and stores the session (server address and API key) locally so that
//! subsequent invocations need no flags.
//!
//! # Features
//!
//! - Session management against a Drydock server
//! - CRUD over projects, groups, environments and library variable sets
//! - Deep copy of projects, channels and deployment steps
//! - Batch variable editing with a single save per invocation

use std::sync::Arc;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod api_client;
mod cache;
mod commands;
mod config;
mod copy;
mod deps;
mod resources;
mod selector;
mod ui;

#[cfg(test)]
mod test_helpers;

use commands::connect::StoredSession;
use commands::OutputFormat;
use config::{API_KEY_ENV_VAR, SERVER_URL_ENV_VAR};
use deps::{DeploymentClient, SessionStore};
use selector::Selector;

#[derive(Parser)]
#[command(name = "drydock")]
#[command(about = "Manage a Drydock deployment automation server")]
#[command(version)]
#[command(author)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Increase logging verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Command {
    /// Connect to a Drydock server and store the session
    Connect {
        /// Server URL, e.g. https://drydock.example.com
        #[arg(short, long, env = SERVER_URL_ENV_VAR)]
        server: String,

        /// API key for the server
        #[arg(short, long, env = API_KEY_ENV_VAR, hide_env_values = true)]
        api_key: String,
    },

    /// Forget the stored session
    Disconnect,

    /// Show the stored session
    Status,

    /// Manage projects
    Project {
        #[command(subcommand)]
        command: ProjectCommand,
    },

    /// Manage project groups
    Group {
        #[command(subcommand)]
        command: GroupCommand,
    },

    /// Manage environments
    Environment {
        #[command(subcommand)]
        command: EnvironmentCommand,
    },

    /// Manage deployment targets
    Machine {
        #[command(subcommand)]
        command: MachineCommand,
    },

    /// Manage project variables
    Variable {
        #[command(subcommand)]
        command: VariableCommand,
    },

    /// Manage library variable sets
    Library {
        #[command(subcommand)]
        command: LibraryCommand,
    },

    /// Manage release channels
    Channel {
        #[command(subcommand)]
        command: ChannelCommand,
    },

    /// Manage deployment steps
    Step {
        #[command(subcommand)]
        command: StepCommand,
    },

    /// Manage certificates
    Certificate {
        #[command(subcommand)]
        command: CertificateCommand,
    },

    /// Manage external package feeds
    Feed {
        #[command(subcommand)]
        command: FeedCommand,
    },
}

#[derive(Subcommand)]
enum ProjectCommand {
    /// List all projects
    List {
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },
    /// Show projects by name or id
    Get {
        /// Project names
        #[arg(short, long)]
        name: Vec<String>,
        /// Project ids
        #[arg(short, long)]
        id: Vec<String>,
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },
    /// Create a project
    Create {
        /// Project name
        name: String,
        /// Project group the project belongs to
        #[arg(short, long)]
        group: String,
        #[arg(short, long)]
        description: Option<String>,
        /// Lifecycle id for the project
        #[arg(short, long)]
        lifecycle: Option<String>,
    },
    /// Update a project
    Update {
        /// Project id
        id: String,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Delete projects by name or id
    Delete {
        #[arg(short, long)]
        name: Vec<String>,
        #[arg(short, long)]
        id: Vec<String>,
        /// Skip confirmation prompt
        #[arg(long)]
        force: bool,
    },
    /// Copy a project, its deployment process and its variables
    Copy {
        /// Source project name
        source: String,
        /// Destination project name
        destination: String,
        /// Project group for the destination project
        #[arg(short, long)]
        group: String,
    },
}

#[derive(Subcommand)]
enum GroupCommand {
    /// List project groups, optionally filtered by name or id
    List {
        #[arg(short, long)]
        name: Vec<String>,
        #[arg(short, long)]
        id: Vec<String>,
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },
    /// Create a project group
    Create {
        name: String,
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Delete project groups by name or id
    Delete {
        #[arg(short, long)]
        name: Vec<String>,
        #[arg(short, long)]
        id: Vec<String>,
    },
}

#[derive(Subcommand)]
enum EnvironmentCommand {
    /// List environments, optionally filtered by name or id
    List {
        #[arg(short, long)]
        name: Vec<String>,
        #[arg(short, long)]
        id: Vec<String>,
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },
    /// Create an environment
    Create {
        name: String,
        #[arg(short, long)]
        description: Option<String>,
        /// Enable guided failure mode
        #[arg(long)]
        guided_failure: bool,
    },
    /// Delete environments by name or id
    Delete {
        #[arg(short, long)]
        name: Vec<String>,
        #[arg(short, long)]
        id: Vec<String>,
    },
}

#[derive(Subcommand)]
enum MachineCommand {
    /// List machines, optionally filtered by name or id
    List {
        #[arg(short, long)]
        name: Vec<String>,
        #[arg(short, long)]
        id: Vec<String>,
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },
    /// Delete machines by name or id
    Delete {
        #[arg(short, long)]
        name: Vec<String>,
        #[arg(short, long)]
        id: Vec<String>,
    },
}

#[derive(Subcommand)]
enum VariableCommand {
    /// List a project's variables
    List {
        /// Project name
        #[arg(short, long)]
        project: String,
        /// Variable names to filter by
        #[arg(short, long)]
        name: Vec<String>,
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },
    /// Add variables to a project (NAME=VALUE, repeatable)
    Add {
        /// Project name
        #[arg(short, long)]
        project: String,
        /// Variables as NAME=VALUE
        #[arg(required = true)]
        variables: Vec<String>,
        /// Mark the added variables as sensitive
        #[arg(long)]
        sensitive: bool,
        /// Scope the added variables to these environments
        #[arg(short, long)]
        environment: Vec<String>,
    },
    /// Remove variables from a project by name
    Remove {
        /// Project name
        #[arg(short, long)]
        project: String,
        /// Variable names
        #[arg(required = true)]
        names: Vec<String>,
    },
}

#[derive(Subcommand)]
enum LibraryCommand {
    /// List library variable sets, optionally filtered by name or id
    List {
        #[arg(short, long)]
        name: Vec<String>,
        #[arg(short, long)]
        id: Vec<String>,
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },
    /// Create a library variable set
    Create {
        name: String,
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Delete library variable sets by name or id
    Delete {
        #[arg(short, long)]
        name: Vec<String>,
        #[arg(short, long)]
        id: Vec<String>,
    },
}

#[derive(Subcommand)]
enum ChannelCommand {
    /// List a project's channels
    List {
        /// Project name
        #[arg(short, long)]
        project: String,
        /// Channel names to filter by
        #[arg(short, long)]
        name: Vec<String>,
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },
    /// Copy a channel within its project
    Copy {
        /// Project name
        #[arg(short, long)]
        project: String,
        /// Source channel name
        source: String,
        /// Destination channel name (defaults to "<source> - Copy")
        destination: Option<String>,
    },
}

#[derive(Subcommand)]
enum StepCommand {
    /// Copy a deployment step within its project
    Copy {
        /// Project name
        #[arg(short, long)]
        project: String,
        /// Source step name
        source: String,
        /// Destination step name (defaults to "<source> - Copy")
        destination: Option<String>,
    },
}

#[derive(Subcommand)]
enum CertificateCommand {
    /// List certificates, optionally filtered by name or id
    List {
        #[arg(short, long)]
        name: Vec<String>,
        #[arg(short, long)]
        id: Vec<String>,
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },
    /// Delete certificates by name or id
    Delete {
        #[arg(short, long)]
        name: Vec<String>,
        #[arg(short, long)]
        id: Vec<String>,
    },
}

#[derive(Subcommand)]
enum FeedCommand {
    /// List feeds, optionally filtered by name or id
    List {
        #[arg(short, long)]
        name: Vec<String>,
        #[arg(short, long)]
        id: Vec<String>,
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },
    /// Delete feeds by name or id
    Delete {
        #[arg(short, long)]
        name: Vec<String>,
        #[arg(short, long)]
        id: Vec<String>,
    },
}

/// The session for this invocation: environment variables win over the
/// stored session so scripts and CI need no config file or keyring.
fn resolve_session() -> Result<StoredSession> {
    let env_url = std::env::var(SERVER_URL_ENV_VAR).ok().filter(|v| !v.is_empty());
    let env_key = std::env::var(API_KEY_ENV_VAR).ok().filter(|v| !v.is_empty());
    if let (Some(server_url), Some(api_key)) = (env_url, env_key) {
        return Ok(StoredSession {
            server_url,
            api_key,
        });
    }

    match deps::RealSessionStore.load()? {
        Some(session) => Ok(session),
        None => bail!("Not connected to a Drydock server. Run 'drydock connect' first."),
    }
}

fn deployment_client(session: &StoredSession) -> Result<Arc<dyn DeploymentClient>> {
    let config = api_client::ApiConfig::new(
        session.server_url.clone(),
        Some(session.api_key.clone()),
    );
    Ok(Arc::new(deps::RealDeploymentClient::new(
        api_client::create_client(config)?,
    )))
}

fn connected_api() -> Result<Arc<dyn DeploymentClient>> {
    deployment_client(&resolve_session()?)
}

#[tokio::main]
#[allow(clippy::too_many_lines)]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = match cli.verbose {
        0 => EnvFilter::new("error"),
        1 => EnvFilter::new("warn"),
        2 => EnvFilter::new("info"),
        3 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt().with_env_filter(filter).init();

    let ui = Arc::new(ui::RealUserInterface);

    match cli.command {
        Command::Connect { server, api_key } => {
            let session = StoredSession {
                server_url: server.clone(),
                api_key: api_key.clone(),
            };
            let deps = Arc::new(commands::connect::ConnectDependencies {
                ui: ui.clone(),
                api: deployment_client(&session)?,
                session_store: Arc::new(deps::RealSessionStore),
            });
            commands::connect::execute_with_deps(
                commands::connect::ConnectConfig {
                    server_url: server,
                    api_key,
                },
                deps,
            )
            .await
        }
        Command::Disconnect => {
            let deps = commands::disconnect::DisconnectDependencies {
                ui: ui.clone(),
                session_store: Arc::new(deps::RealSessionStore),
            };
            commands::disconnect::execute_with_deps(&deps)
        }
        Command::Status => {
            let deps = commands::status::StatusDependencies {
                ui: ui.clone(),
                session_store: Arc::new(deps::RealSessionStore),
            };
            commands::status::execute_with_deps(&deps)
        }
        Command::Project { command } => {
            let deps = commands::project::ProjectDependencies {
                ui: ui.clone(),
                api: connected_api()?,
                clock: Arc::new(deps::RealClock),
            };
            match command {
                ProjectCommand::List { format } => {
                    commands::project::list_with_deps(format, &deps).await
                }
                ProjectCommand::Get { name, id, format } => {
                    let selector = Selector::from_flags(name, id)?;
                    commands::project::get_with_deps(&selector, format, &deps).await
                }
                ProjectCommand::Create {
                    name,
                    group,
                    description,
                    lifecycle,
                } => {
                    commands::project::create_with_deps(
                        commands::project::CreateProjectConfig {
                            name,
                            group,
                            description,
                            lifecycle_id: lifecycle,
                        },
                        &deps,
                    )
                    .await
                }
                ProjectCommand::Update {
                    id,
                    name,
                    description,
                } => {
                    commands::project::update_with_deps(
                        commands::project::UpdateProjectConfig {
                            id,
                            name,
                            description,
                        },
                        &deps,
                    )
                    .await
                }
                ProjectCommand::Delete { name, id, force } => {
                    let selector = Selector::from_flags(name, id)?;
                    commands::project::delete_with_deps(&selector, force, &deps).await
                }
                ProjectCommand::Copy {
                    source,
                    destination,
                    group,
                } => {
                    commands::project::copy_with_deps(
                        commands::project::CopyProjectConfig {
                            source,
                            destination,
                            group,
                        },
                        &deps,
                    )
                    .await
                }
            }
        }
        Command::Group { command } => {
            let deps = commands::group::GroupDependencies {
                ui: ui.clone(),
                api: connected_api()?,
            };
            match command {
                GroupCommand::List { name, id, format } => {
                    let selector = Selector::from_flags(name, id)?;
                    commands::group::list_with_deps(&selector, format, &deps).await
                }
                GroupCommand::Create { name, description } => {
                    commands::group::create_with_deps(
                        commands::group::CreateGroupConfig { name, description },
                        &deps,
                    )
                    .await
                }
                GroupCommand::Delete { name, id } => {
                    let selector = Selector::from_flags(name, id)?;
                    commands::group::delete_with_deps(&selector, &deps).await
                }
            }
        }
        Command::Environment { command } => {
            let deps = commands::environment::EnvironmentDependencies {
                ui: ui.clone(),
                api: connected_api()?,
            };
            match command {
                EnvironmentCommand::List { name, id, format } => {
                    let selector = Selector::from_flags(name, id)?;
                    commands::environment::list_with_deps(&selector, format, &deps).await
                }
                EnvironmentCommand::Create {
                    name,
                    description,
                    guided_failure,
                } => {
                    commands::environment::create_with_deps(
                        commands::environment::CreateEnvironmentConfig {
                            name,
                            description,
                            use_guided_failure: guided_failure,
                        },
                        &deps,
                    )
                    .await
                }
                EnvironmentCommand::Delete { name, id } => {
                    let selector = Selector::from_flags(name, id)?;
                    commands::environment::delete_with_deps(&selector, &deps).await
                }
            }
        }
        Command::Machine { command } => {
            let deps = commands::machine::MachineDependencies {
                ui: ui.clone(),
                api: connected_api()?,
            };
            match command {
                MachineCommand::List { name, id, format } => {
                    let selector = Selector::from_flags(name, id)?;
                    commands::machine::list_with_deps(&selector, format, &deps).await
                }
                MachineCommand::Delete { name, id } => {
                    let selector = Selector::from_flags(name, id)?;
                    commands::machine::delete_with_deps(&selector, &deps).await
                }
            }
        }
        Command::Variable { command } => {
            let deps = commands::variable::VariableDependencies {
                ui: ui.clone(),
                api: connected_api()?,
            };
            match command {
                VariableCommand::List {
                    project,
                    name,
                    format,
                } => {
                    let selector = Selector::from_flags(name, Vec::new())?;
                    commands::variable::list_with_deps(&project, &selector, format, &deps).await
                }
                VariableCommand::Add {
                    project,
                    variables,
                    sensitive,
                    environment,
                } => {
                    commands::variable::add_with_deps(
                        commands::variable::AddVariablesConfig {
                            project,
                            specs: variables,
                            sensitive,
                            environments: environment,
                        },
                        &deps,
                    )
                    .await
                }
                VariableCommand::Remove { project, names } => {
                    commands::variable::remove_with_deps(
                        commands::variable::RemoveVariablesConfig { project, names },
                        &deps,
                    )
                    .await
                }
            }
        }
        Command::Library { command } => {
            let deps = commands::library::LibraryDependencies {
                ui: ui.clone(),
                api: connected_api()?,
            };
            match command {
                LibraryCommand::List { name, id, format } => {
                    let selector = Selector::from_flags(name, id)?;
                    commands::library::list_with_deps(&selector, format, &deps).await
                }
                LibraryCommand::Create { name, description } => {
                    commands::library::create_with_deps(
                        commands::library::CreateLibraryConfig { name, description },
                        &deps,
                    )
                    .await
                }
                LibraryCommand::Delete { name, id } => {
                    let selector = Selector::from_flags(name, id)?;
                    commands::library::delete_with_deps(&selector, &deps).await
                }
            }
        }
        Command::Channel { command } => {
            let deps = commands::channel::ChannelDependencies {
                ui: ui.clone(),
                api: connected_api()?,
            };
            match command {
                ChannelCommand::List {
                    project,
                    name,
                    format,
                } => {
                    let selector = Selector::from_flags(name, Vec::new())?;
                    commands::channel::list_with_deps(&project, &selector, format, &deps).await
                }
                ChannelCommand::Copy {
                    project,
                    source,
                    destination,
                } => {
                    commands::channel::copy_with_deps(
                        commands::channel::CopyChannelConfig {
                            project,
                            source,
                            destination,
                        },
                        &deps,
                    )
                    .await
                }
            }
        }
        Command::Step { command } => {
            let deps = commands::step::StepDependencies {
                ui: ui.clone(),
                api: connected_api()?,
            };
            match command {
                StepCommand::Copy {
                    project,
                    source,
                    destination,
                } => {
                    commands::step::copy_with_deps(
                        commands::step::CopyStepConfig {
                            project,
                            source,
                            destination,
                        },
                        &deps,
                    )
                    .await
                }
            }
        }
        Command::Certificate { command } => {
            let deps = commands::certificate::CertificateDependencies {
                ui: ui.clone(),
                api: connected_api()?,
            };
            match command {
                CertificateCommand::List { name, id, format } => {
                    let selector = Selector::from_flags(name, id)?;
                    commands::certificate::list_with_deps(&selector, format, &deps).await
                }
                CertificateCommand::Delete { name, id } => {
                    let selector = Selector::from_flags(name, id)?;
                    commands::certificate::delete_with_deps(&selector, &deps).await
                }
            }
        }
        Command::Feed { command } => {
            let deps = commands::feed::FeedDependencies {
                ui: ui.clone(),
                api: connected_api()?,
            };
            match command {
                FeedCommand::List { name, id, format } => {
                    let selector = Selector::from_flags(name, id)?;
                    commands::feed::list_with_deps(&selector, format, &deps).await
                }
                FeedCommand::Delete { name, id } => {
                    let selector = Selector::from_flags(name, id)?;
                    commands::feed::delete_with_deps(&selector, &deps).await
                }
            }
        }
    }
}
