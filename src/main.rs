//! rbac-admin - RBAC administration tool
//!
//! Creates the schema, checks storage, resolves a user's effective powers and
//! replaces grant sets from the command line.

#![allow(missing_docs)]

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use rbac_admin::core::stores::{
    GroupMembershipStore, GroupRoleStore, RoleAssignmentStore, RolePowerStore,
};
use rbac_admin::utils::logging::init_tracing;
use rbac_admin::{AdminSystem, Config, PowerId, RoleId, UserGroupId, UserId};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, warn};

#[derive(Debug, Parser)]
#[command(name = "rbac-admin", version, about)]
struct Cli {
    /// YAML configuration file; environment variables override it
    #[arg(short, long, env = "RBAC_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create missing tables and indexes
    InitSchema,
    /// Validate configuration and check storage health
    Check,
    /// Print a user's effective powers as JSON
    Resolve {
        #[arg(long)]
        user: UserId,
        /// Include the role and group trace
        #[arg(long)]
        detailed: bool,
    },
    /// Replace the roles assigned directly to a user
    SetUserRoles(Assign),
    /// Replace the groups a user belongs to
    SetUserGroups(Assign),
    /// Replace the roles granted to a group
    SetGroupRoles(Assign),
    /// Replace the powers granted to a role
    SetRolePowers(Assign),
}

#[derive(Debug, Args)]
struct Assign {
    /// Owner id
    #[arg(long)]
    id: i32,
    /// Full replacement set, comma separated; omit to clear
    #[arg(long, value_delimiter = ',')]
    to: Vec<i32>,
}

impl Assign {
    fn owner<O: From<i32>>(&self) -> O {
        O::from(self.id)
    }

    fn targets<T: From<i32>>(&self) -> Vec<T> {
        self.to.iter().copied().map(T::from).collect()
    }
}

async fn load_config(path: Option<&PathBuf>) -> anyhow::Result<Config> {
    let file = match path {
        Some(path) => Config::from_file(path)
            .await
            .with_context(|| format!("Failed to load {}", path.display()))?,
        None => Config::default(),
    };
    file.with_env().context("Invalid environment configuration")
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // Tracing depends on the logging section, so nothing before this point logs
    let config = load_config(cli.config.as_ref()).await?;
    init_tracing(config.logging()).context("Failed to initialize logging")?;
    match &cli.config {
        Some(path) => info!("Configuration loaded from {}", path.display()),
        None => info!("Configuration loaded from environment"),
    }
    if !config.auth().allow_registration && !config.auth().external_login_enabled {
        warn!("Registration is disabled; accounts must be provisioned by an administrator");
    }

    let admin = AdminSystem::new(config).await?;
    let db = admin.storage().db();

    match cli.command {
        Command::InitSchema => {
            admin.init_schema().await?;
            info!("Schema ready");
        }
        Command::Check => {
            let status = admin.storage().health_check().await;
            println!("{}", serde_json::to_string_pretty(&status)?);
            if !status.overall {
                anyhow::bail!("Storage is unavailable");
            }
        }
        Command::Resolve { user, detailed } => {
            let output = if detailed {
                serde_json::to_string_pretty(&admin.resolver().resolve_detailed(user).await?)?
            } else {
                let grants: Vec<_> = admin
                    .resolver()
                    .resolve(user)
                    .await?
                    .into_iter()
                    .map(rbac_admin::PowerGrant::from)
                    .collect();
                serde_json::to_string_pretty(&grants)?
            };
            println!("{}", output);
        }
        Command::SetUserRoles(args) => {
            let roles: Vec<RoleId> = args.targets();
            db.set_user_roles(args.owner::<UserId>(), &roles).await?;
            info!("User {} now has roles {:?}", args.id, args.to);
        }
        Command::SetUserGroups(args) => {
            let groups: Vec<UserGroupId> = args.targets();
            db.set_user_groups(args.owner::<UserId>(), &groups).await?;
            info!("User {} now belongs to groups {:?}", args.id, args.to);
        }
        Command::SetGroupRoles(args) => {
            let roles: Vec<RoleId> = args.targets();
            db.set_group_roles(args.owner::<UserGroupId>(), &roles).await?;
            info!("Group {} now holds roles {:?}", args.id, args.to);
        }
        Command::SetRolePowers(args) => {
            let powers: Vec<PowerId> = args.targets();
            db.set_role_powers(args.owner::<RoleId>(), &powers).await?;
            info!("Role {} now grants powers {:?}", args.id, args.to);
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env file is not an error
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
