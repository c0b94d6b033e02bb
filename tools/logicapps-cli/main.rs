use clap::{Parser, Subcommand};
use logicapps::commands::{self, DeploymentTarget};
use logicapps::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Manage Azure Logic Apps workflows and generate their deployment artifacts
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the deployment template for a workflow JSON file
    Template {
        /// Path to the workflow JSON file
        workflow: PathBuf,
    },
    /// Print the deployment parameters file for a workflow JSON file
    Parameters {
        /// Path to the workflow JSON file
        workflow: PathBuf,
    },
    /// Write one template and parameters file deploying several workflows
    Combine {
        /// Paths to workflow JSON files
        #[arg(required = true)]
        workflows: Vec<PathBuf>,
        /// Output directory
        #[arg(short, long, default_value = ".")]
        out: PathBuf,
    },
    /// Print a pipeline that deploys a template to a resource group
    Pipeline {
        #[arg(long)]
        subscription: String,
        /// Template file path, relative to the repository root
        #[arg(long)]
        template: String,
        /// Parameters file path, relative to the repository root
        #[arg(long)]
        parameters: String,
        #[arg(long)]
        location: String,
        #[arg(long)]
        resource_group: String,
    },
    /// Fetch a workflow and write its template, parameters and pipeline
    Export {
        /// Workflow resource id
        id: String,
        /// Output directory
        #[arg(short, long, default_value = ".")]
        out: PathBuf,
        /// Pipeline service connection (defaults to the configured subscription)
        #[arg(long)]
        subscription: Option<String>,
        /// Target location (defaults to the workflow's location)
        #[arg(long)]
        location: Option<String>,
        /// Target resource group (defaults to the workflow's resource group)
        #[arg(long)]
        resource_group: Option<String>,
    },
    /// Print a workflow definition
    Show { id: String },
    /// Replace a workflow definition with the contents of a JSON file
    Update { id: String, definition: PathBuf },
    /// Enable a workflow
    Enable { id: String },
    /// Disable a workflow
    Disable { id: String },
    /// Delete a workflow
    Delete { id: String },
    /// List a workflow's triggers
    Triggers { id: String },
    /// Print the callback URL of a trigger
    TriggerUrl { id: String, trigger: String },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = ManagerConfig::load(cli.config.as_deref())
        .unwrap_or_else(|e| exit_with_error(&e.to_string()));
    init_logging(cli.verbose, &config.log_level);
    debug!(?config.endpoint, ?config.api_version, "configuration loaded");

    match cli.command {
        Command::Template { workflow } => {
            let workflow = load_workflow(&workflow);
            let template = generate_template(&workflow).and_then(|t| t.to_json());
            println!("{}", template.unwrap_or_else(|e| exit_with_error(&e.to_string())));
        }
        Command::Parameters { workflow } => {
            let workflow = load_workflow(&workflow);
            let parameters = generate_parameters(&workflow).and_then(|p| p.to_json());
            println!("{}", parameters.unwrap_or_else(|e| exit_with_error(&e.to_string())));
        }
        Command::Combine { workflows, out } => run_combine(&workflows, &out),
        Command::Pipeline {
            subscription,
            template,
            parameters,
            location,
            resource_group,
        } => {
            let yaml = generate_build_definition(BuildDefinitionOptions {
                azure_subscription: subscription,
                csm_file: template,
                csm_parameters_file: parameters,
                location,
                resource_group_name: resource_group,
            })
            .unwrap_or_else(|e| exit_with_error(&e.to_string()));
            print!("{}", yaml);
        }
        command => run_remote(command, &config).await,
    }
}

/// Runs the commands that talk to the management API.
async fn run_remote(command: Command, config: &ManagerConfig) {
    let client =
        ArmWorkflowClient::from_config(config).unwrap_or_else(|e| exit_with_error(&e.to_string()));

    let result = match command {
        Command::Export {
            id,
            out,
            subscription,
            location,
            resource_group,
        } => run_export(&client, config, &id, &out, subscription, location, resource_group).await,
        Command::Show { id } => commands::show_definition(&client, &id)
            .await
            .map(|definition| println!("{}", definition)),
        Command::Update { id, definition } => {
            let text = read_file(&definition);
            commands::update_definition(&client, &id, &text)
                .await
                .map(|definition| println!("{}", definition))
        }
        Command::Enable { id } => commands::enable_workflow(&client, &id)
            .await
            .map(|_| println!("Enabled.")),
        Command::Disable { id } => commands::disable_workflow(&client, &id)
            .await
            .map(|_| println!("Disabled.")),
        Command::Delete { id } => commands::delete_workflow(&client, &id)
            .await
            .map(|_| println!("Deleted.")),
        Command::Triggers { id } => commands::list_triggers(&client, &id)
            .await
            .map(|triggers| println!("{}", commands::describe_triggers(&triggers))),
        Command::TriggerUrl { id, trigger } => commands::get_trigger_url(&client, &id, &trigger)
            .await
            .map(|url| println!("{}", url)),
        Command::Template { .. }
        | Command::Parameters { .. }
        | Command::Combine { .. }
        | Command::Pipeline { .. } => Ok(()),
    };

    if let Err(e) = result {
        exit_with_error(&e.to_string());
    }
}

async fn run_export(
    client: &ArmWorkflowClient,
    config: &ManagerConfig,
    id: &str,
    out: &Path,
    subscription: Option<String>,
    location: Option<String>,
    resource_group: Option<String>,
) -> std::result::Result<(), CommandError> {
    let resource_id: ResourceId = id.parse()?;
    let workflow = client
        .get(&resource_id.resource_group, &resource_id.name)
        .await?;

    let target = DeploymentTarget {
        azure_subscription: subscription
            .or_else(|| config.subscription_id.clone())
            .unwrap_or_else(|| resource_id.subscription_id.clone()),
        location: location.unwrap_or_else(|| workflow.location.clone()),
        resource_group_name: resource_group.unwrap_or_else(|| resource_id.resource_group.clone()),
    };

    let files = commands::export_deployment(&workflow, &target, out)?;
    println!("  -> Wrote template to '{}'", files.template.display());
    println!("  -> Wrote parameters to '{}'", files.parameters.display());
    println!("  -> Wrote pipeline to '{}'", files.pipeline.display());
    Ok(())
}

fn run_combine(paths: &[PathBuf], out: &Path) {
    let workflows: Vec<Workflow> = paths.iter().map(|path| load_workflow(path)).collect();
    let bundle =
        generate_combined_template(&workflows).unwrap_or_else(|e| exit_with_error(&e.to_string()));

    let template_path = out.join("workflows.template.json");
    let parameters_path = out.join("workflows.parameters.json");
    let template = bundle
        .template
        .to_json()
        .unwrap_or_else(|e| exit_with_error(&e.to_string()));
    let parameters = bundle
        .parameters
        .to_json()
        .unwrap_or_else(|e| exit_with_error(&e.to_string()));

    write_file(&template_path, &template);
    write_file(&parameters_path, &parameters);
    println!(
        "Combined {} workflows into {} template parameters.",
        workflows.len(),
        bundle.template.parameters.len()
    );
    println!("  -> Wrote template to '{}'", template_path.display());
    println!("  -> Wrote parameters to '{}'", parameters_path.display());
}

fn init_logging(verbose: u8, configured_level: &str) {
    let filter = match verbose {
        0 => configured_level.to_string(),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbose >= 2)
        .with_writer(std::io::stderr)
        .init();
}

fn load_workflow(path: &Path) -> Workflow {
    let text = read_file(path);
    Workflow::from_json_str(&text).unwrap_or_else(|e| {
        exit_with_error(&format!(
            "Failed to load workflow from '{}': {}",
            path.display(),
            e
        ))
    })
}

fn read_file(path: &Path) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| {
        exit_with_error(&format!("Failed to read '{}': {}", path.display(), e))
    })
}

fn write_file(path: &Path, contents: &str) {
    if let Err(e) = fs::write(path, contents) {
        exit_with_error(&format!("Failed to write '{}': {}", path.display(), e));
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
