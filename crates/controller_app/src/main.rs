//! Command-line front end for the controller.
//!
//! - `inspect` loads a system descriptor and prints it with resolved file
//!   references.
//! - `check` loads a property file and prints it with its resolved timing.
//! - `run` starts the descriptor's participants in-process, connects them
//!   and applies a property file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::{info, warn};

use controller_core::builder::{anchor_dir, base_dir, file_references};
use controller_core::{
    ApplyMode, ConfigureReport, Controller, ControllerConfig, WriteFailurePolicy,
};
use controller_model::{
    FileReferences, PropertyModel, PropertyType, SystemModel, TimingConfiguration, load_property_file,
    load_system_descriptor,
};
use controller_sdk::names::SYSTEM_NODE;
use controller_sdk::{LocalNetwork, System, SystemState};

#[derive(Parser)]
#[command(name = "controller_app", about = "Connect and configure participant systems")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load a system descriptor and print the system it describes
    Inspect {
        /// Path to the system descriptor
        descriptor: PathBuf,
    },
    /// Load a property file and print it with its resolved timing
    Check {
        /// Path to the property file
        properties: PathBuf,
    },
    /// Start the descriptor's participants locally and configure them
    Run {
        /// Path to the system descriptor
        descriptor: PathBuf,
        /// Path to the property file
        properties: PathBuf,
        #[command(flatten)]
        options: RunOptions,
    },
}

#[derive(Args)]
struct RunOptions {
    /// Abort on the first rejected system property write instead of skipping it
    #[arg(long)]
    abort_on_system_write_failure: bool,

    /// Skip rejected participant property writes instead of aborting
    #[arg(long)]
    continue_on_element_write_failure: bool,

    /// Check every write before making the first one
    #[arg(long)]
    validate_first: bool,

    /// Directory relative paths are resolved against
    #[arg(long)]
    working_dir: Option<PathBuf>,
}

impl RunOptions {
    fn config(&self) -> ControllerConfig {
        let mut config = ControllerConfig::new();
        if self.abort_on_system_write_failure {
            config = config.with_system_properties(WriteFailurePolicy::Abort);
        }
        if self.continue_on_element_write_failure {
            config = config.with_element_properties(WriteFailurePolicy::Continue);
        }
        if self.validate_first {
            config = config.with_apply_mode(ApplyMode::ValidateThenApply);
        }
        if let Some(dir) = &self.working_dir {
            config = config.with_working_dir(dir);
        }
        config
    }
}

#[derive(Serialize)]
struct InspectOutput<'a> {
    name: &'a str,
    participants: Vec<InspectParticipant<'a>>,
}

#[derive(Serialize)]
struct InspectParticipant<'a> {
    id: &'a str,
    init_priority: i32,
    start_priority: i32,
    file_references: FileReferences,
}

#[derive(Serialize)]
struct CheckOutput<'a> {
    model: &'a PropertyModel,
    timing: TimingConfiguration,
    shadowed_participant_blocks: Vec<&'a str>,
}

#[derive(Serialize)]
struct RunOutput {
    system: String,
    state: String,
    report: ConfigureReport,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "controller_app=info,controller_core=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Inspect { descriptor } => inspect(&descriptor),
        Command::Check { properties } => {
            let model = load_property_file(&properties)?;
            let timing = TimingConfiguration::resolve(&model.timing_properties)?;
            let shadowed_participant_blocks = model
                .shadowed_blocks()
                .map(|block| block.participant_id.as_str())
                .collect::<Vec<_>>();
            for id in &shadowed_participant_blocks {
                warn!(participant = id, "participant block shadowed by an earlier one");
            }
            print_json(&CheckOutput {
                model: &model,
                timing,
                shadowed_participant_blocks,
            })
        }
        Command::Run {
            descriptor,
            properties,
            options,
        } => run(&descriptor, &properties, &options.config()),
    }
}

fn inspect(descriptor: &Path) -> Result<()> {
    let model = load_system_descriptor(descriptor)?;
    let anchor = anchor_dir(descriptor, &ControllerConfig::default())?;
    print_json(&InspectOutput {
        name: &model.name,
        participants: model
            .participants
            .iter()
            .map(|spec| InspectParticipant {
                id: &spec.id,
                init_priority: spec.init_priority,
                start_priority: spec.start_priority,
                file_references: file_references(spec, &anchor),
            })
            .collect(),
    })
}

fn run(descriptor: &Path, properties: &Path, config: &ControllerConfig) -> Result<()> {
    let controller = Controller::new(config.clone());
    let base = base_dir(config)?;
    let system_model = load_system_descriptor(base.join(descriptor))?;
    let property_model = load_property_file(base.join(properties))?;
    let network = spawn_participants(&system_model, &property_model);
    info!(
        system = system_model.name,
        participants = network.len(),
        "participants started"
    );

    let mut system = controller
        .connect(descriptor, &network)
        .with_context(|| format!("connecting system '{}'", system_model.name))?;
    let report = controller
        .configure_with_report(&mut system, properties)
        .with_context(|| format!("configuring system '{}'", system_model.name))?;
    let state: SystemState = system.state()?;

    print_json(&RunOutput {
        system: system.name().to_string(),
        state: state.to_string(),
        report,
    })
}

/// Start one participant per descriptor entry, exposing every property the
/// property file addresses to it with a zero value of the declared type.
fn spawn_participants(system: &SystemModel, properties: &PropertyModel) -> LocalNetwork {
    let network = LocalNetwork::new();
    for spec in &system.participants {
        let participant = network.spawn(&spec.id);
        for property in &properties.system_properties {
            let path = format!("{SYSTEM_NODE}/{}", property.name.trim_start_matches('/'));
            participant.register_property(&path, property.property_type, zero(property.property_type));
        }
        for property in properties.properties_for(&spec.id).unwrap_or_default() {
            participant.register_property(&property.name, property.property_type, zero(property.property_type));
        }
    }
    network
}

fn zero(property_type: PropertyType) -> &'static str {
    match property_type {
        PropertyType::Bool => "false",
        PropertyType::Int => "0",
        PropertyType::Double => "0.0",
        PropertyType::String => "",
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
