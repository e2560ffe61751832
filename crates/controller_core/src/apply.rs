//! Pushes a property model into a live system.

use serde::Serialize;
use tracing::{debug, info, warn};

use controller_model::{Property, PropertyModel};
use controller_sdk::names::{ROOT_NODE, SYSTEM_NODE};
use controller_sdk::{
    ConfigurationRpc, LifecycleState, Participant, PropertyNode, SdkError, System,
};

use crate::config::{ApplyMode, ControllerConfig, WriteFailurePolicy};
use crate::error::{ControllerError, PropertyScope};
use crate::timing::resolve_timing;

type NodeOf<P> = <<P as Participant>::Configuration as ConfigurationRpc>::Node;

/// A property write a participant rejected under
/// [`WriteFailurePolicy::Continue`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedWrite {
    /// The participant.
    pub participant: String,
    /// Path of the node written to.
    pub node: String,
    /// The property name as declared.
    pub property: String,
    /// The rejected value.
    pub value: String,
}

/// Outcome of [`apply_properties`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ApplyReport {
    /// Participants visited.
    pub participants: usize,
    /// Properties written successfully.
    pub written: usize,
    /// Rejected writes that were skipped.
    pub failures: Vec<FailedWrite>,
}

/// Write `model` into every participant of `system`.
///
/// The system is first requested to enter `loaded` and must then report a
/// homogeneous `loaded` state. Participants are visited in system order:
/// system properties go into `/system`, then the participant's first
/// matching element block goes into `/`. A node the participant does not
/// have is skipped. Nothing is rolled back on failure.
///
/// # Errors
///
/// - [`ControllerError::Precondition`] if the system is not homogeneous `loaded`.
/// - [`ControllerError::RpcUnavailable`] if a participant's nodes cannot be reached.
/// - [`ControllerError::PropertyWrite`] for a rejected write under
///   [`WriteFailurePolicy::Abort`].
/// - [`ControllerError::UnsupportedTimingType`] when validating an unknown
///   timing mode under [`ApplyMode::ValidateThenApply`], and
///   [`ControllerError::Sdk`] when validating a timing master that is not a
///   participant.
pub fn apply_properties<S: System>(
    system: &mut S,
    model: &PropertyModel,
    config: &ControllerConfig,
) -> Result<ApplyReport, ControllerError> {
    ensure_loaded(system)?;
    let participants = system.participants();

    if config.apply_mode == ApplyMode::ValidateThenApply {
        validate(system, &participants, model, config)?;
    }

    let mut report = ApplyReport::default();
    for participant in &participants {
        let (root, system_node) = fetch_nodes(participant)?;
        if let Some(node) = &system_node {
            write_all(
                node,
                participant.name(),
                &model.system_properties,
                config.system_properties,
                &mut report,
            )?;
        }
        if let (Some(node), Some(properties)) = (&root, model.properties_for(participant.name())) {
            write_all(
                node,
                participant.name(),
                properties,
                config.element_properties,
                &mut report,
            )?;
        }
        report.participants += 1;
    }

    info!(
        system = system.name(),
        participants = report.participants,
        written = report.written,
        failed = report.failures.len(),
        "properties applied"
    );
    Ok(report)
}

fn ensure_loaded<S: System>(system: &mut S) -> Result<(), ControllerError> {
    system.set_state(LifecycleState::Loaded)?;
    let state = system.state()?;
    if !state.is_homogeneous(LifecycleState::Loaded) {
        return Err(ControllerError::Precondition {
            system: system.name().to_string(),
            state: state.state,
        });
    }
    Ok(())
}

fn fetch_nodes<P: Participant>(
    participant: &P,
) -> Result<(Option<NodeOf<P>>, Option<NodeOf<P>>), ControllerError> {
    let unavailable = |scope: PropertyScope| {
        move |source: SdkError| ControllerError::RpcUnavailable {
            scope,
            participant: participant.name().to_string(),
            source,
        }
    };
    let rpc = participant
        .configuration()
        .map_err(unavailable(PropertyScope::Root))?;
    let root = rpc
        .properties(ROOT_NODE)
        .map_err(unavailable(PropertyScope::Root))?;
    let system = rpc
        .properties(SYSTEM_NODE)
        .map_err(unavailable(PropertyScope::System))?;
    Ok((root, system))
}

fn write_all<N: PropertyNode>(
    node: &N,
    participant: &str,
    properties: &[Property],
    policy: WriteFailurePolicy,
    report: &mut ApplyReport,
) -> Result<(), ControllerError> {
    for property in properties {
        if node.set_property(&property.name, &property.value, property.property_type) {
            report.written += 1;
            continue;
        }
        match policy {
            WriteFailurePolicy::Abort => {
                return Err(ControllerError::PropertyWrite {
                    property: property.name.clone(),
                    participant: participant.to_string(),
                });
            }
            WriteFailurePolicy::Continue => {
                warn!(
                    participant,
                    node = node.path(),
                    property = property.name,
                    value = property.value,
                    "property write rejected, continuing"
                );
                report.failures.push(FailedWrite {
                    participant: participant.to_string(),
                    node: node.path().to_string(),
                    property: property.name.clone(),
                    value: property.value.clone(),
                });
            }
        }
    }
    Ok(())
}

/// Returns `true` if `node` has `property` with the declared type and the
/// value is valid for it.
fn accepts<N: PropertyNode>(node: &N, property: &Property) -> bool {
    node.property(&property.name).is_some_and(|entry| {
        entry.property_type == property.property_type
            && property.property_type.accepts(&property.value)
    })
}

/// Check every write that would abort before the first one is made.
fn validate<S: System>(
    system: &S,
    participants: &[S::Participant],
    model: &PropertyModel,
    config: &ControllerConfig,
) -> Result<(), ControllerError> {
    let timing = resolve_timing(system, &model.timing_properties)?;
    if let Some(master) = timing.master_element_id() {
        if system.participant(master).is_none() {
            return Err(ControllerError::Sdk(SdkError::Timing {
                system: system.name().to_string(),
                reason: format!("timing master '{master}' is not a participant"),
            }));
        }
    }

    let check = |node: &NodeOf<S::Participant>, participant: &str, properties: &[Property]| {
        match properties.iter().find(|p| !accepts(node, p)) {
            Some(property) => Err(ControllerError::PropertyWrite {
                property: property.name.clone(),
                participant: participant.to_string(),
            }),
            None => Ok(()),
        }
    };

    for participant in participants {
        let (root, system_node) = fetch_nodes(participant)?;
        if config.system_properties == WriteFailurePolicy::Abort {
            if let Some(node) = &system_node {
                check(node, participant.name(), &model.system_properties)?;
            }
        }
        if config.element_properties == WriteFailurePolicy::Abort {
            if let (Some(node), Some(properties)) =
                (&root, model.properties_for(participant.name()))
            {
                check(node, participant.name(), properties)?;
            }
        }
    }

    debug!(system = system.name(), "property model validated");
    Ok(())
}

#[cfg(test)]
mod tests {
    use controller_model::{ElementProperties, PropertyType};
    use controller_sdk::{LocalNetwork, LocalSystem, SystemConnector};

    use super::*;

    fn system() -> (LocalNetwork, LocalSystem) {
        let network = LocalNetwork::new();
        for name in ["participant1", "participant2"] {
            let p = network.spawn(name);
            p.register_property("test_config/pos1", PropertyType::Double, "0.0");
            p.register_property("test_config/pos_X", PropertyType::Int, "11");
        }
        let mut system = network.create_system("FEP_SYSTEM").unwrap();
        system.add_participant("participant1").unwrap();
        system.add_participant("participant2").unwrap();
        (network, system)
    }

    fn model(element: Vec<Property>) -> PropertyModel {
        PropertyModel {
            system_properties: vec![Property::new("system_parameter", "42", PropertyType::Int)],
            element_properties: vec![ElementProperties {
                participant_id: "participant1".to_string(),
                properties: element,
            }],
            timing_properties: Vec::new(),
        }
    }

    fn value(network: &LocalNetwork, participant: &str, path: &str) -> String {
        network.participant(participant).unwrap().property_value(path).unwrap()
    }

    #[test]
    fn test_participant_without_system_node_is_skipped() {
        let (network, mut system) = system();
        let model = model(vec![Property::new("test_config/pos1", "1.5", PropertyType::Double)]);
        let report = apply_properties(&mut system, &model, &ControllerConfig::default()).unwrap();
        assert_eq!(report.participants, 2);
        assert_eq!(report.written, 1);
        assert!(report.failures.is_empty());
        assert_eq!(value(&network, "participant1", "test_config/pos1"), "1.5");
        assert_eq!(value(&network, "participant2", "test_config/pos1"), "0.0");
    }

    #[test]
    fn test_system_write_failure_continues_by_default() {
        let (network, mut system) = system();
        for name in ["participant1", "participant2"] {
            network
                .participant(name)
                .unwrap()
                .register_property("system/other", PropertyType::Int, "0");
        }
        let model = model(Vec::new());
        let report = apply_properties(&mut system, &model, &ControllerConfig::default()).unwrap();
        assert_eq!(report.failures.len(), 2);
        assert_eq!(report.failures[0].node, "/system");
        assert_eq!(report.failures[0].property, "system_parameter");

        let strict = ControllerConfig::new().with_system_properties(WriteFailurePolicy::Abort);
        let err = apply_properties(&mut system, &model, &strict).unwrap_err();
        assert!(matches!(err, ControllerError::PropertyWrite { .. }));
    }

    #[test]
    fn test_element_write_failure_continue_policy() {
        let (network, mut system) = system();
        let model = model(vec![
            Property::new("test_config.pos1", "1.0", PropertyType::Double),
            Property::new("test_config/pos_X", "5", PropertyType::Int),
        ]);
        let config = ControllerConfig::new().with_element_properties(WriteFailurePolicy::Continue);
        let report = apply_properties(&mut system, &model, &config).unwrap();
        assert_eq!(report.written, 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].property, "test_config.pos1");
        assert_eq!(value(&network, "participant1", "test_config/pos_X"), "5");
    }

    #[test]
    fn test_validate_then_apply_writes_nothing_on_failure() {
        let (network, mut system) = system();
        let model = model(vec![
            Property::new("test_config/pos_X", "5", PropertyType::Int),
            Property::new("test_config/pos1", "not a number", PropertyType::Double),
        ]);

        let single = apply_properties(&mut system, &model, &ControllerConfig::default());
        assert!(single.is_err());
        assert_eq!(value(&network, "participant1", "test_config/pos_X"), "5");

        network
            .participant("participant1")
            .unwrap()
            .register_property("test_config/pos_X", PropertyType::Int, "11");
        let config = ControllerConfig::new().with_apply_mode(ApplyMode::ValidateThenApply);
        let err = apply_properties(&mut system, &model, &config).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Error setting property 'test_config/pos1' of participant 'participant1'."
        );
        assert_eq!(value(&network, "participant1", "test_config/pos_X"), "11");
    }

    #[test]
    fn test_validate_rejects_unknown_timing_before_writes() {
        let (network, mut system) = system();
        let mut model = model(vec![Property::new("test_config/pos_X", "5", PropertyType::Int)]);
        model.timing_properties =
            vec![Property::new("timing_configuration_type", "Unknown3Mode", PropertyType::String)];
        let config = ControllerConfig::new().with_apply_mode(ApplyMode::ValidateThenApply);
        let err = apply_properties(&mut system, &model, &config).unwrap_err();
        assert!(matches!(err, ControllerError::UnsupportedTimingType { .. }));
        assert_eq!(value(&network, "participant1", "test_config/pos_X"), "11");
    }

    #[test]
    fn test_unreachable_participant() {
        let (network, mut system) = system();
        network.participant("participant2").unwrap().set_reachable(false);
        let err = apply_properties(&mut system, &model(Vec::new()), &ControllerConfig::default())
            .unwrap_err();
        assert!(matches!(err, ControllerError::Sdk(_)));
    }

    #[test]
    fn test_configuration_service_down() {
        let (network, mut system) = system();
        network.participant("participant2").unwrap().set_rpc_available(false);
        let err = apply_properties(&mut system, &model(Vec::new()), &ControllerConfig::default())
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unable to access root property of participant 'participant2': \
             participant 'participant2' is unreachable"
        );
    }

    #[test]
    fn test_system_node_unavailable() {
        let (network, mut system) = system();
        network
            .participant("participant1")
            .unwrap()
            .set_node_available(SYSTEM_NODE, false);
        let err = apply_properties(&mut system, &model(Vec::new()), &ControllerConfig::default())
            .unwrap_err();
        assert!(matches!(
            err,
            ControllerError::RpcUnavailable {
                scope: PropertyScope::System,
                ..
            }
        ));
        assert!(
            err.to_string()
                .starts_with("Unable to access system properties of participant 'participant1'")
        );
    }

    #[test]
    fn test_validate_rejects_unknown_timing_master_before_writes() {
        let (network, mut system) = system();
        let mut model = model(vec![Property::new("test_config/pos_X", "5", PropertyType::Int)]);
        model.timing_properties = vec![
            Property::new("timing_configuration_type", "Timing3AFAP", PropertyType::String),
            Property::new("master_element_id", "participant9", PropertyType::String),
        ];
        let config = ControllerConfig::new().with_apply_mode(ApplyMode::ValidateThenApply);
        let err = apply_properties(&mut system, &model, &config).unwrap_err();
        assert!(matches!(err, ControllerError::Sdk(SdkError::Timing { .. })));
        assert_eq!(value(&network, "participant1", "test_config/pos_X"), "11");
    }
}
