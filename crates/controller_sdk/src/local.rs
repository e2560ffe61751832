//! In-process participants.
//!
//! [`LocalNetwork`] is a registry of running [`LocalParticipant`]s, each with
//! its own property tree and lifecycle state. A [`LocalSystem`] created from
//! the network resolves participants by name, the way a system handle would
//! discover remote participants, and implements the timing entry points by
//! writing the clock, clock-sync and scheduler properties listed in
//! [`crate::names`].

use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use dashmap::{DashMap, DashSet};
use tracing::{debug, info};

use controller_model::{FileReferences, PropertyType};

use crate::error::SdkError;
use crate::names::{self, clock, clock_sync, scheduler};
use crate::state::{LifecycleState, SystemState};
use crate::system::{
    ConfigurationRpc, Participant, PropertyEntry, PropertyNode, System, SystemConnector,
};

// ── Network ─────────────────────────────────────────────────────────────────

/// Registry of participants running in this process.
#[derive(Debug, Clone, Default)]
pub struct LocalNetwork {
    /// Participants keyed by name.
    participants: Arc<DashMap<String, LocalParticipant>>,
}

impl LocalNetwork {
    /// Create an empty network.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a participant named `name` in the `unloaded` state, replacing
    /// any participant of the same name.
    ///
    /// The participant comes with the clock, clock-sync and scheduler
    /// properties every participant exposes.
    pub fn spawn(&self, name: &str) -> LocalParticipant {
        let participant = LocalParticipant::new(name);
        self.participants
            .insert(name.to_string(), participant.clone());
        info!(participant = name, "participant started");
        participant
    }

    /// Look up a running participant.
    #[must_use]
    pub fn participant(&self, name: &str) -> Option<LocalParticipant> {
        self.participants.get(name).map(|entry| entry.value().clone())
    }

    /// Stop a participant. Returns `true` if it was running.
    pub fn shutdown(&self, name: &str) -> bool {
        self.participants.remove(name).is_some()
    }

    /// Number of running participants.
    #[must_use]
    pub fn len(&self) -> usize {
        self.participants.len()
    }

    /// Returns `true` if no participant is running.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }
}

impl SystemConnector for LocalNetwork {
    type System = LocalSystem;

    fn create_system(&self, name: &str) -> Result<LocalSystem, SdkError> {
        Ok(LocalSystem::new(name, self.clone()))
    }
}

// ── Participant ─────────────────────────────────────────────────────────────

/// A participant running in this process.
#[derive(Debug, Clone)]
pub struct LocalParticipant {
    inner: Arc<ParticipantInner>,
}

#[derive(Debug)]
struct ParticipantInner {
    name: String,
    state: RwLock<LifecycleState>,
    /// Ignores state transition requests while set.
    frozen: AtomicBool,
    reachable: AtomicBool,
    /// Answers configuration requests while set.
    rpc_available: AtomicBool,
    /// Nodes whose lookup fails, keyed like `properties`.
    unavailable_nodes: DashSet<String>,
    /// Property tree keyed by slash-joined path without leading slash.
    properties: DashMap<String, PropertyEntry>,
}

impl LocalParticipant {
    fn new(name: &str) -> Self {
        let participant = Self {
            inner: Arc::new(ParticipantInner {
                name: name.to_string(),
                state: RwLock::new(LifecycleState::Unloaded),
                frozen: AtomicBool::new(false),
                reachable: AtomicBool::new(true),
                rpc_available: AtomicBool::new(true),
                unavailable_nodes: DashSet::new(),
                properties: DashMap::new(),
            }),
        };
        participant.register_property(clock::MAIN_CLOCK, PropertyType::String, clock::LOCAL_SYSTEM_REAL_TIME);
        participant.register_property(clock::TIME_FACTOR, PropertyType::Double, "1.0");
        participant.register_property(clock::CYCLE_TIME, PropertyType::Int, "100");
        participant.register_property(clock_sync::TIMING_MASTER, PropertyType::String, "");
        participant.register_property(clock_sync::SYNC_CYCLE_TIME, PropertyType::Int, "100");
        participant.register_property(scheduler::SCHEDULER, PropertyType::String, scheduler::CLOCK_BASED);
        participant
    }

    /// The participant name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Create (or reset) a property. `path` may carry a leading slash.
    pub fn register_property(&self, path: &str, property_type: PropertyType, value: &str) {
        self.inner.properties.insert(
            names::resolve(names::ROOT_NODE, path),
            PropertyEntry {
                value: value.to_string(),
                property_type,
            },
        );
    }

    /// Read a property. `path` may carry a leading slash.
    #[must_use]
    pub fn property(&self, path: &str) -> Option<PropertyEntry> {
        self.inner
            .properties
            .get(&names::resolve(names::ROOT_NODE, path))
            .map(|entry| entry.value().clone())
    }

    /// Read a property value. `path` may carry a leading slash.
    #[must_use]
    pub fn property_value(&self, path: &str) -> Option<String> {
        self.property(path).map(|entry| entry.value)
    }

    /// Current lifecycle state, or `unreachable`.
    #[must_use]
    pub fn state(&self) -> LifecycleState {
        if !self.is_reachable() {
            return LifecycleState::Unreachable;
        }
        *self
            .inner
            .state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// While frozen, the participant keeps its state and silently ignores
    /// transition requests.
    pub fn set_frozen(&self, frozen: bool) {
        self.inner.frozen.store(frozen, Ordering::SeqCst);
    }

    /// Simulate losing (or regaining) the connection to the participant.
    pub fn set_reachable(&self, reachable: bool) {
        self.inner.reachable.store(reachable, Ordering::SeqCst);
    }

    /// Returns `true` if the participant answers requests.
    #[must_use]
    pub fn is_reachable(&self) -> bool {
        self.inner.reachable.load(Ordering::SeqCst)
    }

    /// Simulate a configuration service that stops answering while lifecycle
    /// requests still go through.
    pub fn set_rpc_available(&self, available: bool) {
        self.inner.rpc_available.store(available, Ordering::SeqCst);
    }

    /// Make lookups of the node at `path` fail (or succeed again) while the
    /// rest of the configuration service keeps answering.
    pub fn set_node_available(&self, path: &str, available: bool) {
        let key = names::resolve(path, "");
        if available {
            self.inner.unavailable_nodes.remove(&key);
        } else {
            self.inner.unavailable_nodes.insert(key);
        }
    }

    fn serves_rpc(&self) -> bool {
        self.is_reachable() && self.inner.rpc_available.load(Ordering::SeqCst)
    }

    fn request_state(&self, target: LifecycleState) -> Result<(), SdkError> {
        if !self.is_reachable() {
            return Err(SdkError::Unreachable(self.inner.name.clone()));
        }
        if target == LifecycleState::Unreachable {
            return Err(SdkError::Transition {
                participant: self.inner.name.clone(),
                target,
                reason: "not a lifecycle state".to_string(),
            });
        }
        if self.inner.frozen.load(Ordering::SeqCst) {
            debug!(participant = self.inner.name, %target, "frozen, ignoring transition");
            return Ok(());
        }
        let mut state = self
            .inner
            .state
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let from = *state;
        debug!(participant = self.inner.name, %from, to = %target, "state transition");
        *state = target;
        Ok(())
    }

    /// Returns `true` if `key` is a property or has properties below it.
    fn has_node(&self, key: &str) -> bool {
        if key.is_empty() {
            return true;
        }
        let prefix = format!("{key}/");
        self.inner
            .properties
            .iter()
            .any(|entry| entry.key() == key || entry.key().starts_with(&prefix))
    }

    fn set(&self, key: &str, value: &str, property_type: PropertyType) -> bool {
        let Some(mut entry) = self.inner.properties.get_mut(key) else {
            return false;
        };
        if entry.property_type != property_type || !property_type.accepts(value) {
            return false;
        }
        entry.value = value.to_string();
        true
    }
}

// ── Proxies ─────────────────────────────────────────────────────────────────

/// A [`LocalSystem`]'s view of a participant.
///
/// Priorities and file references belong to the system handle, not to the
/// participant, so two systems sharing a participant keep separate values.
#[derive(Debug, Clone)]
pub struct LocalParticipantProxy {
    remote: LocalParticipant,
    meta: Arc<ProxyMeta>,
}

#[derive(Debug, Default)]
struct ProxyMeta {
    init_priority: AtomicI32,
    start_priority: AtomicI32,
    file_references: RwLock<FileReferences>,
}

impl LocalParticipantProxy {
    /// The participant behind this proxy.
    #[must_use]
    pub fn remote(&self) -> &LocalParticipant {
        &self.remote
    }
}

impl Participant for LocalParticipantProxy {
    type Configuration = LocalConfiguration;

    fn name(&self) -> &str {
        self.remote.name()
    }

    fn init_priority(&self) -> i32 {
        self.meta.init_priority.load(Ordering::SeqCst)
    }

    fn set_init_priority(&self, priority: i32) -> Result<(), SdkError> {
        self.meta.init_priority.store(priority, Ordering::SeqCst);
        Ok(())
    }

    fn start_priority(&self) -> i32 {
        self.meta.start_priority.load(Ordering::SeqCst)
    }

    fn set_start_priority(&self, priority: i32) -> Result<(), SdkError> {
        self.meta.start_priority.store(priority, Ordering::SeqCst);
        Ok(())
    }

    fn file_references(&self) -> FileReferences {
        self.meta
            .file_references
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set_file_references(&self, references: FileReferences) -> Result<(), SdkError> {
        *self
            .meta
            .file_references
            .write()
            .unwrap_or_else(PoisonError::into_inner) = references;
        Ok(())
    }

    fn configuration(&self) -> Result<LocalConfiguration, SdkError> {
        if !self.remote.serves_rpc() {
            return Err(SdkError::Unreachable(self.remote.name().to_string()));
        }
        Ok(LocalConfiguration {
            remote: self.remote.clone(),
        })
    }
}

/// Configuration proxy of a [`LocalParticipant`].
#[derive(Debug, Clone)]
pub struct LocalConfiguration {
    remote: LocalParticipant,
}

impl ConfigurationRpc for LocalConfiguration {
    type Node = LocalPropertyNode;

    fn properties(&self, path: &str) -> Result<Option<LocalPropertyNode>, SdkError> {
        if !self.remote.serves_rpc() {
            return Err(SdkError::Unreachable(self.remote.name().to_string()));
        }
        let key = names::resolve(path, "");
        if self.remote.inner.unavailable_nodes.contains(&key) {
            return Err(SdkError::Unreachable(self.remote.name().to_string()));
        }
        if !self.remote.has_node(&key) {
            return Ok(None);
        }
        Ok(Some(LocalPropertyNode {
            remote: self.remote.clone(),
            path: format!("/{key}"),
        }))
    }
}

/// A node of a [`LocalParticipant`]'s property tree.
#[derive(Debug, Clone)]
pub struct LocalPropertyNode {
    remote: LocalParticipant,
    path: String,
}

impl PropertyNode for LocalPropertyNode {
    fn path(&self) -> &str {
        &self.path
    }

    fn set_property(&self, name: &str, value: &str, property_type: PropertyType) -> bool {
        let key = names::resolve(&self.path, name);
        let accepted = self.remote.set(&key, value, property_type);
        debug!(
            participant = self.remote.name(),
            property = key,
            value,
            %property_type,
            accepted,
            "set property"
        );
        accepted
    }

    fn property(&self, name: &str) -> Option<PropertyEntry> {
        self.remote
            .inner
            .properties
            .get(&names::resolve(&self.path, name))
            .map(|entry| entry.value().clone())
    }
}

// ── System ──────────────────────────────────────────────────────────────────

type Setting<'a> = (&'static str, &'a str, PropertyType);

/// A system of [`LocalParticipant`]s.
#[derive(Debug)]
pub struct LocalSystem {
    name: String,
    network: LocalNetwork,
    participants: Vec<LocalParticipantProxy>,
}

impl LocalSystem {
    /// Create an empty system resolving participants from `network`.
    #[must_use]
    pub fn new(name: impl Into<String>, network: LocalNetwork) -> Self {
        Self {
            name: name.into(),
            network,
            participants: Vec::new(),
        }
    }

    fn timing_error(&self, reason: String) -> SdkError {
        SdkError::Timing {
            system: self.name.clone(),
            reason,
        }
    }

    fn write(
        &self,
        participant: &LocalParticipantProxy,
        (key, value, property_type): Setting<'_>,
    ) -> Result<(), SdkError> {
        if !participant.remote.is_reachable() {
            return Err(SdkError::Unreachable(participant.name().to_string()));
        }
        if participant.remote.set(key, value, property_type) {
            Ok(())
        } else {
            Err(self.timing_error(format!(
                "participant '{}' rejected {key} = '{value}'",
                participant.name()
            )))
        }
    }

    /// Point every participant at `master` (or at no master) and write the
    /// per-role clock settings.
    fn configure_clocks(
        &self,
        master: Option<&str>,
        master_settings: &[Setting<'_>],
        slave_settings: &[Setting<'_>],
    ) -> Result<(), SdkError> {
        if let Some(master) = master {
            if !self.participants.iter().any(|p| p.name() == master) {
                return Err(self.timing_error(format!(
                    "timing master '{master}' is not a participant"
                )));
            }
        }

        for participant in &self.participants {
            let settings = if master == Some(participant.name()) {
                master_settings
            } else {
                slave_settings
            };
            self.write(
                participant,
                (clock_sync::TIMING_MASTER, master.unwrap_or(""), PropertyType::String),
            )?;
            for setting in settings {
                self.write(participant, *setting)?;
            }
            self.write(
                participant,
                (scheduler::SCHEDULER, scheduler::CLOCK_BASED, PropertyType::String),
            )?;
        }

        info!(
            system = self.name,
            master = master.unwrap_or(""),
            participants = self.participants.len(),
            "timing configured"
        );
        Ok(())
    }
}

impl System for LocalSystem {
    type Participant = LocalParticipantProxy;

    fn name(&self) -> &str {
        &self.name
    }

    fn add_participant(&mut self, name: &str) -> Result<LocalParticipantProxy, SdkError> {
        if self.participants.iter().any(|p| p.name() == name) {
            return Err(SdkError::DuplicateParticipant(name.to_string()));
        }
        let remote = self
            .network
            .participant(name)
            .ok_or_else(|| SdkError::ParticipantNotFound(name.to_string()))?;
        let proxy = LocalParticipantProxy {
            remote,
            meta: Arc::default(),
        };
        self.participants.push(proxy.clone());
        debug!(system = self.name, participant = name, "participant added");
        Ok(proxy)
    }

    fn participant(&self, name: &str) -> Option<LocalParticipantProxy> {
        self.participants.iter().find(|p| p.name() == name).cloned()
    }

    fn participants(&self) -> Vec<LocalParticipantProxy> {
        self.participants.clone()
    }

    fn set_state(&mut self, state: LifecycleState) -> Result<(), SdkError> {
        for participant in &self.participants {
            participant.remote.request_state(state)?;
        }
        info!(system = self.name, %state, "system state requested");
        Ok(())
    }

    fn state(&self) -> Result<SystemState, SdkError> {
        Ok(SystemState::aggregate(
            self.participants.iter().map(|p| p.remote.state()),
        ))
    }

    fn configure_timing3_no_master(&mut self) -> Result<(), SdkError> {
        let free_running = [(clock::MAIN_CLOCK, clock::LOCAL_SYSTEM_REAL_TIME, PropertyType::String)];
        self.configure_clocks(None, &free_running, &free_running)
    }

    fn configure_timing3_clock_sync_only_interpolation(
        &mut self,
        master_element_id: &str,
        slave_time_stepsize: &str,
    ) -> Result<(), SdkError> {
        self.configure_clocks(
            Some(master_element_id),
            &[(clock::MAIN_CLOCK, clock::LOCAL_SYSTEM_REAL_TIME, PropertyType::String)],
            &[
                (clock::MAIN_CLOCK, clock::SLAVE_MASTER_ON_DEMAND, PropertyType::String),
                (clock_sync::SYNC_CYCLE_TIME, slave_time_stepsize, PropertyType::Int),
            ],
        )
    }

    fn configure_timing3_clock_sync_only_discrete(
        &mut self,
        master_element_id: &str,
        slave_time_stepsize: &str,
    ) -> Result<(), SdkError> {
        self.configure_clocks(
            Some(master_element_id),
            &[(clock::MAIN_CLOCK, clock::LOCAL_SYSTEM_REAL_TIME, PropertyType::String)],
            &[
                (clock::MAIN_CLOCK, clock::SLAVE_MASTER_ON_DEMAND_DISCRETE, PropertyType::String),
                (clock_sync::SYNC_CYCLE_TIME, slave_time_stepsize, PropertyType::Int),
            ],
        )
    }

    fn configure_timing3_discrete_steps(
        &mut self,
        master_element_id: &str,
        master_time_stepsize: &str,
        master_time_factor: &str,
    ) -> Result<(), SdkError> {
        self.configure_clocks(
            Some(master_element_id),
            &[
                (clock::MAIN_CLOCK, clock::LOCAL_SYSTEM_SIM_TIME, PropertyType::String),
                (clock::CYCLE_TIME, master_time_stepsize, PropertyType::Int),
                (clock::TIME_FACTOR, master_time_factor, PropertyType::Double),
            ],
            &[(clock::MAIN_CLOCK, clock::SLAVE_MASTER_ON_DEMAND_DISCRETE, PropertyType::String)],
        )
    }

    fn configure_timing3_afap(
        &mut self,
        master_element_id: &str,
        master_time_stepsize: &str,
    ) -> Result<(), SdkError> {
        // The AFAP clock cycles at half the declared step size.
        let cycle_time = master_time_stepsize
            .trim()
            .parse::<i64>()
            .map(|step| (step / 2).to_string())
            .map_err(|_| {
                self.timing_error(format!(
                    "invalid master time step size '{master_time_stepsize}'"
                ))
            })?;
        let time_factor = format!("{:.1}", clock::AFAP_TIME_FACTOR);
        self.configure_clocks(
            Some(master_element_id),
            &[
                (clock::MAIN_CLOCK, clock::LOCAL_SYSTEM_SIM_TIME, PropertyType::String),
                (clock::CYCLE_TIME, &cycle_time, PropertyType::Int),
                (clock::TIME_FACTOR, &time_factor, PropertyType::Double),
            ],
            &[(clock::MAIN_CLOCK, clock::SLAVE_MASTER_ON_DEMAND_DISCRETE, PropertyType::String)],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_participant_system() -> (LocalNetwork, LocalSystem) {
        let network = LocalNetwork::new();
        for name in ["participant1", "participant2"] {
            let p = network.spawn(name);
            p.register_property("test_config/pos1", PropertyType::Double, "0.0");
            p.register_property("system/system_parameter", PropertyType::Int, "1");
        }
        let mut system = network.create_system("FEP_SYSTEM").unwrap();
        system.add_participant("participant1").unwrap();
        system.add_participant("participant2").unwrap();
        (network, system)
    }

    fn value(network: &LocalNetwork, participant: &str, path: &str) -> String {
        network
            .participant(participant)
            .unwrap()
            .property_value(path)
            .unwrap()
    }

    #[test]
    fn test_add_resolves_running_participants() {
        let (network, mut system) = two_participant_system();
        assert_eq!(network.len(), 2);
        assert_eq!(system.participants().len(), 2);
        assert_eq!(
            system.add_participant("participant1").unwrap_err(),
            SdkError::DuplicateParticipant("participant1".to_string())
        );
        assert_eq!(
            system.add_participant("ghost").unwrap_err(),
            SdkError::ParticipantNotFound("ghost".to_string())
        );
    }

    #[test]
    fn test_proxy_metadata_is_per_system() {
        let (network, system) = two_participant_system();
        let mut other = network.create_system("OTHER").unwrap();
        let p_other = other.add_participant("participant1").unwrap();
        let p = system.participant("participant1").unwrap();

        p.set_init_priority(5).unwrap();
        p.set_file_references(FileReferences {
            timing_file_reference: Some("/t.xml".to_string()),
            ..FileReferences::default()
        })
        .unwrap();

        assert_eq!(system.participant("participant1").unwrap().init_priority(), 5);
        assert_eq!(p_other.init_priority(), 0);
        assert!(p_other.file_references().is_empty());
        assert_eq!(
            p.file_references().get(FileReferences::TIMING_FILE_REFERENCE),
            Some("/t.xml")
        );
    }

    #[test]
    fn test_state_transitions_and_frozen_participant() {
        let (network, mut system) = two_participant_system();
        assert!(system.state().unwrap().is_homogeneous(LifecycleState::Unloaded));

        system.set_state(LifecycleState::Loaded).unwrap();
        assert!(system.state().unwrap().is_homogeneous(LifecycleState::Loaded));

        network.participant("participant2").unwrap().set_frozen(true);
        system.set_state(LifecycleState::Running).unwrap();
        let state = system.state().unwrap();
        assert_eq!(state.state, LifecycleState::Loaded);
        assert!(!state.homogeneous);
    }

    #[test]
    fn test_unreachable_participant() {
        let (network, mut system) = two_participant_system();
        network.participant("participant1").unwrap().set_reachable(false);

        assert_eq!(
            system.set_state(LifecycleState::Loaded).unwrap_err(),
            SdkError::Unreachable("participant1".to_string())
        );
        let proxy = system.participant("participant1").unwrap();
        assert!(proxy.configuration().is_err());
        assert_eq!(system.state().unwrap().state, LifecycleState::Unreachable);
    }

    #[test]
    fn test_property_nodes() {
        let (network, system) = two_participant_system();
        let config = system
            .participant("participant1")
            .unwrap()
            .configuration()
            .unwrap();

        let root = config.properties("/").unwrap().unwrap();
        assert_eq!(root.path(), "/");
        assert!(root.set_property("test_config/pos1", "1.234", PropertyType::Double));
        assert!(root.set_property("/test_config/pos1", "2.5", PropertyType::Double));
        assert!(!root.set_property("test_config.pos1", "1.0", PropertyType::Double));
        assert!(!root.set_property("test_config/pos1", "1.0", PropertyType::Int));
        assert!(!root.set_property("test_config/pos1", "abc", PropertyType::Double));
        assert_eq!(value(&network, "participant1", "test_config/pos1"), "2.5");

        let system_node = config.properties("/system").unwrap().unwrap();
        assert_eq!(system_node.path(), "/system");
        assert!(system_node.set_property("system_parameter", "42", PropertyType::Int));
        assert_eq!(
            root.property("/system/system_parameter").unwrap().value,
            "42"
        );

        assert!(config.properties("/does_not_exist").unwrap().is_none());
    }

    #[test]
    fn test_single_node_unavailable() {
        let (network, system) = two_participant_system();
        let participant = network.participant("participant1").unwrap();
        participant.set_node_available("/system", false);
        let config = system
            .participant("participant1")
            .unwrap()
            .configuration()
            .unwrap();

        assert!(config.properties("/").unwrap().is_some());
        assert_eq!(
            config.properties("/system").unwrap_err(),
            SdkError::Unreachable("participant1".to_string())
        );

        participant.set_node_available("system/", true);
        assert!(config.properties("/system").unwrap().is_some());
    }

    #[test]
    fn test_timing_failure_keeps_earlier_participants() {
        let (network, mut system) = two_participant_system();
        network
            .participant("participant2")
            .unwrap()
            .register_property(clock::MAIN_CLOCK, PropertyType::Int, "0");

        let err = system
            .configure_timing3_discrete_steps("participant1", "10", "1.0")
            .unwrap_err();

        assert!(err.to_string().contains("participant 'participant2' rejected clock/main_clock"));
        assert_eq!(value(&network, "participant1", clock::CYCLE_TIME), "10");
        assert_eq!(
            value(&network, "participant1", clock::MAIN_CLOCK),
            clock::LOCAL_SYSTEM_SIM_TIME
        );
    }

    #[test]
    fn test_no_master() {
        let (network, mut system) = two_participant_system();
        system.configure_timing3_no_master().unwrap();
        for name in ["participant1", "participant2"] {
            assert_eq!(value(&network, name, clock_sync::TIMING_MASTER), "");
            assert_eq!(value(&network, name, clock::MAIN_CLOCK), clock::LOCAL_SYSTEM_REAL_TIME);
            assert_eq!(value(&network, name, scheduler::SCHEDULER), scheduler::CLOCK_BASED);
        }
    }

    #[test]
    fn test_clock_sync_only_interpolation() {
        let (network, mut system) = two_participant_system();
        system
            .configure_timing3_clock_sync_only_interpolation("participant2", "10")
            .unwrap();
        assert_eq!(value(&network, "participant1", clock::MAIN_CLOCK), clock::SLAVE_MASTER_ON_DEMAND);
        assert_eq!(value(&network, "participant1", clock_sync::SYNC_CYCLE_TIME), "10");
        assert_eq!(value(&network, "participant1", clock_sync::TIMING_MASTER), "participant2");
        assert_eq!(value(&network, "participant2", clock::MAIN_CLOCK), clock::LOCAL_SYSTEM_REAL_TIME);
        assert_eq!(value(&network, "participant2", clock_sync::TIMING_MASTER), "participant2");
    }

    #[test]
    fn test_discrete_steps() {
        let (network, mut system) = two_participant_system();
        system
            .configure_timing3_discrete_steps("participant2", "50", "0.5")
            .unwrap();
        assert_eq!(
            value(&network, "participant1", clock::MAIN_CLOCK),
            clock::SLAVE_MASTER_ON_DEMAND_DISCRETE
        );
        assert_eq!(value(&network, "participant2", clock::MAIN_CLOCK), clock::LOCAL_SYSTEM_SIM_TIME);
        assert_eq!(value(&network, "participant2", clock::CYCLE_TIME), "50");
        assert_eq!(value(&network, "participant2", clock::TIME_FACTOR), "0.5");
    }

    #[test]
    fn test_afap_halves_step_size() {
        let (network, mut system) = two_participant_system();
        system.configure_timing3_afap("participant2", "100").unwrap();
        assert_eq!(value(&network, "participant2", clock::CYCLE_TIME), "50");
        let factor: f64 = value(&network, "participant2", clock::TIME_FACTOR).parse().unwrap();
        assert!((factor - clock::AFAP_TIME_FACTOR).abs() < f64::EPSILON);
        assert_eq!(
            value(&network, "participant1", clock::MAIN_CLOCK),
            clock::SLAVE_MASTER_ON_DEMAND_DISCRETE
        );
    }

    #[test]
    fn test_unknown_master_rejected() {
        let (_network, mut system) = two_participant_system();
        let err = system.configure_timing3_afap("participant9", "100").unwrap_err();
        assert!(matches!(err, SdkError::Timing { .. }));
        let err = system
            .configure_timing3_clock_sync_only_discrete("", "100")
            .unwrap_err();
        assert!(err.to_string().contains("timing master ''"));
    }

    #[test]
    fn test_invalid_step_size_rejected() {
        let (_network, mut system) = two_participant_system();
        let err = system
            .configure_timing3_discrete_steps("participant2", "fast", "1.0")
            .unwrap_err();
        assert!(err.to_string().contains("rejected clock/cycle_time"));
        let err = system.configure_timing3_afap("participant2", "fast").unwrap_err();
        assert!(err.to_string().contains("invalid master time step size"));
    }
}
