//! Well-known participant property names and values.
//!
//! Paths are relative to a participant's root node, without a leading slash.

/// Root property node.
pub const ROOT_NODE: &str = "/";

/// Node holding system-scoped properties.
pub const SYSTEM_NODE: &str = "/system";

/// Clock service.
pub mod clock {
    /// Name of the clock driving the participant.
    pub const MAIN_CLOCK: &str = "clock/main_clock";
    /// Time factor of the simulation time clock.
    pub const TIME_FACTOR: &str = "clock/time_factor";
    /// Cycle time of the simulation time clock.
    pub const CYCLE_TIME: &str = "clock/cycle_time";

    /// Continuous local real-time clock.
    pub const LOCAL_SYSTEM_REAL_TIME: &str = "local_system_realtime";
    /// Discrete local simulation time clock.
    pub const LOCAL_SYSTEM_SIM_TIME: &str = "local_system_simtime";
    /// Continuous slave clock, synchronized on demand.
    pub const SLAVE_MASTER_ON_DEMAND: &str = "slave_master_on_demand";
    /// Discrete slave clock, driven by master events.
    pub const SLAVE_MASTER_ON_DEMAND_DISCRETE: &str = "slave_master_on_demand_discrete";

    /// Time factor meaning "as fast as possible".
    pub const AFAP_TIME_FACTOR: f64 = 0.0;
}

/// Clock synchronization service.
pub mod clock_sync {
    /// Id of the timing master; empty for none.
    pub const TIMING_MASTER: &str = "clock_synchronization/timing_master";
    /// Synchronization cycle time of slave clocks.
    pub const SYNC_CYCLE_TIME: &str = "clock_synchronization/sync_cycle_time";
}

/// Scheduler service.
pub mod scheduler {
    /// Name of the active scheduler.
    pub const SCHEDULER: &str = "scheduling/scheduler";
    /// Scheduler triggering jobs from the main clock.
    pub const CLOCK_BASED: &str = "clock_based_scheduler";
}

/// Resolve `name` below the node at `node_path`.
///
/// Leading and trailing slashes are insignificant on both sides, so
/// `("/", "/a/b")`, `("/", "a/b")` and `("/a", "b")` all give `"a/b"`.
#[must_use]
pub fn resolve(node_path: &str, name: &str) -> String {
    let node = node_path.trim_matches('/');
    let name = name.trim_matches('/');
    match (node.is_empty(), name.is_empty()) {
        (true, _) => name.to_string(),
        (false, true) => node.to_string(),
        (false, false) => format!("{node}/{name}"),
    }
}
