//! Fixtures shared by the integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use controller_model::PropertyType;
use controller_sdk::{LocalNetwork, LocalParticipant};
use tempfile::TempDir;

pub const SYSTEM_NAME: &str = "FEP_SYSTEM";

pub const TWO_PARTICIPANTS: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<fep:system xmlns:fep="http://www.fep.audi.com/fep_sdk_system">
  <schema_version>1.0.0</schema_version>
  <name>FEP_SYSTEM</name>
  <participants>
    <participant>
      <element_instance>
        <id>participant1</id>
        <timing><file_reference>timing/../timing/participant1_timing.xml</file_reference></timing>
        <input_mapping><file_reference>$(FEP_MAPPINGS)/../input.map</file_reference></input_mapping>
      </element_instance>
      <init_priority>0</init_priority>
      <start_priority>0</start_priority>
    </participant>
    <participant>
      <element_instance>
        <id>participant2</id>
        <output_mapping><file_reference>/opt/./maps/output.map</file_reference></output_mapping>
      </element_instance>
      <init_priority>1</init_priority>
      <start_priority>1</start_priority>
    </participant>
  </participants>
</fep:system>"#;

pub const PROPERTIES: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<system_properties>
  <system>
    <properties>
      <property><name>system_parameter</name><value>42</value><type>int</type></property>
    </properties>
  </system>
  <participants>
    <participant>
      <id>participant1</id>
      <properties>
        <property><name>test_config/pos1</name><value>1.234</value><type>double</type></property>
        <property><name>/test_config/bool_value</name><value>true</value><type>bool</type></property>
        <property><name>test_config/string_test</name><value>this is a string</value><type>string</type></property>
      </properties>
    </participant>
    <participant>
      <id>participant2</id>
      <properties>
        <property><name>test_config/double_pos2</name><value>2.2</value><type>double</type></property>
        <property><name>test_config/parameter1</name><value>5</value><type>int</type></property>
      </properties>
    </participant>
  </participants>
  <timing>
    <properties>
      <property><name>timing_configuration_type</name><value>Timing3AFAP</value></property>
      <property><name>master_element_id</name><value>participant2</value></property>
      <property><name>master_time_stepsize</name><value>100</value></property>
    </properties>
  </timing>
</system_properties>"#;

/// Start a participant with the test configuration tree and a `/system` node.
pub fn spawn_test_participant(network: &LocalNetwork, name: &str) -> LocalParticipant {
    let participant = network.spawn(name);
    participant.register_property("test_config/pos1", PropertyType::Double, "0.0");
    participant.register_property("test_config/bool_value", PropertyType::Bool, "false");
    participant.register_property("test_config/double_pos2", PropertyType::Double, "1.1");
    participant.register_property("test_config/string_test", PropertyType::String, "empty");
    participant.register_property("test_config/parameter1", PropertyType::Int, "1");
    participant.register_property("test_config/pos_X", PropertyType::Int, "11");
    participant.register_property("system/system_parameter", PropertyType::Int, "1");
    participant
}

/// A network running `participant1` and `participant2`.
pub fn test_network() -> LocalNetwork {
    let network = LocalNetwork::new();
    spawn_test_participant(&network, "participant1");
    spawn_test_participant(&network, "participant2");
    network
}

/// A temporary directory holding fixture files.
pub struct Fixture {
    pub dir: TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    /// A fixture directory created below the process working directory.
    pub fn new_in_working_dir() -> Self {
        Self {
            dir: tempfile::Builder::new()
                .prefix("fixture")
                .tempdir_in(".")
                .unwrap(),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// The fixture directory relative to the process working directory.
    pub fn relative_path(&self) -> PathBuf {
        let path = self.dir.path();
        if path.is_relative() {
            return path.to_path_buf();
        }
        let cwd = std::env::current_dir().unwrap();
        path.strip_prefix(&cwd).unwrap().to_path_buf()
    }

    /// Write `contents` to `name` below the fixture directory.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, contents).unwrap();
        path
    }

    /// A property file whose timing block holds `timing` as
    /// `(name, value)` pairs and nothing else.
    pub fn write_timing(&self, name: &str, timing: &[(&str, &str)]) -> PathBuf {
        let entries: String = timing
            .iter()
            .map(|(k, v)| format!("<property><name>{k}</name><value>{v}</value></property>"))
            .collect();
        self.write(
            name,
            &format!("<system_properties><timing><properties>{entries}</properties></timing></system_properties>"),
        )
    }
}

pub fn value(network: &LocalNetwork, participant: &str, path: &str) -> String {
    network
        .participant(participant)
        .unwrap()
        .property_value(path)
        .unwrap()
}
