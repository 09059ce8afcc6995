//! Stub generation settings loaded from YAML
//!
//! Every setting is optional so a config file only needs the values that
//! differ from the defaults. Command-line flags take precedence over values
//! read here.

use crate::{GeneratorError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Directory the compiled `.pb.h` headers are expected in when none is configured
pub const DEFAULT_PROTO_OUT: &str = ".";

/// Root structure of a protostub YAML config file
///
/// ```yaml
/// protoc: /usr/local/bin/protoc
/// proto_out: build/proto
/// include_dir: pkg/web_app/grpc_driver/example
/// package: helloworld
/// output: build/greeter_stub.cc
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StubConfig {
    /// protoc binary; the schema is only compiled when this is set
    #[serde(default)]
    pub protoc: Option<PathBuf>,
    /// Output directory passed to `protoc --cpp_out`
    #[serde(default)]
    pub proto_out: Option<PathBuf>,
    /// Directory prefix of the generated header in the stub's `#include`.
    /// Falls back to `proto_out`.
    #[serde(default)]
    pub include_dir: Option<String>,
    /// Package used in method paths and the C++ namespace
    #[serde(default)]
    pub package: Option<String>,
    /// File the stub is written to; stdout when unset
    #[serde(default)]
    pub output: Option<PathBuf>,
}

impl StubConfig {
    /// Load a config from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            GeneratorError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        Self::from_yaml_str(&content).map_err(|e| match e {
            GeneratorError::Config(msg) => {
                GeneratorError::Config(format!("{} (in {:?})", msg, path))
            }
            other => other,
        })
    }

    /// Parse a config from YAML text
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        // An empty document deserializes to unit, not to a map
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_yaml::from_str(content)
            .map_err(|e| GeneratorError::Config(format!("Failed to parse config YAML: {}", e)))
    }

    /// Combine with `overrides`, whose set values take precedence
    pub fn merged_with(self, overrides: StubConfig) -> StubConfig {
        StubConfig {
            protoc: overrides.protoc.or(self.protoc),
            proto_out: overrides.proto_out.or(self.proto_out),
            include_dir: overrides.include_dir.or(self.include_dir),
            package: overrides.package.or(self.package),
            output: overrides.output.or(self.output),
        }
    }

    /// Directory for protoc output, defaulting to the working directory
    pub fn proto_out_dir(&self) -> PathBuf {
        self.proto_out
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PROTO_OUT))
    }

    /// Directory prefix for the stub's header include
    pub fn header_include_dir(&self) -> String {
        self.include_dir
            .clone()
            .unwrap_or_else(|| self.proto_out_dir().to_string_lossy().into_owned())
    }
}
