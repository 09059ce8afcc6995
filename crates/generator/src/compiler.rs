//! Schema compiler invocation
//!
//! The generated stub includes the C++ header produced by `protoc`. Compiling
//! is optional and independent from extraction; it only has to happen before
//! the stub itself is built.

use protostub_common::{GeneratorError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Compiles a schema source into native code
#[cfg_attr(test, mockall::automock)]
pub trait SchemaCompiler {
    /// Compile `source`, writing generated files into `out_dir`
    fn compile(&self, source: &Path, out_dir: &Path) -> Result<()>;
}

/// Runs `protoc -I <dir> <source> --cpp_out=<out_dir>`
#[derive(Debug, Clone)]
pub struct ProtocCompiler {
    protoc: PathBuf,
}

impl ProtocCompiler {
    pub fn new(protoc: impl Into<PathBuf>) -> Self {
        Self {
            protoc: protoc.into(),
        }
    }

    pub fn protoc(&self) -> &Path {
        &self.protoc
    }

    /// Arguments passed to protoc for `source`
    pub fn arguments(&self, source: &Path, out_dir: &Path) -> Vec<String> {
        let include_dir = source
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        vec![
            "-I".to_string(),
            include_dir.display().to_string(),
            source.display().to_string(),
            format!("--cpp_out={}", out_dir.display()),
        ]
    }
}

impl SchemaCompiler for ProtocCompiler {
    fn compile(&self, source: &Path, out_dir: &Path) -> Result<()> {
        fs::create_dir_all(out_dir).map_err(|e| {
            GeneratorError::Generation(format!(
                "Failed to create protoc output directory {}: {}",
                out_dir.display(),
                e
            ))
        })?;

        let args = self.arguments(source, out_dir);
        tracing::debug!(protoc = %self.protoc.display(), ?args, "running schema compiler");

        let output = Command::new(&self.protoc).args(&args).output().map_err(|e| {
            GeneratorError::Generation(format!(
                "Failed to run {}: {}",
                self.protoc.display(),
                e
            ))
        })?;

        if !output.status.success() {
            return Err(GeneratorError::Generation(format!(
                "{} exited with {}: {}",
                self.protoc.display(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protoc_arguments() {
        let compiler = ProtocCompiler::new("/usr/bin/protoc");
        let args = compiler.arguments(Path::new("protos/greeter.proto"), Path::new("build"));

        assert_eq!(
            args,
            vec!["-I", "protos", "protos/greeter.proto", "--cpp_out=build"]
        );
    }

    #[test]
    fn test_protoc_arguments_for_bare_file_name() {
        let compiler = ProtocCompiler::new("protoc");
        let args = compiler.arguments(Path::new("greeter.proto"), Path::new("."));
        assert_eq!(args[1], ".");
    }

    #[test]
    fn test_missing_protoc_binary() {
        let out_dir = tempfile::tempdir().unwrap();
        let compiler = ProtocCompiler::new("/nonexistent/bin/protoc");

        let err = compiler
            .compile(Path::new("greeter.proto"), out_dir.path())
            .unwrap_err();
        assert!(err.to_string().contains("Failed to run"));
    }
}
