//! Fuzzing stub generation
//!
//! This crate transforms the rpcs extracted from a schema into a C++ stub for
//! a libFuzzer / libprotobuf-mutator harness:
//! - `proto_stub_get_method(index)` returns `"/{package}.{service}/{rpc}"`
//! - `proto_stub_mutate(index, ...)` mutates a message of the rpc's request type
//!
//! Both index modulo the number of rpcs, in declaration order.

mod compiler;
mod templates;

pub use compiler::{ProtocCompiler, SchemaCompiler};
pub use templates::cpp_type_name;

use protostub_common::{GeneratorError, ProtoFile, Result, RpcRecord};
use serde::Serialize;
use std::fs;
use std::path::Path;
use tera::Tera;

/// Everything the stub template needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StubSpec {
    /// Package used in method paths and the C++ namespace
    pub package: String,
    /// Path of the compiled schema header, as written in `#include`
    pub header_include: String,
    /// Rpcs in dispatch order
    pub rpcs: Vec<RpcRecord>,
}

impl StubSpec {
    /// Build the stub description for a parsed file
    ///
    /// `package_override` wins over the file's `package` statement; the file
    /// stem is the last resort.
    pub fn from_proto_file(
        file: &ProtoFile,
        source_path: &Path,
        package_override: Option<&str>,
        include_dir: &str,
    ) -> Self {
        Self {
            package: resolve_package(package_override, file, source_path),
            header_include: header_include(include_dir, source_path),
            rpcs: file.rpc_records(),
        }
    }
}

/// Package name for method paths
pub fn resolve_package(
    package_override: Option<&str>,
    file: &ProtoFile,
    source_path: &Path,
) -> String {
    package_override
        .map(str::to_string)
        .or_else(|| file.package.clone())
        .unwrap_or_else(|| {
            let stem = file_stem(source_path);
            stem.split('.').next().unwrap_or_default().to_string()
        })
}

/// `#include` path of the header protoc generates for `source_path`
pub fn header_include(include_dir: &str, source_path: &Path) -> String {
    let header = format!("{}.pb.h", file_stem(source_path));
    let dir = include_dir.trim_end_matches('/');

    if dir.is_empty() || dir == "." {
        header
    } else {
        format!("{}/{}", dir, header)
    }
}

/// gRPC method path `/{package}.{service}/{rpc}`
pub fn method_path(package: &str, record: &RpcRecord) -> String {
    if package.is_empty() {
        format!("/{}/{}", record.service_name, record.rpc_name)
    } else {
        format!("/{}.{}/{}", package, record.service_name, record.rpc_name)
    }
}

/// protoc names its output after the full stem: `greeter.v1.proto` -> `greeter.v1.pb.h`
fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// One entry of the method table and dispatch switch
#[derive(Debug, Serialize)]
struct MethodEntry<'a> {
    index: usize,
    path: String,
    request: &'a str,
}

/// Fuzzing stub generator
///
/// Renders a [`StubSpec`] through the `fuzz_stub.cc` template.
pub struct StubGenerator {
    spec: StubSpec,
    tera: Tera,
}

impl StubGenerator {
    /// Create a generator; a spec without rpcs is rejected since the
    /// dispatch table would be empty
    pub fn new(spec: StubSpec) -> Result<Self> {
        if spec.rpcs.is_empty() {
            return Err(GeneratorError::Generation(
                "No rpcs found; a stub needs at least one service method".to_string(),
            ));
        }

        let tera = templates::load_templates()?;
        Ok(Self { spec, tera })
    }

    pub fn spec(&self) -> &StubSpec {
        &self.spec
    }

    /// Render the stub source
    pub fn render(&self) -> Result<String> {
        let context = self.create_context();
        self.tera
            .render(templates::STUB_TEMPLATE, &context)
            .map_err(|e| GeneratorError::Generation(format!("Template error: {:?}", e)))
    }

    /// Render the stub and write it to `output_path`
    pub fn generate_to_file(&self, output_path: &Path) -> Result<()> {
        let rendered = self.render()?;

        if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                GeneratorError::Generation(format!("Failed to create output directory: {}", e))
            })?;
        }

        fs::write(output_path, rendered).map_err(|e| {
            GeneratorError::Generation(format!(
                "Failed to write {}: {}",
                output_path.display(),
                e
            ))
        })?;

        tracing::debug!(path = %output_path.display(), rpcs = self.spec.rpcs.len(), "wrote stub");
        Ok(())
    }

    /// Create template context from the StubSpec
    fn create_context(&self) -> tera::Context {
        let methods: Vec<MethodEntry> = self
            .spec
            .rpcs
            .iter()
            .enumerate()
            .map(|(index, record)| MethodEntry {
                index,
                path: method_path(&self.spec.package, record),
                request: &record.request_type_name,
            })
            .collect();

        let mut context = tera::Context::new();
        context.insert("include", &self.spec.header_include);
        context.insert("package", &self.spec.package);
        context.insert("methods", &methods);
        context
    }
}

/// Compile the schema when a compiler is given, then build its stub generator
///
/// Compilation failures abort before anything is rendered.
pub fn compile_and_prepare(
    compiler: Option<&dyn SchemaCompiler>,
    source_path: &Path,
    proto_out: &Path,
    spec: StubSpec,
) -> Result<StubGenerator> {
    if let Some(compiler) = compiler {
        compiler.compile(source_path, proto_out)?;
    }

    StubGenerator::new(spec)
}
