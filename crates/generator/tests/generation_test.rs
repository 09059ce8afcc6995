//! Integration test for stub generation

use protostub_common::RpcRecord;
use protostub_generator::{compile_and_prepare, StubGenerator, StubSpec};
use protostub_parser::parse_str;
use std::path::Path;
use tempfile::TempDir;

const GREETER_PROTO: &str = r#"
syntax = "proto3";

package helloworld;

service Greeter {
  rpc SayHello (HelloRequest) returns (HelloReply) {}
}

message HelloRequest {
  string name = 1;
}

message HelloReply {
  string message = 1;
}
"#;

/// Stub expected for the greeter service
const GREETER_STUB: &str = r#"#include <cstddef>
#include <cstdint>
#include <cstdlib>
#include <src/libfuzzer/libfuzzer_macro.h>

#include "pkg/web_app/grpc_driver/example/greeter.pb.h"

namespace {
const char *methods[] = {
    "/helloworld.Greeter/SayHello",
};

constexpr size_t kNumMethods = sizeof(methods) / sizeof(methods[0]);
}

extern "C" const char *proto_stub_get_method(uint32_t index) {
  return methods[index % kNumMethods];
}

extern "C" size_t proto_stub_mutate(uint32_t index, uint8_t* data, size_t size, size_t max_size, uint32_t seed) {
  uint32_t fixed_index = index % kNumMethods;
  switch (fixed_index) {
    case 0: {
      helloworld::HelloRequest message;
      return protobuf_mutator::libfuzzer::CustomProtoMutator(true, data, size, max_size, seed, &message);
    }
  }
  abort();
}
"#;

fn greeter_spec() -> StubSpec {
    let file = parse_str(GREETER_PROTO).unwrap();
    StubSpec::from_proto_file(
        &file,
        Path::new("protos/greeter.proto"),
        None,
        "pkg/web_app/grpc_driver/example",
    )
}

#[test]
fn test_generate_greeter_stub() {
    let spec = greeter_spec();
    assert_eq!(spec.package, "helloworld");
    assert_eq!(
        spec.header_include,
        "pkg/web_app/grpc_driver/example/greeter.pb.h"
    );

    let generator = StubGenerator::new(spec).unwrap();
    let rendered = generator.render().unwrap();

    assert_eq!(rendered.trim_end(), GREETER_STUB.trim_end());
}

#[test]
fn test_methods_follow_declaration_order() {
    let file = parse_str(
        r#"package shop.v1;
service Basket {
  rpc Get(GetReq) returns (Basket);
  rpc Put(PutReq) returns (Basket) {
    option (google.api.http) = {
      put: "/v1/basket"
      body: "*"
    };
  }
}
service Admin {
  rpc Reset(google.protobuf.Empty) returns (google.protobuf.Empty);
}
"#,
    )
    .unwrap();

    let spec = StubSpec::from_proto_file(&file, Path::new("shop.proto"), None, ".");
    let rendered = StubGenerator::new(spec).unwrap().render().unwrap();

    assert!(rendered.contains("#include \"shop.pb.h\""));

    let get = rendered.find("\"/shop.v1.Basket/Get\",").unwrap();
    let put = rendered.find("\"/shop.v1.Basket/Put\",").unwrap();
    let reset = rendered.find("\"/shop.v1.Admin/Reset\",").unwrap();
    assert!(get < put && put < reset);

    assert!(rendered.contains("case 0: {\n      shop::v1::GetReq message;"));
    assert!(rendered.contains("case 1: {\n      shop::v1::PutReq message;"));
    assert!(rendered.contains("case 2: {\n      google::protobuf::Empty message;"));
    assert!(!rendered.contains("case 3:"));
}

#[test]
fn test_package_override_and_stem_fallback() {
    let file = parse_str("service S {\n  rpc Do(DoReq) returns (DoResp);\n}\n").unwrap();

    let spec = StubSpec::from_proto_file(&file, Path::new("ops.proto"), None, ".");
    assert_eq!(spec.package, "ops");

    let spec = StubSpec::from_proto_file(&file, Path::new("ops.proto"), Some("acme.ops"), ".");
    let rendered = StubGenerator::new(spec).unwrap().render().unwrap();
    assert!(rendered.contains("\"/acme.ops.S/Do\","));
    assert!(rendered.contains("acme::ops::DoReq message;"));
}

#[test]
fn test_generate_to_file() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().join("stubs").join("greeter_stub.cc");

    let generator = StubGenerator::new(greeter_spec()).unwrap();
    let result = generator.generate_to_file(&output_path);
    assert!(result.is_ok(), "Generation failed: {:?}", result);

    let written = std::fs::read_to_string(&output_path).unwrap();
    assert_eq!(written, generator.render().unwrap());
}

#[test]
fn test_prepared_generator_writes_stub() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().join("stub.cc");

    let spec = StubSpec {
        package: "demo".to_string(),
        header_include: "demo.pb.h".to_string(),
        rpcs: vec![RpcRecord {
            service_name: "Echo".to_string(),
            rpc_name: "Say".to_string(),
            request_type_name: "SayRequest".to_string(),
        }],
    };

    let generator =
        compile_and_prepare(None, Path::new("demo.proto"), Path::new("."), spec).unwrap();
    generator.generate_to_file(&output_path).unwrap();
    let written = std::fs::read_to_string(&output_path).unwrap();
    assert!(written.contains("\"/demo.Echo/Say\","));
}

#[test]
fn test_file_without_services_cannot_be_stubbed() {
    let file = parse_str("message A {\n  string x = 1;\n}\n").unwrap();
    let spec = StubSpec::from_proto_file(&file, Path::new("a.proto"), None, ".");
    assert!(StubGenerator::new(spec).is_err());
}
