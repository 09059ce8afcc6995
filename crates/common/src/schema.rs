//! Extracted schema model
//!
//! The extractor produces a tree of [`ScopedSection`]s. Each section keeps its
//! children as an ordered sequence of [`Declaration`]s so that source order is
//! preserved across kinds; the per-kind accessors filter that sequence.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Name given to the root section of every parsed file
pub const ROOT_SECTION_NAME: &str = "root";

/// Declaration kinds recognized inside a scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclarationKind {
    Message,
    Enum,
    Service,
    Field,
}

impl DeclarationKind {
    /// Source keyword for the kind
    pub fn keyword(&self) -> &'static str {
        match self {
            DeclarationKind::Message => "message",
            DeclarationKind::Enum => "enum",
            DeclarationKind::Service => "service",
            DeclarationKind::Field => "field",
        }
    }
}

impl fmt::Display for DeclarationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// What a [`ScopedSection`] stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionType {
    /// The file itself
    Root,
    /// The body of a `message` block
    Message,
}

/// One child of a scope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Declaration {
    Message(Message),
    Enum(ProtoEnum),
    Service(Service),
    Field(MessageField),
}

impl Declaration {
    pub fn kind(&self) -> DeclarationKind {
        match self {
            Declaration::Message(_) => DeclarationKind::Message,
            Declaration::Enum(_) => DeclarationKind::Enum,
            Declaration::Service(_) => DeclarationKind::Service,
            Declaration::Field(_) => DeclarationKind::Field,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Declaration::Message(m) => m.name(),
            Declaration::Enum(e) => &e.name,
            Declaration::Service(s) => &s.name,
            Declaration::Field(f) => &f.name,
        }
    }
}

/// A named, brace-delimited scope and the declarations it owns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopedSection {
    pub name: String,
    pub data_type: SectionType,
    pub declarations: Vec<Declaration>,
}

impl ScopedSection {
    pub fn new(name: impl Into<String>, data_type: SectionType) -> Self {
        Self {
            name: name.into(),
            data_type,
            declarations: Vec::new(),
        }
    }

    /// Fresh file root
    pub fn root() -> Self {
        Self::new(ROOT_SECTION_NAME, SectionType::Root)
    }

    pub fn push(&mut self, declaration: Declaration) {
        self.declarations.push(declaration);
    }

    /// Children of one kind, in declaration order. Empty when the scope has none.
    pub fn children(&self, kind: DeclarationKind) -> impl Iterator<Item = &Declaration> {
        self.declarations.iter().filter(move |d| d.kind() == kind)
    }

    /// Number of children of one kind
    pub fn count(&self, kind: DeclarationKind) -> usize {
        self.children(kind).count()
    }

    pub fn messages(&self) -> impl Iterator<Item = &Message> {
        self.declarations.iter().filter_map(|d| match d {
            Declaration::Message(m) => Some(m),
            _ => None,
        })
    }

    pub fn enums(&self) -> impl Iterator<Item = &ProtoEnum> {
        self.declarations.iter().filter_map(|d| match d {
            Declaration::Enum(e) => Some(e),
            _ => None,
        })
    }

    pub fn services(&self) -> impl Iterator<Item = &Service> {
        self.declarations.iter().filter_map(|d| match d {
            Declaration::Service(s) => Some(s),
            _ => None,
        })
    }

    pub fn fields(&self) -> impl Iterator<Item = &MessageField> {
        self.declarations.iter().filter_map(|d| match d {
            Declaration::Field(f) => Some(f),
            _ => None,
        })
    }

    /// Find a directly nested message by name
    pub fn message(&self, name: &str) -> Option<&Message> {
        self.messages().find(|m| m.name() == name)
    }
}

/// A `message` block
///
/// The header line `message Foo {` plays two roles: it declares the type whose
/// body is `body`, and it reads as the field descriptor `declaration`
/// (`data_type = "message"`, `name = "Foo"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub declaration: MessageField,
    pub body: ScopedSection,
}

impl Message {
    /// Build a message from its header field, naming the body after it
    pub fn new(declaration: MessageField, mut body: ScopedSection) -> Self {
        body.name = declaration.name.clone();
        body.data_type = SectionType::Message;
        Self { declaration, body }
    }

    pub fn name(&self) -> &str {
        &self.body.name
    }
}

/// A field declaration (`[repeated] <type> <name>`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageField {
    pub name: String,
    /// Type name as written; not resolved against other declarations
    pub data_type: String,
    pub is_array: bool,
}

/// An enum and its value identifiers in declaration order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtoEnum {
    pub name: String,
    pub values: Vec<String>,
}

/// HTTP verbs accepted in an rpc's HTTP mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    /// Map an option key (`get`, `post`, ...) to a method
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "get" => Some(HttpMethod::Get),
            "post" => Some(HttpMethod::Post),
            "put" => Some(HttpMethod::Put),
            "patch" => Some(HttpMethod::Patch),
            "delete" => Some(HttpMethod::Delete),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
            HttpMethod::Put => "put",
            HttpMethod::Patch => "patch",
            HttpMethod::Delete => "delete",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A remote procedure declared inside a service
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rpc {
    pub name: String,
    pub request: String,
    pub response: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_method: Option<HttpMethod>,
}

/// A service and its rpcs in declaration order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub name: String,
    pub rpcs: Vec<Rpc>,
}

/// One rpc as seen by the stub generator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcRecord {
    pub service_name: String,
    pub rpc_name: String,
    pub request_type_name: String,
}

/// A parsed source file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtoFile {
    /// Identifier from the `package` statement, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,
    /// Value of the `syntax` statement, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub syntax: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub imports: Vec<String>,
    pub root: ScopedSection,
}

impl ProtoFile {
    pub fn services(&self) -> impl Iterator<Item = &Service> {
        self.root.services()
    }

    /// Flatten every rpc of every top-level service, in declaration order
    pub fn rpc_records(&self) -> Vec<RpcRecord> {
        self.services()
            .flat_map(|service| {
                service.rpcs.iter().map(move |rpc| RpcRecord {
                    service_name: service.name.clone(),
                    rpc_name: rpc.name.clone(),
                    request_type_name: rpc.request.clone(),
                })
            })
            .collect()
    }

    /// Pretty-printed JSON of the whole declaration tree
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
