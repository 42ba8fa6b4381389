//! # Schema Tables
//!
//! The field rules for each record kind, written as JSON Schema (Draft
//! 2020-12) documents. Only `Name` is required on Collection and Model
//! records; every other field is optional but typed when present. No schema
//! sets `additionalProperties`, so unknown fields pass.

use serde_json::{json, Value};

/// Values accepted for an ecosystem project's `type`.
pub const PROJECT_TYPES: &[&str] = &[
    "Official Implementation",
    "Community Implementation",
    "Competition",
    "Library",
    "Service",
    "Tutorial",
    "Demo",
    "Others",
];

/// Upstream repositories an ecosystem project may build on.
pub const UPSTREAM_REPOS: &[&str] = &[
    "MMCV",
    "MMClassification",
    "MMDetection",
    "MMDetection3D",
    "MMRotate",
    "MMSegmentation",
    "MMOCR",
    "MMPose",
    "MMHuman3D",
    "MMSelfSup",
    "MMRazor",
    "MMFewShot",
    "MMAction2",
    "MMTracking",
    "MMFlow",
    "MMEditing",
    "MMGeneration",
    "MMDeploy",
];

/// Record kinds with a schema table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaKind {
    /// A `Collections` entry of a metafile.
    Collection,
    /// A `Models` entry of a metafile.
    Model,
    /// One project of the ecosystem registry.
    EcosystemProject,
}

impl SchemaKind {
    /// All kinds, in compile order.
    pub const ALL: [SchemaKind; 3] = [
        SchemaKind::Collection,
        SchemaKind::Model,
        SchemaKind::EcosystemProject,
    ];

    /// Stable name used in errors and logs.
    pub fn name(self) -> &'static str {
        match self {
            Self::Collection => "collection",
            Self::Model => "model",
            Self::EcosystemProject => "ecosystem-project",
        }
    }

    /// The schema document for this kind.
    pub fn definition(self) -> Value {
        match self {
            Self::Collection => collection_schema(),
            Self::Model => model_schema(),
            Self::EcosystemProject => ecosystem_project_schema(),
        }
    }
}

fn string_list() -> Value {
    json!({"type": "array", "items": {"type": "string"}})
}

fn string_fields(names: &[&str]) -> serde_json::Map<String, Value> {
    names
        .iter()
        .map(|name| (name.to_string(), json!({"type": "string"})))
        .collect()
}

fn object_with(properties: serde_json::Map<String, Value>) -> Value {
    json!({"type": "object", "properties": properties})
}

/// Shared `Metadata` fields of Collections and Models.
fn metadata_properties() -> serde_json::Map<String, Value> {
    let mut properties = serde_json::Map::new();
    properties.insert(
        "Training Data".into(),
        json!({"type": ["string", "array"], "items": {"type": "string"}}),
    );
    properties.insert("Epochs".into(), json!({"type": "integer"}));
    properties.insert("Batch Size".into(), json!({"type": "integer"}));
    properties.insert("Training Techniques".into(), string_list());
    properties.insert("Training Resources".into(), json!({"type": "string"}));
    properties.insert("FLOPs".into(), json!({"type": "number"}));
    properties.insert("Parameters".into(), json!({"type": "integer"}));
    properties.insert("Training Time".into(), json!({"type": "number"}));
    properties.insert("Train time (s/iter)".into(), json!({"type": "number"}));
    properties.insert("Training Memory (GB)".into(), json!({"type": "number"}));
    properties.insert("Architecture".into(), string_list());
    properties
}

fn inference_time_schema() -> Value {
    json!({
        "type": "array",
        "items": {
            "type": "object",
            "properties": {
                "value": {"type": "number"},
                "hardware": {"type": "string"},
                "backend": {"type": "string"},
                "batch size": {"type": "integer"},
                "mode": {"type": "string"},
                "resolution": {"type": "array"}
            }
        }
    })
}

fn results_schema() -> Value {
    json!({
        "type": "array",
        "items": {
            "type": "object",
            "properties": {
                "Task": {"type": "string"},
                "Dataset": {"type": "string"},
                "Metrics": {"type": "object"}
            }
        }
    })
}

fn collection_schema() -> Value {
    let mut properties = string_fields(&["Name", "README", "Weights"]);
    properties.insert("Metadata".into(), object_with(metadata_properties()));
    properties.insert("Paper".into(), object_with(string_fields(&["URL", "Title"])));

    json!({
        "type": "object",
        "required": ["Name"],
        "properties": properties
    })
}

fn model_schema() -> Value {
    let mut metadata = metadata_properties();
    metadata.insert("inference time (ms/im)".into(), inference_time_schema());

    let mut properties = string_fields(&[
        "Name",
        "In Collection",
        "Config",
        "Weights",
        "Training Log",
        "README",
        "Image",
    ]);
    properties.insert("Metadata".into(), object_with(metadata));
    properties.insert("Results".into(), results_schema());
    properties.insert("Paper".into(), object_with(string_fields(&["URL", "Title"])));
    properties.insert(
        "Converted From".into(),
        object_with(string_fields(&["Weights", "Code"])),
    );
    properties.insert("Code".into(), object_with(string_fields(&["URL", "Version"])));

    json!({
        "type": "object",
        "required": ["Name"],
        "properties": properties
    })
}

fn ecosystem_project_schema() -> Value {
    json!({
        "type": "object",
        "required": ["repo_url", "paper_url", "type", "mmrepos", "tags", "summary"],
        "properties": {
            "repo_url": {"type": "string"},
            "paper_url": {"type": "string"},
            "type": {"type": "string", "enum": PROJECT_TYPES},
            "mmrepos": {"type": "array", "items": {"enum": UPSTREAM_REPOS}},
            "tags": string_list(),
            "summary": {
                "type": "object",
                "required": ["zh", "en"],
                "properties": {
                    "zh": {"type": "string"},
                    "en": {"type": "string"}
                }
            }
        }
    })
}
