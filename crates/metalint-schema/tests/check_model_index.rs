//! Integration test: run the model-index check over small on-disk index
//! trees and assert on the accumulated findings and the rendered output.

use std::path::{Path, PathBuf};

use metalint_core::RecordKind;
use metalint_schema::{CheckReport, Finding, ModelIndexChecker, SchemaValidator, Subject};
use tempfile::TempDir;

const RESNET_METAFILE: &str = r#"
Collections:
  - Name: ResNet
    Metadata:
      Training Data: ImageNet-1k
      Training Techniques:
        - SGD with Momentum
        - Weight Decay
      Training Resources: 8x V100 GPUs
      Epochs: 100
      Batch Size: 256
      Architecture:
        - ResNet
    Paper:
      URL: https://openaccess.thecvf.com/content_cvpr_2016/html/He_Deep_Residual_Learning_CVPR_2016_paper.html
      Title: Deep Residual Learning for Image Recognition
    README: configs/resnet/README.md

Models:
  - Name: resnet18_8xb32_in1k
    In Collection: ResNet
    Metadata:
      FLOPs: 1820000000
      Parameters: 11690000
      Training Memory (GB): 2.5
      inference time (ms/im):
        - value: 3.2
          hardware: V100
          backend: PyTorch
          batch size: 1
          mode: FP32
          resolution: [224, 224]
    Results:
      - Task: Image Classification
        Dataset: ImageNet-1k
        Metrics:
          Top 1 Accuracy: 69.9
          Top 5 Accuracy: 89.43
    Weights: https://download.example.com/resnet18_8xb32_in1k.pth
    Config: configs/resnet/resnet18_8xb32_in1k.py
"#;

const VIT_METAFILE: &str = r#"
Collections:
  - Name: Vision Transformer
    README: configs/vit/README.md
Models:
  - Name: vit-base-p16_in21k-pre_3rdparty_in1k-384px
    In Collection: Vision Transformer
    Converted From:
      Weights: https://storage.example.com/vit_base.npz
      Code: https://github.com/google-research/vision_transformer
    Code:
      URL: https://github.com/example/vit
      Version: v1.0.0
"#;

struct Tree {
    dir: TempDir,
}

impl Tree {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    fn write(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, content).unwrap();
        path
    }

    fn index(&self, imports: &[&str]) -> PathBuf {
        let mut content = String::from("Import:\n");
        for import in imports {
            content.push_str(&format!("  - {import}\n"));
        }
        self.write("model-index.yml", &content)
    }

    fn root(&self) -> &Path {
        self.dir.path()
    }
}

fn check(index: &Path) -> CheckReport {
    let validator = SchemaValidator::new().unwrap();
    ModelIndexChecker::new(&validator).check(index)
}

#[test]
fn well_formed_index_passes() {
    let tree = Tree::new();
    tree.write("configs/resnet/metafile.yml", RESNET_METAFILE);
    tree.write("configs/vit/metafile.yml", VIT_METAFILE);
    let index = tree.index(&["configs/resnet/metafile.yml", "configs/vit/metafile.yml"]);

    let report = check(&index);
    assert!(report.is_success(), "{report}");
    assert_eq!(report.exit_code(), 0);
    assert_eq!(report.to_string(), "");
}

#[test]
fn sequence_root_fails() {
    let tree = Tree::new();
    let index = tree.write("model-index.yml", "- configs/resnet/metafile.yml\n");

    let report = check(&index);
    assert_eq!(report.exit_code(), 1);
    assert!(matches!(
        report.findings(),
        [Finding::SchemaViolation {
            subject: Subject::Document,
            ..
        }]
    ));
    assert!(report.to_string().contains("to contain a mapping, but got sequence"));
}

#[test]
fn missing_index_fails() {
    let tree = Tree::new();
    let report = check(&tree.root().join("model-index.yml"));
    assert!(matches!(report.findings(), [Finding::FileNotFound { .. }]));
}

#[test]
fn missing_import_key_fails() {
    let tree = Tree::new();
    let index = tree.write("model-index.yml", "Models: []\n");
    let report = check(&index);
    assert_eq!(report.exit_code(), 1);
}

#[test]
fn missing_metafile_does_not_stop_the_run() {
    let tree = Tree::new();
    tree.write(
        "configs/bad/metafile.yml",
        "Models:\n  - Name: bad-model\n    Weights: 7\n",
    );
    let index = tree.index(&["configs/missing/metafile.yml", "configs/bad/metafile.yml"]);

    let report = check(&index);
    assert_eq!(report.exit_code(), 1);

    let findings = report.findings();
    assert!(findings.iter().any(|f| matches!(
        f,
        Finding::FileNotFound { path } if path.ends_with("configs/missing/metafile.yml")
    )));
    assert!(findings.iter().any(|f| matches!(
        f,
        Finding::SchemaViolation { subject: Subject::Record { label, .. }, .. } if label == "bad-model"
    )));
}

#[test]
fn duplicate_collection_names_name_both_files() {
    let tree = Tree::new();
    tree.write("a/metafile.yml", "Collections:\n  - Name: Foo\n");
    tree.write("b/metafile.yml", "Collections:\n  - Name: Foo\n");
    let index = tree.index(&["a/metafile.yml", "b/metafile.yml"]);

    let report = check(&index);
    assert_eq!(report.exit_code(), 1);

    let duplicate = report
        .findings()
        .iter()
        .find_map(|f| match f {
            Finding::DuplicateName { kind, name, paths } => Some((kind, name, paths)),
            _ => None,
        })
        .expect("duplicate finding");
    assert_eq!(*duplicate.0, RecordKind::Collection);
    assert_eq!(duplicate.1, "Foo");
    assert_eq!(
        duplicate.2,
        &vec![
            tree.root().join("a/metafile.yml"),
            tree.root().join("b/metafile.yml")
        ]
    );

    let rendered = report.to_string();
    assert!(rendered.starts_with("Collection \"Foo\" is defined in multiple places:\n"));
    assert!(rendered.contains(&format!("\t{}\n", tree.root().join("a/metafile.yml").display())));
    assert!(rendered.contains(&format!("\t{}\n", tree.root().join("b/metafile.yml").display())));
}

#[test]
fn model_without_name_fails_and_siblings_are_checked() {
    let tree = Tree::new();
    tree.write(
        "m/metafile.yml",
        "Models:\n  - Config: configs/a.py\n  - Name: sibling\n    Results: not-a-list\n  - Name: fine\n",
    );
    let index = tree.index(&["m/metafile.yml"]);

    let report = check(&index);
    let labels: Vec<&str> = report
        .findings()
        .iter()
        .filter_map(|f| match f {
            Finding::SchemaViolation {
                subject: Subject::Record { label, .. },
                ..
            } => Some(label.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(labels, vec!["<unnamed models #0>", "sibling"]);

    let rendered = report.to_string();
    assert!(rendered.contains("\tmodels: <unnamed models #0>\n"), "{rendered}");
    assert!(rendered.contains("\"Name\" is a required property"), "{rendered}");
}

#[test]
fn malformed_metafile_shapes_are_reported() {
    let tree = Tree::new();
    tree.write("list/metafile.yml", "- Name: A\n");
    tree.write("section/metafile.yml", "Collections: ResNet\nModels:\n  - Name: ok\n");
    tree.write("broken/metafile.yml", "Models: [\n");
    let index = tree.index(&["list/metafile.yml", "section/metafile.yml", "broken/metafile.yml"]);

    let report = check(&index);
    let documents = report
        .findings()
        .iter()
        .filter(|f| {
            matches!(
                f,
                Finding::SchemaViolation {
                    subject: Subject::Document,
                    ..
                }
            )
        })
        .count();
    assert_eq!(documents, 2);
    assert!(report
        .findings()
        .iter()
        .any(|f| matches!(f, Finding::ParseFailure { .. })));
}

#[test]
fn directory_import_is_a_read_failure() {
    let tree = Tree::new();
    std::fs::create_dir_all(tree.root().join("configs/resnet")).unwrap();
    let index = tree.index(&["configs/resnet"]);

    let report = check(&index);
    assert!(matches!(report.findings(), [Finding::ReadFailure { .. }]), "{report}");
    assert!(report.to_string().starts_with("Failed to read \""), "{report}");
}

#[test]
fn float_epochs_are_rejected() {
    let tree = Tree::new();
    tree.write(
        "m/metafile.yml",
        "Collections:\n  - Name: A\n    Metadata:\n      Epochs: 100.0\n",
    );
    let index = tree.index(&["m/metafile.yml"]);

    let report = check(&index);
    assert_eq!(report.exit_code(), 1);
    let rendered = report.to_string();
    assert!(
        rendered.contains("\t\t/Metadata/Epochs: 100.0 is not of type \"integer\"\n"),
        "{rendered}"
    );
}

#[test]
fn non_mapping_metafile_is_reported_once() {
    let tree = Tree::new();
    let metafile = tree.write("list/metafile.yml", "- Name: A\n");
    let index = tree.index(&["list/metafile.yml"]);

    let report = check(&index);
    assert_eq!(report.findings().len(), 1, "{report}");
    assert_eq!(
        report.to_string(),
        format!(
            "Expected the file \"{}\" to contain a mapping, but got sequence\n",
            metafile.display()
        )
    );
}

#[test]
fn checking_twice_is_identical() {
    let tree = Tree::new();
    tree.write("configs/resnet/metafile.yml", RESNET_METAFILE);
    tree.write("dup/metafile.yml", "Collections:\n  - Name: ResNet\n    Metadata:\n      Epochs: ten\n");
    let index = tree.index(&["configs/resnet/metafile.yml", "dup/metafile.yml"]);

    let first = check(&index);
    let second = check(&index);
    assert_eq!(first, second);
    assert_eq!(first.to_string(), second.to_string());

    let valid = tree.index(&["configs/resnet/metafile.yml"]);
    assert_eq!(check(&valid).to_string(), "");
    assert_eq!(check(&valid).to_string(), "");
}
