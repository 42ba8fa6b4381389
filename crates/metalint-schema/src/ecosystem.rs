//! # Ecosystem Registry Check
//!
//! The registry is a YAML list of projects built on the upstream libraries.
//! Each project is checked against the `ecosystem-project` schema table and
//! then by the field checks below, which the table cannot express.

use std::path::Path;

use metalint_core::{document, kind_of};
use serde_json::Value;

use crate::report::{CheckReport, Finding, Subject};
use crate::validate::{SchemaValidator, Violation};

/// Hosts a `repo_url` may point at.
pub const REPO_URL_PREFIXES: &[&str] = &[
    "https://github.com/",
    "https://gitee.com/",
    "https://gitlab.com/",
];

/// Most tags a project may carry.
pub const MAX_TAGS: usize = 5;

/// `repo_url` must live on a known code host.
pub fn check_repo_url(url: &str) -> Option<Violation> {
    if REPO_URL_PREFIXES.iter().any(|prefix| url.starts_with(prefix)) {
        return None;
    }
    Some(Violation::check(
        "repo_url",
        format!(
            "repo_url is invalid, must start with one of [{}]",
            REPO_URL_PREFIXES.join(", ")
        ),
    ))
}

/// `paper_url` is either empty or an http(s) link.
pub fn check_paper_url(url: &str) -> Option<Violation> {
    if url.is_empty() || url.starts_with("https://") || url.starts_with("http://") {
        return None;
    }
    Some(Violation::check(
        "paper_url",
        "paper_url is invalid, must start with https:// or http://, or be left empty",
    ))
}

/// At most [`MAX_TAGS`] tags, none containing a comma.
pub fn check_tags(tags: &[Value]) -> Vec<Violation> {
    let mut violations = Vec::new();
    if tags.len() > MAX_TAGS {
        violations.push(Violation::check(
            "tags",
            format!(
                "Please use no more than {MAX_TAGS} tags, current number: {}",
                tags.len()
            ),
        ));
    }
    if tags
        .iter()
        .filter_map(Value::as_str)
        .any(|tag| tag.contains(','))
    {
        violations.push(Violation::check("tags", "',' is not allowed in tags"));
    }
    violations
}

/// Validate one project: schema table first, then the field checks for
/// every field that has the right type.
pub fn validate_project(validator: &SchemaValidator, project: &Value) -> Vec<Violation> {
    let mut violations = validator.validate_project_shape(project);

    if let Some(url) = project.get("repo_url").and_then(Value::as_str) {
        violations.extend(check_repo_url(url));
    }
    if let Some(url) = project.get("paper_url").and_then(Value::as_str) {
        violations.extend(check_paper_url(url));
    }
    if let Some(tags) = project.get("tags").and_then(Value::as_array) {
        violations.extend(check_tags(tags));
    }

    violations
}

/// Check every project of the registry at `path`.
pub fn check_ecosystem_file(validator: &SchemaValidator, path: &Path) -> CheckReport {
    let mut report = CheckReport::new();

    let document = match document::load(path) {
        Ok(document) => document,
        Err(e) => {
            report.push(Finding::from(e));
            return report;
        }
    };

    let Some(projects) = document.as_array() else {
        report.push_violations(
            path,
            Subject::Document,
            vec![Violation::root(format!(
                "Expected the file \"{}\" to contain a list of projects, but got {}",
                path.display(),
                kind_of(&document)
            ))],
        );
        return report;
    };

    for (position, project) in projects.iter().enumerate() {
        let subject = Subject::Project {
            position,
            repo_url: project
                .get("repo_url")
                .and_then(Value::as_str)
                .map(str::to_string),
        };
        report.push_violations(path, subject, validate_project(validator, project));
    }

    tracing::info!(
        path = %path.display(),
        projects = projects.len(),
        findings = report.findings().len(),
        "checked ecosystem registry"
    );
    report
}
