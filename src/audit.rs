//! Property file audit
//!
//! Checks a `key=value` property file (build.prop style) against a validated
//! schema before it ships:
//! - every value assigned to a declared key (effective or legacy) must parse
//!   as the property's type
//! - a read-only (`ro.`) key may only be assigned once; later assignments are
//!   ignored by the property store
//!
//! Blank lines and `#` comments are skipped, as are lines without `=`
//! (`import` statements and the like).

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::{Result, SyspropError};
use crate::schema::{Property, Schema, READONLY_PREFIX};
use crate::value::{PropValue, ValueError};

/// What is wrong with one line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FindingKind {
    InvalidValue(ValueError),
    ReadonlyReassigned { first_line: usize },
}

/// One problem, tied to its 1-based line number
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub line: usize,
    pub key: String,
    pub kind: FindingKind,
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            FindingKind::InvalidValue(err) => write!(f, "line {}: {}: {}", self.line, self.key, err),
            FindingKind::ReadonlyReassigned { first_line } => write!(
                f,
                "line {}: read-only property {} already set on line {}",
                self.line, self.key, first_line
            ),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditReport {
    /// Assignments to keys the schema declares
    pub checked: usize,
    pub findings: Vec<Finding>,
}

impl AuditReport {
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }
}

/// Audit the contents of a property file
pub fn audit_str(schema: &Schema, contents: &str) -> AuditReport {
    let mut declared: HashMap<String, &Property> = HashMap::new();
    for prop in &schema.props {
        declared.insert(schema.effective_key(prop), prop);
        if let Some(legacy) = &prop.legacy_prop_name {
            declared.entry(legacy.clone()).or_insert(prop);
        }
    }

    let mut report = AuditReport::default();
    let mut readonly_seen: HashMap<&str, usize> = HashMap::new();

    for (index, raw_line) in contents.lines().enumerate() {
        let line_no = index + 1;
        let line = raw_line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            debug!(line = line_no, "skipping line without assignment");
            continue;
        };
        let key = key.trim();
        let value = value.trim();

        if key.starts_with(READONLY_PREFIX) {
            if let Some(&first_line) = readonly_seen.get(key) {
                report.findings.push(Finding {
                    line: line_no,
                    key: key.to_string(),
                    kind: FindingKind::ReadonlyReassigned { first_line },
                });
                continue;
            }
            readonly_seen.insert(key, line_no);
        }

        let Some(prop) = declared.get(key) else {
            continue;
        };

        report.checked += 1;
        if let Err(err) = PropValue::parse(prop, value) {
            report.findings.push(Finding {
                line: line_no,
                key: key.to_string(),
                kind: FindingKind::InvalidValue(err),
            });
        }
    }

    for finding in &report.findings {
        warn!("{}", finding);
    }
    debug!(
        checked = report.checked,
        findings = report.findings.len(),
        "property file audited"
    );

    report
}

/// Audit a property file on disk
pub fn audit_file(schema: &Schema, path: &Path) -> Result<AuditReport> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| SyspropError::io(format!("Error reading file {}", path.display()), e))?;
    Ok(audit_str(schema, &contents))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Access, Owner, PropType, Scope};

    fn prop(name: &str, prop_type: PropType, access: Access) -> Property {
        Property {
            name: name.to_string(),
            prop_type,
            scope: Scope::Public,
            access,
            enum_values: if prop_type.is_enum() {
                vec!["on".to_string(), "off".to_string()]
            } else {
                Vec::new()
            },
            deprecated: false,
            legacy_prop_name: None,
            integer_as_bool: false,
        }
    }

    fn schema() -> Schema {
        let mut legacy = prop("volume", PropType::Integer, Access::ReadWrite);
        legacy.legacy_prop_name = Some("persist.audio.volume".to_string());

        Schema {
            owner: Owner::Vendor,
            module: "com.example.AudioProps".to_string(),
            prefix: "vendor.audio".to_string(),
            props: vec![
                prop("enabled", PropType::Boolean, Access::Readonly),
                prop("mode", PropType::Enum, Access::ReadWrite),
                prop("rates", PropType::UIntList, Access::Readonly),
                legacy,
            ],
        }
    }

    #[test]
    fn test_clean_file() {
        let report = audit_str(
            &schema(),
            "# audio\n\
             ro.vendor.audio.enabled=true\n\
             vendor.audio.mode=off\n\
             ro.vendor.audio.rates=44100,48000\n\
             \n\
             ro.build.id=XYZ\n\
             import /vendor/extra.prop\n",
        );

        assert!(report.is_clean(), "{:?}", report.findings);
        assert_eq!(report.checked, 3);
    }

    #[test]
    fn test_invalid_values() {
        let report = audit_str(
            &schema(),
            "ro.vendor.audio.enabled=maybe\n\
             vendor.audio.mode=OFF\n\
             ro.vendor.audio.rates=44100,-1\n\
             persist.audio.volume=loud\n",
        );

        let lines: Vec<usize> = report.findings.iter().map(|f| f.line).collect();
        assert_eq!(lines, vec![1, 2, 3, 4]);
        assert_eq!(
            report.findings[0].to_string(),
            "line 1: ro.vendor.audio.enabled: 'maybe' is not a valid Boolean"
        );
        assert_eq!(
            report.findings[3].to_string(),
            "line 4: persist.audio.volume: 'loud' is not a valid Integer"
        );
    }

    #[test]
    fn test_readonly_reassigned() {
        let report = audit_str(
            &schema(),
            "ro.vendor.audio.enabled=1\n\
             ro.build.id=A\n\
             ro.vendor.audio.enabled=0\n\
             ro.build.id=B\n\
             vendor.audio.mode=on\n\
             vendor.audio.mode=off\n",
        );

        assert_eq!(report.findings.len(), 2);
        assert_eq!(
            report.findings[0].kind,
            FindingKind::ReadonlyReassigned { first_line: 1 }
        );
        assert_eq!(
            report.findings[1].to_string(),
            "line 4: read-only property ro.build.id already set on line 2"
        );
    }

    #[test]
    fn test_audit_file_missing() {
        let err = audit_file(&schema(), Path::new("/nonexistent/build.prop")).unwrap_err();
        assert!(err
            .to_string()
            .starts_with("Error reading file /nonexistent/build.prop failed:"));
    }
}
