//! Schema Validator
//!
//! Turns a [`RawSchema`] into a normalized [`Schema`], or rejects it with the
//! first [`ValidationError`] found. Checks run in a fixed order and stop at the
//! first failure:
//!
//! 1. module shape
//! 2. prefix shape
//! 3. at least one property
//! 4. per property: name, enum values, platform namespace
//! 5. flattened name collisions
//! 6. platform <=> reserved module name
//!
//! Defaults are filled in only after every check passed.

use std::collections::HashSet;

use tracing::debug;

use crate::error::ValidationError;
use crate::names::{self, is_valid_dotted_name, is_valid_identifier};
use crate::schema::{
    join_prefix, Access, Owner, Property, RawProperty, RawSchema, Schema, PLATFORM_MODULE,
};

/// Key namespaces platform properties may not live in
const VENDOR_NAMESPACES: [&str; 2] = ["vendor.", "odm."];

/// Validate a parsed schema and return its normalized copy
pub fn validate(raw: &RawSchema) -> Result<Schema, ValidationError> {
    validate_module(&raw.module)?;

    if !raw.prefix.is_empty() && !is_valid_dotted_name(&raw.prefix) {
        return Err(ValidationError::InvalidPrefix(raw.prefix.clone()));
    }

    if raw.props.is_empty() {
        return Err(ValidationError::NoProperties);
    }

    for prop in &raw.props {
        validate_prop(raw, prop)?;
    }

    if let Some(dup) = names::find_duplicate(raw.props.iter().map(|p| p.name.as_str())) {
        return Err(ValidationError::DuplicatedPropName(dup.to_string()));
    }

    match raw.owner {
        Owner::Platform if raw.module != PLATFORM_MODULE => {
            return Err(ValidationError::PlatformModuleRequired);
        }
        Owner::Vendor | Owner::Odm if raw.module == PLATFORM_MODULE => {
            return Err(ValidationError::ReservedModuleName);
        }
        _ => {}
    }

    let schema = Schema {
        owner: raw.owner,
        module: raw.module.clone(),
        prefix: raw.prefix.clone(),
        props: raw.props.iter().map(normalize_prop).collect(),
    };

    debug!(module = %schema.module, props = schema.props.len(), "schema validated");
    Ok(schema)
}

fn validate_module(module: &str) -> Result<(), ValidationError> {
    let segments: Vec<&str> = module.split('.').collect();
    if segments.len() <= 1 {
        return Err(ValidationError::InvalidModuleName(module.to_string()));
    }

    match segments.into_iter().find(|s| !is_valid_identifier(s)) {
        Some(bad) => Err(ValidationError::InvalidModuleSegment(bad.to_string())),
        None => Ok(()),
    }
}

fn validate_prop(raw: &RawSchema, prop: &RawProperty) -> Result<(), ValidationError> {
    if !is_valid_dotted_name(&prop.name) {
        return Err(ValidationError::InvalidPropName(prop.name.clone()));
    }

    if prop.prop_type.is_enum() {
        let values = split_enum_values(prop.enum_values.as_deref().unwrap_or(""));

        if let Some(bad) = values.iter().find(|v| !is_valid_identifier(v)) {
            return Err(ValidationError::InvalidEnumValue {
                value: bad.to_string(),
                prop: prop.name.clone(),
            });
        }

        let mut seen = HashSet::new();
        if let Some(dup) = values.iter().find(|v| !seen.insert(**v)) {
            return Err(ValidationError::DuplicatedEnumValue {
                value: dup.to_string(),
                prop: prop.name.clone(),
            });
        }
    }

    if raw.owner == Owner::Platform {
        let full_name = join_prefix(&raw.prefix, &prop.name);
        if VENDOR_NAMESPACES.iter().any(|ns| full_name.starts_with(ns)) {
            return Err(ValidationError::PlatformNamespace(prop.name.clone()));
        }
    }

    Ok(())
}

/// `"a|b|c"` -> `["a", "b", "c"]`; an empty string yields one empty token
fn split_enum_values(values: &str) -> Vec<&str> {
    values.split('|').collect()
}

fn normalize_prop(prop: &RawProperty) -> Property {
    let access = prop.access.unwrap_or(match prop.readonly {
        Some(false) => Access::ReadWrite,
        _ => Access::Readonly,
    });

    let enum_values = if prop.prop_type.is_enum() {
        prop.enum_values
            .as_deref()
            .map(split_enum_values)
            .unwrap_or_default()
            .into_iter()
            .map(str::to_string)
            .collect()
    } else {
        Vec::new()
    };

    Property {
        name: prop.name.clone(),
        prop_type: prop.prop_type,
        scope: prop.scope,
        access,
        enum_values,
        deprecated: prop.deprecated,
        legacy_prop_name: prop.legacy_prop_name.clone().filter(|n| !n.is_empty()),
        integer_as_bool: prop.integer_as_bool,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{PropType, Scope};

    fn raw(owner: Owner, module: &str, prefix: &str, props: Vec<RawProperty>) -> RawSchema {
        RawSchema {
            owner,
            module: module.to_string(),
            prefix: prefix.to_string(),
            props,
        }
    }

    fn enum_prop(name: &str, values: &str) -> RawProperty {
        let mut p = RawProperty::new(name, PropType::Enum);
        p.enum_values = Some(values.to_string());
        p
    }

    #[test]
    fn test_valid_schema_normalizes() {
        let mut rw = RawProperty::new("rw", PropType::Integer);
        rw.access = Some(Access::ReadWrite);
        let mut legacy_rw = RawProperty::new("legacy_rw", PropType::Integer);
        legacy_rw.readonly = Some(false);
        let mut empty_legacy = RawProperty::new("empty_legacy", PropType::String);
        empty_legacy.legacy_prop_name = Some(String::new());

        let schema = validate(&raw(
            Owner::Vendor,
            "com.example.Props",
            "vendor.example",
            vec![
                RawProperty::new("plain", PropType::Long),
                rw,
                legacy_rw,
                enum_prop("mode", "a|b|c"),
                empty_legacy,
            ],
        ))
        .unwrap();

        assert_eq!(schema.props[0].access, Access::Readonly);
        assert_eq!(schema.props[1].access, Access::ReadWrite);
        assert_eq!(schema.props[2].access, Access::ReadWrite);
        assert_eq!(schema.props[3].enum_values, vec!["a", "b", "c"]);
        assert_eq!(schema.props[4].legacy_prop_name, None);
        assert_eq!(schema.props[0].scope, Scope::Internal);
    }

    #[test]
    fn test_access_wins_over_readonly() {
        let mut p = RawProperty::new("x", PropType::Boolean);
        p.access = Some(Access::Writeonce);
        p.readonly = Some(true);
        let schema = validate(&raw(Owner::Odm, "odm.Props", "", vec![p])).unwrap();
        assert_eq!(schema.props[0].access, Access::Writeonce);
    }

    #[test]
    fn test_module_segment_error() {
        let err = validate(&raw(
            Owner::Vendor,
            "com.9bad.Props",
            "",
            vec![RawProperty::new("x", PropType::Long)],
        ))
        .unwrap_err();
        assert_eq!(err.to_string(), "Invalid name \"9bad\" in module");
    }

    #[test]
    fn test_single_segment_module() {
        let err = validate(&raw(
            Owner::Vendor,
            "Props",
            "",
            vec![RawProperty::new("x", PropType::Long)],
        ))
        .unwrap_err();
        assert_eq!(err, ValidationError::InvalidModuleName("Props".to_string()));
    }

    #[test]
    fn test_prefix_error() {
        let err = validate(&raw(
            Owner::Vendor,
            "com.example.Props",
            "bad..prefix",
            vec![RawProperty::new("x", PropType::Long)],
        ))
        .unwrap_err();
        assert_eq!(err.to_string(), "Invalid prefix \"bad..prefix\"");
    }

    #[test]
    fn test_invalid_enum_token() {
        let err = validate(&raw(
            Owner::Vendor,
            "com.example.Props",
            "",
            vec![enum_prop("mode", "ok|not-ok")],
        ))
        .unwrap_err();
        assert_eq!(err.to_string(), "Invalid enum value \"not-ok\" for prop \"mode\"");
    }

    #[test]
    fn test_enum_values_ignored_for_scalars() {
        let mut p = RawProperty::new("x", PropType::Integer);
        p.enum_values = Some("!!".to_string());
        let schema = validate(&raw(Owner::Vendor, "com.example.Props", "", vec![p])).unwrap();
        assert!(schema.props[0].enum_values.is_empty());
    }

    #[test]
    fn test_first_error_wins() {
        // Both the first prop name and the duplicate are wrong; declaration order decides.
        let err = validate(&raw(
            Owner::Vendor,
            "com.example.Props",
            "",
            vec![
                RawProperty::new("bad name", PropType::Long),
                RawProperty::new("a", PropType::Long),
                RawProperty::new("a", PropType::Long),
            ],
        ))
        .unwrap_err();
        assert_eq!(err, ValidationError::InvalidPropName("bad name".to_string()));
    }

    #[test]
    fn test_flattened_collision() {
        let err = validate(&raw(
            Owner::Vendor,
            "com.example.Props",
            "",
            vec![
                RawProperty::new("a.b_c", PropType::Long),
                RawProperty::new("a_b.c", PropType::Long),
            ],
        ))
        .unwrap_err();
        assert_eq!(err.to_string(), "Duplicated prop name \"a_b.c\"");
    }

    #[test]
    fn test_platform_odm_prefix() {
        let err = validate(&raw(
            Owner::Platform,
            PLATFORM_MODULE,
            "",
            vec![RawProperty::new("odm.thing", PropType::Long)],
        ))
        .unwrap_err();
        assert_eq!(err, ValidationError::PlatformNamespace("odm.thing".to_string()));
    }

    #[test]
    fn test_platform_schema_accepted() {
        let schema = validate(&raw(
            Owner::Platform,
            PLATFORM_MODULE,
            "android.os",
            vec![RawProperty::new("vendorish", PropType::Long)],
        ))
        .unwrap();
        assert_eq!(schema.props.len(), 1);
    }
}
