//! Golden Tests for Generated Accessors
//!
//! Runs the fixture schemas through every target and checks the properties
//! that must hold for any schema: determinism, scope tiers, legacy key
//! fallback, deprecation markers, and the write/check round trip on disk.

use std::path::{Path, PathBuf};

use sysprop_gen::codegen::{self, CppOptions, JavaOptions, RustOptions, TargetOptions};
use sysprop_gen::output::{write_artifacts, ArtifactStatus, OutputDirs, WriteMode};
use sysprop_gen::{audit_file, load_schema, FindingKind, OutputSlot, Schema, Scope, Target};

fn fixtures_path() -> &'static Path {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").leak()
}

fn platform_schema() -> Schema {
    load_schema(&fixtures_path().join("PlatformProperties.sysprop.toml")).unwrap()
}

fn audio_schema() -> Schema {
    load_schema(&fixtures_path().join("AudioProperties.json")).unwrap()
}

fn options(target: Target, scope: Scope) -> TargetOptions {
    match target {
        Target::Cpp => TargetOptions::Cpp(
            CppOptions::new("PlatformProperties.sysprop").with_scope(scope),
        ),
        Target::Java => TargetOptions::Java(JavaOptions { scope }),
        Target::Rust => TargetOptions::Rust(RustOptions { scope }),
    }
}

/// Contents of the artifact in `slot`
fn contents(schema: &Schema, target: Target, scope: Scope, slot: OutputSlot) -> String {
    codegen::generate(schema, &options(target, scope))
        .into_iter()
        .find(|artifact| artifact.slot == slot)
        .map(|artifact| artifact.contents)
        .unwrap_or_else(|| panic!("{} did not produce {:?}", target, slot))
}

// =============================================================================
// Fixture Decoding
// =============================================================================

#[test]
fn test_platform_fixture_defaults() {
    let schema = platform_schema();
    assert_eq!(schema.props.len(), 7);

    let string_prop = &schema.props[2];
    assert_eq!(schema.effective_key(string_prop), "ro.android.test.string");
    assert_eq!(
        string_prop.legacy_prop_name.as_deref(),
        Some("legacy.android.test.string")
    );

    let enum_prop = &schema.props[4];
    assert_eq!(enum_prop.enum_values, vec!["a", "b", "c", "D", "e", "f", "G"]);
}

#[test]
fn test_json_fixture_defaults() {
    let schema = audio_schema();
    let keys: Vec<String> = schema.props.iter().map(|p| schema.effective_key(p)).collect();

    // Missing access means read-only; `readonly: false` means read-write.
    assert_eq!(
        keys,
        vec![
            "vendor.audio.volume",
            "ro.vendor.audio.enabled",
            "ro.vendor.audio.rates",
            "vendor.audio.mode",
        ]
    );
}

// =============================================================================
// Cross-Target Properties
// =============================================================================

#[test]
fn test_generation_is_deterministic() {
    let schema = platform_schema();
    for target in Target::ALL {
        for scope in Scope::ALL {
            let first = codegen::generate(&schema, &options(target, scope));
            let second = codegen::generate(&schema, &options(target, scope));
            assert_eq!(first, second, "{} at {}", target, scope);
        }
    }
}

#[test]
fn test_scope_tiers_are_monotonic() {
    let schema = platform_schema();
    let checks = [
        (Target::Cpp, OutputSlot::CppSource),
        (Target::Java, OutputSlot::JavaClass),
        (Target::Rust, OutputSlot::RustModule),
    ];

    for (target, slot) in checks {
        let outputs: Vec<String> = Scope::ALL
            .iter()
            .map(|scope| contents(&schema, target, *scope, slot))
            .collect();

        for prop in &schema.props {
            let key = format!("\"{}\"", schema.effective_key(prop));
            let present: Vec<bool> = outputs.iter().map(|out| out.contains(&key)).collect();

            // Public < System < Internal: once present, present at every wider tier.
            for (index, scope) in Scope::ALL.iter().enumerate() {
                assert_eq!(
                    present[index],
                    prop.scope <= *scope,
                    "{} key {} at {}",
                    target,
                    key,
                    scope
                );
            }
        }
    }
}

#[test]
fn test_public_tier_drops_internal_enums() {
    let schema = platform_schema();

    let rust = contents(&schema, Target::Rust, Scope::Public, OutputSlot::RustModule);
    assert!(!rust.contains("TestEnumValues"));
    assert!(!rust.contains("ElValues"));
    assert!(rust.contains("pub fn test_int()"));

    let header = contents(&schema, Target::Cpp, Scope::Internal, OutputSlot::CppHeader);
    assert!(header.contains("enum class TestEnumValues {"));
    assert!(header.contains("enum class ElValues {"));
}

#[test]
fn test_legacy_fallback_in_every_target() {
    let schema = platform_schema();

    let source = contents(&schema, Target::Cpp, Scope::Internal, OutputSlot::CppSource);
    assert!(source.contains(
        "return GetProp<std::string>(\"ro.android.test.string\", \"legacy.android.test.string\");"
    ));

    let class = contents(&schema, Target::Java, Scope::Internal, OutputSlot::JavaClass);
    assert!(class.contains(
        "\"legacy.android.test.string\", () -> native_android_test_string_legacy_get()"
    ));
    assert!(class.contains("private static native String native_android_test_string_legacy_get();"));

    let jni = contents(&schema, Target::Java, Scope::Internal, OutputSlot::JniLibrary);
    assert!(jni.contains("jstring JNICALL android_test_string_legacy_get(JNIEnv* env, jclass) {"));
    assert!(jni.contains("return GetProp(env, \"legacy.android.test.string\");"));

    let rust = contents(&schema, Target::Rust, Scope::Internal, OutputSlot::RustModule);
    assert!(rust.contains("if result.is_ok() { return result; }"));
    assert!(rust.contains("match system_properties::read(\"legacy.android.test.string\") {"));

    // Only the property that declares a legacy key falls back.
    assert_eq!(rust.matches("falling back to the legacy one").count(), 1);
}

#[test]
fn test_deprecated_markers() {
    let schema = platform_schema();

    let header = contents(&schema, Target::Cpp, Scope::Internal, OutputSlot::CppHeader);
    assert!(header.contains("[[deprecated]] std::optional<std::vector<std::int32_t>> test_list_int();"));
    assert!(header.contains("[[deprecated]] bool test_list_int(const std::vector<std::int32_t>& value);"));
    assert_eq!(header.matches("[[deprecated]]").count(), 2);

    let class = contents(&schema, Target::Java, Scope::Internal, OutputSlot::JavaClass);
    assert_eq!(class.matches("@Deprecated").count(), 2);

    let rust = contents(&schema, Target::Rust, Scope::Internal, OutputSlot::RustModule);
    assert!(rust.contains("#[deprecated]\npub fn test_list_int()"));
    assert!(rust.contains("#[deprecated]\npub fn set_test_list_int(v: &[i32])"));
}

#[test]
fn test_readonly_props_have_no_setter() {
    let schema = platform_schema();

    let rust = contents(&schema, Target::Rust, Scope::Internal, OutputSlot::RustModule);
    assert!(rust.contains("pub fn android_test_string()"));
    assert!(!rust.contains("pub fn set_android_test_string("));
    // Writeonce still gets a setter.
    assert!(rust.contains("pub fn set_test_boo_lea_n(v: bool)"));
    assert!(rust.contains("parsers_formatters::format_bool_as_int(&v)"));

    let jni = contents(&schema, Target::Java, Scope::Internal, OutputSlot::JniLibrary);
    assert!(!jni.contains("android_test_string_set("));
}

#[test]
fn test_artifact_paths() {
    let schema = audio_schema();
    let paths: Vec<PathBuf> = codegen::generate(&schema, &options(Target::Java, Scope::Internal))
        .into_iter()
        .map(|artifact| artifact.relative_path)
        .collect();

    assert_eq!(
        paths,
        vec![
            PathBuf::from("com/example/audio/AudioProperties.java"),
            PathBuf::from("AudioProperties_jni.cpp"),
        ]
    );
}

// =============================================================================
// Output and Audit
// =============================================================================

#[test]
fn test_write_then_check_round_trip() {
    let schema = audio_schema();
    let dir = tempfile::tempdir().unwrap();
    let dirs = OutputDirs::uniform(dir.path());

    for target in Target::ALL {
        let artifacts = codegen::generate(&schema, &options(target, Scope::System));
        let written = write_artifacts(&artifacts, &dirs, WriteMode::Write).unwrap();
        assert!(written.iter().all(|r| r.status == ArtifactStatus::Written));

        let checked = write_artifacts(&artifacts, &dirs, WriteMode::Check).unwrap();
        assert!(checked.iter().all(|r| r.is_fresh()), "{}", target);
    }

    // A wider tier changes the Rust module, which check mode reports as stale.
    let wider = codegen::generate(&schema, &options(Target::Rust, Scope::Internal));
    let reports = write_artifacts(&wider, &dirs, WriteMode::Check).unwrap();
    match &reports[0].status {
        ArtifactStatus::Stale { diff } => {
            assert!(diff.contains("+pub const RATES_PROP: &str = \"ro.vendor.audio.rates\";"));
        }
        other => panic!("Expected Stale, got {:?}", other),
    }
}

#[test]
fn test_audit_fixture() {
    let schema = audio_schema();
    let report = audit_file(&schema, &fixtures_path().join("audio.prop")).unwrap();

    assert_eq!(report.checked, 6);
    let lines: Vec<usize> = report.findings.iter().map(|f| f.line).collect();
    assert_eq!(lines, vec![10, 11, 13]);

    assert_eq!(
        report.findings[0].kind,
        FindingKind::ReadonlyReassigned { first_line: 2 }
    );
    assert_eq!(
        report.findings[1].to_string(),
        "line 11: vendor.audio.mode: 'SILENT' is not a valid value of normal|silent|vibrate"
    );
    assert_eq!(
        report.findings[2].kind,
        FindingKind::ReadonlyReassigned { first_line: 3 }
    );
}
