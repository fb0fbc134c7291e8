//! Schema types and structures
//!
//! Two layers:
//! - [`RawSchema`] / [`RawProperty`]: exactly what the schema file says,
//!   optional fields left unset
//! - [`Schema`] / [`Property`]: the normalized form produced by
//!   [`crate::validate::validate`], handed immutably to the emitters

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SyspropError};
use crate::names;

/// Module name reserved for platform-owned properties
pub const PLATFORM_MODULE: &str = "android.os.PlatformProperties";

/// Key prefix marking a property as read-only in the property store
pub const READONLY_PREFIX: &str = "ro.";

// =============================================================================
// Enumerations
// =============================================================================

/// Who owns the properties of a schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Owner {
    Platform,
    Vendor,
    Odm,
}

/// Visibility tier.
///
/// The declaration order is the total order used for filtering:
/// `Public < System < Internal`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Scope {
    #[serde(alias = "public")]
    Public,
    #[serde(alias = "system")]
    System,
    #[default]
    #[serde(alias = "internal")]
    Internal,
}

impl Scope {
    pub const ALL: [Scope; 3] = [Scope::Public, Scope::System, Scope::Internal];

    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Public => "public",
            Scope::System => "system",
            Scope::Internal => "internal",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scope {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Scope::ALL
            .into_iter()
            .find(|scope| scope.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown scope '{}' (expected public, system or internal)", s))
    }
}

/// How a property may be written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Access {
    Readonly,
    ReadWrite,
    Writeonce,
}

/// Element type of a property, list-ness aside
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    Boolean,
    Integer,
    UInt,
    Long,
    ULong,
    Double,
    String,
    Enum,
}

/// Declared property type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PropType {
    Boolean,
    Integer,
    UInt,
    Long,
    ULong,
    Double,
    String,
    Enum,
    BooleanList,
    IntegerList,
    UIntList,
    LongList,
    ULongList,
    DoubleList,
    StringList,
    EnumList,
}

impl PropType {
    /// The element type (the type itself for scalars)
    pub fn scalar(self) -> ScalarType {
        match self {
            PropType::Boolean | PropType::BooleanList => ScalarType::Boolean,
            PropType::Integer | PropType::IntegerList => ScalarType::Integer,
            PropType::UInt | PropType::UIntList => ScalarType::UInt,
            PropType::Long | PropType::LongList => ScalarType::Long,
            PropType::ULong | PropType::ULongList => ScalarType::ULong,
            PropType::Double | PropType::DoubleList => ScalarType::Double,
            PropType::String | PropType::StringList => ScalarType::String,
            PropType::Enum | PropType::EnumList => ScalarType::Enum,
        }
    }

    pub fn is_list(self) -> bool {
        matches!(
            self,
            PropType::BooleanList
                | PropType::IntegerList
                | PropType::UIntList
                | PropType::LongList
                | PropType::ULongList
                | PropType::DoubleList
                | PropType::StringList
                | PropType::EnumList
        )
    }

    pub fn is_enum(self) -> bool {
        self.scalar() == ScalarType::Enum
    }
}

// =============================================================================
// Raw (as parsed)
// =============================================================================

/// A property exactly as declared in the schema file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawProperty {
    pub name: String,

    #[serde(rename = "type")]
    pub prop_type: PropType,

    #[serde(default)]
    pub scope: Scope,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access: Option<Access>,

    /// Older spelling of `access`; `readonly: false` means `ReadWrite`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub readonly: Option<bool>,

    /// Pipe-delimited enum tokens, e.g. `"on|off"`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<String>,

    #[serde(default)]
    pub deprecated: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legacy_prop_name: Option<String>,

    #[serde(default)]
    pub integer_as_bool: bool,
}

impl RawProperty {
    /// Minimal property: only name and type set
    pub fn new(name: impl Into<String>, prop_type: PropType) -> Self {
        Self {
            name: name.into(),
            prop_type,
            scope: Scope::default(),
            access: None,
            readonly: None,
            enum_values: None,
            deprecated: false,
            legacy_prop_name: None,
            integer_as_bool: false,
        }
    }
}

/// A schema document exactly as parsed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawSchema {
    pub owner: Owner,

    #[serde(default)]
    pub module: String,

    #[serde(default)]
    pub prefix: String,

    #[serde(default, rename = "prop", alias = "props")]
    pub props: Vec<RawProperty>,
}

impl RawSchema {
    /// Read a schema file, picking the decoder from the file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            SyspropError::io(format!("Error reading file {}", path.display()), e)
        })?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&contents).map_err(|message| SyspropError::Parse {
                path: path.to_path_buf(),
                message,
            }),
            Some("toml") | Some("sysprop") => {
                Self::from_toml_str(&contents).map_err(|message| SyspropError::Parse {
                    path: path.to_path_buf(),
                    message,
                })
            }
            _ => Err(SyspropError::UnsupportedFormat(path.to_path_buf())),
        }
    }

    pub fn from_json_str(contents: &str) -> std::result::Result<Self, String> {
        serde_json::from_str(contents).map_err(|e| e.to_string())
    }

    pub fn from_toml_str(contents: &str) -> std::result::Result<Self, String> {
        toml::from_str(contents).map_err(|e| e.to_string())
    }
}

// =============================================================================
// Normalized (validated)
// =============================================================================

/// A validated property with every default filled in
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Property {
    pub name: String,
    #[serde(rename = "type")]
    pub prop_type: PropType,
    pub scope: Scope,
    pub access: Access,
    /// Enum tokens in declaration order; empty for non-enum types
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<String>,
    pub deprecated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legacy_prop_name: Option<String>,
    pub integer_as_bool: bool,
}

impl Property {
    pub fn is_readonly(&self) -> bool {
        self.access == Access::Readonly
    }

    pub fn is_enum(&self) -> bool {
        self.prop_type.is_enum()
    }

    /// Flattened identifier (`a.b` -> `a_b`)
    pub fn identifier(&self) -> String {
        names::prop_identifier(&self.name)
    }

    /// Name of the synthesized enum type, e.g. `TestEnumValues`
    pub fn enum_type_name(&self) -> String {
        format!("{}Values", names::snake_to_camel(&self.identifier()))
    }
}

/// A validated schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Schema {
    pub owner: Owner,
    pub module: String,
    pub prefix: String,
    pub props: Vec<Property>,
}

impl Schema {
    /// Fully-qualified store key of a property:
    /// `ro.` (read-only only) + prefix + `.` + name
    pub fn effective_key(&self, prop: &Property) -> String {
        let mut key = String::new();
        if prop.is_readonly() {
            key.push_str(READONLY_PREFIX);
        }
        key.push_str(&join_prefix(&self.prefix, &prop.name));
        key
    }

    /// Properties visible at `scope`, in declaration order
    pub fn props_in_scope(&self, scope: Scope) -> impl Iterator<Item = &Property> + '_ {
        self.props.iter().filter(move |prop| prop.scope <= scope)
    }

    /// Last module segment (`android.os.PlatformProperties` -> `PlatformProperties`)
    pub fn module_name(&self) -> &str {
        self.module.rsplit('.').next().unwrap_or(&self.module)
    }

    /// Everything before the last module segment
    pub fn module_package(&self) -> &str {
        self.module
            .rsplit_once('.')
            .map(|(package, _)| package)
            .unwrap_or("")
    }
}

/// `prefix` + `name`, inserting a `.` when the prefix does not end in one
pub fn join_prefix(prefix: &str, name: &str) -> String {
    if prefix.is_empty() || prefix.ends_with('.') {
        format!("{}{}", prefix, name)
    } else {
        format!("{}.{}", prefix, name)
    }
}
