//! C++ Emitter
//!
//! Two artifacts per schema:
//! - `<stem>.h`: enum types and accessor declarations in `namespace a::b::C`
//! - `<stem>.cpp`: enum parse tables, parsers/formatters, the native property
//!   store handle and accessor definitions
//!
//! The parsers here and in the JNI bridge follow the same string contract as
//! [`crate::value`].

use std::path::PathBuf;

use crate::names::dotted_to_flat;
use crate::schema::{Property, ScalarType, Schema, Scope};

use super::{
    render, Artifact, CodeWriter, EnumPlacement, GenContext, LanguageProfile, OutputSlot,
    TypeMapping, GENERATED_BANNER,
};

/// Options for the C++ target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CppOptions {
    pub scope: Scope,
    /// Base name of the generated files (`<stem>.h`, `<stem>.cpp`)
    pub stem: String,
    /// How the source includes the header; `<stem>.h` when unset
    pub include_name: Option<String>,
}

impl CppOptions {
    pub fn new(stem: impl Into<String>) -> Self {
        Self {
            scope: Scope::Internal,
            stem: stem.into(),
            include_name: None,
        }
    }

    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    fn header_name(&self) -> String {
        format!("{}.h", self.stem)
    }
}

/// Header and source for one schema
pub fn generate(schema: &Schema, options: &CppOptions) -> Vec<Artifact> {
    let ctx = GenContext::new(schema, options.scope);
    let header = CppHeader {
        file_name: options.header_name(),
    };
    let source = CppSource {
        file_name: format!("{}.cpp", options.stem),
        include_name: options
            .include_name
            .clone()
            .unwrap_or_else(|| options.header_name()),
    };

    vec![render(&header, &ctx), render(&source, &ctx)]
}

// =============================================================================
// Naming and Types
// =============================================================================

/// `android.os.PlatformProperties` -> `android::os::PlatformProperties`
pub fn cpp_namespace(schema: &Schema) -> String {
    dotted_to_flat(&schema.module, "::")
}

pub fn include_guard(schema: &Schema) -> String {
    format!("SYSPROPGEN_{}_H_", dotted_to_flat(&schema.module, "_"))
}

fn scalar_type_name(ty: ScalarType, prop: &Property) -> String {
    match ty {
        ScalarType::Boolean => "bool".to_string(),
        ScalarType::Integer => "std::int32_t".to_string(),
        ScalarType::UInt => "std::uint32_t".to_string(),
        ScalarType::Long => "std::int64_t".to_string(),
        ScalarType::ULong => "std::uint64_t".to_string(),
        ScalarType::Double => "double".to_string(),
        ScalarType::String => "std::string".to_string(),
        ScalarType::Enum => prop.enum_type_name(),
    }
}

pub fn type_mapping(prop: &Property) -> TypeMapping {
    let scalar = prop.prop_type.scalar();
    let element = scalar_type_name(scalar, prop);

    let type_name = if prop.prop_type.is_list() {
        format!("std::vector<{}>", element)
    } else {
        element
    };

    let formatter = match (scalar, prop.prop_type.is_list()) {
        (ScalarType::String, false) => None,
        (ScalarType::Boolean, false) if prop.integer_as_bool => Some("FormatBoolAsInt"),
        (ScalarType::Boolean, true) if prop.integer_as_bool => Some("FormatBoolListAsInt"),
        _ => Some("FormatValue"),
    };

    TypeMapping {
        accept_type: format!("const {}&", type_name),
        parser: format!("TryParse<{}>", type_name),
        type_name,
        formatter,
    }
}

fn deprecation(prop: &Property) -> &'static str {
    if prop.deprecated {
        "[[deprecated]] "
    } else {
        ""
    }
}

// =============================================================================
// Header
// =============================================================================

const HEADER_INCLUDES: &str = "#include <cstdint>
#include <optional>
#include <string>
#include <vector>

";

struct CppHeader {
    file_name: String,
}

impl LanguageProfile for CppHeader {
    fn slot(&self) -> OutputSlot {
        OutputSlot::CppHeader
    }

    fn relative_path(&self, _ctx: &GenContext<'_>) -> PathBuf {
        PathBuf::from(&self.file_name)
    }

    fn prologue(&self, ctx: &GenContext<'_>, w: &mut CodeWriter) {
        let guard = include_guard(ctx.schema);

        w.write(GENERATED_BANNER);
        write!(w, "#ifndef {guard}\n#define {guard}\n\n");
        w.write(HEADER_INCLUDES);
        write!(w, "namespace {} {{\n\n", cpp_namespace(ctx.schema));
    }

    fn enum_decl(&self, _ctx: &GenContext<'_>, prop: &Property, w: &mut CodeWriter) {
        write!(w, "enum class {} {{\n", prop.enum_type_name());
        w.indent();
        for value in &prop.enum_values {
            write!(w, "{},\n", value);
        }
        w.dedent();
        w.write("};\n\n");
    }

    fn getter(&self, _ctx: &GenContext<'_>, prop: &Property, w: &mut CodeWriter) {
        let types = type_mapping(prop);
        write!(
            w,
            "{}std::optional<{}> {}();\n",
            deprecation(prop),
            types.type_name,
            prop.identifier()
        );
    }

    fn setter(&self, _ctx: &GenContext<'_>, prop: &Property, w: &mut CodeWriter) {
        let types = type_mapping(prop);
        write!(
            w,
            "{}bool {}({} value);\n",
            deprecation(prop),
            prop.identifier(),
            types.accept_type
        );
    }

    fn epilogue(&self, ctx: &GenContext<'_>, w: &mut CodeWriter) {
        write!(w, "\n}}  // namespace {}\n\n", cpp_namespace(ctx.schema));
        write!(w, "#endif  // {}\n", include_guard(ctx.schema));
    }
}

// =============================================================================
// Source
// =============================================================================

const SOURCE_INCLUDES: &str = "#include <cctype>
#include <cerrno>
#include <cmath>
#include <cstdlib>
#include <cstring>
#include <iterator>
#include <limits>
#include <type_traits>
#include <utility>

#include <dlfcn.h>
#include <strings.h>

#include <android-base/logging.h>
#include <android-base/parseint.h>
#include <android-base/stringprintf.h>
#include <android-base/strings.h>

";

const PARSERS_AND_FORMATTERS: &str = r#"template <typename T> constexpr bool is_vector = false;

template <typename T> constexpr bool is_vector<std::vector<T>> = true;

template <> [[maybe_unused]] std::optional<bool> DoParse(const char* str) {
    static constexpr const char* kYes[] = {"1", "true"};
    static constexpr const char* kNo[] = {"0", "false"};

    for (const char* yes : kYes) {
        if (strcasecmp(yes, str) == 0) return std::make_optional(true);
    }

    for (const char* no : kNo) {
        if (strcasecmp(no, str) == 0) return std::make_optional(false);
    }

    return std::nullopt;
}

template <> [[maybe_unused]] std::optional<std::int32_t> DoParse(const char* str) {
    std::int32_t ret;
    bool success = android::base::ParseInt(str, &ret);
    return success ? std::make_optional(ret) : std::nullopt;
}

template <> [[maybe_unused]] std::optional<std::uint32_t> DoParse(const char* str) {
    std::uint32_t ret;
    bool success = android::base::ParseUint(str, &ret);
    return success ? std::make_optional(ret) : std::nullopt;
}

template <> [[maybe_unused]] std::optional<std::int64_t> DoParse(const char* str) {
    std::int64_t ret;
    bool success = android::base::ParseInt(str, &ret);
    return success ? std::make_optional(ret) : std::nullopt;
}

template <> [[maybe_unused]] std::optional<std::uint64_t> DoParse(const char* str) {
    std::uint64_t ret;
    bool success = android::base::ParseUint(str, &ret);
    return success ? std::make_optional(ret) : std::nullopt;
}

template <> [[maybe_unused]] std::optional<double> DoParse(const char* str) {
    // Plain decimal only: strtod also takes leading spaces and hex floats.
    if (*str == '\0' || std::isspace(static_cast<unsigned char>(*str)) || std::strpbrk(str, "xX") != nullptr) {
        return std::nullopt;
    }
    int old_errno = errno;
    errno = 0;
    char* end;
    double ret = std::strtod(str, &end);
    bool success = errno == 0 && str != end && *end == '\0' && std::isfinite(ret);
    errno = old_errno;
    return success ? std::make_optional(ret) : std::nullopt;
}

template <> [[maybe_unused]] std::optional<std::string> DoParse(const char* str) {
    return std::make_optional(str);
}

template <typename Vec> [[maybe_unused]] std::optional<Vec> DoParseList(const char* str) {
    Vec ret;
    if (*str == '\0') return std::make_optional(std::move(ret));
    for (auto&& element : android::base::Split(str, ",")) {
        auto parsed = DoParse<typename Vec::value_type>(element.c_str());
        if (!parsed) {
            return std::nullopt;
        }
        ret.emplace_back(std::move(*parsed));
    }
    return std::make_optional(std::move(ret));
}

template <typename T> inline std::optional<T> TryParse(const char* str) {
    if constexpr(is_vector<T>) {
        return DoParseList<T>(str);
    } else {
        return DoParse<T>(str);
    }
}

[[maybe_unused]] std::string FormatValue(std::int32_t value) {
    return std::to_string(value);
}

[[maybe_unused]] std::string FormatValue(std::uint32_t value) {
    return std::to_string(value);
}

[[maybe_unused]] std::string FormatValue(std::int64_t value) {
    return std::to_string(value);
}

[[maybe_unused]] std::string FormatValue(std::uint64_t value) {
    return std::to_string(value);
}

[[maybe_unused]] std::string FormatValue(double value) {
    return android::base::StringPrintf("%.*g", std::numeric_limits<double>::max_digits10, value);
}

[[maybe_unused]] std::string FormatValue(bool value) {
    return value ? "true" : "false";
}

[[maybe_unused]] std::string FormatBoolAsInt(bool value) {
    return value ? "1" : "0";
}

template <typename T>
[[maybe_unused]] std::string FormatValue(const std::vector<T>& value) {
    std::string ret;

    for (auto it = value.begin(); it != value.end(); ++it) {
        if (it != value.begin()) ret.push_back(',');
        if constexpr(std::is_same_v<T, std::string>) {
            ret += *it;
        } else {
            ret += FormatValue(static_cast<T>(*it));
        }
    }

    return ret;
}

[[maybe_unused]] std::string FormatBoolListAsInt(const std::vector<bool>& value) {
    std::string ret;

    for (std::size_t i = 0; i < value.size(); ++i) {
        if (i > 0) ret.push_back(',');
        ret += FormatBoolAsInt(value[i]);
    }

    return ret;
}

"#;

/// Lazily opened libc property functions, closed again at process exit.
/// Shared with the JNI bridge.
pub(crate) const LIBC_HANDLE: &str = r#"struct prop_info;

class Libc {
  public:
    static const Libc& Get() {
        static const Libc instance;
        return instance;
    }

    Libc(const Libc&) = delete;
    Libc& operator=(const Libc&) = delete;

    ~Libc() {
        if (handle_ != nullptr) dlclose(handle_);
    }

    const prop_info* (*find)(const char* name) = nullptr;

    void (*read_callback)(
        const prop_info* pi,
        void (*callback)(void* cookie, const char* name, const char* value, std::uint32_t serial),
        void* cookie
    ) = nullptr;

    int (*set)(const char* key, const char* value) = nullptr;

  private:
    Libc() : handle_(dlopen("libc.so", RTLD_LAZY | RTLD_NOLOAD)) {
        if (handle_ == nullptr) {
            LOG(FATAL) << "Cannot open libc.so: " << dlerror();
        }

        find = reinterpret_cast<decltype(find)>(dlsym(handle_, "__system_property_find"));
        read_callback = reinterpret_cast<decltype(read_callback)>(dlsym(handle_, "__system_property_read_callback"));
        set = reinterpret_cast<decltype(set)>(dlsym(handle_, "__system_property_set"));
    }

    void* handle_;
};

"#;

const PROPERTY_ACCESS: &str = r#"template <typename T>
struct PropResult {
    bool found = false;
    std::optional<T> value;
};

template <typename T>
PropResult<T> ReadProp(const char* key) {
    const Libc& libc = Libc::Get();
    PropResult<T> ret;
    auto pi = libc.find(key);
    if (pi == nullptr) return ret;
    ret.found = true;
    libc.read_callback(pi, [](void* cookie, const char*, const char* value, std::uint32_t) {
        static_cast<PropResult<T>*>(cookie)->value = TryParse<T>(value);
    }, &ret);
    return ret;
}

template <typename T>
std::optional<T> GetProp(const char* key) {
    auto ret = ReadProp<T>(key);
    if (ret.found && !ret.value) {
        LOG(DEBUG) << "Failed to parse the property " << key;
    }
    return ret.value;
}

template <typename T>
std::optional<T> GetProp(const char* key, const char* legacy_key) {
    auto ret = ReadProp<T>(key);
    if (!ret.found || ret.value) return ret.value;
    LOG(DEBUG) << "Failed to parse the property " << key
               << ", falling back to the legacy one " << legacy_key;
    return GetProp<T>(legacy_key);
}

[[maybe_unused]] bool SetProp(const char* key, const std::string& value) {
    return Libc::Get().set(key, value.c_str()) == 0;
}

"#;

struct CppSource {
    file_name: String,
    include_name: String,
}

impl LanguageProfile for CppSource {
    fn slot(&self) -> OutputSlot {
        OutputSlot::CppSource
    }

    fn relative_path(&self, _ctx: &GenContext<'_>) -> PathBuf {
        PathBuf::from(&self.file_name)
    }

    fn enum_placement(&self) -> EnumPlacement {
        EnumPlacement::Preamble
    }

    fn prologue(&self, ctx: &GenContext<'_>, w: &mut CodeWriter) {
        w.write(GENERATED_BANNER);
        write!(w, "#include <{}>\n\n", self.include_name);
        w.write(SOURCE_INCLUDES);
        w.write("namespace {\n\n");
        write!(w, "using namespace {};\n\n", cpp_namespace(ctx.schema));
        w.write("template <typename T> std::optional<T> DoParse(const char* str);\n\n");
    }

    /// Parse table, parser and (for writable properties) formatter of one enum
    fn enum_decl(&self, ctx: &GenContext<'_>, prop: &Property, w: &mut CodeWriter) {
        let id = prop.identifier();
        let enum_name = prop.enum_type_name();

        write!(
            w,
            "constexpr const std::pair<const char*, {}> {}_list[] = {{\n",
            enum_name, id
        );
        w.indent();
        for value in &prop.enum_values {
            write!(w, "{{\"{}\", {}::{}}},\n", value, enum_name, value);
        }
        w.dedent();
        w.write("};\n\n");

        w.write("template <>\n");
        write!(w, "std::optional<{}> DoParse(const char* str) {{\n", enum_name);
        w.indent();
        write!(w, "for (auto [name, val] : {}_list) {{\n", id);
        w.indent();
        w.write("if (strcmp(str, name) == 0) {\n");
        w.indent();
        w.write("return val;\n");
        w.dedent();
        w.write("}\n");
        w.dedent();
        w.write("}\n");
        w.write("return std::nullopt;\n");
        w.dedent();
        w.write("}\n\n");

        if prop.is_readonly() {
            return;
        }

        write!(w, "std::string FormatValue({} value) {{\n", enum_name);
        w.indent();
        write!(w, "for (auto [name, val] : {}_list) {{\n", id);
        w.indent();
        w.write("if (val == value) {\n");
        w.indent();
        w.write("return name;\n");
        w.dedent();
        w.write("}\n");
        w.dedent();
        w.write("}\n");
        write!(
            w,
            "LOG(FATAL) << \"Invalid value \" << static_cast<std::int32_t>(value) << \" for property \" << \"{}\";\n",
            ctx.key(prop)
        );
        w.write("__builtin_unreachable();\n");
        w.dedent();
        w.write("}\n\n");
    }

    fn interlude(&self, ctx: &GenContext<'_>, w: &mut CodeWriter) {
        w.write(PARSERS_AND_FORMATTERS);
        w.write(LIBC_HANDLE);
        w.write(PROPERTY_ACCESS);
        w.write("}  // namespace\n\n");
        write!(w, "namespace {} {{\n\n", cpp_namespace(ctx.schema));
    }

    fn getter(&self, ctx: &GenContext<'_>, prop: &Property, w: &mut CodeWriter) {
        let types = type_mapping(prop);

        write!(w, "std::optional<{}> {}() {{\n", types.type_name, prop.identifier());
        w.indent();
        match &prop.legacy_prop_name {
            Some(legacy) => write!(
                w,
                "return GetProp<{}>(\"{}\", \"{}\");\n",
                types.type_name,
                ctx.key(prop),
                legacy
            ),
            None => write!(w, "return GetProp<{}>(\"{}\");\n", types.type_name, ctx.key(prop)),
        }
        w.dedent();
        w.write("}\n");
    }

    fn setter(&self, ctx: &GenContext<'_>, prop: &Property, w: &mut CodeWriter) {
        let types = type_mapping(prop);
        let value = match types.formatter {
            Some(formatter) => format!("{}(value)", formatter),
            None => "value".to_string(),
        };

        write!(
            w,
            "\nbool {}({} value) {{\n",
            prop.identifier(),
            types.accept_type
        );
        w.indent();
        write!(w, "return SetProp(\"{}\", {});\n", ctx.key(prop), value);
        w.dedent();
        w.write("}\n");
    }

    fn epilogue(&self, ctx: &GenContext<'_>, w: &mut CodeWriter) {
        write!(w, "\n}}  // namespace {}\n", cpp_namespace(ctx.schema));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Access, Owner, PropType};

    fn prop(name: &str, prop_type: PropType, access: Access) -> Property {
        Property {
            name: name.to_string(),
            prop_type,
            scope: Scope::Public,
            access,
            enum_values: if prop_type.is_enum() {
                vec!["a".to_string(), "b".to_string(), "D".to_string()]
            } else {
                Vec::new()
            },
            deprecated: false,
            legacy_prop_name: None,
            integer_as_bool: false,
        }
    }

    fn schema(props: Vec<Property>) -> Schema {
        Schema {
            owner: Owner::Platform,
            module: "android.os.PlatformProperties".to_string(),
            prefix: "android".to_string(),
            props,
        }
    }

    fn generate_pair(schema: &Schema) -> (String, String) {
        let mut artifacts = generate(schema, &CppOptions::new("PlatformProperties.sysprop"));
        assert_eq!(artifacts.len(), 2);
        let source = artifacts.pop().unwrap();
        let header = artifacts.pop().unwrap();
        assert_eq!(header.relative_path, PathBuf::from("PlatformProperties.sysprop.h"));
        assert_eq!(source.relative_path, PathBuf::from("PlatformProperties.sysprop.cpp"));
        (header.contents, source.contents)
    }

    #[test]
    fn test_type_mapping_table() {
        let cases = [
            (PropType::Boolean, "bool"),
            (PropType::UInt, "std::uint32_t"),
            (PropType::ULongList, "std::vector<std::uint64_t>"),
            (PropType::StringList, "std::vector<std::string>"),
            (PropType::EnumList, "std::vector<TestValues>"),
        ];
        for (prop_type, expected) in cases {
            let p = prop("test", prop_type, Access::ReadWrite);
            assert_eq!(type_mapping(&p).type_name, expected, "{:?}", prop_type);
        }

        let p = prop("s", PropType::String, Access::ReadWrite);
        assert_eq!(type_mapping(&p).formatter, None);
        assert_eq!(type_mapping(&p).accept_type, "const std::string&");

        let mut p = prop("b", PropType::BooleanList, Access::ReadWrite);
        p.integer_as_bool = true;
        assert_eq!(type_mapping(&p).formatter, Some("FormatBoolListAsInt"));
    }

    #[test]
    fn test_header_layout() {
        let mut deprecated = prop("old.value", PropType::Long, Access::ReadWrite);
        deprecated.deprecated = true;
        let s = schema(vec![
            prop("test.enum", PropType::Enum, Access::ReadWrite),
            prop("test.int", PropType::Integer, Access::Readonly),
            deprecated,
        ]);
        let (header, _) = generate_pair(&s);

        assert!(header.starts_with("// Generated by the sysprop generator. DO NOT EDIT!\n\n"));
        assert!(header.contains(
            "#ifndef SYSPROPGEN_android_os_PlatformProperties_H_\n\
             #define SYSPROPGEN_android_os_PlatformProperties_H_\n"
        ));
        assert!(header.contains("namespace android::os::PlatformProperties {\n"));
        assert!(header.contains("enum class TestEnumValues {\n    a,\n    b,\n    D,\n};\n"));
        assert!(header.contains("std::optional<TestEnumValues> test_enum();\n"));
        assert!(header.contains("bool test_enum(const TestEnumValues& value);\n"));
        assert!(header.contains("std::optional<std::int32_t> test_int();\n"));
        assert!(!header.contains("bool test_int("));
        assert!(header.contains("[[deprecated]] std::optional<std::int64_t> old_value();\n"));
        assert!(header.contains("[[deprecated]] bool old_value(const std::int64_t& value);\n"));
        assert!(header.ends_with("#endif  // SYSPROPGEN_android_os_PlatformProperties_H_\n"));
    }

    #[test]
    fn test_source_accessors() {
        let mut legacy = prop("test.string", PropType::String, Access::Readonly);
        legacy.legacy_prop_name = Some("legacy.test.string".to_string());
        let mut as_int = prop("flag", PropType::Boolean, Access::Writeonce);
        as_int.integer_as_bool = true;

        let s = schema(vec![
            prop("test.int", PropType::Integer, Access::ReadWrite),
            legacy,
            as_int,
            prop("name", PropType::String, Access::ReadWrite),
        ]);
        let (_, source) = generate_pair(&s);

        assert!(source.contains("#include <PlatformProperties.sysprop.h>\n"));
        assert!(source.contains("using namespace android::os::PlatformProperties;\n"));
        assert!(source.contains(
            "std::optional<std::int32_t> test_int() {\n    \
             return GetProp<std::int32_t>(\"android.test.int\");\n}\n"
        ));
        assert!(source.contains(
            "bool test_int(const std::int32_t& value) {\n    \
             return SetProp(\"android.test.int\", FormatValue(value));\n}\n"
        ));
        assert!(source.contains(
            "return GetProp<std::string>(\"ro.android.test.string\", \"legacy.test.string\");\n"
        ));
        assert!(source.contains("return SetProp(\"android.flag\", FormatBoolAsInt(value));\n"));
        assert!(source.contains("return SetProp(\"android.name\", value);\n"));
        assert!(source.ends_with("}  // namespace android::os::PlatformProperties\n"));
    }

    #[test]
    fn test_source_enum_tables() {
        let s = schema(vec![
            prop("mode", PropType::Enum, Access::ReadWrite),
            prop("modes", PropType::EnumList, Access::Readonly),
        ]);
        let (_, source) = generate_pair(&s);

        assert!(source.contains(
            "constexpr const std::pair<const char*, ModeValues> mode_list[] = {\n    \
             {\"a\", ModeValues::a},\n    {\"b\", ModeValues::b},\n    {\"D\", ModeValues::D},\n};\n"
        ));
        assert!(source.contains("std::optional<ModeValues> DoParse(const char* str) {\n"));
        assert!(source.contains("std::optional<ModesValues> DoParse(const char* str) {\n"));
        assert!(source.contains("std::string FormatValue(ModeValues value) {\n"));
        assert!(!source.contains("std::string FormatValue(ModesValues value)"));
        assert!(source.contains("<< \"android.mode\";\n    __builtin_unreachable();\n"));

        // Enum tables live in the anonymous namespace, ahead of the shared parsers.
        let table = source.find("mode_list[]").unwrap();
        let parsers = source.find("constexpr bool is_vector").unwrap();
        let accessors = source.find("namespace android::os::PlatformProperties {").unwrap();
        assert!(table < parsers && parsers < accessors);
    }

    #[test]
    fn test_double_parser_rejects_non_finite() {
        let s = schema(vec![prop("ratio", PropType::Double, Access::Readonly)]);
        let (_, source) = generate_pair(&s);

        assert!(source.contains("#include <cmath>\n"));
        assert!(source.contains("std::strpbrk(str, \"xX\") != nullptr"));
        assert!(source.contains(
            "bool success = errno == 0 && str != end && *end == '\\0' && std::isfinite(ret);\n    \
             errno = old_errno;\n"
        ));
    }

    #[test]
    fn test_native_handle_is_lazy() {
        let s = schema(vec![prop("x", PropType::Integer, Access::Readonly)]);
        let (_, source) = generate_pair(&s);

        assert!(source.contains("static const Libc instance;"));
        assert!(source.contains("~Libc() {"));
        assert!(!source.contains("__attribute__((constructor))"));
    }

    #[test]
    fn test_include_name_override() {
        let s = schema(vec![prop("x", PropType::Integer, Access::Readonly)]);
        let mut options = CppOptions::new("props");
        options.include_name = Some("android/sysprop/props.h".to_string());

        let artifacts = generate(&s, &options);
        assert!(artifacts[1].contents.contains("#include <android/sysprop/props.h>\n"));
        assert_eq!(artifacts[0].relative_path, PathBuf::from("props.h"));
    }
}
