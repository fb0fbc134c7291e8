//! Java Emitter
//!
//! A final class with static accessors, backed by a JNI bridge that does the
//! native property-store calls:
//! - `<package dirs>/<Class>.java`
//! - `<Class>_jni.cpp`, registering `native_<flat>_get` / `native_<flat>_set`
//!   (and `native_<flat>_legacy_get` when the property has a legacy key)
//!
//! The bridge only moves strings; parsing and formatting happen in Java.

use std::path::PathBuf;

use crate::names::dotted_to_flat;
use crate::schema::{Property, ScalarType, Schema, Scope};

use super::cpp::LIBC_HANDLE;
use super::{
    render, Artifact, CodeWriter, GenContext, LanguageProfile, OutputSlot, TypeMapping,
    GENERATED_BANNER,
};

/// Options for the Java target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JavaOptions {
    pub scope: Scope,
}

impl Default for JavaOptions {
    fn default() -> Self {
        Self {
            scope: Scope::Internal,
        }
    }
}

/// Java class and JNI bridge for one schema
pub fn generate(schema: &Schema, options: &JavaOptions) -> Vec<Artifact> {
    let ctx = GenContext::new(schema, options.scope);
    vec![render(&JavaClass, &ctx), render(&JniLibrary, &ctx)]
}

// =============================================================================
// Naming and Types
// =============================================================================

/// Directory of the generated class, relative to the Java output root
pub fn package_dir(schema: &Schema) -> PathBuf {
    PathBuf::from(dotted_to_flat(schema.module_package(), "/"))
}

fn native_get(prop: &Property) -> String {
    format!("native_{}_get", prop.identifier())
}

fn native_legacy_get(prop: &Property) -> String {
    format!("native_{}_legacy_get", prop.identifier())
}

fn native_set(prop: &Property) -> String {
    format!("native_{}_set", prop.identifier())
}

fn scalar_type_name(ty: ScalarType, prop: &Property) -> String {
    match ty {
        ScalarType::Boolean => "Boolean".to_string(),
        ScalarType::Integer | ScalarType::UInt => "Integer".to_string(),
        ScalarType::Long | ScalarType::ULong => "Long".to_string(),
        ScalarType::Double => "Double".to_string(),
        ScalarType::String => "String".to_string(),
        ScalarType::Enum => prop.enum_type_name(),
    }
}

/// Element parser as a `String -> T` lambda body
fn scalar_parser(ty: ScalarType, prop: &Property, arg: &str) -> String {
    match ty {
        ScalarType::Boolean => format!("tryParseBoolean({})", arg),
        ScalarType::Integer => format!("tryParseInteger({})", arg),
        ScalarType::UInt => format!("tryParseUInt({})", arg),
        ScalarType::Long => format!("tryParseLong({})", arg),
        ScalarType::ULong => format!("tryParseULong({})", arg),
        ScalarType::Double => format!("tryParseDouble({})", arg),
        ScalarType::String => format!("tryParseString({})", arg),
        ScalarType::Enum => format!("tryParseEnum({}.class, {})", prop.enum_type_name(), arg),
    }
}

pub fn type_mapping(prop: &Property) -> TypeMapping {
    let scalar = prop.prop_type.scalar();
    let element = scalar_type_name(scalar, prop);
    let is_list = prop.prop_type.is_list();

    let type_name = if is_list {
        format!("List<{}>", element)
    } else {
        element
    };

    let parser = match (scalar, is_list) {
        (_, false) => format!("v -> {}", scalar_parser(scalar, prop, "v")),
        (ScalarType::Enum, true) => {
            format!("v -> tryParseEnumList({}.class, v)", prop.enum_type_name())
        }
        (_, true) => format!("v -> tryParseList(e -> {}, v)", scalar_parser(scalar, prop, "e")),
    };

    let formatter = match (scalar, is_list) {
        (ScalarType::String, false) => None,
        (ScalarType::Boolean, false) if prop.integer_as_bool => Some("formatBoolAsInt"),
        (ScalarType::Boolean, true) if prop.integer_as_bool => Some("formatBoolListAsInt"),
        (ScalarType::UInt, false) => Some("Integer.toUnsignedString"),
        (ScalarType::ULong, false) => Some("Long.toUnsignedString"),
        (ScalarType::UInt, true) => Some("formatUIntList"),
        (ScalarType::ULong, true) => Some("formatULongList"),
        (_, false) => Some("String.valueOf"),
        (_, true) => Some("formatList"),
    };

    TypeMapping {
        accept_type: type_name.clone(),
        type_name,
        parser,
        formatter,
    }
}

fn write_annotations(w: &mut CodeWriter, prop: &Property) {
    match prop.scope {
        Scope::System => w.write("@SystemApi\n"),
        Scope::Internal => w.write("/** @hide */\n"),
        Scope::Public => {}
    }
    if prop.deprecated {
        w.write("@Deprecated\n");
    }
}

// =============================================================================
// Java Class
// =============================================================================

const JAVA_IMPORTS: &str = "import android.annotation.SystemApi;
import android.util.Log;

import java.util.ArrayList;
import java.util.function.Function;
import java.util.function.Supplier;
import java.util.List;
import java.util.Optional;
import java.util.StringJoiner;

";

const JAVA_PARSERS_AND_FORMATTERS: &str = r#"private static Boolean tryParseBoolean(String str) {
    switch (str.toLowerCase()) {
        case "1":
        case "true":
            return Boolean.TRUE;
        case "0":
        case "false":
            return Boolean.FALSE;
        default:
            return null;
    }
}

private static Integer tryParseInteger(String str) {
    try {
        return Integer.valueOf(str);
    } catch (NumberFormatException e) {
        return null;
    }
}

private static Integer tryParseUInt(String str) {
    try {
        return Integer.parseUnsignedInt(str);
    } catch (NumberFormatException e) {
        return null;
    }
}

private static Long tryParseLong(String str) {
    try {
        return Long.valueOf(str);
    } catch (NumberFormatException e) {
        return null;
    }
}

private static Long tryParseULong(String str) {
    try {
        return Long.parseUnsignedLong(str);
    } catch (NumberFormatException e) {
        return null;
    }
}

private static Double tryParseDouble(String str) {
    try {
        Double ret = Double.valueOf(str);
        return ret.isNaN() || ret.isInfinite() ? null : ret;
    } catch (NumberFormatException e) {
        return null;
    }
}

private static String tryParseString(String str) {
    return str;
}

private static <T extends Enum<T>> T tryParseEnum(Class<T> enumType, String str) {
    try {
        return Enum.valueOf(enumType, str);
    } catch (IllegalArgumentException e) {
        return null;
    }
}

private static <T> List<T> tryParseList(Function<String, T> elementParser, String str) {
    List<T> ret = new ArrayList<>();

    for (String element : str.split(",", -1)) {
        T parsed = elementParser.apply(element);
        if (parsed == null) {
            return null;
        }
        ret.add(parsed);
    }

    return ret;
}

private static <T extends Enum<T>> List<T> tryParseEnumList(Class<T> enumType, String str) {
    return tryParseList(element -> tryParseEnum(enumType, element), str);
}

private static <T> T tryParseProp(String key, String value, Function<String, T> parser) {
    if (value.isEmpty()) {
        return null;
    }
    T parsed = parser.apply(value);
    if (parsed == null) {
        Log.d(TAG, "Failed to parse the property " + key + ": '" + value + "'");
    }
    return parsed;
}

private static <T> T tryParseProp(String key, String value, Function<String, T> parser,
        String legacyKey, Supplier<String> legacyValue) {
    if (value.isEmpty()) {
        return null;
    }
    T parsed = parser.apply(value);
    if (parsed != null) {
        return parsed;
    }
    Log.d(TAG, "Failed to parse the property " + key
            + ", falling back to the legacy one " + legacyKey);
    return tryParseProp(legacyKey, legacyValue.get(), parser);
}

private static <T> String formatList(List<T> list) {
    StringJoiner joiner = new StringJoiner(",");

    for (T element : list) {
        joiner.add(String.valueOf(element));
    }

    return joiner.toString();
}

private static String formatUIntList(List<Integer> list) {
    StringJoiner joiner = new StringJoiner(",");

    for (Integer element : list) {
        joiner.add(Integer.toUnsignedString(element));
    }

    return joiner.toString();
}

private static String formatULongList(List<Long> list) {
    StringJoiner joiner = new StringJoiner(",");

    for (Long element : list) {
        joiner.add(Long.toUnsignedString(element));
    }

    return joiner.toString();
}

private static String formatBoolAsInt(Boolean value) {
    return value ? "1" : "0";
}

private static String formatBoolListAsInt(List<Boolean> list) {
    StringJoiner joiner = new StringJoiner(",");

    for (Boolean element : list) {
        joiner.add(formatBoolAsInt(element));
    }

    return joiner.toString();
}

"#;

struct JavaClass;

impl LanguageProfile for JavaClass {
    fn slot(&self) -> OutputSlot {
        OutputSlot::JavaClass
    }

    fn relative_path(&self, ctx: &GenContext<'_>) -> PathBuf {
        package_dir(ctx.schema).join(format!("{}.java", ctx.schema.module_name()))
    }

    fn prologue(&self, ctx: &GenContext<'_>, w: &mut CodeWriter) {
        let class_name = ctx.schema.module_name();

        w.write(GENERATED_BANNER);
        write!(w, "package {};\n\n", ctx.schema.module_package());
        w.write(JAVA_IMPORTS);
        write!(w, "public final class {} {{\n", class_name);
        w.indent();
        write!(w, "private static final String TAG = \"{}\";\n\n", class_name);
        write!(w, "private {} () {{}}\n\n", class_name);
        w.write("static {\n");
        w.indent();
        write!(w, "System.loadLibrary(\"{}_jni\");\n", class_name);
        w.dedent();
        w.write("}\n\n");
        w.write(JAVA_PARSERS_AND_FORMATTERS);
    }

    fn enum_decl(&self, _ctx: &GenContext<'_>, prop: &Property, w: &mut CodeWriter) {
        write_annotations(w, prop);
        write!(w, "public static enum {} {{\n", prop.enum_type_name());
        w.indent();
        for value in &prop.enum_values {
            write!(w, "{},\n", value);
        }
        w.dedent();
        w.write("}\n\n");
    }

    fn getter(&self, ctx: &GenContext<'_>, prop: &Property, w: &mut CodeWriter) {
        let types = type_mapping(prop);
        let key = ctx.key(prop);

        write_annotations(w, prop);
        write!(
            w,
            "public static Optional<{}> {}() {{\n",
            types.type_name,
            prop.identifier()
        );
        w.indent();
        match &prop.legacy_prop_name {
            Some(legacy) => write!(
                w,
                "return Optional.ofNullable(tryParseProp(\"{}\", {}(), {}, \"{}\", () -> {}()));\n",
                key,
                native_get(prop),
                types.parser,
                legacy,
                native_legacy_get(prop)
            ),
            None => write!(
                w,
                "return Optional.ofNullable(tryParseProp(\"{}\", {}(), {}));\n",
                key,
                native_get(prop),
                types.parser
            ),
        }
        w.dedent();
        w.write("}\n\n");

        write!(w, "private static native String {}();\n", native_get(prop));
        if prop.legacy_prop_name.is_some() {
            write!(w, "private static native String {}();\n", native_legacy_get(prop));
        }
    }

    fn setter(&self, _ctx: &GenContext<'_>, prop: &Property, w: &mut CodeWriter) {
        let types = type_mapping(prop);
        let value = match types.formatter {
            Some(formatter) => format!("{}(value)", formatter),
            None => "value".to_string(),
        };

        w.write("\n");
        write_annotations(w, prop);
        write!(
            w,
            "public static boolean {}({} value) {{\n",
            prop.identifier(),
            types.accept_type
        );
        w.indent();
        write!(w, "return {}({});\n", native_set(prop), value);
        w.dedent();
        w.write("}\n\n");
        write!(w, "private static native boolean {}(String str);\n", native_set(prop));
    }

    fn epilogue(&self, _ctx: &GenContext<'_>, w: &mut CodeWriter) {
        w.dedent();
        w.write("}\n");
    }
}

// =============================================================================
// JNI Library
// =============================================================================

const JNI_INCLUDES: &str = "#include <cstdint>
#include <iterator>
#include <string>

#include <dlfcn.h>
#include <jni.h>

#include <android-base/logging.h>

";

const JNI_UTILS: &str = r#"[[maybe_unused]] jstring GetProp(JNIEnv* env, const char* key) {
    const Libc& libc = Libc::Get();
    auto pi = libc.find(key);
    if (pi == nullptr) return env->NewStringUTF("");
    std::string ret;
    libc.read_callback(pi, [](void* cookie, const char*, const char* value, std::uint32_t) {
        *static_cast<std::string*>(cookie) = value;
    }, &ret);
    return env->NewStringUTF(ret.c_str());
}

class ScopedUtfChars {
  public:
    ScopedUtfChars(JNIEnv* env, jstring s) : env_(env), string_(s) {
        utf_chars_ = env->GetStringUTFChars(s, nullptr);
    }

    ~ScopedUtfChars() {
        if (utf_chars_) {
            env_->ReleaseStringUTFChars(string_, utf_chars_);
        }
    }

    const char* c_str() const {
        return utf_chars_;
    }

  private:
    JNIEnv* env_;
    jstring string_;
    const char* utf_chars_;
};

"#;

const JNI_ONLOAD: &str = r#"jint JNI_OnLoad(JavaVM* vm, void*) {
    JNIEnv* env = nullptr;

    if (vm->GetEnv(reinterpret_cast<void**>(&env), JNI_VERSION_1_6) != JNI_OK) {
        LOG(ERROR) << "GetEnv failed";
        return -1;
    }

    jclass clazz = env->FindClass(kClassName);
    if (clazz == nullptr) {
        LOG(ERROR) << "Cannot find class " << kClassName;
        return -1;
    }

    if (env->RegisterNatives(clazz, methods, std::size(methods)) < 0) {
        LOG(ERROR) << "RegisterNatives failed";
        return -1;
    }

    return JNI_VERSION_1_6;
}
"#;

const JNI_ONLOAD_EMPTY: &str = r#"jint JNI_OnLoad(JavaVM*, void*) {
    return JNI_VERSION_1_6;
}
"#;

struct JniLibrary;

impl LanguageProfile for JniLibrary {
    fn slot(&self) -> OutputSlot {
        OutputSlot::JniLibrary
    }

    fn relative_path(&self, ctx: &GenContext<'_>) -> PathBuf {
        PathBuf::from(format!("{}_jni.cpp", ctx.schema.module_name()))
    }

    fn prologue(&self, ctx: &GenContext<'_>, w: &mut CodeWriter) {
        w.write(GENERATED_BANNER);
        write!(w, "#define LOG_TAG \"{}_jni\"\n\n", ctx.schema.module);
        w.write(JNI_INCLUDES);
        w.write("namespace {\n\n");
        write!(
            w,
            "constexpr const char* kClassName = \"{}\";\n\n",
            dotted_to_flat(&ctx.schema.module, "/")
        );
        w.write(LIBC_HANDLE);
        w.write(JNI_UTILS);
    }

    fn separator(&self, _index: usize, _w: &mut CodeWriter) {}

    // Enums only exist on the Java side
    fn enum_decl(&self, _ctx: &GenContext<'_>, _prop: &Property, _w: &mut CodeWriter) {}

    fn getter(&self, ctx: &GenContext<'_>, prop: &Property, w: &mut CodeWriter) {
        let id = prop.identifier();

        write!(w, "jstring JNICALL {}_get(JNIEnv* env, jclass) {{\n", id);
        w.indent();
        write!(w, "return GetProp(env, \"{}\");\n", ctx.key(prop));
        w.dedent();
        w.write("}\n\n");

        if let Some(legacy) = &prop.legacy_prop_name {
            write!(w, "jstring JNICALL {}_legacy_get(JNIEnv* env, jclass) {{\n", id);
            w.indent();
            write!(w, "return GetProp(env, \"{}\");\n", legacy);
            w.dedent();
            w.write("}\n\n");
        }
    }

    fn setter(&self, ctx: &GenContext<'_>, prop: &Property, w: &mut CodeWriter) {
        write!(
            w,
            "jboolean JNICALL {}_set(JNIEnv* env, jclass, jstring str) {{\n",
            prop.identifier()
        );
        w.indent();
        write!(
            w,
            "return Libc::Get().set(\"{}\", ScopedUtfChars(env, str).c_str()) == 0 ? JNI_TRUE : JNI_FALSE;\n",
            ctx.key(prop)
        );
        w.dedent();
        w.write("}\n\n");
    }

    fn epilogue(&self, ctx: &GenContext<'_>, w: &mut CodeWriter) {
        // An empty `methods[]` is ill-formed C++; nothing to register then.
        if ctx.props.is_empty() {
            w.write("}  // namespace\n\n");
            w.write(JNI_ONLOAD_EMPTY);
            return;
        }

        w.write("const JNINativeMethod methods[] = {\n");
        w.indent();
        for prop in &ctx.props {
            let id = prop.identifier();
            write!(
                w,
                "{{\"{}\", \"()Ljava/lang/String;\", reinterpret_cast<void*>({}_get)}},\n",
                native_get(prop),
                id
            );
            if prop.legacy_prop_name.is_some() {
                write!(
                    w,
                    "{{\"{}\", \"()Ljava/lang/String;\", reinterpret_cast<void*>({}_legacy_get)}},\n",
                    native_legacy_get(prop),
                    id
                );
            }
            if !prop.is_readonly() {
                write!(
                    w,
                    "{{\"{}\", \"(Ljava/lang/String;)Z\", reinterpret_cast<void*>({}_set)}},\n",
                    native_set(prop),
                    id
                );
            }
        }
        w.dedent();
        w.write("};\n\n");
        w.write("}  // namespace\n\n");
        w.write(JNI_ONLOAD);
    }
}
