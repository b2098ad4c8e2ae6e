//! Extended tests for the declaration extractor
//!
//! These tests run the scanner over preprocessed text shaped like real
//! compiler `-E` output, including line markers and attribute noise.

use super::*;
use pretty_assertions::assert_eq;
use wrapgen_core::Signature;

fn names(list: &[&str]) -> BTreeSet<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn extract(text: &str, requested: &[&str]) -> Extraction {
    DeclarationScanner::new().extract(text, names(requested))
}

/// Preprocessor returning fixed text, standing in for the compiler
struct FixedText(&'static str);

impl Preprocessor for FixedText {
    fn preprocess(&self, _header: &Path) -> Result<String> {
        Ok(self.0.to_string())
    }

    fn name(&self) -> &str {
        "fixed"
    }
}

/// Static functions cannot be resolved with dlsym and stay unmatched
#[test]
fn test_static_function_stays_unmatched() {
    let source = r#"
# 1 "api.h"
int foo(int x, int y);
static int bar(int z);
"#;
    let extraction = extract(source, &["foo", "bar"]);

    assert_eq!(extraction.signatures.len(), 1);
    assert_eq!(extraction.signatures[0].name(), "foo");
    assert_eq!(extraction.signatures[0].parameter_names(), ["x", "y"]);
    assert_eq!(extraction.remaining, names(&["bar"]));
}

/// A definition yields the same signature as the bare prototype
#[test]
fn test_definition_matches_prototype() {
    let prototype = "int add(int a, int b);\n";
    let definition = "int add(int a, int b)\n{\n    return a + b;\n}\n";
    let inline_body = "int add(int a, int b) { return a + b; }\n";

    let from_prototype = extract(prototype, &["add"]).signatures;
    let from_definition = extract(definition, &["add"]).signatures;
    let from_inline_body = extract(inline_body, &["add"]).signatures;

    assert_eq!(from_prototype.len(), 1);
    assert_eq!(from_prototype, from_definition);
    assert_eq!(from_prototype, from_inline_body);
}

/// Default arguments in C++ headers are removed from the parameter list
#[test]
fn test_default_arguments() {
    let source = "int f(int a = 0, char* b = NULL);\n";
    let extraction = extract(source, &["f"]);

    assert_eq!(extraction.signatures[0].parameter_names(), ["a", "b"]);
    assert_eq!(extraction.signatures[0].prototype(), "int f(int a, char* b)");
    assert!(extraction.remaining.is_empty());
}

/// Ambiguous single-token parameter lists are rejected, empty ones are not
#[test]
fn test_single_token_parameter_rejected() {
    let source = "int f(void);\nint g();\n";
    let extraction = extract(source, &["f", "g"]);

    assert_eq!(extraction.signatures.len(), 1);
    assert_eq!(extraction.signatures[0].name(), "g");
    assert!(extraction.signatures[0].parameter_names().is_empty());
    assert_eq!(extraction.remaining, names(&["f"]));
}

/// A rejected forward declaration does not block a later usable one
#[test]
fn test_rejected_name_is_retried() {
    let source = r#"
int scale(int);
int unrelated(int q);
int scale(int factor);
"#;
    let extraction = extract(source, &["scale"]);

    assert_eq!(extraction.signatures.len(), 1);
    assert_eq!(extraction.signatures[0].parameter_names(), ["factor"]);
    assert!(extraction.remaining.is_empty());
}

/// Output follows declaration order in the file, not request order
#[test]
fn test_file_order() {
    let source = r#"
void zeta(int a, int b);
void alpha(float *out, int n);
void mid(char c, long l);
"#;
    let extraction = extract(source, &["alpha", "mid", "zeta"]);
    let found: Vec<&str> = extraction.signatures.iter().map(|s| s.name()).collect();

    assert_eq!(found, vec!["zeta", "alpha", "mid"]);
}

/// Declarations continued over several lines are joined
#[test]
fn test_multiline_declaration() {
    let source = r#"
# 42 "/opt/rocm/include/hip/hip_runtime_api.h"
hipError_t hipMemcpy(void* dst,
                     const void* src,
                     size_t sizeBytes,
                     hipMemcpyKind kind) __attribute__((warn_unused_result));
"#;
    let extraction = extract(source, &["hipMemcpy"]);

    let sig = &extraction.signatures[0];
    assert_eq!(sig.return_type(), "hipError_t");
    assert_eq!(sig.parameter_names(), ["dst", "src", "sizeBytes", "kind"]);
    assert_eq!(
        sig.prototype(),
        "hipError_t hipMemcpy(void* dst, const void* src, size_t sizeBytes, hipMemcpyKind kind)"
    );
}

/// glibc-style extern declarations with trailing attributes
#[test]
fn test_extern_declaration() {
    let source =
        "extern int open_device (const char *__path, int __oflag) __attribute__ ((__nonnull__ (1)));\n";
    let extraction = extract(source, &["open_device"]);

    let sig = &extraction.signatures[0];
    assert_eq!(sig.return_type(), "int");
    assert_eq!(sig.parameter_names(), ["__path", "__oflag"]);
}

/// C++ headers may spell out the linkage on each declaration
#[test]
fn test_extern_c_declaration() {
    let source = r#"
extern "C" hipError_t hipInit(unsigned int flags);
extern "C" {
extern "C" void* hipHostAlloc(size_t sizeBytes,
                              unsigned int flags);
}
"#;
    let extraction = extract(source, &["hipInit", "hipHostAlloc"]);

    assert_eq!(extraction.signatures.len(), 2);
    assert_eq!(extraction.signatures[0].return_type(), "hipError_t");
    assert_eq!(
        extraction.signatures[0].prototype(),
        "hipError_t hipInit(unsigned int flags)"
    );
    assert_eq!(extraction.signatures[1].return_type(), "void*");
    assert_eq!(extraction.signatures[1].parameter_names(), ["sizeBytes", "flags"]);
    assert!(extraction.remaining.is_empty());
}

/// Every requested name ends up either matched or remaining, never both
#[test]
fn test_worklist_partition() {
    let source = r#"
int one(int a, int b);
static int two(int a);
int three(void);
inline int four(int a) { return a; }
long five(long x);
"#;
    let requested = names(&["one", "two", "three", "four", "five", "six"]);
    let extraction = DeclarationScanner::new().extract(source, requested.clone());

    let matched: BTreeSet<String> = extraction
        .signatures
        .iter()
        .map(|s| s.name().to_string())
        .collect();
    assert_eq!(matched, names(&["one", "five"]));
    assert!(matched.is_disjoint(&extraction.remaining));

    let union: BTreeSet<String> = matched.union(&extraction.remaining).cloned().collect();
    assert_eq!(union, requested);
}

/// Unterminated trailing text is dropped without affecting earlier matches
#[test]
fn test_unterminated_declaration() {
    let source = "int ok(int a, int b);\nint broken(int a,\n";
    let extraction = extract(source, &["ok", "broken"]);

    assert_eq!(extraction.signatures.len(), 1);
    assert_eq!(extraction.remaining, names(&["broken"]));
}

/// The extractor preprocesses through the trait and scans the result
#[test]
fn test_extract_header_with_preprocessor() {
    let extractor = DeclarationExtractor::new(FixedText("int foo(int x, int y);\n"));
    let extraction = extractor
        .extract_header(Path::new("api.h"), names(&["foo", "missing"]))
        .unwrap();

    assert_eq!(
        extraction.signatures,
        vec![Signature::parse("foo", "int foo(int x, int y);").unwrap()]
    );
    assert_eq!(extraction.remaining, names(&["missing"]));
    assert_eq!(extractor.preprocessor().name(), "fixed");
}
