//! C text fragments of the generated wrapper

/// Opening of the wrapper; the include list follows
pub const LIB_HEADER: &str = "\
#ifndef _GNU_SOURCE
#define _GNU_SOURCE
#endif
#include <stdio.h>
#include <dlfcn.h>
#include <unistd.h>
";

/// Name of the load-time constructor
pub const INIT_FUNCTION: &str = "wrapgen_init";

/// `#include` line for one recorded header
pub fn include(header: &str) -> String {
    format!("#include \"{}\"\n", header)
}

/// Original pointer and intercepting definition
pub fn function(pointer: &str, prototype: &str, stub: &str) -> String {
    format!("\nstatic {pointer} = NULL;\n{prototype} {{\n{stub}\n}}\n")
}

/// Start of the constructor
pub fn init_header(init: &str) -> String {
    format!(
        "\n__attribute__((constructor)) static void {init}(void) {{\n\
         \t// clear dlerror\n\
         \tdlerror();\n"
    )
}

/// Symbol lookup for one function; a failure is reported, not fatal
pub fn init_lookup(name: &str, pointer: &str, cast: &str) -> String {
    format!(
        "\tif (!({pointer} = ({cast}) dlsym(RTLD_NEXT, \"{name}\")))\n\
         \t\tfprintf(stderr, \"Error looking up {name}: %s\\n\", dlerror());\n"
    )
}

pub const INIT_FOOTER: &str = "}\n";
