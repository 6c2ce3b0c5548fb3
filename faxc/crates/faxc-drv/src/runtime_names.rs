//! The runtime-safety predicate (§6/§4.2 output-id policy): decides whether
//! a source name is safe to reuse verbatim as an emitter-visible `out_id`.
//!
//! Ported from the original analyzer's `is_valid_name` (`semantic.py`),
//! which rejected Python keywords, dunder-wrapped names, and Python builtin
//! names — the target runtime this bytecode format is consumed by is the
//! same Python-hosted VM the original targeted.

const KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global",
    "if", "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return",
    "try", "while", "with", "yield",
];

const BUILTINS: &[&str] = &[
    "abs", "all", "any", "bin", "bool", "bytearray", "bytes", "callable", "chr", "classmethod",
    "compile", "complex", "delattr", "dict", "dir", "divmod", "enumerate", "eval", "exec",
    "filter", "float", "format", "frozenset", "getattr", "globals", "hasattr", "hash", "help",
    "hex", "id", "input", "int", "isinstance", "issubclass", "iter", "len", "list", "locals",
    "map", "max", "memoryview", "min", "next", "object", "oct", "open", "ord", "pow", "print",
    "property", "range", "repr", "reversed", "round", "set", "setattr", "slice", "sorted",
    "staticmethod", "str", "sum", "super", "tuple", "type", "vars", "zip",
];

fn is_dunder_wrapped(name: &str) -> bool {
    name.starts_with('_') && name.ends_with('_')
}

/// The predicate `faxc_sem::Analyzer::new` is configured with.
pub fn is_valid_name(name: &str) -> bool {
    !(KEYWORDS.contains(&name) || BUILTINS.contains(&name) || is_dunder_wrapped(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordinary_name_is_valid() {
        assert!(is_valid_name("contador"));
    }

    #[test]
    fn test_keyword_is_invalid() {
        assert!(!is_valid_name("class"));
    }

    #[test]
    fn test_builtin_is_invalid() {
        assert!(!is_valid_name("print"));
    }

    #[test]
    fn test_dunder_wrapped_is_invalid() {
        assert!(!is_valid_name("_private_"));
    }

    #[test]
    fn test_leading_underscore_alone_is_valid() {
        assert!(is_valid_name("_private"));
    }
}
