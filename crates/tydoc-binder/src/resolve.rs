//! Relative module specifier resolution against the bound sources.

use std::path::{Component, Path};

use rustc_hash::FxHashMap;
use tydoc::SymbolId;

const CANDIDATE_SUFFIXES: [&str; 7] = [
    "",
    ".ts",
    ".tsx",
    ".d.ts",
    "/index.ts",
    "/index.tsx",
    "/index.d.ts",
];

/// Lexically normalize `path` to forward slashes, folding `.` and `..`.
pub(crate) fn normalize_path(path: &Path) -> String {
    let mut parts: Vec<String> = Vec::new();
    let mut absolute = false;

    for component in path.components() {
        match component {
            Component::RootDir => absolute = true,
            Component::Prefix(prefix) => parts.push(prefix.as_os_str().to_string_lossy().into_owned()),
            Component::CurDir => {}
            Component::ParentDir => {
                if parts.last().is_some_and(|last| last != "..") {
                    parts.pop();
                } else if !absolute {
                    parts.push("..".to_string());
                }
            }
            Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
        }
    }

    let joined = parts.join("/");
    if absolute { format!("/{joined}") } else { joined }
}

/// Module symbol that `specifier`, imported from `from`, refers to.
///
/// Only relative specifiers resolve. A `.js` suffix may name a `.ts` source,
/// the way TypeScript's node16 resolution allows.
pub(crate) fn resolve_module(
    modules: &FxHashMap<String, SymbolId>,
    from: &str,
    specifier: &str,
) -> Option<SymbolId> {
    if !(specifier.starts_with("./") || specifier.starts_with("../")) {
        return None;
    }

    let base = Path::new(from).parent().unwrap_or_else(|| Path::new(""));
    let target = normalize_path(&base.join(specifier));

    let mut stems = vec![target.clone()];
    for js in [".js", ".jsx", ".mjs"] {
        if let Some(stem) = target.strip_suffix(js) {
            stems.push(stem.to_string());
        }
    }

    stems.iter().find_map(|stem| {
        CANDIDATE_SUFFIXES
            .iter()
            .find_map(|suffix| modules.get(&format!("{stem}{suffix}")).copied())
    })
}
