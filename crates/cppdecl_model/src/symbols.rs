//! Decorated names and binary symbol correlation.
//!
//! Exported symbols are matched to declarations by rendering each
//! callable and variable the way a platform demangler prints it, then
//! comparing with the demangler output after both sides are normalized.

use std::collections::HashMap;
use std::sync::LazyLock;

use cppdecl_foundation::{DeclId, Error, PatternParser, Result, is_instantiation};
use regex::Regex;
use tracing::debug;

use crate::decl::{CalldefKind, DeclData, Declaration};
use crate::tree::DeclTree;
use crate::types::{Modifier, Type};

/// Which demangler output format to produce.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SymbolHint {
    /// `undname` / `UnDecorateSymbolName` output.
    Msvc,
    /// GNU `nm --demangle` output.
    Nm,
}

impl SymbolHint {
    /// The format native to the host platform.
    #[must_use]
    pub fn native() -> Self {
        if cfg!(windows) { Self::Msvc } else { Self::Nm }
    }
}

/// Supplies demangled strings for mangled symbols.
pub trait Demangler {
    /// Demangles one symbol; `None` when the symbol is not understood.
    fn demangle(&self, mangled: &str) -> Option<String>;
}

impl<F> Demangler for F
where
    F: Fn(&str) -> Option<String>,
{
    fn demangle(&self, mangled: &str) -> Option<String> {
        self(mangled)
    }
}

/// One exported symbol from a map file, export table, or symbol table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportedSymbol {
    /// The decorated name as stored in the binary.
    pub mangled: String,
    /// The demangler's rendering of `mangled`.
    pub undecorated: String,
}

impl ExportedSymbol {
    /// Creates a symbol record.
    #[must_use]
    pub fn new(mangled: impl Into<String>, undecorated: impl Into<String>) -> Self {
        Self {
            mangled: mangled.into(),
            undecorated: undecorated.into(),
        }
    }
}

/// Outcome of [`correlate_symbols`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CorrelationReport {
    /// Declarations that received a mangled name.
    pub matched: Vec<DeclId>,
    /// Undecorated names no declaration rendered to.
    pub unmatched: Vec<String>,
}

static ECSU_KEYWORDS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:class|struct|enum|union)\s+").expect("valid regex"));

static CALLING_CONVENTIONS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|\s)__(?:cdecl|clrcall|stdcall|fastcall|thiscall)\s").expect("valid regex")
});

const ACCESS_PREFIXES: [&str; 3] = ["public: ", "protected: ", "private: "];

/// Fundamental spellings folded to the short forms demanglers print.
/// Longer spellings come first so they are not split by shorter ones.
const FUNDAMENTAL_FOLDS: [(&str, &str); 6] = [
    ("long long unsigned int", "unsigned __int64"),
    ("long long int", "__int64"),
    ("short unsigned int", "unsigned short"),
    ("short int", "short"),
    ("long unsigned int", "unsigned long"),
    ("long int", "long"),
];

fn fold_fundamentals(name: &str) -> String {
    let mut folded = name.to_string();
    for (long, short) in FUNDAMENTAL_FOLDS {
        folded = folded.replace(long, short);
    }
    folded.replace(", ", ",")
}

/// Normalizes a demangler's output so it can be compared with
/// [`format_decl`].
///
/// Strips `class`/`struct`/`enum`/`union` keywords, a leading access
/// specifier, and calling convention tokens, then folds fundamental type
/// spellings.
#[must_use]
pub fn normalize_undecorated(undecorated: &str) -> String {
    let mut text = ECSU_KEYWORDS.replace_all(undecorated, "").into_owned();
    for prefix in ACCESS_PREFIXES {
        if let Some(rest) = text.strip_prefix(prefix) {
            text = rest.to_string();
        }
    }
    let text = CALLING_CONVENTIONS.replace_all(&text, " ");
    fold_fundamentals(text.trim())
}

fn scope_prefix(tree: &DeclTree, decl: &Declaration) -> Result<String> {
    let Some(parent) = decl.parent() else {
        return Ok(String::new());
    };
    let full = tree.full_name(parent)?;
    let trimmed = full.trim_start_matches("::");
    Ok(if trimmed.is_empty() {
        String::new()
    } else {
        format!("{trimmed}::")
    })
}

fn format_type(tree: &DeclTree, ty: &Type, is_argument: bool, hint: SymbolHint) -> String {
    let ty = ty.remove_alias(tree);
    let mut rendered = match ty.as_compound() {
        Some((Modifier::Array(_), item)) => {
            let mut parts = vec![item.decl_string(tree), "*".to_string()];
            if is_argument {
                parts.push("const".to_string());
            }
            parts.join(" ")
        }
        _ => ty.decl_string(tree),
    };
    if hint == SymbolHint::Nm {
        rendered = rendered.replace(" *", "*").replace(" &", "&");
    }
    rendered
}

fn format_argtypes(tree: &DeclTree, arguments: &[Type], hint: SymbolHint) -> String {
    if arguments.is_empty() {
        return match hint {
            SymbolHint::Msvc => "void".to_string(),
            SymbolHint::Nm => String::new(),
        };
    }
    let separator = match hint {
        SymbolHint::Msvc => ",",
        SymbolHint::Nm => ", ",
    };
    arguments
        .iter()
        .map(|ty| format_type(tree, ty, true, hint))
        .collect::<Vec<_>>()
        .join(separator)
}

/// Renders a callable or variable the way the demangler for `hint`
/// prints it, normalized like [`normalize_undecorated`].
///
/// # Errors
///
/// `PreconditionViolation` for declarations other than calldefs and
/// variables; handle errors for stale ids.
pub fn format_decl(tree: &DeclTree, id: DeclId, hint: SymbolHint) -> Result<String> {
    let decl = tree.decl(id)?;
    let mut result = String::new();
    match decl.data() {
        DeclData::Calldef(calldef) => {
            let is_member = calldef.kind.is_member();
            if is_member && hint == SymbolHint::Msvc {
                if calldef.virtuality.is_virtual() {
                    result.push_str("virtual ");
                }
                if calldef.has_static {
                    result.push_str("static ");
                }
            }
            if let (SymbolHint::Msvc, Some(return_type)) = (hint, &calldef.return_type) {
                result.push_str(&format_type(tree, return_type, false, hint));
                result.push(' ');
            }
            result.push_str(&scope_prefix(tree, decl)?);
            result.push_str(decl.name());
            if matches!(
                calldef.kind,
                CalldefKind::Constructor | CalldefKind::Destructor
            ) && hint == SymbolHint::Msvc
            {
                let class_name = decl
                    .parent()
                    .and_then(|p| tree.get(p))
                    .map(|p| p.name().to_string())
                    .unwrap_or_default();
                if is_instantiation(&class_name) {
                    let args = PatternParser::TEMPLATES.args(&class_name)?;
                    result.push_str(&format!("<{}>", args.join(",")));
                }
            }
            let arguments = calldef.argument_types();
            result.push_str(&format!("({})", format_argtypes(tree, &arguments, hint)));
            if is_member && calldef.has_const {
                if hint == SymbolHint::Nm {
                    result.push(' ');
                }
                result.push_str("const");
            }
        }
        DeclData::Variable(variable) => {
            if hint == SymbolHint::Msvc {
                result.push_str(&format_type(tree, &variable.ty, false, hint));
                result.push(' ');
            }
            result.push_str(&scope_prefix(tree, decl)?);
            result.push_str(decl.name());
        }
        _ => {
            return Err(Error::precondition(format!(
                "decorated names exist only for calldefs and variables, not '{}'",
                decl.name()
            )));
        }
    }
    Ok(fold_fundamentals(&result))
}

/// Fills the `demangled` string of every declaration that has a mangled
/// name the demangler understands. Returns how many were filled.
pub fn apply_demangler(tree: &mut DeclTree, demangler: &dyn Demangler) -> usize {
    let ids: Vec<DeclId> = tree.iter().collect();
    let mut filled = 0;
    for id in ids {
        let Ok(decl) = tree.decl_mut(id) else {
            continue;
        };
        let Some(demangled) = decl.mangled.as_deref().and_then(|m| demangler.demangle(m)) else {
            continue;
        };
        decl.set_demangled(Some(demangled));
        filled += 1;
    }
    debug!(filled, "demangled names applied");
    filled
}

/// Matches exported symbols to declarations and records their mangled
/// names.
///
/// Every calldef and variable is rendered with [`format_decl`]; each
/// symbol's undecorated name is normalized and looked up among the
/// renderings.
///
/// # Errors
///
/// Fails only if a declaration's template name cannot be parsed.
pub fn correlate_symbols(
    tree: &mut DeclTree,
    symbols: &[ExportedSymbol],
    hint: SymbolHint,
) -> Result<CorrelationReport> {
    let mut rendered: HashMap<String, Vec<DeclId>> = HashMap::new();
    for id in tree.iter() {
        let is_candidate = tree
            .get(id)
            .is_some_and(|d| matches!(d.data(), DeclData::Calldef(_) | DeclData::Variable(_)));
        if is_candidate && tree.parent(id)?.is_some() {
            rendered
                .entry(format_decl(tree, id, hint)?)
                .or_default()
                .push(id);
        }
    }

    let mut report = CorrelationReport::default();
    for symbol in symbols {
        let key = normalize_undecorated(&symbol.undecorated);
        match rendered.get(&key) {
            Some(ids) => {
                for id in ids {
                    tree.decl_mut(*id)?.mangled = Some(symbol.mangled.clone());
                    report.matched.push(*id);
                }
            }
            None => report.unmatched.push(symbol.undecorated.clone()),
        }
    }
    debug!(
        symbols = symbols.len(),
        matched = report.matched.len(),
        unmatched = report.unmatched.len(),
        "symbols correlated"
    );
    Ok(report)
}
