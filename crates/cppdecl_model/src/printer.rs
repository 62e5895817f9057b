//! Human-readable dumps of declaration subtrees.

use std::fmt::Write;

use cppdecl_foundation::{DeclId, Result};

use crate::decl::{
    CalldefData, CalldefKind, ClassData, DeclKind, EnumData, NamespaceData, TypedefData, VariableData,
};
use crate::tree::DeclTree;
use crate::visitor::{DeclVisitor, walk_declaration};

/// Configuration for declaration dumps.
#[derive(Debug, Clone)]
pub struct PrintConfig {
    /// Number of spaces for each nesting level.
    pub indent_width: usize,
    /// Whether to print locations, artificial flags, sizes and mangled
    /// names.
    pub verbose: bool,
}

impl Default for PrintConfig {
    fn default() -> Self {
        Self {
            indent_width: 4,
            verbose: false,
        }
    }
}

/// Dumps a subtree with the default configuration.
///
/// # Errors
///
/// Fails for stale or unknown handles.
pub fn print_declarations(tree: &DeclTree, id: DeclId) -> Result<String> {
    print_declarations_with_config(tree, id, &PrintConfig::default())
}

/// Dumps a subtree with a custom configuration.
///
/// # Errors
///
/// Fails for stale or unknown handles.
pub fn print_declarations_with_config(
    tree: &DeclTree,
    id: DeclId,
    config: &PrintConfig,
) -> Result<String> {
    let mut printer = DeclPrinter {
        config,
        output: String::new(),
        level: 0,
    };
    walk_declaration(&mut printer, tree, id)?;
    Ok(printer.output)
}

fn kind_label(kind: DeclKind) -> &'static str {
    match kind {
        DeclKind::Namespace => "namespace",
        DeclKind::Class => "class",
        DeclKind::ClassDeclaration => "class declaration",
        DeclKind::Enumeration => "enumeration",
        DeclKind::Typedef => "typedef",
        DeclKind::Variable => "variable",
        DeclKind::Calldef(kind) => match kind {
            CalldefKind::FreeFunction => "free function",
            CalldefKind::FreeOperator => "free operator",
            CalldefKind::MemberFunction => "member function",
            CalldefKind::MemberOperator => "member operator",
            CalldefKind::Constructor => "constructor",
            CalldefKind::Destructor => "destructor",
            CalldefKind::CastingOperator => "casting operator",
        },
    }
}

struct DeclPrinter<'a> {
    config: &'a PrintConfig,
    output: String,
    level: usize,
}

impl DeclPrinter<'_> {
    fn line(&mut self, extra: usize, text: &str) {
        let indent = (self.level + extra) * self.config.indent_width;
        let _ = writeln!(self.output, "{:indent$}{text}", "");
    }

    fn detail(&mut self, label: &str, value: &str) {
        self.line(1, &format!("{label}: {value}"));
    }
}

impl DeclVisitor for DeclPrinter<'_> {
    fn enter_declaration(&mut self, tree: &DeclTree, id: DeclId) {
        let Some(decl) = tree.get(id) else {
            return;
        };
        let mut header = format!("{}: '{}'", kind_label(decl.kind()), decl.name());
        if let Ok(Some(access)) = tree.access_type(id) {
            let _ = write!(header, " ({access})");
        }
        self.line(0, &header);
        if self.config.verbose {
            if let Some(location) = &decl.location {
                self.detail("location", &location.to_string());
            }
            if decl.is_artificial {
                self.detail("artificial", "true");
            }
            if let Some(mangled) = &decl.mangled {
                self.detail("mangled", mangled);
            }
            if let Some(demangled) = decl.demangled() {
                self.detail("demangled", demangled);
            }
        }
        self.level += 1;
    }

    fn leave_declaration(&mut self, _tree: &DeclTree, _id: DeclId) {
        self.level = self.level.saturating_sub(1);
    }

    fn visit_namespace(&mut self, _tree: &DeclTree, _id: DeclId, _data: &NamespaceData) {}

    fn visit_class(&mut self, tree: &DeclTree, _id: DeclId, data: &ClassData) {
        for base in data.bases() {
            let name = tree
                .full_name(base.related_class)
                .unwrap_or_else(|_| base.related_class.to_string());
            let virtuality = if base.is_virtual { " virtual" } else { "" };
            self.line(0, &format!("base: {} {name}{virtuality}", base.access));
        }
        if self.config.verbose {
            self.line(
                0,
                &format!("size: {}, align: {}", data.byte_size, data.byte_align),
            );
        }
    }

    fn visit_enumeration(&mut self, _tree: &DeclTree, _id: DeclId, data: &EnumData) {
        for (name, value) in &data.values {
            self.line(0, &format!("{name} = {value}"));
        }
    }

    fn visit_typedef(&mut self, tree: &DeclTree, _id: DeclId, data: &TypedefData) {
        self.line(0, &format!("alias to: {}", data.ty.decl_string(tree)));
    }

    fn visit_variable(&mut self, tree: &DeclTree, _id: DeclId, data: &VariableData) {
        self.line(0, &format!("type: {}", data.ty.decl_string(tree)));
        if let Some(value) = &data.value {
            self.line(0, &format!("value: {value}"));
        }
    }

    fn visit_calldef(&mut self, tree: &DeclTree, _id: DeclId, data: &CalldefData) {
        if let Some(return_type) = &data.return_type {
            self.line(0, &format!("return type: {}", return_type.decl_string(tree)));
        }
        for argument in &data.arguments {
            let mut text = format!("argument: {} {}", argument.ty.decl_string(tree), argument.name);
            if let Some(default) = &argument.default_value {
                let _ = write!(text, " = {default}");
            }
            self.line(0, text.trim_end());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decl::{AccessType, Argument, Declaration};
    use crate::types::Type;
    use cppdecl_foundation::Location;

    #[test]
    fn prints_nested_declarations() {
        let mut tree = DeclTree::new();
        let ns = tree.insert(tree.root(), Declaration::namespace("app")).unwrap();
        let class = tree.insert(ns, Declaration::struct_("Point")).unwrap();
        tree.insert_member(
            class,
            Declaration::member_function(
                "scale",
                Type::void(),
                vec![Argument::new("factor", Type::int()).with_default("2")],
            ),
            AccessType::Public,
        )
        .unwrap();

        let text = print_declarations(&tree, ns).unwrap();
        assert_eq!(
            text,
            "namespace: 'app'\n    class: 'Point'\n        member function: 'scale' (public)\n            return type: void\n            argument: int factor = 2\n"
        );
    }

    #[test]
    fn verbose_adds_details() {
        let mut tree = DeclTree::new();
        let var = tree
            .insert(
                tree.root(),
                Declaration::variable("v", Type::int()).with_location(Location::new("/a.h", 3)),
            )
            .unwrap();
        let config = PrintConfig {
            indent_width: 2,
            verbose: true,
        };
        let text = print_declarations_with_config(&tree, var, &config).unwrap();
        assert!(text.contains("  location: /a.h:3"));
        assert!(text.contains("  type: int"));
    }

    #[test]
    fn enumerations_list_values() {
        let mut tree = DeclTree::new();
        let e = tree
            .insert(
                tree.root(),
                Declaration::enumeration("E", [("a", None), ("b", None)]),
            )
            .unwrap();
        let text = print_declarations(&tree, e).unwrap();
        assert!(text.contains("a = 0"));
        assert!(text.contains("b = 1"));
    }
}
