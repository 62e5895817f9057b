//! Declaration dependency edges.
//!
//! A code generator uses these to compute which declarations (and hence
//! headers) a declaration needs.

use std::collections::BTreeSet;

use cppdecl_foundation::{DeclId, Result};

use crate::decl::{AccessType, DeclData};
use crate::tree::DeclTree;
use crate::types::Type;

/// What a dependency points at.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DependOn {
    /// A declaration, e.g. a base class.
    Declaration(DeclId),
    /// A type expression, e.g. an argument type.
    Type(Type),
}

/// Why a dependency exists.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DependencyHint {
    /// A base class of a class.
    BaseClass,
    /// The return type of a callable.
    ReturnType,
    /// An argument type of a callable.
    Argument,
    /// A type in an exception specification.
    Exception,
    /// The type of a variable or the aliased type of a typedef.
    DeclType,
}

/// One dependency edge.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DependencyInfo {
    /// The declaration that has the dependency.
    pub declaration: DeclId,
    /// What it depends on.
    pub depend_on: DependOn,
    /// Access under which the dependency is visible.
    pub access: AccessType,
    /// Why the dependency exists.
    pub hint: DependencyHint,
}

impl DependencyInfo {
    /// Declarations reachable through this edge.
    ///
    /// Types are stripped of modifiers; declarated types yield their
    /// declaration and callable types yield the declarations of their
    /// return and argument types.
    #[must_use]
    pub fn find_out_depend_on_declarations(&self) -> Vec<DeclId> {
        match &self.depend_on {
            DependOn::Declaration(id) => vec![*id],
            DependOn::Type(ty) => {
                let mut found = Vec::new();
                collect_type_declarations(ty, &mut found);
                found
            }
        }
    }
}

fn collect_type_declarations(ty: &Type, found: &mut Vec<DeclId>) {
    match ty.innermost() {
        Type::Declarated(id) => found.push(*id),
        Type::Callable(callable) => {
            if let Some(return_type) = &callable.return_type {
                collect_type_declarations(return_type, found);
            }
            for argument in &callable.arguments {
                collect_type_declarations(argument, found);
            }
        }
        Type::MemberVariable { class, ty } => {
            found.push(*class);
            collect_type_declarations(ty, found);
        }
        _ => {}
    }
}

impl DeclTree {
    /// Dependency edges of a declaration.
    ///
    /// Classes report their bases and, when `recursive`, the edges of all
    /// members. Namespaces report the edges of their children.
    ///
    /// # Errors
    ///
    /// Fails for stale or unknown handles.
    pub fn i_depend_on_them(&self, id: DeclId, recursive: bool) -> Result<Vec<DependencyInfo>> {
        let decl = self.decl(id)?;
        let access = self.access_type(id)?.unwrap_or(AccessType::Public);
        let edge = |depend_on: DependOn, hint: DependencyHint| DependencyInfo {
            declaration: id,
            depend_on,
            access,
            hint,
        };

        let mut answer = Vec::new();
        match &decl.data {
            DeclData::Namespace(ns) => {
                for child in &ns.children {
                    answer.extend(self.i_depend_on_them(*child, recursive)?);
                }
            }
            DeclData::Class(class) => {
                for base in class.bases() {
                    answer.push(DependencyInfo {
                        declaration: id,
                        depend_on: DependOn::Declaration(base.related_class),
                        access: base.access,
                        hint: DependencyHint::BaseClass,
                    });
                }
                if recursive {
                    for member in class.all_members() {
                        answer.extend(self.i_depend_on_them(member, recursive)?);
                    }
                }
            }
            DeclData::Calldef(calldef) => {
                if let Some(return_type) = &calldef.return_type {
                    answer.push(edge(
                        DependOn::Type(return_type.clone()),
                        DependencyHint::ReturnType,
                    ));
                }
                for argument in &calldef.arguments {
                    answer.push(edge(
                        DependOn::Type(argument.ty.clone()),
                        DependencyHint::Argument,
                    ));
                }
                for exception in &calldef.exceptions {
                    answer.push(edge(
                        DependOn::Type(exception.clone()),
                        DependencyHint::Exception,
                    ));
                }
            }
            DeclData::Typedef(typedef) => {
                answer.push(edge(DependOn::Type(typedef.ty.clone()), DependencyHint::DeclType));
            }
            DeclData::Variable(variable) => {
                answer.push(edge(
                    DependOn::Type(variable.ty.clone()),
                    DependencyHint::DeclType,
                ));
            }
            DeclData::Enumeration(_) | DeclData::ClassDeclaration => {}
        }
        Ok(answer)
    }

    /// Every declaration `id` needs, including the class it is a member
    /// of. The declaration itself and stale targets are excluded.
    ///
    /// # Errors
    ///
    /// Fails for stale or unknown handles.
    pub fn required_declarations(&self, id: DeclId) -> Result<BTreeSet<DeclId>> {
        let mut needed = BTreeSet::new();
        for info in self.i_depend_on_them(id, true)? {
            needed.extend(
                info.find_out_depend_on_declarations()
                    .into_iter()
                    .filter(|target| self.exists(*target)),
            );
        }
        let class_parent = self
            .decl(id)?
            .parent
            .filter(|p| self.get(*p).is_some_and(|d| d.as_class().is_some()));
        if let Some(parent) = class_parent {
            needed.insert(parent);
        }
        needed.remove(&id);
        Ok(needed)
    }
}
