//! Integration tests for Error types
//!
//! Tests error construction, display, context, and error kinds.

use cppdecl_foundation::{DeclId, Error, ErrorContext, ErrorKind};

// =============================================================================
// Error Construction
// =============================================================================

#[test]
fn error_not_found() {
    let err = Error::not_found("name == 'Widget'");
    assert!(matches!(err.kind, ErrorKind::NotFound { .. }));
    assert!(err.is_not_found());
    assert!(!err.is_ambiguous());
    assert!(format!("{err}").contains("Widget"));
}

#[test]
fn error_ambiguous() {
    let err = Error::ambiguous("name == 'f'", 3);
    assert!(matches!(err.kind, ErrorKind::Ambiguous { count: 3, .. }));
    assert!(err.is_ambiguous());
    let msg = format!("{err}");
    assert!(msg.contains('3'));
    assert!(msg.contains("'f'"));
}

#[test]
fn error_invalid_pattern() {
    let err = Error::invalid_pattern("A<int", "missing '>'");
    assert!(matches!(err.kind, ErrorKind::InvalidPattern { .. }));
    let msg = format!("{err}");
    assert!(msg.contains("A<int"));
    assert!(msg.contains("missing"));
}

#[test]
fn error_precondition() {
    let err = Error::precondition("key type requested on a sequence");
    assert!(matches!(err.kind, ErrorKind::PreconditionViolation(_)));
    assert!(format!("{err}").contains("sequence"));
}

#[test]
fn error_declaration_handles() {
    let id = DeclId::new(42, 1);
    let missing = Error::declaration_not_found(id);
    assert!(matches!(missing.kind, ErrorKind::DeclarationNotFound(_)));
    assert!(format!("{missing}").contains("42"));

    let stale = Error::stale_declaration(DeclId::new(5, 2));
    assert!(matches!(stale.kind, ErrorKind::StaleDeclaration(_)));
    assert!(format!("{stale}").contains('5'));
}

// =============================================================================
// Error Context
// =============================================================================

#[test]
fn error_without_context() {
    let err = Error::internal("boom");
    assert!(err.context.is_none());
}

#[test]
fn error_with_context() {
    let context = ErrorContext::new()
        .with_scope("::app")
        .with_recursive(true)
        .with_frame("find_single");
    let err = Error::not_found("name == 'x'").with_context(context);
    let context = err.context.as_ref().unwrap();
    assert_eq!(context.scope.as_deref(), Some("::app"));
}

// =============================================================================
// Handles
// =============================================================================

#[test]
fn handles_compare_by_index_and_generation() {
    assert_eq!(DeclId::new(1, 0), DeclId::new(1, 0));
    assert_ne!(DeclId::new(1, 0), DeclId::new(1, 1));
    assert_ne!(DeclId::new(1, 0), DeclId::new(2, 0));
    assert_eq!(DeclId::new(7, 3).slot(), 7);
}
