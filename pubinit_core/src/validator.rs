use crate::DiagnosticKind;
use crate::TypeDeclaration;
use crate::Visibility;

/// Check that `declaration` can receive a public initializer.
///
/// Visibility is checked before kind, so a non-public `enum` reports
/// [`DiagnosticKind::NotPublic`].
pub fn validate(declaration: &TypeDeclaration) -> Result<(), DiagnosticKind> {
	if declaration.visibility != Visibility::Public {
		return Err(DiagnosticKind::NotPublic);
	}

	if !declaration.kind.is_aggregate() {
		return Err(DiagnosticKind::NotAggregateKind);
	}

	Ok(())
}
