use serde::Serialize;

use crate::AttributeRegistry;
use crate::AttributeRole;
use crate::Member;
use crate::MemberDeclaration;
use crate::Mutability;
use crate::Position;
use crate::VariableDeclaration;

/// Why a member was left out of the initializer. Exclusions are expected and
/// never reported as diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Exclusion {
	/// Methods, nested types, `static` properties, destructuring patterns.
	NotStoredField,
	/// The property has a computed body or observers.
	AccessorBlock,
	/// The property carries the exclusion marker.
	Marked,
	/// A `let` that already has its value.
	InitializedConstant,
}

/// A member that will receive an initializer parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoredField<'a> {
	pub name: &'a str,
	pub variable: &'a VariableDeclaration,
	pub position: Position,
}

/// Decide whether `member` is a stored field the initializer must assign.
///
/// The checks run in a fixed order: field shape, accessor block, exclusion
/// marker, then initialized constant.
pub fn classify_member<'a>(
	member: &'a MemberDeclaration,
	registry: &AttributeRegistry,
) -> Result<StoredField<'a>, Exclusion> {
	let Member::Variable(variable) = &member.member else {
		return Err(Exclusion::NotStoredField);
	};

	if variable.is_type_member {
		return Err(Exclusion::NotStoredField);
	}

	let Some(name) = variable.identifier() else {
		return Err(Exclusion::NotStoredField);
	};

	if variable.accessor.is_some() {
		return Err(Exclusion::AccessorBlock);
	}

	if registry.has_role(&variable.attributes, AttributeRole::Exclude) {
		return Err(Exclusion::Marked);
	}

	if variable.mutability == Mutability::Constant && variable.initializer.is_some() {
		return Err(Exclusion::InitializedConstant);
	}

	Ok(StoredField {
		name,
		variable,
		position: member.position,
	})
}

/// The stored fields of `members`, in declaration order.
pub fn stored_fields<'a>(
	members: &'a [MemberDeclaration],
	registry: &AttributeRegistry,
) -> Vec<StoredField<'a>> {
	members
		.iter()
		.filter_map(|member| {
			match classify_member(member, registry) {
				Ok(field) => Some(field),
				Err(reason) => {
					if let Member::Variable(variable) = &member.member {
						tracing::trace!(
							member = ?variable.pattern,
							?reason,
							"member excluded from initializer"
						);
					}
					None
				}
			}
		})
		.collect()
}
