//! Removal of type definitions that can't be reached from the root types.

use std::collections::{BTreeSet, VecDeque};

use super::{Schema, TypeInfo};
use crate::ast::common as ast;

impl<A> Schema<A> {
    /// Names of every type reachable from the root operation types, following
    /// field types, argument types, input field types and union members.
    pub fn reachable_types(&self) -> BTreeSet<ast::TypeName> {
        let mut reachable = BTreeSet::new();
        let mut queue: VecDeque<ast::TypeName> = self.root_types().cloned().collect();
        while let Some(type_name) = queue.pop_front() {
            if !reachable.insert(type_name.clone()) {
                continue;
            }
            let Some(type_info) = self.types.get(&type_name) else {
                continue;
            };
            for referenced in referenced_types(type_info) {
                if !reachable.contains(&referenced) {
                    queue.push_back(referenced);
                }
            }
        }
        reachable
    }

    /// Drops every unreachable type and returns the names that were removed.
    pub fn prune_unreachable(&mut self) -> Vec<ast::TypeName> {
        let reachable = self.reachable_types();
        let removed = self
            .types
            .keys()
            .filter(|type_name| !reachable.contains(*type_name))
            .cloned()
            .collect::<Vec<_>>();
        for type_name in &removed {
            self.types.remove(type_name);
        }
        tracing::debug!(count = removed.len(), "pruned unreachable types");
        removed
    }
}

fn referenced_types<A>(type_info: &TypeInfo<A>) -> Vec<ast::TypeName> {
    match type_info {
        TypeInfo::Scalar(_) | TypeInfo::Enum(_) => Vec::new(),
        TypeInfo::Object(object) => object
            .fields
            .values()
            .flat_map(|field| {
                std::iter::once(field.field_type.underlying_type().clone()).chain(
                    field
                        .arguments
                        .values()
                        .map(|argument| argument.field_type.underlying_type().clone()),
                )
            })
            .collect(),
        TypeInfo::Union(union) => union.members.iter().cloned().collect(),
        TypeInfo::InputObject(input_object) => input_object
            .fields
            .values()
            .map(|field| field.field_type.underlying_type().clone())
            .collect(),
    }
}
