//! Printing a [`Schema`] as GraphQL SDL.

use std::collections::BTreeMap;
use std::fmt::Write;

use super::{builtin, Field, InputField, Schema, TypeInfo};
use crate::ast::common as ast;

impl<A> Schema<A> {
    /// Generates the SDL of this schema. Types are printed in alphabetical
    /// order and built-in scalars are left out.
    pub fn generate_sdl(&self) -> String {
        let mut sdl = String::new();
        if self.query_type.as_str() != "Query"
            || self
                .mutation_type
                .as_ref()
                .is_some_and(|mutation| mutation.as_str() != "Mutation")
        {
            sdl.push_str("schema {\n");
            let _ = writeln!(sdl, "  query: {}", self.query_type);
            if let Some(mutation) = &self.mutation_type {
                let _ = writeln!(sdl, "  mutation: {mutation}");
            }
            sdl.push_str("}\n\n");
        }

        let definitions = self
            .types
            .values()
            .filter(|type_info| !builtin::is_builtin(type_info.name()))
            .map(type_definition_sdl)
            .collect::<Vec<_>>();
        sdl.push_str(&definitions.join("\n\n"));
        sdl.push('\n');
        sdl
    }
}

fn type_definition_sdl<A>(type_info: &TypeInfo<A>) -> String {
    match type_info {
        TypeInfo::Scalar(scalar) => with_description(
            scalar.description.as_deref(),
            "",
            format!("scalar {}", scalar.name),
        ),
        TypeInfo::Enum(e) => {
            let values = e
                .values
                .values()
                .map(|value| {
                    with_description(
                        value.description.as_deref(),
                        "  ",
                        format!("  {}", value.value),
                    )
                })
                .collect::<Vec<_>>();
            with_description(
                e.description.as_deref(),
                "",
                format!("enum {} {{\n{}\n}}", e.name, values.join("\n")),
            )
        }
        TypeInfo::Object(object) => with_description(
            object.description.as_deref(),
            "",
            format!(
                "type {} {{\n{}\n}}",
                object.name,
                fields_sdl(&object.fields)
            ),
        ),
        TypeInfo::Union(union) => {
            let members = union
                .members
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>();
            with_description(
                union.description.as_deref(),
                "",
                format!("union {} = {}", union.name, members.join(" | ")),
            )
        }
        TypeInfo::InputObject(input_object) => with_description(
            input_object.description.as_deref(),
            "",
            format!(
                "input {} {{\n{}\n}}",
                input_object.name,
                input_fields_sdl(&input_object.fields, "  ")
            ),
        ),
    }
}

fn fields_sdl<A>(fields: &BTreeMap<ast::Name, Field<A>>) -> String {
    fields
        .values()
        .map(|field| {
            let arguments = if field.arguments.is_empty() {
                String::new()
            } else {
                format!(
                    "(\n{}\n  )",
                    input_fields_sdl(&field.arguments, "    ")
                )
            };
            with_description(
                field.description.as_deref(),
                "  ",
                format!("  {}{}: {}", field.name, arguments, field.field_type),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn input_fields_sdl<A>(fields: &BTreeMap<ast::Name, InputField<A>>, indent: &str) -> String {
    fields
        .values()
        .map(|field| {
            let default_value = field
                .default_value
                .as_ref()
                .map(|value| format!(" = {value}"))
                .unwrap_or_default();
            with_description(
                field.description.as_deref(),
                indent,
                format!(
                    "{indent}{}: {}{default_value}",
                    field.name, field.field_type
                ),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn with_description(description: Option<&str>, indent: &str, definition: String) -> String {
    match description {
        None => definition,
        Some(description) => {
            format!("{indent}\"\"\"{description}\"\"\"\n{definition}")
        }
    }
}
