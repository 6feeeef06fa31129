//! Names of every generated schema artifact.
//!
//! All functions are pure: the same model always yields the same names, and
//! names that derive from an attribute include both the model's type name and
//! the attribute name so two models never collide.

use content_model::ContentModel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Plurality {
    #[default]
    Singular,
    Plural,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FirstLetterCase {
    #[default]
    Upper,
    Lower,
}

/// Derives a custom name from a model's type name, e.g.
/// `{prefix}{TypeName}{suffix}`.
#[derive(Debug, Clone, Default)]
pub struct NameGenerator {
    pub prefix: String,
    pub suffix: String,
    pub first_letter_case: FirstLetterCase,
    pub plurality: Plurality,
}

impl NameGenerator {
    pub fn generate(&self, model: &ContentModel) -> String {
        let name = format!(
            "{}{}{}",
            self.prefix,
            type_name_with_plurality(model, self.plurality),
            self.suffix
        );
        match self.first_letter_case {
            FirstLetterCase::Upper => upper_first(&name),
            FirstLetterCase::Lower => lower_first(&name),
        }
    }
}

/// Splits an identifier into words on separators, case changes and
/// letter/digit boundaries: `blog-post`, `blogPost` and `BlogPost` all give
/// `[blog, Post]`-like words.
fn words(input: &str) -> Vec<String> {
    #[derive(PartialEq, Clone, Copy)]
    enum Class {
        Lower,
        Upper,
        Digit,
    }
    let classify = |c: char| {
        if c.is_ascii_digit() {
            Class::Digit
        } else if c.is_uppercase() {
            Class::Upper
        } else {
            Class::Lower
        }
    };

    let mut words = Vec::new();
    for chunk in input.split(|c: char| !c.is_alphanumeric()) {
        let chars = chunk.chars().collect::<Vec<_>>();
        let mut current = String::new();
        for (index, &c) in chars.iter().enumerate() {
            if let Some(&previous) = index.checked_sub(1).and_then(|i| chars.get(i)) {
                let (prev_class, class) = (classify(previous), classify(c));
                let next_is_lower = chars
                    .get(index + 1)
                    .is_some_and(|&next| classify(next) == Class::Lower);
                let boundary = match (prev_class, class) {
                    (Class::Lower, Class::Upper) => true,
                    // end of an acronym: `HTMLParser` splits before `Parser`
                    (Class::Upper, Class::Upper) => next_is_lower,
                    (Class::Digit, Class::Lower | Class::Upper)
                    | (Class::Lower | Class::Upper, Class::Digit) => true,
                    _ => false,
                };
                if boundary && !current.is_empty() {
                    words.push(std::mem::take(&mut current));
                }
            }
            current.push(c);
        }
        if !current.is_empty() {
            words.push(current);
        }
    }
    words
}

pub fn upper_first(input: &str) -> String {
    let mut chars = input.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn lower_first(input: &str) -> String {
    let mut chars = input.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `blog-post` → `blogPost`
pub fn camel_case(input: &str) -> String {
    words(input)
        .iter()
        .enumerate()
        .map(|(index, word)| {
            let word = word.to_lowercase();
            if index == 0 {
                word
            } else {
                upper_first(&word)
            }
        })
        .collect()
}

/// `blog-post` → `BlogPost`
pub fn pascal_case(input: &str) -> String {
    upper_first(&camel_case(input))
}

/// `BlogPost` → `BLOG_POST`
pub fn upper_snake_case(input: &str) -> String {
    words(input)
        .iter()
        .map(|word| word.to_uppercase())
        .collect::<Vec<_>>()
        .join("_")
}

/// Turns an arbitrary enumeration value into a valid GraphQL enum value,
/// `in review` → `in_review`, `1st` → `_1st`.
pub fn regressed_enum_value(value: &str) -> String {
    let mut regressed = String::with_capacity(value.len());
    for c in value.chars() {
        if c.is_ascii_alphanumeric() {
            regressed.push(c);
        } else if !regressed.ends_with('_') {
            regressed.push('_');
        }
    }
    let trimmed = regressed.trim_matches('_');
    if trimmed.is_empty() || trimmed.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{trimmed}")
    } else {
        trimmed.to_string()
    }
}

/// `shared.seo` → `ComponentSharedSeo`
pub fn component_name(component: &ContentModel) -> String {
    let category = component
        .category
        .as_deref()
        .or_else(|| component.uid.category())
        .unwrap_or_default();
    format!(
        "Component{}{}",
        pascal_case(category),
        pascal_case(component.uid.local_name())
    )
}

fn type_name_with_plurality(model: &ContentModel, plurality: Plurality) -> String {
    if model.is_component() {
        return component_name(model);
    }
    let name = match plurality {
        Plurality::Singular => &model.info.singular_name,
        Plurality::Plural => &model.info.plural_name,
    };
    let plugin = model.plugin.as_deref().map(pascal_case).unwrap_or_default();
    format!("{plugin}{}", pascal_case(name))
}

/// `{Plugin}{SingularName}`, or the component name for components.
pub fn type_name(model: &ContentModel) -> String {
    type_name_with_plurality(model, Plurality::Singular)
}

pub fn plural_type_name(model: &ContentModel) -> String {
    type_name_with_plurality(model, Plurality::Plural)
}

pub fn entity_name(model: &ContentModel) -> String {
    format!("{}Entity", type_name(model))
}

pub fn entity_meta_name(model: &ContentModel) -> String {
    format!("{}Meta", entity_name(model))
}

pub fn entity_response_name(model: &ContentModel) -> String {
    format!("{}Response", entity_name(model))
}

pub fn entity_response_collection_name(model: &ContentModel) -> String {
    format!("{}ResponseCollection", entity_name(model))
}

pub fn relation_response_collection_name(model: &ContentModel) -> String {
    format!("{}RelationResponseCollection", type_name(model))
}

pub fn content_type_input_name(model: &ContentModel) -> String {
    format!("{}Input", type_name(model))
}

pub fn component_input_name(component: &ContentModel) -> String {
    format!("{}Input", component_name(component))
}

/// The input name for either kind of model.
pub fn input_name(model: &ContentModel) -> String {
    if model.is_component() {
        component_input_name(model)
    } else {
        content_type_input_name(model)
    }
}

pub fn enum_name(model: &ContentModel, attribute_name: &str) -> String {
    format!(
        "ENUM_{}_{}",
        upper_snake_case(&type_name(model)),
        upper_snake_case(attribute_name)
    )
}

pub fn dynamic_zone_name(model: &ContentModel, attribute_name: &str) -> String {
    format!("{}{}DynamicZone", type_name(model), pascal_case(attribute_name))
}

pub fn dynamic_zone_input_name(model: &ContentModel, attribute_name: &str) -> String {
    format!("{}Input", dynamic_zone_name(model, attribute_name))
}

pub fn morph_relation_type_name(model: &ContentModel, attribute_name: &str) -> String {
    format!("{}{}Morph", type_name(model), pascal_case(attribute_name))
}

pub fn filters_input_name(model: &ContentModel) -> String {
    format!("{}FiltersInput", type_name(model))
}

pub fn scalar_filter_input_name(scalar_type: &str) -> String {
    format!("{scalar_type}FilterInput")
}

pub fn find_query_name(model: &ContentModel) -> String {
    lower_first(&plural_type_name(model))
}

pub fn find_one_query_name(model: &ContentModel) -> String {
    lower_first(&type_name(model))
}

pub fn create_mutation_name(model: &ContentModel) -> String {
    format!("create{}", type_name(model))
}

pub fn update_mutation_name(model: &ContentModel) -> String {
    format!("update{}", type_name(model))
}

pub fn delete_mutation_name(model: &ContentModel) -> String {
    format!("delete{}", type_name(model))
}

pub fn entity_queries_type_name(model: &ContentModel) -> String {
    format!("{}Queries", entity_name(model))
}

pub fn entity_mutations_type_name(model: &ContentModel) -> String {
    format!("{}Mutations", entity_name(model))
}

#[cfg(test)]
mod tests {
    use super::*;
    use content_model::ModelKind;

    fn blog_post() -> ContentModel {
        ContentModel::new("plugin::blog.post", ModelKind::CollectionType)
            .with_plugin("blog")
            .with_names("post", "posts")
    }

    #[test]
    fn test_model_names() {
        let post = blog_post();
        assert_eq!(type_name(&post), "BlogPost");
        assert_eq!(find_query_name(&post), "blogPosts");
        assert_eq!(find_one_query_name(&post), "blogPost");
        assert_eq!(create_mutation_name(&post), "createBlogPost");
        assert_eq!(update_mutation_name(&post), "updateBlogPost");
        assert_eq!(delete_mutation_name(&post), "deleteBlogPost");
        assert_eq!(entity_name(&post), "BlogPostEntity");
        assert_eq!(entity_response_name(&post), "BlogPostEntityResponse");
        assert_eq!(
            entity_response_collection_name(&post),
            "BlogPostEntityResponseCollection"
        );
        assert_eq!(
            relation_response_collection_name(&post),
            "BlogPostRelationResponseCollection"
        );
        assert_eq!(filters_input_name(&post), "BlogPostFiltersInput");
        assert_eq!(content_type_input_name(&post), "BlogPostInput");
        assert_eq!(entity_queries_type_name(&post), "BlogPostEntityQueries");
    }

    #[test]
    fn test_attribute_derived_names() {
        let post = blog_post();
        assert_eq!(enum_name(&post, "readingLevel"), "ENUM_BLOG_POST_READING_LEVEL");
        assert_eq!(dynamic_zone_name(&post, "blocks"), "BlogPostBlocksDynamicZone");
        assert_eq!(
            dynamic_zone_input_name(&post, "page_sections"),
            "BlogPostPageSectionsDynamicZoneInput"
        );
        assert_eq!(morph_relation_type_name(&post, "related"), "BlogPostRelatedMorph");
    }

    #[test]
    fn test_component_names() {
        let seo = ContentModel::new("shared.seo", ModelKind::Component);
        assert_eq!(component_name(&seo), "ComponentSharedSeo");
        assert_eq!(type_name(&seo), "ComponentSharedSeo");
        assert_eq!(component_input_name(&seo), "ComponentSharedSeoInput");
        assert_eq!(filters_input_name(&seo), "ComponentSharedSeoFiltersInput");
    }

    #[test]
    fn test_name_without_plugin() {
        let category = ContentModel::new("api::category.category", ModelKind::CollectionType)
            .with_names("blog-category", "blog-categories");
        assert_eq!(type_name(&category), "BlogCategory");
        assert_eq!(find_query_name(&category), "blogCategories");
    }

    #[test]
    fn test_name_generator() {
        let post = blog_post();
        let generator = NameGenerator {
            prefix: "my".to_string(),
            suffix: "Connection".to_string(),
            first_letter_case: FirstLetterCase::Upper,
            plurality: Plurality::Plural,
        };
        assert_eq!(generator.generate(&post), "MyBlogPostsConnection");
        let generator = NameGenerator {
            first_letter_case: FirstLetterCase::Lower,
            ..NameGenerator::default()
        };
        assert_eq!(generator.generate(&post), "blogPost");
    }

    #[test]
    fn test_casing() {
        assert_eq!(camel_case("blog-post"), "blogPost");
        assert_eq!(camel_case("BlogPost"), "blogPost");
        assert_eq!(pascal_case("users_permissions"), "UsersPermissions");
        assert_eq!(upper_snake_case("HTMLParser"), "HTML_PARSER");
        assert_eq!(upper_snake_case("post2"), "POST_2");
    }

    #[test]
    fn test_regressed_enum_value() {
        assert_eq!(regressed_enum_value("in review"), "in_review");
        assert_eq!(regressed_enum_value("draft"), "draft");
        assert_eq!(regressed_enum_value("1st place"), "_1st_place");
        assert_eq!(regressed_enum_value("--a--b--"), "a_b");
        assert_eq!(regressed_enum_value("é"), "_");
    }
}
