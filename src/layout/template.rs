// src/layout/template.rs
use serde::Serialize;
use std::collections::HashMap;
use tracing::warn;

pub const DEFAULT_TEMPLATE: &str = "classic";

/// Layout parameters a template contributes at export time
#[derive(Debug, Clone)]
pub struct Template {
    pub id: String,
    pub name: String,
    pub description: String,
    pub margin_pt: f32,
    pub base_size: f32,
    pub heading_size: f32,
    pub name_size: f32,
    pub line_height: f32,
    /// RGB in 0..1, used for headings and rules
    pub accent: (f32, f32, f32),
    pub section_rule: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct TemplateInfo {
    pub id: String,
    pub name: String,
    pub description: String,
}

pub struct TemplateRegistry {
    templates: HashMap<String, Template>,
}

impl Default for TemplateRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRegistry {
    pub fn new() -> Self {
        let mut templates = HashMap::new();

        templates.insert(
            "classic".to_string(),
            Template {
                id: "classic".to_string(),
                name: "Classic".to_string(),
                description: "Traditional single-column layout".to_string(),
                margin_pt: 54.0,
                base_size: 10.0,
                heading_size: 12.0,
                name_size: 20.0,
                line_height: 1.35,
                accent: (0.1, 0.1, 0.1),
                section_rule: true,
            },
        );

        templates.insert(
            "modern".to_string(),
            Template {
                id: "modern".to_string(),
                name: "Modern".to_string(),
                description: "Airy layout with an accent color".to_string(),
                margin_pt: 48.0,
                base_size: 10.0,
                heading_size: 13.0,
                name_size: 22.0,
                line_height: 1.5,
                accent: (0.078, 0.643, 0.902),
                section_rule: true,
            },
        );

        templates.insert(
            "compact".to_string(),
            Template {
                id: "compact".to_string(),
                name: "Compact".to_string(),
                description: "Dense layout fitting more on one page".to_string(),
                margin_pt: 40.0,
                base_size: 9.0,
                heading_size: 11.0,
                name_size: 16.0,
                line_height: 1.2,
                accent: (0.2, 0.2, 0.2),
                section_rule: false,
            },
        );

        Self { templates }
    }

    /// Resolve a template id, falling back to the default for unknown ids
    pub fn resolve(&self, id: Option<&str>) -> &Template {
        let requested = id.unwrap_or(DEFAULT_TEMPLATE);

        if let Some(template) = self.templates.get(requested) {
            return template;
        }

        warn!(
            "Unknown template '{}', falling back to '{}'",
            requested, DEFAULT_TEMPLATE
        );
        self.templates
            .get(DEFAULT_TEMPLATE)
            .expect("default template is always registered")
    }

    pub fn list(&self) -> Vec<TemplateInfo> {
        let mut infos: Vec<TemplateInfo> = self
            .templates
            .values()
            .map(|t| TemplateInfo {
                id: t.id.clone(),
                name: t.name.clone(),
                description: t.description.clone(),
            })
            .collect();
        infos.sort_by(|a, b| a.id.cmp(&b.id));
        infos
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_known_template() {
        let registry = TemplateRegistry::new();
        assert_eq!(registry.resolve(Some("modern")).id, "modern");
    }

    #[test]
    fn test_unknown_template_falls_back_to_default() {
        let registry = TemplateRegistry::new();
        assert_eq!(registry.resolve(Some("no-such-template")).id, "classic");
        assert_eq!(registry.resolve(None).id, "classic");
    }

    #[test]
    fn test_list_is_sorted() {
        let registry = TemplateRegistry::new();
        let ids: Vec<String> = registry.list().into_iter().map(|t| t.id).collect();
        assert_eq!(ids, vec!["classic", "compact", "modern"]);
    }
}
