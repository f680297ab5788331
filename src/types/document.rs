// src/types/document.rs
//! Typed resume and cover-letter documents as submitted by the editor.
//!
//! Every field is defaulted: a partially filled or malformed document renders
//! with empty strings instead of failing the export.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactInfo {
    pub name: String,
    pub headline: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub website: String,
}

impl ContactInfo {
    /// Non-empty contact fields joined for the header line
    pub fn summary_line(&self) -> String {
        [&self.email, &self.phone, &self.location, &self.website]
            .iter()
            .filter(|part| !part.is_empty())
            .map(|part| part.as_str())
            .collect::<Vec<_>>()
            .join("  ·  ")
    }
}

/// Free-form field the editor lets users attach to the header area
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomField {
    pub id: String,
    pub title: String,
    pub content: String,
    pub visible: bool,
    #[serde(rename = "isLink")]
    pub is_link: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Section {
    pub id: String,
    pub title: String,
    /// String keys to bullet lists, e.g. "Acme Corp — Engineer" -> bullets
    pub content: HashMap<String, Vec<String>>,
}

impl Section {
    /// Content entries in a stable order (map order is arbitrary)
    pub fn ordered_entries(&self) -> Vec<(&String, &Vec<String>)> {
        let mut entries: Vec<_> = self.content.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResumeDocument {
    pub id: String,
    pub contact: ContactInfo,
    pub custom: HashMap<String, CustomField>,
    pub sections: Vec<Section>,
}

impl ResumeDocument {
    /// Custom fields that should appear on the page, in a stable order
    pub fn visible_custom_fields(&self) -> Vec<&CustomField> {
        let mut fields: Vec<_> = self.custom.values().filter(|f| f.visible).collect();
        fields.sort_by(|a, b| a.id.cmp(&b.id));
        fields
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CoverLetterDocument {
    pub id: String,
    pub contact: ContactInfo,
    /// Template id chosen in the editor's formatting panel
    pub style: String,
    pub recipient: String,
    pub company: String,
    pub greeting: String,
    pub paragraphs: Vec<String>,
    pub closing: String,
    pub signature: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_defaults_from_partial_json() {
        let doc: ResumeDocument = serde_json::from_str(r#"{"contact":{"name":"Ada"}}"#).unwrap();
        assert_eq!(doc.contact.name, "Ada");
        assert_eq!(doc.contact.email, "");
        assert!(doc.custom.is_empty());
        assert!(doc.sections.is_empty());
    }

    #[test]
    fn test_visible_custom_fields_filters_and_orders() {
        let mut doc = ResumeDocument::default();
        doc.custom.insert(
            "b".to_string(),
            CustomField {
                id: "b".to_string(),
                title: "GitHub".to_string(),
                content: "github.com/ada".to_string(),
                visible: true,
                is_link: true,
            },
        );
        doc.custom.insert(
            "a".to_string(),
            CustomField {
                id: "a".to_string(),
                title: "Hidden".to_string(),
                visible: false,
                ..Default::default()
            },
        );

        let visible = doc.visible_custom_fields();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].title, "GitHub");
    }

    #[test]
    fn test_contact_summary_line_skips_empty() {
        let contact = ContactInfo {
            email: "ada@example.com".to_string(),
            location: "London".to_string(),
            ..Default::default()
        };
        assert_eq!(contact.summary_line(), "ada@example.com  ·  London");
    }
}
