use crate::domain::MediaType;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PetStatus {
    Available,
    Pending,
    Sold,
}

impl PetStatus {
    pub fn as_str(&self) -> &str {
        match self {
            PetStatus::Available => "available",
            PetStatus::Pending => "pending",
            PetStatus::Sold => "sold",
        }
    }
}

impl std::fmt::Display for PetStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub id: i64,
    pub name: String,
}

/// Example entity of the pet-store API, used as a request fixture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pet {
    pub id: i64,
    pub name: String,
    pub category: Category,
    pub photo_urls: Vec<String>,
    pub tags: Vec<Tag>,
    pub status: PetStatus,
}

/// A fixture rendered in one representation, ready to be sent as a body.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedBody {
    pub content_type: MediaType,
    pub bytes: Vec<u8>,
}

#[derive(thiserror::Error, Debug)]
pub enum FixtureError {
    #[error("failed to encode fixture as JSON")]
    Json(#[from] serde_json::Error),
    #[error("failed to encode fixture as a form")]
    Form(#[from] serde_urlencoded::ser::Error),
}

impl Pet {
    /// The `doggie` pet the inventory suite ships with.
    pub fn example() -> Self {
        Self {
            id: 10,
            name: "doggie".into(),
            category: Category {
                id: 1,
                name: "Dogs".into(),
            },
            photo_urls: vec!["http://example.com/photo1".into()],
            tags: vec![Tag {
                id: 1,
                name: "tag1".into(),
            }],
            status: PetStatus::Available,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn to_xml(&self) -> String {
        let mut xml = String::from("<pet>\n");
        push_element(&mut xml, 1, "id", &self.id.to_string());
        push_element(&mut xml, 1, "name", &self.name);
        xml.push_str("  <category>\n");
        push_element(&mut xml, 2, "id", &self.category.id.to_string());
        push_element(&mut xml, 2, "name", &self.category.name);
        xml.push_str("  </category>\n");
        xml.push_str("  <photoUrls>\n");
        for url in &self.photo_urls {
            push_element(&mut xml, 2, "photoUrl", url);
        }
        xml.push_str("  </photoUrls>\n");
        xml.push_str("  <tags>\n");
        for tag in &self.tags {
            xml.push_str("    <tag>\n");
            push_element(&mut xml, 3, "id", &tag.id.to_string());
            push_element(&mut xml, 3, "name", &tag.name);
            xml.push_str("    </tag>\n");
        }
        xml.push_str("  </tags>\n");
        push_element(&mut xml, 1, "status", self.status.as_str());
        xml.push_str("</pet>\n");
        xml
    }

    /// Flattened key/value pairs, in the order they are form-encoded.
    ///
    /// Nested fields use dotted keys (`category.id`), list items are
    /// indexed (`tags[0].name`) and photo URLs repeat the `photoUrls` key.
    pub fn form_fields(&self) -> Vec<(String, String)> {
        let mut fields = vec![
            ("id".to_string(), self.id.to_string()),
            ("name".to_string(), self.name.clone()),
            ("category.id".to_string(), self.category.id.to_string()),
            ("category.name".to_string(), self.category.name.clone()),
        ];
        for url in &self.photo_urls {
            fields.push(("photoUrls".to_string(), url.clone()));
        }
        for (i, tag) in self.tags.iter().enumerate() {
            fields.push((format!("tags[{}].id", i), tag.id.to_string()));
            fields.push((format!("tags[{}].name", i), tag.name.clone()));
        }
        fields.push(("status".to_string(), self.status.to_string()));
        fields
    }

    pub fn to_form(&self) -> Result<String, serde_urlencoded::ser::Error> {
        serde_urlencoded::to_string(self.form_fields())
    }

    #[tracing::instrument(name = "Encoding pet fixture", skip(self), fields(pet_id = self.id))]
    pub fn encode(&self, media_type: MediaType) -> Result<EncodedBody, FixtureError> {
        let body = match media_type {
            MediaType::Json => self.to_json()?,
            MediaType::Xml => self.to_xml(),
            MediaType::FormUrlEncoded => self.to_form()?,
        };
        Ok(EncodedBody {
            content_type: media_type,
            bytes: body.into_bytes(),
        })
    }
}

fn push_element(xml: &mut String, depth: usize, tag: &str, value: &str) {
    xml.push_str(&"  ".repeat(depth));
    xml.push_str(&format!("<{tag}>{}</{tag}>\n", escape_xml(value)));
}

fn escape_xml(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            c => escaped.push(c),
        }
    }
    escaped
}
