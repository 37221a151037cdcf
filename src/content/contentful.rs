use super::{ContentSource, EntryQuery, FetchError};
use crate::blog::{absolute_url, Asset, BlogEntry, EntrySys, RichTextDocument};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

/// Linked entries and assets are resolved one level deep.
const INCLUDE_DEPTH: &str = "1";

#[derive(Debug, Clone)]
pub struct ContentfulClient {
    http: reqwest::Client,
    entries_url: String,
    access_token: String,
}

impl ContentfulClient {
    pub fn new(
        api_base: &str,
        space_id: &str,
        environment: &str,
        access_token: String,
        connect_timeout: std::time::Duration,
    ) -> Result<ContentfulClient, FetchError> {
        let http = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .build()?;

        Ok(ContentfulClient {
            http,
            entries_url: format!(
                "{}/spaces/{space_id}/environments/{environment}/entries",
                api_base.trim_end_matches('/')
            ),
            access_token,
        })
    }
}

#[async_trait::async_trait]
impl ContentSource for ContentfulClient {
    async fn get_entries(&self, query: &EntryQuery) -> Result<Vec<BlogEntry>, FetchError> {
        let response = self
            .http
            .get(&self.entries_url)
            .bearer_auth(&self.access_token)
            .query(&query.to_params())
            .query(&[("include", INCLUDE_DEPTH)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.bytes().await?;
        let collection = serde_json::from_slice::<EntryCollection>(&body)?;

        Ok(collection.into_blog_entries())
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct EntryCollection {
    #[serde(default)]
    items: Vec<RawEntry>,
    #[serde(default)]
    includes: Includes,
}

#[derive(Debug, Default, Deserialize)]
struct Includes {
    #[serde(default, rename = "Entry")]
    entries: Vec<Value>,
    #[serde(default, rename = "Asset")]
    assets: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct RawEntry {
    sys: RawSys,
    #[serde(default)]
    fields: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSys {
    id: String,
    #[serde(default)]
    created_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(default)]
    updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PostFields {
    title: String,
    #[serde(default)]
    slug: String,
    #[serde(default)]
    descrip: String,
    #[serde(default)]
    cover_image: Option<Value>,
    #[serde(default)]
    content: Value,
}

#[derive(Debug, Deserialize)]
struct AssetFields {
    #[serde(default)]
    title: Option<String>,
    file: AssetFile,
}

#[derive(Debug, Deserialize)]
struct AssetFile {
    url: String,
    #[serde(default)]
    details: Option<AssetDetails>,
}

#[derive(Debug, Deserialize)]
struct AssetDetails {
    #[serde(default)]
    image: Option<ImageDetails>,
}

#[derive(Debug, Deserialize)]
struct ImageDetails {
    width: u32,
    height: u32,
}

/// Included entries and assets keyed by `(linkType, id)`.
struct Links(HashMap<(&'static str, String), Value>);

impl Links {
    fn new(includes: Includes) -> Links {
        let mut links = HashMap::new();
        for (link_type, values) in [("Entry", includes.entries), ("Asset", includes.assets)] {
            for value in values {
                if let Some(id) = value.pointer("/sys/id").and_then(Value::as_str) {
                    links.insert((link_type, id.to_string()), value);
                }
            }
        }
        Links(links)
    }

    fn lookup(&self, link: &Value) -> Option<&Value> {
        let sys = link.get("sys")?;
        if sys.get("type").and_then(Value::as_str) != Some("Link") {
            return None;
        }
        let link_type = match sys.get("linkType").and_then(Value::as_str)? {
            "Entry" => "Entry",
            "Asset" => "Asset",
            _ => return None,
        };
        let id = sys.get("id").and_then(Value::as_str)?;

        self.0.get(&(link_type, id.to_string()))
    }

    /// Replaces every `data.target` link in a rich-text tree with the included
    /// entry or asset it points at. Unresolvable links are left as they are.
    fn resolve_targets(&self, node: &mut Value) {
        match node {
            Value::Object(object) => {
                if let Some(target) = object.get_mut("data").and_then(|data| data.get_mut("target")) {
                    if let Some(resolved) = self.lookup(target) {
                        *target = resolved.clone();
                    }
                }
                if let Some(Value::Array(children)) = object.get_mut("content") {
                    for child in children {
                        self.resolve_targets(child);
                    }
                }
            }
            Value::Array(children) => {
                for child in children {
                    self.resolve_targets(child);
                }
            }
            _ => (),
        }
    }

    fn asset(&self, link: &Value) -> Option<Asset> {
        let asset = self.lookup(link)?;
        let fields = match serde_json::from_value::<AssetFields>(asset.get("fields")?.clone()) {
            Ok(it) => it,
            Err(err) => {
                tracing::warn!("Skipping malformed asset {:?}: {err}", asset.pointer("/sys/id"));
                return None;
            }
        };
        let image = fields.file.details.and_then(|details| details.image);

        Some(Asset {
            url: absolute_url(&fields.file.url),
            title: fields.title,
            width: image.as_ref().map(|image| image.width),
            height: image.as_ref().map(|image| image.height),
        })
    }
}

impl EntryCollection {
    pub(crate) fn into_blog_entries(self) -> Vec<BlogEntry> {
        let links = Links::new(self.includes);

        self.items
            .into_iter()
            .filter_map(|item| {
                let fields = match serde_json::from_value::<PostFields>(item.fields) {
                    Ok(it) => it,
                    Err(err) => {
                        tracing::warn!("Skipping entry {} that is not a post: {err}", item.sys.id);
                        return None;
                    }
                };

                let cover_image = fields.cover_image.as_ref().and_then(|link| {
                    let asset = links.asset(link);
                    if asset.is_none() {
                        tracing::warn!("Cover image of entry {} did not resolve", item.sys.id);
                    }
                    asset
                });

                let mut content = fields.content;
                links.resolve_targets(&mut content);

                Some(BlogEntry {
                    sys: EntrySys {
                        id: item.sys.id,
                        created_at: item.sys.created_at,
                        updated_at: item.sys.updated_at,
                    },
                    slug: fields.slug,
                    title: fields.title,
                    description: fields.descrip,
                    cover_image,
                    content: RichTextDocument::new(content),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn link(link_type: &str, id: &str) -> Value {
        json!({ "sys": { "type": "Link", "linkType": link_type, "id": id } })
    }

    fn collection(value: Value) -> Vec<BlogEntry> {
        serde_json::from_value::<EntryCollection>(value)
            .unwrap()
            .into_blog_entries()
    }

    #[test]
    fn maps_post_fields_and_resolves_cover_image() {
        let entries = collection(json!({
            "items": [{
                "sys": { "id": "e1", "createdAt": "2024-03-01T10:00:00.000Z" },
                "fields": {
                    "title": "Hello World",
                    "slug": "hello-world",
                    "descrip": "intro post",
                    "coverImage": link("Asset", "a1"),
                    "content": { "nodeType": "document", "data": {}, "content": [] }
                }
            }],
            "includes": {
                "Asset": [{
                    "sys": { "id": "a1" },
                    "fields": {
                        "title": "Cover",
                        "file": {
                            "url": "//images.ctfassets.net/space/a.jpg",
                            "details": { "image": { "width": 1200, "height": 800 } }
                        }
                    }
                }]
            }
        }));

        assert_eq!(entries.len(), 1);
        let entry = &entries[0];
        assert_eq!(entry.title, "Hello World");
        assert_eq!(entry.description, "intro post");
        assert_eq!(entry.slug, "hello-world");
        assert_eq!(entry.sys.id, "e1");
        assert!(entry.sys.created_at.is_some());
        assert_eq!(
            entry.cover_image,
            Some(Asset {
                url: "https://images.ctfassets.net/space/a.jpg".to_string(),
                title: Some("Cover".to_string()),
                width: Some(1200),
                height: Some(800),
            })
        );
    }

    #[test]
    fn unresolved_cover_image_is_absent() {
        let entries = collection(json!({
            "items": [{
                "sys": { "id": "e1" },
                "fields": { "title": "T", "coverImage": link("Asset", "gone") }
            }]
        }));

        assert_eq!(entries.len(), 1);
        assert!(entries[0].cover_image.is_none());
    }

    #[test]
    fn entries_without_title_are_skipped() {
        let entries = collection(json!({
            "items": [
                { "sys": { "id": "broken" }, "fields": { "slug": "x" } },
                { "sys": { "id": "ok" }, "fields": { "title": "Fine", "slug": "y" } }
            ]
        }));

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].sys.id, "ok");
    }

    #[test]
    fn rich_text_targets_are_inlined() {
        let entries = collection(json!({
            "items": [{
                "sys": { "id": "e1" },
                "fields": {
                    "title": "T",
                    "content": {
                        "nodeType": "document",
                        "data": {},
                        "content": [
                            { "nodeType": "embedded-asset-block", "data": { "target": link("Asset", "a1") }, "content": [] },
                            { "nodeType": "paragraph", "data": {}, "content": [
                                { "nodeType": "entry-hyperlink", "data": { "target": link("Entry", "e2") }, "content": [] }
                            ]}
                        ]
                    }
                }
            }],
            "includes": {
                "Entry": [{ "sys": { "id": "e2" }, "fields": { "slug": "other-post" } }],
                "Asset": [{ "sys": { "id": "a1" }, "fields": { "file": { "url": "//img/b.png" } } }]
            }
        }));

        let content = entries[0].content.as_value();
        assert_eq!(
            content.pointer("/content/0/data/target/fields/file/url"),
            Some(&json!("//img/b.png"))
        );
        assert_eq!(
            content.pointer("/content/1/content/0/data/target/fields/slug"),
            Some(&json!("other-post"))
        );
    }

    #[test]
    fn empty_collection_has_no_entries() {
        assert!(collection(json!({ "items": [], "total": 0 })).is_empty());
    }
}
