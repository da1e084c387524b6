use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Opaque file metadata carried alongside a listing. Never interpreted by the
/// pipeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NodeMeta {
    pub size: Option<u64>,
    /// Seconds since the unix epoch.
    pub modified: Option<u64>,
}

/// One entry of a remote listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteNode {
    pub path: String,
    pub name: String,
    pub is_dir: bool,
    pub meta: NodeMeta,
    /// Immediate children, filled in only for a directory under inspection.
    pub children: Vec<RemoteNode>,
}

impl RemoteNode {
    pub fn file(path: impl Into<String>) -> Self {
        Self::new(path.into(), false)
    }

    pub fn dir(path: impl Into<String>) -> Self {
        Self::new(path.into(), true)
    }

    fn new(path: String, is_dir: bool) -> Self {
        let name = base_name(&path).to_string();
        Self {
            path,
            name,
            is_dir,
            meta: NodeMeta::default(),
            children: Vec::new(),
        }
    }

    pub fn with_meta(mut self, meta: NodeMeta) -> Self {
        self.meta = meta;
        self
    }

    pub fn with_children(mut self, children: Vec<RemoteNode>) -> Self {
        self.children = children;
        self
    }
}

/// Last component of a slash separated remote path. `"/"` and `""` map to
/// themselves.
pub fn base_name(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        return path;
    }
    trimmed.rsplit('/').next().unwrap_or(trimmed)
}

/// Joins a remote directory path and a child name with a single `/`.
pub fn join_remote(dir: &str, name: &str) -> String {
    if dir.is_empty() {
        return name.to_string();
    }
    format!("{}/{}", dir.trim_end_matches('/'), name)
}

/// Best search result for a catalog entry, as returned by the metadata service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieMatch {
    #[serde(rename = "Title", default)]
    pub title: String,
    #[serde(rename = "Year", default)]
    pub year: String,
    #[serde(rename = "ImdbID", alias = "imdbID", default)]
    pub imdb_id: String,
    #[serde(rename = "Type", default)]
    pub media_type: String,
    #[serde(rename = "Poster", default)]
    pub poster: String,
}

impl MovieMatch {
    /// An empty poster means the match is not usable.
    pub fn has_poster(&self) -> bool {
        !self.poster.is_empty()
    }
}

/// A single video file or a bundle directory discovered by a walk.
///
/// The JSON shape (`Title`, `FullPath`, `Dir`, `RemoteFiles`, `ApiMovie`) is
/// what the published catalog endpoint serves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "FullPath")]
    pub full_path: String,
    #[serde(rename = "Dir", default)]
    pub is_bundle: bool,
    #[serde(rename = "RemoteFiles", default, deserialize_with = "null_as_empty")]
    pub members: Vec<CatalogEntry>,
    #[serde(
        rename = "ApiMovie",
        default,
        serialize_with = "serialize_match",
        deserialize_with = "deserialize_match"
    )]
    pub matched: Option<MovieMatch>,
}

impl CatalogEntry {
    pub fn file(title: impl Into<String>, full_path: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            full_path: full_path.into(),
            is_bundle: false,
            members: Vec::new(),
            matched: None,
        }
    }

    pub fn bundle(
        title: impl Into<String>,
        full_path: impl Into<String>,
        members: Vec<CatalogEntry>,
    ) -> Self {
        Self {
            title: title.into(),
            full_path: full_path.into(),
            is_bundle: true,
            members,
            matched: None,
        }
    }

    /// Whether the entry carries a match good enough to publish.
    pub fn is_publishable(&self) -> bool {
        self.matched.as_ref().is_some_and(MovieMatch::has_poster)
    }
}

// The catalog consumer expects `ApiMovie` to always be an object.
fn serialize_match<S: Serializer>(
    matched: &Option<MovieMatch>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match matched {
        Some(m) => m.serialize(serializer),
        None => MovieMatch::default().serialize(serializer),
    }
}

fn deserialize_match<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<MovieMatch>, D::Error> {
    let parsed = Option::<MovieMatch>::deserialize(deserializer)?;
    Ok(parsed.filter(|m| *m != MovieMatch::default()))
}

fn null_as_empty<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Vec<CatalogEntry>, D::Error> {
    Ok(Option::<Vec<CatalogEntry>>::deserialize(deserializer)?.unwrap_or_default())
}
