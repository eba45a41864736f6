//! Core data types for wiki records, listings, and filters.
//!
//! This module defines the fundamental data structures used throughout titanwiki:
//!
//! - [`Character`] - A character record, the one the filterable list is built on
//! - [`Episode`], [`Location`], [`Organization`], [`Titan`] - The other wiki records
//! - [`Resource`] - What every record type exposes to lists and detail views
//! - [`Page`] and [`PageInfo`] - A decoded listing and its pagination metadata
//! - [`FilterSet`] - The name/status/gender/occupation filters applied to a query
//!
//! Records are passed through as the API shapes them. Fields other than `id`
//! and `name` are optional, and scalar fields accept both JSON strings and
//! numbers because the wiki is not consistent about which it sends.
//!
//! # Examples
//!
//! ```rust
//! use titanwiki::types::{Character, Resource};
//!
//! let json = r#"{"id": 1, "name": "Eren Yeager", "age": 19, "status": "Deceased"}"#;
//! let eren: Character = serde_json::from_str(json).unwrap();
//!
//! assert_eq!(eren.name(), "Eren Yeager");
//! assert_eq!(eren.age.as_deref(), Some("19"));
//! ```

use derive_builder::Builder;
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::api::Endpoint;

/// Lenient deserializers for fields the wiki types inconsistently.
mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    fn scalar_to_string(value: Value) -> Option<String> {
        match value {
            Value::String(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            }
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// String, number, or null into `Option<String>`.
    pub fn string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(scalar_to_string(Value::deserialize(deserializer)?))
    }

    /// Array, single scalar, or null into `Vec<String>`.
    pub fn list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::Array(values) => values.into_iter().filter_map(scalar_to_string).collect(),
            other => scalar_to_string(other).into_iter().collect(),
        })
    }
}

/// A family entry in a character's relatives list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relative {
    #[serde(default, deserialize_with = "lenient::string")]
    pub family: Option<String>,

    #[serde(default, deserialize_with = "lenient::list")]
    pub members: Vec<String>,
}

/// A group a character belongs to, with its sub-groups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "lenient::list")]
    pub sub_groups: Vec<String>,
}

/// A character record as served by the `characters` endpoint.
///
/// Only `id` and `name` are guaranteed. Everything else is checked for
/// presence before it is shown.
///
/// # Examples
///
/// ```rust
/// use titanwiki::types::Character;
///
/// let json = r#"{
///     "id": 2,
///     "name": "Mikasa Ackerman",
///     "img": "https://static.wikia.nocookie.net/mikasa.png/revision/latest?cb=1",
///     "alias": ["Mikasa"],
///     "species": ["Human"],
///     "gender": "Female",
///     "height": "1.76 m",
///     "groups": [{"name": "Survey Corps", "sub_groups": ["Levi Squad"]}]
/// }"#;
///
/// let mikasa: Character = serde_json::from_str(json).unwrap();
/// assert_eq!(mikasa.groups[0].sub_groups, vec!["Levi Squad"]);
/// assert!(mikasa.relatives.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    /// Identifier assigned by the wiki
    pub id: u32,

    /// Display name
    pub name: String,

    /// Portrait URL, usually carrying a `/revision/...` suffix
    #[serde(default, deserialize_with = "lenient::string")]
    pub img: Option<String>,

    #[serde(default, deserialize_with = "lenient::list")]
    pub alias: Vec<String>,

    #[serde(default, deserialize_with = "lenient::list")]
    pub species: Vec<String>,

    #[serde(default, deserialize_with = "lenient::string")]
    pub gender: Option<String>,

    #[serde(default, deserialize_with = "lenient::string")]
    pub age: Option<String>,

    #[serde(default, deserialize_with = "lenient::string")]
    pub height: Option<String>,

    #[serde(default)]
    pub relatives: Vec<Relative>,

    #[serde(default, deserialize_with = "lenient::string")]
    pub birthplace: Option<String>,

    #[serde(default, deserialize_with = "lenient::string")]
    pub residence: Option<String>,

    #[serde(default, deserialize_with = "lenient::string")]
    pub status: Option<String>,

    #[serde(default, deserialize_with = "lenient::string")]
    pub occupation: Option<String>,

    #[serde(default)]
    pub groups: Vec<Group>,

    #[serde(default, deserialize_with = "lenient::list")]
    pub roles: Vec<String>,

    /// Episode reference URLs
    #[serde(default, deserialize_with = "lenient::list")]
    pub episodes: Vec<String>,
}

/// An episode record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    pub id: u32,
    pub name: String,

    #[serde(default, deserialize_with = "lenient::string")]
    pub img: Option<String>,

    /// Season/episode code such as `S01E01`
    #[serde(default, deserialize_with = "lenient::string")]
    pub episode: Option<String>,

    /// Character reference URLs
    #[serde(default, deserialize_with = "lenient::list")]
    pub characters: Vec<String>,
}

/// A location record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: u32,
    pub name: String,

    #[serde(default, deserialize_with = "lenient::string")]
    pub img: Option<String>,

    #[serde(default, deserialize_with = "lenient::string")]
    pub territory: Option<String>,

    #[serde(default, deserialize_with = "lenient::string")]
    pub region: Option<String>,

    #[serde(default, deserialize_with = "lenient::list")]
    pub notable_inhabitants: Vec<String>,

    #[serde(default, deserialize_with = "lenient::list")]
    pub notable_former_inhabitants: Vec<String>,

    #[serde(default, deserialize_with = "lenient::string")]
    pub debut: Option<String>,
}

/// An organization record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    pub id: u32,
    pub name: String,

    #[serde(default, deserialize_with = "lenient::string")]
    pub img: Option<String>,

    #[serde(default, deserialize_with = "lenient::list")]
    pub occupations: Vec<String>,

    #[serde(default, deserialize_with = "lenient::list")]
    pub notable_members: Vec<String>,

    #[serde(default, deserialize_with = "lenient::list")]
    pub notable_former_members: Vec<String>,

    #[serde(default, deserialize_with = "lenient::string")]
    pub affiliation: Option<String>,

    #[serde(default, deserialize_with = "lenient::string")]
    pub debut: Option<String>,
}

/// One of the nine titans.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Titan {
    pub id: u32,
    pub name: String,

    #[serde(default, deserialize_with = "lenient::string")]
    pub img: Option<String>,

    #[serde(default, deserialize_with = "lenient::string")]
    pub height: Option<String>,

    #[serde(default, deserialize_with = "lenient::list")]
    pub abilities: Vec<String>,

    #[serde(default, deserialize_with = "lenient::string")]
    pub current_inheritor: Option<String>,

    #[serde(default, deserialize_with = "lenient::list")]
    pub former_inheritors: Vec<String>,

    #[serde(default, deserialize_with = "lenient::string")]
    pub allegiance: Option<String>,
}

/// Common surface of every wiki record type.
///
/// Lists and detail views are written against this trait, so the same
/// browser drives characters, episodes, locations, organizations and titans.
pub trait Resource: DeserializeOwned + Clone + Send + Sync + 'static {
    /// Endpoint the records are listed under
    const ENDPOINT: Endpoint;

    fn id(&self) -> u32;

    fn name(&self) -> &str;

    /// Raw image URL as sent by the wiki
    fn image(&self) -> Option<&str>;

    /// Short description for a list row.
    fn summary(&self) -> String;

    /// Label/value pairs for a detail view, skipping absent fields.
    fn details(&self) -> Vec<(&'static str, String)>;
}

fn push_opt(out: &mut Vec<(&'static str, String)>, label: &'static str, value: &Option<String>) {
    if let Some(v) = value {
        out.push((label, v.clone()));
    }
}

fn push_list(out: &mut Vec<(&'static str, String)>, label: &'static str, values: &[String]) {
    if !values.is_empty() {
        out.push((label, values.join(", ")));
    }
}

fn join_present(parts: &[&Option<String>]) -> String {
    parts
        .iter()
        .filter_map(|p| p.as_deref())
        .collect::<Vec<_>>()
        .join(" · ")
}

impl Resource for Character {
    const ENDPOINT: Endpoint = Endpoint::Characters;

    fn id(&self) -> u32 {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn image(&self) -> Option<&str> {
        self.img.as_deref()
    }

    fn summary(&self) -> String {
        join_present(&[&self.status, &self.gender, &self.occupation])
    }

    fn details(&self) -> Vec<(&'static str, String)> {
        let mut out = Vec::new();
        push_list(&mut out, "Alias", &self.alias);
        push_list(&mut out, "Species", &self.species);
        push_opt(&mut out, "Gender", &self.gender);
        push_opt(&mut out, "Age", &self.age);
        push_opt(&mut out, "Height", &self.height);
        push_opt(&mut out, "Status", &self.status);
        push_opt(&mut out, "Occupation", &self.occupation);
        push_opt(&mut out, "Birthplace", &self.birthplace);
        push_opt(&mut out, "Residence", &self.residence);

        for relative in &self.relatives {
            if relative.members.is_empty() {
                continue;
            }
            let label = relative.family.as_deref().unwrap_or("Family");
            out.push(("Relatives", format!("{}: {}", label, relative.members.join(", "))));
        }

        for group in &self.groups {
            if let Some(name) = &group.name {
                let value = if group.sub_groups.is_empty() {
                    name.clone()
                } else {
                    format!("{} ({})", name, group.sub_groups.join(", "))
                };
                out.push(("Group", value));
            }
        }

        push_list(&mut out, "Roles", &self.roles);
        if !self.episodes.is_empty() {
            out.push(("Episodes", self.episodes.len().to_string()));
        }
        out
    }
}

impl Resource for Episode {
    const ENDPOINT: Endpoint = Endpoint::Episodes;

    fn id(&self) -> u32 {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn image(&self) -> Option<&str> {
        self.img.as_deref()
    }

    fn summary(&self) -> String {
        self.episode.clone().unwrap_or_default()
    }

    fn details(&self) -> Vec<(&'static str, String)> {
        let mut out = Vec::new();
        push_opt(&mut out, "Episode", &self.episode);
        if !self.characters.is_empty() {
            out.push(("Characters", self.characters.len().to_string()));
        }
        out
    }
}

impl Resource for Location {
    const ENDPOINT: Endpoint = Endpoint::Locations;

    fn id(&self) -> u32 {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn image(&self) -> Option<&str> {
        self.img.as_deref()
    }

    fn summary(&self) -> String {
        join_present(&[&self.territory, &self.region])
    }

    fn details(&self) -> Vec<(&'static str, String)> {
        let mut out = Vec::new();
        push_opt(&mut out, "Territory", &self.territory);
        push_opt(&mut out, "Region", &self.region);
        push_list(&mut out, "Notable inhabitants", &self.notable_inhabitants);
        push_list(
            &mut out,
            "Former inhabitants",
            &self.notable_former_inhabitants,
        );
        push_opt(&mut out, "Debut", &self.debut);
        out
    }
}

impl Resource for Organization {
    const ENDPOINT: Endpoint = Endpoint::Organizations;

    fn id(&self) -> u32 {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn image(&self) -> Option<&str> {
        self.img.as_deref()
    }

    fn summary(&self) -> String {
        self.affiliation.clone().unwrap_or_default()
    }

    fn details(&self) -> Vec<(&'static str, String)> {
        let mut out = Vec::new();
        push_list(&mut out, "Occupations", &self.occupations);
        push_list(&mut out, "Notable members", &self.notable_members);
        push_list(&mut out, "Former members", &self.notable_former_members);
        push_opt(&mut out, "Affiliation", &self.affiliation);
        push_opt(&mut out, "Debut", &self.debut);
        out
    }
}

impl Resource for Titan {
    const ENDPOINT: Endpoint = Endpoint::Titans;

    fn id(&self) -> u32 {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn image(&self) -> Option<&str> {
        self.img.as_deref()
    }

    fn summary(&self) -> String {
        join_present(&[&self.height, &self.allegiance])
    }

    fn details(&self) -> Vec<(&'static str, String)> {
        let mut out = Vec::new();
        push_opt(&mut out, "Height", &self.height);
        push_list(&mut out, "Abilities", &self.abilities);
        push_opt(&mut out, "Current inheritor", &self.current_inheritor);
        push_list(&mut out, "Former inheritors", &self.former_inheritors);
        push_opt(&mut out, "Allegiance", &self.allegiance);
        out
    }
}

/// Pagination metadata carried by an envelope response.
///
/// # Fields
///
/// * `count` - Total number of records matching the query
/// * `pages` - Total number of pages
/// * `next` - URL of the next page, if any
/// * `prev` - URL of the previous page, if any
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageInfo {
    #[serde(default)]
    pub count: u32,

    #[serde(default)]
    pub pages: u32,

    #[serde(default, alias = "next_page")]
    pub next: Option<String>,

    #[serde(default, alias = "prev_page")]
    pub prev: Option<String>,
}

/// One decoded page of a listing.
///
/// # Examples
///
/// ```rust
/// use titanwiki::types::Page;
///
/// let page = Page::single(vec!["a", "b"]);
/// assert_eq!(page.total_pages(), 1);
/// assert_eq!(page.info.count, 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub info: PageInfo,
}

impl<T> Page<T> {
    /// Wraps a bare result list as the only page there is.
    pub fn single(items: Vec<T>) -> Self {
        let info = PageInfo {
            count: items.len() as u32,
            pages: 1,
            next: None,
            prev: None,
        };
        Self { items, info }
    }

    pub fn total_pages(&self) -> u32 {
        self.info.pages
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// The filters applied to a listing query.
///
/// Values are compared and sent trimmed, and blank values count as unset,
/// so two filter sets describing the same query compare equal however they
/// were built. That equality is what keeps a list from refetching when an
/// input is set to the value it already has.
///
/// # Builder Usage
///
/// ```rust
/// use titanwiki::types::FilterSetBuilder;
///
/// let filter = FilterSetBuilder::default()
///     .name("Armin")
///     .status("Alive")
///     .build()
///     .unwrap();
///
/// assert_eq!(filter.name.as_deref(), Some("Armin"));
/// assert!(filter.gender.is_none());
/// ```
#[derive(Debug, Clone, Default, Eq, Builder)]
#[builder(setter(into, strip_option), default, build_fn(private, name = "build_raw"))]
pub struct FilterSet {
    pub name: Option<String>,
    pub status: Option<String>,
    pub gender: Option<String>,
    pub occupation: Option<String>,
}

impl FilterSet {
    /// Builds a filter set from raw input values, dropping empty ones.
    ///
    /// Values are trimmed; a whitespace-only value counts as empty.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use titanwiki::types::FilterSet;
    ///
    /// let filter = FilterSet::from_values("  Levi ", "", "Male", "   ");
    /// assert_eq!(filter.name.as_deref(), Some("Levi"));
    /// assert_eq!(filter.status, None);
    /// assert_eq!(filter.occupation, None);
    /// ```
    pub fn from_values(name: &str, status: &str, gender: &str, occupation: &str) -> Self {
        Self {
            name: non_empty(name),
            status: non_empty(status),
            gender: non_empty(gender),
            occupation: non_empty(occupation),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pairs().is_empty()
    }

    /// Query parameter pairs in wire order: trimmed, non-blank fields only.
    pub fn pairs(&self) -> Vec<(&'static str, &str)> {
        [
            ("name", &self.name),
            ("status", &self.status),
            ("gender", &self.gender),
            ("occupation", &self.occupation),
        ]
        .into_iter()
        .filter_map(|(key, value)| {
            let value = value.as_deref()?.trim();
            (!value.is_empty()).then_some((key, value))
        })
        .collect()
    }

    /// The same filters with every field trimmed and blank ones unset.
    pub fn normalized(self) -> Self {
        let tidy = |value: Option<String>| value.as_deref().and_then(non_empty);
        Self {
            name: tidy(self.name),
            status: tidy(self.status),
            gender: tidy(self.gender),
            occupation: tidy(self.occupation),
        }
    }
}

impl PartialEq for FilterSet {
    fn eq(&self, other: &Self) -> bool {
        self.pairs() == other.pairs()
    }
}

impl FilterSetBuilder {
    /// Builds the filter set, trimming values and unsetting blank ones.
    pub fn build(&self) -> Result<FilterSet, FilterSetBuilderError> {
        self.build_raw().map(FilterSet::normalized)
    }
}

/// `value` trimmed, or `None` when nothing is left.
pub(crate) fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
