//! JSON decoding for wiki API responses.
//!
//! The wiki answers listing requests in one of two shapes:
//!
//! - an **envelope**: `{"info": {"count": .., "pages": .., "next_page": .., "prev_page": ..}, "results": [...]}`
//! - a **bare array**: `[...]`, which is the whole result set on a single page
//!
//! Anything else is a format error. This module turns either shape into a
//! [`Page`], and provides a small dot-path helper for poking at nested values.
//!
//! # Examples
//!
//! ```rust
//! use titanwiki::net::json;
//! use titanwiki::types::Titan;
//! use serde_json::json;
//!
//! let body = json!({
//!     "info": {"count": 9, "pages": 1, "next_page": null, "prev_page": null},
//!     "results": [{"id": 1, "name": "Armored Titan", "height": "15 meters"}]
//! });
//!
//! let page = json::decode_page::<Titan>(body).unwrap();
//! assert_eq!(page.info.count, 9);
//! assert_eq!(page.items[0].name, "Armored Titan");
//! ```

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{
    error::{Error, Result},
    types::{Page, PageInfo},
};

/// Extracts a value from nested JSON using dot notation.
///
/// # Examples
///
/// ```rust
/// use titanwiki::net::json;
/// use serde_json::json;
///
/// let data = json!({"info": {"pages": 11}});
/// assert_eq!(json::extract_path(&data, "info.pages").and_then(|v| v.as_u64()), Some(11));
/// assert_eq!(json::extract_path(&data, "info.count"), None);
/// ```
pub fn extract_path<'a>(json: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = json;

    for key in path.split('.') {
        current = current.get(key)?;
    }

    Some(current)
}

fn shape_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Decodes a listing response into a [`Page`].
///
/// # Errors
///
/// * [`Error::Format`] - If the body is neither an envelope nor an array
/// * [`Error::Json`] - If a record or the `info` block has the wrong fields
///
/// # Examples
///
/// ```rust
/// use titanwiki::net::json;
/// use titanwiki::types::Episode;
/// use serde_json::json;
///
/// let bare = json!([{"id": 1, "name": "To You, in 2000 Years"}]);
/// let page = json::decode_page::<Episode>(bare).unwrap();
/// assert_eq!(page.total_pages(), 1);
///
/// let odd = json!({"data": []});
/// assert!(json::decode_page::<Episode>(odd).is_err());
/// ```
pub fn decode_page<T>(body: Value) -> Result<Page<T>>
where
    T: DeserializeOwned,
{
    match body {
        Value::Array(items) => {
            let items = decode_items(items)?;
            Ok(Page::single(items))
        }
        Value::Object(mut map) => {
            let results = match map.remove("results") {
                Some(Value::Array(items)) => items,
                Some(other) => {
                    return Err(Error::format(format!(
                        "`results` is {}, expected an array",
                        shape_of(&other)
                    )));
                }
                None => {
                    return Err(Error::format(
                        "object without a `results` array".to_string(),
                    ));
                }
            };

            let items = decode_items(results)?;
            let mut info = match map.remove("info") {
                Some(Value::Null) | None => PageInfo::default(),
                Some(info) => serde_json::from_value::<PageInfo>(info)?,
            };

            // A response is always at least the page it carries
            info.pages = info.pages.max(1);
            info.count = info.count.max(items.len() as u32);

            Ok(Page { items, info })
        }
        other => Err(Error::format(format!(
            "top-level value is {}",
            shape_of(&other)
        ))),
    }
}

fn decode_items<T: DeserializeOwned>(items: Vec<Value>) -> Result<Vec<T>> {
    items
        .into_iter()
        .map(|item| serde_json::from_value(item).map_err(Into::into))
        .collect()
}

/// Decodes a single-record response.
///
/// Some deployments wrap single records in a one-element array; that is
/// unwrapped too.
pub fn decode_record<T>(body: Value) -> Result<T>
where
    T: DeserializeOwned,
{
    match body {
        Value::Object(map) => serde_json::from_value(Value::Object(map)).map_err(Into::into),
        Value::Array(mut items) if items.len() == 1 => {
            serde_json::from_value(items.remove(0)).map_err(Into::into)
        }
        Value::Array(items) if items.is_empty() => Err(Error::not_found("empty record response")),
        other => Err(Error::format(format!(
            "expected a record object, got {}",
            shape_of(&other)
        ))),
    }
}

/// Total record count of a listing response, without decoding its records.
pub fn total_count(body: Value) -> Result<u32> {
    match &body {
        Value::Array(items) => Ok(items.len() as u32),
        Value::Object(_) => {
            if let Some(count) = extract_path(&body, "info.count").and_then(Value::as_u64) {
                return Ok(count as u32);
            }
            extract_path(&body, "results")
                .and_then(Value::as_array)
                .map(|items| items.len() as u32)
                .ok_or_else(|| Error::format("object without a `results` array"))
        }
        other => Err(Error::format(format!(
            "top-level value is {}",
            shape_of(other)
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Character;
    use serde_json::json;

    #[test]
    fn test_envelope_keeps_total_pages() {
        let body = json!({
            "info": {"count": 3, "pages": 3, "next_page": "https://api.example.com/characters?page=2", "prev_page": null},
            "results": [{"id": 1, "name": "Eren Yeager"}]
        });
        let page = decode_page::<Character>(body).unwrap();
        assert_eq!(page.total_pages(), 3);
        assert_eq!(page.items.len(), 1);
    }

    #[test]
    fn test_bare_array_is_single_page() {
        let body = json!([{"id": 1, "name": "Eren Yeager"}, {"id": 2, "name": "Mikasa Ackerman"}]);
        let page = decode_page::<Character>(body).unwrap();
        assert_eq!(page.total_pages(), 1);
        assert_eq!(page.info.count, 2);
    }

    #[test]
    fn test_envelope_without_info_is_single_page() {
        let body = json!({"results": []});
        let page = decode_page::<Character>(body).unwrap();
        assert_eq!(page.total_pages(), 1);
        assert!(page.is_empty());
    }

    #[test]
    fn test_info_without_pages_is_single_page() {
        for info in [json!({"count": 1}), json!({"count": 1, "pages": 0}), json!({})] {
            let body = json!({"info": info.clone(), "results": [{"id": 1, "name": "Eren Yeager"}]});
            let page = decode_page::<Character>(body).unwrap();
            assert_eq!(page.total_pages(), 1, "info: {info}");
            assert_eq!(page.info.count, 1);
        }
    }

    #[test]
    fn test_other_shapes_are_format_errors() {
        for body in [json!({"data": []}), json!("nope"), json!(42), json!(null), json!({"results": {}})] {
            let err = decode_page::<Character>(body).unwrap_err();
            assert!(matches!(err, Error::Format(_)), "unexpected error: {err}");
        }
    }

    #[test]
    fn test_record_in_single_element_array() {
        let record: Character = decode_record(json!([{"id": 7, "name": "Levi Ackerman"}])).unwrap();
        assert_eq!(record.id, 7);
        assert!(matches!(
            decode_record::<Character>(json!([])),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_total_count() {
        assert_eq!(total_count(json!({"info": {"count": 201}, "results": []})).unwrap(), 201);
        assert_eq!(total_count(json!([1, 2, 3])).unwrap(), 3);
        assert!(total_count(json!(true)).is_err());
    }
}
