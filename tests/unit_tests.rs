use std::path::PathBuf;
use titanwiki::prelude::*;

fn temp_config(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("titanwiki-{}-{}.toml", name, std::process::id()));
    std::fs::write(&path, contents).unwrap();
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_set_builder() {
        let filter = FilterSetBuilder::default()
            .name("Reiner Braun")
            .gender("Male")
            .build()
            .unwrap();

        assert_eq!(filter.name.as_deref(), Some("Reiner Braun"));
        assert_eq!(filter.gender.as_deref(), Some("Male"));
        assert!(filter.status.is_none());
        assert!(!filter.is_empty());
        assert_eq!(filter.pairs(), vec![("name", "Reiner Braun"), ("gender", "Male")]);
    }

    #[test]
    fn test_filter_equality_ignores_blank_inputs() {
        let typed = FilterSet::from_values(" Armin ", "", "", "  ");
        let built = FilterSetBuilder::default().name("Armin").build().unwrap();

        assert_eq!(typed, built);
        assert!(FilterSet::from_values(" ", "", "\t", "").is_empty());
    }

    #[test]
    fn test_blank_builder_value_stays_off_the_wire() {
        let filter = FilterSetBuilder::default()
            .name("")
            .status("Alive")
            .build()
            .unwrap();

        assert_eq!(
            ListQuery::new(1).with_filter(filter.clone()).to_query_string(),
            "page=1&status=Alive"
        );
        assert_eq!(filter, FilterSet::from_values("", "Alive", "", ""));
    }

    #[test]
    fn test_list_query_string() {
        let filter = FilterSet::from_values("Hange Zoë", "Deceased", "", "Commander");
        let query = ListQuery::new(0).with_filter(filter);

        assert_eq!(query.page, 1);
        assert_eq!(
            query.to_query_string(),
            "page=1&name=Hange%20Zo%C3%AB&status=Deceased&occupation=Commander"
        );
    }

    #[test]
    fn test_character_from_wiki_json() {
        let json = r#"{
            "id": 4,
            "name": "Levi Ackerman",
            "img": "https://static.wikia.nocookie.net/shingekinokyojin/images/levi.png/revision/latest/scale-to-width-down/350?cb=20220227211605",
            "alias": ["Humanity's strongest soldier"],
            "gender": "Male",
            "status": "Alive",
            "occupation": "Captain",
            "relatives": [],
            "groups": [{"name": "Survey Corps", "sub_groups": ["Special Operations Squad"]}]
        }"#;
        let levi: Character = serde_json::from_str(json).unwrap();

        assert_eq!(levi.id(), 4);
        assert_eq!(levi.name(), "Levi Ackerman");
        assert_eq!(levi.summary(), "Alive · Male · Captain");
        assert_eq!(
            clean_image_url(levi.image().unwrap()).as_deref(),
            Some("https://static.wikia.nocookie.net/shingekinokyojin/images/levi.png")
        );
        assert!(levi.details().iter().any(|(label, _)| *label == "Occupation"));
    }

    #[test]
    fn test_clean_image_url() {
        let test_cases = vec![
            ("https://cdn.example.com/a.png/revision/latest?cb=1", Some("https://cdn.example.com/a.png")),
            ("https://cdn.example.com/a.png", Some("https://cdn.example.com/a.png")),
            ("  https://cdn.example.com/b.jpg/revision/latest  ", Some("https://cdn.example.com/b.jpg")),
            ("", None),
            ("   ", None),
            ("not a url", None),
        ];

        for (raw, expected) in test_cases {
            assert_eq!(
                clean_image_url(raw).as_deref(),
                expected,
                "Cleaning failed for URL: {:?}",
                raw
            );
        }
    }

    #[test]
    fn test_image_fallbacks() {
        let source = ImageSource::resolve(None, "assets/placeholder.png");
        assert_eq!(source, ImageSource::Placeholder("assets/placeholder.png".to_string()));
        assert!(ImageStatus::Unknown.shows_badge(&source));

        let remote = ImageSource::resolve(Some("https://cdn.example.com/c.png"), "assets/placeholder.png");
        assert!(!ImageStatus::Loaded.shows_badge(&remote));
        assert!(ImageStatus::Failed.shows_badge(&remote));

        assert_eq!(initial_badge("eren"), 'E');
        assert_eq!(initial_badge(""), '?');
    }

    #[test]
    fn test_page_window_shapes() {
        use PageControl::{Ellipsis, Page};

        assert_eq!(page_window(2, 4), vec![Page(1), Page(2), Page(3), Page(4)]);
        assert_eq!(
            page_window(5, 10),
            vec![Page(1), Ellipsis, Page(4), Page(5), Page(6), Ellipsis, Page(9), Page(10)]
        );
        assert_eq!(
            page_window(1, 10),
            vec![Page(1), Page(2), Ellipsis, Page(9), Page(10)]
        );
        assert_eq!(page_window(1, 0), Vec::<PageControl>::new());
        assert_eq!(clamp_page(12, 10), 10);
    }

    #[test]
    fn test_endpoints() {
        assert_eq!(Endpoint::ALL.len(), 5);
        assert_eq!(Endpoint::Characters.path(), "characters");
        assert!(Endpoint::Characters.supports_filters());
        assert!(!Endpoint::Titans.supports_filters());
    }

    #[test]
    fn test_config_from_file() {
        let path = temp_config(
            "valid",
            "api_base = \"http://localhost:4000/\"\ntimeout_secs = 7\n",
        );
        let config = Config::from_path(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.api_base, "http://localhost:4000");
        assert_eq!(config.timeout_secs, 7);
        assert_eq!(config.placeholder_image, Config::default().placeholder_image);
    }

    #[test]
    fn test_config_errors_name_the_file() {
        let path = temp_config("invalid", "timeout_secs = \"never\"\n");
        let err = Config::from_path(&path).unwrap_err();
        std::fs::remove_file(&path).ok();

        assert!(matches!(err, titanwiki::Error::Config(_)));
        assert!(err.to_string().contains("titanwiki-invalid"));

        let missing = std::env::temp_dir().join("titanwiki-does-not-exist.toml");
        assert!(Config::from_path(&missing).is_err());
    }
}
