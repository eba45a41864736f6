//! WikiClient tests against the local stub API

use tokio::time::timeout;
use titanwiki::prelude::*;
use titanwiki::Error;

mod common;
use common::{PER_PAGE, TEST_TIMEOUT, test_client};

#[cfg(test)]
mod client_tests {
    use super::*;

    #[tokio::test]
    async fn test_envelope_listing() {
        let client = test_client();

        let page = timeout(TEST_TIMEOUT, client.list::<Character>().fetch())
            .await
            .expect("listing timed out")
            .expect("listing failed");

        assert_eq!(page.items.len(), PER_PAGE);
        assert_eq!(page.info.count, 6);
        assert_eq!(page.total_pages(), 3);
        assert!(page.info.next.is_some());
        assert!(page.info.prev.is_none());
        assert_eq!(page.items[0].name, "Eren Yeager");
    }

    #[tokio::test]
    async fn test_filters_reach_the_server() {
        let client = test_client();

        let page = client
            .list::<Character>()
            .status("Alive")
            .gender("Male")
            .fetch()
            .await
            .unwrap();

        let names: Vec<_> = page.items.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Armin Arlert", "Levi Ackerman"]);
        assert_eq!(page.total_pages(), 1);
    }

    #[tokio::test]
    async fn test_blank_filters_are_not_sent() {
        let client = test_client();

        let page = client
            .list::<Character>()
            .name("   ")
            .occupation("")
            .page(3)
            .fetch()
            .await
            .unwrap();

        assert_eq!(page.info.count, 6);
        assert_eq!(page.items[0].name, "Hange Zoë");
    }

    #[tokio::test]
    async fn test_bare_array_is_single_page() {
        let client = test_client();

        let page = client.list::<Titan>().fetch().await.unwrap();
        assert_eq!(page.total_pages(), 1);
        assert_eq!(page.items.len(), 3);
        assert_eq!(page.items[1].allegiance.as_deref(), Some("Marley"));
    }

    #[tokio::test]
    async fn test_envelope_without_info() {
        let client = test_client();

        let page = client.list::<Organization>().fetch().await.unwrap();
        assert_eq!(page.total_pages(), 1);
        assert_eq!(page.items[0].name, "Survey Corps");
    }

    #[tokio::test]
    async fn test_server_error_embeds_status() {
        let client = test_client();

        let err = client.list::<Episode>().fetch().await.unwrap_err();
        assert!(matches!(err, Error::Http { status: 500, .. }), "unexpected: {err:?}");
        assert_eq!(
            err.user_message("episodes"),
            "Failed to load episodes: HTTP error! status: 500"
        );
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn test_unexpected_shape_is_format_error() {
        let client = test_client();

        let err = client.list::<Location>().fetch().await.unwrap_err();
        assert!(matches!(err, Error::Format(_)), "unexpected: {err:?}");
    }

    #[tokio::test]
    async fn test_single_record() {
        let client = test_client();

        let levi: Character = fetch_record(&client, 4).await.unwrap();
        assert_eq!(levi.name, "Levi Ackerman");
        assert_eq!(levi.occupation.as_deref(), Some("Captain"));

        let missing = fetch_record::<Character>(&client, 999).await.unwrap_err();
        assert!(matches!(missing, Error::NotFound(_)), "unexpected: {missing:?}");
    }

    #[tokio::test]
    async fn test_image_check_accepts_only_images() {
        let client = test_client();
        let base = client.base_url().to_string();

        assert!(client.probe_image(&format!("{base}/images/ok.png")).await.is_ok());
        assert!(matches!(
            client.probe_image(&format!("{base}/images/missing.png")).await,
            Err(Error::Http { status: 404, .. })
        ));
        assert!(matches!(
            client.probe_image(&format!("{base}/images/page.html")).await,
            Err(Error::Format(_))
        ));
    }

    #[tokio::test]
    async fn test_overview_reports_each_endpoint() {
        let client = test_client();

        let counts = overview(&client).await;
        assert_eq!(counts.len(), Endpoint::ALL.len());

        for (endpoint, count) in counts {
            match endpoint {
                Endpoint::Characters => assert_eq!(count.unwrap(), 6),
                Endpoint::Titans => assert_eq!(count.unwrap(), 3),
                Endpoint::Organizations => assert_eq!(count.unwrap(), 1),
                Endpoint::Episodes => assert!(matches!(count, Err(Error::Http { status: 500, .. }))),
                Endpoint::Locations => assert!(matches!(count, Err(Error::Format(_)))),
            }
        }
    }

    #[tokio::test]
    async fn test_unreachable_api_is_network_error() {
        let config = Config {
            api_base: "http://127.0.0.1:1".to_string(),
            timeout_secs: 2,
            ..Config::default()
        };
        let client = WikiClient::new(&config).unwrap();

        let err = client.list::<Character>().fetch().await.unwrap_err();
        assert!(matches!(err, Error::Network(_)), "unexpected: {err:?}");
        assert!(err.user_message("characters").starts_with("Failed to load characters: "));
    }
}
