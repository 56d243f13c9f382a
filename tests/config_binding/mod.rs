use std::time::SystemTime;

use kvfacade::impl_bindable;
use kvfacade::BindError;
use kvfacade::Error;
use kvfacade::ScalarKind;

use crate::common::random_prefix;
use crate::common::test_client;

#[derive(Debug, Default)]
struct Database {
    url: String,
    pool_size: isize,
    timeout_secs: f32,
}

#[derive(Debug, Default)]
struct AppConfig {
    name: String,
    replicas: isize,
    sample_rate: f64,
    database: Database,
    loaded_at: Option<SystemTime>,
}

impl_bindable!(Database {
    scalar url,
    scalar pool_size = "name:pool-size:default:10",
    scalar timeout_secs = "name:timeout:default:1.5",
});

impl_bindable!(AppConfig {
    scalar name,
    scalar replicas = "default:3",
    scalar sample_rate = "name:sample:default:1.0",
    nested database = "name:db",
    opaque loaded_at,
});

#[tokio::test]
async fn test_bind_nested_record_with_overrides_and_defaults() {
    let client = test_client();
    let parent = random_prefix();

    client.put(&format!("{parent}/name"), "billing").await.unwrap();
    client.put(&format!("{parent}/replicas"), "5").await.unwrap();
    client
        .put(&format!("{parent}/db/url"), "postgres://db:5432/app")
        .await
        .unwrap();
    client.put(&format!("{parent}/db/timeout"), " 2.5 ").await.unwrap();
    client.put(&format!("{parent}/loadedat"), "ignored").await.unwrap();

    let mut config = AppConfig::default();
    client.load_into(&parent, &mut config).await.unwrap();

    assert_eq!(config.name, "billing");
    assert_eq!(config.replicas, 5);
    assert_eq!(config.sample_rate, 1.0);
    assert_eq!(config.database.url, "postgres://db:5432/app");
    assert_eq!(config.database.pool_size, 10);
    assert_eq!(config.database.timeout_secs, 2.5);
    assert!(config.loaded_at.is_none());
}

#[tokio::test]
async fn test_bind_on_empty_namespace_uses_defaults_and_empty_text() {
    let client = test_client();

    let mut config = AppConfig {
        name: "stale".to_string(),
        ..Default::default()
    };
    client.load_into(&random_prefix(), &mut config).await.unwrap();

    assert_eq!(config.name, "");
    assert_eq!(config.replicas, 3);
    assert_eq!(config.database.pool_size, 10);
}

#[derive(Debug, Default)]
struct NoDefault {
    label: String,
    count: isize,
}

impl_bindable!(NoDefault {
    scalar label,
    scalar count,
});

#[tokio::test]
async fn test_absent_numeric_without_default_is_malformed() {
    let client = test_client();
    let parent = random_prefix();
    client.put(&format!("{parent}/label"), "kept").await.unwrap();

    let mut record = NoDefault::default();
    let result = client.load_into(&parent, &mut record).await;

    match result {
        Err(Error::Bind(BindError::MalformedValue { kind, raw })) => {
            assert_eq!(kind, ScalarKind::Int);
            assert_eq!(raw, "");
        }
        other => panic!("expected MalformedValue, got {other:?}"),
    }
    assert_eq!(record.label, "kept");
}

#[derive(Debug, Default)]
struct WithFlag {
    enabled: bool,
}

impl_bindable!(WithFlag {
    scalar enabled = "default:true",
});

#[tokio::test]
async fn test_unsupported_scalar_kind_fails_bind() {
    let client = test_client();

    let result = client.load_into(&random_prefix(), &mut WithFlag::default()).await;

    assert!(matches!(
        result,
        Err(Error::Bind(BindError::UnsupportedType {
            kind: ScalarKind::Bool
        }))
    ));
}

#[derive(Debug, Default)]
struct BadTag {
    host: String,
}

impl_bindable!(BadTag {
    scalar host = "name:host:default",
});

#[tokio::test]
async fn test_odd_tag_tokens_fail_bind() {
    let client = test_client();

    let result = client.load_into(&random_prefix(), &mut BadTag::default()).await;

    assert!(matches!(
        result,
        Err(Error::Bind(BindError::InvalidTagSyntax { .. }))
    ));
}

#[derive(Debug, Default)]
struct Colliding {
    primary: String,
    secondary: String,
}

impl_bindable!(Colliding {
    scalar primary = "name:addr",
    scalar secondary = "name:addr",
});

#[tokio::test]
async fn test_sibling_path_collision_is_rejected() {
    let client = test_client();
    let parent = random_prefix();
    client.put(&format!("{parent}/addr"), "10.0.0.1").await.unwrap();

    let mut record = Colliding::default();
    let result = client.load_into(&parent, &mut record).await;

    match result {
        Err(Error::Bind(BindError::DuplicatePathSegment { path })) => {
            assert_eq!(path, format!("{parent}/addr"))
        }
        other => panic!("expected DuplicatePathSegment, got {other:?}"),
    }
    assert_eq!(record.primary, "10.0.0.1");
    assert_eq!(record.secondary, "");
}
