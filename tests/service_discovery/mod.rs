use kvfacade::Error;
use kvfacade::ServiceError;

use crate::common::random_prefix;
use crate::common::test_client;

#[tokio::test]
async fn test_register_discover_deregister_lifecycle() {
    let client = test_client();
    let name = random_prefix();

    client
        .register_service(&name, "192.168.1.20:7000", &["canary"])
        .await
        .unwrap();

    let (instance, _) = client.get_first_service(&name, "canary").await.unwrap();
    assert_eq!(instance.id, name);
    assert_eq!(instance.address, "192.168.1.20");
    assert_eq!(instance.port, 7000);
    assert_eq!(instance.tags, vec!["canary".to_string()]);

    assert!(matches!(
        client.get_services(&name, "stable").await,
        Err(Error::Service(ServiceError::ServiceNotFound { .. }))
    ));

    client.deregister_service(&name).await.unwrap();
    assert!(client.get_first_service(&name, "").await.is_err());
}

#[tokio::test]
async fn test_reregistering_replaces_instance() {
    let client = test_client();
    let name = random_prefix();

    client.register_service(&name, "10.0.0.1:80", &[]).await.unwrap();
    client.register_service(&name, "10.0.0.2:81", &[]).await.unwrap();

    let (instances, _) = client.get_services(&name, "").await.unwrap();
    assert_eq!(instances.len(), 1);
    assert_eq!(instances[0].address, "10.0.0.2");
}

#[tokio::test]
async fn test_malformed_addresses_never_reach_the_store() {
    let client = test_client();
    let name = random_prefix();

    for addr in ["no-port", "host:99999", "host:"] {
        assert!(client.register_service(&name, addr, &[]).await.is_err());
    }
    assert!(client.get_services(&name, "").await.is_err());
}
