use std::time::Duration;

use bytes::Bytes;
use kvfacade::Error;
use kvfacade::StoreError;
use tokio_stream::StreamExt;

use crate::common::random_prefix;
use crate::common::short_poll_client;
use crate::common::test_client;

#[tokio::test(start_paused = true)]
async fn test_watch_streams_successive_values() {
    let client = test_client();
    let key = format!("{}/feature-flag", random_prefix());
    client.put("filler", "x").await.unwrap();

    let mut stream = client.watch(&key).unwrap().into_stream();

    let writer = {
        let key = key.clone();
        let store = client.store().clone();
        tokio::spawn(async move {
            use kvfacade::Store;
            for value in ["on", "off", "on"] {
                tokio::time::sleep(Duration::from_millis(20)).await;
                store.write(&key, Bytes::from(value)).await.unwrap();
            }
        })
    };

    let mut last_index = 0;
    let mut values = Vec::new();
    while values.len() < 3 {
        let entry = stream.next().await.expect("open").expect("entry");
        assert!(entry.index >= last_index);
        last_index = entry.index;
        values.push(entry.value);
    }

    writer.await.unwrap();
    assert_eq!(values.last(), Some(&Bytes::from("on")));
    assert_eq!(client.tracker().get(&key), Some(last_index));
}

#[tokio::test(start_paused = true)]
async fn test_watch_delivers_absent_entry_after_delete() {
    let client = test_client();
    let key = format!("{}/ephemeral", random_prefix());
    client.put("filler", "x").await.unwrap();
    client.put(&key, "alive").await.unwrap();

    let mut handle = client.watch(&key).unwrap();
    let first = handle.recv().await.expect("open").expect("entry");
    assert_eq!(first.value, Bytes::from("alive"));

    client.store().delete(&key);

    assert_eq!(handle.recv().await, Some(None));
    handle.cancel();
    assert!(handle.join().await.is_ok());
}

#[tokio::test(start_paused = true)]
async fn test_store_failure_ends_watch_for_good() {
    let client = short_poll_client();
    let key = format!("{}/flaky", random_prefix());
    client.put("filler", "x").await.unwrap();
    client.put(&key, "v").await.unwrap();

    let mut handle = client.watch(&key).unwrap();
    assert!(handle.recv().await.expect("open").is_some());

    client
        .store()
        .fail_next(StoreError::Unavailable("agent restarted".to_string()));

    // Timeouts may redeliver the current value before the failure lands
    while let Some(delivered) = handle.recv().await {
        assert_eq!(delivered.expect("entry").value, Bytes::from("v"));
    }
    assert!(handle.recv().await.is_none());

    assert!(matches!(
        handle.join().await,
        Err(Error::Store(StoreError::Unavailable(_)))
    ));
}

#[tokio::test(start_paused = true)]
async fn test_watches_on_different_keys_are_independent() {
    let client = test_client();
    let prefix = random_prefix();
    let (a, b) = (format!("{prefix}/a"), format!("{prefix}/b"));
    client.put("filler", "x").await.unwrap();

    let mut watch_a = client.watch(&a).unwrap();
    let mut watch_b = client.watch(&b).unwrap();

    tokio::time::sleep(Duration::from_millis(10)).await;
    client.put(&b, "only-b").await.unwrap();

    let got_b = watch_b.recv().await.expect("open").expect("entry");
    assert_eq!(got_b.key, b);

    watch_b.cancel();
    assert!(watch_b.join().await.is_ok());

    client.put(&a, "now-a").await.unwrap();
    let got_a = watch_a.recv().await.expect("open").expect("entry");
    assert_eq!(got_a.value, Bytes::from("now-a"));

    client.shutdown();
    assert!(watch_a.recv().await.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_dropping_stream_stops_watch_task() {
    let client = test_client();
    let key = format!("{}/dropped", random_prefix());

    let handle = client.watch(&key).unwrap();
    drop(handle.into_stream());

    tokio::time::sleep(Duration::from_millis(10)).await;
    client.put(&key, "nobody listens").await.unwrap();
    assert_eq!(client.tracker().get(&key), None);
}
