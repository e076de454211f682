// Unit tests for the chunk buffer and artifact store

use bytes::Bytes;
use clip_recorder::{ArtifactStore, ChunkBuffer, MediaType};

#[test]
fn test_buffer_drops_empty_fragments() {
    let mut buffer = ChunkBuffer::new();

    assert!(buffer.append(Bytes::from_static(b"abc")));
    assert!(!buffer.append(Bytes::new()));
    assert!(buffer.append(Bytes::from_static(b"de")));

    assert_eq!(buffer.len(), 2);
    assert_eq!(buffer.total_bytes(), 5);
}

#[test]
fn test_buffer_drain_takes_everything_in_order() {
    let mut buffer = ChunkBuffer::new();
    buffer.append(Bytes::from_static(b"first"));
    buffer.append(Bytes::from_static(b"second"));

    let drained = buffer.drain();

    assert_eq!(drained, vec![Bytes::from_static(b"first"), Bytes::from_static(b"second")]);
    assert!(buffer.is_empty());
    assert_eq!(buffer.total_bytes(), 0);
    assert!(buffer.drain().is_empty(), "second drain finds nothing");
}

#[test]
fn test_store_concatenates_fragments() {
    let store = ArtifactStore::new();

    let handle = store.create(
        vec![Bytes::from_static(b"hello "), Bytes::from_static(b"world")],
        MediaType::new("video/webm"),
    );
    let artifact = store.resolve(&handle).expect("fresh handle resolves");

    assert_eq!(&artifact.data[..], b"hello world");
    assert_eq!(artifact.media_type.as_str(), "video/webm");
    assert_eq!(artifact.id, handle.id());
    assert_eq!(handle.url(), format!("/artifacts/{}", handle.id()));
}

#[test]
fn test_store_accepts_zero_fragments() {
    let store = ArtifactStore::new();

    let handle = store.create(Vec::new(), MediaType::default());

    assert!(store.resolve(&handle).unwrap().data.is_empty());
}

#[test]
fn test_revoke_invalidates_handle_once() {
    let store = ArtifactStore::new();
    let handle = store.create(vec![Bytes::from_static(b"x")], MediaType::default());
    let shared = store.clone();

    assert!(shared.revoke(&handle));
    assert!(!store.revoke(&handle), "already revoked");
    assert!(store.resolve(&handle).is_none());
    assert_eq!(store.live_count(), 0);
}

#[test]
fn test_revoked_artifact_stays_readable_by_holder() {
    let store = ArtifactStore::new();
    let handle = store.create(vec![Bytes::from_static(b"clip")], MediaType::default());

    // A response already streaming the artifact keeps its own reference
    let held = store.resolve(&handle).unwrap();
    store.revoke(&handle);

    assert_eq!(&held.data[..], b"clip");
    assert!(!store.is_live(&handle));
}
