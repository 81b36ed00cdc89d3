use super::*;

#[test]
fn response_parses_with_missing_url() {
    let ok = UploadResponse::from_json(r#"{"success":true,"url":"https://cdn.example/a.png"}"#)
        .unwrap();
    assert_eq!(ok.clone().hosted_url().unwrap(), "https://cdn.example/a.png");

    let failed = UploadResponse::from_json(r#"{"success":false}"#).unwrap();
    assert_eq!(failed.url, None);
    assert!(matches!(failed.hosted_url(), Err(FrameError::Upload(_))));

    let no_url = UploadResponse::from_json(r#"{"success":true}"#).unwrap();
    assert!(matches!(no_url.hosted_url(), Err(FrameError::Upload(_))));
}

#[test]
fn malformed_body_is_an_upload_error() {
    assert!(matches!(
        UploadResponse::from_json("<html>502</html>"),
        Err(FrameError::Upload(_))
    ));
}

#[test]
fn replies_carry_increasing_generations_and_drain_in_order() {
    let mut channel = UploadChannel::new();
    let first = channel.reply();
    let second = channel.reply();
    assert_eq!(first.generation(), 1);
    assert_eq!(second.generation(), 2);
    assert!(channel.drain().is_empty());

    second.complete_json(r#"{"success":true,"url":"b"}"#);
    std::thread::spawn(move || first.complete(Err(FrameError::upload("timeout"))))
        .join()
        .unwrap();

    let done = channel.drain();
    assert_eq!(done.len(), 2);
    assert_eq!(done[0].generation, 2);
    assert_eq!(done[1].generation, 1);
    assert!(done[1].result.is_err());
    assert!(channel.drain().is_empty());
}

#[test]
fn completing_after_channel_drop_is_silent() {
    let mut channel = UploadChannel::new();
    let reply = channel.reply();
    drop(channel);
    reply.complete_json(r#"{"success":true,"url":"late"}"#);
}
