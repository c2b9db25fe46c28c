use super::*;

#[test]
fn gate_without_preload_is_open() {
    let mut gate = LoadGate::new(None);
    assert!(gate.is_open());
    assert!(matches!(gate.poll(), Poll::Ready(Ok(()))));
}

#[test]
fn closure_preload_opens_after_pending_polls() {
    let mut polls = 0;
    let mut gate = LoadGate::new(Some(Box::new(poll_fn(move || {
        polls += 1;
        if polls < 3 {
            Poll::Pending
        } else {
            Poll::Ready(Ok(()))
        }
    }))));
    assert!(gate.poll().is_pending());
    assert!(gate.poll().is_pending());
    assert!(!gate.is_open());
    assert!(matches!(gate.poll(), Poll::Ready(Ok(()))));
    assert!(gate.is_open());
}

#[test]
fn failure_becomes_config_error_and_stays_closed() {
    let mut gate = LoadGate::new(Some(Box::new(poll_fn(|| {
        Poll::Ready(Err(anyhow::anyhow!("font missing")))
    }))));
    match gate.poll() {
        Poll::Ready(Err(ConfigError::PreloadFailed { source })) => {
            assert_eq!(source.to_string(), "font missing");
        }
        other => panic!("unexpected {other:?}"),
    }
    assert!(!gate.is_open());
    assert!(gate.poll().is_pending());
}

#[test]
fn channel_preload_completes_from_another_thread() {
    let (tx, rx) = mpsc::channel();
    let mut gate = LoadGate::new(Some(Box::new(rx)));
    assert!(gate.poll().is_pending());
    std::thread::spawn(move || tx.send(Ok(())).unwrap())
        .join()
        .unwrap();
    assert!(matches!(gate.poll(), Poll::Ready(Ok(()))));

    let (tx, rx) = mpsc::channel::<anyhow::Result<()>>();
    drop(tx);
    let mut gate = LoadGate::new(Some(Box::new(rx)));
    assert!(matches!(
        gate.poll(),
        Poll::Ready(Err(ConfigError::PreloadFailed { .. }))
    ));
}
