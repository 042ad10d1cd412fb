use recess::RuntimeBuilder;
use recess::time::{Elapsed, sleep, timeout};

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

#[test]
fn test_timeout_passes_through_fast_future() {
    let rt = RuntimeBuilder::new().build();

    let result = rt.block_on(async {
        timeout(Duration::from_secs(1), async { 42 }).await
    });

    assert_eq!(result, Ok(42));
}

#[test]
fn test_timeout_elapses_on_slow_future() {
    let rt = RuntimeBuilder::new().build();

    let result = rt.block_on(async {
        timeout(Duration::from_millis(20), async {
            sleep(Duration::from_secs(60)).await;
            1
        })
        .await
    });

    assert_eq!(result, Err(Elapsed));
}

#[test]
fn test_timeout_drops_inner_future() {
    struct SetOnDrop(Arc<AtomicBool>);

    impl Drop for SetOnDrop {
        fn drop(&mut self) {
            self.0.store(true, Ordering::SeqCst);
        }
    }

    let rt = RuntimeBuilder::new().build();
    let dropped = Arc::new(AtomicBool::new(false));

    let result = rt.block_on({
        let dropped = dropped.clone();
        async move {
            timeout(Duration::from_millis(20), async move {
                let _guard = SetOnDrop(dropped);
                sleep(Duration::from_secs(60)).await;
            })
            .await
        }
    });

    assert_eq!(result, Err(Elapsed));
    assert!(dropped.load(Ordering::SeqCst));
}

#[test]
fn test_timeout_with_sleep_inside_margin() {
    let rt = RuntimeBuilder::new().build();

    let result = rt.block_on(async {
        timeout(Duration::from_millis(200), async {
            sleep(Duration::from_millis(10)).await;
            "made it"
        })
        .await
    });

    assert_eq!(result, Ok("made it"));
}
