use recess::task::{self, JoinError};
use recess::time::sleep;
use recess::{RuntimeBuilder, yield_now};

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

#[test]
fn test_join_handle_resolves_with_value() {
    let rt = RuntimeBuilder::new().build();

    let result = rt.block_on(async {
        let handle = task::spawn(async { "done" });
        handle.await
    });

    assert_eq!(result, Ok("done"));
}

#[test]
fn test_join_handle_is_finished() {
    let rt = RuntimeBuilder::new().build();

    rt.block_on(async {
        let handle = task::spawn(async { 1 });

        // Give the task a chance to run to completion.
        sleep(Duration::from_millis(20)).await;

        assert!(handle.is_finished());
    });
}

#[test]
fn test_cancelled_task_reports_cancelled() {
    let rt = RuntimeBuilder::new().build();

    let result = rt.block_on(async {
        let handle = task::spawn(async {
            sleep(Duration::from_secs(60)).await;
            1
        });

        yield_now().await;
        handle.cancel();
        handle.await
    });

    assert_eq!(result, Err(JoinError::Cancelled));
}

#[test]
fn test_cancellation_runs_destructors() {
    struct SetOnDrop(Arc<AtomicBool>);

    impl Drop for SetOnDrop {
        fn drop(&mut self) {
            self.0.store(true, Ordering::SeqCst);
        }
    }

    let rt = RuntimeBuilder::new().build();
    let dropped = Arc::new(AtomicBool::new(false));

    rt.block_on({
        let dropped = dropped.clone();
        async move {
            let handle = task::spawn(async move {
                let _guard = SetOnDrop(dropped);
                sleep(Duration::from_secs(60)).await;
            });

            yield_now().await;
            handle.cancel();
            let outcome = handle.await;

            assert_eq!(outcome, Err(JoinError::Cancelled));
        }
    });

    assert!(dropped.load(Ordering::SeqCst), "cleanup should have run");
}

#[test]
fn test_cancel_after_completion_is_noop() {
    let rt = RuntimeBuilder::new().build();

    let result = rt.block_on(async {
        let handle = task::spawn(async { 5 });

        sleep(Duration::from_millis(20)).await;
        handle.cancel();

        handle.await
    });

    assert_eq!(result, Ok(5));
}

#[test]
fn test_panicking_task_reports_panic() {
    let rt = RuntimeBuilder::new().build();

    let result = rt.block_on(async {
        let handle = task::spawn(async {
            panic!("boom");
        });
        handle.await
    });

    match result {
        Err(JoinError::Panicked(message)) => assert!(message.contains("boom")),
        other => panic!("expected a panic outcome, got {other:?}"),
    }
}

#[test]
fn test_panic_does_not_poison_scheduler() {
    let rt = RuntimeBuilder::new().build();

    let result = rt.block_on(async {
        let bad = task::spawn(async {
            panic!("contained");
        });
        let _ = bad.await;

        // The scheduler keeps driving other tasks afterwards.
        let good = task::spawn(async { 99 });
        good.await
    });

    assert_eq!(result, Ok(99));
}
