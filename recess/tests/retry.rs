use recess::RuntimeBuilder;
use recess::tools::retry;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

#[test]
fn test_retry_succeeds_before_limit() {
    let rt = RuntimeBuilder::new().build();
    let attempts = Arc::new(AtomicUsize::new(0));

    let result = rt.block_on({
        let attempts = attempts.clone();
        async move {
            retry(5, move || {
                let attempts = attempts.clone();
                async move {
                    let n = attempts.fetch_add(1, Ordering::SeqCst);
                    if n < 2 {
                        Err::<i32, &'static str>("fail")
                    } else {
                        Ok(42)
                    }
                }
            })
            .await
        }
    });

    assert_eq!(result, Ok(42));
    assert_eq!(attempts.load(Ordering::SeqCst), 3);
}

#[test]
fn test_retry_fails_after_limit() {
    let rt = RuntimeBuilder::new().build();
    let attempts = Arc::new(AtomicUsize::new(0));

    let result = rt.block_on({
        let attempts = attempts.clone();
        async move {
            retry(3, move || {
                let attempts = attempts.clone();
                async move {
                    attempts.fetch_add(1, Ordering::SeqCst);
                    Err::<usize, &'static str>("fail")
                }
            })
            .await
        }
    });

    assert_eq!(result, Err("fail"));
    assert_eq!(attempts.load(Ordering::SeqCst), 4);
}

#[test]
fn test_retry_with_interval_paces_attempts() {
    let rt = RuntimeBuilder::new().build();
    let attempts = Arc::new(AtomicUsize::new(0));
    let interval = Duration::from_millis(20);

    let elapsed = rt.block_on({
        let attempts = attempts.clone();
        async move {
            let start = Instant::now();

            let result = retry(5, move || {
                let attempts = attempts.clone();
                async move {
                    let n = attempts.fetch_add(1, Ordering::SeqCst);
                    if n < 2 { Err("fail") } else { Ok(77) }
                }
            })
            .set_interval(interval)
            .await;

            assert_eq!(result, Ok(77));
            start.elapsed()
        }
    });

    // Two failures mean two waits between the three attempts.
    assert!(elapsed >= interval * 2, "attempts not paced: {elapsed:?}");
    assert_eq!(attempts.load(Ordering::SeqCst), 3);
}

#[test]
fn test_retry_waiting_for_event() {
    use recess::sync::Event;
    use recess::task;
    use recess::time::sleep;

    let rt = RuntimeBuilder::new().build();

    let outcome = rt.block_on(async {
        let event = Arc::new(Event::new());

        let setter = {
            let event = event.clone();
            task::spawn(async move {
                sleep(Duration::from_millis(50)).await;
                event.set();
            })
        };

        // Each attempt waits a short slice; the event is set before the
        // attempts run out.
        let outcome = retry(10, {
            let event = event.clone();
            move || {
                let event = event.clone();
                async move { event.wait_timeout(Duration::from_millis(20)).await }
            }
        })
        .await;

        setter.await.unwrap();
        outcome
    });

    assert!(outcome.is_ok());
}
