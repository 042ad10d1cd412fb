use recess::time::sleep;
use recess::{RuntimeBuilder, task};

use std::time::{Duration, Instant};

#[test]
fn test_sleep_waits_at_least_duration() {
    let rt = RuntimeBuilder::new().build();
    let duration = Duration::from_millis(50);

    let elapsed = rt.block_on(async move {
        let start = Instant::now();
        sleep(duration).await;
        start.elapsed()
    });

    assert!(elapsed >= duration, "slept only {elapsed:?}");
}

#[test]
fn test_sleep_zero_completes() {
    let rt = RuntimeBuilder::new().build();

    rt.block_on(async {
        sleep(Duration::from_millis(0)).await;
    });
}

#[test]
fn test_concurrent_sleeps_overlap() {
    let rt = RuntimeBuilder::new().build();
    let duration = Duration::from_millis(50);

    let elapsed = rt.block_on(async move {
        let start = Instant::now();

        let a = task::spawn(async move { sleep(duration).await });
        let b = task::spawn(async move { sleep(duration).await });
        let c = task::spawn(async move { sleep(duration).await });

        a.await.unwrap();
        b.await.unwrap();
        c.await.unwrap();

        start.elapsed()
    });

    assert!(elapsed >= duration);
    assert!(
        elapsed < duration * 3,
        "sleeps ran sequentially: {elapsed:?}"
    );
}

#[test]
fn test_timers_fire_in_deadline_order() {
    let rt = RuntimeBuilder::new().build();

    let order = rt.block_on(async {
        let order = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));

        let slow = {
            let order = order.clone();
            task::spawn(async move {
                sleep(Duration::from_millis(60)).await;
                order.lock().unwrap().push("slow");
            })
        };
        let fast = {
            let order = order.clone();
            task::spawn(async move {
                sleep(Duration::from_millis(10)).await;
                order.lock().unwrap().push("fast");
            })
        };

        slow.await.unwrap();
        fast.await.unwrap();

        let order = order.lock().unwrap().clone();
        order
    });

    assert_eq!(order, vec!["fast", "slow"]);
}
