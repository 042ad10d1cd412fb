use recess::sync::{Closed, Queue};
use recess::time::sleep;
use recess::{RuntimeBuilder, task};

use std::sync::Arc;
use std::time::Duration;

#[test]
fn test_fifo_order() {
    let rt = RuntimeBuilder::new().build();

    let received = rt.block_on(async {
        let queue = Queue::new();

        for n in 0..5 {
            queue.put(n).await.unwrap();
        }

        let mut received = Vec::new();
        for _ in 0..5 {
            received.push(queue.get().await.unwrap());
        }
        received
    });

    assert_eq!(received, vec![0, 1, 2, 3, 4]);
}

#[test]
fn test_get_waits_for_put() {
    let rt = RuntimeBuilder::new().build();

    let value = rt.block_on(async {
        let queue: Arc<Queue<&str>> = Arc::new(Queue::new());

        let producer = {
            let queue = queue.clone();
            task::spawn(async move {
                sleep(Duration::from_millis(20)).await;
                queue.put("late").await.unwrap();
            })
        };

        let value = queue.get().await.unwrap();
        producer.await.unwrap();
        value
    });

    assert_eq!(value, "late");
}

#[test]
fn test_bounded_queue_applies_backpressure() {
    let rt = RuntimeBuilder::new().build();

    let received = rt.block_on(async {
        let queue: Arc<Queue<u32>> = Arc::new(Queue::bounded(1));

        let producer = {
            let queue = queue.clone();
            task::spawn(async move {
                for n in 0..4 {
                    queue.put(n).await.unwrap();
                }
            })
        };

        // The producer can only stay one item ahead of us.
        let mut received = Vec::new();
        for _ in 0..4 {
            sleep(Duration::from_millis(10)).await;
            assert!(queue.len() <= 1);
            received.push(queue.get().await.unwrap());
        }

        producer.await.unwrap();
        received
    });

    assert_eq!(received, vec![0, 1, 2, 3]);
}

#[test]
fn test_close_drains_buffered_items_first() {
    let rt = RuntimeBuilder::new().build();

    rt.block_on(async {
        let queue = Queue::new();

        queue.put(1).await.unwrap();
        queue.put(2).await.unwrap();
        queue.close();

        assert_eq!(queue.get().await, Ok(1));
        assert_eq!(queue.get().await, Ok(2));
        assert_eq!(queue.get().await, Err(Closed));
    });
}

#[test]
fn test_put_after_close_fails() {
    let rt = RuntimeBuilder::new().build();

    rt.block_on(async {
        let queue = Queue::new();
        queue.close();

        assert_eq!(queue.put(1).await, Err(Closed));
        assert!(queue.is_closed());
    });
}

#[test]
fn test_close_wakes_blocked_getter() {
    let rt = RuntimeBuilder::new().build();

    let outcome = rt.block_on(async {
        let queue: Arc<Queue<u32>> = Arc::new(Queue::new());

        let closer = {
            let queue = queue.clone();
            task::spawn(async move {
                sleep(Duration::from_millis(20)).await;
                queue.close();
            })
        };

        let outcome = queue.get().await;
        closer.await.unwrap();
        outcome
    });

    assert_eq!(outcome, Err(Closed));
}

#[test]
fn test_close_is_idempotent() {
    let rt = RuntimeBuilder::new().build();

    rt.block_on(async {
        let queue: Queue<u32> = Queue::new();
        queue.close();
        queue.close();

        assert!(queue.is_closed());
    });
}

#[test]
fn test_sentinel_shutdown_pattern() {
    let rt = RuntimeBuilder::new().build();

    let consumed = rt.block_on(async {
        let queue: Arc<Queue<i32>> = Arc::new(Queue::bounded(2));

        let consumer = {
            let queue = queue.clone();
            task::spawn(async move {
                let mut consumed = Vec::new();
                while let Ok(item) = queue.get().await {
                    if item < 0 {
                        break;
                    }
                    consumed.push(item);
                }
                consumed
            })
        };

        for n in 0..5 {
            queue.put(n).await.unwrap();
        }
        queue.put(-1).await.unwrap();

        consumer.await.unwrap()
    });

    assert_eq!(consumed, vec![0, 1, 2, 3, 4]);
}
