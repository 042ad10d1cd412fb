use recess::{RuntimeBuilder, task, yield_now};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

#[test]
fn test_block_on_returns_value() {
    let rt = RuntimeBuilder::new().build();

    let result = rt.block_on(async { 42 });

    assert_eq!(result, 42);
}

#[test]
fn test_block_on_reusable() {
    let rt = RuntimeBuilder::new().build();

    assert_eq!(rt.block_on(async { 1 }), 1);
    assert_eq!(rt.block_on(async { 2 }), 2);
}

#[test]
fn test_spawn_and_join() {
    let rt = RuntimeBuilder::new().build();

    let result = rt.block_on(async {
        let handle = task::spawn(async { 10 + 20 });
        handle.await
    });

    assert_eq!(result, Ok(30));
}

#[test]
fn test_spawn_many_tasks() {
    let rt = RuntimeBuilder::new().build();
    let counter = Arc::new(AtomicUsize::new(0));

    rt.block_on({
        let counter = counter.clone();
        async move {
            let mut handles = Vec::new();

            for _ in 0..100 {
                let counter = counter.clone();
                handles.push(task::spawn(async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                }));
            }

            for handle in handles {
                handle.await.unwrap();
            }
        }
    });

    assert_eq!(counter.load(Ordering::SeqCst), 100);
}

#[test]
fn test_nested_spawn() {
    let rt = RuntimeBuilder::new().build();

    let result = rt.block_on(async {
        let outer = task::spawn(async {
            let inner = task::spawn(async { 7 });
            inner.await.unwrap() * 3
        });
        outer.await.unwrap()
    });

    assert_eq!(result, 21);
}

#[test]
fn test_yield_now_interleaves_tasks() {
    let rt = RuntimeBuilder::new().build();
    let log = Arc::new(std::sync::Mutex::new(Vec::new()));

    rt.block_on({
        let log = log.clone();
        async move {
            let a = {
                let log = log.clone();
                task::spawn(async move {
                    for _ in 0..3 {
                        log.lock().unwrap().push('a');
                        yield_now().await;
                    }
                })
            };
            let b = {
                let log = log.clone();
                task::spawn(async move {
                    for _ in 0..3 {
                        log.lock().unwrap().push('b');
                        yield_now().await;
                    }
                })
            };

            a.await.unwrap();
            b.await.unwrap();
        }
    });

    // Both tasks make progress in alternation rather than one running
    // to completion first.
    let log = log.lock().unwrap();
    assert_eq!(log.len(), 6);
    assert!(log.windows(2).any(|w| w[0] != w[1]));
}
