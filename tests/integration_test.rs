use priopool::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[test]
fn test_thread_count_matches_config() {
    for n in [1, 2, 4, 7] {
        let pool = ThreadPool::with_threads(n).unwrap();
        assert_eq!(pool.thread_count(), n);
    }
}

#[test]
fn test_default_thread_count_is_hardware_parallelism() {
    let pool = ThreadPool::new(&Config::default()).unwrap();
    assert_eq!(pool.thread_count(), num_cpus::get());
}

#[test]
fn test_invalid_config_fails_fast() {
    assert!(Config::builder().num_threads(0).build().is_err());
}

#[test]
fn test_fire_and_forget_increments() {
    for n in [1, 2, 8] {
        let pool = ThreadPool::with_threads(n).unwrap();
        let counter = Arc::new(AtomicUsize::new(0));

        for _ in 0..100 {
            let counter = counter.clone();
            pool.post(move || {
                counter.fetch_add(1, Ordering::Relaxed);
            })
            .unwrap();
        }

        pool.wait_for_all();
        assert_eq!(counter.load(Ordering::Relaxed), 100, "workers = {}", n);
    }
}

#[test]
fn test_future_resolves_to_value() {
    let pool = ThreadPool::with_threads(2).unwrap();
    let future = pool.submit(|| "forty-two".len()).unwrap();
    assert_eq!(future.get().unwrap(), 9);
}

#[test]
fn test_index_sum() {
    let pool = ThreadPool::with_threads(4).unwrap();

    let futures: Vec<_> = (0..100usize)
        .map(|i| pool.submit(move || i).unwrap())
        .collect();

    let sum: usize = futures.into_iter().map(|f| f.get().unwrap()).sum();
    assert_eq!(sum, 4950);
}

#[test]
fn test_panic_surfaces_through_future_and_stats() {
    let pool = ThreadPool::with_threads(2).unwrap();

    let future = pool.submit(|| -> i32 { panic!("deliberate") }).unwrap();
    let err = future.get().unwrap_err();
    match err {
        Error::TaskPanicked(msg) => assert_eq!(msg, "deliberate"),
        other => panic!("unexpected error: {other}"),
    }

    pool.wait_for_all();
    let stats = pool.stats();
    assert_eq!(stats.tasks_failed, 1);
    assert_eq!(stats.tasks_completed, 0);
}

#[test]
fn test_panic_does_not_kill_worker() {
    let pool = ThreadPool::with_threads(1).unwrap();

    pool.post(|| panic!("ignored")).unwrap();
    let future = pool.submit(|| 5).unwrap();
    assert_eq!(future.get().unwrap(), 5);

    pool.wait_for_all();
    let stats = pool.stats();
    assert_eq!(stats.tasks_failed, 1);
    assert_eq!(stats.tasks_completed, 1);
}

#[test]
fn test_priority_execution_order() {
    let pool = ThreadPool::with_threads(1).unwrap();
    let (gate_tx, gate_rx) = crossbeam_channel::bounded::<()>(0);
    let order = Arc::new(parking_lot::Mutex::new(Vec::new()));

    // Hold the single worker so the three tasks queue up behind the gate.
    pool.post(move || {
        let _ = gate_rx.recv();
    })
    .unwrap();

    for (label, priority) in [
        ("low", Priority::Low),
        ("normal", Priority::Normal),
        ("high", Priority::High),
    ] {
        let order = order.clone();
        pool.post_with_priority(move || order.lock().push(label), priority)
            .unwrap();
    }

    gate_tx.send(()).unwrap();
    pool.wait_for_all();

    assert_eq!(*order.lock(), vec!["high", "normal", "low"]);
}

#[test]
fn test_batch_preserves_fifo_within_priority() {
    let pool = ThreadPool::with_threads(1).unwrap();
    let (gate_tx, gate_rx) = crossbeam_channel::bounded::<()>(0);
    let order = Arc::new(parking_lot::Mutex::new(Vec::new()));

    pool.post(move || {
        let _ = gate_rx.recv();
    })
    .unwrap();

    let closures: Vec<_> = (0..10usize)
        .map(|i| {
            let order = order.clone();
            move || order.lock().push(i)
        })
        .collect();
    let accepted = pool.post_batch(closures, Priority::Normal).unwrap();
    assert_eq!(accepted, 10);

    gate_tx.send(()).unwrap();
    pool.wait_for_all();

    assert_eq!(*order.lock(), (0..10).collect::<Vec<_>>());
}

#[test]
fn test_wait_for_all_with_nothing_pending() {
    let pool = ThreadPool::with_threads(2).unwrap();
    pool.wait_for_all();
}

#[test]
fn test_shutdown_is_idempotent_and_rejects() {
    let pool = ThreadPool::with_threads(3).unwrap();
    pool.shutdown();
    pool.shutdown();

    assert_eq!(pool.thread_count(), 3);

    let executed = Arc::new(AtomicUsize::new(0));
    let executed_clone = executed.clone();
    let result = pool.post(move || {
        executed_clone.fetch_add(1, Ordering::Relaxed);
    });
    assert!(matches!(result, Err(Error::PoolStopped)));

    let future = pool.submit(|| 1);
    assert!(matches!(future, Err(Error::PoolStopped)));

    std::thread::sleep(Duration::from_millis(20));
    assert_eq!(executed.load(Ordering::Relaxed), 0);
    assert_eq!(pool.stats().tasks_rejected, 2);
}

#[test]
fn test_shutdown_fails_pending_futures() {
    let pool = ThreadPool::with_threads(1).unwrap();
    let (gate_tx, gate_rx) = crossbeam_channel::bounded::<()>(0);

    pool.post(move || {
        let _ = gate_rx.recv();
    })
    .unwrap();

    // Queued behind the gate; shutdown drains it before it can run.
    let future = pool.submit(|| 123).unwrap();

    let releaser = std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(50));
        let _ = gate_tx.send(());
    });

    pool.shutdown();
    releaser.join().unwrap();

    assert!(matches!(future.get(), Err(Error::PoolShutDown)));
}

#[test]
fn test_future_get_timeout() {
    let pool = ThreadPool::with_threads(1).unwrap();
    let (gate_tx, gate_rx) = crossbeam_channel::bounded::<()>(0);

    pool.post(move || {
        let _ = gate_rx.recv();
    })
    .unwrap();

    let future = pool.submit(|| 9).unwrap();
    assert!(matches!(
        future.get_timeout(Duration::from_millis(20)),
        Err(Error::Timeout)
    ));

    gate_tx.send(()).unwrap();
    let future = pool.submit(|| 9).unwrap();
    assert_eq!(future.get_timeout(Duration::from_secs(5)).unwrap(), 9);
}

#[test]
fn test_stats_accumulate_task_time() {
    let pool = ThreadPool::with_threads(2).unwrap();

    for _ in 0..4 {
        pool.post(|| std::thread::sleep(Duration::from_millis(5)))
            .unwrap();
    }
    pool.wait_for_all();

    let stats = pool.stats();
    assert_eq!(stats.tasks_completed, 4);
    assert!(stats.total_task_time >= Duration::from_millis(20));
}

#[test]
fn test_drop_shuts_down() {
    let counter = Arc::new(AtomicUsize::new(0));
    {
        let pool = ThreadPool::with_threads(2).unwrap();
        for _ in 0..50 {
            let counter = counter.clone();
            pool.post(move || {
                counter.fetch_add(1, Ordering::Relaxed);
            })
            .unwrap();
        }
        pool.wait_for_all();
        // Drop runs shutdown; must not hang or panic.
    }
    assert_eq!(counter.load(Ordering::Relaxed), 50);
}
