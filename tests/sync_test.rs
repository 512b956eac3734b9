// Integration tests for the coordination primitives
// Tests cover: run-once under contention, barrier completion and abandonment

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use std::thread;
use std::time::Duration;

use teestream::{BarrierError, DuplicatorChain, RunOnce, TaskBarrier};

// ============================================================================
// RunOnce
// ============================================================================

#[test]
fn test_run_once_under_contention() {
    let once = Arc::new(RunOnce::new());
    let counter = Arc::new(AtomicI64::new(0));

    let handles: Vec<_> = (0..100)
        .map(|_| {
            let once = Arc::clone(&once);
            let counter = Arc::clone(&counter);
            thread::spawn(move || {
                once.run(|| {
                    counter.fetch_add(1, Ordering::SeqCst);
                });
                once.run(|| {
                    counter.fetch_sub(1, Ordering::SeqCst);
                });
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap();
    }

    assert_eq!(counter.load(Ordering::SeqCst), 1);
    assert!(once.is_completed());
}

#[test]
fn test_exactly_one_caller_reports_running() {
    let once = Arc::new(RunOnce::new());
    let handles: Vec<_> = (0..16)
        .map(|_| {
            let once = Arc::clone(&once);
            thread::spawn(move || once.run(|| thread::sleep(Duration::from_millis(10))))
        })
        .collect();

    let ran = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|&ran| ran)
        .count();
    assert_eq!(ran, 1);
}

// ============================================================================
// TaskBarrier
// ============================================================================

#[test]
fn test_barrier_waits_for_replication_tasks() {
    let barrier = TaskBarrier::new();
    let data: Vec<u8> = (0..10_000).map(|i| (i % 256) as u8).collect();
    let data = Arc::new(data);

    let handles: Vec<_> = barrier
        .register_many(4)
        .into_iter()
        .map(|token| {
            let data = Arc::clone(&data);
            thread::spawn(move || {
                let mut copy = Vec::<u8>::new();
                DuplicatorChain::new(&data[..])
                    .with_sink(&mut copy)
                    .drain(1024)
                    .unwrap();
                token.complete();
                copy
            })
        })
        .collect();

    barrier.wait().unwrap();
    assert_eq!(barrier.outstanding(), 0);
    for h in handles {
        assert_eq!(h.join().unwrap(), *data);
    }
}

#[test]
fn test_panicking_task_is_abandoned() {
    let barrier = TaskBarrier::new();
    let token = barrier.register();

    let handle = thread::spawn(move || {
        let _token = token;
        panic!("task failed");
    });
    assert!(handle.join().is_err());

    assert_eq!(barrier.wait(), Err(BarrierError::Abandoned { count: 1 }));
}

#[test]
fn test_wait_timeout_reports_outstanding() {
    let barrier = TaskBarrier::new();
    let tokens = barrier.register_many(3);

    assert_eq!(
        barrier.wait_timeout(Duration::from_millis(20)),
        Err(BarrierError::TimedOut { outstanding: 3 })
    );

    for token in tokens {
        token.complete();
    }
    assert_eq!(barrier.wait_timeout(Duration::from_secs(1)), Ok(()));
}
