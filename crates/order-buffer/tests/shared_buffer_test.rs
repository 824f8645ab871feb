use order_buffer::{
    BufferError, ClientId, CompletionWait, OrderEvent, RecordingSink, SharedBuffer, WorkerId,
};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Many producers and consumers hammering a small buffer.
/// Checks exactly-once completion, FIFO claiming and the cursor invariants.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_producers_and_consumers() {
    const CLIENTS: u32 = 40;
    const WORKERS: u32 = 4;
    const CAPACITY: usize = 3;

    let sink = Arc::new(RecordingSink::new());
    let buffer = SharedBuffer::new(CAPACITY, sink.clone()).unwrap();
    let stop = Arc::new(AtomicBool::new(false));

    // Invariant watcher
    let watcher = tokio::spawn({
        let buffer = buffer.clone();
        let stop = stop.clone();
        async move {
            while !stop.load(Ordering::Acquire) {
                let snapshot = buffer.snapshot();
                assert!(snapshot.pending <= CAPACITY as u64);
                assert_eq!(snapshot.pending, snapshot.write_cursor - snapshot.read_cursor);
                assert!(buffer.admission_level() <= CAPACITY);
                assert!(buffer.availability_level() <= CAPACITY);
                tokio::task::yield_now().await;
            }
        }
    });

    let mut workers = Vec::new();
    for id in 1..=WORKERS {
        let buffer = buffer.clone();
        workers.push(tokio::spawn(async move {
            let worker = WorkerId(id);
            let mut processed = 0u32;
            loop {
                match buffer.claim(worker).await {
                    Ok(Some(order)) => {
                        tokio::time::sleep(Duration::from_millis(1)).await;
                        buffer.finish(worker, &order).unwrap();
                        processed += 1;
                    }
                    Ok(None) => {
                        let _ = buffer.release_admission();
                    }
                    Err(BufferError::Closed(_)) => break processed,
                    Err(e) => panic!("unexpected error: {e}"),
                }
            }
        }));
    }

    let mut clients = Vec::new();
    for id in 1..=CLIENTS {
        let buffer = buffer.clone();
        clients.push(tokio::spawn(async move {
            let reservation = buffer.place(ClientId(id)).await.unwrap();
            let position = reservation.position;
            let completion = buffer
                .await_completion(reservation.ticket, CompletionWait::Signal)
                .await
                .unwrap();
            assert_eq!(completion.position, position);
            position
        }));
    }

    let mut positions = HashSet::new();
    for client in clients {
        assert!(positions.insert(client.await.unwrap()), "position reused");
    }
    assert_eq!(positions.len(), CLIENTS as usize);

    buffer.close();
    let mut processed = 0;
    for worker in workers {
        processed += worker.await.unwrap();
    }
    assert_eq!(processed, CLIENTS);

    stop.store(true, Ordering::Release);
    watcher.await.unwrap();

    // FIFO: orders were claimed in exactly the order they were placed
    assert_eq!(sink.started(), sink.placed());

    // Each position finished exactly once
    let finished: Vec<u64> = sink
        .events()
        .iter()
        .filter_map(|event| match event {
            OrderEvent::ProcessingFinished { position, .. } => Some(*position),
            _ => None,
        })
        .collect();
    let unique: HashSet<u64> = finished.iter().copied().collect();
    assert_eq!(finished.len(), CLIENTS as usize);
    assert_eq!(unique.len(), CLIENTS as usize);

    let snapshot = buffer.snapshot();
    assert_eq!(snapshot.completed, CLIENTS as u64);
    assert_eq!(snapshot.pending, 0);
    assert_eq!(snapshot.in_flight, 0);
    assert_eq!(buffer.admission_level(), CAPACITY);
}

/// A full buffer holds producers back until a worker frees a slot.
#[tokio::test]
async fn test_full_buffer_blocks_admission() {
    let buffer = SharedBuffer::new(1, Arc::new(RecordingSink::new())).unwrap();
    let first = buffer.place(ClientId(1)).await.unwrap();

    let second = tokio::spawn({
        let buffer = buffer.clone();
        async move { buffer.place(ClientId(2)).await }
    });

    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(!second.is_finished(), "second client must wait for a free slot");

    let order = buffer.claim(WorkerId(1)).await.unwrap().unwrap();
    assert_eq!(order.client, ClientId(1));

    // Claimed but unfinished: the slot is still accounted for
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(!second.is_finished());

    buffer.finish(WorkerId(1), &order).unwrap();
    let reservation = second.await.unwrap().unwrap();
    assert_eq!(reservation.position, 1);
    assert_eq!(reservation.slot, 0);

    first.ticket.wait().await.unwrap();
}

/// Workers waiting on an empty buffer stay blocked until an order arrives.
#[tokio::test]
async fn test_empty_buffer_blocks_workers() {
    let buffer = SharedBuffer::new(2, Arc::new(RecordingSink::new())).unwrap();

    let worker = tokio::spawn({
        let buffer = buffer.clone();
        async move { buffer.claim(WorkerId(1)).await }
    });

    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(!worker.is_finished());

    buffer.place(ClientId(7)).await.unwrap();
    let order = worker.await.unwrap().unwrap().unwrap();
    assert_eq!(order.client, ClientId(7));
}
