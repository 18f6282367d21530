use std::sync::atomic::AtomicBool;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::thread;

use serde_json::json;
use serde_json::Value;

use crate::commons::json_document;
use crate::commons::recording_callback;
use crate::commons::taken;

const THREADS: usize = 8;
const ROUNDS: usize = 50;

#[test]
fn registrations_from_many_threads_all_fire() {
    let document = Arc::new(json_document());
    let fired = Arc::new(AtomicUsize::new(0));

    let workers: Vec<_> = (0..THREADS)
        .map(|_| {
            let document = Arc::clone(&document);
            let fired = Arc::clone(&fired);
            thread::spawn(move || {
                document.register("shared/value", move |_: &Value, _: &Value| {
                    fired.fetch_add(1, Ordering::SeqCst);
                })
            })
        })
        .collect();
    let handles: Vec<_> = workers.into_iter().map(|w| w.join().unwrap()).collect();

    assert_eq!(document.observer_count(&document.path("shared/value")), THREADS);
    document.replace(json!({"shared": {"value": 1}}));
    assert_eq!(fired.load(Ordering::SeqCst), THREADS);
    drop(handles);
}

#[test]
fn concurrent_replacements_are_serialized() {
    let document = Arc::new(json_document());
    let (events, callback) = recording_callback();
    let _handle = document.register("counter", callback);

    let writers: Vec<_> = (0..THREADS)
        .map(|t| {
            let document = Arc::clone(&document);
            thread::spawn(move || {
                for round in 0..ROUNDS {
                    document.replace(json!({"counter": t * ROUNDS + round}));
                }
            })
        })
        .collect();
    for writer in writers {
        writer.join().unwrap();
    }

    let events = taken(&events);
    assert!(!events.is_empty());
    assert_eq!(events[0].0, Value::Null);
    // Every notification starts from the value the previous one ended with
    for pair in events.windows(2) {
        assert_eq!(pair[0].1, pair[1].0);
        assert_ne!(pair[1].0, pair[1].1);
    }
    assert_eq!(events.last().map(|(_, new)| new.clone()), Some(document.get_at(&document.path("counter"))));
}

#[test]
fn cancel_from_another_thread_is_final() {
    let document = Arc::new(json_document());
    let fired = Arc::new(AtomicUsize::new(0));
    let mut handle = document.register("tick", {
        let fired = Arc::clone(&fired);
        move |_: &Value, _: &Value| {
            fired.fetch_add(1, Ordering::SeqCst);
        }
    });

    let stop = Arc::new(AtomicBool::new(false));
    let writer = {
        let document = Arc::clone(&document);
        let stop = Arc::clone(&stop);
        thread::spawn(move || {
            let mut tick = 0u64;
            while !stop.load(Ordering::SeqCst) {
                tick += 1;
                document.replace(json!({"tick": tick}));
            }
        })
    };

    while fired.load(Ordering::SeqCst) == 0 {
        thread::yield_now();
    }
    assert!(handle.cancel());
    let after_cancel = fired.load(Ordering::SeqCst);

    for _ in 0..ROUNDS {
        thread::yield_now();
    }
    stop.store(true, Ordering::SeqCst);
    writer.join().unwrap();

    assert_eq!(fired.load(Ordering::SeqCst), after_cancel);
    assert!(!handle.is_connected());
}

#[test]
fn subtree_and_whole_replacements_interleave_safely() {
    let document = Arc::new(json_document());
    document.replace(json!({"left": 0, "right": 0}));
    let (left, left_callback) = recording_callback();
    let _left = document.register("left", left_callback);

    let subtree_writer = {
        let document = Arc::clone(&document);
        thread::spawn(move || {
            let path = document.path("left");
            for round in 1..=ROUNDS {
                document.replace_at(&path, json!(round));
            }
        })
    };
    let whole_writer = {
        let document = Arc::clone(&document);
        thread::spawn(move || {
            for round in 1..=ROUNDS {
                let current = document.get_at(&document.path("left"));
                document.replace(json!({"left": current, "right": round}));
            }
        })
    };
    subtree_writer.join().unwrap();
    whole_writer.join().unwrap();

    let events = taken(&left);
    for (old, new) in &events {
        assert_ne!(old, new);
    }
    assert_eq!(document.get_at(&document.path("right")), json!(ROUNDS));
}
