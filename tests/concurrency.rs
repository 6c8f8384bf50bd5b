mod common;
use common::*;
use odata_elk::*;
use std::sync::Arc;
use std::thread;

#[test]
fn shared_mappings_serve_parallel_requests() {
    let mappings = Arc::new(mappings());
    let filters = [
        "name eq 'a'",
        "age gt 3 and city eq 'Oslo'",
        "(status ne 'x' or age le 9) and name eq 'b'",
        "missing eq 1",
    ];

    let expected: Vec<_> = filters
        .iter()
        .map(|f| transform(mappings.as_ref(), SCOPE, f, &QueryOptions::default()).ok())
        .collect();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let mappings = Arc::clone(&mappings);
            thread::spawn(move || {
                filters
                    .iter()
                    .map(|f| transform(mappings.as_ref(), SCOPE, f, &QueryOptions::default()).ok())
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
    assert!(expected[3].is_none());
}
