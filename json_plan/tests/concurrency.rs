use std::{sync::Arc, thread};

use json_plan::{buffer, BufferPool, Plan, Shape};

mod common;
use common::{generate_catalog, marshal_with, Catalog};

const THREADS: usize = 8;
const ITERATIONS: usize = 50;

#[test]
fn shared_plan() {
	let catalog = generate_catalog(25);
	let plan = Plan::<Catalog>::new();
	let expected = marshal_with(&plan, &catalog);

	thread::scope(|scope| {
		for _ in 0..THREADS {
			scope.spawn(|| {
				for _ in 0..ITERATIONS {
					assert_eq!(marshal_with(&plan, &catalog), expected);
				}
			});
		}
	});
}

#[test]
fn plan_sent_to_threads() {
	let catalog = generate_catalog(10);
	let plan = Plan::<Catalog>::new();
	let expected = marshal_with(&plan, &catalog);
	let catalog = Arc::new(catalog);

	let handles = (0..THREADS)
		.map(|_| {
			let plan = plan.clone();
			let catalog = Arc::clone(&catalog);
			thread::spawn(move || plan.to_vec(&*catalog))
		})
		.collect::<Vec<_>>();

	for handle in handles {
		assert_eq!(handle.join().unwrap(), expected.as_bytes());
	}
}

#[test]
fn plans_compiled_concurrently_are_equivalent() {
	let catalog = generate_catalog(5);

	let outputs = thread::scope(|scope| {
		let handles = (0..THREADS)
			.map(|_| scope.spawn(|| Plan::<Catalog>::new().to_vec(&catalog)))
			.collect::<Vec<_>>();
		handles
			.into_iter()
			.map(|handle| handle.join().unwrap())
			.collect::<Vec<_>>()
	});

	for output in &outputs[1..] {
		assert_eq!(output, &outputs[0]);
	}
}

#[test]
fn pooled_buffers() {
	static POOL: BufferPool = BufferPool::new();

	let catalog = generate_catalog(10);
	let plan = Plan::<Catalog>::new();
	let expected = plan.to_vec(&catalog);

	thread::scope(|scope| {
		for _ in 0..THREADS {
			scope.spawn(|| {
				for _ in 0..ITERATIONS {
					let mut buf = POOL.acquire();
					plan.marshal(&catalog, &mut buf);
					assert_eq!(buf.as_bytes(), expected.as_slice());
				}
			});
		}
	});

	// Each thread holds at most one buffer at a time
	assert!(POOL.retained() >= 1);
	assert!(POOL.retained() <= THREADS);

	// Global pool
	let mut buf = buffer::acquire();
	plan.marshal(&catalog, &mut buf);
	assert_eq!(buf.as_bytes(), expected.as_slice());
}

#[derive(Shape)]
struct Node {
	#[json("id")]
	id: usize,
	#[json("next,omitempty")]
	next: Option<Box<Node>>,
}

#[test]
fn shared_recursive_plan() {
	let mut list = Node { id: 0, next: None };
	for id in 1..100 {
		list = Node {
			id,
			next: Some(Box::new(list)),
		};
	}

	let plan = Plan::<Node>::new();
	let expected = plan.to_vec(&list);
	assert!(expected.starts_with(br#"{"id":99,"next":{"id":98,"#));
	let tail = format!(r#"{{"id":0}}{}"#, "}".repeat(99));
	assert!(expected.ends_with(tail.as_bytes()));

	thread::scope(|scope| {
		for _ in 0..THREADS {
			scope.spawn(|| {
				for _ in 0..ITERATIONS {
					assert_eq!(plan.to_vec(&list), expected);
				}
			});
		}
	});
}
