#![allow(dead_code, unused_imports)]

use json_plan::{Buffer, Plan, Shape};

mod catalog;
pub use catalog::{generate_catalog, Catalog, Product, Variant};

/// Compile plan for `T` and serialize `value` with it.
pub fn marshal<T: Shape>(value: &T) -> String {
	let plan = Plan::<T>::compile().expect("Failed to compile plan");
	marshal_with(&plan, value)
}

/// Serialize `value` with existing plan.
pub fn marshal_with<T: Shape>(plan: &Plan<T>, value: &T) -> String {
	let mut buf = Buffer::new();
	plan.marshal(value, &mut buf);
	String::from_utf8(buf.into_vec()).expect("Output is not UTF-8")
}

/// Parse output, panicking with the output if it's not valid JSON.
pub fn parse(json: &str) -> serde_json::Value {
	match serde_json::from_str(json) {
		Ok(value) => value,
		Err(err) => panic!("Invalid JSON ({}): {}", err, json),
	}
}
