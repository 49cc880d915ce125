use json_plan::{Buffer, CompileError, Kind, SequencePlan, Shape};

mod common;
use common::{generate_catalog, parse, Product};

fn marshal<E: 'static>(plan: &SequencePlan<E>, items: &[E]) -> String {
	String::from_utf8(plan.to_vec(items)).expect("Output is not UTF-8")
}

#[test]
fn empty() {
	let plan = SequencePlan::<u64>::compile().unwrap();
	assert_eq!(marshal(&plan, &[]), "[]");

	let plan = SequencePlan::<Product>::compile().unwrap();
	assert_eq!(marshal(&plan, &[]), "[]");
}

#[test]
fn shapes() {
	#[derive(Shape)]
	struct Item {
		#[json("s")]
		s: String,
		#[json("n,omitempty")]
		n: u8,
	}

	let plan = SequencePlan::<Item>::compile().unwrap();
	let items = [
		Item {
			s: "1".into(),
			n: 0,
		},
		Item {
			s: "2".into(),
			n: 2,
		},
	];
	assert_eq!(marshal(&plan, &items), r#"[{"s":"1"},{"s":"2","n":2}]"#);
}

#[test]
fn optional_shapes() {
	#[derive(Shape)]
	struct Item {
		#[json("s")]
		s: &'static str,
	}

	let plan = SequencePlan::<Option<Item>>::compile().unwrap();
	let items = [Some(Item { s: "1" }), None, Some(Item { s: "3" })];
	assert_eq!(marshal(&plan, &items), r#"[{"s":"1"},null,{"s":"3"}]"#);
}

#[test]
fn escaped_strings() {
	let items = vec!["plain".to_string(), "quo\"te".to_string(), "new\nline".to_string()];

	let plan = SequencePlan::<String>::compile().unwrap();
	assert_eq!(marshal(&plan, &items), "[\"plain\",\"quo\"te\",\"new\nline\"]");

	let plan = SequencePlan::<String>::compile_escaped().unwrap();
	let output = marshal(&plan, &items);
	assert_eq!(output, r#"["plain","quo\"te","new\nline"]"#);
	assert_eq!(parse(&output), serde_json::json!(items));
}

#[test]
fn escape_applies_to_nested_sequences() {
	let items = vec![vec!["a\"".to_string()], vec![]];
	let plan = SequencePlan::<Vec<String>>::compile_escaped().unwrap();
	assert_eq!(marshal(&plan, &items), r#"[["a\""],[]]"#);
}

#[test]
fn escape_rejected_for_shapes() {
	#[derive(Shape)]
	struct Item {
		#[json("s")]
		s: String,
	}

	let err = SequencePlan::<Item>::compile_escaped().unwrap_err();
	assert_eq!(
		err,
		CompileError::DirectiveKind {
			shape: "<root>",
			field: "[]",
			directive: "escape",
			kind: Kind::Struct,
		}
	);
}

#[test]
fn appends_to_buffer() {
	let plan = SequencePlan::<i8>::compile().unwrap();
	let mut buf = Buffer::new();
	buf.write(b"{\"a\":");
	plan.marshal(&[1, 2], &mut buf);
	buf.write(b",\"b\":");
	plan.marshal(&[], &mut buf);
	buf.write(b"}");
	assert_eq!(buf.as_bytes(), br#"{"a":[1,2],"b":[]}"#);
}

#[test]
fn plan_shared_by_clones() {
	let catalog = generate_catalog(10);
	let plan = SequencePlan::<Product>::compile().unwrap();
	let clone = plan.clone();

	let output = marshal(&clone, &catalog.products);
	assert_eq!(output, marshal(&plan, &catalog.products));

	let expected = catalog
		.products
		.iter()
		.map(Product::to_value)
		.collect::<Vec<_>>();
	assert_eq!(parse(&output), serde_json::Value::Array(expected));
}
