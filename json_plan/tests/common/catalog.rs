use std::ops;

use json_plan::Shape;
use rand::Rng;
use rand_pcg::Lcg64Xsh32;
use serde_json::{json, Map, Value};

#[derive(Shape, Clone, Debug)]
pub struct Catalog {
	#[json("name")]
	pub name: String,
	#[json("products")]
	pub products: Vec<Product>,
	#[json("featured,omitempty")]
	pub featured: Option<Box<Product>>,
	pub revision: u64,
}

#[derive(Shape, Clone, Debug)]
pub struct Product {
	#[json("id")]
	pub id: u64,
	#[json("title,escape")]
	pub title: String,
	#[json("price")]
	pub price: f64,
	#[json("stock,omitempty")]
	pub stock: u32,
	#[json("tags,omitempty,escape")]
	pub tags: Vec<String>,
	#[json("rating")]
	pub rating: Option<f32>,
	#[json("variants")]
	pub variants: Vec<Variant>,
	#[json("discontinued,omitempty")]
	pub discontinued: bool,
}

#[derive(Shape, Clone, Debug)]
pub struct Variant {
	#[json("sku")]
	pub sku: String,
	#[json("weight,omitempty")]
	pub weight: Option<u16>,
	#[json("delta")]
	pub delta: i32,
}

pub trait Generate {
	fn generate<R: Rng>(rng: &mut R) -> Self;
}

impl Generate for Variant {
	fn generate<R: Rng>(rng: &mut R) -> Self {
		const SKUS: [&str; 4] = ["S", "M", "L", "XL"];
		Self {
			sku: SKUS[rng.gen_range(0..SKUS.len())].to_string(),
			weight: if rng.gen_bool(0.5) {
				Some(rng.gen())
			} else {
				None
			},
			delta: rng.gen_range(-1000..1000),
		}
	}
}

impl Generate for Product {
	fn generate<R: Rng>(rng: &mut R) -> Self {
		const TITLES: [&str; 6] = [
			"plain",
			"with \"quotes\"",
			"back\\slash",
			"multi\nline\r\n",
			"tab\tseparated",
			"ünïcödé 月曜日",
		];
		Self {
			id: rng.gen(),
			title: TITLES[rng.gen_range(0..TITLES.len())].to_string(),
			// Quarters are exact in binary and decimal
			price: rng.gen_range(0..400_000) as f64 * 0.25,
			stock: if rng.gen_bool(0.3) { 0 } else { rng.gen() },
			tags: generate_vec(rng, 0..4, |rng| {
				TITLES[rng.gen_range(0..TITLES.len())].to_string()
			}),
			rating: if rng.gen_bool(0.7) {
				Some(rng.gen_range(0..11) as f32 * 0.5)
			} else {
				None
			},
			variants: generate_vec(rng, 0..3, Variant::generate),
			discontinued: rng.gen_bool(0.2),
		}
	}
}

fn generate_vec<R: Rng, T>(
	rng: &mut R,
	range: ops::Range<usize>,
	mut generate: impl FnMut(&mut R) -> T,
) -> Vec<T> {
	let len = rng.gen_range(range);
	(0..len).map(|_| generate(rng)).collect()
}

pub fn generate_catalog(products: usize) -> Catalog {
	const STATE: u64 = 3141592653;
	const STREAM: u64 = 5897932384;

	let mut rng = Lcg64Xsh32::new(STATE, STREAM);

	let products = (0..products)
		.map(|_| Product::generate(&mut rng))
		.collect::<Vec<_>>();
	let featured = products.first().cloned().map(Box::new);
	Catalog {
		name: "catalog".to_string(),
		products,
		featured,
		revision: 7,
	}
}

// Expected output, built independently of plans

impl Catalog {
	pub fn to_value(&self) -> Value {
		let mut map = Map::new();
		map.insert("name".into(), json!(self.name));
		map.insert(
			"products".into(),
			Value::Array(self.products.iter().map(Product::to_value).collect()),
		);
		if let Some(featured) = &self.featured {
			map.insert("featured".into(), featured.to_value());
		}
		Value::Object(map)
	}
}

impl Product {
	pub fn to_value(&self) -> Value {
		let mut map = Map::new();
		map.insert("id".into(), json!(self.id));
		map.insert("title".into(), json!(self.title));
		map.insert("price".into(), json!(self.price));
		if self.stock != 0 {
			map.insert("stock".into(), json!(self.stock));
		}
		if !self.tags.is_empty() {
			map.insert("tags".into(), json!(self.tags));
		}
		map.insert("rating".into(), json!(self.rating));
		map.insert(
			"variants".into(),
			Value::Array(self.variants.iter().map(Variant::to_value).collect()),
		);
		if self.discontinued {
			map.insert("discontinued".into(), json!(true));
		}
		Value::Object(map)
	}
}

impl Variant {
	pub fn to_value(&self) -> Value {
		let mut map = Map::new();
		map.insert("sku".into(), json!(self.sku));
		if let Some(weight) = self.weight {
			map.insert("weight".into(), json!(weight));
		}
		map.insert("delta".into(), json!(self.delta));
		Value::Object(map)
	}
}
